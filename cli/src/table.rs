// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use colored::{Color, Colorize};
use unicode_width::UnicodeWidthStr;

/// A column of a [`Table`] over rows of `T`.
pub trait Column<T> {
    fn name(&self) -> &'static str;
    fn format(&self, data: &T) -> String;

    fn padding_direction(&self) -> PaddingDirection {
        PaddingDirection::Left
    }

    fn color(&self, _data: &T) -> Option<Color> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingDirection {
    Left,
    Right,
}

/// Plain text table with a bold header row.
#[derive(Debug)]
pub struct Table<'a, T, C: Column<T>> {
    columns: &'a [C],
    data: &'a [T],
    separator: &'a str,
}

impl<'a, T, C: Column<T>> Table<'a, T, C> {
    pub fn new(columns: &'a [C], data: &'a [T]) -> Self {
        Self {
            columns,
            data,
            separator: "  ",
        }
    }
}

impl<T, C: Column<T>> fmt::Display for Table<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self
            .data
            .iter()
            .map(|row| self.columns.iter().map(|col| col.format(row)).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                cells
                    .iter()
                    .map(|row| row[i].width())
                    .chain([col.name().width()])
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let last = self.columns.len().saturating_sub(1);
        for (i, col) in self.columns.iter().enumerate() {
            let cell = pad(col.name(), widths[i], col.padding_direction(), i == last);
            write!(f, "{}", cell.bold())?;
            f.write_str(if i == last { "\n" } else { self.separator })?;
        }

        for (row, data) in cells.iter().zip(self.data) {
            for (i, (col, cell)) in self.columns.iter().zip(row).enumerate() {
                // pad before colouring, escape codes have no width
                let cell = pad(cell, widths[i], col.padding_direction(), i == last);
                match col.color(data) {
                    Some(color) => write!(f, "{}", cell.color(color))?,
                    None => f.write_str(&cell)?,
                }
                f.write_str(if i == last { "\n" } else { self.separator })?;
            }
        }
        Ok(())
    }
}

fn pad(cell: &str, width: usize, direction: PaddingDirection, last: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(cell.width()));
    match direction {
        // last column does not need padding if it's left-aligned
        PaddingDirection::Left if last => cell.to_string(),
        PaddingDirection::Left => format!("{cell}{fill}"),
        PaddingDirection::Right => format!("{fill}{cell}"),
    }
}
