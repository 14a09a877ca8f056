// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command};
use colored::{Color, Colorize};
use staysync_core::{StatusView, StaySync, SyncState};

use crate::arg::{CommonArgs, OutputFormat, print_json};
use crate::table::{Column, PaddingDirection, Table};

#[derive(Debug, Clone)]
pub struct CmdStatus {
    pub property: Option<String>,
    pub output_format: OutputFormat,
}

impl CmdStatus {
    pub const NAME: &str = "status";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Show the sync status of one or every property")
            .arg(CommonArgs::property(false))
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            property: CommonArgs::get_property(matches),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, engine: &StaySync) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "reading sync status...");
        let statuses = match &self.property {
            Some(id) => vec![engine.sync_status(id).await?],
            None => engine.sync_statuses().await?,
        };

        match self.output_format {
            OutputFormat::Json if self.property.is_some() => print_json(&statuses[0])?,
            OutputFormat::Json => print_json(&statuses)?,
            OutputFormat::Table if statuses.is_empty() => {
                println!("{}", "No properties registered".italic());
            }
            OutputFormat::Table => {
                let columns = [
                    StatusColumn::Property,
                    StatusColumn::State,
                    StatusColumn::LastSync,
                    StatusColumn::Reservations,
                    StatusColumn::LastError,
                ];
                print!("{}", Table::new(&columns, &statuses));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusColumn {
    Property,
    State,
    LastSync,
    Reservations,
    LastError,
}

impl Column<StatusView> for StatusColumn {
    fn name(&self) -> &'static str {
        match self {
            StatusColumn::Property => "Property",
            StatusColumn::State => "Status",
            StatusColumn::LastSync => "Last Sync",
            StatusColumn::Reservations => "Reservations",
            StatusColumn::LastError => "Last Error",
        }
    }

    fn format(&self, data: &StatusView) -> String {
        match self {
            StatusColumn::Property => data.property_id.clone(),
            StatusColumn::State => data.sync_status.to_string(),
            StatusColumn::LastSync => data
                .last_sync_at
                .map(|t| t.strftime("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "never".to_string()),
            StatusColumn::Reservations => data
                .reservations_count
                .map(|n| n.to_string())
                .unwrap_or_default(),
            StatusColumn::LastError => data.last_error.clone().unwrap_or_default(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            StatusColumn::Reservations => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }

    fn color(&self, data: &StatusView) -> Option<Color> {
        match self {
            StatusColumn::State => Some(state_color(data.sync_status)),
            StatusColumn::LastError => Some(Color::Red),
            _ => None,
        }
    }
}

fn state_color(state: SyncState) -> Color {
    match state {
        SyncState::Idle => Color::BrightBlack,
        SyncState::Syncing => Color::Yellow,
        SyncState::Success => Color::Green,
        SyncState::Error => Color::Red,
    }
}
