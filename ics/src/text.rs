// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Content-line handling as defined in RFC 5545 Section 3.1 and 3.3.11.

/// Joins folded physical lines back into logical content lines.
///
/// A physical line starting with a single space or horizontal tab continues
/// the previous logical line: that one whitespace character is removed and the
/// rest is appended. Blank lines are skipped. `\r\n`, `\n` and a lone `\r` are
/// all accepted as line breaks.
#[must_use]
pub fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for physical in text.split("\r\n").flat_map(|a| a.split(['\n', '\r'])) {
        let continuation = physical
            .strip_prefix(' ')
            .or_else(|| physical.strip_prefix('\t'));

        match (continuation, lines.last_mut()) {
            (Some(rest), Some(prev)) => prev.push_str(rest),
            _ if physical.is_empty() => {}
            _ => lines.push(physical.to_string()),
        }
    }
    lines
}

/// Decodes the backslash escapes of a TEXT value.
///
/// The order matters: `\\` is decoded last so that an already decoded
/// backslash is never read as the start of another escape.
#[must_use]
pub fn unescape(value: &str) -> String {
    value
        .replace("\\n", "\n")
        .replace("\\N", "\n")
        .replace("\\,", ",")
        .replace("\\;", ";")
        .replace("\\\\", "\\")
}

/// Splits a content line into its property name and raw value.
///
/// Parameters (`DTSTART;VALUE=DATE:...`) are discarded. The value starts after
/// the first colon that is not inside a quoted parameter value, so
/// `ATTENDEE;CN="Doe: John":mailto:...` splits correctly.
#[must_use]
pub fn split_property(line: &str) -> Option<(&str, &str)> {
    let mut quoted = false;
    let mut colon = None;
    for (i, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ':' if !quoted => {
                colon = Some(i);
                break;
            }
            _ => {}
        }
    }

    let colon = colon?;
    let (head, value) = (line.get(..colon)?, line.get(colon + 1..)?);
    let name = head.split(';').next().unwrap_or(head).trim();
    (!name.is_empty()).then_some((name, value))
}
