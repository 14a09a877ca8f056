// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::Date;

/// Reasons a VEVENT block is rejected.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IcsError {
    /// A property required to build an event is absent.
    #[error("missing {0} property")]
    MissingField(&'static str),

    /// A `DTSTART`/`DTEND` value is not a valid calendar date.
    #[error("invalid date `{value}`: {reason}")]
    InvalidDate {
        /// The raw property value.
        value: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The event ends before it starts.
    #[error("event ends on {end} before it starts on {start}")]
    InvertedRange {
        /// Parsed start date.
        start: Date,
        /// Parsed end date.
        end: Date,
    },
}
