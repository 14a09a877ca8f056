// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Lenient reader for the VEVENT blocks found in booking calendar exports.
//!
//! Rental platforms publish one all-day VEVENT per booking. This crate only
//! recovers what those feeds carry (UID, SUMMARY, DESCRIPTION, DTSTART,
//! DTEND) and drops a block as soon as its dates are unusable, so that one
//! corrupt entry never poisons the rest of a feed.
//!
//! ```
//! let feed = staysync_ics::parse_calendar(
//!     "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:abc\r\nDTSTART;VALUE=DATE:20250115\r\n\
//!      DTEND;VALUE=DATE:20250120\r\nSUMMARY:Reserved\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n",
//! );
//! assert_eq!(feed.events.len(), 1);
//! assert_eq!(feed.events[0].start.to_string(), "2025-01-15");
//! ```

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]

mod date;
mod error;
mod event;
mod text;

pub use crate::date::parse_date;
pub use crate::error::IcsError;
pub use crate::event::{EXCERPT_LEN, IntermediateEvent, ParsedFeed, parse_calendar, parse_event};
pub use crate::text::{split_property, unescape, unfold};
