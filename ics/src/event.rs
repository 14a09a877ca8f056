// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::Date;

use crate::date::parse_date;
use crate::error::IcsError;
use crate::text::{split_property, unescape, unfold};

/// Number of characters of the raw block kept in [`IntermediateEvent::raw_excerpt`].
pub const EXCERPT_LEN: usize = 500;

const VEVENT_BEGIN: &str = "BEGIN:VEVENT";
const VEVENT_END: &str = "END:VEVENT";

/// Fields recovered from one VEVENT block, before any metadata extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntermediateEvent {
    /// The `UID` property, empty if the block has none.
    pub uid: String,

    /// The unescaped `SUMMARY` property.
    pub summary: String,

    /// The unfolded and unescaped `DESCRIPTION` property.
    pub description: String,

    /// First night of the stay.
    pub start: Date,

    /// Checkout day.
    pub end: Date,

    /// The first [`EXCERPT_LEN`] characters of the raw block, for debugging only.
    pub raw_excerpt: String,
}

/// Result of reading a whole calendar document.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    /// Events that were parsed successfully, in feed order.
    pub events: Vec<IntermediateEvent>,

    /// One entry per VEVENT block that was dropped.
    pub dropped: Vec<IcsError>,
}

impl ParsedFeed {
    /// Number of VEVENT blocks found in the document.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.events.len() + self.dropped.len()
    }
}

/// Reads every VEVENT block of a calendar document.
///
/// The text is split on `BEGIN:VEVENT`; each segment is parsed on its own and
/// a segment that fails is recorded in [`ParsedFeed::dropped`] instead of
/// failing the whole document.
#[must_use]
pub fn parse_calendar(text: &str) -> ParsedFeed {
    let mut feed = ParsedFeed::default();
    for block in text.split(VEVENT_BEGIN).skip(1) {
        match parse_event(block) {
            Ok(event) => feed.events.push(event),
            Err(e) => feed.dropped.push(e),
        }
    }
    feed
}

/// Parses the content of one VEVENT block (the text after `BEGIN:VEVENT`).
///
/// Lines are unfolded before any property is looked at, and `SUMMARY` /
/// `DESCRIPTION` are unescaped. Lines after `END:VEVENT` are ignored.
///
/// # Errors
///
/// Fails if `DTSTART` or `DTEND` is missing or not a valid date, or if the
/// event ends before it starts. No partial event is ever returned.
pub fn parse_event(block: &str) -> Result<IntermediateEvent, IcsError> {
    let mut uid = None;
    let mut summary = None;
    let mut description = None;
    let mut start = None;
    let mut end = None;

    for line in unfold(block) {
        if line.trim_end().eq_ignore_ascii_case(VEVENT_END) {
            break;
        }
        let Some((name, value)) = split_property(&line) else {
            continue;
        };

        match name.to_ascii_uppercase().as_str() {
            "UID" => set_once(&mut uid, || value.trim().to_string()),
            "SUMMARY" => set_once(&mut summary, || unescape(value)),
            "DESCRIPTION" => set_once(&mut description, || unescape(value)),
            "DTSTART" if start.is_none() => start = Some(parse_date(value)?),
            "DTEND" if end.is_none() => end = Some(parse_date(value)?),
            _ => {}
        }
    }

    let start = start.ok_or(IcsError::MissingField("DTSTART"))?;
    let end = end.ok_or(IcsError::MissingField("DTEND"))?;
    if end < start {
        return Err(IcsError::InvertedRange { start, end });
    }

    Ok(IntermediateEvent {
        uid: uid.unwrap_or_default(),
        summary: summary.unwrap_or_default(),
        description: description.unwrap_or_default(),
        start,
        end,
        raw_excerpt: excerpt(block),
    })
}

fn set_once(slot: &mut Option<String>, value: impl FnOnce() -> String) {
    if slot.is_none() {
        *slot = Some(value());
    }
}

fn excerpt(block: &str) -> String {
    let block = block.trim_start_matches(['\r', '\n']);
    block.chars().take(EXCERPT_LEN).collect()
}
