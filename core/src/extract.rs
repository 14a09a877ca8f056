// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Heuristic recovery of booking metadata from calendar free text.
//!
//! Every field is recovered by an ordered chain of patterns. The first match
//! that passes the field's plausibility check wins, so the order of the
//! tables below is the precedence downstream consumers rely on.

use std::sync::OnceLock;

use regex::Regex;
use staysync_ics::IntermediateEvent;

/// Booking metadata recovered from one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Platform confirmation code, or `UID:<uid>` when none is found.
    pub booking_code: Option<String>,

    /// Name of the guest.
    pub guest_name: Option<String>,

    /// Number of guests, within `1..=20`.
    pub guest_count: Option<u8>,
}

/// Prefix of the synthetic booking code built from the calendar UID.
pub const UID_CODE_PREFIX: &str = "UID:";

const MIN_NAME_LEN: usize = 3;
const MAX_NAME_LEN: usize = 80;
const MAX_GUESTS: u8 = 20;

/// Where a pattern is matched.
#[derive(Debug, Clone, Copy)]
enum Scope {
    /// Description followed by summary.
    Text,
    /// Summary only.
    Summary,
}

const GUEST_NAME_PATTERNS: &[(Scope, &str)] = &[
    (Scope::Text, r"(?im)\breserved\s+for\b\s*:?[ \t]*(.+)$"),
    (Scope::Text, r"(?im)\bguest(?:\s+name)?[ \t]*:[ \t]*(.+)$"),
    (Scope::Text, r"(?im)\br[ée]serv[ée]\s+pour\b\s*:?[ \t]*(.+)$"),
    // "Jane Doe - Booking.com"
    (Scope::Summary, r"^\s*([^\n\-–(]+?)\s+[-–]\s+\S"),
    // "Jane Doe (HM12345678)"
    (Scope::Summary, r"^\s*([^\n(]+?)\s*\("),
];

const GUEST_COUNT_PATTERNS: &[&str] = &[
    r"(?i)\b(\d{1,3})\s*guests?\b",
    r"(?i)\b(\d{1,3})\s*invit[ée]s?",
    r"(?i)\b(\d{1,3})\s*personnes?\b",
    r"(?i)\bguests?\s*:\s*(\d{1,3})\b",
];

/// Matched against the uppercased text.
const BOOKING_CODE_PATTERNS: &[&str] = &[
    r"/DETAILS/([A-Z0-9]{8,12})\b",
    r"\b(HM[A-Z0-9]{8,10})\b",
    r"\b(?:BOOKING|CONFIRMATION|RESERVATION|REF|ID)\b(?:\s*(?:CODE|NUMBER|NO\.?))?\s*[:#]?\s*([A-Z0-9]{8,12})\b",
];

/// Labels that the generic pattern picks up as codes when they are truncated
/// or follow another label.
const CODE_FALSE_POSITIVES: &[&str] = &[
    "RESERVATIO",
    "RESERVATION",
    "RESERVATIONS",
    "CONFIRMATIO",
    "CONFIRMATION",
    "CONFIRMED",
];

/// Words platforms put in the summary of blocks that are not guest names.
const NAME_FALSE_POSITIVES: &[&str] = &[
    "airbnb",
    "reserved",
    "not available",
    "blocked",
    "booking.com",
    "vrbo",
    "closed",
    "unavailable",
];

/// Runs all extractors over an event.
#[must_use]
pub fn extract(event: &IntermediateEvent) -> Metadata {
    Metadata {
        booking_code: extract_booking_code(&event.summary, &event.description, &event.uid),
        guest_name: extract_guest_name(&event.summary, &event.description),
        guest_count: extract_guest_count(&event.summary, &event.description),
    }
}

/// Recovers the guest name.
#[must_use]
pub fn extract_guest_name(summary: &str, description: &str) -> Option<String> {
    let text = format!("{description}\n{summary}");
    guest_name_regexes()
        .iter()
        .find_map(|(scope, re)| {
            let haystack = match scope {
                Scope::Text => text.as_str(),
                Scope::Summary => summary,
            };
            re.captures_iter(haystack)
                .filter_map(|caps| caps.get(1))
                .find_map(|m| plausible_name(m.as_str()))
        })
}

/// Recovers the number of guests.
#[must_use]
pub fn extract_guest_count(summary: &str, description: &str) -> Option<u8> {
    let text = format!("{description}\n{summary}");
    guest_count_regexes().iter().find_map(|re| {
        re.captures_iter(&text)
            .filter_map(|caps| caps.get(1))
            .find_map(|m| plausible_count(m.as_str()))
    })
}

/// Recovers the booking code, falling back to `UID:<uid>`.
///
/// Returns `None` only when no pattern matches and the event has no UID.
#[must_use]
pub fn extract_booking_code(summary: &str, description: &str, uid: &str) -> Option<String> {
    let text = format!("{description} {summary}").to_uppercase();
    let found = booking_code_regexes().iter().find_map(|re| {
        re.captures_iter(&text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .find(|code| !CODE_FALSE_POSITIVES.contains(code))
            .map(str::to_string)
    });

    match found {
        Some(code) => Some(code),
        None => {
            let uid = uid.trim();
            (!uid.is_empty()).then(|| format!("{UID_CODE_PREFIX}{uid}"))
        }
    }
}

fn plausible_name(raw: &str) -> Option<String> {
    const STOPS: &[&str] = &[" - ", " – ", "(", ",", ";", "|", "\t"];
    let cut = STOPS
        .iter()
        .filter_map(|stop| raw.find(stop))
        .min()
        .unwrap_or(raw.len());

    let name = raw
        .get(..cut)
        .unwrap_or(raw)
        .trim()
        .trim_end_matches([':', '.', '-'])
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let len = name.chars().count();
    let plausible = (MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len)
        && name.chars().any(char::is_alphabetic)
        && !name.chars().any(|c| c.is_ascii_digit())
        && !NAME_FALSE_POSITIVES.contains(&name.to_lowercase().as_str());
    plausible.then_some(name)
}

fn plausible_count(raw: &str) -> Option<u8> {
    raw.parse::<u8>()
        .ok()
        .filter(|n| (1..=MAX_GUESTS).contains(n))
}

fn guest_name_regexes() -> &'static [(Scope, Regex)] {
    static REGEX: OnceLock<Vec<(Scope, Regex)>> = OnceLock::new();
    REGEX.get_or_init(|| {
        GUEST_NAME_PATTERNS
            .iter()
            .map(|(scope, re)| (*scope, Regex::new(re).unwrap()))
            .collect()
    })
}

fn guest_count_regexes() -> &'static [Regex] {
    static REGEX: OnceLock<Vec<Regex>> = OnceLock::new();
    REGEX.get_or_init(|| compile(GUEST_COUNT_PATTERNS))
}

fn booking_code_regexes() -> &'static [Regex] {
    static REGEX: OnceLock<Vec<Regex>> = OnceLock::new();
    REGEX.get_or_init(|| compile(BOOKING_CODE_PATTERNS))
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|re| Regex::new(re).unwrap()).collect()
}
