// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::Timestamp;
use jiff::civil::Date;

/// NOTE: Used for storing in the database, so it should be stable across different runs.
pub const STABLE_FORMAT_DATEONLY: &str = "%Y-%m-%d";
/// Second precision and a literal `Z`, so stored values sort chronologically as text.
pub const STABLE_FORMAT_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn format_date(date: Date) -> String {
    date.strftime(STABLE_FORMAT_DATEONLY).to_string()
}

pub fn parse_date(s: &str) -> Result<Date, jiff::Error> {
    Date::strptime(STABLE_FORMAT_DATEONLY, s)
}

pub fn format_timestamp(ts: Timestamp) -> String {
    ts.strftime(STABLE_FORMAT_TIMESTAMP).to_string()
}

pub fn parse_timestamp(s: &str) -> Result<Timestamp, jiff::Error> {
    s.parse()
}

/// The current time, truncated to the precision timestamps are stored with.
pub fn now() -> Timestamp {
    let now = Timestamp::now();
    Timestamp::from_second(now.as_second()).unwrap_or(now)
}
