// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::Date;

use crate::error::IcsError;

/// Parses a `DTSTART`/`DTEND` value into a calendar date.
///
/// Accepts the `DATE` form (`20250115`) booking feeds use, and keeps the date
/// part of a `DATE-TIME` value (`20250115T150000Z`). Month must be 1-12 and
/// day 1-31; days that do not exist in the given month (`20240230`) are
/// rejected as well.
///
/// # Errors
///
/// Returns [`IcsError::InvalidDate`] if the value is not a valid date.
pub fn parse_date(value: &str) -> Result<Date, IcsError> {
    let value = value.trim();
    let digits = value.split_once('T').map_or(value, |(date, _)| date);

    let invalid = |reason| IcsError::InvalidDate {
        value: value.to_string(),
        reason,
    };

    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expected 8 digits (YYYYMMDD)"));
    }

    let field = |range: std::ops::Range<usize>| -> Result<i16, IcsError> {
        digits
            .get(range)
            .and_then(|a| a.parse().ok())
            .ok_or_else(|| invalid("expected 8 digits (YYYYMMDD)"))
    };
    let (year, month, day) = (field(0..4)?, field(4..6)?, field(6..8)?);

    if !(1..=12).contains(&month) {
        return Err(invalid("month out of range"));
    }
    if !(1..=31).contains(&day) {
        return Err(invalid("day out of range"));
    }

    let month = i8::try_from(month).map_err(|_| invalid("month out of range"))?;
    let day = i8::try_from(day).map_err(|_| invalid("day out of range"))?;
    Date::new(year, month, day).map_err(|_| invalid("day does not exist in month"))
}
