// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Turns a parsed feed into the reservation set of one property.
//!
//! Writing the set is a full replace done by
//! [`LocalDb::commit_sync`](crate::localdb::LocalDb::commit_sync).

use std::collections::HashSet;

use jiff::Timestamp;
use staysync_ics::ParsedFeed;

use crate::extract::{UID_CODE_PREFIX, extract};
use crate::reservation::Reservation;

/// Reservations derived from one feed, plus what was left out.
#[derive(Debug, Clone, Default)]
pub struct Reconciled {
    /// Rows to store, in feed order.
    pub reservations: Vec<Reservation>,

    /// VEVENT blocks the parser dropped.
    pub dropped_blocks: usize,

    /// Events whose booking code was already taken by an earlier event.
    pub duplicate_codes: usize,

    /// Parsed events without any booking code.
    pub without_code: usize,
}

/// Extracts metadata from every parsed event and builds the rows to store.
///
/// Invalid blocks are only counted, so a feed whose blocks are all broken
/// yields an empty set. The first event wins when several share a booking
/// code.
pub fn reconcile(property_id: &str, feed: ParsedFeed, now: Timestamp) -> Reconciled {
    for e in &feed.dropped {
        tracing::debug!(property_id, err = %e, "dropped VEVENT block");
    }

    let mut reconciled = Reconciled {
        dropped_blocks: feed.dropped.len(),
        ..Default::default()
    };
    let mut seen = HashSet::new();
    for event in feed.events {
        let metadata = extract(&event);
        if let Some(code) = &metadata.booking_code {
            if code.starts_with(UID_CODE_PREFIX) {
                tracing::debug!(property_id, code = %code, "no booking code found, using calendar UID");
            }
            if !seen.insert(code.clone()) {
                tracing::debug!(property_id, code = %code, uid = %event.uid, "duplicate booking code, event skipped");
                reconciled.duplicate_codes += 1;
                continue;
            }
        }

        match Reservation::from_event(property_id, event, metadata, now) {
            Some(reservation) => reconciled.reservations.push(reservation),
            None => reconciled.without_code += 1,
        }
    }

    tracing::debug!(
        property_id,
        count = reconciled.reservations.len(),
        dropped = reconciled.dropped_blocks,
        duplicates = reconciled.duplicate_codes,
        without_code = reconciled.without_code,
        "reconciled feed"
    );
    reconciled
}
