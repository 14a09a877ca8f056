// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use staysync_ics::IntermediateEvent;

use crate::extract::Metadata;

/// A rental property whose calendar feed is mirrored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Property {
    /// Identifier shared with the booking backend.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Export URL of the property's calendar.
    pub ics_url: String,
}

/// One stay, as reconciled from the calendar feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Row identifier; regenerated on every sync.
    pub id: String,
    pub property_id: String,
    pub booking_code: String,
    pub summary: String,
    pub start_date: Date,
    pub end_date: Date,
    pub guest_name: Option<String>,
    pub guest_count: Option<u8>,
    pub description: String,
    pub raw_event_excerpt: String,
    pub synced_at: Timestamp,
}

impl Reservation {
    /// Builds a reservation row from a parsed event and its metadata.
    ///
    /// Returns `None` when no booking code could be recovered.
    #[must_use]
    pub fn from_event(
        property_id: &str,
        event: IntermediateEvent,
        metadata: Metadata,
        synced_at: Timestamp,
    ) -> Option<Self> {
        let booking_code = metadata.booking_code?;
        Some(Self {
            id: uuid::Uuid::new_v4().to_string(),
            property_id: property_id.to_string(),
            booking_code,
            summary: event.summary,
            start_date: event.start,
            end_date: event.end,
            guest_name: metadata.guest_name,
            guest_count: metadata.guest_count,
            description: event.description,
            raw_event_excerpt: event.raw_excerpt,
            synced_at,
        })
    }

    /// Number of nights of the stay.
    #[must_use]
    pub fn nights(&self) -> i32 {
        (self.end_date - self.start_date).get_days()
    }
}
