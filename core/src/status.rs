// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Per-property sync state machine and the staleness policy built on it.
//!
//! ```text
//! idle ──▶ syncing ──▶ success ─┐
//!            ▲    └──▶ error ───┤
//!            └──────────────────┘
//! ```

use jiff::{SignedDuration, Timestamp};

/// State of the last sync attempt of a property.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    serde::Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    /// Never synced.
    #[default]
    Idle,

    /// A sync holds the property.
    Syncing,

    /// The last sync replaced the reservation set.
    Success,

    /// The last sync failed; the previous reservation set is still in place.
    Error,
}

/// Persisted sync status of one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    /// The property this row belongs to.
    pub property_id: String,

    /// Current state.
    pub state: SyncState,

    /// When the last successful sync finished.
    pub last_sync_at: Option<Timestamp>,

    /// Message of the last failure, cleared when a new attempt starts.
    pub last_error: Option<String>,

    /// Number of reservations stored by the last successful sync.
    pub reservation_count: Option<u32>,

    /// When the current (or last) attempt took the `syncing` state.
    pub started_at: Option<Timestamp>,
}

/// Why a sync is, or is not, needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    /// The property has never been synced.
    FirstSync,

    /// The last attempt failed.
    Retry,

    /// Another attempt is running.
    InFlight,

    /// A `syncing` row outlived the lease; its owner is assumed dead.
    Abandoned,

    /// The last successful sync is within the freshness window.
    Fresh,

    /// The last successful sync is older than the freshness window.
    Stale,

    /// The caller asked to sync regardless of the status.
    Forced,
}

impl SyncDecision {
    /// Whether a new sync should run.
    #[must_use]
    pub fn is_needed(self) -> bool {
        !matches!(self, Self::InFlight | Self::Fresh)
    }

    /// Short human readable reason.
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::FirstSync => "first sync",
            Self::Retry => "retrying after error",
            Self::InFlight => "sync already in progress",
            Self::Abandoned => "previous sync abandoned",
            Self::Fresh => "recently synced",
            Self::Stale => "stale",
            Self::Forced => "forced",
        }
    }
}

/// Decides whether a property needs syncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessPolicy {
    /// Maximum age of a successful sync.
    pub freshness: SignedDuration,

    /// How long a `syncing` state is honoured before it is considered abandoned.
    pub lease: SignedDuration,
}

impl StalenessPolicy {
    /// Default freshness window: 6 hours.
    pub const DEFAULT_FRESHNESS: SignedDuration = SignedDuration::from_hours(6);

    /// Default lease of the `syncing` state: 10 minutes.
    pub const DEFAULT_LEASE: SignedDuration = SignedDuration::from_mins(10);

    /// Applies the policy to the stored status, `None` meaning no row exists yet.
    #[must_use]
    pub fn decide(&self, status: Option<&SyncStatus>, now: Timestamp) -> SyncDecision {
        let Some(status) = status else {
            return SyncDecision::FirstSync;
        };

        match status.state {
            SyncState::Idle => SyncDecision::FirstSync,
            SyncState::Error => SyncDecision::Retry,
            SyncState::Syncing => match status.started_at {
                Some(started) if now.duration_since(started) > self.lease => {
                    SyncDecision::Abandoned
                }
                _ => SyncDecision::InFlight,
            },
            SyncState::Success => match status.last_sync_at {
                Some(last) if now.duration_since(last) <= self.freshness => SyncDecision::Fresh,
                _ => SyncDecision::Stale,
            },
        }
    }

    /// The `started_at` value below which a `syncing` row may be taken over.
    #[must_use]
    pub fn lease_cutoff(&self, now: Timestamp) -> Timestamp {
        now.checked_sub(self.lease).unwrap_or(Timestamp::MIN)
    }
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self {
            freshness: Self::DEFAULT_FRESHNESS,
            lease: Self::DEFAULT_LEASE,
        }
    }
}
