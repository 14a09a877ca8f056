// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use jiff::Timestamp;
use serde::Serialize;
use staysync_feed::{FeedClient, FeedUrl};
use staysync_ics::parse_calendar;
use tokio::fs;

use crate::datetime;
use crate::localdb::LocalDb;
use crate::reconcile::reconcile;
use crate::resolver::{self, BookingWindow, ResolveError};
use crate::{
    Config, Error, Property, Reservation, StalenessPolicy, SyncDecision, SyncState, SyncStatus,
};

/// Calendar sync engine.
#[derive(Debug, Clone)]
pub struct StaySync {
    pinned_now: Option<Timestamp>,
    config: Config,
    policy: StalenessPolicy,
    db: LocalDb,
    feed: FeedClient,
}

/// What a call to [`StaySync::sync_property`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The reservation set was replaced.
    Synced {
        /// Rows stored.
        count: usize,
        /// VEVENT blocks that could not be parsed.
        dropped: usize,

        /// Events skipped because an earlier event had the same booking code.
        duplicates: usize,
    },

    /// Nothing was fetched because the policy said no sync was needed.
    Skipped(SyncDecision),
}

/// Response to a sync trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservations_count: Option<u32>,
    pub message: String,
}

/// Public view of a property's sync status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub property_id: String,
    pub sync_status: SyncState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservations_count: Option<u32>,
}

impl StatusView {
    fn new(property_id: &str, status: Option<SyncStatus>) -> Self {
        match status {
            Some(s) => Self {
                property_id: s.property_id,
                sync_status: s.state,
                last_sync_at: s.last_sync_at,
                last_error: s.last_error,
                reservations_count: s.reservation_count,
            },
            None => Self {
                property_id: property_id.to_string(),
                sync_status: SyncState::Idle,
                last_sync_at: None,
                last_error: None,
                reservations_count: None,
            },
        }
    }
}

impl StaySync {
    /// Creates a new instance with the given configuration.
    ///
    /// Opens the store and registers the configured properties.
    pub async fn new(mut config: Config) -> Result<Self, Error> {
        config.normalize()?;
        prepare(&config).await?;

        let db = LocalDb::open(config.db_path().as_deref()).await?;
        for property in &config.properties {
            tracing::debug!(property_id = %property.id, "registering property");
            db.properties.upsert(property).await?;
        }

        let feed = FeedClient::new(&config.feed).map_err(|e| Error::Config(e.to_string()))?;
        let policy = config.staleness_policy();
        Ok(Self {
            pinned_now: None,
            config,
            policy,
            db,
            feed,
        })
    }

    /// The current time of this instance, read from the clock unless pinned.
    pub fn now(&self) -> Timestamp {
        self.pinned_now.unwrap_or_else(datetime::now)
    }

    /// Pins the current time.
    pub fn set_now(&mut self, now: Timestamp) {
        self.pinned_now = Some(now);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers or updates a property.
    pub async fn register_property(&self, property: &Property) -> Result<(), Error> {
        validate_property_id(&property.id)?;
        FeedUrl::parse(&property.ics_url).map_err(|e| Error::Validation(e.to_string()))?;
        self.db.properties.upsert(property).await?;
        Ok(())
    }

    pub async fn properties(&self) -> Result<Vec<Property>, Error> {
        Ok(self.db.properties.list().await?)
    }

    /// Applies the staleness policy to a property.
    pub async fn is_sync_needed(&self, property_id: &str) -> Result<SyncDecision, Error> {
        validate_property_id(property_id)?;
        let status = self.db.sync_status.get(property_id).await?;
        Ok(self.policy.decide(status.as_ref(), self.now()))
    }

    /// Fetches, parses and reconciles the feed of one property.
    ///
    /// Without `force`, the staleness policy is consulted before any network
    /// I/O. Any failure after the property entered `syncing` is recorded as
    /// `error` and leaves the stored reservations untouched, unless another
    /// attempt took the property over, in which case nothing is written.
    #[tracing::instrument(skip(self))]
    pub async fn sync_property(&self, property_id: &str, force: bool) -> Result<SyncOutcome, Error> {
        validate_property_id(property_id)?;
        let property = self
            .db
            .properties
            .get(property_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Property {property_id}")))?;

        if force {
            tracing::debug!(reason = SyncDecision::Forced.reason(), "sync requested");
        } else {
            let decision = self.is_sync_needed(property_id).await?;
            if !decision.is_needed() {
                tracing::debug!(reason = decision.reason(), "sync skipped");
                return Ok(SyncOutcome::Skipped(decision));
            }
            tracing::debug!(reason = decision.reason(), "sync needed");
        }

        let started_at = self.now();
        let lease_cutoff = self.policy.lease_cutoff(started_at);
        if !self
            .db
            .sync_status
            .begin(property_id, started_at, lease_cutoff)
            .await?
        {
            return Err(Error::AlreadySyncing(property_id.to_string()));
        }
        tracing::info!("sync started");

        match self.run_sync(&property, started_at).await {
            Ok(outcome) => Ok(outcome),
            Err(e @ Error::LeaseLost(_)) => {
                tracing::warn!(err = %e, "sync discarded");
                Err(e)
            }
            Err(e) => {
                tracing::warn!(err = %e, "sync failed");
                match self
                    .db
                    .sync_status
                    .fail(property_id, started_at, &e.to_string())
                    .await
                {
                    Ok(true) => {}
                    Ok(false) => tracing::debug!("sync taken over, failure not recorded"),
                    Err(db_err) => tracing::error!(err = %db_err, "failed to record sync failure"),
                }
                Err(e)
            }
        }
    }

    async fn run_sync(
        &self,
        property: &Property,
        started_at: Timestamp,
    ) -> Result<SyncOutcome, Error> {
        let url =
            FeedUrl::parse(&property.ics_url).map_err(|e| Error::Validation(e.to_string()))?;
        let text = self.feed.fetch(&url).await?;

        let feed = parse_calendar(&text);
        tracing::debug!(blocks = feed.block_count(), "parsed calendar");
        let reconciled = reconcile(&property.id, feed, started_at);

        let count = self
            .db
            .commit_sync(&property.id, started_at, &reconciled.reservations, started_at)
            .await?;
        Ok(SyncOutcome::Synced {
            count,
            dropped: reconciled.dropped_blocks,
            duplicates: reconciled.duplicate_codes,
        })
    }

    /// Triggers a sync and reports it in the response shape used by callers.
    pub async fn trigger_sync(&self, property_id: &str, force: bool) -> SyncResponse {
        match self.sync_property(property_id, force).await {
            Ok(SyncOutcome::Synced {
                count,
                dropped,
                duplicates,
            }) => SyncResponse {
                success: true,
                reservations_count: Some(u32::try_from(count).unwrap_or(u32::MAX)),
                message: match (dropped, duplicates) {
                    (0, 0) => format!("Synced {count} reservations"),
                    (n, 0) => format!("Synced {count} reservations, skipped {n} invalid events"),
                    (0, d) => {
                        format!("Synced {count} reservations, skipped {d} duplicate booking codes")
                    }
                    (n, d) => format!(
                        "Synced {count} reservations, skipped {n} invalid events and {d} duplicate booking codes"
                    ),
                },
            },
            Ok(SyncOutcome::Skipped(decision)) => {
                let count = match self.db.sync_status.get(property_id).await {
                    Ok(status) => status.and_then(|s| s.reservation_count),
                    Err(e) => {
                        tracing::warn!(err = %e, "failed to read sync status");
                        None
                    }
                };
                SyncResponse {
                    success: true,
                    reservations_count: Some(count.unwrap_or(0)),
                    message: format!("Sync not needed: {}", decision.reason()),
                }
            }
            Err(e) => SyncResponse {
                success: false,
                reservations_count: None,
                message: e.to_string(),
            },
        }
    }

    /// The status of a property; `idle` if it was never synced.
    pub async fn sync_status(&self, property_id: &str) -> Result<StatusView, Error> {
        validate_property_id(property_id)?;
        if self.db.properties.get(property_id).await?.is_none() {
            return Err(Error::NotFound(format!("Property {property_id}")));
        }
        let status = self.db.sync_status.get(property_id).await?;
        Ok(StatusView::new(property_id, status))
    }

    /// Statuses of every registered property.
    pub async fn sync_statuses(&self) -> Result<Vec<StatusView>, Error> {
        let mut statuses: HashMap<String, SyncStatus> = self
            .db
            .sync_status
            .list()
            .await?
            .into_iter()
            .map(|s| (s.property_id.clone(), s))
            .collect();

        let properties = self.db.properties.list().await?;
        Ok(properties
            .iter()
            .map(|p| StatusView::new(&p.id, statuses.remove(&p.id)))
            .collect())
    }

    /// Stored reservations of a property, by check-in date.
    pub async fn reservations(&self, property_id: &str) -> Result<Vec<Reservation>, Error> {
        validate_property_id(property_id)?;
        if self.db.properties.get(property_id).await?.is_none() {
            return Err(Error::NotFound(format!("Property {property_id}")));
        }
        Ok(self.db.reservations.list(property_id).await?)
    }

    /// Resolves a guest's booking window from a verification token and a booking code.
    pub async fn resolve_booking(
        &self,
        token: &str,
        code: &str,
    ) -> Result<BookingWindow, ResolveError> {
        resolver::resolve(&self.db, token, code, self.now()).await
    }

    /// Close the instance and the database.
    pub async fn close(self) -> Result<(), Error> {
        self.db.close().await
    }
}

fn validate_property_id(property_id: &str) -> Result<(), Error> {
    if property_id.trim().is_empty() {
        return Err(Error::Validation("property id must not be empty".to_string()));
    }
    Ok(())
}

async fn prepare(config: &Config) -> Result<(), Error> {
    if let Some(parent) = &config.state_dir {
        tracing::debug!(path = %parent.display(), "ensuring state directory exists");
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::Config(format!("Failed to create state directory: {e}")))?;
    }
    Ok(())
}
