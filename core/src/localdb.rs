// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

mod properties;
mod reservations;
mod sync_status;
mod tokens;


use std::path::Path;

use jiff::Timestamp;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub use crate::localdb::properties::Properties;
pub use crate::localdb::reservations::Reservations;
pub use crate::localdb::sync_status::SyncStatuses;
pub use crate::localdb::tokens::Tokens;
use crate::{Error, Reservation};

#[derive(Debug, Clone)]
pub struct LocalDb {
    pool: SqlitePool,

    pub properties: Properties,
    pub reservations: Reservations,
    pub sync_status: SyncStatuses,
    pub tokens: Tokens,
}

impl LocalDb {
    /// Opens a sqlite database connection.
    /// If `filename` is `None`, it opens an in-memory database.
    pub async fn open(filename: Option<&Path>) -> Result<Self, Error> {
        let (options, pool_options) = if let Some(filename) = filename {
            tracing::info!(path = %filename.display(), "connecting to SQLite database");
            let options = SqliteConnectOptions::new()
                .filename(filename)
                .create_if_missing(true);
            (options, SqlitePoolOptions::new())
        } else {
            tracing::info!("connecting to in-memory SQLite database");
            // every connection would otherwise get its own empty database
            let pool_options = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            (SqliteConnectOptions::new().in_memory(true), pool_options)
        };

        let pool = pool_options
            .connect_with(options.foreign_keys(true))
            .await?;

        sqlx::migrate!("src/localdb/migrations") // relative path from the crate root
            .run(&pool)
            .await?;

        tracing::debug!("ensuring tables in the database");
        Ok(LocalDb {
            properties: Properties::new(pool.clone()),
            reservations: Reservations::new(pool.clone()),
            sync_status: SyncStatuses::new(pool.clone()),
            tokens: Tokens::new(pool.clone()),
            pool,
        })
    }

    /// Replaces the reservation set of a property and marks the sync that
    /// began at `started_at` as successful, both in one transaction.
    ///
    /// Nothing is changed if any statement fails, or if another attempt took
    /// the `syncing` state over in the meantime.
    pub async fn commit_sync(
        &self,
        property_id: &str,
        started_at: Timestamp,
        reservations: &[Reservation],
        now: Timestamp,
    ) -> Result<usize, Error> {
        let mut tx = self.pool.begin().await?;
        let count = Reservations::replace_in(&mut tx, property_id, reservations).await?;
        if !SyncStatuses::succeed_in(&mut tx, property_id, started_at, now, count).await? {
            tx.rollback().await?;
            return Err(Error::LeaseLost(property_id.to_string()));
        }
        tx.commit().await?;

        tracing::info!(property_id, count, "replaced reservations");
        Ok(count)
    }

    pub async fn close(self) -> Result<(), Error> {
        tracing::debug!("closing database connection");
        self.pool.close().await;
        Ok(())
    }
}
