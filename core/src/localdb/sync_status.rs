// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::Timestamp;
use sqlx::{SqliteConnection, SqlitePool};

use crate::datetime::{format_timestamp, parse_timestamp};
use crate::{SyncState, SyncStatus};

#[derive(Debug, Clone)]
pub struct SyncStatuses {
    pool: SqlitePool,
}

impl SyncStatuses {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, property_id: &str) -> Result<Option<SyncStatus>, sqlx::Error> {
        const SQL: &str = "\
SELECT property_id, state, last_sync_at, last_error, reservation_count, started_at
FROM sync_status
WHERE property_id = ?;
";

        let record: Option<SyncStatusRecord> = sqlx::query_as(SQL)
            .bind(property_id)
            .fetch_optional(&self.pool)
            .await?;
        record.map(SyncStatus::try_from).transpose()
    }

    pub async fn list(&self) -> Result<Vec<SyncStatus>, sqlx::Error> {
        const SQL: &str = "\
SELECT property_id, state, last_sync_at, last_error, reservation_count, started_at
FROM sync_status
ORDER BY property_id ASC;
";

        let records: Vec<SyncStatusRecord> = sqlx::query_as(SQL).fetch_all(&self.pool).await?;
        records.into_iter().map(SyncStatus::try_from).collect()
    }

    /// Moves the property to `syncing` and clears the last error.
    ///
    /// The transition is a single conditional statement: it only applies when
    /// no other attempt holds the state, or when that attempt started before
    /// `lease_cutoff`. Returns `false` if another attempt holds it.
    pub async fn begin(
        &self,
        property_id: &str,
        now: Timestamp,
        lease_cutoff: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        const SQL: &str = "\
INSERT INTO sync_status (property_id, state, last_error, started_at)
VALUES (?, 'syncing', NULL, ?)
ON CONFLICT(property_id) DO UPDATE SET
    state      = 'syncing',
    last_error = NULL,
    started_at = excluded.started_at
WHERE sync_status.state <> 'syncing'
   OR sync_status.started_at IS NULL
   OR sync_status.started_at < ?;
";

        let result = sqlx::query(SQL)
            .bind(property_id)
            .bind(format_timestamp(now))
            .bind(format_timestamp(lease_cutoff))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Records a successful sync. Callers own the transaction.
    ///
    /// Only the attempt that entered `syncing` at `started_at` may finish it.
    /// Returns `false` if the state was taken over in between.
    pub async fn succeed_in(
        conn: &mut SqliteConnection,
        property_id: &str,
        started_at: Timestamp,
        now: Timestamp,
        count: usize,
    ) -> Result<bool, sqlx::Error> {
        const SQL: &str = "\
UPDATE sync_status SET
    state             = 'success',
    last_sync_at      = ?,
    last_error        = NULL,
    reservation_count = ?,
    started_at        = NULL
WHERE property_id = ? AND state = 'syncing' AND started_at = ?;
";

        let result = sqlx::query(SQL)
            .bind(format_timestamp(now))
            .bind(i64::try_from(count).unwrap_or(i64::MAX))
            .bind(property_id)
            .bind(format_timestamp(started_at))
            .execute(conn)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Records a failed sync. The reservation count of the last success is kept.
    ///
    /// Like [`SyncStatuses::succeed_in`], it is a no-op returning `false` when
    /// the attempt started at `started_at` no longer holds the state.
    pub async fn fail(
        &self,
        property_id: &str,
        started_at: Timestamp,
        message: &str,
    ) -> Result<bool, sqlx::Error> {
        const SQL: &str = "\
UPDATE sync_status SET
    state      = 'error',
    last_error = ?,
    started_at = NULL
WHERE property_id = ? AND state = 'syncing' AND started_at = ?;
";

        let result = sqlx::query(SQL)
            .bind(message)
            .bind(property_id)
            .bind(format_timestamp(started_at))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SyncStatusRecord {
    property_id: String,
    state: String,
    last_sync_at: Option<String>,
    last_error: Option<String>,
    reservation_count: Option<i64>,
    started_at: Option<String>,
}

impl TryFrom<SyncStatusRecord> for SyncStatus {
    type Error = sqlx::Error;

    fn try_from(r: SyncStatusRecord) -> Result<Self, Self::Error> {
        let state: SyncState = r
            .state
            .parse()
            .map_err(|e: strum::ParseError| sqlx::Error::Decode(e.into()))?;
        let timestamp = |s: Option<String>| {
            s.as_deref()
                .map(parse_timestamp)
                .transpose()
                .map_err(|e| sqlx::Error::Decode(e.into()))
        };

        Ok(Self {
            property_id: r.property_id,
            state,
            last_sync_at: timestamp(r.last_sync_at)?,
            last_error: r.last_error,
            reservation_count: r.reservation_count.and_then(|n| u32::try_from(n).ok()),
            started_at: timestamp(r.started_at)?,
        })
    }
}
