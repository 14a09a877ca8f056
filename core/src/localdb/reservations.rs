// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use sqlx::{SqliteConnection, SqlitePool};

use crate::Reservation;
use crate::datetime::{format_date, format_timestamp, parse_date, parse_timestamp};

const COLUMNS: &str = "\
id, property_id, booking_code, summary, start_date, end_date, guest_name, guest_count, \
description, raw_event_excerpt, synced_at";

#[derive(Debug, Clone)]
pub struct Reservations {
    pool: SqlitePool,
}

impl Reservations {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Deletes every reservation of the property, then inserts `reservations`.
    ///
    /// Callers own the transaction, see [`LocalDb::commit_sync`](super::LocalDb::commit_sync).
    pub async fn replace_in(
        conn: &mut SqliteConnection,
        property_id: &str,
        reservations: &[Reservation],
    ) -> Result<usize, sqlx::Error> {
        const DELETE: &str = "DELETE FROM reservations WHERE property_id = ?;";
        let deleted = sqlx::query(DELETE)
            .bind(property_id)
            .execute(&mut *conn)
            .await?
            .rows_affected();
        tracing::debug!(property_id, deleted, "deleted previous reservations");

        let insert = format!(
            "INSERT INTO reservations ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);"
        );
        for reservation in reservations {
            let record = ReservationRecord::from(reservation);
            sqlx::query(&insert)
                .bind(&record.id)
                .bind(property_id)
                .bind(&record.booking_code)
                .bind(&record.summary)
                .bind(&record.start_date)
                .bind(&record.end_date)
                .bind(&record.guest_name)
                .bind(record.guest_count)
                .bind(&record.description)
                .bind(&record.raw_event_excerpt)
                .bind(&record.synced_at)
                .execute(&mut *conn)
                .await?;
        }

        Ok(reservations.len())
    }

    /// Lists the reservations of a property by check-in date.
    pub async fn list(&self, property_id: &str) -> Result<Vec<Reservation>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM reservations WHERE property_id = ? \
             ORDER BY start_date ASC, booking_code ASC;"
        );

        let records: Vec<ReservationRecord> = sqlx::query_as(&sql)
            .bind(property_id)
            .fetch_all(&self.pool)
            .await?;
        records.into_iter().map(Reservation::try_from).collect()
    }

    /// Finds a reservation by booking code, ignoring case.
    pub async fn find_by_code(
        &self,
        property_id: &str,
        booking_code: &str,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM reservations \
             WHERE property_id = ? AND UPPER(booking_code) = UPPER(?) LIMIT 1;"
        );

        let record: Option<ReservationRecord> = sqlx::query_as(&sql)
            .bind(property_id)
            .bind(booking_code)
            .fetch_optional(&self.pool)
            .await?;
        record.map(Reservation::try_from).transpose()
    }

    pub async fn count(&self, property_id: &str) -> Result<i64, sqlx::Error> {
        const SQL: &str = "SELECT COUNT(*) FROM reservations WHERE property_id = ?;";

        let row: (i64,) = sqlx::query_as(SQL)
            .bind(property_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReservationRecord {
    id: String,
    property_id: String,
    booking_code: String,
    summary: String,
    start_date: String,
    end_date: String,
    guest_name: Option<String>,
    guest_count: Option<i64>,
    description: String,
    raw_event_excerpt: String,
    synced_at: String,
}

impl From<&Reservation> for ReservationRecord {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id.clone(),
            property_id: r.property_id.clone(),
            booking_code: r.booking_code.clone(),
            summary: r.summary.clone(),
            start_date: format_date(r.start_date),
            end_date: format_date(r.end_date),
            guest_name: r.guest_name.clone(),
            guest_count: r.guest_count.map(i64::from),
            description: r.description.clone(),
            raw_event_excerpt: r.raw_event_excerpt.clone(),
            synced_at: format_timestamp(r.synced_at),
        }
    }
}

impl TryFrom<ReservationRecord> for Reservation {
    type Error = sqlx::Error;

    fn try_from(r: ReservationRecord) -> Result<Self, Self::Error> {
        let decode = |e: jiff::Error| sqlx::Error::Decode(e.into());
        Ok(Self {
            start_date: parse_date(&r.start_date).map_err(decode)?,
            end_date: parse_date(&r.end_date).map_err(decode)?,
            synced_at: parse_timestamp(&r.synced_at).map_err(decode)?,
            guest_count: r.guest_count.and_then(|n| u8::try_from(n).ok()),
            id: r.id,
            property_id: r.property_id,
            booking_code: r.booking_code,
            summary: r.summary,
            guest_name: r.guest_name,
            description: r.description,
            raw_event_excerpt: r.raw_event_excerpt,
        })
    }
}
