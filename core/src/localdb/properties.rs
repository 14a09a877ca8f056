// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use sqlx::SqlitePool;

use crate::Property;

#[derive(Debug, Clone)]
pub struct Properties {
    pool: SqlitePool,
}

impl Properties {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, property: &Property) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO properties (id, name, ics_url)
VALUES (?, ?, ?)
ON CONFLICT(id) DO UPDATE SET
    name    = excluded.name,
    ics_url = excluded.ics_url;
";

        sqlx::query(SQL)
            .bind(&property.id)
            .bind(&property.name)
            .bind(&property.ics_url)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Property>, sqlx::Error> {
        const SQL: &str = "SELECT id, name, ics_url FROM properties WHERE id = ?;";

        sqlx::query_as(SQL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn list(&self) -> Result<Vec<Property>, sqlx::Error> {
        const SQL: &str = "SELECT id, name, ics_url FROM properties ORDER BY id ASC;";

        sqlx::query_as(SQL).fetch_all(&self.pool).await
    }
}
