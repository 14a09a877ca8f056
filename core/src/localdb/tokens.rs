// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use sqlx::SqlitePool;

use crate::VerificationToken;
use crate::datetime::{format_timestamp, parse_timestamp};

/// Guest verification tokens. Issued elsewhere; this side only reads them.
#[derive(Debug, Clone)]
pub struct Tokens {
    pool: SqlitePool,
}

impl Tokens {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, token: &str) -> Result<Option<VerificationToken>, sqlx::Error> {
        const SQL: &str = "\
SELECT token, property_id, expires_at, is_active, access_code_hash
FROM verification_tokens
WHERE token = ?;
";

        let record: Option<TokenRecord> = sqlx::query_as(SQL)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        record.map(VerificationToken::try_from).transpose()
    }

    /// Stores a token the way the issuing service does.
    pub async fn insert(&self, token: &VerificationToken) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO verification_tokens (token, property_id, expires_at, is_active, access_code_hash)
VALUES (?, ?, ?, ?, ?);
";

        sqlx::query(SQL)
            .bind(&token.token)
            .bind(&token.property_id)
            .bind(token.expires_at.map(format_timestamp))
            .bind(token.is_active)
            .bind(&token.access_code_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TokenRecord {
    token: String,
    property_id: String,
    expires_at: Option<String>,
    is_active: bool,
    access_code_hash: Option<String>,
}

impl TryFrom<TokenRecord> for VerificationToken {
    type Error = sqlx::Error;

    fn try_from(r: TokenRecord) -> Result<Self, Self::Error> {
        let expires_at = r
            .expires_at
            .as_deref()
            .map(parse_timestamp)
            .transpose()
            .map_err(|e| sqlx::Error::Decode(e.into()))?;

        Ok(Self {
            token: r.token,
            property_id: r.property_id,
            expires_at,
            is_active: r.is_active,
            access_code_hash: r.access_code_hash,
        })
    }
}
