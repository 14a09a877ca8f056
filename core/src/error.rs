// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use staysync_feed::FeedError;

/// Errors raised while syncing a property or reading its state.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed identifier, token, code or date, rejected before any I/O.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A property, token or reservation does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The feed could not be fetched.
    #[error("Failed to fetch calendar feed: {0}")]
    Network(#[from] FeedError),

    /// The local store failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Another sync of the same property holds the `syncing` state.
    #[error("A sync is already running for property {0}")]
    AlreadySyncing(String),

    /// The `syncing` state was taken over by another attempt before this one
    /// finished; its results were discarded.
    #[error("Sync of property {0} was taken over by another attempt")]
    LeaseLost(String),

    /// The configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<sqlx::migrate::MigrateError> for Error {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        Self::Database(e.into())
    }
}
