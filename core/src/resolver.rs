// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Read-only lookup of a guest's stay from a verification token and a booking code.

use std::sync::OnceLock;

use jiff::Timestamp;
use jiff::civil::Date;
use regex::Regex;
use serde::Serialize;

use crate::localdb::LocalDb;

/// A token handed to a guest by the issuing service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationToken {
    pub token: String,
    pub property_id: String,

    /// `None` means the token never expires.
    pub expires_at: Option<Timestamp>,
    pub is_active: bool,
    pub access_code_hash: Option<String>,
}

/// Check-in window of a resolved booking. Internal identifiers and the raw
/// description are left out on purpose: the description may carry other
/// guests' details copied from the calendar export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWindow {
    pub property_id: String,
    pub airbnb_code: String,
    pub check_in: Date,
    pub check_out: Date,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
}

/// Why a booking could not be resolved.
///
/// Messages are safe to show to guests.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Invalid token format")]
    InvalidToken,

    #[error("Invalid booking code format")]
    InvalidCode,

    #[error("Token not found")]
    TokenNotFound,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token has been revoked")]
    TokenRevoked,

    #[error("Property not found")]
    PropertyNotFound,

    #[error("No reservation matches this booking code")]
    CodeNotFound,

    #[error("Internal error, please try again later")]
    Internal,
}

impl ResolveError {
    /// Stable machine readable code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidToken | Self::InvalidCode => "INVALID_INPUT",
            Self::TokenNotFound => "TOKEN_INVALID",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenRevoked => "TOKEN_REVOKED",
            Self::PropertyNotFound => "PROPERTY_NOT_FOUND",
            Self::CodeNotFound => "CODE_NOT_FOUND",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// HTTP status equivalent.
    #[must_use]
    pub fn status(self) -> u16 {
        match self {
            Self::InvalidToken | Self::InvalidCode => 400,
            Self::TokenNotFound | Self::PropertyNotFound | Self::CodeNotFound => 404,
            Self::TokenExpired | Self::TokenRevoked => 410,
            Self::Internal => 500,
        }
    }

    /// The `{code, message}` payload.
    #[must_use]
    pub fn body(self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

impl From<sqlx::Error> for ResolveError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(err = %e, "database error while resolving booking");
        Self::Internal
    }
}

/// Serialized form of a [`ResolveError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

const TOKEN_RE: &str = r"^[A-Za-z0-9_-]{16,128}$";
const CODE_RE: &str = r"^[A-Za-z0-9]{8,12}$";

/// Checks the token format.
#[must_use]
pub fn is_valid_token(token: &str) -> bool {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(TOKEN_RE).unwrap())
        .is_match(token)
}

/// Checks the booking code format.
#[must_use]
pub fn is_valid_code(code: &str) -> bool {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX
        .get_or_init(|| Regex::new(CODE_RE).unwrap())
        .is_match(code)
}

/// Resolves a booking code for the property a token was issued for.
///
/// Inputs are validated before the store is touched.
pub async fn resolve(
    db: &LocalDb,
    token: &str,
    code: &str,
    now: Timestamp,
) -> Result<BookingWindow, ResolveError> {
    let (token, code) = (token.trim(), code.trim());
    if !is_valid_token(token) {
        return Err(ResolveError::InvalidToken);
    }
    if !is_valid_code(code) {
        return Err(ResolveError::InvalidCode);
    }

    let token = db
        .tokens
        .get(token)
        .await?
        .ok_or(ResolveError::TokenNotFound)?;
    if !token.is_active {
        return Err(ResolveError::TokenRevoked);
    }
    if token.expires_at.is_some_and(|at| at <= now) {
        return Err(ResolveError::TokenExpired);
    }

    let property = db
        .properties
        .get(&token.property_id)
        .await?
        .ok_or(ResolveError::PropertyNotFound)?;
    let reservation = db
        .reservations
        .find_by_code(&property.id, code)
        .await?
        .ok_or(ResolveError::CodeNotFound)?;

    tracing::debug!(property_id = %property.id, "booking resolved");
    Ok(BookingWindow {
        property_id: property.id,
        airbnb_code: reservation.booking_code,
        check_in: reservation.start_date,
        check_out: reservation.end_date,
        guest_name: reservation.guest_name,
        property_name: Some(property.name),
    })
}
