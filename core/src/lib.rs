// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Sync engine that mirrors rental booking calendars into a local reservation store.
//!
//! [`StaySync`] drives one property's sync end to end: staleness check,
//! fetch, parse, metadata extraction, full replace of the stored
//! reservations, and status bookkeeping. The booking resolver reads the
//! result back for guests holding a verification token.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_debug_implementations,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro
)]

mod config;
mod datetime;
mod error;
mod extract;
mod localdb;
mod reconcile;
mod reservation;
mod resolver;
mod staysync;
mod status;

pub use crate::config::{APP_NAME, Config, ConfigDuration, DB_FILE_NAME, get_config_dir};
pub use crate::error::Error;
pub use crate::extract::{
    Metadata, UID_CODE_PREFIX, extract, extract_booking_code, extract_guest_count,
    extract_guest_name,
};
pub use crate::localdb::LocalDb;
pub use crate::reconcile::{Reconciled, reconcile};
pub use crate::reservation::{Property, Reservation};
pub use crate::resolver::{
    BookingWindow, ErrorBody, ResolveError, VerificationToken, is_valid_code, is_valid_token,
    resolve,
};
pub use crate::staysync::{StatusView, StaySync, SyncOutcome, SyncResponse};
pub use crate::status::{StalenessPolicy, SyncDecision, SyncState, SyncStatus};
