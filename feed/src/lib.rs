// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Fetcher for booking calendar feeds published as iCalendar (RFC 5545) over HTTP.
//!
//! The fetcher does no parsing and no retries: it returns the raw document or
//! a [`FeedError`], and leaves retry policy to the caller.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]

mod client;
mod config;
mod error;
mod http;
mod types;

pub use crate::client::FeedClient;
pub use crate::config::FeedConfig;
pub use crate::error::FeedError;
pub use crate::types::FeedUrl;
