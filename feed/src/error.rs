// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Feed fetch errors.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The feed URL is malformed or uses an unsupported scheme.
    InvalidUrl(String),

    /// Transport-level failure (DNS, TLS, connection reset, proxy refusal).
    Http(String),

    /// The server answered with a non-2xx status.
    Status(u16),

    /// The request did not complete within the configured timeout.
    Timeout,

    /// The response body is not an iCalendar document.
    NotCalendar,

    /// Configuration error.
    Config(String),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(e) => write!(f, "Invalid feed URL: {e}"),
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Status(status) => write!(f, "Feed server responded with status {status}"),
            Self::Timeout => write!(f, "Feed request timed out"),
            Self::NotCalendar => write!(f, "Response is not an iCalendar document"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for FeedError {}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            // feed URLs carry secret export tokens, keep them out of messages
            Self::Http(e.without_url().to_string())
        }
    }
}
