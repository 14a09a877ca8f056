// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use reqwest::Url;

use crate::error::FeedError;

/// Validated location of a calendar feed.
///
/// `webcal://` links, which platforms hand out for calendar subscriptions, are
/// rewritten to `https://`. Any other scheme than `http`/`https` is rejected.
///
/// Feed URLs usually embed a secret export token in the query string, so
/// [`Display`](fmt::Display) prints the URL without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedUrl(Url);

impl FeedUrl {
    /// Parses and validates a feed URL.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidUrl`] if the URL cannot be parsed, has no
    /// host, or uses an unsupported scheme.
    pub fn parse(url: &str) -> Result<Self, FeedError> {
        let url = url.trim();
        let url = match url.split_once("://") {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("webcal") => {
                format!("https://{rest}")
            }
            _ => url.to_string(),
        };

        let url = Url::parse(&url).map_err(|e| FeedError::InvalidUrl(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(FeedError::InvalidUrl(format!(
                    "unsupported scheme `{scheme}`"
                )));
            }
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(FeedError::InvalidUrl("missing host".to_string()));
        }

        Ok(Self(url))
    }

    /// Returns the full URL, secrets included.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the URL with its query string and fragment removed.
    #[must_use]
    pub fn redacted(&self) -> String {
        let mut url = self.0.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.to_string()
    }
}

impl FromStr for FeedUrl {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FeedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.redacted().fmt(f)
    }
}
