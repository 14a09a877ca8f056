// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Feed client.

use std::sync::Arc;

use reqwest::header::ACCEPT;

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::http::HttpClient;
use crate::types::FeedUrl;

const ACCEPT_CALENDAR: &str = "text/calendar, text/plain, */*";
const VCALENDAR_BEGIN: &str = "BEGIN:VCALENDAR";

/// Client that downloads calendar feeds.
///
/// # Example
///
/// ```ignore
/// use staysync_feed::{FeedClient, FeedConfig, FeedUrl};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = FeedClient::new(&FeedConfig::default())?;
/// let url = FeedUrl::parse("webcal://www.airbnb.com/calendar/ical/123.ics?s=abc")?;
/// let ics = client.fetch(&url).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: Arc<HttpClient>,
}

impl FeedClient {
    /// Creates a new feed client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let http = HttpClient::new(config)?;
        Ok(Self {
            http: Arc::new(http),
        })
    }

    /// Downloads the raw iCalendar text of a feed.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, timeout, non-2xx status, or when
    /// the body is not an iCalendar document (for example an HTML error page
    /// served by the proxy with a 200 status).
    pub async fn fetch(&self, url: &FeedUrl) -> Result<String, FeedError> {
        tracing::debug!(url = %url, "fetching calendar feed");
        let req = self.http.get(url.as_str()).header(ACCEPT, ACCEPT_CALENDAR);

        let text = match self.http.execute(req).await {
            Ok(resp) => resp.text().await?,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "calendar feed fetch failed");
                return Err(e);
            }
        };

        if !text.contains(VCALENDAR_BEGIN) {
            tracing::warn!(url = %url, len = text.len(), "response is not a calendar");
            return Err(FeedError::NotCalendar);
        }

        tracing::debug!(url = %url, len = text.len(), "calendar feed fetched");
        Ok(text)
    }
}
