// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper with proxy, timeout and status handling.

use std::time::Duration;

use reqwest::{Client, Proxy, RequestBuilder, Response};

use crate::config::FeedConfig;
use crate::error::FeedError;

/// HTTP client for feed requests.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the proxy URL is invalid or client creation fails.
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent);

        if let Some(proxy) = &config.proxy {
            let proxy = Proxy::all(proxy)
                .map_err(|e| FeedError::Config(format!("Invalid proxy `{proxy}`: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;
        Ok(Self { client })
    }

    /// Builds a GET request.
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    /// Executes a request and checks for HTTP errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out, or returns a non-2xx
    /// status code.
    pub async fn execute(&self, req: RequestBuilder) -> Result<Response, FeedError> {
        let resp = req.send().await?;

        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(FeedError::Status(status.as_u16()))
        }
    }
}
