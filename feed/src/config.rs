// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// Feed fetcher configuration.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct FeedConfig {
    /// Outbound proxy every feed request goes through, e.g. `http://proxy:3128`.
    #[serde(default)]
    pub proxy: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("staysync-feed/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}
