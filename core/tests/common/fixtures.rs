// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Test data factories for integration tests.
//!
//! This module provides helper functions to create configurations, calendar
//! feeds, and mock feed endpoints.

use std::path::Path;

use staysync_core::{Config, ConfigDuration, Property};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A property whose feed lives on the mock server under `/{id}.ics`.
#[must_use]
pub fn test_property(server: &MockServer, id: &str) -> Property {
    Property {
        id: id.to_string(),
        name: format!("Property {id}"),
        ics_url: format!("{}/{id}.ics?s=secret", server.uri()),
    }
}

/// One VEVENT block.
#[must_use]
pub fn vevent(uid: &str, start: &str, end: &str, summary: &str, description: &str) -> String {
    format!(
        "BEGIN:VEVENT\r\nDTSTAMP:20250101T000000Z\r\nUID:{uid}\r\nDTSTART;VALUE=DATE:{start}\r\n\
         DTEND;VALUE=DATE:{end}\r\nSUMMARY:{summary}\r\nDESCRIPTION:{description}\r\nEND:VEVENT\r\n"
    )
}

/// Wraps VEVENT blocks into an Airbnb style calendar.
#[must_use]
pub fn airbnb_feed(events: &[String]) -> String {
    let mut text = String::from(
        "BEGIN:VCALENDAR\r\nPRODID:-//Airbnb Inc//Hosting Calendar 1.0//EN\r\nCALSCALE:GREGORIAN\r\nVERSION:2.0\r\n",
    );
    for event in events {
        text += event;
    }
    text += "END:VCALENDAR\r\n";
    text
}

/// Serves `body` as the feed of property `id`.
pub async fn mount_feed(server: &MockServer, id: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{id}.ics")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/calendar"))
        .mount(server)
        .await;
}

/// Writes a TOML config under `dir` and returns its path.
#[allow(dead_code)]
pub fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, content).expect("Failed to write config");
    path
}

/// Builder for test configurations.
#[derive(Debug)]
pub struct TestConfigBuilder {
    config: Config,
}

impl TestConfigBuilder {
    /// Creates a builder storing its database under `state_dir`, with the
    /// default staleness policy.
    #[must_use]
    pub fn new(state_dir: &Path) -> Self {
        let config = Config {
            state_dir: Some(state_dir.to_path_buf()),
            ..Default::default()
        };
        Self { config }
    }

    /// Registers a property at start-up.
    #[must_use]
    pub fn with_property(mut self, property: Property) -> Self {
        self.config.properties.push(property);
        self
    }

    /// Overrides the request timeout.
    #[must_use]
    #[allow(dead_code)]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.config.feed.timeout_secs = secs;
        self
    }

    /// Overrides the freshness window.
    #[must_use]
    #[allow(dead_code)]
    pub fn with_freshness(mut self, freshness: jiff::SignedDuration) -> Self {
        self.config.freshness = Some(ConfigDuration(freshness));
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}
