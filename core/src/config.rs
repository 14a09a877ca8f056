// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::path::{Path, PathBuf};

use jiff::SignedDuration;
use serde::de;
use staysync_feed::FeedConfig;

use crate::error::Error;
use crate::reservation::Property;
use crate::status::StalenessPolicy;

/// The name of the application, used for state and config directories.
pub const APP_NAME: &str = "staysync";

/// File name of the database inside the state directory.
pub const DB_FILE_NAME: &str = "staysync.db";

/// Configuration for the sync engine.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    /// Directory for storing application state, the XDG state directory by default.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    /// Maximum age of a successful sync before the property is stale.
    #[serde(default)]
    pub freshness: Option<ConfigDuration>,

    /// How long a running sync holds a property before it counts as abandoned.
    #[serde(default)]
    pub sync_lease: Option<ConfigDuration>,

    /// Feed fetcher settings.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Properties registered at start-up.
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl Config {
    /// Normalize the configuration.
    pub fn normalize(&mut self) -> Result<(), Error> {
        // Normalize state directory
        match &self.state_dir {
            Some(a) => {
                self.state_dir = Some(expand_path(a).map_err(|e| {
                    Error::Config(format!("Failed to expand state directory path: {e}"))
                })?);
            }

            None => match get_state_dir() {
                Ok(a) => self.state_dir = Some(a.join(APP_NAME)),
                Err(e) => tracing::warn!("Failed to get state directory: {e}"),
            },
        }

        let policy = self.staleness_policy();
        if policy.freshness.is_negative() || policy.lease.is_negative() {
            return Err(Error::Config("durations must not be negative".to_string()));
        }

        for property in &self.properties {
            if property.id.trim().is_empty() {
                return Err(Error::Config("property id must not be empty".to_string()));
            }
        }

        Ok(())
    }

    /// The staleness policy, with defaults for unset durations.
    #[must_use]
    pub fn staleness_policy(&self) -> StalenessPolicy {
        StalenessPolicy {
            freshness: self
                .freshness
                .map_or(StalenessPolicy::DEFAULT_FRESHNESS, |d| d.0),
            lease: self.sync_lease.map_or(StalenessPolicy::DEFAULT_LEASE, |d| d.0),
        }
    }

    /// Path of the database file, `None` if no state directory could be found.
    #[must_use]
    pub fn db_path(&self) -> Option<PathBuf> {
        self.state_dir.as_ref().map(|dir| dir.join(DB_FILE_NAME))
    }
}

/// A duration written as `"HH:MM"`, `"1d"`, `"24h"`, `"60m"` or `"1800s"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigDuration(pub SignedDuration);

impl<'de> serde::Deserialize<'de> for ConfigDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct DurationVisitor;

        impl de::Visitor<'_> for DurationVisitor {
            type Value = ConfigDuration;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter
                    .write_str(r#"a duration string like "HH:MM", "1d", "24h", "60m", or "1800s""#)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                parse_duration(value)
                    .map(ConfigDuration)
                    .map_err(E::custom)
            }
        }

        deserializer.deserialize_str(DurationVisitor)
    }
}

/// Handle tilde (~) and environment variables in the path
fn expand_path(path: &Path) -> Result<PathBuf, String> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path.to_str().ok_or("Invalid path")?;

    // Handle tilde and home directory
    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir()?.join(stripped));
        }
    }

    // Handle config directories
    let config_prefixes: &[&str] = if cfg!(unix) {
        &["$XDG_CONFIG_HOME/", "${XDG_CONFIG_HOME}/"]
    } else {
        &[r"%LOCALAPPDATA%\", "%LOCALAPPDATA%/"]
    };
    for prefix in config_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_config_dir()?.join(stripped));
        }
    }

    Ok(path.into())
}

fn get_home_dir() -> Result<PathBuf, String> {
    dirs::home_dir().ok_or_else(|| "User-specific home directory not found".to_string())
}

/// The user configuration directory, `$XDG_CONFIG_HOME` on unix.
pub fn get_config_dir() -> Result<PathBuf, String> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(not(unix))]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| "User-specific config directory not found".to_string())
}

fn get_state_dir() -> Result<PathBuf, String> {
    #[cfg(unix)]
    let state_dir = xdg::BaseDirectories::new().get_state_home();
    #[cfg(not(unix))]
    let state_dir = dirs::data_dir();
    state_dir.ok_or_else(|| "User-specific state directory not found".to_string())
}

/// Parse a duration string in the format "HH:MM" / "1d" / "24h" / "60m" / "1800s".
fn parse_duration(s: &str) -> Result<SignedDuration, String> {
    let int = |v: &str| -> Result<i64, String> {
        v.trim()
            .parse()
            .map_err(|e| format!("Invalid duration {s:?}: {e}"))
    };

    // Try to parse "HH:MM" format
    if let Some((h, m)) = s.split_once(':') {
        Ok(SignedDuration::from_mins(int(h)? * 60 + int(m)?))
    }
    // Match suffix-based formats
    else if let Some(rest) = s.strip_suffix('d') {
        Ok(SignedDuration::from_hours(int(rest)? * 24))
    } else if let Some(rest) = s.strip_suffix('h') {
        Ok(SignedDuration::from_hours(int(rest)?))
    } else if let Some(rest) = s.strip_suffix('m') {
        Ok(SignedDuration::from_mins(int(rest)?))
    } else if let Some(rest) = s.strip_suffix('s') {
        Ok(SignedDuration::from_secs(int(rest)?))
    } else {
        Err(format!("Invalid duration format: {s}"))
    }
}
