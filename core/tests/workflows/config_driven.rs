// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Engine start-up from a TOML configuration file.

use jiff::SignedDuration;
use staysync_core::{Config, DB_FILE_NAME, Error, StaySync, SyncDecision, SyncState};
use tempfile::TempDir;

use crate::common::write_config;

fn load(dir: &TempDir, body: &str) -> Config {
    let content = format!(
        "state_dir = {:?}\n{body}",
        dir.path().join("state").to_string_lossy()
    );
    let path = write_config(dir.path(), &content);
    let text = std::fs::read_to_string(path).unwrap();
    toml::from_str(&text).unwrap()
}

#[tokio::test]
async fn configured_properties_are_registered_on_start() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let config = load(
        &dir,
        r#"
freshness = "2h"

[[properties]]
id = "villa-azur"
name = "Villa Azur"
ics_url = "https://www.airbnb.com/calendar/ical/123.ics?s=abc"

[[properties]]
id = "chalet"
name = "Chalet des Neiges"
ics_url = "https://www.airbnb.com/calendar/ical/456.ics?s=def"
"#,
    );

    // Act
    let engine = StaySync::new(config).await.unwrap();

    // Assert
    let properties = engine.properties().await.unwrap();
    let ids: Vec<_> = properties.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["chalet", "villa-azur"]);
    assert_eq!(
        engine.config().staleness_policy().freshness,
        SignedDuration::from_hours(2)
    );
    assert!(dir.path().join("state").join(DB_FILE_NAME).exists());

    let statuses = engine.sync_statuses().await.unwrap();
    assert_eq!(statuses.len(), 2);
    assert!(statuses.iter().all(|s| s.sync_status == SyncState::Idle));
    assert_eq!(
        engine.is_sync_needed("chalet").await.unwrap(),
        SyncDecision::FirstSync
    );
}

#[tokio::test]
async fn properties_survive_restart() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let body = r#"
[[properties]]
id = "villa-azur"
name = "Villa Azur"
ics_url = "https://www.airbnb.com/calendar/ical/123.ics?s=abc"
"#;
    let engine = StaySync::new(load(&dir, body)).await.unwrap();
    engine.close().await.unwrap();

    // Act
    let engine = StaySync::new(load(&dir, "")).await.unwrap();

    // Assert
    let properties = engine.properties().await.unwrap();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].name, "Villa Azur");
}

#[tokio::test]
async fn empty_property_id_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = load(
        &dir,
        r#"
[[properties]]
id = "  "
name = "Nowhere"
ics_url = "https://www.airbnb.com/calendar/ical/0.ics"
"#,
    );

    let result = StaySync::new(config).await;

    assert!(matches!(result, Err(Error::Config(_))));
}

#[tokio::test]
async fn registering_property_with_bad_url_fails() {
    let dir = TempDir::new().unwrap();
    let engine = StaySync::new(load(&dir, "")).await.unwrap();
    let property = staysync_core::Property {
        id: "villa".to_string(),
        name: "Villa".to_string(),
        ics_url: "ftp://example.com/calendar.ics".to_string(),
    };

    let result = engine.register_property(&property).await;

    assert!(matches!(result, Err(Error::Validation(_))));
    assert!(engine.properties().await.unwrap().is_empty());
}
