// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Sync workflow: fetch, parse, reconcile and record the outcome.

use std::time::Duration;

use jiff::civil::{Date, date};
use jiff::{SignedDuration, Timestamp};
use staysync_core::{Error, Reservation, StaySync, SyncOutcome, SyncState};
use staysync_feed::FeedError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    TempState, TestConfigBuilder, airbnb_feed, mount_feed, test_property, vevent,
};

fn six_block_feed() -> String {
    let mut events = vec![
        vevent(
            "1418fb94e984-a@airbnb.com",
            "20250115",
            "20250120",
            "Reserved",
            r"Reservation URL: https://www.airbnb.com/hosting/reservations/details/HMABCD1234\nPhone Number (Last 4 Digits): 1234\nGuest: John Doe\n2 guests",
        ),
        vevent(
            "1418fb94e984-b@airbnb.com",
            "20250201",
            "20250205",
            "Marie Curie (HMQWERTY12)",
            r"3 invités",
        ),
        vevent("1418fb94e984-c@airbnb.com", "20250210", "20250212", "Airbnb (Not available)", ""),
        vevent(
            "1418fb94e984-d@airbnb.com",
            "20250301",
            "20250307",
            "Reserved",
            r"Guest: Ana Lima\nBooking ID: HM55555555\n4 guests",
        ),
        vevent("1418fb94e984-e@airbnb.com", "20250401", "20250402", "Blocked", ""),
    ];
    // no DTEND: dropped by the parser
    events.push(
        "BEGIN:VEVENT\r\nUID:broken@airbnb.com\r\nDTSTART;VALUE=DATE:20250501\r\nSUMMARY:Reserved\r\nEND:VEVENT\r\n"
            .to_string(),
    );
    airbnb_feed(&events)
}

type Content = (String, String, Date, Date, Option<String>, Option<u8>);

/// The part of a reservation that comes from the feed.
fn content(r: &Reservation) -> Content {
    (
        r.booking_code.clone(),
        r.summary.clone(),
        r.start_date,
        r.end_date,
        r.guest_name.clone(),
        r.guest_count,
    )
}

async fn engine(server: &MockServer, state: &TempState) -> StaySync {
    let config = TestConfigBuilder::new(&state.path())
        .with_property(test_property(server, "villa"))
        .build();
    StaySync::new(config).await.unwrap()
}

#[tokio::test]
async fn sync_stores_reservations_from_feed() {
    // Arrange
    let server = MockServer::start().await;
    mount_feed(&server, "villa", &six_block_feed()).await;
    let state = TempState::new();
    let engine = engine(&server, &state).await;

    // Act
    let outcome = engine.sync_property("villa", false).await.unwrap();

    // Assert
    assert_eq!(
        outcome,
        SyncOutcome::Synced {
            count: 5,
            dropped: 1,
            duplicates: 0,
        }
    );

    let rows = engine.reservations("villa").await.unwrap();
    assert_eq!(rows.len(), 5);
    assert!(rows.len() < 6, "dropped events are not stored");

    let first = &rows[0];
    assert_eq!(first.booking_code, "HMABCD1234");
    assert_eq!(first.start_date, date(2025, 1, 15));
    assert_eq!(first.end_date, date(2025, 1, 20));
    assert_eq!(first.guest_name.as_deref(), Some("John Doe"));
    assert_eq!(first.guest_count, Some(2));
    assert!(first.description.contains("Phone Number (Last 4 Digits): 1234"));

    let second = &rows[1];
    assert_eq!(second.booking_code, "HMQWERTY12");
    assert_eq!(second.guest_name.as_deref(), Some("Marie Curie"));
    assert_eq!(second.guest_count, Some(3));

    assert_eq!(rows[2].booking_code, "UID:1418fb94e984-c@airbnb.com");
    assert_eq!(rows[2].guest_name, None);

    let status = engine.sync_status("villa").await.unwrap();
    assert_eq!(status.sync_status, SyncState::Success);
    assert_eq!(status.reservations_count, Some(5));
    assert!(status.last_sync_at.is_some_and(|t| t <= engine.now()));
    assert_eq!(status.last_error, None);
}

#[tokio::test]
async fn sync_twice_against_unchanged_feed_is_idempotent() {
    // Arrange
    let server = MockServer::start().await;
    mount_feed(&server, "villa", &six_block_feed()).await;
    let state = TempState::new();
    let engine = engine(&server, &state).await;

    // Act
    engine.sync_property("villa", true).await.unwrap();
    let first = engine.reservations("villa").await.unwrap();
    engine.sync_property("villa", true).await.unwrap();
    let second = engine.reservations("villa").await.unwrap();

    // Assert
    let first_content: Vec<_> = first.iter().map(content).collect();
    let second_content: Vec<_> = second.iter().map(content).collect();
    assert_eq!(first_content, second_content);
    assert_ne!(first[0].id, second[0].id, "rows are recreated on every sync");
}

#[tokio::test]
async fn sync_replaces_cancelled_bookings() {
    // Arrange
    let server = MockServer::start().await;
    let both = airbnb_feed(&[
        vevent("a", "20250115", "20250120", "Reserved", "HM11111111"),
        vevent("b", "20250201", "20250205", "Reserved", "HM22222222"),
    ]);
    let one = airbnb_feed(&[vevent("b", "20250201", "20250206", "Reserved", "HM22222222")]);
    Mock::given(method("GET"))
        .and(path("/villa.ics"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(both, "text/calendar"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_feed(&server, "villa", &one).await;
    let state = TempState::new();
    let engine = engine(&server, &state).await;
    engine.sync_property("villa", true).await.unwrap();

    // Act
    engine.sync_property("villa", true).await.unwrap();

    // Assert
    let rows = engine.reservations("villa").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].booking_code, "HM22222222");
    assert_eq!(rows[0].end_date, date(2025, 2, 6));
}

#[tokio::test]
async fn sync_network_failure_keeps_previous_rows() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/villa.ics"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(six_block_feed(), "text/calendar"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/villa.ics"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let state = TempState::new();
    let engine = engine(&server, &state).await;
    engine.sync_property("villa", false).await.unwrap();

    // Act
    let err = engine.sync_property("villa", true).await.unwrap_err();

    // Assert
    assert!(matches!(err, Error::Network(FeedError::Status(503))));
    assert_eq!(engine.reservations("villa").await.unwrap().len(), 5);

    let status = engine.sync_status("villa").await.unwrap();
    assert_eq!(status.sync_status, SyncState::Error);
    assert!(status.last_error.unwrap().contains("503"));
    assert_eq!(status.reservations_count, Some(5));
    assert!(engine.is_sync_needed("villa").await.unwrap().is_needed());
}

#[tokio::test]
async fn sync_with_only_invalid_events_stores_nothing() {
    // Arrange
    let server = MockServer::start().await;
    let broken = airbnb_feed(&[
        "BEGIN:VEVENT\r\nUID:x\r\nDTSTART;VALUE=DATE:20250301\r\nSUMMARY:Reserved\r\nEND:VEVENT\r\n"
            .to_string(),
    ]);
    Mock::given(method("GET"))
        .and(path("/villa.ics"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(six_block_feed(), "text/calendar"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_feed(&server, "villa", &broken).await;
    let state = TempState::new();
    let engine = engine(&server, &state).await;
    engine.sync_property("villa", true).await.unwrap();

    // Act
    let outcome = engine.sync_property("villa", true).await.unwrap();

    // Assert
    assert_eq!(
        outcome,
        SyncOutcome::Synced {
            count: 0,
            dropped: 1,
            duplicates: 0,
        }
    );
    assert!(engine.reservations("villa").await.unwrap().is_empty());
    let status = engine.sync_status("villa").await.unwrap();
    assert_eq!(status.sync_status, SyncState::Success);
    assert_eq!(status.reservations_count, Some(0));
}

#[tokio::test]
async fn sync_keeps_first_event_of_repeated_booking_code() {
    // Arrange
    let server = MockServer::start().await;
    let feed = airbnb_feed(&[
        vevent("dup-a", "20250115", "20250120", "Reserved", r"Listing ID: 12345678"),
        vevent("dup-b", "20250201", "20250205", "Reserved", r"Listing ID: 12345678"),
        vevent(
            "dup-c",
            "20250301",
            "20250304",
            "Reserved",
            r"Listing ID: 12345678\nBooking ID: HMABCD1234",
        ),
    ]);
    mount_feed(&server, "villa", &feed).await;
    let state = TempState::new();
    let engine = engine(&server, &state).await;

    // Act
    let outcome = engine.sync_property("villa", false).await.unwrap();
    let response = engine.trigger_sync("villa", true).await;

    // Assert
    assert_eq!(
        outcome,
        SyncOutcome::Synced {
            count: 2,
            dropped: 0,
            duplicates: 1,
        }
    );
    let rows = engine.reservations("villa").await.unwrap();
    let codes: Vec<_> = rows.iter().map(|r| r.booking_code.as_str()).collect();
    assert_eq!(codes, vec!["12345678", "HMABCD1234"]);
    assert_eq!(rows[0].start_date, date(2025, 1, 15));

    assert!(response.success);
    assert_eq!(response.reservations_count, Some(2));
    assert_eq!(
        response.message,
        "Synced 2 reservations, skipped 1 duplicate booking codes"
    );
}

#[tokio::test]
async fn sync_with_malformed_stored_url_is_a_validation_error() {
    // Arrange
    let server = MockServer::start().await;
    let state = TempState::new();
    let engine = engine(&server, &state).await;
    let mut property = test_property(&server, "villa");
    property.ics_url = "not a url".to_string();
    state.open_db().await.properties.upsert(&property).await.unwrap();

    // Act
    let err = engine.sync_property("villa", true).await.unwrap_err();

    // Assert
    assert!(matches!(err, Error::Validation(_)));
    let status = engine.sync_status("villa").await.unwrap();
    assert_eq!(status.sync_status, SyncState::Error);
}

#[tokio::test]
async fn sync_with_html_error_page_keeps_previous_rows() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/villa.ics"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(six_block_feed(), "text/calendar"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/villa.ics"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>Too many requests</html>", "text/html"),
        )
        .mount(&server)
        .await;
    let state = TempState::new();
    let engine = engine(&server, &state).await;
    engine.sync_property("villa", true).await.unwrap();

    // Act
    let err = engine.sync_property("villa", true).await.unwrap_err();

    // Assert
    assert!(matches!(err, Error::Network(FeedError::NotCalendar)));
    assert_eq!(engine.reservations("villa").await.unwrap().len(), 5);
}

#[tokio::test]
async fn sync_times_out_and_records_error() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(six_block_feed(), "text/calendar")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    let state = TempState::new();
    let config = TestConfigBuilder::new(&state.path())
        .with_property(test_property(&server, "villa"))
        .with_timeout_secs(1)
        .build();
    let engine = StaySync::new(config).await.unwrap();

    // Act
    let err = engine.sync_property("villa", false).await.unwrap_err();

    // Assert
    assert!(matches!(err, Error::Network(FeedError::Timeout)));
    let status = engine.sync_status("villa").await.unwrap();
    assert_eq!(status.sync_status, SyncState::Error);
    assert!(engine.reservations("villa").await.unwrap().is_empty());
}

#[tokio::test]
async fn sync_rejects_concurrent_attempt_on_same_property() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/villa.ics"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(six_block_feed(), "text/calendar")
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let state = TempState::new();
    let engine = engine(&server, &state).await;

    // Act
    let first = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.sync_property("villa", true).await })
    };
    tokio::time::sleep(Duration::from_millis(500)).await;
    let second = engine.sync_property("villa", true).await;
    let first = first.await.unwrap();

    // Assert
    assert!(matches!(second, Err(Error::AlreadySyncing(id)) if id == "villa"));
    assert!(matches!(first.unwrap(), SyncOutcome::Synced { count: 5, .. }));
    let status = engine.sync_status("villa").await.unwrap();
    assert_eq!(status.sync_status, SyncState::Success);
}

#[tokio::test]
async fn sync_late_finish_after_takeover_keeps_lock_with_new_attempt() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/villa.ics"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(six_block_feed(), "text/calendar")
                .set_delay(Duration::from_secs(3)),
        )
        .expect(2)
        .mount(&server)
        .await;
    let state = TempState::new();
    let engine = engine(&server, &state).await;
    let started: Timestamp = "2025-01-10T08:00:00Z".parse().unwrap();
    let later = started + SignedDuration::from_mins(11);
    let at = |now: Timestamp| {
        let mut engine = engine.clone();
        engine.set_now(now);
        engine
    };

    // Act
    let abandoned = {
        let engine = at(started);
        tokio::spawn(async move { engine.sync_property("villa", true).await })
    };
    tokio::time::sleep(Duration::from_secs(1)).await;
    let takeover = {
        let engine = at(later);
        tokio::spawn(async move { engine.sync_property("villa", true).await })
    };
    tokio::time::sleep(Duration::from_millis(200)).await;
    let abandoned = abandoned.await.unwrap();
    let status_in_flight = engine.sync_status("villa").await.unwrap();
    let third = at(later).sync_property("villa", true).await;
    let takeover = takeover.await.unwrap();

    // Assert
    assert!(matches!(abandoned, Err(Error::LeaseLost(id)) if id == "villa"));
    assert_eq!(status_in_flight.sync_status, SyncState::Syncing);
    assert!(matches!(third, Err(Error::AlreadySyncing(_))));
    assert!(matches!(takeover.unwrap(), SyncOutcome::Synced { count: 5, .. }));

    let status = engine.sync_status("villa").await.unwrap();
    assert_eq!(status.sync_status, SyncState::Success);
    assert_eq!(status.last_sync_at, Some(later));
}

#[tokio::test]
async fn sync_skips_in_flight_property_without_force() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/villa.ics"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(six_block_feed(), "text/calendar")
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let state = TempState::new();
    let engine = engine(&server, &state).await;

    // Act
    let first = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.sync_property("villa", true).await })
    };
    tokio::time::sleep(Duration::from_millis(500)).await;
    let response = engine.trigger_sync("villa", false).await;
    first.await.unwrap().unwrap();

    // Assert
    assert!(response.success);
    assert_eq!(response.message, "Sync not needed: sync already in progress");
}

#[tokio::test]
async fn sync_unknown_property_is_not_found() {
    let server = MockServer::start().await;
    let state = TempState::new();
    let engine = engine(&server, &state).await;

    let err = engine.sync_property("chalet", false).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = engine.sync_property("  ", false).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn trigger_sync_reports_response_payload() {
    // Arrange
    let server = MockServer::start().await;
    mount_feed(&server, "villa", &six_block_feed()).await;
    let state = TempState::new();
    let engine = engine(&server, &state).await;

    // Act
    let synced = engine.trigger_sync("villa", false).await;
    let skipped = engine.trigger_sync("villa", false).await;
    let missing = engine.trigger_sync("chalet", false).await;

    // Assert
    let json = serde_json::to_value(&synced).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["reservationsCount"], 5);
    assert_eq!(
        json["message"],
        "Synced 5 reservations, skipped 1 invalid events"
    );

    assert!(skipped.success);
    assert_eq!(skipped.reservations_count, Some(5));
    assert_eq!(skipped.message, "Sync not needed: recently synced");

    let json = serde_json::to_value(&missing).unwrap();
    assert_eq!(json["success"], false);
    assert!(json.get("reservationsCount").is_none());
    assert_eq!(json["message"], "Property chalet not found");
}

#[tokio::test]
async fn sync_status_of_never_synced_property_is_idle() {
    let server = MockServer::start().await;
    let state = TempState::new();
    let engine = engine(&server, &state).await;

    let status = engine.sync_status("villa").await.unwrap();

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["syncStatus"], "idle");
    assert!(json.get("lastSyncAt").is_none());
    assert!(json.get("lastError").is_none());
    assert!(json.get("reservationsCount").is_none());
}
