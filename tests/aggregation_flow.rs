// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Integration tests for full update cycles against a mock Splitwise API.

use serde_json::json;
use splitwise_sensor::config::{Config, Credentials};
use splitwise_sensor::error::AppError;
use splitwise_sensor::host::{EventBus, PersistentNotifier};
use splitwise_sensor::services::{
    BalanceAggregator, OAuthCoordinator, SensorFacade, SplitwiseClient, TokenRecord, TokenStore,
};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Event bus that records everything fired at it.
#[derive(Default)]
struct RecordingBus {
    events: Mutex<Vec<(String, serde_json::Value)>>,
}

impl EventBus for RecordingBus {
    fn fire(
        &self,
        event_type: &str,
        payload: serde_json::Value,
    ) -> splitwise_sensor::error::Result<()> {
        self.events
            .lock()
            .unwrap()
            .push((event_type.to_string(), payload));
        Ok(())
    }
}

fn build_sensor(
    server: &MockServer,
    dir: &tempfile::TempDir,
) -> (SensorFacade, TokenStore, Arc<RecordingBus>) {
    let config = Config {
        credentials: Credentials {
            client_id: "id123".to_string(),
            client_secret: "secret".to_string(),
        },
        token_file: dir.path().join("splitwise.conf"),
        ..Config::default()
    };
    let client = Arc::new(SplitwiseClient::with_base_urls(
        config.credentials.clone(),
        format!("{}/api/v3.0", server.uri()),
        server.uri(),
    ));
    let store = TokenStore::new(config.token_file.clone());
    let notifier = Arc::new(PersistentNotifier::new());
    let bus = Arc::new(RecordingBus::default());
    let coordinator = OAuthCoordinator::new(
        client.clone(),
        store.clone(),
        notifier.clone(),
        &config,
    )
    .unwrap();
    let aggregator = BalanceAggregator::new(client, bus.clone());
    (
        SensorFacade::new(coordinator, aggregator, notifier),
        store,
        bus,
    )
}

async fn mount_api(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v3.0/get_current_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {
                "id": 1,
                "first_name": "Sam",
                "last_name": "O'Brien-Smith  ",
                "default_currency": "USD"
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3.0/get_friends"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "friends": [
                {
                    "id": 2,
                    "first_name": "Ann",
                    "balance": [
                        {"currency_code": "USD", "amount": "-10.0"},
                        {"currency_code": "EUR", "amount": "5.0"}
                    ]
                },
                {
                    "id": 3,
                    "first_name": "Bo",
                    "balance": [{"currency_code": "USD", "amount": "3.0"}]
                }
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3.0/get_groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "groups": [
                {
                    "id": 10,
                    "name": "Weekend Trip",
                    "original_debts": [
                        {"from": 2, "to": 1, "amount": "20.0", "currency_code": "USD"}
                    ]
                },
                {"id": 11, "name": "Empty Group", "original_debts": []}
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3.0/get_notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notifications": [
                {
                    "id": 99,
                    "type": 4,
                    "created_at": "2021-03-01T12:00:00Z",
                    "created_by": 2,
                    "image_url": "https://s3.amazonaws.com/splitwise/uploads/icon.png",
                    "image_shape": "square",
                    "content": "Ann added an expense",
                    "source": {
                        "id": 42,
                        "type": "Expense",
                        "url": "https://secure.splitwise.com/expenses/42"
                    }
                }
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_cycle_publishes_report_and_events() {
    let server = MockServer::start().await;
    mount_api(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let (sensor, store, bus) = build_sensor(&server, &dir);
    store
        .write(&TokenRecord::with_access_token("opaque".to_string()))
        .unwrap();

    sensor.update().await.unwrap();

    let report = sensor.current().expect("report published");
    assert_eq!(report.total_balance, -2.0);
    assert_eq!(report.currency, "USD");
    assert_eq!(report.first_name, "sam");
    assert_eq!(report.last_name, "o_brien_smith");
    assert_eq!(report.friends["ann"].total_balance, -5.0);
    assert_eq!(report.friends["bo"].total_balance, 3.0);
    assert_eq!(report.groups["weekend_trip"], -20.0);
    assert_eq!(report.groups["empty_group"], 0.0);

    let attrs = report.attributes();
    assert_eq!(attrs["friend_ann"], json!(-5.0));
    assert_eq!(attrs["group_weekend_trip"], json!(-20.0));
    assert!(!attrs.contains_key("group_empty_group"));

    let events = bus.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, "splitwise_notification_4");
    assert_eq!(events[0].1["id"], json!(99));
    assert_eq!(events[0].1["source"]["url"], json!("https://secure.splitwise.com/expenses/42"));
}

#[tokio::test]
async fn test_failed_cycle_keeps_previous_report() {
    let server = MockServer::start().await;
    mount_api(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let (sensor, store, _) = build_sensor(&server, &dir);
    store
        .write(&TokenRecord::with_access_token("opaque".to_string()))
        .unwrap();

    sensor.update().await.unwrap();
    let first = sensor.current().expect("report published");

    // The groups fetch now fails mid-cycle; nothing may be overwritten.
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/v3.0/get_current_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {
                "id": 1,
                "first_name": "Sam",
                "last_name": "Doe",
                "default_currency": "EUR"
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3.0/get_friends"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"friends": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3.0/get_groups"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = sensor.update().await;
    assert!(matches!(result, Err(AppError::SplitwiseApi(_))));

    let current = sensor.current().expect("previous report survives");
    assert_eq!(current.total_balance, first.total_balance);
    assert_eq!(current.currency, "USD");
    assert_eq!(current.friends.len(), first.friends.len());
}

#[tokio::test]
async fn test_revoked_token_surfaces_authentication_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3.0/get_current_user"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API request"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (sensor, store, _) = build_sensor(&server, &dir);
    store
        .write(&TokenRecord::with_access_token("revoked".to_string()))
        .unwrap();

    let result = sensor.update().await;
    assert!(matches!(result, Err(AppError::AuthenticationFailed(_))));
    assert!(sensor.current().is_none());
}
