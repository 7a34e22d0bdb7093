// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Splitwise Sensor Server
//!
//! Polls Splitwise for shared-expense balances and serves the resulting
//! sensor state, handling the OAuth2 authorization handshake along the way.

use splitwise_sensor::{
    config::Config,
    host::{LogEventBus, PersistentNotifier},
    services::{BalanceAggregator, OAuthCoordinator, SensorFacade, SplitwiseClient, TokenStore},
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Splitwise sensor");

    let client = Arc::new(SplitwiseClient::new(config.credentials.clone()));
    let token_store = TokenStore::new(config.token_file.clone());
    let notifier = Arc::new(PersistentNotifier::new());
    let event_bus = Arc::new(LogEventBus);

    let coordinator = OAuthCoordinator::new(
        client.clone(),
        token_store.clone(),
        notifier.clone(),
        &config,
    )
    .expect("Failed to resolve OAuth redirect URL");
    tracing::info!(redirect_uri = coordinator.redirect_uri(), "OAuth coordinator ready");

    let aggregator = BalanceAggregator::new(client, event_bus);
    let sensor = Arc::new(SensorFacade::new(coordinator, aggregator, notifier));

    // Eager attempt so the authorize-URL notification shows up immediately
    // instead of waiting for the first poll.
    if let Err(e) = sensor.ensure_authenticated().await {
        tracing::warn!(error = %e, "Initial authentication attempt failed");
    }

    // Poll loop standing in for the host's update scheduler.
    let poll_sensor = sensor.clone();
    let scan_interval = Duration::from_secs(config.scan_interval_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(scan_interval);
        loop {
            ticker.tick().await;
            if let Err(e) = poll_sensor.update().await {
                tracing::warn!(error = %e, "Update cycle failed");
            }
        }
    });

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        sensor,
        token_store,
    });

    // Build router
    let app = splitwise_sensor::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("splitwise_sensor=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
