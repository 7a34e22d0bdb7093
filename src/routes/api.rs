// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only view of the published sensor entity.

use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/splitwise/state", get(get_state))
}

/// The published entity shape: one numeric state, the currency as unit,
/// and the attribute map.
#[derive(Serialize)]
pub struct SensorStateResponse {
    pub state: f64,
    pub unit_of_measurement: String,
    pub attributes: Map<String, Value>,
}

/// Current sensor state; 404 until a cycle has published.
async fn get_state(State(state): State<Arc<AppState>>) -> Response {
    match state.sensor.current() {
        Some(report) => Json(SensorStateResponse {
            state: report.total_balance,
            unit_of_measurement: report.currency.clone(),
            attributes: report.attributes(),
        })
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
