// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth redirect handler.
//!
//! The browser lands here after the user grants access on Splitwise. No
//! session is required: the redirect carries nothing but the query string.

use crate::config::AUTH_CALLBACK_PATH;
use crate::error::Result;
use crate::services::token_store::TokenRecord;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(AUTH_CALLBACK_PATH, get(callback))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
}

/// Store the returned code and kick off an update cycle.
///
/// The stored record is overwritten unconditionally: a second redirect wins
/// over the first, and a late redirect after authentication regresses the
/// handshake to the pending-code step. Both are expected. The update runs
/// detached so the browser gets its acknowledgement right away.
async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<&'static str> {
    if params.code.is_none() {
        tracing::warn!("OAuth callback arrived without a code");
    }
    state
        .token_store
        .write(&TokenRecord::with_code(params.code))?;

    let sensor = state.sensor.clone();
    tokio::spawn(async move {
        if let Err(e) = sensor.update().await {
            tracing::warn!(error = %e, "Callback-triggered update failed");
        }
    });

    Ok("You can close this window now")
}
