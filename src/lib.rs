// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Splitwise balance sensor.
//!
//! Pulls shared-expense balances from Splitwise on a poll cadence and
//! exposes them as a single numeric state plus attributes, driving the
//! OAuth2 handshake needed to get there.

pub mod config;
pub mod error;
pub mod host;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::{SensorFacade, TokenStore};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub sensor: Arc<SensorFacade>,
    pub token_store: TokenStore,
}
