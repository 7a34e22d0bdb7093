// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod aggregator;
pub mod oauth;
pub mod sensor;
pub mod splitwise;
pub mod token_store;

pub use aggregator::BalanceAggregator;
pub use oauth::{AuthState, OAuthCoordinator};
pub use sensor::SensorFacade;
pub use splitwise::SplitwiseClient;
pub use token_store::{TokenRecord, TokenStore};
