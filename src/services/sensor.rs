// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The polled sensor entity.
//!
//! Owns one OAuth coordinator and one aggregator and holds the last
//! successfully published report. Every poll goes through the
//! authentication gate first; an unauthenticated cycle is not an error,
//! the published authorize URL is the user-visible signal.

use crate::error::AppError;
use crate::host::Notifier;
use crate::models::BalanceReport;
use crate::services::aggregator::BalanceAggregator;
use crate::services::oauth::{AuthState, OAuthCoordinator};
use std::sync::{Arc, RwLock};

pub struct SensorFacade {
    coordinator: OAuthCoordinator,
    aggregator: BalanceAggregator,
    notifier: Arc<dyn Notifier>,
    /// Last successful report; survives failed cycles untouched.
    report: RwLock<Option<BalanceReport>>,
}

impl SensorFacade {
    pub fn new(
        coordinator: OAuthCoordinator,
        aggregator: BalanceAggregator,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            coordinator,
            aggregator,
            notifier,
            report: RwLock::new(None),
        }
    }

    /// Run one update cycle.
    ///
    /// Publishing is all-or-nothing: the stored report is only replaced
    /// after a fully successful refresh.
    pub async fn update(&self) -> Result<(), AppError> {
        match self.coordinator.ensure_authenticated().await? {
            AuthState::AwaitingAuthorization => Ok(()),
            AuthState::Authenticated => {
                // Authentication succeeded at some point; the setup
                // notification has served its purpose.
                self.notifier.dismiss();

                let report = self.aggregator.refresh().await?;
                tracing::info!(
                    total = report.total_balance,
                    currency = %report.currency,
                    "Sensor state updated"
                );
                if let Ok(mut guard) = self.report.write() {
                    *guard = Some(report);
                }
                Ok(())
            }
        }
    }

    /// Attempt authentication without running a full cycle.
    ///
    /// Called once at startup so the authorize-URL notification shows up
    /// before the first poll.
    pub async fn ensure_authenticated(&self) -> Result<AuthState, AppError> {
        self.coordinator.ensure_authenticated().await
    }

    /// The last published report, if any cycle has completed.
    pub fn current(&self) -> Option<BalanceReport> {
        self.report.read().ok().and_then(|guard| guard.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Credentials};
    use crate::host::PersistentNotifier;
    use crate::services::splitwise::SplitwiseClient;
    use crate::services::token_store::TokenStore;

    #[tokio::test]
    async fn test_unauthenticated_update_leaves_state_unset() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(SplitwiseClient::new(Credentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        }));
        let store = TokenStore::new(dir.path().join("splitwise.conf"));
        let notifier = Arc::new(PersistentNotifier::new());
        let coordinator = OAuthCoordinator::new(
            client.clone(),
            store,
            notifier.clone(),
            &Config::default(),
        )
        .unwrap();
        let aggregator = BalanceAggregator::new(client, Arc::new(crate::host::LogEventBus));
        let sensor = SensorFacade::new(coordinator, aggregator, notifier.clone());

        sensor.update().await.unwrap();

        assert!(sensor.current().is_none());
        assert!(notifier.current().is_some());
    }
}
