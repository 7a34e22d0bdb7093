// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth2 authorization handshake.
//!
//! Drives the token file through its three shapes: empty (publish the
//! authorize URL and wait), pending code (exchange it), access token
//! (load it into the client). There is no expiry handling; a token lives
//! until the file is deleted by hand.

use crate::config::{Config, AUTH_CALLBACK_PATH};
use crate::error::AppError;
use crate::host::Notifier;
use crate::services::splitwise::SplitwiseClient;
use crate::services::token_store::{TokenRecord, TokenStore};
use std::sync::Arc;

/// Where the handshake currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No usable token; the authorize URL has been published.
    AwaitingAuthorization,
    /// An access token is loaded into the client.
    Authenticated,
}

/// Drives the authorization handshake against the token store.
pub struct OAuthCoordinator {
    client: Arc<SplitwiseClient>,
    store: TokenStore,
    notifier: Arc<dyn Notifier>,
    redirect_uri: String,
}

impl OAuthCoordinator {
    /// Resolve the redirect URI once and build the coordinator.
    ///
    /// Fails when no usable base URL is configured; that is fatal to setup.
    pub fn new(
        client: Arc<SplitwiseClient>,
        store: TokenStore,
        notifier: Arc<dyn Notifier>,
        config: &Config,
    ) -> Result<Self, AppError> {
        let base = config
            .redirect_base()
            .map_err(|e| AppError::Configuration(e.to_string()))?;
        Ok(Self {
            client,
            store,
            notifier,
            redirect_uri: format!("{}{}", base, AUTH_CALLBACK_PATH),
        })
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Make sure the client holds a usable access token, advancing the
    /// handshake one step if it does not.
    ///
    /// Idempotent: repeated calls with an unchanged token file settle on the
    /// same state. With a pending code, a rejected exchange surfaces as
    /// `AuthenticationFailed` and leaves the code on disk; retrying requires
    /// deleting the token file and re-running the browser flow.
    pub async fn ensure_authenticated(&self) -> Result<AuthState, AppError> {
        let record = self.store.read()?;

        if let Some(token) = &record.access_token {
            self.client.set_access_token(token);
            return Ok(AuthState::Authenticated);
        }

        if let Some(code) = &record.code {
            tracing::info!("Exchanging authorization code for an access token");
            let token = self.client.exchange_code(code, &self.redirect_uri).await?;
            self.store
                .write(&TokenRecord::with_access_token(token.clone()))?;
            self.client.set_access_token(&token);
            tracing::info!("Splitwise authentication complete");
            return Ok(AuthState::Authenticated);
        }

        let url = self.client.authorize_url(&self.redirect_uri);
        tracing::info!(url = %url, "Waiting for Splitwise authorization");
        self.notifier.notify("splitwise", &url);
        Ok(AuthState::AwaitingAuthorization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::host::PersistentNotifier;

    fn make_coordinator(
        dir: &tempfile::TempDir,
    ) -> (OAuthCoordinator, TokenStore, Arc<PersistentNotifier>) {
        let client = Arc::new(SplitwiseClient::new(Credentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        }));
        let store = TokenStore::new(dir.path().join("splitwise.conf"));
        let notifier = Arc::new(PersistentNotifier::new());
        let coordinator = OAuthCoordinator::new(
            client,
            store.clone(),
            notifier.clone(),
            &Config::default(),
        )
        .unwrap();
        (coordinator, store, notifier)
    }

    #[test]
    fn test_new_fails_without_base_url() {
        let config = Config {
            external_url: None,
            internal_url: None,
            ..Config::default()
        };
        let client = Arc::new(SplitwiseClient::new(config.credentials.clone()));
        let store = TokenStore::new(std::path::PathBuf::from("unused.conf"));
        let result = OAuthCoordinator::new(
            client,
            store,
            Arc::new(PersistentNotifier::new()),
            &config,
        );
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_empty_record_publishes_authorize_url() {
        let dir = tempfile::tempdir().unwrap();
        let (coordinator, store, notifier) = make_coordinator(&dir);

        let state = coordinator.ensure_authenticated().await.unwrap();
        assert_eq!(state, AuthState::AwaitingAuthorization);

        let message = notifier.current().expect("authorize URL published");
        assert!(message.contains("/oauth/authorize?client_id=id"));
        assert!(message.contains("%2Fapi%2Fsplitwise%2Fcallback"));

        // No token material appears out of thin air.
        assert!(store.read().unwrap().is_empty());

        // Repeated calls settle on the same state.
        let state = coordinator.ensure_authenticated().await.unwrap();
        assert_eq!(state, AuthState::AwaitingAuthorization);
    }

    #[tokio::test]
    async fn test_stored_token_authenticates_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let (coordinator, store, _) = make_coordinator(&dir);
        store
            .write(&TokenRecord::with_access_token("opaque".to_string()))
            .unwrap();

        for _ in 0..3 {
            let state = coordinator.ensure_authenticated().await.unwrap();
            assert_eq!(state, AuthState::Authenticated);
        }
        assert_eq!(
            store.read().unwrap().access_token.as_deref(),
            Some("opaque")
        );
    }
}
