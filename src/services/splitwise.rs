// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Splitwise API client.
//!
//! Handles:
//! - OAuth2 authorize-URL construction and code exchange
//! - Current user / friends / groups / notifications fetches
//! - Translation of wire shapes (envelopes, decimal-string amounts) into
//!   the typed domain models
//!
//! Monetary amounts arrive as decimal strings and are parsed to `f64`;
//! precision beyond what floating-point affords is not guaranteed.

use crate::config::Credentials;
use crate::error::AppError;
use crate::models::{Balance, Debt, Friend, Group, Notification, User};
use serde::Deserialize;
use std::sync::RwLock;

const API_BASE: &str = "https://secure.splitwise.com/api/v3.0";
const OAUTH_BASE: &str = "https://secure.splitwise.com";

/// Splitwise API client.
pub struct SplitwiseClient {
    http: reqwest::Client,
    api_base: String,
    oauth_base: String,
    credentials: Credentials,
    /// Loaded by the OAuth coordinator once the handshake completes.
    access_token: RwLock<Option<String>>,
}

impl SplitwiseClient {
    /// Create a new client with OAuth credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_urls(credentials, API_BASE.to_string(), OAUTH_BASE.to_string())
    }

    /// Create a client against non-default endpoints (tests point this at a
    /// mock server).
    pub fn with_base_urls(credentials: Credentials, api_base: String, oauth_base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base,
            oauth_base,
            credentials,
            access_token: RwLock::new(None),
        }
    }

    // ─── OAuth2 ──────────────────────────────────────────────────────────────

    /// The consent-page URL the user must visit to grant access.
    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}/oauth/authorize?client_id={}&response_type=code&redirect_uri={}",
            self.oauth_base,
            self.credentials.client_id,
            urlencoding::encode(redirect_uri)
        )
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<String, AppError> {
        let response = self
            .http
            .post(format!("{}/oauth/token", self.oauth_base))
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| AppError::AuthenticationFailed(format!("Token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Splitwise token exchange failed");
            return Err(AppError::AuthenticationFailed(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        let token: TokenExchangeResponse = response.json().await.map_err(|e| {
            AppError::AuthenticationFailed(format!("Failed to parse token response: {}", e))
        })?;
        Ok(token.access_token)
    }

    /// Load an access token for subsequent API calls.
    pub fn set_access_token(&self, token: &str) {
        if let Ok(mut guard) = self.access_token.write() {
            *guard = Some(token.to_string());
        }
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    fn bearer(&self) -> Result<String, AppError> {
        self.access_token
            .read()
            .ok()
            .and_then(|guard| guard.clone())
            .ok_or_else(|| AppError::AuthenticationFailed("No access token loaded".to_string()))
    }

    // ─── API Fetches ─────────────────────────────────────────────────────────

    /// Get the authenticated user.
    pub async fn get_current_user(&self) -> Result<User, AppError> {
        let envelope: UserEnvelope = self.get_json("get_current_user").await?;
        Ok(envelope.user)
    }

    /// Get the current user's friends with their open balances.
    pub async fn get_friends(&self) -> Result<Vec<Friend>, AppError> {
        let envelope: FriendsEnvelope = self.get_json("get_friends").await?;
        envelope.friends.into_iter().map(WireFriend::parse).collect()
    }

    /// Get the current user's groups with their raw pairwise debts.
    pub async fn get_groups(&self) -> Result<Vec<Group>, AppError> {
        let envelope: GroupsEnvelope = self.get_json("get_groups").await?;
        envelope.groups.into_iter().map(WireGroup::parse).collect()
    }

    /// Get the recent notification feed.
    pub async fn get_notifications(&self) -> Result<Vec<Notification>, AppError> {
        let envelope: NotificationsEnvelope = self.get_json("get_notifications").await?;
        Ok(envelope.notifications)
    }

    /// Generic authenticated GET with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T, AppError> {
        let token = self.bearer()?;
        let response = self
            .http
            .get(format!("{}/{}", self.api_base, endpoint))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::SplitwiseApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 401 {
                return Err(AppError::AuthenticationFailed(
                    "Splitwise rejected the access token".to_string(),
                ));
            }

            return Err(AppError::SplitwiseApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::SplitwiseApi(format!("JSON parse error: {}", e)))
    }
}

// ─── Wire Shapes ─────────────────────────────────────────────────────────────

/// Token exchange response from Splitwise OAuth.
#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Debug, Deserialize)]
struct FriendsEnvelope {
    friends: Vec<WireFriend>,
}

/// Friend as the API sends it: balances live under `balance`, amounts are
/// decimal strings.
#[derive(Debug, Deserialize)]
struct WireFriend {
    id: i64,
    first_name: String,
    #[serde(default)]
    balance: Vec<WireBalance>,
}

#[derive(Debug, Deserialize)]
struct WireBalance {
    currency_code: String,
    amount: String,
}

#[derive(Debug, Deserialize)]
struct GroupsEnvelope {
    groups: Vec<WireGroup>,
}

#[derive(Debug, Deserialize)]
struct WireGroup {
    id: i64,
    name: String,
    #[serde(default)]
    original_debts: Vec<WireDebt>,
}

#[derive(Debug, Deserialize)]
struct WireDebt {
    from: i64,
    to: i64,
    amount: String,
    currency_code: String,
}

#[derive(Debug, Deserialize)]
struct NotificationsEnvelope {
    notifications: Vec<Notification>,
}

impl WireFriend {
    fn parse(self) -> Result<Friend, AppError> {
        let balances = self
            .balance
            .into_iter()
            .map(|b| {
                Ok(Balance {
                    amount: parse_amount(&b.amount)?,
                    currency_code: b.currency_code,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;
        Ok(Friend {
            id: self.id,
            first_name: self.first_name,
            balances,
        })
    }
}

impl WireGroup {
    fn parse(self) -> Result<Group, AppError> {
        let original_debts = self
            .original_debts
            .into_iter()
            .map(|d| {
                Ok(Debt {
                    from: d.from,
                    to: d.to,
                    amount: parse_amount(&d.amount)?,
                    currency_code: d.currency_code,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;
        Ok(Group {
            id: self.id,
            name: self.name,
            original_debts,
        })
    }
}

fn parse_amount(raw: &str) -> Result<f64, AppError> {
    raw.parse::<f64>()
        .map_err(|_| AppError::SplitwiseApi(format!("Invalid amount: {:?}", raw)))
}
