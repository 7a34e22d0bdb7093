//! Application configuration loaded from environment variables.
//!
//! Credentials are supplied once at startup and are immutable for the
//! process lifetime.

use std::env;
use std::path::PathBuf;

/// Fixed path the OAuth redirect lands on.
pub const AUTH_CALLBACK_PATH: &str = "/api/splitwise/callback";

/// OAuth client credentials for the Splitwise application.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Splitwise OAuth credentials
    pub credentials: Credentials,
    /// Externally reachable base URL (preferred for the OAuth redirect)
    pub external_url: Option<String>,
    /// LAN/local base URL, used when no external URL is configured
    pub internal_url: Option<String>,
    /// Server port
    pub port: u16,
    /// Seconds between balance update cycles
    pub scan_interval_secs: u64,
    /// Token file location
    pub token_file: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            credentials: Credentials {
                client_id: "test_client_id".to_string(),
                client_secret: "test_secret".to_string(),
            },
            external_url: None,
            internal_url: Some("http://localhost:8123".to_string()),
            port: 8123,
            scan_interval_secs: 30,
            token_file: PathBuf::from("splitwise.conf"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8123".to_string())
            .parse()
            .unwrap_or(8123);

        Ok(Self {
            credentials: Credentials {
                client_id: env::var("SPLITWISE_CLIENT_ID")
                    .map_err(|_| ConfigError::Missing("SPLITWISE_CLIENT_ID"))?,
                client_secret: env::var("SPLITWISE_CLIENT_SECRET")
                    .map(|v| v.trim().to_string())
                    .map_err(|_| ConfigError::Missing("SPLITWISE_CLIENT_SECRET"))?,
            },
            external_url: env::var("EXTERNAL_URL").ok().map(|v| v.trim().to_string()),
            internal_url: env::var("INTERNAL_URL").ok().map(|v| v.trim().to_string()),
            port,
            scan_interval_secs: env::var("SCAN_INTERVAL_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            token_file: env::var("TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("splitwise.conf")),
        })
    }

    /// Resolve the base URL the OAuth redirect must be reachable on.
    ///
    /// Prefers an externally reachable, SSL-protected URL. A plain-http
    /// external URL is still usable (the provider will reach it), but gets a
    /// warning. Falls back to the internal URL.
    pub fn redirect_base(&self) -> Result<String, ConfigError> {
        if let Some(url) = &self.external_url {
            if !url.starts_with("https://") {
                tracing::warn!(url = %url, "External URL is not SSL-protected");
            }
            return Ok(url.trim_end_matches('/').to_string());
        }
        if let Some(url) = &self.internal_url {
            return Ok(url.trim_end_matches('/').to_string());
        }
        Err(ConfigError::NoBaseUrl)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("No usable base URL for the OAuth redirect; set EXTERNAL_URL or INTERNAL_URL")]
    NoBaseUrl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_base_prefers_external() {
        let config = Config {
            external_url: Some("https://example.duckdns.org/".to_string()),
            internal_url: Some("http://localhost:8123".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.redirect_base().unwrap(),
            "https://example.duckdns.org"
        );
    }

    #[test]
    fn test_redirect_base_falls_back_to_internal() {
        let config = Config::default();
        assert_eq!(config.redirect_base().unwrap(), "http://localhost:8123");
    }

    #[test]
    fn test_redirect_base_fails_without_urls() {
        let config = Config {
            external_url: None,
            internal_url: None,
            ..Config::default()
        };
        assert!(matches!(
            config.redirect_base(),
            Err(ConfigError::NoBaseUrl)
        ));
    }
}
