// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable key material for the OAuth handshake.
//!
//! One JSON file holds either nothing, a pending authorization code, or an
//! access token. Single-writer, single-reader: the poll cycle and the
//! callback handler both go through this store, serialized by the hosting
//! model rather than by locking.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persisted handshake state.
///
/// At most one of `code` / `access_token` is present; `access_token` is the
/// sole authentication-success signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl TokenRecord {
    /// Pending-exchange record. A missing code still overwrites the file,
    /// leaving an empty record (no progress on the next cycle).
    pub fn with_code(code: Option<String>) -> Self {
        Self {
            code,
            access_token: None,
        }
    }

    /// Authenticated record, replacing any pending code.
    pub fn with_access_token(access_token: String) -> Self {
        Self {
            code: None,
            access_token: Some(access_token),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.access_token.is_none()
    }
}

/// Single-file token storage.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the stored record.
    ///
    /// An absent file is an empty record; an unreadable or unparseable file
    /// is surfaced as a storage error, never silently repaired.
    pub fn read(&self) -> Result<TokenRecord, AppError> {
        if !self.path.exists() {
            return Ok(TokenRecord::default());
        }
        let data = std::fs::read_to_string(&self.path)
            .map_err(|e| AppError::Storage(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_str(&data)
            .map_err(|e| AppError::Storage(format!("{}: {}", self.path.display(), e)))
    }

    /// Overwrite the whole file with `record`.
    pub fn write(&self, record: &TokenRecord) -> Result<(), AppError> {
        let data = serde_json::to_string(record)
            .map_err(|e| AppError::Storage(format!("serialize token record: {}", e)))?;
        std::fs::write(&self.path, data)
            .map_err(|e| AppError::Storage(format!("{}: {}", self.path.display(), e)))
    }
}
