// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Splitwise notification feed models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An entry from the Splitwise notification feed.
///
/// `kind` is Splitwise's numeric notification type (expense added, comment,
/// group change, ...); it is carried through verbatim rather than mapped to
/// names the API does not define.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: i64,
    pub created_at: DateTime<Utc>,
    /// User id of whoever caused the notification
    pub created_by: i64,
    pub image_url: String,
    pub image_shape: String,
    /// HTML snippet describing the event
    pub content: String,
    pub source: NotificationSource,
}

/// The object a notification points at (an expense, a group, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSource {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: Option<String>,
}
