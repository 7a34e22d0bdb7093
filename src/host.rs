// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Seams toward the hosting platform.
//!
//! The domain logic only ever talks to these traits; how notifications and
//! events actually reach a user is the host side's concern. The default
//! implementations keep the latest notification in memory and put everything
//! on the log.

use crate::error::Result;
use serde_json::Value;
use std::sync::Mutex;

/// Persistent, user-visible notification with replace/dismiss semantics.
pub trait Notifier: Send + Sync {
    /// Publish a notification, replacing any previous one.
    fn notify(&self, title: &str, message: &str);
    /// Clear the current notification, if any.
    fn dismiss(&self);
}

/// Fire-and-forget event delivery toward the host's event bus.
pub trait EventBus: Send + Sync {
    fn fire(&self, event_type: &str, payload: Value) -> Result<()>;
}

/// Default notifier: remembers the latest message and logs it.
#[derive(Default)]
pub struct PersistentNotifier {
    current: Mutex<Option<String>>,
}

impl PersistentNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently displayed message, if one is pending.
    pub fn current(&self) -> Option<String> {
        self.current.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Notifier for PersistentNotifier {
    fn notify(&self, title: &str, message: &str) {
        tracing::info!(title, message, "Persistent notification");
        if let Ok(mut guard) = self.current.lock() {
            *guard = Some(message.to_string());
        }
    }

    fn dismiss(&self) {
        if let Ok(mut guard) = self.current.lock() {
            if guard.take().is_some() {
                tracing::debug!("Dismissed persistent notification");
            }
        }
    }
}

/// Default event bus: structured log lines only.
#[derive(Default)]
pub struct LogEventBus;

impl EventBus for LogEventBus {
    fn fire(&self, event_type: &str, payload: Value) -> Result<()> {
        tracing::info!(event_type, payload = %payload, "Event fired");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifier_replaces_and_dismisses() {
        let notifier = PersistentNotifier::new();
        assert_eq!(notifier.current(), None);

        notifier.notify("splitwise", "visit https://example/authorize");
        notifier.notify("splitwise", "second");
        assert_eq!(notifier.current().as_deref(), Some("second"));

        notifier.dismiss();
        assert_eq!(notifier.current(), None);
    }
}
