// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Balance aggregation.
//!
//! One update cycle fetches the current user, friends, groups, and the
//! notification feed, and reduces them to a single report: grand total,
//! per-friend scalars, per-group signed balances. Everything is rebuilt from
//! scratch each cycle; a failed fetch aborts the whole cycle.

use crate::error::AppError;
use crate::host::EventBus;
use crate::models::{BalanceReport, Friend, FriendBalance, Group, Notification, User};
use crate::services::splitwise::SplitwiseClient;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// Events on the bus are named by this prefix plus the numeric
/// notification type.
pub const NOTIFICATION_EVENT_PREFIX: &str = "splitwise_notification_";

/// Computes the published balance state from an authenticated client.
pub struct BalanceAggregator {
    client: Arc<SplitwiseClient>,
    event_bus: Arc<dyn EventBus>,
}

impl BalanceAggregator {
    pub fn new(client: Arc<SplitwiseClient>, event_bus: Arc<dyn EventBus>) -> Self {
        Self { client, event_bus }
    }

    /// Fetch and compute a fresh report.
    ///
    /// All-or-nothing: any fetch error propagates and no report is produced.
    /// Only individual event-bus rejections are tolerated.
    pub async fn refresh(&self) -> Result<BalanceReport, AppError> {
        let user = self.client.get_current_user().await?;
        let friends = self.client.get_friends().await?;
        let groups = self.client.get_groups().await?;
        let report = build_report(&user, &friends, &groups);

        let notifications = self.client.get_notifications().await?;
        self.emit_notifications(&notifications);

        tracing::debug!(
            total = report.total_balance,
            friends = report.friends.len(),
            groups = report.groups.len(),
            "Balance report built"
        );
        Ok(report)
    }

    /// Put one event per notification on the bus. A rejected event is logged
    /// and skipped; it never aborts the cycle.
    fn emit_notifications(&self, notifications: &[Notification]) {
        for n in notifications {
            let event_type = format!("{}{}", NOTIFICATION_EVENT_PREFIX, n.kind);
            let payload = json!({
                "id": n.id,
                "type": n.kind,
                "image_url": n.image_url,
                "content": n.content,
                "image_shape": n.image_shape,
                "created_at": n.created_at,
                "created_by": n.created_by,
                "source": {
                    "id": n.source.id,
                    "type": n.source.kind,
                    "url": n.source.url,
                },
            });
            if let Err(e) = self.event_bus.fire(&event_type, payload) {
                tracing::warn!(
                    notification_id = n.id,
                    error = %e,
                    "Event bus rejected notification event"
                );
            }
        }
    }
}

/// Reduce fetched objects to the published report.
///
/// The id-to-name index only lives for this one computation; debts whose
/// endpoints resolve to nobody we know contribute nothing.
pub fn build_report(user: &User, friends: &[Friend], groups: &[Group]) -> BalanceReport {
    let me = normalize_name(&user.first_name);

    let mut id_map: HashMap<i64, String> = HashMap::new();
    id_map.insert(user.id, me.clone());

    let mut friend_map: HashMap<String, FriendBalance> = HashMap::new();
    let mut total_balance = 0.0;
    for friend in friends {
        let name = normalize_name(&friend.first_name);
        let friend_total: f64 = friend.balances.iter().map(|b| b.amount).sum();
        total_balance += friend_total;
        id_map.insert(friend.id, name.clone());
        friend_map.insert(
            name,
            FriendBalance {
                id: friend.id,
                total_balance: friend_total,
            },
        );
    }

    let mut group_map: HashMap<String, f64> = HashMap::new();
    for group in groups {
        let mut signed = 0.0;
        for debt in &group.original_debts {
            let from = id_map.get(&debt.from);
            let to = id_map.get(&debt.to);
            tracing::debug!(group = %group.name, ?from, ?to, amount = debt.amount, "Group debt");
            // Owed to the current user counts negative, owed by them positive.
            if to == Some(&me) {
                signed -= debt.amount;
            } else if from == Some(&me) {
                signed += debt.amount;
            }
        }
        group_map.insert(normalize_name(&group.name), signed);
    }

    BalanceReport {
        user_id: user.id,
        first_name: me,
        last_name: normalize_name(&user.last_name),
        currency: user.default_currency.clone(),
        total_balance,
        friends: friend_map,
        groups: group_map,
    }
}

/// Normalize a display name: trimmed, lower-cased, spaces/apostrophes/hyphens
/// collapsed to single underscores.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_underscore = false;
    for c in raw.trim().to_lowercase().chars() {
        let mapped = match c {
            ' ' | '\'' | '-' => '_',
            other => other,
        };
        if mapped == '_' {
            if prev_underscore {
                continue;
            }
            prev_underscore = true;
        } else {
            prev_underscore = false;
        }
        out.push(mapped);
    }
    out.trim_matches('_').to_string()
}
