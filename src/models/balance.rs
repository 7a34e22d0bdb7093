//! Aggregated balance state published by the sensor.
//!
//! A report is rebuilt from scratch on every successful update cycle; nothing
//! is merged across cycles.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Net balance with a single friend, collapsed across currencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendBalance {
    pub id: i64,
    /// Sum of all per-currency balance amounts for this friend
    pub total_balance: f64,
}

/// The externally observable state of one update cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceReport {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Unit of measurement for the sensor state
    pub currency: String,
    /// Grand total across all friends, zero balances included
    pub total_balance: f64,
    /// Normalized friend name -> balance
    pub friends: HashMap<String, FriendBalance>,
    /// Normalized group name -> signed balance relative to the current user
    pub groups: HashMap<String, f64>,
}

impl BalanceReport {
    /// Build the attribute map of the published entity.
    ///
    /// Zero-valued friend and group balances are omitted to keep the map
    /// small; they still count toward `total_balance`.
    pub fn attributes(&self) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("id".to_string(), json!(self.user_id));
        m.insert("first_name".to_string(), json!(self.first_name));
        m.insert("last_name".to_string(), json!(self.last_name));
        for (name, friend) in &self.friends {
            if friend.total_balance != 0.0 {
                m.insert(format!("friend_{}", name), json!(friend.total_balance));
            }
        }
        for (name, balance) in &self.groups {
            if *balance != 0.0 {
                m.insert(format!("group_{}", name), json!(balance));
            }
        }
        m
    }
}
