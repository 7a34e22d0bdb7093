//! Group and pairwise-debt models.

use serde::{Deserialize, Serialize};

/// A Splitwise group the current user belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    /// Raw pairwise debts between members, prior to simplification
    pub original_debts: Vec<Debt>,
}

/// A raw amount owed from one member to another within a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    /// User id of the debtor
    pub from: i64,
    /// User id of the creditor
    pub to: i64,
    pub amount: f64,
    pub currency_code: String,
}
