//! Current-user and friend models.

use serde::{Deserialize, Serialize};

/// The authenticated Splitwise user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// ISO 4217 code of the user's default currency
    pub default_currency: String,
}

/// A friend of the current user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friend {
    pub id: i64,
    pub first_name: String,
    /// One entry per currency the friendship has open balances in
    pub balances: Vec<Balance>,
}

/// A single-currency balance amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub currency_code: String,
    pub amount: f64,
}
