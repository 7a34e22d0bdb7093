// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod balance;
pub mod group;
pub mod notification;
pub mod user;

pub use balance::{BalanceReport, FriendBalance};
pub use group::{Debt, Group};
pub use notification::{Notification, NotificationSource};
pub use user::{Balance, Friend, User};
