//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init/status commands and shared utilities (open_db)
//! - `users` - User management commands (add, list, prefs)
//! - `transactions` - Transaction commands (add, list)
//! - `budgets` - Budget commands (set, list)
//! - `holidays` - Upcoming holiday listing
//! - `insights` - Holiday spending insight command

pub mod budgets;
pub mod core;
pub mod holidays;
pub mod insights;
pub mod transactions;
pub mod users;

// Re-export command functions for main.rs
pub use budgets::*;
pub use core::*;
pub use holidays::*;
pub use insights::*;
pub use transactions::*;
pub use users::*;
