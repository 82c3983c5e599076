//! Garland Core Library
//!
//! Shared functionality for the Garland personal finance tool:
//! - Database access and migrations (users, transactions, budgets, events)
//! - Holiday spending insight engine (windows, history, confidence, aggregation)
//! - Budget adjustment recommendations against current-period headroom
//! - Append-only insight cache with a 12-hour lifetime
//! - Calendarific holiday provider and curated seed data

pub mod db;
pub mod error;
pub mod insights;
pub mod models;
pub mod provider;
pub mod seed;

pub use db::{Database, INSIGHT_TTL_HOURS};
pub use error::{Error, Result};
pub use insights::{DateRange, HistoricalSamples, InsightEngine};
pub use models::{
    Budget, BudgetPeriod, CategoryDelta, Confidence, EventKind, HolidayEvent, HolidayInsight,
    InsightRecord, InsightStatus, NewHolidayEvent, NewInsightRecord, NewTransaction, Transaction,
    TransactionKind, User, UserPreferences,
};
pub use provider::{HolidayProvider, ProviderConfig};
