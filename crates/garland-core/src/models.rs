//! Domain models for Garland

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A registered user of the tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    /// ISO country code used to pick the holiday calendar
    pub country_code: String,
    pub timezone: String,
    /// Declared interest tags; empty means "show every holiday"
    pub culture_tags: Vec<String>,
    pub calendar_opt_in: bool,
    pub created_at: DateTime<Utc>,
}

/// Preference fields that can be updated independently
#[derive(Debug, Clone, Default)]
pub struct UserPreferences {
    pub country_code: Option<String>,
    pub timezone: Option<String>,
    pub culture_tags: Option<Vec<String>>,
    pub calendar_opt_in: Option<bool>,
}

/// Whether a transaction adds to or draws from the user's funds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single spending record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub description: String,
    /// Positive amount in the user's currency; no conversion is performed
    pub amount: f64,
    pub category: String,
    pub kind: TransactionKind,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A transaction about to be recorded
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub kind: TransactionKind,
    pub occurred_at: DateTime<Utc>,
}

/// How often a budget cap resets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown budget period: {}", s)),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A per-category spending cap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    pub amount: f64,
    pub period: BudgetPeriod,
    pub created_at: DateTime<Utc>,
}

/// Broad classification of a calendar event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Public,
    Religious,
    Cultural,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Religious => "religious",
            Self::Cultural => "cultural",
        }
    }
}

impl std::str::FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "religious" => Ok(Self::Religious),
            "cultural" => Ok(Self::Cultural),
            _ => Err(format!("Unknown event kind: {}", s)),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A holiday or other calendrical event
///
/// (name, date, country_code) is unique within the event store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayEvent {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub country_code: String,
    pub kind: EventKind,
    pub tags: Vec<String>,
    /// Provenance: "curated" or the provider that supplied the event
    pub source: String,
    pub created_at: DateTime<Utc>,
}

/// An event about to be stored
#[derive(Debug, Clone)]
pub struct NewHolidayEvent {
    pub name: String,
    pub date: NaiveDate,
    pub country_code: String,
    pub kind: EventKind,
    pub tags: Vec<String>,
    pub source: String,
}

/// Discrete confidence label attached to an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::str::FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Unknown confidence: {}", s)),
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether an insight carries a real estimate or a placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightStatus {
    /// Enough history existed to estimate a change
    Ok,
    /// Too few samples or transactions; figures are zeroed
    InsufficientData,
}

impl InsightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::InsufficientData => "insufficient_data",
        }
    }
}

impl std::str::FromStr for InsightStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ok" => Ok(Self::Ok),
            "insufficient_data" => Ok(Self::InsufficientData),
            _ => Err(format!("Unknown insight status: {}", s)),
        }
    }
}

impl std::fmt::Display for InsightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Average spending delta for one category, dollars per occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDelta {
    pub category: String,
    pub delta: f64,
}

/// A cached insight row
///
/// Rows are append-only: recomputation inserts a fresh row and the most
/// recently generated unexpired row for (user, event, window_start) wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightRecord {
    pub id: i64,
    pub user_id: i64,
    pub holiday_event_id: i64,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub baseline_spend: f64,
    pub holiday_spend: f64,
    pub pct_change: f64,
    pub confidence: Confidence,
    pub top_categories: Vec<CategoryDelta>,
    pub recommended_adjustment_pct: f64,
    pub explanation: String,
    pub status: InsightStatus,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// An insight row about to be cached
#[derive(Debug, Clone)]
pub struct NewInsightRecord {
    pub user_id: i64,
    pub holiday_event_id: i64,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub baseline_spend: f64,
    pub holiday_spend: f64,
    pub pct_change: f64,
    pub confidence: Confidence,
    pub top_categories: Vec<CategoryDelta>,
    pub recommended_adjustment_pct: f64,
    pub explanation: String,
    pub status: InsightStatus,
}

/// One holiday insight as returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolidayInsight {
    pub holiday_event_id: i64,
    pub holiday_name: String,
    pub holiday_date: NaiveDate,
    /// Expected spending change vs baseline, percent, 1 decimal
    pub expected_change_pct: f64,
    /// Suggested extra budget room, percent of the expected delta, 1 decimal
    pub recommended_adjustment_pct: f64,
    pub confidence: Confidence,
    pub explanation: String,
    pub top_categories: Vec<CategoryDelta>,
    pub status: InsightStatus,
}
