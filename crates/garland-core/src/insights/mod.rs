//! Holiday Spending Insight Engine
//!
//! Estimates how a user's spending is likely to change around an upcoming
//! holiday versus their normal baseline, with a confidence label and a
//! budget adjustment recommendation. Results are cached with a 12-hour
//! lifetime so repeated requests don't re-walk the ledger.
//!
//! ## Pipeline
//!
//! - **window** - maps an event date to its observation and baseline windows
//! - **history** - measures spending around prior occurrences of the holiday
//! - **confidence** - labels how consistent the historical changes are
//! - **aggregate** - folds samples into an expected change and top categories
//! - **budget** - recommends extra budget room where headroom falls short
//! - **engine** - ties it together with the cache and the event store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use garland_core::insights::InsightEngine;
//!
//! let engine = InsightEngine::new(db, Some(provider));
//! let insights = engine.compute_holiday_insights(&user, 30, false)?;
//! ```

pub mod aggregate;
pub mod budget;
pub mod confidence;
pub mod engine;
pub mod history;
pub mod window;

pub use aggregate::AggregatedInsight;
pub use budget::recommend_adjustment;
pub use confidence::estimate_confidence;
pub use engine::InsightEngine;
pub use history::{collect_samples, HistoricalSamples, DEFAULT_LOOKBACK_YEARS};
pub use window::{baseline_window, event_window, month_range, week_range, DateRange};
