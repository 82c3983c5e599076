//! Historical sample collection
//!
//! For a target holiday, walks prior occurrences of the same (name, region)
//! within the lookback horizon and measures the user's expense spending in
//! each occurrence's event window against its baseline window.

use std::collections::BTreeMap;

use chrono::Duration;
use tracing::debug;

use crate::db::Database;
use crate::error::Result;
use crate::models::HolidayEvent;

use super::window::{baseline_window, event_window};

/// Default number of years of history to examine
pub const DEFAULT_LOOKBACK_YEARS: i64 = 2;
/// Slack added to the horizon so a slightly-drifting anniversary still matches
pub const LOOKBACK_MARGIN_DAYS: i64 = 30;

/// Measurements gathered from a user's history around prior occurrences
///
/// The three vectors run in parallel, one entry per valid sample (a prior
/// occurrence whose baseline-window spend was greater than zero). Category
/// deltas accumulate across valid samples in a BTreeMap so downstream
/// ordering is deterministic. `transactions_examined` counts expense
/// transactions across every examined event window, valid or not.
#[derive(Debug, Clone, Default)]
pub struct HistoricalSamples {
    pub holiday_spend: Vec<f64>,
    pub baseline_spend: Vec<f64>,
    pub pct_changes: Vec<f64>,
    pub category_deltas: BTreeMap<String, f64>,
    pub transactions_examined: i64,
}

impl HistoricalSamples {
    /// Number of samples usable in percent-change averaging
    pub fn valid_count(&self) -> usize {
        self.holiday_spend.len()
    }
}

/// Collect samples from prior occurrences of `event` for one user
pub fn collect_samples(
    db: &Database,
    user_id: i64,
    event: &HolidayEvent,
    lookback_years: i64,
) -> Result<HistoricalSamples> {
    let horizon = event.date - Duration::days(365 * lookback_years + LOOKBACK_MARGIN_DAYS);
    let priors = db.events_named_before(&event.name, &event.country_code, event.date, horizon)?;

    let mut samples = HistoricalSamples::default();

    for prior in &priors {
        let window = event_window(prior.date);
        let baseline = baseline_window(prior.date);

        let holiday_spend = db.sum_expenses(user_id, &window)?;
        let baseline_spend = db.sum_expenses(user_id, &baseline)?;
        samples.transactions_examined += db.count_expense_transactions(user_id, &window)?;

        // A sparse baseline can't produce a meaningful ratio, but the
        // occurrence still counts as evidence toward the sufficiency gate.
        if baseline_spend <= 0.0 {
            continue;
        }

        let holiday_categories = db.expenses_by_category(user_id, &window)?;
        let baseline_categories = db.expenses_by_category(user_id, &baseline)?;

        for (category, amount) in holiday_categories {
            let delta = amount - baseline_categories.get(&category).copied().unwrap_or(0.0);
            *samples.category_deltas.entry(category).or_insert(0.0) += delta;
        }

        samples
            .pct_changes
            .push((holiday_spend - baseline_spend) / baseline_spend);
        samples.holiday_spend.push(holiday_spend);
        samples.baseline_spend.push(baseline_spend);
    }

    debug!(
        event = %event.name,
        priors = priors.len(),
        valid = samples.valid_count(),
        transactions = samples.transactions_examined,
        "Collected historical samples"
    );

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventKind, NewHolidayEvent, NewTransaction, TransactionKind};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn add_event(db: &Database, name: &str, date: NaiveDate) -> i64 {
        db.insert_event(&NewHolidayEvent {
            name: name.to_string(),
            date,
            country_code: "US".to_string(),
            kind: EventKind::Public,
            tags: vec![],
            source: "curated".to_string(),
        })
        .unwrap()
        .unwrap()
    }

    fn add_expense(db: &Database, user: i64, amount: f64, category: &str, date: NaiveDate) {
        db.insert_transaction(
            user,
            &NewTransaction {
                description: format!("{} purchase", category),
                amount,
                category: category.to_string(),
                kind: TransactionKind::Expense,
                occurred_at: Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap()),
            },
        )
        .unwrap();
    }

    fn target_event(db: &Database, date: NaiveDate) -> HolidayEvent {
        add_event(db, "Festival", date);
        let range = crate::insights::window::DateRange {
            start: date,
            end: date,
        };
        db.events_between("US", &range).unwrap().remove(0)
    }

    #[test]
    fn test_samples_measure_both_windows() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("history@example.com", "History", "US").unwrap();

        // One prior occurrence a year before the target
        add_event(&db, "Festival", day(2024, 12, 25));
        let target = target_event(&db, day(2025, 12, 25));

        // Event window [12-18, 12-27]: 150 across two categories
        add_expense(&db, user, 100.0, "Gifts", day(2024, 12, 20));
        add_expense(&db, user, 50.0, "Dining", day(2024, 12, 26));
        // Baseline window [11-20, 11-29]: 100
        add_expense(&db, user, 60.0, "Gifts", day(2024, 11, 22));
        add_expense(&db, user, 40.0, "Dining", day(2024, 11, 25));

        let samples = collect_samples(&db, user, &target, DEFAULT_LOOKBACK_YEARS).unwrap();

        assert_eq!(samples.valid_count(), 1);
        assert_eq!(samples.holiday_spend, vec![150.0]);
        assert_eq!(samples.baseline_spend, vec![100.0]);
        assert!((samples.pct_changes[0] - 0.5).abs() < 1e-9);
        assert_eq!(samples.transactions_examined, 2);
        assert_eq!(samples.category_deltas["Gifts"], 40.0);
        assert_eq!(samples.category_deltas["Dining"], 10.0);
    }

    #[test]
    fn test_zero_baseline_excluded_from_ratios_but_counted() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("guard@example.com", "Guard", "US").unwrap();

        add_event(&db, "Festival", day(2024, 12, 25));
        let target = target_event(&db, day(2025, 12, 25));

        // Spending in the event window but nothing in the baseline window
        add_expense(&db, user, 100.0, "Gifts", day(2024, 12, 20));
        add_expense(&db, user, 30.0, "Gifts", day(2024, 12, 21));
        add_expense(&db, user, 20.0, "Dining", day(2024, 12, 22));

        let samples = collect_samples(&db, user, &target, DEFAULT_LOOKBACK_YEARS).unwrap();

        // No valid sample, no category deltas, but the transactions still count
        assert_eq!(samples.valid_count(), 0);
        assert!(samples.pct_changes.is_empty());
        assert!(samples.category_deltas.is_empty());
        assert_eq!(samples.transactions_examined, 3);
    }

    #[test]
    fn test_category_missing_from_baseline_contributes_full_delta() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("newcat@example.com", "NewCat", "US").unwrap();

        add_event(&db, "Festival", day(2024, 12, 25));
        let target = target_event(&db, day(2025, 12, 25));

        // Baseline has only Dining; Gifts appears only around the holiday
        add_expense(&db, user, 80.0, "Gifts", day(2024, 12, 20));
        add_expense(&db, user, 50.0, "Dining", day(2024, 11, 22));

        let samples = collect_samples(&db, user, &target, DEFAULT_LOOKBACK_YEARS).unwrap();

        assert_eq!(samples.valid_count(), 1);
        assert_eq!(samples.category_deltas["Gifts"], 80.0);
        // Dining fell to zero in the event window but only holiday-window
        // categories are walked, so it contributes no delta entry
        assert!(!samples.category_deltas.contains_key("Dining"));
    }

    #[test]
    fn test_occurrences_outside_horizon_are_ignored() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("horizon@example.com", "Horizon", "US").unwrap();

        // Three years back is outside the default two-year-plus-margin horizon
        add_event(&db, "Festival", day(2022, 12, 25));
        let target = target_event(&db, day(2025, 12, 25));

        add_expense(&db, user, 100.0, "Gifts", day(2022, 12, 20));
        add_expense(&db, user, 50.0, "Gifts", day(2022, 11, 22));

        let samples = collect_samples(&db, user, &target, DEFAULT_LOOKBACK_YEARS).unwrap();
        assert_eq!(samples.valid_count(), 0);
        assert_eq!(samples.transactions_examined, 0);
    }
}
