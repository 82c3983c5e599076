//! Budget adjustment recommendation
//!
//! Cross-references the top category deltas against the user's budgets and
//! what is already spent in the current period. The result answers "how much
//! of the expected extra spend has no budget room yet", as a percentage.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::db::Database;
use crate::error::Result;
use crate::models::{Budget, BudgetPeriod, CategoryDelta};

use super::window::{month_range, week_range};

/// Recommended budget adjustment percentage for a set of category deltas
///
/// For each category with a budget: headroom is what remains of the cap in
/// the current period, and when the expected delta exceeds it the shortfall
/// is expressed as a percentage of the delta. The overall recommendation is
/// the maximum across categories, or 0 when every delta fits.
pub fn recommend_adjustment(
    db: &Database,
    user_id: i64,
    today: NaiveDate,
    top_categories: &[CategoryDelta],
) -> Result<f64> {
    if top_categories.is_empty() {
        return Ok(0.0);
    }

    let budgets = db.budgets_for(user_id)?;
    // One budget per (user, category) is assumed; the latest row wins if not
    let by_category: HashMap<&str, &Budget> = budgets
        .iter()
        .map(|b| (b.category.as_str(), b))
        .collect();

    let mut recommended: f64 = 0.0;
    for item in top_categories {
        let Some(budget) = by_category.get(item.category.as_str()) else {
            continue;
        };

        let period = match budget.period {
            BudgetPeriod::Weekly => week_range(today),
            _ => month_range(today),
        };
        let spent = db.sum_expenses_for_category(user_id, &item.category, &period)?;
        let headroom = (budget.amount - spent).max(0.0);

        if item.delta > headroom && item.delta > 0.0 {
            let adjustment = ((item.delta - headroom) / item.delta) * 100.0;
            recommended = recommended.max(adjustment);
        }
    }

    Ok(recommended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTransaction, TransactionKind};
    use chrono::{Datelike, Duration, TimeZone, Utc};

    fn delta(category: &str, amount: f64) -> CategoryDelta {
        CategoryDelta {
            category: category.to_string(),
            delta: amount,
        }
    }

    fn spend_today(db: &Database, user: i64, amount: f64, category: &str) {
        let today = Utc::now().date_naive();
        db.insert_transaction(
            user,
            &NewTransaction {
                description: format!("{} spend", category),
                amount,
                category: category.to_string(),
                kind: TransactionKind::Expense,
                occurred_at: Utc.from_utc_datetime(&today.and_hms_opt(12, 0, 0).unwrap()),
            },
        )
        .unwrap();
    }

    #[test]
    fn test_shortfall_expressed_as_percentage_of_delta() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("rec@example.com", "Rec", "US").unwrap();
        let today = Utc::now().date_naive();

        db.create_budget(user, "Gifts", 500.0, BudgetPeriod::Monthly)
            .unwrap();
        spend_today(&db, user, 450.0, "Gifts");

        // Headroom 50 against an expected delta of 200: 75% uncovered
        let pct = recommend_adjustment(&db, user, today, &[delta("Gifts", 200.0)]).unwrap();
        assert!((pct - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_delta_within_headroom_needs_no_adjustment() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("fits@example.com", "Fits", "US").unwrap();
        let today = Utc::now().date_naive();

        db.create_budget(user, "Gifts", 500.0, BudgetPeriod::Monthly)
            .unwrap();
        spend_today(&db, user, 100.0, "Gifts");

        let pct = recommend_adjustment(&db, user, today, &[delta("Gifts", 200.0)]).unwrap();
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn test_unbudgeted_categories_are_skipped() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("skip@example.com", "Skip", "US").unwrap();
        let today = Utc::now().date_naive();

        let pct = recommend_adjustment(&db, user, today, &[delta("Travel", 300.0)]).unwrap();
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn test_maximum_shortfall_wins_across_categories() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("max@example.com", "Max", "US").unwrap();
        let today = Utc::now().date_naive();

        db.create_budget(user, "Gifts", 500.0, BudgetPeriod::Monthly)
            .unwrap();
        db.create_budget(user, "Dining", 100.0, BudgetPeriod::Monthly)
            .unwrap();
        spend_today(&db, user, 450.0, "Gifts"); // headroom 50 vs delta 200 -> 75%
        spend_today(&db, user, 90.0, "Dining"); // headroom 10 vs delta 20 -> 50%

        let pct = recommend_adjustment(
            &db,
            user,
            today,
            &[delta("Gifts", 200.0), delta("Dining", 20.0)],
        )
        .unwrap();
        assert!((pct - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_overspent_budget_caps_headroom_at_zero() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("over@example.com", "Over", "US").unwrap();
        let today = Utc::now().date_naive();

        db.create_budget(user, "Gifts", 100.0, BudgetPeriod::Monthly)
            .unwrap();
        spend_today(&db, user, 150.0, "Gifts");

        // No headroom left: the full delta needs new room
        let pct = recommend_adjustment(&db, user, today, &[delta("Gifts", 80.0)]).unwrap();
        assert_eq!(pct, 100.0);
    }

    #[test]
    fn test_weekly_budget_uses_the_current_week() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("weekly@example.com", "Weekly", "US").unwrap();
        let today = Utc::now().date_naive();

        db.create_budget(user, "Dining", 100.0, BudgetPeriod::Weekly)
            .unwrap();

        // Spend placed well before this week's Monday must not count
        let weeks_ago = today - Duration::days(today.weekday().num_days_from_monday() as i64 + 10);
        db.insert_transaction(
            user,
            &NewTransaction {
                description: "Old dinner".to_string(),
                amount: 90.0,
                category: "Dining".to_string(),
                kind: TransactionKind::Expense,
                occurred_at: Utc.from_utc_datetime(&weeks_ago.and_hms_opt(12, 0, 0).unwrap()),
            },
        )
        .unwrap();

        // Full 100 of headroom remains, so a delta of 80 fits
        let pct = recommend_adjustment(&db, user, today, &[delta("Dining", 80.0)]).unwrap();
        assert_eq!(pct, 0.0);
    }
}
