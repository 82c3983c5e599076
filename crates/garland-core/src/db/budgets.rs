//! Budget operations

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Budget, BudgetPeriod};

impl Database {
    /// Create a budget cap for a category
    ///
    /// The store does not enforce one budget per (user, category); callers
    /// that assume that should treat the most recent row as current.
    pub fn create_budget(
        &self,
        user_id: i64,
        category: &str,
        amount: f64,
        period: BudgetPeriod,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO budgets (user_id, category, amount, period) VALUES (?, ?, ?, ?)",
            params![user_id, category, amount, period.as_str()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All budgets for a user, oldest first
    pub fn budgets_for(&self, user_id: i64) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, category, amount, period, created_at
             FROM budgets WHERE user_id = ? ORDER BY id",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_budget)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

/// Helper to convert a row to Budget
fn row_to_budget(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
    let period_str: String = row.get(4)?;
    let created_str: String = row.get(5)?;

    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        period: period_str.parse().unwrap_or(BudgetPeriod::Monthly),
        created_at: parse_datetime(&created_str),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_list_budgets() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("budget@example.com", "Budget", "US").unwrap();

        db.create_budget(user, "Gifts", 500.0, BudgetPeriod::Monthly)
            .unwrap();
        db.create_budget(user, "Travel", 200.0, BudgetPeriod::Weekly)
            .unwrap();

        let budgets = db.budgets_for(user).unwrap();
        assert_eq!(budgets.len(), 2);
        assert_eq!(budgets[0].category, "Gifts");
        assert_eq!(budgets[0].period, BudgetPeriod::Monthly);
        assert_eq!(budgets[1].period, BudgetPeriod::Weekly);

        let other = db.create_user("other@example.com", "Other", "US").unwrap();
        assert!(db.budgets_for(other).unwrap().is_empty());
    }
}
