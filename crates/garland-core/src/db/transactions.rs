//! Spending ledger operations
//!
//! Writes are plain inserts; the reads are the aggregate queries the insight
//! engine consumes. All expense aggregates filter on kind = 'expense' and
//! compare calendar dates inclusively.

use std::collections::BTreeMap;

use rusqlite::params;

use super::{format_datetime, parse_datetime, Database};
use crate::error::Result;
use crate::insights::window::DateRange;
use crate::models::{NewTransaction, Transaction, TransactionKind};

impl Database {
    /// Record a transaction, returning the new id
    pub fn insert_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (user_id, description, amount, category, kind, occurred_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.description,
                tx.amount,
                tx.category,
                tx.kind.as_str(),
                format_datetime(tx.occurred_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List a user's transactions, newest first
    pub fn list_transactions(&self, user_id: i64, limit: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, description, amount, category, kind, occurred_at, created_at
            FROM transactions
            WHERE user_id = ?
            ORDER BY occurred_at DESC, id DESC
            LIMIT ?
            "#,
        )?;
        let rows = stmt.query_map(params![user_id, limit], row_to_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Total expense spend inside an inclusive date range
    pub fn sum_expenses(&self, user_id: i64, range: &DateRange) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE user_id = ?1 AND kind = 'expense'
              AND date(occurred_at) BETWEEN ?2 AND ?3
            "#,
            params![user_id, range.start.to_string(), range.end.to_string()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Expense spend for one category inside an inclusive date range
    pub fn sum_expenses_for_category(
        &self,
        user_id: i64,
        category: &str,
        range: &DateRange,
    ) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE user_id = ?1 AND kind = 'expense' AND category = ?2
              AND date(occurred_at) BETWEEN ?3 AND ?4
            "#,
            params![
                user_id,
                category,
                range.start.to_string(),
                range.end.to_string()
            ],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Number of expense transactions inside an inclusive date range
    pub fn count_expense_transactions(&self, user_id: i64, range: &DateRange) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM transactions
            WHERE user_id = ?1 AND kind = 'expense'
              AND date(occurred_at) BETWEEN ?2 AND ?3
            "#,
            params![user_id, range.start.to_string(), range.end.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Expense spend grouped by category inside an inclusive date range
    ///
    /// Returned as a BTreeMap so iteration order is deterministic.
    pub fn expenses_by_category(
        &self,
        user_id: i64,
        range: &DateRange,
    ) -> Result<BTreeMap<String, f64>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category, COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE user_id = ?1 AND kind = 'expense'
              AND date(occurred_at) BETWEEN ?2 AND ?3
            GROUP BY category
            "#,
        )?;
        let rows = stmt.query_map(
            params![user_id, range.start.to_string(), range.end.to_string()],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)),
        )?;

        let mut breakdown = BTreeMap::new();
        for row in rows {
            let (category, amount) = row?;
            breakdown.insert(category, amount);
        }
        Ok(breakdown)
    }
}

/// Helper to convert a row to Transaction
fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let kind_str: String = row.get(5)?;
    let occurred_str: String = row.get(6)?;
    let created_str: String = row.get(7)?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        description: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        kind: kind_str.parse().unwrap_or(TransactionKind::Expense),
        occurred_at: parse_datetime(&occurred_str),
        created_at: parse_datetime(&created_str),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn tx(description: &str, amount: f64, category: &str, kind: TransactionKind, date: NaiveDate) -> NewTransaction {
        NewTransaction {
            description: description.to_string(),
            amount,
            category: category.to_string(),
            kind,
            occurred_at: Utc
                .from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap()),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expense_aggregates_ignore_income() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("ledger@example.com", "Ledger", "US").unwrap();

        db.insert_transaction(user, &tx("Groceries", 80.0, "Food", TransactionKind::Expense, day(2024, 6, 10))).unwrap();
        db.insert_transaction(user, &tx("Dinner", 40.0, "Dining", TransactionKind::Expense, day(2024, 6, 12))).unwrap();
        db.insert_transaction(user, &tx("Salary", 3000.0, "Income", TransactionKind::Income, day(2024, 6, 11))).unwrap();

        let range = DateRange {
            start: day(2024, 6, 1),
            end: day(2024, 6, 30),
        };

        assert_eq!(db.sum_expenses(user, &range).unwrap(), 120.0);
        assert_eq!(db.count_expense_transactions(user, &range).unwrap(), 2);
        assert_eq!(
            db.sum_expenses_for_category(user, "Food", &range).unwrap(),
            80.0
        );

        let breakdown = db.expenses_by_category(user, &range).unwrap();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown["Food"], 80.0);
        assert_eq!(breakdown["Dining"], 40.0);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("bounds@example.com", "Bounds", "US").unwrap();

        db.insert_transaction(user, &tx("Start", 10.0, "Misc", TransactionKind::Expense, day(2024, 3, 1))).unwrap();
        db.insert_transaction(user, &tx("End", 20.0, "Misc", TransactionKind::Expense, day(2024, 3, 31))).unwrap();
        db.insert_transaction(user, &tx("Outside", 99.0, "Misc", TransactionKind::Expense, day(2024, 4, 1))).unwrap();

        let range = DateRange {
            start: day(2024, 3, 1),
            end: day(2024, 3, 31),
        };
        assert_eq!(db.sum_expenses(user, &range).unwrap(), 30.0);
    }

    #[test]
    fn test_aggregates_are_per_user() {
        let db = Database::in_memory().unwrap();
        let alice = db.create_user("alice@example.com", "Alice", "US").unwrap();
        let bob = db.create_user("bob@example.com", "Bob", "US").unwrap();

        db.insert_transaction(alice, &tx("Hers", 50.0, "Misc", TransactionKind::Expense, day(2024, 5, 5))).unwrap();
        db.insert_transaction(bob, &tx("His", 70.0, "Misc", TransactionKind::Expense, day(2024, 5, 5))).unwrap();

        let range = DateRange {
            start: day(2024, 5, 1),
            end: day(2024, 5, 31),
        };
        assert_eq!(db.sum_expenses(alice, &range).unwrap(), 50.0);
        assert_eq!(db.sum_expenses(bob, &range).unwrap(), 70.0);
    }

    #[test]
    fn test_list_transactions_newest_first() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("list@example.com", "List", "US").unwrap();

        db.insert_transaction(user, &tx("Old", 10.0, "Misc", TransactionKind::Expense, day(2024, 1, 1))).unwrap();
        db.insert_transaction(user, &tx("New", 20.0, "Misc", TransactionKind::Expense, day(2024, 2, 1))).unwrap();

        let listed = db.list_transactions(user, 10).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].description, "New");
        assert_eq!(listed[1].description, "Old");
    }
}
