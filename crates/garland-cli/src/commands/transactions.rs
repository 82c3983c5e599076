//! Transaction command implementations

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use garland_core::db::Database;
use garland_core::models::{NewTransaction, TransactionKind};

use super::require_user;

pub fn cmd_transactions_add(
    db: &Database,
    email: &str,
    description: &str,
    amount: f64,
    category: &str,
    kind: &str,
    date: Option<&str>,
) -> Result<()> {
    let user = require_user(db, email)?;

    let kind: TransactionKind = kind
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    if amount <= 0.0 {
        anyhow::bail!("Amount must be positive (got {})", amount);
    }

    let day = match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .context("Invalid --date format (use YYYY-MM-DD)")?,
        None => Utc::now().date_naive(),
    };
    let occurred_at = Utc.from_utc_datetime(
        &day.and_hms_opt(12, 0, 0)
            .expect("noon is always a valid time"),
    );

    let id = db.insert_transaction(
        user.id,
        &NewTransaction {
            description: description.to_string(),
            amount,
            category: category.to_string(),
            kind,
            occurred_at,
        },
    )?;

    println!(
        "✅ Recorded {} ${:.2} in {} on {} [id {}]",
        kind, amount, category, day, id
    );
    Ok(())
}

pub fn cmd_transactions_list(db: &Database, email: &str, limit: i64) -> Result<()> {
    let user = require_user(db, email)?;
    let transactions = db.list_transactions(user.id, limit)?;

    if transactions.is_empty() {
        println!("No transactions for {} yet.", email);
        return Ok(());
    }

    println!();
    println!("💳 Transactions for {}", email);
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let sign = match tx.kind {
            TransactionKind::Income => "+",
            TransactionKind::Expense => "-",
        };
        println!(
            "   {} {}${:<10.2} {:<16} {}",
            tx.occurred_at.date_naive(),
            sign,
            tx.amount,
            tx.category,
            tx.description
        );
    }

    Ok(())
}
