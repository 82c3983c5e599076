//! Budget command implementations

use anyhow::Result;
use garland_core::db::Database;
use garland_core::models::BudgetPeriod;

use super::require_user;

pub fn cmd_budgets_set(
    db: &Database,
    email: &str,
    category: &str,
    amount: f64,
    period: &str,
) -> Result<()> {
    let user = require_user(db, email)?;

    let period: BudgetPeriod = period
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    if amount <= 0.0 {
        anyhow::bail!("Budget amount must be positive (got {})", amount);
    }

    db.create_budget(user.id, category, amount, period)?;
    println!("✅ Budget set: {} ${:.2}/{}", category, amount, period);
    Ok(())
}

pub fn cmd_budgets_list(db: &Database, email: &str) -> Result<()> {
    let user = require_user(db, email)?;
    let budgets = db.budgets_for(user.id)?;

    if budgets.is_empty() {
        println!("No budgets for {} yet. Set one with:", email);
        println!("  garland budgets set --email {} --category Gifts --amount 500", email);
        return Ok(());
    }

    println!();
    println!("🎯 Budgets for {}", email);
    println!("   ─────────────────────────────");

    for budget in budgets {
        println!(
            "   {:<16} ${:.2}/{}",
            budget.category, budget.amount, budget.period
        );
    }

    Ok(())
}
