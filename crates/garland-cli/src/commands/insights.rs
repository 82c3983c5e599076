//! Holiday spending insight command

use anyhow::Result;
use garland_core::db::Database;
use garland_core::insights::InsightEngine;
use garland_core::models::{Confidence, InsightStatus};
use garland_core::provider::HolidayProvider;

use super::require_user;

pub fn cmd_insights(db: &Database, email: &str, window: i64, force: bool) -> Result<()> {
    let user = require_user(db, email)?;

    let engine = InsightEngine::new(db.clone(), Some(HolidayProvider::from_env()));
    let insights = engine.compute_holiday_insights(&user, window, force)?;

    if insights.is_empty() {
        println!(
            "No holidays in the next {} days for {} ({}).",
            window, email, user.country_code
        );
        return Ok(());
    }

    println!();
    println!("🎄 Holiday spending outlook for {}", email);
    println!("   ─────────────────────────────────────────────────────────────");

    for insight in &insights {
        let confidence_icon = match insight.confidence {
            Confidence::High => "🟢",
            Confidence::Medium => "🟡",
            Confidence::Low => "⚪",
        };

        println!();
        println!("   {} ({})", insight.holiday_name, insight.holiday_date);

        match insight.status {
            InsightStatus::Ok => {
                println!(
                    "      Expected change: {:+.1}%  {} {} confidence",
                    insight.expected_change_pct, confidence_icon, insight.confidence
                );
                if insight.recommended_adjustment_pct > 0.0 {
                    println!(
                        "      💡 Consider {:.1}% more budget room",
                        insight.recommended_adjustment_pct
                    );
                }
                for category in &insight.top_categories {
                    println!("      {} +${:.2}", category.category, category.delta);
                }
            }
            InsightStatus::InsufficientData => {
                println!("      (not enough history yet)");
            }
        }
        println!("      {}", insight.explanation);
    }

    println!();
    Ok(())
}
