//! Upcoming holiday listing

use anyhow::Result;
use chrono::{Duration, Utc};
use garland_core::db::Database;
use garland_core::insights::DateRange;
use garland_core::provider::HolidayProvider;

pub fn cmd_holidays(db: &Database, country: &str, days: i64) -> Result<()> {
    let today = Utc::now().date_naive();
    let range = DateRange {
        start: today,
        end: today + Duration::days(days),
    };

    // Provider failures degrade to whatever events are already stored
    let provider = HolidayProvider::from_env();
    let fetched = provider.ensure_range(db, country, range.start, range.end)?;
    if fetched > 0 {
        println!("Fetched {} new holidays from the provider.", fetched);
    }

    let events = db.events_between(country, &range)?;

    if events.is_empty() {
        println!(
            "No holidays found for {} in the next {} days.",
            country, days
        );
        println!("Run 'garland init' to seed the curated calendar.");
        return Ok(());
    }

    println!();
    println!("📅 Upcoming holidays ({}, next {} days)", country, days);
    println!("   ─────────────────────────────────────────────────────────────");

    for event in events {
        let tags = if event.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", event.tags.join(", "))
        };
        println!(
            "   {}  {:<24} {}{}",
            event.date, event.name, event.kind, tags
        );
    }

    Ok(())
}
