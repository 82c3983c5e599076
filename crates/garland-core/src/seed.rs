//! Curated holiday seed data
//!
//! A small multi-year, multi-country holiday list ships with the crate so
//! the engine has events to work with before (or without) any provider
//! enrichment. Seeding is idempotent: rows whose (name, date, country) key
//! already exists are skipped.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::db::Database;
use crate::error::Result;
use crate::models::{EventKind, NewHolidayEvent};

const HOLIDAY_DATA: &str = include_str!("../data/holidays.json");

#[derive(Debug, Deserialize)]
struct SeedHoliday {
    name: String,
    date: NaiveDate,
    country_code: String,
    kind: EventKind,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default = "default_source")]
    source: String,
}

fn default_source() -> String {
    "curated".to_string()
}

/// Insert curated holidays that are not already present
///
/// Returns the number of newly inserted events.
pub fn seed_missing(db: &Database) -> Result<usize> {
    let items: Vec<SeedHoliday> = serde_json::from_str(HOLIDAY_DATA)?;

    let mut inserted = 0;
    for item in items {
        let event = NewHolidayEvent {
            name: item.name,
            date: item.date,
            country_code: item.country_code,
            kind: item.kind,
            tags: item.tags,
            source: item.source,
        };
        if db.insert_event(&event)?.is_some() {
            inserted += 1;
        }
    }

    if inserted > 0 {
        info!(inserted, "Seeded curated holiday events");
    }
    Ok(inserted)
}
