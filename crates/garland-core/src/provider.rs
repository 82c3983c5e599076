//! Calendarific holiday provider
//!
//! Populates the holiday event store from the Calendarific API. The provider
//! is deliberately forgiving: network errors, malformed payloads, and missing
//! fields all degrade to "no new events" with a warning, never an error into
//! the insight engine. Years already populated from the provider are skipped.
//!
//! # Configuration
//!
//! The provider toggle and API key are read from the environment once and
//! carried as an explicit `ProviderConfig` value:
//!
//! ```text
//! GARLAND_HOLIDAY_PROVIDER=calendarific   # or "none" to disable
//! CALENDARIFIC_API_KEY=your-key
//! ```

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::db::Database;
use crate::error::Result;
use crate::insights::window::DateRange;
use crate::models::{EventKind, NewHolidayEvent};

/// Environment variable selecting the provider ("calendarific" or "none")
pub const PROVIDER_ENV: &str = "GARLAND_HOLIDAY_PROVIDER";
/// Environment variable holding the Calendarific API key
pub const API_KEY_ENV: &str = "CALENDARIFIC_API_KEY";

/// Source label written on provider-supplied event rows
pub const PROVIDER_SOURCE: &str = "calendarific";

const DEFAULT_BASE_URL: &str = "https://calendarific.com/api/v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Explicit provider configuration, passed in at construction
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: String,
    pub api_key: Option<String>,
    pub base_url: String,
}

impl ProviderConfig {
    /// Read configuration from the environment
    pub fn from_env() -> Self {
        Self {
            provider: std::env::var(PROVIDER_ENV)
                .unwrap_or_else(|_| PROVIDER_SOURCE.to_string()),
            api_key: std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// A configuration with remote enrichment switched off
    pub fn disabled() -> Self {
        Self {
            provider: "none".to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Whether remote fetching is both selected and usable
    pub fn is_enabled(&self) -> bool {
        self.provider == PROVIDER_SOURCE && self.api_key.is_some()
    }
}

/// Blocking Calendarific client
pub struct HolidayProvider {
    config: ProviderConfig,
    http: reqwest::blocking::Client,
}

impl HolidayProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self { config, http }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::new(ProviderConfig::from_env())
    }

    /// Guarantee events exist for a range, fetching year-by-year if needed
    ///
    /// Returns the number of newly inserted events. Fetch failures are
    /// swallowed per year; only database errors propagate.
    pub fn ensure_range(
        &self,
        db: &Database,
        country_code: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<usize> {
        if !self.config.is_enabled() {
            return Ok(0);
        }

        let mut inserted = 0;
        for year in from.year()..=to.year() {
            let year_range = DateRange {
                start: NaiveDate::from_ymd_opt(year, 1, 1)
                    .expect("January 1 is always a valid date"),
                end: NaiveDate::from_ymd_opt(year, 12, 31)
                    .expect("December 31 is always a valid date"),
            };

            // A year with any provider rows is treated as already populated
            if db.count_events_from_source(country_code, PROVIDER_SOURCE, &year_range)? > 0 {
                continue;
            }

            let fetched = self.fetch_year(country_code, year);
            if fetched.is_empty() {
                continue;
            }

            let existing = db.event_keys_between(country_code, &year_range)?;
            for event in fetched {
                if existing.contains(&(event.name.clone(), event.date)) {
                    continue;
                }
                if db.insert_event(&event)?.is_some() {
                    inserted += 1;
                }
            }
        }

        if inserted > 0 {
            debug!(country = country_code, inserted, "Populated holiday events from provider");
        }
        Ok(inserted)
    }

    /// Fetch one year of holidays, degrading to empty on any failure
    fn fetch_year(&self, country_code: &str, year: i32) -> Vec<NewHolidayEvent> {
        match self.request_year(country_code, year) {
            Ok(events) => events,
            Err(e) => {
                warn!(
                    country = country_code,
                    year,
                    error = %e,
                    "Holiday provider fetch failed; continuing without new events"
                );
                Vec::new()
            }
        }
    }

    fn request_year(&self, country_code: &str, year: i32) -> Result<Vec<NewHolidayEvent>> {
        let api_key = self.config.api_key.clone().unwrap_or_default();
        let url = format!("{}/holidays", self.config.base_url);

        let payload: CalendarificResponse = self
            .http
            .get(&url)
            .query(&[
                ("api_key", api_key),
                ("country", country_code.to_string()),
                ("year", year.to_string()),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        Ok(payload
            .response
            .holidays
            .iter()
            .filter_map(|item| normalize_holiday(item, country_code))
            .collect())
    }
}

#[derive(Debug, Default, Deserialize)]
struct CalendarificResponse {
    #[serde(default)]
    response: CalendarificHolidayList,
}

#[derive(Debug, Default, Deserialize)]
struct CalendarificHolidayList {
    #[serde(default)]
    holidays: Vec<CalendarificHoliday>,
}

#[derive(Debug, Default, Deserialize)]
struct CalendarificHoliday {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    date: Option<CalendarificDate>,
    /// Calendarific reports one or more type strings per holiday
    #[serde(rename = "type", default)]
    kinds: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CalendarificDate {
    #[serde(default)]
    iso: Option<String>,
}

/// Turn one raw provider record into a storable event, or None if unusable
fn normalize_holiday(item: &CalendarificHoliday, country_code: &str) -> Option<NewHolidayEvent> {
    let name = item
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "Holiday".to_string());

    let iso = item.date.as_ref()?.iso.as_deref()?;
    // ISO values may carry a time component; the leading 10 chars are the date
    let date = NaiveDate::parse_from_str(iso.get(..10)?, "%Y-%m-%d").ok()?;

    let tokens: Vec<String> = item.kinds.iter().map(|t| t.to_lowercase()).collect();
    let kind = classify_kind(&tokens);

    let mut tags = BTreeSet::new();
    for token in &tokens {
        let cleaned = token.replace(['/', '-'], " ");
        for part in cleaned.split_whitespace() {
            tags.insert(part.to_string());
        }
    }
    let name_lower = name.to_lowercase();
    for keyword in ["ramadan", "eid", "diwali", "christmas"] {
        if name_lower.contains(keyword) {
            tags.insert(keyword.to_string());
        }
    }

    Some(NewHolidayEvent {
        name,
        date,
        country_code: country_code.to_string(),
        kind,
        tags: tags.into_iter().collect(),
        source: PROVIDER_SOURCE.to_string(),
    })
}

/// Religious beats national/public/bank; everything else is cultural
fn classify_kind(type_tokens: &[String]) -> EventKind {
    if type_tokens.iter().any(|t| t.contains("religious")) {
        return EventKind::Religious;
    }
    if type_tokens
        .iter()
        .any(|t| t.contains("national") || t.contains("public") || t.contains("bank"))
    {
        return EventKind::Public;
    }
    EventKind::Cultural
}
