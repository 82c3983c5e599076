//! Insight engine - orchestrates computation and caching
//!
//! One engine instance serves every request: for each upcoming holiday in the
//! user's window it answers from the cache when a fresh row exists, otherwise
//! it collects history, aggregates, attaches a budget recommendation, caches
//! the result, and returns it. Concurrent requests may race through the
//! cache-miss path and each append a row; rows are additive and the latest
//! one wins on the next read, so the race is wasteful but harmless.

use chrono::{Duration, Utc};
use tracing::debug;

use crate::db::Database;
use crate::error::Result;
use crate::models::{HolidayEvent, HolidayInsight, InsightRecord, NewInsightRecord, User};
use crate::provider::HolidayProvider;

use super::aggregate::{
    aggregate_samples, has_sufficient_history, insufficient_insight, round1, AggregatedInsight,
};
use super::budget::recommend_adjustment;
use super::history::{collect_samples, DEFAULT_LOOKBACK_YEARS};
use super::window::{event_window, DateRange};

/// The holiday spending insight engine
pub struct InsightEngine {
    db: Database,
    provider: Option<HolidayProvider>,
    lookback_years: i64,
}

impl InsightEngine {
    /// Create an engine over a database, optionally backed by a provider
    pub fn new(db: Database, provider: Option<HolidayProvider>) -> Self {
        Self {
            db,
            provider,
            lookback_years: DEFAULT_LOOKBACK_YEARS,
        }
    }

    /// Override how many years of history are examined
    pub fn with_lookback_years(mut self, years: i64) -> Self {
        self.lookback_years = years;
        self
    }

    /// Compute insights for every upcoming holiday in the user's window
    ///
    /// Iterates events in [today, today + window_days] for the user's
    /// country, filtered to the user's declared culture tags when any are
    /// set. Each result is served from the cache unless it is stale or
    /// `force` is set.
    pub fn compute_holiday_insights(
        &self,
        user: &User,
        window_days: i64,
        force: bool,
    ) -> Result<Vec<HolidayInsight>> {
        let today = Utc::now().date_naive();
        let horizon = DateRange {
            start: today,
            end: today + Duration::days(window_days),
        };

        if let Some(provider) = &self.provider {
            // Provider failures surface as zero new events, never an error
            provider.ensure_range(&self.db, &user.country_code, horizon.start, horizon.end)?;
        }

        let mut upcoming = self.db.events_between(&user.country_code, &horizon)?;
        if !user.culture_tags.is_empty() {
            upcoming.retain(|event| {
                event
                    .tags
                    .iter()
                    .any(|tag| user.culture_tags.contains(tag))
            });
        }

        let mut insights = Vec::with_capacity(upcoming.len());
        for event in &upcoming {
            let window = event_window(event.date);

            if !force {
                if let Some(cached) =
                    self.db
                        .latest_unexpired_insight(user.id, event.id, window.start)?
                {
                    debug!(event = %event.name, "Serving cached holiday insight");
                    insights.push(cached_response(event, &cached));
                    continue;
                }
            }

            insights.push(self.compute_event_insight(user, event, &window)?);
        }

        Ok(insights)
    }

    /// Compute, cache, and shape one event's insight
    fn compute_event_insight(
        &self,
        user: &User,
        event: &HolidayEvent,
        window: &DateRange,
    ) -> Result<HolidayInsight> {
        let samples = collect_samples(&self.db, user.id, event, self.lookback_years)?;

        let (aggregated, recommended_pct) = if has_sufficient_history(&samples) {
            let aggregated = aggregate_samples(&samples, &event.name);
            let today = Utc::now().date_naive();
            let recommended =
                recommend_adjustment(&self.db, user.id, today, &aggregated.top_categories)?;
            (aggregated, round1(recommended))
        } else {
            debug!(
                event = %event.name,
                valid = samples.valid_count(),
                transactions = samples.transactions_examined,
                "Not enough history for a substantive insight"
            );
            (insufficient_insight(), 0.0)
        };

        // Cached even when insufficient, so thin histories are not re-walked
        // on every call within the TTL
        self.db.append_insight(&new_record(user, event, window, &aggregated, recommended_pct))?;

        Ok(HolidayInsight {
            holiday_event_id: event.id,
            holiday_name: event.name.clone(),
            holiday_date: event.date,
            expected_change_pct: round1(aggregated.pct_change_avg * 100.0),
            recommended_adjustment_pct: recommended_pct,
            confidence: aggregated.confidence,
            explanation: aggregated.explanation.clone(),
            top_categories: aggregated.top_categories,
            status: aggregated.status,
        })
    }
}

fn new_record(
    user: &User,
    event: &HolidayEvent,
    window: &DateRange,
    aggregated: &AggregatedInsight,
    recommended_pct: f64,
) -> NewInsightRecord {
    NewInsightRecord {
        user_id: user.id,
        holiday_event_id: event.id,
        window_start: window.start,
        window_end: window.end,
        baseline_spend: aggregated.baseline_spend_avg,
        holiday_spend: aggregated.holiday_spend_avg,
        pct_change: aggregated.pct_change_avg,
        confidence: aggregated.confidence,
        top_categories: aggregated.top_categories.clone(),
        recommended_adjustment_pct: recommended_pct,
        explanation: aggregated.explanation.clone(),
        status: aggregated.status,
    }
}

/// Translate a cached row into the response shape
fn cached_response(event: &HolidayEvent, record: &InsightRecord) -> HolidayInsight {
    HolidayInsight {
        holiday_event_id: event.id,
        holiday_name: event.name.clone(),
        holiday_date: event.date,
        expected_change_pct: round1(record.pct_change * 100.0),
        recommended_adjustment_pct: round1(record.recommended_adjustment_pct),
        confidence: record.confidence,
        explanation: record.explanation.clone(),
        top_categories: record.top_categories.clone(),
        status: record.status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventKind, NewHolidayEvent};
    use chrono::NaiveDate;

    fn add_event(db: &Database, name: &str, date: NaiveDate, tags: &[&str]) {
        db.insert_event(&NewHolidayEvent {
            name: name.to_string(),
            date,
            country_code: "US".to_string(),
            kind: EventKind::Public,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            source: "curated".to_string(),
        })
        .unwrap();
    }

    #[test]
    fn test_no_upcoming_events_means_no_insights() {
        let db = Database::in_memory().unwrap();
        let user_id = db.create_user("empty@example.com", "Empty", "US").unwrap();
        let user = db.get_user(user_id).unwrap().unwrap();

        let engine = InsightEngine::new(db, None);
        let insights = engine.compute_holiday_insights(&user, 30, false).unwrap();
        assert!(insights.is_empty());
    }

    #[test]
    fn test_culture_tags_filter_upcoming_events() {
        let db = Database::in_memory().unwrap();
        let user_id = db.create_user("tags@example.com", "Tags", "US").unwrap();
        db.update_user_preferences(
            user_id,
            &crate::models::UserPreferences {
                culture_tags: Some(vec!["diwali".to_string()]),
                ..Default::default()
            },
        )
        .unwrap();
        let user = db.get_user(user_id).unwrap().unwrap();

        let today = Utc::now().date_naive();
        add_event(&db, "Diwali", today + Duration::days(10), &["diwali", "hindu"]);
        add_event(&db, "Some Sale", today + Duration::days(12), &["shopping"]);

        let engine = InsightEngine::new(db, None);
        let insights = engine.compute_holiday_insights(&user, 30, false).unwrap();

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].holiday_name, "Diwali");
    }

    #[test]
    fn test_user_without_tags_sees_every_event() {
        let db = Database::in_memory().unwrap();
        let user_id = db.create_user("all@example.com", "All", "US").unwrap();
        let user = db.get_user(user_id).unwrap().unwrap();

        let today = Utc::now().date_naive();
        add_event(&db, "Diwali", today + Duration::days(10), &["diwali"]);
        add_event(&db, "Some Sale", today + Duration::days(12), &["shopping"]);

        let engine = InsightEngine::new(db, None);
        let insights = engine.compute_holiday_insights(&user, 30, false).unwrap();
        assert_eq!(insights.len(), 2);
    }

    #[test]
    fn test_events_outside_the_window_are_ignored() {
        let db = Database::in_memory().unwrap();
        let user_id = db.create_user("window@example.com", "Window", "US").unwrap();
        let user = db.get_user(user_id).unwrap().unwrap();

        let today = Utc::now().date_naive();
        add_event(&db, "Near", today + Duration::days(5), &[]);
        add_event(&db, "Far", today + Duration::days(90), &[]);

        let engine = InsightEngine::new(db, None);
        let insights = engine.compute_holiday_insights(&user, 30, false).unwrap();

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].holiday_name, "Near");
    }

    #[test]
    fn test_thin_history_yields_cached_insufficient_insight() {
        let db = Database::in_memory().unwrap();
        let user_id = db.create_user("thin@example.com", "Thin", "US").unwrap();
        let user = db.get_user(user_id).unwrap().unwrap();

        let today = Utc::now().date_naive();
        add_event(&db, "Festival", today + Duration::days(10), &[]);

        let engine = InsightEngine::new(db.clone(), None);
        let insights = engine.compute_holiday_insights(&user, 30, false).unwrap();

        assert_eq!(insights.len(), 1);
        let insight = &insights[0];
        assert_eq!(insight.status, crate::models::InsightStatus::InsufficientData);
        assert_eq!(insight.expected_change_pct, 0.0);
        assert_eq!(insight.recommended_adjustment_pct, 0.0);
        assert_eq!(insight.confidence, crate::models::Confidence::Low);
        assert!(insight.top_categories.is_empty());

        // The placeholder is cached too
        assert_eq!(db.count_insight_rows(user.id, insight.holiday_event_id).unwrap(), 1);
    }
}
