//! Holiday insight cache operations
//!
//! The cache is append-only: every computation inserts a fresh row stamped
//! with a generation time and an expiry 12 hours later. Nothing is updated
//! in place and nothing is evicted; staleness is judged purely by comparing
//! the expiry timestamp to the current time at read time.

use chrono::{Duration, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension};

use super::{format_datetime, parse_datetime, Database};
use crate::error::Result;
use crate::models::{Confidence, InsightRecord, InsightStatus, NewInsightRecord};

/// Lifetime of a cached insight
pub const INSIGHT_TTL_HOURS: i64 = 12;

impl Database {
    /// Append a freshly computed insight, stamping generation and expiry times
    pub fn append_insight(&self, record: &NewInsightRecord) -> Result<i64> {
        let conn = self.conn()?;

        let now = Utc::now();
        let expires_at = now + Duration::hours(INSIGHT_TTL_HOURS);

        conn.execute(
            r#"
            INSERT INTO holiday_insights (
                user_id, holiday_event_id, window_start, window_end,
                baseline_spend, holiday_spend, pct_change, confidence,
                top_categories, recommended_adjustment_pct, explanation, status,
                generated_at, expires_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                record.user_id,
                record.holiday_event_id,
                record.window_start.to_string(),
                record.window_end.to_string(),
                record.baseline_spend,
                record.holiday_spend,
                record.pct_change,
                record.confidence.as_str(),
                serde_json::to_string(&record.top_categories)?,
                record.recommended_adjustment_pct,
                record.explanation,
                record.status.as_str(),
                format_datetime(now),
                format_datetime(expires_at),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Most recently generated insight for a key, if it is still fresh
    ///
    /// The latest row is authoritative: when it has expired this returns None
    /// even if an older row for the same key would still be unexpired.
    pub fn latest_unexpired_insight(
        &self,
        user_id: i64,
        holiday_event_id: i64,
        window_start: NaiveDate,
    ) -> Result<Option<InsightRecord>> {
        let conn = self.conn()?;

        let record = conn
            .query_row(
                r#"
                SELECT id, user_id, holiday_event_id, window_start, window_end,
                       baseline_spend, holiday_spend, pct_change, confidence,
                       top_categories, recommended_adjustment_pct, explanation, status,
                       generated_at, expires_at
                FROM holiday_insights
                WHERE user_id = ? AND holiday_event_id = ? AND window_start = ?
                ORDER BY generated_at DESC, id DESC
                LIMIT 1
                "#,
                params![user_id, holiday_event_id, window_start.to_string()],
                row_to_insight_record,
            )
            .optional()?;

        Ok(record.filter(|r| r.expires_at > Utc::now()))
    }

    /// Number of cache rows stored for a key (fresh and stale alike)
    pub fn count_insight_rows(&self, user_id: i64, holiday_event_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM holiday_insights WHERE user_id = ? AND holiday_event_id = ?",
            params![user_id, holiday_event_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

/// Helper to convert a row to InsightRecord
fn row_to_insight_record(row: &rusqlite::Row) -> rusqlite::Result<InsightRecord> {
    let window_start_str: String = row.get(3)?;
    let window_end_str: String = row.get(4)?;
    let confidence_str: String = row.get(8)?;
    let categories_json: String = row.get(9)?;
    let status_str: String = row.get(12)?;
    let generated_str: String = row.get(13)?;
    let expires_str: String = row.get(14)?;

    Ok(InsightRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        holiday_event_id: row.get(2)?,
        window_start: NaiveDate::parse_from_str(&window_start_str, "%Y-%m-%d")
            .unwrap_or_default(),
        window_end: NaiveDate::parse_from_str(&window_end_str, "%Y-%m-%d").unwrap_or_default(),
        baseline_spend: row.get(5)?,
        holiday_spend: row.get(6)?,
        pct_change: row.get(7)?,
        confidence: confidence_str.parse().unwrap_or(Confidence::Low),
        top_categories: serde_json::from_str(&categories_json).unwrap_or_default(),
        recommended_adjustment_pct: row.get(10)?,
        explanation: row.get(11)?,
        status: status_str.parse().unwrap_or(InsightStatus::Ok),
        generated_at: parse_datetime(&generated_str),
        expires_at: parse_datetime(&expires_str),
    })
}
