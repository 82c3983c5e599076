//! Holiday event store operations

use std::collections::HashSet;

use chrono::NaiveDate;
use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::insights::window::DateRange;
use crate::models::{EventKind, HolidayEvent, NewHolidayEvent};

impl Database {
    /// Insert an event, skipping rows that collide on (name, date, country)
    ///
    /// Returns the new id, or None when an identical key already exists.
    pub fn insert_event(&self, event: &NewHolidayEvent) -> Result<Option<i64>> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO holiday_events (name, date, country_code, kind, tags, source)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                event.name,
                event.date.to_string(),
                event.country_code,
                event.kind.as_str(),
                serde_json::to_string(&event.tags)?,
                event.source,
            ],
        )?;

        if inserted == 0 {
            return Ok(None);
        }
        Ok(Some(conn.last_insert_rowid()))
    }

    /// Events for a country inside an inclusive date range, date ascending
    pub fn events_between(
        &self,
        country_code: &str,
        range: &DateRange,
    ) -> Result<Vec<HolidayEvent>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, date, country_code, kind, tags, source, created_at
            FROM holiday_events
            WHERE country_code = ?1 AND date BETWEEN ?2 AND ?3
            ORDER BY date ASC, id ASC
            "#,
        )?;
        let rows = stmt.query_map(
            params![country_code, range.start.to_string(), range.end.to_string()],
            row_to_event,
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Prior occurrences of a named event, newest first
    ///
    /// Matches rows sharing (name, country) with date strictly before `before`
    /// and no older than `not_before`.
    pub fn events_named_before(
        &self,
        name: &str,
        country_code: &str,
        before: NaiveDate,
        not_before: NaiveDate,
    ) -> Result<Vec<HolidayEvent>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, date, country_code, kind, tags, source, created_at
            FROM holiday_events
            WHERE country_code = ?1 AND name = ?2
              AND date < ?3 AND date >= ?4
            ORDER BY date DESC
            "#,
        )?;
        let rows = stmt.query_map(
            params![
                country_code,
                name,
                before.to_string(),
                not_before.to_string()
            ],
            row_to_event,
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Count events from one source for a country inside a date range
    ///
    /// The provider uses this to skip years it has already populated.
    pub fn count_events_from_source(
        &self,
        country_code: &str,
        source: &str,
        range: &DateRange,
    ) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM holiday_events
            WHERE country_code = ?1 AND source = ?2 AND date BETWEEN ?3 AND ?4
            "#,
            params![
                country_code,
                source,
                range.start.to_string(),
                range.end.to_string()
            ],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// (name, date) keys already stored for a country inside a date range
    pub fn event_keys_between(
        &self,
        country_code: &str,
        range: &DateRange,
    ) -> Result<HashSet<(String, NaiveDate)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT name, date FROM holiday_events WHERE country_code = ?1 AND date BETWEEN ?2 AND ?3",
        )?;
        let rows = stmt.query_map(
            params![country_code, range.start.to_string(), range.end.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                ))
            },
        )?;

        let mut keys = HashSet::new();
        for row in rows {
            let (name, date_str) = row?;
            if let Ok(date) = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d") {
                keys.insert((name, date));
            }
        }
        Ok(keys)
    }
}

/// Helper to convert a row to HolidayEvent
fn row_to_event(row: &rusqlite::Row) -> rusqlite::Result<HolidayEvent> {
    let date_str: String = row.get(2)?;
    let kind_str: String = row.get(4)?;
    let tags_json: String = row.get(5)?;
    let created_str: String = row.get(7)?;

    Ok(HolidayEvent {
        id: row.get(0)?,
        name: row.get(1)?,
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?,
        country_code: row.get(3)?,
        kind: kind_str.parse().unwrap_or(EventKind::Cultural),
        // Malformed tag payloads decode to an empty list rather than failing
        tags: serde_json::from_str(&tags_json).unwrap_or_default(),
        source: row.get(6)?,
        created_at: parse_datetime(&created_str),
    })
}
