//! User account and preference operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{User, UserPreferences};

impl Database {
    /// Create a user, returning the new id
    pub fn create_user(&self, email: &str, name: &str, country_code: &str) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (email, name, country_code) VALUES (?, ?, ?)",
            params![email, name, country_code],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, email, name, country_code, timezone, culture_tags, calendar_opt_in, created_at
                 FROM users WHERE id = ?",
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, email, name, country_code, timezone, culture_tags, calendar_opt_in, created_at
                 FROM users WHERE email = ?",
                params![email],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, email, name, country_code, timezone, culture_tags, calendar_opt_in, created_at
             FROM users ORDER BY id",
        )?;
        let rows = stmt.query_map([], row_to_user)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Update only the preference fields that are set
    pub fn update_user_preferences(&self, user_id: i64, prefs: &UserPreferences) -> Result<User> {
        let conn = self.conn()?;

        if let Some(country) = &prefs.country_code {
            conn.execute(
                "UPDATE users SET country_code = ? WHERE id = ?",
                params![country, user_id],
            )?;
        }
        if let Some(tz) = &prefs.timezone {
            conn.execute(
                "UPDATE users SET timezone = ? WHERE id = ?",
                params![tz, user_id],
            )?;
        }
        if let Some(tags) = &prefs.culture_tags {
            conn.execute(
                "UPDATE users SET culture_tags = ? WHERE id = ?",
                params![serde_json::to_string(tags)?, user_id],
            )?;
        }
        if let Some(opt_in) = prefs.calendar_opt_in {
            conn.execute(
                "UPDATE users SET calendar_opt_in = ? WHERE id = ?",
                params![opt_in, user_id],
            )?;
        }

        drop(conn);
        self.get_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))
    }
}

/// Helper to convert a row to User
fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    let tags_json: String = row.get(5)?;
    let created_str: String = row.get(7)?;

    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        country_code: row.get(3)?,
        timezone: row.get(4)?,
        // Malformed tag payloads decode to an empty list rather than failing
        culture_tags: serde_json::from_str(&tags_json).unwrap_or_default(),
        calendar_opt_in: row.get(6)?,
        created_at: parse_datetime(&created_str),
    })
}
