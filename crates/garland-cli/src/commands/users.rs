//! User management command implementations

use anyhow::Result;
use garland_core::db::Database;
use garland_core::models::UserPreferences;

use super::require_user;

pub fn cmd_users_add(db: &Database, email: &str, name: &str, country: &str) -> Result<()> {
    let id = db.create_user(email, name, country)?;
    println!("✅ Created user {} ({}) [id {}]", name, email, id);
    Ok(())
}

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users yet. Create one with:");
        println!("  garland users add --email you@example.com --name You");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   ─────────────────────────────");

    for user in users {
        let tags = if user.culture_tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", user.culture_tags.join(", "))
        };
        println!("   {} <{}> ({}){}", user.name, user.email, user.country_code, tags);
    }

    Ok(())
}

pub fn cmd_users_prefs(
    db: &Database,
    email: &str,
    country: Option<&str>,
    timezone: Option<&str>,
    tags: Option<&str>,
) -> Result<()> {
    let user = require_user(db, email)?;

    let culture_tags = tags.map(|raw| {
        raw.split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
    });

    let updated = db.update_user_preferences(
        user.id,
        &UserPreferences {
            country_code: country.map(String::from),
            timezone: timezone.map(String::from),
            culture_tags,
            calendar_opt_in: None,
        },
    )?;

    println!("✅ Updated preferences for {}", updated.email);
    println!("   Country: {}", updated.country_code);
    println!("   Timezone: {}", updated.timezone);
    if updated.culture_tags.is_empty() {
        println!("   Tags: (none - all holidays shown)");
    } else {
        println!("   Tags: {}", updated.culture_tags.join(", "));
    }

    Ok(())
}
