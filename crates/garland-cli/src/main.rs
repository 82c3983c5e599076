//! Garland CLI - Personal finance tracker with holiday spending insights
//!
//! Usage:
//!   garland init                            Initialize database and seed holidays
//!   garland users add --email a@b --name A  Create a user
//!   garland transactions add ...            Record spending
//!   garland insights --email a@b            Predict holiday spending changes

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db),
                Some(UsersAction::Add {
                    email,
                    name,
                    country,
                }) => commands::cmd_users_add(&db, &email, &name, &country),
                Some(UsersAction::Prefs {
                    email,
                    country,
                    timezone,
                    tags,
                }) => commands::cmd_users_prefs(
                    &db,
                    &email,
                    country.as_deref(),
                    timezone.as_deref(),
                    tags.as_deref(),
                ),
            }
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                TransactionsAction::Add {
                    email,
                    description,
                    amount,
                    category,
                    kind,
                    date,
                } => commands::cmd_transactions_add(
                    &db,
                    &email,
                    &description,
                    amount,
                    &category,
                    &kind,
                    date.as_deref(),
                ),
                TransactionsAction::List { email, limit } => {
                    commands::cmd_transactions_list(&db, &email, limit)
                }
            }
        }
        Commands::Budgets { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                BudgetsAction::Set {
                    email,
                    category,
                    amount,
                    period,
                } => commands::cmd_budgets_set(&db, &email, &category, amount, &period),
                BudgetsAction::List { email } => commands::cmd_budgets_list(&db, &email),
            }
        }
        Commands::Holidays { country, days } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_holidays(&db, &country, days)
        }
        Commands::Insights {
            email,
            window,
            force,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_insights(&db, &email, window, force)
        }
    }
}
