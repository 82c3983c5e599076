//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Garland - Personal finance tracker with holiday spending insights
#[derive(Parser)]
#[command(name = "garland")]
#[command(about = "Self-hosted finance tracker that predicts holiday spending", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "garland.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set GARLAND_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and seed curated holidays
    Init,

    /// Show database status (encryption, size, record counts)
    Status,

    /// Manage users
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },

    /// Record and list transactions
    Transactions {
        #[command(subcommand)]
        action: TransactionsAction,
    },

    /// Manage budget caps
    Budgets {
        #[command(subcommand)]
        action: BudgetsAction,
    },

    /// List upcoming holidays, fetching from the provider if configured
    Holidays {
        /// Country code (defaults to US)
        #[arg(long, default_value = "US")]
        country: String,

        /// How many days ahead to look
        #[arg(long, default_value = "60")]
        days: i64,
    },

    /// Compute holiday spending insights for a user
    Insights {
        /// Email of the user to analyze
        #[arg(short, long)]
        email: String,

        /// How many days ahead to look for holidays
        #[arg(short, long, default_value = "30")]
        window: i64,

        /// Recompute even when a fresh cached insight exists
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// Create a user
    Add {
        #[arg(long)]
        email: String,

        #[arg(long)]
        name: String,

        /// ISO country code for the holiday calendar
        #[arg(long, default_value = "US")]
        country: String,
    },

    /// List users
    List,

    /// Update a user's preferences
    Prefs {
        #[arg(long)]
        email: String,

        /// New country code
        #[arg(long)]
        country: Option<String>,

        /// New timezone
        #[arg(long)]
        timezone: Option<String>,

        /// Comma-separated interest tags (e.g. "diwali,eid"); pass "" to clear
        #[arg(long)]
        tags: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// Record a transaction
    Add {
        #[arg(long)]
        email: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        amount: f64,

        #[arg(long)]
        category: String,

        /// income or expense
        #[arg(long, default_value = "expense")]
        kind: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// List recent transactions
    List {
        #[arg(long)]
        email: String,

        #[arg(long, default_value = "20")]
        limit: i64,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// Create a budget cap for a category
    Set {
        #[arg(long)]
        email: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        amount: f64,

        /// weekly, monthly, or yearly
        #[arg(long, default_value = "monthly")]
        period: String,
    },

    /// List a user's budgets
    List {
        #[arg(long)]
        email: String,
    },
}
