//! CLI argument parsing tests

use clap::CommandFactory;
use clap::Parser;

use crate::cli::{Cli, Commands};

#[test]
fn test_cli_structure_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_insights_defaults() {
    let cli = Cli::parse_from(["garland", "insights", "--email", "a@b.com"]);
    match cli.command {
        Commands::Insights {
            email,
            window,
            force,
        } => {
            assert_eq!(email, "a@b.com");
            assert_eq!(window, 30);
            assert!(!force);
        }
        _ => panic!("Expected insights command"),
    }
}

#[test]
fn test_global_flags() {
    let cli = Cli::parse_from([
        "garland",
        "--db",
        "custom.db",
        "--no-encrypt",
        "insights",
        "--email",
        "a@b.com",
        "--force",
    ]);
    assert_eq!(cli.db.to_str().unwrap(), "custom.db");
    assert!(cli.no_encrypt);
    match cli.command {
        Commands::Insights { force, .. } => assert!(force),
        _ => panic!("Expected insights command"),
    }
}

#[test]
fn test_holidays_defaults() {
    let cli = Cli::parse_from(["garland", "holidays"]);
    match cli.command {
        Commands::Holidays { country, days } => {
            assert_eq!(country, "US");
            assert_eq!(days, 60);
        }
        _ => panic!("Expected holidays command"),
    }
}
