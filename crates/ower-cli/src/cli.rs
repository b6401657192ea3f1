//! # CLI Structure and Argument Parsing
//!
//! The `ower` command line follows a command-subcommand pattern:
//!
//! - **Global options**: `--verbose`, `--quiet`, `--debug`, `--format`, `--cache-dir`
//! - **Player commands**: `profile`, `rankings`, `hero`
//! - **Cache maintenance**: `cache sweep`, `cache list`, `cleanup`
//!
//! ```bash
//! ower profile "Player#1234"
//! ower rankings Player-1234 games-won --mode competitive
//! ower hero Player-1234 22 --platform console --refresh
//! ower --format json cache list
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ower_core::{GameMode, Platform, request};

use crate::output::OutputFormat;

/// Main CLI structure for the `ower` command
#[derive(Parser, Clone, Debug)]
#[command(name = "ower")]
#[command(version)]
#[command(about = "ower - cached player career scraping", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Cache directory (overrides configuration and OWER_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Show a player's profile summary and competitive ranks
    Profile {
        /// Player tag, `Name#1234` or `Name-1234`
        tag: String,

        /// Fetch the career page even if it is cached
        #[arg(short, long)]
        refresh: bool,
    },

    /// Show hero rankings for one stat type
    Rankings {
        /// Player tag, `Name#1234` or `Name-1234`
        tag: String,

        /// Stat type key, e.g. `games-won` or `time-played`
        #[arg(value_name = "TYPE")]
        stat_type: String,

        /// Platform: pc or console
        #[arg(short, long, default_value = "pc", value_parser = parse_platform)]
        platform: Platform,

        /// Game mode: quickplay or competitive
        #[arg(short, long, default_value = "quickplay", value_parser = parse_mode)]
        mode: GameMode,

        /// Fetch the career page even if it is cached
        #[arg(short, long)]
        refresh: bool,
    },

    /// Show one hero's detailed stats
    Hero {
        /// Player tag, `Name#1234` or `Name-1234`
        tag: String,

        /// Hero identifier (see `ower heroes`)
        #[arg(value_name = "HERO_ID")]
        hero_id: String,

        /// Platform: pc or console
        #[arg(short, long, default_value = "pc", value_parser = parse_platform)]
        platform: Platform,

        /// Game mode: quickplay or competitive
        #[arg(short, long, default_value = "competitive", value_parser = parse_mode)]
        mode: GameMode,

        /// Fetch the career page even if it is cached
        #[arg(short, long)]
        refresh: bool,
    },

    /// List known heroes and their identifiers
    Heroes,

    /// List the stat types of a game mode
    Types {
        /// Game mode: quickplay or competitive
        #[arg(short, long, default_value = "quickplay", value_parser = parse_mode)]
        mode: GameMode,
    },

    /// Inspect or clean the page cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Run the cleanup sweep on the configured interval until interrupted
    Cleanup {
        /// Override the interval in hours
        #[arg(
            long,
            value_name = "HOURS",
            value_parser = clap::value_parser!(u64).range(1..=ower_core::MAX_SCHEDULE_HOURS)
        )]
        interval_hours: Option<u64>,
    },
}

/// Cache subcommands
#[derive(Subcommand, Clone, Debug)]
pub enum CacheCommands {
    /// Remove entries older than the configured TTL
    Sweep,
    /// List cached pages
    List,
}

fn parse_platform(value: &str) -> Result<Platform, String> {
    request::parse_platform(Some(value)).map_err(|e| e.to_string())
}

fn parse_mode(value: &str) -> Result<GameMode, String> {
    request::parse_mode(Some(value)).map_err(|e| e.to_string())
}
