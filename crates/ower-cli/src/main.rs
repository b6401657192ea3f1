//! ower CLI - cached player career scraping
//!
//! This is the main entry point for the ower command-line interface.
//! Command implementations live in [`commands`].

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use ower_core::Config;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod commands;
mod output;

use cli::{CacheCommands, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let config = load_config(&cli)?;
    execute_command(cli, &config).await
}

fn initialize_logging(cli: &Cli) -> Result<()> {
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose || cli.debug {
        Level::DEBUG
    } else if cli.format.is_machine() {
        // Keep stderr quiet for scripts unless asked otherwise.
        Level::WARN
    } else {
        Level::INFO
    };

    let stderr = std::io::stderr();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(stderr.is_terminal() && std::env::var_os("NO_COLOR").is_none())
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(dir) = &cli.cache_dir {
        config.cache.dir.clone_from(dir);
    }
    Ok(config)
}

async fn execute_command(cli: Cli, config: &Config) -> Result<()> {
    let format = cli.format;
    match cli.command {
        Commands::Profile { tag, refresh } => {
            commands::show_profile(config, &tag, refresh, format).await?;
        },

        Commands::Rankings {
            tag,
            stat_type,
            platform,
            mode,
            refresh,
        } => {
            commands::show_rankings(config, &tag, &stat_type, platform, mode, refresh, format)
                .await?;
        },

        Commands::Hero {
            tag,
            hero_id,
            platform,
            mode,
            refresh,
        } => {
            commands::show_hero(config, &tag, &hero_id, platform, mode, refresh, format).await?;
        },

        Commands::Heroes => commands::list_heroes(config, format)?,

        Commands::Types { mode } => commands::list_types(mode, format)?,

        Commands::Cache { command } => match command {
            CacheCommands::Sweep => commands::sweep_cache(config, format)?,
            CacheCommands::List => commands::list_cache(config, format)?,
        },

        Commands::Cleanup { interval_hours } => {
            commands::run_cleanup_loop(config, interval_hours).await?;
        },
    }

    Ok(())
}
