//! Player commands: profile, rankings, hero

use anyhow::{Context, Result};
use colored::Colorize;
use ower_core::{
    Config, GameMode, HeroRankings, HeroStatBlock, Outcome, Platform, PlayerHeader,
    ProfileService, ProfileSummary, RankEntry, Response, Role, request,
};
use serde::Serialize;

use crate::output::{OutputFormat, print_json};

/// Execute the profile command
pub async fn profile(
    config: &Config,
    tag: &str,
    refresh: bool,
    format: OutputFormat,
) -> Result<()> {
    let tag = request::require_tag(Some(tag))?;
    let service = ProfileService::from_config(config)?;
    let outcome = service
        .player_info(tag, refresh)
        .await
        .with_context(|| format!("Failed to load profile for '{tag}'"))?;
    emit(&outcome, tag, format, print_profile)
}

/// Execute the rankings command
pub async fn rankings(
    config: &Config,
    tag: &str,
    stat_type: &str,
    platform: Platform,
    mode: GameMode,
    refresh: bool,
    format: OutputFormat,
) -> Result<()> {
    let tag = request::require_tag(Some(tag))?;
    let service = ProfileService::from_config(config)?;
    let outcome = service
        .hero_rankings(tag, platform, mode, stat_type, refresh)
        .await
        .with_context(|| format!("Failed to load {stat_type} rankings for '{tag}'"))?;
    emit(&outcome, tag, format, print_rankings)
}

/// Execute the hero command
pub async fn hero(
    config: &Config,
    tag: &str,
    hero_id: &str,
    platform: Platform,
    mode: GameMode,
    refresh: bool,
    format: OutputFormat,
) -> Result<()> {
    let tag = request::require_tag(Some(tag))?;
    let service = ProfileService::from_config(config)?;
    let outcome = service
        .hero_stats(tag, platform, mode, hero_id, refresh)
        .await
        .with_context(|| format!("Failed to load hero {hero_id} for '{tag}'"))?;
    emit(&outcome, tag, format, print_hero)
}

fn emit<T: Serialize>(
    outcome: &Outcome<Response<T>>,
    tag: &str,
    format: OutputFormat,
    render: fn(&Response<T>),
) -> Result<()> {
    if format.is_machine() {
        return print_json(outcome);
    }
    match outcome {
        Outcome::Found(response) => render(response),
        Outcome::NotFound => println!("Player '{tag}' not found."),
        Outcome::HeroNotPresent { hero_id, hero_name } => {
            println!("{hero_name} (heroID {hero_id}) has no stats on this profile.");
        },
    }
    Ok(())
}

fn print_header(response_tag: &str, header: &PlayerHeader, private: bool, cached: bool) {
    let mut line = format!(
        "{} {}",
        header.display_name.bold(),
        format!("({response_tag})").bright_black()
    );
    if private {
        line.push_str(&format!(" {}", "[private]".yellow()));
    }
    if cached {
        line.push_str(&format!(" {}", "(cached)".bright_black()));
    }
    println!("{line}");
}

fn rank_label(rank: Option<&RankEntry>) -> String {
    match rank {
        Some(rank) if rank.rank_name.is_empty() => "unranked".to_string(),
        Some(rank) => format!("{} {}", rank.rank_name, rank.rank_tier),
        None => "-".to_string(),
    }
}

fn print_profile(response: &Response<ProfileSummary>) {
    let summary = &response.data;
    print_header(&response.player.tag, &summary.header, summary.is_private, response.cached);
    if !summary.header.title.is_empty() {
        println!("  Title: {}", summary.header.title);
    }
    if let Some(level) = summary.header.endorsement_level {
        println!("  Endorsement: {level}");
    }
    if summary.is_private {
        return;
    }
    if summary.competitive.is_empty() {
        println!("  No competitive ranks");
        return;
    }
    for platform in Platform::ALL {
        let ranks = Role::ALL
            .iter()
            .map(|role| {
                format!(
                    "{}: {}",
                    role,
                    rank_label(summary.competitive.get(platform, *role))
                )
            })
            .collect::<Vec<_>>()
            .join("   ");
        println!("  {:<8} {}", platform.to_string().to_uppercase(), ranks);
    }
}

fn print_rankings(response: &Response<HeroRankings>) {
    let rankings = &response.data;
    print_header(&response.player.tag, &rankings.header, rankings.is_private, response.cached);
    println!(
        "  {} · {} · {}",
        rankings.stat_type.cyan(),
        rankings.game_mode,
        rankings.platform
    );
    if rankings.hero_rankings.is_empty() {
        println!("  No rankings");
        return;
    }
    let width = rankings
        .hero_rankings
        .iter()
        .map(|r| r.hero_label.chars().count())
        .max()
        .unwrap_or(0);
    for (idx, ranking) in rankings.hero_rankings.iter().enumerate() {
        println!(
            "  {:>2}. {:<width$}  {}",
            idx + 1,
            ranking.hero_label,
            ranking.metric_value
        );
    }
}

fn print_hero(response: &Response<HeroStatBlock>) {
    let block = &response.data;
    print_header(&response.player.tag, &block.header, block.is_private, response.cached);
    println!(
        "  {} · {} · {}",
        block.hero_name.cyan(),
        block.game_mode,
        block.platform
    );
    if block.categories.is_empty() {
        println!("  No stats");
        return;
    }
    for category in &block.categories {
        println!("  {}", category.category_name.bold());
        for stat in &category.stats {
            println!("    {:<32} {}", stat.stat_name, stat.stat_value);
        }
    }
}
