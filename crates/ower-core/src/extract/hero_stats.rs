//! Per-hero stat blocks.

use tracing::debug;

use super::{gate, header, trimmed};
use crate::Result;
use crate::catalog::{GameMode, HeroCatalog, Platform};
use crate::document::DocumentView;
use crate::types::{HeroStat, HeroStatBlock, HeroStatCategory, Outcome};

const HERO_OPTIONS: &str =
    r#".Profile-heroSummary--header select[data-dropdown-id="hero-dropdown"] option"#;
const STATS_CONTAINER: &str = "span.stats-container";
const CATEGORY: &str = ".category";
const CATEGORY_NAME: &str = ".header p";
const STAT_ITEM: &str = ".content .stat-item";
const STAT_NAME: &str = ".name";
const STAT_VALUE: &str = ".value";

/// One entry of the page's hero dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroSource {
    /// Hero name as the page labels it
    pub label: String,
    /// Page-local identifier selecting the hero's stat container
    pub source_id: String,
}

fn stats_section(platform: Platform, mode: GameMode) -> String {
    format!(
        ".{}.Profile-view blz-section.stats.{}",
        platform.view_class(),
        mode.view_class()
    )
}

/// Heroes listed in the dropdown of one platform and mode, in page order.
pub fn hero_sources<V: DocumentView + ?Sized>(
    view: &V,
    platform: Platform,
    mode: GameMode,
) -> Vec<HeroSource> {
    view.each(&format!("{} {HERO_OPTIONS}", stats_section(platform, mode)))
        .iter()
        .filter_map(|option| {
            Some(HeroSource {
                label: option.attr("option-id")?.to_string(),
                source_id: option.attr("value")?.to_string(),
            })
        })
        .collect()
}

/// Stat block of the hero with catalog identifier `hero_id`.
///
/// An identifier missing from `heroes` is an error. A known hero that the
/// page does not list yields [`Outcome::HeroNotPresent`].
pub fn hero_stats<V: DocumentView + ?Sized>(
    view: &V,
    platform: Platform,
    mode: GameMode,
    heroes: &HeroCatalog,
    hero_id: &str,
) -> Result<Outcome<HeroStatBlock>> {
    let hero = heroes.resolve(hero_id)?;

    let Some(visibility) = gate(view) else {
        return Ok(Outcome::NotFound);
    };

    let mut block = HeroStatBlock {
        is_private: visibility.is_private(),
        header: header(view),
        platform,
        game_mode: mode,
        hero_id: hero.hero_id,
        hero_name: hero.hero_name.clone(),
        hero_source_id: None,
        categories: Vec::new(),
    };
    if visibility.is_private() {
        return Ok(Outcome::Found(block));
    }

    let Some(source) = hero_sources(view, platform, mode)
        .into_iter()
        .find(|source| source.label == hero.hero_name)
    else {
        debug!("{} is not listed for {} {}", hero.hero_name, platform, mode);
        return Ok(Outcome::HeroNotPresent {
            hero_id: hero.hero_id,
            hero_name: hero.hero_name.clone(),
        });
    };

    let option_class = format!("option-{}", source.source_id);
    let containers = view.each(&format!("{} {STATS_CONTAINER}", stats_section(platform, mode)));
    if let Some(container) = containers.iter().find(|c| c.has_class(&option_class)) {
        block.categories = container
            .each(CATEGORY)
            .iter()
            .map(|category| HeroStatCategory {
                category_name: trimmed(category, CATEGORY_NAME),
                stats: category
                    .each(STAT_ITEM)
                    .iter()
                    .map(|item| HeroStat {
                        stat_name: trimmed(item, STAT_NAME),
                        stat_value: trimmed(item, STAT_VALUE),
                    })
                    .collect(),
            })
            .collect();
    }
    debug!(
        "{} {} {}: {} stat categories",
        platform,
        mode,
        hero.hero_name,
        block.categories.len()
    );
    block.hero_source_id = Some(source.source_id);
    Ok(Outcome::Found(block))
}
