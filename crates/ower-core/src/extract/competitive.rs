//! Competitive rank per (platform, role).

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{capture_number, gate};
use crate::catalog::{Platform, Role};
use crate::document::{DocumentView, Node};
use crate::types::{CompetitiveRankTable, CompetitiveRanks, Outcome, RankEntry};

const ROLE_WRAPPER: &str = ".Profile-playerSummary--roleWrapper";
const ROLE_ICON_IMG: &str = ".Profile-playerSummary--role img";
const ROLE_ICON_SVG: &str = ".Profile-playerSummary--role svg use";
const RANK_IMAGE: &str = ".Profile-playerSummary--rank";

#[allow(clippy::unwrap_used)]
static RANK_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"rank/(.*?)-\w+").unwrap());

#[allow(clippy::unwrap_used)]
static DIVISION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"TierDivision_(\d+)").unwrap());

#[allow(clippy::unwrap_used)]
static INLINE_TIER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"rank/.*?-(\d+)").unwrap());

/// Rank table for both platforms and all roles.
///
/// Private profiles yield `is_private` and an empty table.
pub fn rank_table<V: DocumentView + ?Sized>(view: &V) -> Outcome<CompetitiveRanks> {
    let Some(visibility) = gate(view) else {
        return Outcome::NotFound;
    };
    if visibility.is_private() {
        return Outcome::Found(CompetitiveRanks {
            is_private: true,
            ranks: CompetitiveRankTable::default(),
        });
    }
    Outcome::Found(CompetitiveRanks {
        is_private: false,
        ranks: collect_ranks(view),
    })
}

pub(super) fn collect_ranks<V: DocumentView + ?Sized>(view: &V) -> CompetitiveRankTable {
    let mut table = CompetitiveRankTable::default();
    for platform in Platform::ALL {
        for role in Role::ALL {
            table.set(platform, role, role_rank(view, platform, role));
        }
    }
    table
}

/// Rank of one cell, `None` when the page has no wrapper for it.
///
/// Does not check the page markers; use [`rank_table`] for a gated read.
pub fn role_rank<V: DocumentView + ?Sized>(
    view: &V,
    platform: Platform,
    role: Role,
) -> Option<RankEntry> {
    let wrappers = format!(
        ".{}.Profile-playerSummary--rankWrapper {ROLE_WRAPPER}",
        platform.view_class()
    );
    let fragment = role.icon_fragment();
    let wrapper = view
        .each(&wrappers)
        .into_iter()
        .find(|wrapper| role_icons(wrapper).iter().any(|icon| icon.contains(fragment)))?;

    let images: Vec<&str> = wrapper
        .each(RANK_IMAGE)
        .iter()
        .filter_map(|image| image.attr("src"))
        .collect();
    let entry = parse_rank(&images);
    debug!("{} {} rank: {:?}", platform, role, entry);
    Some(entry)
}

fn role_icons(wrapper: &Node<'_>) -> Vec<String> {
    let images = wrapper.each(ROLE_ICON_IMG);
    let references = wrapper.each(ROLE_ICON_SVG);
    images
        .iter()
        .filter_map(|image| image.attr("src"))
        .chain(references.iter().filter_map(|reference| reference.attr("xlink:href")))
        .map(str::to_lowercase)
        .collect()
}

/// Rank from the image references of one role wrapper.
///
/// The first reference names the rank (`rank/Gold-3` → `Gold`, with any
/// `Tier` suffix dropped). The second, when present, carries the division
/// (`rank/TierDivision_3-2` → 3). A single reference carries both
/// (`rank/GoldTier-3`). Unreadable parts degrade to an empty name and tier 0.
pub fn parse_rank(images: &[&str]) -> RankEntry {
    let Some(first) = images.first() else {
        return RankEntry {
            rank_name: String::new(),
            rank_tier: 0,
        };
    };

    let rank_name = RANK_NAME_RE
        .captures(first)
        .and_then(|caps| caps.get(1))
        .map(|name| name.as_str().replace("Tier", ""))
        .unwrap_or_default();

    let rank_tier = match images.get(1) {
        Some(second) => capture_number(&DIVISION_RE, second),
        None => capture_number(&INLINE_TIER_RE, first),
    }
    .unwrap_or(0);

    RankEntry { rank_name, rank_tier }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::extract::fixtures::{ERROR_PAGE, PRIVATE_PAGE, PUBLIC_PAGE};

    fn entry(name: &str, tier: u32) -> RankEntry {
        RankEntry {
            rank_name: name.to_string(),
            rank_tier: tier,
        }
    }

    #[test]
    fn test_two_image_form() {
        assert_eq!(
            parse_rank(&[
                "https://cdn.example/rank/Gold-3",
                "https://cdn.example/rank/TierDivision_3-2",
            ]),
            entry("Gold", 3)
        );
        // Order matters: the first image is always read as the name.
        assert_eq!(
            parse_rank(&[
                "https://cdn.example/rank/TierDivision_3-2",
                "https://cdn.example/rank/Gold-3",
            ]),
            entry("Division_3", 0)
        );
    }

    #[test]
    fn test_single_image_forms() {
        assert_eq!(parse_rank(&["/img/rank/GoldTier-3"]), entry("Gold", 3));
        assert_eq!(parse_rank(&["/img/rank/Gold-3"]), entry("Gold", 3));
        assert_eq!(parse_rank(&["/img/rank/Master-abc"]), entry("Master", 0));
    }

    #[test]
    fn test_unreadable_images_degrade() {
        assert_eq!(parse_rank(&[]), entry("", 0));
        assert_eq!(parse_rank(&["/img/other/thing.png"]), entry("", 0));
    }

    #[test]
    fn test_rank_table_from_page() {
        let found = rank_table(&Document::parse(PUBLIC_PAGE)).found().unwrap_or_default();
        assert!(!found.is_private);
        let table = found.ranks;

        assert_eq!(table.get(Platform::Pc, Role::Tank), Some(&entry("Diamond", 2)));
        assert_eq!(table.get(Platform::Pc, Role::Damage), Some(&entry("Gold", 3)));
        assert_eq!(table.get(Platform::Pc, Role::Support), None);
        assert_eq!(table.get(Platform::Console, Role::Support), Some(&entry("Platinum", 4)));
        assert_eq!(table.get(Platform::Console, Role::Tank), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_damage_matches_offense_icon_only() {
        let page = r#"
            <div class="mouseKeyboard-view Profile-playerSummary--rankWrapper">
              <div class="Profile-playerSummary--roleWrapper">
                <div class="Profile-playerSummary--role"><img src="/role/damage.svg"></div>
                <img class="Profile-playerSummary--rank" src="/rank/Silver-1">
              </div>
            </div>"#;
        let doc = Document::parse(page);
        assert_eq!(role_rank(&doc, Platform::Pc, Role::Damage), None);

        let page = page.replace("/role/damage.svg", "/role/Offense.svg");
        let doc = Document::parse(&page);
        assert_eq!(role_rank(&doc, Platform::Pc, Role::Damage), Some(entry("Silver", 1)));
        assert_eq!(role_rank(&doc, Platform::Pc, Role::Tank), None);
        assert_eq!(role_rank(&doc, Platform::Console, Role::Damage), None);
    }

    #[test]
    fn test_wrapper_without_rank_image() {
        let page = r#"
            <div class="controller-view Profile-playerSummary--rankWrapper">
              <div class="Profile-playerSummary--roleWrapper">
                <div class="Profile-playerSummary--role"><img src="/role/tank.svg"></div>
              </div>
            </div>"#;
        let doc = Document::parse(page);
        assert_eq!(role_rank(&doc, Platform::Console, Role::Tank), Some(entry("", 0)));
    }

    #[test]
    fn test_private_page_hides_ranks() {
        let private = rank_table(&Document::parse(PRIVATE_PAGE)).found().unwrap_or_default();
        assert!(private.is_private);
        assert!(private.ranks.is_empty());

        let unranked = Document::parse(
            r#"<div class="main-content"><h1 class="Profile-player--name">Plain</h1></div>"#,
        );
        let public = rank_table(&unranked).found().unwrap_or_default();
        assert!(!public.is_private);
        assert!(public.ranks.is_empty());
        assert_ne!(private, public);
        assert_eq!(serde_json::to_value(&private).unwrap_or_default()["private"], true);
    }

    #[test]
    fn test_error_page_short_circuits() {
        let doc = Document::parse(ERROR_PAGE);
        assert_eq!(rank_table(&doc), Outcome::NotFound);
        assert_eq!(doc.query_count(), 1);
    }
}
