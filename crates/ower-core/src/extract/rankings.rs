//! Hero ranking list for one stat category.

use tracing::debug;

use super::{gate, header, trimmed};
use crate::Result;
use crate::catalog::{GameMode, Platform};
use crate::document::DocumentView;
use crate::types::{HeroRanking, HeroRankings, Outcome};

const PROGRESS_BARS: &str = ".Profile-progressBars";
const CATEGORY_ATTR: &str = "data-category-id";
const PROGRESS_BAR: &str = ".Profile-progressBar";
const BAR_TITLE: &str = ".Profile-progressBar-title";
const BAR_DESCRIPTION: &str = ".Profile-progressBar-description";

/// Hero rankings for `type_key` on one platform and mode.
///
/// The key is resolved against the mode's catalog before the page is
/// inspected, so an unknown key is an error even for missing players.
pub fn hero_rankings<V: DocumentView + ?Sized>(
    view: &V,
    platform: Platform,
    mode: GameMode,
    type_key: &str,
) -> Result<Outcome<HeroRankings>> {
    let category = mode.categories().resolve(type_key)?;

    let Some(visibility) = gate(view) else {
        return Ok(Outcome::NotFound);
    };

    let hero_rankings = if visibility.is_private() {
        Vec::new()
    } else {
        let section = format!(
            ".main-content .{}.Profile-view blz-section.Profile-heroSummary \
             .Profile-heroSummary--view.{} {PROGRESS_BARS}",
            platform.view_class(),
            mode.view_class()
        );
        view.each(&section)
            .into_iter()
            .filter(|bars| bars.attr(CATEGORY_ATTR) == Some(category.id))
            .flat_map(|bars| bars.each(PROGRESS_BAR))
            .map(|bar| HeroRanking {
                hero_label: trimmed(&bar, BAR_TITLE),
                metric_value: trimmed(&bar, BAR_DESCRIPTION),
            })
            .collect()
    };
    debug!(
        "{} {} {}: {} hero rankings",
        platform,
        mode,
        category.key,
        hero_rankings.len()
    );

    Ok(Outcome::Found(HeroRankings {
        is_private: visibility.is_private(),
        header: header(view),
        platform,
        game_mode: mode,
        stat_type: category.key.to_string(),
        hero_rankings,
    }))
}
