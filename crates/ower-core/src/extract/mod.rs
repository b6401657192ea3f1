//! Typed records from career pages.
//!
//! Every extractor runs the same template: [`gate`] the page (error marker,
//! then private marker), read the always-visible [`header`], then locate the
//! axis-specific wrapper and pull optional fields out of it. Extractors are
//! stateless functions over a [`DocumentView`].

use std::sync::LazyLock;

use regex::Regex;

use crate::document::DocumentView;
use crate::types::PlayerHeader;

pub mod competitive;
pub mod hero_stats;
pub mod profile;
pub mod rankings;

pub use competitive::{parse_rank, rank_table, role_rank};
pub use hero_stats::{hero_sources, hero_stats};
pub use profile::summary;
pub use rankings::hero_rankings;

/// Present when the upstream service has no such player.
pub const ERROR_MARKER: &str = ".error-contain";
/// Present when the player hides their career.
pub const PRIVATE_MARKER: &str = ".Profile-private---msg";

const NAME: &str = "h1.Profile-player--name";
const TITLE: &str = "h2.Profile-player--title";
const PORTRAIT: &str = ".Profile-player--portrait";
const ENDORSEMENT: &str = ".Profile-playerSummary--endorsement";

#[allow(clippy::unwrap_used)]
static ENDORSEMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"endorsement/(\d+)").unwrap());

/// What the page markers say about a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Career data is shown
    Public,
    /// Only the header is shown
    Private,
}

impl Visibility {
    /// Whether gated fields must stay empty.
    pub const fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }
}

/// Check the page markers. `None` means the error marker is present and the
/// caller must stop without querying anything else.
pub fn gate<V: DocumentView + ?Sized>(view: &V) -> Option<Visibility> {
    if view.exists(ERROR_MARKER) {
        return None;
    }
    if view.exists(PRIVATE_MARKER) {
        Some(Visibility::Private)
    } else {
        Some(Visibility::Public)
    }
}

/// Fields shown on every existing profile.
pub fn header<V: DocumentView + ?Sized>(view: &V) -> PlayerHeader {
    PlayerHeader {
        display_name: view.text(NAME).trim().to_string(),
        title: view.text(TITLE).trim().to_string(),
        icon_ref: view
            .attr(PORTRAIT, "src")
            .map(|src| src.trim().to_string())
            .unwrap_or_default(),
        endorsement_level: view
            .attr(ENDORSEMENT, "src")
            .and_then(|src| capture_number(&ENDORSEMENT_RE, &src)),
    }
}

/// First capture group of `re` in `haystack`, parsed as a number.
pub(crate) fn capture_number(re: &Regex, haystack: &str) -> Option<u32> {
    re.captures(haystack)?.get(1)?.as_str().parse().ok()
}

/// Trimmed text of `selector` under `view`.
pub(crate) fn trimmed<V: DocumentView + ?Sized>(view: &V, selector: &str) -> String {
    view.text(selector).trim().to_string()
}
