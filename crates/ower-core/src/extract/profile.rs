//! Profile summary.

use super::competitive::collect_ranks;
use super::{gate, header};
use crate::document::DocumentView;
use crate::types::{CompetitiveRankTable, Outcome, ProfileSummary};

/// Header fields plus the competitive rank table of both platforms.
pub fn summary<V: DocumentView + ?Sized>(view: &V) -> Outcome<ProfileSummary> {
    let Some(visibility) = gate(view) else {
        return Outcome::NotFound;
    };
    let competitive = if visibility.is_private() {
        CompetitiveRankTable::default()
    } else {
        collect_ranks(view)
    };
    Outcome::Found(ProfileSummary {
        is_private: visibility.is_private(),
        header: header(view),
        competitive,
    })
}
