//! Records produced by the extractors.

use serde::{Deserialize, Serialize};

use crate::catalog::{GameMode, Platform, Role};

/// Result of an extraction that may legitimately find nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Outcome<T> {
    /// The record was extracted.
    Found(T),
    /// The page carries the upstream error marker: no such player.
    NotFound,
    /// The hero is known but does not appear on this profile.
    #[serde(rename_all = "camelCase")]
    HeroNotPresent {
        /// Caller-supplied hero identifier
        #[serde(rename = "heroID")]
        hero_id: u32,
        /// Catalog name the page was searched for
        hero_name: String,
    },
}

impl<T> Outcome<T> {
    /// The found record, if any.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }

    /// Whether a record was found.
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Map the found record, keeping the other outcomes.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Found(value) => Outcome::Found(f(value)),
            Self::NotFound => Outcome::NotFound,
            Self::HeroNotPresent { hero_id, hero_name } => {
                Outcome::HeroNotPresent { hero_id, hero_name }
            },
        }
    }
}

/// Fields visible on every existing profile, private or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerHeader {
    #[serde(rename = "playerName")]
    pub display_name: String,
    #[serde(rename = "playerTitle")]
    pub title: String,
    #[serde(rename = "playerIcon")]
    pub icon_ref: String,
    /// `None` when the endorsement badge is missing or unreadable
    pub endorsement_level: Option<u32>,
}

/// A competitive rank: tier name plus division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankEntry {
    pub rank_name: String,
    pub rank_tier: u32,
}

/// Ranks of one platform, per role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRanks {
    #[serde(rename = "Tank")]
    pub tank: Option<RankEntry>,
    #[serde(rename = "Damage")]
    pub damage: Option<RankEntry>,
    #[serde(rename = "Support")]
    pub support: Option<RankEntry>,
}

impl RoleRanks {
    /// Rank for `role`.
    pub const fn get(&self, role: Role) -> Option<&RankEntry> {
        match role {
            Role::Tank => self.tank.as_ref(),
            Role::Damage => self.damage.as_ref(),
            Role::Support => self.support.as_ref(),
        }
    }

    fn slot(&mut self, role: Role) -> &mut Option<RankEntry> {
        match role {
            Role::Tank => &mut self.tank,
            Role::Damage => &mut self.damage,
            Role::Support => &mut self.support,
        }
    }
}

/// (platform, role) → rank. Every cell is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitiveRankTable {
    #[serde(rename = "PC")]
    pub pc: RoleRanks,
    #[serde(rename = "Console")]
    pub console: RoleRanks,
}

impl CompetitiveRankTable {
    /// Ranks of one platform.
    pub const fn platform(&self, platform: Platform) -> &RoleRanks {
        match platform {
            Platform::Pc => &self.pc,
            Platform::Console => &self.console,
        }
    }

    /// Rank of one cell.
    pub const fn get(&self, platform: Platform, role: Role) -> Option<&RankEntry> {
        self.platform(platform).get(role)
    }

    /// Replace one cell.
    pub fn set(&mut self, platform: Platform, role: Role, entry: Option<RankEntry>) {
        let ranks = match platform {
            Platform::Pc => &mut self.pc,
            Platform::Console => &mut self.console,
        };
        *ranks.slot(role) = entry;
    }

    /// Number of filled cells.
    pub fn len(&self) -> usize {
        Platform::ALL
            .iter()
            .flat_map(|p| Role::ALL.iter().map(move |r| (*p, *r)))
            .filter(|(p, r)| self.get(*p, *r).is_some())
            .count()
    }

    /// Whether no cell is filled.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Competitive ranks on their own, tagged with the page's privacy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompetitiveRanks {
    #[serde(rename = "private")]
    pub is_private: bool,
    /// Empty for private profiles
    #[serde(rename = "playerCompetitiveInfo")]
    pub ranks: CompetitiveRankTable,
}

/// Profile summary: header plus the competitive rank table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    #[serde(rename = "private")]
    pub is_private: bool,
    #[serde(flatten)]
    pub header: PlayerHeader,
    /// Empty for private profiles
    #[serde(rename = "playerCompetitiveInfo")]
    pub competitive: CompetitiveRankTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroRanking {
    #[serde(rename = "heroName")]
    pub hero_label: String,
    #[serde(rename = "heroData")]
    pub metric_value: String,
}

/// Hero ranking list for one (platform, mode, stat category).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroRankings {
    #[serde(rename = "private")]
    pub is_private: bool,
    #[serde(flatten)]
    pub header: PlayerHeader,
    pub platform: Platform,
    pub game_mode: GameMode,
    /// Lowercased stat type key
    #[serde(rename = "type")]
    pub stat_type: String,
    /// Document order; empty for private profiles
    pub hero_rankings: Vec<HeroRanking>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroStat {
    pub stat_name: String,
    pub stat_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroStatCategory {
    pub category_name: String,
    #[serde(rename = "categoryData")]
    pub stats: Vec<HeroStat>,
}

/// Detailed stats of one hero for one (platform, mode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroStatBlock {
    #[serde(rename = "private")]
    pub is_private: bool,
    #[serde(flatten)]
    pub header: PlayerHeader,
    pub platform: Platform,
    pub game_mode: GameMode,
    #[serde(rename = "heroID")]
    pub hero_id: u32,
    pub hero_name: String,
    /// Page-local identifier of the hero; `None` for private profiles
    #[serde(rename = "heroSourceID")]
    pub hero_source_id: Option<String>,
    /// Document order; empty for private profiles
    #[serde(rename = "heroData")]
    pub categories: Vec<HeroStatCategory>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rank_table_cells() {
        let mut table = CompetitiveRankTable::default();
        assert!(table.is_empty());

        let gold = RankEntry {
            rank_name: "Gold".into(),
            rank_tier: 3,
        };
        table.set(Platform::Console, Role::Damage, Some(gold.clone()));
        assert_eq!(table.get(Platform::Console, Role::Damage), Some(&gold));
        assert_eq!(table.get(Platform::Pc, Role::Damage), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_rank_table_serializes_by_platform_and_role() {
        let mut table = CompetitiveRankTable::default();
        table.set(
            Platform::Pc,
            Role::Tank,
            Some(RankEntry {
                rank_name: "Diamond".into(),
                rank_tier: 2,
            }),
        );
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value["PC"]["Tank"], json!({"rankName": "Diamond", "rankTier": 2}));
        assert_eq!(value["PC"]["Support"], json!(null));
        assert_eq!(value["Console"]["Damage"], json!(null));
    }

    #[test]
    fn test_outcome_serialization() {
        let found: Outcome<HeroRanking> = Outcome::Found(HeroRanking {
            hero_label: "Ana".into(),
            metric_value: "12".into(),
        });
        assert_eq!(
            serde_json::to_value(&found).unwrap(),
            json!({"outcome": "found", "heroName": "Ana", "heroData": "12"})
        );

        let missing: Outcome<HeroRanking> = Outcome::HeroNotPresent {
            hero_id: 22,
            hero_name: "Ana".into(),
        };
        assert_eq!(
            serde_json::to_value(&missing).unwrap(),
            json!({"outcome": "heroNotPresent", "heroID": 22, "heroName": "Ana"})
        );
    }

    #[test]
    fn test_outcome_map_keeps_variants() {
        let outcome: Outcome<u32> = Outcome::NotFound;
        assert_eq!(outcome.map(|v| v + 1), Outcome::NotFound);
        assert_eq!(Outcome::Found(1).map(|v| v + 1).found(), Some(2));
    }
}
