//! Static lookup tables: platforms, game modes, roles, stat categories, heroes.
//!
//! Stat category identifiers are opaque hexadecimal strings taken from the
//! career page markup. They are only ever compared as exact strings.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Input device family a stat section belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Mouse and keyboard
    Pc,
    /// Controller
    Console,
}

impl Platform {
    /// Both platforms, PC first.
    pub const ALL: [Self; 2] = [Self::Pc, Self::Console];

    /// Class of the page section holding this platform's data.
    #[must_use]
    pub const fn view_class(self) -> &'static str {
        match self {
            Self::Pc => "mouseKeyboard-view",
            Self::Console => "controller-view",
        }
    }

    /// Short lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pc => "pc",
            Self::Console => "console",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pc" | "mouse-keyboard" => Ok(Self::Pc),
            "console" | "controller" => Ok(Self::Console),
            other => Err(Error::InvalidParameter(format!("unknown platform '{other}'"))),
        }
    }
}

/// Game mode a stat section belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Unranked play
    #[serde(rename = "quickPlay")]
    QuickPlay,
    /// Ranked play
    #[serde(rename = "competitive")]
    Competitive,
}

impl GameMode {
    /// Class of the page section holding this mode's data.
    #[must_use]
    pub const fn view_class(self) -> &'static str {
        match self {
            Self::QuickPlay => "quickPlay-view",
            Self::Competitive => "competitive-view",
        }
    }

    /// Name used in responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QuickPlay => "quickPlay",
            Self::Competitive => "competitive",
        }
    }

    /// Stat categories available in this mode.
    #[must_use]
    pub fn categories(self) -> &'static StatCategoryCatalog {
        match self {
            Self::QuickPlay => &QUICK_PLAY_CATEGORIES,
            Self::Competitive => &COMPETITIVE_CATEGORIES,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quickplay" | "quick-play" | "quick" | "qp" => Ok(Self::QuickPlay),
            "competitive" | "comp" | "ranked" => Ok(Self::Competitive),
            other => Err(Error::InvalidParameter(format!("unknown game mode '{other}'"))),
        }
    }
}

/// Competitive role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Tank
    Tank,
    /// Damage
    Damage,
    /// Support
    Support,
}

/// Substring of a role's icon reference on the career page.
///
/// The damage icon is named after the old "offense" category.
const ROLE_ICON_FRAGMENTS: [(Role, &str); 3] = [
    (Role::Tank, "tank"),
    (Role::Damage, "offense"),
    (Role::Support, "support"),
];

impl Role {
    /// All roles in display order.
    pub const ALL: [Self; 3] = [Self::Tank, Self::Damage, Self::Support];

    /// Substring identifying this role's icon reference.
    #[must_use]
    pub fn icon_fragment(self) -> &'static str {
        ROLE_ICON_FRAGMENTS
            .iter()
            .find_map(|(role, fragment)| (*role == self).then_some(*fragment))
            .unwrap_or("")
    }

    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tank => "Tank",
            Self::Damage => "Damage",
            Self::Support => "Support",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rankable statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatCategory {
    /// Request key, e.g. `games-won`
    pub key: &'static str,
    /// Category identifier used by the page, e.g. `0x0860000000000039`
    pub id: &'static str,
    /// Human-readable label
    pub label: &'static str,
}

/// Stat categories of one game mode.
#[derive(Debug)]
pub struct StatCategoryCatalog {
    mode: GameMode,
    entries: &'static [StatCategory],
}

impl StatCategoryCatalog {
    /// Mode this catalog belongs to.
    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    /// All categories in catalog order.
    #[must_use]
    pub const fn entries(&self) -> &'static [StatCategory] {
        self.entries
    }

    /// Look up a category by request key; keys are matched case-insensitively.
    pub fn resolve(&self, type_key: &str) -> Result<&'static StatCategory> {
        let wanted = type_key.trim().to_lowercase();
        self.entries
            .iter()
            .find(|category| category.key == wanted)
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "unknown {} stat type '{type_key}'",
                    self.mode.as_str()
                ))
            })
    }
}

const fn category(key: &'static str, id: &'static str, label: &'static str) -> StatCategory {
    StatCategory { key, id, label }
}

static QUICK_PLAY_CATEGORIES: StatCategoryCatalog = StatCategoryCatalog {
    mode: GameMode::QuickPlay,
    entries: &[
        category("time-played", "0x0860000000000021", "Time Played"),
        category("games-won", "0x0860000000000039", "Games Won"),
        category("win-percentage", "0x08600000000003D1", "Win Percentage"),
        category("best-weapon-accuracy", "0x08600000000001BB", "Weapon Accuracy - Best in Game"),
        category("eliminations-per-life", "0x08600000000003D2", "Eliminations per Life"),
        category("best-kill-streak", "0x0860000000000223", "Kill Streak - Best"),
        category("best-multikill", "0x0860000000000346", "Multikill - Best"),
        category("avg-eliminations", "0x08600000000004D4", "Eliminations - Avg per 10 Min"),
        category("avg-deaths", "0x08600000000004D3", "Deaths - Avg per 10 Min"),
        category("avg-final-blows", "0x08600000000004D5", "Final Blows - Avg per 10 Min"),
        category("avg-solo-kills", "0x08600000000004DA", "Solo Kills - Avg per 10 Min"),
        category("avg-objective-kills", "0x08600000000004D8", "Objective Kills - Avg per 10 Min"),
        category("avg-objective-time", "0x08600000000004D9", "Objective Time - Avg per 10 Min"),
        category("avg-hero-damage", "0x08600000000004BD", "Hero Damage Done - Avg per 10 Min"),
        category("avg-healing-done", "0x08600000000004D6", "Healing Done - Avg per 10 Min"),
    ],
};

static COMPETITIVE_CATEGORIES: StatCategoryCatalog = StatCategoryCatalog {
    mode: GameMode::Competitive,
    entries: &[
        category("time-played", "0x0860000000000021", "Time Played"),
        category("games-won", "0x0860000000000039", "Games Won"),
        category("weapon-accuracy", "0x086000000000002F", "Weapon Accuracy"),
        category("win-percentage", "0x08600000000003D1", "Win Percentage"),
        category("eliminations-per-life", "0x08600000000003D2", "Eliminations per Life"),
        category("critical-hit-accuracy", "0x08600000000003E2", "Critical Hit Accuracy"),
        category("multikill-best", "0x0860000000000346", "Multikill - Best"),
        category("objective-kills", "0x086000000000031C", "Objective Kills"),
    ],
};

/// A playable hero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    /// Stable numeric identifier callers use
    #[serde(rename = "heroID")]
    pub hero_id: u32,
    /// Name exactly as the page labels it in the hero dropdown
    #[serde(rename = "heroName")]
    pub hero_name: String,
    /// Role, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Known heroes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroCatalog {
    heroes: Vec<Hero>,
}

static BUILTIN_HEROES: LazyLock<HeroCatalog> = LazyLock::new(|| {
    use Role::{Damage, Support, Tank};
    let roster: [(&str, Role); 42] = [
        ("Tracer", Damage),
        ("Reaper", Damage),
        ("Widowmaker", Damage),
        ("Pharah", Damage),
        ("Reinhardt", Tank),
        ("Mercy", Support),
        ("Torbjörn", Damage),
        ("Hanzo", Damage),
        ("Winston", Tank),
        ("Zenyatta", Support),
        ("Bastion", Damage),
        ("Symmetra", Damage),
        ("Zarya", Tank),
        ("Cassidy", Damage),
        ("Soldier: 76", Damage),
        ("Lúcio", Support),
        ("Roadhog", Tank),
        ("Junkrat", Damage),
        ("D.Va", Tank),
        ("Mei", Damage),
        ("Genji", Damage),
        ("Ana", Support),
        ("Sombra", Damage),
        ("Orisa", Tank),
        ("Doomfist", Tank),
        ("Moira", Support),
        ("Brigitte", Support),
        ("Wrecking Ball", Tank),
        ("Ashe", Damage),
        ("Baptiste", Support),
        ("Sigma", Tank),
        ("Echo", Damage),
        ("Sojourn", Damage),
        ("Junker Queen", Tank),
        ("Kiriko", Support),
        ("Ramattra", Tank),
        ("Lifeweaver", Support),
        ("Illari", Support),
        ("Mauga", Tank),
        ("Venture", Damage),
        ("Juno", Support),
        ("Hazard", Tank),
    ];
    HeroCatalog {
        heroes: (1u32..)
            .zip(roster)
            .map(|(hero_id, (name, role))| Hero {
                hero_id,
                hero_name: name.to_string(),
                role: Some(role),
            })
            .collect(),
    }
});

impl HeroCatalog {
    /// The built-in roster.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN_HEROES
    }

    /// Build a catalog from heroes, rejecting duplicate identifiers.
    pub fn new(heroes: Vec<Hero>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for hero in &heroes {
            if !seen.insert(hero.hero_id) {
                return Err(Error::Config(format!("duplicate heroID {}", hero.hero_id)));
            }
        }
        Ok(Self { heroes })
    }

    /// Load a catalog from a JSON array of `{ "heroID": .., "heroName": .. }`.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Load a JSON catalog file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
        Self::from_json(&json)
            .map_err(|e| Error::Config(format!("Invalid hero catalog {}: {e}", path.display())))
    }

    /// All heroes in catalog order.
    #[must_use]
    pub fn heroes(&self) -> &[Hero] {
        &self.heroes
    }

    /// Look up a hero by caller-supplied identifier.
    pub fn resolve(&self, hero_id: &str) -> Result<&Hero> {
        let wanted = hero_id.trim();
        self.heroes
            .iter()
            .find(|hero| hero.hero_id.to_string() == wanted)
            .ok_or_else(|| Error::InvalidParameter(format!("no hero with heroID '{hero_id}'")))
    }
}
