//! Team files.
//!
//! A team file is a JSON document holding both troop lists and optional rule
//! overrides:
//!
//! ```json
//! {
//!   "config": { "skull_bonus": 3 },
//!   "player": [ { "id": "frost_mage", "name": "Frost Mage", "color": "blue", ... } ],
//!   "enemy":  [ ... ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::{Ability, AbilityEffect, HealTarget, TargetPolicy, TroopTemplate};
use crate::board::GemType;
use crate::config::BattleConfig;
use crate::error::TeamFileError;

/// Both sides of a battle plus the rules to play them under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineup {
    /// Rule overrides; missing fields take defaults.
    #[serde(default)]
    pub config: BattleConfig,
    /// Player troops, front first.
    pub player: Vec<TroopTemplate>,
    /// Enemy troops, front first.
    pub enemy: Vec<TroopTemplate>,
}

impl Lineup {
    /// Load a lineup from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid lineup.
    pub fn load(path: &Path) -> Result<Self, TeamFileError> {
        let text = fs::read_to_string(path).map_err(|source| TeamFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| TeamFileError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Built-in lineup: four heroes against a three-troop war camp.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            config: BattleConfig::default(),
            player: vec![
                troop(
                    "Iron Sentinel",
                    GemType::Brown,
                    [10, 8, 35, 10],
                    "Shield Wall",
                    AbilityEffect::Fortify { armor: 4 },
                ),
                troop(
                    "Frost Mage",
                    GemType::Blue,
                    [10, 2, 18, 9],
                    "Blizzard",
                    AbilityEffect::Cleave {
                        primary: 12,
                        splash: 6,
                        splash_limit: Some(1),
                    },
                ),
                troop(
                    "Storm Dancer",
                    GemType::Yellow,
                    [12, 3, 21, 9],
                    "Thunder Bolt",
                    AbilityEffect::Damage {
                        amount: 20,
                        target: TargetPolicy::Random,
                    },
                ),
                troop(
                    "Valkyrie",
                    GemType::Yellow,
                    [11, 6, 30, 10],
                    "Divine Light",
                    AbilityEffect::Heal {
                        amount: 15,
                        target: HealTarget::MostWounded,
                    },
                ),
            ],
            enemy: vec![
                troop(
                    "Orc Warchief",
                    GemType::Red,
                    [12, 5, 30, 9],
                    "Battle Cry",
                    AbilityEffect::Damage {
                        amount: 12,
                        target: TargetPolicy::Front,
                    },
                ),
                troop(
                    "Goblin Bomber",
                    GemType::Green,
                    [11, 3, 24, 8],
                    "Kaboom!",
                    AbilityEffect::Area { amount: 7 },
                ),
                troop(
                    "Orc Grunt",
                    GemType::Red,
                    [9, 4, 26, 7],
                    "Bash",
                    AbilityEffect::Damage {
                        amount: 8,
                        target: TargetPolicy::Front,
                    },
                ),
            ],
        }
    }
}

/// `stats` is `[attack, armor, max_life, mana_cost]`.
fn troop(
    name: &str,
    color: GemType,
    stats: [u32; 4],
    ability: &str,
    effect: AbilityEffect,
) -> TroopTemplate {
    let [attack, armor, max_life, mana_cost] = stats;
    TroopTemplate {
        id: name.to_lowercase().replace(' ', "_"),
        name: name.to_string(),
        color,
        attack,
        armor,
        max_life,
        mana_cost,
        ability: Ability {
            name: ability.to_string(),
            effect,
        },
    }
}
