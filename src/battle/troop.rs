//! Troop templates and runtime troop state.

use serde::{Deserialize, Serialize};

use super::ability::Ability;
use crate::board::GemType;

/// Static troop definition supplied by the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TroopTemplate {
    /// Stable roster identifier.
    pub id: String,
    /// Display name used in log text.
    pub name: String,
    /// Mana affinity. Matching gems of this color fill the troop's mana.
    pub color: GemType,
    /// Skull damage before bonus and armor.
    pub attack: u32,
    /// Starting armor.
    pub armor: u32,
    /// Life at battle start.
    pub max_life: u32,
    /// Mana needed to cast.
    pub mana_cost: u32,
    /// What the troop casts when its mana is full.
    pub ability: Ability,
}

/// A troop fighting in a battle.
///
/// Created fresh from its template when a battle starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Troop {
    /// Definition this troop was built from.
    pub template: TroopTemplate,
    /// Current life, within `0..=max_life`.
    pub life: u32,
    /// Current mana, within `0..=mana_cost`.
    pub mana: u32,
    /// Current armor. Starts at the template value; abilities may raise it.
    pub armor: u32,
    pub(crate) death_logged: bool,
}

impl Troop {
    /// Build a troop at full life with no mana.
    #[must_use]
    pub fn from_template(template: &TroopTemplate) -> Self {
        Self {
            life: template.max_life,
            mana: 0,
            armor: template.armor,
            template: template.clone(),
            death_logged: false,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.template.name
    }

    /// Maximum life.
    #[must_use]
    pub const fn max_life(&self) -> u32 {
        self.template.max_life
    }

    /// Mana needed to cast.
    #[must_use]
    pub const fn mana_cost(&self) -> u32 {
        self.template.mana_cost
    }

    /// Whether the troop still has life.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Whether the troop is alive with full mana.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.is_alive() && self.mana >= self.template.mana_cost
    }

    /// Whether the defeat of this troop has already been reported.
    #[must_use]
    pub const fn is_defeat_reported(&self) -> bool {
        self.death_logged
    }

    /// Add up to `amount` mana, capped at the cost. Dead troops gain nothing.
    ///
    /// Returns the mana actually gained.
    pub fn gain_mana(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let gained = self.mana_cost().saturating_sub(self.mana).min(amount);
        self.mana += gained;
        gained
    }

    /// Lose up to `amount` life, flooring at zero.
    ///
    /// Returns the life actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = self.life.min(amount);
        self.life -= dealt;
        dealt
    }

    /// Recover up to `amount` life, capped at maximum. Dead troops stay dead.
    ///
    /// Returns the life actually recovered.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let healed = self.max_life().saturating_sub(self.life).min(amount);
        self.life += healed;
        healed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::testkit::template;

    #[test]
    fn test_fresh_troop() {
        let troop = Troop::from_template(&template("Knight", GemType::Red, 10, 3));
        assert_eq!(troop.life, 30);
        assert_eq!(troop.mana, 0);
        assert_eq!(troop.armor, 3);
        assert!(troop.is_alive());
        assert!(!troop.is_ready());
    }

    #[test]
    fn test_mana_caps_at_cost() {
        let mut troop = Troop::from_template(&template("Knight", GemType::Red, 10, 3));
        assert_eq!(troop.gain_mana(4), 4);
        assert_eq!(troop.gain_mana(9), 6);
        assert_eq!(troop.mana, 10);
        assert_eq!(troop.gain_mana(3), 0);
        assert!(troop.is_ready());
    }

    #[test]
    fn test_life_stays_in_range() {
        let mut troop = Troop::from_template(&template("Knight", GemType::Red, 10, 3));
        assert_eq!(troop.heal(5), 0);
        assert_eq!(troop.take_damage(12), 12);
        assert_eq!(troop.heal(50), 12);
        assert_eq!(troop.life, 30);
        assert_eq!(troop.take_damage(100), 30);
        assert_eq!(troop.life, 0);
        assert!(!troop.is_alive());
        assert_eq!(troop.heal(5), 0);
        assert_eq!(troop.gain_mana(5), 0);
    }
}
