//! Teams and sides.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::troop::{Troop, TroopTemplate};

/// One of the two fighting sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The human (or autopilot) side.
    Player,
    /// The AI side.
    Enemy,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Enemy => write!(f, "enemy"),
        }
    }
}

/// A specific troop: its side and its position in that team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TroopRef {
    /// Team the troop belongs to.
    pub side: Side,
    /// Position in team order.
    pub index: usize,
}

impl TroopRef {
    /// Create a reference.
    #[must_use]
    pub const fn new(side: Side, index: usize) -> Self {
        Self { side, index }
    }
}

/// Ordered troops. The first living troop is the front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    troops: Vec<Troop>,
}

impl Team {
    /// Build a fresh team from templates.
    #[must_use]
    pub fn from_templates(templates: &[TroopTemplate]) -> Self {
        Self {
            troops: templates.iter().map(Troop::from_template).collect(),
        }
    }

    /// Number of troops, living or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.troops.len()
    }

    /// Whether the team has no troops at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.troops.is_empty()
    }

    /// Troop at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Troop> {
        self.troops.get(index)
    }

    /// Mutable troop at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Troop> {
        self.troops.get_mut(index)
    }

    /// Index of the first living troop.
    #[must_use]
    pub fn front_index(&self) -> Option<usize> {
        self.troops.iter().position(Troop::is_alive)
    }

    /// First living troop.
    #[must_use]
    pub fn front(&self) -> Option<&Troop> {
        self.front_index().and_then(|idx| self.troops.get(idx))
    }

    /// Indices of living troops, in team order.
    #[must_use]
    pub fn living_indices(&self) -> Vec<usize> {
        self.troops
            .iter()
            .enumerate()
            .filter(|(_, troop)| troop.is_alive())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Whether every troop is down.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        !self.troops.iter().any(Troop::is_alive)
    }

    /// All troops in order.
    pub fn iter(&self) -> impl Iterator<Item = &Troop> {
        self.troops.iter()
    }

    /// All troops in order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Troop> {
        self.troops.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::testkit::template;
    use crate::board::GemType;

    fn team() -> Team {
        Team::from_templates(&[
            template("A", GemType::Red, 5, 1),
            template("B", GemType::Blue, 5, 1),
            template("C", GemType::Green, 5, 1),
        ])
    }

    #[test]
    fn test_front_skips_dead() {
        let mut team = team();
        assert_eq!(team.front_index(), Some(0));
        team.get_mut(0).unwrap().life = 0;
        assert_eq!(team.front_index(), Some(1));
        assert_eq!(team.front().unwrap().name(), "B");
        assert_eq!(team.living_indices(), vec![1, 2]);
    }

    #[test]
    fn test_defeated() {
        let mut team = team();
        assert!(!team.is_defeated());
        team.iter_mut().for_each(|troop| troop.life = 0);
        assert!(team.is_defeated());
        assert_eq!(team.front_index(), None);
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Side::Player.opponent(), Side::Enemy);
        assert_eq!(Side::Enemy.opponent(), Side::Player);
    }
}
