//! Battle invariants - sanity checks that detect bugs.
//!
//! These should never trigger. Board checks only apply between pipelines,
//! since cells are legitimately empty between removal and refill.

use thiserror::Error;

use super::state::Battle;
use super::team::Side;
use crate::board::find_matches;

/// Invariant violation error.
#[derive(Error, Debug, Clone)]
#[error("Invariant violation: {message}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

/// Check all battle invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(battle: &Battle) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    if battle.is_idle() {
        if !battle.board().is_full() {
            violations.push(InvariantViolation {
                message: "Board has empty cells while idle".to_string(),
            });
        }
        let runs = find_matches(battle.board());
        if !runs.is_empty() {
            violations.push(InvariantViolation {
                message: format!("Board has {} unresolved matched cells while idle", runs.len()),
            });
        }
    }

    for side in [Side::Player, Side::Enemy] {
        for (index, troop) in battle.team(side).iter().enumerate() {
            if troop.mana > troop.mana_cost() {
                violations.push(InvariantViolation {
                    message: format!(
                        "{side} troop {index} has mana {} > cost {}",
                        troop.mana,
                        troop.mana_cost()
                    ),
                });
            }
            if troop.life > troop.max_life() {
                violations.push(InvariantViolation {
                    message: format!(
                        "{side} troop {index} has life {} > max {}",
                        troop.life,
                        troop.max_life()
                    ),
                });
            }
            // Deaths are recorded at the latest by the next Clear stage.
            if battle.is_idle() && !troop.is_alive() && troop.mana > 0 {
                violations.push(InvariantViolation {
                    message: format!("Dead {side} troop {index} still has {} mana", troop.mana),
                });
            }
        }
    }

    violations
}

/// Assert all battle invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(battle: &Battle) {
    let violations = check_invariants(battle);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Battle invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_battle: &Battle) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::testkit::{one_move_board, template};
    use crate::board::GemType;
    use crate::config::BattleConfig;

    fn create_valid_battle() -> Battle {
        Battle::with_board(
            &[template("Knight", GemType::Red, 10, 3)],
            &[template("Orc", GemType::Green, 8, 2)],
            BattleConfig::default(),
            one_move_board(),
            3,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_battle_passes() {
        let battle = create_valid_battle();
        assert!(check_invariants(&battle).is_empty());
        assert_invariants(&battle);
    }

    #[test]
    fn test_excess_mana_detected() {
        let mut battle = create_valid_battle();
        battle.team_mut(Side::Player).get_mut(0).unwrap().mana = 11;
        let violations = check_invariants(&battle);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("mana 11"));
    }

    #[test]
    fn test_excess_life_detected() {
        let mut battle = create_valid_battle();
        battle.team_mut(Side::Enemy).get_mut(0).unwrap().life = 31;
        let violations = check_invariants(&battle);
        assert!(violations[0].message.contains("life 31"));
    }

    #[test]
    fn test_dead_troop_with_mana_detected() {
        let mut battle = create_valid_battle();
        let troop = battle.team_mut(Side::Enemy).get_mut(0).unwrap();
        troop.life = 0;
        troop.mana = 4;
        let violations = check_invariants(&battle);
        assert!(violations[0].message.contains("Dead enemy troop 0"));
    }

    #[test]
    fn test_violations_after_real_play() {
        let mut battle = create_valid_battle();
        battle
            .attempt_swap(crate::board::Coord::new(0, 2), crate::board::Coord::new(1, 2))
            .unwrap();
        while battle.step().is_some() {
            let violations = check_invariants(&battle);
            assert!(violations.is_empty(), "{violations:?}");
        }
    }
}
