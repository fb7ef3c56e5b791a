//! Mana accrual and skull damage from a matched set.

use serde::{Deserialize, Serialize};

use super::team::{Side, Team, TroopRef};
use crate::board::{GemCounts, GemType};

/// Skulls beyond this many add bonus damage.
const SKULL_BONUS_FLOOR: u32 = 3;

/// Mana credited to one troop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaGain {
    /// Troop that gained mana.
    pub troop: TroopRef,
    /// Gem color that fed it.
    pub color: GemType,
    /// Mana actually added.
    pub amount: u32,
}

/// A skull hit from one front troop onto the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkullStrike {
    /// Front troop of the matching side.
    pub attacker: TroopRef,
    /// Front troop of the opposing side.
    pub defender: TroopRef,
    /// Damage dealt before the life floor.
    pub damage: u32,
    /// Skulls in the match.
    pub skulls: u32,
}

/// Everything one matched set produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceReport {
    /// Non-zero mana gains, in color then team order.
    pub mana: Vec<ManaGain>,
    /// Skull strike, if skulls matched and both fronts were alive.
    pub strike: Option<SkullStrike>,
}

/// Skull damage: `max(1, attack + max(0, skulls - 3) * bonus - armor)`.
#[must_use]
pub const fn skull_damage(attack: u32, armor: u32, skulls: u32, bonus_per_skull: u32) -> u32 {
    let bonus = skulls
        .saturating_sub(SKULL_BONUS_FLOOR)
        .saturating_mul(bonus_per_skull);
    let raw = attack.saturating_add(bonus).saturating_sub(armor);
    if raw == 0 { 1 } else { raw }
}

/// Credit mana to `side`'s troops and resolve the skull strike.
///
/// `attackers` is the matching side's team, `defenders` the other. Mana only
/// goes to living troops of the matching color; skulls never give mana.
pub fn apply_resources(
    side: Side,
    counts: &GemCounts,
    attackers: &mut Team,
    defenders: &mut Team,
    bonus_per_skull: u32,
) -> ResourceReport {
    let mut report = ResourceReport::default();

    for (color, count) in counts.mana() {
        for (index, troop) in attackers.iter_mut().enumerate() {
            if troop.template.color != color {
                continue;
            }
            let amount = troop.gain_mana(count);
            if amount > 0 {
                report.mana.push(ManaGain {
                    troop: TroopRef::new(side, index),
                    color,
                    amount,
                });
            }
        }
    }

    let skulls = counts.skulls();
    if skulls > 0
        && let (Some(atk_idx), Some(def_idx)) = (attackers.front_index(), defenders.front_index())
        && let (Some(attacker), Some(defender)) = (attackers.get(atk_idx), defenders.get_mut(def_idx))
    {
        let damage = skull_damage(attacker.template.attack, defender.armor, skulls, bonus_per_skull);
        defender.take_damage(damage);
        report.strike = Some(SkullStrike {
            attacker: TroopRef::new(side, atk_idx),
            defender: TroopRef::new(side.opponent(), def_idx),
            damage,
            skulls,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::testkit::template;
    use crate::board::{Board, find_matches};

    #[test]
    fn test_skull_damage_formula() {
        assert_eq!(skull_damage(10, 3, 5, 2), 11);
        assert_eq!(skull_damage(10, 3, 3, 2), 7);
        assert_eq!(skull_damage(4, 20, 3, 2), 1);
        assert_eq!(skull_damage(0, 0, 3, 2), 1);
    }

    #[test]
    fn test_skull_damage_saturates() {
        assert_eq!(skull_damage(u32::MAX, 0, 4, 2), u32::MAX);
        assert_eq!(skull_damage(u32::MAX, 5, 9, u32::MAX), u32::MAX - 5);
        assert_eq!(skull_damage(1, 0, u32::MAX, u32::MAX), u32::MAX);
    }

    fn counts(rows: &[&str]) -> GemCounts {
        let board = Board::from_rows(rows).unwrap();
        GemCounts::tally(&board, &find_matches(&board))
    }

    #[test]
    fn test_mana_goes_to_matching_color_only() {
        let mut players = Team::from_templates(&[
            template("Drake", GemType::Red, 10, 3),
            template("Mage", GemType::Blue, 10, 3),
            template("Reaper", GemType::Red, 10, 3),
        ]);
        players.get_mut(2).unwrap().life = 0;
        players.get_mut(0).unwrap().mana = 9;
        let mut enemies = Team::from_templates(&[template("Orc", GemType::Red, 8, 2)]);

        let report = apply_resources(
            Side::Player,
            &counts(&["RRRB", "BGYG", "GYBY", "YBGB"]),
            &mut players,
            &mut enemies,
            2,
        );

        assert_eq!(
            report.mana,
            vec![ManaGain {
                troop: TroopRef::new(Side::Player, 0),
                color: GemType::Red,
                amount: 1,
            }]
        );
        assert_eq!(players.get(0).unwrap().mana, 10);
        assert_eq!(players.get(1).unwrap().mana, 0);
        assert_eq!(players.get(2).unwrap().mana, 0);
        assert_eq!(enemies.get(0).unwrap().mana, 0);
        assert!(report.strike.is_none());
    }

    #[test]
    fn test_skull_strike_hits_fronts() {
        let mut enemies = Team::from_templates(&[
            template("Goblin", GemType::Green, 10, 3),
            template("Orc", GemType::Red, 12, 2),
        ]);
        enemies.get_mut(0).unwrap().life = 0;
        let mut players = Team::from_templates(&[template("Knight", GemType::Brown, 9, 4)]);

        let report = apply_resources(
            Side::Enemy,
            &counts(&["SSSSS", "RBRBR", "BRBRB", "RBRBR", "BRBRB"]),
            &mut enemies,
            &mut players,
            2,
        );

        // Orc attacks: 12 + (5 - 3) * 2 - 4 = 12.
        let strike = report.strike.unwrap();
        assert_eq!(strike.attacker, TroopRef::new(Side::Enemy, 1));
        assert_eq!(strike.defender, TroopRef::new(Side::Player, 0));
        assert_eq!(strike.damage, 12);
        assert_eq!(strike.skulls, 5);
        assert_eq!(players.get(0).unwrap().life, 18);
        assert!(report.mana.is_empty());
    }

    #[test]
    fn test_huge_attack_from_team_file() {
        let mut players = Team::from_templates(&[template("Titan", GemType::Brown, u32::MAX, 0)]);
        let mut enemies = Team::from_templates(&[template("Orc", GemType::Red, 12, 2)]);
        let report = apply_resources(
            Side::Player,
            &counts(&["SSSSS", "RBRBR", "BRBRB", "RBRBR", "BRBRB"]),
            &mut players,
            &mut enemies,
            u32::MAX,
        );
        assert_eq!(report.strike.unwrap().damage, u32::MAX - 2);
        assert_eq!(enemies.get(0).unwrap().life, 0);
    }

    #[test]
    fn test_skulls_skipped_without_defender() {
        let mut players = Team::from_templates(&[template("Knight", GemType::Brown, 9, 4)]);
        let mut enemies = Team::from_templates(&[template("Orc", GemType::Red, 12, 2)]);
        enemies.get_mut(0).unwrap().life = 0;
        let report = apply_resources(
            Side::Player,
            &counts(&["SSSB", "BGYG", "GYBY", "YBGB"]),
            &mut players,
            &mut enemies,
            2,
        );
        assert!(report.strike.is_none());
    }
}
