//! Abilities as tagged effects.
//!
//! Every troop carries one [`Ability`]: a display name plus an
//! [`AbilityEffect`] variant holding its numbers and target policy. Casting
//! mutates both rosters in place and returns a log line, or `None` when there
//! was nothing to target. Spell damage ignores armor.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::team::Team;

/// Which enemy a single-target effect hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPolicy {
    /// First living enemy.
    Front,
    /// Uniformly random living enemy.
    Random,
}

/// Which ally a heal lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealTarget {
    /// The caster itself.
    Caster,
    /// Living ally with the lowest life/max-life ratio; ties go to the earliest.
    MostWounded,
}

/// Effect shapes an ability can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbilityEffect {
    /// Damage one enemy.
    Damage {
        /// Life removed.
        amount: u32,
        /// Who gets hit.
        target: TargetPolicy,
    },
    /// Damage every living enemy.
    Area {
        /// Life removed from each.
        amount: u32,
    },
    /// Heavy hit on the front enemy, lighter hits on the ones behind it.
    Cleave {
        /// Damage to the front enemy.
        primary: u32,
        /// Damage to each following living enemy.
        splash: u32,
        /// How many following enemies are hit; all of them when absent.
        #[serde(default)]
        splash_limit: Option<usize>,
    },
    /// Restore life to one ally.
    Heal {
        /// Life restored.
        amount: u32,
        /// Who is healed.
        target: HealTarget,
    },
    /// Damage the front enemy and heal the caster.
    Drain {
        /// Life removed from the enemy.
        damage: u32,
        /// Life restored to the caster.
        heal: u32,
    },
    /// Raise the armor of every living ally for the rest of the battle.
    Fortify {
        /// Armor added.
        armor: u32,
    },
    /// Damage every other living unit on both sides; the caster heals the total dealt.
    Harvest {
        /// Life removed from each unit.
        amount: u32,
    },
}

/// A named ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    /// Display name, e.g. "Blizzard".
    pub name: String,
    /// What it does.
    pub effect: AbilityEffect,
}

impl Ability {
    /// Apply the effect for the troop at `caster` in `allies`.
    ///
    /// Returns `None`, with nothing changed, when no valid target exists.
    pub fn cast(
        &self,
        caster: usize,
        allies: &mut Team,
        enemies: &mut Team,
        rng: &mut impl Rng,
    ) -> Option<String> {
        let caster_name = allies.get(caster)?.name().to_string();
        let spell = &self.name;

        match self.effect {
            AbilityEffect::Damage { amount, target } => {
                let living = enemies.living_indices();
                let idx = match target {
                    TargetPolicy::Front => *living.first()?,
                    TargetPolicy::Random => {
                        if living.is_empty() {
                            return None;
                        }
                        living[rng.gen_range(0..living.len())]
                    }
                };
                let troop = enemies.get_mut(idx)?;
                troop.take_damage(amount);
                Some(format!(
                    "{caster_name} casts {spell}: {} takes {amount} damage!",
                    troop.name()
                ))
            }
            AbilityEffect::Area { amount } => {
                let living = enemies.living_indices();
                if living.is_empty() {
                    return None;
                }
                for idx in living {
                    if let Some(troop) = enemies.get_mut(idx) {
                        troop.take_damage(amount);
                    }
                }
                Some(format!(
                    "{caster_name} casts {spell}: all enemies take {amount} damage!"
                ))
            }
            AbilityEffect::Cleave {
                primary,
                splash,
                splash_limit,
            } => {
                let living = enemies.living_indices();
                let (&front, rest) = living.split_first()?;
                let mut text = format!("{caster_name} casts {spell}!");
                if let Some(troop) = enemies.get_mut(front) {
                    troop.take_damage(primary);
                    text.push_str(&format!(" {} takes {primary}!", troop.name()));
                }
                let limit = splash_limit.unwrap_or(rest.len());
                for &idx in rest.iter().take(limit) {
                    if let Some(troop) = enemies.get_mut(idx) {
                        troop.take_damage(splash);
                        text.push_str(&format!(" {} takes {splash}!", troop.name()));
                    }
                }
                Some(text)
            }
            AbilityEffect::Heal { amount, target } => {
                let idx = match target {
                    HealTarget::Caster => caster,
                    HealTarget::MostWounded => most_wounded(allies)?,
                };
                let troop = allies.get_mut(idx)?;
                if !troop.is_alive() {
                    return None;
                }
                let healed = troop.heal(amount);
                Some(format!(
                    "{caster_name} casts {spell}: {} recovers {healed} HP!",
                    troop.name()
                ))
            }
            AbilityEffect::Drain { damage, heal } => {
                let idx = enemies.front_index()?;
                let troop = enemies.get_mut(idx)?;
                troop.take_damage(damage);
                let target = troop.name().to_string();
                let healed = allies.get_mut(caster).map_or(0, |me| me.heal(heal));
                Some(format!(
                    "{caster_name} casts {spell} on {target} for {damage} damage and heals {healed} HP!"
                ))
            }
            AbilityEffect::Fortify { armor } => {
                let living = allies.living_indices();
                if living.is_empty() {
                    return None;
                }
                for idx in living {
                    if let Some(troop) = allies.get_mut(idx) {
                        troop.armor = troop.armor.saturating_add(armor);
                    }
                }
                Some(format!(
                    "{caster_name} casts {spell}: all allies gain +{armor} armor!"
                ))
            }
            AbilityEffect::Harvest { amount } => {
                let mut total = 0u32;
                let mut hit = 0usize;
                for (idx, troop) in allies.iter_mut().enumerate() {
                    if idx != caster && troop.is_alive() {
                        total = total.saturating_add(troop.take_damage(amount));
                        hit += 1;
                    }
                }
                for troop in enemies.iter_mut() {
                    if troop.is_alive() {
                        total = total.saturating_add(troop.take_damage(amount));
                        hit += 1;
                    }
                }
                if hit == 0 {
                    return None;
                }
                let healed = allies.get_mut(caster).map_or(0, |me| me.heal(total));
                Some(format!(
                    "{caster_name} casts {spell}: drains {amount} from all units, heals {healed} HP!"
                ))
            }
        }
    }
}

/// Living ally with the lowest life ratio. Ties go to the earliest.
fn most_wounded(team: &Team) -> Option<usize> {
    let mut best: Option<(usize, u64, u64)> = None;
    for idx in team.living_indices() {
        let Some(troop) = team.get(idx) else {
            continue;
        };
        let life = u64::from(troop.life);
        let max = u64::from(troop.max_life().max(1));
        let lower = match best {
            // life/max < best_life/best_max
            Some((_, best_life, best_max)) => life * best_max < best_life * max,
            None => true,
        };
        if lower {
            best = Some((idx, life, max));
        }
    }
    best.map(|(idx, _, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::testkit::template;
    use crate::board::GemType;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn teams() -> (Team, Team) {
        let allies = Team::from_templates(&[
            template("Sentinel", GemType::Brown, 10, 8),
            template("Valkyrie", GemType::Yellow, 11, 6),
        ]);
        let enemies = Team::from_templates(&[
            template("Goblin", GemType::Green, 6, 1),
            template("Orc", GemType::Red, 8, 2),
            template("Troll", GemType::Brown, 9, 3),
        ]);
        (allies, enemies)
    }

    fn ability(effect: AbilityEffect) -> Ability {
        Ability {
            name: "Test".to_string(),
            effect,
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(0)
    }

    #[test]
    fn test_damage_front_ignores_armor() {
        let (mut allies, mut enemies) = teams();
        enemies.get_mut(0).unwrap().life = 0;
        let spell = ability(AbilityEffect::Damage {
            amount: 25,
            target: TargetPolicy::Front,
        });
        let text = spell.cast(0, &mut allies, &mut enemies, &mut rng()).unwrap();
        assert_eq!(enemies.get(1).unwrap().life, 5);
        assert_eq!(text, "Sentinel casts Test: Orc takes 25 damage!");
    }

    #[test]
    fn test_damage_random_hits_a_living_enemy() {
        let (mut allies, mut enemies) = teams();
        enemies.get_mut(1).unwrap().life = 0;
        let spell = ability(AbilityEffect::Damage {
            amount: 4,
            target: TargetPolicy::Random,
        });
        let mut rng = rng();
        for _ in 0..5 {
            spell.cast(0, &mut allies, &mut enemies, &mut rng).unwrap();
        }
        assert_eq!(enemies.get(1).unwrap().life, 0);
        let lost = (30 - enemies.get(0).unwrap().life) + (30 - enemies.get(2).unwrap().life);
        assert_eq!(lost, 20);
    }

    #[test]
    fn test_no_target_changes_nothing() {
        let (mut allies, mut enemies) = teams();
        enemies.iter_mut().for_each(|troop| troop.life = 0);
        let before = (allies.clone(), enemies.clone());
        for effect in [
            AbilityEffect::Damage {
                amount: 5,
                target: TargetPolicy::Front,
            },
            AbilityEffect::Damage {
                amount: 5,
                target: TargetPolicy::Random,
            },
            AbilityEffect::Area { amount: 5 },
            AbilityEffect::Cleave {
                primary: 5,
                splash: 2,
                splash_limit: None,
            },
            AbilityEffect::Drain { damage: 5, heal: 5 },
        ] {
            assert_eq!(ability(effect).cast(0, &mut allies, &mut enemies, &mut rng()), None);
        }
        assert_eq!((allies, enemies), before);
    }

    #[test]
    fn test_area_and_cleave() {
        let (mut allies, mut enemies) = teams();
        ability(AbilityEffect::Area { amount: 6 })
            .cast(0, &mut allies, &mut enemies, &mut rng())
            .unwrap();
        let lives: Vec<u32> = enemies.iter().map(|t| t.life).collect();
        assert_eq!(lives, vec![24, 24, 24]);

        let text = ability(AbilityEffect::Cleave {
            primary: 12,
            splash: 6,
            splash_limit: Some(1),
        })
        .cast(0, &mut allies, &mut enemies, &mut rng())
        .unwrap();
        let lives: Vec<u32> = enemies.iter().map(|t| t.life).collect();
        assert_eq!(lives, vec![12, 18, 24]);
        assert_eq!(text, "Sentinel casts Test! Goblin takes 12! Orc takes 6!");

        ability(AbilityEffect::Cleave {
            primary: 50,
            splash: 20,
            splash_limit: None,
        })
        .cast(0, &mut allies, &mut enemies, &mut rng())
        .unwrap();
        let lives: Vec<u32> = enemies.iter().map(|t| t.life).collect();
        assert_eq!(lives, vec![0, 0, 4]);
    }

    #[test]
    fn test_heal_most_wounded_by_ratio() {
        let (mut allies, mut enemies) = teams();
        allies.get_mut(0).unwrap().life = 20; // 20/30
        allies.get_mut(1).unwrap().life = 12; // 12/30
        let text = ability(AbilityEffect::Heal {
            amount: 15,
            target: HealTarget::MostWounded,
        })
        .cast(0, &mut allies, &mut enemies, &mut rng())
        .unwrap();
        assert_eq!(allies.get(1).unwrap().life, 27);
        assert_eq!(text, "Sentinel casts Test: Valkyrie recovers 15 HP!");

        // Equal ratios go to the earliest troop; heal caps at max life.
        allies.get_mut(0).unwrap().life = 27;
        let text = ability(AbilityEffect::Heal {
            amount: 15,
            target: HealTarget::MostWounded,
        })
        .cast(1, &mut allies, &mut enemies, &mut rng())
        .unwrap();
        assert_eq!(allies.get(0).unwrap().life, 30);
        assert_eq!(text, "Valkyrie casts Test: Sentinel recovers 3 HP!");
    }

    #[test]
    fn test_drain_and_fortify() {
        let (mut allies, mut enemies) = teams();
        allies.get_mut(1).unwrap().life = 10;
        ability(AbilityEffect::Drain { damage: 8, heal: 8 })
            .cast(1, &mut allies, &mut enemies, &mut rng())
            .unwrap();
        assert_eq!(enemies.get(0).unwrap().life, 22);
        assert_eq!(allies.get(1).unwrap().life, 18);

        allies.get_mut(0).unwrap().life = 0;
        ability(AbilityEffect::Fortify { armor: 4 })
            .cast(1, &mut allies, &mut enemies, &mut rng())
            .unwrap();
        assert_eq!(allies.get(0).unwrap().armor, 8);
        assert_eq!(allies.get(1).unwrap().armor, 10);
    }

    #[test]
    fn test_harvest_heals_total_dealt() {
        let (mut allies, mut enemies) = teams();
        allies.get_mut(0).unwrap().life = 5;
        allies.get_mut(1).unwrap().life = 1;
        enemies.get_mut(2).unwrap().life = 0;
        let text = ability(AbilityEffect::Harvest { amount: 8 })
            .cast(1, &mut allies, &mut enemies, &mut rng())
            .unwrap();
        // 5 from the ally, 8 + 8 from the enemies, capped by the caster's missing life.
        assert_eq!(allies.get(0).unwrap().life, 0);
        assert_eq!(enemies.get(0).unwrap().life, 22);
        assert_eq!(enemies.get(1).unwrap().life, 22);
        assert_eq!(allies.get(1).unwrap().life, 22);
        assert!(text.ends_with("heals 21 HP!"));
    }

    #[test]
    fn test_effect_json_shape() {
        let effect: AbilityEffect =
            serde_json::from_str(r#"{"kind":"cleave","primary":12,"splash":6,"splash_limit":1}"#)
                .unwrap();
        assert_eq!(
            effect,
            AbilityEffect::Cleave {
                primary: 12,
                splash: 6,
                splash_limit: Some(1)
            }
        );
        let effect: AbilityEffect =
            serde_json::from_str(r#"{"kind":"heal","amount":15,"target":"most_wounded"}"#).unwrap();
        assert_eq!(
            effect,
            AbilityEffect::Heal {
                amount: 15,
                target: HealTarget::MostWounded
            }
        );
    }
}
