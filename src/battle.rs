//! Battle layer.
//!
//! Turns board matches into combat:
//! - Troops, teams and tagged abilities
//! - Mana accrual and skull damage
//! - The staged turn state machine
//! - Enemy AI and the player autopilot
//! - Deadlock reshuffles and invariant checks

mod ability;
mod ai;
mod deadlock;
mod events;
mod invariants;
mod log;
mod resources;
mod state;
mod team;
#[cfg(test)]
mod testkit;
mod troop;

pub use ability::{Ability, AbilityEffect, HealTarget, TargetPolicy};
pub use ai::{Autopilot, choose_move, produces_skull};
pub use deadlock::{Reshuffle, reshuffle};
pub use events::{BattleEvent, Outcome, Stage, Step};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use log::{LogEntry, LogKind};
pub use resources::{ManaGain, ResourceReport, SkullStrike, apply_resources, skull_damage};
pub use state::{Battle, BattleStats, Phase, Rejection};
pub use team::{Side, Team, TroopRef};
pub use troop::{Troop, TroopTemplate};
