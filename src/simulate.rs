//! Headless battles: the autopilot plays the player side to the end.

use serde::Serialize;

use crate::battle::{
    Autopilot, Battle, BattleStats, LogEntry, Outcome, Phase, Team, assert_invariants,
};
use crate::error::BattleResult;
use crate::lineup::Lineup;

/// Player turns after which an unfinished battle is abandoned.
pub const MAX_PLAYER_TURNS: u32 = 2_000;

/// Final state of one troop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TroopSummary {
    /// Display name.
    pub name: String,
    /// Life left.
    pub life: u32,
    /// Life at full health.
    pub max_life: u32,
}

/// Result of a headless battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleReport {
    /// Seed the battle ran with.
    pub seed: u64,
    /// Winner, or `None` if the turn cap was hit.
    pub outcome: Option<Outcome>,
    /// Player turns taken.
    pub turns: u32,
    /// Engine counters.
    pub stats: BattleStats,
    /// Player troops at the end.
    pub player: Vec<TroopSummary>,
    /// Enemy troops at the end.
    pub enemy: Vec<TroopSummary>,
    /// Every log entry, in order.
    pub log: Vec<LogEntry>,
}

impl BattleReport {
    /// Whether the player side won.
    #[must_use]
    pub fn player_won(&self) -> bool {
        self.outcome.is_some_and(Outcome::player_won)
    }
}

/// Autoplay a battle between the lineup's teams.
///
/// The battle and the autopilot derive their randomness from `seed`, so the
/// same lineup and seed always produce the same report.
///
/// # Errors
///
/// Returns an error if the lineup's teams cannot start a battle.
pub fn simulate(lineup: &Lineup, seed: u64) -> BattleResult<BattleReport> {
    let mut battle = Battle::new(&lineup.player, &lineup.enemy, lineup.config, seed)?;
    let mut pilot = Autopilot::new(seed.rotate_left(32) ^ 0x9e37_79b9_7f4a_7c15);
    let mut log = battle.drain_log();
    let mut turns = 0;

    while battle.phase() != Phase::GameOver && turns < MAX_PLAYER_TURNS {
        let acted = pilot.take_turn(&mut battle);
        battle.run_until_idle();
        assert_invariants(&battle);
        log.append(&mut battle.drain_log());
        if acted.is_empty() {
            // The autopilot always finds a move after a deadlock check.
            break;
        }
        turns += 1;
    }
    battle.run_until_idle();
    log.append(&mut battle.drain_log());

    if battle.outcome().is_none() {
        tracing::warn!(seed, turns, "battle abandoned without a winner");
    }

    Ok(BattleReport {
        seed,
        outcome: battle.outcome(),
        turns,
        stats: *battle.stats(),
        player: summarize(battle.player()),
        enemy: summarize(battle.enemy()),
        log,
    })
}

fn summarize(team: &Team) -> Vec<TroopSummary> {
    team.iter()
        .map(|troop| TroopSummary {
            name: troop.name().to_string(),
            life: troop.life,
            max_life: troop.max_life(),
        })
        .collect()
}
