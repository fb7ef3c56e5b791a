//! Events and stages reported to presenters.

use serde::{Deserialize, Serialize};

use super::resources::{ManaGain, SkullStrike};
use super::team::{Side, TroopRef};
use crate::board::{Collapse, Coord, GemCounts, GemId, Move};
use crate::config::Pacing;

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every enemy troop is down.
    PlayerWon,
    /// Every player troop is down.
    EnemyWon,
}

impl Outcome {
    /// Whether the player won.
    #[must_use]
    pub const fn player_won(self) -> bool {
        matches!(self, Outcome::PlayerWon)
    }
}

/// Something that happened during a battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BattleEvent {
    /// Two gems traded places.
    Swapped {
        /// Side that moved.
        side: Side,
        /// The swap.
        mv: Move,
    },
    /// A swap made no match and was undone.
    SwapReverted {
        /// The undone swap.
        mv: Move,
    },
    /// A matched set is about to pop.
    MatchPopped {
        /// Side credited with the match.
        side: Side,
        /// Cascade level, 1 for the direct result of a swap.
        level: u32,
        /// Matched cells.
        cells: Vec<Coord>,
        /// Per-type tally.
        counts: GemCounts,
        /// Largest connected same-type group.
        largest_group: usize,
    },
    /// A troop gained mana.
    ManaGained(ManaGain),
    /// A skull strike landed.
    SkullStrike(SkullStrike),
    /// Matched gems left the board.
    CellsCleared {
        /// Removed gems and where they were.
        gems: Vec<(Coord, GemId)>,
    },
    /// Gravity and refill ran.
    Refilled(Collapse),
    /// Refill produced another match.
    Cascade {
        /// New cascade level.
        level: u32,
    },
    /// The player keeps the turn.
    ExtraTurn,
    /// The turn moved to the other side.
    TurnPassed {
        /// Side now acting.
        to: Side,
    },
    /// The board was regenerated because no legal move existed.
    Reshuffled {
        /// Boards generated.
        attempts: u32,
        /// Whether the final board has a legal move.
        playable: bool,
    },
    /// A troop used its ability.
    AbilityCast {
        /// Caster.
        caster: TroopRef,
        /// Ability name.
        ability: String,
        /// Effect text, `None` if nothing could be targeted.
        description: Option<String>,
    },
    /// A troop fell.
    TroopDefeated {
        /// The fallen troop.
        troop: TroopRef,
    },
    /// One side was wiped out.
    BattleOver {
        /// Winner.
        outcome: Outcome,
    },
    /// The once-per-battle end notification, sent after the end delay.
    BattleEnded {
        /// Whether the player won.
        player_won: bool,
    },
}

/// Pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Detect a match after a swap, or undo the swap.
    SwapCheck,
    /// Credit mana and skull damage for the current matched set.
    Pop,
    /// Remove matched gems, record deaths, check for game over.
    Clear,
    /// Gravity and refill.
    Fall,
    /// Look for a cascade, otherwise hand the turn over.
    Settle,
    /// Enemy front troop casts if ready.
    EnemyCast,
    /// Enemy picks and makes a swap.
    EnemyMove,
    /// Deliver the end-of-battle notification.
    EndNotice,
}

/// One advanced stage and what it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Stage that ran.
    pub stage: Stage,
    /// Events it produced, in order.
    pub events: Vec<BattleEvent>,
}

impl Step {
    /// Milliseconds a presenter should wait before advancing again.
    #[must_use]
    pub fn pause(&self, pacing: &Pacing) -> u64 {
        if self
            .events
            .iter()
            .any(|e| matches!(e, BattleEvent::BattleOver { .. }))
        {
            return pacing.end_ms;
        }

        match self.stage {
            Stage::SwapCheck => {
                if self.has(|e| matches!(e, BattleEvent::SwapReverted { .. })) {
                    pacing.swap_ms
                } else {
                    0
                }
            }
            Stage::Pop => {
                let attack = if self.has(|e| matches!(e, BattleEvent::SkullStrike(_))) {
                    pacing.attack_ms
                } else {
                    0
                };
                pacing.pop_ms + attack
            }
            Stage::Fall => pacing.fall_ms,
            Stage::Settle => {
                if self.has(|e| matches!(e, BattleEvent::TurnPassed { to: Side::Enemy })) {
                    pacing.enemy_ms / 2
                } else {
                    0
                }
            }
            Stage::EnemyCast => pacing.enemy_ms,
            Stage::EnemyMove => pacing.swap_ms,
            Stage::Clear | Stage::EndNotice => 0,
        }
    }

    fn has(&self, pred: impl Fn(&BattleEvent) -> bool) -> bool {
        self.events.iter().any(pred)
    }
}
