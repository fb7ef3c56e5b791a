//! Battle tuning and presentation pacing.

use serde::{Deserialize, Serialize};

use crate::board::BOARD_SIZE;

/// Rules that shape a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Board edge length.
    pub board_size: usize,
    /// Largest matched group needed for an extra player turn.
    pub bonus_group: usize,
    /// Extra skull damage per matched skull beyond three.
    pub skull_bonus: u32,
    /// Boards tried when reshuffling a deadlocked board.
    pub reshuffle_attempts: u32,
    /// Log entries a presenter should keep on screen.
    pub log_retention: usize,
    /// Largest player team a session accepts.
    pub max_player_team: usize,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            bonus_group: 4,
            skull_bonus: 2,
            reshuffle_attempts: 30,
            log_retention: 40,
            max_player_team: 4,
        }
    }
}

/// Presentation delays in milliseconds.
///
/// The engine never sleeps. Each pipeline stage names the delay a presenter
/// should wait before advancing to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    /// Swap slide.
    pub swap_ms: u64,
    /// Matched gems popping.
    pub pop_ms: u64,
    /// Gravity and refill.
    pub fall_ms: u64,
    /// Skull strike lunge.
    pub attack_ms: u64,
    /// Pause before the enemy acts; the enemy cast waits half of this.
    pub enemy_ms: u64,
    /// Pause between game over and the end notification.
    pub end_ms: u64,
    /// Idle time before a hint is shown.
    pub hint_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            swap_ms: 180,
            pop_ms: 320,
            fall_ms: 280,
            attack_ms: 350,
            enemy_ms: 900,
            end_ms: 1200,
            hint_ms: 3000,
        }
    }
}

impl Pacing {
    /// No delays at all, for headless runs.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            swap_ms: 0,
            pop_ms: 0,
            fall_ms: 0,
            attack_ms: 0,
            enemy_ms: 0,
            end_ms: 0,
            hint_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: BattleConfig = serde_json::from_str(r#"{"skull_bonus": 5}"#).unwrap();
        assert_eq!(config.skull_bonus, 5);
        assert_eq!(config.board_size, 8);
        assert_eq!(config.reshuffle_attempts, 30);
    }

    #[test]
    fn test_default_pacing() {
        let pacing = Pacing::default();
        assert_eq!(pacing.enemy_ms / 2, 450);
        assert_eq!(Pacing::instant().end_ms, 0);
    }
}
