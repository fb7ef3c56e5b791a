//! Battle lifecycle: start, retry and the once-only end notification.

use crate::battle::{Battle, TroopTemplate};
use crate::config::BattleConfig;
use crate::error::{BattleError, BattleResult};

/// Owns the current battle and remembers the teams it was started with.
#[derive(Debug, Clone)]
pub struct Session {
    config: BattleConfig,
    next_seed: u64,
    last_teams: Option<(Vec<TroopTemplate>, Vec<TroopTemplate>)>,
    battle: Option<Battle>,
}

impl Session {
    /// Create a session. Each battle it starts uses the next seed after `seed`.
    #[must_use]
    pub const fn new(config: BattleConfig, seed: u64) -> Self {
        Self {
            config,
            next_seed: seed,
            last_teams: None,
            battle: None,
        }
    }

    /// Start a new battle, replacing the current one.
    ///
    /// # Errors
    ///
    /// Returns an error if the teams are invalid; the current battle and the
    /// remembered teams are left as they were.
    pub fn start(
        &mut self,
        player: &[TroopTemplate],
        enemy: &[TroopTemplate],
    ) -> BattleResult<&mut Battle> {
        let battle = Battle::new(player, enemy, self.config, self.next_seed)?;
        self.next_seed = self.next_seed.wrapping_add(1);
        self.last_teams = Some((player.to_vec(), enemy.to_vec()));
        Ok(self.battle.insert(battle))
    }

    /// Start again with the teams of the most recent [`Session::start`].
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::NoPreviousBattle`] if nothing was started yet.
    pub fn retry(&mut self) -> BattleResult<&mut Battle> {
        let (player, enemy) = self
            .last_teams
            .clone()
            .ok_or(BattleError::NoPreviousBattle)?;
        self.start(&player, &enemy)
    }

    /// Current battle, if any.
    #[must_use]
    pub const fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    /// Current battle, mutably.
    pub const fn battle_mut(&mut self) -> Option<&mut Battle> {
        self.battle.as_mut()
    }

    /// Seed the next battle will use.
    #[must_use]
    pub const fn next_seed(&self) -> u64 {
        self.next_seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{BattleEvent, Phase};
    use crate::lineup::Lineup;

    #[test]
    fn test_retry_needs_a_start() {
        let mut session = Session::new(BattleConfig::default(), 1);
        assert_eq!(session.retry().unwrap_err(), BattleError::NoPreviousBattle);
    }

    #[test]
    fn test_failed_start_keeps_current_battle() {
        let lineup = Lineup::demo();
        let mut session = Session::new(BattleConfig::default(), 10);
        session.start(&lineup.player, &lineup.enemy).unwrap();
        let board = session.battle().unwrap().board().clone();

        assert_eq!(
            session.start(&[], &lineup.enemy).unwrap_err(),
            BattleError::EmptyPlayerTeam
        );
        let mut five = lineup.player.clone();
        five.push(lineup.player[0].clone());
        assert!(matches!(
            session.start(&five, &lineup.enemy),
            Err(BattleError::TeamTooLarge { size: 5, max: 4 })
        ));

        assert_eq!(session.battle().unwrap().board(), &board);
        assert_eq!(session.next_seed(), 11);
    }

    #[test]
    fn test_retry_reuses_teams_with_next_seed() {
        let lineup = Lineup::demo();
        let mut session = Session::new(BattleConfig::default(), 3);
        let first = session
            .start(&lineup.player, &lineup.enemy)
            .unwrap()
            .board()
            .clone();
        let battle = session.retry().unwrap();
        assert_eq!(battle.phase(), Phase::PlayerTurn);
        assert_eq!(battle.player().len(), 4);
        assert_eq!(battle.enemy().len(), 3);
        assert_ne!(battle.board(), &first);
        assert_eq!(session.next_seed(), 5);
    }

    #[test]
    fn test_end_notification_once() {
        let lineup = Lineup::demo();
        let mut session = Session::new(BattleConfig::default(), 8);
        let battle = session.start(&lineup.player, &lineup.enemy).unwrap();
        let mut pilot = crate::battle::Autopilot::new(8);
        let mut ended = 0;
        for _ in 0..5_000 {
            pilot.take_turn(battle);
            for step in battle.run_until_idle() {
                ended += step
                    .events
                    .iter()
                    .filter(|e| matches!(e, BattleEvent::BattleEnded { .. }))
                    .count();
            }
            if battle.phase() == Phase::GameOver {
                break;
            }
        }
        assert_eq!(battle.phase(), Phase::GameOver);
        battle.run_until_idle();
        assert_eq!(ended, 1);
        assert!(battle.end_notified());
    }
}
