//! The battle aggregate and its staged resolution pipeline.
//!
//! Player input only starts a pipeline. [`Battle::step`] then advances one
//! stage at a time so a presenter can pace the animation; headless callers
//! use [`Battle::run_until_idle`]. While a stage is pending, new input is
//! rejected.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ai;
use super::deadlock::reshuffle;
use super::events::{BattleEvent, Outcome, Stage, Step};
use super::log::{LogEntry, LogKind};
use super::resources::apply_resources;
use super::team::{Side, Team, TroopRef};
use super::troop::{Troop, TroopTemplate};
use crate::board::{
    Board, Coord, GemCounts, MIN_RUN, MatchSet, Move, clear_cells, collapse, find_matches,
    find_valid_moves, generate_board, has_valid_move, largest_group,
};
use crate::config::BattleConfig;
use crate::error::{BattleError, BattleResult};

/// Whose move it is, or why nobody can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for a player swap or cast.
    PlayerTurn,
    /// A swap is being resolved.
    Resolving,
    /// The enemy is about to cast or move.
    EnemyDeciding,
    /// One side has been wiped out.
    GameOver,
}

/// Why an input was ignored. The battle is unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The battle is over.
    #[error("the battle is over")]
    GameOver,
    /// A resolution is still in flight.
    #[error("a move is still resolving")]
    Busy,
    /// The enemy is acting.
    #[error("it is not the player's turn")]
    NotPlayerTurn,
    /// A cell is off the board.
    #[error("cell {0} is off the board")]
    OutOfBounds(Coord),
    /// The two cells are not orthogonal neighbors.
    #[error("cells {0} and {1} are not adjacent")]
    NotAdjacent(Coord, Coord),
    /// No troop at that position.
    #[error("no troop at position {0}")]
    NoSuchTroop(usize),
    /// The troop has fallen.
    #[error("troop {0} has been defeated")]
    TroopDefeated(usize),
    /// The troop's mana is not full.
    #[error("troop {0} does not have enough mana")]
    NotReady(usize),
}

/// Running totals for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStats {
    /// Player swaps that matched.
    pub player_moves: u32,
    /// Enemy swaps that matched.
    pub enemy_moves: u32,
    /// Cascade levels beyond the first, summed over all moves.
    pub cascades: u32,
    /// Deepest cascade level reached by one move.
    pub longest_chain: u32,
    /// Extra turns granted to the player.
    pub extra_turns: u32,
    /// Abilities cast by either side.
    pub casts: u32,
    /// Deadlock reshuffles.
    pub reshuffles: u32,
}

/// Bonus tracking across the cascade levels of one move.
#[derive(Debug, Clone, Copy)]
struct Chain {
    level: u32,
    bonus: bool,
}

/// Next stage to run.
#[derive(Debug, Clone)]
enum Pending {
    SwapCheck { side: Side, mv: Move },
    Pop { side: Side, matched: MatchSet, chain: Chain },
    Clear { side: Side, matched: MatchSet, chain: Chain },
    Fall { side: Side, chain: Chain },
    Settle { side: Side, chain: Chain },
    EnemyCast,
    EnemyMove,
    EndNotice,
}

impl Pending {
    const fn stage(&self) -> Stage {
        match self {
            Pending::SwapCheck { .. } => Stage::SwapCheck,
            Pending::Pop { .. } => Stage::Pop,
            Pending::Clear { .. } => Stage::Clear,
            Pending::Fall { .. } => Stage::Fall,
            Pending::Settle { .. } => Stage::Settle,
            Pending::EnemyCast => Stage::EnemyCast,
            Pending::EnemyMove => Stage::EnemyMove,
            Pending::EndNotice => Stage::EndNotice,
        }
    }
}

/// A battle: the board, both teams and the turn state machine.
#[derive(Debug, Clone)]
pub struct Battle {
    config: BattleConfig,
    board: Board,
    player: Team,
    enemy: Team,
    phase: Phase,
    pending: Option<Pending>,
    rng: ChaCha8Rng,
    hint_rng: ChaCha8Rng,
    log: Vec<LogEntry>,
    outcome: Option<Outcome>,
    end_notified: bool,
    stats: BattleStats,
}

impl Battle {
    /// Start a battle on a freshly generated board.
    ///
    /// # Errors
    ///
    /// Returns an error if either team is empty, the player team is larger
    /// than `config.max_player_team`, or the board is too small.
    pub fn new(
        player: &[TroopTemplate],
        enemy: &[TroopTemplate],
        config: BattleConfig,
        seed: u64,
    ) -> BattleResult<Self> {
        validate(player, enemy, &config)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let board = generate_board(config.board_size, &mut rng);
        Ok(Self::assemble(player, enemy, config, board, rng, seed))
    }

    /// Start a battle on a given board. `config.board_size` follows the board.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Battle::new`].
    pub fn with_board(
        player: &[TroopTemplate],
        enemy: &[TroopTemplate],
        config: BattleConfig,
        board: Board,
        seed: u64,
    ) -> BattleResult<Self> {
        let config = BattleConfig {
            board_size: board.size(),
            ..config
        };
        validate(player, enemy, &config)?;
        let rng = ChaCha8Rng::seed_from_u64(seed);
        Ok(Self::assemble(player, enemy, config, board, rng, seed))
    }

    fn assemble(
        player: &[TroopTemplate],
        enemy: &[TroopTemplate],
        config: BattleConfig,
        board: Board,
        rng: ChaCha8Rng,
        seed: u64,
    ) -> Self {
        let mut hint_rng = ChaCha8Rng::seed_from_u64(seed);
        hint_rng.set_stream(1);

        let mut battle = Self {
            config,
            board,
            player: Team::from_templates(player),
            enemy: Team::from_templates(enemy),
            phase: Phase::PlayerTurn,
            pending: None,
            rng,
            hint_rng,
            log: Vec::new(),
            outcome: None,
            end_notified: false,
            stats: BattleStats::default(),
        };

        tracing::info!(
            seed,
            player = battle.player.len(),
            enemy = battle.enemy.len(),
            "battle started"
        );
        battle.push_log(LogKind::System, "Battle started! Swap gems to match 3+.");
        battle.push_log(
            LogKind::System,
            "💀 Skulls deal damage · Match 4+ for an EXTRA TURN · Cast abilities when mana is full!",
        );
        let mut events = Vec::new();
        battle.resolve_deadlock(&mut events);
        battle
    }

    // ── Accessors ────────────────────────────────────────────

    /// Rules in force.
    #[must_use]
    pub const fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Current board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Player team.
    #[must_use]
    pub const fn player(&self) -> &Team {
        &self.player
    }

    /// Enemy team.
    #[must_use]
    pub const fn enemy(&self) -> &Team {
        &self.enemy
    }

    /// Team for `side`.
    #[must_use]
    pub const fn team(&self, side: Side) -> &Team {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    #[cfg(test)]
    pub(crate) fn team_mut(&mut self, side: Side) -> &mut Team {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Winner, once decided.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Whether no stage is pending.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    /// Stage that the next [`Battle::step`] would run.
    #[must_use]
    pub fn next_stage(&self) -> Option<Stage> {
        self.pending.as_ref().map(Pending::stage)
    }

    /// Whether the end notification has been delivered.
    #[must_use]
    pub const fn end_notified(&self) -> bool {
        self.end_notified
    }

    /// Running totals.
    #[must_use]
    pub const fn stats(&self) -> &BattleStats {
        &self.stats
    }

    /// Log entries not yet drained.
    #[must_use]
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Take all accumulated log entries.
    pub fn drain_log(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.log)
    }

    // ── Player input ─────────────────────────────────────────

    /// Swap two adjacent gems for the player and start resolving.
    ///
    /// The returned events cover the swap itself; the rest of the resolution
    /// comes from [`Battle::step`].
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`], leaving the battle untouched, if it is not the
    /// player's idle turn or the cells are off the board or not adjacent.
    pub fn attempt_swap(&mut self, from: Coord, to: Coord) -> Result<Vec<BattleEvent>, Rejection> {
        self.input_gate()?;
        for cell in [from, to] {
            if !self.board.in_bounds(cell) {
                return Err(Rejection::OutOfBounds(cell));
            }
        }
        if !from.is_adjacent(to) {
            return Err(Rejection::NotAdjacent(from, to));
        }

        let mv = Move::new(from, to);
        self.board.swap(from, to);
        self.phase = Phase::Resolving;
        self.pending = Some(Pending::SwapCheck {
            side: Side::Player,
            mv,
        });
        Ok(vec![BattleEvent::Swapped {
            side: Side::Player,
            mv,
        }])
    }

    /// Cast the ability of player troop `index`.
    ///
    /// Mana resets to zero and the effect applies at once. Casting does not
    /// end the turn.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`], leaving the battle untouched, if it is not the
    /// player's idle turn or the troop is missing, defeated or not ready.
    pub fn cast(&mut self, index: usize) -> Result<Vec<BattleEvent>, Rejection> {
        self.input_gate()?;
        let troop = self.player.get(index).ok_or(Rejection::NoSuchTroop(index))?;
        if !troop.is_alive() {
            return Err(Rejection::TroopDefeated(index));
        }
        if !troop.is_ready() {
            return Err(Rejection::NotReady(index));
        }

        let mut events = Vec::new();
        self.cast_for(TroopRef::new(Side::Player, index), &mut events);
        if let Some(outcome) = self.decided() {
            self.finish(outcome, &mut events);
        }
        Ok(events)
    }

    /// Suggest a legal player move without changing the battle.
    ///
    /// Only available on an idle player turn. Uses its own random stream so
    /// asking for hints does not change how the battle plays out.
    pub fn hint(&mut self) -> Option<Move> {
        if self.phase != Phase::PlayerTurn || self.pending.is_some() {
            return None;
        }
        let moves = find_valid_moves(&self.board);
        if moves.is_empty() {
            return None;
        }
        Some(moves[self.hint_rng.gen_range(0..moves.len())])
    }

    fn input_gate(&self) -> Result<(), Rejection> {
        match self.phase {
            Phase::GameOver => Err(Rejection::GameOver),
            Phase::EnemyDeciding => Err(Rejection::NotPlayerTurn),
            Phase::Resolving => Err(Rejection::Busy),
            Phase::PlayerTurn if self.pending.is_some() => Err(Rejection::Busy),
            Phase::PlayerTurn => Ok(()),
        }
    }

    // ── Pipeline ─────────────────────────────────────────────

    /// Run the next pending stage. `None` when nothing is pending.
    pub fn step(&mut self) -> Option<Step> {
        let pending = self.pending.take()?;
        let stage = pending.stage();
        let mut events = Vec::new();

        match pending {
            Pending::SwapCheck { side, mv } => self.swap_check(side, mv, &mut events),
            Pending::Pop {
                side,
                matched,
                chain,
            } => self.pop(side, matched, chain, &mut events),
            Pending::Clear {
                side,
                matched,
                chain,
            } => self.clear(side, &matched, chain, &mut events),
            Pending::Fall { side, chain } => {
                let refill = collapse(&mut self.board, &mut self.rng);
                events.push(BattleEvent::Refilled(refill));
                self.pending = Some(Pending::Settle { side, chain });
            }
            Pending::Settle { side, chain } => self.settle(side, chain, &mut events),
            Pending::EnemyCast => self.enemy_cast(&mut events),
            Pending::EnemyMove => self.enemy_move(&mut events),
            Pending::EndNotice => {
                if !self.end_notified
                    && let Some(outcome) = self.outcome
                {
                    self.end_notified = true;
                    events.push(BattleEvent::BattleEnded {
                        player_won: outcome.player_won(),
                    });
                }
            }
        }

        Some(Step { stage, events })
    }

    /// Run every pending stage, including a whole enemy turn.
    ///
    /// Stops when the player must act or the battle has ended.
    pub fn run_until_idle(&mut self) -> Vec<Step> {
        let mut steps = Vec::new();
        while let Some(step) = self.step() {
            steps.push(step);
        }
        steps
    }

    fn swap_check(&mut self, side: Side, mv: Move, events: &mut Vec<BattleEvent>) {
        let matched = find_matches(&self.board);
        if matched.is_empty() {
            self.board.swap(mv.from, mv.to);
            events.push(BattleEvent::SwapReverted { mv });
            self.push_log(LogKind::System, "No match, try a different direction.");
            self.phase = Phase::PlayerTurn;
            if side == Side::Enemy {
                events.push(BattleEvent::TurnPassed { to: Side::Player });
                self.resolve_deadlock(events);
            }
            return;
        }

        match side {
            Side::Player => self.stats.player_moves += 1,
            Side::Enemy => self.stats.enemy_moves += 1,
        }
        self.pending = Some(Pending::Pop {
            side,
            matched,
            chain: Chain {
                level: 1,
                bonus: false,
            },
        });
    }

    fn pop(&mut self, side: Side, matched: MatchSet, chain: Chain, events: &mut Vec<BattleEvent>) {
        let largest = largest_group(&self.board, &matched);
        let chain = Chain {
            bonus: chain.bonus || largest >= self.config.bonus_group,
            ..chain
        };
        let counts = GemCounts::tally(&self.board, &matched);
        events.push(BattleEvent::MatchPopped {
            side,
            level: chain.level,
            cells: matched.to_vec(),
            counts,
            largest_group: largest,
        });

        let (attackers, defenders) = match side {
            Side::Player => (&mut self.player, &mut self.enemy),
            Side::Enemy => (&mut self.enemy, &mut self.player),
        };
        let report = apply_resources(side, &counts, attackers, defenders, self.config.skull_bonus);

        let mana: Vec<String> = counts
            .mana()
            .map(|(kind, count)| format!("{kind}×{count}"))
            .collect();
        if !mana.is_empty() {
            let who = match side {
                Side::Player => "You",
                Side::Enemy => "Enemy",
            };
            self.push_log(
                LogKind::MatchResource,
                format!("{who} matched: {}", mana.join(", ")),
            );
        }
        events.extend(report.mana.into_iter().map(BattleEvent::ManaGained));

        if let Some(strike) = report.strike {
            let text = format!(
                "💀 {} skulls! {} deals {} damage to {}!",
                strike.skulls,
                self.troop_name(strike.attacker),
                strike.damage,
                self.troop_name(strike.defender)
            );
            self.push_log(LogKind::SkullDamage, text);
            events.push(BattleEvent::SkullStrike(strike));
        }

        self.pending = Some(Pending::Clear {
            side,
            matched,
            chain,
        });
    }

    fn clear(&mut self, side: Side, matched: &MatchSet, chain: Chain, events: &mut Vec<BattleEvent>) {
        let removed = clear_cells(&mut self.board, matched);
        events.push(BattleEvent::CellsCleared {
            gems: removed.into_iter().map(|(coord, gem)| (coord, gem.id)).collect(),
        });
        self.record_deaths(events);

        if let Some(outcome) = self.decided() {
            self.refill_quietly(events);
            self.finish(outcome, events);
            return;
        }

        self.pending = Some(Pending::Fall { side, chain });
    }

    /// Refill the board and clear whatever runs the refill lines up until
    /// none are left. Nothing is awarded: the battle is already decided.
    fn refill_quietly(&mut self, events: &mut Vec<BattleEvent>) {
        loop {
            let refill = collapse(&mut self.board, &mut self.rng);
            events.push(BattleEvent::Refilled(refill));
            let leftover = find_matches(&self.board);
            if leftover.is_empty() {
                return;
            }
            let removed = clear_cells(&mut self.board, &leftover);
            events.push(BattleEvent::CellsCleared {
                gems: removed.into_iter().map(|(coord, gem)| (coord, gem.id)).collect(),
            });
        }
    }

    fn settle(&mut self, side: Side, chain: Chain, events: &mut Vec<BattleEvent>) {
        let next = find_matches(&self.board);
        if !next.is_empty() {
            let chain = Chain {
                level: chain.level + 1,
                ..chain
            };
            self.stats.cascades += 1;
            self.stats.longest_chain = self.stats.longest_chain.max(chain.level);
            tracing::debug!(%side, level = chain.level, cells = next.len(), "cascade");
            events.push(BattleEvent::Cascade { level: chain.level });
            self.pending = Some(Pending::Pop {
                side,
                matched: next,
                chain,
            });
            return;
        }

        self.stats.longest_chain = self.stats.longest_chain.max(chain.level);
        match side {
            Side::Player if chain.bonus => {
                self.stats.extra_turns += 1;
                self.push_log(LogKind::ExtraTurn, "⭐ Match of 4+! EXTRA TURN!");
                events.push(BattleEvent::ExtraTurn);
                self.phase = Phase::PlayerTurn;
                self.resolve_deadlock(events);
            }
            Side::Player => {
                self.phase = Phase::EnemyDeciding;
                events.push(BattleEvent::TurnPassed { to: Side::Enemy });
                self.pending = Some(Pending::EnemyCast);
            }
            Side::Enemy => {
                self.phase = Phase::PlayerTurn;
                events.push(BattleEvent::TurnPassed { to: Side::Player });
                self.resolve_deadlock(events);
            }
        }
    }

    fn enemy_cast(&mut self, events: &mut Vec<BattleEvent>) {
        if let Some(index) = self.enemy.front_index()
            && self.enemy.get(index).is_some_and(Troop::is_ready)
        {
            self.cast_for(TroopRef::new(Side::Enemy, index), events);
            if let Some(outcome) = self.decided() {
                self.finish(outcome, events);
                return;
            }
        }
        self.pending = Some(Pending::EnemyMove);
    }

    fn enemy_move(&mut self, events: &mut Vec<BattleEvent>) {
        let Some(mv) = ai::choose_move(&self.board, &mut self.rng) else {
            self.push_log(
                LogKind::EnemyMove,
                "Enemy has no valid moves. Reshuffling board…",
            );
            self.reshuffle_board(events);
            self.phase = Phase::PlayerTurn;
            events.push(BattleEvent::TurnPassed { to: Side::Player });
            return;
        };

        self.push_log(
            LogKind::EnemyMove,
            format!("Enemy swaps {} ↔ {}", mv.from, mv.to),
        );
        self.board.swap(mv.from, mv.to);
        self.phase = Phase::Resolving;
        events.push(BattleEvent::Swapped {
            side: Side::Enemy,
            mv,
        });
        self.pending = Some(Pending::SwapCheck {
            side: Side::Enemy,
            mv,
        });
    }

    // ── Shared steps ─────────────────────────────────────────

    /// Zero the caster's mana, apply its ability and record any deaths.
    fn cast_for(&mut self, caster: TroopRef, events: &mut Vec<BattleEvent>) {
        let (allies, enemies) = match caster.side {
            Side::Player => (&mut self.player, &mut self.enemy),
            Side::Enemy => (&mut self.enemy, &mut self.player),
        };
        let Some(troop) = allies.get_mut(caster.index) else {
            return;
        };
        troop.mana = 0;
        let ability = troop.template.ability.clone();
        let description = ability.cast(caster.index, allies, enemies, &mut self.rng);

        self.stats.casts += 1;
        tracing::debug!(side = %caster.side, index = caster.index, ability = %ability.name, "ability cast");
        if let Some(text) = &description {
            self.push_log(LogKind::Spell, format!("✨ {text}"));
        }
        events.push(BattleEvent::AbilityCast {
            caster,
            ability: ability.name,
            description,
        });
        self.record_deaths(events);
    }

    /// Report each newly fallen troop once, clearing its mana.
    fn record_deaths(&mut self, events: &mut Vec<BattleEvent>) {
        let mut fallen = Vec::new();
        for (side, team) in [(Side::Player, &mut self.player), (Side::Enemy, &mut self.enemy)] {
            for (index, troop) in team.iter_mut().enumerate() {
                if !troop.is_alive() && !troop.death_logged {
                    troop.life = 0;
                    troop.mana = 0;
                    troop.death_logged = true;
                    fallen.push((TroopRef::new(side, index), troop.name().to_string()));
                }
            }
        }

        for (troop, name) in fallen {
            self.push_log(LogKind::Death, format!("☠️ {name} has been defeated!"));
            events.push(BattleEvent::TroopDefeated { troop });
        }
    }

    /// Winner if one side is wiped out. A wiped player team loses even if
    /// the enemy is gone too.
    fn decided(&self) -> Option<Outcome> {
        if self.player.is_defeated() {
            Some(Outcome::EnemyWon)
        } else if self.enemy.is_defeated() {
            Some(Outcome::PlayerWon)
        } else {
            None
        }
    }

    fn finish(&mut self, outcome: Outcome, events: &mut Vec<BattleEvent>) {
        self.outcome = Some(outcome);
        self.phase = Phase::GameOver;
        self.pending = Some(Pending::EndNotice);
        let text = if outcome.player_won() {
            "🏆 VICTORY! You defeated the enemy team!"
        } else {
            "☠️ DEFEAT. Your team has been wiped out…"
        };
        self.push_log(LogKind::System, text);
        tracing::info!(?outcome, stats = ?self.stats, "battle over");
        events.push(BattleEvent::BattleOver { outcome });
    }

    /// Reshuffle if the player has no legal move.
    fn resolve_deadlock(&mut self, events: &mut Vec<BattleEvent>) {
        if has_valid_move(&self.board) {
            return;
        }
        self.push_log(LogKind::System, "🔄 No valid moves, board reshuffled!");
        self.reshuffle_board(events);
    }

    fn reshuffle_board(&mut self, events: &mut Vec<BattleEvent>) {
        let result = reshuffle(
            self.board.size(),
            self.config.reshuffle_attempts,
            &mut self.rng,
        );
        self.board = result.board;
        self.stats.reshuffles += 1;
        events.push(BattleEvent::Reshuffled {
            attempts: result.attempts,
            playable: result.playable,
        });
    }

    fn troop_name(&self, troop: TroopRef) -> String {
        self.team(troop.side)
            .get(troop.index)
            .map_or_else(String::new, |t| t.name().to_string())
    }

    fn push_log(&mut self, kind: LogKind, text: impl Into<String>) {
        self.log.push(LogEntry::new(kind, text));
    }
}

fn validate(
    player: &[TroopTemplate],
    enemy: &[TroopTemplate],
    config: &BattleConfig,
) -> BattleResult<()> {
    if player.is_empty() {
        return Err(BattleError::EmptyPlayerTeam);
    }
    if player.len() > config.max_player_team {
        return Err(BattleError::TeamTooLarge {
            size: player.len(),
            max: config.max_player_team,
        });
    }
    if enemy.is_empty() {
        return Err(BattleError::EmptyEnemyTeam);
    }
    if config.board_size < MIN_RUN {
        return Err(BattleError::BoardTooSmall {
            size: config.board_size,
            min: MIN_RUN,
        });
    }
    Ok(())
}
