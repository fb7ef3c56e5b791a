//! Output formatting utilities for CLI.

// Averages over battle counts are display values
#![allow(clippy::cast_precision_loss)]

use gemclash::battle::BattleStats;
use gemclash::simulate::{BattleReport, TroopSummary};
use gemclash::{LogEntry, Outcome};
use serde::Serialize;
use std::fmt::Write;

/// JSON-serializable battle result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBattleResult<'a> {
    /// Random seed used.
    seed: u64,
    /// Winner (null if the battle was abandoned).
    outcome: Option<Outcome>,
    /// Player turns taken.
    turns: u32,
    /// Engine counters.
    stats: &'a BattleStats,
    /// Player troops at the end.
    player: &'a [TroopSummary],
    /// Enemy troops at the end.
    enemy: &'a [TroopSummary],
    /// Battle log (omitted with `--quiet`).
    #[serde(skip_serializing_if = "Option::is_none")]
    log: Option<&'a [LogEntry]>,
}

impl<'a> JsonBattleResult<'a> {
    /// Create from a report.
    pub(super) fn new(report: &'a BattleReport, with_log: bool) -> Self {
        Self {
            seed: report.seed,
            outcome: report.outcome,
            turns: report.turns,
            stats: &report.stats,
            player: &report.player,
            enemy: &report.enemy,
            log: with_log.then_some(report.log.as_slice()),
        }
    }
}

/// Format a battle report as human-readable text.
pub(super) fn format_text(report: &BattleReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Battle Result (seed: {})", report.seed);
    let verdict = match report.outcome {
        Some(Outcome::PlayerWon) => "Victory",
        Some(Outcome::EnemyWon) => "Defeat",
        None => "Abandoned",
    };
    let _ = writeln!(output, "  Result: {verdict}");
    let _ = writeln!(output, "  Turns: {}", report.turns);
    let _ = writeln!(
        output,
        "  Cascades: {} (longest chain {})",
        report.stats.cascades, report.stats.longest_chain
    );
    let _ = writeln!(
        output,
        "  Extra turns: {}  Casts: {}  Reshuffles: {}\n",
        report.stats.extra_turns, report.stats.casts, report.stats.reshuffles
    );

    for (label, troops) in [("Player", &report.player), ("Enemy", &report.enemy)] {
        let _ = writeln!(output, "  {label}:");
        for troop in troops {
            let _ = write!(output, "    {}: {}/{}", troop.name, troop.life, troop.max_life);
            if troop.life == 0 {
                output.push_str(" [defeated]");
            }
            output.push('\n');
        }
    }

    output
}

/// Tournament statistics for aggregated results.
#[derive(Debug, Default, Clone, PartialEq)]
pub(super) struct TournamentStats {
    /// Total battles played.
    pub(super) games_played: u64,
    /// Battles the player side won.
    pub(super) player_wins: u64,
    /// Battles the enemy side won.
    pub(super) enemy_wins: u64,
    /// Battles abandoned at the turn cap.
    pub(super) unfinished: u64,
    /// Player turns across all battles.
    total_turns: u64,
    /// Cascade levels across all battles.
    total_cascades: u64,
    /// Deepest chain seen in any battle.
    longest_chain: u32,
    /// Ability casts across all battles.
    total_casts: u64,
    /// Reshuffles across all battles.
    total_reshuffles: u64,
}

impl TournamentStats {
    /// Add a battle report to the stats.
    pub(super) fn add_report(&mut self, report: &BattleReport) {
        self.games_played += 1;
        match report.outcome {
            Some(Outcome::PlayerWon) => self.player_wins += 1,
            Some(Outcome::EnemyWon) => self.enemy_wins += 1,
            None => self.unfinished += 1,
        }
        self.total_turns += u64::from(report.turns);
        self.total_cascades += u64::from(report.stats.cascades);
        self.longest_chain = self.longest_chain.max(report.stats.longest_chain);
        self.total_casts += u64::from(report.stats.casts);
        self.total_reshuffles += u64::from(report.stats.reshuffles);
    }

    /// Merge stats accumulated on another thread.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.player_wins += other.player_wins;
        self.enemy_wins += other.enemy_wins;
        self.unfinished += other.unfinished;
        self.total_turns += other.total_turns;
        self.total_cascades += other.total_cascades;
        self.longest_chain = self.longest_chain.max(other.longest_chain);
        self.total_casts += other.total_casts;
        self.total_reshuffles += other.total_reshuffles;
    }

    fn per_game(&self, total: u64) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        total as f64 / self.games_played as f64
    }

    /// Player win rate (0.0-1.0).
    pub(super) fn win_rate(&self) -> f64 {
        self.per_game(self.player_wins)
    }

    /// Average player turns per battle.
    pub(super) fn avg_turns(&self) -> f64 {
        self.per_game(self.total_turns)
    }

    /// Average cascade levels per battle.
    pub(super) fn avg_cascades(&self) -> f64 {
        self.per_game(self.total_cascades)
    }

    /// Average casts per battle.
    pub(super) fn avg_casts(&self) -> f64 {
        self.per_game(self.total_casts)
    }

    /// Average reshuffles per battle.
    pub(super) fn avg_reshuffles(&self) -> f64 {
        self.per_game(self.total_reshuffles)
    }
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    games_played: u64,
    player_wins: u64,
    enemy_wins: u64,
    unfinished: u64,
    win_rate: f64,
    avg_turns: f64,
    avg_cascades: f64,
    longest_chain: u32,
    avg_casts: f64,
    avg_reshuffles: f64,
}

impl JsonTournamentResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &TournamentStats) -> Self {
        Self {
            games_played: stats.games_played,
            player_wins: stats.player_wins,
            enemy_wins: stats.enemy_wins,
            unfinished: stats.unfinished,
            win_rate: stats.win_rate(),
            avg_turns: stats.avg_turns(),
            avg_cascades: stats.avg_cascades(),
            longest_chain: stats.longest_chain,
            avg_casts: stats.avg_casts(),
            avg_reshuffles: stats.avg_reshuffles(),
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Tournament Results ({} battles)", stats.games_played);
    output.push_str("========================================\n\n");

    let _ = writeln!(
        output,
        "  Player wins: {} ({:.1}%)",
        stats.player_wins,
        stats.win_rate() * 100.0
    );
    let _ = writeln!(output, "  Enemy wins:  {}", stats.enemy_wins);
    if stats.unfinished > 0 {
        let _ = writeln!(output, "  Abandoned:   {}", stats.unfinished);
    }

    let _ = writeln!(output, "\nAverage Battle Length: {:.1} turns", stats.avg_turns());
    let _ = writeln!(
        output,
        "Average Cascades: {:.2} (longest chain {})",
        stats.avg_cascades(),
        stats.longest_chain
    );
    let _ = writeln!(output, "Average Casts: {:.2}", stats.avg_casts());
    let _ = writeln!(output, "Average Reshuffles: {:.3}", stats.avg_reshuffles());

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats) -> String {
    let mut output = String::new();

    output.push_str(
        "games,player_wins,enemy_wins,unfinished,win_rate,avg_turns,avg_cascades,longest_chain,avg_casts\n",
    );
    let _ = writeln!(
        output,
        "{},{},{},{},{:.4},{:.2},{:.2},{},{:.2}",
        stats.games_played,
        stats.player_wins,
        stats.enemy_wins,
        stats.unfinished,
        stats.win_rate(),
        stats.avg_turns(),
        stats.avg_cascades(),
        stats.longest_chain,
        stats.avg_casts()
    );

    output
}
