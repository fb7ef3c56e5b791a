//! CLI command implementations for Gemclash.

pub(crate) mod play;
pub(crate) mod run;
pub(crate) mod tournament;

mod output;

use clap::ValueEnum;
use gemclash::Lineup;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<gemclash::TeamFileError> for CliError {
    fn from(e: gemclash::TeamFileError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<gemclash::BattleError> for CliError {
    fn from(e: gemclash::BattleError) -> Self {
        Self::new(e.to_string())
    }
}

/// Load the team file, or fall back to the demo lineup.
fn load_lineup(teams: Option<PathBuf>) -> Result<Lineup, CliError> {
    match teams {
        Some(path) => Ok(Lineup::load(&path)?),
        None => Ok(Lineup::demo()),
    }
}

/// Use the given seed or derive one from the clock.
fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() ^ u64::from(d.subsec_nanos()))
            .unwrap_or(42)
    })
}
