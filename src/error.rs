//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Reasons a battle cannot be started.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    /// The player brought no troops.
    #[error("player team is empty")]
    EmptyPlayerTeam,

    /// The enemy side has no troops.
    #[error("enemy team is empty")]
    EmptyEnemyTeam,

    /// More player troops than the configuration allows.
    #[error("player team has {size} troops, at most {max} allowed")]
    TeamTooLarge {
        /// Troops supplied.
        size: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Board edge too short to ever hold a run.
    #[error("board size {size} is too small (minimum {min})")]
    BoardTooSmall {
        /// Requested edge length.
        size: usize,
        /// Smallest usable edge length.
        min: usize,
    },

    /// Retry was requested before any battle was started.
    #[error("no previous battle to retry")]
    NoPreviousBattle,
}

/// Result type for starting battles.
pub type BattleResult<T> = Result<T, BattleError>;

/// Failures loading a team file.
#[derive(Error, Debug)]
pub enum TeamFileError {
    /// File could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// File is not a valid team document.
    #[error("invalid team file {path}: {source}")]
    Json {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(BattleError::EmptyPlayerTeam.to_string(), "player team is empty");
        let err = BattleError::TeamTooLarge { size: 5, max: 4 };
        assert_eq!(err.to_string(), "player team has 5 troops, at most 4 allowed");
    }
}
