// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Gemclash: a deterministic match-3 combat engine.
//!
//! Two teams of troops fight over a shared 8x8 gem board. Matching colored
//! gems charges the troops of that color; matching skulls makes the front
//! troop strike the enemy front. Full mana unlocks a troop's ability.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Session / simulate / CLI          │
//! ├─────────────────────────────────────┤
//! │   Battle: staged turn pipeline      │
//! ├─────────────────────────────────────┤
//! │   Board: matches, moves, gravity    │
//! └─────────────────────────────────────┘
//! ```
//!
//! A battle is reproducible from its seed, its troop templates and the
//! sequence of player inputs.

pub mod battle;
pub mod board;
pub mod config;
pub mod error;
pub mod lineup;
pub mod session;
pub mod simulate;

pub use error::{BattleError, BattleResult, TeamFileError};

// Re-export the types most callers need at crate root
pub use battle::{
    Autopilot, Battle, BattleEvent, LogEntry, LogKind, Outcome, Phase, Rejection, Side, Stage,
    Step, TroopTemplate,
};
pub use board::{Board, Coord, GemType, Move};
pub use config::{BattleConfig, Pacing};
pub use lineup::Lineup;
pub use session::Session;
pub use simulate::{BattleReport, simulate};
