//! Battle log entries for scrolling presenters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// Mana colors matched.
    MatchResource,
    /// Skull strike.
    SkullDamage,
    /// A troop fell.
    Death,
    /// Player keeps the turn.
    ExtraTurn,
    /// Battle start, no-match and deadlock notices.
    System,
    /// Ability cast.
    Spell,
    /// Enemy AI moves.
    EnemyMove,
}

impl LogKind {
    /// Short tag for plain-text output.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            LogKind::MatchResource => "match",
            LogKind::SkullDamage => "damage",
            LogKind::Death => "death",
            LogKind::ExtraTurn => "extra",
            LogKind::System => "system",
            LogKind::Spell => "spell",
            LogKind::EnemyMove => "enemy",
        }
    }
}

/// One log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Category.
    pub kind: LogKind,
    /// Human-readable text.
    pub text: String,
}

impl LogEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(kind: LogKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.tag(), self.text)
    }
}
