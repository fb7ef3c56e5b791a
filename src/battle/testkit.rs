//! Shared fixtures for unit tests.

use super::ability::{Ability, AbilityEffect, TargetPolicy};
use super::troop::TroopTemplate;
use crate::board::{Board, GemType};

/// 30 life, 10 mana, casts a 5 damage front strike.
pub(crate) fn template(name: &str, color: GemType, attack: u32, armor: u32) -> TroopTemplate {
    TroopTemplate {
        id: name.to_lowercase().replace(' ', "_"),
        name: name.to_string(),
        color,
        attack,
        armor,
        max_life: 30,
        mana_cost: 10,
        ability: Ability {
            name: "Strike".to_string(),
            effect: AbilityEffect::Damage {
                amount: 5,
                target: TargetPolicy::Front,
            },
        },
    }
}

/// Purple, unarmored, 200 life. Survives any short exchange.
pub(crate) fn tough_template(name: &str) -> TroopTemplate {
    TroopTemplate {
        armor: 0,
        max_life: 200,
        ..template(name, GemType::Purple, 5, 0)
    }
}

pub(crate) fn board(rows: &[&str]) -> Board {
    Board::from_rows(rows).unwrap()
}

/// No runs and no legal move.
pub(crate) fn deadlocked_board() -> Board {
    board(&[
        "RGPRGPRG", "BYNBYNBY", "GPRGPRGP", "YNBYNBYN", "PRGPRGPR", "NBYNBYNB", "RGPRGPRG",
        "BYNBYNBY",
    ])
}

/// Exactly one legal move, (0,2) with (1,2), matching three skulls.
pub(crate) fn one_move_board() -> Board {
    board(&[
        "SSPRGPRG", "BYSBYNBY", "GPRGPRGP", "YNBYNBYN", "PRGPRGPR", "NBYNBYNB", "RGPRGPRG",
        "BYNBYNBY",
    ])
}

/// (0,2) with (1,2) lines up four yellows.
pub(crate) fn bonus_board() -> Board {
    board(&[
        "YYPYGPRG", "BYYBYNBY", "GPRGPRGP", "YNBYNBYN", "PRGPRGPR", "NBYNBYNB", "RGPRGPRG",
        "BYNBYNBY",
    ])
}
