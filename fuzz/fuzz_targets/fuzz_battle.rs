#![no_main]

//! Battle input fuzzer.
//!
//! Feeds arbitrary swap, cast, hint and step sequences into a battle,
//! including input while a resolution is in flight, and checks every
//! invariant after each action.

use arbitrary::Arbitrary;
use gemclash::battle::check_invariants;
use gemclash::{Battle, Coord, Lineup, Phase};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated player action.
#[derive(Arbitrary, Debug, Clone)]
enum Action {
    /// Swap two cells; coordinates may be off the board or not adjacent.
    Swap { r1: u8, c1: u8, r2: u8, c2: u8 },
    /// Cast the ability of a player troop.
    Cast { index: u8 },
    /// Ask for a hint.
    Hint,
    /// Advance one pipeline stage.
    Step,
    /// Run every pending stage.
    Settle,
}

/// Structured input for battle fuzzing.
#[derive(Arbitrary, Debug)]
struct BattleInput {
    /// Battle seed.
    seed: u64,
    /// Actions in order.
    actions: Vec<Action>,
}

fuzz_target!(|input: BattleInput| {
    let lineup = Lineup::demo();
    let Ok(mut battle) = Battle::new(&lineup.player, &lineup.enemy, lineup.config, input.seed)
    else {
        return;
    };

    for action in input.actions.into_iter().take(200) {
        let board_before = battle.board().clone();
        match action {
            Action::Swap { r1, c1, r2, c2 } => {
                let from = Coord::new(usize::from(r1 % 10), usize::from(c1 % 10));
                let to = Coord::new(usize::from(r2 % 10), usize::from(c2 % 10));
                if battle.attempt_swap(from, to).is_err() {
                    assert_eq!(battle.board(), &board_before, "rejected swap changed the board");
                }
            }
            Action::Cast { index } => {
                let _ = battle.cast(usize::from(index % 6));
            }
            Action::Hint => {
                if let Some(mv) = battle.hint() {
                    assert!(mv.from.is_adjacent(mv.to));
                }
                assert_eq!(battle.board(), &board_before, "hint changed the board");
            }
            Action::Step => {
                let _ = battle.step();
            }
            Action::Settle => {
                battle.run_until_idle();
            }
        }

        let violations = check_invariants(&battle);
        assert!(violations.is_empty(), "{violations:?}");
    }

    battle.run_until_idle();
    assert!(battle.is_idle());
    if battle.phase() == Phase::GameOver {
        assert!(battle.outcome().is_some());
        assert!(battle.end_notified());
    }
});
