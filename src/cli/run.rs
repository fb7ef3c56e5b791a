//! Run command implementation.

use super::output::{JsonBattleResult, format_text};
use super::{CliError, OutputFormat, load_lineup, resolve_seed};
use gemclash::simulate;
use std::path::PathBuf;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the team file is unusable.
pub(crate) fn execute(
    teams: Option<PathBuf>,
    seed: Option<u64>,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let lineup = load_lineup(teams)?;
    let seed = resolve_seed(seed);

    if !quiet && format == OutputFormat::Text {
        println!("Running battle with seed {seed}...");
        let names = |troops: &[gemclash::TroopTemplate]| {
            troops
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("Player: {}", names(&lineup.player));
        println!("Enemy:  {}", names(&lineup.enemy));
        println!();
    }

    let report = simulate(&lineup, seed)?;

    match format {
        OutputFormat::Text => {
            if !quiet {
                for entry in &report.log {
                    println!("{entry}");
                }
                println!();
            }
            print!("{}", format_text(&report));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonBattleResult::new(&report, !quiet))
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
