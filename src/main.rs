//! Gemclash CLI - autoplay, tournaments and an interactive terminal game.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Gemclash - match-3 battles in the terminal
#[derive(Parser, Debug)]
#[command(name = "gemclash")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Autoplay a single battle and print its log
    Run {
        /// Team file (default: built-in demo lineup)
        #[arg(long)]
        teams: Option<PathBuf>,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Only print the result, not the battle log
        #[arg(short, long)]
        quiet: bool,
    },

    /// Play a battle interactively in the terminal
    Play {
        /// Team file (default: built-in demo lineup)
        #[arg(long)]
        teams: Option<PathBuf>,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Never show hints on idle
        #[arg(long)]
        no_hints: bool,
    },

    /// Autoplay many battles in parallel and aggregate statistics
    Tournament {
        /// Team file (default: built-in demo lineup)
        #[arg(long)]
        teams: Option<PathBuf>,

        /// Number of battles to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each battle)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

/// Send diagnostics to stderr, filtered by `RUST_LOG` or `default`.
fn init_tracing(default: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    // The TUI owns the terminal; diagnostics would tear the screen.
    let default_filter = match args.command {
        Commands::Play { .. } => "off",
        _ => "gemclash=info",
    };
    init_tracing(default_filter);

    let result = match args.command {
        Commands::Run {
            teams,
            seed,
            format,
            quiet,
        } => cli::run::execute(teams, seed, format, quiet),

        Commands::Play {
            teams,
            seed,
            no_hints,
        } => cli::play::execute(teams, seed, !no_hints),

        Commands::Tournament {
            teams,
            games,
            seed,
            threads,
            format,
            progress,
        } => cli::tournament::execute(teams, games, seed, threads, format, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
