//! netbreach command line
//!
//! Inspect seeded hands, play logged sessions turn by turn, and re-verify
//! recorded games against the canonical engine.

mod commands;
mod error;
mod plan;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nb_core::SessionConfig;

use crate::commands::NewGame;
use crate::error::CliError;

/// Deterministic seed-driven tactical engine
#[derive(Parser, Debug)]
#[command(name = "netbreach")]
#[command(author, version, about = "netbreach - breach the grid, one packet at a time", long_about = None)]
struct Cli {
    /// Session settings file (key=value lines or OPTIONS=key:value,...)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the hand, anomaly and jackpot a seed deals on a turn
    Hand {
        /// Session seed, 64 hex digits
        #[arg(short = 's', long = "seed")]
        seed: String,

        #[arg(short = 't', long = "turn", default_value_t = 1)]
        turn: u32,

        #[arg(long = "json")]
        json: bool,
    },

    /// Start a new game and write its replay log
    New {
        /// Replay log to create (default: a new file in the log directory)
        log: Option<PathBuf>,

        /// Session seed, 64 hex digits (random when omitted)
        #[arg(short = 's', long = "seed")]
        seed: Option<String>,

        /// Encounter JSON (player and enemy roster)
        #[arg(short = 'e', long = "encounter", conflicts_with = "enemies")]
        encounter: Option<PathBuf>,

        /// Enemy as KIND:HP[:DAMAGE[:INTENT]], repeatable; ids count from 1
        #[arg(long = "enemy")]
        enemies: Vec<String>,

        /// Overwrite an existing log
        #[arg(short = 'f', long = "force")]
        force: bool,
    },

    /// Play the current turn of a logged game
    Play {
        log: PathBuf,

        /// Assignments: INDEX:TARGET,... (TARGET = self, discard, eN) or 0x wire records
        plan: String,

        /// Discard every packet the plan leaves out
        #[arg(short = 'd', long = "discard-rest")]
        discard_rest: bool,

        #[arg(long = "json")]
        json: bool,
    },

    /// Show the current state of a logged game
    State {
        log: PathBuf,

        #[arg(long = "json")]
        json: bool,
    },

    /// Re-run a logged game and check every recorded commitment
    Replay {
        log: PathBuf,

        #[arg(long = "json")]
        json: bool,
    },

    /// Check one turn from a seed, a prior state file and a plan
    Verify {
        #[arg(short = 's', long = "seed")]
        seed: String,

        /// Prior state as JSON (from `state --json`)
        #[arg(long = "state")]
        state: PathBuf,

        /// Assignments, same syntax as `play`
        #[arg(long = "plan")]
        plan: String,

        /// Claimed state hash; when omitted the computed hash is printed
        #[arg(long = "claimed")]
        claimed: Option<String>,
    },

    /// Delete a replay log
    Delete { log: PathBuf },

    /// List replay logs
    List {
        /// Directory to scan instead of the default log directory
        dir: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<SessionConfig, CliError> {
    match path {
        Some(path) => Ok(SessionConfig::load_from_file(path)?),
        None => Ok(SessionConfig::default()),
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Hand { seed, turn, json } => commands::hand(&seed, turn, json),
        Command::New {
            log,
            seed,
            encounter,
            enemies,
            force,
        } => {
            let config = load_config(cli.config.as_ref())?;
            commands::new_game(
                NewGame {
                    log,
                    seed,
                    encounter,
                    enemies,
                    force,
                },
                config,
            )
        }
        Command::Play {
            log,
            plan,
            discard_rest,
            json,
        } => commands::play(&log, &plan, discard_rest, json),
        Command::State { log, json } => commands::state(&log, json),
        Command::Replay { log, json } => commands::replay(&log, json),
        Command::Verify {
            seed,
            state,
            plan,
            claimed,
        } => commands::verify(&seed, &state, &plan, claimed.as_deref()),
        Command::Delete { log } => commands::delete(&log),
        Command::List { dir } => commands::list(dir.as_deref()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("netbreach: {}", e);
            ExitCode::FAILURE
        }
    }
}
