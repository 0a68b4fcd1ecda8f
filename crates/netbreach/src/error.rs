//! Command-line errors

use std::path::PathBuf;

use thiserror::Error;

use nb_compare::VerifyError;
use nb_core::{ConfigError, EngineError, SessionError};
use nb_save::SaveError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad assignment '{0}': expected INDEX:TARGET with TARGET one of self, discard, eN")]
    BadAssignment(String),

    #[error("bad enemy '{0}': expected KIND:HP[:DAMAGE[:INTENT]]")]
    BadEnemy(String),

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("{0} already exists; pass --force to overwrite it")]
    LogExists(PathBuf),

    #[error("the game is over ({0})")]
    GameOver(String),

    #[error("replay of '{0}' diverged from its recorded commitments")]
    ParityFailed(String),
}
