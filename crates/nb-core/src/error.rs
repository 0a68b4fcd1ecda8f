//! Engine error taxonomy
//!
//! Every error is detected before any effect is applied. Calling again with
//! the same input yields the same error.

use thiserror::Error;

use crate::actor::EnemyId;
use crate::commit::StateHash;
use crate::state::GameStatus;

/// Why an assignment list was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AssignmentFault {
    #[error("packet {0} has no assignment")]
    Unassigned(usize),

    #[error("packet {0} is assigned more than once")]
    Duplicate(usize),

    #[error("packet index {index} is outside a hand of {hand_size}")]
    OutOfRange { index: usize, hand_size: usize },
}

/// Errors raised by the engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid turn {0}: turns start at 1")]
    InvalidTurn(u32),

    #[error("invalid assignment: {0}")]
    InvalidAssignment(AssignmentFault),

    #[error("unknown enemy target {0}")]
    UnknownEnemyTarget(EnemyId),

    #[error("commitment mismatch: expected {expected}, computed {actual}")]
    CommitmentMismatch {
        expected: StateHash,
        actual: StateHash,
    },

    #[error("invalid seed length: expected 32 bytes, got {0}")]
    InvalidSeedLength(usize),

    #[error("invalid hex digest: {0}")]
    InvalidHex(&'static str),

    #[error("duplicate enemy id {0} in encounter")]
    DuplicateEnemy(EnemyId),

    #[error("player hp {hp} exceeds max hp {max_hp}")]
    PlayerHpAboveMax { hp: u32, max_hp: u32 },

    #[error("enemy {id} hp {hp} exceeds max hp {max_hp}")]
    EnemyHpAboveMax { id: EnemyId, hp: u32, max_hp: u32 },

    #[error("game is {0}, expected an active game")]
    NotActive(GameStatus),

    #[error("game is {0}, expected a game awaiting its seed")]
    SeedAlreadySet(GameStatus),

    #[error("no hand has been dealt for turn {0}")]
    HandNotDealt(u32),

    #[error("malformed wire data: {0}")]
    Wire(&'static str),
}

impl From<AssignmentFault> for EngineError {
    fn from(fault: AssignmentFault) -> Self {
        EngineError::InvalidAssignment(fault)
    }
}
