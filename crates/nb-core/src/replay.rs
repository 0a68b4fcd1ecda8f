//! Per-turn records for replays and verification

#[cfg(not(feature = "std"))]
use crate::compat::*;
use serde::{Deserialize, Serialize};

use crate::combat::{Assignment, TurnOutcome};
use crate::commit::StateHash;

/// What a player submitted for one turn and the commitment it produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// The turn the assignments were made on
    pub turn: u32,
    pub assignments: Vec<Assignment>,
    /// Commitment of the state after resolution
    pub hash: StateHash,
}

impl TurnRecord {
    pub fn new(turn: u32, assignments: Vec<Assignment>, hash: StateHash) -> Self {
        Self {
            turn,
            assignments,
            hash,
        }
    }

    pub fn from_outcome(turn: u32, assignments: &[Assignment], outcome: &TurnOutcome) -> Self {
        Self::new(turn, assignments.to_vec(), outcome.hash)
    }
}
