//! Hand derivation
//!
//! Packet `i` of a hand reads sub-seed bytes `2i` (type) and `2i + 1`
//! (rarity), wrapping modulo the sub-seed length. Two out-of-band bytes pick
//! the turn's anomaly and jackpot flag; they never feed a packet for the
//! hand sizes the game deals.

#[cfg(not(feature = "std"))]
use crate::compat::*;
use serde::{Deserialize, Serialize};

use crate::anomaly::TurnAnomaly;
use crate::consts::{ANOMALY_BYTE, BASE_HAND_SIZE, HAND_SIZE_CYCLE, JACKPOT_ABOVE, JACKPOT_BYTE};
use crate::error::EngineError;
use crate::packet::Packet;
use crate::seed::{Seed, SubSeed, derive_turn_seed};

/// Number of packets dealt on `turn`: 6, 7, 5, 6, 7, 5, ...
pub fn hand_size(turn: u32) -> Result<usize, EngineError> {
    if turn < 1 {
        return Err(EngineError::InvalidTurn(turn));
    }
    Ok(BASE_HAND_SIZE + (turn % HAND_SIZE_CYCLE) as usize)
}

/// Derive the ordered hand for `turn` from its sub-seed
pub fn derive_hand(sub_seed: &SubSeed, turn: u32) -> Result<Vec<Packet>, EngineError> {
    let size = hand_size(turn)?;
    Ok((0..size)
        .map(|i| Packet::from_bytes(sub_seed.byte(2 * i), sub_seed.byte(2 * i + 1)))
        .collect())
}

pub fn derive_anomaly(sub_seed: &SubSeed) -> TurnAnomaly {
    TurnAnomaly::from_byte(sub_seed.byte(ANOMALY_BYTE))
}

pub fn derive_jackpot(sub_seed: &SubSeed) -> bool {
    sub_seed.byte(JACKPOT_BYTE) > JACKPOT_ABOVE
}

/// Everything the seed decides for one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnDraw {
    pub turn: u32,
    pub sub_seed: SubSeed,
    pub hand: Vec<Packet>,
    pub anomaly: TurnAnomaly,
    pub jackpot: bool,
}

/// Expand the session seed into the full draw for `turn`
pub fn draw_turn(seed: &Seed, turn: u32) -> Result<TurnDraw, EngineError> {
    let sub_seed = derive_turn_seed(seed, turn);
    let hand = derive_hand(&sub_seed, turn)?;
    Ok(TurnDraw {
        turn,
        sub_seed,
        hand,
        anomaly: derive_anomaly(&sub_seed),
        jackpot: derive_jackpot(&sub_seed),
    })
}
