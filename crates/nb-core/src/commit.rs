//! State commitment
//!
//! Canonical layout, all integers big-endian:
//!
//! ```text
//! player.hp      u32
//! player.shield  u32
//! per enemy, ascending id:
//!   id           u32
//!   hp           u32
//! turn           u32
//! score          u64
//! ```
//!
//! The digest is keccak-256 of those bytes. Nothing else (hand, anomaly,
//! positions, intents) is committed.

#[cfg(not(feature = "std"))]
use crate::compat::*;
use serde::{Deserialize, Serialize};

use crate::actor::{Enemy, Player};
use crate::error::EngineError;
use crate::seed::keccak256;
use crate::wire::{Hex, parse_hex32};

/// 32-byte commitment digest
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StateHash(#[serde(with = "crate::wire::hex32")] [u8; 32]);

impl StateHash {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(text: &str) -> Result<Self, EngineError> {
        parse_hex32(text).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl core::fmt::Debug for StateHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "StateHash({})", Hex(&self.0))
    }
}

impl core::fmt::Display for StateHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", Hex(&self.0))
    }
}

/// Serialize the committed fields in canonical order
pub fn canonical_bytes(player: &Player, enemies: &[Enemy], turn: u32, score: u64) -> Vec<u8> {
    let mut ordered: Vec<(u32, u32)> = enemies.iter().map(|e| (e.id.0, e.hp)).collect();
    ordered.sort_unstable();

    let mut bytes = Vec::with_capacity(8 + ordered.len() * 8 + 12);
    bytes.extend_from_slice(&player.hp.to_be_bytes());
    bytes.extend_from_slice(&player.shield.to_be_bytes());
    for (id, hp) in ordered {
        bytes.extend_from_slice(&id.to_be_bytes());
        bytes.extend_from_slice(&hp.to_be_bytes());
    }
    bytes.extend_from_slice(&turn.to_be_bytes());
    bytes.extend_from_slice(&score.to_be_bytes());
    bytes
}

pub fn commit(player: &Player, enemies: &[Enemy], turn: u32, score: u64) -> StateHash {
    let bytes = canonical_bytes(player, enemies, turn, score);
    StateHash(keccak256(&[bytes.as_slice()]))
}
