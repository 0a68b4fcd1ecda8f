//! Seed expansion
//!
//! The session seed is the only source of entropy the engine ever sees.
//! Each turn gets its own sub-seed:
//!
//! ```text
//! sub_seed[turn] = keccak256(seed ‖ "Turn" ‖ decimal(turn))
//! ```
//!
//! The decimal turn has no padding and no separator, so turn 12 hashes the
//! bytes `..."Turn12"`.

use serde::{Deserialize, Serialize};
use tiny_keccak::{Hasher, Keccak};

use crate::consts::{SEED_LEN, TURN_MARKER};
use crate::error::EngineError;
use crate::wire::{Hex, parse_hex32};

/// Keccak-256 over the concatenation of `parts`
pub fn keccak256(parts: &[&[u8]]) -> [u8; SEED_LEN] {
    let mut hasher = Keccak::v256();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; SEED_LEN];
    hasher.finalize(&mut out);
    out
}

/// Session seed supplied once by the external randomness oracle
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed(#[serde(with = "crate::wire::hex32")] [u8; SEED_LEN]);

impl Seed {
    pub const fn new(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    /// Accept oracle output; the only check is the byte length
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EngineError> {
        let bytes: [u8; SEED_LEN] = bytes
            .try_into()
            .map_err(|_| EngineError::InvalidSeedLength(bytes.len()))?;
        Ok(Self(bytes))
    }

    pub fn from_hex(text: &str) -> Result<Self, EngineError> {
        parse_hex32(text).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

impl core::fmt::Debug for Seed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Seed({})", Hex(&self.0))
    }
}

impl core::fmt::Display for Seed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", Hex(&self.0))
    }
}

/// Per-turn sub-seed; packet, anomaly and jackpot bytes are read from it
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubSeed(#[serde(with = "crate::wire::hex32")] [u8; SEED_LEN]);

impl SubSeed {
    pub const fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    /// Byte at `index`, wrapping around the sub-seed length
    #[inline]
    pub fn byte(&self, index: usize) -> u8 {
        self.0[index % SEED_LEN]
    }
}

impl core::fmt::Debug for SubSeed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SubSeed({})", Hex(&self.0))
    }
}

impl core::fmt::Display for SubSeed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", Hex(&self.0))
    }
}

/// ASCII decimal digits of `n` without allocating
fn decimal(mut n: u32, buf: &mut [u8; 10]) -> &[u8] {
    let mut start = buf.len();
    loop {
        start -= 1;
        buf[start] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    &buf[start..]
}

/// Derive the sub-seed for `turn`. Total over every seed and turn.
pub fn derive_turn_seed(seed: &Seed, turn: u32) -> SubSeed {
    let mut digits = [0u8; 10];
    let turn_digits = decimal(turn, &mut digits);
    SubSeed(keccak256(&[seed.as_bytes().as_slice(), TURN_MARKER, turn_digits]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_seed() -> Seed {
        let mut bytes = [0u8; SEED_LEN];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        Seed::new(bytes)
    }

    #[test]
    fn test_keccak256_known_vectors() {
        assert_eq!(
            Hex(&keccak256(&[])).to_string(),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_eq!(
            Hex(&keccak256(&[b"a".as_slice(), b"bc".as_slice()])).to_string(),
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
    }

    #[test]
    fn test_decimal_digits() {
        let mut buf = [0u8; 10];
        assert_eq!(decimal(0, &mut buf), b"0");
        assert_eq!(decimal(7, &mut buf), b"7");
        assert_eq!(decimal(120, &mut buf), b"120");
        assert_eq!(decimal(u32::MAX, &mut buf), b"4294967295");
    }

    #[test]
    fn test_turn_seed_matches_preimage() {
        let seed = counting_seed();
        let mut preimage = seed.as_bytes().to_vec();
        preimage.extend_from_slice(b"Turn12");
        assert_eq!(
            derive_turn_seed(&seed, 12).as_bytes(),
            &keccak256(&[preimage.as_slice()])
        );
    }

    #[test]
    fn test_turn_seed_golden_vector() {
        assert_eq!(
            derive_turn_seed(&counting_seed(), 1).to_string(),
            "2da45b2376635c0943bbd1b1b7249f47eb0c1bb8993a0f4185a748aac251da35"
        );
    }

    #[test]
    fn test_turn_seed_reproducible_and_distinct() {
        let seed = counting_seed();
        assert_eq!(derive_turn_seed(&seed, 3), derive_turn_seed(&seed, 3));
        assert_ne!(derive_turn_seed(&seed, 3), derive_turn_seed(&seed, 4));

        let other = Seed::new([0xee; SEED_LEN]);
        assert_ne!(derive_turn_seed(&seed, 3), derive_turn_seed(&other, 3));
    }

    #[test]
    fn test_seed_from_slice_checks_length() {
        assert!(Seed::from_slice(&[1u8; 32]).is_ok());
        assert_eq!(
            Seed::from_slice(&[1u8; 31]),
            Err(EngineError::InvalidSeedLength(31))
        );
    }

    #[test]
    fn test_seed_json_is_hex() {
        let seed = counting_seed();
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(
            json,
            "\"000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f\""
        );
        let back: Seed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seed);
    }
}
