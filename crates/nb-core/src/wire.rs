//! Wire formats shared by every engine host
//!
//! Hex text for seeds and digests, and the fixed-width assignment record
//! used by the command line and the on-chain adapter:
//!
//! ```text
//! [packet index: u8][target tag: u8][enemy id: u32 big-endian]
//! tag 0 = discard, 1 = player, 2 = enemy (id ignored for other tags)
//! ```

#[cfg(not(feature = "std"))]
use crate::compat::*;
use crate::actor::EnemyId;
use crate::combat::{Assignment, Target};
use crate::consts::{ASSIGNMENT_RECORD_LEN, SEED_LEN};
use crate::error::EngineError;

const TAG_DISCARD: u8 = 0;
const TAG_PLAYER: u8 = 1;
const TAG_ENEMY: u8 = 2;

/// Lower-case hex rendering of a byte slice
#[derive(Debug, Clone, Copy)]
pub struct Hex<'a>(pub &'a [u8]);

impl core::fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

fn nibble(c: u8) -> Result<u8, EngineError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(EngineError::InvalidHex("non-hex character")),
    }
}

/// Parse 64 hex digits (optionally `0x`-prefixed) into 32 bytes
pub fn parse_hex32(text: &str) -> Result<[u8; SEED_LEN], EngineError> {
    let text = text.trim();
    let text = text.strip_prefix("0x").unwrap_or(text);
    let digits = text.as_bytes();
    if digits.len() != SEED_LEN * 2 {
        return Err(EngineError::InvalidHex("expected 64 hex digits"));
    }

    let mut out = [0u8; SEED_LEN];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = (nibble(digits[2 * i])? << 4) | nibble(digits[2 * i + 1])?;
    }
    Ok(out)
}

/// Serde adapter: hex string for human-readable formats, raw bytes otherwise
pub mod hex32 {
    #[cfg(not(feature = "std"))]
    use crate::compat::*;
    use crate::consts::SEED_LEN;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

    pub fn serialize<S>(bytes: &[u8; SEED_LEN], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.collect_str(&super::Hex(bytes))
        } else {
            bytes.serialize(serializer)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; SEED_LEN], D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            super::parse_hex32(&text).map_err(de::Error::custom)
        } else {
            <[u8; SEED_LEN]>::deserialize(deserializer)
        }
    }
}

/// Encode assignments as fixed-width records
pub fn encode_assignments(assignments: &[Assignment]) -> Result<Vec<u8>, EngineError> {
    let mut out = Vec::with_capacity(assignments.len() * ASSIGNMENT_RECORD_LEN);
    for assignment in assignments {
        let index = u8::try_from(assignment.packet)
            .map_err(|_| EngineError::Wire("packet index exceeds one byte"))?;
        let (tag, id) = match assignment.target {
            Target::Discard => (TAG_DISCARD, 0),
            Target::Player => (TAG_PLAYER, 0),
            Target::Enemy(EnemyId(id)) => (TAG_ENEMY, id),
        };
        out.push(index);
        out.push(tag);
        out.extend_from_slice(&id.to_be_bytes());
    }
    Ok(out)
}

/// Decode fixed-width assignment records
pub fn decode_assignments(bytes: &[u8]) -> Result<Vec<Assignment>, EngineError> {
    if bytes.len() % ASSIGNMENT_RECORD_LEN != 0 {
        return Err(EngineError::Wire("assignment data is not a whole number of records"));
    }

    bytes
        .chunks_exact(ASSIGNMENT_RECORD_LEN)
        .map(|record| {
            let id = u32::from_be_bytes([record[2], record[3], record[4], record[5]]);
            let target = match record[1] {
                TAG_DISCARD => Target::Discard,
                TAG_PLAYER => Target::Player,
                TAG_ENEMY => Target::Enemy(EnemyId(id)),
                _ => return Err(EngineError::Wire("unknown target tag")),
            };
            Ok(Assignment::new(record[0] as usize, target))
        })
        .collect()
}

/// The `index`-th 32-byte head word of Solidity ABI call data
pub fn abi_word(data: &[u8], index: usize) -> Result<&[u8], EngineError> {
    let start = index
        .checked_mul(32)
        .ok_or(EngineError::Wire("call data too short"))?;
    data.get(start..start.saturating_add(32))
        .ok_or(EngineError::Wire("call data too short"))
}

fn abi_usize(word: &[u8]) -> Result<usize, EngineError> {
    let out_of_range = EngineError::Wire("ABI offset out of range");
    if word.len() != 32 || word[..24].iter().any(|&b| b != 0) {
        return Err(out_of_range);
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[24..]);
    usize::try_from(u64::from_be_bytes(low)).map_err(|_| out_of_range)
}

/// A dynamic `bytes` argument whose offset sits in head word `index`.
///
/// Offsets and lengths come from the caller; any overflow or read past the
/// end of `data` is a `Wire` error.
pub fn abi_bytes(data: &[u8], index: usize) -> Result<&[u8], EngineError> {
    let offset = abi_usize(abi_word(data, index)?)?;
    let start = offset
        .checked_add(32)
        .ok_or(EngineError::Wire("ABI offset out of range"))?;
    let len = abi_usize(
        data.get(offset..start)
            .ok_or(EngineError::Wire("ABI offset out of range"))?,
    )?;
    let end = start
        .checked_add(len)
        .ok_or(EngineError::Wire("ABI length out of range"))?;
    data.get(start..end)
        .ok_or(EngineError::Wire("ABI length out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_display() {
        let rendered = Hex(&[0x00, 0x0f, 0xa5, 0xff]).to_string();
        assert_eq!(rendered, "000fa5ff");
    }

    #[test]
    fn test_parse_hex32_accepts_prefix_and_case() {
        let text = format!("0x{}", "AB".repeat(32));
        assert_eq!(parse_hex32(&text).unwrap(), [0xab; 32]);
    }

    #[test]
    fn test_parse_hex32_rejects_bad_input() {
        assert_eq!(
            parse_hex32("abcd"),
            Err(EngineError::InvalidHex("expected 64 hex digits"))
        );
        let bad = "zz".repeat(32);
        assert_eq!(
            parse_hex32(&bad),
            Err(EngineError::InvalidHex("non-hex character"))
        );
    }

    #[test]
    fn test_assignment_records_layout() {
        let assignments = [
            Assignment::new(0, Target::Enemy(EnemyId(0x0102_0304))),
            Assignment::new(1, Target::Player),
            Assignment::new(2, Target::Discard),
        ];
        let bytes = encode_assignments(&assignments).unwrap();
        assert_eq!(
            bytes,
            vec![0, 2, 1, 2, 3, 4, 1, 1, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0]
        );
        assert_eq!(decode_assignments(&bytes).unwrap(), assignments.to_vec());
    }

    #[test]
    fn test_decode_rejects_truncated_and_unknown_tag() {
        assert!(matches!(
            decode_assignments(&[0, 1, 0]),
            Err(EngineError::Wire(_))
        ));
        assert!(matches!(
            decode_assignments(&[0, 9, 0, 0, 0, 0]),
            Err(EngineError::Wire("unknown target tag"))
        ));
    }

    #[test]
    fn test_encode_rejects_wide_index() {
        let assignments = [Assignment::new(300, Target::Discard)];
        assert!(encode_assignments(&assignments).is_err());
    }

    fn abi_word_with(value: u64) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[24..].copy_from_slice(&value.to_be_bytes());
        word
    }

    #[test]
    fn test_abi_bytes_reads_dynamic_argument() {
        let mut data = Vec::new();
        data.extend_from_slice(&abi_word_with(0x40));
        data.extend_from_slice(&[7u8; 32]);
        data.extend_from_slice(&abi_word_with(3));
        data.extend_from_slice(&[1, 2, 3]);
        data.extend_from_slice(&[0u8; 29]);

        assert_eq!(abi_bytes(&data, 0).unwrap(), &[1, 2, 3]);
        assert_eq!(abi_word(&data, 1).unwrap(), &[7u8; 32]);
        assert!(abi_word(&data, 4).is_err());
    }

    #[test]
    fn test_abi_bytes_rejects_overflowing_offsets() {
        // offset near usize::MAX: offset + 32 would wrap
        let mut data = Vec::new();
        data.extend_from_slice(&abi_word_with(u64::MAX - 8));
        assert!(matches!(abi_bytes(&data, 0), Err(EngineError::Wire(_))));

        // length near usize::MAX: start + len would wrap
        let mut data = Vec::new();
        data.extend_from_slice(&abi_word_with(0x20));
        data.extend_from_slice(&abi_word_with(u64::MAX - 8));
        assert!(matches!(abi_bytes(&data, 0), Err(EngineError::Wire(_))));

        // high bytes set
        let mut data = vec![0xff; 32];
        data.extend_from_slice(&[0u8; 32]);
        assert!(matches!(abi_bytes(&data, 0), Err(EngineError::Wire(_))));
    }

    #[test]
    fn test_abi_bytes_rejects_reads_past_end() {
        let mut data = Vec::new();
        data.extend_from_slice(&abi_word_with(0x20));
        data.extend_from_slice(&abi_word_with(10));
        data.extend_from_slice(&[1, 2, 3]);
        assert!(matches!(
            abi_bytes(&data, 0),
            Err(EngineError::Wire("ABI length out of range"))
        ));
    }
}
