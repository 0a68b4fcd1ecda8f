//! Rule constants shared by every engine instance
//!
//! Any change here changes derived hands, scores and commitments, so the
//! client engine and the on-chain verifier must always be rebuilt together.

/// Length of the session seed and of every per-turn sub-seed, in bytes
pub const SEED_LEN: usize = 32;

/// ASCII marker mixed into the sub-seed preimage ahead of the decimal turn
pub const TURN_MARKER: &[u8] = b"Turn";

/// Hand size is `BASE_HAND_SIZE + turn % HAND_SIZE_CYCLE`
pub const BASE_HAND_SIZE: usize = 5;
pub const HAND_SIZE_CYCLE: u32 = 3;

/// Inclusive upper bounds of the packet kind partition over a type byte
pub const MISS_MAX: u8 = 19;
pub const ATTACK_MAX: u8 = 150;
pub const DEFEND_MAX: u8 = 200;
pub const CRIT_MAX: u8 = 240;

/// Rarity thresholds over the rarity byte (strictly greater than)
pub const RARE_ABOVE: u8 = 200;
pub const LEGENDARY_ABOVE: u8 = 240;

/// Base magnitudes per packet kind
pub const MISS_MAGNITUDE: u32 = 0;
pub const ATTACK_MAGNITUDE: u32 = 5;
pub const DEFEND_MAGNITUDE: u32 = 5;
pub const CRIT_MAGNITUDE: u32 = 15;
pub const HEAL_MAGNITUDE: u32 = 10;

/// Out-of-band sub-seed byte selecting the turn anomaly
pub const ANOMALY_BYTE: usize = 30;
/// Out-of-band sub-seed byte selecting the jackpot flag
pub const JACKPOT_BYTE: usize = 31;
/// Jackpot is active when the jackpot byte is strictly above this
pub const JACKPOT_ABOVE: u8 = 245;

/// Score awards
pub const KILL_SCORE: u64 = 100;
pub const CACHE_KILL_SCORE: u64 = 1000;
pub const JACKPOT_SCORE: u64 = 250;
pub const VICTORY_SCORE: u64 = 500;
pub const FLAWLESS_SCORE: u64 = 200;

/// Size of one encoded assignment record on the wire
pub const ASSIGNMENT_RECORD_LEN: usize = 6;
