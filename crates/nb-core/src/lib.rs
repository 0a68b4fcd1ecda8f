//! nb-core: deterministic simulation and verification engine for netbreach
//!
//! Everything a game session produces is a pure function of one external
//! 256-bit seed, the turn number, the prior state and the player's packet
//! assignments. The same crate backs the host tools and the on-chain
//! verifier, so every derived hand, score and commitment is bit-identical in
//! both places.
//!
//! Supports `no_std` environments (e.g. PolkaVM smart contracts) by disabling
//! the default `std` feature. File loading is gated behind `cfg(feature = "std")`.
//!
//! ```text
//! seed ──► derive_turn_seed ──► derive_hand ──► [player assigns]
//!                                   │                 │
//!                                   ▼                 ▼
//!                             anomaly/jackpot ──► resolve_turn ──► commit
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

/// Re-exports of alloc types needed when building without std.
/// In std mode, these are provided by the std prelude.
#[cfg(not(feature = "std"))]
pub(crate) mod compat {
    pub use alloc::borrow::ToOwned;
    pub use alloc::format;
    pub use alloc::string::{String, ToString};
    pub use alloc::vec;
    pub use alloc::vec::Vec;
}

pub mod actor;
pub mod anomaly;
pub mod combat;
pub mod commit;
pub mod config;
pub mod event;
pub mod hand;
pub mod packet;
pub mod replay;
pub mod score;
pub mod seed;
pub mod session;
pub mod state;
pub mod wire;

mod consts;
mod error;

pub use actor::{Enemy, EnemyId, EnemyKind, GridPos, Intent, Player};
pub use anomaly::TurnAnomaly;
pub use combat::{Assignment, RoundResult, Target, TurnOutcome, resolve_pending, resolve_turn};
pub use commit::{StateHash, commit};
pub use config::{ConfigError, SessionConfig};
pub use consts::*;
pub use error::{AssignmentFault, EngineError};
pub use event::TurnEvent;
pub use hand::{TurnDraw, derive_hand, draw_turn, hand_size};
pub use packet::{Packet, PacketKind, Rarity, byte_to_kind};
pub use replay::TurnRecord;
pub use seed::{Seed, SubSeed, derive_turn_seed};
pub use score::ScoreBreakdown;
pub use session::{SeedRequestId, Session, SessionError};
pub use state::{Encounter, GameState, GameStatus, GridMeta};
