//! Turn events
//!
//! Resolution records what happened, in order, so a presentation layer can
//! animate it and the score can be folded from it.

use serde::{Deserialize, Serialize};

use crate::actor::{Absorbed, EnemyId};
use crate::anomaly::TurnAnomaly;

/// Who hit the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitSource {
    /// A self-targeted Attack or Crit packet (hand index)
    Packet(usize),
    Enemy(EnemyId),
    Anomaly(TurnAnomaly),
}

/// One step of a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// Start-of-turn anomaly regeneration
    Regenerated { amount: u32 },
    /// The turn's jackpot bonus was paid out
    Jackpot,
    Discarded { packet: usize },
    /// A Miss packet sent to the player
    Fizzled { packet: usize },
    Healed { packet: usize, amount: u32 },
    Shielded { packet: usize, amount: u32 },
    PlayerHit { source: HitSource, absorbed: Absorbed },
    EnemyDamaged { packet: usize, enemy: EnemyId, amount: u32 },
    /// A non-Crit packet bounced off an immune-except-crit enemy
    Deflected { packet: usize, enemy: EnemyId },
    /// A packet reached an enemy but had no effect (non-damaging kind,
    /// or the enemy was already down)
    NoEffect { packet: usize, enemy: EnemyId },
    /// An enemy's hp went from above 0 to 0 through a packet
    EnemyDestroyed { enemy: EnemyId, cache: bool },
    /// End-of-turn anomaly damage to an enemy
    EnemyDrained { enemy: EnemyId, amount: u32 },
    /// An enemy removed by the end-of-turn sweep (no kill score)
    EnemySwept { enemy: EnemyId },
    Victory { flawless: bool },
    Defeat,
}

impl TurnEvent {
    pub const fn is_kill(&self) -> bool {
        matches!(self, TurnEvent::EnemyDestroyed { .. })
    }
}
