//! Combat resolution
//!
//! A turn resolves in a fixed order:
//!
//! 1. start-of-turn anomaly effect, then the jackpot bonus
//! 2. every packet, in hand order, applied to its target
//! 3. kills are scored as they happen
//! 4. dead enemies leave the live set
//! 5. provisional result
//! 6. on Continue, enemies with Attack intent hit the player
//! 7. end-of-turn anomaly effect, with a second sweep
//! 8. hand and assignments cleared, turn advanced
//! 9. completion and flawless bonuses on Victory
//!
//! Validation happens before step 1, so a rejected assignment list leaves
//! nothing behind.

mod assignment;
mod resolve;

#[cfg(not(feature = "std"))]
use crate::compat::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::anomaly::{TurnAnomaly, magnitude_bonus};
use crate::commit::StateHash;
use crate::event::TurnEvent;
use crate::packet::Packet;
use crate::state::GameState;

pub use assignment::{Assignment, Target, validate};
pub use resolve::{resolve_pending, resolve_turn};

/// Outcome of a round
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum RoundResult {
    #[default]
    Continue,
    Victory,
    Defeat,
}

impl RoundResult {
    /// Defeat beats Victory: a player at 0 hp loses even with the grid clear
    pub fn evaluate(player_alive: bool, enemies_left: usize) -> Self {
        if !player_alive {
            RoundResult::Defeat
        } else if enemies_left == 0 {
            RoundResult::Victory
        } else {
            RoundResult::Continue
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, RoundResult::Continue)
    }
}

/// Everything one resolution produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// The next snapshot; the input state is left untouched
    pub state: GameState,
    pub result: RoundResult,
    pub events: Vec<TurnEvent>,
    /// Commitment of `state`
    pub hash: StateHash,
    pub score_delta: u64,
}

/// Rarity-scaled magnitude plus the anomaly's additive bonus
pub fn effective_magnitude(packet: &Packet, anomaly: TurnAnomaly) -> u32 {
    packet.magnitude() + magnitude_bonus(anomaly, packet.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::PacketKind;

    #[test]
    fn test_evaluate_priority() {
        assert_eq!(RoundResult::evaluate(false, 0), RoundResult::Defeat);
        assert_eq!(RoundResult::evaluate(false, 3), RoundResult::Defeat);
        assert_eq!(RoundResult::evaluate(true, 0), RoundResult::Victory);
        assert_eq!(RoundResult::evaluate(true, 1), RoundResult::Continue);
    }

    #[test]
    fn test_effective_magnitude() {
        let rare_attack = Packet::from_bytes(20, 201);
        assert_eq!(rare_attack.kind, PacketKind::Attack);
        assert_eq!(effective_magnitude(&rare_attack, TurnAnomaly::Stable), 7);
        assert_eq!(
            effective_magnitude(&rare_attack, TurnAnomaly::DamageOverclock),
            10
        );

        let legendary_crit = Packet::from_bytes(201, 255);
        assert_eq!(
            effective_magnitude(&legendary_crit, TurnAnomaly::DamageOverclock),
            30
        );
    }
}
