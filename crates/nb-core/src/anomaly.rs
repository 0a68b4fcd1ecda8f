//! Turn anomalies
//!
//! An anomaly is a one-turn global modifier chosen from a fixed sub-seed
//! byte. It is not a separate phase: resolution calls [`start_of_turn`]
//! before any packet is applied and [`end_of_turn`] after enemies act.
//!
//! The numeric behaviour of every kind lives in [`ANOMALY_TABLE`]; the hooks
//! only read the table, so a new kind is a new row.

#[cfg(not(feature = "std"))]
use crate::compat::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::actor::{Absorbed, Enemy, Player};
use crate::event::{HitSource, TurnEvent};
use crate::packet::PacketKind;

/// Anomaly kinds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum TurnAnomaly {
    #[default]
    Stable,
    DrainHazard,
    RegenLeak,
    DamageOverclock,
}

/// Numeric effect of one anomaly kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnomalyEffect {
    pub anomaly: TurnAnomaly,
    /// Highest selector byte that picks this row (rows are ascending)
    pub selector_max: u8,
    /// Player hp restored at the start of the turn
    pub regen: u32,
    /// Added to every Attack packet's effective magnitude
    pub attack_bonus: u32,
    /// Shield-bypassing damage to the player and every live non-cache
    /// enemy at the end of the turn
    pub drain: u32,
}

/// Selector byte ranges and effects
///
/// | anomaly         | bytes     | effect                          |
/// |-----------------|-----------|---------------------------------|
/// | Stable          | 0..=159   | none                            |
/// | DrainHazard     | 160..=191 | 2 damage to everyone, end       |
/// | RegenLeak       | 192..=223 | +3 player hp, start             |
/// | DamageOverclock | 224..=255 | +3 on Attack packets            |
pub const ANOMALY_TABLE: [AnomalyEffect; 4] = [
    AnomalyEffect {
        anomaly: TurnAnomaly::Stable,
        selector_max: 159,
        regen: 0,
        attack_bonus: 0,
        drain: 0,
    },
    AnomalyEffect {
        anomaly: TurnAnomaly::DrainHazard,
        selector_max: 191,
        regen: 0,
        attack_bonus: 0,
        drain: 2,
    },
    AnomalyEffect {
        anomaly: TurnAnomaly::RegenLeak,
        selector_max: 223,
        regen: 3,
        attack_bonus: 0,
        drain: 0,
    },
    AnomalyEffect {
        anomaly: TurnAnomaly::DamageOverclock,
        selector_max: 255,
        regen: 0,
        attack_bonus: 3,
        drain: 0,
    },
];

impl TurnAnomaly {
    /// Select the anomaly for a selector byte
    pub fn from_byte(byte: u8) -> Self {
        ANOMALY_TABLE
            .iter()
            .find(|row| byte <= row.selector_max)
            .map_or(TurnAnomaly::Stable, |row| row.anomaly)
    }

    pub fn effect(self) -> &'static AnomalyEffect {
        ANOMALY_TABLE
            .iter()
            .find(|row| row.anomaly == self)
            .unwrap_or(&ANOMALY_TABLE[0])
    }

    pub fn is_hazard(self) -> bool {
        self != TurnAnomaly::Stable
    }
}

/// Anomaly bonus added to a packet's rarity-scaled magnitude
pub fn magnitude_bonus(anomaly: TurnAnomaly, kind: PacketKind) -> u32 {
    match kind {
        PacketKind::Attack => anomaly.effect().attack_bonus,
        _ => 0,
    }
}

/// Start-of-turn hook
pub fn start_of_turn(anomaly: TurnAnomaly, player: &mut Player, events: &mut Vec<TurnEvent>) {
    let effect = anomaly.effect();
    if effect.regen > 0 {
        let amount = player.heal(effect.regen);
        events.push(TurnEvent::Regenerated { amount });
    }
}

/// End-of-turn hook. Enemies drained to 0 are swept from the live set
/// without a kill event.
pub fn end_of_turn(
    anomaly: TurnAnomaly,
    player: &mut Player,
    enemies: &mut Vec<Enemy>,
    events: &mut Vec<TurnEvent>,
) {
    let effect = anomaly.effect();
    if effect.drain == 0 {
        return;
    }

    let lost = player.drain(effect.drain);
    events.push(TurnEvent::PlayerHit {
        source: HitSource::Anomaly(anomaly),
        absorbed: Absorbed { shield: 0, hp: lost },
    });

    for enemy in enemies.iter_mut().filter(|e| !e.immune_except_crit) {
        let amount = enemy.take_damage(effect.drain);
        events.push(TurnEvent::EnemyDrained {
            enemy: enemy.id,
            amount,
        });
    }

    enemies.retain(|enemy| {
        if !enemy.is_alive() {
            events.push(TurnEvent::EnemySwept { enemy: enemy.id });
        }
        enemy.is_alive()
    });
}
