//! Packets: the per-turn resources a player assigns to targets
//!
//! A packet is read from two sub-seed bytes. The first selects the kind
//! through a fixed partition of `0..=255`; the second selects the rarity.
//! These tables are the most safety-critical constants in the engine: any
//! drift between two hosts shows up as a different hand.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::{
    ATTACK_MAGNITUDE, ATTACK_MAX, CRIT_MAGNITUDE, CRIT_MAX, DEFEND_MAGNITUDE, DEFEND_MAX,
    HEAL_MAGNITUDE, LEGENDARY_ABOVE, MISS_MAGNITUDE, MISS_MAX, RARE_ABOVE,
};

/// Packet kind (type byte partition)
///
/// | kind   | bytes      | magnitude |
/// |--------|------------|-----------|
/// | Miss   | 0..=19     | 0         |
/// | Attack | 20..=150   | 5         |
/// | Defend | 151..=200  | 5         |
/// | Crit   | 201..=240  | 15        |
/// | Heal   | 241..=255  | 10        |
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum PacketKind {
    Miss = 0,
    Attack = 1,
    Defend = 2,
    Crit = 3,
    Heal = 4,
}

impl PacketKind {
    /// Map a type byte onto its kind
    pub const fn from_byte(byte: u8) -> Self {
        if byte <= MISS_MAX {
            PacketKind::Miss
        } else if byte <= ATTACK_MAX {
            PacketKind::Attack
        } else if byte <= DEFEND_MAX {
            PacketKind::Defend
        } else if byte <= CRIT_MAX {
            PacketKind::Crit
        } else {
            PacketKind::Heal
        }
    }

    /// Fixed base magnitude of this kind
    pub const fn base_magnitude(self) -> u32 {
        match self {
            PacketKind::Miss => MISS_MAGNITUDE,
            PacketKind::Attack => ATTACK_MAGNITUDE,
            PacketKind::Defend => DEFEND_MAGNITUDE,
            PacketKind::Crit => CRIT_MAGNITUDE,
            PacketKind::Heal => HEAL_MAGNITUDE,
        }
    }

    /// Attack and Crit deal damage; everything else does not
    pub const fn is_damaging(self) -> bool {
        matches!(self, PacketKind::Attack | PacketKind::Crit)
    }
}

/// Map a type byte onto its packet kind
pub const fn byte_to_kind(byte: u8) -> PacketKind {
    PacketKind::from_byte(byte)
}

/// Packet rarity (rarity byte)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Rarity {
    #[default]
    Common = 0,
    Rare = 1,
    Legendary = 2,
}

impl Rarity {
    pub const fn from_byte(byte: u8) -> Self {
        if byte > LEGENDARY_ABOVE {
            Rarity::Legendary
        } else if byte > RARE_ABOVE {
            Rarity::Rare
        } else {
            Rarity::Common
        }
    }

    /// Scale a base magnitude: Common ×1, Rare ×1.5 (rounded down), Legendary ×2
    pub const fn scale(self, magnitude: u32) -> u32 {
        match self {
            Rarity::Common => magnitude,
            Rarity::Rare => magnitude * 3 / 2,
            Rarity::Legendary => magnitude * 2,
        }
    }
}

/// One packet of a hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Packet {
    /// Raw type byte from the sub-seed
    pub type_byte: u8,
    /// Raw rarity byte from the sub-seed
    pub rarity_byte: u8,
    pub kind: PacketKind,
    pub rarity: Rarity,
}

impl Packet {
    pub const fn from_bytes(type_byte: u8, rarity_byte: u8) -> Self {
        Self {
            type_byte,
            rarity_byte,
            kind: PacketKind::from_byte(type_byte),
            rarity: Rarity::from_byte(rarity_byte),
        }
    }

    /// Base magnitude, fixed by kind
    pub const fn base_magnitude(&self) -> u32 {
        self.kind.base_magnitude()
    }

    /// Magnitude after the rarity multiplier (anomaly bonuses excluded)
    pub const fn magnitude(&self) -> u32 {
        self.rarity.scale(self.kind.base_magnitude())
    }
}

impl core::fmt::Display for Packet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.rarity {
            Rarity::Common => write!(f, "{} {}", self.kind, self.magnitude()),
            rarity => write!(f, "{} {} ({})", self.kind, self.magnitude(), rarity),
        }
    }
}
