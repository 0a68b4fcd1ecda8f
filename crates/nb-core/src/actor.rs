//! Actors: the player and the enemies on the grid

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Stable enemy identifier; the commitment orders enemies by it
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EnemyId(pub u32);

impl core::fmt::Display for EnemyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Cosmetic grid coordinate; never part of the commitment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u8,
    pub y: u8,
}

impl GridPos {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

/// Shield and hp lost to one incoming hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Absorbed {
    pub shield: u32,
    pub hp: u32,
}

/// Shield-then-hp absorption.
///
/// The shield soaks damage first; only the remainder reaches hp, which is
/// floored at 0. Returns `(shield', hp')`.
pub const fn absorb(shield: u32, hp: u32, damage: u32) -> (u32, u32) {
    if damage <= shield {
        (shield - damage, hp)
    } else {
        (0, hp.saturating_sub(damage - shield))
    }
}

/// The player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub hp: u32,
    pub max_hp: u32,
    pub shield: u32,
}

impl Player {
    /// Full-health player with no shield
    pub const fn new(max_hp: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            shield: 0,
        }
    }

    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub const fn is_full_hp(&self) -> bool {
        self.hp == self.max_hp
    }

    /// Restore hp up to `max_hp`; returns the hp actually gained
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp.saturating_sub(before)
    }

    pub fn add_shield(&mut self, amount: u32) {
        self.shield = self.shield.saturating_add(amount);
    }

    /// Incoming damage, shield first
    pub fn take_damage(&mut self, damage: u32) -> Absorbed {
        let (shield, hp) = absorb(self.shield, self.hp, damage);
        let absorbed = Absorbed {
            shield: self.shield - shield,
            hp: self.hp - hp,
        };
        self.shield = shield;
        self.hp = hp;
        absorbed
    }

    /// Damage that ignores the shield; returns hp lost
    pub fn drain(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }
}

/// What an enemy will do at the end of the turn, known before planning
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Intent {
    Attack,
    Defend,
    #[default]
    Idle,
}

/// Enemy archetype. Only `Cache` changes the rules (immune except to Crit).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum EnemyKind {
    #[default]
    Sentry,
    Firewall,
    Daemon,
    Cache,
}

/// An enemy on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub hp: u32,
    pub max_hp: u32,
    /// Damage dealt to the player each turn while `intent` is Attack
    pub intended_damage: u32,
    pub intent: Intent,
    /// Only a Crit packet affects this enemy, and it destroys it outright
    pub immune_except_crit: bool,
    #[serde(default)]
    pub pos: GridPos,
}

impl Enemy {
    pub const fn new(id: u32, kind: EnemyKind, hp: u32, intended_damage: u32, intent: Intent) -> Self {
        Self {
            id: EnemyId(id),
            kind,
            hp,
            max_hp: hp,
            intended_damage,
            intent,
            immune_except_crit: matches!(kind, EnemyKind::Cache),
            pos: GridPos::new(0, 0),
        }
    }

    /// The loot cache: idle, harmless, destroyed only by a Crit
    pub const fn cache(id: u32, hp: u32) -> Self {
        Self::new(id, EnemyKind::Cache, hp, 0, Intent::Idle)
    }

    pub const fn at(mut self, x: u8, y: u8) -> Self {
        self.pos = GridPos::new(x, y);
        self
    }

    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Subtract `amount`, floored at 0; overkill is discarded.
    /// Returns the hp actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        dealt
    }

    pub fn destroy(&mut self) {
        self.hp = 0;
    }

    pub const fn attacks(&self) -> bool {
        matches!(self.intent, Intent::Attack) && self.intended_damage > 0
    }
}
