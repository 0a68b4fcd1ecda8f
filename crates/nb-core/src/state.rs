//! Game state snapshots
//!
//! Every transition takes `&self` and returns a new [`GameState`]; nothing
//! here mutates a snapshot in place, so the prior state stays available for
//! commitment checks.

#[cfg(not(feature = "std"))]
use crate::compat::*;
use serde::{Deserialize, Serialize};

use crate::actor::{Enemy, EnemyId, Player};
use crate::anomaly::TurnAnomaly;
use crate::combat::{Assignment, RoundResult, validate};
use crate::commit::{StateHash, commit};
use crate::error::EngineError;
use crate::hand::draw_turn;
use crate::packet::Packet;
use crate::seed::Seed;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    AwaitingSeed,
    Active,
    Resolved(RoundResult),
}

impl GameStatus {
    pub const fn is_active(self) -> bool {
        matches!(self, GameStatus::Active)
    }

    pub const fn is_resolved(self) -> bool {
        matches!(self, GameStatus::Resolved(_))
    }
}

impl core::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GameStatus::AwaitingSeed => write!(f, "awaiting seed"),
            GameStatus::Active => write!(f, "active"),
            GameStatus::Resolved(result) => write!(f, "resolved ({})", result),
        }
    }
}

/// Cosmetic grid description carried for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridMeta {
    pub width: u8,
    pub height: u8,
    pub sector: u32,
}

impl Default for GridMeta {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            sector: 1,
        }
    }
}

/// Starting layout of a session. Placement is always supplied by the
/// caller; the engine never generates enemies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    #[serde(default)]
    pub grid: GridMeta,
}

impl Encounter {
    pub fn new(player: Player, enemies: Vec<Enemy>) -> Self {
        Self {
            player,
            enemies,
            grid: GridMeta::default(),
        }
    }

    /// Reject rosters the commitment could not tell apart, and actors
    /// above their max hp
    pub fn validate(&self) -> Result<(), EngineError> {
        check_actors(&self.player, &self.enemies)
    }
}

/// Unique enemy ids and `hp <= max_hp` for every actor
pub fn check_actors(player: &Player, enemies: &[Enemy]) -> Result<(), EngineError> {
    if player.hp > player.max_hp {
        return Err(EngineError::PlayerHpAboveMax {
            hp: player.hp,
            max_hp: player.max_hp,
        });
    }
    for (i, enemy) in enemies.iter().enumerate() {
        if enemies[..i].iter().any(|other| other.id == enemy.id) {
            return Err(EngineError::DuplicateEnemy(enemy.id));
        }
        if enemy.hp > enemy.max_hp {
            return Err(EngineError::EnemyHpAboveMax {
                id: enemy.id,
                hp: enemy.hp,
                max_hp: enemy.max_hp,
            });
        }
    }
    Ok(())
}

/// A complete, immutable game snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    pub seed: Option<Seed>,
    pub turn: u32,
    pub grid: GridMeta,
    pub player: Player,
    /// Live enemies only; an enemy at 0 hp is removed by resolution
    pub enemies: Vec<Enemy>,
    pub hand: Vec<Packet>,
    pub assignments: Vec<Assignment>,
    pub score: u64,
    pub anomaly: TurnAnomaly,
    pub jackpot: bool,
}

impl GameState {
    /// A session waiting for its seed
    pub fn awaiting(encounter: Encounter) -> Result<Self, EngineError> {
        encounter.validate()?;
        let Encounter {
            player,
            mut enemies,
            grid,
        } = encounter;
        enemies.retain(Enemy::is_alive);

        Ok(Self {
            status: GameStatus::AwaitingSeed,
            seed: None,
            turn: 0,
            grid,
            player,
            enemies,
            hand: Vec::new(),
            assignments: Vec::new(),
            score: 0,
            anomaly: TurnAnomaly::Stable,
            jackpot: false,
        })
    }

    /// Encounter plus seed: the Active turn-1 state with its hand dealt
    pub fn start(encounter: Encounter, seed: Seed) -> Result<Self, EngineError> {
        Self::awaiting(encounter)?.with_seed(seed)
    }

    /// Install the session seed. Only legal once, from `AwaitingSeed`.
    pub fn with_seed(&self, seed: Seed) -> Result<Self, EngineError> {
        if self.status != GameStatus::AwaitingSeed {
            return Err(EngineError::SeedAlreadySet(self.status));
        }
        let mut next = self.clone();
        next.seed = Some(seed);
        next.status = GameStatus::Active;
        next.turn = 1;
        next.deal()
    }

    /// Draw the current turn's hand, anomaly and jackpot from the seed
    pub fn deal(&self) -> Result<Self, EngineError> {
        if !self.status.is_active() {
            return Err(EngineError::NotActive(self.status));
        }
        let seed = self.seed.ok_or(EngineError::NotActive(self.status))?;
        let draw = draw_turn(&seed, self.turn)?;

        let mut next = self.clone();
        next.hand = draw.hand;
        next.anomaly = draw.anomaly;
        next.jackpot = draw.jackpot;
        next.assignments.clear();
        Ok(next)
    }

    /// Record the player's plan without resolving it
    pub fn with_assignments(&self, assignments: Vec<Assignment>) -> Result<Self, EngineError> {
        if !self.status.is_active() {
            return Err(EngineError::NotActive(self.status));
        }
        if self.hand.is_empty() {
            return Err(EngineError::HandNotDealt(self.turn));
        }
        validate(self.hand.len(), &assignments, &self.enemies)?;

        let mut next = self.clone();
        next.assignments = assignments;
        Ok(next)
    }

    /// Same actor checks as `Encounter::validate`, for snapshots that
    /// arrive from outside the engine
    pub fn validate(&self) -> Result<(), EngineError> {
        check_actors(&self.player, &self.enemies)
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    pub fn state_hash(&self) -> StateHash {
        commit(&self.player, &self.enemies, self.turn, self.score)
    }

    pub fn result(&self) -> Option<RoundResult> {
        match self.status {
            GameStatus::Resolved(result) => Some(result),
            _ => None,
        }
    }
}
