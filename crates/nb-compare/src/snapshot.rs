//! Engine state snapshots for cross-implementation comparison.
//!
//! Snapshots capture a normalized view of a `GameState` that two resolvers
//! can be compared on regardless of how either stores its state.

use nb_core::{Enemy, GameState};
use serde::{Deserialize, Serialize};

/// Complete state snapshot after a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub turn: u32,
    pub status: String,
    pub score: u64,
    /// Hex commitment of the state
    pub hash: String,
    pub player: PlayerSnapshot,
    /// Ascending by id
    pub enemies: Vec<EnemySnapshot>,
    /// Resolver that produced the state
    pub source: String,
}

/// Player state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub hp: u32,
    pub max_hp: u32,
    pub shield: u32,
    pub alive: bool,
}

/// Enemy snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    pub id: u32,
    pub kind: String,
    pub hp: u32,
    pub max_hp: u32,
    pub intent: String,
    pub x: u8,
    pub y: u8,
}

impl EnemySnapshot {
    fn capture(enemy: &Enemy) -> Self {
        Self {
            id: enemy.id.0,
            kind: enemy.kind.to_string(),
            hp: enemy.hp,
            max_hp: enemy.max_hp,
            intent: enemy.intent.to_string(),
            x: enemy.pos.x,
            y: enemy.pos.y,
        }
    }
}

impl EngineSnapshot {
    pub fn capture(state: &GameState, source: &str) -> Self {
        let mut enemies: Vec<EnemySnapshot> = state.enemies.iter().map(EnemySnapshot::capture).collect();
        enemies.sort_by_key(|enemy| enemy.id);

        Self {
            turn: state.turn,
            status: state.status.to_string(),
            score: state.score,
            hash: state.state_hash().to_string(),
            player: PlayerSnapshot {
                hp: state.player.hp,
                max_hp: state.player.max_hp,
                shield: state.player.shield,
                alive: state.player.is_alive(),
            },
            enemies,
            source: source.to_string(),
        }
    }
}
