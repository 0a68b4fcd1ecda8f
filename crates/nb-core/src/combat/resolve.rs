//! Turn resolution

#[cfg(not(feature = "std"))]
use crate::compat::*;
use tracing::{debug, trace};

use super::{Assignment, RoundResult, Target, TurnOutcome, effective_magnitude, validate};
use crate::actor::{Enemy, Player};
use crate::anomaly::{TurnAnomaly, end_of_turn, start_of_turn};
use crate::commit::commit;
use crate::error::EngineError;
use crate::event::{HitSource, TurnEvent};
use crate::packet::PacketKind;
use crate::score::accumulate;
use crate::state::{GameState, GameStatus};

/// Resolve one turn. The input state is never modified.
///
/// Fails before any effect if the state is not Active with a dealt hand, if
/// an actor is above its max hp or enemy ids repeat, or if the assignments
/// do not cover the hand exactly once with valid targets.
pub fn resolve_turn(
    state: &GameState,
    assignments: &[Assignment],
) -> Result<TurnOutcome, EngineError> {
    if !state.status.is_active() {
        return Err(EngineError::NotActive(state.status));
    }
    if state.hand.is_empty() {
        return Err(EngineError::HandNotDealt(state.turn));
    }
    state.validate()?;
    let targets = validate(state.hand.len(), assignments, &state.enemies)?;

    let mut player = state.player;
    let mut enemies = state.enemies.clone();
    let mut events = Vec::new();

    start_of_turn(state.anomaly, &mut player, &mut events);
    if state.jackpot {
        events.push(TurnEvent::Jackpot);
    }

    for (index, (packet, target)) in state.hand.iter().zip(&targets).enumerate() {
        let magnitude = effective_magnitude(packet, state.anomaly);
        trace!(turn = state.turn, index, %packet, %target, magnitude, "applying packet");

        match *target {
            Target::Discard => events.push(TurnEvent::Discarded { packet: index }),
            Target::Player => packet_on_player(index, packet.kind, magnitude, &mut player, &mut events),
            Target::Enemy(id) => {
                // validated above; the enemy stays in the list until the sweep
                if let Some(enemy) = enemies.iter_mut().find(|enemy| enemy.id == id) {
                    packet_on_enemy(index, packet.kind, magnitude, enemy, &mut events);
                }
            }
        }
    }

    enemies.retain(Enemy::is_alive);

    let mut result = RoundResult::evaluate(player.is_alive(), enemies.len());
    if result == RoundResult::Continue {
        enemies_act(&enemies, &mut player, &mut events);
    }

    end_of_turn(state.anomaly, &mut player, &mut enemies, &mut events);
    result = RoundResult::evaluate(player.is_alive(), enemies.len());

    match result {
        RoundResult::Victory => events.push(TurnEvent::Victory {
            flawless: player.is_full_hp(),
        }),
        RoundResult::Defeat => events.push(TurnEvent::Defeat),
        RoundResult::Continue => {}
    }

    let score = accumulate(state.score, &events);
    let turn = state.turn.saturating_add(1);
    let hash = commit(&player, &enemies, turn, score);

    let next = GameState {
        status: if result.is_terminal() {
            GameStatus::Resolved(result)
        } else {
            GameStatus::Active
        },
        seed: state.seed,
        turn,
        grid: state.grid,
        player,
        enemies,
        hand: Vec::new(),
        assignments: Vec::new(),
        score,
        anomaly: TurnAnomaly::Stable,
        jackpot: false,
    };

    debug!(
        turn = state.turn,
        %result,
        score,
        hp = next.player.hp,
        enemies = next.enemies.len(),
        %hash,
        "turn resolved"
    );

    Ok(TurnOutcome {
        state: next,
        result,
        events,
        hash,
        score_delta: score - state.score,
    })
}

/// Resolve the assignments already recorded on the state
pub fn resolve_pending(state: &GameState) -> Result<TurnOutcome, EngineError> {
    resolve_turn(state, &state.assignments)
}

fn packet_on_player(
    index: usize,
    kind: PacketKind,
    magnitude: u32,
    player: &mut Player,
    events: &mut Vec<TurnEvent>,
) {
    match kind {
        PacketKind::Heal => {
            let amount = player.heal(magnitude);
            events.push(TurnEvent::Healed {
                packet: index,
                amount,
            });
        }
        PacketKind::Defend => {
            player.add_shield(magnitude);
            events.push(TurnEvent::Shielded {
                packet: index,
                amount: magnitude,
            });
        }
        PacketKind::Attack | PacketKind::Crit => {
            let absorbed = player.take_damage(magnitude);
            events.push(TurnEvent::PlayerHit {
                source: HitSource::Packet(index),
                absorbed,
            });
        }
        PacketKind::Miss => events.push(TurnEvent::Fizzled { packet: index }),
    }
}

fn packet_on_enemy(
    index: usize,
    kind: PacketKind,
    magnitude: u32,
    enemy: &mut Enemy,
    events: &mut Vec<TurnEvent>,
) {
    if !enemy.is_alive() {
        events.push(TurnEvent::NoEffect {
            packet: index,
            enemy: enemy.id,
        });
        return;
    }

    if enemy.immune_except_crit {
        if kind == PacketKind::Crit {
            enemy.destroy();
            events.push(TurnEvent::EnemyDestroyed {
                enemy: enemy.id,
                cache: true,
            });
        } else {
            events.push(TurnEvent::Deflected {
                packet: index,
                enemy: enemy.id,
            });
        }
        return;
    }

    if !kind.is_damaging() {
        events.push(TurnEvent::NoEffect {
            packet: index,
            enemy: enemy.id,
        });
        return;
    }

    let amount = enemy.take_damage(magnitude);
    events.push(TurnEvent::EnemyDamaged {
        packet: index,
        enemy: enemy.id,
        amount,
    });
    if !enemy.is_alive() {
        events.push(TurnEvent::EnemyDestroyed {
            enemy: enemy.id,
            cache: false,
        });
    }
}

fn enemies_act(enemies: &[Enemy], player: &mut Player, events: &mut Vec<TurnEvent>) {
    for enemy in enemies.iter().filter(|enemy| enemy.attacks()) {
        if !player.is_alive() {
            break;
        }
        let absorbed = player.take_damage(enemy.intended_damage);
        events.push(TurnEvent::PlayerHit {
            source: HitSource::Enemy(enemy.id),
            absorbed,
        });
    }
}
