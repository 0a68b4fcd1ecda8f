//! End-to-end engine scenarios
//!
//! Drives full sessions through the public API the way a client does:
//! request a seed, receive it, plan each hand, play, and check the
//! commitments a verifier would see.

use nb_compare::{EngineSnapshot, diff_snapshots, verify_turn};
use nb_core::{
    Assignment, Enemy, EnemyId, EnemyKind, Encounter, GameState, GameStatus, Intent, PacketKind,
    Player, RoundResult, Seed, Session, SessionConfig, Target, TurnEvent, hand_size,
};

// ============================================================================
// Helpers
// ============================================================================

fn counting_seed() -> Seed {
    let mut bytes = [0u8; 32];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = i as u8;
    }
    Seed::new(bytes)
}

fn single_sentry(hp: u32) -> Encounter {
    Encounter::new(
        Player::new(30),
        vec![Enemy::new(1, EnemyKind::Sentry, hp, 0, Intent::Idle)],
    )
}

fn start(config: SessionConfig, encounter: Encounter, seed: Seed) -> Session {
    let mut session = Session::new(config, encounter).expect("valid encounter");
    let request = session.request_seed(0).expect("first request");
    session
        .receive_seed(request, seed, 1)
        .expect("seed arrives in time");
    session
}

/// Attack and Crit at the first live enemy, Crit preferring a cache,
/// Heal and Defend on self, Miss discarded.
fn greedy_plan(state: &GameState) -> Vec<Assignment> {
    let fighter = state.enemies.iter().find(|e| !e.immune_except_crit).map(|e| e.id);
    let cache = state.enemies.iter().find(|e| e.immune_except_crit).map(|e| e.id);

    state
        .hand
        .iter()
        .enumerate()
        .map(|(i, packet)| {
            let target = match packet.kind {
                PacketKind::Crit => cache.or(fighter).map_or(Target::Discard, Target::Enemy),
                PacketKind::Attack => fighter.map_or(Target::Discard, Target::Enemy),
                PacketKind::Heal | PacketKind::Defend => Target::Player,
                PacketKind::Miss => Target::Discard,
            };
            Assignment::new(i, target)
        })
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_documented_two_turn_victory() {
    let mut session = start(SessionConfig::default(), single_sentry(20), counting_seed());
    assert_eq!(session.state().hand[0].kind, PacketKind::Attack);

    let mut plan: Vec<Assignment> = (1..session.state().hand.len())
        .map(|i| Assignment::new(i, Target::Discard))
        .collect();
    plan.push(Assignment::new(0, Target::Enemy(EnemyId(1))));
    let first = session.play(&plan).unwrap();

    assert_eq!(first.result, RoundResult::Continue);
    assert_eq!(first.score_delta, 0);
    assert_eq!(session.state().enemy(EnemyId(1)).map(|e| e.hp), Some(15));

    // turn 2 deals Heal, Attack, Attack (Rare), ... under DamageOverclock
    let plan: Vec<Assignment> = (0..session.state().hand.len())
        .map(|i| {
            if i == 1 || i == 2 {
                Assignment::new(i, Target::Enemy(EnemyId(1)))
            } else {
                Assignment::new(i, Target::Discard)
            }
        })
        .collect();
    let second = session.play(&plan).unwrap();

    assert_eq!(second.result, RoundResult::Victory);
    assert_eq!(second.score_delta, 800);
    assert!(second.events.contains(&TurnEvent::Victory { flawless: true }));
    assert!(session.is_over());
}

#[test]
fn test_hand_sizes_follow_the_cycle() {
    let mut session = start(SessionConfig::default(), single_sentry(500), counting_seed());
    let mut sizes = Vec::new();
    for _ in 0..4 {
        sizes.push(session.state().hand.len());
        let plan: Vec<Assignment> = (0..session.state().hand.len())
            .map(|i| Assignment::new(i, Target::Discard))
            .collect();
        session.play(&plan).unwrap();
    }
    assert_eq!(sizes, vec![6, 7, 5, 6]);
    assert_eq!(sizes[3], hand_size(4).unwrap());
}

#[test]
fn test_every_played_turn_verifies() {
    let encounter = Encounter::new(
        Player::new(30),
        vec![
            Enemy::new(1, EnemyKind::Daemon, 25, 3, Intent::Attack).at(1, 1),
            Enemy::new(2, EnemyKind::Firewall, 30, 2, Intent::Defend).at(5, 2),
            Enemy::cache(3, 60).at(7, 7),
        ],
    );
    let seed = Seed::new([0x42; 32]);
    let mut session = start(SessionConfig::default(), encounter, seed);

    while !session.is_over() && session.state().turn <= 40 {
        let prior = session.state().clone();
        let plan = greedy_plan(&prior);
        let outcome = session.play(&plan).unwrap();

        let verified = verify_turn(&seed, &prior, &plan, outcome.hash).unwrap();
        let diffs = diff_snapshots(
            &EngineSnapshot::capture(&verified.state, "verifier"),
            &EngineSnapshot::capture(session.state(), "client"),
        );
        assert!(diffs.is_empty(), "turn {}: {:?}", prior.turn, diffs);
    }
    assert_eq!(session.history().len() as u32, session.state().turn - 1);
}

#[test]
fn test_turn_cap_from_config_text() {
    let config = SessionConfig::parse_config("OPTIONS=max_turns:3,player_hp:12").unwrap();
    let encounter = Encounter::new(
        config.player(),
        vec![Enemy::new(1, EnemyKind::Firewall, 1_000, 0, Intent::Defend)],
    );
    let mut session = start(config, encounter, counting_seed());

    let mut results = Vec::new();
    while !session.is_over() {
        let plan: Vec<Assignment> = (0..session.state().hand.len())
            .map(|i| Assignment::new(i, Target::Discard))
            .collect();
        results.push(session.play(&plan).unwrap().result);
    }
    assert_eq!(
        results,
        vec![RoundResult::Continue, RoundResult::Continue, RoundResult::Defeat]
    );
    assert_eq!(
        session.state().status,
        GameStatus::Resolved(RoundResult::Defeat)
    );
}

#[test]
fn test_prior_snapshots_survive_play() {
    let mut session = start(SessionConfig::default(), single_sentry(40), counting_seed());
    let before = session.state().clone();
    let before_hash = before.state_hash();

    let plan = greedy_plan(&before);
    session.play(&plan).unwrap();

    assert_eq!(before.state_hash(), before_hash);
    assert_ne!(session.state().state_hash(), before_hash);
}
