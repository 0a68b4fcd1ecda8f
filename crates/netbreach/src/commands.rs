//! Subcommand handlers
//!
//! Every mutating command works on a replay log: the log is loaded, the
//! session is rebuilt from it (re-checking every recorded commitment), the
//! command is applied and the log is written back.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;
use tracing::{debug, info};

use nb_compare::{CanonicalEngine, TurnResolver, redeal, replay_log, verify_turn};
use nb_core::anomaly::TurnAnomaly;
use nb_core::event::HitSource;
use nb_core::{
    Encounter, GameState, ScoreBreakdown, Seed, Session, SessionConfig, StateHash, TurnEvent,
    TurnOutcome, draw_turn,
};
use nb_save::{
    ReplayLog, default_log_path, delete_log, list_logs, list_logs_in, load_log, log_exists,
    save_log,
};

use crate::error::CliError;
use crate::plan::{default_roster, describe_player, discard_rest, parse_assignments, parse_roster};

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn random_seed() -> Seed {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    Seed::new(bytes)
}

fn label_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "netbreach".to_string())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Rendering
// ============================================================================

pub fn render_state(state: &GameState) {
    println!("turn {}  [{}]  score {}", state.turn, state.status, state.score);
    println!("player   {}", describe_player(&state.player));
    for enemy in &state.enemies {
        println!(
            "{:<8} {} hp {}/{} intent {} ({}) at {},{}{}",
            enemy.id.to_string(),
            enemy.kind,
            enemy.hp,
            enemy.max_hp,
            enemy.intent,
            enemy.intended_damage,
            enemy.pos.x,
            enemy.pos.y,
            if enemy.immune_except_crit { "  crit only" } else { "" },
        );
    }
    if state.status.is_active() {
        println!("anomaly  {}", describe_anomaly(state.anomaly, state.jackpot));
        for (i, packet) in state.hand.iter().enumerate() {
            println!("  [{}] {}", i, packet);
        }
    }
    println!("hash     {}", state.state_hash());
}

fn describe_anomaly(anomaly: TurnAnomaly, jackpot: bool) -> String {
    format!(
        "{}{}{}",
        anomaly,
        if anomaly.is_hazard() { "  (hazard)" } else { "" },
        if jackpot { "  JACKPOT" } else { "" }
    )
}

/// Non-zero score categories, e.g. `kills 100, victory 500`
fn describe_score(breakdown: &ScoreBreakdown) -> String {
    let parts: Vec<String> = [
        ("kills", breakdown.kills),
        ("caches", breakdown.caches),
        ("jackpot", breakdown.jackpot),
        ("victory", breakdown.victory),
        ("flawless", breakdown.flawless),
    ]
    .into_iter()
    .filter(|(_, points)| *points > 0)
    .map(|(name, points)| format!("{} {}", name, points))
    .collect();
    if parts.is_empty() {
        "no points".to_string()
    } else {
        parts.join(", ")
    }
}

fn describe_event(event: &TurnEvent) -> String {
    match event {
        TurnEvent::Regenerated { amount } => format!("regenerated {} hp", amount),
        TurnEvent::Jackpot => "jackpot paid out".to_string(),
        TurnEvent::Discarded { packet } => format!("[{}] discarded", packet),
        TurnEvent::Fizzled { packet } => format!("[{}] fizzled", packet),
        TurnEvent::Healed { packet, amount } => format!("[{}] healed {}", packet, amount),
        TurnEvent::Shielded { packet, amount } => format!("[{}] shield +{}", packet, amount),
        TurnEvent::PlayerHit { source, absorbed } => {
            let by = match source {
                HitSource::Packet(i) => format!("packet [{}]", i),
                HitSource::Enemy(id) => id.to_string(),
                HitSource::Anomaly(anomaly) => anomaly.to_string(),
            };
            format!(
                "player hit by {}: {} shield, {} hp",
                by, absorbed.shield, absorbed.hp
            )
        }
        TurnEvent::EnemyDamaged { packet, enemy, amount } => {
            format!("[{}] hit {} for {}", packet, enemy, amount)
        }
        TurnEvent::Deflected { packet, enemy } => format!("[{}] deflected by {}", packet, enemy),
        TurnEvent::NoEffect { packet, enemy } => format!("[{}] no effect on {}", packet, enemy),
        TurnEvent::EnemyDestroyed { enemy, cache } => {
            format!("{} destroyed{}", enemy, if *cache { " (cache)" } else { "" })
        }
        TurnEvent::EnemyDrained { enemy, amount } => format!("{} drained {}", enemy, amount),
        TurnEvent::EnemySwept { enemy } => format!("{} swept", enemy),
        TurnEvent::Victory { flawless } => {
            format!("victory{}", if *flawless { " (flawless)" } else { "" })
        }
        TurnEvent::Defeat => "defeat".to_string(),
    }
}

fn render_outcome(outcome: &TurnOutcome) {
    for event in &outcome.events {
        println!("  {}", describe_event(event));
    }
    println!("result {}  score +{}  hash {}", outcome.result, outcome.score_delta, outcome.hash);
    let breakdown = ScoreBreakdown::tally(&outcome.events);
    if breakdown.total() > 0 {
        println!("points   {}", describe_score(&breakdown));
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Print the draw a seed produces for one turn
pub fn hand(seed: &str, turn: u32, json: bool) -> Result<(), CliError> {
    let draw = draw_turn(&Seed::from_hex(seed)?, turn)?;
    if json {
        let packets: Vec<String> = draw.hand.iter().map(ToString::to_string).collect();
        return print_json(&serde_json::json!({
            "turn": draw.turn,
            "sub_seed": draw.sub_seed,
            "anomaly": draw.anomaly,
            "jackpot": draw.jackpot,
            "hand": packets,
        }));
    }

    println!("turn {}  sub-seed {}", draw.turn, draw.sub_seed);
    println!("anomaly {}", describe_anomaly(draw.anomaly, draw.jackpot));
    for (i, packet) in draw.hand.iter().enumerate() {
        println!("  [{}] {}", i, packet);
    }
    Ok(())
}

pub struct NewGame {
    /// `None` writes to the default log directory
    pub log: Option<PathBuf>,
    pub seed: Option<String>,
    pub encounter: Option<PathBuf>,
    pub enemies: Vec<String>,
    pub force: bool,
}

/// Start a session, deliver its seed and write the first log
pub fn new_game(args: NewGame, config: SessionConfig) -> Result<(), CliError> {
    let log_path = match &args.log {
        Some(path) => path.clone(),
        None => default_log_path(&format!("game-{}", now_ms()))?,
    };
    if log_exists(&log_path) && !args.force {
        return Err(CliError::LogExists(log_path));
    }

    let encounter = match &args.encounter {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None if args.enemies.is_empty() => Encounter::new(config.player(), default_roster()),
        None => Encounter::new(config.player(), parse_roster(&args.enemies)?),
    };

    let mut session = Session::new(config, encounter)?;
    let request = session.request_seed(now_ms())?;
    let seed = match &args.seed {
        Some(text) => Seed::from_hex(text)?,
        None => random_seed(),
    };
    debug!(%request, %seed, "seed delivered");
    session.receive_seed(request, seed, now_ms())?;

    let label = label_for(&log_path);
    save_log(&ReplayLog::from_session(&label, &session)?, &log_path)?;
    info!(label = %label, path = %log_path.display(), "game created");

    println!("log      {}", log_path.display());
    println!("seed     {}", seed);
    render_state(session.state());
    Ok(())
}

/// Play one turn of a logged session
pub fn play(log_path: &Path, plan: &str, fill: bool, json: bool) -> Result<(), CliError> {
    let log = load_log(log_path)?;
    let mut session = log.restore()?;
    if session.is_over() {
        return Err(CliError::GameOver(session.state().status.to_string()));
    }

    let mut assignments = parse_assignments(plan)?;
    if fill {
        assignments = discard_rest(assignments, session.state().hand.len());
    }
    let outcome = session.play(&assignments)?;
    save_log(&ReplayLog::from_session(&log.header.label, &session)?, log_path)?;
    info!(turn = outcome.state.turn.saturating_sub(1), result = %outcome.result, "turn played");

    if json {
        return print_json(&outcome);
    }
    render_outcome(&outcome);
    println!();
    render_state(session.state());
    Ok(())
}

/// Show the current state of a logged session
pub fn state(log_path: &Path, json: bool) -> Result<(), CliError> {
    let session = load_log(log_path)?.restore()?;
    if json {
        return print_json(session.state());
    }
    render_state(session.state());
    Ok(())
}

/// Re-verify every recorded turn of a log
pub fn replay(log_path: &Path, json: bool) -> Result<(), CliError> {
    let log = load_log(log_path)?;
    let engine = CanonicalEngine;
    debug!(resolver = engine.name(), turns = log.records.len(), "replaying");
    let report = replay_log(
        &engine,
        &log.header.label,
        &log.header.seed,
        &log.initial,
        &log.records,
    )?;

    if json {
        println!("{}", report.to_json());
    } else {
        report.print_summary();
    }
    if !report.passed() {
        return Err(CliError::ParityFailed(log.header.label));
    }
    Ok(())
}

/// Independently check one turn from a seed, a prior state and a plan
pub fn verify(
    seed: &str,
    prior: &Path,
    plan: &str,
    claimed: Option<&str>,
) -> Result<(), CliError> {
    let seed = Seed::from_hex(seed)?;
    let prior: GameState = serde_json::from_reader(BufReader::new(File::open(prior)?))?;
    let assignments = parse_assignments(plan)?;

    let outcome = match claimed {
        Some(text) => verify_turn(&seed, &prior, &assignments, StateHash::from_hex(text)?)?,
        None => CanonicalEngine.resolve(&redeal(&seed, &prior)?, &assignments)?,
    };
    if claimed.is_some() {
        println!("verified");
    }
    render_outcome(&outcome);
    Ok(())
}

/// Delete a replay log
pub fn delete(log_path: &Path) -> Result<(), CliError> {
    delete_log(log_path)?;
    info!(path = %log_path.display(), "log deleted");
    println!("deleted {}", log_path.display());
    Ok(())
}

/// List logs in `dir`, or in the default log directory
pub fn list(dir: Option<&Path>) -> Result<(), CliError> {
    let logs = match dir {
        Some(dir) => list_logs_in(dir)?,
        None => list_logs()?,
    };
    if logs.is_empty() {
        println!("no replay logs");
    }
    for (path, header) in logs {
        println!(
            "{:<20} turns {:>3}  seed {}  {}",
            header.label,
            header.turns,
            header.seed,
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nb_core::{Enemy, EnemyKind, Intent, Player};
    use tempfile::TempDir;

    const COUNTING: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    fn new_args(log: PathBuf) -> NewGame {
        NewGame {
            log: Some(log),
            seed: Some(COUNTING.to_string()),
            encounter: None,
            enemies: vec!["sentry:20".to_string()],
            force: false,
        }
    }

    #[test]
    fn test_new_play_replay() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.json");

        new_game(new_args(path.clone()), SessionConfig::default()).unwrap();
        play(&path, "0:e1", true, false).unwrap();

        let log = load_log(&path).unwrap();
        assert_eq!(log.header.label, "run");
        assert_eq!(log.records.len(), 1);
        let session = log.restore().unwrap();
        assert_eq!(session.state().enemies[0].hp, 15);

        replay(&path, false).unwrap();
    }

    #[test]
    fn test_new_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taken.json");

        new_game(new_args(path.clone()), SessionConfig::default()).unwrap();
        assert!(matches!(
            new_game(new_args(path.clone()), SessionConfig::default()),
            Err(CliError::LogExists(_))
        ));

        let mut forced = new_args(path);
        forced.force = true;
        assert!(new_game(forced, SessionConfig::default()).is_ok());
    }

    #[test]
    fn test_play_rejects_partial_plan_without_fill() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.json");
        new_game(new_args(path.clone()), SessionConfig::default()).unwrap();

        assert!(matches!(
            play(&path, "0:e1", false, false),
            Err(CliError::Session(_))
        ));
        assert!(load_log(&path).unwrap().records.is_empty());
    }

    #[test]
    fn test_verify_from_state_file() {
        let dir = TempDir::new().unwrap();
        let prior_path = dir.path().join("prior.json");

        let encounter = Encounter::new(
            Player::new(30),
            vec![Enemy::new(1, EnemyKind::Sentry, 20, 0, Intent::Idle)],
        );
        let prior = GameState::start(encounter, Seed::from_hex(COUNTING).unwrap()).unwrap();
        std::fs::write(&prior_path, serde_json::to_string(&prior).unwrap()).unwrap();

        let plan = "0:e1,1:discard,2:discard,3:discard,4:discard,5:discard";
        let honest = "92e866ba8cc416ce8e907ea48c1b16e7619d116cf8996aec5b085d71f2356ec1";
        assert!(verify(COUNTING, &prior_path, plan, Some(honest)).is_ok());
        assert!(verify(COUNTING, &prior_path, plan, None).is_ok());

        let forged = "00".repeat(32);
        assert!(matches!(
            verify(COUNTING, &prior_path, plan, Some(&forged)),
            Err(CliError::Engine(nb_core::EngineError::CommitmentMismatch { .. }))
        ));
    }

    #[test]
    fn test_list_reads_directory() {
        let dir = TempDir::new().unwrap();
        new_game(new_args(dir.path().join("a.json")), SessionConfig::default()).unwrap();
        assert!(list(Some(dir.path())).is_ok());
        assert_eq!(list_logs_in(dir.path()).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_removes_log() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("old.json");
        new_game(new_args(path.clone()), SessionConfig::default()).unwrap();

        delete(&path).unwrap();
        assert!(!log_exists(&path));
        assert!(matches!(
            delete(&path),
            Err(CliError::Save(nb_save::SaveError::NotFound))
        ));
    }

    #[test]
    fn test_describe_anomaly_flags_hazards() {
        assert_eq!(describe_anomaly(TurnAnomaly::Stable, false), "Stable");
        let hazard = describe_anomaly(TurnAnomaly::DrainHazard, true);
        assert!(hazard.contains("(hazard)"));
        assert!(hazard.ends_with("JACKPOT"));
    }

    #[test]
    fn test_describe_score_lists_awarded_categories() {
        let events = [
            TurnEvent::EnemyDestroyed {
                enemy: nb_core::EnemyId(1),
                cache: true,
            },
            TurnEvent::Victory { flawless: false },
        ];
        let breakdown = ScoreBreakdown::tally(&events);
        assert_eq!(breakdown.total(), 100 + 1000 + 500);
        assert_eq!(
            describe_score(&breakdown),
            "kills 100, caches 1000, victory 500"
        );
        assert_eq!(describe_score(&ScoreBreakdown::default()), "no points");
    }
}
