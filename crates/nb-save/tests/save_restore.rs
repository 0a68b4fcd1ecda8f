//! Save/restore round trips through real files

use nb_core::{
    Assignment, Enemy, EnemyId, EnemyKind, Encounter, Intent, PacketKind, Player, Seed, Session,
    SessionConfig, Target,
};
use nb_save::{
    LogHeader, ReplayLog, SaveError, delete_log, list_logs_in, load_header, load_log, log_exists,
    log_path_in, save_log, save_log_compact,
};
use tempfile::TempDir;

fn seeded_session(seed: Seed, config: SessionConfig) -> Session {
    let encounter = Encounter::new(
        Player::new(30),
        vec![
            Enemy::new(1, EnemyKind::Daemon, 60, 2, Intent::Attack),
            Enemy::cache(2, 10),
        ],
    );
    let mut session = Session::new(config, encounter).unwrap();
    let request = session.request_seed(0).unwrap();
    session.receive_seed(request, seed, 0).unwrap();
    session
}

fn play_turns(session: &mut Session, turns: usize) {
    for _ in 0..turns {
        if session.is_over() {
            break;
        }
        let plan: Vec<Assignment> = session
            .state()
            .hand
            .iter()
            .enumerate()
            .map(|(i, packet)| match packet.kind {
                PacketKind::Attack => Assignment::new(i, Target::Enemy(EnemyId(1))),
                PacketKind::Defend => Assignment::new(i, Target::Player),
                _ => Assignment::new(i, Target::Discard),
            })
            .collect();
        session.play(&plan).unwrap();
    }
}

#[test]
fn test_save_load_restore() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.json");

    let mut session = seeded_session(Seed::new([3; 32]), SessionConfig::default());
    play_turns(&mut session, 4);

    let log = ReplayLog::from_session("run", &session).unwrap();
    save_log(&log, &path).unwrap();
    assert!(path.exists());

    let loaded = load_log(&path).unwrap();
    assert_eq!(loaded, log);

    let restored = loaded.restore().unwrap();
    assert_eq!(restored.state(), session.state());
    assert_eq!(restored.history(), session.history());
}

#[test]
fn test_compact_log_loads_the_same() {
    let dir = TempDir::new().unwrap();
    let pretty = dir.path().join("pretty.json");
    let compact = dir.path().join("compact.json");

    let mut session = seeded_session(Seed::new([4; 32]), SessionConfig::default());
    play_turns(&mut session, 3);
    let log = ReplayLog::from_session("compact", &session).unwrap();

    save_log(&log, &pretty).unwrap();
    save_log_compact(&log, &compact).unwrap();

    let pretty_len = std::fs::metadata(&pretty).unwrap().len();
    let compact_len = std::fs::metadata(&compact).unwrap().len();
    assert!(compact_len < pretty_len);
    assert_eq!(load_log(&compact).unwrap(), load_log(&pretty).unwrap());
}

#[test]
fn test_config_survives_the_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("capped.json");
    let config = SessionConfig {
        max_turns: Some(2),
        ..SessionConfig::default()
    };

    let mut session = seeded_session(Seed::new([5; 32]), config);
    play_turns(&mut session, 5);
    save_log(&ReplayLog::from_session("capped", &session).unwrap(), &path).unwrap();

    let restored = load_log(&path).unwrap().restore().unwrap();
    assert_eq!(restored.config().max_turns, Some(2));
    assert_eq!(restored.state().status, session.state().status);
    assert!(restored.history().len() <= 2);
}

#[test]
fn test_unseeded_session_cannot_be_logged() {
    let session = Session::new(
        SessionConfig::default(),
        Encounter::new(Player::new(30), Vec::new()),
    )
    .unwrap();
    assert!(matches!(
        ReplayLog::from_session("early", &session),
        Err(SaveError::Unseeded)
    ));
}

#[test]
fn test_headers_and_listing() {
    let dir = TempDir::new().unwrap();
    let mut session = seeded_session(Seed::new([6; 32]), SessionConfig::default());
    play_turns(&mut session, 2);

    let log = ReplayLog::from_session("listed", &session).unwrap();
    save_log(&log, dir.path().join("a.json")).unwrap();
    save_log_compact(&log, dir.path().join("b.json")).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a log").unwrap();
    std::fs::write(dir.path().join("broken.json"), "{").unwrap();

    let header: LogHeader = load_header(dir.path().join("a.json")).unwrap();
    assert_eq!(header.label, "listed");
    assert_eq!(header.turns as usize, session.history().len());
    assert_eq!(header.seed, Seed::new([6; 32]));

    let listed = list_logs_in(dir.path()).unwrap();
    assert_eq!(listed.len(), 2);
}

#[test]
fn test_tampered_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tampered.json");

    let mut session = seeded_session(Seed::new([7; 32]), SessionConfig::default());
    play_turns(&mut session, 2);
    let mut log = ReplayLog::from_session("tampered", &session).unwrap();
    log.records.pop();
    save_log(&log, &path).unwrap();

    assert!(matches!(load_log(&path), Err(SaveError::Corrupted(_))));
}

#[test]
fn test_log_path_creates_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("replays").join("nested");

    let path = log_path_in(&nested, "run-7").unwrap();
    assert!(nested.is_dir());
    assert_eq!(path, nested.join("run-7.json"));
}

#[test]
fn test_log_path_reports_unusable_directory() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("occupied");
    std::fs::write(&file, "not a directory").unwrap();

    assert!(matches!(
        log_path_in(file.join("replays"), "run"),
        Err(SaveError::Io(_))
    ));
}

#[test]
fn test_delete_log() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gone.json");
    let session = seeded_session(Seed::new([8; 32]), SessionConfig::default());
    save_log(&ReplayLog::from_session("gone", &session).unwrap(), &path).unwrap();

    delete_log(&path).unwrap();
    assert!(!log_exists(&path));
    assert!(list_logs_in(dir.path()).unwrap().is_empty());
    assert!(matches!(delete_log(&path), Err(SaveError::NotFound)));
}
