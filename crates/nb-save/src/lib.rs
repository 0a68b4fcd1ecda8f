//! nb-save: replay-log persistence for netbreach
//!
//! A replay log is everything needed to rebuild and re-verify a session:
//! the session settings, the state before the seed arrived, the seed, and
//! one record per played turn with the commitment it produced.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use nb_core::{GameState, Seed, Session, SessionConfig, SessionError, TurnRecord};

/// Current replay log format version
pub const LOG_VERSION: u32 = 1;

/// Replay log errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Replay log not found")]
    NotFound,

    #[error("Replay log corrupted: {0}")]
    Corrupted(String),

    #[error("Incompatible log version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Invalid replay log header")]
    InvalidHeader,

    #[error("Session has no seed yet")]
    Unseeded,

    #[error("Replay diverged at turn {turn}: recorded {recorded}, computed {computed}")]
    Diverged {
        turn: u32,
        recorded: String,
        computed: String,
    },

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Replay log header for versioning and browsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogHeader {
    /// Magic identifier
    pub magic: String,
    /// Log format version
    pub version: u32,
    /// Free-form session label
    pub label: String,
    pub seed: Seed,
    /// Number of turn records
    pub turns: u32,
    /// Unix seconds when the log was written
    pub timestamp: u64,
}

impl LogHeader {
    const MAGIC: &'static str = "NBRL";

    pub fn new(label: &str, seed: Seed, turns: u32) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: LOG_VERSION,
            label: label.to_string(),
            seed,
            turns,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.magic != Self::MAGIC {
            return Err(SaveError::InvalidHeader);
        }
        if self.version != LOG_VERSION {
            return Err(SaveError::IncompatibleVersion {
                expected: LOG_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// Complete replay log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayLog {
    pub header: LogHeader,
    #[serde(default)]
    pub config: SessionConfig,
    /// The state before the seed arrived
    pub initial: GameState,
    pub records: Vec<TurnRecord>,
}

impl ReplayLog {
    pub fn new(
        label: &str,
        seed: Seed,
        config: SessionConfig,
        initial: GameState,
        records: Vec<TurnRecord>,
    ) -> Self {
        Self {
            header: LogHeader::new(label, seed, records.len() as u32),
            config,
            initial,
            records,
        }
    }

    /// Capture a seeded session
    pub fn from_session(label: &str, session: &Session) -> Result<Self, SaveError> {
        let seed = session.state().seed.ok_or(SaveError::Unseeded)?;
        Ok(Self::new(
            label,
            seed,
            *session.config(),
            session.initial().clone(),
            session.history().to_vec(),
        ))
    }

    /// Header fields must agree with the body
    pub fn validate(&self) -> Result<(), SaveError> {
        self.header.validate()?;
        if self.header.turns as usize != self.records.len() {
            return Err(SaveError::Corrupted(format!(
                "header lists {} turns, log holds {}",
                self.header.turns,
                self.records.len()
            )));
        }
        Ok(())
    }

    /// Rebuild the live session by replaying every record, checking each
    /// recorded commitment on the way.
    pub fn restore(&self) -> Result<Session, SaveError> {
        let mut session = Session::from_initial(self.config, self.initial.clone())?;
        let request = session.request_seed(0)?;
        session.receive_seed(request, self.header.seed, 0)?;

        for record in &self.records {
            let outcome = session.play(&record.assignments)?;
            if outcome.hash != record.hash {
                return Err(SaveError::Diverged {
                    turn: record.turn,
                    recorded: record.hash.to_string(),
                    computed: outcome.hash.to_string(),
                });
            }
        }
        Ok(session)
    }
}

/// Save a replay log to a file
pub fn save_log(log: &ReplayLog, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, log)?;
    Ok(())
}

/// Save a replay log to a compact file (no pretty printing)
pub fn save_log_compact(log: &ReplayLog, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, log)?;
    Ok(())
}

/// Load a replay log from a file
pub fn load_log(path: impl AsRef<Path>) -> Result<ReplayLog, SaveError> {
    let file = File::open(path).map_err(|_| SaveError::NotFound)?;
    let reader = BufReader::new(file);
    let log: ReplayLog = serde_json::from_reader(reader)?;

    log.validate()?;
    Ok(log)
}

#[derive(Deserialize)]
struct HeaderOnly {
    header: LogHeader,
}

/// Load only the header from a replay log (for listings)
pub fn load_header(path: impl AsRef<Path>) -> Result<LogHeader, SaveError> {
    let file = File::open(path).map_err(|_| SaveError::NotFound)?;
    let reader = BufReader::new(file);
    let head: HeaderOnly = serde_json::from_reader(reader)?;
    head.header.validate()?;
    Ok(head.header)
}

/// Check if a replay log exists
pub fn log_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Delete a replay log
pub fn delete_log(path: impl AsRef<Path>) -> Result<(), SaveError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SaveError::NotFound);
    }
    std::fs::remove_file(path)?;
    Ok(())
}

fn log_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("netbreach");
    path.push("replays");
    path
}

/// Get the default log path for a session label, creating the log directory
pub fn default_log_path(label: &str) -> Result<PathBuf, SaveError> {
    log_path_in(log_dir(), label)
}

/// `<dir>/<label>.json`, creating `dir` if needed
pub fn log_path_in(dir: impl AsRef<Path>, label: &str) -> Result<PathBuf, SaveError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    Ok(dir.join(format!("{}.json", label)))
}

/// List all replay logs in the default directory
pub fn list_logs() -> Result<Vec<(PathBuf, LogHeader)>, SaveError> {
    list_logs_in(log_dir())
}

/// List replay logs in `dir`, newest first; unreadable files are skipped
pub fn list_logs_in(dir: impl AsRef<Path>) -> Result<Vec<(PathBuf, LogHeader)>, SaveError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut logs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            if let Ok(header) = load_header(&path) {
                logs.push((path, header));
            }
        }
    }

    logs.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp));
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nb_core::{Enemy, EnemyKind, Encounter, Intent, Player, StateHash};

    fn seed() -> Seed {
        Seed::new([9; 32])
    }

    fn initial() -> GameState {
        let encounter = Encounter::new(
            Player::new(30),
            vec![Enemy::new(1, EnemyKind::Sentry, 50, 1, Intent::Attack)],
        );
        GameState::awaiting(encounter).unwrap()
    }

    #[test]
    fn test_header_validation() {
        let header = LogHeader::new("test", seed(), 0);
        assert!(header.validate().is_ok());

        let mut bad_header = header.clone();
        bad_header.magic = "XXXX".to_string();
        assert!(matches!(
            bad_header.validate(),
            Err(SaveError::InvalidHeader)
        ));

        let mut old_header = header;
        old_header.version = 999;
        assert!(matches!(
            old_header.validate(),
            Err(SaveError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn test_turn_count_must_match() {
        let mut log = ReplayLog::new("test", seed(), SessionConfig::default(), initial(), Vec::new());
        log.header.turns = 3;
        assert!(matches!(log.validate(), Err(SaveError::Corrupted(_))));
    }

    #[test]
    fn test_restore_detects_divergence() {
        let record = TurnRecord::new(
            1,
            (0..6)
                .map(|i| nb_core::Assignment::new(i, nb_core::Target::Discard))
                .collect(),
            StateHash::from_bytes([0; 32]),
        );
        let log = ReplayLog::new(
            "test",
            seed(),
            SessionConfig::default(),
            initial(),
            vec![record],
        );
        assert!(matches!(
            log.restore(),
            Err(SaveError::Diverged { turn: 1, .. })
        ));
    }

    #[test]
    fn test_load_nonexistent() {
        let result = load_log("/nonexistent/path/replay.json");
        assert!(matches!(result, Err(SaveError::NotFound)));
    }
}
