//! Snapshot diffing and event-log comparison.
//!
//! Compares two `EngineSnapshot`s field-by-field, producing a list of
//! `StateDiff` entries with severity classification.

use nb_core::TurnEvent;
use serde::{Deserialize, Serialize};

use crate::snapshot::{EngineSnapshot, EnemySnapshot};

/// How important a difference is for parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Minor,
    Major,
    Critical,
}

impl core::fmt::Display for Severity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Severity::Minor => write!(f, "MINOR"),
            Severity::Major => write!(f, "MAJOR"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A single difference between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDiff {
    pub severity: Severity,
    pub field: String,
    pub expected: String,
    pub actual: String,
}

impl StateDiff {
    pub fn new(
        severity: Severity,
        field: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Self {
            severity,
            field: field.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl core::fmt::Display for StateDiff {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "[{}] {}: expected={}, actual={}",
            self.severity, self.field, self.expected, self.actual
        )
    }
}

/// Compare two snapshots and return all differences.
///
/// Committed values (hash, score, hp, shield, enemy hp) are Critical, the
/// turn counter and status are Major, cosmetic fields are Minor.
pub fn diff_snapshots(expected: &EngineSnapshot, actual: &EngineSnapshot) -> Vec<StateDiff> {
    let mut diffs = Vec::new();

    diff_field(&mut diffs, Severity::Critical, "hash", &expected.hash, &actual.hash);
    diff_field(&mut diffs, Severity::Critical, "score", expected.score, actual.score);
    diff_field(&mut diffs, Severity::Major, "turn", expected.turn, actual.turn);
    diff_field(&mut diffs, Severity::Major, "status", &expected.status, &actual.status);

    diff_field(
        &mut diffs,
        Severity::Critical,
        "player.hp",
        expected.player.hp,
        actual.player.hp,
    );
    diff_field(
        &mut diffs,
        Severity::Critical,
        "player.shield",
        expected.player.shield,
        actual.player.shield,
    );
    diff_field(
        &mut diffs,
        Severity::Critical,
        "player.alive",
        expected.player.alive,
        actual.player.alive,
    );
    diff_field(
        &mut diffs,
        Severity::Minor,
        "player.max_hp",
        expected.player.max_hp,
        actual.player.max_hp,
    );

    diff_field(
        &mut diffs,
        Severity::Critical,
        "enemies.count",
        expected.enemies.len(),
        actual.enemies.len(),
    );
    diff_enemies(&mut diffs, &expected.enemies, &actual.enemies);

    diffs
}

fn diff_field<T: PartialEq + core::fmt::Display>(
    diffs: &mut Vec<StateDiff>,
    severity: Severity,
    field: &str,
    expected: T,
    actual: T,
) {
    if expected != actual {
        diffs.push(StateDiff::new(severity, field, expected, actual));
    }
}

fn diff_enemies(diffs: &mut Vec<StateDiff>, expected: &[EnemySnapshot], actual: &[EnemySnapshot]) {
    for enemy in expected {
        let prefix = format!("enemy[e{}]", enemy.id);
        let Some(other) = actual.iter().find(|other| other.id == enemy.id) else {
            diffs.push(StateDiff::new(Severity::Critical, prefix, "present", "absent"));
            continue;
        };

        diff_field(diffs, Severity::Critical, &format!("{}.hp", prefix), enemy.hp, other.hp);
        diff_field(diffs, Severity::Major, &format!("{}.intent", prefix), &enemy.intent, &other.intent);
        diff_field(diffs, Severity::Major, &format!("{}.kind", prefix), &enemy.kind, &other.kind);
        diff_field(diffs, Severity::Minor, &format!("{}.max_hp", prefix), enemy.max_hp, other.max_hp);
        if (enemy.x, enemy.y) != (other.x, other.y) {
            diffs.push(StateDiff::new(
                Severity::Minor,
                format!("{}.pos", prefix),
                format!("({},{})", enemy.x, enemy.y),
                format!("({},{})", other.x, other.y),
            ));
        }
    }

    for other in actual {
        if !expected.iter().any(|enemy| enemy.id == other.id) {
            diffs.push(StateDiff::new(
                Severity::Critical,
                format!("enemy[e{}]", other.id),
                "absent",
                "present",
            ));
        }
    }
}

/// Point where two event logs stop agreeing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDivergence {
    pub index: usize,
    /// Events around the divergence point, expected side
    pub expected_context: Vec<String>,
    /// Events around the divergence point, actual side
    pub actual_context: Vec<String>,
    pub description: String,
}

/// Compare two event logs and find the first point of divergence.
///
/// Returns `None` if the logs are identical.
pub fn compare_events(expected: &[TurnEvent], actual: &[TurnEvent]) -> Option<EventDivergence> {
    let len = expected.len().min(actual.len());
    let context = |events: &[TurnEvent], from: usize, to: usize| -> Vec<String> {
        events[from..to.min(events.len())]
            .iter()
            .map(|event| format!("{:?}", event))
            .collect()
    };

    if let Some(i) = (0..len).find(|&i| expected[i] != actual[i]) {
        let from = i.saturating_sub(3);
        return Some(EventDivergence {
            index: i,
            expected_context: context(expected, from, i + 4),
            actual_context: context(actual, from, i + 4),
            description: format!(
                "event {} differs: expected {:?}, actual {:?}",
                i, expected[i], actual[i]
            ),
        });
    }

    if expected.len() != actual.len() {
        let from = len.saturating_sub(3);
        return Some(EventDivergence {
            index: len,
            expected_context: context(expected, from, len + 3),
            actual_context: context(actual, from, len + 3),
            description: format!(
                "event log length mismatch: expected {} events, actual {}",
                expected.len(),
                actual.len()
            ),
        });
    }

    None
}
