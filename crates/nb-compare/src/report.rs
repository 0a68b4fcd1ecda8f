//! Parity reporting: aggregates diffs into human-readable and
//! machine-readable reports.

use crate::diff::{Severity, StateDiff};
use serde::{Deserialize, Serialize};

/// Summary of one parity run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParityReport {
    /// Descriptive label for this report (e.g. "replay run-7.json").
    pub label: String,
    /// Hex session seed.
    pub seed: String,
    /// Number of turns compared.
    pub total_turns: u32,
    /// First turn with any diff (None = full agreement).
    pub first_divergence_turn: Option<u32>,
    /// Turn at which the first critical diff appeared.
    pub first_critical_turn: Option<u32>,
    pub turns_with_diffs: u32,
    /// Aggregate diff counts by severity.
    pub critical_count: u64,
    pub major_count: u64,
    pub minor_count: u64,
    /// Per-turn diff details.
    pub turn_diffs: Vec<TurnDiffEntry>,
}

/// Diffs for a single turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnDiffEntry {
    pub turn: u32,
    pub diffs: Vec<StateDiff>,
}

impl ParityReport {
    pub fn new(label: impl Into<String>, seed: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            seed: seed.into(),
            total_turns: 0,
            first_divergence_turn: None,
            first_critical_turn: None,
            turns_with_diffs: 0,
            critical_count: 0,
            major_count: 0,
            minor_count: 0,
            turn_diffs: Vec::new(),
        }
    }

    /// Record the diffs found for a turn.
    pub fn add_turn(&mut self, turn: u32, diffs: Vec<StateDiff>) {
        self.total_turns += 1;

        if diffs.is_empty() {
            return;
        }

        self.turns_with_diffs += 1;
        self.first_divergence_turn.get_or_insert(turn);

        for d in &diffs {
            match d.severity {
                Severity::Critical => {
                    self.critical_count += 1;
                    self.first_critical_turn.get_or_insert(turn);
                }
                Severity::Major => self.major_count += 1,
                Severity::Minor => self.minor_count += 1,
            }
        }

        self.turn_diffs.push(TurnDiffEntry { turn, diffs });
    }

    /// True if no critical diffs were found.
    pub fn passed(&self) -> bool {
        self.critical_count == 0
    }

    /// True if the two sides agreed on everything.
    pub fn identical(&self) -> bool {
        self.turns_with_diffs == 0
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n============================================================");
        println!("Parity Report: {}", self.label);
        println!("Seed: {}, Turns: {}", self.seed, self.total_turns);
        println!(
            "Result: {}",
            if self.passed() { "PASS" } else { "FAIL" }
        );
        println!(
            "Diffs: {} critical, {} major, {} minor",
            self.critical_count, self.major_count, self.minor_count
        );
        println!(
            "Turns with diffs: {}/{}",
            self.turns_with_diffs, self.total_turns
        );

        if let Some(t) = self.first_critical_turn {
            println!("First critical diff at turn {}", t);
        }

        let show = self.turn_diffs.len().min(10);
        if show > 0 {
            println!("\nFirst {} turns with diffs:", show);
            for entry in &self.turn_diffs[..show] {
                println!("  Turn {}:", entry.turn);
                for d in &entry.diffs {
                    println!("    {}", d);
                }
            }
            if self.turn_diffs.len() > show {
                println!("  ... and {} more turns with diffs", self.turn_diffs.len() - show);
            }
        }

        println!("============================================================\n");
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_report() {
        let mut report = ParityReport::new("clean", "00");
        report.add_turn(1, Vec::new());
        report.add_turn(2, Vec::new());
        assert!(report.passed());
        assert!(report.identical());
        assert_eq!(report.total_turns, 2);
        assert_eq!(report.first_divergence_turn, None);
    }

    #[test]
    fn test_first_divergence_and_first_critical() {
        let mut report = ParityReport::new("drift", "00");
        report.add_turn(1, Vec::new());
        report.add_turn(2, vec![StateDiff::new(Severity::Minor, "enemy[e1].pos", "(0,0)", "(1,0)")]);
        report.add_turn(3, vec![StateDiff::new(Severity::Critical, "hash", "aa", "bb")]);
        report.add_turn(4, vec![StateDiff::new(Severity::Critical, "score", 1, 2)]);

        assert!(!report.passed());
        assert_eq!(report.first_divergence_turn, Some(2));
        assert_eq!(report.first_critical_turn, Some(3));
        assert_eq!(report.critical_count, 2);
        assert_eq!(report.minor_count, 1);
        assert_eq!(report.turns_with_diffs, 3);
    }

    #[test]
    fn test_json_round_trip() {
        let mut report = ParityReport::new("json", "ff");
        report.add_turn(1, vec![StateDiff::new(Severity::Major, "turn", 2, 3)]);
        let parsed: ParityReport = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(parsed, report);
    }
}
