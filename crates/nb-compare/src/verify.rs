//! Verifier boundary.
//!
//! A verifier never trusts the hand a client reports: it re-deals the turn
//! from the session seed, resolves the submitted assignments itself and
//! compares commitments.

use nb_core::{
    Assignment, EngineError, GameState, GameStatus, Seed, StateHash, TurnOutcome, TurnRecord,
    resolve_turn,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::diff::{Severity, StateDiff, compare_events, diff_snapshots};
use crate::report::ParityReport;
use crate::snapshot::EngineSnapshot;

/// Anything that can resolve a turn. Implement it for a second engine to
/// cross-check it against the canonical one.
pub trait TurnResolver {
    fn name(&self) -> &str;

    fn resolve(
        &self,
        state: &GameState,
        assignments: &[Assignment],
    ) -> Result<TurnOutcome, EngineError>;
}

/// The `nb-core` resolver
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalEngine;

impl TurnResolver for CanonicalEngine {
    fn name(&self) -> &str {
        "nb-core"
    }

    fn resolve(
        &self,
        state: &GameState,
        assignments: &[Assignment],
    ) -> Result<TurnOutcome, EngineError> {
        resolve_turn(state, assignments)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("record for turn {got} found where turn {expected} was due")]
    TurnOutOfOrder { expected: u32, got: u32 },
    #[error("game ended on turn {0} but the log continues")]
    TrailingRecords(u32),
}

/// `prior` with the session seed installed and the current turn re-dealt.
///
/// The roster is checked first: unique enemy ids, no actor above max hp.
pub fn redeal(seed: &Seed, prior: &GameState) -> Result<GameState, EngineError> {
    prior.validate()?;
    match prior.status {
        GameStatus::AwaitingSeed => prior.with_seed(*seed),
        _ => {
            let mut trusted = prior.clone();
            trusted.seed = Some(*seed);
            trusted.deal()
        }
    }
}

/// Verify one turn with the canonical engine.
///
/// Returns the verified outcome, or `CommitmentMismatch` when the claimed
/// hash disagrees with the recomputed one.
pub fn verify_turn(
    seed: &Seed,
    prior: &GameState,
    assignments: &[Assignment],
    claimed: StateHash,
) -> Result<TurnOutcome, EngineError> {
    verify_turn_with(&CanonicalEngine, seed, prior, assignments, claimed)
}

pub fn verify_turn_with<R: TurnResolver + ?Sized>(
    resolver: &R,
    seed: &Seed,
    prior: &GameState,
    assignments: &[Assignment],
    claimed: StateHash,
) -> Result<TurnOutcome, EngineError> {
    let trusted = redeal(seed, prior)?;
    let outcome = resolver.resolve(&trusted, assignments)?;
    if outcome.hash != claimed {
        warn!(
            turn = trusted.turn,
            resolver = resolver.name(),
            %claimed,
            computed = %outcome.hash,
            "commitment mismatch"
        );
        return Err(EngineError::CommitmentMismatch {
            expected: claimed,
            actual: outcome.hash,
        });
    }
    debug!(turn = trusted.turn, hash = %outcome.hash, "turn verified");
    Ok(outcome)
}

/// Resolve the same turn with two resolvers and diff the results.
///
/// Both sides must accept or reject the input; a one-sided rejection is
/// reported as a Critical `outcome` diff.
pub fn cross_check(
    expected: &dyn TurnResolver,
    actual: &dyn TurnResolver,
    state: &GameState,
    assignments: &[Assignment],
) -> Vec<StateDiff> {
    match (
        expected.resolve(state, assignments),
        actual.resolve(state, assignments),
    ) {
        (Ok(left), Ok(right)) => {
            let mut diffs = diff_snapshots(
                &EngineSnapshot::capture(&left.state, expected.name()),
                &EngineSnapshot::capture(&right.state, actual.name()),
            );
            if let Some(divergence) = compare_events(&left.events, &right.events) {
                diffs.push(StateDiff::new(
                    Severity::Major,
                    format!("events[{}]", divergence.index),
                    divergence.expected_context.join(", "),
                    divergence.actual_context.join(", "),
                ));
            }
            diffs
        }
        (Err(left), Err(right)) if left == right => Vec::new(),
        (left, right) => vec![StateDiff::new(
            Severity::Critical,
            "outcome",
            describe(&left),
            describe(&right),
        )],
    }
}

fn describe(result: &Result<TurnOutcome, EngineError>) -> String {
    match result {
        Ok(outcome) => format!("{} ({})", outcome.result, outcome.hash),
        Err(error) => format!("error: {}", error),
    }
}

/// Re-run a recorded game and compare every committed hash.
///
/// `initial` is the state the log starts from, either still awaiting its
/// seed or already Active. Engine errors abort the replay; hash
/// disagreements are collected into the report.
pub fn replay_log(
    resolver: &dyn TurnResolver,
    label: &str,
    seed: &Seed,
    initial: &GameState,
    records: &[TurnRecord],
) -> Result<ParityReport, VerifyError> {
    let mut report = ParityReport::new(label, seed.to_string());
    let mut state = redeal(seed, initial)?;

    for record in records {
        if !state.status.is_active() {
            return Err(VerifyError::TrailingRecords(state.turn.saturating_sub(1)));
        }
        if record.turn != state.turn {
            return Err(VerifyError::TurnOutOfOrder {
                expected: state.turn,
                got: record.turn,
            });
        }

        let outcome = resolver.resolve(&state, &record.assignments)?;
        let mut diffs = Vec::new();
        if outcome.hash != record.hash {
            warn!(turn = record.turn, recorded = %record.hash, computed = %outcome.hash, "replay diverged");
            diffs.push(StateDiff::new(
                Severity::Critical,
                "hash",
                record.hash,
                outcome.hash,
            ));
        }
        report.add_turn(record.turn, diffs);

        state = outcome.state;
        if state.status.is_active() {
            state = state.deal()?;
        }
    }

    debug!(label, turns = report.total_turns, passed = report.passed(), "replay finished");
    Ok(report)
}
