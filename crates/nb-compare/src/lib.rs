//! Parity and verification framework for the netbreach engine.
//!
//! Provides the verifier boundary (re-deal, resolve, compare commitments),
//! structured snapshot capture, diffing with severity classification, and
//! parity reporting over recorded games.

pub mod diff;
pub mod report;
pub mod snapshot;
pub mod verify;

pub use diff::{EventDivergence, Severity, StateDiff, compare_events, diff_snapshots};
pub use report::{ParityReport, TurnDiffEntry};
pub use snapshot::{EngineSnapshot, EnemySnapshot, PlayerSnapshot};
pub use verify::{
    CanonicalEngine, TurnResolver, VerifyError, cross_check, redeal, replay_log, verify_turn,
    verify_turn_with,
};
