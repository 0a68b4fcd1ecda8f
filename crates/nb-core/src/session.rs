//! Session lifecycle
//!
//! Wraps the snapshot state machine with the seed boundary:
//!
//! ```text
//! AwaitingSeed ──request_seed──► (request in flight) ──receive_seed──► Active(1)
//!       │                               │ timeout
//!       │                               ▼
//!       └──────────────────────────► Abandoned
//! Active(n) ──play──► Active(n + 1) ... ──► Resolved(Victory | Defeat)
//! ```
//!
//! At most one seed request is in flight. The session never reads a clock;
//! callers pass the current time in milliseconds.

#[cfg(not(feature = "std"))]
use crate::compat::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::combat::{Assignment, RoundResult, TurnOutcome, resolve_turn};
use crate::config::SessionConfig;
use crate::error::EngineError;
use crate::event::TurnEvent;
use crate::replay::TurnRecord;
use crate::seed::Seed;
use crate::state::{Encounter, GameState, GameStatus};

/// Identifies one seed request so late answers to an older one are refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeedRequestId(pub u64);

impl core::fmt::Display for SeedRequestId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct PendingRequest {
    id: SeedRequestId,
    issued_at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("seed request {0} is still in flight")]
    SeedRequestInFlight(SeedRequestId),
    #[error("no seed request is in flight")]
    NoSeedRequest,
    #[error("seed answers request {got}, but {expected} is in flight")]
    StaleSeedRequest {
        expected: SeedRequestId,
        got: SeedRequestId,
    },
    #[error("seed arrived after {waited_ms} ms; session abandoned")]
    SeedTimedOut { waited_ms: u64 },
    #[error("session was abandoned")]
    Abandoned,
    #[error("session is not waiting for a seed ({0})")]
    NotAwaitingSeed(GameStatus),
}

/// One game session from encounter to result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    config: SessionConfig,
    initial: GameState,
    state: GameState,
    pending: Option<PendingRequest>,
    next_request: u64,
    abandoned: bool,
    history: Vec<TurnRecord>,
}

impl Session {
    pub fn new(config: SessionConfig, encounter: Encounter) -> Result<Self, SessionError> {
        Self::from_initial(config, GameState::awaiting(encounter)?)
    }

    /// Start from a stored pre-seed state, e.g. the head of a replay log
    pub fn from_initial(config: SessionConfig, state: GameState) -> Result<Self, SessionError> {
        if state.status != GameStatus::AwaitingSeed {
            return Err(SessionError::NotAwaitingSeed(state.status));
        }
        Ok(Self {
            config,
            initial: state.clone(),
            state,
            pending: None,
            next_request: 1,
            abandoned: false,
            history: Vec::new(),
        })
    }

    /// Ask for the session seed. Only one request may be outstanding; a
    /// request that has outlived the timeout abandons the session instead.
    pub fn request_seed(&mut self, now_ms: u64) -> Result<SeedRequestId, SessionError> {
        self.ensure_live(now_ms)?;
        if self.state.status != GameStatus::AwaitingSeed {
            return Err(SessionError::NotAwaitingSeed(self.state.status));
        }
        if let Some(pending) = self.pending {
            return Err(SessionError::SeedRequestInFlight(pending.id));
        }

        let id = SeedRequestId(self.next_request);
        self.next_request += 1;
        self.pending = Some(PendingRequest {
            id,
            issued_at_ms: now_ms,
        });
        debug!(request = %id, now_ms, "seed requested");
        Ok(id)
    }

    /// Accept the seed for the in-flight request and deal turn 1
    pub fn receive_seed(
        &mut self,
        request: SeedRequestId,
        seed: Seed,
        now_ms: u64,
    ) -> Result<&GameState, SessionError> {
        if self.abandoned {
            return Err(SessionError::Abandoned);
        }
        let pending = self.pending.ok_or(SessionError::NoSeedRequest)?;
        if pending.id != request {
            return Err(SessionError::StaleSeedRequest {
                expected: pending.id,
                got: request,
            });
        }

        let waited_ms = now_ms.saturating_sub(pending.issued_at_ms);
        if waited_ms > self.config.seed_timeout_ms {
            self.abandon(waited_ms);
            return Err(SessionError::SeedTimedOut { waited_ms });
        }

        self.state = self.state.with_seed(seed)?;
        self.pending = None;
        debug!(request = %request, waited_ms, "seed received");
        Ok(&self.state)
    }

    /// Abandon the session if the in-flight request has timed out.
    /// Returns whether the session is abandoned.
    pub fn expire(&mut self, now_ms: u64) -> bool {
        if let Some(pending) = self.pending {
            let waited_ms = now_ms.saturating_sub(pending.issued_at_ms);
            if waited_ms > self.config.seed_timeout_ms {
                self.abandon(waited_ms);
            }
        }
        self.abandoned
    }

    /// Resolve the current turn and deal the next one.
    ///
    /// The returned outcome's state already holds the next hand when the
    /// game continues. Reaching the configured turn cap without a result
    /// ends the session in Defeat.
    pub fn play(&mut self, assignments: &[Assignment]) -> Result<TurnOutcome, SessionError> {
        if self.abandoned {
            return Err(SessionError::Abandoned);
        }

        let turn = self.state.turn;
        let mut outcome = resolve_turn(&self.state, assignments)?;

        if outcome.result == RoundResult::Continue {
            if let Some(max) = self.config.max_turns {
                if turn >= max {
                    debug!(turn, max, "turn cap reached");
                    outcome.result = RoundResult::Defeat;
                    outcome.state.status = GameStatus::Resolved(RoundResult::Defeat);
                    outcome.events.push(TurnEvent::Defeat);
                }
            }
        }
        if outcome.state.status.is_active() {
            outcome.state = outcome.state.deal()?;
        }

        self.history
            .push(TurnRecord::from_outcome(turn, assignments, &outcome));
        self.state = outcome.state.clone();
        Ok(outcome)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The state before the seed arrived
    pub fn initial(&self) -> &GameState {
        &self.initial
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn pending_request(&self) -> Option<SeedRequestId> {
        self.pending.map(|pending| pending.id)
    }

    pub fn is_abandoned(&self) -> bool {
        self.abandoned
    }

    pub fn is_over(&self) -> bool {
        self.abandoned || self.state.status.is_resolved()
    }

    fn ensure_live(&mut self, now_ms: u64) -> Result<(), SessionError> {
        if self.expire(now_ms) {
            return Err(SessionError::Abandoned);
        }
        Ok(())
    }

    fn abandon(&mut self, waited_ms: u64) {
        warn!(
            waited_ms,
            timeout_ms = self.config.seed_timeout_ms,
            "seed request timed out; abandoning session"
        );
        self.pending = None;
        self.abandoned = true;
    }
}
