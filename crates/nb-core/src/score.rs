//! Scoring
//!
//! Stateless: the new score is always the previous score plus the awards
//! of this resolution's events. Only kills, the jackpot and victory score.

use serde::{Deserialize, Serialize};

use crate::consts::{CACHE_KILL_SCORE, FLAWLESS_SCORE, JACKPOT_SCORE, KILL_SCORE, VICTORY_SCORE};
use crate::event::TurnEvent;

/// Points awarded for a single event
pub const fn award(event: &TurnEvent) -> u64 {
    match event {
        TurnEvent::EnemyDestroyed { cache: false, .. } => KILL_SCORE,
        TurnEvent::EnemyDestroyed { cache: true, .. } => KILL_SCORE + CACHE_KILL_SCORE,
        TurnEvent::Jackpot => JACKPOT_SCORE,
        TurnEvent::Victory { flawless: true } => VICTORY_SCORE + FLAWLESS_SCORE,
        TurnEvent::Victory { flawless: false } => VICTORY_SCORE,
        _ => 0,
    }
}

/// `previous + Σ award(event)`
pub fn accumulate(previous: u64, events: &[TurnEvent]) -> u64 {
    events
        .iter()
        .fold(previous, |score, event| score.saturating_add(award(event)))
}

/// Per-category totals of one resolution, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub kills: u64,
    pub caches: u64,
    pub jackpot: u64,
    pub victory: u64,
    pub flawless: u64,
}

impl ScoreBreakdown {
    pub fn tally(events: &[TurnEvent]) -> Self {
        let mut breakdown = Self::default();
        for event in events {
            match event {
                TurnEvent::EnemyDestroyed { cache, .. } => {
                    breakdown.kills += KILL_SCORE;
                    if *cache {
                        breakdown.caches += CACHE_KILL_SCORE;
                    }
                }
                TurnEvent::Jackpot => breakdown.jackpot += JACKPOT_SCORE,
                TurnEvent::Victory { flawless } => {
                    breakdown.victory += VICTORY_SCORE;
                    if *flawless {
                        breakdown.flawless += FLAWLESS_SCORE;
                    }
                }
                _ => {}
            }
        }
        breakdown
    }

    pub const fn total(&self) -> u64 {
        self.kills + self.caches + self.jackpot + self.victory + self.flawless
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::EnemyId;

    #[test]
    fn test_awards() {
        let kill = TurnEvent::EnemyDestroyed { enemy: EnemyId(1), cache: false };
        let cache = TurnEvent::EnemyDestroyed { enemy: EnemyId(2), cache: true };
        assert_eq!(award(&kill), 100);
        assert_eq!(award(&cache), 1100);
        assert_eq!(award(&TurnEvent::Jackpot), 250);
        assert_eq!(award(&TurnEvent::Victory { flawless: false }), 500);
        assert_eq!(award(&TurnEvent::Victory { flawless: true }), 700);
        assert_eq!(award(&TurnEvent::EnemySwept { enemy: EnemyId(3) }), 0);
    }

    #[test]
    fn test_accumulate_is_additive() {
        let events = [
            TurnEvent::EnemyDestroyed { enemy: EnemyId(1), cache: false },
            TurnEvent::Victory { flawless: true },
        ];
        assert_eq!(accumulate(40, &events), 840);
        assert_eq!(accumulate(40, &[]), 40);
        assert_eq!(
            accumulate(accumulate(0, &events[..1]), &events[1..]),
            accumulate(0, &events)
        );
    }

    #[test]
    fn test_breakdown_matches_accumulate() {
        let events = [
            TurnEvent::Jackpot,
            TurnEvent::EnemyDestroyed { enemy: EnemyId(1), cache: true },
            TurnEvent::EnemyDestroyed { enemy: EnemyId(2), cache: false },
            TurnEvent::Victory { flawless: false },
        ];
        let breakdown = ScoreBreakdown::tally(&events);
        assert_eq!(breakdown.kills, 200);
        assert_eq!(breakdown.caches, 1000);
        assert_eq!(breakdown.total(), accumulate(0, &events));
    }
}
