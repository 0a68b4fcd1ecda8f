//! Packet assignments and their validation

#[cfg(not(feature = "std"))]
use crate::compat::*;
use serde::{Deserialize, Serialize};

use crate::actor::{Enemy, EnemyId};
use crate::error::{AssignmentFault, EngineError};

/// Where a packet goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Discard,
    Player,
    Enemy(EnemyId),
}

impl core::fmt::Display for Target {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Target::Discard => write!(f, "discard"),
            Target::Player => write!(f, "self"),
            Target::Enemy(id) => write!(f, "{}", id),
        }
    }
}

/// One packet (by hand index) sent to one target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub packet: usize,
    pub target: Target,
}

impl Assignment {
    pub const fn new(packet: usize, target: Target) -> Self {
        Self { packet, target }
    }
}

/// Check an assignment list against a hand and the live enemies.
///
/// On success returns the target of every packet, indexed by hand position,
/// so resolution applies them in hand order whatever order the caller
/// listed them in.
pub fn validate(
    hand_size: usize,
    assignments: &[Assignment],
    enemies: &[Enemy],
) -> Result<Vec<Target>, EngineError> {
    let mut targets: Vec<Option<Target>> = vec![None; hand_size];

    for assignment in assignments {
        let slot = targets
            .get_mut(assignment.packet)
            .ok_or(AssignmentFault::OutOfRange {
                index: assignment.packet,
                hand_size,
            })?;
        if slot.is_some() {
            return Err(AssignmentFault::Duplicate(assignment.packet).into());
        }

        if let Target::Enemy(id) = assignment.target {
            let live = enemies.iter().any(|e| e.id == id && e.is_alive());
            if !live {
                return Err(EngineError::UnknownEnemyTarget(id));
            }
        }
        *slot = Some(assignment.target);
    }

    targets
        .into_iter()
        .enumerate()
        .map(|(index, target)| {
            target.ok_or(EngineError::InvalidAssignment(AssignmentFault::Unassigned(index)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{EnemyKind, Intent};

    fn enemies() -> Vec<Enemy> {
        vec![
            Enemy::new(1, EnemyKind::Sentry, 10, 2, Intent::Attack),
            Enemy::new(2, EnemyKind::Firewall, 0, 2, Intent::Attack),
        ]
    }

    #[test]
    fn test_targets_come_back_in_hand_order() {
        let assignments = [
            Assignment::new(2, Target::Player),
            Assignment::new(0, Target::Enemy(EnemyId(1))),
            Assignment::new(1, Target::Discard),
        ];
        let targets = validate(3, &assignments, &enemies()).unwrap();
        assert_eq!(
            targets,
            vec![Target::Enemy(EnemyId(1)), Target::Discard, Target::Player]
        );
    }

    #[test]
    fn test_missing_packet() {
        let assignments = [Assignment::new(0, Target::Discard)];
        assert_eq!(
            validate(2, &assignments, &enemies()),
            Err(EngineError::InvalidAssignment(AssignmentFault::Unassigned(1)))
        );
    }

    #[test]
    fn test_duplicate_packet() {
        let assignments = [
            Assignment::new(0, Target::Discard),
            Assignment::new(0, Target::Player),
        ];
        assert_eq!(
            validate(1, &assignments, &enemies()),
            Err(EngineError::InvalidAssignment(AssignmentFault::Duplicate(0)))
        );
    }

    #[test]
    fn test_index_out_of_range() {
        let assignments = [Assignment::new(5, Target::Discard)];
        assert_eq!(
            validate(1, &assignments, &enemies()),
            Err(EngineError::InvalidAssignment(AssignmentFault::OutOfRange {
                index: 5,
                hand_size: 1
            }))
        );
    }

    #[test]
    fn test_unknown_and_dead_enemies_are_rejected() {
        let unknown = [Assignment::new(0, Target::Enemy(EnemyId(7)))];
        assert_eq!(
            validate(1, &unknown, &enemies()),
            Err(EngineError::UnknownEnemyTarget(EnemyId(7)))
        );

        let dead = [Assignment::new(0, Target::Enemy(EnemyId(2)))];
        assert_eq!(
            validate(1, &dead, &enemies()),
            Err(EngineError::UnknownEnemyTarget(EnemyId(2)))
        );
    }

    #[test]
    fn test_target_display() {
        assert_eq!(Target::Discard.to_string(), "discard");
        assert_eq!(Target::Player.to_string(), "self");
        assert_eq!(Target::Enemy(EnemyId(4)).to_string(), "e4");
    }
}
