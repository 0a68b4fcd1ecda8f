//! Parsing of assignment lists and enemy rosters from the command line
//!
//! Assignments are written `INDEX:TARGET` separated by commas, e.g.
//! `0:e1,1:self,2:discard`, or as the hex of the 6-byte wire records with a
//! `0x` prefix. Enemies are written `KIND:HP[:DAMAGE[:INTENT]]`.

use strum::IntoEnumIterator;

use nb_core::wire::decode_assignments;
use nb_core::{Assignment, Enemy, EnemyId, EnemyKind, Intent, Player, Target};

use crate::error::CliError;

/// Parse one target word
fn parse_target(word: &str) -> Option<Target> {
    match word.to_ascii_lowercase().as_str() {
        "self" | "player" | "p" => Some(Target::Player),
        "discard" | "d" | "-" => Some(Target::Discard),
        other => {
            let digits = other.strip_prefix('e').unwrap_or(other);
            digits.parse().ok().map(|id| Target::Enemy(EnemyId(id)))
        }
    }
}

/// Parse an assignment list in either accepted form
pub fn parse_assignments(text: &str) -> Result<Vec<Assignment>, CliError> {
    let text = text.trim();
    if let Some(digits) = text.strip_prefix("0x") {
        let bytes = hex::decode(digits)?;
        return Ok(decode_assignments(&bytes)?);
    }

    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let bad = || CliError::BadAssignment(item.to_string());
            let (index, target) = item.split_once(':').ok_or_else(bad)?;
            let index: usize = index.trim().parse().map_err(|_| bad())?;
            let target = parse_target(target.trim()).ok_or_else(bad)?;
            Ok(Assignment::new(index, target))
        })
        .collect()
}

/// Discard every packet of a `hand_size` hand the list leaves out
pub fn discard_rest(mut assignments: Vec<Assignment>, hand_size: usize) -> Vec<Assignment> {
    for index in 0..hand_size {
        if !assignments.iter().any(|a| a.packet == index) {
            assignments.push(Assignment::new(index, Target::Discard));
        }
    }
    assignments
}

fn by_name<T: IntoEnumIterator + ToString>(word: &str) -> Option<T> {
    T::iter().find(|v| v.to_string().eq_ignore_ascii_case(word))
}

/// Parse one `KIND:HP[:DAMAGE[:INTENT]]` roster entry with the given id
pub fn parse_enemy(id: u32, text: &str) -> Result<Enemy, CliError> {
    let bad = || CliError::BadEnemy(text.to_string());
    let mut parts = text.split(':').map(str::trim);

    let kind: EnemyKind = parts.next().and_then(by_name).ok_or_else(bad)?;
    let hp: u32 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(bad)?;
    let damage: u32 = match parts.next() {
        Some(p) => p.parse().map_err(|_| bad())?,
        None => 0,
    };
    let intent: Intent = match parts.next() {
        Some(p) => by_name(p).ok_or_else(bad)?,
        None if damage > 0 => Intent::Attack,
        None => Intent::Idle,
    };
    if parts.next().is_some() {
        return Err(bad());
    }

    if kind == EnemyKind::Cache {
        return Ok(Enemy::cache(id, hp));
    }
    Ok(Enemy::new(id, kind, hp, damage, intent))
}

/// Parse a roster; ids are assigned 1, 2, ... in order
pub fn parse_roster(entries: &[String]) -> Result<Vec<Enemy>, CliError> {
    entries
        .iter()
        .zip(1u32..)
        .map(|(entry, id)| parse_enemy(id, entry))
        .collect()
}

/// The roster used when none is given
pub fn default_roster() -> Vec<Enemy> {
    vec![
        Enemy::new(1, EnemyKind::Sentry, 20, 2, Intent::Attack).at(2, 1),
        Enemy::new(2, EnemyKind::Firewall, 30, 0, Intent::Defend).at(5, 3),
        Enemy::new(3, EnemyKind::Daemon, 24, 4, Intent::Attack).at(6, 6),
        Enemy::cache(4, 10).at(7, 7),
    ]
}

/// One-line summary of the player
pub fn describe_player(player: &Player) -> String {
    format!("hp {}/{} shield {}", player.hp, player.max_hp, player.shield)
}
