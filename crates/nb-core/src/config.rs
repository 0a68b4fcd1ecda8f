//! Session configuration
//!
//! Read from an rc-style file:
//!
//! ```text
//! # netbreach session
//! OPTIONS=seed_timeout:30000,max_turns:40
//! OPTIONS=player_hp:30,player_shield:0
//! ```
//!
//! `key:value` and `key=value` are both accepted; `!max_turns` removes the
//! turn cap.

#[cfg(not(feature = "std"))]
use crate::compat::*;

use serde::{Deserialize, Serialize};
#[cfg(feature = "std")]
use std::path::Path;
use thiserror::Error;

use crate::actor::Player;

/// Boundary and starting-stat settings for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long a seed request may stay unanswered before the session is
    /// abandoned
    pub seed_timeout_ms: u64,
    /// Turn cap; reaching it without a result ends the session in Defeat
    pub max_turns: Option<u32>,
    pub player_max_hp: u32,
    pub player_shield: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed_timeout_ms: 30_000,
            max_turns: None,
            player_max_hp: 30,
            player_shield: 0,
        }
    }
}

impl SessionConfig {
    #[cfg(feature = "std")]
    /// Load settings from a file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        Self::parse_config(&contents)
    }

    /// Parse settings from rc text; unspecified keys keep their defaults
    pub fn parse_config(contents: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for line in contents.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(opts) = line.strip_prefix("OPTIONS=") {
                for opt in opts.split(',').map(str::trim).filter(|o| !o.is_empty()) {
                    config.parse_option(opt)?;
                }
            } else if let Some((key, value)) = line.split_once('=') {
                config.set_option(key.trim(), value.trim())?;
            } else {
                return Err(ConfigError::Parse(line.to_string()));
            }
        }

        if config.player_max_hp == 0 {
            return Err(ConfigError::InvalidValue(
                "player_hp".to_string(),
                "0".to_string(),
            ));
        }
        Ok(config)
    }

    fn parse_option(&mut self, opt: &str) -> Result<(), ConfigError> {
        if let Some(name) = opt.strip_prefix('!') {
            return match name {
                "max_turns" => {
                    self.max_turns = None;
                    Ok(())
                }
                _ => Err(ConfigError::UnknownOption(name.to_string())),
            };
        }

        let split = opt.split_once(':').or_else(|| opt.split_once('='));
        match split {
            Some((key, value)) => self.set_option(key.trim(), value.trim()),
            None => Err(ConfigError::MissingValue(opt.to_string())),
        }
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue(name.to_string(), value.to_string());

        match name {
            "seed_timeout" | "seed_timeout_ms" => {
                self.seed_timeout_ms = value.parse().map_err(|_| invalid())?;
            }
            "max_turns" => {
                self.max_turns = match value {
                    "none" | "0" => None,
                    _ => Some(value.parse().map_err(|_| invalid())?),
                };
            }
            "player_hp" | "player_max_hp" => {
                self.player_max_hp = value.parse().map_err(|_| invalid())?;
            }
            "player_shield" => {
                self.player_shield = value.parse().map_err(|_| invalid())?;
            }
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    #[cfg(feature = "std")]
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_config_string()).map_err(|e| ConfigError::Io(e.to_string()))
    }

    pub fn to_config_string(&self) -> String {
        let mut lines = Vec::new();
        lines.push("# netbreach session configuration".to_string());
        lines.push(format!("OPTIONS=seed_timeout:{}", self.seed_timeout_ms));
        match self.max_turns {
            Some(turns) => lines.push(format!("OPTIONS=max_turns:{}", turns)),
            None => lines.push("OPTIONS=!max_turns".to_string()),
        }
        lines.push(format!(
            "OPTIONS=player_hp:{},player_shield:{}",
            self.player_max_hp, self.player_shield
        ));
        lines.join("\n")
    }

    /// The starting player these settings describe
    pub fn player(&self) -> Player {
        let mut player = Player::new(self.player_max_hp);
        player.shield = self.player_shield;
        player
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("cannot parse line: {0}")]
    Parse(String),
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("invalid value '{1}' for option '{0}'")]
    InvalidValue(String, String),
    #[error("missing value for option '{0}'")]
    MissingValue(String),
}
