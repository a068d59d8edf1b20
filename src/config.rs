//! Gameplay tuning.
//!
//! Every constant the simulation uses lives on `GameConfig`.  Config files
//! are JSON; fields that are missing fall back to the defaults below.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Arena size in world units.
    pub width: i32,
    pub height: i32,

    /// Units per tick.
    pub player_speed: i32,
    pub bullet_speed: i32,
    pub enemy_speed: i32,

    /// New ships start this far above the bottom edge, horizontally centred.
    pub player_bottom_offset: i32,
    /// Bullets appear this far above the ship.
    pub muzzle_offset: i32,

    /// One spawn per `spawn_one_in` ticks on average.  0 disables spawning.
    pub spawn_one_in: u32,
    /// Spawn x is drawn from `[0, width - spawn_margin)`.
    pub spawn_margin: i32,
    pub spawn_y: i32,

    /// Bullets with y below this are pruned.
    pub bullet_min_y: i32,
    /// Per-axis distance under which a bullet and an enemy collide.
    pub hit_threshold: i32,

    pub score_per_enemy: u32,
    /// A level is gained every time the score passes a multiple of this.
    pub level_step: u32,

    pub tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,

            player_speed: 5,
            bullet_speed: 10,
            enemy_speed: 3,

            player_bottom_offset: 60,
            muzzle_offset: 20,

            spawn_one_in: 20,
            spawn_margin: 30,
            spawn_y: -30,

            bullet_min_y: -10,
            hit_threshold: 20,

            score_per_enemy: 10,
            level_step: 100,

            tick_ms: 33,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= self.spawn_margin || self.width <= 0 {
            return Err(ConfigError::Invalid(format!(
                "arena width {} must exceed spawn margin {}",
                self.width, self.spawn_margin
            )));
        }
        if self.spawn_margin < 0 {
            return Err(ConfigError::Invalid("spawn margin must not be negative".into()));
        }
        if self.height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "arena height {} must be positive",
                self.height
            )));
        }
        if self.player_bottom_offset < 0 || self.player_bottom_offset > self.height {
            return Err(ConfigError::Invalid(format!(
                "player bottom offset {} must lie within arena height {}",
                self.player_bottom_offset, self.height
            )));
        }
        if self.player_speed <= 0|| self.bullet_speed <= 0 || self.enemy_speed <= 0 {
            return Err(ConfigError::Invalid("speeds must be positive".into()));
        }
        if self.hit_threshold <= 0 {
            return Err(ConfigError::Invalid("hit threshold must be positive".into()));
        }
        if self.score_per_enemy == 0 || self.level_step == 0 {
            return Err(ConfigError::Invalid(
                "score award and level step must be non-zero".into(),
            ));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick interval must be non-zero".into()));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Where a fresh ship is placed: centre-bottom.
    pub fn player_start(&self) -> (i32, i32) {
        (self.width / 2, self.height - self.player_bottom_offset)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(_) => write!(f, "could not read config file"),
            ConfigError::Parse(_) => write!(f, "config is not valid JSON"),
            ConfigError::Invalid(reason) => write!(f, "invalid config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn player_start_is_centre_bottom() {
        assert_eq!(GameConfig::default().player_start(), (400, 540));
    }

    #[test]
    fn narrow_arena_rejected() {
        let config = GameConfig {
            width: 30,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
