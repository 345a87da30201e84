//! Game configuration: coefficient range, level length, scoring, timer.
//!
//! A settings screen edits a [`GameConfig`] directly; the engine refuses to
//! start with one that fails [`validate_config`].
//!
//! ```
//! use bce_logic::config::{validate_config, GameConfig};
//!
//! let mut config = GameConfig::default();
//! config.timer_enabled = true;
//! assert!(validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest coefficient the introduction screen accepts.
pub const INTRODUCTION_MAX_COEFFICIENT: u32 = 3;

/// Upper bound for `GameConfig::max_coefficient`.
pub const MAX_COEFFICIENT_LIMIT: u32 = 99;

/// Upper bound for `GameConfig::challenges_per_level`.
pub const MAX_CHALLENGES_PER_LEVEL: usize = 100;

/// Upper bound for either point award.
pub const MAX_POINTS: u32 = 1000;

/// Tunable game parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Track elapsed time per level and record best times.
    pub timer_enabled: bool,
    /// Upper bound of the coefficient pickers (lower bound is 0).
    pub max_coefficient: u32,
    pub challenges_per_level: usize,
    pub points_first_attempt: u32,
    pub points_second_attempt: u32,
    /// Fixed RNG seed for challenge selection. `None` = entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            timer_enabled: false,
            max_coefficient: 7,
            challenges_per_level: 5,
            points_first_attempt: 2,
            points_second_attempt: 1,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Points for a level where every challenge was solved on the first try.
    pub fn perfect_points(&self) -> u32 {
        let challenges = u32::try_from(self.challenges_per_level).unwrap_or(u32::MAX);
        self.points_first_attempt.saturating_mul(challenges)
    }
}

/// Validate a configuration, returning all problems found.
pub fn validate_config(config: &GameConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if !(1..=MAX_COEFFICIENT_LIMIT).contains(&config.max_coefficient) {
        errors.push(ConfigError::InvalidMaxCoefficient {
            value: config.max_coefficient,
            limit: MAX_COEFFICIENT_LIMIT,
        });
    }
    if config.challenges_per_level == 0 {
        errors.push(ConfigError::NoChallenges);
    }
    if config.challenges_per_level > MAX_CHALLENGES_PER_LEVEL {
        errors.push(ConfigError::TooManyChallenges {
            value: config.challenges_per_level,
            limit: MAX_CHALLENGES_PER_LEVEL,
        });
    }
    if config.points_second_attempt == 0
        || config.points_first_attempt <= config.points_second_attempt
    {
        errors.push(ConfigError::InvalidScoring {
            first: config.points_first_attempt,
            second: config.points_second_attempt,
        });
    }
    if config.points_first_attempt > MAX_POINTS {
        errors.push(ConfigError::PointsTooLarge {
            value: config.points_first_attempt,
            limit: MAX_POINTS,
        });
    }

    errors
}
