use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Level, LevelError};

/// Consecutive correct answers at one tier needed before the summary reports it as mastered.
pub const DEFAULT_MASTERY_STREAK: u32 = 2;

/// Validated engine configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EngineSettings {
    starting_level: Level,
    mastery_streak: u32,
}

/// Raw configuration as loaded from a caller's config file.
///
/// Every field is optional; missing or blank values fall back to the defaults.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EngineSettingsDraft {
    pub starting_level: Option<String>,
    pub mastery_streak: Option<u32>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("invalid starting level: {0}")]
    InvalidLevel(#[from] LevelError),

    #[error("mastery streak must be > 0")]
    InvalidMasteryStreak,
}

impl EngineSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft into engine settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidLevel` if the starting level is present but
    /// not one of `C1..C6`, or `SettingsError::InvalidMasteryStreak` for a zero streak.
    pub fn validate(self) -> Result<EngineSettings, SettingsError> {
        let starting_level = match normalize_optional(self.starting_level) {
            Some(raw) => raw.parse::<Level>()?,
            None => Level::default(),
        };

        let mastery_streak = self.mastery_streak.unwrap_or(DEFAULT_MASTERY_STREAK);
        if mastery_streak == 0 {
            return Err(SettingsError::InvalidMasteryStreak);
        }

        Ok(EngineSettings {
            starting_level,
            mastery_streak,
        })
    }
}

impl EngineSettings {
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidMasteryStreak` if `mastery_streak` is zero.
    pub fn new(starting_level: Level, mastery_streak: u32) -> Result<Self, SettingsError> {
        if mastery_streak == 0 {
            return Err(SettingsError::InvalidMasteryStreak);
        }
        Ok(Self {
            starting_level,
            mastery_streak,
        })
    }

    #[must_use]
    pub fn with_starting_level(mut self, level: Level) -> Self {
        self.starting_level = level;
        self
    }

    #[must_use]
    pub fn starting_level(&self) -> Level {
        self.starting_level
    }

    #[must_use]
    pub fn mastery_streak(&self) -> u32 {
        self.mastery_streak
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            starting_level: Level::default(),
            mastery_streak: DEFAULT_MASTERY_STREAK,
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
