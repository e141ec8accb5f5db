use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised when a value cannot be mapped onto one of the six tiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LevelError {
    #[error("level index must be between 1 and 6, got {0}")]
    OutOfRange(u8),

    #[error("unknown level: {0:?}")]
    Unknown(String),
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// Cognitive-difficulty tier, loosely following Bloom's taxonomy.
///
/// Tiers are totally ordered from `C1` (easiest) to `C6` (hardest), so the
/// derived `Ord` can be used directly for comparisons. Movement between tiers
/// always saturates at the boundaries:
///
/// ```
/// # use quiz_core::model::Level;
/// assert_eq!(Level::C5.step_up(2), Level::C6);
/// assert_eq!(Level::C2.step_down(2), Level::C1);
/// assert!(Level::C1 < Level::C6);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Level {
    /// Remember.
    C1,
    /// Understand.
    C2,
    /// Apply. Sessions start here unless told otherwise.
    #[default]
    C3,
    /// Analyze.
    C4,
    /// Evaluate.
    C5,
    /// Create.
    C6,
}

impl Level {
    /// Every tier, easiest first.
    pub const ALL: [Level; 6] = [
        Level::C1,
        Level::C2,
        Level::C3,
        Level::C4,
        Level::C5,
        Level::C6,
    ];

    pub const LOWEST: Level = Level::C1;
    pub const HIGHEST: Level = Level::C6;

    /// One-based position of the tier (`C1` → 1, `C6` → 6).
    #[must_use]
    pub fn index(self) -> u8 {
        match self {
            Level::C1 => 1,
            Level::C2 => 2,
            Level::C3 => 3,
            Level::C4 => 4,
            Level::C5 => 5,
            Level::C6 => 6,
        }
    }

    /// Builds a tier from its one-based index.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::OutOfRange` if `index` is not in `1..=6`.
    pub fn from_index(index: u8) -> Result<Self, LevelError> {
        match index {
            1 => Ok(Level::C1),
            2 => Ok(Level::C2),
            3 => Ok(Level::C3),
            4 => Ok(Level::C4),
            5 => Ok(Level::C5),
            6 => Ok(Level::C6),
            other => Err(LevelError::OutOfRange(other)),
        }
    }

    /// Moves `steps` tiers up, stopping at `C6`.
    #[must_use]
    pub fn step_up(self, steps: u8) -> Self {
        let target = self.index().saturating_add(steps).min(Self::HIGHEST.index());
        Self::from_index(target).unwrap_or(Self::HIGHEST)
    }

    /// Moves `steps` tiers down, stopping at `C1`.
    #[must_use]
    pub fn step_down(self, steps: u8) -> Self {
        let target = self.index().saturating_sub(steps).max(Self::LOWEST.index());
        Self::from_index(target).unwrap_or(Self::LOWEST)
    }

    #[must_use]
    pub fn is_highest(self) -> bool {
        self == Self::HIGHEST
    }

    #[must_use]
    pub fn is_lowest(self) -> bool {
        self == Self::LOWEST
    }

    /// Bloom's taxonomy verb the tier is named after.
    #[must_use]
    pub fn bloom_label(self) -> &'static str {
        match self {
            Level::C1 => "Remember",
            Level::C2 => "Understand",
            Level::C3 => "Apply",
            Level::C4 => "Analyze",
            Level::C5 => "Evaluate",
            Level::C6 => "Create",
        }
    }

    /// Short code used in reports and logs (`"C1"`..`"C6"`).
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Level::C1 => "C1",
            Level::C2 => "C2",
            Level::C3 => "C3",
            Level::C4 => "C4",
            Level::C5 => "C5",
            Level::C6 => "C6",
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.index()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Level {
    type Err = LevelError;

    /// Accepts `"C3"`, `"c3"` or a bare `"3"`, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('C')
            .or_else(|| trimmed.strip_prefix('c'))
            .unwrap_or(trimmed);

        digits
            .parse::<u8>()
            .ok()
            .and_then(|index| Self::from_index(index).ok())
            .ok_or_else(|| LevelError::Unknown(s.to_string()))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_totally_ordered() {
        for pair in Level::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].step_up(1), pair[1]);
            assert_eq!(pair[1].step_down(1), pair[0]);
        }
    }

    #[test]
    fn steps_saturate_at_boundaries() {
        assert_eq!(Level::C6.step_up(1), Level::C6);
        assert_eq!(Level::C5.step_up(2), Level::C6);
        assert_eq!(Level::C1.step_down(2), Level::C1);
        assert_eq!(Level::C2.step_down(2), Level::C1);
        assert_eq!(Level::C3.step_up(u8::MAX), Level::C6);
        assert_eq!(Level::C3.step_down(u8::MAX), Level::C1);
    }

    #[test]
    fn default_is_middle_tier() {
        assert_eq!(Level::default(), Level::C3);
    }

    #[test]
    fn index_conversion_rejects_out_of_range() {
        assert_eq!(Level::try_from(1).unwrap(), Level::C1);
        assert_eq!(Level::try_from(6).unwrap(), Level::C6);
        assert!(matches!(Level::try_from(0), Err(LevelError::OutOfRange(0))));
        assert!(matches!(Level::try_from(7), Err(LevelError::OutOfRange(7))));
    }

    #[test]
    fn parses_codes_and_bare_indices() {
        assert_eq!("C4".parse::<Level>().unwrap(), Level::C4);
        assert_eq!(" c2 ".parse::<Level>().unwrap(), Level::C2);
        assert_eq!("6".parse::<Level>().unwrap(), Level::C6);
    }

    #[test]
    fn parse_rejects_unknown_tiers() {
        for raw in ["C7", "C0", "", "hard", "C-1"] {
            let err = raw.parse::<Level>().unwrap_err();
            assert!(matches!(err, LevelError::Unknown(_)), "{raw}");
        }
    }

    #[test]
    fn display_matches_code() {
        assert_eq!(Level::C5.to_string(), "C5");
        assert_eq!(Level::C1.bloom_label(), "Remember");
        assert_eq!(Level::C6.bloom_label(), "Create");
    }

    #[test]
    fn serializes_as_code() {
        let json = serde_json::to_string(&Level::C2).unwrap();
        assert_eq!(json, "\"C2\"");
        let back: Level = serde_json::from_str("\"C6\"").unwrap();
        assert_eq!(back, Level::C6);
    }
}
