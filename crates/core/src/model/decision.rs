use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::attempt::Pace;
use crate::model::level::Level;

//
// ─── REASON CODE ───────────────────────────────────────────────────────────────
//

/// Closed set of tags explaining a level transition.
///
/// The serialized form is the SCREAMING_SNAKE tag shown to teachers and
/// asserted on by callers, so variants must never be renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    /// Correct and fast: up two tiers.
    CorrectFastPromote,
    /// Correct at a normal pace: up one tier.
    CorrectNormalPromote,
    /// Correct but slow: stay put.
    CorrectSlowHold,
    /// Incorrect and slow: down two tiers.
    IncorrectSlowDemote,
    /// Incorrect at a fast or normal pace: down one tier.
    IncorrectDemote,
}

impl ReasonCode {
    /// Picks the reason for a graded answer at the given pace.
    #[must_use]
    pub fn for_outcome(is_correct: bool, pace: Pace) -> Self {
        match (is_correct, pace) {
            (true, Pace::Fast) => ReasonCode::CorrectFastPromote,
            (true, Pace::Normal) => ReasonCode::CorrectNormalPromote,
            (true, Pace::Slow) => ReasonCode::CorrectSlowHold,
            (false, Pace::Slow) => ReasonCode::IncorrectSlowDemote,
            (false, Pace::Fast | Pace::Normal) => ReasonCode::IncorrectDemote,
        }
    }

    /// Signed tier movement before clamping.
    #[must_use]
    pub fn shift(self) -> i8 {
        match self {
            ReasonCode::CorrectFastPromote => 2,
            ReasonCode::CorrectNormalPromote => 1,
            ReasonCode::CorrectSlowHold => 0,
            ReasonCode::IncorrectSlowDemote => -2,
            ReasonCode::IncorrectDemote => -1,
        }
    }

    /// Applies this reason's movement to `level`, saturating at C1/C6.
    #[must_use]
    pub fn apply(self, level: Level) -> Level {
        let shift = self.shift();
        if shift >= 0 {
            level.step_up(shift.unsigned_abs())
        } else {
            level.step_down(shift.unsigned_abs())
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReasonCode::CorrectFastPromote => "CORRECT_FAST_PROMOTE",
            ReasonCode::CorrectNormalPromote => "CORRECT_NORMAL_PROMOTE",
            ReasonCode::CorrectSlowHold => "CORRECT_SLOW_HOLD",
            ReasonCode::IncorrectSlowDemote => "INCORRECT_SLOW_DEMOTE",
            ReasonCode::IncorrectDemote => "INCORRECT_DEMOTE",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── DECISION ──────────────────────────────────────────────────────────────────
//

/// Outcome of one accepted answer: where the session goes next, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub next_level: Level,
    pub reason: ReasonCode,
    pub previous_level: Level,
}

impl Decision {
    #[must_use]
    pub fn new(previous_level: Level, reason: ReasonCode) -> Self {
        Self {
            next_level: reason.apply(previous_level),
            reason,
            previous_level,
        }
    }

    /// True when the reason asked for movement but the tier was already at
    /// the boundary in that direction.
    #[must_use]
    pub fn is_saturated(&self) -> bool {
        self.reason.shift() != 0 && self.previous_level == self.next_level
    }

    #[must_use]
    pub fn is_promotion(&self) -> bool {
        self.next_level > self.previous_level
    }

    #[must_use]
    pub fn is_demotion(&self) -> bool {
        self.next_level < self.previous_level
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_table_is_complete() {
        use crate::model::Pace::{Fast, Normal, Slow};
        assert_eq!(ReasonCode::for_outcome(true, Fast), ReasonCode::CorrectFastPromote);
        assert_eq!(ReasonCode::for_outcome(true, Normal), ReasonCode::CorrectNormalPromote);
        assert_eq!(ReasonCode::for_outcome(true, Slow), ReasonCode::CorrectSlowHold);
        assert_eq!(ReasonCode::for_outcome(false, Slow), ReasonCode::IncorrectSlowDemote);
        assert_eq!(ReasonCode::for_outcome(false, Fast), ReasonCode::IncorrectDemote);
        assert_eq!(ReasonCode::for_outcome(false, Normal), ReasonCode::IncorrectDemote);
    }

    #[test]
    fn saturation_keeps_reason() {
        let top = Decision::new(Level::C6, ReasonCode::CorrectFastPromote);
        assert_eq!(top.next_level, Level::C6);
        assert_eq!(top.reason, ReasonCode::CorrectFastPromote);
        assert!(top.is_saturated());

        let bottom = Decision::new(Level::C1, ReasonCode::IncorrectSlowDemote);
        assert_eq!(bottom.next_level, Level::C1);
        assert!(bottom.is_saturated());
    }

    #[test]
    fn hold_is_not_saturation() {
        let hold = Decision::new(Level::C6, ReasonCode::CorrectSlowHold);
        assert_eq!(hold.next_level, Level::C6);
        assert!(!hold.is_saturated());
        assert!(!hold.is_promotion());
        assert!(!hold.is_demotion());
    }

    #[test]
    fn partial_clamp_moves_one_tier() {
        let d = Decision::new(Level::C5, ReasonCode::CorrectFastPromote);
        assert_eq!(d.next_level, Level::C6);
        assert!(d.is_promotion());
        assert!(!d.is_saturated());
    }

    #[test]
    fn reason_serializes_as_stable_tag() {
        for reason in [
            ReasonCode::CorrectFastPromote,
            ReasonCode::CorrectNormalPromote,
            ReasonCode::CorrectSlowHold,
            ReasonCode::IncorrectSlowDemote,
            ReasonCode::IncorrectDemote,
        ] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason.as_str()));
        }
    }
}
