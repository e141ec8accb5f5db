use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;
use crate::model::level::Level;

//
// ─── PACE ──────────────────────────────────────────────────────────────────────
//

/// How quickly a question was answered relative to its own thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    /// `time_spent <= fast_threshold`
    Fast,
    /// Strictly between the two thresholds.
    Normal,
    /// `time_spent >= slow_threshold`
    Slow,
}

impl Pace {
    /// Classifies a response time against per-question thresholds.
    ///
    /// The fast check runs first, so a time equal to both thresholds is `Fast`.
    #[must_use]
    pub fn classify(time_spent: f64, fast_threshold: f64, slow_threshold: f64) -> Self {
        if time_spent <= fast_threshold {
            Pace::Fast
        } else if time_spent >= slow_threshold {
            Pace::Slow
        } else {
            Pace::Normal
        }
    }
}

//
// ─── SUBMISSION ────────────────────────────────────────────────────────────────
//

/// One graded, timed answer as handed over by the quiz flow.
///
/// Durations are in seconds. Nothing here is validated until the submission
/// reaches a tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub question_id: QuestionId,
    pub question_level: Level,
    pub is_correct: bool,
    pub time_spent: f64,
    pub time_fast_threshold: f64,
    pub time_slow_threshold: f64,
}

impl AnswerSubmission {
    #[must_use]
    pub fn new(
        question_id: impl Into<QuestionId>,
        question_level: Level,
        is_correct: bool,
        time_spent: f64,
        time_fast_threshold: f64,
        time_slow_threshold: f64,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            question_level,
            is_correct,
            time_spent,
            time_fast_threshold,
            time_slow_threshold,
        }
    }

    #[must_use]
    pub fn pace(&self) -> Pace {
        Pace::classify(
            self.time_spent,
            self.time_fast_threshold,
            self.time_slow_threshold,
        )
    }
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// Immutable record of one answered question inside a session history.
///
/// Only a tracker creates attempts, after the submission passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    question_id: QuestionId,
    level: Level,
    is_correct: bool,
    time_spent: f64,
    fast_threshold: f64,
    slow_threshold: f64,
}

impl Attempt {
    pub(crate) fn from_submission(submission: &AnswerSubmission) -> Self {
        Self {
            question_id: submission.question_id.clone(),
            level: submission.question_level,
            is_correct: submission.is_correct,
            time_spent: submission.time_spent,
            fast_threshold: submission.time_fast_threshold,
            slow_threshold: submission.time_slow_threshold,
        }
    }

    /// Turns the attempt back into the submission that produced it.
    ///
    /// Used when a stored history is replayed through a fresh tracker.
    #[must_use]
    pub fn to_submission(&self) -> AnswerSubmission {
        AnswerSubmission {
            question_id: self.question_id.clone(),
            question_level: self.level,
            is_correct: self.is_correct,
            time_spent: self.time_spent,
            time_fast_threshold: self.fast_threshold,
            time_slow_threshold: self.slow_threshold,
        }
    }

    #[must_use]
    pub fn question_id(&self) -> &QuestionId {
        &self.question_id
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn time_spent(&self) -> f64 {
        self.time_spent
    }

    #[must_use]
    pub fn fast_threshold(&self) -> f64 {
        self.fast_threshold
    }

    #[must_use]
    pub fn slow_threshold(&self) -> f64 {
        self.slow_threshold
    }

    #[must_use]
    pub fn pace(&self) -> Pace {
        Pace::classify(self.time_spent, self.fast_threshold, self.slow_threshold)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pace_boundaries_are_inclusive() {
        assert_eq!(Pace::classify(15.0, 15.0, 40.0), Pace::Fast);
        assert_eq!(Pace::classify(15.1, 15.0, 40.0), Pace::Normal);
        assert_eq!(Pace::classify(39.9, 15.0, 40.0), Pace::Normal);
        assert_eq!(Pace::classify(40.0, 15.0, 40.0), Pace::Slow);
    }

    #[test]
    fn equal_thresholds_leave_no_normal_band() {
        assert_eq!(Pace::classify(20.0, 20.0, 20.0), Pace::Fast);
        assert_eq!(Pace::classify(20.5, 20.0, 20.0), Pace::Slow);
        assert_eq!(Pace::classify(0.0, 20.0, 20.0), Pace::Fast);
    }

    #[test]
    fn attempt_mirrors_submission() {
        let submission = AnswerSubmission::new("q1", Level::C4, true, 12.0, 10.0, 30.0);
        let attempt = Attempt::from_submission(&submission);

        assert_eq!(attempt.question_id().as_str(), "q1");
        assert_eq!(attempt.level(), Level::C4);
        assert!(attempt.is_correct());
        assert_eq!(attempt.pace(), Pace::Normal);
        assert_eq!(attempt.to_submission(), submission);
    }
}
