//! Session reporting: accuracy per tier, pace distribution and a mastery hint.

use serde::Serialize;

use crate::model::{Attempt, Level, Pace};
use crate::settings::DEFAULT_MASTERY_STREAK;

/// Correct/total counts for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelAccuracy {
    pub level: Level,
    pub attempts: usize,
    pub correct: usize,
    /// `correct / attempts`, or `0.0` when the tier was never served.
    pub accuracy: f64,
}

/// How many answers fell into each pace band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpeedTrend {
    pub fast: usize,
    pub normal: usize,
    pub slow: usize,
}

impl SpeedTrend {
    fn record(&mut self, pace: Pace) {
        match pace {
            Pace::Fast => self.fast = self.fast.saturating_add(1),
            Pace::Normal => self.normal = self.normal.saturating_add(1),
            Pace::Slow => self.slow = self.slow.saturating_add(1),
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.fast.saturating_add(self.normal).saturating_add(self.slow)
    }
}

/// Aggregate report over a (possibly still running) session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    current_level: Level,
    total_attempts: usize,
    correct_attempts: usize,
    overall_accuracy: f64,
    per_level: [LevelAccuracy; 6],
    speed: SpeedTrend,
    mastery_signal: Level,
    highest_level_attempted: Option<Level>,
    total_time_spent: f64,
}

impl PerformanceSummary {
    #[must_use]
    pub fn current_level(&self) -> Level {
        self.current_level
    }

    #[must_use]
    pub fn total_attempts(&self) -> usize {
        self.total_attempts
    }

    #[must_use]
    pub fn correct_attempts(&self) -> usize {
        self.correct_attempts
    }

    #[must_use]
    pub fn overall_accuracy(&self) -> f64 {
        self.overall_accuracy
    }

    /// One entry per tier, `C1` first.
    #[must_use]
    pub fn per_level(&self) -> &[LevelAccuracy; 6] {
        &self.per_level
    }

    #[must_use]
    pub fn level(&self, level: Level) -> &LevelAccuracy {
        &self.per_level[usize::from(level.index() - 1)]
    }

    #[must_use]
    pub fn speed(&self) -> SpeedTrend {
        self.speed
    }

    /// Advisory estimate of the highest tier the student handles reliably.
    ///
    /// This is a heuristic (see [`mastery_signal`]), not a certification of
    /// mastery, and should be presented as a hint.
    #[must_use]
    pub fn mastery_signal(&self) -> Level {
        self.mastery_signal
    }

    #[must_use]
    pub fn highest_level_attempted(&self) -> Option<Level> {
        self.highest_level_attempted
    }

    /// Sum of `time_spent` over all attempts, in seconds.
    #[must_use]
    pub fn total_time_spent(&self) -> f64 {
        self.total_time_spent
    }

    /// Mean seconds per answer, `0.0` for an empty session.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_time_spent(&self) -> f64 {
        if self.total_attempts == 0 {
            0.0
        } else {
            self.total_time_spent / self.total_attempts as f64
        }
    }
}

/// Summarize a session history with the default mastery streak.
///
/// Total over any history accepted by a tracker, including an empty one.
#[must_use]
pub fn generate_performance_summary(history: &[Attempt], current_level: Level) -> PerformanceSummary {
    generate_performance_summary_with(history, current_level, DEFAULT_MASTERY_STREAK)
}

/// Summarize a session history, requiring `mastery_streak` consecutive
/// correct answers at a tier before it counts towards the mastery signal.
#[must_use]
pub fn generate_performance_summary_with(
    history: &[Attempt],
    current_level: Level,
    mastery_streak: u32,
) -> PerformanceSummary {
    let mut per_level = Level::ALL.map(|level| LevelAccuracy {
        level,
        attempts: 0,
        correct: 0,
        accuracy: 0.0,
    });
    let mut speed = SpeedTrend::default();
    let mut correct_attempts = 0_usize;
    let mut total_time_spent = 0.0_f64;

    for attempt in history {
        let slot = &mut per_level[usize::from(attempt.level().index() - 1)];
        slot.attempts = slot.attempts.saturating_add(1);
        if attempt.is_correct() {
            slot.correct = slot.correct.saturating_add(1);
            correct_attempts = correct_attempts.saturating_add(1);
        }
        speed.record(attempt.pace());
        total_time_spent += attempt.time_spent();
    }

    for slot in &mut per_level {
        slot.accuracy = ratio(slot.correct, slot.attempts);
    }

    PerformanceSummary {
        current_level,
        total_attempts: history.len(),
        correct_attempts,
        overall_accuracy: ratio(correct_attempts, history.len()),
        per_level,
        speed,
        mastery_signal: mastery_signal(history, current_level, mastery_streak),
        highest_level_attempted: history.iter().map(Attempt::level).max(),
        total_time_spent,
    }
}

/// Highest tier with at least `streak` consecutive correct answers, or
/// `current_level` when no tier qualifies.
///
/// Consecutive is counted per tier: attempts served at other tiers in between
/// neither extend nor break a tier's run, an incorrect answer at the tier
/// resets it. This is an advisory heuristic for dashboards and must not be
/// read as a guarantee that the student has mastered the tier.
#[must_use]
pub fn mastery_signal(history: &[Attempt], current_level: Level, streak: u32) -> Level {
    let needed = usize::try_from(streak.max(1)).unwrap_or(usize::MAX);
    let mut runs = [0_usize; 6];
    let mut mastered = [false; 6];

    for attempt in history {
        let slot = usize::from(attempt.level().index() - 1);
        if attempt.is_correct() {
            runs[slot] = runs[slot].saturating_add(1);
            if runs[slot] >= needed {
                mastered[slot] = true;
            }
        } else {
            runs[slot] = 0;
        }
    }

    Level::ALL
        .into_iter()
        .rev()
        .find(|level| mastered[usize::from(level.index() - 1)])
        .unwrap_or(current_level)
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerSubmission;
    use crate::tracker::DifficultyTracker;

    fn run(start: Level, answers: &[(bool, f64)]) -> DifficultyTracker {
        let mut tracker = DifficultyTracker::starting_at(start);
        for (i, (is_correct, time)) in answers.iter().enumerate() {
            let level = tracker.current_level();
            tracker
                .submit_answer(AnswerSubmission::new(
                    format!("q{i}"),
                    level,
                    *is_correct,
                    *time,
                    15.0,
                    40.0,
                ))
                .unwrap();
        }
        tracker
    }

    #[test]
    fn empty_history_is_all_zero() {
        let summary = generate_performance_summary(&[], Level::C3);

        assert_eq!(summary.total_attempts(), 0);
        assert_eq!(summary.overall_accuracy(), 0.0);
        assert!(summary.per_level().iter().all(|l| l.accuracy == 0.0 && l.attempts == 0));
        assert_eq!(summary.mastery_signal(), Level::C3);
        assert_eq!(summary.speed().total(), 0);
        assert_eq!(summary.highest_level_attempted(), None);
        assert_eq!(summary.mean_time_spent(), 0.0);
    }

    #[test]
    fn counts_accuracy_per_level() {
        // C3 ok-normal -> C4 wrong-fast -> C3 ok-slow -> C3 wrong-slow -> C1
        let tracker = run(
            Level::C3,
            &[(true, 30.0), (false, 5.0), (true, 45.0), (false, 50.0)],
        );
        let summary = generate_performance_summary(tracker.history(), tracker.current_level());

        assert_eq!(summary.total_attempts(), 4);
        assert_eq!(summary.correct_attempts(), 2);
        assert!((summary.overall_accuracy() - 0.5).abs() < f64::EPSILON);

        let c3 = summary.level(Level::C3);
        assert_eq!(c3.attempts, 3);
        assert_eq!(c3.correct, 2);
        assert!((c3.accuracy - 2.0 / 3.0).abs() < 1e-9);

        let c4 = summary.level(Level::C4);
        assert_eq!(c4.attempts, 1);
        assert_eq!(c4.accuracy, 0.0);

        assert_eq!(summary.level(Level::C6).attempts, 0);
        assert_eq!(summary.current_level(), Level::C1);
        assert_eq!(summary.highest_level_attempted(), Some(Level::C4));
    }

    #[test]
    fn speed_trend_counts_each_band() {
        let tracker = run(
            Level::C3,
            &[(true, 10.0), (false, 20.0), (true, 45.0), (false, 5.0)],
        );
        let speed = generate_performance_summary(tracker.history(), tracker.current_level()).speed();

        assert_eq!(speed.fast, 2);
        assert_eq!(speed.normal, 1);
        assert_eq!(speed.slow, 1);
    }

    #[test]
    fn mastery_needs_two_correct_in_a_row_at_a_tier() {
        // Two slow corrects hold at C2 and establish mastery there.
        let tracker = run(Level::C2, &[(true, 45.0), (true, 45.0)]);
        let summary = generate_performance_summary(tracker.history(), tracker.current_level());
        assert_eq!(summary.mastery_signal(), Level::C2);

        // One correct per tier never qualifies, so the current level is reported.
        let tracker = run(Level::C3, &[(true, 10.0), (true, 10.0)]);
        let summary = generate_performance_summary(tracker.history(), tracker.current_level());
        assert_eq!(tracker.current_level(), Level::C6);
        assert_eq!(summary.mastery_signal(), Level::C6);
    }

    #[test]
    fn mastery_prefers_highest_qualifying_tier() {
        // C2 hold twice (mastered), then up to C4 and hold twice (mastered).
        let tracker = run(
            Level::C2,
            &[(true, 45.0), (true, 45.0), (true, 10.0), (true, 45.0), (true, 45.0)],
        );
        let summary = generate_performance_summary(tracker.history(), tracker.current_level());
        assert_eq!(summary.mastery_signal(), Level::C4);
    }

    #[test]
    fn incorrect_answer_resets_tier_run() {
        // C3 right-slow, C3 wrong-fast -> C2, C2 right-normal -> C3, C3 right-slow
        let tracker = run(
            Level::C3,
            &[(true, 45.0), (false, 5.0), (true, 30.0), (true, 45.0)],
        );
        let signal = mastery_signal(tracker.history(), Level::C1, 2);
        assert_eq!(signal, Level::C1);
    }

    #[test]
    fn longer_streak_setting_is_honoured() {
        // Three corrects served at C2: hold, hold, then a normal-pace move to C3.
        let tracker = run(Level::C2, &[(true, 45.0), (true, 45.0), (true, 30.0)]);
        assert_eq!(tracker.current_level(), Level::C3);

        assert_eq!(mastery_signal(tracker.history(), tracker.current_level(), 2), Level::C2);
        let summary =
            generate_performance_summary_with(tracker.history(), tracker.current_level(), 3);
        assert_eq!(summary.mastery_signal(), Level::C2);
    }

    #[test]
    fn short_run_falls_back_under_longer_streak() {
        let tracker = run(Level::C2, &[(true, 45.0), (true, 45.0)]);
        assert_eq!(tracker.current_level(), Level::C2);

        let history = tracker.history();
        assert_eq!(mastery_signal(history, Level::C5, 2), Level::C2);
        assert_eq!(mastery_signal(history, Level::C5, 3), Level::C5);
    }

    #[test]
    fn speed_total_counts_every_band() {
        let tracker = run(Level::C3, &[(true, 5.0), (true, 30.0), (false, 45.0)]);
        let summary = generate_performance_summary(tracker.history(), tracker.current_level());
        assert_eq!(summary.speed().total(), 3);
        assert_eq!(summary.speed().total(), summary.total_attempts());
    }

    #[test]
    fn time_totals_and_mean() {
        let tracker = run(Level::C3, &[(true, 10.0), (true, 30.0)]);
        let summary = generate_performance_summary(tracker.history(), tracker.current_level());
        assert!((summary.total_time_spent() - 40.0).abs() < f64::EPSILON);
        assert!((summary.mean_time_spent() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_does_not_touch_input() {
        let tracker = run(Level::C3, &[(true, 30.0)]);
        let before = tracker.history().to_vec();
        let _ = generate_performance_summary(tracker.history(), tracker.current_level());
        assert_eq!(tracker.history(), before.as_slice());
    }
}
