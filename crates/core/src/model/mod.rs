mod attempt;
mod decision;
mod ids;
mod level;

pub use ids::{ParseIdError, QuestionId, QuizSessionId};

pub use attempt::{AnswerSubmission, Attempt, Pace};
pub use decision::{Decision, ReasonCode};
pub use level::{Level, LevelError};
