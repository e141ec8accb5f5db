#![forbid(unsafe_code)]

mod clock;
pub mod error;
pub mod quiz_session_service;

pub use clock::Clock;
pub use error::QuizSessionError;
pub use quiz_session_service::{QuizAnswerResult, QuizSessionService};
