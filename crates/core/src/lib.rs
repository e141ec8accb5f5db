#![forbid(unsafe_code)]
//! Adaptive quiz engine: picks the difficulty tier of the next question from
//! each graded, timed answer and summarizes a session afterwards.

pub mod error;
pub mod model;
pub mod settings;
pub mod summary;
pub mod tracker;

pub use error::Error;
pub use settings::{EngineSettings, EngineSettingsDraft, SettingsError};
pub use summary::{PerformanceSummary, generate_performance_summary};
pub use tracker::{DifficultyTracker, SessionSnapshot, TrackerError, TrackerState};
