#![forbid(unsafe_code)]

mod mapping;
pub mod repository;

pub use repository::{InMemoryRepository, QuizSessionRecord, QuizSessionRepository, StorageError};
