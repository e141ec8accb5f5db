use thiserror::Error;

use crate::model::LevelError;
use crate::settings::SettingsError;
use crate::tracker::TrackerError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
