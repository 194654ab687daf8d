use thiserror::Error;

use crate::source::error::SourceError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimingError {
    /// bad target track, crossfade out of range, unknown timezone, unrepresentable time
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Timing(#[from] TimingError),

    #[error(transparent)]
    Source(#[from] SourceError),
}
