use rouille::Response;
use thiserror::Error;

use crate::{
    schedule::error::{ScheduleError, TimingError},
    source::error::SourceError,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Internal(String),
}

impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::InvalidPlaylistId(_) => ApiError::BadRequest(err.to_string()),
            SourceError::NotFound(_) => ApiError::NotFound(err.to_string()),
            SourceError::PermissionDenied(_) => ApiError::Forbidden(err.to_string()),
            SourceError::Unavailable(_) | SourceError::Malformed(_) => {
                log::error!("playlist source failed: {err}");
                ApiError::Internal("playlist source failed".into())
            }
        }
    }
}

impl From<TimingError> for ApiError {
    fn from(err: TimingError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::Timing(e) => e.into(),
            ScheduleError::Source(e) => e.into(),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Internal(_) => 500,
        }
    }

    pub fn into_response(self) -> Response {
        let status = self.status_code();
        Response::text(self.to_string()).with_status_code(status)
    }
}
