use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid playlist identifier: {0}. Expected a playlist URL, URI, or 22-character ID")]
    InvalidPlaylistId(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("playlist {0} not found")]
    NotFound(String),

    /// transient failure, worth another attempt
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("malformed playlist data: {0}")]
    Malformed(String),
}

impl SourceError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SourceError::Unavailable(_))
    }
}
