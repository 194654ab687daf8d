use std::time::Duration;

use log::{debug, warn};

use crate::{
    domain::{playlist_id::PlaylistId, track::RawTrack},
    source::{TrackSource, error::SourceError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Wait before the attempt following `attempt` (1-based): 1s, 2s, 4s, ...
    /// clamped to `[min_backoff, max_backoff]`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = Duration::from_secs(1u64 << attempt.saturating_sub(1).min(32));
        exp.clamp(self.min_backoff, self.max_backoff.max(self.min_backoff))
    }

    /// Calls `op` until it succeeds, fails with a non-retryable error,
    /// or `max_attempts` is used up.
    pub fn run<T>(
        &self,
        mut op: impl FnMut() -> Result<T, SourceError>,
    ) -> Result<T, SourceError> {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let wait = self.backoff(attempt);
                    warn!("attempt {attempt} failed: {e}, retrying in {wait:?}");
                    std::thread::sleep(wait);
                    attempt += 1;
                }
                Err(e) => {
                    debug!("giving up after {attempt} attempt(s): {e}");
                    return Err(e);
                }
            }
        }
    }
}

/// Wraps a source so transient failures are retried with exponential backoff.
pub struct RetryingSource<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: TrackSource> RetryingSource<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<S: TrackSource> TrackSource for RetryingSource<S> {
    fn fetch_tracks(&self, playlist: &PlaylistId) -> Result<Vec<RawTrack>, SourceError> {
        self.policy.run(|| self.inner.fetch_tracks(playlist))
    }
}
