use crate::{
    domain::{playlist_id::PlaylistId, track::RawTrack},
    source::error::SourceError,
};

pub mod error;
pub mod file;
pub mod retry;

/// Anything that can list the tracks of a playlist, in playlist order.
pub trait TrackSource {
    fn fetch_tracks(&self, playlist: &PlaylistId) -> Result<Vec<RawTrack>, SourceError>;
}

impl<S: TrackSource + ?Sized> TrackSource for &S {
    fn fetch_tracks(&self, playlist: &PlaylistId) -> Result<Vec<RawTrack>, SourceError> {
        (**self).fetch_tracks(playlist)
    }
}
