//! Playlists stored as JSON pages in a local library directory
//!
//! `<library_dir>/<playlist id>.json` holds the first page. Every page has the shape
//! `{"items": [{"track": {...}}], "next": "<file name>"}`; `next` is relative to the
//! library directory and is `null` on the last page.

use std::{
    collections::HashSet,
    io,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::Deserialize;

use crate::{
    domain::{playlist_id::PlaylistId, track::RawTrack},
    source::{TrackSource, error::SourceError},
};

#[derive(Debug, Deserialize)]
struct Page {
    items: Vec<Item>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Item {
    Bare(TrackObject),
    /// playlist item wrapping a track; `null` when the track is unavailable
    Wrapped { track: Option<TrackObject> },
}

#[derive(Debug, Deserialize)]
struct TrackObject {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    artists: Vec<ArtistObject>,
    duration_ms: u64,
}

#[derive(Debug, Deserialize)]
struct ArtistObject {
    name: String,
}

impl From<TrackObject> for RawTrack {
    fn from(track: TrackObject) -> Self {
        Self {
            id: track.id.unwrap_or_default(),
            name: track.name,
            artist_names: track.artists.into_iter().map(|a| a.name).collect(),
            duration_ms: track.duration_ms,
        }
    }
}

pub struct FileSource {
    library_dir: PathBuf,
}

impl FileSource {
    pub fn new(library_dir: PathBuf) -> Self {
        Self { library_dir }
    }

    fn read_page(&self, file: &str) -> Result<Page, SourceError> {
        let path = self.library_dir.join(file);
        debug!("reading playlist page {}", path.to_string_lossy());

        let contents = std::fs::read_to_string(&path).map_err(|e| io_error(e, &path))?;
        serde_json::from_str(&contents)
            .map_err(|e| SourceError::Malformed(format!("{}: {e}", path.to_string_lossy())))
    }
}

impl TrackSource for FileSource {
    fn fetch_tracks(&self, playlist: &PlaylistId) -> Result<Vec<RawTrack>, SourceError> {
        let mut tracks = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(format!("{}.json", playlist.as_str()));

        while let Some(file) = next {
            if !visited.insert(file.clone()) {
                return Err(SourceError::Malformed(format!(
                    "page {file} of playlist {playlist} links back to itself"
                )));
            }

            let page = self.read_page(&file)?;
            for item in page.items {
                match item {
                    Item::Wrapped { track: Some(track) } | Item::Bare(track) => {
                        tracks.push(track.into())
                    }
                    Item::Wrapped { track: None } => {
                        warn!("skipping unavailable item in playlist {playlist} ({file})")
                    }
                }
            }
            next = page.next;
        }

        debug!("playlist {playlist}: {} tracks", tracks.len());
        Ok(tracks)
    }
}

fn io_error(err: io::Error, path: &Path) -> SourceError {
    let path = path.to_string_lossy().to_string();
    match err.kind() {
        io::ErrorKind::NotFound => SourceError::NotFound(path),
        io::ErrorKind::PermissionDenied => SourceError::PermissionDenied(path),
        _ => SourceError::Unavailable(format!("{path}: {err}")),
    }
}
