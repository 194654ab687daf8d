use serde::{Deserialize, Serialize};

/// Track as delivered by a playlist source.
///
/// `duration_ms` is the full length of the track, before any crossfade trim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTrack {
    pub id: String,
    pub name: String,
    pub artist_names: Vec<String>,
    pub duration_ms: u64,
}

#[cfg(test)]
impl RawTrack {
    pub fn new(id: &str, name: &str, artists: &[&str], duration_ms: u64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            artist_names: artists.iter().map(|a| a.to_string()).collect(),
            duration_ms,
        }
    }
}

/// Display-ready row of a scheduled playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRow {
    /// 1-based position in the playlist
    pub index: usize,
    pub name: String,
    pub artists_display: String,
    pub duration_ms: u64,
    /// "MM:SS"
    pub duration_display: String,
    pub cumulative_ms: u64,
    /// "HHh MMm SSs"
    pub cumulative_display: String,
    /// "HH:MM" in the schedule's timezone
    pub approx_time_display: String,
}

/// Aggregates over the untrimmed track durations.
///
/// Used as the domain of the duration color scale and for the summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistStats {
    pub total_tracks: usize,
    pub total_duration_ms: u64,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
}

impl PlaylistStats {
    pub fn from_durations(durations: &[u64]) -> Self {
        Self {
            total_tracks: durations.len(),
            total_duration_ms: durations.iter().sum(),
            min_duration_ms: durations.iter().copied().min().unwrap_or(0),
            max_duration_ms: durations.iter().copied().max().unwrap_or(0),
        }
    }
}
