use crate::{
    domain::track::{PlaylistStats, RawTrack, TrackRow},
    schedule::{
        error::TimingError,
        format::{dt_to_hhmm, join_artists, ms_to_hhmmss, ms_to_mmss},
        timing::{TimingParameters, compute_timing},
    },
};

/// Turns raw tracks into display rows and playlist-wide stats.
///
/// Stats are taken over the untrimmed durations, so crossfade does not shift
/// the color scale or the displayed total.
pub fn assemble_rows(
    tracks: &[RawTrack],
    params: &TimingParameters,
) -> Result<(Vec<TrackRow>, PlaylistStats), TimingError> {
    let durations = tracks.iter().map(|t| t.duration_ms).collect::<Vec<_>>();
    let timing = compute_timing(&durations, params)?;

    let rows = tracks
        .iter()
        .zip(timing.cumulative_ms)
        .zip(&timing.start_times)
        .enumerate()
        .map(|(i, ((track, cumulative_ms), start))| TrackRow {
            index: i + 1,
            name: track.name.clone(),
            artists_display: join_artists(&track.artist_names),
            duration_ms: track.duration_ms,
            duration_display: ms_to_mmss(track.duration_ms),
            cumulative_ms,
            cumulative_display: ms_to_hhmmss(cumulative_ms),
            approx_time_display: dt_to_hhmm(start),
        })
        .collect::<Vec<_>>();

    Ok((rows, PlaylistStats::from_durations(&durations)))
}
