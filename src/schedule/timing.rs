//! Cumulative playtime and wall-clock anchoring of a track sequence

use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;

use crate::schedule::error::TimingError;

/// Longest crossfade a player can be configured with.
pub const MAX_CROSSFADE_SECS: u32 = 30;

/// How the anchor time relates to the playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorMode {
    /// anchor is when the first track starts
    ForwardFromStart,
    /// anchor is the scheduled moment of the given track (0-based);
    /// every other track is placed relative to it
    BackwardFromTrackEnd(usize),
}

impl AnchorMode {
    /// Builds the mode from loosely-typed inputs such as CLI flags or query params.
    ///
    /// A target track always selects backward anchoring.
    pub fn resolve(backward: bool, target: Option<usize>) -> Result<Self, TimingError> {
        match (backward, target) {
            (_, Some(index)) => Ok(Self::BackwardFromTrackEnd(index)),
            (true, None) => Err(TimingError::InvalidParameters(
                "backward anchoring requires a target track".into(),
            )),
            (false, None) => Ok(Self::ForwardFromStart),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimingParameters {
    /// civil wall-clock time, interpreted in `timezone`
    pub anchor: NaiveDateTime,
    pub timezone: Tz,
    pub crossfade_trim_secs: u32,
    pub mode: AnchorMode,
}

impl TimingParameters {
    pub fn new(
        anchor: NaiveDateTime,
        timezone: Tz,
        crossfade_trim_secs: u32,
        mode: AnchorMode,
    ) -> Result<Self, TimingError> {
        let params = Self {
            anchor,
            timezone,
            crossfade_trim_secs,
            mode,
        };
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<(), TimingError> {
        if self.crossfade_trim_secs > MAX_CROSSFADE_SECS {
            return Err(TimingError::InvalidParameters(format!(
                "crossfade of {}s is outside 0..={MAX_CROSSFADE_SECS}s",
                self.crossfade_trim_secs
            )));
        }
        Ok(())
    }

    pub fn crossfade_trim_ms(&self) -> u64 {
        u64::from(self.crossfade_trim_secs) * 1000
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz, TimingError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| TimingError::InvalidParameters(format!("unknown timezone '{name}'")))
}

/// Per-track timing, parallel to the input durations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timing {
    pub cumulative_ms: Vec<u64>,
    pub start_times: Vec<DateTime<Tz>>,
}

/// Running total of playtime, net of crossfade overlap.
///
/// Every track but the last loses `crossfade_trim_ms` to the overlap with its
/// successor; the last track counts in full.
pub fn cumulative_ms(durations: &[u64], crossfade_trim_ms: u64) -> Vec<u64> {
    let last = durations.len().saturating_sub(1);
    durations
        .iter()
        .enumerate()
        .scan(0u64, |total, (i, &duration)| {
            let effective = if i == last {
                duration
            } else {
                duration.saturating_sub(crossfade_trim_ms)
            };
            *total += effective;
            Some(*total)
        })
        .collect()
}

/// Offset at which each track starts: the cumulative total of its predecessors.
pub fn start_offsets_ms(cumulative: &[u64]) -> Vec<u64> {
    std::iter::once(0)
        .chain(cumulative.iter().copied())
        .take(cumulative.len())
        .collect()
}

/// Attaches `tz` to a civil time.
///
/// Ambiguous times (clocks turned back) resolve to the later, standard-time instant.
/// Times skipped by a forward transition are read with the offset in effect
/// before the gap, so they land past it.
pub fn localize(naive: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(_, later) => later,
        LocalResult::None => {
            let before_gap = tz
                .offset_from_utc_datetime(&(naive - TimeDelta::days(1)))
                .fix();
            let utc = naive - TimeDelta::seconds(i64::from(before_gap.local_minus_utc()));
            tz.from_utc_datetime(&utc)
        }
    }
}

/// Computes cumulative offsets and start times for `durations` under `params`.
///
/// An empty sequence yields an empty result in either mode.
pub fn compute_timing(durations: &[u64], params: &TimingParameters) -> Result<Timing, TimingError> {
    params.validate()?;

    if durations.is_empty() {
        return Ok(Timing::default());
    }

    let cumulative = cumulative_ms(durations, params.crossfade_trim_ms());
    let starts = start_offsets_ms(&cumulative);

    let base = match params.mode {
        AnchorMode::ForwardFromStart => 0,
        AnchorMode::BackwardFromTrackEnd(target) => *starts.get(target).ok_or_else(|| {
            TimingError::InvalidParameters(format!(
                "target track {} is outside a playlist of {} tracks",
                target + 1,
                durations.len()
            ))
        })?,
    };

    let anchor = localize(params.anchor, params.timezone);
    let start_times = starts
        .iter()
        .map(|&offset| shift(anchor, i128::from(offset) - i128::from(base)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Timing {
        cumulative_ms: cumulative,
        start_times,
    })
}

fn shift(anchor: DateTime<Tz>, delta_ms: i128) -> Result<DateTime<Tz>, TimingError> {
    i64::try_from(delta_ms)
        .ok()
        .and_then(TimeDelta::try_milliseconds)
        .and_then(|delta| anchor.checked_add_signed(delta))
        .ok_or_else(|| {
            TimingError::InvalidParameters(format!(
                "{anchor} shifted by {delta_ms}ms is not a representable time"
            ))
        })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};
    use chrono_tz::Europe::Helsinki;

    use super::*;

    fn civil(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn hms(dt: &DateTime<Tz>) -> (u32, u32, u32) {
        (dt.hour(), dt.minute(), dt.second())
    }

    fn params(anchor: NaiveDateTime, trim: u32, mode: AnchorMode) -> TimingParameters {
        TimingParameters::new(anchor, Helsinki, trim, mode).unwrap()
    }

    #[test]
    fn test_cumulative_trims_all_but_last() {
        let cumulative = cumulative_ms(&[180_000, 200_000, 150_000], 6_000);
        assert_eq!(cumulative, vec![174_000, 368_000, 518_000]);
    }

    #[test]
    fn test_cumulative_never_decreases_for_short_tracks() {
        let durations = [3_000, 0, 10_000, 5_999, 6_000, 1];
        let cumulative = cumulative_ms(&durations, 6_000);

        assert!(cumulative.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(cumulative, vec![0, 0, 4_000, 4_000, 4_000, 4_001]);
    }

    #[test]
    fn test_cumulative_last_element_is_trimmed_sum_plus_full_last() {
        let durations = [215_000, 187_000, 243_000, 199_000];
        let trim = 5_000;
        let cumulative = cumulative_ms(&durations, trim);

        let expected: u64 = durations[..3].iter().map(|d| d - trim).sum::<u64>() + 199_000;
        assert_eq!(*cumulative.last().unwrap(), expected);
    }

    #[test]
    fn test_single_track_is_not_trimmed() {
        assert_eq!(cumulative_ms(&[180_000], 30_000), vec![180_000]);
    }

    #[test]
    fn test_start_offsets() {
        assert_eq!(start_offsets_ms(&[174_000, 374_000]), vec![0, 174_000]);
        assert!(start_offsets_ms(&[]).is_empty());
    }

    #[test]
    fn test_forward_from_start() {
        let p = params(civil(2024, 1, 6, 20, 30), 6, AnchorMode::ForwardFromStart);
        let timing = compute_timing(&[180_000, 200_000], &p).unwrap();

        assert_eq!(timing.cumulative_ms, vec![174_000, 374_000]);
        assert_eq!(hms(&timing.start_times[0]), (20, 30, 0));
        assert_eq!(hms(&timing.start_times[1]), (20, 32, 54));
    }

    #[test]
    fn test_backward_from_track_end() {
        let p = params(
            civil(2024, 1, 6, 22, 0),
            6,
            AnchorMode::BackwardFromTrackEnd(1),
        );
        let timing = compute_timing(&[180_000, 200_000], &p).unwrap();

        assert_eq!(hms(&timing.start_times[1]), (22, 0, 0));
        assert_eq!(hms(&timing.start_times[0]), (21, 57, 6));
        // cumulative offsets do not depend on the anchoring mode
        assert_eq!(timing.cumulative_ms, vec![174_000, 374_000]);
    }

    #[test]
    fn test_backward_crosses_midnight() {
        let p = params(
            civil(2024, 1, 7, 0, 1),
            0,
            AnchorMode::BackwardFromTrackEnd(2),
        );
        let timing = compute_timing(&[60_000, 60_000, 60_000], &p).unwrap();

        assert_eq!(timing.start_times[0].date_naive(), NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
        assert_eq!(hms(&timing.start_times[0]), (23, 59, 0));
        assert_eq!(hms(&timing.start_times[2]), (0, 1, 0));
    }

    #[test]
    fn test_backward_requires_valid_target() {
        let p = params(
            civil(2024, 1, 6, 22, 0),
            6,
            AnchorMode::BackwardFromTrackEnd(2),
        );
        let result = compute_timing(&[180_000, 200_000], &p);
        assert!(matches!(result, Err(TimingError::InvalidParameters(_))));
    }

    #[test]
    fn test_resolve_mode() {
        assert_eq!(
            AnchorMode::resolve(false, None),
            Ok(AnchorMode::ForwardFromStart)
        );
        assert_eq!(
            AnchorMode::resolve(true, Some(3)),
            Ok(AnchorMode::BackwardFromTrackEnd(3))
        );
        assert!(matches!(
            AnchorMode::resolve(true, None),
            Err(TimingError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_crossfade_out_of_range() {
        let result = TimingParameters::new(
            civil(2024, 1, 6, 20, 30),
            Helsinki,
            31,
            AnchorMode::ForwardFromStart,
        );
        assert!(matches!(result, Err(TimingError::InvalidParameters(_))));
    }

    #[test]
    fn test_empty_playlist_yields_empty_timing() {
        for mode in [
            AnchorMode::ForwardFromStart,
            AnchorMode::BackwardFromTrackEnd(0),
        ] {
            let p = params(civil(2024, 1, 6, 20, 30), 6, mode);
            assert_eq!(compute_timing(&[], &p).unwrap(), Timing::default());
        }
    }

    #[test]
    fn test_forward_across_spring_forward() {
        // Helsinki skips 03:00-04:00 on 2024-03-31
        let p = params(civil(2024, 3, 31, 2, 0), 0, AnchorMode::ForwardFromStart);
        let timing = compute_timing(&[3_600_000, 3_600_000, 60_000], &p).unwrap();

        let shown: Vec<_> = timing.start_times.iter().map(hms).collect();
        assert_eq!(shown, vec![(2, 0, 0), (4, 0, 0), (5, 0, 0)]);
    }

    #[test]
    fn test_backward_across_spring_forward() {
        // the tracks before the target straddle the 03:00-04:00 gap
        let p = params(
            civil(2024, 3, 31, 5, 0),
            0,
            AnchorMode::BackwardFromTrackEnd(2),
        );
        let timing = compute_timing(&[3_600_000, 3_600_000, 60_000], &p).unwrap();

        let shown: Vec<_> = timing.start_times.iter().map(hms).collect();
        assert_eq!(shown, vec![(2, 0, 0), (4, 0, 0), (5, 0, 0)]);
        assert_eq!(
            timing.start_times[2] - timing.start_times[0],
            TimeDelta::hours(2)
        );
    }

    #[test]
    fn test_backward_targeting_first_track_matches_forward() {
        let anchor = civil(2024, 1, 6, 20, 30);
        let durations = [180_000, 200_000, 150_000];

        let backward = compute_timing(
            &durations,
            &params(anchor, 6, AnchorMode::BackwardFromTrackEnd(0)),
        )
        .unwrap();
        let forward =
            compute_timing(&durations, &params(anchor, 6, AnchorMode::ForwardFromStart)).unwrap();

        assert_eq!(backward, forward);
        assert_eq!(hms(&backward.start_times[0]), (20, 30, 0));
    }

    #[test]
    fn test_forward_across_fall_back() {
        // Helsinki repeats 03:00-04:00 on 2024-10-27
        let p = params(civil(2024, 10, 27, 2, 30), 0, AnchorMode::ForwardFromStart);
        let timing = compute_timing(&[3_600_000, 3_600_000, 60_000], &p).unwrap();

        let shown: Vec<_> = timing.start_times.iter().map(hms).collect();
        assert_eq!(shown, vec![(2, 30, 0), (3, 30, 0), (3, 30, 0)]);
        assert_eq!(
            timing.start_times[2] - timing.start_times[0],
            TimeDelta::hours(2)
        );
    }

    #[test]
    fn test_localize_ambiguous_picks_standard_time() {
        let dt = localize(civil(2024, 10, 27, 3, 30), Helsinki);
        assert_eq!(dt.offset().fix().local_minus_utc(), 2 * 3600);
        assert_eq!(hms(&dt), (3, 30, 0));
    }

    #[test]
    fn test_localize_gap_moves_past_transition() {
        let dt = localize(civil(2024, 3, 31, 3, 30), Helsinki);
        assert_eq!(dt.offset().fix().local_minus_utc(), 3 * 3600);
        assert_eq!(hms(&dt), (4, 30, 0));
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Europe/Helsinki"), Ok(Helsinki));
        assert!(matches!(
            parse_timezone("Mars/Olympus_Mons"),
            Err(TimingError::InvalidParameters(_))
        ));
    }
}
