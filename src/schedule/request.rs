use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::{
    config::ScheduleDefaults,
    schedule::{
        error::TimingError,
        timing::{AnchorMode, TimingParameters, parse_timezone},
    },
};

/// Timing as asked for by a user, before defaults are filled in.
///
/// Shared by the CLI flags and the HTTP query parameters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TimingRequest {
    /// "HH:MM"
    pub start: Option<String>,
    /// "YYYY-MM-DD"
    pub date: Option<String>,
    pub timezone: Option<String>,
    pub crossfade_secs: Option<u32>,
    /// anchor on a track instead of the playlist start
    pub backward: bool,
    /// 1-based, as shown in the table
    pub end_track: Option<usize>,
}

impl TimingRequest {
    /// Fills the gaps from `defaults`.
    ///
    /// A missing date means the next Saturday after today's date in the requested timezone.
    pub fn resolve(
        &self,
        defaults: &ScheduleDefaults,
        now: DateTime<Utc>,
    ) -> Result<TimingParameters, TimingError> {
        let time = parse_time(self.start.as_deref().unwrap_or(&defaults.start_time))?;
        let timezone = match &self.timezone {
            Some(name) => parse_timezone(name)?,
            None => defaults.timezone,
        };
        let date = match &self.date {
            Some(date) => NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
                TimingError::InvalidParameters(format!("'{date}' is not a YYYY-MM-DD date"))
            })?,
            None => next_saturday(now.with_timezone(&timezone).date_naive()),
        };

        let target = match self.end_track {
            Some(0) => {
                return Err(TimingError::InvalidParameters(
                    "track numbers start at 1".into(),
                ));
            }
            Some(n) => Some(n - 1),
            None => None,
        };
        let mode = AnchorMode::resolve(self.backward, target)?;

        TimingParameters::new(
            date.and_time(time),
            timezone,
            self.crossfade_secs.unwrap_or(defaults.crossfade_secs),
            mode,
        )
    }
}

pub fn parse_time(s: &str) -> Result<NaiveTime, TimingError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| TimingError::InvalidParameters(format!("'{s}' is not a HH:MM time")))
}

/// The first Saturday strictly after `today`.
pub fn next_saturday(today: NaiveDate) -> NaiveDate {
    let weekday = today.weekday().num_days_from_monday();
    let days = match (5 + 7 - weekday) % 7 {
        0 => 7,
        d => d,
    };
    today + TimeDelta::days(i64::from(days))
}
