use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// "MM:SS"; minutes are not wrapped into hours.
pub fn ms_to_mmss(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// "HHh MMm SSs"
pub fn ms_to_hhmmss(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}h {minutes:02}m {seconds:02}s")
}

/// 24-hour "HH:MM" in the datetime's own timezone
pub fn dt_to_hhmm<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    dt.format("%H:%M").to_string()
}

pub fn join_artists<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}
