use std::io;

use serde::Serialize;

use crate::domain::{playlist_id::PlaylistId, track::TrackRow};

pub const HEADERS: [&str; 6] = [
    "Index",
    "Song name",
    "Artist",
    "Song duration",
    "Cumulative duration",
    "Start time",
];

/// Exported projection of a row; raw millisecond fields stay internal.
#[derive(Serialize)]
struct CsvRecord<'a> {
    index: usize,
    name: &'a str,
    artists: &'a str,
    duration: &'a str,
    cumulative: &'a str,
    start_time: &'a str,
}

impl<'a> From<&'a TrackRow> for CsvRecord<'a> {
    fn from(row: &'a TrackRow) -> Self {
        Self {
            index: row.index,
            name: &row.name,
            artists: &row.artists_display,
            duration: &row.duration_display,
            cumulative: &row.cumulative_display,
            start_time: &row.approx_time_display,
        }
    }
}

pub fn write_csv<W: io::Write>(rows: &[TrackRow], out: W) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);

    writer.write_record(HEADERS)?;
    for row in rows {
        writer.serialize(CsvRecord::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_file_name(playlist: &PlaylistId) -> String {
    format!("playlist_analysis_{playlist}.csv")
}
