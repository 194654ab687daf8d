use crate::{
    domain::track::PlaylistStats,
    export::records::HEADERS,
    schedule::{color::duration_rgb, format::ms_to_hhmmss, operations::PlaylistSchedule},
};

/// e.g. "12 tracks • Total duration: 00h 47m 10s"
pub fn format_summary(stats: &PlaylistStats) -> String {
    format!(
        "{} tracks • Total duration: {}",
        stats.total_tracks,
        ms_to_hhmmss(stats.total_duration_ms)
    )
}

/// Renders the schedule as an aligned text table.
///
/// With `colored`, the duration cell gets the row's color as a 24-bit background.
pub fn render_table(schedule: &PlaylistSchedule, colored: bool) -> String {
    let cells = schedule
        .rows
        .iter()
        .map(|row| {
            [
                row.index.to_string(),
                row.name.clone(),
                row.artists_display.clone(),
                row.duration_display.clone(),
                row.cumulative_display.clone(),
                row.approx_time_display.clone(),
            ]
        })
        .collect::<Vec<_>>();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| pad(h, w))
        .collect::<Vec<_>>();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');

    for (row, line) in schedule.rows.iter().zip(&cells) {
        let rendered = line
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(col, (cell, w))| {
                let cell = pad(cell, w);
                if colored && col == 3 {
                    let stats = &schedule.stats;
                    let rgb = duration_rgb(
                        row.duration_ms,
                        stats.min_duration_ms,
                        stats.max_duration_ms,
                    );
                    format!(
                        "\x1b[48;2;{};{};{}m\x1b[30m{cell}\x1b[0m",
                        rgb.0, rgb.1, rgb.2
                    )
                } else {
                    cell
                }
            })
            .collect::<Vec<_>>();
        out.push_str(rendered.join("  ").trim_end());
        out.push('\n');
    }

    out
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{cell}{}", " ".repeat(fill))
}
