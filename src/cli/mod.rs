use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::{fs::File, path::PathBuf};

use crate::config;
use crate::domain::playlist_id::PlaylistId;
use crate::export::{
    records::{export_file_name, write_csv},
    table::{format_summary, render_table},
};
use crate::schedule::operations::{PlaylistSchedule, build_schedule};
use crate::schedule::request::TimingRequest;
use crate::source::{TrackSource, file::FileSource, retry::RetryingSource};

#[derive(Parser)]
#[command(name = "playclock")]
#[command(version = "0.1")]
#[command(about = "Playlist timing and duration visualization")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the playlist with cumulative durations and start times
    Schedule {
        /// Playlist URL, URI or ID
        playlist: String,
        #[command(flatten)]
        timing: TimingArgs,
        /// Do not color the duration column
        #[arg(long)]
        no_color: bool,
    },
    /// Write the schedule to a CSV file
    Export {
        /// Playlist URL, URI or ID
        playlist: String,
        #[command(flatten)]
        timing: TimingArgs,
        /// Output file (defaults to playlist_analysis_<id>.csv)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Run http server serving schedules
    Serve,
}

#[derive(Args, Debug, Clone)]
pub struct TimingArgs {
    /// Start time, HH:MM. With --end-track, the time of that track instead
    #[arg(long)]
    pub start: Option<String>,
    /// Date, YYYY-MM-DD (defaults to the next Saturday)
    #[arg(long)]
    pub date: Option<String>,
    /// IANA timezone, e.g. Europe/Helsinki
    #[arg(long)]
    pub tz: Option<String>,
    /// Seconds lost at the end of each song to crossfade (0-30)
    #[arg(long)]
    pub crossfade: Option<u32>,
    /// Anchor the start time on this track (1-based) instead of the first one
    #[arg(long)]
    pub end_track: Option<usize>,
}

impl From<TimingArgs> for TimingRequest {
    fn from(args: TimingArgs) -> Self {
        TimingRequest {
            start: args.start,
            date: args.date,
            timezone: args.tz,
            crossfade_secs: args.crossfade,
            backward: false,
            end_track: args.end_track,
        }
    }
}

fn schedule_playlist<S: TrackSource>(
    source: &S,
    defaults: &config::ScheduleDefaults,
    playlist: &PlaylistId,
    timing: TimingArgs,
) -> anyhow::Result<PlaylistSchedule> {
    let params = TimingRequest::from(timing).resolve(defaults, Utc::now())?;
    build_schedule(source, playlist, &params)
        .with_context(|| format!("Failed to schedule playlist {playlist}"))
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let cfg = config::Config::load(&cli.config.to_string_lossy())?;
    let source = RetryingSource::new(
        FileSource::new(cfg.source.library_dir.clone()),
        cfg.fetch.retry_policy(),
    );

    match cli.command {
        Commands::Schedule {
            playlist,
            timing,
            no_color,
        } => {
            let playlist = PlaylistId::parse(&playlist)?;
            let schedule = schedule_playlist(&source, &cfg.schedule, &playlist, timing)?;

            if schedule.rows.is_empty() {
                println!("No tracks found in this playlist.");
                return Ok(());
            }

            println!("{}", format_summary(&schedule.stats));
            println!();
            print!("{}", render_table(&schedule, !no_color));
        }

        Commands::Export {
            playlist,
            timing,
            out,
        } => {
            let playlist = PlaylistId::parse(&playlist)?;
            let schedule = schedule_playlist(&source, &cfg.schedule, &playlist, timing)?;

            let path = out.unwrap_or_else(|| PathBuf::from(export_file_name(&playlist)));
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.to_string_lossy()))?;
            write_csv(&schedule.rows, file).with_context(|| "Failed to write CSV")?;

            println!(
                "Exported {} tracks to {}",
                schedule.stats.total_tracks,
                path.to_string_lossy()
            );
        }

        Commands::Serve => {
            println!("Starting HTTP server...");

            let http = cfg
                .http
                .clone()
                .context("Config has no [http] section")?;
            let http_server =
                crate::http::server::HttpServer::new(source, cfg.schedule.clone(), http);

            println!(
                "HTTP server running at http://{}:{}",
                http_server.config.bind_addr, http_server.config.port
            );
            http_server.run();
        }
    }

    Ok(())
}
