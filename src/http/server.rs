use chrono::Utc;
use log::info;
use rouille::{Request, Response};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::{
    config::{HttpConfig, ScheduleDefaults},
    domain::{
        playlist_id::PlaylistId,
        track::{PlaylistStats, TrackRow},
    },
    export::{
        records::{export_file_name, write_csv},
        table::format_summary,
    },
    http::error::ApiError,
    schedule::{
        operations::{PlaylistSchedule, ScheduleCache, load_schedule},
        request::TimingRequest,
    },
    source::TrackSource,
};

pub struct HttpServer<S> {
    source: S,
    cache: Arc<Mutex<ScheduleCache>>,
    defaults: ScheduleDefaults,
    pub config: HttpConfig,
}

impl<S: TrackSource + Send + Sync + 'static> HttpServer<S> {
    pub fn run(self) {
        let addr = format!("{}:{}", self.config.bind_addr, self.config.port);
        rouille::start_server(addr, move |request| self.handle_request(request));
    }
}

impl<S: TrackSource> HttpServer<S> {
    pub fn new(source: S, defaults: ScheduleDefaults, config: HttpConfig) -> Self {
        Self {
            source,
            cache: Arc::new(Mutex::new(ScheduleCache::with_capacity(config.cache_capacity))),
            defaults,
            config,
        }
    }

    fn handle_request(&self, request: &Request) -> Response {
        Self::log_request(request);

        let response = rouille::router!(request,
            (GET) (/playlists/{id: String}/schedule) => {
                self.handle_get_schedule(&id, request)
            },
            (GET) (/playlists/{id: String}/export) => {
                self.handle_get_export(&id, request)
            },
            _ => Response::empty_404()
        );

        info!("Response: {} {}", request.method(), response.status_code);
        response
    }

    fn log_request(request: &Request) {
        info!("{} {}", request.method(), request.url());
    }

    fn handle_get_schedule(&self, id: &str, request: &Request) -> Response {
        match self.schedule_for(id, request) {
            Ok((playlist, schedule)) => {
                Response::json(&ScheduleResponse::from_domain(&playlist, &schedule))
            }
            Err(e) => e.into_response(),
        }
    }

    fn handle_get_export(&self, id: &str, request: &Request) -> Response {
        let export = || -> Result<Response, ApiError> {
            let (playlist, schedule) = self.schedule_for(id, request)?;

            let mut body = Vec::new();
            write_csv(&schedule.rows, &mut body)
                .map_err(|e| ApiError::Internal(format!("failed to write CSV: {e}")))?;

            Ok(Response::from_data("text/csv; charset=utf-8", body)
                .with_content_disposition_attachment(&export_file_name(&playlist)))
        };

        export().unwrap_or_else(ApiError::into_response)
    }

    /// resolves the request's timing and loads the schedule through the shared cache
    fn schedule_for(
        &self,
        id: &str,
        request: &Request,
    ) -> Result<(PlaylistId, PlaylistSchedule), ApiError> {
        let playlist = PlaylistId::parse(id)?;
        let params = timing_request(request)?.resolve(&self.defaults, Utc::now())?;
        let schedule = load_schedule(&self.source, &self.cache, &playlist, &params)?;

        Ok((playlist, schedule))
    }
}

fn timing_request(request: &Request) -> Result<TimingRequest, ApiError> {
    let backward = match request.get_param("mode").as_deref() {
        None | Some("forward") => false,
        Some("backward") => true,
        Some(other) => {
            return Err(ApiError::BadRequest(format!(
                "mode must be 'forward' or 'backward', got '{other}'"
            )));
        }
    };

    Ok(TimingRequest {
        start: request.get_param("start"),
        date: request.get_param("date"),
        timezone: request.get_param("tz"),
        crossfade_secs: parse_number(request, "crossfade")?,
        backward,
        end_track: parse_number(request, "end_track")?,
    })
}

fn parse_number<T: std::str::FromStr>(
    request: &Request,
    name: &str,
) -> Result<Option<T>, ApiError> {
    request
        .get_param(name)
        .map(|value| {
            value.trim().parse().map_err(|_| {
                ApiError::BadRequest(format!("{name} must be a number, got '{value}'"))
            })
        })
        .transpose()
}

#[derive(Serialize, Deserialize)]
struct ScheduleResponse {
    playlist_id: String,
    summary: String,
    stats: PlaylistStats,
    rows: Vec<RowResponse>,
}

#[derive(Serialize, Deserialize)]
struct RowResponse {
    #[serde(flatten)]
    row: TrackRow,
    color: String,
}

impl ScheduleResponse {
    fn from_domain(playlist: &PlaylistId, schedule: &PlaylistSchedule) -> Self {
        Self {
            playlist_id: playlist.to_string(),
            summary: format_summary(&schedule.stats),
            stats: schedule.stats,
            rows: schedule
                .rows
                .iter()
                .map(|row| RowResponse {
                    row: row.clone(),
                    color: schedule.color_for(row),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: rouille::Response,
) -> anyhow::Result<T> {
    Ok(serde_json::from_reader(
        response.data.into_reader_and_size().0,
    )?)
}
