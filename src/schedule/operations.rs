use std::{
    collections::{HashMap, VecDeque},
    sync::{Mutex, MutexGuard, PoisonError},
};

use log::{debug, info};
use serde::Serialize;

use crate::{
    domain::{
        playlist_id::PlaylistId,
        track::{PlaylistStats, TrackRow},
    },
    schedule::{
        assemble::assemble_rows, color::duration_color, error::ScheduleError,
        timing::TimingParameters,
    },
    source::TrackSource,
};

/// Rows of a scheduled playlist together with their stats
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistSchedule {
    pub rows: Vec<TrackRow>,
    pub stats: PlaylistStats,
}

impl PlaylistSchedule {
    /// Background color for the row's duration, scaled over the whole playlist
    pub fn color_for(&self, row: &TrackRow) -> String {
        duration_color(
            row.duration_ms,
            self.stats.min_duration_ms,
            self.stats.max_duration_ms,
        )
    }
}

pub type CacheKey = (PlaylistId, TimingParameters);

pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Memoized schedules, owned by whoever drives the computation.
///
/// Holds at most `capacity` schedules; inserting past that drops the oldest entry.
#[derive(Debug)]
pub struct ScheduleCache {
    entries: HashMap<CacheKey, PlaylistSchedule>,
    /// insertion order, oldest first
    order: VecDeque<CacheKey>,
    capacity: usize,
}

impl Default for ScheduleCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl ScheduleCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(
        &self,
        playlist: &PlaylistId,
        params: &TimingParameters,
    ) -> Option<&PlaylistSchedule> {
        self.entries.get(&(playlist.clone(), *params))
    }

    pub fn insert(
        &mut self,
        playlist: PlaylistId,
        params: TimingParameters,
        schedule: PlaylistSchedule,
    ) {
        let key = (playlist, params);
        if self.entries.insert(key.clone(), schedule).is_none() {
            self.order.push_back(key);
        }

        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            debug!("evicted schedule for {} from cache", oldest.0);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fetches the playlist and schedules it, bypassing any cache.
pub fn build_schedule<S: TrackSource>(
    source: &S,
    playlist: &PlaylistId,
    params: &TimingParameters,
) -> Result<PlaylistSchedule, ScheduleError> {
    let tracks = source.fetch_tracks(playlist)?;
    let (rows, stats) = assemble_rows(&tracks, params)?;
    info!(
        "scheduled playlist {playlist}: {} tracks, anchor {} {}",
        stats.total_tracks,
        params.anchor,
        params.timezone.name()
    );

    Ok(PlaylistSchedule { rows, stats })
}

/// Returns the memoized schedule, or builds and memoizes it.
///
/// The cache is only locked for the lookup and the insert, never while the
/// source is fetching. Two concurrent misses on the same key both build it.
/// Any failure aborts the whole call and leaves the cache untouched.
pub fn load_schedule<S: TrackSource>(
    source: &S,
    cache: &Mutex<ScheduleCache>,
    playlist: &PlaylistId,
    params: &TimingParameters,
) -> Result<PlaylistSchedule, ScheduleError> {
    let cached = lock(cache).get(playlist, params).cloned();
    if let Some(schedule) = cached {
        debug!("schedule for {playlist} served from cache");
        return Ok(schedule);
    }

    let schedule = build_schedule(source, playlist, params)?;

    let mut cache = lock(cache);
    cache.insert(playlist.clone(), *params, schedule.clone());
    debug!("{} schedule(s) cached", cache.len());
    Ok(schedule)
}

/// Entries are only ever written whole, so a poisoned cache is still consistent.
fn lock(cache: &Mutex<ScheduleCache>) -> MutexGuard<'_, ScheduleCache> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}
