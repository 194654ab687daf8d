use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::Deserialize;

use crate::{
    schedule::{
        error::TimingError, operations::DEFAULT_CACHE_CAPACITY, request::parse_time,
        timing::MAX_CROSSFADE_SECS,
    },
    source::retry::RetryPolicy,
};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    pub source: SourceConfig,
    #[serde(default)]
    pub schedule: ScheduleDefaults,
    #[serde(default)]
    pub fetch: FetchConfig,
    pub http: Option<HttpConfig>,
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path}"))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Config> {
        let cfg: Config = toml::from_str(contents).with_context(|| "Failed to parse config TOML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version != 1 {
            anyhow::bail!("Unsupported config version {}", self.version);
        }
        self.schedule
            .start_time()
            .with_context(|| "Invalid schedule.start_time")?;
        if self.schedule.crossfade_secs > MAX_CROSSFADE_SECS {
            anyhow::bail!(
                "schedule.crossfade_secs must be within 0..={MAX_CROSSFADE_SECS}, got {}",
                self.schedule.crossfade_secs
            );
        }
        if self.fetch.max_attempts == 0 {
            anyhow::bail!("fetch.max_attempts must be >= 1");
        }
        if self.http.as_ref().is_some_and(|http| http.cache_capacity == 0) {
            anyhow::bail!("http.cache_capacity must be >= 1");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    /// directory holding `<playlist id>.json` pages
    pub library_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub bind_addr: String,
    pub port: u16,
    /// schedules kept in memory; the oldest one is dropped first
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

/// Timing used when a request leaves a parameter out
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScheduleDefaults {
    /// unknown zone names are rejected while parsing the config
    pub timezone: Tz,
    /// "HH:MM"
    pub start_time: String,
    pub crossfade_secs: u32,
}

impl Default for ScheduleDefaults {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            start_time: "20:30".to_string(),
            crossfade_secs: 6,
        }
    }
}

impl ScheduleDefaults {
    pub fn start_time(&self) -> Result<NaiveTime, TimingError> {
        parse_time(&self.start_time)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FetchConfig {
    pub max_attempts: u32,
    pub min_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            min_backoff_ms: policy.min_backoff.as_millis() as u64,
            max_backoff_ms: policy.max_backoff.as_millis() as u64,
        }
    }
}

impl FetchConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            min_backoff: Duration::from_millis(self.min_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }
}
