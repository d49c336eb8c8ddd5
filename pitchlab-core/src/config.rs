//! Application configuration, read from TOML.
//!
//! Every section has defaults, so an absent file or an empty document yields
//! a working configuration.

use crate::data::{CsvCache, DataError, SavantProvider};
use crate::domain::PitcherQuery;
use crate::filter::CountBuckets;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub season: SeasonConfig,
    pub default_pitcher: DefaultPitcher,
    pub charts: ChartConfig,
    pub count_buckets: CountBuckets,
}

impl AppConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.season.start > self.season.end {
            return Err(ConfigError::Invalid(format!(
                "season start {} is after end {}",
                self.season.start, self.season.end
            )));
        }
        if !self.charts.label_threshold.is_finite() || self.charts.label_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "charts.label_threshold must be a non-negative number, got {}",
                self.charts.label_threshold
            )));
        }
        Ok(())
    }

    /// The cache described by the `[data]` section.
    pub fn cache(&self) -> CsvCache {
        CsvCache::new(&self.data.cache_dir)
            .verify_checksums(self.data.verify_checksums)
            .max_age(self.data.max_age())
    }

    /// The upstream provider described by the `[data]` section.
    pub fn provider(&self) -> Result<SavantProvider, DataError> {
        SavantProvider::new(Duration::from_secs(self.data.http_timeout_secs))
    }

    /// A query for `first last` over the configured season.
    pub fn season_query(&self, first: &str, last: &str) -> PitcherQuery {
        PitcherQuery::new(first.trim(), last.trim(), self.season.start, self.season.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub cache_dir: PathBuf,
    pub verify_checksums: bool,
    /// Entries older than this are refetched. `None` keeps entries forever.
    pub max_age_days: Option<u64>,
    pub http_timeout_secs: u64,
}

impl DataConfig {
    /// `max_age_days` as a duration. Saturates instead of overflowing.
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age_days
            .map(|days| Duration::from_secs(days.saturating_mul(24 * 60 * 60)))
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("data"),
            verify_checksums: true,
            max_age_days: None,
            http_timeout_secs: 60,
        }
    }
}

/// Default date range for queries that do not name one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2025, 9, 30).unwrap_or_default(),
        }
    }
}

/// Pitcher shown before any form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultPitcher {
    pub first: String,
    pub last: String,
}

impl Default for DefaultPitcher {
    fn default() -> Self {
        Self {
            first: "Shohei".into(),
            last: "Ohtani".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub output_dir: PathBuf,
    /// Pie slices at or below this percentage get no label.
    pub label_threshold: f64,
    pub sample_size: usize,
    pub sample_seed: u64,
    pub font_family: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("static/images"),
            label_threshold: 3.0,
            sample_size: 100,
            sample_seed: 42,
            font_family: "sans-serif".into(),
        }
    }
}
