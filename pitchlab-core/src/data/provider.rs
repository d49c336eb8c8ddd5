//! Pitch provider trait and structured error types.
//!
//! The PitchProvider trait abstracts over the upstream source so the loader
//! can be exercised against a fake in tests. Providers know nothing about the
//! cache.

use crate::domain::PitchEvent;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One person from the player register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub mlbam_id: u32,
    pub name_last: String,
    pub name_first: String,
    pub birth_year: Option<i32>,
    pub mlb_played_first: Option<i32>,
    pub mlb_played_last: Option<i32>,
}

impl PlayerRecord {
    /// Short description used when listing ambiguous candidates.
    pub fn describe(&self) -> String {
        let born = self
            .birth_year
            .map(|y| format!("born {y}"))
            .unwrap_or_else(|| "birth year unknown".into());
        let span = match (self.mlb_played_first, self.mlb_played_last) {
            (Some(a), Some(b)) => format!(", MLB {a}-{b}"),
            (Some(a), None) => format!(", MLB {a}-"),
            _ => String::new(),
        };
        format!(
            "{} {} (mlbam {}, {born}{span})",
            self.name_first, self.name_last, self.mlbam_id
        )
    }
}

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no player found named '{first} {last}'")]
    PlayerNotFound { first: String, last: String },

    #[error(
        "'{first} {last}' matches {} players; pass an MLBAM id or birth year: {}",
        .candidates.len(),
        describe_all(.candidates)
    )]
    AmbiguousPlayer {
        first: String,
        last: String,
        candidates: Vec<PlayerRecord>,
    },

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("upstream returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("cache error: {0}")]
    CacheError(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

fn describe_all(candidates: &[PlayerRecord]) -> String {
    candidates
        .iter()
        .map(PlayerRecord::describe)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Where a loaded dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    Cache,
    Upstream,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Cache => write!(f, "cache"),
            DataSource::Upstream => write!(f, "upstream"),
        }
    }
}

/// Trait for upstream pitch-tracking sources.
pub trait PitchProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// All register entries whose last and first names match, case-insensitively.
    ///
    /// Entries without an MLBAM id are never returned.
    fn lookup_player(&self, last: &str, first: &str) -> Result<Vec<PlayerRecord>, DataError>;

    /// Every pitch thrown by `player_id` between `start` and `end` inclusive,
    /// across all game types.
    fn fetch_pitches(
        &self,
        player_id: u32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PitchEvent>, DataError>;
}
