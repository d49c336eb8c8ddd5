//! Pitch loading: cache lookup, player resolution, upstream fetch.
//!
//! Resolution order for a query:
//! 1. If the cache holds its key → return the cached rows, no network call
//! 2. Otherwise resolve the player id, fetch, keep regular-season rows,
//!    store under the key and return
//!
//! A cached dataset is never re-validated against upstream.

use super::cache::PitchCache;
use super::provider::{DataError, DataSource, PitchProvider, PlayerRecord};
use crate::domain::{Disambiguator, PitchEvent, PitcherQuery};
use tracing::{debug, info};

/// Result of loading a query, with provenance.
#[derive(Debug, Clone)]
pub struct LoadedPitches {
    pub events: Vec<PitchEvent>,
    pub source: DataSource,
}

/// Ties a provider to a cache.
pub struct PitchLoader<'a> {
    provider: &'a dyn PitchProvider,
    cache: &'a dyn PitchCache,
}

impl<'a> PitchLoader<'a> {
    pub fn new(provider: &'a dyn PitchProvider, cache: &'a dyn PitchCache) -> Self {
        Self { provider, cache }
    }

    /// Load the regular-season pitches for `query`.
    ///
    /// Writes one cache entry on a miss. Upstream errors propagate unchanged;
    /// a player with no pitches in range yields an empty, cached dataset.
    pub fn load(&self, query: &PitcherQuery) -> Result<LoadedPitches, DataError> {
        let key = query.cache_key();

        if let Some(events) = self.cache.get(&key)? {
            info!(%key, rows = events.len(), cache = self.cache.name(), "loading cached data");
            return Ok(LoadedPitches {
                events,
                source: DataSource::Cache,
            });
        }

        let player_id = resolve_player(self.provider, query)?;
        info!(
            %key,
            player_id,
            provider = self.provider.name(),
            "pulling data from provider"
        );

        let mut events = self
            .provider
            .fetch_pitches(player_id, query.start, query.end)?;
        let fetched = events.len();
        events.retain(PitchEvent::is_regular_season);
        debug!(fetched, kept = events.len(), "kept regular-season rows");

        self.cache.put(&key, query, &events)?;

        Ok(LoadedPitches {
            events,
            source: DataSource::Upstream,
        })
    }
}

/// Resolve the query's person to an MLBAM id.
///
/// An explicit id short-circuits the lookup. Otherwise the register match set
/// must contain exactly one person after the optional birth-year filter.
pub fn resolve_player(provider: &dyn PitchProvider, query: &PitcherQuery) -> Result<u32, DataError> {
    if let Some(Disambiguator::MlbamId(id)) = query.disambiguator {
        return Ok(id);
    }

    let candidates = provider.lookup_player(&query.last, &query.first)?;
    let candidates: Vec<PlayerRecord> = match query.disambiguator {
        Some(Disambiguator::BirthYear(year)) => candidates
            .into_iter()
            .filter(|c| c.birth_year == Some(year))
            .collect(),
        _ => candidates,
    };

    match candidates.len() {
        0 => Err(DataError::PlayerNotFound {
            first: query.first.clone(),
            last: query.last.clone(),
        }),
        1 => {
            let id = candidates[0].mlbam_id;
            debug!(mlbam_id = id, "resolved player");
            Ok(id)
        }
        _ => Err(DataError::AmbiguousPlayer {
            first: query.first.clone(),
            last: query.last.clone(),
            candidates,
        }),
    }
}
