//! A loaded pitcher dataset with an optional active count filter.

use crate::aggregate::{aggregate_by_handedness, HandednessSplit};
use crate::data::{DataError, LoadedPitches, PitchLoader};
use crate::domain::{PitchEvent, PitcherQuery};
use crate::filter::{CountBuckets, ALL};
use tracing::debug;

/// Events for one query plus the filter the caller last applied.
#[derive(Debug, Clone)]
pub struct PitcherProfile {
    query: PitcherQuery,
    events: Vec<PitchEvent>,
    active_filter: Option<String>,
    /// Indices into `events` selected by `active_filter`.
    filtered: Option<Vec<usize>>,
}

impl PitcherProfile {
    pub fn new(query: PitcherQuery, events: Vec<PitchEvent>) -> Self {
        Self {
            query,
            events,
            active_filter: None,
            filtered: None,
        }
    }

    /// Load `query` through `loader` and wrap the result.
    pub fn load(loader: &PitchLoader<'_>, query: PitcherQuery) -> Result<Self, DataError> {
        let LoadedPitches { events, .. } = loader.load(&query)?;
        Ok(Self::new(query, events))
    }

    pub fn query(&self) -> &PitcherQuery {
        &self.query
    }

    pub fn display_name(&self) -> String {
        self.query.display_name()
    }

    /// Every loaded event, ignoring any filter.
    pub fn all_events(&self) -> &[PitchEvent] {
        &self.events
    }

    /// Apply a named bucket or explicit count. `"All"` clears the filter.
    pub fn apply_count_filter(&mut self, name: &str, buckets: &CountBuckets) -> &mut Self {
        if name == ALL {
            self.active_filter = None;
            self.filtered = None;
            return self;
        }

        let filter = buckets.resolve(name);
        let selected: Vec<usize> = self
            .events
            .iter()
            .enumerate()
            .filter(|(_, e)| filter.matches(e.count()))
            .map(|(i, _)| i)
            .collect();
        debug!(filter = name, kept = selected.len(), of = self.events.len(), "applied count filter");

        self.active_filter = Some(name.to_string());
        self.filtered = Some(selected);
        self
    }

    pub fn active_filter(&self) -> Option<&str> {
        self.active_filter.as_deref()
    }

    /// The active filter name, or `"All"`.
    pub fn active_label(&self) -> &str {
        self.active_filter().unwrap_or(ALL)
    }

    /// The filtered view when `use_filter` is set and a filter is active,
    /// otherwise every event.
    pub fn events(&self, use_filter: bool) -> Vec<&PitchEvent> {
        match (&self.filtered, use_filter) {
            (Some(indices), true) => indices.iter().map(|&i| &self.events[i]).collect(),
            _ => self.events.iter().collect(),
        }
    }

    pub fn pitch_split(&self, use_filter: bool) -> HandednessSplit {
        aggregate_by_handedness(self.events(use_filter))
    }
}
