//! Pitch-type frequencies split by batter handedness.

use crate::domain::{Handedness, PitchEvent};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Pitch-type name → number of pitches, for one partition of events.
///
/// Only pitch types that occur are present; there is no zero-fill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PitchTypeAggregate {
    counts: BTreeMap<String, usize>,
}

impl PitchTypeAggregate {
    /// Count pitch names over `events`.
    pub fn from_events<'e, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'e PitchEvent>,
    {
        let mut counts = BTreeMap::new();
        for event in events {
            *counts.entry(event.pitch_label().to_string()).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, pitch_name: &str) -> Option<usize> {
        self.counts.get(pitch_name).copied()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(name, &n)| (name.as_str(), n))
    }

    /// Entries by descending frequency, ties broken by name.
    pub fn by_frequency(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Entries by descending frequency with their share of the total, in percent.
    pub fn shares(&self) -> Vec<(&str, f64)> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        self.by_frequency()
            .into_iter()
            .map(|(name, n)| (name, n as f64 * 100.0 / total as f64))
            .collect()
    }
}

/// Aggregates for left- and right-handed batters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HandednessSplit {
    pub left: PitchTypeAggregate,
    pub right: PitchTypeAggregate,
}

impl HandednessSplit {
    pub fn get(&self, side: Handedness) -> &PitchTypeAggregate {
        match side {
            Handedness::Left => &self.left,
            Handedness::Right => &self.right,
        }
    }

    /// Every pitch type seen against either side, in name order.
    pub fn pitch_types(&self) -> BTreeSet<&str> {
        self.left
            .iter()
            .chain(self.right.iter())
            .map(|(name, _)| name)
            .collect()
    }

    pub fn total(&self) -> usize {
        self.left.total() + self.right.total()
    }
}

/// Partition `events` by batter side and count pitch types in each half.
pub fn aggregate_by_handedness<'e, I>(events: I) -> HandednessSplit
where
    I: IntoIterator<Item = &'e PitchEvent>,
{
    let (left, right): (Vec<&PitchEvent>, Vec<&PitchEvent>) = events
        .into_iter()
        .partition(|e| e.stand == Handedness::Left);

    HandednessSplit {
        left: PitchTypeAggregate::from_events(left),
        right: PitchTypeAggregate::from_events(right),
    }
}

/// Slice label for a pie wedge: `"12.3%"` above `threshold`, empty otherwise.
pub fn label_ratio_text(percentage: f64, threshold: f64) -> String {
    if percentage > threshold {
        format!("{percentage:.1}%")
    } else {
        String::new()
    }
}
