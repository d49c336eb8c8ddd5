//! Count filters.
//!
//! A filter name is one of:
//! - `"All"`: every event
//! - a bucket name from the [`CountBuckets`] table: events whose count is in
//!   that bucket's literal set
//! - anything else: an explicit count label such as `"2-1"`, matched exactly
//!
//! Which counts count as "ahead" or "behind" is a table entry, not arithmetic
//! on balls and strikes. The table comes from configuration.

use crate::domain::{Count, PitchEvent};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Name of the pass-through filter.
pub const ALL: &str = "All";

/// Named situational buckets, each a fixed set of counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountBuckets {
    buckets: BTreeMap<String, BTreeSet<Count>>,
}

impl Default for CountBuckets {
    /// Behind = {1-0, 2-0, 3-1, 3-0, 2-1}, Ahead = {1-2, 0-2, 0-1},
    /// Even = {0-0, 1-1, 2-2}.
    fn default() -> Self {
        let bucket = |counts: &[(u8, u8)]| -> BTreeSet<Count> {
            counts.iter().map(|&(b, s)| Count::new(b, s)).collect()
        };
        let mut buckets = BTreeMap::new();
        buckets.insert(
            "Behind".to_string(),
            bucket(&[(1, 0), (2, 0), (3, 1), (3, 0), (2, 1)]),
        );
        buckets.insert("Ahead".to_string(), bucket(&[(1, 2), (0, 2), (0, 1)]));
        buckets.insert("Even".to_string(), bucket(&[(0, 0), (1, 1), (2, 2)]));
        Self { buckets }
    }
}

impl CountBuckets {
    pub fn new(buckets: BTreeMap<String, BTreeSet<Count>>) -> Self {
        Self { buckets }
    }

    /// Build a table from `(name, labels)` pairs.
    pub fn from_labels<'a, I>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (&'a str, &'a [&'a str])>,
    {
        let mut buckets = BTreeMap::new();
        for (name, labels) in pairs {
            let counts = labels
                .iter()
                .map(|l| l.parse::<Count>())
                .collect::<Result<BTreeSet<_>, _>>()?;
            buckets.insert(name.to_string(), counts);
        }
        Ok(Self { buckets })
    }

    pub fn get(&self, name: &str) -> Option<&BTreeSet<Count>> {
        self.buckets.get(name)
    }

    /// Bucket names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Interpret a filter name against this table.
    pub fn resolve(&self, name: &str) -> CountFilter<'_> {
        if name == ALL {
            CountFilter::All
        } else if let Some(counts) = self.buckets.get(name) {
            CountFilter::Bucket(counts)
        } else {
            // Exact label only: "02-1" or " 2-1" must not match 2-1.
            let count = name
                .parse::<Count>()
                .ok()
                .filter(|c| c.to_string() == name);
            CountFilter::Explicit(count)
        }
    }

    /// Filter `events` by the named bucket or explicit count.
    pub fn apply<'e, I>(&self, events: I, name: &str) -> Vec<&'e PitchEvent>
    where
        I: IntoIterator<Item = &'e PitchEvent>,
    {
        apply_filter(events, &self.resolve(name))
    }
}

/// A resolved count filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountFilter<'a> {
    All,
    Bucket(&'a BTreeSet<Count>),
    /// `None` when the label is not a canonical `balls-strikes` count;
    /// matches nothing.
    Explicit(Option<Count>),
}

impl CountFilter<'_> {
    pub fn matches(&self, count: Count) -> bool {
        match self {
            CountFilter::All => true,
            CountFilter::Bucket(counts) => counts.contains(&count),
            CountFilter::Explicit(target) => *target == Some(count),
        }
    }
}

/// The events that pass `filter`, as references into the input.
pub fn apply_filter<'e, I>(events: I, filter: &CountFilter<'_>) -> Vec<&'e PitchEvent>
where
    I: IntoIterator<Item = &'e PitchEvent>,
{
    events
        .into_iter()
        .filter(|e| filter.matches(e.count()))
        .collect()
}
