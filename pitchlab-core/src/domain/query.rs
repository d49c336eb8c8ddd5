//! Pitcher queries and the cache keys derived from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Extra information that picks one player when several share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Disambiguator {
    /// Provider-native player id; skips the name lookup entirely.
    MlbamId(u32),
    /// Birth year, used to filter name matches.
    BirthYear(i32),
}

impl fmt::Display for Disambiguator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disambiguator::MlbamId(id) => write!(f, "mlbam{id}"),
            Disambiguator::BirthYear(year) => write!(f, "born{year}"),
        }
    }
}

/// Identifies one pitcher dataset: a person and an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitcherQuery {
    pub first: String,
    pub last: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disambiguator: Option<Disambiguator>,
}

impl PitcherQuery {
    pub fn new(
        first: impl Into<String>,
        last: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
            start,
            end,
            disambiguator: None,
        }
    }

    pub fn with_disambiguator(mut self, disambiguator: Disambiguator) -> Self {
        self.disambiguator = Some(disambiguator);
        self
    }

    /// "First Last", for chart titles.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::for_query(self)
    }
}

/// Deterministic storage identity of a query.
///
/// Built from `{last}_{first}_{start}_{end}`, with the disambiguator appended
/// when the query carries one. Name characters other than alphanumerics, `-`
/// and `.` are percent-encoded (`O'Day` becomes `O%27Day`), so distinct names
/// never share a key and `_` only ever separates fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_query(query: &PitcherQuery) -> Self {
        let mut key = format!(
            "{}_{}_{}_{}",
            sanitize(&query.last),
            sanitize(&query.first),
            query.start.format("%Y-%m-%d"),
            query.end.format("%Y-%m-%d"),
        );
        if let Some(d) = query.disambiguator {
            key.push('_');
            key.push_str(&d.to_string());
        }
        Self(key)
    }

    /// Rebuild a key from a stored file stem.
    pub fn from_stem(stem: impl Into<String>) -> Self {
        Self(stem.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn sanitize(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    for c in part.trim().chars() {
        if c.is_alphanumeric() || c == '-' || c == '.' {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    out
}
