//! PitchLab Core: pitch-event acquisition, caching, count filters, aggregation.
//!
//! This crate contains the data-preparation pipeline behind every chart:
//! - Domain types (pitch events, counts, handedness, queries)
//! - Provider trait with a Baseball Savant implementation
//! - Cache store trait with CSV and in-memory implementations
//! - Loader that resolves a query to regular-season pitches, at most one
//!   upstream fetch per cache key
//! - Count-bucket filters and handedness aggregates
//! - Chart data preparation and the pitch color palette
//! - TOML configuration

pub mod aggregate;
pub mod config;
pub mod data;
pub mod domain;
pub mod filter;
pub mod palette;
pub mod prep;
pub mod profile;

pub use aggregate::{aggregate_by_handedness, label_ratio_text, HandednessSplit, PitchTypeAggregate};
pub use config::{AppConfig, ConfigError};
pub use domain::{CacheKey, Count, Disambiguator, Handedness, PitchEvent, PitcherQuery};
pub use filter::{apply_filter, CountBuckets, CountFilter, ALL};
pub use palette::{PitchPalette, Rgb};
pub use profile::PitcherProfile;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed to the web worker pool are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PitchEvent>();
        require_sync::<PitchEvent>();
        require_send::<PitcherProfile>();
        require_sync::<PitcherProfile>();
        require_send::<AppConfig>();
        require_sync::<AppConfig>();
        require_send::<data::CsvCache>();
        require_sync::<data::CsvCache>();
        require_send::<data::MemoryCache>();
        require_sync::<data::MemoryCache>();
        require_send::<data::SavantProvider>();
        require_sync::<data::SavantProvider>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
    }
}
