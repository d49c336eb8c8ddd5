//! Data acquisition and caching

pub mod cache;
pub mod loader;
pub mod provider;
pub mod savant;

pub use cache::{CacheEntry, CacheMeta, CsvCache, MemoryCache, PitchCache};
pub use loader::{resolve_player, LoadedPitches, PitchLoader};
pub use provider::{DataError, DataSource, PitchProvider, PlayerRecord};
pub use savant::SavantProvider;
