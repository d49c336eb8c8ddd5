//! Domain types: pitch events, counts, handedness, queries.

pub mod pitch;
pub mod query;

pub use pitch::{Count, Handedness, PitchEvent, REGULAR_SEASON};
pub use query::{CacheKey, Disambiguator, PitcherQuery};
