//! Integration tests for the acquisition pipeline using a fake provider and
//! the frozen Statcast fixture.

use chrono::NaiveDate;
use pitchlab_core::data::savant::parse_statcast_csv;
use pitchlab_core::data::{
    CsvCache, DataError, DataSource, MemoryCache, PitchCache, PitchLoader, PitchProvider,
    PlayerRecord,
};
use pitchlab_core::{Disambiguator, Handedness, PitchEvent, PitcherQuery, PitcherProfile};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

fn fixture_events() -> Vec<PitchEvent> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/statcast_sample.csv");
    let body = std::fs::read_to_string(path).unwrap();
    parse_statcast_csv(&body).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn skenes() -> PitcherQuery {
    PitcherQuery::new("Paul", "Skenes", date(2025, 3, 20), date(2025, 9, 30))
}

fn person(id: u32, first: &str, last: &str, born: i32) -> PlayerRecord {
    PlayerRecord {
        mlbam_id: id,
        name_last: last.into(),
        name_first: first.into(),
        birth_year: Some(born),
        mlb_played_first: Some(2020),
        mlb_played_last: Some(2025),
    }
}

/// Provider backed by fixed data that counts its calls.
struct FakeProvider {
    register: Vec<PlayerRecord>,
    pitches: Vec<PitchEvent>,
    fail_fetch: bool,
    lookups: AtomicUsize,
    fetches: AtomicUsize,
}

impl FakeProvider {
    fn new(register: Vec<PlayerRecord>, pitches: Vec<PitchEvent>) -> Self {
        Self {
            register,
            pitches,
            fail_fetch: false,
            lookups: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    fn skenes() -> Self {
        Self::new(vec![person(694973, "Paul", "Skenes", 2002)], fixture_events())
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl PitchProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn lookup_player(&self, last: &str, first: &str) -> Result<Vec<PlayerRecord>, DataError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .register
            .iter()
            .filter(|p| {
                p.name_last.eq_ignore_ascii_case(last) && p.name_first.eq_ignore_ascii_case(first)
            })
            .cloned()
            .collect())
    }

    fn fetch_pitches(
        &self,
        player_id: u32,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<PitchEvent>, DataError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch {
            return Err(DataError::NetworkUnreachable("connection refused".into()));
        }
        Ok(self
            .pitches
            .iter()
            .filter(|p| p.pitcher == Some(player_id))
            .cloned()
            .collect())
    }
}

// ── Caching ─────────────────────────────────────────────────────────

#[test]
fn second_load_hits_cache_without_fetching() {
    let provider = FakeProvider::skenes();
    let cache = MemoryCache::new();
    let loader = PitchLoader::new(&provider, &cache);

    let first = loader.load(&skenes()).unwrap();
    let second = loader.load(&skenes()).unwrap();

    assert_eq!(provider.fetches(), 1);
    assert_eq!(provider.lookups(), 1);
    assert_eq!(first.source, DataSource::Upstream);
    assert_eq!(second.source, DataSource::Cache);
    assert_eq!(first.events, second.events);
}

#[test]
fn csv_cache_survives_a_new_loader() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::skenes();

    let first = {
        let cache = CsvCache::new(dir.path());
        PitchLoader::new(&provider, &cache).load(&skenes()).unwrap()
    };

    let cache = CsvCache::new(dir.path());
    let second = PitchLoader::new(&provider, &cache).load(&skenes()).unwrap();

    assert_eq!(provider.fetches(), 1);
    assert_eq!(second.source, DataSource::Cache);
    assert_eq!(first.events, second.events);
    assert_eq!(cache.entries().unwrap().len(), 1);
}

#[test]
fn distinct_date_ranges_are_distinct_keys() {
    let provider = FakeProvider::skenes();
    let cache = MemoryCache::new();
    let loader = PitchLoader::new(&provider, &cache);

    loader.load(&skenes()).unwrap();
    let april = PitcherQuery::new("Paul", "Skenes", date(2025, 4, 1), date(2025, 4, 30));
    loader.load(&april).unwrap();

    assert_eq!(provider.fetches(), 2);
    assert_eq!(cache.len(), 2);
}

// ── Ingestion ───────────────────────────────────────────────────────

#[test]
fn fixture_with_fielder_block_parses() {
    // The export repeats `pitcher` and `fielder_2` after `game_pk`.
    let events = fixture_events();
    assert_eq!(events.len(), 11);
    assert!(events.iter().all(|e| e.pitcher == Some(694973)));
    assert_eq!(events[0].pitch_name, "4-Seam Fastball");
    assert_eq!(events[0].stand, Handedness::Left);
}

#[test]
fn only_regular_season_rows_are_kept() {
    let provider = FakeProvider::skenes();
    let cache = MemoryCache::new();
    let loaded = PitchLoader::new(&provider, &cache).load(&skenes()).unwrap();

    assert_eq!(fixture_events().len(), 11);
    assert_eq!(loaded.events.len(), 9);
    assert!(loaded.events.iter().all(|e| e.game_type == "R"));
}

#[test]
fn count_labels_match_balls_and_strikes() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::skenes();
    let cache = CsvCache::new(dir.path());
    let loader = PitchLoader::new(&provider, &cache);
    loader.load(&skenes()).unwrap();

    let cached = loader.load(&skenes()).unwrap();
    for event in &cached.events {
        assert_eq!(
            event.count().to_string(),
            format!("{}-{}", event.balls, event.strikes)
        );
    }
}

#[test]
fn player_without_pitches_is_empty_not_error() {
    let provider = FakeProvider::new(vec![person(1, "Position", "Player", 1990)], Vec::new());
    let cache = MemoryCache::new();
    let loader = PitchLoader::new(&provider, &cache);
    let query = PitcherQuery::new("Position", "Player", date(2025, 3, 20), date(2025, 9, 30));

    let loaded = loader.load(&query).unwrap();
    assert!(loaded.events.is_empty());
    // the empty result is cached like any other
    loader.load(&query).unwrap();
    assert_eq!(provider.fetches(), 1);
}

// ── Failures ────────────────────────────────────────────────────────

#[test]
fn unknown_player_is_player_not_found() {
    let provider = FakeProvider::skenes();
    let cache = MemoryCache::new();
    let query = PitcherQuery::new("Nobody", "Atall", date(2025, 3, 20), date(2025, 9, 30));

    let err = PitchLoader::new(&provider, &cache).load(&query).unwrap_err();
    assert!(matches!(err, DataError::PlayerNotFound { .. }));
    assert_eq!(provider.fetches(), 0);
    assert!(cache.is_empty());
}

#[test]
fn upstream_failure_propagates_and_writes_nothing() {
    let mut provider = FakeProvider::skenes();
    provider.fail_fetch = true;
    let dir = tempfile::tempdir().unwrap();
    let cache = CsvCache::new(dir.path());

    let err = PitchLoader::new(&provider, &cache).load(&skenes()).unwrap_err();
    assert!(matches!(err, DataError::NetworkUnreachable(_)));
    assert!(cache.entries().unwrap().is_empty());
}

// ── Disambiguation ──────────────────────────────────────────────────

fn two_will_smiths() -> FakeProvider {
    let mut pitches = fixture_events();
    for p in &mut pitches {
        p.pitcher = Some(519293);
        p.player_name = "Smith, Will".into();
    }
    FakeProvider::new(
        vec![
            person(519293, "Will", "Smith", 1989),
            person(669257, "Will", "Smith", 1995),
        ],
        pitches,
    )
}

#[test]
fn ambiguous_name_without_disambiguator_fails() {
    let provider = two_will_smiths();
    let cache = MemoryCache::new();
    let query = PitcherQuery::new("Will", "Smith", date(2025, 3, 20), date(2025, 9, 30));

    match PitchLoader::new(&provider, &cache).load(&query) {
        Err(DataError::AmbiguousPlayer { candidates, .. }) => assert_eq!(candidates.len(), 2),
        other => panic!("expected AmbiguousPlayer, got {other:?}"),
    }
    assert_eq!(provider.fetches(), 0);
}

#[test]
fn birth_year_picks_one_candidate() {
    let provider = two_will_smiths();
    let cache = MemoryCache::new();
    let query = PitcherQuery::new("Will", "Smith", date(2025, 3, 20), date(2025, 9, 30))
        .with_disambiguator(Disambiguator::BirthYear(1989));

    let loaded = PitchLoader::new(&provider, &cache).load(&query).unwrap();
    assert_eq!(loaded.events.len(), 9);
}

#[test]
fn birth_year_matching_nobody_is_not_found() {
    let provider = two_will_smiths();
    let cache = MemoryCache::new();
    let query = PitcherQuery::new("Will", "Smith", date(2025, 3, 20), date(2025, 9, 30))
        .with_disambiguator(Disambiguator::BirthYear(2001));

    let err = PitchLoader::new(&provider, &cache).load(&query).unwrap_err();
    assert!(matches!(err, DataError::PlayerNotFound { .. }));
}

#[test]
fn mlbam_id_skips_lookup() {
    let provider = two_will_smiths();
    let cache = MemoryCache::new();
    let query = PitcherQuery::new("Will", "Smith", date(2025, 3, 20), date(2025, 9, 30))
        .with_disambiguator(Disambiguator::MlbamId(519293));

    PitchLoader::new(&provider, &cache).load(&query).unwrap();
    assert_eq!(provider.lookups(), 0);
    assert_eq!(provider.fetches(), 1);
}

// ── Profile ─────────────────────────────────────────────────────────

#[test]
fn profile_over_fixture_splits_by_side() {
    let provider = FakeProvider::skenes();
    let cache = MemoryCache::new();
    let loader = PitchLoader::new(&provider, &cache);
    let profile = PitcherProfile::load(&loader, skenes()).unwrap();

    let split = profile.pitch_split(false);
    assert_eq!(split.left.total(), 3);
    assert_eq!(split.right.total(), 6);
    assert_eq!(split.right.get("Unknown"), Some(1));
    assert_eq!(
        profile
            .all_events()
            .iter()
            .filter(|e| e.stand == Handedness::Left)
            .count(),
        3
    );
}
