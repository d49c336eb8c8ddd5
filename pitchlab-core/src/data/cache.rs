//! Pitch cache: an explicit key-value store for acquired datasets.
//!
//! Layout of the CSV store: `{cache_dir}/{key}.csv` plus a metadata sidecar
//! `{cache_dir}/{key}.meta.json`.
//!
//! Features:
//! - Atomic writes (write to .tmp, rename into place; last writer wins)
//! - Integrity validation on load against the BLAKE3 hash in the sidecar
//! - Quarantine for corrupt files ({key}.csv.quarantined)
//! - Optional maximum age; without one an artifact never expires

use super::provider::{DataError, DataSource};
use crate::domain::{CacheKey, PitchEvent, PitcherQuery};
use chrono::{NaiveDateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

/// Key-value store for pitch datasets.
///
/// The loader only calls `get` and `put`; invalidation policy belongs to the
/// implementation.
pub trait PitchCache: Send + Sync {
    /// Human-readable name of this store.
    fn name(&self) -> &str;

    /// The stored dataset for `key`, or `None` on a miss.
    fn get(&self, key: &CacheKey) -> Result<Option<Vec<PitchEvent>>, DataError>;

    /// Store the dataset for `key`.
    fn put(&self, key: &CacheKey, query: &PitcherQuery, events: &[PitchEvent])
        -> Result<(), DataError>;

    /// Remove the dataset for `key`. Returns whether anything was removed.
    fn purge(&self, key: &CacheKey) -> Result<bool, DataError>;

    /// Every stored entry with whatever metadata is available.
    fn entries(&self) -> Result<Vec<CacheEntry>, DataError>;
}

/// Metadata sidecar for a cached dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMeta {
    pub key: CacheKey,
    pub query: PitcherQuery,
    pub row_count: usize,
    pub data_hash: String,
    pub source: DataSource,
    pub cached_at: NaiveDateTime,
}

/// One stored dataset as reported by [`PitchCache::entries`].
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub meta: Option<CacheMeta>,
    pub size_bytes: u64,
    /// A file set aside after failing validation. Never served; removed by
    /// `purge` along with the live entry for the same key.
    pub quarantined: bool,
}

/// Row shape written to cache files: every PitchEvent column plus the derived
/// `count` label.
#[derive(Serialize)]
struct CacheRow<'a> {
    player_name: &'a str,
    pitcher: Option<u32>,
    game_date: Option<NaiveDate>,
    game_type: &'a str,
    balls: u8,
    strikes: u8,
    count: String,
    pitch_name: &'a str,
    release_speed: Option<f64>,
    pfx_x: Option<f64>,
    pfx_z: Option<f64>,
    plate_x: Option<f64>,
    plate_z: Option<f64>,
    stand: &'a str,
    sz_top: Option<f64>,
    sz_bot: Option<f64>,
}

impl<'a> From<&'a PitchEvent> for CacheRow<'a> {
    fn from(e: &'a PitchEvent) -> Self {
        Self {
            player_name: &e.player_name,
            pitcher: e.pitcher,
            game_date: e.game_date,
            game_type: &e.game_type,
            balls: e.balls,
            strikes: e.strikes,
            count: e.count().to_string(),
            pitch_name: &e.pitch_name,
            release_speed: e.release_speed,
            pfx_x: e.pfx_x,
            pfx_z: e.pfx_z,
            plate_x: e.plate_x,
            plate_z: e.plate_z,
            stand: e.stand.code(),
            sz_top: e.sz_top,
            sz_bot: e.sz_bot,
        }
    }
}

/// Serialize events as CSV text with a header row.
pub fn events_to_csv(events: &[PitchEvent]) -> Result<Vec<u8>, DataError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    if events.is_empty() {
        // serde writes headers lazily, so an empty set needs them spelled out
        wtr.write_record(CACHE_COLUMNS)?;
    }
    for event in events {
        wtr.serialize(CacheRow::from(event))?;
    }
    wtr.into_inner()
        .map_err(|e| DataError::CacheError(format!("flush CSV writer: {e}")))
}

/// Parse CSV text written by [`events_to_csv`]. Any `count` column is ignored.
pub fn events_from_csv(bytes: &[u8]) -> Result<Vec<PitchEvent>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);
    let mut events = Vec::new();
    for row in reader.deserialize::<PitchEvent>() {
        events.push(row?);
    }
    Ok(events)
}

const CACHE_COLUMNS: [&str; 16] = [
    "player_name",
    "pitcher",
    "game_date",
    "game_type",
    "balls",
    "strikes",
    "count",
    "pitch_name",
    "release_speed",
    "pfx_x",
    "pfx_z",
    "plate_x",
    "plate_z",
    "stand",
    "sz_top",
    "sz_bot",
];

// ── CSV store ───────────────────────────────────────────────────────

const QUARANTINE_SUFFIX: &str = ".csv.quarantined";

/// File-backed cache, one CSV per key.
pub struct CsvCache {
    cache_dir: PathBuf,
    verify_checksums: bool,
    max_age: Option<Duration>,
}

impl CsvCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            verify_checksums: true,
            max_age: None,
        }
    }

    /// Compare file contents against the sidecar hash on every load.
    pub fn verify_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }

    /// Treat entries older than `max_age` as misses.
    pub fn max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    /// Root directory of the cache.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the CSV artifact for a key.
    pub fn data_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(format!("{key}.csv"))
    }

    fn meta_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(format!("{key}.meta.json"))
    }

    /// Where a corrupt artifact for `key` is moved.
    pub fn quarantine_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(format!("{key}{QUARANTINE_SUFFIX}"))
    }

    /// Sidecar metadata for a key, if present and readable.
    pub fn get_meta(&self, key: &CacheKey) -> Option<CacheMeta> {
        let content = fs::read_to_string(self.meta_path(key)).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn is_expired(&self, meta: Option<&CacheMeta>) -> bool {
        let (Some(max_age), Some(meta)) = (self.max_age, meta) else {
            return false;
        };
        let Ok(max_age) = chrono::Duration::from_std(max_age) else {
            return false;
        };
        chrono::Local::now().naive_local() - meta.cached_at > max_age
    }

    fn quarantine(&self, key: &CacheKey, reason: &str) {
        let path = self.data_path(key);
        warn!(path = %path.display(), reason, "quarantining corrupt cache file");
        if let Err(e) = fs::rename(&path, self.quarantine_path(key)) {
            warn!(path = %path.display(), error = %e, "failed to quarantine cache file");
        }
    }
}

impl PitchCache for CsvCache {
    fn name(&self) -> &str {
        "csv"
    }

    fn get(&self, key: &CacheKey) -> Result<Option<Vec<PitchEvent>>, DataError> {
        let path = self.data_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let meta = self.get_meta(key);
        if self.is_expired(meta.as_ref()) {
            warn!(%key, "cache entry expired; treating as a miss");
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(|e| DataError::CacheError(format!("read {key}: {e}")))?;

        if self.verify_checksums {
            if let Some(meta) = &meta {
                let actual = blake3::hash(&bytes).to_hex().to_string();
                if actual != meta.data_hash {
                    self.quarantine(key, "checksum mismatch");
                    return Ok(None);
                }
            }
        }

        match events_from_csv(&bytes) {
            Ok(events) => {
                debug!(%key, rows = events.len(), "cache hit");
                Ok(Some(events))
            }
            Err(e) => {
                self.quarantine(key, &e.to_string());
                Ok(None)
            }
        }
    }

    fn put(
        &self,
        key: &CacheKey,
        query: &PitcherQuery,
        events: &[PitchEvent],
    ) -> Result<(), DataError> {
        fs::create_dir_all(&self.cache_dir)
            .map_err(|e| DataError::CacheError(format!("failed to create dir: {e}")))?;

        let bytes = events_to_csv(events)?;
        let path = self.data_path(key);
        let tmp_path = path.with_extension(format!("csv.{}.tmp", std::process::id()));

        fs::write(&tmp_path, &bytes)
            .map_err(|e| DataError::CacheError(format!("write {}: {e}", tmp_path.display())))?;

        // Atomic rename
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DataError::CacheError(format!("atomic rename failed: {e}"))
        })?;

        let meta = CacheMeta {
            key: key.clone(),
            query: query.clone(),
            row_count: events.len(),
            data_hash: blake3::hash(&bytes).to_hex().to_string(),
            source: DataSource::Upstream,
            cached_at: chrono::Local::now().naive_local(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| DataError::CacheError(format!("meta serialization: {e}")))?;
        fs::write(self.meta_path(key), meta_json)
            .map_err(|e| DataError::CacheError(format!("meta write: {e}")))?;

        Ok(())
    }

    fn purge(&self, key: &CacheKey) -> Result<bool, DataError> {
        let mut removed = false;
        for path in [
            self.data_path(key),
            self.meta_path(key),
            self.quarantine_path(key),
        ] {
            match fs::remove_file(&path) {
                Ok(()) => removed = true,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(DataError::CacheError(format!(
                        "remove {}: {e}",
                        path.display()
                    )))
                }
            }
        }
        Ok(removed)
    }

    fn entries(&self) -> Result<Vec<CacheEntry>, DataError> {
        if !self.cache_dir.exists() {
            return Ok(Vec::new());
        }

        let dir = fs::read_dir(&self.cache_dir)
            .map_err(|e| DataError::CacheError(format!("read dir: {e}")))?;

        let mut entries = Vec::new();
        for entry in dir {
            let entry = entry.map_err(|e| DataError::CacheError(format!("dir entry: {e}")))?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let (stem, quarantined) = if let Some(stem) = name.strip_suffix(QUARANTINE_SUFFIX) {
                (stem, true)
            } else if let Some(stem) = name.strip_suffix(".csv") {
                (stem, false)
            } else {
                continue;
            };
            let key = CacheKey::from_stem(stem);
            let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
            entries.push(CacheEntry {
                // the sidecar describes the live file, not the quarantined one
                meta: if quarantined { None } else { self.get_meta(&key) },
                key,
                size_bytes,
                quarantined,
            });
        }
        entries.sort_by(|a, b| a.key.cmp(&b.key).then(a.quarantined.cmp(&b.quarantined)));
        Ok(entries)
    }
}

// ── In-memory store ─────────────────────────────────────────────────

/// Process-local cache; nothing survives a restart.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, Vec<PitchEvent>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Vec<PitchEvent>>> {
        // A poisoned map still holds complete entries.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PitchCache for MemoryCache {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &CacheKey) -> Result<Option<Vec<PitchEvent>>, DataError> {
        Ok(self.lock().get(key).cloned())
    }

    fn put(
        &self,
        key: &CacheKey,
        _query: &PitcherQuery,
        events: &[PitchEvent],
    ) -> Result<(), DataError> {
        self.lock().insert(key.clone(), events.to_vec());
        Ok(())
    }

    fn purge(&self, key: &CacheKey) -> Result<bool, DataError> {
        Ok(self.lock().remove(key).is_some())
    }

    fn entries(&self) -> Result<Vec<CacheEntry>, DataError> {
        let mut entries: Vec<CacheEntry> = self
            .lock()
            .keys()
            .map(|key| CacheEntry {
                key: key.clone(),
                meta: None,
                size_bytes: 0,
                quarantined: false,
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }
}
