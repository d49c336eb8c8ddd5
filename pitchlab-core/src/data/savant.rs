//! Baseball Savant pitch provider.
//!
//! Player ids come from the Chadwick Bureau register (sixteen CSV shards keyed
//! by the first hex digit of the person key). Pitch rows come from the Statcast
//! search CSV endpoint. Both are plain blocking HTTP GETs; failures are
//! reported once and never retried.

use super::provider::{DataError, PitchProvider, PlayerRecord};
use crate::domain::PitchEvent;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

const REGISTER_BASE: &str = "https://raw.githubusercontent.com/chadwickbureau/register/master/data";
const STATCAST_SEARCH: &str = "https://baseballsavant.mlb.com/statcast_search/csv";
const REGISTER_SHARDS: &str = "0123456789abcdef";

/// Register row, restricted to the columns we read.
#[derive(Debug, Deserialize)]
struct RegisterRow {
    #[serde(default)]
    key_mlbam: Option<u32>,
    #[serde(default)]
    name_last: String,
    #[serde(default)]
    name_first: String,
    #[serde(default)]
    birth_year: Option<i32>,
    #[serde(default)]
    mlb_played_first: Option<i32>,
    #[serde(default)]
    mlb_played_last: Option<i32>,
}

/// Baseball Savant / Chadwick register provider.
pub struct SavantProvider {
    client: reqwest::blocking::Client,
    register_base: String,
    search_url: String,
}

impl SavantProvider {
    pub fn new(timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pitchlab/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            register_base: REGISTER_BASE.to_string(),
            search_url: STATCAST_SEARCH.to_string(),
        })
    }

    /// Point the provider at different hosts (mirrors, local test servers).
    pub fn with_endpoints(mut self, register_base: &str, search_url: &str) -> Self {
        self.register_base = register_base.trim_end_matches('/').to_string();
        self.search_url = search_url.to_string();
        self
    }

    /// Build the Statcast search URL for one pitcher and date range.
    fn search_url(&self, player_id: u32, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{base}?all=true&type=details&player_type=pitcher\
             &pitchers_lookup%5B%5D={player_id}\
             &game_date_gt={start}&game_date_lt={end}\
             &min_pitches=0&min_results=0&group_by=name&sort_col=pitches\
             &sort_order=desc&min_abs=0",
            base = self.search_url,
            start = start.format("%Y-%m-%d"),
            end = end.format("%Y-%m-%d"),
        )
    }

    fn get_text(&self, url: &str) -> Result<String, DataError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        resp.text()
            .map_err(|e| DataError::ResponseFormatChanged(format!("unreadable body from {url}: {e}")))
    }
}

impl PitchProvider for SavantProvider {
    fn name(&self) -> &str {
        "baseball_savant"
    }

    fn lookup_player(&self, last: &str, first: &str) -> Result<Vec<PlayerRecord>, DataError> {
        let mut matches = Vec::new();
        for shard in REGISTER_SHARDS.chars() {
            let url = format!("{}/people-{shard}.csv", self.register_base);
            debug!(%url, "scanning register shard");
            let body = self.get_text(&url)?;
            matches.extend(parse_register(&body, last, first)?);
        }
        info!(last, first, matches = matches.len(), "register lookup complete");
        Ok(matches)
    }

    fn fetch_pitches(
        &self,
        player_id: u32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PitchEvent>, DataError> {
        let url = self.search_url(player_id, start, end);
        info!(player_id, %start, %end, "fetching pitches from Baseball Savant");
        let body = self.get_text(&url)?;
        parse_statcast_csv(&body)
    }
}

/// Parse a Statcast search CSV body into pitch events.
///
/// Savant prefixes the header with a UTF-8 BOM and answers an empty search
/// with an empty body; both are handled. Extra columns are ignored.
pub fn parse_statcast_csv(body: &str) -> Result<Vec<PitchEvent>, DataError> {
    let body = body.trim_start_matches('\u{feff}');
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body.as_bytes());

    let headers = dedup_headers(reader.headers()?);
    for required in ["balls", "strikes", "stand"] {
        if !headers.iter().any(|h| h == required) {
            return Err(DataError::ResponseFormatChanged(format!(
                "statcast CSV is missing column '{required}'"
            )));
        }
    }
    reader.set_headers(headers);

    let mut events = Vec::new();
    for row in reader.deserialize::<PitchEvent>() {
        events.push(row?);
    }
    Ok(events)
}

/// Rename repeated column names to `name.1`, `name.2`, ... so the first
/// occurrence keeps the plain name.
///
/// The detail export lists `pitcher` and `fielder_2` twice: once for the
/// pitch and again in the fielder block.
fn dedup_headers(headers: &csv::StringRecord) -> csv::StringRecord {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    headers
        .iter()
        .map(|name| {
            let n = seen.entry(name).or_insert(0);
            let out = if *n == 0 {
                name.to_string()
            } else {
                format!("{name}.{n}")
            };
            *n += 1;
            out
        })
        .collect()
}

/// Rows of one register shard matching `last`/`first`, ignoring case and
/// surrounding whitespace. Rows without an MLBAM id are skipped.
pub fn parse_register(body: &str, last: &str, first: &str) -> Result<Vec<PlayerRecord>, DataError> {
    let last = last.trim().to_lowercase();
    let first = first.trim().to_lowercase();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut matches = Vec::new();
    for row in reader.deserialize::<RegisterRow>() {
        let row = row?;
        if row.name_last.trim().to_lowercase() != last
            || row.name_first.trim().to_lowercase() != first
        {
            continue;
        }
        let Some(mlbam_id) = row.key_mlbam else {
            continue;
        };
        matches.push(PlayerRecord {
            mlbam_id,
            name_last: row.name_last,
            name_first: row.name_first,
            birth_year: row.birth_year,
            mlb_played_first: row.mlb_played_first,
            mlb_played_last: row.mlb_played_last,
        });
    }
    Ok(matches)
}
