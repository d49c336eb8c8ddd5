//! PitchLab CLI: fetch, summary, chart, and cache management commands.
//!
//! Commands:
//! - `fetch`: load a pitcher's regular-season pitches into the cache
//! - `summary`: pitch mix vs left- and right-handed batters
//! - `chart`: render one chart kind, or all four, to PNG
//! - `cache status`: list cached datasets with row counts and sizes
//! - `cache purge`: remove one cached dataset, or all of them

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use pitchlab_core::data::{CacheEntry, PitchCache, PitchLoader};
use pitchlab_core::{AppConfig, CacheKey, Disambiguator, PitcherProfile, PitcherQuery, ALL};
use pitchlab_render::{ChartKind, ChartRequest, ChartSink, PngSink, RenderStyle};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "pitchlab",
    version,
    about = "PitchLab CLI: pitch mix, velocity, movement and location charts"
)]
struct Cli {
    /// Path to the TOML config file. Defaults apply when it does not exist.
    #[arg(long, global = true, default_value = "pitchlab.toml")]
    config: PathBuf,

    /// Override `[data] cache_dir` from the config.
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a pitcher's regular-season pitches into the cache.
    Fetch {
        #[command(flatten)]
        pitcher: PitcherArgs,
    },
    /// Print pitch-type counts split by batter handedness.
    Summary {
        #[command(flatten)]
        pitcher: PitcherArgs,

        /// Count filter: All, a bucket name (Ahead, Behind, Even) or a count such as 2-1.
        #[arg(long, default_value = ALL)]
        filter: String,

        /// Print JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Render a chart: pitch_dist, velo, movement_profile, pitch_sample or all.
    Chart {
        kind: String,

        #[command(flatten)]
        pitcher: PitcherArgs,

        /// Count filter applied before charting.
        #[arg(long, default_value = ALL)]
        filter: String,

        /// Override `[charts] output_dir` from the config.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Cache management commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached datasets.
    Status,
    /// Remove a cached dataset by key, or every dataset with --all.
    Purge {
        /// Cache key as shown by `cache status`.
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        key: Option<String>,

        /// Remove every cached dataset.
        #[arg(long, default_value_t = false)]
        all: bool,

        /// Actually delete (without this flag, only previews what would be removed).
        #[arg(long, default_value_t = false)]
        confirm: bool,
    },
}

#[derive(Args)]
struct PitcherArgs {
    /// First name, e.g. Paul.
    #[arg(long)]
    first: String,

    /// Last name, e.g. Skenes.
    #[arg(long)]
    last: String,

    /// Start date (YYYY-MM-DD). Defaults to `[season] start`.
    #[arg(long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD). Defaults to `[season] end`.
    #[arg(long)]
    end: Option<String>,

    /// MLBAM id; skips the name lookup.
    #[arg(long, conflicts_with = "birth_year")]
    mlbam_id: Option<u32>,

    /// Birth year, to pick one of several players sharing a name.
    #[arg(long)]
    birth_year: Option<i32>,
}

impl PitcherArgs {
    fn query(&self, config: &AppConfig) -> Result<PitcherQuery> {
        let mut query = config.season_query(&self.first, &self.last);
        if let Some(start) = &self.start {
            query.start = parse_date(start)?;
        }
        if let Some(end) = &self.end {
            query.end = parse_date(end)?;
        }
        if query.start > query.end {
            bail!("start {} is after end {}", query.start, query.end);
        }

        let disambiguator = match (self.mlbam_id, self.birth_year) {
            (Some(id), _) => Some(Disambiguator::MlbamId(id)),
            (None, Some(year)) => Some(Disambiguator::BirthYear(year)),
            (None, None) => None,
        };
        Ok(match disambiguator {
            Some(d) => query.with_disambiguator(d),
            None => query,
        })
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_file_or_default(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if let Some(dir) = cli.cache_dir {
        config.data.cache_dir = dir;
    }

    match cli.command {
        Commands::Fetch { pitcher } => run_fetch(&config, &pitcher),
        Commands::Summary {
            pitcher,
            filter,
            json,
        } => run_summary(&config, &pitcher, &filter, json),
        Commands::Chart {
            kind,
            pitcher,
            filter,
            output_dir,
        } => run_chart(&config, &kind, &pitcher, &filter, output_dir),
        Commands::Cache { action } => match action {
            CacheAction::Status => run_cache_status(&config),
            CacheAction::Purge { key, all, confirm } => run_cache_purge(&config, key, all, confirm),
        },
    }
}

fn load_profile(config: &AppConfig, args: &PitcherArgs) -> Result<PitcherProfile> {
    let query = args.query(config)?;
    let provider = config.provider()?;
    let cache = config.cache();
    let loader = PitchLoader::new(&provider, &cache);
    let profile = PitcherProfile::load(&loader, query)?;
    Ok(profile)
}

fn run_fetch(config: &AppConfig, args: &PitcherArgs) -> Result<()> {
    let query = args.query(config)?;
    let provider = config.provider()?;
    let cache = config.cache();
    let loaded = PitchLoader::new(&provider, &cache).load(&query)?;

    println!(
        "{}: {} regular-season pitches, {} to {} (from {})",
        query.display_name(),
        loaded.events.len(),
        query.start,
        query.end,
        loaded.source
    );
    println!("Cache key: {}", query.cache_key());
    Ok(())
}

fn run_summary(config: &AppConfig, args: &PitcherArgs, filter: &str, json: bool) -> Result<()> {
    let mut profile = load_profile(config, args)?;
    profile.apply_count_filter(filter, &config.count_buckets);
    let split = profile.pitch_split(true);

    if json {
        let doc = serde_json::json!({
            "pitcher": profile.display_name(),
            "start": profile.query().start,
            "end": profile.query().end,
            "filter": profile.active_label(),
            "left": split.left,
            "right": split.right,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!();
    println!("=== Pitch Mix: {} ===", profile.display_name());
    println!(
        "Period:   {} to {}",
        profile.query().start,
        profile.query().end
    );
    println!("Filter:   {} counts", profile.active_label());
    println!(
        "Pitches:  {} ({} vs LHB, {} vs RHB)",
        split.total(),
        split.left.total(),
        split.right.total()
    );

    for (side, aggregate) in [("vs LHB", &split.left), ("vs RHB", &split.right)] {
        println!();
        println!("--- {side} ---");
        if aggregate.is_empty() {
            println!("(no pitches)");
            continue;
        }
        for (name, pct) in aggregate.shares() {
            let n = aggregate.get(name).unwrap_or(0);
            println!("{:<18} {:>6} {:>7.1}%", name, n, pct);
        }
    }
    println!();
    Ok(())
}

fn run_chart(
    config: &AppConfig,
    kind: &str,
    args: &PitcherArgs,
    filter: &str,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let kinds: Vec<ChartKind> = if kind.trim() == "all" {
        ChartKind::all().to_vec()
    } else {
        vec![kind.parse::<ChartKind>().map_err(anyhow::Error::msg)?]
    };

    let mut profile = load_profile(config, args)?;
    profile.apply_count_filter(filter, &config.count_buckets);
    let use_filter = profile.active_filter().is_some();

    let style = RenderStyle::from_config(&config.charts);
    let sink = PngSink::new(output_dir.unwrap_or_else(|| config.charts.output_dir.clone()));

    for kind in kinds {
        let request = ChartRequest::from_profile(&profile, kind, use_filter, style.sample_size);
        let path = sink.render(&request, &style)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn run_cache_status(config: &AppConfig) -> Result<()> {
    let cache = config.cache();
    let cache_dir = cache.cache_dir();
    if !cache_dir.exists() {
        println!("Cache directory does not exist: {}", cache_dir.display());
        return Ok(());
    }

    let entries = cache.entries()?;
    if entries.is_empty() {
        println!("Cache is empty: {}", cache_dir.display());
        return Ok(());
    }

    let total_size: u64 = entries.iter().map(|e| e.size_bytes).sum();
    println!("Cache: {}", cache_dir.display());
    println!("Datasets: {}", entries.len());
    println!("Total size: {}", format_size(total_size));
    println!();
    println!(
        "{:<48} {:>8} {:<20} {:>10}",
        "Key", "Rows", "Cached At", "Size"
    );
    println!("{}", "-".repeat(89));
    for entry in &entries {
        let (rows, cached_at) = describe_meta(entry);
        println!(
            "{:<48} {:>8} {:<20} {:>10}",
            entry.key,
            rows,
            cached_at,
            format_size(entry.size_bytes)
        );
    }
    Ok(())
}

fn describe_meta(entry: &CacheEntry) -> (String, String) {
    if entry.quarantined {
        return ("?".into(), "(quarantined)".into());
    }
    match &entry.meta {
        Some(meta) => (
            meta.row_count.to_string(),
            meta.cached_at.format("%Y-%m-%d %H:%M").to_string(),
        ),
        None => ("?".into(), "(no meta)".into()),
    }
}

fn run_cache_purge(config: &AppConfig, key: Option<String>, all: bool, confirm: bool) -> Result<()> {
    let cache = config.cache();
    let entries = cache.entries()?;

    let to_remove: Vec<&CacheEntry> = if all {
        entries.iter().collect()
    } else {
        let key = key.map(CacheKey::from_stem);
        entries.iter().filter(|e| Some(&e.key) == key.as_ref()).collect()
    };

    if to_remove.is_empty() {
        println!("Nothing to remove.");
        return Ok(());
    }

    println!("Found {} dataset(s):", to_remove.len());
    for entry in &to_remove {
        let note = if entry.quarantined { ", quarantined" } else { "" };
        println!("  {} ({}{note})", entry.key, format_size(entry.size_bytes));
    }

    if !confirm {
        println!();
        println!("Dry run. Pass --confirm to actually delete.");
        return Ok(());
    }

    // A key can be listed twice: live file plus a quarantined copy.
    let mut keys: Vec<&CacheKey> = to_remove.iter().map(|e| &e.key).collect();
    keys.dedup();

    let mut removed = 0;
    for key in keys {
        if cache.purge(key)? {
            info!(%key, "purged cache entry");
            println!("Removed: {key}");
            removed += 1;
        }
    }

    println!("Done. Removed {removed} dataset(s).");
    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
