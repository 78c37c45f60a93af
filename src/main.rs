mod cli;

use simulcast::aggregate::{AggregationReport, Aggregator};
use simulcast::config;
use simulcast::listing::{decode_listing, SourceListing};
use simulcast_common::Language;
use simulcast_db::pool::init_pool;
use simulcast_db::SqliteStore;
use simulcast_schedule::{
    clock, parse_broadcast_line, parse_zone, weekday, MemoryStore, Season, TimeZoneNormalizer,
    ViewerZone,
};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::Parser;
use cli::{Cli, Commands};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "simulcast=debug,simulcast_schedule=debug,simulcast_db=debug".to_string()
        } else {
            "simulcast=info,simulcast_schedule=warn,simulcast_db=warn".to_string()
        }
    });

    // Logs go to stderr so --json output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Aggregate {
            sources,
            dry_run,
            json,
        } => aggregate(&sources, cli.config.as_deref(), dry_run, json),
        Commands::Normalize {
            day,
            time,
            zone,
            broadcast,
            viewer,
            date,
        } => {
            let slot = match broadcast {
                Some(line) => SlotArgs::Broadcast(line),
                None => SlotArgs::Parts {
                    day: day.context("--day is required")?,
                    time: time.context("--time is required")?,
                    zone: zone.context("--zone is required")?,
                },
            };
            normalize(
                &slot,
                viewer.as_deref(),
                date.as_deref(),
                cli.config.as_deref(),
            )
        }
        Commands::List { json } => list_records(cli.config.as_deref(), json),
        Commands::Season => {
            let season = Season::current();
            println!("Season: {}", season);
            println!("  {}", season.path_slug());
            println!("  {}", season.compact_slug());
            Ok(())
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("simulcast {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Split a `LANG=FILE` argument.
fn parse_source_arg(arg: &str) -> Result<(Language, PathBuf)> {
    let (language, path) = arg
        .split_once('=')
        .with_context(|| format!("Source must be LANG=FILE, got '{}'", arg))?;
    let language: Language = language
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .with_context(|| format!("Invalid source language in '{}'", arg))?;
    Ok((language, PathBuf::from(path)))
}

fn read_source(path: &Path, year: i32) -> Result<SourceListing> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {:?}", path))?;
    decode_listing(&content, year)
        .with_context(|| format!("Failed to parse source file: {:?}", path))
}

fn aggregate(
    sources: &[String],
    config_path: Option<&Path>,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let aggregator = Aggregator::from_config(&config)?;

    let year = aggregator.normalizer().reference_date().year();

    let mut listings = BTreeMap::new();
    for arg in sources {
        let (language, path) = parse_source_arg(arg)?;
        if listings.contains_key(&language) {
            anyhow::bail!("Source '{}' given more than once", language);
        }
        let listing = read_source(&path, year)?;
        tracing::info!(language = %language, entries = listing.len(), "Loaded source listing");
        listings.insert(language, listing);
    }

    let report = if dry_run {
        let mut store = MemoryStore::new();
        aggregator.preview_listings(listings, &mut store)?
    } else {
        let db_path = config.database.path.to_string_lossy();
        tracing::info!("Using database at {}", db_path);
        let pool = init_pool(&db_path)?;
        let mut store = SqliteStore::new(pool);
        aggregator.run_listings(listings, &mut store)?
    };

    if json {
        print_report_json(&report)?;
    } else {
        print_report(&report, dry_run);
    }

    Ok(())
}

fn print_report(report: &AggregationReport, dry_run: bool) {
    for record in &report.records {
        println!("{}", record.id);
        for (language, entry) in &record.translations {
            println!(
                "  [{}] {} {} {}",
                language,
                weekday::name(entry.weekday).unwrap_or("?"),
                entry.clock_time,
                entry.title
            );
        }
    }

    println!();
    println!("Records: {}", report.records.len());
    println!("Normalized entries: {}", report.normalized);
    println!("Slot matches: {}", report.slot_matches);
    if dry_run {
        println!("Dry run: nothing written");
    } else {
        println!("Written: {}", report.written);
    }

    if !report.skipped.is_empty() {
        println!("Skipped: {}", report.skipped.len());
        for skipped in &report.skipped {
            println!(
                "  [{}] #{} {}: {}",
                skipped.language, skipped.index, skipped.title, skipped.error
            );
        }
    }
}

fn print_report_json(report: &AggregationReport) -> Result<()> {
    let skipped: Vec<_> = report
        .skipped
        .iter()
        .map(|s| {
            serde_json::json!({
                "language": s.language,
                "index": s.index,
                "title": s.title,
                "reason": s.error.to_string(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "records": report.records,
        "normalized": report.normalized,
        "slot_matches": report.slot_matches,
        "written": report.written,
        "skipped": skipped,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// A slot given on the command line.
enum SlotArgs {
    Parts {
        day: String,
        time: String,
        zone: String,
    },
    Broadcast(String),
}

/// Read a weekday from a number, a label or a `month/day` premiere date.
fn parse_day(day: &str, year: i32) -> Option<u8> {
    day.parse::<u8>()
        .ok()
        .filter(|d| weekday::is_valid(*d))
        .or_else(|| weekday::parse_label(day))
        .or_else(|| weekday::from_date_label(day, year))
}

fn normalize(
    slot: &SlotArgs,
    viewer: Option<&str>,
    date: Option<&str>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let viewer = match viewer {
        Some(name) => ViewerZone::from_name(Some(name))?,
        None => config.viewer_zone()?,
    };
    let mut normalizer = TimeZoneNormalizer::new(viewer);
    if let Some(date) = date {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid reference date '{}'", date))?;
        normalizer = normalizer.with_reference_date(date);
    }

    let (rolled_day, rolled_time, source) = match slot {
        SlotArgs::Parts { day, time, zone } => {
            let year = normalizer.reference_date().year();
            let source_day =
                parse_day(day, year).with_context(|| format!("Unrecognized weekday '{}'", day))?;
            let source = parse_zone(zone)?;
            let (rolled_day, rolled_time) = clock::preroll(source_day, time)?;
            (rolled_day, rolled_time, source)
        }
        SlotArgs::Broadcast(line) => {
            let parsed = parse_broadcast_line(line)
                .with_context(|| format!("Unrecognized broadcast line '{}'", line))?;
            (parsed.weekday, parsed.time, parsed.zone)
        }
    };

    let (local_day, local_time) =
        normalizer.normalize(rolled_day, &rolled_time.to_string(), source)?;

    println!(
        "{} {} ({})",
        weekday::name(local_day).unwrap_or("?"),
        local_time,
        viewer
    );
    Ok(())
}

fn list_records(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let pool = init_pool(&config.database.path.to_string_lossy())?;
    let records = SqliteStore::new(pool).list_records()?;

    if json {
        let records: Vec<_> = records.iter().map(|stored| &stored.record).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No schedule records stored");
        return Ok(());
    }

    for stored in &records {
        println!("{} (updated {})", stored.record.id, stored.updated_at);
        for (language, entry) in &stored.record.translations {
            println!(
                "  [{}] {} {} {}",
                language,
                weekday::name(entry.weekday).unwrap_or("?"),
                entry.clock_time,
                entry.title
            );
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Database: {}", config.database.path.display());
    println!(
        "  Language priority: {}",
        config
            .schedule
            .language_priority
            .iter()
            .map(Language::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  Viewer timezone: {}",
        config.schedule.viewer_timezone.as_deref().unwrap_or("local")
    );
    println!(
        "  Match window: {} minutes",
        config.schedule.match_window_minutes
    );
    println!("  Sources: {}", config.sources.len());

    Ok(())
}
