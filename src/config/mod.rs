mod types;

pub use types::*;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use simulcast_common::Language;
use simulcast_schedule::{parse_zone, MergeOptions, ViewerZone};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./simulcast.toml",
        "~/.config/simulcast/config.toml",
        "/etc/simulcast/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let mut seen = HashSet::new();
    for language in &config.schedule.language_priority {
        if !seen.insert(*language) {
            anyhow::bail!("Language '{}' appears twice in language_priority", language);
        }
    }

    if config.schedule.match_window_minutes == 0 {
        anyhow::bail!("match_window_minutes must be greater than 0");
    }

    if let Some(zone) = &config.schedule.viewer_timezone {
        parse_zone(zone).with_context(|| format!("Invalid viewer_timezone '{}'", zone))?;
    }

    let mut sources = HashSet::new();
    for source in &config.sources {
        if !sources.insert(source.language) {
            anyhow::bail!("Source '{}' is configured more than once", source.language);
        }
        parse_zone(&source.timezone).with_context(|| {
            format!("Invalid timezone for source '{}'", source.language)
        })?;
    }

    if config.database.path.as_os_str().is_empty() {
        anyhow::bail!("Database path cannot be empty");
    }

    Ok(())
}

impl Config {
    /// Merge tuning derived from the `[schedule]` section.
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            priority: self.schedule.language_priority.clone(),
            window_minutes: self.schedule.match_window_minutes,
        }
    }

    /// The zone schedules are normalized into.
    pub fn viewer_zone(&self) -> Result<ViewerZone> {
        ViewerZone::from_name(self.schedule.viewer_timezone.as_deref())
            .context("Invalid viewer_timezone")
    }

    /// Default source timezone per language from `[[sources]]`.
    pub fn source_zones(&self) -> Result<BTreeMap<Language, Tz>> {
        self.sources
            .iter()
            .map(|source| {
                let zone = parse_zone(&source.timezone).with_context(|| {
                    format!("Invalid timezone for source '{}'", source.language)
                })?;
                Ok((source.language, zone))
            })
            .collect()
    }
}
