use serde::{Deserialize, Serialize};
use simulcast_common::Language;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite database file
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("simulcast.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleConfig {
    /// Order in which source languages are folded into records
    #[serde(default = "default_language_priority")]
    pub language_priority: Vec<Language>,

    /// IANA zone schedules are shown in (process local zone if unset)
    #[serde(default)]
    pub viewer_timezone: Option<String>,

    /// Same-day distance within which two sources share a slot
    #[serde(default = "default_match_window")]
    pub match_window_minutes: u16,
}

fn default_language_priority() -> Vec<Language> {
    Language::ALL.to_vec()
}

fn default_match_window() -> u16 {
    simulcast_schedule::merge::DEFAULT_MATCH_WINDOW_MINUTES
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            language_priority: default_language_priority(),
            viewer_timezone: None,
            match_window_minutes: default_match_window(),
        }
    }
}

/// Per-language source defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    pub language: Language,

    /// Zone assumed for entries that do not name their own
    pub timezone: String,
}
