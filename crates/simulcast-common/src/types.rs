//! Core type definitions shared by the schedule engine and the store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag of a regional broadcast-listing source.
///
/// Each source publishes in its own language; the tag doubles as the key of
/// a canonical record's translation map. Serialized in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Simplified Chinese listings.
    Chs,
    /// Traditional Chinese listings.
    Cht,
    /// English listings.
    Eng,
}

impl Language {
    /// Every language, in the default processing order.
    pub const ALL: [Language; 3] = [Language::Chs, Language::Cht, Language::Eng];

    /// Lowercase tag used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chs => "chs",
            Self::Cht => "cht",
            Self::Eng => "eng",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chs" => Ok(Self::Chs),
            "cht" => Ok(Self::Cht),
            "eng" => Ok(Self::Eng),
            other => Err(format!("unknown language tag: {other}")),
        }
    }
}
