//! Timezone lookup for source listings and the viewer.

use std::fmt;

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use chrono_tz::Tz;
use simulcast_common::{Error, Result};

/// Abbreviations printed next to broadcast times, mapped to IANA zones.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("JST", "Asia/Tokyo"),
    ("CST", "Asia/Shanghai"),
    ("HKT", "Asia/Hong_Kong"),
    ("KST", "Asia/Seoul"),
    ("UTC", "UTC"),
    ("GMT", "UTC"),
];

/// Parse an IANA zone name (`Asia/Tokyo`) or a known broadcast abbreviation
/// (`JST`).
pub fn parse_zone(name: &str) -> Result<Tz> {
    let trimmed = name.trim();
    let iana = ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| abbr.eq_ignore_ascii_case(trimmed))
        .map(|(_, iana)| *iana)
        .unwrap_or(trimmed);

    iana.parse::<Tz>()
        .map_err(|_| Error::unknown_timezone(name))
}

/// The timezone schedules are converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerZone {
    /// The process's local timezone.
    #[default]
    Local,
    /// A named IANA zone.
    Named(Tz),
    /// A fixed UTC offset.
    Fixed(FixedOffset),
}

impl ViewerZone {
    /// Build from an optional configured zone name; `None` means local.
    pub fn from_name(name: Option<&str>) -> Result<Self> {
        match name {
            Some(name) => parse_zone(name).map(Self::Named),
            None => Ok(Self::Local),
        }
    }

    /// Render `instant` in this zone as a fixed-offset date-time.
    pub fn convert<Z: TimeZone>(&self, instant: &DateTime<Z>) -> DateTime<FixedOffset> {
        match self {
            Self::Local => instant.with_timezone(&Local).fixed_offset(),
            Self::Named(tz) => instant.with_timezone(tz).fixed_offset(),
            Self::Fixed(offset) => instant.with_timezone(offset),
        }
    }
}

impl fmt::Display for ViewerZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Named(tz) => write!(f, "{}", tz.name()),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}
