//! Database query modules.
//!
//! - titles: Title identity get-or-create and lookup
//! - schedules: Canonical schedule record upsert and listing

pub mod schedules;
pub mod titles;

use chrono::{DateTime, Utc};
use simulcast_common::TitleId;

/// Parse a stored title identifier, reporting column `idx` on failure.
pub(crate) fn parse_title_id(idx: usize, raw: &str) -> rusqlite::Result<TitleId> {
    raw.parse::<TitleId>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a stored RFC 3339 timestamp, reporting column `idx` on failure.
pub(crate) fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}
