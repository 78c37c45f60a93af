//! Rust models matching the database schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use simulcast_common::TitleId;
use simulcast_schedule::{CanonicalRecord, TitleIdentity};

/// Row of the `titles` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Title {
    pub id: TitleId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Title> for TitleIdentity {
    fn from(title: Title) -> Self {
        TitleIdentity {
            id: title.id,
            canonical_name: title.name,
        }
    }
}

/// Row of the `schedule_records` table, with its translations decoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredRecord {
    pub record: CanonicalRecord,
    pub updated_at: DateTime<Utc>,
}
