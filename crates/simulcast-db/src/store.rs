//! SQLite-backed identity resolver and record sink.

use simulcast_common::{Result, TitleId};
use simulcast_schedule::{CanonicalRecord, IdentityResolver, RecordSink};

use crate::models::StoredRecord;
use crate::pool::{get_conn, DbPool};
use crate::queries::{schedules, titles};

/// Pool-backed store handed to the merge engine.
///
/// Every call checks a connection out of the pool for its own duration.
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// All stored records, ordered by title name.
    pub fn list_records(&self) -> Result<Vec<StoredRecord>> {
        let conn = get_conn(&self.pool)?;
        schedules::list_records(&conn)
    }
}

impl IdentityResolver for SqliteStore {
    fn resolve_or_create(&mut self, name: &str) -> Result<TitleId> {
        let conn = get_conn(&self.pool)?;
        Ok(titles::resolve_or_create(&conn, name)?.id)
    }
}

impl RecordSink for SqliteStore {
    fn upsert_records(&mut self, records: &[CanonicalRecord]) -> Result<usize> {
        let conn = get_conn(&self.pool)?;
        schedules::upsert_records(&conn, records)
    }
}
