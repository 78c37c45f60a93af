//! Schema migrations.
//!
//! Each step is an embedded SQL batch. The applied schema version lives in
//! SQLite's `user_version` header field, so no bookkeeping table is needed.

use rusqlite::Connection;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Schema step {version} ({name}) failed: {reason}")]
    Step {
        version: u32,
        name: &'static str,
        reason: String,
    },

    #[error("Database schema version {0} is newer than this build supports")]
    TooNew(u32),
}

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const TITLES_AND_RECORDS: &str = r#"
CREATE TABLE titles (
    id         TEXT PRIMARY KEY,
    name       TEXT UNIQUE NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE schedule_records (
    title_id     TEXT PRIMARY KEY REFERENCES titles(id) ON DELETE CASCADE,
    translations TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);
"#;

const RECORD_RECENCY_INDEX: &str = r#"
CREATE INDEX idx_schedule_records_updated ON schedule_records(updated_at);
"#;

const STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "titles_and_records",
        sql: TITLES_AND_RECORDS,
    },
    SchemaStep {
        version: 2,
        name: "record_recency_index",
        sql: RECORD_RECENCY_INDEX,
    },
];

/// Latest schema version known to this build.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Schema version recorded in the database header.
pub fn current_version(conn: &Connection) -> Result<u32, MigrationError> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Bring the schema up to [`latest_version`].
///
/// Steps run in order, one transaction each, so a failed step leaves the
/// database at the previous version. Returns how many steps ran.
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    let from = current_version(conn)?;
    if from > latest_version() {
        return Err(MigrationError::TooNew(from));
    }

    let mut applied = 0;
    for step in STEPS.iter().filter(|step| step.version > from) {
        let fail = |e: rusqlite::Error| MigrationError::Step {
            version: step.version,
            name: step.name,
            reason: e.to_string(),
        };

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(step.sql).map_err(fail)?;
        tx.pragma_update(None, "user_version", step.version)
            .map_err(fail)?;
        tx.commit().map_err(fail)?;

        info!(version = step.version, name = step.name, "Applied schema step");
        applied += 1;
    }

    Ok(applied)
}
