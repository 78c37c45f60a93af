//! Canonical schedule record queries.
//!
//! A record's translations are stored as one JSON object keyed by language
//! code. Upserting a record replaces that object wholesale.

use std::collections::BTreeMap;

use chrono::Utc;
use rusqlite::Connection;
use simulcast_common::{Error, Language, Result, TitleId};
use simulcast_schedule::{CanonicalRecord, LocalScheduleEntry};
use tracing::debug;

use super::{parse_timestamp, parse_title_id};
use crate::models::StoredRecord;

/// Parse a stored record from a database row.
///
/// Expects columns in order: title_id, translations, updated_at.
fn parse_record_row(row: &rusqlite::Row) -> rusqlite::Result<StoredRecord> {
    let id = parse_title_id(0, &row.get::<_, String>(0)?)?;
    let translations: BTreeMap<Language, LocalScheduleEntry> =
        serde_json::from_str(&row.get::<_, String>(1)?).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(StoredRecord {
        record: CanonicalRecord { id, translations },
        updated_at: parse_timestamp(2, &row.get::<_, String>(2)?)?,
    })
}

/// Insert or replace the stored record for `record.id`.
///
/// The title must already exist in `titles`.
pub fn upsert_record(conn: &Connection, record: &CanonicalRecord) -> Result<()> {
    let translations = serde_json::to_string(&record.translations)
        .map_err(|e| Error::internal(format!("Failed to encode translations: {e}")))?;

    conn.execute(
        "INSERT INTO schedule_records (title_id, translations, updated_at)
         VALUES (:title_id, :translations, :updated_at)
         ON CONFLICT(title_id) DO UPDATE SET
            translations = excluded.translations,
            updated_at = excluded.updated_at",
        rusqlite::named_params! {
            ":title_id": record.id.to_string(),
            ":translations": translations,
            ":updated_at": Utc::now().to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(())
}

/// Upsert a batch of records in a single transaction.
///
/// Either every record is written or none is.
///
/// # Returns
///
/// * `Ok(usize)` - Number of records written
/// * `Err(Error)` - If any write fails; the transaction is rolled back
pub fn upsert_records(conn: &Connection, records: &[CanonicalRecord]) -> Result<usize> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    for record in records {
        upsert_record(&tx, record)?;
    }

    tx.commit().map_err(|e| Error::database(e.to_string()))?;
    debug!(count = records.len(), "Upserted schedule records");

    Ok(records.len())
}

/// Get the stored record for a title.
///
/// # Returns
///
/// * `Ok(Some(StoredRecord))` - The record if found
/// * `Ok(None)` - If no record exists for the title
/// * `Err(Error)` - If a database error occurs
pub fn get_record(conn: &Connection, id: TitleId) -> Result<Option<StoredRecord>> {
    let result = conn.query_row(
        "SELECT title_id, translations, updated_at
         FROM schedule_records WHERE title_id = :title_id",
        rusqlite::named_params! { ":title_id": id.to_string() },
        parse_record_row,
    );

    match result {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List every stored record, ordered by title name.
pub fn list_records(conn: &Connection) -> Result<Vec<StoredRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT r.title_id, r.translations, r.updated_at
             FROM schedule_records r
             JOIN titles t ON t.id = r.title_id
             ORDER BY t.name",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let records = stmt
        .query_map([], parse_record_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(records)
}
