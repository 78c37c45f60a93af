//! Title identity queries.
//!
//! A title's identity is keyed by its exact name. Resolution is a single
//! insert-if-absent followed by a read, so two writers racing on the same
//! name always observe the same identifier.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use simulcast_common::{Error, Result, TitleId};
use simulcast_schedule::TitleIdentity;

use super::{parse_timestamp, parse_title_id};
use crate::models::Title;

/// Parse a title from a database row.
///
/// Expects columns in order: id, name, created_at.
fn parse_title_row(row: &rusqlite::Row) -> rusqlite::Result<Title> {
    Ok(Title {
        id: parse_title_id(0, &row.get::<_, String>(0)?)?,
        name: row.get(1)?,
        created_at: parse_timestamp(2, &row.get::<_, String>(2)?)?,
    })
}

/// Return the identity for `name`, creating a fresh one if none exists.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `name` - Exact title text; no normalization is applied
///
/// # Returns
///
/// * `Ok(TitleIdentity)` - The existing or newly created identity
/// * `Err(Error)` - If a database error occurs
pub fn resolve_or_create(conn: &Connection, name: &str) -> Result<TitleIdentity> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    tx.execute(
        "INSERT INTO titles (id, name, created_at)
         VALUES (:id, :name, :created_at)
         ON CONFLICT(name) DO NOTHING",
        rusqlite::named_params! {
            ":id": TitleId::new().to_string(),
            ":name": name,
            ":created_at": Utc::now().to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    let identity = find_title_by_name(&tx, name)?
        .map(TitleIdentity::from)
        .ok_or_else(|| Error::internal(format!("title '{name}' vanished after insert")))?;

    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    Ok(identity)
}

/// Find a title by its exact name.
pub fn find_title_by_name(conn: &Connection, name: &str) -> Result<Option<Title>> {
    conn.query_row(
        "SELECT id, name, created_at FROM titles WHERE name = :name",
        rusqlite::named_params! { ":name": name },
        parse_title_row,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Get a title by ID.
///
/// # Returns
///
/// * `Ok(Some(Title))` - The title if found
/// * `Ok(None)` - If the title does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_title(conn: &Connection, id: TitleId) -> Result<Option<Title>> {
    let result = conn.query_row(
        "SELECT id, name, created_at FROM titles WHERE id = :id",
        rusqlite::named_params! { ":id": id.to_string() },
        parse_title_row,
    );

    match result {
        Ok(title) => Ok(Some(title)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List every known title, ordered by name.
pub fn list_titles(conn: &Connection) -> Result<Vec<Title>> {
    let mut stmt = conn
        .prepare("SELECT id, name, created_at FROM titles ORDER BY name")
        .map_err(|e| Error::database(e.to_string()))?;

    let titles = stmt
        .query_map([], parse_title_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(titles)
}
