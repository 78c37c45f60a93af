//! Decoding of source listing files.
//!
//! A listing file is a JSON array with one object per title. Rows are decoded
//! one at a time, so a broken row costs only itself and the rows after it keep
//! their position. Two row shapes are accepted:
//!
//! - `{"name", "day", "time", "timezone"?, "image_url"?}`, where `day` is
//!   `0..=6` (Monday = 0), a weekday label (`"Sat"`, `"星期六"`) or a
//!   premiere date (`"10/05"`)
//! - `{"name", "broadcast", "image_url"?}`, where `broadcast` is a line such
//!   as `"Saturdays at 23:00 (JST)"`

use serde::Deserialize;
use serde_json::Value;
use simulcast_common::{Error, Result};
use simulcast_schedule::{parse_broadcast_line, weekday, RawScheduleEntry};

/// One source's rows in file order.
///
/// Rows that failed to decode stay in place as [`Error::MalformedEntry`].
pub type SourceListing = Vec<Result<RawScheduleEntry>>;

#[derive(Debug, Deserialize)]
struct BroadcastRow {
    name: String,
    broadcast: String,
    #[serde(alias = "img", default)]
    image_url: String,
}

/// Decode a listing file.
///
/// `year` dates premiere labels such as `"10/05"`.
///
/// # Errors
///
/// Fails only if `json` is not a JSON array; problems inside a row are
/// reported in that row's slot.
pub fn decode_listing(json: &str, year: i32) -> serde_json::Result<SourceListing> {
    let rows: Vec<Value> = serde_json::from_str(json)?;
    Ok(rows.into_iter().map(|row| decode_row(row, year)).collect())
}

fn decode_row(mut row: Value, year: i32) -> Result<RawScheduleEntry> {
    let title = row
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let malformed = |e: serde_json::Error| Error::malformed(&title, e.to_string());

    if row.get("broadcast").is_some() {
        let row: BroadcastRow = serde_json::from_value(row).map_err(malformed)?;
        let slot = parse_broadcast_line(&row.broadcast).ok_or_else(|| {
            Error::malformed(
                &row.name,
                format!("unrecognized broadcast line '{}'", row.broadcast),
            )
        })?;
        return Ok(RawScheduleEntry {
            title: row.name,
            weekday: slot.weekday,
            clock_time: slot.time.to_string(),
            source_timezone: slot.zone.name().to_string(),
            image_url: row.image_url,
        });
    }

    let day_label = row.get("day").and_then(Value::as_str).map(str::to_owned);
    if let Some(label) = day_label {
        let day = weekday::parse_label(&label)
            .or_else(|| weekday::from_date_label(&label, year))
            .ok_or_else(|| Error::malformed(&title, format!("unrecognized day '{label}'")))?;
        if let Some(fields) = row.as_object_mut() {
            fields.insert("day".to_string(), Value::from(day));
        }
    }

    serde_json::from_value(row).map_err(malformed)
}
