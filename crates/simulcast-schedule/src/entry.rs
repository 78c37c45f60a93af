//! Schedule entries and canonical records.
//!
//! Field names on the wire follow the stored document shape
//! (`name`/`day`/`time`/`timezone`/`image_url`), so a record serialized here
//! can be written to the store verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use simulcast_common::{Error, Language, Result, TitleId};

use crate::clock::{self, ClockTime};
use crate::weekday;

/// One listing row as supplied by a source scraper.
///
/// `clock_time` is in the source's own clock and may run past midnight
/// (`"25:30"`). An empty `source_timezone` means "use the source default".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawScheduleEntry {
    #[serde(rename = "name")]
    pub title: String,
    #[serde(rename = "day")]
    pub weekday: u8,
    #[serde(rename = "time")]
    pub clock_time: String,
    #[serde(rename = "timezone", default)]
    pub source_timezone: String,
    #[serde(alias = "img", default)]
    pub image_url: String,
}

impl RawScheduleEntry {
    /// Fold a past-midnight listing time onto the calendar clock.
    ///
    /// `"25:15"` on weekday 5 becomes `"01:15"` on weekday 6; calendar-valid
    /// times are returned unchanged (but re-rendered as `HH:MM`).
    pub fn prerolled(&self) -> Result<Self> {
        if !weekday::is_valid(self.weekday) {
            return Err(Error::malformed(
                &self.title,
                format!("weekday {} out of range", self.weekday),
            ));
        }
        let (day, time) = clock::preroll(self.weekday, &self.clock_time)?;
        Ok(Self {
            weekday: day,
            clock_time: time.to_string(),
            ..self.clone()
        })
    }
}

/// A schedule entry expressed in the viewer's timezone.
///
/// `source_timezone` is kept for display provenance only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalScheduleEntry {
    #[serde(rename = "name")]
    pub title: String,
    #[serde(rename = "day")]
    pub weekday: u8,
    #[serde(rename = "time")]
    pub clock_time: String,
    #[serde(rename = "timezone")]
    pub source_timezone: String,
    pub image_url: String,
}

impl LocalScheduleEntry {
    /// Check the fields the merge engine relies on and return the parsed slot.
    ///
    /// `image_url` may legitimately be empty.
    pub fn validate(&self) -> Result<Slot> {
        if self.title.trim().is_empty() {
            return Err(Error::malformed(&self.title, "missing title"));
        }
        if !weekday::is_valid(self.weekday) {
            return Err(Error::malformed(
                &self.title,
                format!("weekday {} out of range", self.weekday),
            ));
        }
        if self.source_timezone.trim().is_empty() {
            return Err(Error::malformed(&self.title, "missing source timezone"));
        }
        let time = self.clock_time.parse::<ClockTime>().map_err(|_| {
            Error::malformed(
                &self.title,
                format!("unparsable clock time '{}'", self.clock_time),
            )
        })?;

        Ok(Slot {
            weekday: self.weekday,
            time,
        })
    }
}

/// A recurring broadcast time: weekday plus clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub weekday: u8,
    pub time: ClockTime,
}

impl Slot {
    /// Whether `other` falls on the same weekday within `window_minutes`.
    ///
    /// The distance is same-day wall-clock arithmetic; slots either side of
    /// midnight never match.
    pub fn is_within(&self, other: &Slot, window_minutes: u16) -> bool {
        self.weekday == other.weekday && self.time.minutes_between(&other.time) <= window_minutes
    }
}

/// A title's stable identity, keyed by exact name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleIdentity {
    pub id: TitleId,
    pub canonical_name: String,
}

/// The merged view of one title across every source language.
///
/// Invariant: `translations` holds at most one entry per language and is
/// never empty once the record exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub id: TitleId,
    pub translations: BTreeMap<Language, LocalScheduleEntry>,
}

impl CanonicalRecord {
    /// Create a record holding a single translation.
    pub fn new(id: TitleId, language: Language, entry: LocalScheduleEntry) -> Self {
        let mut translations = BTreeMap::new();
        translations.insert(language, entry);
        Self { id, translations }
    }

    /// The entry for `language`, if that source lists this title.
    pub fn translation(&self, language: Language) -> Option<&LocalScheduleEntry> {
        self.translations.get(&language)
    }
}
