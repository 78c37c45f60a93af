//! Conversion of source-local broadcast slots into the viewer's timezone.
//!
//! A listing says "Wednesday 23:30 in Tokyo". To show it to a viewer in
//! Berlin we anchor the clock time on a reference date in the source zone,
//! take that absolute instant, and read the date and time back in the
//! viewer's zone. The difference between the two calendar dates is the
//! weekday shift.
//!
//! Past-midnight listing times (`"25:30"`) are the caller's job: pre-roll
//! them with [`crate::clock::preroll`] (or [`RawScheduleEntry::prerolled`])
//! first. The normalizer only accepts calendar-valid clock times.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone, Timelike};
use chrono_tz::Tz;
use simulcast_common::{Error, Result};

use crate::clock::ClockTime;
use crate::entry::{LocalScheduleEntry, RawScheduleEntry};
use crate::weekday;
use crate::zone::{self, ViewerZone};

/// Converts `(weekday, clock time, source zone)` into the viewer's
/// `(weekday, clock time)`.
///
/// Holds no mutable state; one instance can be shared freely.
#[derive(Debug, Clone)]
pub struct TimeZoneNormalizer {
    viewer: ViewerZone,
    reference_date: NaiveDate,
}

impl TimeZoneNormalizer {
    /// Create a normalizer targeting `viewer`, anchored on today's local date.
    pub fn new(viewer: ViewerZone) -> Self {
        Self {
            viewer,
            reference_date: Local::now().date_naive(),
        }
    }

    /// Create a normalizer targeting the process's local timezone.
    pub fn local() -> Self {
        Self::new(ViewerZone::Local)
    }

    /// Anchor conversions on `date` instead of today.
    ///
    /// Offsets that change with daylight saving time depend on the date, so
    /// tests and replays pin it.
    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }

    pub fn viewer(&self) -> ViewerZone {
        self.viewer
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Convert one slot from `source` into the viewer's zone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeFormat`] if `clock_time` is not a
    /// calendar-valid `HH:MM`.
    pub fn normalize(&self, weekday: u8, clock_time: &str, source: Tz) -> Result<(u8, ClockTime)> {
        let time = clock_time.parse::<ClockTime>()?;
        let naive = self
            .reference_date
            .and_hms_opt(time.hour(), time.minute(), 0)
            .ok_or_else(|| Error::invalid_time_format(clock_time))?;

        let source_instant = localize(&source, naive);
        let viewer_instant = self.viewer.convert(&source_instant);

        let day_delta = (viewer_instant.date_naive() - source_instant.date_naive()).num_days();
        let local_time = ClockTime::new(viewer_instant.hour(), viewer_instant.minute())?;

        Ok((weekday::shift(weekday, day_delta), local_time))
    }

    /// Convert a calendar-valid raw entry into a viewer-local entry.
    ///
    /// `default_zone` is used when the entry does not name its own source
    /// timezone.
    pub fn normalize_entry(
        &self,
        raw: &RawScheduleEntry,
        default_zone: Option<Tz>,
    ) -> Result<LocalScheduleEntry> {
        if !weekday::is_valid(raw.weekday) {
            return Err(Error::malformed(
                &raw.title,
                format!("weekday {} out of range", raw.weekday),
            ));
        }

        let source = if raw.source_timezone.trim().is_empty() {
            default_zone.ok_or_else(|| Error::malformed(&raw.title, "missing source timezone"))?
        } else {
            zone::parse_zone(&raw.source_timezone)?
        };

        let (day, time) = self.normalize(raw.weekday, &raw.clock_time, source)?;

        Ok(LocalScheduleEntry {
            title: raw.title.clone(),
            weekday: day,
            clock_time: time.to_string(),
            source_timezone: source.name().to_string(),
            image_url: raw.image_url.clone(),
        })
    }
}

impl Default for TimeZoneNormalizer {
    fn default() -> Self {
        Self::local()
    }
}

/// Attach `zone` to a naive local date-time.
///
/// Ambiguous times (DST fall-back) take the earlier offset. Times inside a
/// DST gap are read with the offset in force just before the gap, which
/// lands them just after it.
fn localize(zone: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    if let Some(instant) = zone.from_local_datetime(&naive).earliest() {
        return instant;
    }
    let before_gap = zone
        .offset_from_utc_datetime(&(naive - TimeDelta::hours(12)))
        .fix();
    zone.from_utc_datetime(&(naive - TimeDelta::seconds(i64::from(before_gap.local_minus_utc()))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use chrono_tz::Asia::{Shanghai, Tokyo};

    fn fixed(hours: i32) -> ViewerZone {
        ViewerZone::Fixed(FixedOffset::east_opt(hours * 3600).unwrap())
    }

    fn normalizer(viewer: ViewerZone) -> TimeZoneNormalizer {
        TimeZoneNormalizer::new(viewer)
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 10, 16).unwrap())
    }

    #[test]
    fn test_tokyo_to_utc_plus_one_same_day() {
        let (day, time) = normalizer(fixed(1)).normalize(2, "23:30", Tokyo).unwrap();
        assert_eq!(day, 2);
        assert_eq!(time.to_string(), "15:30");
    }

    #[test]
    fn test_rollover_table() {
        // (weekday, time, source, viewer offset hours) -> (weekday, time)
        let cases: &[(u8, &str, Tz, i32, u8, &str)] = &[
            // No shift when zones agree.
            (4, "20:00", Tokyo, 9, 4, "20:00"),
            // One hour behind, same day.
            (4, "20:00", Tokyo, 8, 4, "19:00"),
            // Early morning in Tokyo is the previous evening in Europe.
            (0, "01:00", Tokyo, 1, 6, "17:00"),
            (3, "08:59", Tokyo, 0, 2, "23:59"),
            // Late night in Shanghai is the next morning further east.
            (6, "23:30", Shanghai, 10, 0, "01:30"),
            (2, "22:00", Shanghai, 12, 3, "02:00"),
            // Across the date line westwards.
            (1, "10:00", Tokyo, -10, 0, "15:00"),
            // Exactly midnight in the viewer zone counts as the next day.
            (5, "23:00", Shanghai, 9, 6, "00:00"),
        ];

        for &(day, time, source, offset, want_day, want_time) in cases {
            let (got_day, got_time) = normalizer(fixed(offset))
                .normalize(day, time, source)
                .unwrap();
            assert_eq!(
                (got_day, got_time.to_string().as_str()),
                (want_day, want_time),
                "{day} {time} {source} -> UTC{offset:+}"
            );
        }
    }

    #[test]
    fn test_named_viewer_zone() {
        // Berlin is UTC+2 in mid-October.
        let viewer = ViewerZone::Named(chrono_tz::Europe::Berlin);
        let (day, time) = normalizer(viewer).normalize(2, "23:30", Tokyo).unwrap();
        assert_eq!(day, 2);
        assert_eq!(time.to_string(), "16:30");
    }

    #[test]
    fn test_month_boundary_rollover() {
        // 2024-10-31 23:30 in Shanghai is 2024-11-01 in Tokyo; the shift is
        // +1 day even though the day-of-month drops from 31 to 1.
        let normalizer = TimeZoneNormalizer::new(fixed(9))
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 10, 31).unwrap());
        let (day, time) = normalizer.normalize(3, "23:30", Shanghai).unwrap();
        assert_eq!(day, 4);
        assert_eq!(time.to_string(), "00:30");
    }

    #[test]
    fn test_past_midnight_preroll_composes() {
        let (day, time) = crate::clock::preroll(5, "25:15").unwrap();
        assert_eq!((day, time.to_string().as_str()), (6, "01:15"));

        // 01:15 Sunday in Tokyo is 16:15 Saturday at UTC+0.
        let (day, time) = normalizer(fixed(0))
            .normalize(day, &time.to_string(), Tokyo)
            .unwrap();
        assert_eq!(day, 5);
        assert_eq!(time.to_string(), "16:15");
    }

    #[test]
    fn test_invalid_time_format() {
        let n = normalizer(fixed(0));
        for raw in ["25:30", "7pm", "12-30", ""] {
            let err = n.normalize(0, raw, Tokyo).unwrap_err();
            assert!(matches!(err, Error::InvalidTimeFormat(_)), "{raw:?}: {err:?}");
        }
    }

    #[test]
    fn test_dst_gap_is_resolved() {
        // 2024-03-31 02:30 does not exist in Berlin.
        let normalizer = TimeZoneNormalizer::new(fixed(0))
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        let (day, time) = normalizer
            .normalize(6, "02:30", chrono_tz::Europe::Berlin)
            .unwrap();
        assert_eq!(day, 6);
        assert_eq!(time.to_string(), "01:30");
    }

    #[test]
    fn test_dst_overlap_takes_earlier_offset() {
        // 2024-10-27 02:30 happens twice in Berlin; the first reading is +02:00.
        let normalizer = TimeZoneNormalizer::new(fixed(0))
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 10, 27).unwrap());
        let (day, time) = normalizer
            .normalize(6, "02:30", chrono_tz::Europe::Berlin)
            .unwrap();
        assert_eq!(day, 6);
        assert_eq!(time.to_string(), "00:30");
    }

    #[test]
    fn test_normalize_entry() {
        let raw = RawScheduleEntry {
            title: "Foo".into(),
            weekday: 0,
            clock_time: "01:00".into(),
            source_timezone: String::new(),
            image_url: "http://img/foo.png".into(),
        };
        let n = normalizer(fixed(1));

        assert!(matches!(
            n.normalize_entry(&raw, None),
            Err(Error::MalformedEntry { .. })
        ));

        let local = n.normalize_entry(&raw, Some(Tokyo)).unwrap();
        assert_eq!(local.weekday, 6);
        assert_eq!(local.clock_time, "17:00");
        assert_eq!(local.source_timezone, "Asia/Tokyo");
        assert_eq!(local.image_url, "http://img/foo.png");
    }

    #[test]
    fn test_normalize_entry_unknown_zone() {
        let raw = RawScheduleEntry {
            title: "Foo".into(),
            weekday: 0,
            clock_time: "01:00".into(),
            source_timezone: "Nowhere/Special".into(),
            image_url: String::new(),
        };
        assert!(matches!(
            normalizer(fixed(0)).normalize_entry(&raw, Some(Tokyo)),
            Err(Error::UnknownTimezone(_))
        ));
    }
}
