//! Wall-clock times as published by broadcast listings.
//!
//! Two types live here:
//!
//! - [`ClockTime`] -- a calendar-valid `HH:MM` (hour 0-23).
//! - [`BroadcastTime`] -- a listing time that may run past midnight
//!   (`"25:30"` meaning 01:30 the next day), which has to be pre-rolled into
//!   a `(weekday, ClockTime)` pair before any timezone arithmetic happens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use simulcast_common::{Error, Result};

use crate::weekday;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Split `"HH:MM"` into two integers.
///
/// Anything after a `~` is ignored so listing ranges such as `"25:30~"`
/// parse as their start time.
fn split_hour_minute(raw: &str) -> Result<(u16, u16)> {
    let start = raw.split('~').next().unwrap_or(raw).trim();
    let mut parts = start.split(':');

    let (Some(hour), Some(minute), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::invalid_time_format(raw));
    };

    let hour = hour
        .trim()
        .parse::<u16>()
        .map_err(|_| Error::invalid_time_format(raw))?;
    let minute = minute
        .trim()
        .parse::<u16>()
        .map_err(|_| Error::invalid_time_format(raw))?;

    if minute >= 60 {
        return Err(Error::invalid_time_format(raw));
    }

    Ok((hour, minute))
}

// ---------------------------------------------------------------------------
// ClockTime
// ---------------------------------------------------------------------------

/// A calendar-valid time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Create a clock time, rejecting hours above 23 or minutes above 59.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(Error::invalid_time_format(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.hour)
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minute)
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }

    /// Absolute distance to `other` in minutes, measured within one day.
    ///
    /// Does not wrap around midnight: `23:30` and `00:10` are 1400 minutes
    /// apart, not 40.
    pub fn minutes_between(&self, other: &ClockTime) -> u16 {
        self.minutes_since_midnight()
            .abs_diff(other.minutes_since_midnight())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (hour, minute) = split_hour_minute(s)?;
        if hour > 23 {
            return Err(Error::invalid_time_format(s));
        }
        Self::new(u32::from(hour), u32::from(minute))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// BroadcastTime
// ---------------------------------------------------------------------------

/// A listing time that may exceed 23 hours.
///
/// Late-night listings keep counting past midnight so a show stays on the
/// broadcaster's "day": `"25:15"` on Saturday airs at 01:15 on Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastTime {
    minutes: u16,
}

impl BroadcastTime {
    /// Latest hour accepted on the broadcaster's clock.
    pub const MAX_HOUR: u16 = 47;

    /// Whether this time runs past midnight of the listed day.
    pub fn is_past_midnight(&self) -> bool {
        self.minutes >= MINUTES_PER_DAY
    }

    /// Fold the time back onto a calendar-valid clock, advancing `weekday`
    /// by one when the listing ran past midnight.
    pub fn preroll(&self, weekday: u8) -> Result<(u8, ClockTime)> {
        let days = self.minutes / MINUTES_PER_DAY;
        let within_day = self.minutes % MINUTES_PER_DAY;
        let clock = ClockTime::new(u32::from(within_day / 60), u32::from(within_day % 60))?;
        Ok((weekday::shift(weekday, i64::from(days)), clock))
    }
}

impl fmt::Display for BroadcastTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

impl FromStr for BroadcastTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (hour, minute) = split_hour_minute(s)?;
        if hour > Self::MAX_HOUR {
            return Err(Error::invalid_time_format(s));
        }
        Ok(Self {
            minutes: hour * 60 + minute,
        })
    }
}

/// Pre-roll a raw listing `(weekday, "HH:MM")` pair onto the calendar clock.
///
/// Times at or below 23:59 pass through unchanged.
pub fn preroll(weekday: u8, raw_time: &str) -> Result<(u8, ClockTime)> {
    raw_time.parse::<BroadcastTime>()?.preroll(weekday)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock_time() {
        let t: ClockTime = "09:05".parse().unwrap();
        assert_eq!((t.hour(), t.minute()), (9, 5));
        assert_eq!(t.to_string(), "09:05");

        let t: ClockTime = "7:30".parse().unwrap();
        assert_eq!(t.to_string(), "07:30");
    }

    #[test]
    fn test_reject_malformed_clock_time() {
        for raw in ["", "7", "7.30", "ab:cd", "12:30:00", "24:00", "12:60", "-1:00"] {
            let err = raw.parse::<ClockTime>().unwrap_err();
            assert!(
                matches!(err, Error::InvalidTimeFormat(_)),
                "expected InvalidTimeFormat for {raw:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_minutes_between_does_not_wrap() {
        let a: ClockTime = "10:00".parse().unwrap();
        let b: ClockTime = "11:00".parse().unwrap();
        assert_eq!(a.minutes_between(&b), 60);
        assert_eq!(b.minutes_between(&a), 60);

        let late: ClockTime = "23:30".parse().unwrap();
        let early: ClockTime = "00:10".parse().unwrap();
        assert_eq!(late.minutes_between(&early), 1400);
    }

    #[test]
    fn test_clock_time_serde() {
        let t: ClockTime = serde_json::from_str("\"21:45\"").unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"21:45\"");
        assert!(serde_json::from_str::<ClockTime>("\"nope\"").is_err());
    }

    #[test]
    fn test_preroll_past_midnight() {
        // Saturday 25:15 airs Sunday 01:15.
        let (day, time) = preroll(5, "25:15").unwrap();
        assert_eq!(day, 6);
        assert_eq!(time.to_string(), "01:15");

        // Sunday 24:00 wraps to Monday.
        let (day, time) = preroll(6, "24:00").unwrap();
        assert_eq!(day, 0);
        assert_eq!(time.to_string(), "00:00");
    }

    #[test]
    fn test_preroll_passes_regular_times_through() {
        let (day, time) = preroll(2, "23:59").unwrap();
        assert_eq!(day, 2);
        assert_eq!(time.to_string(), "23:59");
    }

    #[test]
    fn test_preroll_accepts_listing_ranges() {
        let (day, time) = preroll(0, "26:00~26:30").unwrap();
        assert_eq!(day, 1);
        assert_eq!(time.to_string(), "02:00");
    }

    #[test]
    fn test_broadcast_time_limits() {
        assert!("47:59".parse::<BroadcastTime>().is_ok());
        assert!("48:00".parse::<BroadcastTime>().is_err());
        assert!("25:30".parse::<BroadcastTime>().unwrap().is_past_midnight());
        assert!(!"23:30".parse::<BroadcastTime>().unwrap().is_past_midnight());
    }
}
