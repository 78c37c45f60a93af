//! Parsing of free-text broadcast lines.
//!
//! English listings describe a slot as a sentence, e.g.
//! `"Saturdays at 23:00 (JST)"`. Lines that do not carry a weekday, a
//! time and a zone (`"Unknown"`, `"Not scheduled once per week"`) yield
//! `None` and the title is left out of that source's schedule.

use chrono_tz::Tz;

use crate::clock::{BroadcastTime, ClockTime};
use crate::{weekday, zone};

/// A slot read from a broadcast line, still in the broadcaster's zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastSlot {
    pub weekday: u8,
    pub time: ClockTime,
    pub zone: Tz,
}

/// Parse `"<Weekday>s at <HH:MM> (<ZONE>)"`.
///
/// The time may run past midnight; it is pre-rolled onto the calendar
/// clock before being returned.
pub fn parse_broadcast_line(line: &str) -> Option<BroadcastSlot> {
    let line = line.trim().strip_prefix("Broadcast:").unwrap_or(line).trim();
    let mut words = line.split_whitespace();

    let day = weekday::parse_label(words.next()?)?;
    if !words.next()?.eq_ignore_ascii_case("at") {
        return None;
    }
    let time = words.next()?.parse::<BroadcastTime>().ok()?;
    let zone_word = words.next()?;
    let zone_name = zone_word
        .strip_prefix('(')
        .and_then(|z| z.strip_suffix(')'))
        .unwrap_or(zone_word);
    let zone = zone::parse_zone(zone_name).ok()?;

    let (weekday, time) = time.preroll(day).ok()?;
    Some(BroadcastSlot {
        weekday,
        time,
        zone,
    })
}
