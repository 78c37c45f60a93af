//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB and a
//! [`SqliteStore`] over it, plus builders for raw listings and an
//! aggregator pinned to a fixed viewer zone and reference date.

#![allow(dead_code)]

use chrono::{FixedOffset, NaiveDate};
use simulcast::aggregate::Aggregator;
use simulcast_db::pool::{get_conn, init_memory_pool, DbPool, PooledConnection};
use simulcast_db::SqliteStore;
use simulcast_schedule::{
    LocalScheduleEntry, RawScheduleEntry, ScheduleMergeEngine, TimeZoneNormalizer, ViewerZone,
};

/// Test harness wrapping an in-memory database.
pub struct TestHarness {
    pub db: DbPool,
    pub store: SqliteStore,
}

impl TestHarness {
    pub fn new() -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let store = SqliteStore::new(db.clone());
        Self { db, store }
    }

    pub fn conn(&self) -> PooledConnection {
        get_conn(&self.db).expect("failed to get connection")
    }
}

/// A Wednesday in October, outside any DST transition.
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 16).unwrap()
}

/// Normalizer targeting a fixed offset of `hours` east of UTC.
pub fn fixed_normalizer(hours: i32) -> TimeZoneNormalizer {
    TimeZoneNormalizer::new(ViewerZone::Fixed(
        FixedOffset::east_opt(hours * 3600).unwrap(),
    ))
    .with_reference_date(reference_date())
}

/// Aggregator with default merge options and a fixed viewer offset.
pub fn fixed_aggregator(hours: i32) -> Aggregator {
    Aggregator::new(fixed_normalizer(hours), ScheduleMergeEngine::default())
}

pub fn raw(title: &str, day: u8, time: &str, zone: &str) -> RawScheduleEntry {
    RawScheduleEntry {
        title: title.to_string(),
        weekday: day,
        clock_time: time.to_string(),
        source_timezone: zone.to_string(),
        image_url: String::new(),
    }
}

pub fn local(title: &str, day: u8, time: &str) -> LocalScheduleEntry {
    LocalScheduleEntry {
        title: title.to_string(),
        weekday: day,
        clock_time: time.to_string(),
        source_timezone: "Asia/Tokyo".to_string(),
        image_url: String::new(),
    }
}
