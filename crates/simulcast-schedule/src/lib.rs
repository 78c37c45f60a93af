//! Simulcast-Schedule: broadcast schedule normalization and merging.
//!
//! Regional listing sites publish the same show with their own clock
//! conventions. This crate turns their rows into one canonical record per
//! title:
//!
//! - [`clock`] -- `HH:MM` parsing and the past-midnight (`"25:30"`) pre-roll
//! - [`weekday`] -- weekday arithmetic and listing labels (`Saturdays`, `六`)
//! - [`zone`] -- source and viewer timezone lookup
//! - [`normalize`] -- [`TimeZoneNormalizer`], source slot to viewer slot
//! - [`merge`] -- [`ScheduleMergeEngine`], per-language lists to records
//! - [`resolver`] -- identity and persistence collaborator traits
//! - [`broadcast`], [`season`] -- helpers for listing text
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use chrono::{FixedOffset, NaiveDate};
//! use simulcast_common::Language;
//! use simulcast_schedule::{
//!     MemoryStore, RawScheduleEntry, ScheduleMergeEngine, TimeZoneNormalizer, ViewerZone,
//! };
//!
//! let normalizer = TimeZoneNormalizer::new(ViewerZone::Fixed(FixedOffset::east_opt(3600).unwrap()))
//!     .with_reference_date(NaiveDate::from_ymd_opt(2024, 10, 16).unwrap());
//!
//! let raw = RawScheduleEntry {
//!     title: "Foo".into(),
//!     weekday: 2,
//!     clock_time: "23:30".into(),
//!     source_timezone: "Asia/Tokyo".into(),
//!     image_url: String::new(),
//! };
//! let local = normalizer.normalize_entry(&raw.prerolled().unwrap(), None).unwrap();
//! assert_eq!((local.weekday, local.clock_time.as_str()), (2, "15:30"));
//!
//! let mut lists = BTreeMap::new();
//! lists.insert(Language::Eng, vec![local]);
//!
//! let mut store = MemoryStore::new();
//! let outcome = ScheduleMergeEngine::default().merge(&lists, &mut store).unwrap();
//! assert_eq!(outcome.state.len(), 1);
//! ```

pub mod broadcast;
pub mod clock;
pub mod entry;
pub mod merge;
pub mod normalize;
pub mod resolver;
pub mod season;
pub mod weekday;
pub mod zone;

pub use broadcast::{parse_broadcast_line, BroadcastSlot};
pub use clock::{BroadcastTime, ClockTime};
pub use entry::{CanonicalRecord, LocalScheduleEntry, RawScheduleEntry, Slot, TitleIdentity};
pub use merge::{MergeOptions, MergeOutcome, MergeState, RejectedEntry, ScheduleMergeEngine};
pub use normalize::TimeZoneNormalizer;
pub use resolver::{IdentityResolver, MemoryStore, RecordSink};
pub use season::{Quarter, Season};
pub use zone::{parse_zone, ViewerZone};
