//! One aggregation pass: raw per-language listings in, stored records out.
//!
//! Raw entries are pre-rolled onto the calendar clock, normalized into the
//! viewer's zone, folded by the merge engine, and handed to the store in a
//! single batch. Entries that fail any per-entry step are skipped and
//! reported; only identity and store failures abort the pass.

use std::collections::BTreeMap;

use chrono_tz::Tz;
use simulcast_common::{Error, Language, Result};
use simulcast_schedule::{
    CanonicalRecord, IdentityResolver, LocalScheduleEntry, RawScheduleEntry, RecordSink,
    ScheduleMergeEngine, TimeZoneNormalizer,
};
use tracing::{info, warn};

use crate::config::Config;
use crate::listing::SourceListing;

/// A raw entry left out of the pass.
#[derive(Debug)]
pub struct SkippedEntry {
    pub language: Language,
    /// Position in the raw list supplied for `language`.
    pub index: usize,
    pub title: String,
    pub error: Error,
}

/// Summary of one aggregation pass.
#[derive(Debug, Default)]
pub struct AggregationReport {
    /// Canonical records produced by the pass, in identifier order.
    pub records: Vec<CanonicalRecord>,
    /// Raw entries that survived normalization.
    pub normalized: usize,
    /// Entries that shared a slot with another language's entry.
    pub slot_matches: usize,
    /// Records handed to the store.
    pub written: usize,
    pub skipped: Vec<SkippedEntry>,
}

/// Viewer-local lists plus, per language, each local entry's raw index.
type NormalizedLists = (
    BTreeMap<Language, Vec<LocalScheduleEntry>>,
    BTreeMap<Language, Vec<usize>>,
);

/// Runs normalization and merging for a set of source listings.
#[derive(Debug, Clone)]
pub struct Aggregator {
    normalizer: TimeZoneNormalizer,
    engine: ScheduleMergeEngine,
    source_zones: BTreeMap<Language, Tz>,
}

impl Aggregator {
    pub fn new(normalizer: TimeZoneNormalizer, engine: ScheduleMergeEngine) -> Self {
        Self {
            normalizer,
            engine,
            source_zones: BTreeMap::new(),
        }
    }

    /// Build from the `[schedule]` and `[[sources]]` configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let normalizer = TimeZoneNormalizer::new(config.viewer_zone()?);
        let engine = ScheduleMergeEngine::new(config.merge_options());
        Ok(Self {
            normalizer,
            engine,
            source_zones: config.source_zones()?,
        })
    }

    /// Zone assumed for `language` entries that do not name one.
    #[must_use]
    pub fn with_source_zone(mut self, language: Language, zone: Tz) -> Self {
        self.source_zones.insert(language, zone);
        self
    }

    #[must_use]
    pub fn with_normalizer(mut self, normalizer: TimeZoneNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn normalizer(&self) -> &TimeZoneNormalizer {
        &self.normalizer
    }

    /// Pre-roll and normalize every listing, collecting the failures.
    ///
    /// Rows that already failed to decode are skipped with their own error.
    pub fn normalize_lists(
        &self,
        listings: BTreeMap<Language, SourceListing>,
        skipped: &mut Vec<SkippedEntry>,
    ) -> Result<NormalizedLists> {
        let mut lists = BTreeMap::new();
        let mut origins = BTreeMap::new();

        for (language, listing) in listings {
            let default_zone = self.source_zones.get(&language).copied();
            let mut local = Vec::with_capacity(listing.len());
            let mut indices = Vec::with_capacity(listing.len());

            for (index, decoded) in listing.into_iter().enumerate() {
                let (title, result) = match decoded {
                    Ok(raw) => {
                        let result = raw.prerolled().and_then(|rolled| {
                            self.normalizer.normalize_entry(&rolled, default_zone)
                        });
                        (raw.title, result)
                    }
                    Err(error) => (rejected_title(&error), Err(error)),
                };

                match result {
                    Ok(entry) => {
                        local.push(entry);
                        indices.push(index);
                    }
                    Err(error) if error.is_entry_level() => {
                        warn!(
                            language = %language,
                            index,
                            title = %title,
                            error = %error,
                            "Skipping schedule entry that failed to normalize"
                        );
                        skipped.push(SkippedEntry {
                            language,
                            index,
                            title,
                            error,
                        });
                    }
                    Err(error) => return Err(error),
                }
            }

            lists.insert(language, local);
            origins.insert(language, indices);
        }

        Ok((lists, origins))
    }

    /// Normalize and merge `raw_lists` without writing anything.
    pub fn preview<R>(
        &self,
        raw_lists: &BTreeMap<Language, Vec<RawScheduleEntry>>,
        resolver: &mut R,
    ) -> Result<AggregationReport>
    where
        R: IdentityResolver + ?Sized,
    {
        self.preview_listings(as_listings(raw_lists), resolver)
    }

    /// Normalize and merge decoded listings without writing anything.
    pub fn preview_listings<R>(
        &self,
        listings: BTreeMap<Language, SourceListing>,
        resolver: &mut R,
    ) -> Result<AggregationReport>
    where
        R: IdentityResolver + ?Sized,
    {
        let mut skipped = Vec::new();
        let (lists, origins) = self.normalize_lists(listings, &mut skipped)?;
        let normalized = lists.values().map(Vec::len).sum();

        let outcome = self.engine.merge(&lists, resolver)?;

        for rejected in outcome.rejected {
            let index = origins
                .get(&rejected.language)
                .and_then(|indices| indices.get(rejected.index))
                .copied()
                .unwrap_or(rejected.index);
            skipped.push(SkippedEntry {
                language: rejected.language,
                index,
                title: rejected.title,
                error: rejected.error,
            });
        }
        skipped.sort_by_key(|s| (s.language, s.index));

        Ok(AggregationReport {
            records: outcome.state.into_records(),
            normalized,
            slot_matches: outcome.slot_matches,
            written: 0,
            skipped,
        })
    }

    /// Run a full pass and write the resulting records to `store`.
    ///
    /// # Errors
    ///
    /// Fails if identity resolution or the final write fails. Nothing is
    /// written in that case.
    pub fn run<S>(
        &self,
        raw_lists: &BTreeMap<Language, Vec<RawScheduleEntry>>,
        store: &mut S,
    ) -> Result<AggregationReport>
    where
        S: IdentityResolver + RecordSink + ?Sized,
    {
        self.run_listings(as_listings(raw_lists), store)
    }

    /// [`Aggregator::run`] over decoded listings.
    pub fn run_listings<S>(
        &self,
        listings: BTreeMap<Language, SourceListing>,
        store: &mut S,
    ) -> Result<AggregationReport>
    where
        S: IdentityResolver + RecordSink + ?Sized,
    {
        let mut report = self.preview_listings(listings, store)?;
        report.written = store.upsert_records(&report.records)?;

        info!(
            records = report.records.len(),
            normalized = report.normalized,
            slot_matches = report.slot_matches,
            skipped = report.skipped.len(),
            written = report.written,
            "Aggregation pass complete"
        );

        Ok(report)
    }
}

fn as_listings(
    raw_lists: &BTreeMap<Language, Vec<RawScheduleEntry>>,
) -> BTreeMap<Language, SourceListing> {
    raw_lists
        .iter()
        .map(|(&language, entries)| (language, entries.iter().cloned().map(Ok).collect()))
        .collect()
}

fn rejected_title(error: &Error) -> String {
    match error {
        Error::MalformedEntry { title, .. } => title.clone(),
        _ => String::new(),
    }
}
