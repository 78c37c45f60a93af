//! Cross-source identity merge.
//!
//! The [`ScheduleMergeEngine`] folds per-language lists of viewer-local
//! entries into one [`CanonicalRecord`] per title identifier. Titles are
//! resolved to identifiers by exact name through an [`IdentityResolver`];
//! within a record each language keeps its own entry and the last entry
//! seen for a language wins.
//!
//! The fold state is explicit ([`MergeState`]) so repeated passes never
//! share hidden mutable state.

use std::collections::BTreeMap;

use simulcast_common::{Error, Language, Result, TitleId};
use tracing::{debug, info, warn};

use crate::entry::{CanonicalRecord, LocalScheduleEntry, Slot};
use crate::resolver::IdentityResolver;

/// Default slot-matching window.
pub const DEFAULT_MATCH_WINDOW_MINUTES: u16 = 60;

/// Tuning for a merge pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Languages in processing order. Languages present in the input but
    /// missing here are processed afterwards, in [`Language::ALL`] order.
    pub priority: Vec<Language>,
    /// Maximum same-day distance for two entries to share a slot.
    pub window_minutes: u16,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            priority: Language::ALL.to_vec(),
            window_minutes: DEFAULT_MATCH_WINDOW_MINUTES,
        }
    }
}

/// Accumulated records of a merge pass, keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeState {
    records: BTreeMap<TitleId, CanonicalRecord>,
}

impl MergeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: TitleId) -> Option<&CanonicalRecord> {
        self.records.get(&id)
    }

    pub fn records(&self) -> impl Iterator<Item = &CanonicalRecord> {
        self.records.values()
    }

    /// Records in identifier order, ready for an upsert.
    pub fn into_records(self) -> Vec<CanonicalRecord> {
        self.records.into_values().collect()
    }
}

/// An entry the engine refused to merge.
#[derive(Debug)]
pub struct RejectedEntry {
    pub language: Language,
    /// Position of the entry in its source list.
    pub index: usize,
    pub title: String,
    /// Always [`Error::MalformedEntry`].
    pub error: Error,
}

/// Result of one merge pass.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub state: MergeState,
    /// Entries written into a record.
    pub merged: usize,
    /// Entries that landed in a slot already held by another language.
    pub slot_matches: usize,
    pub rejected: Vec<RejectedEntry>,
}

/// Folds per-language schedules into canonical records.
#[derive(Debug, Clone, Default)]
pub struct ScheduleMergeEngine {
    options: MergeOptions,
}

impl ScheduleMergeEngine {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge `lists` into a fresh state.
    ///
    /// # Errors
    ///
    /// Fails only when the resolver fails; malformed entries are skipped
    /// and reported in [`MergeOutcome::rejected`].
    pub fn merge<R>(
        &self,
        lists: &BTreeMap<Language, Vec<LocalScheduleEntry>>,
        resolver: &mut R,
    ) -> Result<MergeOutcome>
    where
        R: IdentityResolver + ?Sized,
    {
        self.merge_into(MergeState::new(), lists, resolver)
    }

    /// Merge `lists` on top of an existing fold state.
    pub fn merge_into<R>(
        &self,
        state: MergeState,
        lists: &BTreeMap<Language, Vec<LocalScheduleEntry>>,
        resolver: &mut R,
    ) -> Result<MergeOutcome>
    where
        R: IdentityResolver + ?Sized,
    {
        let mut outcome = MergeOutcome {
            state,
            ..MergeOutcome::default()
        };

        for language in self.processing_order(lists) {
            let Some(entries) = lists.get(&language) else {
                continue;
            };

            for (index, entry) in entries.iter().enumerate() {
                let slot = match entry.validate() {
                    Ok(slot) => slot,
                    Err(error) => {
                        warn!(
                            language = %language,
                            index,
                            title = %entry.title,
                            error = %error,
                            "Skipping malformed schedule entry"
                        );
                        outcome.rejected.push(RejectedEntry {
                            language,
                            index,
                            title: entry.title.clone(),
                            error,
                        });
                        continue;
                    }
                };

                let id = resolver.resolve_or_create(&entry.title)?;
                let matched = self.insert(&mut outcome.state, id, language, slot, entry)?;

                outcome.merged += 1;
                if matched.is_some() {
                    outcome.slot_matches += 1;
                }
            }
        }

        info!(
            records = outcome.state.len(),
            merged = outcome.merged,
            slot_matches = outcome.slot_matches,
            rejected = outcome.rejected.len(),
            "Merge pass complete"
        );

        Ok(outcome)
    }

    /// Languages in the order they are folded.
    pub fn processing_order(
        &self,
        lists: &BTreeMap<Language, Vec<LocalScheduleEntry>>,
    ) -> Vec<Language> {
        let mut order: Vec<Language> = Vec::with_capacity(lists.len());
        for language in self.options.priority.iter().chain(Language::ALL.iter()) {
            if lists.contains_key(language) && !order.contains(language) {
                order.push(*language);
            }
        }
        order
    }

    /// Record `entry` under `language` in the record for `id`.
    ///
    /// Returns the language of an existing translation sharing the slot, if
    /// any. The match only identifies the entry as the same broadcast; it
    /// never touches the other language's entry.
    fn insert(
        &self,
        state: &mut MergeState,
        id: TitleId,
        language: Language,
        slot: Slot,
        entry: &LocalScheduleEntry,
    ) -> Result<Option<Language>> {
        let Some(record) = state.records.get_mut(&id) else {
            debug!(title_id = %id, language = %language, title = %entry.title, "New canonical record");
            state
                .records
                .insert(id, CanonicalRecord::new(id, language, entry.clone()));
            return Ok(None);
        };

        let mut matched = None;
        for (existing_language, existing) in &record.translations {
            if *existing_language == language {
                continue;
            }
            let existing_slot = existing.validate()?;
            if existing_slot.is_within(&slot, self.options.window_minutes) {
                matched = Some(*existing_language);
                break;
            }
        }

        match matched {
            Some(anchor) => debug!(
                title_id = %id,
                language = %language,
                anchor = %anchor,
                "Entry shares a slot with an existing translation"
            ),
            None => debug!(
                title_id = %id,
                language = %language,
                "Entry does not share a slot with existing translations"
            ),
        }

        if record.translations.insert(language, entry.clone()).is_some() {
            debug!(title_id = %id, language = %language, "Replaced earlier entry for language");
        }

        Ok(matched)
    }
}
