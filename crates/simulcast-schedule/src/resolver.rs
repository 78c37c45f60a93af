//! Collaborator traits for identity lookup and record persistence.
//!
//! The merge engine never talks to a database directly. It asks an
//! [`IdentityResolver`] for a title's identifier and hands the finished
//! records to a [`RecordSink`]. `simulcast-db` implements both on SQLite;
//! [`MemoryStore`] implements both in process for dry runs and tests.

use std::collections::{BTreeMap, HashMap};

use simulcast_common::{Result, TitleId};

use crate::entry::{CanonicalRecord, TitleIdentity};

/// Get-or-create lookup of title identifiers by exact name.
///
/// Implementations must be idempotent: the same name always yields the
/// same identifier, and concurrent first sightings of a name must never
/// mint two identifiers.
pub trait IdentityResolver {
    /// Return the identifier for `name`, minting one on first sighting.
    fn resolve_or_create(&mut self, name: &str) -> Result<TitleId>;
}

/// Destination for merged canonical records.
pub trait RecordSink {
    /// Replace the stored record of every given identifier wholesale.
    ///
    /// Returns the number of records written.
    fn upsert_records(&mut self, records: &[CanonicalRecord]) -> Result<usize>;
}

impl<T: IdentityResolver + ?Sized> IdentityResolver for &mut T {
    fn resolve_or_create(&mut self, name: &str) -> Result<TitleId> {
        (**self).resolve_or_create(name)
    }
}

impl<T: RecordSink + ?Sized> RecordSink for &mut T {
    fn upsert_records(&mut self, records: &[CanonicalRecord]) -> Result<usize> {
        (**self).upsert_records(records)
    }
}

/// In-process identity table and record store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    identities: HashMap<String, TitleId>,
    records: BTreeMap<TitleId, CanonicalRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier previously minted for `name`, without creating one.
    pub fn find(&self, name: &str) -> Option<TitleId> {
        self.identities.get(name).copied()
    }

    /// All known identities, sorted by name.
    pub fn identities(&self) -> Vec<TitleIdentity> {
        let mut identities: Vec<_> = self
            .identities
            .iter()
            .map(|(name, id)| TitleIdentity {
                id: *id,
                canonical_name: name.clone(),
            })
            .collect();
        identities.sort_by(|a, b| a.canonical_name.cmp(&b.canonical_name));
        identities
    }

    pub fn record(&self, id: TitleId) -> Option<&CanonicalRecord> {
        self.records.get(&id)
    }

    pub fn records(&self) -> impl Iterator<Item = &CanonicalRecord> {
        self.records.values()
    }
}

impl IdentityResolver for MemoryStore {
    fn resolve_or_create(&mut self, name: &str) -> Result<TitleId> {
        Ok(*self
            .identities
            .entry(name.to_string())
            .or_insert_with(TitleId::new))
    }
}

impl RecordSink for MemoryStore {
    fn upsert_records(&mut self, records: &[CanonicalRecord]) -> Result<usize> {
        for record in records {
            self.records.insert(record.id, record.clone());
        }
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::LocalScheduleEntry;
    use simulcast_common::Language;

    #[test]
    fn test_same_name_same_id() {
        let mut store = MemoryStore::new();
        let a = store.resolve_or_create("Show X").unwrap();
        let b = store.resolve_or_create("Show X").unwrap();
        assert_eq!(a, b);
        assert_eq!(store.find("Show X"), Some(a));
    }

    #[test]
    fn test_distinct_names_distinct_ids() {
        let mut store = MemoryStore::new();
        let a = store.resolve_or_create("Show X").unwrap();
        let b = store.resolve_or_create("Show Y").unwrap();
        assert_ne!(a, b);
        // Matching is verbatim; case and spacing count.
        let c = store.resolve_or_create("show x").unwrap();
        assert_ne!(a, c);
        assert_eq!(store.identities().len(), 3);
    }

    #[test]
    fn test_upsert_replaces_wholesale() {
        let mut store = MemoryStore::new();
        let id = store.resolve_or_create("Foo").unwrap();
        let entry = LocalScheduleEntry {
            title: "Foo".into(),
            weekday: 0,
            clock_time: "10:00".into(),
            source_timezone: "Asia/Tokyo".into(),
            image_url: String::new(),
        };

        let mut first = CanonicalRecord::new(id, Language::Chs, entry.clone());
        first.translations.insert(Language::Eng, entry.clone());
        store.upsert_records(&[first]).unwrap();

        let second = CanonicalRecord::new(id, Language::Cht, entry);
        assert_eq!(store.upsert_records(&[second]).unwrap(), 1);

        let stored = store.record(id).unwrap();
        assert_eq!(stored.translations.len(), 1);
        assert!(stored.translation(Language::Cht).is_some());
    }
}
