//! # Storage Layer
//!
//! A [`RecordStore`] keeps one collection of keyed records in memory and
//! mirrors every successful mutation to a [`StoreBackend`] before the
//! operation reports success.
//!
//! Storage is abstracted behind a trait to:
//! - Enable testing with [`memory::MemoryBackend`] (no filesystem needed)
//! - Keep domain services decoupled from where documents live
//!
//! ## Implementations
//!
//! - [`fs::FileBackend`]: one pretty-printed JSON document per store,
//!   a map from key to record object
//! - [`memory::MemoryBackend`]: in-memory document for tests, with an
//!   optional fail-saves switch to exercise persistence-error paths
//!
//! ## Failure semantics
//!
//! Validation and lookup failures never touch the backend. When a mutation
//! has been applied in memory but the save fails, the in-memory change is
//! kept and the error is surfaced so the caller may retry via
//! [`RecordStore::flush`].

use crate::error::{KardexError, Result};
use crate::key::RecordKey;
use crate::model::Record;
use std::collections::BTreeMap;
use tracing::warn;

pub mod fs;
pub mod memory;

/// Abstract persistence for one store document.
pub trait StoreBackend<R: Record> {
    /// Read the whole document. A missing document is an empty map, not an
    /// error; unparsable content is [`KardexError::CorruptStore`].
    fn load(&self) -> Result<BTreeMap<RecordKey, R>>;

    /// Write the whole document.
    fn save(&mut self, records: &BTreeMap<RecordKey, R>) -> Result<()>;
}

/// An in-memory collection of keyed records plus its persisted document.
pub struct RecordStore<R: Record, B: StoreBackend<R>> {
    backend: B,
    records: BTreeMap<RecordKey, R>,
}

impl<R: Record, B: StoreBackend<R>> RecordStore<R, B> {
    /// Open a store, loading whatever the backend holds.
    ///
    /// A corrupt document is logged and dropped: the store starts empty
    /// rather than refusing to open. I/O failures are still fatal here,
    /// since silently shadowing a readable-but-unreachable document could
    /// lose data on the next save.
    pub fn open(backend: B) -> Result<Self> {
        let records = match backend.load() {
            Ok(records) => records,
            Err(KardexError::CorruptStore { path, reason }) => {
                warn!(
                    path = %path.display(),
                    %reason,
                    "corrupt store document, starting empty"
                );
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        Ok(Self { backend, records })
    }

    /// Insert a new record. Fails with [`KardexError::DuplicateKey`] when
    /// the normalized key is already taken.
    pub fn add(&mut self, record: R) -> Result<()> {
        record.validate()?;
        if self.records.contains_key(record.key()) {
            return Err(KardexError::DuplicateKey(record.key().clone()));
        }
        self.records.insert(record.key().clone(), record);
        self.flush()
    }

    /// Normalized lookup.
    pub fn find(&self, key: &RecordKey) -> Option<&R> {
        self.records.get(key)
    }

    /// Lookup that fails with [`KardexError::NotFound`].
    pub fn get(&self, key: &RecordKey) -> Result<&R> {
        self.records
            .get(key)
            .ok_or_else(|| KardexError::NotFound(key.clone()))
    }

    /// Apply `mutate` to the record at `key`, re-validate, persist.
    ///
    /// The mutator runs on a copy: a failed re-validation leaves the stored
    /// record untouched. Keys are immutable through this path.
    pub fn update(&mut self, key: &RecordKey, mutate: impl FnOnce(&mut R)) -> Result<()> {
        let mut updated = self.get(key)?.clone();
        mutate(&mut updated);
        if updated.key() != key {
            return Err(KardexError::validation("key", "cannot be changed by an update"));
        }
        updated.validate()?;
        self.records.insert(key.clone(), updated);
        self.flush()
    }

    /// Update two distinct records as one committed step.
    ///
    /// Both copies are re-validated before either is swapped in, and the
    /// document is written once, so the backend never sees one side of the
    /// change without the other.
    pub fn update_pair(
        &mut self,
        first: &RecordKey,
        second: &RecordKey,
        mutate: impl FnOnce(&mut R, &mut R),
    ) -> Result<()> {
        if first == second {
            return Err(KardexError::validation(
                "key",
                "paired update requires two distinct records",
            ));
        }
        let mut a = self.get(first)?.clone();
        let mut b = self.get(second)?.clone();
        mutate(&mut a, &mut b);
        if a.key() != first || b.key() != second {
            return Err(KardexError::validation("key", "cannot be changed by an update"));
        }
        a.validate()?;
        b.validate()?;
        self.records.insert(first.clone(), a);
        self.records.insert(second.clone(), b);
        self.flush()
    }

    /// Delete the record at `key`, returning it.
    pub fn remove(&mut self, key: &RecordKey) -> Result<R> {
        let removed = self
            .records
            .remove(key)
            .ok_or_else(|| KardexError::NotFound(key.clone()))?;
        self.flush()?;
        Ok(removed)
    }

    /// All records, ordered by `sort_key` (key breaks ties). Read-only.
    pub fn list(&self) -> Vec<&R> {
        let mut records: Vec<&R> = self.records.values().collect();
        records.sort_by(|a, b| {
            a.sort_key()
                .cmp(&b.sort_key())
                .then_with(|| a.key().cmp(b.key()))
        });
        records
    }

    /// Fold over all records. Returns `init` unchanged on an empty store.
    pub fn aggregate<T>(&self, init: T, mut f: impl FnMut(T, &R) -> T) -> T {
        self.records.values().fold(init, |acc, r| f(acc, r))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write the current in-memory state to the backend.
    pub fn flush(&mut self) -> Result<()> {
        self.backend.save(&self.records)
    }
}
