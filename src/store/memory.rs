use super::StoreBackend;
use crate::error::{KardexError, Result};
use crate::key::RecordKey;
use crate::model::Record;
use std::collections::BTreeMap;

/// In-memory backend for tests and development. Does NOT persist data.
#[derive(Default)]
pub struct MemoryBackend<R: Record> {
    document: BTreeMap<RecordKey, R>,
    fail_saves: bool,
}

impl<R: Record> MemoryBackend<R> {
    pub fn new() -> Self {
        Self {
            document: BTreeMap::new(),
            fail_saves: false,
        }
    }

    /// Make every save fail with a persistence error, so callers can
    /// exercise the keep-in-memory-and-retry path.
    pub fn fail_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    /// Seed the backend with an existing document (what a store would find
    /// on open).
    pub fn with_document(mut self, document: BTreeMap<RecordKey, R>) -> Self {
        self.document = document;
        self
    }
}

impl<R: Record> StoreBackend<R> for MemoryBackend<R> {
    fn load(&self) -> Result<BTreeMap<RecordKey, R>> {
        Ok(self.document.clone())
    }

    fn save(&mut self, records: &BTreeMap<RecordKey, R>) -> Result<()> {
        if self.fail_saves {
            return Err(KardexError::Persistence(std::io::Error::other(
                "saves disabled for this backend",
            )));
        }
        self.document = records.clone();
        Ok(())
    }
}
