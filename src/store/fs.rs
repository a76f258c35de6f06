use super::StoreBackend;
use crate::error::{KardexError, Result};
use crate::key::RecordKey;
use crate::model::Record;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// File-based backend: one UTF-8, pretty-printed JSON document per store,
/// a map from key to record object.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn corrupt(&self, reason: impl Into<String>) -> KardexError {
        KardexError::CorruptStore {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}

impl<R: Record> StoreBackend<R> for FileBackend {
    fn load(&self) -> Result<BTreeMap<RecordKey, R>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no store document yet, starting empty");
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(KardexError::Persistence)?;
        let raw: BTreeMap<String, R> =
            serde_json::from_str(&content).map_err(|err| self.corrupt(err.to_string()))?;

        // Documents are hand-editable, so the shape is re-checked at the
        // boundary: every record must satisfy its own invariants and carry
        // the key it is filed under.
        let mut records = BTreeMap::new();
        for (filed_under, record) in raw {
            let key = RecordKey::new(&filed_under)
                .map_err(|_| self.corrupt("blank key in document"))?;
            if record.key() != &key {
                return Err(self.corrupt(format!(
                    "record filed under {:?} carries key {:?}",
                    filed_under,
                    record.key().as_str()
                )));
            }
            record
                .validate()
                .map_err(|err| self.corrupt(format!("record {}: {}", key, err)))?;
            if records.contains_key(&key) {
                warn!(key = %key, "duplicate key in document, keeping the first record");
                continue;
            }
            records.insert(key, record);
        }

        debug!(path = %self.path.display(), count = records.len(), "loaded store document");
        Ok(records)
    }

    fn save(&mut self, records: &BTreeMap<RecordKey, R>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(KardexError::Persistence)?;
            }
        }
        let content = serde_json::to_string_pretty(records)
            .map_err(|err| KardexError::Persistence(err.into()))?;
        fs::write(&self.path, content).map_err(KardexError::Persistence)?;
        debug!(path = %self.path.display(), count = records.len(), "saved store document");
        Ok(())
    }
}
