use crate::key::RecordKey;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KardexError {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("duplicate key: {0}")]
    DuplicateKey(RecordKey),

    #[error("record not found: {0}")]
    NotFound(RecordKey),

    #[error("corrupt store document {path}: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    #[error("persistence failure: {0}")]
    Persistence(#[from] std::io::Error),
}

impl KardexError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Whether the caller can fix the call and retry (as opposed to an I/O
    /// or document-level failure).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::DuplicateKey(_) | Self::NotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, KardexError>;
