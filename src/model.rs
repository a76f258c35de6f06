use crate::error::{KardexError, Result};
use crate::key::RecordKey;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A keyed entity that a [`crate::store::RecordStore`] can hold.
///
/// Implementations own their key and their domain invariants. `validate` is
/// called by the store on every insert and after every update, so a record
/// that made it into a store always satisfies its bounds.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// The unique key of this record.
    fn key(&self) -> &RecordKey;

    /// Stable secondary ordering used by `list` (e.g. holder name, title).
    fn sort_key(&self) -> String;

    /// Check domain invariants (field shapes, numeric bounds).
    fn validate(&self) -> Result<()>;
}

/// Trim `value` and reject blank input, naming the offending field.
pub(crate) fn required_text(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(KardexError::validation(field, "must not be blank"));
    }
    Ok(trimmed.to_string())
}
