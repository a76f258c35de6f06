use crate::error::{KardexError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The unique identifier of a record within a store.
///
/// The raw input is trimmed once at construction and kept for display and
/// serialization; equality, ordering and hashing are case-insensitive, so
/// `"a01"` and `"A01"` address the same record.
#[derive(Debug, Clone)]
pub struct RecordKey(String);

impl RecordKey {
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(KardexError::validation("key", "must not be blank"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded form used for comparisons.
    pub fn folded(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq for RecordKey {
    fn eq(&self, other: &Self) -> bool {
        self.folded() == other.folded()
    }
}

impl Eq for RecordKey {}

impl Hash for RecordKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded().hash(state);
    }
}

impl PartialOrd for RecordKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RecordKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(&other.folded())
    }
}

// Keys serialize as plain strings so a persisted document stays a readable
// key-to-record JSON object.
impl Serialize for RecordKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RecordKey::new(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let key = RecordKey::new("  A01  ").unwrap();
        assert_eq!(key.as_str(), "A01");
    }

    #[test]
    fn rejects_blank_input() {
        assert!(RecordKey::new("   ").is_err());
        assert!(RecordKey::new("").is_err());
    }

    #[test]
    fn comparison_ignores_case() {
        let upper = RecordKey::new("A01").unwrap();
        let lower = RecordKey::new("a01").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.cmp(&lower), Ordering::Equal);
    }

    #[test]
    fn display_keeps_the_original_casing() {
        let key = RecordKey::new("Le Petit Prince").unwrap();
        assert_eq!(key.to_string(), "Le Petit Prince");
    }

    #[test]
    fn serializes_as_a_plain_string() {
        let key = RecordKey::new("E001").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"E001\"");

        let parsed: RecordKey = serde_json::from_str("\" e001 \"").unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn deserializing_a_blank_key_fails() {
        let result: std::result::Result<RecordKey, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }
}
