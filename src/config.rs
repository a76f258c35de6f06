use crate::error::{KardexError, Result};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_PASS_THRESHOLD: f64 = 10.0;

/// Configuration for a kardex data directory, stored as `config.json`
/// alongside the store documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KardexConfig {
    /// Where store documents live. Not persisted: the directory the config
    /// was loaded from is authoritative.
    #[serde(skip)]
    pub data_dir: PathBuf,

    /// Gradebook admission threshold, on the 0-20 scale.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,

    /// Smallest balance an account may be opened with.
    #[serde(default)]
    pub minimum_opening_balance: Decimal,
}

fn default_pass_threshold() -> f64 {
    DEFAULT_PASS_THRESHOLD
}

impl Default for KardexConfig {
    fn default() -> Self {
        Self::new(Self::default_data_dir())
    }
}

impl KardexConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            minimum_opening_balance: Decimal::ZERO,
        }
    }

    /// Platform data directory for kardex (e.g. `~/.local/share/kardex`),
    /// falling back to a local `.kardex/` when the platform gives us none.
    pub fn default_data_dir() -> PathBuf {
        ProjectDirs::from("", "", "kardex")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".kardex"))
    }

    /// Load config from `data_dir`, or return defaults if not found.
    pub fn load<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let config_path = data_dir.join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::new(data_dir));
        }

        let content = fs::read_to_string(&config_path).map_err(KardexError::Persistence)?;
        let mut config: KardexConfig =
            serde_json::from_str(&content).map_err(|err| KardexError::CorruptStore {
                path: config_path,
                reason: err.to_string(),
            })?;
        config.data_dir = data_dir.to_path_buf();
        Ok(config)
    }

    /// Save config into the data directory, creating it first.
    pub fn save(&self) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir).map_err(KardexError::Persistence)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|err| KardexError::Persistence(err.into()))?;
        fs::write(self.data_dir.join(CONFIG_FILENAME), content).map_err(KardexError::Persistence)?;
        Ok(())
    }

    /// Path of a store document inside the data directory.
    pub fn store_path(&self, filename: &str) -> PathBuf {
        self.data_dir.join(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[test]
    fn defaults() {
        let config = KardexConfig::new("/tmp/kardex-test");
        assert_eq!(config.pass_threshold, 10.0);
        assert_eq!(config.minimum_opening_balance, Decimal::ZERO);
    }

    #[test]
    fn load_missing_config_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = KardexConfig::load(dir.path()).unwrap();
        assert_eq!(config.pass_threshold, 10.0);
        assert_eq!(config.data_dir, dir.path());
    }

    #[test]
    fn save_and_load() {
        let dir = tempdir().unwrap();
        let mut config = KardexConfig::new(dir.path());
        config.pass_threshold = 12.0;
        config.minimum_opening_balance = dec!(500);
        config.save().unwrap();

        let loaded = KardexConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.pass_threshold, 12.0);
        assert_eq!(loaded.minimum_opening_balance, dec!(500));
    }

    #[test]
    fn missing_fields_take_their_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{}").unwrap();

        let config = KardexConfig::load(dir.path()).unwrap();
        assert_eq!(config.pass_threshold, 10.0);
        assert_eq!(config.minimum_opening_balance, Decimal::ZERO);
    }

    #[test]
    fn unparsable_config_is_a_corrupt_store_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "not json").unwrap();

        let err = KardexConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, KardexError::CorruptStore { .. }));
    }

    #[test]
    fn store_path_joins_the_data_dir() {
        let config = KardexConfig::new("/data/kardex");
        assert_eq!(
            config.store_path("ledger.json"),
            PathBuf::from("/data/kardex/ledger.json")
        );
    }
}
