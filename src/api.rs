//! # API Facade
//!
//! [`Kardex`] is the single entry point for applications: it opens every
//! domain store from one configured data directory and hands out the
//! services. It holds no business logic of its own — that lives in the
//! domain modules — and performs no I/O beyond wiring file backends.

use crate::catalog::{Catalog, CATALOG_FILENAME};
use crate::config::KardexConfig;
use crate::error::Result;
use crate::gradebook::{Gradebook, GRADEBOOK_FILENAME};
use crate::ledger::{Ledger, LEDGER_FILENAME};
use crate::roster::{Roster, ROSTER_FILENAME};
use crate::store::fs::FileBackend;

/// All four stores, file-backed under one data directory.
pub struct Kardex {
    config: KardexConfig,
    ledger: Ledger<FileBackend>,
    gradebook: Gradebook<FileBackend>,
    catalog: Catalog<FileBackend>,
    roster: Roster<FileBackend>,
}

impl Kardex {
    /// Open every store under `config.data_dir`, loading whatever is
    /// already persisted there.
    pub fn open(config: KardexConfig) -> Result<Self> {
        let ledger = Ledger::open(
            FileBackend::new(config.store_path(LEDGER_FILENAME)),
            config.minimum_opening_balance,
        )?;
        let gradebook = Gradebook::open(
            FileBackend::new(config.store_path(GRADEBOOK_FILENAME)),
            config.pass_threshold,
        )?;
        let catalog = Catalog::open(FileBackend::new(config.store_path(CATALOG_FILENAME)))?;
        let roster = Roster::open(FileBackend::new(config.store_path(ROSTER_FILENAME)))?;
        Ok(Self {
            config,
            ledger,
            gradebook,
            catalog,
            roster,
        })
    }

    /// Open using the persisted config of the platform data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(KardexConfig::load(KardexConfig::default_data_dir())?)
    }

    pub fn config(&self) -> &KardexConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger<FileBackend> {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger<FileBackend> {
        &mut self.ledger
    }

    pub fn gradebook(&self) -> &Gradebook<FileBackend> {
        &self.gradebook
    }

    pub fn gradebook_mut(&mut self) -> &mut Gradebook<FileBackend> {
        &mut self.gradebook
    }

    pub fn catalog(&self) -> &Catalog<FileBackend> {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog<FileBackend> {
        &mut self.catalog
    }

    pub fn roster(&self) -> &Roster<FileBackend> {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster<FileBackend> {
        &mut self.roster
    }

    /// Write every store out again. Mutations already persist as they
    /// happen; this is the explicit final flush for shutdown, and the retry
    /// hook after a persistence failure.
    pub fn flush_all(&mut self) -> Result<()> {
        self.ledger.flush()?;
        self.gradebook.flush()?;
        self.catalog.flush()?;
        self.roster.flush()?;
        Ok(())
    }
}
