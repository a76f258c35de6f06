//! # Kardex Architecture
//!
//! Kardex is a **UI-agnostic record-keeping library**: keyed collections of
//! records (bank accounts, students, books, contacts) persisted as flat,
//! human-readable JSON documents. There is no terminal code here — a CLI,
//! a web UI or a test harness all drive the same API.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade: wires configured file backends to services  │
//! │  - No business logic, no formatting                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Domain Layer (ledger, gradebook, catalog, roster)          │
//! │  - Record types and their invariants                        │
//! │  - Domain operations: deposit, add_grade, checkout, ...     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Generic RecordStore over a StoreBackend trait            │
//! │  - FileBackend (production), MemoryBackend (testing)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principles
//!
//! - **Keys are normalized once.** A [`key::RecordKey`] trims its input and
//!   compares case-insensitively, so `"A01"` and `" a01 "` are the same
//!   record everywhere.
//! - **Every committed mutation is durable.** A store writes its whole
//!   document before an operation reports success. When the write fails,
//!   the in-memory change is kept and the error says so, so the caller can
//!   retry with `flush`.
//! - **Failures are values.** Validation, duplicate-key, not-found,
//!   corrupt-document and persistence failures are distinct
//!   [`error::KardexError`] variants; nothing here panics or exits.
//!
//! ## Module Overview
//!
//! - [`api`]: the [`api::Kardex`] facade — entry point for applications
//! - [`ledger`]: bank accounts with audited balance changes and transfers
//! - [`gradebook`]: students, grades, class statistics
//! - [`catalog`]: library books and availability
//! - [`roster`]: address-book contacts
//! - [`store`]: the generic keyed store and its backends
//! - [`model`], [`key`]: the record abstraction
//! - [`config`]: persisted configuration and data-directory layout
//! - [`error`]: error types

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gradebook;
pub mod key;
pub mod ledger;
pub mod model;
pub mod roster;
pub mod store;

pub use api::Kardex;
pub use config::KardexConfig;
pub use error::{KardexError, Result};
pub use key::RecordKey;
pub use model::Record;
