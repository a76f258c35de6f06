//! Library books and their availability.

use crate::error::{KardexError, Result};
use crate::key::RecordKey;
use crate::model::{required_text, Record};
use crate::store::{RecordStore, StoreBackend};
use serde::{Deserialize, Serialize};

pub const CATALOG_FILENAME: &str = "catalog.json";

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: RecordKey,
    pub author: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

impl Book {
    pub fn new(title: &str, author: &str) -> Result<Self> {
        Ok(Self {
            title: RecordKey::new(title)?,
            author: required_text("author", author)?,
            available: true,
        })
    }
}

impl Record for Book {
    fn key(&self) -> &RecordKey {
        &self.title
    }

    fn sort_key(&self) -> String {
        self.title.folded()
    }

    fn validate(&self) -> Result<()> {
        if self.author.trim().is_empty() {
            return Err(KardexError::validation("author", "must not be blank"));
        }
        Ok(())
    }
}

pub struct Catalog<B: StoreBackend<Book>> {
    store: RecordStore<Book, B>,
}

impl<B: StoreBackend<Book>> Catalog<B> {
    pub fn open(backend: B) -> Result<Self> {
        Ok(Self {
            store: RecordStore::open(backend)?,
        })
    }

    pub fn add_book(&mut self, title: &str, author: &str) -> Result<RecordKey> {
        let book = Book::new(title, author)?;
        let key = book.title.clone();
        self.store.add(book)?;
        Ok(key)
    }

    pub fn remove_book(&mut self, title: &str) -> Result<Book> {
        self.store.remove(&RecordKey::new(title)?)
    }

    pub fn book(&self, title: &str) -> Result<&Book> {
        self.store.get(&RecordKey::new(title)?)
    }

    /// Mark the book as checked out. Rejected when it already is.
    pub fn checkout(&mut self, title: &str) -> Result<()> {
        self.set_availability(title, false)
    }

    /// Mark the book as back on the shelf. Rejected when it never left.
    pub fn return_book(&mut self, title: &str) -> Result<()> {
        self.set_availability(title, true)
    }

    /// All books, ordered by title.
    pub fn books(&self) -> Vec<&Book> {
        self.store.list()
    }

    pub fn book_count(&self) -> usize {
        self.store.len()
    }

    pub fn available_count(&self) -> usize {
        self.store
            .aggregate(0usize, |count, book| count + usize::from(book.available))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.store.flush()
    }

    fn set_availability(&mut self, title: &str, available: bool) -> Result<()> {
        let key = RecordKey::new(title)?;
        let book = self.store.get(&key)?;
        if book.available == available {
            let state = if available {
                "already on the shelf"
            } else {
                "already checked out"
            };
            return Err(KardexError::validation("title", format!("{} is {}", key, state)));
        }
        self.store.update(&key, |book| book.available = available)
    }
}
