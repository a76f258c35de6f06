//! Address book contacts.

use crate::error::{KardexError, Result};
use crate::key::RecordKey;
use crate::model::{required_text, Record};
use crate::store::{RecordStore, StoreBackend};
use serde::{Deserialize, Serialize};

pub const ROSTER_FILENAME: &str = "roster.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: RecordKey,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Contact {
    pub fn new(name: &str, phone: &str) -> Result<Self> {
        Ok(Self {
            name: RecordKey::new(name)?,
            phone: required_text("phone", phone)?,
            email: None,
            address: None,
        })
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = some_text(email);
        self
    }

    pub fn with_address(mut self, address: &str) -> Self {
        self.address = some_text(address);
        self
    }
}

fn some_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl Record for Contact {
    fn key(&self) -> &RecordKey {
        &self.name
    }

    fn sort_key(&self) -> String {
        self.name.folded()
    }

    fn validate(&self) -> Result<()> {
        if self.phone.trim().is_empty() {
            return Err(KardexError::validation("phone", "must not be blank"));
        }
        Ok(())
    }
}

pub struct Roster<B: StoreBackend<Contact>> {
    store: RecordStore<Contact, B>,
}

impl<B: StoreBackend<Contact>> Roster<B> {
    pub fn open(backend: B) -> Result<Self> {
        Ok(Self {
            store: RecordStore::open(backend)?,
        })
    }

    pub fn add_contact(&mut self, contact: Contact) -> Result<()> {
        self.store.add(contact)
    }

    pub fn remove_contact(&mut self, name: &str) -> Result<Contact> {
        self.store.remove(&RecordKey::new(name)?)
    }

    pub fn find(&self, name: &str) -> Result<Option<&Contact>> {
        Ok(self.store.find(&RecordKey::new(name)?))
    }

    /// Change any of phone, email, address; `None` keeps the current value.
    pub fn update_contact(
        &mut self,
        name: &str,
        phone: Option<&str>,
        email: Option<&str>,
        address: Option<&str>,
    ) -> Result<()> {
        let key = RecordKey::new(name)?;
        let phone = phone.map(|p| required_text("phone", p)).transpose()?;
        self.store.update(&key, |contact| {
            if let Some(phone) = phone {
                contact.phone = phone;
            }
            if let Some(email) = email {
                contact.email = some_text(email);
            }
            if let Some(address) = address {
                contact.address = some_text(address);
            }
        })
    }

    /// All contacts, ordered by name.
    pub fn contacts(&self) -> Vec<&Contact> {
        self.store.list()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.store.flush()
    }
}
