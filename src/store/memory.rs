//! In-memory spell and account storage
//!
//! Backs both store traits with hash maps. Can be filled programmatically or
//! loaded from a JSON fixture of the form `{"spells": [...], "accounts": [...]}`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{AccountRecord, AccountStore, SpellSource, StoreError};
use crate::combat::{SpellDefinition, SpellId, SpellRecord};

/// Stored documents in one file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub spells: Vec<SpellRecord>,
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
}

/// Spell catalog and account table held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    spells: HashMap<SpellId, SpellDefinition>,
    names: HashMap<SpellId, String>,
    accounts: HashMap<String, AccountRecord>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from fixture documents; spell records are decoded here
    pub fn from_fixture(fixture: Fixture) -> Self {
        let mut store = Self::new();
        for record in &fixture.spells {
            store.insert_record(record);
        }
        for account in fixture.accounts {
            store.insert_account(account);
        }
        store
    }

    /// Load a JSON fixture file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json(&text)?;
        info!(
            path = %path.display(),
            spells = store.spells.len(),
            accounts = store.accounts.len(),
            "loaded fixture"
        );
        Ok(store)
    }

    /// Parse a JSON fixture
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        let fixture: Fixture = serde_json::from_str(text)?;
        Ok(Self::from_fixture(fixture))
    }

    /// Decode and add a stored spell
    pub fn insert_record(&mut self, record: &SpellRecord) {
        self.names.insert(record.id, record.name.clone());
        self.spells.insert(record.id, record.decode());
    }

    /// Add an already decoded spell
    pub fn insert_spell(&mut self, spell_id: SpellId, spell: SpellDefinition) {
        self.spells.insert(spell_id, spell);
    }

    /// Add or replace an account
    pub fn insert_account(&mut self, account: AccountRecord) {
        self.accounts.insert(account.username.clone(), account);
    }

    /// Display name of a stored spell
    pub fn spell_name(&self, spell_id: SpellId) -> Option<&str> {
        self.names.get(&spell_id).map(String::as_str)
    }
}

impl SpellSource for MemoryStore {
    fn lookup(&self, spell_id: SpellId) -> Result<SpellDefinition, StoreError> {
        self.spells
            .get(&spell_id)
            .cloned()
            .ok_or(StoreError::SpellNotFound(spell_id))
    }
}

impl AccountStore for MemoryStore {
    fn account(&self, player_id: &str) -> Result<AccountRecord, StoreError> {
        self.accounts
            .get(player_id)
            .cloned()
            .ok_or_else(|| StoreError::AccountNotFound(player_id.to_string()))
    }

    fn owned_spells(&self, player_id: &str) -> Result<Option<Vec<SpellId>>, StoreError> {
        Ok(self
            .accounts
            .get(player_id)
            .map(|account| account.spells_owned.clone()))
    }
}
