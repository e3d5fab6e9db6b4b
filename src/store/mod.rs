//! Data the engine reads from storage
//!
//! The engine only consumes two lookups: spell definitions by id, and the
//! accounts behind each player. Both are traits so the engine never depends
//! on how documents are kept.

mod memory;

pub use memory::{Fixture, MemoryStore};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::{SpellDefinition, SpellId};

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("spell {0} not found")]
    SpellNotFound(SpellId),

    #[error("account {0} not found")]
    AccountNotFound(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Account document as stored
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub username: String,
    pub health: i32,
    pub mana: i32,
    pub class_multiplier: f64,
    /// Class code
    pub class: i64,
    pub active_spells: Vec<SpellId>,
    pub spells_owned: Vec<SpellId>,
}

/// Lookup of spell definitions by id
pub trait SpellSource: Send + Sync {
    /// Resolve a spell; a miss is an error
    fn lookup(&self, spell_id: SpellId) -> Result<SpellDefinition, StoreError>;
}

/// Lookup of player accounts
pub trait AccountStore: Send + Sync {
    /// Load an account to start a battle from
    fn account(&self, player_id: &str) -> Result<AccountRecord, StoreError>;

    /// Every spell the player owns, `None` when the player is unknown
    fn owned_spells(&self, player_id: &str) -> Result<Option<Vec<SpellId>>, StoreError>;
}
