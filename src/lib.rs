//! spellduel - turn-based spell duel engine
//!
//! Two players pick a spell and a mana spend each turn; the engine resolves
//! both casts at once with dice rolls, mana charging, status effects, and
//! stacking modifiers.

pub mod combat;
pub mod config;
pub mod room;
pub mod store;

pub use combat::{Battle, BattleError, GamePhase, PlayerState, TurnOutcome, TurnSubmission};
pub use config::Config;
pub use room::{BattleRoom, TurnReport, Winner};
pub use store::{AccountStore, MemoryStore, SpellSource, StoreError};
