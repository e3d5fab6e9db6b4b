//! Spell duel combat
//!
//! Two players each cast one spell per turn; the engine resolves both casts
//! together:
//! - Dice rolling through an injectable `Roller`
//! - Mana accounting with charged spells
//! - Healing, first-strike and normal damage passes
//! - Burn, freeze, drain, and other lingering effects
//! - Stacking ability modifiers

mod dice;
mod engine;
mod kinds;
mod modifier;
mod player;
mod rules;
mod spell;

pub use dice::{DieRoll, FixedRoller, RandRoller, Roller, ScriptedRoller, SumRoller};
pub use engine::{
    applied_mana_spend, charge_modifier, effective_cost, Battle, BattleError, GameState, Side,
    TurnOutcome, TurnSubmission,
};
pub use kinds::{GamePhase, SpellClass, SpellRole};
pub use modifier::{decode_multiplier, AbilityModifier};
pub use player::{BasicStats, PlayerState};
pub use rules::Rules;
pub use spell::{FlagSlot, SpellDefinition, SpellFlags, SpellId, SpellRecord, FLAG_SLOTS};
