//! Per-combatant battle state

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::kinds::SpellClass;
use super::modifier::AbilityModifier;
use super::spell::{SpellDefinition, SpellId};
use crate::store::AccountRecord;

/// Health, mana, and class of a player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicStats {
    pub health: i32,
    pub mana: i32,
    pub class_multiplier: f64,
    pub class_type: SpellClass,
}

/// State of one player for the duration of a battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub player_id: String,
    pub stats: BasicStats,
    /// Standing modifiers, in the order they were gained
    pub modifiers: Vec<AbilityModifier>,
    /// Remaining burn ticks
    pub ignited: u32,
    /// Next non-recharge spell costs double
    pub frozen: bool,
    /// Spells the player may cast
    pub spells: Vec<SpellId>,
    /// Opponent spells revealed by a read
    pub observed_spells: Option<Vec<SpellId>>,
    /// Opponent stats revealed by a read
    pub observed_stats: Option<BasicStats>,
}

impl PlayerState {
    /// Create a player with the permanent class modifier in place
    pub fn new(player_id: impl Into<String>, stats: BasicStats, spells: Vec<SpellId>) -> Self {
        Self {
            player_id: player_id.into(),
            modifiers: vec![AbilityModifier::for_class(
                stats.class_multiplier,
                stats.class_type,
            )],
            stats,
            ignited: 0,
            frozen: false,
            spells,
            observed_spells: None,
            observed_stats: None,
        }
    }

    /// Build battle state from a stored account
    pub fn from_account(account: &AccountRecord) -> Self {
        let class_type = SpellClass::from_code(account.class).unwrap_or_else(|| {
            warn!(
                player = %account.username,
                code = account.class,
                "unknown account class code, using none"
            );
            SpellClass::None
        });
        Self::new(
            account.username.clone(),
            BasicStats {
                health: account.health,
                mana: account.mana,
                class_multiplier: account.class_multiplier,
                class_type,
            },
            account.active_spells.clone(),
        )
    }

    /// Whether `spell_id` is in the active spell set
    pub fn knows_spell(&self, spell_id: SpellId) -> bool {
        self.spells.contains(&spell_id)
    }

    /// Check if player still stands
    pub fn is_alive(&self) -> bool {
        self.stats.health > 0
    }

    /// Subtract health; may go negative
    pub fn take_damage(&mut self, amount: i32) {
        self.stats.health = self.stats.health.saturating_sub(amount);
    }

    /// Multiply every matching modifier, then drop the one-shot modifiers
    /// that `spell` matches.
    pub fn apply_active_modifiers(&mut self, spell: &SpellDefinition) -> f64 {
        let factor = self
            .modifiers
            .iter()
            .filter(|m| m.applies_to(spell))
            .fold(1.0, |acc, m| acc * m.multiplier);

        let before = self.modifiers.len();
        self.modifiers.retain(|m| !m.consumed_by(spell));
        let consumed = before - self.modifiers.len();
        if consumed > 0 {
            debug!(player = %self.player_id, consumed, "one-shot modifiers used up");
        }

        factor
    }

    /// Copy what a read reveals about `opponent`
    pub fn observe(&mut self, opponent: &PlayerState) {
        self.observed_spells = Some(opponent.spells.clone());
        self.observed_stats = Some(opponent.stats);
    }
}
