//! Spell definitions and stored spell records
//!
//! Stored records carry a single ability dice tuple plus a fixed-width flag
//! vector. [`SpellRecord::decode`] turns one into a typed
//! [`SpellDefinition`] once, at load time.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::dice::DieRoll;
use super::kinds::{SpellClass, SpellRole};
use super::modifier::{decode_multiplier, AbilityModifier};

/// Spell identifier as stored
pub type SpellId = u32;

/// Boolean behaviour switches of a spell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellFlags {
    /// Damage resolves before spells without first strike
    pub first_strike: bool,
    /// Extra mana multiplies the effect
    pub chargeable: bool,
    /// Sets the defender burning when damage lands
    pub ignites: bool,
    /// Freezes the defender when damage lands
    pub freezes: bool,
    /// Halves incoming fire damage
    pub negates_fire_damage: bool,
    /// Block overflow is not halved
    pub negate_block_overflow: bool,
    /// Reveals the opponent's spells and stats
    pub reads_opponent: bool,
    /// Allows swapping the active spell set
    pub reselect_spells: bool,
    /// Regains mana from the opponent's damage output
    pub gain_mana_from_damage: bool,
    /// Hurts the caster
    pub self_inflicted_damage: bool,
    /// Blocks of a matching class get a bonus
    pub has_block_modifier: bool,
}

/// A fully resolved spell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellDefinition {
    pub damage: DieRoll,
    pub defense: DieRoll,
    pub healing: DieRoll,
    pub mana_recharge: DieRoll,
    pub mana_cost: i32,
    pub class: SpellClass,
    pub role: SpellRole,
    pub flags: SpellFlags,
    /// Class an enhanced block is effective against
    pub block_modifier_class: SpellClass,
    /// Pushed onto the caster after the spell resolves
    pub modifier: Option<AbilityModifier>,
}

impl SpellDefinition {
    /// The spell cast when a player names something they cannot cast
    pub fn noop() -> Self {
        Self::default()
    }
}

/// Position of each entry in a stored flag vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum FlagSlot {
    FirstStrike = 0,
    Chargeable = 1,
    Ignites = 2,
    NegateFireDamage = 3,
    NegateBlockOverflow = 4,
    HasBlockModifier = 5,
    ModifierRole = 6,
    ModifierClass = 7,
    ModifierAmount = 8,
    ModifierOneShot = 9,
    ReadsOpponent = 10,
    ReselectSpells = 11,
    GainManaFromDamage = 12,
    /// Unused by the engine
    AddModifier = 13,
    SelfInflictedDamage = 14,
    Freezes = 15,
    BlockModifierClass = 16,
}

/// Width of the flag vector
pub const FLAG_SLOTS: usize = 17;

/// Spell document as kept by the spell source
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellRecord {
    pub id: SpellId,
    pub name: String,
    /// Role code
    #[serde(rename = "type")]
    pub role: i64,
    /// Class code
    #[serde(rename = "class")]
    pub class: i64,
    pub mana_cost: i32,
    #[serde(default)]
    pub gold_cost: i32,
    pub ability_base: i32,
    pub ability_die: i32,
    pub ability_num_die: i32,
    #[serde(default)]
    pub flags: Vec<i64>,
    #[serde(default)]
    pub description: String,
}

impl SpellRecord {
    fn slot(&self, slot: FlagSlot) -> Option<i64> {
        self.flags.get(slot as usize).copied()
    }

    fn flag(&self, slot: FlagSlot) -> i64 {
        self.slot(slot).unwrap_or(0)
    }

    fn is_set(&self, slot: FlagSlot) -> bool {
        self.flag(slot) != 0
    }

    fn class_code(&self, code: i64, what: &str) -> SpellClass {
        SpellClass::from_code(code).unwrap_or_else(|| {
            warn!(spell = self.id, code, "unknown {} class code, using none", what);
            SpellClass::None
        })
    }

    fn role_code(&self, code: i64, what: &str) -> SpellRole {
        SpellRole::from_code(code).unwrap_or_else(|| {
            warn!(spell = self.id, code, "unknown {} role code, using none", what);
            SpellRole::None
        })
    }

    /// Decode into a typed definition
    pub fn decode(&self) -> SpellDefinition {
        let role = self.role_code(self.role, "spell");
        let class = self.class_code(self.class, "spell");
        let ability = DieRoll::new(self.ability_base, self.ability_die, self.ability_num_die);

        let mut spell = SpellDefinition {
            mana_cost: self.mana_cost,
            class,
            role,
            ..SpellDefinition::noop()
        };

        match role {
            SpellRole::Attack => spell.damage = ability,
            SpellRole::Defense => spell.defense = ability,
            SpellRole::Healing => spell.healing = ability,
            SpellRole::Recharge => spell.mana_recharge = ability,
            SpellRole::Passive | SpellRole::None | SpellRole::All => {}
        }

        spell.flags = SpellFlags {
            first_strike: self.is_set(FlagSlot::FirstStrike),
            chargeable: self.is_set(FlagSlot::Chargeable),
            ignites: self.is_set(FlagSlot::Ignites),
            freezes: self.is_set(FlagSlot::Freezes),
            negates_fire_damage: self.is_set(FlagSlot::NegateFireDamage),
            negate_block_overflow: self.is_set(FlagSlot::NegateBlockOverflow),
            reads_opponent: self.is_set(FlagSlot::ReadsOpponent),
            reselect_spells: self.is_set(FlagSlot::ReselectSpells),
            gain_mana_from_damage: self.is_set(FlagSlot::GainManaFromDamage),
            self_inflicted_damage: self.is_set(FlagSlot::SelfInflictedDamage),
            has_block_modifier: self.is_set(FlagSlot::HasBlockModifier),
        };
        spell.block_modifier_class = match self.slot(FlagSlot::BlockModifierClass) {
            Some(code) => self.class_code(code, "block modifier"),
            None => SpellClass::None,
        };

        spell.modifier = decode_multiplier(self.flag(FlagSlot::ModifierAmount)).map(|multiplier| {
            AbilityModifier::new(
                multiplier,
                self.class_code(self.flag(FlagSlot::ModifierClass), "modifier"),
                self.role_code(self.flag(FlagSlot::ModifierRole), "modifier"),
                self.is_set(FlagSlot::ModifierOneShot),
            )
        });

        spell
    }
}
