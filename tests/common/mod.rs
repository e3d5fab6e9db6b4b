//! Common test utilities - a small spell catalog and duel builders
//!
//! The catalog is tuned for `SumRoller`, where every roll returns
//! `num_rolls + die + base` of the scaled dice. For a `DieRoll::new(b, d, n)`
//! cast at charge `c` that is `n*c + d + b*c`.

#![allow(dead_code)]

use std::sync::Arc;

use spellduel::combat::{
    AbilityModifier, BasicStats, Battle, DieRoll, PlayerState, Roller, SpellClass,
    SpellDefinition, SpellId, SpellRole, TurnSubmission,
};
use spellduel::store::{AccountRecord, MemoryStore};

pub const PLAYER1: &str = "player_a";
pub const PLAYER2: &str = "player_b";

/// Attack/None, 1d4+1, chargeable. SumRoller: 4 + 2c
pub const MISSILE: SpellId = 0;
/// Defense/None, 1d2+1, chargeable. SumRoller: 2 + 2c
pub const WARD: SpellId = 1;
/// Recharge/None, 1d1+1, chargeable. SumRoller: 1 + 2c
pub const RECHARGE: SpellId = 2;
/// Attack/Fire, 1d6+2, ignites, single charge. SumRoller: 9
pub const FIRE_BALL: SpellId = 3;
/// Attack/Water, 1d4+1, freezes, single charge. SumRoller: 6
pub const FROST: SpellId = 4;
/// Healing/None, 1d4+1, chargeable. SumRoller: 4 + 2c
pub const HEAL: SpellId = 5;
/// Passive, free, regains mana from the opponent's damage
pub const SIPHON: SpellId = 6;
/// Passive, free, hurts the caster
pub const CHAOS: SpellId = 7;
/// Attack/Fire, 1d6+2, chargeable, block overflow not halved. SumRoller: 6 + 3c
pub const BREATH: SpellId = 8;
/// Attack/Water, 1d4+1, chargeable, halves incoming fire. SumRoller: 4 + 2c
pub const WATER_JET: SpellId = 9;
/// Attack/Electric, 1d6+1, chargeable, first strike. SumRoller: 6 + 2c
pub const BOLT: SpellId = 10;
/// Passive, grants a one-shot x1.5 on the next attack of any class
pub const FURY_RUNE: SpellId = 11;
/// Passive, grants a permanent x1.25 on every fire spell
pub const FLAME_RUNE: SpellId = 12;
/// Defense/None, 1d4+2, chargeable, bonus block against fire. SumRoller: 4 + 3c
pub const FIRE_FIELD: SpellId = 13;
/// Passive, reads the opponent
pub const SCRY: SpellId = 14;
/// Passive, swaps the active spell set
pub const STUDY: SpellId = 15;
/// Stored and owned, but not in anyone's active set
pub const RESERVE: SpellId = 16;
/// In every active set but missing from the store
pub const MISSING: SpellId = 17;
/// Neither owned nor active
pub const UNOWNED: SpellId = 18;
/// Passive, grants a one-shot x2 on the next defense of any class
pub const GUARD_RUNE: SpellId = 19;

fn attack(class: SpellClass, dice: DieRoll, chargeable: bool) -> SpellDefinition {
    let mut spell = SpellDefinition {
        damage: dice,
        mana_cost: 1,
        class,
        role: SpellRole::Attack,
        ..SpellDefinition::default()
    };
    spell.flags.chargeable = chargeable;
    spell
}

fn passive(cost: i32) -> SpellDefinition {
    SpellDefinition {
        mana_cost: cost,
        class: SpellClass::None,
        role: SpellRole::Passive,
        ..SpellDefinition::default()
    }
}

/// Every stored spell of the test catalog
pub fn catalog() -> Vec<(SpellId, SpellDefinition)> {
    let missile = attack(SpellClass::None, DieRoll::new(1, 4, 1), true);

    let mut ward = SpellDefinition {
        defense: DieRoll::new(1, 2, 1),
        mana_cost: 1,
        class: SpellClass::None,
        role: SpellRole::Defense,
        ..SpellDefinition::default()
    };
    ward.flags.chargeable = true;

    let mut recharge = SpellDefinition {
        mana_recharge: DieRoll::new(1, 1, 1),
        mana_cost: 1,
        class: SpellClass::None,
        role: SpellRole::Recharge,
        ..SpellDefinition::default()
    };
    recharge.flags.chargeable = true;

    let mut fire_ball = attack(SpellClass::Fire, DieRoll::new(2, 6, 1), false);
    fire_ball.flags.ignites = true;

    let mut frost = attack(SpellClass::Water, DieRoll::new(1, 4, 1), false);
    frost.flags.freezes = true;

    let mut heal = SpellDefinition {
        healing: DieRoll::new(1, 4, 1),
        mana_cost: 1,
        class: SpellClass::None,
        role: SpellRole::Healing,
        ..SpellDefinition::default()
    };
    heal.flags.chargeable = true;

    let mut siphon = passive(0);
    siphon.flags.gain_mana_from_damage = true;

    let mut chaos = passive(0);
    chaos.flags.self_inflicted_damage = true;

    let mut breath = attack(SpellClass::Fire, DieRoll::new(2, 6, 1), true);
    breath.flags.negate_block_overflow = true;

    let mut water_jet = attack(SpellClass::Water, DieRoll::new(1, 4, 1), true);
    water_jet.flags.negates_fire_damage = true;

    let mut bolt = attack(SpellClass::Electric, DieRoll::new(1, 6, 1), true);
    bolt.flags.first_strike = true;

    let mut fury_rune = passive(1);
    fury_rune.modifier = Some(AbilityModifier::new(
        1.5,
        SpellClass::All,
        SpellRole::Attack,
        true,
    ));

    let mut flame_rune = passive(1);
    flame_rune.modifier = Some(AbilityModifier::for_class(1.25, SpellClass::Fire));

    let mut fire_field = SpellDefinition {
        defense: DieRoll::new(2, 4, 1),
        mana_cost: 1,
        class: SpellClass::None,
        role: SpellRole::Defense,
        block_modifier_class: SpellClass::Fire,
        ..SpellDefinition::default()
    };
    fire_field.flags.chargeable = true;
    fire_field.flags.has_block_modifier = true;

    let mut guard_rune = passive(1);
    guard_rune.modifier = Some(AbilityModifier::new(
        2.0,
        SpellClass::All,
        SpellRole::Defense,
        true,
    ));

    let mut scry = passive(1);
    scry.flags.reads_opponent = true;

    let mut study = passive(1);
    study.flags.reselect_spells = true;

    vec![
        (MISSILE, missile.clone()),
        (WARD, ward),
        (RECHARGE, recharge),
        (FIRE_BALL, fire_ball),
        (FROST, frost),
        (HEAL, heal),
        (SIPHON, siphon),
        (CHAOS, chaos),
        (BREATH, breath),
        (WATER_JET, water_jet),
        (BOLT, bolt),
        (FURY_RUNE, fury_rune),
        (FLAME_RUNE, flame_rune),
        (FIRE_FIELD, fire_field),
        (SCRY, scry),
        (STUDY, study),
        (RESERVE, missile),
        (GUARD_RUNE, guard_rune),
    ]
}

/// Spells every test player may cast
pub fn active_spells() -> Vec<SpellId> {
    let mut spells: Vec<SpellId> = (MISSILE..=STUDY).collect();
    spells.extend([MISSING, GUARD_RUNE]);
    spells
}

/// Spells every test player owns
pub fn owned_spells() -> Vec<SpellId> {
    let mut spells: Vec<SpellId> = (MISSILE..=RESERVE).collect();
    spells.push(GUARD_RUNE);
    spells
}

pub fn stats(health: i32, mana: i32) -> BasicStats {
    classed(health, mana, 1.0, SpellClass::None)
}

pub fn classed(health: i32, mana: i32, multiplier: f64, class: SpellClass) -> BasicStats {
    BasicStats {
        health,
        mana,
        class_multiplier: multiplier,
        class_type: class,
    }
}

pub fn turn(spell_id: SpellId, mana_spent: i32) -> TurnSubmission {
    TurnSubmission::new(spell_id, mana_spent)
}

fn account(username: &str, stats: BasicStats) -> AccountRecord {
    AccountRecord {
        username: username.to_string(),
        health: stats.health,
        mana: stats.mana,
        class_multiplier: stats.class_multiplier,
        class: stats.class_type.code(),
        active_spells: active_spells(),
        spells_owned: owned_spells(),
    }
}

/// Store holding the catalog and both test accounts
pub fn store(player1: BasicStats, player2: BasicStats) -> Arc<MemoryStore> {
    let mut store = MemoryStore::new();
    for (spell_id, spell) in catalog() {
        store.insert_spell(spell_id, spell);
    }
    store.insert_account(account(PLAYER1, player1));
    store.insert_account(account(PLAYER2, player2));
    Arc::new(store)
}

/// Battle between the two test players
pub fn duel<R: Roller>(player1: BasicStats, player2: BasicStats, roller: R) -> Battle<R> {
    let store = store(player1, player2);
    Battle::new(
        PlayerState::new(PLAYER1, player1, active_spells()),
        PlayerState::new(PLAYER2, player2, active_spells()),
        store.clone(),
        store,
        roller,
    )
}

/// Health and mana of both players
pub fn vitals<R: Roller>(battle: &Battle<R>) -> [i32; 4] {
    let state = battle.game_state();
    [
        state.player1.stats.health,
        state.player2.stats.health,
        state.player1.stats.mana,
        state.player2.stats.mana,
    ]
}
