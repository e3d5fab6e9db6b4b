//! Turn resolution
//!
//! A [`Battle`] owns both players for the lifetime of one duel. Each call to
//! [`Battle::submit_turn`] resolves a full turn:
//!
//! 1. Spell lookup and mana accounting for both sides. Every external lookup
//!    happens here, before anything is written.
//! 2. Burn ticks, healing, the first-strike damage pass, the normal damage
//!    pass, and finally static effects. The win check runs after each step
//!    and resolution stops at the first terminal phase.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::dice::{DieRoll, RandRoller, Roller};
use super::kinds::{GamePhase, SpellClass, SpellRole};
use super::player::PlayerState;
use super::rules::Rules;
use super::spell::{SpellDefinition, SpellId};
use crate::store::{AccountStore, SpellSource, StoreError};

/// Battle errors
#[derive(Debug, Error)]
pub enum BattleError {
    #[error("lookup failed: {0}")]
    Lookup(#[from] StoreError),

    #[error("battle already ended: {0}")]
    Finished(GamePhase),

    #[error("player {0} is not in this battle")]
    UnknownPlayer(String),
}

/// Which of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    One,
    Two,
}

impl Side {
    /// Both sides in resolution order
    pub const BOTH: [Side; 2] = [Side::One, Side::Two];

    /// The other player
    pub fn opponent(&self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }

    /// Array index of this side
    pub fn index(&self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }
}

/// One player's action for a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnSubmission {
    pub spell_id: SpellId,
    /// Mana the player offers to spend
    pub mana_spent: i32,
    /// Replacement spell set for a reselect spell
    #[serde(default)]
    pub new_spells: Option<Vec<SpellId>>,
}

impl TurnSubmission {
    /// Create a submission without a reselect list
    pub fn new(spell_id: SpellId, mana_spent: i32) -> Self {
        Self {
            spell_id,
            mana_spent,
            new_spells: None,
        }
    }

    /// Attach a reselect candidate list
    pub fn with_new_spells(mut self, spells: Vec<SpellId>) -> Self {
        self.new_spells = Some(spells);
        self
    }
}

/// Both players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub player1: PlayerState,
    pub player2: PlayerState,
}

impl GameState {
    /// Get one player
    pub fn player(&self, side: Side) -> &PlayerState {
        match side {
            Side::One => &self.player1,
            Side::Two => &self.player2,
        }
    }

    /// Get one player mutably
    pub fn player_mut(&mut self, side: Side) -> &mut PlayerState {
        match side {
            Side::One => &mut self.player1,
            Side::Two => &mut self.player2,
        }
    }

    /// Borrow `side` and its opponent at once
    pub fn pair_mut(&mut self, side: Side) -> (&mut PlayerState, &mut PlayerState) {
        match side {
            Side::One => (&mut self.player1, &mut self.player2),
            Side::Two => (&mut self.player2, &mut self.player1),
        }
    }

    /// Find the side a player id plays on
    pub fn side_of(&self, player_id: &str) -> Option<Side> {
        if self.player1.player_id == player_id {
            Some(Side::One)
        } else if self.player2.player_id == player_id {
            Some(Side::Two)
        } else {
            None
        }
    }

    /// Win check on current health
    pub fn phase(&self) -> GamePhase {
        GamePhase::from_health(self.player1.stats.health, self.player2.stats.health)
    }
}

/// Result of one resolved turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    pub game_state: GameState,
    pub game_phase: GamePhase,
}

/// Mana cost of `spell` for `player` this turn
pub fn effective_cost(spell: &SpellDefinition, player: &PlayerState, rules: &Rules) -> i32 {
    if player.frozen && spell.role != SpellRole::Recharge {
        spell
            .mana_cost
            .saturating_mul(rules.frozen_cost_multiplier)
    } else {
        spell.mana_cost
    }
}

/// Mana actually taken for casting `spell` when `requested` is offered.
///
/// The result is always zero or a whole number of cost units, never more
/// than the player holds, and at most one unit for spells that cannot be
/// charged.
pub fn applied_mana_spend(
    spell: &SpellDefinition,
    requested: i32,
    player: &PlayerState,
    rules: &Rules,
) -> i32 {
    let cost = effective_cost(spell, player, rules);
    if cost <= 0 {
        return 0;
    }

    let mut spent = requested.min(player.stats.mana).max(0);
    spent -= spent % cost;

    if !spell.flags.chargeable && spent > cost {
        cost
    } else {
        spent
    }
}

/// Number of cost units paid for
pub fn charge_modifier(spent: i32, cost: i32) -> i32 {
    if cost <= 0 {
        0
    } else {
        spent / cost
    }
}

/// A spell after lookup and mana accounting, before anything is applied
#[derive(Debug, Clone)]
struct Cast {
    spell: SpellDefinition,
    spent: i32,
    charge: i32,
    reselect: Option<Vec<SpellId>>,
}

/// One duel between two players
pub struct Battle<R = RandRoller> {
    state: GameState,
    phase: GamePhase,
    spells: Arc<dyn SpellSource>,
    accounts: Arc<dyn AccountStore>,
    roller: R,
    rules: Rules,
    turns: u32,
}

impl<R: Roller> Battle<R> {
    /// Start a battle between two prepared players
    pub fn new(
        player1: PlayerState,
        player2: PlayerState,
        spells: Arc<dyn SpellSource>,
        accounts: Arc<dyn AccountStore>,
        roller: R,
    ) -> Self {
        Self {
            state: GameState { player1, player2 },
            phase: GamePhase::Ongoing,
            spells,
            accounts,
            roller,
            rules: Rules::default(),
            turns: 0,
        }
    }

    /// Start a battle from two stored accounts
    pub fn from_accounts(
        player1: &str,
        player2: &str,
        spells: Arc<dyn SpellSource>,
        accounts: Arc<dyn AccountStore>,
        roller: R,
    ) -> Result<Self, BattleError> {
        let first = PlayerState::from_account(&accounts.account(player1)?);
        let second = PlayerState::from_account(&accounts.account(player2)?);
        info!(player1, player2, "battle started");
        Ok(Self::new(first, second, spells, accounts, roller))
    }

    /// Replace the rule constants
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    /// Current rule constants
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Both players as they stand
    pub fn game_state(&self) -> &GameState {
        &self.state
    }

    /// Phase after the last resolved turn
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Number of turns resolved
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Snapshot of one player's state
    pub fn player_state(&self, player_id: &str) -> Result<PlayerState, BattleError> {
        self.state
            .side_of(player_id)
            .map(|side| self.state.player(side).clone())
            .ok_or_else(|| BattleError::UnknownPlayer(player_id.to_string()))
    }

    /// Resolve one turn from both players' submissions
    pub fn submit_turn(
        &mut self,
        turn1: &TurnSubmission,
        turn2: &TurnSubmission,
    ) -> Result<TurnOutcome, BattleError> {
        if self.phase.is_terminal() {
            return Err(BattleError::Finished(self.phase));
        }

        let cast1 = self.prepare(Side::One, turn1)?;
        let cast2 = self.prepare(Side::Two, turn2)?;

        self.commit(Side::One, &cast1);
        self.commit(Side::Two, &cast2);

        // Frozen lasts exactly one turn
        self.state.player1.frozen = false;
        self.state.player2.frozen = false;

        self.turns += 1;
        let phase = self.resolve([&cast1, &cast2]);
        self.phase = phase;

        if phase.is_terminal() {
            info!(turn = self.turns, %phase, "battle over");
        } else {
            debug!(
                turn = self.turns,
                health1 = self.state.player1.stats.health,
                health2 = self.state.player2.stats.health,
                "turn resolved"
            );
        }

        Ok(TurnOutcome {
            game_state: self.state.clone(),
            game_phase: phase,
        })
    }

    /// Look up the spell and work out mana and charge without writing anything
    fn prepare(&self, side: Side, turn: &TurnSubmission) -> Result<Cast, BattleError> {
        let player = self.state.player(side);

        let spell = if player.knows_spell(turn.spell_id) {
            self.spells.lookup(turn.spell_id)?
        } else {
            debug!(
                player = %player.player_id,
                spell = turn.spell_id,
                "spell not in active set, casting nothing"
            );
            SpellDefinition::noop()
        };

        let cost = effective_cost(&spell, player, &self.rules);
        let spent = applied_mana_spend(&spell, turn.mana_spent, player, &self.rules);
        let charge = charge_modifier(spent, cost);

        let reselect = match &turn.new_spells {
            Some(candidates) if spell.flags.reselect_spells && charge > 0 => {
                self.check_reselect(player, candidates)?
            }
            _ => None,
        };

        Ok(Cast {
            spell,
            spent,
            charge,
            reselect,
        })
    }

    /// Accept a new spell set only if the player owns every spell in it
    fn check_reselect(
        &self,
        player: &PlayerState,
        candidates: &[SpellId],
    ) -> Result<Option<Vec<SpellId>>, BattleError> {
        let Some(owned) = self.accounts.owned_spells(&player.player_id)? else {
            warn!(player = %player.player_id, "no account for reselect, keeping spells");
            return Ok(None);
        };

        if candidates.iter().all(|id| owned.contains(id)) {
            info!(player = %player.player_id, spells = ?candidates, "spells reselected");
            Ok(Some(candidates.to_vec()))
        } else {
            info!(player = %player.player_id, "reselect names unowned spells, ignoring");
            Ok(None)
        }
    }

    fn commit(&mut self, side: Side, cast: &Cast) {
        let player = self.state.player_mut(side);
        player.stats.mana -= cast.spent;
        if let Some(spells) = &cast.reselect {
            player.spells = spells.clone();
        }
    }

    fn finished(&self) -> Option<GamePhase> {
        let phase = self.state.phase();
        phase.is_terminal().then_some(phase)
    }

    fn resolve(&mut self, casts: [&Cast; 2]) -> GamePhase {
        self.tick_ignite();
        if let Some(end) = self.finished() {
            return end;
        }

        self.resolve_healing(casts);
        if let Some(end) = self.finished() {
            return end;
        }

        let first_strike = casts.map(|c| c.spell.flags.first_strike);
        let early = self.damage_pass(casts, first_strike);
        if let Some(end) = self.finished() {
            return end;
        }

        let late = self.damage_pass(casts, first_strike.map(|fs| !fs));
        if let Some(end) = self.finished() {
            return end;
        }

        let dealt = [
            early[0].saturating_add(late[0]),
            early[1].saturating_add(late[1]),
        ];
        self.resolve_statics(casts, dealt);

        self.state.phase()
    }

    /// Roll `dice` scaled by `charge`; nothing is rolled without charge or dice
    fn roll_charged(&mut self, dice: DieRoll, charge: i32) -> i32 {
        if charge <= 0 || dice.is_zero() {
            return 0;
        }
        self.roller.roll_dice(dice.scaled(charge))
    }

    fn tick_ignite(&mut self) {
        for side in Side::BOTH {
            if self.state.player(side).ignited == 0 {
                continue;
            }
            let damage = self.roller.roll_dice(self.rules.ignite_damage);
            let player = self.state.player_mut(side);
            player.ignited -= 1;
            player.take_damage(damage);
            debug!(
                player = %player.player_id,
                damage,
                remaining = player.ignited,
                "burn tick"
            );
        }
    }

    fn resolve_healing(&mut self, casts: [&Cast; 2]) {
        for side in Side::BOTH {
            let cast = casts[side.index()];
            let healed = self.roll_charged(cast.spell.healing, cast.charge);
            if healed != 0 {
                let player = self.state.player_mut(side);
                player.stats.health = player.stats.health.saturating_add(healed);
                debug!(player = %player.player_id, healed, "healing");
            }
        }
    }

    /// Run the damage algorithm for every active side, applying each result
    /// before the next side attacks
    fn damage_pass(&mut self, casts: [&Cast; 2], active: [bool; 2]) -> [i32; 2] {
        let mut dealt = [0, 0];
        for side in Side::BOTH {
            if !active[side.index()] {
                continue;
            }
            let damage = self.spell_damage(side, casts);
            let (attacker, defender) = self.state.pair_mut(side);
            defender.take_damage(damage);
            debug!(
                attacker = %attacker.player_id,
                defender = %defender.player_id,
                damage,
                "spell damage"
            );
            dealt[side.index()] = damage;
        }
        dealt
    }

    /// Damage `attacker` deals this pass
    fn spell_damage(&mut self, attacker: Side, casts: [&Cast; 2]) -> i32 {
        let defender = attacker.opponent();
        let attack_cast = casts[attacker.index()];
        let defend_cast = casts[defender.index()];
        let attacking = &attack_cast.spell;
        let defending = &defend_cast.spell;

        let mut attack = self.roll_charged(attacking.damage, attack_cast.charge) as f64;
        if attacking.role == SpellRole::Attack {
            attack *= self.state.player_mut(attacker).apply_active_modifiers(attacking);
        }
        if attacking.class == SpellClass::Fire && defending.flags.negates_fire_damage {
            attack = (attack / 2.0).floor();
        }

        let mut block = self.roll_charged(defending.defense, defend_cast.charge) as f64;
        if defending.role == SpellRole::Defense {
            block *= self.state.player_mut(defender).apply_active_modifiers(defending);
            if defending.flags.has_block_modifier && defending.block_modifier_class == attacking.class {
                block += f64::from(
                    self.rules
                        .block_bonus_per_charge
                        .saturating_mul(defend_cast.charge),
                );
            }

            attack -= block.floor();
            if !attacking.flags.negate_block_overflow {
                attack = (attack / 2.0).floor();
            }
        }

        attack.floor().max(0.0) as i32
    }

    fn resolve_statics(&mut self, casts: [&Cast; 2], dealt: [i32; 2]) {
        // Status effects need damage to land
        for side in Side::BOTH {
            let flags = casts[side.index()].spell.flags;
            if dealt[side.index()] <= 0 {
                continue;
            }
            let target = self.state.player_mut(side.opponent());
            if flags.ignites {
                target.ignited += self.rules.ignite_stacks;
                debug!(player = %target.player_id, ignited = target.ignited, "ignited");
            }
            if flags.freezes {
                target.frozen = true;
                debug!(player = %target.player_id, "frozen");
            }
        }

        // Drain reads what the opponent dealt
        for side in Side::BOTH {
            if !casts[side.index()].spell.flags.gain_mana_from_damage {
                continue;
            }
            let gained = (dealt[side.opponent().index()] / 2).min(self.rules.max_mana_drain);
            let player = self.state.player_mut(side);
            player.stats.mana = player.stats.mana.saturating_add(gained);
        }

        for side in Side::BOTH {
            if casts[side.index()].spell.flags.self_inflicted_damage {
                let damage = self.roller.roll_dice(self.rules.self_inflicted_damage);
                self.state.player_mut(side).take_damage(damage);
            }
        }

        for side in Side::BOTH {
            let cast = casts[side.index()];
            let recharged = if self.rules.recharge_scales_with_charge {
                self.roll_charged(cast.spell.mana_recharge, cast.charge)
            } else {
                self.roll_charged(cast.spell.mana_recharge, 1)
            };
            let player = self.state.player_mut(side);
            player.stats.mana = player.stats.mana.saturating_add(recharged);
        }

        for side in Side::BOTH {
            if let Some(modifier) = casts[side.index()].spell.modifier {
                self.state.player_mut(side).modifiers.push(modifier);
            }
        }

        for side in Side::BOTH {
            if casts[side.index()].spell.flags.reads_opponent {
                let (reader, target) = self.state.pair_mut(side);
                reader.observe(target);
                debug!(reader = %reader.player_id, target = %target.player_id, "opponent read");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::player::BasicStats;

    fn player(mana: i32, frozen: bool) -> PlayerState {
        let mut player = PlayerState::new(
            "p",
            BasicStats {
                health: 100,
                mana,
                class_multiplier: 1.0,
                class_type: SpellClass::None,
            },
            vec![],
        );
        player.frozen = frozen;
        player
    }

    fn spell(cost: i32, role: SpellRole, chargeable: bool) -> SpellDefinition {
        let mut spell = SpellDefinition {
            mana_cost: cost,
            role,
            ..SpellDefinition::noop()
        };
        spell.flags.chargeable = chargeable;
        spell
    }

    #[test]
    fn test_effective_cost() {
        let rules = Rules::default();
        let attack = spell(2, SpellRole::Attack, true);
        let recharge = spell(2, SpellRole::Recharge, true);

        assert_eq!(effective_cost(&attack, &player(10, false), &rules), 2);
        assert_eq!(effective_cost(&attack, &player(10, true), &rules), 4);
        assert_eq!(effective_cost(&recharge, &player(10, true), &rules), 2);
    }

    #[test]
    fn test_spend_rounds_down_to_cost_units() {
        let rules = Rules::default();
        let chargeable = spell(3, SpellRole::Attack, true);

        assert_eq!(applied_mana_spend(&chargeable, 7, &player(10, false), &rules), 6);
        assert_eq!(applied_mana_spend(&chargeable, 2, &player(10, false), &rules), 0);
        // Clamped to what the player holds first
        assert_eq!(applied_mana_spend(&chargeable, 50, &player(10, false), &rules), 9);
    }

    #[test]
    fn test_unchargeable_caps_at_one_unit() {
        let rules = Rules::default();
        let single = spell(4, SpellRole::Attack, false);

        assert_eq!(applied_mana_spend(&single, 8, &player(10, false), &rules), 4);
        assert_eq!(applied_mana_spend(&single, 3, &player(10, false), &rules), 0);
        // Frozen doubles the unit
        assert_eq!(applied_mana_spend(&single, 10, &player(10, true), &rules), 8);
    }

    #[test]
    fn test_free_spells_cost_nothing() {
        let rules = Rules::default();
        let free = spell(0, SpellRole::Recharge, true);
        assert_eq!(applied_mana_spend(&free, 5, &player(10, false), &rules), 0);
        assert_eq!(charge_modifier(0, 0), 0);
    }

    #[test]
    fn test_negative_requests_and_mana() {
        let rules = Rules::default();
        let attack = spell(1, SpellRole::Attack, true);
        assert_eq!(applied_mana_spend(&attack, -5, &player(10, false), &rules), 0);
        assert_eq!(applied_mana_spend(&attack, 5, &player(-3, false), &rules), 0);
    }

    #[test]
    fn test_spend_is_multiple_of_cost() {
        let rules = Rules::default();
        for cost in 1..6 {
            for chargeable in [true, false] {
                for frozen in [true, false] {
                    let spell = spell(cost, SpellRole::Attack, chargeable);
                    for mana in 0..20 {
                        for requested in -2..25 {
                            let holder = player(mana, frozen);
                            let unit = effective_cost(&spell, &holder, &rules);
                            let spent = applied_mana_spend(&spell, requested, &holder, &rules);
                            assert_eq!(spent % unit, 0);
                            assert!(spent >= 0 && spent <= mana.max(0));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_frozen_cost_saturates() {
        let rules = Rules::default();
        let huge = spell(i32::MAX, SpellRole::Attack, true);
        assert_eq!(effective_cost(&huge, &player(10, true), &rules), i32::MAX);
        let holder = player(i32::MAX, true);
        assert_eq!(applied_mana_spend(&huge, i32::MAX, &holder, &rules), i32::MAX);
    }

    #[test]
    fn test_charge_modifier() {
        assert_eq!(charge_modifier(6, 3), 2);
        assert_eq!(charge_modifier(0, 3), 0);
        assert_eq!(charge_modifier(8, 4), 2);
    }

    #[test]
    fn test_side_helpers() {
        assert_eq!(Side::One.opponent(), Side::Two);
        assert_eq!(Side::Two.opponent(), Side::One);
        assert_eq!(Side::One.index(), 0);
        assert_eq!(Side::Two.index(), 1);
    }
}
