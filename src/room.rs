//! Battle rooms
//!
//! A room sits in front of one [`Battle`] and collects turns as they arrive
//! from each player:
//! - One pending submission per player; a second one before the turn
//!   resolves is dropped
//! - The turn resolves as soon as both players have submitted
//! - Every resolved state is kept in a ledger for per-turn deltas

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::combat::{
    Battle, BattleError, GamePhase, GameState, PlayerState, RandRoller, Roller, Side, SpellId,
    TurnSubmission,
};

/// Who won a battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player(String),
    Tie,
}

/// What one player is told after a turn resolves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnReport {
    pub player: String,
    pub player_state: PlayerState,
    /// Signed health change of the opponent
    pub damage_delivered: i32,
    /// Signed health change of this player
    pub damage_taken: i32,
    /// Signed mana change of this player
    pub mana_delta: i32,
    pub winner: Option<Winner>,
    pub turn: u32,
    /// Spell each player submitted
    pub player_moves: BTreeMap<String, SpellId>,
}

/// Turn collection for one battle between two named players
pub struct BattleRoom<R = RandRoller> {
    battle: Battle<R>,
    pending: [Option<TurnSubmission>; 2],
    ledger: Vec<GameState>,
    turn: u32,
}

impl<R: Roller> BattleRoom<R> {
    /// Open a room; the starting state is the first ledger entry
    pub fn new(battle: Battle<R>) -> Self {
        let initial = battle.game_state().clone();
        Self {
            battle,
            pending: [None, None],
            ledger: vec![initial],
            turn: 0,
        }
    }

    /// The battle being played
    pub fn battle(&self) -> &Battle<R> {
        &self.battle
    }

    /// Game state after each resolved turn, starting with the initial one
    pub fn ledger(&self) -> &[GameState] {
        &self.ledger
    }

    /// Turns resolved so far
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Check if the battle has reached a terminal phase
    pub fn is_over(&self) -> bool {
        self.battle.phase().is_terminal()
    }

    /// Whether `player_id` has a submission waiting
    pub fn has_submitted(&self, player_id: &str) -> bool {
        self.battle
            .game_state()
            .side_of(player_id)
            .is_some_and(|side| self.pending[side.index()].is_some())
    }

    /// Winner when the turn clock runs out: whoever submitted, player 1 when
    /// both did, or a tie when neither did
    pub fn timeout_winner(&self) -> Winner {
        let state = self.battle.game_state();
        match (&self.pending[0], &self.pending[1]) {
            (Some(_), _) => Winner::Player(state.player1.player_id.clone()),
            (None, Some(_)) => Winner::Player(state.player2.player_id.clone()),
            (None, None) => Winner::Tie,
        }
    }

    /// Record a player's turn. Returns both reports once the turn resolves,
    /// `None` while waiting for the other player.
    ///
    /// A failed resolution clears both pending submissions and leaves the
    /// battle untouched.
    pub fn take_turn(
        &mut self,
        player_id: &str,
        submission: TurnSubmission,
    ) -> Result<Option<[TurnReport; 2]>, BattleError> {
        if self.is_over() {
            return Err(BattleError::Finished(self.battle.phase()));
        }

        let side = self
            .battle
            .game_state()
            .side_of(player_id)
            .ok_or_else(|| BattleError::UnknownPlayer(player_id.to_string()))?;

        let slot = &mut self.pending[side.index()];
        if slot.is_some() {
            debug!(player = player_id, "already submitted this turn, dropping");
            return Ok(None);
        }
        *slot = Some(submission);

        let [Some(turn1), Some(turn2)] = &self.pending else {
            return Ok(None);
        };

        let result = self.battle.submit_turn(turn1, turn2);
        let moves = [turn1.spell_id, turn2.spell_id];
        self.pending = [None, None];
        let outcome = result?;

        self.turn += 1;
        self.ledger.push(outcome.game_state);
        info!(turn = self.turn, phase = %outcome.game_phase, "turn resolved");

        Ok(Some(self.reports(outcome.game_phase, moves)))
    }

    fn winner(&self, phase: GamePhase) -> Option<Winner> {
        let state = self.battle.game_state();
        match phase {
            GamePhase::Ongoing => None,
            GamePhase::Tie => Some(Winner::Tie),
            GamePhase::Player1Wins => Some(Winner::Player(state.player1.player_id.clone())),
            GamePhase::Player2Wins => Some(Winner::Player(state.player2.player_id.clone())),
        }
    }

    fn reports(&self, phase: GamePhase, moves: [SpellId; 2]) -> [TurnReport; 2] {
        let current = &self.ledger[self.ledger.len() - 1];
        let previous = &self.ledger[self.ledger.len() - 2];

        let health_delta =
            |side: Side| current.player(side).stats.health - previous.player(side).stats.health;
        let mana_delta =
            |side: Side| current.player(side).stats.mana - previous.player(side).stats.mana;

        let player_moves: BTreeMap<String, SpellId> = Side::BOTH
            .iter()
            .map(|side| (current.player(*side).player_id.clone(), moves[side.index()]))
            .collect();
        let winner = self.winner(phase);

        Side::BOTH.map(|side| {
            let player = current.player(side);
            TurnReport {
                player: player.player_id.clone(),
                player_state: player.clone(),
                damage_delivered: health_delta(side.opponent()),
                damage_taken: health_delta(side),
                mana_delta: mana_delta(side),
                winner: winner.clone(),
                turn: self.turn,
                player_moves: player_moves.clone(),
            }
        })
    }
}
