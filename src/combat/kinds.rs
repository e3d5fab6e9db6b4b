//! Spell classification, spell roles, and game phases
//!
//! Stored spell documents encode the role in their `type` field and the
//! classification in their `class` field. The two enums are kept separate.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Elemental classification of a spell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpellClass {
    Fire,
    Water,
    Electric,
    #[default]
    None,
    /// Wildcard, only meaningful as a modifier filter
    All,
}

impl SpellClass {
    /// Decode a stored class code
    pub fn from_code(code: i64) -> Option<SpellClass> {
        match code {
            0 => Some(SpellClass::Fire),
            1 => Some(SpellClass::Water),
            2 => Some(SpellClass::Electric),
            3 => Some(SpellClass::None),
            4 => Some(SpellClass::All),
            _ => None,
        }
    }

    /// Stored class code
    pub fn code(&self) -> i64 {
        match self {
            SpellClass::Fire => 0,
            SpellClass::Water => 1,
            SpellClass::Electric => 2,
            SpellClass::None => 3,
            SpellClass::All => 4,
        }
    }

    /// Whether a filter of this class accepts `other`
    pub fn admits(&self, other: SpellClass) -> bool {
        *self == SpellClass::All || *self == other
    }
}

impl FromStr for SpellClass {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fire" => Ok(SpellClass::Fire),
            "water" => Ok(SpellClass::Water),
            "electric" | "lightning" => Ok(SpellClass::Electric),
            "none" => Ok(SpellClass::None),
            "all" => Ok(SpellClass::All),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for SpellClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SpellClass::Fire => "fire",
            SpellClass::Water => "water",
            SpellClass::Electric => "electric",
            SpellClass::None => "none",
            SpellClass::All => "all",
        };
        write!(f, "{}", s)
    }
}

/// What a spell does when cast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpellRole {
    Attack,
    Defense,
    Healing,
    Recharge,
    Passive,
    #[default]
    None,
    /// Wildcard, only meaningful as a modifier filter
    All,
}

impl SpellRole {
    /// Decode a stored role code
    pub fn from_code(code: i64) -> Option<SpellRole> {
        match code {
            0 => Some(SpellRole::Attack),
            1 => Some(SpellRole::Defense),
            2 => Some(SpellRole::Healing),
            3 => Some(SpellRole::Recharge),
            4 => Some(SpellRole::Passive),
            5 => Some(SpellRole::None),
            6 => Some(SpellRole::All),
            _ => None,
        }
    }

    /// Stored role code
    pub fn code(&self) -> i64 {
        match self {
            SpellRole::Attack => 0,
            SpellRole::Defense => 1,
            SpellRole::Healing => 2,
            SpellRole::Recharge => 3,
            SpellRole::Passive => 4,
            SpellRole::None => 5,
            SpellRole::All => 6,
        }
    }

    /// Whether a filter of this role accepts `other`
    pub fn admits(&self, other: SpellRole) -> bool {
        *self == SpellRole::All || *self == other
    }
}

impl FromStr for SpellRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "attack" => Ok(SpellRole::Attack),
            "defense" | "block" => Ok(SpellRole::Defense),
            "healing" | "heal" => Ok(SpellRole::Healing),
            "recharge" => Ok(SpellRole::Recharge),
            "passive" => Ok(SpellRole::Passive),
            "none" => Ok(SpellRole::None),
            "all" => Ok(SpellRole::All),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for SpellRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SpellRole::Attack => "attack",
            SpellRole::Defense => "defense",
            SpellRole::Healing => "healing",
            SpellRole::Recharge => "recharge",
            SpellRole::Passive => "passive",
            SpellRole::None => "none",
            SpellRole::All => "all",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of the win check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    #[serde(rename = "ONGOING")]
    Ongoing,
    #[serde(rename = "TIE")]
    Tie,
    #[serde(rename = "PLAYER_1_WINS")]
    Player1Wins,
    #[serde(rename = "PLAYER_2_WINS")]
    Player2Wins,
}

impl GamePhase {
    /// Decide the phase from both players' health
    pub fn from_health(player1: i32, player2: i32) -> GamePhase {
        match (player1 > 0, player2 > 0) {
            (true, true) => GamePhase::Ongoing,
            (false, false) => GamePhase::Tie,
            (true, false) => GamePhase::Player1Wins,
            (false, true) => GamePhase::Player2Wins,
        }
    }

    /// Whether the battle has ended
    pub fn is_terminal(&self) -> bool {
        *self != GamePhase::Ongoing
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GamePhase::Ongoing => "ongoing",
            GamePhase::Tie => "tie",
            GamePhase::Player1Wins => "player 1 wins",
            GamePhase::Player2Wins => "player 2 wins",
        };
        write!(f, "{}", s)
    }
}
