//! Dice tuples and the roller seam
//!
//! Every random number the engine consumes goes through [`Roller`]. The
//! default implementation draws from a `rand` generator; the deterministic
//! rollers in this module are used for replays and tests.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// A dice specification: `base + num_rolls d die`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DieRoll {
    /// Flat amount added to the dice
    pub base: i32,
    /// Faces per die
    pub die: i32,
    /// Number of dice
    pub num_rolls: i32,
}

impl DieRoll {
    /// No dice at all
    pub const ZERO: DieRoll = DieRoll {
        base: 0,
        die: 0,
        num_rolls: 0,
    };

    /// Create a new dice tuple
    pub const fn new(base: i32, die: i32, num_rolls: i32) -> Self {
        Self {
            base,
            die,
            num_rolls,
        }
    }

    /// Scale both the dice count and the base by a charge factor, saturating
    /// at the `i32` bounds
    pub fn scaled(&self, charge: i32) -> DieRoll {
        DieRoll {
            base: self.base.saturating_mul(charge),
            die: self.die,
            num_rolls: self.num_rolls.saturating_mul(charge),
        }
    }

    /// True when every term is zero
    pub fn is_zero(&self) -> bool {
        *self == DieRoll::ZERO
    }

    /// Get the minimum possible result
    pub fn min(&self) -> i32 {
        self.num_rolls.max(0) + self.base
    }

    /// Get the maximum possible result
    pub fn max(&self) -> i32 {
        self.num_rolls.max(0) * self.die.max(1) + self.base
    }
}

impl std::fmt::Display for DieRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.base > 0 {
            write!(f, "{}d{}+{}", self.num_rolls, self.die, self.base)
        } else if self.base < 0 {
            write!(f, "{}d{}{}", self.num_rolls, self.die, self.base)
        } else {
            write!(f, "{}d{}", self.num_rolls, self.die)
        }
    }
}

/// Source of dice results
///
/// `roll(num_rolls, die, base)` returns `base` plus `num_rolls` independent
/// draws from `[1, die]`. A non-positive `num_rolls` contributes nothing.
/// Totals saturate at the `i32` bounds.
pub trait Roller {
    fn roll(&mut self, num_rolls: i32, die: i32, base: i32) -> i32;

    /// Roll a dice tuple
    fn roll_dice(&mut self, dice: DieRoll) -> i32 {
        self.roll(dice.num_rolls, dice.die, dice.base)
    }
}

impl<T: Roller + ?Sized> Roller for &mut T {
    fn roll(&mut self, num_rolls: i32, die: i32, base: i32) -> i32 {
        (**self).roll(num_rolls, die, base)
    }
}

impl<T: Roller + ?Sized> Roller for Box<T> {
    fn roll(&mut self, num_rolls: i32, die: i32, base: i32) -> i32 {
        (**self).roll(num_rolls, die, base)
    }
}

/// Roller backed by a `rand` generator
#[derive(Debug, Clone)]
pub struct RandRoller<R = StdRng> {
    rng: R,
}

impl<R: Rng> RandRoller<R> {
    /// Wrap an existing generator
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandRoller<StdRng> {
    /// Reproducible roller for replays
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Roller seeded from the operating system
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> Roller for RandRoller<R> {
    fn roll(&mut self, num_rolls: i32, die: i32, base: i32) -> i32 {
        let mut total = base;
        for _ in 0..num_rolls.max(0) {
            if total == i32::MAX {
                break;
            }
            // A die with fewer than two faces always shows 1
            let face = if die > 1 {
                self.rng.random_range(1..=die)
            } else {
                1
            };
            total = total.saturating_add(face);
        }
        total
    }
}

/// Every roll returns the same value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRoller(pub i32);

impl Roller for FixedRoller {
    fn roll(&mut self, _num_rolls: i32, _die: i32, _base: i32) -> i32 {
        self.0
    }
}

/// Returns `num_rolls + die + base`, so every roll is predictable from its
/// arguments alone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SumRoller;

impl Roller for SumRoller {
    fn roll(&mut self, num_rolls: i32, die: i32, base: i32) -> i32 {
        num_rolls.saturating_add(die).saturating_add(base)
    }
}

/// Plays back a fixed sequence of results, then falls back to a default
#[derive(Debug, Clone, Default)]
pub struct ScriptedRoller {
    queue: VecDeque<i32>,
    fallback: i32,
    calls: usize,
}

impl ScriptedRoller {
    /// Create a roller that returns `results` in order, then `fallback`
    pub fn new(results: impl IntoIterator<Item = i32>, fallback: i32) -> Self {
        Self {
            queue: results.into_iter().collect(),
            fallback,
            calls: 0,
        }
    }

    /// Number of rolls requested so far
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Results not yet consumed
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl Roller for ScriptedRoller {
    fn roll(&mut self, _num_rolls: i32, _die: i32, _base: i32) -> i32 {
        self.calls += 1;
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}
