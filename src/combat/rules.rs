//! Rule constants used during turn resolution

use serde::{Deserialize, Serialize};

use super::dice::DieRoll;

/// Tunable numbers of the duel rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Burn ticks added when an igniting spell lands
    pub ignite_stacks: u32,
    /// Damage of one burn tick
    pub ignite_damage: DieRoll,
    /// Damage a self-inflicting spell deals to its caster
    pub self_inflicted_damage: DieRoll,
    /// Cap on mana regained from damage in one turn
    pub max_mana_drain: i32,
    /// Extra block per charge when a block matches the attack class
    pub block_bonus_per_charge: i32,
    /// Cost factor while frozen
    pub frozen_cost_multiplier: i32,
    /// Mana recharge dice grow with the charge modifier
    pub recharge_scales_with_charge: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            ignite_stacks: 3,
            ignite_damage: DieRoll::new(0, 6, 1),
            self_inflicted_damage: DieRoll::new(0, 6, 1),
            max_mana_drain: 8,
            block_bonus_per_charge: 4,
            frozen_cost_multiplier: 2,
            recharge_scales_with_charge: true,
        }
    }
}
