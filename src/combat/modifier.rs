//! Standing ability modifiers
//!
//! A modifier multiplies the rolls of every spell that passes its class/role
//! filter. One-shot modifiers are removed the first time a matching spell is
//! evaluated against them.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::kinds::{SpellClass, SpellRole};
use super::spell::SpellDefinition;

/// A multiplicative effect owned by one player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityModifier {
    /// Factor applied to matching rolls
    pub multiplier: f64,
    /// Class filter (`All` matches every class)
    pub class: SpellClass,
    /// Role filter (`All` matches every role)
    pub role: SpellRole,
    /// Removed after the first matching evaluation
    pub one_shot: bool,
}

impl AbilityModifier {
    /// Create a new modifier
    pub fn new(multiplier: f64, class: SpellClass, role: SpellRole, one_shot: bool) -> Self {
        Self {
            multiplier,
            class,
            role,
            one_shot,
        }
    }

    /// Permanent modifier covering every role of one class
    pub fn for_class(multiplier: f64, class: SpellClass) -> Self {
        Self::new(multiplier, class, SpellRole::All, false)
    }

    /// Whether this modifier scales `spell`
    pub fn applies_to(&self, spell: &SpellDefinition) -> bool {
        self.class.admits(spell.class) && self.role.admits(spell.role)
    }

    /// Whether evaluating `spell` removes this modifier
    pub fn consumed_by(&self, spell: &SpellDefinition) -> bool {
        self.one_shot && self.applies_to(spell)
    }
}

/// Decode a stored modifier amount.
///
/// The first decimal digit gives the position of the decimal point within
/// the remaining digits: `115` is 1.5, `1125` is 1.25, `220` is 20.
/// Zero means "no modifier".
pub fn decode_multiplier(encoded: i64) -> Option<f64> {
    if encoded == 0 {
        return None;
    }
    if encoded < 0 {
        warn!(encoded, "negative modifier amount, ignoring");
        return None;
    }

    let digits = encoded.to_string();
    let (head, rest) = digits.split_at(1);
    if rest.is_empty() {
        warn!(encoded, "modifier amount has no digits after the position marker");
        return None;
    }

    let point = head.parse::<usize>().ok()?.min(rest.len());
    let (whole, frac) = rest.split_at(point);
    let whole = if whole.is_empty() { "0" } else { whole };
    let frac = if frac.is_empty() { "0" } else { frac };

    format!("{}.{}", whole, frac).parse().ok()
}
