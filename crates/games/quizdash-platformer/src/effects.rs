use serde::{Deserialize, Serialize};

use quizdash_core::effects;

/// Timed player effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerEffect {
    /// Attack swing; enemies touched while active are defeated.
    Attack,
    /// Consecutive defeats inside this window extend the combo.
    ComboWindow,
    /// Enemy contact is ignored, granted after a respawn.
    Invulnerable,
}

impl effects::EffectKind for PlayerEffect {}

pub type PlayerEffects = effects::EffectSet<PlayerEffect>;
