use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Marker for game-specific timed effect kinds (attack swings, combo windows).
/// Durations are always supplied by the caller.
pub trait EffectKind: Clone + Copy + PartialEq + Serialize + DeserializeOwned {}

/// A timed effect, generic over the kind enum. Counts down once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ActiveEffect<K: EffectKind> {
    pub kind: K,
    pub remaining: u32,
}

impl<K: EffectKind> ActiveEffect<K> {
    pub fn new(kind: K, ticks: u32) -> Self {
        Self {
            kind,
            remaining: ticks,
        }
    }

    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }
}

/// Set of running effects; at most one entry per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct EffectSet<K: EffectKind> {
    active: Vec<ActiveEffect<K>>,
}

impl<K: EffectKind> Default for EffectSet<K> {
    fn default() -> Self {
        Self { active: Vec::new() }
    }
}

impl<K: EffectKind> EffectSet<K> {
    /// Start (or restart) an effect for `ticks` ticks.
    pub fn start(&mut self, kind: K, ticks: u32) {
        self.clear(kind);
        if ticks > 0 {
            self.active.push(ActiveEffect::new(kind, ticks));
        }
    }

    pub fn is_active(&self, kind: K) -> bool {
        self.active.iter().any(|e| e.kind == kind)
    }

    pub fn clear(&mut self, kind: K) {
        self.active.retain(|e| e.kind != kind);
    }

    /// Advance every effect by one tick and return the kinds that expired.
    pub fn tick(&mut self) -> Vec<K> {
        let mut expired = Vec::new();
        for effect in &mut self.active {
            effect.tick();
            if effect.is_expired() {
                expired.push(effect.kind);
            }
        }
        self.active.retain(|e| !e.is_expired());
        expired
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
