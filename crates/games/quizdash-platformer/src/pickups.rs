use serde::{Deserialize, Serialize};

use quizdash_core::geometry::Rect;
use quizdash_core::storage::{CHECKPOINT_KEY, KeyValueStore, StorageError, load_json, save_json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub rect: Rect,
    pub value: u32,
}

/// A question gate. Triggers at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub rect: Rect,
    /// Index into the question bank.
    pub question: usize,
    pub triggered: bool,
    pub value: u32,
}

/// Player resting position at the last correctly answered checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedCheckpoint {
    pub x: f32,
    pub y: f32,
}

impl SavedCheckpoint {
    pub fn load(store: &dyn KeyValueStore) -> Option<Self> {
        load_json(store, CHECKPOINT_KEY)
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        save_json(store, CHECKPOINT_KEY, self)
    }

    pub fn clear(store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store.remove(CHECKPOINT_KEY)
    }
}

/// Remove every coin touching `hitbox`, returning the collected values.
pub fn collect_coins(coins: &mut Vec<Coin>, hitbox: &Rect) -> Vec<u32> {
    let mut collected = Vec::new();
    coins.retain(|coin| {
        if coin.rect.overlaps(hitbox) {
            collected.push(coin.value);
            false
        } else {
            true
        }
    });
    collected
}

/// Trigger the first untriggered checkpoint touching `hitbox`.
pub fn trigger_checkpoint(checkpoints: &mut [Checkpoint], hitbox: &Rect) -> Option<usize> {
    let index = checkpoints
        .iter()
        .position(|cp| !cp.triggered && cp.rect.overlaps(hitbox))?;
    checkpoints[index].triggered = true;
    Some(index)
}
