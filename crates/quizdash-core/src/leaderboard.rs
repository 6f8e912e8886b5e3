use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, LEADERBOARD_KEY, StorageError, load_json, save_json};

/// Maximum number of entries kept.
pub const LEADERBOARD_CAPACITY: usize = 10;
/// Name recorded when the player submits a blank name.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

impl LeaderboardEntry {
    /// Blank or whitespace-only names fall back to [`DEFAULT_PLAYER_NAME`].
    pub fn new(name: &str, score: u32) -> Self {
        let name = name.trim();
        Self {
            name: if name.is_empty() {
                DEFAULT_PLAYER_NAME.to_string()
            } else {
                name.to_string()
            },
            score,
        }
    }
}

/// Best scores, highest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Build from arbitrary entries, normalising order and length.
    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Self {
        let mut board = Self { entries };
        board.normalise();
        board
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an entry. Returns its rank (0-based) if it made the cut.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        // Ties rank below entries already on the board.
        let rank = self.entries.partition_point(|e| e.score >= entry.score);
        if rank >= LEADERBOARD_CAPACITY {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(LEADERBOARD_CAPACITY);
        Some(rank)
    }

    /// Replace every entry, e.g. with a freshly fetched remote copy.
    pub fn replace(&mut self, entries: Vec<LeaderboardEntry>) {
        self.entries = entries;
        self.normalise();
    }

    /// Load the stored board; a missing or malformed entry yields an empty board.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        load_json::<Vec<LeaderboardEntry>>(store, LEADERBOARD_KEY)
            .map(Self::from_entries)
            .unwrap_or_default()
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        save_json(store, LEADERBOARD_KEY, &self.entries)
    }

    fn normalise(&mut self) {
        // Stable sort keeps earlier entries ahead of later equal scores.
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(LEADERBOARD_CAPACITY);
    }
}
