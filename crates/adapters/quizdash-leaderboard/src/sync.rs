use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use quizdash_core::leaderboard::LeaderboardEntry;

use crate::client::LeaderboardClient;

/// A fresh board from the backend, ready to replace the local cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncUpdate {
    Fetched(Vec<LeaderboardEntry>),
    Submitted(Vec<LeaderboardEntry>),
}

impl SyncUpdate {
    pub fn into_entries(self) -> Vec<LeaderboardEntry> {
        match self {
            Self::Fetched(entries) | Self::Submitted(entries) => entries,
        }
    }
}

/// Runs leaderboard requests as background tasks.
///
/// Successful responses arrive on the receiver returned by [`new`]. Failures
/// are logged and dropped; nothing is retried.
///
/// [`new`]: LeaderboardSync::new
pub struct LeaderboardSync {
    client: Arc<LeaderboardClient>,
    tx: mpsc::UnboundedSender<SyncUpdate>,
}

impl LeaderboardSync {
    pub fn new(client: LeaderboardClient) -> (Self, mpsc::UnboundedReceiver<SyncUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sync = Self {
            client: Arc::new(client),
            tx,
        };
        (sync, rx)
    }

    pub fn spawn_fetch(&self) -> JoinHandle<()> {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match client.fetch().await {
                Ok(entries) => {
                    tracing::info!(count = entries.len(), "Fetched remote leaderboard");
                    let _ = tx.send(SyncUpdate::Fetched(entries));
                },
                Err(e) => tracing::warn!(error = %e, "Failed to fetch remote leaderboard"),
            }
        })
    }

    pub fn spawn_submit(&self, entry: LeaderboardEntry) -> JoinHandle<()> {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match client.submit(&entry).await {
                Ok(entries) => {
                    tracing::info!(name = %entry.name, score = entry.score, "Submitted score");
                    let _ = tx.send(SyncUpdate::Submitted(entries));
                },
                Err(e) => tracing::warn!(error = %e, "Failed to submit score"),
            }
        })
    }
}
