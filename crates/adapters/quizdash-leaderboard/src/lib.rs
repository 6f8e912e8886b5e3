pub mod client;
pub mod config;
pub mod error;
pub mod sync;

pub use client::LeaderboardClient;
pub use config::RemoteLeaderboardConfig;
pub use error::LeaderboardError;
pub use sync::{LeaderboardSync, SyncUpdate};
