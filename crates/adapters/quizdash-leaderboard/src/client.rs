use std::time::Duration;

use quizdash_core::leaderboard::LeaderboardEntry;

use crate::config::RemoteLeaderboardConfig;
use crate::error::LeaderboardError;

/// HTTP client for the remote leaderboard backend.
///
/// `GET {base}/leaderboard` returns the board as a JSON array of
/// `{"name", "score"}`. `POST {base}/leaderboard` with one entry and a bearer
/// token returns the updated board in the same shape.
pub struct LeaderboardClient {
    config: RemoteLeaderboardConfig,
    client: reqwest::Client,
}

impl LeaderboardClient {
    pub fn new(config: RemoteLeaderboardConfig) -> Result<Self, LeaderboardError> {
        if !config.is_enabled() {
            return Err(LeaderboardError::Disabled);
        }
        let client = reqwest::Client::builder()
            .user_agent("quizdash-leaderboard/0.1")
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RemoteLeaderboardConfig {
        &self.config
    }

    pub async fn fetch(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let resp = self
            .client
            .get(self.config.leaderboard_url())
            .header("Accept", "application/json")
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(LeaderboardError::Status(resp.status().as_u16()));
        }
        Ok(resp.json().await?)
    }

    pub async fn submit(
        &self,
        entry: &LeaderboardEntry,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let token = self
            .config
            .token
            .as_deref()
            .ok_or(LeaderboardError::MissingToken)?;
        let resp = self
            .client
            .post(self.config.leaderboard_url())
            .header("Authorization", format!("Bearer {token}"))
            .json(entry)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(LeaderboardError::Status(resp.status().as_u16()));
        }
        Ok(resp.json().await?)
    }
}
