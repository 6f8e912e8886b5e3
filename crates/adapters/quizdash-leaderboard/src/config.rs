/// Environment variable holding the backend base URL.
pub const URL_ENV: &str = "QUIZDASH_LEADERBOARD_URL";
/// Environment variable holding the bearer token used for submissions.
pub const TOKEN_ENV: &str = "QUIZDASH_LEADERBOARD_TOKEN";

/// Configuration for the remote leaderboard backend.
#[derive(Clone)]
pub struct RemoteLeaderboardConfig {
    /// Base URL of the backend, e.g. `https://scores.example.com`. Empty disables
    /// remote sync.
    pub base_url: String,
    /// Bearer token for submissions. Reads work without one.
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RemoteLeaderboardConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: None,
            timeout_secs: 10,
        }
    }
}

impl std::fmt::Debug for RemoteLeaderboardConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteLeaderboardConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl RemoteLeaderboardConfig {
    /// Build from the environment. The token is only ever read from
    /// [`TOKEN_ENV`].
    pub fn from_env(base_url: Option<String>) -> Self {
        let base_url = std::env::var(URL_ENV)
            .ok()
            .or(base_url)
            .unwrap_or_default();
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty());
        Self {
            base_url,
            token,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.base_url.trim().is_empty()
    }

    pub fn leaderboard_url(&self) -> String {
        format!("{}/leaderboard", self.base_url.trim_end_matches('/'))
    }
}
