/// Errors talking to the remote leaderboard.
#[derive(Debug)]
pub enum LeaderboardError {
    /// No base URL configured.
    Disabled,
    /// A submission was attempted without a token.
    MissingToken,
    /// Transport or decode failure.
    Http(reqwest::Error),
    /// The backend answered with a non-success status.
    Status(u16),
}

impl std::fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "remote leaderboard is not configured"),
            Self::MissingToken => write!(
                f,
                "no leaderboard token; set {}",
                crate::config::TOKEN_ENV
            ),
            Self::Http(e) => write!(f, "leaderboard request failed: {e}"),
            Self::Status(code) => write!(f, "leaderboard backend returned {code}"),
        }
    }
}

impl std::error::Error for LeaderboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for LeaderboardError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}
