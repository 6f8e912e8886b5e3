use serde::Deserialize;

/// Terminal driver configuration, loaded from `quizdash.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// JSON question bank.
    pub questions_path: String,
    /// Directory holding the persisted checkpoint and leaderboard.
    pub save_dir: String,
    /// Game tuning file. `None` uses `QUIZDASH_CONFIG` or the default path.
    pub game_config: Option<String>,
    /// Stop after this many frames. 0 runs until game over.
    pub frames: u64,
    /// Print every Nth frame.
    pub render_every: u64,
    pub cols: usize,
    pub rows: usize,
    /// Drive the player with the built-in autopilot instead of typed commands.
    pub autopilot: bool,
    /// Answer every checkpoint question correctly without prompting.
    pub auto_answer: bool,
    /// Pace frames at the game's tick rate. Off runs as fast as possible.
    pub realtime: bool,
    pub player_name: String,
    /// Remote leaderboard base URL. The token only comes from the environment.
    pub leaderboard_url: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            questions_path: "data/questions.json".to_string(),
            save_dir: ".quizdash".to_string(),
            game_config: None,
            frames: 0,
            render_every: 30,
            cols: 96,
            rows: 24,
            autopilot: true,
            auto_answer: false,
            realtime: true,
            player_name: "Player".to_string(),
            leaderboard_url: None,
        }
    }
}

impl CliConfig {
    /// Load `quizdash.toml` (or the file named by `QUIZDASH_CLI_CONFIG`), then
    /// apply env var overrides.
    pub fn load() -> Self {
        let path = std::env::var("QUIZDASH_CLI_CONFIG")
            .unwrap_or_else(|_| "quizdash.toml".to_string());
        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<CliConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from {path}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    CliConfig::default()
                },
            },
            Err(_) => {
                tracing::debug!("No {path} found, using defaults");
                CliConfig::default()
            },
        };

        if let Ok(path) = std::env::var("QUIZDASH_QUESTIONS")
            && !path.is_empty()
        {
            config.questions_path = path;
        }
        if let Ok(dir) = std::env::var("QUIZDASH_SAVE_DIR")
            && !dir.is_empty()
        {
            config.save_dir = dir;
        }
        if let Ok(name) = std::env::var("QUIZDASH_PLAYER_NAME")
            && !name.is_empty()
        {
            config.player_name = name;
        }
        if let Ok(val) = std::env::var("QUIZDASH_FRAMES")
            && let Ok(n) = val.parse::<u64>()
        {
            config.frames = n;
        }

        config
    }

    /// Apply `--key=value` command-line overrides. Unknown arguments are
    /// logged and skipped.
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator<Item = String>,
    {
        for arg in args {
            if let Some(v) = arg.strip_prefix("--frames=")
                && let Ok(n) = v.parse()
            {
                self.frames = n;
            } else if let Some(v) = arg.strip_prefix("--render-every=")
                && let Ok(n) = v.parse()
            {
                self.render_every = n;
            } else if let Some(v) = arg.strip_prefix("--config=") {
                self.game_config = Some(v.to_string());
            } else if let Some(v) = arg.strip_prefix("--questions=") {
                self.questions_path = v.to_string();
            } else if let Some(v) = arg.strip_prefix("--save-dir=") {
                self.save_dir = v.to_string();
            } else if let Some(v) = arg.strip_prefix("--name=") {
                self.player_name = v.to_string();
            } else if let Some(v) = arg.strip_prefix("--leaderboard-url=") {
                self.leaderboard_url = Some(v.to_string());
            } else if arg == "--auto-answer" {
                self.auto_answer = true;
            } else if arg == "--manual" {
                self.autopilot = false;
            } else if arg == "--fast" {
                self.realtime = false;
            } else {
                tracing::warn!(arg = %arg, "Ignoring unrecognized argument");
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.render_every == 0 {
            return Err("render_every must be > 0".to_string());
        }
        if self.cols == 0 || self.rows == 0 {
            return Err("cols and rows must be > 0".to_string());
        }
        if self.questions_path.trim().is_empty() {
            return Err("questions_path must not be empty".to_string());
        }
        if !self.autopilot && !self.realtime {
            tracing::warn!("Manual play without realtime pacing leaves no time to type commands");
        }
        Ok(())
    }
}
