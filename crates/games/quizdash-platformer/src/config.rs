use serde::{Deserialize, Serialize};

use quizdash_core::geometry::Hitbox;

/// Gravity added to vertical velocity every tick (pixels/tick², downward).
pub const GRAVITY: f32 = 1.2;
/// Horizontal displacement per tick while a direction is held.
pub const MOVE_SPEED: f32 = 6.0;
/// Vertical velocity applied on jump (negative is up).
pub const JUMP_VELOCITY: f32 = -28.0;
/// Downward speed cap.
pub const TERMINAL_VELOCITY: f32 = 30.0;
/// Player sprite edge length.
pub const PLAYER_SIZE: f32 = 248.0;
/// Player collision box inside the sprite.
pub const PLAYER_HITBOX: Hitbox = Hitbox::new(80.0, 60.0, 88.0, 128.0);
/// Enemy collision box inside the sprite.
pub const ENEMY_HITBOX: Hitbox = Hitbox::new(16.0, 24.0, 64.0, 72.0);

/// Player movement and collision tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_velocity: f32,
    pub terminal_velocity: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub player_hitbox: Hitbox,
    /// Leftmost x the player sprite may reach, relative to the world origin.
    pub min_player_x: f32,
    /// How far below the viewport bottom the hitbox may fall before it
    /// counts as falling out of the world.
    pub fall_margin: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            jump_velocity: JUMP_VELOCITY,
            terminal_velocity: TERMINAL_VELOCITY,
            player_width: PLAYER_SIZE,
            player_height: PLAYER_SIZE,
            player_hitbox: PLAYER_HITBOX,
            min_player_x: 40.0,
            fall_margin: 200.0,
        }
    }
}

/// Viewport and level generation tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Distance from the viewport bottom to the ground surface.
    pub ground_margin: f32,
    pub segment_width: f32,
    pub lookahead: f32,
    pub ground_block_width: f32,
    pub ground_block_height: f32,
    pub wall_width: f32,
    pub platform_interval: f32,
    pub platform_width: f32,
    pub platform_height: f32,
    pub platform_chance: f64,
    /// Platform top height above the ground, inclusive range.
    pub platform_rise_min: u32,
    pub platform_rise_max: u32,
    pub floating_chance: f64,
    pub floating_range: f32,
    pub floating_speed: f32,
    pub coins_per_segment: u32,
    pub coin_size: f32,
    pub coin_value: u32,
    pub platform_coin_chance: f64,
    /// No ground enemies are placed closer than this to the world origin.
    pub spawn_safe_distance: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            ground_margin: 50.0,
            segment_width: 800.0,
            lookahead: 400.0,
            ground_block_width: 100.0,
            ground_block_height: 50.0,
            wall_width: 40.0,
            platform_interval: 200.0,
            platform_width: 160.0,
            platform_height: 20.0,
            platform_chance: 0.5,
            platform_rise_min: 170,
            platform_rise_max: 260,
            floating_chance: 0.3,
            floating_range: 200.0,
            floating_speed: 1.0,
            coins_per_segment: 3,
            coin_size: 30.0,
            coin_value: 10,
            platform_coin_chance: 0.5,
            spawn_safe_distance: 600.0,
        }
    }
}

impl WorldConfig {
    /// Y coordinate of the ground surface.
    pub fn ground_y(&self) -> f32 {
        self.viewport_height - self.ground_margin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub width: f32,
    pub height: f32,
    pub hitbox: Hitbox,
    pub base_speed: f32,
    pub chase_range: f32,
    /// Spacing between ground enemy slots.
    pub spacing: f32,
    pub spawn_chance: f64,
    /// Chance that a static platform hosts a patrolling enemy.
    pub platform_enemy_chance: f64,
    pub bounce_height: f32,
    /// Enemies farther than this from the player are frozen.
    pub activation_distance: f32,
    /// Distance over which speed grows by one base unit.
    pub speed_ramp_distance: f32,
    pub max_speed_multiplier: f32,
    pub defeat_score: u32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            width: 96.0,
            height: 96.0,
            hitbox: ENEMY_HITBOX,
            base_speed: 2.0,
            chase_range: 300.0,
            spacing: 400.0,
            spawn_chance: 0.5,
            platform_enemy_chance: 0.4,
            bounce_height: 150.0,
            activation_distance: 1280.0,
            speed_ramp_distance: 10_000.0,
            max_speed_multiplier: 2.5,
            defeat_score: 50,
        }
    }
}

/// Scoring, lives and checkpoint rules. Durations are in ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub lives: u32,
    /// An extra life is granted every N solved checkpoints.
    pub extra_life_every: u32,
    pub first_checkpoint_x: f32,
    pub checkpoint_interval: f32,
    pub checkpoint_width: f32,
    pub checkpoint_height: f32,
    pub checkpoint_value: u32,
    pub death_penalty_step: f32,
    pub death_penalty_amount: u32,
    pub dying_ticks: u32,
    pub attack_ticks: u32,
    pub combo_window_ticks: u32,
    pub combo_bonus_step: u32,
    pub respawn_grace_ticks: u32,
    pub default_spawn_x: f32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            lives: 3,
            extra_life_every: 5,
            first_checkpoint_x: 2000.0,
            checkpoint_interval: 3000.0,
            checkpoint_width: 40.0,
            checkpoint_height: 80.0,
            checkpoint_value: 30,
            death_penalty_step: 1000.0,
            death_penalty_amount: 100,
            dying_ticks: 60,
            attack_ticks: 18,
            combo_window_ticks: 120,
            combo_bonus_step: 25,
            respawn_grace_ticks: 60,
            default_spawn_x: 50.0,
        }
    }
}

/// Top-level game configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub world: WorldConfig,
    pub enemies: EnemyConfig,
    pub rules: RulesConfig,
    pub seed: u64,
    pub tick_rate_hz: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            world: WorldConfig::default(),
            enemies: EnemyConfig::default(),
            rules: RulesConfig::default(),
            seed: 42,
            tick_rate_hz: 60.0,
        }
    }
}

impl GameConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("QUIZDASH_CONFIG")
            .unwrap_or_else(|_| "config/quizdash.toml".to_string());
        Self::load_from(&path)
    }

    /// Repair values the simulation cannot run with, logging each fix.
    /// Probabilities are clamped into `0.0..=1.0`; non-positive sizes and
    /// rates fall back to their defaults.
    pub fn validate(&mut self) {
        let world = &mut self.world;
        let enemies = &mut self.enemies;
        for (name, chance) in [
            ("world.platform_chance", &mut world.platform_chance),
            ("world.floating_chance", &mut world.floating_chance),
            ("world.platform_coin_chance", &mut world.platform_coin_chance),
            ("enemies.spawn_chance", &mut enemies.spawn_chance),
            ("enemies.platform_enemy_chance", &mut enemies.platform_enemy_chance),
        ] {
            if !(0.0..=1.0).contains(chance) {
                let fixed = if chance.is_nan() {
                    0.0
                } else {
                    chance.clamp(0.0, 1.0)
                };
                tracing::warn!("{name} = {chance} is outside 0.0..=1.0, using {fixed}");
                *chance = fixed;
            }
        }

        let defaults = WorldConfig::default();
        for (name, value, default) in [
            (
                "world.segment_width",
                &mut world.segment_width,
                defaults.segment_width,
            ),
            (
                "world.viewport_width",
                &mut world.viewport_width,
                defaults.viewport_width,
            ),
            (
                "world.viewport_height",
                &mut world.viewport_height,
                defaults.viewport_height,
            ),
            ("tick_rate_hz", &mut self.tick_rate_hz, 60.0),
        ] {
            if value.is_nan() || *value <= 0.0 {
                tracing::warn!("{name} must be > 0 (got {value}), using {default}");
                *value = default;
            }
        }
    }

    pub fn load_from(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<GameConfig>(&content) {
                Ok(mut cfg) => {
                    cfg.validate();
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    GameConfig::default()
                },
            },
            Err(_) => GameConfig::default(),
        }
    }
}
