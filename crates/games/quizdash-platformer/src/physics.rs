use serde::{Deserialize, Serialize};

use quizdash_core::geometry::Rect;

use crate::config::GameConfig;
use crate::effects::{PlayerEffect, PlayerEffects};
use crate::world_gen::Block;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// The single player. `x`/`y` are the sprite's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub grounded: bool,
    pub facing: Facing,
    /// Block the player stood on at the end of the last tick.
    pub ground_block: Option<usize>,
    pub effects: PlayerEffects,
    /// Consecutive defeats inside the combo window.
    pub combo: u32,
}

impl PlayerState {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            vy: 0.0,
            grounded: false,
            facing: Facing::Right,
            ground_block: None,
            effects: PlayerEffects::default(),
            combo: 0,
        }
    }

    pub fn hitbox(&self, cfg: &GameConfig) -> Rect {
        cfg.physics.player_hitbox.at(self.x, self.y)
    }

    pub fn is_attacking(&self) -> bool {
        self.effects.is_active(PlayerEffect::Attack)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.effects.is_active(PlayerEffect::Invulnerable)
    }

    /// Move to `(x, y)` with no velocity, no attack and no combo.
    pub fn respawn_at(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.vy = 0.0;
        self.grounded = false;
        self.ground_block = None;
        self.effects = PlayerEffects::default();
        self.combo = 0;
    }
}

/// Sprite y that puts the player's hitbox bottom on a surface at `surface_y`.
pub fn resting_y(surface_y: f32, cfg: &GameConfig) -> f32 {
    surface_y - cfg.physics.player_hitbox.bottom_offset()
}

/// Input for one tick. `jump` and `attack` are edge-triggered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub attack: bool,
}

/// Advance the player one tick and resolve block collisions.
///
/// Returns `true` when the player fell out of the world.
pub fn tick_player(
    player: &mut PlayerState,
    input: &PlayerInput,
    blocks: &[Block],
    cfg: &GameConfig,
    min_x: f32,
) -> bool {
    let phys = &cfg.physics;

    // Ride floating platforms
    if let Some(block) = player.ground_block.and_then(|i| blocks.get(i)) {
        player.x += block.drift;
    }

    if input.attack && !player.is_attacking() {
        player
            .effects
            .start(PlayerEffect::Attack, cfg.rules.attack_ticks);
    }

    // Horizontal
    let mut dx = 0.0;
    if input.left {
        dx -= phys.move_speed;
        player.facing = Facing::Left;
    }
    if input.right {
        dx += phys.move_speed;
        player.facing = Facing::Right;
    }
    player.x = (player.x + dx).max(min_x);
    resolve_horizontal(player, dx, blocks, cfg);

    // Vertical
    if input.jump && player.grounded {
        player.vy = phys.jump_velocity;
        player.grounded = false;
    }
    player.vy = (player.vy + phys.gravity).min(phys.terminal_velocity);
    let previous = player.hitbox(cfg);
    player.y += player.vy;
    resolve_vertical(player, &previous, blocks, cfg);

    player.hitbox(cfg).top() > cfg.world.viewport_height + phys.fall_margin
}

/// Push the hitbox out of any block it entered sideways. Motion is measured
/// relative to the block so moving platforms shove a still player.
fn resolve_horizontal(player: &mut PlayerState, dx: f32, blocks: &[Block], cfg: &GameConfig) {
    let hb_cfg = cfg.physics.player_hitbox;
    for block in blocks {
        let hb = player.hitbox(cfg);
        if !hb.overlaps(&block.rect) {
            continue;
        }
        let relative = dx - block.drift;
        if relative > 0.0 {
            player.x = block.rect.left() - hb_cfg.offset_x - hb_cfg.width;
        } else if relative < 0.0 {
            player.x = block.rect.right() - hb_cfg.offset_x;
        }
    }
}

fn resolve_vertical(player: &mut PlayerState, previous: &Rect, blocks: &[Block], cfg: &GameConfig) {
    let hb_cfg = cfg.physics.player_hitbox;
    player.grounded = false;
    player.ground_block = None;

    for (i, block) in blocks.iter().enumerate() {
        if !player.hitbox(cfg).overlaps(&block.rect) {
            continue;
        }
        if player.vy >= 0.0 && previous.bottom() <= block.rect.top() {
            // Landed
            player.y = block.rect.top() - hb_cfg.bottom_offset();
            player.vy = 0.0;
            player.grounded = true;
            player.ground_block = Some(i);
        } else if player.vy < 0.0 && previous.top() >= block.rect.bottom() {
            // Bumped head
            player.y = block.rect.bottom() - hb_cfg.offset_y;
            player.vy = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_gen::{BlockKind, FloatingPatrol};
    use proptest::prelude::*;

    const GROUND_Y: f32 = 670.0;

    fn ground() -> Block {
        Block::fixed(Rect::new(-1000.0, GROUND_Y, 10_000.0, 50.0), BlockKind::Ground)
    }

    fn standing_player(cfg: &GameConfig, x: f32) -> PlayerState {
        let mut p = PlayerState::new(x, resting_y(GROUND_Y, cfg));
        p.grounded = true;
        p
    }

    #[test]
    fn gravity_pulls_down() {
        let cfg = GameConfig::default();
        let mut player = PlayerState::new(100.0, 0.0);
        tick_player(&mut player, &PlayerInput::default(), &[], &cfg, 40.0);
        assert_eq!(player.y, cfg.physics.gravity);
        assert!(!player.grounded);
    }

    #[test]
    fn standing_player_stays_grounded() {
        let cfg = GameConfig::default();
        let blocks = vec![ground()];
        let mut player = standing_player(&cfg, 100.0);
        for _ in 0..10 {
            tick_player(&mut player, &PlayerInput::default(), &blocks, &cfg, 40.0);
        }
        assert!(player.grounded);
        assert_eq!(player.y, resting_y(GROUND_Y, &cfg));
        assert_eq!(player.vy, 0.0);
        assert_eq!(player.ground_block, Some(0));
    }

    #[test]
    fn landing_snaps_onto_block_top() {
        let cfg = GameConfig::default();
        let blocks = vec![ground()];
        let mut player = PlayerState::new(100.0, 100.0);
        for _ in 0..200 {
            tick_player(&mut player, &PlayerInput::default(), &blocks, &cfg, 40.0);
            if player.grounded {
                break;
            }
        }
        assert!(player.grounded);
        assert_eq!(player.hitbox(&cfg).bottom(), GROUND_Y);
        assert_eq!(player.vy, 0.0);
    }

    #[test]
    fn left_boundary_clamps() {
        let cfg = GameConfig::default();
        let blocks = vec![ground()];
        let mut player = standing_player(&cfg, 40.0);
        let input = PlayerInput {
            left: true,
            ..Default::default()
        };
        tick_player(&mut player, &input, &blocks, &cfg, 40.0);
        assert_eq!(player.x, 40.0);
        assert_eq!(player.facing, Facing::Left);
    }

    #[test]
    fn jump_only_when_grounded() {
        let cfg = GameConfig::default();
        let blocks = vec![ground()];
        let jump = PlayerInput {
            jump: true,
            ..Default::default()
        };

        let mut player = standing_player(&cfg, 100.0);
        tick_player(&mut player, &jump, &blocks, &cfg, 40.0);
        assert!(player.vy < 0.0);
        assert!(!player.grounded);

        let vy = player.vy;
        tick_player(&mut player, &jump, &blocks, &cfg, 40.0);
        assert_eq!(player.vy, vy + cfg.physics.gravity, "no jump in mid-air");
    }

    #[test]
    fn head_bump_snaps_below_block() {
        let cfg = GameConfig::default();
        let hitbox_top = GROUND_Y - cfg.physics.player_hitbox.height;
        let ceiling = Block::fixed(
            Rect::new(0.0, hitbox_top - 40.0, 400.0, 20.0),
            BlockKind::Platform,
        );
        let blocks = vec![ground(), ceiling.clone()];
        let mut player = standing_player(&cfg, 100.0);
        let jump = PlayerInput {
            jump: true,
            ..Default::default()
        };
        tick_player(&mut player, &jump, &blocks, &cfg, 40.0);
        assert_eq!(player.hitbox(&cfg).top(), ceiling.rect.bottom());
        assert_eq!(player.vy, 0.0);
    }

    #[test]
    fn wall_blocks_walking() {
        let cfg = GameConfig::default();
        let wall = Block::fixed(Rect::new(300.0, 0.0, 40.0, GROUND_Y), BlockKind::Wall);
        let blocks = vec![ground(), wall];
        let mut player = standing_player(&cfg, 100.0);
        let right = PlayerInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..60 {
            tick_player(&mut player, &right, &blocks, &cfg, 40.0);
        }
        assert_eq!(player.hitbox(&cfg).right(), 300.0);
        assert!(player.grounded);
    }

    #[test]
    fn floating_platform_carries_player() {
        let cfg = GameConfig::default();
        let mut platform = Block::floating(
            Rect::new(0.0, 500.0, 400.0, 20.0),
            FloatingPatrol {
                min_x: 0.0,
                max_x: 100.0,
                direction: 1.0,
                speed: 1.0,
            },
        );
        let mut player = PlayerState::new(100.0, resting_y(500.0, &cfg));
        player.grounded = true;
        player.ground_block = Some(0);

        for _ in 0..5 {
            platform.advance();
            let blocks = vec![platform.clone()];
            tick_player(&mut player, &PlayerInput::default(), &blocks, &cfg, 40.0);
        }
        assert_eq!(player.x, 105.0);
        assert!(player.grounded);
    }

    #[test]
    fn attack_starts_timed_flag() {
        let mut cfg = GameConfig::default();
        cfg.rules.attack_ticks = 3;
        let blocks = vec![ground()];
        let mut player = standing_player(&cfg, 100.0);
        let attack = PlayerInput {
            attack: true,
            ..Default::default()
        };
        tick_player(&mut player, &attack, &blocks, &cfg, 40.0);
        assert!(player.is_attacking());
        for _ in 0..3 {
            player.effects.tick();
        }
        assert!(!player.is_attacking());
    }

    #[test]
    fn falling_out_is_reported() {
        let cfg = GameConfig::default();
        let mut player = PlayerState::new(100.0, cfg.world.viewport_height + 500.0);
        assert!(tick_player(
            &mut player,
            &PlayerInput::default(),
            &[],
            &cfg,
            40.0
        ));
    }

    #[test]
    fn respawn_clears_motion_and_effects() {
        let mut player = PlayerState::new(0.0, 0.0);
        player.vy = 12.0;
        player.combo = 3;
        player.effects.start(PlayerEffect::Attack, 10);
        player.respawn_at(50.0, 482.0);
        assert_eq!((player.x, player.y, player.vy, player.combo), (50.0, 482.0, 0.0, 0));
        assert!(!player.is_attacking());
    }

    proptest! {
        #[test]
        fn downward_crossing_rests_exactly_on_top(gap in 0.0f32..25.0, vy in 0.0f32..28.0) {
            let cfg = GameConfig::default();
            let blocks = vec![ground()];
            let mut player = PlayerState::new(100.0, resting_y(GROUND_Y, &cfg) - gap);
            player.vy = vy;
            tick_player(&mut player, &PlayerInput::default(), &blocks, &cfg, 40.0);
            let crossed = gap + 0.01 < (vy + cfg.physics.gravity).min(cfg.physics.terminal_velocity);
            if crossed {
                prop_assert_eq!(player.hitbox(&cfg).bottom(), GROUND_Y);
                prop_assert_eq!(player.vy, 0.0);
                prop_assert!(player.grounded);
            }
        }
    }
}
