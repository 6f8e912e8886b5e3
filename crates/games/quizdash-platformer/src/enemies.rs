use serde::{Deserialize, Serialize};

use quizdash_core::geometry::{Hitbox, Rect};

use crate::config::EnemyConfig;
use crate::world_gen::Block;

/// Edge length of the terrain probe ahead of a walking enemy.
const PROBE_SIZE: f32 = 5.0;

/// Enemy movement behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyBehavior {
    /// Walk horizontally, reversing at blocks or at the optional `(min_x, max_x)`
    /// bounds of the sprite.
    Patrol { bounds: Option<(f32, f32)> },
    /// Walk toward the player while within `range`, patrol otherwise.
    Chase { range: f32 },
    /// Move up and down between `min_y` and `max_y` (sprite top).
    VerticalBounce { min_y: f32, max_y: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    pub hitbox: Hitbox,
    /// +1 or -1. Horizontal for walkers, vertical (+1 down) for bouncers.
    pub direction: f32,
    pub active: bool,
    /// 1 alive, 0 defeated.
    pub health: u8,
    pub behavior: EnemyBehavior,
}

impl Enemy {
    pub fn new(rect: Rect, hitbox: Hitbox, direction: f32, behavior: EnemyBehavior) -> Self {
        Self {
            rect,
            hitbox,
            direction,
            active: false,
            health: 1,
            behavior,
        }
    }

    pub fn hitbox_rect(&self) -> Rect {
        self.hitbox.at(self.rect.x, self.rect.y)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Small box at foot level just ahead of the hitbox in the walking direction.
    fn probe(&self) -> Rect {
        let hb = self.hitbox_rect();
        let x = if self.direction > 0.0 {
            hb.right()
        } else {
            hb.left() - PROBE_SIZE
        };
        Rect::new(x, hb.bottom() - PROBE_SIZE, PROBE_SIZE, PROBE_SIZE)
    }

    fn walk(&mut self, blocks: &[Block], speed: f32, bounds: Option<(f32, f32)>) {
        if blocks.iter().any(|b| b.rect.overlaps(&self.probe())) {
            self.direction = -self.direction;
            return;
        }
        self.rect.x += self.direction * speed;
        if let Some((min_x, max_x)) = bounds {
            if self.rect.x <= min_x {
                self.rect.x = min_x;
                self.direction = 1.0;
            } else if self.rect.right() >= max_x {
                self.rect.x = max_x - self.rect.width;
                self.direction = -1.0;
            }
        }
    }

    fn bounce(&mut self, blocks: &[Block], speed: f32, min_y: f32, max_y: f32) {
        let previous_y = self.rect.y;
        self.rect.y += self.direction * speed;
        let hb = self.hitbox_rect();
        if blocks.iter().any(|b| b.rect.overlaps(&hb)) {
            self.rect.y = previous_y;
            self.direction = -self.direction;
            return;
        }
        if self.rect.y <= min_y {
            self.rect.y = min_y;
            self.direction = 1.0;
        } else if self.rect.y >= max_y {
            self.rect.y = max_y;
            self.direction = -1.0;
        }
    }

    /// Advance one tick toward or around a player whose hitbox center is at
    /// `player_center_x`.
    pub fn advance(&mut self, blocks: &[Block], speed: f32, player_center_x: f32) {
        match self.behavior {
            EnemyBehavior::Patrol { bounds } => self.walk(blocks, speed, bounds),
            EnemyBehavior::Chase { range } => {
                let dx = player_center_x - self.hitbox_rect().center_x();
                if dx.abs() < range && dx != 0.0 {
                    self.direction = dx.signum();
                }
                self.walk(blocks, speed, None);
            },
            EnemyBehavior::VerticalBounce { min_y, max_y } => {
                self.bounce(blocks, speed, min_y, max_y);
            },
        }
    }
}

/// What happened between the player and the enemies in one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnemyPass {
    /// Number of enemies defeated by the player's attack.
    pub defeated: u32,
    /// Whether an enemy struck the (non-attacking) player.
    pub player_hit: bool,
}

/// Move every active enemy, resolve contact with the player and remove
/// defeated enemies.
///
/// At most one hit on the player is reported per pass. A `vulnerable` of
/// `false` ignores contact unless the player is attacking.
pub fn step_enemies(
    enemies: &mut Vec<Enemy>,
    blocks: &[Block],
    player_hitbox: &Rect,
    attacking: bool,
    vulnerable: bool,
    cfg: &EnemyConfig,
    speed_multiplier: f32,
) -> EnemyPass {
    let speed = cfg.base_speed * speed_multiplier;
    let player_center_x = player_hitbox.center_x();
    let mut pass = EnemyPass::default();

    for enemy in enemies.iter_mut() {
        enemy.active =
            (enemy.hitbox_rect().center_x() - player_center_x).abs() <= cfg.activation_distance;
        if !enemy.active || !enemy.is_alive() {
            continue;
        }

        enemy.advance(blocks, speed, player_center_x);

        if !enemy.hitbox_rect().overlaps(player_hitbox) {
            continue;
        }
        if attacking {
            enemy.health = 0;
            pass.defeated += 1;
            tracing::debug!(x = enemy.rect.x, "enemy defeated");
        } else if vulnerable && !pass.player_hit {
            pass.player_hit = true;
        }
    }

    enemies.retain(Enemy::is_alive);
    pass
}
