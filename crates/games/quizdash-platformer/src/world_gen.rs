use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use quizdash_core::geometry::Rect;
use quizdash_core::questions::QuestionBank;

use crate::config::GameConfig;
use crate::enemies::{Enemy, EnemyBehavior};
use crate::pickups::{Checkpoint, Coin};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Ground,
    Wall,
    Platform,
}

/// Horizontal patrol of a floating platform. Bounds apply to the block's left edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatingPatrol {
    pub min_x: f32,
    pub max_x: f32,
    pub direction: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub rect: Rect,
    pub kind: BlockKind,
    pub floating: Option<FloatingPatrol>,
    /// Horizontal displacement during the last tick.
    pub drift: f32,
}

impl Block {
    pub fn fixed(rect: Rect, kind: BlockKind) -> Self {
        Self {
            rect,
            kind,
            floating: None,
            drift: 0.0,
        }
    }

    pub fn floating(rect: Rect, patrol: FloatingPatrol) -> Self {
        Self {
            rect,
            kind: BlockKind::Platform,
            floating: Some(patrol),
            drift: 0.0,
        }
    }

    /// Advance a floating block one tick, recording its drift.
    pub fn advance(&mut self) {
        let Some(patrol) = self.floating.as_mut() else {
            self.drift = 0.0;
            return;
        };
        let before = self.rect.x;
        self.rect.x += patrol.direction * patrol.speed;
        if self.rect.x <= patrol.min_x {
            self.rect.x = patrol.min_x;
            patrol.direction = 1.0;
        } else if self.rect.x >= patrol.max_x {
            self.rect.x = patrol.max_x;
            patrol.direction = -1.0;
        }
        self.drift = self.rect.x - before;
    }
}

/// Everything generated so far plus the generator's bookkeeping.
///
/// Nothing is ever pruned. The player may walk back to the boundary wall at
/// `origin`, so terrain, coins and enemies behind the camera stay in place,
/// and `PlayerState::ground_block` indices into `blocks` stay valid for the
/// whole run. Enemies out of activation range cost one distance check per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub blocks: Vec<Block>,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    pub checkpoints: Vec<Checkpoint>,
    /// World x where generation started; the boundary wall sits here.
    pub origin: f32,
    /// Rightmost generated x.
    pub frontier: f32,
    /// Next distance at which a checkpoint may be placed.
    pub next_checkpoint_x: f32,
    /// Question indices already attached to a checkpoint.
    pub used_questions: BTreeSet<usize>,
    pub segments: u32,
}

/// Summary of one generated segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: f32,
    pub end: f32,
    pub enemies: usize,
    pub coins: usize,
    /// Index of the checkpoint placed in this segment, if any.
    pub checkpoint: Option<usize>,
}

impl World {
    /// An empty world whose first segment starts at `origin`.
    pub fn new(origin: f32, next_checkpoint_x: f32) -> Self {
        Self {
            blocks: Vec::new(),
            enemies: Vec::new(),
            coins: Vec::new(),
            checkpoints: Vec::new(),
            origin,
            frontier: origin,
            next_checkpoint_x,
            used_questions: BTreeSet::new(),
            segments: 0,
        }
    }

    /// A world laid out so that a player spawning at `spawn_x` starts inside
    /// its first segment, with the first checkpoint ahead of the spawn.
    pub fn for_spawn(spawn_x: f32, cfg: &GameConfig) -> Self {
        let segment = cfg.world.segment_width.max(1.0);
        let origin = (spawn_x.max(0.0) / segment).floor() * segment;
        let mut next = cfg.rules.first_checkpoint_x;
        if cfg.rules.checkpoint_interval > 0.0 {
            while next <= spawn_x {
                next += cfg.rules.checkpoint_interval;
            }
        }
        Self::new(origin, next)
    }

    /// Whether the frontier is too close to the player's view.
    pub fn needs_segment(&self, player_x: f32, cfg: &GameConfig) -> bool {
        player_x + cfg.world.viewport_width > self.frontier - cfg.world.lookahead
    }

    pub fn advance_floating_blocks(&mut self) {
        for block in &mut self.blocks {
            block.advance();
        }
    }

    /// Append one segment and advance the frontier by the segment width.
    pub fn generate_segment(
        &mut self,
        bank: &QuestionBank,
        cfg: &GameConfig,
        rng: &mut impl Rng,
    ) -> Segment {
        let w = &cfg.world;
        let start = self.frontier;
        let end = start + w.segment_width.max(1.0);
        let ground_y = w.ground_y();
        let enemies_before = self.enemies.len();
        let coins_before = self.coins.len();

        if self.segments == 0 {
            self.blocks.push(Block::fixed(
                Rect::new(start, 0.0, w.wall_width, ground_y),
                BlockKind::Wall,
            ));
        }

        self.place_ground(start, end, cfg);
        self.place_platforms(start, end, cfg, rng);
        self.place_ground_enemies(start, end, cfg, rng);

        let coin_room = (w.segment_width - w.coin_size).max(0.0);
        for _ in 0..w.coins_per_segment {
            let x = start + rng.random_range(0.0..=coin_room);
            self.coins.push(Coin {
                rect: Rect::new(x, ground_y - w.coin_size - 40.0, w.coin_size, w.coin_size),
                value: w.coin_value,
            });
        }

        let checkpoint = self.place_checkpoint(start, end, bank, cfg, rng);

        self.frontier = end;
        self.segments += 1;
        let segment = Segment {
            start,
            end,
            enemies: self.enemies.len() - enemies_before,
            coins: self.coins.len() - coins_before,
            checkpoint,
        };
        tracing::debug!(
            start,
            end,
            enemies = segment.enemies,
            coins = segment.coins,
            checkpoint = ?segment.checkpoint,
            "generated segment"
        );
        segment
    }

    fn place_ground(&mut self, start: f32, end: f32, cfg: &GameConfig) {
        let w = &cfg.world;
        let step = w.ground_block_width.max(1.0);
        let mut x = start;
        while x < end {
            let width = step.min(end - x);
            self.blocks.push(Block::fixed(
                Rect::new(x, w.ground_y(), width, w.ground_block_height),
                BlockKind::Ground,
            ));
            x += step;
        }
    }

    fn place_platforms(&mut self, start: f32, end: f32, cfg: &GameConfig, rng: &mut impl Rng) {
        let w = &cfg.world;
        let e = &cfg.enemies;
        let interval = w.platform_interval.max(1.0);
        let mut x = start + interval / 2.0;
        while x + w.platform_width <= end {
            if rng.random_bool(w.platform_chance) {
                let (lo, hi) = (
                    w.platform_rise_min.min(w.platform_rise_max),
                    w.platform_rise_max.max(w.platform_rise_min),
                );
                let rise = rng.random_range(lo..=hi) as f32;
                let rect = Rect::new(x, w.ground_y() - rise, w.platform_width, w.platform_height);

                if rng.random_bool(w.floating_chance) {
                    let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                    self.blocks.push(Block::floating(
                        rect,
                        FloatingPatrol {
                            min_x: x - w.floating_range / 2.0,
                            max_x: x + w.floating_range / 2.0,
                            direction,
                            speed: w.floating_speed,
                        },
                    ));
                } else {
                    self.blocks.push(Block::fixed(rect, BlockKind::Platform));
                    if rng.random_bool(e.platform_enemy_chance) {
                        let stand_y = rect.top() - e.hitbox.bottom_offset();
                        self.enemies.push(Enemy::new(
                            Rect::new(x, stand_y, e.width, e.height),
                            e.hitbox,
                            1.0,
                            EnemyBehavior::Patrol {
                                bounds: Some((rect.left(), rect.right())),
                            },
                        ));
                    }
                }

                if rng.random_bool(w.platform_coin_chance) {
                    self.coins.push(Coin {
                        rect: Rect::new(
                            rect.center_x() - w.coin_size / 2.0,
                            rect.top() - w.coin_size - 20.0,
                            w.coin_size,
                            w.coin_size,
                        ),
                        value: w.coin_value,
                    });
                }
            }
            x += interval;
        }
    }

    fn place_ground_enemies(&mut self, start: f32, end: f32, cfg: &GameConfig, rng: &mut impl Rng) {
        let e = &cfg.enemies;
        let spacing = e.spacing.max(1.0);
        let stand_y = cfg.world.ground_y() - e.hitbox.bottom_offset();
        let mut x = start + spacing / 2.0;
        while x + e.width <= end {
            if x - self.origin >= cfg.world.spawn_safe_distance && rng.random_bool(e.spawn_chance)
            {
                let behavior = match rng.random_range(0..3) {
                    0 => EnemyBehavior::Patrol { bounds: None },
                    1 => EnemyBehavior::Chase {
                        range: e.chase_range,
                    },
                    _ => EnemyBehavior::VerticalBounce {
                        min_y: stand_y - e.bounce_height,
                        max_y: stand_y,
                    },
                };
                let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                self.enemies.push(Enemy::new(
                    Rect::new(x, stand_y, e.width, e.height),
                    e.hitbox,
                    direction,
                    behavior,
                ));
            }
            x += spacing;
        }
    }

    /// Place a checkpoint when the segment reaches the threshold and a
    /// question is left. Without a question the threshold stays put.
    fn place_checkpoint(
        &mut self,
        start: f32,
        end: f32,
        bank: &QuestionBank,
        cfg: &GameConfig,
        rng: &mut impl Rng,
    ) -> Option<usize> {
        if end < self.next_checkpoint_x {
            return None;
        }
        let question = bank.draw(&mut self.used_questions, rng)?;
        let r = &cfg.rules;
        let x = self.next_checkpoint_x.max(start).min(end - r.checkpoint_width);
        self.checkpoints.push(Checkpoint {
            rect: Rect::new(
                x,
                cfg.world.ground_y() - r.checkpoint_height,
                r.checkpoint_width,
                r.checkpoint_height,
            ),
            question,
            triggered: false,
            value: r.checkpoint_value,
        });
        self.next_checkpoint_x += r.checkpoint_interval;
        Some(self.checkpoints.len() - 1)
    }
}
