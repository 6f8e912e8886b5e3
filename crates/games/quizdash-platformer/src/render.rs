use serde::{Deserialize, Serialize};

use quizdash_core::geometry::Rect;

use crate::config::GameConfig;
use crate::physics::Facing;
use crate::world_gen::BlockKind;
use crate::{Phase, QuizDashState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sprite {
    Ground,
    Wall,
    Platform,
    FloatingPlatform,
    Coin,
    Enemy,
    Checkpoint { triggered: bool },
    Player,
}

/// One screen-space draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    pub sprite: Sprite,
    pub rect: Rect,
    pub facing: Option<Facing>,
    /// 1.0 opaque, 0.0 invisible.
    pub alpha: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u32,
    pub lives: u32,
    pub coins: u32,
    pub combo: u32,
    pub distance: u32,
    pub paused: bool,
    pub awaiting_answer: bool,
    pub game_over: bool,
    pub debug: bool,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub camera_x: f32,
    pub width: f32,
    pub height: f32,
    /// Back to front.
    pub commands: Vec<DrawCommand>,
    /// Screen-space collision outlines, only filled in debug mode.
    pub hitboxes: Vec<Rect>,
    pub hud: Hud,
}

/// Camera offset that keeps the player horizontally centered.
pub fn camera_x(player_x: f32, viewport_width: f32) -> f32 {
    player_x - viewport_width / 2.0
}

fn visible(rect: &Rect, width: f32, height: f32) -> bool {
    rect.right() > 0.0 && rect.left() < width && rect.bottom() > 0.0 && rect.top() < height
}

fn facing_of(direction: f32) -> Facing {
    if direction < 0.0 {
        Facing::Left
    } else {
        Facing::Right
    }
}

/// Build the draw list for the current state.
pub fn build_frame(state: &QuizDashState, cfg: &GameConfig, paused: bool, debug: bool) -> Frame {
    let width = cfg.world.viewport_width;
    let height = cfg.world.viewport_height;
    let cam = camera_x(state.player.x, width);
    let mut commands = Vec::new();
    let mut hitboxes = Vec::new();

    let mut push = |sprite: Sprite, world_rect: Rect, facing: Option<Facing>, alpha: f32| {
        let rect = world_rect.translated(-cam, 0.0);
        if visible(&rect, width, height) {
            commands.push(DrawCommand {
                sprite,
                rect,
                facing,
                alpha,
            });
        }
    };

    let world = &state.world;
    for block in &world.blocks {
        let sprite = match (block.kind, block.floating.is_some()) {
            (BlockKind::Ground, _) => Sprite::Ground,
            (BlockKind::Wall, _) => Sprite::Wall,
            (BlockKind::Platform, true) => Sprite::FloatingPlatform,
            (BlockKind::Platform, false) => Sprite::Platform,
        };
        push(sprite, block.rect, None, 1.0);
    }
    for cp in &world.checkpoints {
        push(
            Sprite::Checkpoint {
                triggered: cp.triggered,
            },
            cp.rect,
            None,
            1.0,
        );
    }
    for coin in &world.coins {
        push(Sprite::Coin, coin.rect, None, 1.0);
    }
    for enemy in &world.enemies {
        push(
            Sprite::Enemy,
            enemy.rect,
            Some(facing_of(enemy.direction)),
            1.0,
        );
    }

    let alpha = match state.phase {
        Phase::Dying { remaining } if cfg.rules.dying_ticks > 0 => {
            remaining as f32 / cfg.rules.dying_ticks as f32
        },
        Phase::GameOver => 0.0,
        _ => 1.0,
    };
    let player_rect = Rect::new(
        state.player.x,
        state.player.y,
        cfg.physics.player_width,
        cfg.physics.player_height,
    );
    push(Sprite::Player, player_rect, Some(state.player.facing), alpha);

    if debug {
        let mut outline = |world_rect: Rect| {
            let rect = world_rect.translated(-cam, 0.0);
            if visible(&rect, width, height) {
                hitboxes.push(rect);
            }
        };
        outline(state.player.hitbox(cfg));
        for enemy in &world.enemies {
            outline(enemy.hitbox_rect());
        }
    }

    Frame {
        camera_x: cam,
        width,
        height,
        commands,
        hitboxes,
        hud: Hud {
            score: state.score,
            lives: state.lives,
            coins: state.coins,
            combo: state.player.combo,
            distance: crate::scoring::distance(state.player.x),
            paused,
            awaiting_answer: matches!(state.phase, Phase::AwaitingAnswer { .. }),
            game_over: matches!(state.phase, Phase::GameOver),
            debug,
        },
    }
}

fn glyph(cmd: &DrawCommand) -> char {
    match cmd.sprite {
        Sprite::Ground => '#',
        Sprite::Wall => '|',
        Sprite::Platform => '=',
        Sprite::FloatingPlatform => '~',
        Sprite::Coin => 'o',
        Sprite::Enemy => 'E',
        Sprite::Checkpoint { triggered: false } => '?',
        Sprite::Checkpoint { triggered: true } => '!',
        Sprite::Player if cmd.alpha < 0.5 => '.',
        Sprite::Player => match cmd.facing {
            Some(Facing::Left) => '<',
            _ => '>',
        },
    }
}

/// Cell span `[start, end)` covered by `[lo, hi)` at `scale` units per cell.
fn span(lo: f32, hi: f32, scale: f32, cells: usize) -> (usize, usize) {
    let start = (lo / scale).floor().max(0.0) as usize;
    let end = ((hi / scale).ceil().max(0.0) as usize).min(cells);
    (start.min(cells), end)
}

/// Render a frame as text: one HUD line followed by `rows` lines of `cols`
/// characters.
pub fn rasterize(frame: &Frame, cols: usize, rows: usize) -> String {
    let cols = cols.max(1);
    let rows = rows.max(1);
    let sx = frame.width / cols as f32;
    let sy = frame.height / rows as f32;
    let mut grid = vec![vec![' '; cols]; rows];

    for cmd in &frame.commands {
        let c = glyph(cmd);
        let (c0, c1) = span(cmd.rect.left(), cmd.rect.right(), sx, cols);
        let (r0, r1) = span(cmd.rect.top(), cmd.rect.bottom(), sy, rows);
        for row in &mut grid[r0..r1] {
            for cell in &mut row[c0..c1] {
                *cell = c;
            }
        }
    }

    for hb in &frame.hitboxes {
        let (c0, c1) = span(hb.left(), hb.right(), sx, cols);
        let (r0, r1) = span(hb.top(), hb.bottom(), sy, rows);
        if c0 >= c1 || r0 >= r1 {
            continue;
        }
        for (r, row) in grid.iter_mut().enumerate().take(r1).skip(r0) {
            for (c, cell) in row.iter_mut().enumerate().take(c1).skip(c0) {
                if r == r0 || r == r1 - 1 || c == c0 || c == c1 - 1 {
                    *cell = '+';
                }
            }
        }
    }

    let hud = &frame.hud;
    let mut out = format!(
        "score {}  lives {}  coins {}  dist {}",
        hud.score, hud.lives, hud.coins, hud.distance
    );
    if hud.combo > 1 {
        out.push_str(&format!("  combo x{}", hud.combo));
    }
    for (flag, label) in [
        (hud.paused, "PAUSED"),
        (hud.awaiting_answer, "QUESTION"),
        (hud.game_over, "GAME OVER"),
        (hud.debug, "DEBUG"),
    ] {
        if flag {
            out.push_str(&format!("  [{label}]"));
        }
    }
    out.push('\n');
    for row in grid {
        out.extend(row);
        out.push('\n');
    }
    out
}
