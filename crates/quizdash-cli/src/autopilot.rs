use quizdash_core::geometry::Rect;
use quizdash_core::questions::{Answer, Question};
use quizdash_platformer::{FrameInput, QuizDash};

/// Scripted player: runs right, swings at enemies ahead, hops over walls.
pub struct Autopilot {
    /// Gap to an enemy hitbox that triggers an attack.
    pub attack_range: f32,
    /// Gap to an obstacle that triggers a jump.
    pub jump_range: f32,
    /// Also hop every this many frames, to reach platforms. 0 disables.
    pub hop_every: u64,
    ticks: u64,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            attack_range: 40.0,
            jump_range: 24.0,
            hop_every: 150,
            ticks: 0,
        }
    }
}

impl Autopilot {
    pub fn next_input(&mut self, game: &QuizDash) -> FrameInput {
        let state = game.state();
        let hitbox = state.player.hitbox(game.config());
        self.decide(
            hitbox,
            state.player.grounded,
            state.world.enemies.iter().map(|e| e.hitbox_rect()),
            state.world.blocks.iter().map(|b| b.rect),
        )
    }

    fn decide(
        &mut self,
        hitbox: Rect,
        grounded: bool,
        enemies: impl Iterator<Item = Rect>,
        blocks: impl Iterator<Item = Rect>,
    ) -> FrameInput {
        self.ticks += 1;
        let ahead = |r: &Rect, range: f32| {
            let gap = r.left() - hitbox.right();
            (-hitbox.width..range).contains(&gap)
        };

        let threatened = enemies
            .filter(|r| r.bottom() > hitbox.top() && r.top() < hitbox.bottom())
            .any(|r| ahead(&r, self.attack_range));
        // Anything ahead whose top sits above our feet blocks the run.
        let blocked = blocks
            .filter(|r| r.top() < hitbox.bottom() - 1.0 && r.bottom() > hitbox.top())
            .any(|r| ahead(&r, self.jump_range));
        let hop = self.hop_every > 0 && self.ticks % self.hop_every == 0;

        FrameInput {
            right: true,
            attack: threatened,
            jump: grounded && (blocked || hop),
            ..FrameInput::default()
        }
    }
}

/// The answer that resolves `question` correctly.
pub fn correct_answer(question: &Question) -> Answer {
    match question {
        Question::MultipleChoice { correct_index, .. } => Answer::Choice(*correct_index),
        Question::FreeText { answer, .. } => Answer::Text(answer.clone()),
    }
}
