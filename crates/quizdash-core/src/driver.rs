use crate::game_trait::FrameGame;

/// Something that can produce a drawable frame from its current state.
pub trait Renderable {
    type Frame;

    fn render(&self) -> Self::Frame;
}

/// Result of one driver frame.
#[derive(Debug)]
pub enum FrameOutcome<F, E> {
    /// Paused: neither updated nor drawn.
    Paused,
    /// Waiting on a question answer: drawn but not updated.
    Suspended(F),
    /// Updated then drawn.
    Advanced { frame: F, events: Vec<E> },
    /// Terminal state reached: drawn, no further updates.
    GameOver(F),
}

impl<F, E> FrameOutcome<F, E> {
    pub fn frame(&self) -> Option<&F> {
        match self {
            Self::Paused => None,
            Self::Suspended(f) | Self::GameOver(f) => Some(f),
            Self::Advanced { frame, .. } => Some(frame),
        }
    }
}

/// Recurring frame callback. Each call to [`FrameDriver::frame`] is one
/// display refresh; the frame counter advances whether or not the game is
/// paused, only the update/draw body is skipped.
pub struct FrameDriver<G> {
    game: G,
    frames: u64,
    updates: u64,
}

impl<G> FrameDriver<G>
where
    G: FrameGame + Renderable,
{
    pub fn new(game: G) -> Self {
        Self {
            game,
            frames: 0,
            updates: 0,
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Frames scheduled so far, including paused ones.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames that ran a gameplay update.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn frame(&mut self, input: &G::Input) -> FrameOutcome<G::Frame, G::Event> {
        self.frames += 1;
        self.game.apply_input(input);

        if self.game.is_paused() {
            return FrameOutcome::Paused;
        }
        if self.game.is_game_over() {
            return FrameOutcome::GameOver(self.game.render());
        }
        if self.game.is_suspended() {
            return FrameOutcome::Suspended(self.game.render());
        }

        let events = self.game.update();
        self.updates += 1;
        let frame = self.game.render();
        if self.game.is_game_over() {
            tracing::debug!(frames = self.frames, "game reached terminal state");
        }
        FrameOutcome::Advanced { frame, events }
    }
}
