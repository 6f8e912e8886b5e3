use serde::{Deserialize, Serialize};

/// Core trait for a frame-driven single-player game.
///
/// The driver owns scheduling and input collection; the game only handles
/// its own simulation. Every method is called from the single frame loop.
pub trait FrameGame {
    /// Per-frame input snapshot.
    type Input: Default;
    /// Events emitted by `update` (scoring, lives, prompts).
    type Event;

    /// Game metadata for titles and tick rate.
    fn metadata(&self) -> GameMetadata;

    /// Record input for the next update. Toggles (pause, debug) take effect
    /// immediately, transient actions are held until consumed by `update`.
    fn apply_input(&mut self, input: &Self::Input);

    /// Advance the simulation by one tick.
    fn update(&mut self) -> Vec<Self::Event>;

    /// Serialize the full gameplay state.
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace gameplay state from bytes produced by `serialize_state`.
    /// Undecodable input is ignored.
    fn apply_state(&mut self, state: &[u8]);

    fn pause(&mut self);

    fn resume(&mut self);

    fn is_paused(&self) -> bool;

    /// Whether gameplay is suspended waiting on an external collaborator
    /// (a question prompt). Suspended games are still rendered.
    fn is_suspended(&self) -> bool {
        false
    }

    /// Whether the game reached its terminal state.
    fn is_game_over(&self) -> bool;
}

/// Game metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    /// Intended frame rate in Hz. Per-tick constants are tuned for it.
    pub tick_rate_hz: f32,
}

/// Generates the `FrameGame` methods that are identical for every game:
/// `serialize_state`, `apply_state`, `pause`, `resume`, `is_paused`, `is_game_over`.
///
/// Requires the implementing struct to have `state: $StateType` and `paused: bool`
/// fields, and `$StateType` to have an `is_game_over(&self) -> bool` method.
#[macro_export]
macro_rules! quizdash_game_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).expect("game state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            if let Ok(s) = rmp_serde::from_slice::<$StateType>(state) {
                self.state = s;
            }
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_paused(&self) -> bool {
            self.paused
        }

        fn is_game_over(&self) -> bool {
            self.state.is_game_over()
        }
    };
}
