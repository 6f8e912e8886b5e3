pub mod driver;
pub mod effects;
pub mod game_trait;
pub mod geometry;
pub mod leaderboard;
pub mod questions;
pub mod storage;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::driver::{FrameDriver, Renderable};
    use crate::game_trait::FrameGame;
    use crate::questions::QuestionBank;

    /// Three free-text and two multiple-choice questions.
    pub const SAMPLE_QUESTIONS_JSON: &str = r#"[
        {"question": "Capital of France?", "answer": "Paris"},
        {"question": "Largest planet?", "answer": "Jupiter"},
        {"question": "Chemical symbol for gold?", "answer": "Au"},
        {"question": "2 + 2?", "options": ["3", "4", "5"], "correctIndex": 1},
        {"question": "Which is a mammal?", "options": ["Shark", "Dolphin", "Trout"], "correctIndex": 1}
    ]"#;

    pub fn sample_bank() -> QuestionBank {
        QuestionBank::from_json(SAMPLE_QUESTIONS_JSON).expect("sample bank must parse")
    }

    /// Run N updates with default input, returning all accumulated events.
    pub fn run_game_ticks<G: FrameGame>(game: &mut G, n: usize) -> Vec<G::Event> {
        let input = G::Input::default();
        let mut all_events = Vec::new();
        for _ in 0..n {
            game.apply_input(&input);
            all_events.extend(game.update());
        }
        all_events
    }

    pub fn assert_game_state_changed<G: FrameGame>(game: &G, before: &[u8]) {
        let after = game.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Game state should have changed after operation"
        );
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Every FrameGame implementation should pass these. Game crates call
    // them from their own #[cfg(test)] modules with a concrete instance.

    /// A freshly created game must serialize to non-empty bytes.
    pub fn contract_new_game_has_state<G: FrameGame>(game: &G) {
        assert!(
            !game.serialize_state().is_empty(),
            "serialize_state() must return non-empty bytes for a new game"
        );
    }

    /// apply_input() with meaningful input followed by update() must change state.
    pub fn contract_apply_input_changes_state<G: FrameGame>(game: &mut G, input: &G::Input) {
        let before = game.serialize_state();
        game.apply_input(input);
        game.update();
        assert_game_state_changed(game, &before);
    }

    /// serialize → apply → serialize must be stable.
    pub fn contract_state_roundtrip_preserves<G: FrameGame>(game: &mut G) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// Garbage passed to apply_state() must be ignored.
    pub fn contract_apply_state_ignores_garbage<G: FrameGame>(game: &mut G) {
        let before = game.serialize_state();
        game.apply_state(&[0xc1, 0xff, 0x00]);
        assert_eq!(before, game.serialize_state());
    }

    /// While paused the driver must neither update nor render; after resume
    /// updates continue.
    pub fn contract_pause_stops_updates<G: FrameGame + Renderable>(game: G) {
        let mut driver = FrameDriver::new(game);
        driver.game_mut().pause();
        let before = driver.game().serialize_state();
        let input = G::Input::default();
        for _ in 0..5 {
            assert!(driver.frame(&input).frame().is_none());
        }
        assert_eq!(
            before,
            driver.game().serialize_state(),
            "State must not change while paused"
        );
        assert_eq!(driver.frames(), 5);
        assert_eq!(driver.updates(), 0);

        driver.game_mut().resume();
        driver.frame(&input);
        assert_eq!(driver.updates(), 1, "Updates must continue after resume");
    }
}
