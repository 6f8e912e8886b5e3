pub mod config;
pub mod effects;
pub mod enemies;
pub mod physics;
pub mod pickups;
pub mod render;
pub mod scoring;
pub mod world_gen;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use quizdash_core::driver::Renderable;
use quizdash_core::game_trait::{FrameGame, GameMetadata};
use quizdash_core::leaderboard::{Leaderboard, LeaderboardEntry};
use quizdash_core::questions::{Answer, Question, QuestionBank};
use quizdash_core::quizdash_game_boilerplate;
use quizdash_core::storage::KeyValueStore;

use config::GameConfig;
use effects::PlayerEffect;
use physics::{PlayerInput, PlayerState, resting_y, tick_player};
use pickups::SavedCheckpoint;
use render::Frame;
use world_gen::World;

/// Where the game is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Playing,
    /// Lost a life; fading out before respawning.
    Dying { remaining: u32 },
    /// Gameplay suspended until [`QuizDash::answer`] is called.
    AwaitingAnswer { checkpoint: usize },
    /// No lives left. Only [`QuizDash::restart`] leaves this phase.
    GameOver,
}

/// Serializable gameplay state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizDashState {
    pub player: PlayerState,
    pub world: World,
    pub score: u32,
    pub lives: u32,
    pub coins: u32,
    pub checkpoints_solved: u32,
    pub phase: Phase,
    /// Respawn point: the saved checkpoint, or the default spawn.
    pub spawn: SavedCheckpoint,
    pub ticks: u64,
}

impl QuizDashState {
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

/// Per-frame input snapshot from the keyboard (or a script).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub attack: bool,
    pub toggle_pause: bool,
    pub toggle_debug: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SegmentGenerated { start: f32, end: f32, checkpoint: bool },
    CoinCollected { value: u32, score: u32 },
    EnemyDefeated { points: u32, combo: u32 },
    LifeLost { lives: u32, penalty: u32 },
    Respawned { x: f32, y: f32 },
    QuestionPosed { checkpoint: usize, question: usize },
    CheckpointSaved { x: f32, y: f32, value: u32 },
    AnswerRejected { checkpoint: usize },
    ExtraLife { lives: u32 },
    GameOver { score: u32 },
}

/// Shown while paused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseSummary {
    pub score: u32,
    pub coins: u32,
    pub distance: u32,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// The side-scrolling trivia platformer.
pub struct QuizDash {
    config: GameConfig,
    bank: QuestionBank,
    state: QuizDashState,
    rng: StdRng,
    store: Box<dyn KeyValueStore + Send>,
    leaderboard: Leaderboard,
    pending: PlayerInput,
    paused: bool,
    debug: bool,
}

impl QuizDash {
    /// Start a game, resuming from the saved checkpoint in `store` if any.
    pub fn new(
        mut config: GameConfig,
        bank: QuestionBank,
        store: Box<dyn KeyValueStore + Send>,
    ) -> Self {
        config.validate();
        let saved = SavedCheckpoint::load(&*store);
        if let Some(cp) = saved {
            tracing::info!(x = cp.x, y = cp.y, "resuming from saved checkpoint");
        }
        let leaderboard = Leaderboard::load(&*store);
        let state = Self::fresh_state(&config, saved);
        let mut game = Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            bank,
            state,
            store,
            leaderboard,
            pending: PlayerInput::default(),
            paused: false,
            debug: false,
        };
        game.extend_world(&mut Vec::new());
        game
    }

    fn fresh_state(config: &GameConfig, saved: Option<SavedCheckpoint>) -> QuizDashState {
        let spawn = saved.unwrap_or(SavedCheckpoint {
            x: config.rules.default_spawn_x,
            y: resting_y(config.world.ground_y(), config),
        });
        QuizDashState {
            player: PlayerState::new(spawn.x, spawn.y),
            world: World::for_spawn(spawn.x, config),
            score: 0,
            lives: config.rules.lives,
            coins: 0,
            checkpoints_solved: 0,
            phase: Phase::Playing,
            spawn,
            ticks: 0,
        }
    }

    pub fn state(&self) -> &QuizDashState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// The question waiting for an answer, if any.
    pub fn pending_question(&self) -> Option<&Question> {
        match self.state.phase {
            Phase::AwaitingAnswer { checkpoint } => self
                .state
                .world
                .checkpoints
                .get(checkpoint)
                .and_then(|cp| self.bank.get(cp.question)),
            _ => None,
        }
    }

    /// Resolve the pending question. A correct answer awards the checkpoint
    /// value and saves progress; a wrong or dismissed one only resumes play.
    pub fn answer(&mut self, answer: &Answer) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let Phase::AwaitingAnswer { checkpoint } = self.state.phase else {
            return events;
        };
        self.state.phase = Phase::Playing;
        let Some(cp) = self.state.world.checkpoints.get(checkpoint).cloned() else {
            return events;
        };

        let correct = self
            .bank
            .get(cp.question)
            .is_some_and(|q| q.is_correct(answer));
        if !correct {
            tracing::info!(checkpoint, "checkpoint answer rejected");
            events.push(GameEvent::AnswerRejected { checkpoint });
            return events;
        }

        self.state.score += cp.value;
        self.state.checkpoints_solved += 1;
        let saved = SavedCheckpoint {
            x: cp.rect.x,
            y: resting_y(cp.rect.bottom(), &self.config),
        };
        self.state.spawn = saved;
        if let Err(e) = saved.save(&mut *self.store) {
            tracing::warn!(error = %e, "failed to persist checkpoint");
        }
        tracing::info!(x = saved.x, score = self.state.score, "checkpoint saved");
        events.push(GameEvent::CheckpointSaved {
            x: saved.x,
            y: saved.y,
            value: cp.value,
        });

        let every = self.config.rules.extra_life_every;
        if every > 0 && self.state.checkpoints_solved % every == 0 {
            self.state.lives += 1;
            events.push(GameEvent::ExtraLife {
                lives: self.state.lives,
            });
        }
        events
    }

    /// Record the current score on the local leaderboard. Returns the rank
    /// (0-based) if the score made the board.
    pub fn submit_score(&mut self, name: &str) -> Option<usize> {
        let entry = LeaderboardEntry::new(name, self.state.score);
        tracing::info!(name = %entry.name, score = entry.score, "submitting score");
        let rank = self.leaderboard.insert(entry);
        if let Err(e) = self.leaderboard.save(&mut *self.store) {
            tracing::warn!(error = %e, "failed to persist leaderboard");
        }
        rank
    }

    /// Refresh the cached leaderboard, e.g. from a remote fetch.
    pub fn replace_leaderboard(&mut self, entries: Vec<LeaderboardEntry>) {
        self.leaderboard.replace(entries);
        if let Err(e) = self.leaderboard.save(&mut *self.store) {
            tracing::warn!(error = %e, "failed to persist leaderboard");
        }
    }

    /// Forget the saved checkpoint and start over from the default spawn.
    pub fn restart(&mut self) {
        if let Err(e) = SavedCheckpoint::clear(&mut *self.store) {
            tracing::warn!(error = %e, "failed to clear saved checkpoint");
        }
        self.state = Self::fresh_state(&self.config, None);
        self.pending = PlayerInput::default();
        self.paused = false;
        self.extend_world(&mut Vec::new());
        tracing::info!("game restarted");
    }

    pub fn pause_summary(&self) -> PauseSummary {
        PauseSummary {
            score: self.state.score,
            coins: self.state.coins,
            distance: scoring::distance(self.state.player.x),
            leaderboard: self.leaderboard.entries().to_vec(),
        }
    }

    fn min_player_x(&self) -> f32 {
        self.state.world.origin + self.config.physics.min_player_x
    }

    fn extend_world(&mut self, events: &mut Vec<GameEvent>) {
        while self
            .state
            .world
            .needs_segment(self.state.player.x, &self.config)
        {
            let segment = self
                .state
                .world
                .generate_segment(&self.bank, &self.config, &mut self.rng);
            events.push(GameEvent::SegmentGenerated {
                start: segment.start,
                end: segment.end,
                checkpoint: segment.checkpoint.is_some(),
            });
        }
    }

    fn award_defeat(&mut self, events: &mut Vec<GameEvent>) {
        let rules = &self.config.rules;
        let player = &mut self.state.player;
        player.combo += 1;
        let points = self.config.enemies.defeat_score
            + scoring::combo_bonus(player.combo, rules.combo_bonus_step);
        player
            .effects
            .start(PlayerEffect::ComboWindow, rules.combo_window_ticks);
        self.state.score += points;
        events.push(GameEvent::EnemyDefeated {
            points,
            combo: player.combo,
        });
    }

    fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        let rules = &self.config.rules;
        let penalty = scoring::death_penalty(
            self.state.player.x,
            rules.death_penalty_step,
            rules.death_penalty_amount,
        );
        self.state.score = self.state.score.saturating_sub(penalty);
        self.state.lives = self.state.lives.saturating_sub(1);
        self.state.player.combo = 0;
        self.state.player.effects.clear(PlayerEffect::ComboWindow);
        events.push(GameEvent::LifeLost {
            lives: self.state.lives,
            penalty,
        });
        tracing::debug!(lives = self.state.lives, penalty, "life lost");

        if self.state.lives == 0 {
            self.state.phase = Phase::GameOver;
            tracing::info!(score = self.state.score, "game over");
            events.push(GameEvent::GameOver {
                score: self.state.score,
            });
        } else if rules.dying_ticks == 0 {
            self.respawn(events);
        } else {
            self.state.phase = Phase::Dying {
                remaining: rules.dying_ticks,
            };
        }
    }

    fn respawn(&mut self, events: &mut Vec<GameEvent>) {
        let spawn = self.state.spawn;
        self.state.player.respawn_at(spawn.x, spawn.y);
        self.state.player.effects.start(
            PlayerEffect::Invulnerable,
            self.config.rules.respawn_grace_ticks,
        );
        self.state.phase = Phase::Playing;
        events.push(GameEvent::Respawned {
            x: spawn.x,
            y: spawn.y,
        });
    }

    fn take_input(&mut self) -> PlayerInput {
        let input = self.pending;
        self.pending.jump = false;
        self.pending.attack = false;
        input
    }
}

impl FrameGame for QuizDash {
    type Input = FrameInput;
    type Event = GameEvent;

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "QuizDash".to_string(),
            description: "Run, jump and answer trivia to save your progress!".to_string(),
            tick_rate_hz: self.config.tick_rate_hz,
        }
    }

    fn apply_input(&mut self, input: &FrameInput) {
        if input.toggle_pause {
            self.paused = !self.paused;
            tracing::debug!(paused = self.paused, "pause toggled");
        }
        if input.toggle_debug {
            self.debug = !self.debug;
        }
        // Held directions always take the latest value; jump and attack
        // accumulate until the next update consumes them.
        self.pending.left = input.left;
        self.pending.right = input.right;
        if !self.paused {
            self.pending.jump |= input.jump;
            self.pending.attack |= input.attack;
        }
    }

    fn update(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.paused {
            return events;
        }
        match self.state.phase {
            Phase::GameOver | Phase::AwaitingAnswer { .. } => return events,
            Phase::Dying { remaining } => {
                if remaining > 1 {
                    self.state.phase = Phase::Dying {
                        remaining: remaining - 1,
                    };
                } else {
                    self.respawn(&mut events);
                }
                return events;
            },
            Phase::Playing => {},
        }

        self.state.ticks += 1;
        let input = self.take_input();

        self.extend_world(&mut events);
        self.state.world.advance_floating_blocks();

        for expired in self.state.player.effects.tick() {
            if expired == PlayerEffect::ComboWindow {
                self.state.player.combo = 0;
            }
        }

        let min_x = self.min_player_x();
        let fell_out = tick_player(
            &mut self.state.player,
            &input,
            &self.state.world.blocks,
            &self.config,
            min_x,
        );
        if fell_out {
            self.lose_life(&mut events);
            return events;
        }

        let hitbox = self.state.player.hitbox(&self.config);
        let multiplier = scoring::speed_multiplier(
            self.state.player.x,
            self.config.enemies.speed_ramp_distance,
            self.config.enemies.max_speed_multiplier,
        );
        let pass = enemies::step_enemies(
            &mut self.state.world.enemies,
            &self.state.world.blocks,
            &hitbox,
            self.state.player.is_attacking(),
            !self.state.player.is_invulnerable(),
            &self.config.enemies,
            multiplier,
        );
        for _ in 0..pass.defeated {
            self.award_defeat(&mut events);
        }
        if pass.player_hit {
            self.lose_life(&mut events);
            return events;
        }

        for value in pickups::collect_coins(&mut self.state.world.coins, &hitbox) {
            self.state.score += value;
            self.state.coins += 1;
            events.push(GameEvent::CoinCollected {
                value,
                score: self.state.score,
            });
        }

        if let Some(checkpoint) =
            pickups::trigger_checkpoint(&mut self.state.world.checkpoints, &hitbox)
        {
            let question = self.state.world.checkpoints[checkpoint].question;
            self.state.phase = Phase::AwaitingAnswer { checkpoint };
            tracing::info!(checkpoint, question, "checkpoint reached");
            events.push(GameEvent::QuestionPosed {
                checkpoint,
                question,
            });
        }

        events
    }

    quizdash_game_boilerplate!(state_type: QuizDashState);

    fn is_suspended(&self) -> bool {
        matches!(self.state.phase, Phase::AwaitingAnswer { .. })
    }
}

impl Renderable for QuizDash {
    type Frame = Frame;

    fn render(&self) -> Frame {
        render::build_frame(&self.state, &self.config, self.paused, self.debug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enemies::{Enemy, EnemyBehavior};
    use pickups::{Checkpoint, Coin};
    use quizdash_core::driver::{FrameDriver, FrameOutcome};
    use quizdash_core::geometry::Rect;
    use quizdash_core::storage::{CHECKPOINT_KEY, MemoryStorage};
    use quizdash_core::test_helpers::{
        contract_apply_input_changes_state, contract_apply_state_ignores_garbage,
        contract_new_game_has_state, contract_pause_stops_updates,
        contract_state_roundtrip_preserves, run_game_ticks, sample_bank,
    };

    /// Config with no random hazards near the spawn and instant respawns.
    fn quiet_config() -> GameConfig {
        let mut cfg = GameConfig::default();
        cfg.enemies.spawn_chance = 0.0;
        cfg.enemies.platform_enemy_chance = 0.0;
        cfg.world.coins_per_segment = 0;
        cfg.world.platform_coin_chance = 0.0;
        cfg.rules.dying_ticks = 0;
        cfg.rules.respawn_grace_ticks = 0;
        cfg
    }

    fn game_with(cfg: GameConfig) -> QuizDash {
        QuizDash::new(cfg, sample_bank(), Box::new(MemoryStorage::new()))
    }

    /// Run until the player is standing on the ground.
    fn settle(game: &mut QuizDash) {
        run_game_ticks(game, 2);
        assert!(game.state.player.grounded);
    }

    fn enemy_on_player(game: &QuizDash) -> Enemy {
        let hb = game.state.player.hitbox(&game.config);
        let e = &game.config.enemies;
        Enemy::new(
            Rect::new(
                hb.center_x() - e.width / 2.0,
                hb.bottom() - e.hitbox.bottom_offset(),
                e.width,
                e.height,
            ),
            e.hitbox,
            1.0,
            EnemyBehavior::Patrol { bounds: None },
        )
    }

    /// Place a checkpoint for `question` under the player, returning its index.
    fn checkpoint_on_player(game: &mut QuizDash, question: usize) -> usize {
        let hb = game.state.player.hitbox(&game.config);
        game.state.world.checkpoints.push(Checkpoint {
            rect: Rect::new(hb.center_x(), hb.bottom() - 80.0, 40.0, 80.0),
            question,
            triggered: false,
            value: 30,
        });
        game.state.world.checkpoints.len() - 1
    }

    /// Trigger a checkpoint asking "Capital of France?".
    fn pose_question(game: &mut QuizDash) -> usize {
        settle(game);
        let index = checkpoint_on_player(game, 0);
        let events = run_game_ticks(game, 1);
        assert!(events.contains(&GameEvent::QuestionPosed {
            checkpoint: index,
            question: 0
        }));
        index
    }

    // ================================================================
    // Game trait contract
    // ================================================================

    #[test]
    fn contract_new_game() {
        contract_new_game_has_state(&game_with(quiet_config()));
    }

    #[test]
    fn contract_input_changes_state() {
        let mut game = game_with(quiet_config());
        let input = FrameInput {
            right: true,
            ..Default::default()
        };
        contract_apply_input_changes_state(&mut game, &input);
    }

    #[test]
    fn contract_roundtrip() {
        let mut game = game_with(GameConfig::default());
        run_game_ticks(&mut game, 30);
        contract_state_roundtrip_preserves(&mut game);
        contract_apply_state_ignores_garbage(&mut game);
    }

    #[test]
    fn contract_pause() {
        contract_pause_stops_updates(game_with(quiet_config()));
    }

    // ================================================================
    // Gameplay
    // ================================================================

    #[test]
    fn new_game_generates_ahead_of_view() {
        let game = game_with(GameConfig::default());
        let cfg = &game.config;
        assert!(
            game.state.world.frontier - cfg.world.lookahead
                >= game.state.player.x + cfg.world.viewport_width
        );
        assert_eq!(game.state.lives, 3);
        assert_eq!(game.state.phase, Phase::Playing);
    }

    #[test]
    fn walking_right_extends_frontier() {
        let mut game = game_with(quiet_config());
        let before = game.state.world.frontier;
        let right = FrameInput {
            right: true,
            ..Default::default()
        };
        let mut generated = 0;
        for _ in 0..300 {
            game.apply_input(&right);
            generated += game
                .update()
                .iter()
                .filter(|e| matches!(e, GameEvent::SegmentGenerated { .. }))
                .count();
        }
        assert!(generated > 0);
        assert!(game.state.world.frontier > before);
    }

    #[test]
    fn coin_adds_exact_value() {
        let mut game = game_with(quiet_config());
        settle(&mut game);
        let hb = game.state.player.hitbox(&game.config);
        game.state.world.coins.push(Coin {
            rect: Rect::new(hb.x, hb.y, 30.0, 30.0),
            value: 17,
        });
        let events = run_game_ticks(&mut game, 1);
        assert_eq!(game.state.score, 17);
        assert_eq!(game.state.coins, 1);
        assert!(events.contains(&GameEvent::CoinCollected {
            value: 17,
            score: 17
        }));
        run_game_ticks(&mut game, 1);
        assert_eq!(game.state.score, 17, "coin must not be collected twice");
    }

    #[test]
    fn attack_defeats_enemy_without_losing_life() {
        let mut game = game_with(quiet_config());
        settle(&mut game);
        let enemy = enemy_on_player(&game);
        game.state.world.enemies = vec![enemy];

        game.apply_input(&FrameInput {
            attack: true,
            ..Default::default()
        });
        let events = game.update();
        assert!(game.state.world.enemies.is_empty());
        assert_eq!(game.state.lives, 3);
        assert_eq!(game.state.score, game.config.enemies.defeat_score);
        assert!(events.contains(&GameEvent::EnemyDefeated {
            points: 50,
            combo: 1
        }));
    }

    #[test]
    fn consecutive_defeats_build_combo_that_decays() {
        let mut cfg = quiet_config();
        cfg.rules.combo_window_ticks = 5;
        let mut game = game_with(cfg);
        settle(&mut game);

        game.state.world.enemies = vec![enemy_on_player(&game), enemy_on_player(&game)];
        game.apply_input(&FrameInput {
            attack: true,
            ..Default::default()
        });
        game.update();
        assert_eq!(game.state.player.combo, 2);
        assert_eq!(game.state.score, 50 + 75);

        run_game_ticks(&mut game, 6);
        assert_eq!(game.state.player.combo, 0);
    }

    #[test]
    fn three_hits_end_the_game() {
        let mut game = game_with(quiet_config());
        settle(&mut game);
        game.state.world.enemies = vec![enemy_on_player(&game)];

        let mut lives_lost = 0;
        let mut last = Vec::new();
        for _ in 0..10 {
            last = run_game_ticks(&mut game, 1);
            lives_lost += last
                .iter()
                .filter(|e| matches!(e, GameEvent::LifeLost { .. }))
                .count();
            if game.state.is_game_over() {
                break;
            }
        }
        assert_eq!(lives_lost, 3);
        assert_eq!(game.state.lives, 0);
        assert!(game.is_game_over());
        assert!(last.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));

        let before = game.serialize_state();
        run_game_ticks(&mut game, 5);
        assert_eq!(before, game.serialize_state(), "game over is terminal");
    }

    #[test]
    fn death_applies_distance_penalty() {
        let mut game = game_with(quiet_config());
        settle(&mut game);
        game.state.score = 500;
        game.state.player.x = 2_500.0;
        game.extend_world(&mut Vec::new());
        settle(&mut game);
        game.state.world.enemies = vec![enemy_on_player(&game)];
        let events = run_game_ticks(&mut game, 1);
        assert!(events.contains(&GameEvent::LifeLost {
            lives: 2,
            penalty: 200
        }));
        assert_eq!(game.state.score, 300);
    }

    #[test]
    fn penalty_never_drives_score_negative() {
        let mut game = game_with(quiet_config());
        settle(&mut game);
        game.state.player.x = 9_000.0;
        game.extend_world(&mut Vec::new());
        settle(&mut game);
        game.state.world.enemies = vec![enemy_on_player(&game)];
        run_game_ticks(&mut game, 1);
        assert_eq!(game.state.score, 0);
    }

    #[test]
    fn dying_phase_fades_then_respawns() {
        let mut cfg = quiet_config();
        cfg.rules.dying_ticks = 3;
        let mut game = game_with(cfg);
        settle(&mut game);
        game.state.player.x += 300.0;
        settle(&mut game);
        game.state.world.enemies = vec![enemy_on_player(&game)];
        run_game_ticks(&mut game, 1);
        assert_eq!(game.state.phase, Phase::Dying { remaining: 3 });

        run_game_ticks(&mut game, 2);
        assert!(matches!(game.state.phase, Phase::Dying { .. }));
        let events = run_game_ticks(&mut game, 1);
        assert_eq!(game.state.phase, Phase::Playing);
        assert_eq!(game.state.player.x, game.state.spawn.x);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::Respawned { .. }))
        );
    }

    #[test]
    fn respawn_grace_ignores_contact() {
        let mut cfg = quiet_config();
        cfg.rules.respawn_grace_ticks = 30;
        let mut game = game_with(cfg);
        settle(&mut game);
        game.state.world.enemies = vec![enemy_on_player(&game)];
        run_game_ticks(&mut game, 1);
        assert_eq!(game.state.lives, 2);
        run_game_ticks(&mut game, 3);
        assert_eq!(game.state.lives, 2);
    }

    #[test]
    fn checkpoint_suspends_until_answered() {
        let mut game = game_with(quiet_config());
        pose_question(&mut game);
        assert!(game.is_suspended());
        assert_eq!(
            game.pending_question().map(Question::prompt),
            Some("Capital of France?")
        );

        let before = game.serialize_state();
        let mut driver = FrameDriver::new(game);
        let outcome = driver.frame(&FrameInput {
            right: true,
            ..Default::default()
        });
        assert!(matches!(outcome, FrameOutcome::Suspended(_)));
        assert_eq!(before, driver.game().serialize_state());
    }

    #[test]
    fn correct_answer_saves_progress() {
        let mut game = game_with(quiet_config());
        let index = pose_question(&mut game);
        let cp = game.state.world.checkpoints[index].clone();

        let events = game.answer(&Answer::Text("PARIS".to_string()));
        assert_eq!(game.state.score, 30);
        assert_eq!(game.state.phase, Phase::Playing);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::CheckpointSaved { value: 30, .. }))
        );
        let saved = SavedCheckpoint::load(&*game.store).unwrap();
        assert_eq!(saved.x, cp.rect.x);
        assert_eq!(game.state.spawn, saved);
    }

    #[test]
    fn wrong_answer_changes_nothing_but_phase() {
        let mut game = game_with(quiet_config());
        let index = pose_question(&mut game);
        let score = game.state.score;

        let events = game.answer(&Answer::Text("Lyon".to_string()));
        assert_eq!(game.state.score, score);
        assert_eq!(game.state.phase, Phase::Playing);
        assert_eq!(events, vec![GameEvent::AnswerRejected { checkpoint: index }]);
        assert!(game.store.get(CHECKPOINT_KEY).unwrap().is_none());
        assert!(game.state.world.checkpoints[index].triggered);

        // Standing on a triggered checkpoint does not ask again.
        let events = run_game_ticks(&mut game, 5);
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::QuestionPosed { .. }))
        );
    }

    #[test]
    fn dismissed_prompt_resumes_play() {
        let mut game = game_with(quiet_config());
        pose_question(&mut game);
        game.answer(&Answer::Dismissed);
        assert!(!game.is_suspended());
        assert!(game.answer(&Answer::Dismissed).is_empty());
    }

    #[test]
    fn every_fifth_solved_checkpoint_grants_life() {
        let mut game = game_with(quiet_config());
        settle(&mut game);
        for i in 0..5 {
            checkpoint_on_player(&mut game, 0);
            run_game_ticks(&mut game, 1);
            let events = game.answer(&Answer::Text("paris".to_string()));
            let extra = events
                .iter()
                .any(|e| matches!(e, GameEvent::ExtraLife { .. }));
            assert_eq!(extra, i == 4);
        }
        assert_eq!(game.state.lives, 4);
        assert_eq!(game.state.checkpoints_solved, 5);
    }

    #[test]
    fn saved_checkpoint_restores_on_new_game() {
        let mut store = MemoryStorage::new();
        SavedCheckpoint { x: 5_050.0, y: 482.0 }
            .save(&mut store)
            .unwrap();
        let game = QuizDash::new(quiet_config(), sample_bank(), Box::new(store));
        assert_eq!(game.state.player.x, 5_050.0);
        assert_eq!(game.state.world.origin, 4_800.0);
        assert!(game.state.world.next_checkpoint_x > 5_050.0);
    }

    #[test]
    fn restart_clears_saved_checkpoint() {
        let mut game = game_with(quiet_config());
        pose_question(&mut game);
        game.answer(&Answer::Text("paris".to_string()));
        assert!(game.store.get(CHECKPOINT_KEY).unwrap().is_some());

        game.restart();
        assert!(game.store.get(CHECKPOINT_KEY).unwrap().is_none());
        assert_eq!(game.state.score, 0);
        assert_eq!(game.state.player.x, game.config.rules.default_spawn_x);
        assert!(!game.state.world.checkpoints.iter().any(|c| c.triggered));
        assert_eq!(game.state.phase, Phase::Playing);
    }

    #[test]
    fn submit_score_defaults_name_and_persists() {
        let mut game = game_with(quiet_config());
        game.state.score = 120;
        assert_eq!(game.submit_score("  "), Some(0));
        let board = Leaderboard::load(&*game.store);
        assert_eq!(board.entries()[0].name, "Player");
        assert_eq!(board.entries()[0].score, 120);
        assert_eq!(game.pause_summary().leaderboard, board.entries().to_vec());
    }

    #[test]
    fn replaced_leaderboard_is_persisted() {
        let mut game = game_with(quiet_config());
        game.replace_leaderboard(vec![
            LeaderboardEntry::new("linus", 200),
            LeaderboardEntry::new("grace", 500),
        ]);
        let stored = Leaderboard::load(&*game.store);
        assert_eq!(stored.entries(), game.leaderboard().entries());
        assert_eq!(stored.entries()[0].name, "grace");
    }

    #[test]
    fn out_of_range_config_is_repaired_on_start() {
        let mut cfg = GameConfig::default();
        cfg.world.platform_chance = 1.5;
        cfg.enemies.spawn_chance = -1.0;
        let game = game_with(cfg);
        assert_eq!(game.config().world.platform_chance, 1.0);
        assert_eq!(game.config().enemies.spawn_chance, 0.0);
        assert!(game.state().world.segments > 0);
    }

    #[test]
    fn pause_toggle_and_input_latching() {
        let mut game = game_with(quiet_config());
        settle(&mut game);
        game.apply_input(&FrameInput {
            toggle_pause: true,
            jump: true,
            ..Default::default()
        });
        assert!(game.is_paused());
        assert!(!game.pending.jump, "jump pressed while paused is dropped");

        game.apply_input(&FrameInput {
            toggle_pause: true,
            ..Default::default()
        });
        game.apply_input(&FrameInput {
            jump: true,
            ..Default::default()
        });
        game.apply_input(&FrameInput::default());
        assert!(game.pending.jump, "jump latches until consumed");
        game.update();
        assert!(game.state.player.vy < 0.0);
        assert!(!game.pending.jump);
    }

    #[test]
    fn debug_toggle_adds_hitboxes() {
        let mut game = game_with(quiet_config());
        assert!(game.render().hitboxes.is_empty());
        game.apply_input(&FrameInput {
            toggle_debug: true,
            ..Default::default()
        });
        assert!(game.is_debug());
        assert!(!game.render().hitboxes.is_empty());
    }

    #[test]
    fn pause_summary_reports_distance() {
        let mut game = game_with(quiet_config());
        game.state.player.x = 1234.7;
        game.state.coins = 4;
        let summary = game.pause_summary();
        assert_eq!(summary.distance, 1234);
        assert_eq!(summary.coins, 4);
    }

    #[test]
    fn same_seed_same_world() {
        let a = game_with(GameConfig::default());
        let b = game_with(GameConfig::default());
        assert_eq!(a.state, b.state);
    }
}
