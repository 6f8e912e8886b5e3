mod autopilot;
mod config;
mod prompt;

use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use quizdash_core::driver::{FrameDriver, FrameOutcome};
use quizdash_core::game_trait::FrameGame;
use quizdash_core::leaderboard::LeaderboardEntry;
use quizdash_core::questions::{Answer, QuestionBank};
use quizdash_core::storage::{FileStorage, KeyValueStore, MemoryStorage};
use quizdash_leaderboard::{
    LeaderboardClient, LeaderboardSync, RemoteLeaderboardConfig, SyncUpdate,
};
use quizdash_platformer::config::GameConfig;
use quizdash_platformer::render::{Frame, rasterize};
use quizdash_platformer::{FrameInput, GameEvent, PauseSummary, QuizDash};

use autopilot::Autopilot;
use config::CliConfig;
use prompt::Command;

type Remote = (LeaderboardSync, mpsc::UnboundedReceiver<SyncUpdate>);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut cli = CliConfig::load();
    cli.apply_args(std::env::args().skip(1));
    if let Err(e) = cli.validate() {
        tracing::error!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    let game_config = match &cli.game_config {
        Some(path) => GameConfig::load_from(path),
        None => GameConfig::load(),
    };
    let bank = QuestionBank::load(&cli.questions_path).unwrap_or_else(|e| {
        tracing::warn!(
            path = %cli.questions_path,
            error = %e,
            "Failed to load questions, checkpoints disabled"
        );
        QuestionBank::default()
    });
    let store: Box<dyn KeyValueStore + Send> = match FileStorage::open(&cli.save_dir) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(dir = %cli.save_dir, error = %e, "Progress will not be saved");
            Box::new(MemoryStorage::new())
        },
    };

    let mut remote = connect_remote(&cli);
    if let Some((sync, _)) = &remote {
        sync.spawn_fetch();
    }

    let game = QuizDash::new(game_config, bank, store);
    let meta = game.metadata();
    tracing::info!(
        name = %meta.name,
        questions = game.bank().len(),
        "Starting {}",
        meta.description
    );

    let mut driver = FrameDriver::new(game);
    let mut pilot = Autopilot::default();
    let mut lines = spawn_stdin();
    let mut ticker = tokio::time::interval(Duration::from_secs_f32(
        1.0 / meta.tick_rate_hz.max(1.0),
    ));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut was_paused = false;

    loop {
        if cli.frames > 0 && driver.frames() >= cli.frames {
            tracing::info!(frames = driver.frames(), "Frame limit reached");
            print_summary(&driver.game().pause_summary());
            break;
        }
        if cli.realtime {
            ticker.tick().await;
        }
        drain_remote(&mut remote, driver.game_mut());

        let mut input = if cli.autopilot {
            pilot.next_input(driver.game())
        } else {
            FrameInput::default()
        };
        let mut quit = false;
        while let Ok(line) = lines.try_recv() {
            match Command::parse(&line) {
                Some(Command::Input(typed)) => input = prompt::merge(input, typed),
                Some(Command::Restart) => driver.game_mut().restart(),
                Some(Command::Quit) => quit = true,
                None => tracing::debug!(line = %line, "Unrecognized command"),
            }
        }
        if quit {
            print_summary(&driver.game().pause_summary());
            break;
        }

        match driver.frame(&input) {
            FrameOutcome::Paused => {
                if !was_paused {
                    print_summary(&driver.game().pause_summary());
                }
                was_paused = true;
                continue;
            },
            FrameOutcome::Advanced { frame, events } => {
                report(&events);
                if driver.frames() % cli.render_every == 0 {
                    draw(&frame, &cli);
                }
            },
            FrameOutcome::Suspended(frame) => {
                draw(&frame, &cli);
                let events = ask(&mut driver, &cli, &mut lines).await;
                report(&events);
            },
            FrameOutcome::GameOver(frame) => {
                draw(&frame, &cli);
                finish(driver.game_mut(), &cli, &mut remote).await;
                break;
            },
        }
        was_paused = false;
    }
}

fn connect_remote(cli: &CliConfig) -> Option<Remote> {
    let config = RemoteLeaderboardConfig::from_env(cli.leaderboard_url.clone());
    if !config.is_enabled() {
        return None;
    }
    match LeaderboardClient::new(config) {
        Ok(client) => {
            if client.config().token.is_none() {
                tracing::warn!(
                    "No {} set, scores will not be submitted remotely",
                    quizdash_leaderboard::config::TOKEN_ENV
                );
            }
            Some(LeaderboardSync::new(client))
        },
        Err(e) => {
            tracing::warn!(error = %e, "Remote leaderboard unavailable");
            None
        },
    }
}

fn drain_remote(remote: &mut Option<Remote>, game: &mut QuizDash) {
    let Some((_, rx)) = remote else {
        return;
    };
    while let Ok(update) = rx.try_recv() {
        game.replace_leaderboard(update.into_entries());
    }
}

fn spawn_stdin() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Pose the pending question and feed the reply back into the game.
async fn ask(
    driver: &mut FrameDriver<QuizDash>,
    cli: &CliConfig,
    lines: &mut mpsc::UnboundedReceiver<String>,
) -> Vec<GameEvent> {
    let Some(question) = driver.game().pending_question().cloned() else {
        return Vec::new();
    };
    print!("{}", prompt::format_question(&question));
    let _ = std::io::stdout().flush();

    let answer = if cli.auto_answer {
        let answer = autopilot::correct_answer(&question);
        println!("{answer:?}");
        answer
    } else {
        match lines.recv().await {
            Some(line) => prompt::parse_answer(&line, &question),
            None => Answer::Dismissed,
        }
    };
    driver.game_mut().answer(&answer)
}

async fn finish(game: &mut QuizDash, cli: &CliConfig, remote: &mut Option<Remote>) {
    let score = game.state().score;
    match game.submit_score(&cli.player_name) {
        Some(rank) => println!("GAME OVER  score {score}  rank #{}", rank + 1),
        None => println!("GAME OVER  score {score}"),
    }

    if let Some((sync, _)) = remote {
        let entry = LeaderboardEntry::new(&cli.player_name, score);
        let handle = sync.spawn_submit(entry);
        if tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .is_err()
        {
            tracing::warn!("Timed out submitting score");
        }
    }
    drain_remote(remote, game);
    print_summary(&game.pause_summary());
}

fn report(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::SegmentGenerated { .. } | GameEvent::CoinCollected { .. } => {
                tracing::debug!(?event);
            },
            _ => tracing::info!(?event),
        }
    }
}

fn draw(frame: &Frame, cli: &CliConfig) {
    println!("{}", rasterize(frame, cli.cols, cli.rows));
}

fn print_summary(summary: &PauseSummary) {
    println!(
        "score {}  coins {}  distance {}",
        summary.score, summary.coins, summary.distance
    );
    if summary.leaderboard.is_empty() {
        return;
    }
    println!("leaderboard:");
    for (i, entry) in summary.leaderboard.iter().enumerate() {
        println!("  {:>2}. {:<16} {}", i + 1, entry.name, entry.score);
    }
}
