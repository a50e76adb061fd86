//! Flap Sim entry point
//!
//! Headless runner: loads settings, plays the game with a simple autopilot
//! and streams frame snapshots to a reader thread.
//!
//! Usage: `flap-sim [settings.json]`

use std::sync::mpsc;
use std::thread;

use anyhow::Context;

use flap_sim::Settings;
use flap_sim::platform::{ChannelRenderer, Driver, LogRenderer, Renderer};
use flap_sim::sim::{FrameSnapshot, GamePhase, GameState, InputEvent};

/// How far below the gap centre the autopilot lets the player sink
const AUTOPILOT_SLACK: i32 = 12;

/// Decide whether to flap this tick.
///
/// Aims for the centre of the gap of the nearest pair still ahead of the
/// player, or the middle of the screen when nothing is in range.
fn autopilot(frame: &FrameSnapshot) -> bool {
    let player = &frame.player;
    let target = frame
        .obstacles
        .chunks_exact(2)
        .find(|pair| pair[0].rect.right() >= player.rect.x())
        .map(|pair| (pair[0].rect.bottom() + pair[1].rect.y()) / 2)
        .unwrap_or(flap_sim::consts::FRAME_HEIGHT / 2);
    player.velocity >= 0 && player.y > target + AUTOPILOT_SLACK
}

fn load_settings() -> Settings {
    let Some(path) = std::env::args().nth(1) else {
        return Settings::default();
    };
    match Settings::load(&path) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Bad settings file {path}: {e:#}");
            Settings::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flap Sim (headless) starting...");

    let settings = load_settings();
    log::info!(
        "Seed {}, {} ticks, best score file {}",
        settings.seed,
        settings.max_ticks,
        settings.score_file.display()
    );

    let (tx, rx) = mpsc::channel::<FrameSnapshot>();
    let reader = thread::Builder::new()
        .name("snapshot-reader".into())
        .spawn(move || {
            let mut log_renderer = LogRenderer::default();
            let mut frames = 0u64;
            let mut top_score = 0u64;
            for frame in rx {
                log_renderer.draw(&frame);
                top_score = top_score.max(frame.score);
                frames += 1;
            }
            (frames, top_score)
        })
        .context("spawning snapshot reader")?;

    let mut audio = settings.audio_manager();
    let mut renderer = ChannelRenderer::new(tx);
    let mut driver = Driver::new(GameState::from_settings(&settings), settings.tick_rate_hz);
    let mut runs = 1u32;

    for _ in 0..settings.max_ticks {
        let frame = driver.state.snapshot();
        match frame.phase {
            GamePhase::Ready => driver.queue(InputEvent::FlapPress),
            GamePhase::Running if autopilot(&frame) => driver.queue(InputEvent::FlapPress),
            GamePhase::Running => {}
            GamePhase::Over => {
                driver.queue(InputEvent::Restart);
                runs += 1;
            }
        }
        // Taps, never holds
        driver.queue(InputEvent::FlapRelease);

        driver.step(&mut audio);
        renderer.draw(&driver.state.snapshot());
    }

    let best = driver.state.scores.best_score();
    drop(renderer);

    let (frames, top_score) = reader
        .join()
        .map_err(|_| anyhow::anyhow!("snapshot reader panicked"))?;
    log::info!(
        "Done: {runs} runs, {frames} frames, top score {top_score}, best {best}, {} sounds",
        audio.played()
    );
    Ok(())
}
