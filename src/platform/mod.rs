//! Platform abstraction layer
//!
//! Glue between the deterministic simulation and whatever hosts it:
//! - Fixed-step clock for real-time drivers
//! - Render seam (read-only snapshots)
//! - Input folding and audio dispatch per frame

use std::sync::mpsc::Sender;

use crate::audio::{self, AudioSink};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::sim::{FrameSnapshot, GameState, InputEvent, TickInput, tick};

/// Longest frame delta the clock accepts (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct TickClock {
    step: f32,
    accumulator: f32,
}

impl Default for TickClock {
    fn default() -> Self {
        Self {
            step: SIM_DT,
            accumulator: 0.0,
        }
    }
}

impl TickClock {
    pub fn new(tick_rate_hz: u32) -> Self {
        Self {
            step: 1.0 / tick_rate_hz.max(1) as f32,
            accumulator: 0.0,
        }
    }

    /// Feed elapsed wall time, get the number of ticks to run.
    ///
    /// Capped at `MAX_SUBSTEPS` to prevent a spiral of death; leftover time
    /// beyond the cap is dropped.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(self.step);
        }
        substeps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    pub fn step(&self) -> f32 {
        self.step
    }
}

/// Consumes read-only frame state
pub trait Renderer {
    fn draw(&mut self, frame: &FrameSnapshot);
}

/// Logs score and phase changes
#[derive(Debug, Default)]
pub struct LogRenderer {
    last: Option<(crate::sim::GamePhase, u64)>,
}

impl Renderer for LogRenderer {
    fn draw(&mut self, frame: &FrameSnapshot) {
        let now = (frame.phase, frame.score);
        if self.last != Some(now) {
            log::debug!(
                "tick {}: {:?} score {} best {} ({} obstacles)",
                frame.tick,
                frame.phase,
                frame.score,
                frame.best,
                frame.obstacles.len()
            );
            self.last = Some(now);
        }
    }
}

/// Ships snapshots to another thread
#[derive(Debug)]
pub struct ChannelRenderer {
    tx: Sender<FrameSnapshot>,
    disconnected: bool,
}

impl ChannelRenderer {
    pub fn new(tx: Sender<FrameSnapshot>) -> Self {
        Self {
            tx,
            disconnected: false,
        }
    }
}

impl Renderer for ChannelRenderer {
    fn draw(&mut self, frame: &FrameSnapshot) {
        if self.disconnected {
            return;
        }
        if self.tx.send(frame.clone()).is_err() {
            log::warn!("Snapshot reader went away, no more frames will be sent");
            self.disconnected = true;
        }
    }
}

/// Owns the game and turns host frames into simulation ticks
#[derive(Debug)]
pub struct Driver {
    pub state: GameState,
    input: TickInput,
    clock: TickClock,
}

impl Driver {
    pub fn new(state: GameState, tick_rate_hz: u32) -> Self {
        Self {
            state,
            input: TickInput::default(),
            clock: TickClock::new(tick_rate_hz),
        }
    }

    /// Queue an input for the next tick
    pub fn queue(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run exactly one tick and forward its events
    pub fn step(&mut self, audio: &mut dyn AudioSink) {
        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input);
        audio::dispatch(audio, &self.state.drain_events());
    }

    /// Real-time frame: run as many ticks as the clock allows, then draw once
    pub fn frame(&mut self, dt: f32, audio: &mut dyn AudioSink, renderer: &mut dyn Renderer) -> u32 {
        let substeps = self.clock.advance(dt);
        for _ in 0..substeps {
            self.step(audio);
        }
        renderer.draw(&self.state.snapshot());
        substeps
    }
}
