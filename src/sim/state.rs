//! Game state and core simulation types
//!
//! Everything a tick mutates lives in `GameState`. Readers never touch it
//! directly; they get an owned `FrameSnapshot`.

use serde::{Deserialize, Serialize};

use super::foreground::{Cloud, Foreground};
use super::layer::ObstacleLayer;
use super::obstacle::ObstacleKind;
use super::player::{Player, PlayerState};
use super::pool::ObstaclePool;
use super::random::RngState;
use super::rect::Rect;
use crate::audio::SoundEffect;
use crate::score::ScoreTracker;
use crate::settings::Settings;

/// RNG stream for the obstacle layer
const LAYER_STREAM: u64 = 0;
/// RNG stream for the foreground clouds
const FOREGROUND_STREAM: u64 = 1;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first flap
    Ready,
    /// Active gameplay
    Running,
    /// Run ended, waiting for restart
    Over,
}

/// Something observable happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Flap,
    Score,
    Crash,
    GameOver,
}

impl GameEvent {
    /// Sound to play for this event, if any
    pub fn sound(self) -> Option<SoundEffect> {
        match self {
            GameEvent::Flap => Some(SoundEffect::Flap),
            GameEvent::Score => Some(SoundEffect::Score),
            GameEvent::Crash => Some(SoundEffect::Crash),
            GameEvent::GameOver => None,
        }
    }
}

/// Complete simulation state
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,
    pub player: Player,
    pub layer: ObstacleLayer,
    pub scores: ScoreTracker,
    pub foreground: Foreground,
    /// Events raised since the last drain
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, scores: ScoreTracker) -> Self {
        Self::with_pool(seed, scores, ObstaclePool::default())
    }

    pub fn with_pool(seed: u64, scores: ScoreTracker, pool: ObstaclePool) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            seed,
            time_ticks: 0,
            phase: GamePhase::Ready,
            player: Player::new(),
            layer: ObstacleLayer::with_pool(rng_state.with_stream(LAYER_STREAM), pool),
            scores,
            foreground: Foreground::new(rng_state.with_stream(FOREGROUND_STREAM)),
            events: Vec::new(),
        }
    }

    /// Build a game from runtime settings, backed by the configured score file
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_pool(
            settings.seed,
            ScoreTracker::open(&settings.score_file),
            ObstaclePool::new(settings.pool_capacity),
        )
    }

    /// Back to Ready with a fresh run; best score and pool survive
    pub fn restart(&mut self) {
        self.player.reset();
        self.layer.reset();
        self.scores.reset();
        self.phase = GamePhase::Ready;
        log::info!("Restarted, best score {}", self.scores.best_score());
    }

    /// Split borrow used by the tick
    pub(crate) fn parts(
        &mut self,
    ) -> (
        &mut Player,
        &mut ObstacleLayer,
        &mut ScoreTracker,
        &mut Vec<GameEvent>,
    ) {
        (
            &mut self.player,
            &mut self.layer,
            &mut self.scores,
            &mut self.events,
        )
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events raised since the last drain, without taking them
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Owned read-only copy of everything a renderer needs
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            phase: self.phase,
            tick: self.time_ticks,
            player: PlayerView {
                x: self.player.x(),
                y: self.player.y(),
                velocity: self.player.velocity(),
                state: self.player.state(),
                rect: *self.player.collision_rect(),
            },
            obstacles: self
                .layer
                .obstacles()
                .iter()
                .map(|o| ObstacleView {
                    x: o.x(),
                    y: o.y(),
                    width: o.width(),
                    height: o.height(),
                    kind: o.kind(),
                    visible: o.is_visible(),
                    rect: *o.rect(),
                })
                .collect(),
            clouds: self.foreground.clouds().to_vec(),
            score: self.scores.current_score(),
            best: self.scores.best_score(),
        }
    }
}

/// Player as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    pub velocity: i32,
    pub state: PlayerState,
    pub rect: Rect,
}

/// Obstacle as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub kind: ObstacleKind,
    pub visible: bool,
    /// Collision box, including any oscillation offset
    pub rect: Rect,
}

/// One rendered frame worth of state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub tick: u64,
    pub player: PlayerView,
    pub obstacles: Vec<ObstacleView>,
    pub clouds: Vec<Cloud>,
    pub score: u64,
    pub best: i64,
}
