//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::player::PlayerState;
use super::state::{GamePhase, GameState};

/// Raw input from whatever drives the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    FlapPress,
    FlapRelease,
    Restart,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Flap key went down
    pub flap: bool,
    /// Flap key went up
    pub release: bool,
    /// Start over after game over
    pub restart: bool,
}

impl TickInput {
    /// Fold one raw event into this tick's input
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::FlapPress => self.flap = true,
            InputEvent::FlapRelease => self.release = true,
            InputEvent::Restart => self.restart = true,
        }
    }

    pub fn from_events(events: impl IntoIterator<Item = InputEvent>) -> Self {
        let mut input = Self::default();
        for event in events {
            input.push(event);
        }
        input
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    // Clouds drift in every phase
    state.foreground.update();

    match state.phase {
        GamePhase::Ready => {
            if input.flap {
                let (player, _, _, events) = state.parts();
                player.flap(events);
                state.phase = GamePhase::Running;
                log::info!("Run started (seed {})", state.seed);
            }
        }
        GamePhase::Running => {
            let (player, layer, scores, events) = state.parts();
            if input.flap {
                player.flap(events);
            }
            layer.update(player, scores, events);
            player.movement(scores, events);

            if player.state() == PlayerState::Dead {
                state.phase = GamePhase::Over;
                log::info!(
                    "Game over at tick {}: score {}",
                    state.time_ticks,
                    state.scores.current_score()
                );
            }
        }
        GamePhase::Over => {
            if input.restart {
                state.restart();
            }
        }
    }

    // Release after flap so a press and release in one tick still flaps once
    if input.release {
        state.player.key_released();
    }
}
