//! The controlled player entity
//!
//! Integer physics, one step per tick. y is the sprite centre and grows
//! downward; a flap sets an upward (negative) velocity.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::GameEvent;
use crate::consts::*;
use crate::score::ScoreTracker;

/// Player state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    /// Hovering before the run starts
    Normal,
    /// Rising after a flap
    Up,
    /// Falling under gravity
    Fall,
    /// Hit something, dropping to the ground
    DeadFall,
    /// On the ground, run over
    Dead,
}

/// The player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    x: i32,
    y: i32,
    velocity: i32,
    state: PlayerState,
    rect: Rect,
    /// Flap key is down; a held key does not flap again
    key_held: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        let mut player = Self {
            x: PLAYER_X,
            y: PLAYER_START_Y,
            velocity: 0,
            state: PlayerState::Normal,
            rect: Rect::EMPTY,
            key_held: false,
        };
        player.update_rect();
        player
    }

    /// Back to the start position, from any state
    pub fn reset(&mut self) {
        self.y = PLAYER_START_Y;
        self.velocity = 0;
        self.state = PlayerState::Normal;
        self.key_held = false;
        self.update_rect();
    }

    /// Flap upward. Ignored while dead or while the key is still held.
    pub fn flap(&mut self, events: &mut Vec<GameEvent>) {
        if self.is_dead() || self.key_held {
            return;
        }
        self.state = PlayerState::Up;
        self.velocity = ACC_FLAP;
        self.key_held = true;
        events.push(GameEvent::Flap);
    }

    pub fn key_pressed(&mut self) {
        self.key_held = true;
    }

    pub fn key_released(&mut self) {
        self.key_held = false;
    }

    pub fn key_is_released(&self) -> bool {
        !self.key_held
    }

    /// Force the falling state (no-op once dead)
    pub fn fall(&mut self) {
        if !self.is_dead() {
            self.state = PlayerState::Fall;
        }
    }

    /// Collision hit: start dropping to the ground
    pub fn dead_fall(&mut self, events: &mut Vec<GameEvent>) {
        if self.is_dead() {
            return;
        }
        log::debug!("Player hit at y={}", self.y);
        self.state = PlayerState::DeadFall;
        self.velocity = 0;
        events.push(GameEvent::Crash);
    }

    /// Integrate one tick
    pub fn movement(&mut self, scores: &mut ScoreTracker, events: &mut Vec<GameEvent>) {
        if self.state == PlayerState::Dead {
            return;
        }

        self.velocity = (self.velocity + ACC_Y).clamp(-MAX_VEL_Y, MAX_VEL_Y);
        self.y += self.velocity;

        match self.state {
            PlayerState::Normal => self.state = PlayerState::Fall,
            PlayerState::Up if self.velocity >= 0 => self.state = PlayerState::Fall,
            _ => {}
        }

        if !self.is_dead() && self.y < PLAYER_TOP_BOUND {
            self.y = PLAYER_TOP_BOUND;
        }

        if self.y > PLAYER_BOTTOM_BOUND {
            self.y = PLAYER_BOTTOM_BOUND;
            // Hitting the ground alive is a crash too
            self.dead_fall(events);
            self.die(scores, events);
        }

        self.update_rect();
    }

    fn die(&mut self, scores: &mut ScoreTracker, events: &mut Vec<GameEvent>) {
        self.state = PlayerState::Dead;
        self.velocity = 0;
        scores.save_score();
        events.push(GameEvent::GameOver);
        log::info!("Player dead, score {}", scores.current_score());
    }

    fn update_rect(&mut self) {
        let left = self.x - PLAYER_WIDTH / 2;
        let top = self.y - PLAYER_HEIGHT / 2;
        self.rect = Rect::new(
            left + RECT_DESCALE,
            top + RECT_DESCALE * 2,
            PLAYER_WIDTH - RECT_DESCALE * 3,
            PLAYER_HEIGHT - RECT_DESCALE * 4,
        );
    }

    /// Dropping or on the ground
    pub fn is_dead(&self) -> bool {
        matches!(self.state, PlayerState::DeadFall | PlayerState::Dead)
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn velocity(&self) -> i32 {
        self.velocity
    }

    pub fn collision_rect(&self) -> &Rect {
        &self.rect
    }

    #[cfg(test)]
    pub(crate) fn place_at(&mut self, y: i32) {
        self.y = y;
        self.update_rect();
    }
}
