//! Obstacles: scrolling columns, with an oscillating variant for hard pairs
//!
//! An obstacle is either plain or moving for its whole life; the class is
//! fixed at construction so the pool can hand it back to the right free-list.
//! Everything else (geometry, kind, oscillation) is rewritten on each spawn
//! through `set_attribute`.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Obstacle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Hangs from the top of the frame
    TopNormal,
    /// Rises from the ground
    BottomNormal,
    /// Floats mid-air, spawned in twins
    HoverNormal,
    TopHard,
    BottomHard,
    HoverHard,
}

/// Free-list an obstacle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolClass {
    Plain,
    Moving,
}

/// Oscillation direction (screen space: Down grows y)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl ObstacleKind {
    /// Which pool serves this kind
    pub fn pool_class(self) -> PoolClass {
        match self {
            ObstacleKind::TopNormal | ObstacleKind::BottomNormal | ObstacleKind::HoverNormal => {
                PoolClass::Plain
            }
            ObstacleKind::TopHard | ObstacleKind::BottomHard | ObstacleKind::HoverHard => {
                PoolClass::Moving
            }
        }
    }

    /// Direction a freshly spawned moving obstacle starts in
    pub fn initial_direction(self) -> Direction {
        match self {
            ObstacleKind::TopHard => Direction::Up,
            ObstacleKind::TopNormal
            | ObstacleKind::BottomNormal
            | ObstacleKind::HoverNormal
            | ObstacleKind::BottomHard
            | ObstacleKind::HoverHard => Direction::Down,
        }
    }

    pub fn is_hard(self) -> bool {
        self.pool_class() == PoolClass::Moving
    }
}

/// Vertical oscillation of a moving obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oscillation {
    /// Current offset in `0..=MAX_DELTA`
    pub delta: i32,
    pub direction: Direction,
}

impl Oscillation {
    fn new(direction: Direction) -> Self {
        Self {
            delta: 0,
            direction,
        }
    }

    /// Advance one step, bouncing between 0 and `MAX_DELTA`
    fn step(&mut self) {
        let next = match self.direction {
            Direction::Down => self.delta + 1,
            Direction::Up => self.delta - 1,
        };
        self.delta = next.clamp(0, MAX_DELTA);
        if self.delta >= MAX_DELTA {
            self.direction = Direction::Up;
        } else if self.delta <= 0 {
            self.direction = Direction::Down;
        }
    }
}

/// Per-tick motion rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    /// Scrolls only
    Fixed,
    /// Scrolls and oscillates vertically
    Oscillating(Oscillation),
}

/// A single obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pos: IVec2,
    height: i32,
    width: i32,
    kind: ObstacleKind,
    visible: bool,
    rect: Rect,
    speed: i32,
    motion: Motion,
    /// Spawn-pair identifier, 0 while pooled
    pair_id: u64,
}

impl Default for Obstacle {
    fn default() -> Self {
        Self::new()
    }
}

impl Obstacle {
    /// A plain obstacle in canonical pooled state
    pub fn new() -> Self {
        Self {
            pos: IVec2::ZERO,
            height: 0,
            width: OBSTACLE_WIDTH,
            kind: ObstacleKind::TopNormal,
            visible: true,
            rect: Rect::EMPTY,
            speed: OBSTACLE_SPEED,
            motion: Motion::Fixed,
            pair_id: 0,
        }
    }

    /// A moving obstacle in canonical pooled state
    pub fn new_moving() -> Self {
        Self {
            motion: Motion::Oscillating(Oscillation::new(Direction::Down)),
            ..Self::new()
        }
    }

    /// Place the obstacle and rebuild its collision box
    pub fn set_attribute(&mut self, x: i32, y: i32, height: i32, kind: ObstacleKind, visible: bool) {
        self.pos = IVec2::new(x, y);
        self.height = height;
        self.kind = kind;
        self.visible = visible;
        if let Motion::Oscillating(osc) = &mut self.motion {
            *osc = Oscillation::new(kind.initial_direction());
        }
        self.rect = Rect::new(x, y + self.offset(), self.width, height);
    }

    /// Scroll one tick
    pub fn movement(&mut self) {
        self.pos.x -= self.speed;
        self.rect.pos.x = self.pos.x;
        if self.pos.x < -OBSTACLE_HEAD_WIDTH {
            self.visible = false;
        }

        if let Motion::Oscillating(osc) = &mut self.motion {
            osc.step();
        }
        self.rect.pos.y = self.pos.y + self.offset();
    }

    /// Return to canonical pooled state
    pub fn reset(&mut self) {
        self.pos = IVec2::ZERO;
        self.height = 0;
        self.visible = true;
        self.rect = Rect::EMPTY;
        self.pair_id = 0;
        if let Motion::Oscillating(osc) = &mut self.motion {
            *osc = Oscillation::new(Direction::Down);
        }
    }

    /// Fully scrolled into the frame (cap included)
    pub fn is_in_frame(&self) -> bool {
        self.pos.x <= FRAME_WIDTH - OBSTACLE_HEAD_WIDTH
    }

    pub fn pool_class(&self) -> PoolClass {
        match self.motion {
            Motion::Fixed => PoolClass::Plain,
            Motion::Oscillating(_) => PoolClass::Moving,
        }
    }

    /// Current vertical oscillation offset (0 for plain obstacles)
    pub fn offset(&self) -> i32 {
        match self.motion {
            Motion::Fixed => 0,
            Motion::Oscillating(osc) => osc.delta,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self.motion {
            Motion::Fixed => None,
            Motion::Oscillating(osc) => Some(osc.direction),
        }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.pos.y
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn kind(&self) -> ObstacleKind {
        self.kind
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    pub fn pair_id(&self) -> u64 {
        self.pair_id
    }

    pub(crate) fn set_pair_id(&mut self, pair_id: u64) {
        self.pair_id = pair_id;
    }
}
