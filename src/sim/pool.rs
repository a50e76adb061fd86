//! Fixed-capacity obstacle free-lists
//!
//! Obstacles are preallocated once and moved between the pool and the
//! active sequence, so the steady-state tick never allocates.

use super::obstacle::{Obstacle, PoolClass};
use crate::consts::POOL_CAPACITY;

/// Two LIFO free-lists, one per obstacle class
#[derive(Debug, Clone)]
pub struct ObstaclePool {
    plain: Vec<Obstacle>,
    moving: Vec<Obstacle>,
    capacity: usize,
}

impl Default for ObstaclePool {
    fn default() -> Self {
        Self::new(POOL_CAPACITY)
    }
}

impl ObstaclePool {
    /// Preallocate `capacity` obstacles of each class
    pub fn new(capacity: usize) -> Self {
        let mut plain = Vec::with_capacity(capacity);
        let mut moving = Vec::with_capacity(capacity);
        plain.resize_with(capacity, Obstacle::new);
        moving.resize_with(capacity, Obstacle::new_moving);
        log::debug!("Obstacle pool ready: {capacity} plain, {capacity} moving");
        Self {
            plain,
            moving,
            capacity,
        }
    }

    /// Take an obstacle of the given class, `None` when that list is empty
    pub fn acquire(&mut self, class: PoolClass) -> Option<Obstacle> {
        let obstacle = self.list_mut(class).pop();
        if obstacle.is_none() {
            log::debug!("{class:?} pool exhausted");
        }
        obstacle
    }

    /// Reset an obstacle and return it to its free-list.
    ///
    /// A full list drops the obstacle instead of growing past capacity.
    pub fn release(&mut self, mut obstacle: Obstacle) {
        obstacle.reset();
        let class = obstacle.pool_class();
        let capacity = self.capacity;
        let list = self.list_mut(class);
        if list.len() < capacity {
            list.push(obstacle);
        } else {
            log::warn!("{class:?} pool already full, dropping released obstacle");
        }
    }

    /// Obstacles currently free in the given list
    pub fn available(&self, class: PoolClass) -> usize {
        match class {
            PoolClass::Plain => self.plain.len(),
            PoolClass::Moving => self.moving.len(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn list_mut(&mut self, class: PoolClass) -> &mut Vec<Obstacle> {
        match class {
            PoolClass::Plain => &mut self.plain,
            PoolClass::Moving => &mut self.moving,
        }
    }
}
