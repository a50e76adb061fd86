//! Decorative foreground clouds
//!
//! Purely visual: clouds never collide and keep drifting in every phase.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::random::{RngState, is_in_probability, random_number};
use crate::consts::*;

/// A drifting cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cloud {
    pub x: i32,
    pub y: i32,
    /// Index into the cloud sprite set
    pub sprite: usize,
    pub width: i32,
}

impl Cloud {
    pub fn new(sprite: usize, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            sprite,
            width: CLOUD_WIDTHS[sprite % CLOUD_WIDTHS.len()],
        }
    }

    pub fn movement(&mut self) {
        self.x -= CLOUD_SPEED;
    }

    pub fn is_out_of_frame(&self) -> bool {
        self.x < -self.width
    }
}

/// Cloud spawner
#[derive(Debug, Clone)]
pub struct Foreground {
    clouds: Vec<Cloud>,
    rng: Pcg32,
    ticks: u64,
}

impl Foreground {
    pub fn new(rng_state: RngState) -> Self {
        Self {
            clouds: Vec::with_capacity(MAX_CLOUD_COUNT),
            rng: rng_state.to_rng(),
            ticks: 0,
        }
    }

    pub fn update(&mut self) {
        self.ticks += 1;
        for cloud in &mut self.clouds {
            cloud.movement();
        }

        if !self.ticks.is_multiple_of(CLOUD_INTERVAL_TICKS) {
            return;
        }
        if self.clouds.len() < MAX_CLOUD_COUNT {
            match is_in_probability(&mut self.rng, CLOUD_BORN_PERCENT, 100) {
                Ok(true) => {
                    let sprite = random_number(&mut self.rng, 0, CLOUD_WIDTHS.len() as i32) as usize;
                    let y = random_number(&mut self.rng, TOP_BAR_HEIGHT, FRAME_HEIGHT / 3);
                    self.clouds.push(Cloud::new(sprite, FRAME_WIDTH, y));
                }
                Ok(false) => {}
                Err(e) => log::error!("Cloud roll failed: {e:#}"),
            }
        }
        self.clouds.retain(|c| !c.is_out_of_frame());
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }
}
