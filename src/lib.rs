//! Flap Sim - simulation core of a side-scrolling obstacle-avoidance game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, obstacles, pool, phases)
//! - `score`: Current/best score bookkeeping
//! - `persistence`: Durable best-score storage
//! - `audio`: Fire-and-forget sound effect seam
//! - `platform`: Fixed-step clock and render seam
//! - `settings`: Runtime configuration

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod score;
pub mod settings;
pub mod sim;

pub use score::ScoreTracker;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE_HZ: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Frame dimensions
    pub const FRAME_WIDTH: i32 = 420;
    pub const FRAME_HEIGHT: i32 = 640;
    /// HUD strip the player may not rise into
    pub const TOP_BAR_HEIGHT: i32 = 20;
    pub const GROUND_HEIGHT: i32 = 35;

    /// Player sprite size
    pub const PLAYER_WIDTH: i32 = 34;
    pub const PLAYER_HEIGHT: i32 = 24;
    /// Collision box inset relative to the sprite
    pub const RECT_DESCALE: i32 = 2;
    pub const PLAYER_X: i32 = FRAME_WIDTH >> 2;
    pub const PLAYER_START_Y: i32 = FRAME_HEIGHT >> 1;
    /// Highest centre y the player can reach
    pub const PLAYER_TOP_BOUND: i32 = TOP_BAR_HEIGHT + PLAYER_HEIGHT / 2;
    /// Centre y at which the player hits the ground
    pub const PLAYER_BOTTOM_BOUND: i32 = FRAME_HEIGHT - GROUND_HEIGHT - PLAYER_HEIGHT / 2;

    /// Velocity applied by a flap (negative is up)
    pub const ACC_FLAP: i32 = -9;
    /// Gravity, per tick
    pub const ACC_Y: i32 = 1;
    pub const MAX_VEL_Y: i32 = 12;

    /// Obstacle body width (collision width)
    pub const OBSTACLE_WIDTH: i32 = 52;
    /// Obstacle cap width, wider than the body
    pub const OBSTACLE_HEAD_WIDTH: i32 = 60;
    /// Horizontal scroll per tick
    pub const OBSTACLE_SPEED: i32 = 3;
    /// Top obstacles start above the frame so their body never shows an end
    pub const TOP_PIPE_LENGTHENING: i32 = 100;
    /// Oscillation range of moving obstacles
    pub const MAX_DELTA: i32 = 50;

    /// Gap between the two obstacles of a pair
    pub const VERTICAL_INTERVAL: i32 = FRAME_HEIGHT / 5;
    /// Distance between consecutive pairs
    pub const HORIZONTAL_INTERVAL: i32 = FRAME_HEIGHT >> 2;
    pub const MIN_HEIGHT: i32 = FRAME_HEIGHT >> 3;
    pub const MAX_HEIGHT: i32 = (FRAME_HEIGHT >> 3) * 5;
    /// Maximum simultaneously active obstacles: every pair that fits the
    /// scrolling frame plus the pair waiting offscreen
    pub const FULL_CAP: usize =
        ((FRAME_WIDTH / (OBSTACLE_HEAD_WIDTH + HORIZONTAL_INTERVAL) + 3) * 2) as usize;
    /// Newest pair must be this close to the player for a score to count
    pub const SCORE_DISTANCE: i32 =
        OBSTACLE_WIDTH * 2 + HORIZONTAL_INTERVAL + OBSTACLE_WIDTH * 3 / 2;
    /// Denominator of the hard-pair probability (score + 1) / 20
    pub const HARD_PAIR_DENOMINATOR: i32 = 20;

    /// Free-list capacity per obstacle class
    pub const POOL_CAPACITY: usize = 30;

    /// Foreground clouds
    pub const CLOUD_INTERVAL_TICKS: u64 = 6;
    pub const CLOUD_BORN_PERCENT: i32 = 6;
    pub const MAX_CLOUD_COUNT: usize = 7;
    pub const CLOUD_SPEED: i32 = 1;
    pub const CLOUD_WIDTHS: [i32; 2] = [92, 64];
}

#[cfg(test)]
mod tests {
    use super::consts::*;

    #[test]
    fn test_full_cap_covers_scrolling_frame() {
        // Pairs visible between -head width and the frame edge, plus one incoming
        let span = FRAME_WIDTH + OBSTACLE_HEAD_WIDTH + HORIZONTAL_INTERVAL;
        let pairs = (span + HORIZONTAL_INTERVAL - 1) / HORIZONTAL_INTERVAL;
        assert!(FULL_CAP >= (pairs * 2) as usize);
        assert_eq!(FULL_CAP % 2, 0);
    }

    #[test]
    fn test_gap_fits_above_ground() {
        assert!(MIN_HEIGHT < MAX_HEIGHT);
        assert!(MAX_HEIGHT + VERTICAL_INTERVAL < FRAME_HEIGHT - GROUND_HEIGHT);
        assert!(PLAYER_TOP_BOUND < PLAYER_START_Y && PLAYER_START_Y < PLAYER_BOTTOM_BOUND);
    }
}
