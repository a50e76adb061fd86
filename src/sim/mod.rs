//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod foreground;
pub mod layer;
pub mod obstacle;
pub mod player;
pub mod pool;
pub mod random;
pub mod rect;
pub mod state;
pub mod tick;

pub use foreground::{Cloud, Foreground};
pub use layer::{ObstacleLayer, PairKind, PairShape, choose_pair_kind};
pub use obstacle::{Direction, Motion, Obstacle, ObstacleKind, Oscillation, PoolClass};
pub use player::{Player, PlayerState};
pub use pool::ObstaclePool;
pub use random::{RngState, is_in_probability, random_number};
pub use rect::Rect;
pub use state::{FrameSnapshot, GameEvent, GamePhase, GameState, ObstacleView, PlayerView};
pub use tick::{InputEvent, TickInput, tick};
