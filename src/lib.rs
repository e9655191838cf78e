//! Gap Runner - A side-scrolling arcade mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, power-ups, environment, scoring)
//! - `session`: Session controller driving the simulation and persistence observers
//! - `persistence`: Key/value storage and the remote score service interface
//! - `tuning`: Data-driven game balance

pub mod achievements;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use achievements::{Achievement, AchievementBook};
pub use error::{PersistenceError, TuningError};
pub use highscores::{Leaderboard, LeaderboardEntry};
pub use session::{JumpTrigger, SessionController};
pub use settings::{QualityPreset, Settings};
pub use tuning::GameConfig;

/// Game configuration constants
pub mod consts {
    /// Nominal frame duration in milliseconds (60 Hz). A frame of this length is `dt = 1.0`.
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest normalized step accepted from the clock (after a suspended tab, etc.)
    pub const MAX_DT: f32 = 4.0;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 400.0;

    /// Player defaults - x is fixed, only y moves
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_SIZE: f32 = 30.0;

    /// Number of recent positions kept for trail rendering
    pub const TRAIL_LENGTH: usize = 12;
}

/// Convert a normalized step to real elapsed milliseconds
#[inline]
pub fn dt_to_ms(dt: f32) -> f32 {
    dt * consts::FRAME_MS
}
