//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Normalized time steps only
//! - Randomness only through `RandomSource`
//! - Stable iteration order (by entity ID)
//! - No rendering, storage or platform dependencies

pub mod body;
pub mod clock;
pub mod collision;
pub mod environment;
pub mod obstacle;
pub mod powerup;
pub mod rng;
pub mod score;
pub mod state;
pub mod tick;

pub use body::PlayerBody;
pub use clock::Clock;
pub use collision::{Aabb, Collision};
pub use environment::{Environment, TimeOfDay, Weather, WeatherParticle};
pub use obstacle::{Obstacle, ObstacleField};
pub use powerup::{ActiveEffects, PowerUp, PowerUpField, PowerUpKind};
pub use rng::{RandomSource, ScriptedRandom, SeededRandom};
pub use score::ScoreTracker;
pub use state::{GameEvent, GameSession, SessionPhase, SessionSummary};
pub use tick::{jump, start, tick};
