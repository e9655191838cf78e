//! Session state and core simulation types
//!
//! Everything mutated by a tick lives in one `GameSession`.

use serde::{Deserialize, Serialize};

use super::body::PlayerBody;
use super::collision::Collision;
use super::environment::{Environment, TimeOfDay, Weather};
use super::obstacle::ObstacleField;
use super::powerup::{PowerUpField, PowerUpKind};
use super::score::ScoreTracker;
use crate::tuning::GameConfig;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the first jump
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Run ended by a collision; only reset leaves this phase
    Over,
}

/// Final totals of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub score: f64,
    pub combo: u32,
    pub distance: u64,
    pub weather: Weather,
    pub time_of_day: TimeOfDay,
    pub elapsed_ms: f64,
    pub cause: Collision,
}

/// Things observers (renderer, audio, HUD) may react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started,
    Jumped,
    ObstaclePassed { points: f64 },
    PowerUpCollected { kind: PowerUpKind },
    WeatherChanged(Weather),
    TimeOfDayChanged(TimeOfDay),
    GameOver(SessionSummary),
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: SessionPhase,
    pub body: PlayerBody,
    pub obstacles: ObstacleField,
    pub powerups: PowerUpField,
    pub environment: Environment,
    pub score: ScoreTracker,
    /// Real milliseconds spent running
    pub elapsed_ms: f64,
    /// Running ticks executed
    pub time_ticks: u64,
    /// Events since the last drain. Hosts must drain them every frame;
    /// nothing else clears them before `reset`.
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    pub(crate) next_id: u32,
}

impl GameSession {
    pub fn new(config: &GameConfig, seed: u64, max_particles: usize) -> Self {
        Self {
            seed,
            phase: SessionPhase::Idle,
            body: PlayerBody::new(config.player_x, config.player_size, config.field_height),
            obstacles: ObstacleField::new(),
            powerups: PowerUpField::new(),
            environment: Environment::new(seed, max_particles),
            score: ScoreTracker::new(),
            elapsed_ms: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::Over
    }

    /// Back to idle with every counter and entity set at its initial value
    pub fn reset(&mut self, config: &GameConfig) {
        let trail_length = self.body.trail_length;
        self.phase = SessionPhase::Idle;
        self.body = PlayerBody::new(config.player_x, config.player_size, config.field_height);
        self.body.trail_length = trail_length;
        self.obstacles.clear();
        self.powerups.clear();
        self.environment.reset();
        self.score.reset();
        self.elapsed_ms = 0.0;
        self.time_ticks = 0;
        self.events.clear();
        self.next_id = 1;
    }

    pub fn summary(&self, cause: Collision) -> SessionSummary {
        SessionSummary {
            score: self.score.score,
            combo: self.score.combo,
            distance: self.score.distance,
            weather: self.environment.weather,
            time_of_day: self.environment.time_of_day,
            elapsed_ms: self.elapsed_ms,
            cause,
        }
    }
}
