//! Data-driven game balance
//!
//! Every constant that differed between the incremental versions of the game
//! is a field here. `GameConfig::default()` is the feature-complete variant.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;
use crate::sim::PowerUpKind;

/// All tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    pub player_x: f32,
    pub player_size: f32,

    // === Physics ===
    /// Added to vertical velocity every normalized tick
    pub gravity: f32,
    /// Velocity set by a jump (negative is up)
    pub jump_force: f32,

    // === Obstacles ===
    /// Whether new obstacles spawn; existing ones always scroll
    pub obstacles_enabled: bool,
    pub obstacle_speed: f32,
    pub obstacle_width: f32,
    /// Vertical gap used for collision, constant across obstacles
    pub obstacle_gap: f32,
    /// Horizontal distance scrolled before the next obstacle spawns
    pub spawn_spacing: f32,
    /// Minimum distance between the gap and the floor/ceiling
    pub min_gap_margin: f32,
    /// Inset applied to every side of both hitboxes
    pub collision_buffer: f32,

    // === Power-ups ===
    /// Kinds that may spawn; empty disables power-ups
    pub powerup_kinds: Vec<PowerUpKind>,
    pub powerup_spawn_chance: f32,
    pub max_powerups: usize,
    pub powerup_speed: f32,
    pub powerup_size: f32,
    pub powerup_margin: f32,
    pub invincibility_ms: f32,
    pub slow_motion_ms: f32,
    /// World speed multiplier while slow motion is active
    pub slow_motion_factor: f32,
    pub signal_boost_ms: f32,
    pub score_boost_points: f64,

    // === Environment ===
    pub weather_enabled: bool,
    pub weather_change_chance: f32,
    /// Full day → dusk → night → dawn cycle length
    pub day_cycle_ms: f32,

    // === Scoring ===
    pub distance_per_tick: u64,

    // === Host policy ===
    pub max_dt: f32,
    pub restart_cooldown_ms: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            player_x: PLAYER_X,
            player_size: PLAYER_SIZE,

            gravity: 0.5,
            jump_force: -8.0,

            obstacles_enabled: true,
            obstacle_speed: 3.0,
            obstacle_width: 60.0,
            obstacle_gap: 150.0,
            spawn_spacing: 250.0,
            min_gap_margin: 50.0,
            collision_buffer: 5.0,

            powerup_kinds: PowerUpKind::ALL.to_vec(),
            powerup_spawn_chance: 0.005,
            max_powerups: 2,
            powerup_speed: 3.0,
            powerup_size: 25.0,
            powerup_margin: 40.0,
            invincibility_ms: 5000.0,
            slow_motion_ms: 4000.0,
            slow_motion_factor: 0.5,
            signal_boost_ms: 6000.0,
            score_boost_points: 5.0,

            weather_enabled: true,
            weather_change_chance: 0.001,
            day_cycle_ms: 120_000.0,

            distance_per_tick: 1,

            max_dt: MAX_DT,
            restart_cooldown_ms: 2000.0,
        }
    }
}

impl GameConfig {
    /// The original minimal variant: obstacles only, permanent clear day
    pub fn classic() -> Self {
        Self {
            powerup_kinds: Vec::new(),
            weather_enabled: false,
            ..Self::default()
        }
    }

    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Whether any power-up kind may spawn
    pub fn powerups_enabled(&self) -> bool {
        !self.powerup_kinds.is_empty() && self.max_powerups > 0
    }

    /// Length of one time-of-day phase
    pub fn phase_ms(&self) -> f32 {
        self.day_cycle_ms / 4.0
    }

    /// Lowest allowed gap top
    pub fn min_gap_top(&self) -> f32 {
        self.min_gap_margin
    }

    /// Highest allowed gap top (gap bottom stays `min_gap_margin` above the floor)
    pub fn max_gap_top(&self) -> f32 {
        self.field_height - self.min_gap_margin - self.obstacle_gap
    }

    /// Reject parameter sets under which the simulation invariants cannot hold
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("player_size", self.player_size),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_gap", self.obstacle_gap),
            ("spawn_spacing", self.spawn_spacing),
            ("powerup_size", self.powerup_size),
            ("obstacle_speed", self.obstacle_speed),
            ("powerup_speed", self.powerup_speed),
            ("day_cycle_ms", self.day_cycle_ms),
            ("distance_per_tick", self.distance_per_tick as f32),
            ("max_dt", self.max_dt),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { name, value });
            }
        }

        for (name, value) in [("gravity", self.gravity), ("jump_force", self.jump_force)] {
            if !value.is_finite() {
                return Err(TuningError::NotFinite { name, value });
            }
        }

        // Durations and bonuses
        let non_negative = [
            ("invincibility_ms", self.invincibility_ms as f64),
            ("slow_motion_ms", self.slow_motion_ms as f64),
            ("signal_boost_ms", self.signal_boost_ms as f64),
            ("score_boost_points", self.score_boost_points),
            ("restart_cooldown_ms", self.restart_cooldown_ms),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(TuningError::Negative { name, value });
            }
        }

        let probabilities = [
            ("powerup_spawn_chance", self.powerup_spawn_chance),
            ("weather_change_chance", self.weather_change_chance),
            ("slow_motion_factor", self.slow_motion_factor),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::NotProbability { name, value });
            }
        }

        if self.max_gap_top() < self.min_gap_top() || self.min_gap_margin < 0.0 {
            return Err(TuningError::GapDoesNotFit {
                gap: self.obstacle_gap,
                margin: self.min_gap_margin,
                height: self.field_height,
            });
        }

        let inset_player = self.player_size - 2.0 * self.collision_buffer;
        if inset_player >= self.obstacle_gap + 2.0 * self.collision_buffer {
            return Err(TuningError::PlayerLargerThanGap {
                player: self.player_size,
                gap: self.obstacle_gap,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
        assert_eq!(GameConfig::classic().validate(), Ok(()));
    }

    #[test]
    fn test_classic_disables_extras() {
        let config = GameConfig::classic();
        assert!(!config.powerups_enabled());
        assert!(!config.weather_enabled);
        assert!(config.obstacles_enabled);
    }

    #[test]
    fn test_gap_must_fit() {
        let config = GameConfig {
            obstacle_gap: 350.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TuningError::GapDoesNotFit { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_probability() {
        let config = GameConfig {
            weather_change_chance: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TuningError::NotProbability { name: "weather_change_chance", .. })
        ));
    }

    #[test]
    fn test_rejects_negative_duration() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "invincibility_ms": -5000.0 }"#),
            Err(TuningError::Negative { name: "invincibility_ms", .. })
        ));
        let config = GameConfig {
            score_boost_points: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TuningError::Negative { name: "score_boost_points", .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "obstacle_speed": -3.0 }"#),
            Err(TuningError::NotPositive { name: "obstacle_speed", .. })
        ));
        let config = GameConfig {
            powerup_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TuningError::NotPositive { name: "powerup_speed", .. })
        ));
        let config = GameConfig {
            distance_per_tick: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TuningError::NotPositive { name: "distance_per_tick", .. })
        ));
    }

    #[test]
    fn test_rejects_nan_physics() {
        let config = GameConfig {
            gravity: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TuningError::NotFinite { name: "gravity", .. })
        ));
        // Zero gravity is a legal hover setup
        let hover = GameConfig {
            gravity: 0.0,
            jump_force: 0.0,
            ..Default::default()
        };
        assert_eq!(hover.validate(), Ok(()));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = GameConfig::from_json(r#"{ "gravity": 0.25, "max_powerups": 1 }"#)
            .expect("valid json");
        assert_eq!(config.gravity, 0.25);
        assert_eq!(config.max_powerups, 1);
        assert_eq!(config.obstacle_gap, GameConfig::default().obstacle_gap);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            GameConfig::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_phase_is_quarter_cycle() {
        let config = GameConfig::default();
        assert_eq!(config.phase_ms(), 30_000.0);
    }
}
