//! Power-up pickups and their timed effects

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, pickup_overlap};
use super::rng::RandomSource;
use crate::tuning::GameConfig;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Suppresses all collisions while active
    Invincibility,
    /// Immediate flat score bonus
    ScoreBoost,
    /// World scrolls slower while active
    SlowMotion,
    /// Obstacle passes are worth double while active
    SignalBoost,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Invincibility,
        PowerUpKind::ScoreBoost,
        PowerUpKind::SlowMotion,
        PowerUpKind::SignalBoost,
    ];
}

/// A pickup entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    /// Set on pickup; removed at the start of the next tick
    pub collected: bool,
}

impl PowerUp {
    pub fn hitbox(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, Vec2::splat(self.size))
    }
}

/// Remaining time of each timed effect, in real milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub invincibility_ms: f32,
    pub slow_motion_ms: f32,
    pub signal_boost_ms: f32,
}

impl ActiveEffects {
    pub fn invincible(&self) -> bool {
        self.invincibility_ms > 0.0
    }

    pub fn slow_motion(&self) -> bool {
        self.slow_motion_ms > 0.0
    }

    pub fn signal_boost(&self) -> bool {
        self.signal_boost_ms > 0.0
    }

    /// Count every timer down by real elapsed time, saturating at zero
    pub fn decay(&mut self, elapsed_ms: f32) {
        self.invincibility_ms = (self.invincibility_ms - elapsed_ms).max(0.0);
        self.slow_motion_ms = (self.slow_motion_ms - elapsed_ms).max(0.0);
        self.signal_boost_ms = (self.signal_boost_ms - elapsed_ms).max(0.0);
    }

    /// Apply a pickup. Timed effects extend the remaining time, never reset it.
    /// Returns the immediate score bonus, if any.
    pub fn apply(&mut self, kind: PowerUpKind, config: &GameConfig) -> Option<f64> {
        match kind {
            PowerUpKind::Invincibility => {
                self.invincibility_ms += config.invincibility_ms;
                None
            }
            PowerUpKind::SlowMotion => {
                self.slow_motion_ms += config.slow_motion_ms;
                None
            }
            PowerUpKind::SignalBoost => {
                self.signal_boost_ms += config.signal_boost_ms;
                None
            }
            PowerUpKind::ScoreBoost => Some(config.score_boost_points),
        }
    }
}

/// Owns the active pickups, sorted by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUpField {
    pub powerups: Vec<PowerUp>,
}

impl PowerUpField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uncollected pickups still on screen
    pub fn active_count(&self) -> usize {
        self.powerups.iter().filter(|p| !p.collected).count()
    }

    /// Drop pickups collected on the previous tick
    pub fn remove_collected(&mut self) {
        self.powerups.retain(|p| !p.collected);
    }

    /// Roll for a spawn. The spawn chance is only drawn while below the cap.
    pub fn try_spawn(
        &mut self,
        id: impl FnOnce() -> u32,
        config: &GameConfig,
        rng: &mut dyn RandomSource,
    ) -> Option<&PowerUp> {
        if !config.powerups_enabled() || self.active_count() >= config.max_powerups {
            return None;
        }
        if !rng.chance(config.powerup_spawn_chance) {
            return None;
        }

        let kind = config.powerup_kinds[rng.pick_index(config.powerup_kinds.len())];
        let y = rng.range(
            config.powerup_margin,
            config.field_height - config.powerup_margin - config.powerup_size,
        );
        let id = id();
        log::debug!("Spawning {:?} power-up {} at y={:.1}", kind, id, y);
        self.powerups.push(PowerUp {
            id,
            kind,
            pos: Vec2::new(config.field_width, y),
            size: config.powerup_size,
            collected: false,
        });
        self.powerups.last()
    }

    /// Scroll pickups left and drop those fully off-screen
    pub fn scroll(&mut self, distance: f32) {
        for powerup in &mut self.powerups {
            powerup.pos.x -= distance;
        }
        self.powerups.retain(|p| p.pos.x >= -p.size);
    }

    /// Mark every pickup the player touches; returns the collected kinds in id order
    pub fn collect(&mut self, player: &Aabb, buffer: f32) -> Vec<PowerUpKind> {
        let mut collected = Vec::new();
        for powerup in &mut self.powerups {
            if !powerup.collected && pickup_overlap(player, &powerup.hitbox(), buffer) {
                powerup.collected = true;
                collected.push(powerup.kind);
            }
        }
        collected
    }

    pub fn len(&self) -> usize {
        self.powerups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.powerups.is_empty()
    }

    pub fn clear(&mut self) {
        self.powerups.clear();
    }
}
