//! The player body
//!
//! Only vertical motion is simulated. The body itself never clamps `y`;
//! leaving the play area is detected by the collision pass.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::powerup::ActiveEffects;
use crate::consts::TRAIL_LENGTH;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Top-left corner; x never changes
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (positive is down)
    pub velocity: f32,
    /// Timed power-up effects (invincibility lives here)
    #[serde(default)]
    pub effects: ActiveEffects,
    /// Recent positions for rendering (newest first)
    #[serde(skip)]
    pub trail: Vec<Vec2>,
    #[serde(skip, default = "default_trail_length")]
    pub trail_length: usize,
}

fn default_trail_length() -> usize {
    TRAIL_LENGTH
}

impl PlayerBody {
    /// A body resting at the vertical center of the field
    pub fn new(x: f32, size: f32, field_height: f32) -> Self {
        Self {
            pos: Vec2::new(x, (field_height - size) / 2.0),
            size: Vec2::splat(size),
            velocity: 0.0,
            effects: ActiveEffects::default(),
            trail: Vec::with_capacity(TRAIL_LENGTH),
            trail_length: TRAIL_LENGTH,
        }
    }

    /// Integrate one step of gravity
    pub fn apply_gravity(&mut self, gravity: f32, dt: f32) {
        self.velocity += gravity * dt;
        self.pos.y += self.velocity * dt;
    }

    /// Replace vertical velocity with the jump impulse
    pub fn jump(&mut self, jump_force: f32) {
        self.velocity = jump_force;
    }

    /// Invincibility overrides every collision
    pub fn invincible(&self) -> bool {
        self.effects.invincible()
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Record current position to trail (call each running tick)
    pub fn record_trail(&mut self) {
        if self.trail_length == 0 {
            return;
        }
        self.trail.insert(0, self.center());
        self.trail.truncate(self.trail_length);
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}
