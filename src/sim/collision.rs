//! Collision detection
//!
//! Everything is axis-aligned. Hitboxes are shrunk by a fixed buffer on every
//! side before testing, so grazing contact with the visual footprint is forgiven.

use glam::Vec2;

use super::obstacle::Obstacle;

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from a top-left corner and a size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Shrink every side by `buffer`
    pub fn inset(&self, buffer: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(buffer),
            max: self.max - Vec2::splat(buffer),
        }
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Strict overlap on the x axis
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x
    }

    /// Strict overlap on both axes
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.min.y < other.max.y && self.max.y > other.min.y
    }
}

/// What the player ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Ceiling,
    Floor,
    /// Obstacle by entity id
    Obstacle(u32),
}

/// Check the player against the top and bottom of the play area
pub fn boundary_collision(player: &Aabb, buffer: f32, field_height: f32) -> Option<Collision> {
    let hitbox = player.inset(buffer);
    if hitbox.top() <= 0.0 {
        Some(Collision::Ceiling)
    } else if hitbox.bottom() >= field_height {
        Some(Collision::Floor)
    } else {
        None
    }
}

/// Check the player against one obstacle's top and bottom segments
pub fn obstacle_collision(player: &Aabb, obstacle: &Obstacle, buffer: f32) -> bool {
    let hitbox = player.inset(buffer);
    let column = Aabb::new(
        Vec2::new(obstacle.x, 0.0),
        Vec2::new(obstacle.x + obstacle.width, 0.0),
    )
    .inset(buffer);

    if !hitbox.overlaps_x(&column) {
        return false;
    }
    hitbox.top() < obstacle.gap_top - buffer || hitbox.bottom() > obstacle.gap_bottom + buffer
}

/// Run both collision classes in order: boundary first, then obstacles
pub fn detect(
    player: &Aabb,
    obstacles: &[Obstacle],
    buffer: f32,
    field_height: f32,
) -> Option<Collision> {
    if let Some(hit) = boundary_collision(player, buffer, field_height) {
        return Some(hit);
    }
    obstacles
        .iter()
        .find(|o| obstacle_collision(player, o, buffer))
        .map(|o| Collision::Obstacle(o.id))
}

/// Pickup test; pickups use the same forgiving inset on the player only
pub fn pickup_overlap(player: &Aabb, pickup: &Aabb, buffer: f32) -> bool {
    player.inset(buffer).overlaps(pickup)
}
