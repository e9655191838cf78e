//! Scrolling obstacle pairs
//!
//! Each obstacle is a top and bottom segment with a fixed-height gap between
//! them. The visual scale varies per spawn; the collision gap never does.

use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::tuning::GameConfig;

/// Range of the cosmetic scale applied to each new obstacle
const SCALE_MIN: f32 = 0.85;
const SCALE_MAX: f32 = 1.15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
    /// Render-only size multiplier, ignored by collision
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Set once, the first tick the right edge passes the player
    pub scored: bool,
}

fn default_scale() -> f32 {
    1.0
}

impl Obstacle {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn gap_height(&self) -> f32 {
        self.gap_bottom - self.gap_top
    }
}

/// Owns the active obstacles, sorted by id (spawn order)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    pub obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a new obstacle is due
    pub fn should_spawn(&self, config: &GameConfig) -> bool {
        match self.obstacles.last() {
            None => true,
            Some(last) => last.x < config.field_width - config.spawn_spacing,
        }
    }

    /// Build an obstacle at the right edge with a gap drawn uniformly from the legal band
    pub fn spawn(&mut self, id: u32, config: &GameConfig, rng: &mut dyn RandomSource) -> &Obstacle {
        let min_top = config.min_gap_top();
        let max_top = config.max_gap_top();
        // Whole units keep `gap_bottom - gap_top` exact in f32
        let gap_top = rng
            .range(min_top, max_top + 1.0)
            .floor()
            .clamp(min_top, max_top.max(min_top));
        let scale = rng.range(SCALE_MIN, SCALE_MAX);

        log::debug!("Spawning obstacle {} with gap at {:.1}", id, gap_top);
        self.obstacles.push(Obstacle {
            id,
            x: config.field_width,
            width: config.obstacle_width,
            gap_top,
            gap_bottom: gap_top + config.obstacle_gap,
            scale,
            scored: false,
        });
        &self.obstacles[self.obstacles.len() - 1]
    }

    /// Scroll every obstacle left and drop those fully off-screen
    pub fn scroll(&mut self, distance: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.x -= distance;
        }
        self.obstacles.retain(|o| o.x >= -o.width);
    }

    /// Flag obstacles whose right edge has just passed `player_x`; returns how many flipped
    pub fn mark_passed(&mut self, player_x: f32) -> u32 {
        let mut passed = 0;
        for obstacle in &mut self.obstacles {
            if !obstacle.scored && obstacle.right() < player_x {
                obstacle.scored = true;
                passed += 1;
            }
        }
        passed
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{ScriptedRandom, SeededRandom};
    use proptest::prelude::*;

    #[test]
    fn test_spawns_when_empty() {
        let config = GameConfig::default();
        let field = ObstacleField::new();
        assert!(field.should_spawn(&config));
    }

    #[test]
    fn test_spawn_spacing() {
        let config = GameConfig::default();
        let mut field = ObstacleField::new();
        let mut rng = ScriptedRandom::constant(0.5);
        field.spawn(1, &config, &mut rng);
        assert!(!field.should_spawn(&config));

        // Exactly at the boundary is not yet left of it
        field.scroll(config.spawn_spacing);
        assert!(!field.should_spawn(&config));
        field.scroll(0.5);
        assert!(field.should_spawn(&config));
    }

    #[test]
    fn test_gap_extremes_stay_in_band() {
        let config = GameConfig::default();
        let mut field = ObstacleField::new();

        let low = field.spawn(1, &config, &mut ScriptedRandom::constant(0.0)).clone();
        assert_eq!(low.gap_top, config.min_gap_margin);

        let high = field.spawn(2, &config, &mut ScriptedRandom::constant(1.0)).clone();
        assert!(high.gap_bottom <= config.field_height - config.min_gap_margin);
    }

    #[test]
    fn test_scroll_culls_offscreen() {
        let config = GameConfig::default();
        let mut field = ObstacleField::new();
        field.spawn(1, &config, &mut ScriptedRandom::constant(0.5));
        field.scroll(config.field_width + config.obstacle_width);
        assert_eq!(field.len(), 1);
        field.scroll(0.1);
        assert!(field.is_empty());
    }

    #[test]
    fn test_mark_passed_flips_once() {
        let config = GameConfig::default();
        let mut field = ObstacleField::new();
        field.spawn(1, &config, &mut ScriptedRandom::constant(0.5));
        // Right edge at 860; passes x=100 once it is below 100
        field.scroll(760.0);
        assert_eq!(field.mark_passed(100.0), 0);
        field.scroll(1.0);
        assert_eq!(field.mark_passed(100.0), 1);
        assert!(field.obstacles[0].scored);
        field.scroll(1.0);
        assert_eq!(field.mark_passed(100.0), 0);
    }

    proptest! {
        #[test]
        fn prop_gap_invariant(seed in any::<u64>(), count in 1usize..64) {
            let config = GameConfig::default();
            let mut field = ObstacleField::new();
            let mut rng = SeededRandom::new(seed);
            for id in 0..count {
                field.spawn(id as u32, &config, &mut rng);
            }
            for o in &field.obstacles {
                prop_assert_eq!(o.gap_height(), config.obstacle_gap);
                prop_assert!(o.gap_top >= config.min_gap_margin);
                prop_assert!(o.gap_bottom <= config.field_height - config.min_gap_margin);
            }
        }
    }
}
