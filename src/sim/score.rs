//! Score, combo and distance counters

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreTracker {
    pub score: f64,
    /// Obstacles passed since the last game over
    pub combo: u32,
    pub distance: u64,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Award one obstacle pass; returns the points granted
    pub fn obstacle_passed(&mut self, multiplier: f64) -> f64 {
        let points = multiplier;
        self.score += points;
        self.combo += 1;
        points
    }

    /// Flat bonus that does not touch the combo
    pub fn add_bonus(&mut self, points: f64) {
        self.score += points;
    }

    pub fn advance_distance(&mut self, per_tick: u64) {
        self.distance += per_tick;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_increments_score_and_combo() {
        let mut tracker = ScoreTracker::new();
        assert_eq!(tracker.obstacle_passed(1.0), 1.0);
        assert_eq!(tracker.obstacle_passed(3.0), 3.0);
        assert_eq!(tracker.score, 4.0);
        assert_eq!(tracker.combo, 2);
    }

    #[test]
    fn test_bonus_leaves_combo() {
        let mut tracker = ScoreTracker::new();
        tracker.add_bonus(5.0);
        assert_eq!(tracker.score, 5.0);
        assert_eq!(tracker.combo, 0);
    }

    #[test]
    fn test_distance_is_independent_of_score() {
        let mut tracker = ScoreTracker::new();
        tracker.advance_distance(1);
        tracker.advance_distance(1);
        assert_eq!(tracker.distance, 2);
        assert_eq!(tracker.score, 0.0);
        tracker.reset();
        assert_eq!(tracker, ScoreTracker::default());
    }
}
