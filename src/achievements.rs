//! Achievements
//!
//! Progress is stored client-side as an ordered JSON array of
//! `{ id, unlocked, progress, target }`. Unknown ids in storage are dropped,
//! missing ones start locked at zero.

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::persistence::{KeyValueStore, load_json, save_json};
use crate::sim::{SessionSummary, TimeOfDay, Weather};

/// How a session feeds an achievement's progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    /// Best single-session score
    BestScore,
    /// Best single-session combo
    BestCombo,
    /// Best single-session distance
    BestDistance,
    /// Sessions played
    Sessions,
    /// Sessions that ended in the given weather
    SessionsInWeather(Weather),
    /// Sessions that ended at the given time of day
    SessionsAt(TimeOfDay),
}

impl Metric {
    fn apply(&self, progress: u64, summary: &SessionSummary) -> u64 {
        match *self {
            Metric::BestScore => progress.max(summary.score.floor() as u64),
            Metric::BestCombo => progress.max(summary.combo as u64),
            Metric::BestDistance => progress.max(summary.distance),
            Metric::Sessions => progress + 1,
            Metric::SessionsInWeather(weather) => progress + u64::from(summary.weather == weather),
            Metric::SessionsAt(phase) => progress + u64::from(summary.time_of_day == phase),
        }
    }
}

struct Definition {
    id: &'static str,
    metric: Metric,
    target: u64,
}

const CATALOGUE: &[Definition] = &[
    Definition {
        id: "first_pass",
        metric: Metric::BestCombo,
        target: 1,
    },
    Definition {
        id: "getting_started",
        metric: Metric::BestScore,
        target: 10,
    },
    Definition {
        id: "high_flyer",
        metric: Metric::BestScore,
        target: 50,
    },
    Definition {
        id: "combo_master",
        metric: Metric::BestCombo,
        target: 25,
    },
    Definition {
        id: "marathon",
        metric: Metric::BestDistance,
        target: 5_000,
    },
    Definition {
        id: "storm_chaser",
        metric: Metric::SessionsInWeather(Weather::Storm),
        target: 1,
    },
    Definition {
        id: "night_owl",
        metric: Metric::SessionsAt(TimeOfDay::Night),
        target: 3,
    },
    Definition {
        id: "dedicated",
        metric: Metric::Sessions,
        target: 10,
    },
];

/// Persisted achievement record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub unlocked: bool,
    pub progress: u64,
    pub target: u64,
}

/// The player's achievements, in catalogue order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementBook {
    achievements: Vec<Achievement>,
}

impl Default for AchievementBook {
    fn default() -> Self {
        Self {
            achievements: CATALOGUE
                .iter()
                .map(|d| Achievement {
                    id: d.id.to_string(),
                    unlocked: false,
                    progress: 0,
                    target: d.target,
                })
                .collect(),
        }
    }
}

impl AchievementBook {
    pub const STORAGE_KEY: &'static str = "gap_runner_achievements";

    /// All locked, zero progress
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored records, keeping catalogue order and targets
    pub fn from_records(records: Vec<Achievement>) -> Self {
        let mut book = Self::default();
        for achievement in &mut book.achievements {
            if let Some(stored) = records.iter().find(|r| r.id == achievement.id) {
                achievement.progress = stored.progress;
                achievement.unlocked = stored.unlocked || stored.progress >= achievement.target;
            }
        }
        book
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    /// Fold a finished session into progress; returns ids unlocked just now
    pub fn record_session(&mut self, summary: &SessionSummary) -> Vec<String> {
        let mut newly_unlocked = Vec::new();
        for (achievement, definition) in self.achievements.iter_mut().zip(CATALOGUE) {
            achievement.progress = definition.metric.apply(achievement.progress, summary);
            if !achievement.unlocked && achievement.progress >= achievement.target {
                achievement.unlocked = true;
                log::info!("Achievement unlocked: {}", achievement.id);
                newly_unlocked.push(achievement.id.clone());
            }
        }
        newly_unlocked
    }

    /// Load from storage; absent or malformed data yields the default book
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Vec<Achievement>>(store, Self::STORAGE_KEY) {
            Ok(Some(records)) => Self::from_records(records),
            Ok(None) => Self::new(),
            Err(e) => {
                log::warn!("Discarding unreadable achievements: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistenceError> {
        save_json(store, Self::STORAGE_KEY, &self.achievements)
    }
}
