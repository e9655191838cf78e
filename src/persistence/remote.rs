//! Score service interface
//!
//! The REST endpoints live elsewhere; this is their shape and a local
//! implementation so the game keeps working offline.
//!
//! Endpoints:
//! - `GET /highscore` → `HighScoreResponse`
//! - `POST /highscore` with `HighScoreSubmission`
//! - `GET /leaderboard?limit=N` → `[LeaderboardEntry]`, best first
//! - `POST /leaderboard` with `ScoreSubmission`

use serde::{Deserialize, Serialize};

use super::store::{KeyValueStore, load_json, save_json};
use crate::error::PersistenceError;
use crate::highscores::{Leaderboard, LeaderboardEntry};
use crate::sim::{SessionSummary, TimeOfDay, Weather};

pub const HIGHSCORE_PATH: &str = "/highscore";
pub const LEADERBOARD_PATH: &str = "/leaderboard";

/// Body of `POST /leaderboard`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub score: f64,
    pub player_name: String,
    pub combo: u32,
    pub distance: u64,
    pub weather_condition: Weather,
    pub time_of_day: TimeOfDay,
}

impl ScoreSubmission {
    pub fn from_summary(summary: &SessionSummary, player_name: &str) -> Self {
        Self {
            score: summary.score,
            player_name: player_name.to_string(),
            combo: summary.combo,
            distance: summary.distance,
            weather_condition: summary.weather,
            time_of_day: summary.time_of_day,
        }
    }

    pub fn into_entry(self, timestamp: f64) -> LeaderboardEntry {
        LeaderboardEntry {
            score: self.score,
            player_name: self.player_name,
            combo: self.combo,
            distance: self.distance,
            weather_condition: self.weather_condition,
            time_of_day: self.time_of_day,
            timestamp,
        }
    }
}

/// Body of `POST /highscore`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreSubmission {
    pub score: f64,
    pub player_name: String,
}

/// Response of `GET /highscore`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreResponse {
    pub high_score: f64,
}

/// Query of `GET /leaderboard`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardQuery {
    pub limit: usize,
}

impl LeaderboardQuery {
    pub fn path(&self) -> String {
        format!("{}?limit={}", LEADERBOARD_PATH, self.limit)
    }
}

/// The remote score service as seen by the game.
///
/// Implementations must not block the frame loop: a networked one should
/// queue the request and return. Errors are logged by the caller and dropped.
pub trait ScoreReporter {
    fn submit_score(&mut self, submission: &ScoreSubmission) -> Result<(), PersistenceError>;

    fn fetch_leaderboard(
        &mut self,
        query: LeaderboardQuery,
    ) -> Result<Vec<LeaderboardEntry>, PersistenceError>;

    fn fetch_high_score(&mut self) -> Result<Option<HighScoreResponse>, PersistenceError>;

    /// Record a new personal best; sent only when it beats the cached high score
    fn submit_high_score(
        &mut self,
        submission: &HighScoreSubmission,
    ) -> Result<(), PersistenceError>;
}

/// Score service backed by the local leaderboard
pub struct LocalScoreReporter {
    leaderboard: Leaderboard,
    high_score: Option<HighScoreSubmission>,
    store: Box<dyn KeyValueStore>,
}

impl LocalScoreReporter {
    /// Storage key of the standalone high score record
    pub const HIGH_SCORE_KEY: &'static str = "gap_runner_high_score";

    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let leaderboard = Leaderboard::load(store.as_ref());
        let high_score = load_json::<HighScoreSubmission>(store.as_ref(), Self::HIGH_SCORE_KEY)
            .unwrap_or_else(|e| {
                log::warn!("Discarding unreadable high score: {}", e);
                None
            });
        Self {
            leaderboard,
            high_score,
            store,
        }
    }

    /// Best of the standalone record and the leaderboard head
    fn best(&self) -> Option<f64> {
        let recorded = self.high_score.as_ref().map(|h| h.score);
        match (recorded, self.leaderboard.top_score()) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }
}

impl ScoreReporter for LocalScoreReporter {
    fn submit_score(&mut self, submission: &ScoreSubmission) -> Result<(), PersistenceError> {
        let entry = submission.clone().into_entry(crate::platform::now_ms());
        match self.leaderboard.add_entry(entry) {
            Some(rank) => {
                log::info!("New leaderboard entry at rank {}", rank);
                self.leaderboard.save(self.store.as_mut())
            }
            None => Err(PersistenceError::Rejected(format!(
                "POST {}: score {} does not qualify",
                LEADERBOARD_PATH, submission.score
            ))),
        }
    }

    fn fetch_leaderboard(
        &mut self,
        query: LeaderboardQuery,
    ) -> Result<Vec<LeaderboardEntry>, PersistenceError> {
        Ok(self.leaderboard.top(query.limit).to_vec())
    }

    fn fetch_high_score(&mut self) -> Result<Option<HighScoreResponse>, PersistenceError> {
        Ok(self.best().map(|high_score| HighScoreResponse { high_score }))
    }

    fn submit_high_score(
        &mut self,
        submission: &HighScoreSubmission,
    ) -> Result<(), PersistenceError> {
        if self.best().is_some_and(|best| submission.score <= best) {
            return Err(PersistenceError::Rejected(format!(
                "POST {}: score {} is not a new high score",
                HIGHSCORE_PATH, submission.score
            )));
        }
        save_json(self.store.as_mut(), Self::HIGH_SCORE_KEY, submission)?;
        log::info!("New high score {} by {}", submission.score, submission.player_name);
        self.high_score = Some(submission.clone());
        Ok(())
    }
}
