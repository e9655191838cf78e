//! Persistence
//!
//! Two collaborators, both outside the simulation:
//! - `store`: local key/value state (settings, achievements, local leaderboard)
//! - `remote`: the score service (high score, leaderboard) and its payloads
//!
//! Every failure here is recoverable. Callers log and carry on.

pub mod remote;
pub mod store;

pub use remote::{
    HighScoreResponse, HighScoreSubmission, LeaderboardQuery, LocalScoreReporter, ScoreReporter,
    ScoreSubmission,
};
pub use store::{KeyValueStore, MemoryStore, load_json, save_json};

#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
#[cfg(target_arch = "wasm32")]
pub use store::LocalStorage;

/// Platform default store: LocalStorage in the browser, JSON files natively
pub fn default_store() -> Box<dyn KeyValueStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(LocalStorage)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let dir = std::env::var_os("GAP_RUNNER_DATA_DIR")
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|| std::path::PathBuf::from(".gap-runner"));
        Box::new(FileStore::new(dir))
    }
}
