//! Session controller
//!
//! Owns one `GameSession` and is the only thing that mutates it. Rendering,
//! audio and persistence observe the state after each tick; persistence is
//! only touched when a run ends, and its failures never reach the simulation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::achievements::AchievementBook;
use crate::error::TuningError;
use crate::highscores::LeaderboardEntry;
use crate::persistence::{
    HighScoreSubmission, KeyValueStore, LeaderboardQuery, ScoreReporter, ScoreSubmission,
};
use crate::settings::{DEFAULT_PLAYER_NAME, Settings};
use crate::sim::{
    self, Clock, GameEvent, GameSession, RandomSource, SeededRandom, SessionPhase, SessionSummary,
};
use crate::tuning::GameConfig;

/// Leaderboard rows fetched after each submitted run
pub const LEADERBOARD_LIMIT: usize = 10;

/// Cloneable jump input that may be fired from any thread.
///
/// Jumps are queued and applied at the start of the next tick, so the
/// session still has a single writer.
#[derive(Debug, Clone, Default)]
pub struct JumpTrigger {
    pending: Arc<AtomicU32>,
}

impl JumpTrigger {
    pub fn jump(&self) {
        self.pending.fetch_add(1, Ordering::AcqRel);
    }

    fn take(&self) -> u32 {
        self.pending.swap(0, Ordering::AcqRel)
    }
}

pub struct SessionController {
    config: GameConfig,
    session: GameSession,
    rng: Box<dyn RandomSource>,
    clock: Clock,
    jumps: JumpTrigger,
    player_name: String,
    reporter: Option<Box<dyn ScoreReporter>>,
    store: Option<Box<dyn KeyValueStore>>,
    achievements: AchievementBook,
    leaderboard: Vec<LeaderboardEntry>,
    high_score: Option<f64>,
    last_summary: Option<SessionSummary>,
    /// Frame timestamp of the tick that ended the run
    over_at_ms: Option<f64>,
}

impl SessionController {
    /// Controller with a seeded PCG random source
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, TuningError> {
        Self::with_random(config, seed, Box::new(SeededRandom::new(seed)))
    }

    /// Controller with a caller-supplied random source
    pub fn with_random(
        config: GameConfig,
        seed: u64,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, TuningError> {
        config.validate()?;
        let session = GameSession::new(&config, seed, 0);
        let clock = Clock::new(config.max_dt);
        Ok(Self {
            config,
            session,
            rng,
            clock,
            jumps: JumpTrigger::default(),
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            reporter: None,
            store: None,
            achievements: AchievementBook::new(),
            leaderboard: Vec::new(),
            high_score: None,
            last_summary: None,
            over_at_ms: None,
        })
    }

    /// Apply player name and cosmetic caps
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.player_name = settings.player_name.clone();
        self.session.environment.max_particles = settings.max_particles();
        self.session.body.trail_length = settings.trail_length();
        self
    }

    /// Attach the score service and read the current high score and leaderboard
    pub fn with_reporter(mut self, reporter: Box<dyn ScoreReporter>) -> Self {
        self.reporter = Some(reporter);
        self.refresh_remote();
        self
    }

    /// Attach local storage and load achievement progress from it
    pub fn with_store(mut self, store: Box<dyn KeyValueStore>) -> Self {
        self.achievements = AchievementBook::load(store.as_ref());
        self.store = Some(store);
        self
    }

    // === Commands ===

    /// Begin the run without a jump impulse
    pub fn start(&mut self) -> bool {
        sim::start(&mut self.session)
    }

    /// Jump; the first jump also starts the run
    pub fn jump(&mut self) -> bool {
        sim::jump(&mut self.session, &self.config)
    }

    /// Handle for queuing jumps from input callbacks
    pub fn jump_trigger(&self) -> JumpTrigger {
        self.jumps.clone()
    }

    /// Advance by a normalized step. No-op unless running.
    pub fn tick(&mut self, dt: f32) {
        if self.jumps.take() > 0 {
            self.jump();
        }
        if let Some(cause) = sim::tick(&mut self.session, &self.config, self.rng.as_mut(), dt) {
            let summary = self.session.summary(cause);
            self.finish_run(summary);
        }
    }

    /// Advance using a frame timestamp; returns the step taken
    pub fn frame(&mut self, now_ms: f64) -> f32 {
        let dt = self.clock.advance(now_ms);
        let was_over = self.is_over();
        self.tick(dt);
        if !was_over && self.is_over() {
            self.over_at_ms = Some(now_ms);
        }
        dt
    }

    /// Back to idle with everything cleared
    pub fn reset(&mut self) {
        self.session.reset(&self.config);
        self.clock.reset();
        self.jumps.take();
        self.over_at_ms = None;
        log::info!("Session reset");
    }

    /// Reset after a finished run once the cooldown has passed
    pub fn restart(&mut self, now_ms: f64) -> bool {
        if !self.can_restart(now_ms) {
            return false;
        }
        self.reset();
        true
    }

    pub fn can_restart(&self, now_ms: f64) -> bool {
        if !self.is_over() {
            return false;
        }
        match self.over_at_ms {
            Some(over_at) => now_ms - over_at >= self.config.restart_cooldown_ms,
            None => true,
        }
    }

    /// Re-read the remote high score and leaderboard; failures keep cached values
    pub fn refresh_remote(&mut self) {
        let Some(reporter) = self.reporter.as_mut() else {
            return;
        };
        match reporter.fetch_high_score() {
            Ok(Some(response)) => self.high_score = Some(response.high_score),
            Ok(None) => {}
            Err(e) => log::warn!("Could not fetch high score: {}", e),
        }
        match reporter.fetch_leaderboard(LeaderboardQuery {
            limit: LEADERBOARD_LIMIT,
        }) {
            Ok(entries) => self.leaderboard = entries,
            Err(e) => log::warn!("Could not fetch leaderboard: {}", e),
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.session.events)
    }

    // === Queries ===

    pub fn phase(&self) -> SessionPhase {
        self.session.phase
    }

    pub fn is_over(&self) -> bool {
        self.session.is_over()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Direct state access for hosts that stage scenarios (tests, replays)
    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn achievements(&self) -> &AchievementBook {
        &self.achievements
    }

    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    pub fn high_score(&self) -> Option<f64> {
        self.high_score
    }

    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    /// Fire-and-forget persistence for a finished run
    fn finish_run(&mut self, summary: SessionSummary) {
        let new_best =
            summary.score > 0.0 && self.high_score.is_none_or(|best| summary.score > best);
        if new_best {
            self.high_score = Some(summary.score);
        }

        if let Some(reporter) = self.reporter.as_mut() {
            if new_best {
                let best = HighScoreSubmission {
                    score: summary.score,
                    player_name: self.player_name.clone(),
                };
                if let Err(e) = reporter.submit_high_score(&best) {
                    log::warn!("High score not recorded: {}", e);
                }
            }
            let submission = ScoreSubmission::from_summary(&summary, &self.player_name);
            match reporter.submit_score(&submission) {
                Ok(()) => match reporter.fetch_leaderboard(LeaderboardQuery {
                    limit: LEADERBOARD_LIMIT,
                }) {
                    Ok(entries) => self.leaderboard = entries,
                    Err(e) => log::warn!("Could not refresh leaderboard: {}", e),
                },
                Err(e) => log::warn!("Score not recorded: {}", e),
            }
        }

        let unlocked = self.achievements.record_session(&summary);
        if !unlocked.is_empty() {
            log::info!("{} achievement(s) unlocked", unlocked.len());
        }
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = self.achievements.save(store.as_mut()) {
                log::warn!("Could not save achievements: {}", e);
            }
        }

        self.last_summary = Some(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistenceError;
    use crate::persistence::{HighScoreResponse, LocalScoreReporter, MemoryStore};
    use crate::sim::{Collision, Obstacle};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records submissions; optionally fails every call
    #[derive(Default)]
    struct FakeReporter {
        submissions: Rc<RefCell<Vec<ScoreSubmission>>>,
        high_scores: Rc<RefCell<Vec<HighScoreSubmission>>>,
        remote_best: Option<f64>,
        fail: bool,
    }

    impl ScoreReporter for FakeReporter {
        fn submit_score(&mut self, submission: &ScoreSubmission) -> Result<(), PersistenceError> {
            if self.fail {
                return Err(PersistenceError::Unavailable("offline".to_string()));
            }
            self.submissions.borrow_mut().push(submission.clone());
            Ok(())
        }

        fn fetch_leaderboard(
            &mut self,
            _query: LeaderboardQuery,
        ) -> Result<Vec<LeaderboardEntry>, PersistenceError> {
            if self.fail {
                return Err(PersistenceError::Unavailable("offline".to_string()));
            }
            Ok(self
                .submissions
                .borrow()
                .iter()
                .map(|s| s.clone().into_entry(0.0))
                .collect())
        }

        fn fetch_high_score(&mut self) -> Result<Option<HighScoreResponse>, PersistenceError> {
            if self.fail {
                return Err(PersistenceError::Unavailable("offline".to_string()));
            }
            Ok(self
                .remote_best
                .map(|high_score| HighScoreResponse { high_score }))
        }

        fn submit_high_score(
            &mut self,
            submission: &HighScoreSubmission,
        ) -> Result<(), PersistenceError> {
            if self.fail {
                return Err(PersistenceError::Unavailable("offline".to_string()));
            }
            self.high_scores.borrow_mut().push(submission.clone());
            Ok(())
        }
    }

    /// Put an obstacle just left of the player so the next tick scores it
    fn place_passing_obstacle(controller: &mut SessionController) {
        let config = controller.config().clone();
        let session = controller.session_mut();
        let y = session.body.pos.y;
        session.obstacles.obstacles.push(Obstacle {
            id: 500,
            x: config.player_x - config.obstacle_width + 1.0,
            width: config.obstacle_width,
            gap_top: y - 60.0,
            gap_bottom: y - 60.0 + config.obstacle_gap,
            scale: 1.0,
            scored: false,
        });
    }

    fn run_to_floor(controller: &mut SessionController) {
        controller.jump();
        for _ in 0..1_000 {
            controller.tick(1.0);
            if controller.is_over() {
                return;
            }
        }
        panic!("run never ended");
    }

    #[test]
    fn test_state_machine() {
        let mut controller = SessionController::new(GameConfig::classic(), 1).expect("valid");
        assert_eq!(controller.phase(), SessionPhase::Idle);
        controller.tick(1.0);
        assert_eq!(controller.phase(), SessionPhase::Idle);

        run_to_floor(&mut controller);
        assert_eq!(controller.phase(), SessionPhase::Over);
        assert!(!controller.jump());

        controller.reset();
        assert_eq!(controller.phase(), SessionPhase::Idle);
        assert_eq!(controller.session().score.distance, 0);
        assert!(controller.session().obstacles.is_empty());
    }

    #[test]
    fn test_start_without_impulse() {
        let mut controller = SessionController::new(GameConfig::classic(), 1).expect("valid");
        assert!(controller.start());
        assert!(!controller.start());
        assert_eq!(controller.session().body.velocity, 0.0);
        assert_eq!(controller.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = GameConfig {
            obstacle_gap: 1_000.0,
            ..GameConfig::default()
        };
        assert!(SessionController::new(config, 1).is_err());
    }

    #[test]
    fn test_queued_jump_applies_on_next_tick() {
        let mut controller = SessionController::new(GameConfig::classic(), 1).expect("valid");
        let trigger = controller.jump_trigger();
        let handle = std::thread::spawn(move || trigger.jump());
        handle.join().expect("input thread");

        assert_eq!(controller.phase(), SessionPhase::Idle);
        controller.tick(1.0);
        assert_eq!(controller.phase(), SessionPhase::Running);
        // Jump force plus one step of gravity
        let expected = controller.config().jump_force + controller.config().gravity;
        assert_eq!(controller.session().body.velocity, expected);
    }

    #[test]
    fn test_game_over_reports_once() {
        let reporter = FakeReporter {
            remote_best: Some(100.0),
            ..Default::default()
        };
        let submissions = reporter.submissions.clone();
        let high_scores = reporter.high_scores.clone();
        let mut controller = SessionController::new(GameConfig::classic(), 1)
            .expect("valid")
            .with_reporter(Box::new(reporter));
        assert_eq!(controller.high_score(), Some(100.0));

        run_to_floor(&mut controller);
        for _ in 0..10 {
            controller.tick(1.0);
        }

        assert_eq!(submissions.borrow().len(), 1);
        assert_eq!(submissions.borrow()[0].player_name, DEFAULT_PLAYER_NAME);
        // Scoreless run does not beat the remote best
        assert!(high_scores.borrow().is_empty());
        assert_eq!(controller.high_score(), Some(100.0));
        assert_eq!(controller.leaderboard().len(), 1);
        assert_eq!(
            controller.last_summary().map(|s| s.cause),
            Some(Collision::Floor)
        );
    }

    #[test]
    fn test_reporter_failure_is_swallowed() {
        let reporter = FakeReporter {
            fail: true,
            ..Default::default()
        };
        let mut controller = SessionController::new(GameConfig::classic(), 1)
            .expect("valid")
            .with_reporter(Box::new(reporter));
        assert_eq!(controller.high_score(), None);

        run_to_floor(&mut controller);
        assert!(controller.is_over());
        assert!(controller.leaderboard().is_empty());

        controller.reset();
        assert!(controller.jump());
    }

    #[test]
    fn test_achievements_saved_on_game_over() {
        let mut controller = SessionController::new(GameConfig::classic(), 1)
            .expect("valid")
            .with_store(Box::new(MemoryStore::new()));
        run_to_floor(&mut controller);
        assert_eq!(
            controller.achievements().get("dedicated").map(|a| a.progress),
            Some(1)
        );
    }

    #[test]
    fn test_local_reporter_end_to_end() {
        let mut settings = Settings::default();
        settings.set_player_name("Rin");
        let mut controller = SessionController::new(GameConfig::classic(), 4)
            .expect("valid")
            .with_settings(&settings)
            .with_reporter(Box::new(LocalScoreReporter::new(Box::new(MemoryStore::new()))));

        controller.start();
        place_passing_obstacle(&mut controller);
        run_to_floor(&mut controller);

        assert_eq!(controller.leaderboard().len(), 1);
        assert_eq!(controller.leaderboard()[0].player_name, "Rin");
        assert_eq!(controller.leaderboard()[0].score, 1.0);
        assert_eq!(controller.high_score(), Some(1.0));
    }

    #[test]
    fn test_new_best_submits_high_score() {
        let reporter = FakeReporter {
            remote_best: Some(0.5),
            ..Default::default()
        };
        let high_scores = reporter.high_scores.clone();
        let mut controller = SessionController::new(GameConfig::classic(), 4)
            .expect("valid")
            .with_reporter(Box::new(reporter));

        controller.start();
        place_passing_obstacle(&mut controller);
        run_to_floor(&mut controller);

        assert_eq!(high_scores.borrow().len(), 1);
        assert_eq!(high_scores.borrow()[0].score, 1.0);
        assert_eq!(high_scores.borrow()[0].player_name, DEFAULT_PLAYER_NAME);
        assert_eq!(controller.high_score(), Some(1.0));

        // Same score again is not a new best
        controller.reset();
        controller.start();
        place_passing_obstacle(&mut controller);
        run_to_floor(&mut controller);
        assert_eq!(high_scores.borrow().len(), 1);
    }

    #[test]
    fn test_restart_cooldown() {
        let mut controller = SessionController::new(GameConfig::classic(), 1).expect("valid");
        controller.jump();
        let mut now = 0.0;
        while !controller.is_over() {
            now += 1000.0 / 60.0;
            controller.frame(now);
        }
        assert!(!controller.restart(now + 500.0));
        assert!(controller.is_over());
        assert!(controller.restart(now + 2_000.0));
        assert_eq!(controller.phase(), SessionPhase::Idle);
        // Clock forgot the previous frame
        assert_eq!(controller.frame(now + 60_000.0), 1.0);
    }

    #[test]
    fn test_restart_refused_while_running() {
        let mut controller = SessionController::new(GameConfig::classic(), 1).expect("valid");
        controller.jump();
        assert!(!controller.restart(1e9));
        assert_eq!(controller.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_drain_events() {
        let mut controller = SessionController::new(GameConfig::classic(), 1).expect("valid");
        controller.jump();
        let events = controller.drain_events();
        assert_eq!(events, vec![GameEvent::Started, GameEvent::Jumped]);
        assert!(controller.drain_events().is_empty());
    }

    #[test]
    fn test_settings_apply_cosmetic_caps() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let controller = SessionController::new(GameConfig::default(), 1)
            .expect("valid")
            .with_settings(&settings);
        assert_eq!(controller.session().environment.max_particles, 0);
        assert_eq!(controller.session().body.trail_length, 0);
    }
}
