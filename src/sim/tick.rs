//! Simulation tick
//!
//! Stages always run in the same order: physics, obstacles, power-ups,
//! collision, environment, scoring. A collision ends the tick early.

use super::collision::{self, Collision};
use super::environment::EnvironmentChange;
use super::rng::RandomSource;
use super::state::{GameEvent, GameSession, SessionPhase};
use crate::dt_to_ms;
use crate::tuning::GameConfig;

/// Move an idle session into `Running`; returns whether it started
pub fn start(session: &mut GameSession) -> bool {
    if session.phase != SessionPhase::Idle {
        return false;
    }
    session.phase = SessionPhase::Running;
    session.events.push(GameEvent::Started);
    log::info!("Run started (seed {})", session.seed);
    true
}

/// Apply a jump impulse, starting the run if idle. Ignored once over.
pub fn jump(session: &mut GameSession, config: &GameConfig) -> bool {
    match session.phase {
        SessionPhase::Over => return false,
        SessionPhase::Idle => {
            start(session);
        }
        SessionPhase::Running => {}
    }
    session.body.jump(config.jump_force);
    session.events.push(GameEvent::Jumped);
    true
}

/// Advance a running session by one normalized step.
///
/// Returns the collision that ended the run, if this tick ended it.
/// Idle and finished sessions are left untouched.
pub fn tick(
    session: &mut GameSession,
    config: &GameConfig,
    rng: &mut dyn RandomSource,
    dt: f32,
) -> Option<Collision> {
    if session.phase != SessionPhase::Running {
        return None;
    }

    let elapsed_ms = dt_to_ms(dt);
    session.time_ticks += 1;
    session.elapsed_ms += elapsed_ms as f64;

    // Physics
    session.body.apply_gravity(config.gravity, dt);
    session.body.record_trail();

    let world_dt = if session.body.effects.slow_motion() {
        dt * config.slow_motion_factor
    } else {
        dt
    };

    // Obstacles
    session.obstacles.scroll(config.obstacle_speed * world_dt);
    let passed = session.obstacles.mark_passed(config.player_x);
    if config.obstacles_enabled && session.obstacles.should_spawn(config) {
        let id = session.next_entity_id();
        session.obstacles.spawn(id, config, rng);
    }

    // Power-ups
    session.powerups.remove_collected();
    session.body.effects.decay(elapsed_ms);
    session.powerups.scroll(config.powerup_speed * world_dt);
    session.powerups.try_spawn(
        || {
            let id = session.next_id;
            session.next_id += 1;
            id
        },
        config,
        rng,
    );
    let hitbox = session.body.hitbox();
    for kind in session.powerups.collect(&hitbox, config.collision_buffer) {
        if let Some(bonus) = session.body.effects.apply(kind, config) {
            session.score.add_bonus(bonus);
        }
        log::debug!("Collected {:?}", kind);
        session.events.push(GameEvent::PowerUpCollected { kind });
    }

    // Collision
    if !session.body.invincible() {
        let hit = collision::detect(
            &hitbox,
            &session.obstacles.obstacles,
            config.collision_buffer,
            config.field_height,
        );
        if let Some(hit) = hit {
            session.phase = SessionPhase::Over;
            let summary = session.summary(hit);
            log::info!(
                "Run over ({:?}): score {}, combo {}, distance {}",
                hit,
                summary.score,
                summary.combo,
                summary.distance
            );
            session.events.push(GameEvent::GameOver(summary));
            return Some(hit);
        }
    }

    // Environment
    let elapsed_total = session.elapsed_ms;
    for change in session
        .environment
        .update(elapsed_total, dt, config, rng)
    {
        session.events.push(match change {
            EnvironmentChange::Weather(weather) => GameEvent::WeatherChanged(weather),
            EnvironmentChange::TimeOfDay(phase) => GameEvent::TimeOfDayChanged(phase),
        });
    }

    // Scoring
    let mut multiplier = session.environment.multiplier();
    if session.body.effects.signal_boost() {
        multiplier *= 2.0;
    }
    for _ in 0..passed {
        let points = session.score.obstacle_passed(multiplier);
        session.events.push(GameEvent::ObstaclePassed { points });
    }
    session.score.advance_distance(config.distance_per_tick);

    None
}
