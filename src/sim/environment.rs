//! Weather and time-of-day cycle
//!
//! Weather changes at random; time of day follows elapsed run time through
//! four equal phases. Neither can end a run, they only scale scoring and
//! drive cosmetic particles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::{RandomSource, SeededRandom};
use crate::tuning::GameConfig;

/// Salt for the cosmetic particle stream so it never aliases the gameplay stream
const PARTICLE_SEED_SALT: u64 = 0x5EED_F00D;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Snow,
    Storm,
}

impl Weather {
    pub const ALL: [Weather; 4] = [Weather::Clear, Weather::Rain, Weather::Snow, Weather::Storm];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Clear => "clear",
            Weather::Rain => "rain",
            Weather::Snow => "snow",
            Weather::Storm => "storm",
        }
    }

    /// Particles emitted per nominal tick
    fn particle_rate(&self) -> usize {
        match self {
            Weather::Clear => 0,
            Weather::Snow => 1,
            Weather::Rain => 2,
            Weather::Storm => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    #[default]
    Day,
    Dusk,
    Night,
    Dawn,
}

impl TimeOfDay {
    /// Cycle order starting from the beginning of a run
    pub const CYCLE: [TimeOfDay; 4] = [
        TimeOfDay::Day,
        TimeOfDay::Dusk,
        TimeOfDay::Night,
        TimeOfDay::Dawn,
    ];

    /// Phase for a given elapsed run time
    pub fn at(elapsed_ms: f64, phase_ms: f32) -> Self {
        if phase_ms <= 0.0 {
            return TimeOfDay::Day;
        }
        let phase = (elapsed_ms / phase_ms as f64).floor() as u64 % 4;
        Self::CYCLE[phase as usize]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Day => "day",
            TimeOfDay::Dusk => "dusk",
            TimeOfDay::Night => "night",
            TimeOfDay::Dawn => "dawn",
        }
    }
}

/// A cosmetic rain drop / snow flake
#[derive(Debug, Clone)]
pub struct WeatherParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub weather: Weather,
}

/// What changed during an environment update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentChange {
    Weather(Weather),
    TimeOfDay(TimeOfDay),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    pub weather: Weather,
    pub time_of_day: TimeOfDay,
    /// Particle cap; zero disables emission
    #[serde(skip)]
    pub max_particles: usize,
    #[serde(skip)]
    pub particles: Vec<WeatherParticle>,
    #[serde(skip, default = "default_particle_rng")]
    particle_rng: SeededRandom,
}

fn default_particle_rng() -> SeededRandom {
    SeededRandom::new(PARTICLE_SEED_SALT)
}

impl Environment {
    pub fn new(seed: u64, max_particles: usize) -> Self {
        Self {
            weather: Weather::Clear,
            time_of_day: TimeOfDay::Day,
            max_particles,
            particles: Vec::new(),
            particle_rng: SeededRandom::new(seed ^ PARTICLE_SEED_SALT),
        }
    }

    /// Back to a clear day with no particles
    pub fn reset(&mut self) {
        self.weather = Weather::Clear;
        self.time_of_day = TimeOfDay::Day;
        self.particles.clear();
    }

    /// Scoring multiplier: ×2 in any weather, ×1.5 at night
    pub fn multiplier(&self) -> f64 {
        let mut multiplier = 1.0;
        if self.weather != Weather::Clear {
            multiplier *= 2.0;
        }
        if self.time_of_day == TimeOfDay::Night {
            multiplier *= 1.5;
        }
        multiplier
    }

    /// Advance weather and time of day. `elapsed_ms` is total run time.
    pub fn update(
        &mut self,
        elapsed_ms: f64,
        dt: f32,
        config: &GameConfig,
        rng: &mut dyn RandomSource,
    ) -> Vec<EnvironmentChange> {
        let mut changes = Vec::new();
        if !config.weather_enabled {
            return changes;
        }

        if rng.chance(config.weather_change_chance) {
            let others: Vec<Weather> = Weather::ALL
                .into_iter()
                .filter(|w| *w != self.weather)
                .collect();
            let next = others[rng.pick_index(others.len())];
            log::debug!("Weather {:?} -> {:?}", self.weather, next);
            self.weather = next;
            changes.push(EnvironmentChange::Weather(next));
        }

        let phase = TimeOfDay::at(elapsed_ms, config.phase_ms());
        if phase != self.time_of_day {
            log::debug!("Time of day {:?} -> {:?}", self.time_of_day, phase);
            self.time_of_day = phase;
            changes.push(EnvironmentChange::TimeOfDay(phase));
        }

        self.update_particles(dt, config);
        changes
    }

    fn update_particles(&mut self, dt: f32, config: &GameConfig) {
        for particle in &mut self.particles {
            particle.pos += particle.vel * dt;
        }
        self.particles.retain(|p| {
            p.pos.y <= config.field_height && p.pos.x >= 0.0 && p.pos.x <= config.field_width
        });

        let rate = self.weather.particle_rate();
        for _ in 0..rate {
            if self.particles.len() >= self.max_particles {
                break;
            }
            let x = self.particle_rng.range(0.0, config.field_width);
            let vel = match self.weather {
                Weather::Snow => Vec2::new(self.particle_rng.range(-1.0, 0.5), 1.5),
                Weather::Storm => Vec2::new(-3.0, self.particle_rng.range(9.0, 12.0)),
                _ => Vec2::new(-1.0, self.particle_rng.range(6.0, 8.0)),
            };
            self.particles.push(WeatherParticle {
                pos: Vec2::new(x, 0.0),
                vel,
                weather: self.weather,
            });
        }
    }
}
