//! Frame clock
//!
//! Turns wall-clock frame callbacks into normalized steps where a 60 Hz
//! frame is `dt = 1.0`.

use crate::consts::FRAME_MS;

#[derive(Debug, Clone)]
pub struct Clock {
    previous_ms: Option<f64>,
    max_dt: f32,
}

impl Clock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            previous_ms: None,
            max_dt,
        }
    }

    /// Record a frame timestamp and return the normalized step since the last one.
    ///
    /// The first frame (and the first after `reset`) yields the nominal 1.0.
    /// Backwards timestamps yield 0.0.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.previous_ms {
            Some(previous) => ((now_ms - previous) / FRAME_MS as f64) as f32,
            None => 1.0,
        };
        self.previous_ms = Some(now_ms);
        dt.clamp(0.0, self.max_dt)
    }

    /// Timestamp of the most recent frame, if any
    pub fn last_frame_ms(&self) -> Option<f64> {
        self.previous_ms
    }

    /// Forget the previous frame
    pub fn reset(&mut self) {
        self.previous_ms = None;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(crate::consts::MAX_DT)
    }
}
