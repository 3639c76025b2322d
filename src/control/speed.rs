//! Finite-difference speed estimate from encoder counts.

/// Tracks counts per second for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpeedEstimator {
    last_position: (i32, i32),
    last_time: f64,
    speed: (f32, f32),
}

impl SpeedEstimator {
    /// Start estimating from a known position and time.
    pub fn new(position: (i32, i32), now: f64) -> Self {
        Self {
            last_position: position,
            last_time: now,
            speed: (0.0, 0.0),
        }
    }

    /// Re-baseline without producing a speed sample.
    pub fn rebase(&mut self, position: (i32, i32), now: f64) {
        *self = Self::new(position, now);
    }

    /// Feed a new sample. Non-positive elapsed time keeps the previous estimate.
    pub fn update(&mut self, position: (i32, i32), now: f64) -> (f32, f32) {
        let dt = now - self.last_time;
        if dt > 0.0 {
            let dx = position.0 as i64 - self.last_position.0 as i64;
            let dy = position.1 as i64 - self.last_position.1 as i64;
            self.speed = ((dx as f64 / dt) as f32, (dy as f64 / dt) as f32);
        }

        self.last_position = position;
        self.last_time = now;
        self.speed
    }

    /// Latest estimate in counts per second.
    #[inline]
    pub fn speed(&self) -> (f32, f32) {
        self.speed
    }
}
