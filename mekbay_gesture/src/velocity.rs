// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Exponentially smoothed 1D velocity estimate, in pixels per second.
///
/// Each sample computes the instantaneous velocity `Δx / Δt` against the
/// previous sample (with `Δt` floored to avoid dividing by near-zero) and
/// blends it into the running estimate.
#[derive(Clone, Copy, Debug, Default)]
pub struct VelocityTracker {
    last: Option<(u64, f64)>,
    velocity: f64,
}

impl VelocityTracker {
    /// Starts a new estimate at position `x` and time `now_ms`.
    pub fn reset(&mut self, now_ms: u64, x: f64) {
        self.last = Some((now_ms, x));
        self.velocity = 0.0;
    }

    /// Adds a sample and returns the updated estimate.
    ///
    /// `smoothing` is the weight of the new sample in `[0, 1]`.
    pub fn sample(&mut self, now_ms: u64, x: f64, min_dt_ms: f64, smoothing: f64) -> f64 {
        let Some((last_time, last_x)) = self.last else {
            self.reset(now_ms, x);
            return 0.0;
        };
        let dt = (now_ms.saturating_sub(last_time) as f64).max(min_dt_ms.max(f64::MIN_POSITIVE));
        let instant = (x - last_x) / dt * 1000.0;
        let weight = smoothing.clamp(0.0, 1.0);
        self.velocity = weight * instant + (1.0 - weight) * self.velocity;
        self.last = Some((now_ms, x));
        self.velocity
    }

    /// Current estimate, or zero if the last sample is older than `stale_ms`.
    #[must_use]
    pub fn velocity_at(&self, now_ms: u64, stale_ms: u64) -> f64 {
        match self.last {
            Some((t, _)) if now_ms.saturating_sub(t) > stale_ms => 0.0,
            _ => self.velocity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::VelocityTracker;

    #[test]
    fn constant_motion_converges() {
        let mut v = VelocityTracker::default();
        v.reset(0, 0.0);
        let mut last = 0.0;
        for i in 1..=20_u32 {
            last = v.sample(u64::from(i) * 10, -f64::from(i) * 5.0, 1.0, 0.8);
        }
        // 5px every 10ms to the left.
        assert!((last + 500.0).abs() < 1e-6);
    }

    #[test]
    fn zero_time_step_uses_floor() {
        let mut v = VelocityTracker::default();
        v.reset(100, 0.0);
        let out = v.sample(100, 2.0, 1.0, 1.0);
        assert!((out - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn stale_estimate_reads_as_zero() {
        let mut v = VelocityTracker::default();
        v.reset(0, 0.0);
        v.sample(10, 10.0, 1.0, 1.0);
        assert!(v.velocity_at(50, 100) > 0.0);
        assert_eq!(v.velocity_at(500, 100), 0.0);
    }
}
