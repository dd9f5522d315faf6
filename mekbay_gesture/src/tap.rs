// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Double-tap recognition with spatial and temporal tolerance.
//!
//! ```
//! use kurbo::Point;
//! use mekbay_gesture::{TapResult, TapState};
//!
//! let mut taps = TapState::new(300, 30.0);
//! assert_eq!(taps.on_tap(Point::new(100.0, 100.0), 1_000), TapResult::Single);
//! assert_eq!(taps.on_tap(Point::new(104.0, 103.0), 1_100), TapResult::Double);
//! // The pair is consumed: a third tap starts over.
//! assert_eq!(taps.on_tap(Point::new(104.0, 103.0), 1_200), TapResult::Single);
//! ```

use kurbo::Point;

/// Outcome of registering a tap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapResult {
    /// First tap of a potential pair.
    Single,
    /// Second tap close enough in time and space to the previous one.
    Double,
}

/// Remembers the last unpaired tap.
#[derive(Clone, Copy, Debug)]
pub struct TapState {
    interval_ms: u64,
    distance: f64,
    last: Option<(Point, u64)>,
}

impl TapState {
    /// Creates a detector pairing taps at most `interval_ms` and `distance`
    /// pixels apart.
    #[must_use]
    pub fn new(interval_ms: u64, distance: f64) -> Self {
        Self {
            interval_ms,
            distance,
            last: None,
        }
    }

    /// Registers a tap at `pos` and time `now_ms`.
    pub fn on_tap(&mut self, pos: Point, now_ms: u64) -> TapResult {
        if let Some((prev_pos, prev_time)) = self.last
            && now_ms >= prev_time
            && now_ms - prev_time <= self.interval_ms
            && prev_pos.distance(pos) <= self.distance
        {
            self.last = None;
            return TapResult::Double;
        }
        self.last = Some((pos, now_ms));
        TapResult::Single
    }

    /// Forgets any pending tap.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::{TapResult, TapState};

    #[test]
    fn slow_second_tap_is_single() {
        let mut taps = TapState::new(300, 30.0);
        taps.on_tap(Point::new(0.0, 0.0), 0);
        assert_eq!(taps.on_tap(Point::new(0.0, 0.0), 301), TapResult::Single);
    }

    #[test]
    fn distant_second_tap_is_single() {
        let mut taps = TapState::new(300, 30.0);
        taps.on_tap(Point::new(0.0, 0.0), 0);
        assert_eq!(taps.on_tap(Point::new(40.0, 0.0), 100), TapResult::Single);
        // ...but it becomes the new first tap.
        assert_eq!(taps.on_tap(Point::new(45.0, 0.0), 200), TapResult::Double);
    }

    #[test]
    fn reset_forgets_pending_tap() {
        let mut taps = TapState::new(300, 30.0);
        taps.on_tap(Point::ZERO, 0);
        taps.reset();
        assert_eq!(taps.on_tap(Point::ZERO, 10), TapResult::Single);
    }
}
