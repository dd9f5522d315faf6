// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thresholds and timeouts for gesture recognition.

/// Thresholds and timeouts used by [`crate::GestureRecognizer`].
///
/// Distances are in container pixels, times in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Distance a single pointer must travel before it is classified as a
    /// pan or a swipe (default: 5).
    pub move_threshold: f64,
    /// Horizontal distance a swipe must cover before swipe-start fires
    /// (default: 10).
    pub swipe_threshold: f64,
    /// Maximum time between two taps of a double-tap (default: 300).
    pub double_tap_interval_ms: u64,
    /// Maximum distance between two taps of a double-tap (default: 30).
    pub double_tap_distance: f64,
    /// Double-tap only counts on a page surface (default: `true`).
    pub double_tap_requires_page: bool,
    /// Scale factor for a wheel step away from the user (default: 0.9).
    pub wheel_zoom_out: f64,
    /// Scale factor for a wheel step towards the user (default: 1.1).
    pub wheel_zoom_in: f64,
    /// Lower bound on the time step used for velocity samples (default: 1).
    pub velocity_min_dt_ms: f64,
    /// Weight of the newest sample in the exponential velocity estimate
    /// (default: 0.8).
    pub velocity_smoothing: f64,
    /// A pointer held still this long before release ends with zero velocity
    /// (default: 100).
    pub velocity_stale_ms: u64,
}

impl GestureConfig {
    /// Thresholds for the single-sheet SVG viewer.
    ///
    /// That viewer hosts unit pickers and other tappable sub-elements, so it
    /// uses a larger move threshold and does not restrict double-tap to a page
    /// surface.
    #[must_use]
    pub fn svg_viewer() -> Self {
        Self {
            move_threshold: 10.0,
            double_tap_requires_page: false,
            ..Self::default()
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            move_threshold: 5.0,
            swipe_threshold: 10.0,
            double_tap_interval_ms: 300,
            double_tap_distance: 30.0,
            double_tap_requires_page: true,
            wheel_zoom_out: 0.9,
            wheel_zoom_in: 1.1,
            velocity_min_dt_ms: 1.0,
            velocity_smoothing: 0.8,
            velocity_stale_ms: 100,
        }
    }
}
