// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe navigation: commit-or-cancel decisions and the transient page set.
//!
//! Page offsets in this module are relative to the first page of the
//! canonical window. Positive offsets lie to the right. A positive page
//! movement advances the window, which is what dragging the content to the
//! left asks for.
//!
//! ```
//! use mekbay_page_viewer::{SwipeConfig, SwipeDecision, SwipeGeometry, decide};
//!
//! let geometry = SwipeGeometry { page_width: 600.0, step: 600.0 };
//! let config = SwipeConfig::default();
//!
//! // 100px is past 15% of the page width: one page forward.
//! assert!(matches!(
//!     decide(-100.0, 0.0, geometry, 5, &config),
//!     SwipeDecision::Commit { pages: 1, .. }
//! ));
//! // 50px is not, and the release was slow: snap back.
//! assert_eq!(decide(-50.0, 0.0, geometry, 5, &config), SwipeDecision::Cancel);
//! ```

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `round` and `ceil`
use smallvec::SmallVec;

use crate::render::Transition;

/// Thresholds and animation timings of swipe navigation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeConfig {
    /// Release speed in px/s above which a swipe is a flick.
    pub flick_velocity: f64,
    /// Fraction of the scaled page width a slow swipe must travel to commit.
    pub commit_fraction: f64,
    /// Duration of the animation to the committed offset.
    pub commit_duration_ms: u32,
    /// Duration of the snap-back animation.
    pub cancel_duration_ms: u32,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            flick_velocity: 300.0,
            commit_fraction: 0.15,
            commit_duration_ms: 250,
            cancel_duration_ms: 200,
        }
    }
}

/// Scaled page metrics at the time of the swipe, in container pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeGeometry {
    /// Width of one page.
    pub page_width: f64,
    /// Distance between the left edges of neighbouring pages.
    pub step: f64,
}

impl SwipeGeometry {
    fn step_or_width(self) -> f64 {
        if self.step > 0.0 {
            self.step
        } else {
            self.page_width
        }
    }
}

/// Outcome of a finished swipe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SwipeDecision {
    /// Move the window by `pages` and animate the wrapper to `target_offset`.
    Commit {
        /// Signed page movement; positive advances.
        pages: isize,
        /// Final wrapper offset in container pixels.
        target_offset: f64,
    },
    /// Animate back to zero and keep the window.
    Cancel,
}

impl SwipeDecision {
    /// Settle animation for this decision.
    #[must_use]
    pub fn transition(&self, config: &SwipeConfig) -> Transition {
        match self {
            Self::Commit { .. } => Transition::ease_out(config.commit_duration_ms),
            Self::Cancel => Transition::ease_out(config.cancel_duration_ms),
        }
    }

    /// Wrapper offset the settle animation ends at.
    #[must_use]
    pub fn target_offset(&self) -> f64 {
        match self {
            Self::Commit { target_offset, .. } => *target_offset,
            Self::Cancel => 0.0,
        }
    }
}

/// Decides whether a released swipe commits and by how many pages.
///
/// A flick (`|velocity| > flick_velocity`) moves exactly one page in the
/// direction of the flick. Otherwise the swipe commits once `|total_dx|`
/// passes `commit_fraction` of the page width, moving
/// `round(|total_dx| / step)` pages and at least one. The movement never
/// exceeds `total_units - 1` in either direction.
#[must_use]
pub fn decide(
    total_dx: f64,
    velocity: f64,
    geometry: SwipeGeometry,
    total_units: usize,
    config: &SwipeConfig,
) -> SwipeDecision {
    let max_pages = total_units.saturating_sub(1) as isize;
    if max_pages == 0 || !total_dx.is_finite() {
        return SwipeDecision::Cancel;
    }

    let pages = if velocity.abs() > config.flick_velocity {
        if velocity < 0.0 { 1 } else { -1 }
    } else if geometry.page_width > 0.0
        && total_dx.abs() > geometry.page_width * config.commit_fraction
    {
        let step = geometry.step_or_width();
        let n = round_pages(total_dx.abs() / step).max(1);
        if total_dx < 0.0 { n } else { -n }
    } else {
        0
    };

    let pages = pages.clamp(-max_pages, max_pages);
    if pages == 0 {
        SwipeDecision::Cancel
    } else {
        SwipeDecision::Commit {
            pages,
            target_offset: -(pages as f64) * geometry.step_or_width(),
        }
    }
}

/// Wraps a signed unit index into `0..total`.
///
/// Returns `0` when `total` is zero.
#[must_use]
pub fn wrap_index(index: isize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    index.rem_euclid(total as isize) as usize
}

/// Extra neighbour pages needed to cover `|total_dx|` of overscroll.
///
/// Capped so that the visible window plus the extras never repeats a unit.
#[must_use]
pub fn extra_pages(total_dx: f64, step: f64, visible: usize, total_units: usize) -> usize {
    if step <= 0.0 || !total_dx.is_finite() {
        return 0;
    }
    let needed = round_pages((total_dx.abs() / step).ceil()).max(0) as usize;
    needed.min(total_units.saturating_sub(visible))
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "page counts are small; the float is rounded before the cast"
)]
fn round_pages(pages: f64) -> isize {
    pages.round() as isize
}

/// State of one swipe, alive between swipe start and the end of its settle
/// animation.
#[derive(Clone, Debug, PartialEq)]
pub struct SwipeSession {
    base_start_index: usize,
    visible: usize,
    offsets: Vec<isize>,
    total_dx: f64,
}

impl SwipeSession {
    /// Starts a swipe from the canonical window at `base_start_index`.
    #[must_use]
    pub fn new(base_start_index: usize, visible: usize) -> Self {
        let visible = visible.max(1);
        Self {
            base_start_index,
            visible,
            offsets: (0..visible as isize).collect(),
            total_dx: 0.0,
        }
    }

    /// Canonical start index captured at swipe start.
    #[must_use]
    pub fn base_start_index(&self) -> usize {
        self.base_start_index
    }

    /// Relative offsets of the pages the swipe needs mounted, ascending.
    #[must_use]
    pub fn offsets(&self) -> &[isize] {
        &self.offsets
    }

    /// Unit index shown at relative `offset`.
    #[must_use]
    pub fn unit_index(&self, offset: isize, total_units: usize) -> usize {
        wrap_index(self.base_start_index as isize + offset, total_units)
    }

    /// Records a move and recomputes the required offsets.
    ///
    /// Returns `true` if the set of offsets changed.
    pub fn update(&mut self, total_dx: f64, step: f64, total_units: usize) -> bool {
        self.total_dx = total_dx;
        let extra = extra_pages(total_dx, step, self.visible, total_units) as isize;
        let visible = self.visible as isize;
        let (first, end) = if total_dx < 0.0 {
            (0, visible + extra)
        } else {
            (-extra, visible)
        };
        if self.offsets.first() == Some(&first) && self.offsets.last() == Some(&(end - 1)) {
            return false;
        }
        self.offsets = (first..end).collect();
        true
    }

    /// Widens the offsets to cover `start..end`.
    ///
    /// Skipped when the widened range would show some unit twice. Returns
    /// `true` if the offsets changed.
    pub fn include_range(&mut self, start: isize, end: isize, total_units: isize) -> bool {
        let (Some(&first), Some(&last)) = (self.offsets.first(), self.offsets.last()) else {
            return false;
        };
        let lo = first.min(start);
        let hi = (last + 1).max(end);
        if (lo, hi) == (first, last + 1) || hi - lo > total_units {
            return false;
        }
        self.offsets = (lo..hi).collect();
        true
    }

    /// Offsets of the neighbours just outside the canonical window.
    #[must_use]
    pub fn adjacent_offsets(&self) -> [isize; 2] {
        [-1, self.visible as isize]
    }

    /// Offsets two pages beyond the leading edge of the swipe.
    #[must_use]
    pub fn lookahead_offsets(&self) -> SmallVec<[isize; 2]> {
        let mut out = SmallVec::new();
        if self.total_dx < 0.0 {
            if let Some(&last) = self.offsets.last() {
                out.extend([last + 1, last + 2]);
            }
        } else if self.total_dx > 0.0
            && let Some(&first) = self.offsets.first()
        {
            out.extend([first - 1, first - 2]);
        }
        out
    }
}
