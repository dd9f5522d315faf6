// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inputs to and outputs from the gesture recognizer.

use bitflags::bitflags;
use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::pointers::PointerId;

bitflags! {
    /// What the pointer went down on, as resolved by the host.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TargetFlags: u8 {
        /// The target matches one of the host's excluded selectors
        /// (pickers, buttons, pips); double-tap zoom is skipped there.
        const INTERACTIVE = 1 << 0;
        /// The target lies on a page surface rather than the gutter.
        const ON_PAGE = 1 << 1;
    }
}

bitflags! {
    /// External locks that suspend gesture handling.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct GestureLocks: u8 {
        /// A sidebar/menu drag is in progress.
        const MENU_DRAG = 1 << 0;
        /// An SVG picker popup is open.
        const PICKER_OPEN = 1 << 1;
    }
}

/// A pointer-down/move/up sample in container coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    /// DOM pointer id.
    pub id: PointerId,
    /// Position relative to the container's top-left corner.
    pub position: Point,
    /// Event timestamp in milliseconds.
    pub time_ms: u64,
    /// Target classification; only consulted on pointer-down.
    pub target: TargetFlags,
}

impl PointerInput {
    /// Creates a sample over an unclassified target.
    #[must_use]
    pub fn new(id: PointerId, position: Point, time_ms: u64) -> Self {
        Self {
            id,
            position,
            time_ms,
            target: TargetFlags::empty(),
        }
    }

    /// Sets the target classification.
    #[must_use]
    pub fn with_target(mut self, target: TargetFlags) -> Self {
        self.target = target;
        self
    }
}

/// A wheel event in container coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelInput {
    /// Pointer position relative to the container.
    pub position: Point,
    /// Vertical wheel delta; positive scrolls away from the user.
    pub delta_y: f64,
}

/// Viewer state the recognizer needs to classify a gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureContext {
    /// The viewer is at its fit-to-container scale.
    pub at_min_zoom: bool,
    /// Swiping between pages is currently allowed.
    pub swipe_enabled: bool,
    /// Active external locks.
    pub locks: GestureLocks,
}

impl GestureContext {
    /// Returns `true` if any external lock is held.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        !self.locks.is_empty()
    }
}

/// Normalized output of the gesture recognizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// Acquire pointer capture for the lifetime of the gesture.
    CapturePointer(PointerId),
    /// Release pointer capture.
    ReleasePointer(PointerId),
    /// Translate by an incremental delta.
    PanBy(Vec2),
    /// Two pointers are down; a pinch baseline was taken.
    PinchStart {
        /// Midpoint between the pointers.
        midpoint: Point,
    },
    /// The pinch moved.
    PinchUpdate {
        /// Current distance over baseline distance.
        ratio: f64,
        /// Current midpoint.
        midpoint: Point,
        /// Midpoint movement since the previous update.
        midpoint_delta: Vec2,
    },
    /// A horizontal swipe passed the swipe threshold.
    SwipeStart,
    /// The swipe moved.
    SwipeMove {
        /// Horizontal displacement since the swipe began.
        total_dx: f64,
        /// Smoothed horizontal velocity in px/s.
        velocity: f64,
    },
    /// The swipe finished; the consumer decides commit vs. cancel.
    SwipeEnd {
        /// Final horizontal displacement.
        total_dx: f64,
        /// Final velocity in px/s.
        velocity: f64,
    },
    /// The swipe was aborted and must be rolled back.
    SwipeCancel,
    /// A pointer was released without moving past the move threshold.
    Tap {
        /// Tap position.
        position: Point,
    },
    /// Second tap of a double-tap on a non-interactive target.
    DoubleTap {
        /// Position of the second tap.
        position: Point,
    },
    /// One wheel step.
    WheelZoom {
        /// Zoom fixed point.
        anchor: Point,
        /// Scale multiplier.
        factor: f64,
    },
}

/// Events emitted by one recognizer call.
pub type GestureEvents = SmallVec<[GestureEvent; 4]>;
