// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer gesture state machine.
//!
//! [`GestureRecognizer`] turns raw pointer and wheel samples from one
//! container into [`GestureEvent`]s. It tracks a single [`GesturePhase`]:
//!
//! ```text
//! Idle -> WaitingForFirstMove -> { Panning | Swiping | Pinching } -> Idle
//! ```
//!
//! # Invariants
//!
//! 1. `SwipeStart` is emitted at most once per swipe, and every `SwipeStart`
//!    is followed by exactly one `SwipeEnd` or `SwipeCancel`.
//! 2. `Tap` and `DoubleTap` are never emitted for a gesture whose pointer
//!    passed the move threshold or that ever had two pointers down.
//! 3. Every `CapturePointer(id)` is paired with a `ReleasePointer(id)`.
//! 4. After [`GestureRecognizer::abort`] the phase is `Idle` and no pointer
//!    is tracked.

use kurbo::Point;
use tracing::trace;

use crate::config::GestureConfig;
use crate::pointers::PointerSet;
use crate::tap::{TapResult, TapState};
use crate::types::{
    GestureContext, GestureEvent, GestureEvents, PointerInput, TargetFlags, WheelInput,
};
use crate::velocity::VelocityTracker;

/// Classification of the gesture in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// No pointer is down.
    #[default]
    Idle,
    /// One pointer is down but has not moved past the move threshold.
    WaitingForFirstMove,
    /// One pointer drags the content.
    Panning,
    /// One pointer drags horizontally between pages.
    Swiping,
    /// Two pointers zoom and pan.
    Pinching,
}

#[derive(Clone, Copy, Debug, Default)]
struct SwipeTrack {
    started: bool,
    origin_x: f64,
    total_dx: f64,
    velocity: VelocityTracker,
}

#[derive(Clone, Copy, Debug)]
struct PinchTrack {
    baseline_distance: f64,
    last_midpoint: Point,
}

/// Stateful recognizer for one container.
///
/// All state lives in this struct and is only mutated through `&mut self`
/// calls, one per incoming DOM event.
#[derive(Clone, Debug)]
pub struct GestureRecognizer {
    config: GestureConfig,
    phase: GesturePhase,
    pointers: PointerSet,
    moved: bool,
    had_two_pointers: bool,
    down_target: TargetFlags,
    down_time_ms: u64,
    swipe: SwipeTrack,
    pinch: Option<PinchTrack>,
    taps: TapState,
}

impl GestureRecognizer {
    /// Creates an idle recognizer.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            phase: GesturePhase::Idle,
            pointers: PointerSet::default(),
            moved: false,
            had_two_pointers: false,
            down_target: TargetFlags::empty(),
            down_time_ms: 0,
            swipe: SwipeTrack::default(),
            pinch: None,
            taps: TapState::new(config.double_tap_interval_ms, config.double_tap_distance),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Pointers taking part in the current gesture.
    #[must_use]
    pub fn pointers(&self) -> &PointerSet {
        &self.pointers
    }

    /// Returns `true` while a swipe has fired `SwipeStart` and not yet ended.
    #[must_use]
    pub fn is_swipe_active(&self) -> bool {
        self.phase == GesturePhase::Swiping && self.swipe.started
    }

    /// Returns `true` if the gesture moved past the move threshold, so a
    /// trailing click must not be treated as a tap.
    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Handles a pointer-down.
    ///
    /// Ignored while a lock is held. A second pointer starts a pinch right
    /// away, ending any swipe in progress with a zero displacement first.
    pub fn pointer_down(&mut self, input: PointerInput, ctx: &GestureContext) -> GestureEvents {
        let mut out = GestureEvents::new();
        if ctx.is_locked() {
            if self.phase != GesturePhase::Idle {
                return self.abort();
            }
            return out;
        }
        if self.pointers.contains(input.id) {
            self.pointers.update(input.id, input.position);
            return out;
        }

        match self.pointers.len() {
            0 => {
                self.pointers.press(input.id, input.position);
                self.moved = false;
                self.had_two_pointers = false;
                self.down_target = input.target;
                self.down_time_ms = input.time_ms;
                self.swipe = SwipeTrack::default();
                self.pinch = None;
                out.push(GestureEvent::CapturePointer(input.id));
                self.set_phase(GesturePhase::WaitingForFirstMove);
            }
            1 => {
                self.pointers.press(input.id, input.position);
                self.had_two_pointers = true;
                out.push(GestureEvent::CapturePointer(input.id));
                if self.is_swipe_active() {
                    out.push(GestureEvent::SwipeEnd {
                        total_dx: 0.0,
                        velocity: 0.0,
                    });
                }
                self.swipe = SwipeTrack::default();
                if let Some((midpoint, distance)) = self.pointers.pair_geometry() {
                    self.pinch = Some(PinchTrack {
                        baseline_distance: distance,
                        last_midpoint: midpoint,
                    });
                    out.push(GestureEvent::PinchStart { midpoint });
                }
                self.set_phase(GesturePhase::Pinching);
            }
            _ => {}
        }
        out
    }

    /// Handles a pointer-move.
    pub fn pointer_move(&mut self, input: PointerInput, ctx: &GestureContext) -> GestureEvents {
        let mut out = GestureEvents::new();
        if ctx.is_locked() {
            if self.phase != GesturePhase::Idle {
                return self.abort();
            }
            return out;
        }
        let Some(delta) = self.pointers.update(input.id, input.position) else {
            return out;
        };

        match self.phase {
            GesturePhase::Idle => {}
            GesturePhase::WaitingForFirstMove => {
                let Some(total) = self.pointers.total_offset(input.id) else {
                    return out;
                };
                if total.hypot() < self.config.move_threshold {
                    return out;
                }
                self.moved = true;
                let swiping =
                    ctx.swipe_enabled && ctx.at_min_zoom && total.x.abs() > total.y.abs();
                if swiping {
                    let start_x = input.position.x - total.x;
                    self.swipe = SwipeTrack {
                        origin_x: start_x,
                        ..SwipeTrack::default()
                    };
                    // Average the pre-classification motion from pointer-down.
                    self.swipe.velocity.reset(self.down_time_ms, 0.0);
                    self.set_phase(GesturePhase::Swiping);
                    self.swipe_move(input, &mut out);
                } else {
                    self.set_phase(GesturePhase::Panning);
                    out.push(GestureEvent::PanBy(total));
                }
            }
            GesturePhase::Panning => {
                out.push(GestureEvent::PanBy(delta));
            }
            GesturePhase::Swiping => {
                self.swipe_move(input, &mut out);
            }
            GesturePhase::Pinching => {
                if let (Some(pinch), Some((midpoint, distance))) =
                    (self.pinch.as_mut(), self.pointers.pair_geometry())
                {
                    let ratio = if pinch.baseline_distance > 0.0 {
                        distance / pinch.baseline_distance
                    } else {
                        1.0
                    };
                    let midpoint_delta = midpoint - pinch.last_midpoint;
                    pinch.last_midpoint = midpoint;
                    out.push(GestureEvent::PinchUpdate {
                        ratio,
                        midpoint,
                        midpoint_delta,
                    });
                }
            }
        }
        out
    }

    /// Handles a pointer-up.
    ///
    /// Releasing one of two pointers re-baselines the remaining one as a fresh
    /// single-pointer gesture. Releasing the last pointer finalizes the
    /// gesture.
    pub fn pointer_up(&mut self, input: PointerInput, ctx: &GestureContext) -> GestureEvents {
        let mut out = GestureEvents::new();
        if ctx.is_locked() {
            if self.phase != GesturePhase::Idle {
                return self.abort();
            }
            return out;
        }
        self.pointers.update(input.id, input.position);
        if !self.pointers.release(input.id) {
            return out;
        }
        out.push(GestureEvent::ReleasePointer(input.id));

        if !self.pointers.is_empty() {
            // Back to one pointer: the next move classifies it afresh.
            self.pinch = None;
            self.swipe = SwipeTrack::default();
            self.pointers.rebaseline();
            self.down_time_ms = input.time_ms;
            self.set_phase(GesturePhase::WaitingForFirstMove);
            return out;
        }

        match self.phase {
            GesturePhase::Swiping if self.swipe.started => {
                self.swipe.total_dx = input.position.x - self.swipe.origin_x;
                let velocity = self
                    .swipe
                    .velocity
                    .velocity_at(input.time_ms, self.config.velocity_stale_ms);
                out.push(GestureEvent::SwipeEnd {
                    total_dx: self.swipe.total_dx,
                    velocity,
                });
            }
            GesturePhase::WaitingForFirstMove if !self.moved && !self.had_two_pointers => {
                self.tap(input, &mut out);
            }
            _ => {}
        }
        self.reset();
        out
    }

    /// Handles a `pointercancel`.
    ///
    /// Cancelling a tracked pointer aborts the gesture. Pointers the
    /// recognizer never tracked, such as a third finger, are ignored.
    pub fn pointer_cancel(&mut self, input: PointerInput) -> GestureEvents {
        if !self.pointers.contains(input.id) {
            return GestureEvents::new();
        }
        self.abort()
    }

    /// Aborts the gesture in progress without committing anything.
    ///
    /// Releases every captured pointer, cancels an active swipe, and returns
    /// to `Idle`. Hosts call this when an external lock becomes active.
    pub fn abort(&mut self) -> GestureEvents {
        let mut out = GestureEvents::new();
        if self.is_swipe_active() {
            out.push(GestureEvent::SwipeCancel);
        }
        for id in self.pointers.clear() {
            out.push(GestureEvent::ReleasePointer(id));
        }
        if self.phase != GesturePhase::Idle {
            trace!(phase = ?self.phase, "gesture aborted");
        }
        self.reset();
        out
    }

    /// Handles one wheel event.
    ///
    /// Returns `None` while locked or for purely horizontal wheel motion.
    pub fn wheel(&self, input: WheelInput, ctx: &GestureContext) -> Option<GestureEvent> {
        if ctx.is_locked() || input.delta_y == 0.0 || !input.delta_y.is_finite() {
            return None;
        }
        let factor = if input.delta_y > 0.0 {
            self.config.wheel_zoom_out
        } else {
            self.config.wheel_zoom_in
        };
        Some(GestureEvent::WheelZoom {
            anchor: input.position,
            factor,
        })
    }

    fn swipe_move(&mut self, input: PointerInput, out: &mut GestureEvents) {
        let total_dx = input.position.x - self.swipe.origin_x;
        self.swipe.total_dx = total_dx;
        let velocity = self.swipe.velocity.sample(
            input.time_ms,
            total_dx,
            self.config.velocity_min_dt_ms,
            self.config.velocity_smoothing,
        );
        if !self.swipe.started {
            if total_dx.abs() <= self.config.swipe_threshold {
                return;
            }
            self.swipe.started = true;
            trace!(total_dx, "swipe started");
            out.push(GestureEvent::SwipeStart);
        }
        out.push(GestureEvent::SwipeMove { total_dx, velocity });
    }

    fn tap(&mut self, input: PointerInput, out: &mut GestureEvents) {
        let position = input.position;
        out.push(GestureEvent::Tap { position });
        let excluded = self.down_target.contains(TargetFlags::INTERACTIVE)
            || (self.config.double_tap_requires_page
                && !self.down_target.contains(TargetFlags::ON_PAGE));
        if excluded {
            self.taps.reset();
            return;
        }
        if self.taps.on_tap(position, input.time_ms) == TapResult::Double {
            out.push(GestureEvent::DoubleTap { position });
        }
    }

    fn reset(&mut self) {
        self.pointers.clear();
        self.pinch = None;
        self.swipe = SwipeTrack::default();
        self.moved = false;
        self.had_two_pointers = false;
        self.down_target = TargetFlags::empty();
        self.set_phase(GesturePhase::Idle);
    }

    fn set_phase(&mut self, phase: GesturePhase) {
        if self.phase != phase {
            trace!(from = ?self.phase, to = ?phase, "gesture phase");
            self.phase = phase;
        }
    }
}
