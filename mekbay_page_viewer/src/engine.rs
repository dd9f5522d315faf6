// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoom/pan engine: gesture events applied to the page viewport.
//!
//! [`ZoomPanEngine`] owns one [`PageViewport`] and one [`GestureRecognizer`].
//! Pointer samples go in, clamped transforms come out through a
//! [`ViewRenderer`]. Pans and wheel zooms are written immediately; pinch
//! updates only mark the transform dirty and ask for an animation frame, so at
//! most one pinch write happens per frame and the latest values win.
//!
//! Swipes and taps are not handled here. They are returned as
//! [`EngineSignal`]s for the page viewer (or any other host) to act on.

use alloc::vec::Vec;

use kurbo::{Point, Size};
use mekbay_gesture::{
    GestureConfig, GestureContext, GestureEvent, GestureEvents, GestureLocks, GestureRecognizer,
    PointerInput, WheelInput,
};
use mekbay_view2d::{PageLayout, PageViewport, ViewTransform, ViewportConfig};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::render::ViewRenderer;

/// Swipe and tap notifications produced by the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EngineSignal {
    /// A swipe passed its distance threshold.
    SwipeStart,
    /// The swipe moved.
    SwipeMove {
        /// Horizontal displacement since the swipe began.
        total_dx: f64,
        /// Smoothed velocity in px/s.
        velocity: f64,
    },
    /// The swipe was released.
    SwipeEnd {
        /// Final displacement.
        total_dx: f64,
        /// Release velocity in px/s.
        velocity: f64,
    },
    /// The swipe was aborted and must snap back.
    SwipeCancel,
    /// A pointer was released without moving.
    Tap {
        /// Position in container pixels.
        position: Point,
    },
}

/// Signals produced by one engine call.
pub type EngineSignals = SmallVec<[EngineSignal; 2]>;

/// Pan/zoom engine for one viewer container.
#[derive(Clone, Debug)]
pub struct ZoomPanEngine {
    viewport: PageViewport,
    recognizer: GestureRecognizer,
    locks: GestureLocks,
    swipe_enabled: bool,
    attached: bool,
    pinch_baseline_scale: f64,
    frame_pending: bool,
}

impl ZoomPanEngine {
    /// Creates a detached engine. It ignores input until
    /// [`initialize`](Self::initialize) is called.
    #[must_use]
    pub fn new(viewport: ViewportConfig, gestures: GestureConfig) -> Self {
        Self {
            viewport: PageViewport::new(viewport),
            recognizer: GestureRecognizer::new(gestures),
            locks: GestureLocks::empty(),
            swipe_enabled: false,
            attached: false,
            pinch_baseline_scale: 1.0,
            frame_pending: false,
        }
    }

    /// Attaches the engine to its container and writes the current transform.
    pub fn initialize<R: ViewRenderer + ?Sized>(&mut self, renderer: &mut R) {
        self.attached = true;
        self.apply(renderer);
    }

    /// Detaches the engine, aborting any gesture in progress.
    ///
    /// Pointers captured by that gesture are released through `renderer`.
    pub fn detach<R: ViewRenderer + ?Sized>(&mut self, renderer: &mut R) {
        let events = self.recognizer.abort();
        self.dispatch(events, renderer);
        self.attached = false;
        self.frame_pending = false;
    }

    /// Returns `true` once [`initialize`](Self::initialize) was called.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.attached
    }

    /// The transform state.
    #[must_use]
    pub fn viewport(&self) -> &PageViewport {
        &self.viewport
    }

    /// The gesture recognizer.
    #[must_use]
    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    /// Read-only transform snapshot, for positioning overlays.
    #[must_use]
    pub fn view_state(&self) -> ViewTransform {
        self.viewport.view_state()
    }

    /// Unscaled left offsets of `count` pages.
    #[must_use]
    pub fn page_positions(&self, count: usize) -> Vec<f64> {
        self.viewport.page_positions(count)
    }

    /// Informs pan clamping of how many pages are mounted.
    pub fn set_displayed_pages(&mut self, count: usize) {
        self.viewport.set_displayed_pages(count);
    }

    /// Switches the page layout policy and re-applies the transform.
    pub fn set_layout<R: ViewRenderer + ?Sized>(&mut self, layout: PageLayout, renderer: &mut R) {
        self.viewport.set_layout(layout);
        self.apply(renderer);
    }

    /// Recomputes the fit scale and visible page count.
    pub fn update_dimensions<R: ViewRenderer + ?Sized>(
        &mut self,
        container: Size,
        total_pages: usize,
        renderer: &mut R,
    ) {
        self.viewport.update_dimensions(container, total_pages);
        self.apply(renderer);
    }

    /// Handles a container resize.
    ///
    /// Returns `true` if the visible page count changed, in which case the
    /// caller must re-render its pages.
    pub fn handle_resize<R: ViewRenderer + ?Sized>(
        &mut self,
        container: Size,
        total_pages: usize,
        renderer: &mut R,
    ) -> bool {
        let before = self.viewport.visible_page_count();
        self.update_dimensions(container, total_pages, renderer);
        self.viewport.visible_page_count() != before
    }

    /// Fit to the container and centre.
    pub fn reset_view<R: ViewRenderer + ?Sized>(&mut self, renderer: &mut R) {
        self.viewport.reset_view();
        self.apply(renderer);
    }

    /// Restores a saved view, or resets when there is none.
    pub fn restore_view_state<R: ViewRenderer + ?Sized>(
        &mut self,
        saved: Option<ViewTransform>,
        renderer: &mut R,
    ) {
        self.viewport.restore_view_state(saved);
        self.apply(renderer);
    }

    /// Zooms by `factor` around the container centre.
    pub fn zoom_by<R: ViewRenderer + ?Sized>(&mut self, factor: f64, renderer: &mut R) {
        self.viewport.zoom_by(factor);
        self.apply(renderer);
    }

    /// Allows or forbids swipe classification for new gestures.
    pub fn set_swipe_enabled(&mut self, enabled: bool) {
        self.swipe_enabled = enabled;
    }

    /// Whether new gestures may become swipes.
    #[must_use]
    pub fn swipe_enabled(&self) -> bool {
        self.swipe_enabled
    }

    /// Active external locks.
    #[must_use]
    pub fn locks(&self) -> GestureLocks {
        self.locks
    }

    /// Replaces the external locks. Taking a lock aborts the gesture in
    /// progress.
    pub fn set_locks<R: ViewRenderer + ?Sized>(
        &mut self,
        locks: GestureLocks,
        renderer: &mut R,
    ) -> EngineSignals {
        let newly_locked = !locks.is_empty() && self.locks.is_empty();
        self.locks = locks;
        if newly_locked {
            let events = self.recognizer.abort();
            return self.dispatch(events, renderer);
        }
        EngineSignals::new()
    }

    /// What the recognizer may classify right now.
    #[must_use]
    pub fn context(&self) -> GestureContext {
        GestureContext {
            at_min_zoom: self.viewport.is_at_min_scale(),
            swipe_enabled: self.swipe_enabled,
            locks: self.locks,
        }
    }

    /// Handles a pointer-down.
    pub fn pointer_down<R: ViewRenderer + ?Sized>(
        &mut self,
        input: PointerInput,
        renderer: &mut R,
    ) -> EngineSignals {
        if !self.ready() {
            return EngineSignals::new();
        }
        let ctx = self.context();
        let events = self.recognizer.pointer_down(input, &ctx);
        self.dispatch(events, renderer)
    }

    /// Handles a pointer-move.
    pub fn pointer_move<R: ViewRenderer + ?Sized>(
        &mut self,
        input: PointerInput,
        renderer: &mut R,
    ) -> EngineSignals {
        if !self.attached {
            return EngineSignals::new();
        }
        let ctx = self.context();
        let events = self.recognizer.pointer_move(input, &ctx);
        self.dispatch(events, renderer)
    }

    /// Handles a pointer-up.
    pub fn pointer_up<R: ViewRenderer + ?Sized>(
        &mut self,
        input: PointerInput,
        renderer: &mut R,
    ) -> EngineSignals {
        if !self.attached {
            return EngineSignals::new();
        }
        let ctx = self.context();
        let events = self.recognizer.pointer_up(input, &ctx);
        self.dispatch(events, renderer)
    }

    /// Handles a `pointercancel`.
    pub fn pointer_cancel<R: ViewRenderer + ?Sized>(
        &mut self,
        input: PointerInput,
        renderer: &mut R,
    ) -> EngineSignals {
        if !self.attached {
            return EngineSignals::new();
        }
        let events = self.recognizer.pointer_cancel(input);
        self.dispatch(events, renderer)
    }

    /// Handles a wheel event. Returns `true` if it zoomed.
    ///
    /// Ignored during a swipe, which is measured at the fit scale.
    pub fn wheel<R: ViewRenderer + ?Sized>(&mut self, input: WheelInput, renderer: &mut R) -> bool {
        if !self.ready() || self.recognizer.is_swipe_active() {
            return false;
        }
        let ctx = self.context();
        match self.recognizer.wheel(input, &ctx) {
            Some(GestureEvent::WheelZoom { anchor, factor }) => {
                let target = self.viewport.scale() * factor;
                self.viewport.zoom_about(anchor, target);
                self.apply(renderer);
                true
            }
            _ => false,
        }
    }

    /// Writes a pending pinch transform. Call from the animation frame
    /// requested through [`ViewRenderer::request_animation_frame`].
    pub fn on_animation_frame<R: ViewRenderer + ?Sized>(&mut self, renderer: &mut R) {
        if !self.frame_pending {
            return;
        }
        self.frame_pending = false;
        self.apply(renderer);
    }

    /// Returns `true` while a pinch write waits for its frame.
    #[must_use]
    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    fn ready(&self) -> bool {
        if !self.attached {
            debug!("zoom/pan engine used before initialize; ignoring input");
        }
        self.attached
    }

    fn dispatch<R: ViewRenderer + ?Sized>(
        &mut self,
        events: GestureEvents,
        renderer: &mut R,
    ) -> EngineSignals {
        let mut out = EngineSignals::new();
        for event in events {
            match event {
                GestureEvent::CapturePointer(id) => {
                    if let Err(err) = renderer.capture_pointer(id) {
                        debug!(%err, "pointer capture failed; continuing without it");
                    }
                }
                GestureEvent::ReleasePointer(id) => {
                    if let Err(err) = renderer.release_pointer(id) {
                        debug!(%err, "pointer release failed");
                    }
                }
                GestureEvent::PanBy(delta) => {
                    self.viewport.pan_by(delta);
                    self.apply(renderer);
                }
                GestureEvent::PinchStart { .. } => {
                    self.pinch_baseline_scale = self.viewport.scale();
                }
                GestureEvent::PinchUpdate {
                    ratio,
                    midpoint,
                    midpoint_delta,
                } => {
                    self.viewport.pan_by(midpoint_delta);
                    self.viewport
                        .zoom_about(midpoint, self.pinch_baseline_scale * ratio);
                    self.schedule_frame(renderer);
                }
                GestureEvent::SwipeStart => out.push(EngineSignal::SwipeStart),
                GestureEvent::SwipeMove { total_dx, velocity } => {
                    out.push(EngineSignal::SwipeMove { total_dx, velocity });
                }
                GestureEvent::SwipeEnd { total_dx, velocity } => {
                    out.push(EngineSignal::SwipeEnd { total_dx, velocity });
                }
                GestureEvent::SwipeCancel => out.push(EngineSignal::SwipeCancel),
                GestureEvent::Tap { position } => out.push(EngineSignal::Tap { position }),
                GestureEvent::DoubleTap { position } => self.toggle_zoom(position, renderer),
                GestureEvent::WheelZoom { anchor, factor } => {
                    let target = self.viewport.scale() * factor;
                    self.viewport.zoom_about(anchor, target);
                    self.apply(renderer);
                }
            }
        }
        out
    }

    /// Double-tap: zoom to twice the fit scale around `position`, or back to
    /// fit when already zoomed.
    fn toggle_zoom<R: ViewRenderer + ?Sized>(&mut self, position: Point, renderer: &mut R) {
        if self.viewport.is_at_min_scale() {
            let target = (self.viewport.min_scale() * 2.0).min(self.viewport.max_scale());
            trace!(target, "double-tap zoom in");
            self.viewport.zoom_about(position, target);
        } else {
            trace!("double-tap reset");
            self.viewport.reset_view();
        }
        self.apply(renderer);
    }

    fn schedule_frame<R: ViewRenderer + ?Sized>(&mut self, renderer: &mut R) {
        if !self.frame_pending {
            self.frame_pending = true;
            renderer.request_animation_frame();
        }
    }

    fn apply<R: ViewRenderer + ?Sized>(&self, renderer: &mut R) {
        if self.attached {
            renderer.apply_transform(self.viewport.view_state());
        }
    }
}
