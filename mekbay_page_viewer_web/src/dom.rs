// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use js_sys::Function;
use kurbo::Point;
use mekbay_gesture::{PointerId, PointerInput, TargetFlags, WheelInput};
use mekbay_page_viewer::{RenderError, Transition, ViewRenderer};
use mekbay_view2d::ViewTransform;
use tracing::debug;
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget, HtmlElement, PointerEvent, WheelEvent};

use crate::{TargetSelectors, swipe_offset_css, transform_css, transition_css};

/// [`ViewRenderer`] writing CSS transforms onto DOM elements.
pub struct DomViewRenderer {
    container: HtmlElement,
    content: HtmlElement,
    wrapper: HtmlElement,
    on_frame: Function,
    selectors: TargetSelectors,
}

impl fmt::Debug for DomViewRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomViewRenderer").finish_non_exhaustive()
    }
}

impl DomViewRenderer {
    /// Creates a renderer classifying targets with the default
    /// [`TargetSelectors`].
    ///
    /// `on_frame` is handed to `requestAnimationFrame` whenever the engine
    /// asks for a frame; it should call the viewer's `on_animation_frame`.
    pub fn new(
        container: HtmlElement,
        content: HtmlElement,
        wrapper: HtmlElement,
        on_frame: Function,
    ) -> Self {
        Self {
            container,
            content,
            wrapper,
            on_frame,
            selectors: TargetSelectors::default(),
        }
    }

    /// Replaces the selectors used to classify pointer targets.
    #[must_use]
    pub fn with_selectors(mut self, selectors: TargetSelectors) -> Self {
        self.selectors = selectors;
        self
    }

    /// The selectors used to classify pointer targets.
    pub fn selectors(&self) -> &TargetSelectors {
        &self.selectors
    }

    /// Converts a DOM pointer event into a sample relative to the container.
    pub fn pointer_input(&self, event: &PointerEvent) -> PointerInput {
        let position = relative_position(&self.container, event.client_x(), event.client_y());
        PointerInput::new(
            PointerId(event.pointer_id()),
            position,
            timestamp_ms(event.time_stamp()),
        )
        .with_target(self.target_flags(event.target()))
    }

    /// Converts a DOM wheel event into a sample relative to the container.
    pub fn wheel_input(&self, event: &WheelEvent) -> WheelInput {
        WheelInput {
            position: relative_position(&self.container, event.client_x(), event.client_y()),
            delta_y: event.delta_y(),
        }
    }

    fn target_flags(&self, target: Option<EventTarget>) -> TargetFlags {
        let Some(element) = target.and_then(|t| t.dyn_into::<Element>().ok()) else {
            return TargetFlags::empty();
        };
        self.selectors
            .classify(|selector| matches!(element.closest(selector), Ok(Some(_))))
    }

    /// The element receiving pointer events.
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    fn set_style(element: &HtmlElement, property: &str, value: &str) {
        if let Err(err) = element.style().set_property(property, value) {
            debug!(property, ?err, "style write failed");
        }
    }

    fn attached(&self) -> Result<(), RenderError> {
        if self.container.is_connected() {
            Ok(())
        } else {
            Err(RenderError::Detached)
        }
    }
}

impl ViewRenderer for DomViewRenderer {
    fn apply_transform(&mut self, view: ViewTransform) {
        Self::set_style(&self.content, "transform", &transform_css(view));
    }

    fn set_swipe_offset(&mut self, dx: f64, transition: Option<Transition>) {
        Self::set_style(&self.wrapper, "transition", &transition_css(transition));
        Self::set_style(&self.wrapper, "transform", &swipe_offset_css(dx));
    }

    fn request_animation_frame(&mut self) {
        let Some(window) = web_sys::window() else {
            debug!("no window; animation frame dropped");
            return;
        };
        if let Err(err) = window.request_animation_frame(&self.on_frame) {
            debug!(?err, "requestAnimationFrame failed");
        }
    }

    fn capture_pointer(&mut self, id: PointerId) -> Result<(), RenderError> {
        self.attached()?;
        self.container
            .set_pointer_capture(id.0)
            .map_err(|_| RenderError::CaptureRejected(id))
    }

    fn release_pointer(&mut self, id: PointerId) -> Result<(), RenderError> {
        self.attached()?;
        self.container
            .release_pointer_capture(id.0)
            .map_err(|_| RenderError::ReleaseRejected(id))
    }
}

fn relative_position(container: &Element, client_x: i32, client_y: i32) -> Point {
    let rect = container.get_bounding_client_rect();
    Point::new(
        f64::from(client_x) - rect.left(),
        f64::from(client_y) - rect.top(),
    )
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "DOMHighResTimeStamp is a non-negative millisecond count well inside u64."
)]
fn timestamp_ms(stamp: f64) -> u64 {
    stamp.max(0.0) as u64
}
