// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host capabilities: the side-effecting boundary of the viewer.
//!
//! The engine and the page viewer never touch the DOM. Everything visible
//! goes through [`ViewRenderer`] (transform writes, swipe wrapper offset,
//! animation frames, pointer capture) and [`PageHost`] (page elements and
//! their per-page overlays). A browser build implements these over `web-sys`;
//! tests implement them with a recording host.

use core::fmt;

use mekbay_gesture::PointerId;
use mekbay_view2d::ViewTransform;

/// Easing curve of an animated swipe offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// CSS `ease-out`.
    #[default]
    EaseOut,
}

/// Animation applied to a swipe offset write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Duration in milliseconds.
    pub duration_ms: u32,
    /// Easing curve.
    pub easing: Easing,
}

impl Transition {
    /// An `ease-out` transition of `duration_ms`.
    #[must_use]
    pub const fn ease_out(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            easing: Easing::EaseOut,
        }
    }
}

/// Failure reported by a renderer operation.
///
/// These are never fatal: the engine logs them and carries on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// The container element is gone.
    Detached,
    /// The browser refused to capture the pointer.
    CaptureRejected(PointerId),
    /// The browser refused to release the pointer.
    ReleaseRejected(PointerId),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detached => write!(f, "viewer container is not attached"),
            Self::CaptureRejected(id) => write!(f, "pointer {} could not be captured", id.0),
            Self::ReleaseRejected(id) => write!(f, "pointer {} could not be released", id.0),
        }
    }
}

impl core::error::Error for RenderError {}

/// Writes the view transform and swipe state to the screen.
pub trait ViewRenderer {
    /// Writes `scale` and `translate` to the content element.
    fn apply_transform(&mut self, view: ViewTransform);

    /// Shifts the swipe wrapper horizontally by `dx` container pixels,
    /// animated when `transition` is set.
    fn set_swipe_offset(&mut self, dx: f64, transition: Option<Transition>);

    /// Asks for one `on_animation_frame` call before the next paint.
    fn request_animation_frame(&mut self);

    /// Captures the pointer to the container.
    fn capture_pointer(&mut self, id: PointerId) -> Result<(), RenderError>;

    /// Releases a captured pointer.
    fn release_pointer(&mut self, id: PointerId) -> Result<(), RenderError>;
}

/// Mounts pages and per-page overlays for units identified by `K`.
///
/// Handles are owned by the viewer between `create_*`/`mount_page` and the
/// matching `destroy_*`/`unmount_page` call.
pub trait PageHost<K>: ViewRenderer {
    /// A mounted page element.
    type Page;
    /// A per-page interaction service with its own gesture and picker state.
    type Interaction;
    /// A per-page drawing canvas overlay.
    type Canvas;

    /// Mounts the page of `unit` at unscaled `left`, attaching its overlays.
    fn mount_page(
        &mut self,
        unit: &K,
        left: f64,
        interaction: &Self::Interaction,
        canvas: &Self::Canvas,
    ) -> Self::Page;

    /// Moves a mounted page to a new unscaled `left`.
    fn position_page(&mut self, page: &Self::Page, left: f64);

    /// Removes a page element. Its overlays are managed separately.
    fn unmount_page(&mut self, page: Self::Page);

    /// Creates the interaction service for `unit`.
    fn create_interaction(&mut self, unit: &K) -> Self::Interaction;

    /// Tears down an interaction service.
    fn destroy_interaction(&mut self, unit: &K, interaction: Self::Interaction);

    /// Creates the drawing canvas overlay for `unit`.
    fn create_canvas(&mut self, unit: &K) -> Self::Canvas;

    /// Tears down a canvas overlay.
    fn destroy_canvas(&mut self, unit: &K, canvas: Self::Canvas);

    /// Marks a page as the selected one, or clears the mark.
    fn set_selected(&mut self, page: &Self::Page, selected: bool);

    /// Returns `true` once the content of `unit` has loaded.
    fn is_loaded(&self, unit: &K) -> bool;

    /// Starts loading `unit` in the background without waiting for it.
    fn preload(&mut self, unit: &K);
}
