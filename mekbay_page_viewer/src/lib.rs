// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=mekbay_page_viewer --heading-base-level=0

//! MekBay Page Viewer: the headless core of the multi-sheet record viewer.
//!
//! The crate stacks three layers on top of [`mekbay_view2d`] and
//! [`mekbay_gesture`]:
//!
//! - [`ZoomPanEngine`]: applies recognized pans, pinches, wheel steps and
//!   double-taps to a clamped page viewport, and passes swipes and taps on as
//!   [`EngineSignal`]s.
//! - [`decide`] and [`SwipeSession`]: commit-or-cancel rules for a released
//!   swipe and the neighbour pages a swipe in progress needs.
//! - [`PageViewer`]: the canonical page window, per-page overlays reused by
//!   unit identity ([`OverlayCache`]), saved views ([`ViewStateStore`]), and
//!   the swipe state machine.
//!
//! Nothing here touches the DOM. Screen effects go through the host traits
//! [`ViewRenderer`] and [`PageHost`]; the `mekbay_page_viewer_web` crate
//! implements them over `web-sys`.
//!
//! ## Driving a viewer
//!
//! Async loading is explicit: calls that change the window return a
//! [`ViewerEvent::Display`] request. The host loads the listed units and hands
//! the request back through [`PageViewer::complete_display`]. A request that
//! was overtaken by a newer one is ignored.
//!
//! ```rust
//! use kurbo::Size;
//! use mekbay_gesture::PointerId;
//! use mekbay_page_viewer::{
//!     PageHost, PageViewer, RenderError, Transition, ViewRenderer, ViewerConfig, ViewerEvent,
//! };
//! use mekbay_view2d::ViewTransform;
//!
//! #[derive(Default)]
//! struct Headless {
//!     mounted: Vec<u32>,
//! }
//!
//! impl ViewRenderer for Headless {
//!     fn apply_transform(&mut self, _view: ViewTransform) {}
//!     fn set_swipe_offset(&mut self, _dx: f64, _transition: Option<Transition>) {}
//!     fn request_animation_frame(&mut self) {}
//!     fn capture_pointer(&mut self, _id: PointerId) -> Result<(), RenderError> {
//!         Ok(())
//!     }
//!     fn release_pointer(&mut self, _id: PointerId) -> Result<(), RenderError> {
//!         Ok(())
//!     }
//! }
//!
//! impl PageHost<u32> for Headless {
//!     type Page = u32;
//!     type Interaction = ();
//!     type Canvas = ();
//!     fn mount_page(&mut self, unit: &u32, _left: f64, _: &(), _: &()) -> u32 {
//!         self.mounted.push(*unit);
//!         *unit
//!     }
//!     fn position_page(&mut self, _page: &u32, _left: f64) {}
//!     fn unmount_page(&mut self, page: u32) {
//!         self.mounted.retain(|p| *p != page);
//!     }
//!     fn create_interaction(&mut self, _unit: &u32) {}
//!     fn destroy_interaction(&mut self, _unit: &u32, _interaction: ()) {}
//!     fn create_canvas(&mut self, _unit: &u32) {}
//!     fn destroy_canvas(&mut self, _unit: &u32, _canvas: ()) {}
//!     fn set_selected(&mut self, _page: &u32, _selected: bool) {}
//!     fn is_loaded(&self, _unit: &u32) -> bool {
//!         true
//!     }
//!     fn preload(&mut self, _unit: &u32) {}
//! }
//!
//! let mut host = Headless::default();
//! let mut viewer = PageViewer::new(ViewerConfig::default());
//! let events = viewer.initialize(&mut host, Size::new(1300.0, 800.0), vec![7, 8, 9]);
//!
//! for event in &events {
//!     if let ViewerEvent::Display(request) = event {
//!         // Load `request.units` here, then:
//!         assert!(viewer.complete_display(request, &mut host));
//!     }
//! }
//! // Three sheets fit side by side above the minimum scale.
//! assert_eq!(host.mounted, [7, 8, 9]);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod display;
mod engine;
mod overlays;
mod render;
mod swipe;
mod view_state;

pub use display::{
    DisplayRequest, PageViewer, ViewerConfig, ViewerEvent, ViewerEvents, ViewerOptions,
    ViewerPhase,
};
pub use engine::{EngineSignal, EngineSignals, ZoomPanEngine};
pub use overlays::{OverlayCache, Overlays};
pub use render::{Easing, PageHost, RenderError, Transition, ViewRenderer};
pub use swipe::{
    SwipeConfig, SwipeDecision, SwipeGeometry, SwipeSession, decide, extra_pages, wrap_index,
};
pub use view_state::{RestorePolicy, ViewStateStore};
