// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=mekbay_view2d --heading-base-level=0

//! MekBay View 2D: the transform state behind the record-sheet viewer.
//!
//! This crate provides a small, headless model of a horizontal strip of
//! equally sized pages shown inside a container. It focuses on:
//! - Deriving a fit-to-container minimum scale and how many pages fit side by
//!   side.
//! - A clamped scale + translate transform ([`ViewTransform`]).
//! - Page layout policies ([`PageLayout`]) and page hit testing.
//!
//! It does **not** own any DOM or rendering backend. Callers are expected to:
//! - Feed container size changes into [`PageViewport::update_dimensions`].
//! - Apply gesture deltas through [`PageViewport::pan_by`],
//!   [`PageViewport::zoom_about`] and [`PageViewport::set_transform`].
//! - Write [`PageViewport::view_state`] to their content element.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use mekbay_view2d::{PageViewport, ViewportConfig};
//!
//! let mut view = PageViewport::new(ViewportConfig::default());
//!
//! // A 1200x800 container and three record sheets.
//! view.update_dimensions(Size::new(1200.0, 800.0), 3);
//! view.reset_view();
//! assert_eq!(view.visible_page_count(), 3);
//!
//! // Zoom in around a pointer position; the scale is clamped to [min, 5].
//! view.zoom_about(Point::new(600.0, 400.0), 100.0);
//! assert_eq!(view.scale(), 5.0);
//! ```
//!
//! ## Design notes
//!
//! - Zoom is uniform; there is no rotation.
//! - Translation is expressed in container pixels and applied after scale.
//! - Clamping centers content on an axis where it is smaller than the
//!   container, and otherwise keeps the container fully covered.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod modes;
mod page_viewport;
mod transform;

pub use modes::PageLayout;
pub use page_viewport::{PageViewport, PageViewportDebugInfo, ViewportConfig};
pub use transform::ViewTransform;
