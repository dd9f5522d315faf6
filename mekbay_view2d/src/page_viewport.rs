// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::{Affine, Point, Size, Vec2};

use crate::modes::PageLayout;
use crate::transform::ViewTransform;

/// Relative slack used by [`PageViewport::is_at_min_scale`].
const MIN_SCALE_TOLERANCE: f64 = 0.01;

/// Static geometry and limits of a page strip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportConfig {
    /// Unscaled size of one page (a record sheet).
    pub page_size: Size,
    /// Unscaled horizontal gap between packed pages.
    pub page_gap: f64,
    /// Upper zoom limit.
    pub max_scale: f64,
    /// Smallest fit scale at which more than one page is still laid out side
    /// by side.
    pub scale_floor: f64,
    /// Horizontal layout policy.
    pub layout: PageLayout,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            page_size: Size::new(612.0, 792.0),
            page_gap: 20.0,
            max_scale: 5.0,
            scale_floor: 0.1,
            layout: PageLayout::Packed,
        }
    }
}

/// View transform over a horizontal strip of equally sized pages.
///
/// `PageViewport` owns the [`ViewTransform`] of one viewer and is the only
/// place it is mutated. Every public mutation funnels through clamping, so
/// after each call:
/// - `min_scale() <= scale <= max_scale`;
/// - on an axis where the scaled content is smaller than the container, the
///   content is centered;
/// - on an axis where it is larger, no content edge is inside the container.
///
/// The minimum scale is derived from the container size by
/// [`PageViewport::update_dimensions`], which also decides how many pages are
/// visible side by side.
#[derive(Clone, Debug)]
pub struct PageViewport {
    config: ViewportConfig,
    container: Size,
    total_pages: usize,
    visible_page_count: usize,
    displayed_pages: usize,
    min_scale: f64,
    transform: ViewTransform,
    content_to_view: Affine,
    view_to_content: Affine,
}

impl PageViewport {
    /// Creates a viewport with an empty container.
    ///
    /// Until [`PageViewport::update_dimensions`] is called the minimum scale is
    /// `1.0` (or `max_scale`, whichever is smaller) and one page is visible.
    #[must_use]
    pub fn new(config: ViewportConfig) -> Self {
        let min_scale = 1.0_f64.min(config.max_scale);
        let mut vp = Self {
            config,
            container: Size::ZERO,
            total_pages: 0,
            visible_page_count: 1,
            displayed_pages: 1,
            min_scale,
            transform: ViewTransform::new(min_scale, 0.0, 0.0),
            content_to_view: Affine::IDENTITY,
            view_to_content: Affine::IDENTITY,
        };
        vp.rebuild_transforms();
        vp
    }

    /// Returns the static configuration.
    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Switches the layout policy and re-clamps.
    pub fn set_layout(&mut self, layout: PageLayout) {
        if self.config.layout != layout {
            self.config.layout = layout;
            self.clamp_pan();
        }
    }

    /// Current container size in pixels.
    #[must_use]
    pub fn container(&self) -> Size {
        self.container
    }

    /// Total number of pages known to the viewer.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Number of pages shown side by side at rest.
    #[must_use]
    pub fn visible_page_count(&self) -> usize {
        self.visible_page_count
    }

    /// Number of pages currently mounted in the content strip.
    #[must_use]
    pub fn displayed_pages(&self) -> usize {
        self.displayed_pages
    }

    /// Fit-to-container scale for the current visible page count.
    #[must_use]
    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    /// Upper zoom limit.
    #[must_use]
    pub fn max_scale(&self) -> f64 {
        self.config.max_scale
    }

    /// Current uniform scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    /// Current translation in container pixels.
    #[must_use]
    pub fn translate(&self) -> Vec2 {
        self.transform.translate
    }

    /// Read-only snapshot of the current transform.
    #[must_use]
    pub fn view_state(&self) -> ViewTransform {
        self.transform
    }

    /// Returns `true` when the scale is at (or within 1% of) the fit scale.
    ///
    /// Swiping between pages is only offered in this state.
    #[must_use]
    pub fn is_at_min_scale(&self) -> bool {
        self.transform.scale <= self.min_scale * (1.0 + MIN_SCALE_TOLERANCE)
    }

    /// Recomputes the fit scale and the visible page count.
    ///
    /// Picks the largest `k <= total_pages` whose fit scale
    /// `min(container_w / strip_width(k), container_h / page_h)` is at least
    /// [`ViewportConfig::scale_floor`], falling back to a single page. The
    /// current scale is then clamped into the new range and the pan re-clamped.
    pub fn update_dimensions(&mut self, container: Size, total_pages: usize) {
        self.container = container;
        self.total_pages = total_pages;

        let max_k = total_pages.max(1);
        let floor = self.config.scale_floor;
        let chosen = (1..=max_k).rev().find_map(|k| {
            self.fit_scale(k)
                .filter(|s| *s >= floor)
                .map(|s| (k, s))
        });
        let (k, fit) = chosen.unwrap_or_else(|| (1, self.fit_scale(1).unwrap_or(1.0)));

        self.visible_page_count = k;
        self.displayed_pages = k;
        self.min_scale = fit.min(self.config.max_scale);
        self.transform.scale = self.clamp_scale(self.transform.scale);
        self.clamp_pan();
    }

    /// Informs pan clamping of how many pages are actually mounted.
    pub fn set_displayed_pages(&mut self, count: usize) {
        let count = count.max(1);
        if self.displayed_pages != count {
            self.displayed_pages = count;
            self.clamp_pan();
        }
    }

    /// Fit scale and center the content. Calling this twice is a no-op.
    pub fn reset_view(&mut self) {
        self.transform.scale = self.min_scale;
        let content = self.content_size();
        self.transform.translate = Vec2::new(
            (self.container.width - content.width * self.min_scale) / 2.0,
            (self.container.height - content.height * self.min_scale) / 2.0,
        );
        self.clamp_pan();
    }

    /// Restores a saved view, or resets to fit when there is none.
    ///
    /// A saved scale is clamped to the current `[min_scale, max_scale]` range
    /// and the saved translation is re-clamped against the current container.
    pub fn restore_view_state(&mut self, saved: Option<ViewTransform>) {
        match saved {
            Some(view) if view.is_restorable() => {
                self.transform.scale = self.clamp_scale(view.scale);
                self.transform.translate = view.translate;
                self.clamp_pan();
            }
            _ => self.reset_view(),
        }
    }

    /// Sets scale and translation together, clamping both.
    pub fn set_transform(&mut self, scale: f64, translate: Vec2) {
        if !scale.is_finite() || !translate.is_finite() {
            return;
        }
        self.transform.scale = self.clamp_scale(scale);
        self.transform.translate = translate;
        self.clamp_pan();
    }

    /// Pans by a delta in container pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO || !delta.is_finite() {
            return;
        }
        self.transform.translate += delta;
        self.clamp_pan();
    }

    /// Zooms to `new_scale` keeping `anchor` (container pixels) fixed.
    ///
    /// The anchor is the fixed point of the zoom before pan clamping:
    /// `t' = anchor - (anchor - t) * (s' / s)`.
    pub fn zoom_about(&mut self, anchor: Point, new_scale: f64) {
        if !new_scale.is_finite() || new_scale <= 0.0 {
            return;
        }
        let old = self.transform.scale;
        let new_scale = self.clamp_scale(new_scale);
        if old > 0.0 {
            let ratio = new_scale / old;
            let a = anchor.to_vec2();
            self.transform.translate = a - (a - self.transform.translate) * ratio;
        }
        self.transform.scale = new_scale;
        self.clamp_pan();
    }

    /// Multiplies the scale by `factor` around the container center.
    pub fn zoom_by(&mut self, factor: f64) {
        let center = Point::new(self.container.width / 2.0, self.container.height / 2.0);
        self.zoom_about(center, self.transform.scale * factor);
    }

    /// Unscaled size of the content strip for the displayed page count.
    #[must_use]
    pub fn content_size(&self) -> Size {
        let packed = self.packed_width(self.displayed_pages);
        let width = match self.config.layout {
            PageLayout::Packed => packed,
            PageLayout::SpaceEvenly if self.min_scale > 0.0 => {
                (self.container.width / self.min_scale).max(packed)
            }
            PageLayout::SpaceEvenly => packed,
        };
        Size::new(width, self.config.page_size.height)
    }

    /// Unscaled left offsets of `count` pages under the layout policy.
    #[must_use]
    pub fn page_positions(&self, count: usize) -> Vec<f64> {
        let (origin, step) = self.origin_and_step(count);
        (0..count).map(|i| origin + i as f64 * step).collect()
    }

    /// Unscaled distance between the left edges of neighbouring pages.
    #[must_use]
    pub fn page_step(&self) -> f64 {
        self.origin_and_step(self.visible_page_count).1
    }

    /// Unscaled left offset of a page at `relative` slots from the first
    /// canonical page. Negative offsets lie to the left of the strip.
    #[must_use]
    pub fn page_left(&self, relative: isize) -> f64 {
        let (origin, step) = self.origin_and_step(self.visible_page_count);
        origin + relative as f64 * step
    }

    /// Converts a container-space point into content space.
    #[must_use]
    pub fn view_to_content_point(&self, pt: Point) -> Point {
        self.view_to_content * pt
    }

    /// Converts a content-space point into container space.
    #[must_use]
    pub fn content_to_view_point(&self, pt: Point) -> Point {
        self.content_to_view * pt
    }

    /// Index of the displayed page under a container-space point, if any.
    #[must_use]
    pub fn page_at_view_point(&self, pt: Point) -> Option<usize> {
        let c = self.view_to_content_point(pt);
        let page = self.config.page_size;
        if c.y < 0.0 || c.y > page.height {
            return None;
        }
        self.page_positions(self.displayed_pages)
            .iter()
            .position(|left| c.x >= *left && c.x <= *left + page.width)
    }

    /// Re-applies the pan constraints for the current scale.
    pub fn clamp_pan(&mut self) {
        let content = self.content_size();
        let s = self.transform.scale;
        self.transform.translate = Vec2::new(
            clamp_axis(self.transform.translate.x, content.width * s, self.container.width),
            clamp_axis(self.transform.translate.y, content.height * s, self.container.height),
        );
        self.rebuild_transforms();
    }

    /// Snapshot of the current viewport state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> PageViewportDebugInfo {
        PageViewportDebugInfo {
            container: self.container,
            content: self.content_size(),
            transform: self.transform,
            min_scale: self.min_scale,
            max_scale: self.config.max_scale,
            total_pages: self.total_pages,
            visible_page_count: self.visible_page_count,
            displayed_pages: self.displayed_pages,
            layout: self.config.layout,
        }
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.config.max_scale.max(self.min_scale))
    }

    fn packed_width(&self, count: usize) -> f64 {
        let count = count.max(1) as f64;
        count * self.config.page_size.width + (count - 1.0) * self.config.page_gap
    }

    fn fit_scale(&self, count: usize) -> Option<f64> {
        let page = self.config.page_size;
        if self.container.width <= 0.0
            || self.container.height <= 0.0
            || page.width <= 0.0
            || page.height <= 0.0
        {
            return None;
        }
        let sx = self.container.width / self.packed_width(count);
        let sy = self.container.height / page.height;
        Some(sx.min(sy))
    }

    fn origin_and_step(&self, count: usize) -> (f64, f64) {
        let page_w = self.config.page_size.width;
        match self.config.layout {
            PageLayout::Packed => (0.0, page_w + self.config.page_gap),
            PageLayout::SpaceEvenly => {
                if self.min_scale <= 0.0 {
                    return (0.0, page_w + self.config.page_gap);
                }
                let count = count.max(1) as f64;
                let strip = self.container.width / self.min_scale;
                let gap = ((strip - count * page_w) / (count + 1.0)).max(0.0);
                (gap, page_w + gap)
            }
        }
    }

    fn rebuild_transforms(&mut self) {
        self.content_to_view = self.transform.to_affine();
        self.view_to_content = self.content_to_view.inverse();
    }
}

fn clamp_axis(translate: f64, scaled_content: f64, container: f64) -> f64 {
    if scaled_content <= container {
        (container - scaled_content) / 2.0
    } else {
        translate.clamp(container - scaled_content, 0.0)
    }
}

/// Debug snapshot of a [`PageViewport`] state.
#[derive(Clone, Copy, Debug)]
pub struct PageViewportDebugInfo {
    /// Container size in pixels.
    pub container: Size,
    /// Unscaled content strip size.
    pub content: Size,
    /// Current transform.
    pub transform: ViewTransform,
    /// Fit scale.
    pub min_scale: f64,
    /// Upper zoom limit.
    pub max_scale: f64,
    /// Total pages known to the viewer.
    pub total_pages: usize,
    /// Pages shown side by side at rest.
    pub visible_page_count: usize,
    /// Pages currently mounted.
    pub displayed_pages: usize,
    /// Layout policy.
    pub layout: PageLayout,
}
