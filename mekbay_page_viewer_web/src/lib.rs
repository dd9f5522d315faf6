// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=mekbay_page_viewer_web --heading-base-level=0

//! `web-sys` adapter for the MekBay page viewer.
//!
//! This crate provides a [`ViewRenderer`](mekbay_page_viewer::ViewRenderer)
//! implementation over three DOM elements when targeting `wasm32`:
//!
//! - the container, which receives pointer events and holds pointer capture;
//! - the content element, whose CSS `transform` carries the zoom/pan state;
//! - the swipe wrapper, translated horizontally while the user swipes.
//!
//! It also converts DOM `PointerEvent`s and `WheelEvent`s into the
//! container-relative samples the gesture recognizer consumes. Event targets
//! are classified by [`TargetSelectors`]: elements matching its interactive
//! selector are flagged as interactive and elements inside its page selector
//! are flagged as on a page. The defaults are [`INTERACTIVE_SELECTOR`] and
//! [`PAGE_SELECTOR`]; hosts with their own controls supply their own list
//! through `DomViewRenderer::with_selectors`.
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn make_renderer(
//!     container: web_sys::HtmlElement,
//!     content: web_sys::HtmlElement,
//!     wrapper: web_sys::HtmlElement,
//!     on_frame: js_sys::Function,
//! ) -> mekbay_page_viewer_web::DomViewRenderer {
//!     mekbay_page_viewer_web::DomViewRenderer::new(container, content, wrapper, on_frame)
//! }
//! ```
//!
//! The CSS string builders are plain functions and available on every target.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

use alloc::format;
use alloc::string::String;

use mekbay_gesture::TargetFlags;
use mekbay_page_viewer::{Easing, Transition};
use mekbay_view2d::ViewTransform;

#[cfg(target_arch = "wasm32")]
mod dom;

#[cfg(target_arch = "wasm32")]
pub use dom::DomViewRenderer;

/// Elements that handle their own clicks; taps on them never double-tap.
pub const INTERACTIVE_SELECTOR: &str =
    "button, a, input, select, textarea, [role=\"button\"], .interactive";

/// A page element of the viewer.
pub const PAGE_SELECTOR: &str = ".page-wrapper";

/// CSS selectors used to classify the target of a pointer event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetSelectors {
    /// Elements that handle their own clicks. Taps inside them never count
    /// toward a double-tap.
    pub interactive: String,
    /// The element wrapping each page.
    pub page: String,
}

impl Default for TargetSelectors {
    fn default() -> Self {
        Self {
            interactive: String::from(INTERACTIVE_SELECTOR),
            page: String::from(PAGE_SELECTOR),
        }
    }
}

impl TargetSelectors {
    /// Replaces the interactive selector, keeping the page selector.
    #[must_use]
    pub fn with_interactive(mut self, selector: impl Into<String>) -> Self {
        self.interactive = selector.into();
        self
    }

    /// Classifies a target.
    ///
    /// `closest` reports whether the target or one of its ancestors matches
    /// the given selector, as `Element.closest` does.
    pub fn classify(&self, mut closest: impl FnMut(&str) -> bool) -> TargetFlags {
        let mut flags = TargetFlags::empty();
        if closest(&self.interactive) {
            flags |= TargetFlags::INTERACTIVE;
        }
        if closest(&self.page) {
            flags |= TargetFlags::ON_PAGE;
        }
        flags
    }
}

/// CSS `transform` value for the content element.
///
/// The content is laid out from its top-left corner, so the translation is
/// applied before the scale.
#[must_use]
pub fn transform_css(view: ViewTransform) -> String {
    format!(
        "translate({}px, {}px) scale({})",
        view.translate.x, view.translate.y, view.scale
    )
}

/// CSS `transform` value for the swipe wrapper.
#[must_use]
pub fn swipe_offset_css(dx: f64) -> String {
    format!("translate3d({dx}px, 0px, 0px)")
}

/// CSS `transition` value for a swipe offset write.
#[must_use]
pub fn transition_css(transition: Option<Transition>) -> String {
    match transition {
        Some(t) => format!("transform {}ms {}", t.duration_ms, easing_css(t.easing)),
        None => String::from("none"),
    }
}

fn easing_css(easing: Easing) -> &'static str {
    match easing {
        Easing::EaseOut => "ease-out",
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use mekbay_gesture::TargetFlags;
    use mekbay_page_viewer::Transition;
    use mekbay_view2d::ViewTransform;

    use super::{
        INTERACTIVE_SELECTOR, PAGE_SELECTOR, TargetSelectors, swipe_offset_css, transform_css,
        transition_css,
    };

    #[test]
    fn default_selectors_classify_interactive_page_targets() {
        let selectors = TargetSelectors::default();
        let mut asked = Vec::new();
        let flags = selectors.classify(|selector| {
            asked.push(alloc::string::String::from(selector));
            true
        });
        assert_eq!(flags, TargetFlags::INTERACTIVE | TargetFlags::ON_PAGE);
        assert_eq!(asked, [INTERACTIVE_SELECTOR, PAGE_SELECTOR]);
    }

    #[test]
    fn custom_interactive_selector_replaces_default() {
        let selectors = TargetSelectors::default().with_interactive(".unit-control");
        assert_eq!(selectors.page, PAGE_SELECTOR);

        // A plain button is no longer interactive under the host's list.
        let flags =
            selectors.classify(|selector| selector == "button" || selector == PAGE_SELECTOR);
        assert_eq!(flags, TargetFlags::ON_PAGE);

        let flags = selectors.classify(|selector| selector == ".unit-control");
        assert_eq!(flags, TargetFlags::INTERACTIVE);
    }

    #[test]
    fn unmatched_target_has_no_flags() {
        assert_eq!(
            TargetSelectors::default().classify(|_| false),
            TargetFlags::empty()
        );
    }

    #[test]
    fn transform_orders_translate_before_scale() {
        let css = transform_css(ViewTransform::new(2.0, -30.0, 12.5));
        assert_eq!(css, "translate(-30px, 12.5px) scale(2)");
    }

    #[test]
    fn swipe_offset_is_horizontal_only() {
        assert_eq!(swipe_offset_css(-600.0), "translate3d(-600px, 0px, 0px)");
    }

    #[test]
    fn transition_maps_duration_and_easing() {
        assert_eq!(
            transition_css(Some(Transition::ease_out(250))),
            "transform 250ms ease-out"
        );
        assert_eq!(transition_css(None), "none");
    }
}
