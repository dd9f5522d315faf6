// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-page display orchestration.
//!
//! [`PageViewer`] owns the set of mounted pages, their overlays, and the
//! swipe state machine:
//!
//! ```text
//! Uninitialized -> Displaying -> Swiping -> Settling -> Displaying
//! ```
//!
//! ## Canonical window
//!
//! At rest the viewer shows `visible_page_count` units starting at
//! `view_start`, wrapping modulo the unit count. Changing the window is a
//! two-step affair: the viewer hands out a [`DisplayRequest`], the host loads
//! the listed units, then passes the request back to
//! [`PageViewer::complete_display`]. Only the most recent request renders;
//! older ones are discarded, so racing loads never populate pages out of
//! order.
//!
//! ## Swipes
//!
//! While a swipe is in progress, the window grows by one neighbour per page
//! width of overscroll on the leading side. When the swipe is released the
//! viewer picks commit or cancel, animates the wrapper, and reports the
//! settle duration through [`ViewerEvent::SettleScheduled`]. The host calls
//! [`PageViewer::finish_swipe`] once that animation has run.

use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;
use core::marker::PhantomData;

use kurbo::{Point, Size};
use mekbay_gesture::{GestureConfig, GestureLocks, PointerInput, WheelInput};
use mekbay_view2d::{PageLayout, ViewTransform, ViewportConfig};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::engine::{EngineSignal, EngineSignals, ZoomPanEngine};
use crate::overlays::{OverlayCache, Overlays};
use crate::render::PageHost;
use crate::swipe::{SwipeConfig, SwipeDecision, SwipeGeometry, SwipeSession, decide, wrap_index};
use crate::view_state::{RestorePolicy, ViewStateStore};

/// User preferences the viewer honours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewerOptions {
    /// Share one zoom level across all sheets instead of remembering one per
    /// sheet.
    pub sync_zoom: bool,
    /// Allow swiping between sheets.
    pub swipe_enabled: bool,
    /// Horizontal placement of side-by-side pages.
    pub layout: PageLayout,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            sync_zoom: false,
            swipe_enabled: true,
            layout: PageLayout::Packed,
        }
    }
}

/// Everything a [`PageViewer`] is configured with.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewerConfig {
    /// Page geometry and zoom limits.
    pub viewport: ViewportConfig,
    /// Gesture thresholds.
    pub gestures: GestureConfig,
    /// Swipe commit rules and animation timings.
    pub swipe: SwipeConfig,
    /// Initial user preferences.
    pub options: ViewerOptions,
}

/// Lifecycle phase of a [`PageViewer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewerPhase {
    /// Not attached to a container yet.
    #[default]
    Uninitialized,
    /// Showing the canonical window.
    Displaying,
    /// A swipe is moving the pages.
    Swiping,
    /// The swipe was released and its animation is running.
    Settling,
}

/// Units the host must load before the viewer can render a new window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayRequest<K> {
    /// Version stamp; only the latest version renders.
    pub version: u64,
    /// Units of the new canonical window, left to right.
    pub units: Vec<K>,
}

/// Something the host has to act on.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewerEvent<K> {
    /// Load these units, then call [`PageViewer::complete_display`].
    Display(DisplayRequest<K>),
    /// The selected unit changed.
    SelectionChanged(K),
    /// A swipe animation started; call [`PageViewer::finish_swipe`] after
    /// `duration_ms`.
    SettleScheduled {
        /// Animation length in milliseconds.
        duration_ms: u32,
    },
}

/// Events produced by one viewer call.
pub type ViewerEvents<K> = SmallVec<[ViewerEvent<K>; 2]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DisplayReason {
    /// The user picked another unit or replaced the unit list.
    Navigation,
    /// A committed swipe moved the window.
    Swipe,
    /// The visible page count changed.
    Layout,
}

#[derive(Clone, Copy, Debug)]
struct PendingDisplay {
    version: u64,
    reason: DisplayReason,
}

struct MountedPage<K, P> {
    unit: K,
    page: P,
    left: f64,
    /// Slot relative to the first page of the canonical window.
    offset: isize,
    selected: bool,
}

/// Multi-page record-sheet viewer.
///
/// `K` identifies a unit; `H` is the host that mounts pages for it. The host
/// is passed into every call that touches the screen rather than owned.
pub struct PageViewer<K, H: PageHost<K>> {
    engine: ZoomPanEngine,
    swipe_config: SwipeConfig,
    options: ViewerOptions,
    phase: ViewerPhase,
    units: Vec<K>,
    view_start: usize,
    selected: Option<K>,
    pages: Vec<MountedPage<K, H::Page>>,
    overlays: OverlayCache<K, H::Interaction, H::Canvas>,
    views: ViewStateStore<K>,
    display_version: u64,
    pending: Option<PendingDisplay>,
    swipe: Option<SwipeSession>,
    settle: Option<SwipeDecision>,
    drawing_mode: bool,
    locks: GestureLocks,
    _host: PhantomData<fn(&mut H)>,
}

impl<K, H: PageHost<K>> fmt::Debug for PageViewer<K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageViewer")
            .field("phase", &self.phase)
            .field("units", &self.units.len())
            .field("view_start", &self.view_start)
            .field("mounted_pages", &self.pages.len())
            .field("overlays", &self.overlays)
            .field("display_version", &self.display_version)
            .field("drawing_mode", &self.drawing_mode)
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}

impl<K: Clone + Eq + Hash, H: PageHost<K>> PageViewer<K, H> {
    /// Creates an uninitialized viewer.
    #[must_use]
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            engine: ZoomPanEngine::new(
                ViewportConfig {
                    layout: config.options.layout,
                    ..config.viewport
                },
                config.gestures,
            ),
            swipe_config: config.swipe,
            options: config.options,
            phase: ViewerPhase::Uninitialized,
            units: Vec::new(),
            view_start: 0,
            selected: None,
            pages: Vec::new(),
            overlays: OverlayCache::new(),
            views: ViewStateStore::new(),
            display_version: 0,
            pending: None,
            swipe: None,
            settle: None,
            drawing_mode: false,
            locks: GestureLocks::empty(),
            _host: PhantomData,
        }
    }

    /// Attaches to the host container and requests the first window.
    ///
    /// The first unit becomes the selection.
    pub fn initialize(&mut self, host: &mut H, container: Size, units: Vec<K>) -> ViewerEvents<K> {
        let mut out = ViewerEvents::new();
        self.engine.initialize(host);
        self.units = units;
        self.view_start = 0;
        self.phase = ViewerPhase::Displaying;
        self.engine
            .update_dimensions(container, self.units.len(), host);
        if let Some(first) = self.units.first().cloned() {
            self.selected = Some(first.clone());
            out.push(ViewerEvent::SelectionChanged(first));
        }
        out.push(ViewerEvent::Display(
            self.begin_display(DisplayReason::Navigation),
        ));
        out
    }

    /// Tears down every page and overlay and detaches from the container.
    pub fn detach(&mut self, host: &mut H) {
        self.engine.detach(host);
        for page in self.pages.drain(..) {
            host.unmount_page(page.page);
        }
        self.overlays
            .drain(|unit, overlays| destroy_overlays(host, unit, overlays));
        self.swipe = None;
        self.settle = None;
        self.pending = None;
        self.phase = ViewerPhase::Uninitialized;
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> ViewerPhase {
        self.phase
    }

    /// The zoom/pan engine.
    #[must_use]
    pub fn engine(&self) -> &ZoomPanEngine {
        &self.engine
    }

    /// Current transform snapshot.
    #[must_use]
    pub fn view_state(&self) -> ViewTransform {
        self.engine.view_state()
    }

    /// All units, in navigation order.
    #[must_use]
    pub fn units(&self) -> &[K] {
        &self.units
    }

    /// Index of the first unit of the canonical window.
    #[must_use]
    pub fn view_start(&self) -> usize {
        self.view_start
    }

    /// Number of pages the canonical window shows.
    #[must_use]
    pub fn visible_page_count(&self) -> usize {
        self.engine
            .viewport()
            .visible_page_count()
            .min(self.units.len())
    }

    /// The selected unit.
    #[must_use]
    pub fn selected_unit(&self) -> Option<&K> {
        self.selected.as_ref()
    }

    /// Units with a mounted page, left to right.
    pub fn displayed_units(&self) -> impl Iterator<Item = &K> {
        self.pages.iter().map(|p| &p.unit)
    }

    /// Units of the canonical window, left to right.
    #[must_use]
    pub fn window_units(&self) -> Vec<K> {
        let n = self.units.len();
        (0..self.visible_page_count())
            .map(|i| self.units[wrap_index((self.view_start + i) as isize, n)].clone())
            .collect()
    }

    /// Returns `true` if `unit` has live overlays.
    #[must_use]
    pub fn has_overlays(&self, unit: &K) -> bool {
        self.overlays.contains(unit)
    }

    /// Saved view of `unit`, if any.
    #[must_use]
    pub fn saved_view(&self, unit: &K) -> Option<ViewTransform> {
        self.views.get(unit)
    }

    /// Active preferences.
    #[must_use]
    pub fn options(&self) -> ViewerOptions {
        self.options
    }

    /// The swipe in progress, if any.
    #[must_use]
    pub fn swipe_session(&self) -> Option<&SwipeSession> {
        self.swipe.as_ref()
    }

    /// Version of the most recent display request.
    #[must_use]
    pub fn display_version(&self) -> u64 {
        self.display_version
    }

    /// Returns `true` while a display request awaits completion.
    #[must_use]
    pub fn is_display_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Replaces the unit list.
    ///
    /// The selection survives if its unit is still listed and the window then
    /// starts at it; otherwise the first unit is selected.
    pub fn set_units(&mut self, units: Vec<K>, host: &mut H) -> ViewerEvents<K> {
        let mut out = ViewerEvents::new();
        if self.phase == ViewerPhase::Uninitialized {
            self.units = units;
            return out;
        }
        self.abandon_swipe(host);
        self.units = units;
        self.views.retain(|unit| self.units.contains(unit));

        let container = self.engine.viewport().container();
        self.engine
            .update_dimensions(container, self.units.len(), host);

        let kept = self
            .selected
            .as_ref()
            .and_then(|s| self.units.iter().position(|u| u == s));
        match kept {
            Some(index) => self.view_start = index,
            None => {
                self.view_start = 0;
                self.selected = self.units.first().cloned();
                if let Some(first) = &self.selected {
                    out.push(ViewerEvent::SelectionChanged(first.clone()));
                }
            }
        }
        out.push(ViewerEvent::Display(
            self.begin_display(DisplayReason::Navigation),
        ));
        out
    }

    /// Selects `unit`, moving the window to start at it if it is not shown.
    pub fn show_unit(&mut self, unit: &K, host: &mut H) -> ViewerEvents<K> {
        let mut out = ViewerEvents::new();
        if self.phase == ViewerPhase::Uninitialized {
            debug!("page viewer used before initialize; ignoring show_unit");
            return out;
        }
        let Some(index) = self.units.iter().position(|u| u == unit) else {
            debug!("show_unit for an unknown unit; ignoring");
            return out;
        };
        if self.selected.as_ref() != Some(unit) {
            self.selected = Some(unit.clone());
            out.push(ViewerEvent::SelectionChanged(unit.clone()));
        }
        if self.window_contains(index) && self.phase == ViewerPhase::Displaying {
            self.update_selection_marks(host);
            return out;
        }
        self.abandon_swipe(host);
        self.remember_view();
        self.view_start = index;
        out.push(ViewerEvent::Display(
            self.begin_display(DisplayReason::Navigation),
        ));
        out
    }

    /// Selects a unit that is already displayed.
    ///
    /// Returns `true` if the selection changed.
    pub fn select_unit(&mut self, unit: &K, host: &mut H) -> bool {
        if self.selected.as_ref() == Some(unit) || !self.pages.iter().any(|p| &p.unit == unit) {
            return false;
        }
        self.selected = Some(unit.clone());
        self.update_selection_marks(host);
        true
    }

    /// Renders the window of `request` if it is still the latest one.
    ///
    /// Returns `false` for a stale request; nothing is touched in that case.
    pub fn complete_display(&mut self, request: &DisplayRequest<K>, host: &mut H) -> bool {
        let reason = match self.pending {
            Some(pending) if pending.version == request.version => pending.reason,
            _ => {
                debug!(
                    version = request.version,
                    current = self.display_version,
                    "discarding stale display completion"
                );
                return false;
            }
        };
        self.pending = None;
        self.render_canonical(host);

        let saved = match reason {
            DisplayReason::Layout => Some(self.engine.view_state()),
            DisplayReason::Navigation | DisplayReason::Swipe => {
                let policy = RestorePolicy::select(
                    self.options.sync_zoom,
                    self.visible_page_count(),
                    reason == DisplayReason::Swipe,
                );
                self.views.resolve(policy, self.units.get(self.view_start))
            }
        };
        self.engine.restore_view_state(saved, host);
        self.sync_swipe_enabled();
        true
    }

    /// Handles a container resize.
    ///
    /// A change of the visible page count requests a new canonical window.
    pub fn handle_resize(&mut self, container: Size, host: &mut H) -> ViewerEvents<K> {
        let mut out = ViewerEvents::new();
        if self.phase == ViewerPhase::Uninitialized {
            return out;
        }
        if self
            .engine
            .handle_resize(container, self.units.len(), host)
        {
            self.abandon_swipe(host);
            out.push(ViewerEvent::Display(
                self.begin_display(DisplayReason::Layout),
            ));
        } else if self.phase == ViewerPhase::Displaying {
            self.reposition_pages(host);
        }
        self.sync_swipe_enabled();
        out
    }

    /// Applies new preferences.
    pub fn set_options(&mut self, options: ViewerOptions, host: &mut H) {
        let layout_changed = options.layout != self.options.layout;
        self.options = options;
        if layout_changed {
            self.engine.set_layout(options.layout, host);
            if self.phase == ViewerPhase::Displaying {
                self.reposition_pages(host);
            }
        }
        self.sync_swipe_enabled();
    }

    /// Turns the drawing mode on or off. Drawing disables swiping.
    pub fn set_drawing_mode(&mut self, drawing: bool) {
        self.drawing_mode = drawing;
        self.sync_swipe_enabled();
    }

    /// Holds or releases the sidebar drag lock.
    pub fn set_menu_drag_lock(&mut self, locked: bool, host: &mut H) -> ViewerEvents<K> {
        self.set_lock(GestureLocks::MENU_DRAG, locked, host)
    }

    /// Holds or releases the picker-open lock.
    pub fn set_picker_lock(&mut self, locked: bool, host: &mut H) -> ViewerEvents<K> {
        self.set_lock(GestureLocks::PICKER_OPEN, locked, host)
    }

    /// One zoom step in, around the container centre.
    pub fn zoom_in(&mut self, host: &mut H) {
        let factor = self.engine.recognizer().config().wheel_zoom_in;
        self.engine.zoom_by(factor, host);
        self.sync_swipe_enabled();
    }

    /// One zoom step out, around the container centre.
    pub fn zoom_out(&mut self, host: &mut H) {
        let factor = self.engine.recognizer().config().wheel_zoom_out;
        self.engine.zoom_by(factor, host);
        self.sync_swipe_enabled();
    }

    /// Fit to the container.
    pub fn reset_view(&mut self, host: &mut H) {
        self.engine.reset_view(host);
    }

    /// Handles a pointer-down.
    pub fn pointer_down(&mut self, input: PointerInput, host: &mut H) -> ViewerEvents<K> {
        let signals = self.engine.pointer_down(input, host);
        self.handle_signals(signals, host)
    }

    /// Handles a pointer-move.
    pub fn pointer_move(&mut self, input: PointerInput, host: &mut H) -> ViewerEvents<K> {
        let signals = self.engine.pointer_move(input, host);
        self.handle_signals(signals, host)
    }

    /// Handles a pointer-up.
    pub fn pointer_up(&mut self, input: PointerInput, host: &mut H) -> ViewerEvents<K> {
        let signals = self.engine.pointer_up(input, host);
        self.handle_signals(signals, host)
    }

    /// Handles a `pointercancel`.
    pub fn pointer_cancel(&mut self, input: PointerInput, host: &mut H) -> ViewerEvents<K> {
        let signals = self.engine.pointer_cancel(input, host);
        self.handle_signals(signals, host)
    }

    /// Handles a wheel event. Returns `true` if it zoomed.
    pub fn wheel(&mut self, input: WheelInput, host: &mut H) -> bool {
        self.engine.wheel(input, host)
    }

    /// Writes a pending pinch transform.
    pub fn on_animation_frame(&mut self, host: &mut H) {
        self.engine.on_animation_frame(host);
    }

    /// Ends the settle animation of a released swipe.
    ///
    /// A committed swipe moves the window and requests a canonical render; a
    /// cancelled one drops the neighbour pages and leaves the window as it
    /// was.
    pub fn finish_swipe(&mut self, host: &mut H) -> ViewerEvents<K> {
        let mut out = ViewerEvents::new();
        if self.phase != ViewerPhase::Settling {
            return out;
        }
        let decision = self.settle.take();
        let session = self.swipe.take();
        self.phase = ViewerPhase::Displaying;

        match (decision, session) {
            (Some(SwipeDecision::Commit { pages, .. }), Some(session)) => {
                self.remember_view();
                let n = self.units.len();
                self.view_start = wrap_index(session.base_start_index() as isize + pages, n);
                trace!(pages, view_start = self.view_start, "swipe committed");

                let window = self.window_units();
                let still_shown = self.selected.as_ref().is_some_and(|s| window.contains(s));
                if !still_shown {
                    let next = if pages > 0 {
                        window.first()
                    } else {
                        window.last()
                    };
                    if let Some(next) = next.cloned() {
                        self.selected = Some(next.clone());
                        out.push(ViewerEvent::SelectionChanged(next));
                    }
                }
                out.push(ViewerEvent::Display(self.begin_display(DisplayReason::Swipe)));
            }
            _ => {
                trace!("swipe cancelled");
                self.restore_window(host);
            }
        }
        self.sync_swipe_enabled();
        out
    }

    fn set_lock(&mut self, lock: GestureLocks, held: bool, host: &mut H) -> ViewerEvents<K> {
        self.locks.set(lock, held);
        let signals = self.engine.set_locks(self.locks, host);
        self.handle_signals(signals, host)
    }

    fn handle_signals(&mut self, signals: EngineSignals, host: &mut H) -> ViewerEvents<K> {
        let mut out = ViewerEvents::new();
        for signal in signals {
            match signal {
                EngineSignal::SwipeStart => self.on_swipe_start(host),
                EngineSignal::SwipeMove { total_dx, .. } => self.on_swipe_move(total_dx, host),
                EngineSignal::SwipeEnd { total_dx, velocity } => {
                    out.extend(self.on_swipe_end(total_dx, velocity, host));
                }
                EngineSignal::SwipeCancel => out.extend(self.on_swipe_cancel(host)),
                EngineSignal::Tap { position } => out.extend(self.on_tap(position, host)),
            }
        }
        out
    }

    fn on_swipe_start(&mut self, host: &mut H) {
        if self.phase != ViewerPhase::Displaying {
            return;
        }
        let session = SwipeSession::new(self.view_start, self.visible_page_count());
        let n = self.units.len();
        for offset in session.adjacent_offsets() {
            self.preload(session.unit_index(offset, n), host);
        }
        self.swipe = Some(session);
        self.phase = ViewerPhase::Swiping;
        self.sync_swipe_enabled();
        trace!(view_start = self.view_start, "swipe started");
    }

    fn on_swipe_move(&mut self, total_dx: f64, host: &mut H) {
        if self.phase != ViewerPhase::Swiping {
            return;
        }
        host.set_swipe_offset(total_dx, None);
        let step = self.geometry().step;
        let n = self.units.len();
        let Some(session) = self.swipe.as_mut() else {
            return;
        };
        if session.update(total_dx, step, n) {
            self.mount_swipe_pages(host);
        }
        let ahead: SmallVec<[usize; 2]> = match &self.swipe {
            Some(s) => s
                .lookahead_offsets()
                .into_iter()
                .map(|o| s.unit_index(o, n))
                .collect(),
            None => SmallVec::new(),
        };
        for index in ahead {
            self.preload(index, host);
        }
    }

    fn on_swipe_end(&mut self, total_dx: f64, velocity: f64, host: &mut H) -> ViewerEvents<K> {
        let mut out = ViewerEvents::new();
        if self.phase != ViewerPhase::Swiping {
            return out;
        }
        let geometry = self.geometry();
        let decision = decide(
            total_dx,
            velocity,
            geometry,
            self.units.len(),
            &self.swipe_config,
        );
        if let Some(session) = self.swipe.as_mut() {
            session.update(total_dx, geometry.step, self.units.len());
        }
        if let SwipeDecision::Commit { pages, .. } = decision {
            self.cover_window_at(pages);
        }
        self.mount_swipe_pages(host);

        let transition = decision.transition(&self.swipe_config);
        host.set_swipe_offset(decision.target_offset(), Some(transition));
        trace!(total_dx, velocity, ?decision, "swipe released");
        self.settle = Some(decision);
        self.phase = ViewerPhase::Settling;
        self.sync_swipe_enabled();
        out.push(ViewerEvent::SettleScheduled {
            duration_ms: transition.duration_ms,
        });
        out
    }

    fn on_swipe_cancel(&mut self, host: &mut H) -> ViewerEvents<K> {
        let mut out = ViewerEvents::new();
        if self.phase != ViewerPhase::Swiping {
            return out;
        }
        let decision = SwipeDecision::Cancel;
        let transition = decision.transition(&self.swipe_config);
        host.set_swipe_offset(0.0, Some(transition));
        self.settle = Some(decision);
        self.phase = ViewerPhase::Settling;
        self.sync_swipe_enabled();
        out.push(ViewerEvent::SettleScheduled {
            duration_ms: transition.duration_ms,
        });
        out
    }

    fn on_tap(&mut self, position: Point, host: &mut H) -> ViewerEvents<K> {
        let mut out = ViewerEvents::new();
        if self.phase != ViewerPhase::Displaying {
            return out;
        }
        let Some(slot) = self.engine.viewport().page_at_view_point(position) else {
            return out;
        };
        let Some(unit) = self
            .pages
            .iter()
            .find(|p| p.offset == slot as isize)
            .map(|p| p.unit.clone())
        else {
            return out;
        };
        if self.select_unit(&unit, host) {
            out.push(ViewerEvent::SelectionChanged(unit));
        }
        out
    }

    /// Makes sure the window the swipe will land on is mounted, as long as
    /// that does not repeat a unit.
    fn cover_window_at(&mut self, pages: isize) {
        let visible = self.visible_page_count() as isize;
        let n = self.units.len() as isize;
        if let Some(session) = self.swipe.as_mut() {
            session.include_range(pages, pages + visible, n);
        }
    }

    fn mount_swipe_pages(&mut self, host: &mut H) {
        let Some(session) = self.swipe.as_ref() else {
            return;
        };
        let n = self.units.len();
        let wanted: Vec<(isize, usize)> = session
            .offsets()
            .iter()
            .map(|&o| (o, session.unit_index(o, n)))
            .collect();

        let mut kept = Vec::with_capacity(wanted.len());
        for page in self.pages.drain(..) {
            if wanted.iter().any(|(o, _)| *o == page.offset) {
                kept.push(page);
            } else {
                host.unmount_page(page.page);
            }
        }
        for (offset, index) in wanted {
            if kept.iter().any(|p| p.offset == offset) {
                continue;
            }
            let unit = self.units[index].clone();
            let left = self.engine.viewport().page_left(offset);
            kept.push(self.mount(host, unit, left, offset));
        }
        kept.sort_by_key(|p| p.offset);
        self.pages = kept;

        let pages = &self.pages;
        self.overlays.retain(
            |unit| pages.iter().any(|p| &p.unit == unit),
            |unit, overlays| destroy_overlays(host, unit, overlays),
        );
    }

    /// Drops swipe neighbours and puts the wrapper back at rest.
    fn restore_window(&mut self, host: &mut H) {
        let visible = self.visible_page_count() as isize;
        let mut kept = Vec::with_capacity(self.pages.len());
        for page in self.pages.drain(..) {
            if (0..visible).contains(&page.offset) {
                kept.push(page);
            } else {
                host.unmount_page(page.page);
            }
        }
        self.pages = kept;
        let pages = &self.pages;
        self.overlays.retain(
            |unit| pages.iter().any(|p| &p.unit == unit),
            |unit, overlays| destroy_overlays(host, unit, overlays),
        );
        host.set_swipe_offset(0.0, None);
    }

    /// Rebuilds the page elements of the canonical window, reusing overlays
    /// of units that stay displayed.
    fn render_canonical(&mut self, host: &mut H) {
        for page in self.pages.drain(..) {
            host.unmount_page(page.page);
        }
        let window = self.window_units();
        self.overlays.retain(
            |unit| window.contains(unit),
            |unit, overlays| destroy_overlays(host, unit, overlays),
        );

        let positions = self.engine.page_positions(window.len());
        for (i, (unit, left)) in window.into_iter().zip(positions).enumerate() {
            let page = self.mount(host, unit, left, i as isize);
            self.pages.push(page);
        }
        self.engine.set_displayed_pages(self.pages.len());
        host.set_swipe_offset(0.0, None);
        trace!(
            view_start = self.view_start,
            pages = self.pages.len(),
            "canonical render"
        );
    }

    fn mount(
        &mut self,
        host: &mut H,
        unit: K,
        left: f64,
        offset: isize,
    ) -> MountedPage<K, H::Page> {
        let overlays = self.overlays.get_or_insert_with(&unit, || Overlays {
            interaction: host.create_interaction(&unit),
            canvas: host.create_canvas(&unit),
        });
        let page = host.mount_page(&unit, left, &overlays.interaction, &overlays.canvas);
        let selected = self.selected.as_ref() == Some(&unit);
        if selected {
            host.set_selected(&page, true);
        }
        MountedPage {
            unit,
            page,
            left,
            offset,
            selected,
        }
    }

    fn reposition_pages(&mut self, host: &mut H) {
        for page in &mut self.pages {
            let left = self.engine.viewport().page_left(page.offset);
            if left != page.left {
                page.left = left;
                host.position_page(&page.page, left);
            }
        }
    }

    fn update_selection_marks(&mut self, host: &mut H) {
        for page in &mut self.pages {
            let selected = self.selected.as_ref() == Some(&page.unit);
            if page.selected != selected {
                page.selected = selected;
                host.set_selected(&page.page, selected);
            }
        }
    }

    fn preload(&self, index: usize, host: &mut H) {
        if let Some(unit) = self.units.get(index)
            && !host.is_loaded(unit)
        {
            host.preload(unit);
        }
    }

    /// Saves the current view before the window moves away.
    fn remember_view(&mut self) {
        let view = self.engine.view_state();
        match self.units.get(self.view_start) {
            Some(unit) if self.visible_page_count() == 1 => self.views.save(unit.clone(), view),
            _ => self.views.save_global(view),
        }
    }

    fn begin_display(&mut self, reason: DisplayReason) -> DisplayRequest<K> {
        self.display_version = self.display_version.wrapping_add(1);
        self.pending = Some(PendingDisplay {
            version: self.display_version,
            reason,
        });
        self.sync_swipe_enabled();
        DisplayRequest {
            version: self.display_version,
            units: self.window_units(),
        }
    }

    /// Drops a swipe overtaken by navigation or a layout change.
    fn abandon_swipe(&mut self, host: &mut H) {
        let had_swipe = self.swipe.take().is_some();
        let had_settle = self.settle.take().is_some();
        if had_swipe || had_settle {
            debug!("swipe abandoned");
            host.set_swipe_offset(0.0, None);
        }
        if matches!(self.phase, ViewerPhase::Swiping | ViewerPhase::Settling) {
            self.phase = ViewerPhase::Displaying;
        }
    }

    fn window_contains(&self, index: usize) -> bool {
        let n = self.units.len();
        if n == 0 {
            return false;
        }
        let relative = wrap_index(index as isize - self.view_start as isize, n);
        relative < self.visible_page_count()
    }

    fn geometry(&self) -> SwipeGeometry {
        let viewport = self.engine.viewport();
        let scale = viewport.scale();
        SwipeGeometry {
            page_width: viewport.config().page_size.width * scale,
            step: viewport.page_step() * scale,
        }
    }

    fn swipe_allowed(&self) -> bool {
        self.options.swipe_enabled
            && !self.drawing_mode
            && self.units.len() > self.visible_page_count()
            && self.phase == ViewerPhase::Displaying
            && self.pending.is_none()
    }

    fn sync_swipe_enabled(&mut self) {
        let allowed = self.swipe_allowed();
        self.engine.set_swipe_enabled(allowed);
    }
}

fn destroy_overlays<K, H: PageHost<K>>(
    host: &mut H,
    unit: K,
    overlays: Overlays<H::Interaction, H::Canvas>,
) {
    host.destroy_interaction(&unit, overlays.interaction);
    host.destroy_canvas(&unit, overlays.canvas);
}
