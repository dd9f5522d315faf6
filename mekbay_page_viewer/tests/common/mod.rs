// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A recording host that stands in for the DOM.

#![allow(dead_code, reason = "not every test binary uses every helper")]

use std::collections::{BTreeMap, HashSet};

use kurbo::{Point, Size};
use mekbay_gesture::{PointerId, PointerInput, TargetFlags};
use mekbay_page_viewer::{
    DisplayRequest, PageHost, RenderError, Transition, ViewRenderer, ViewerEvent, ViewerEvents,
};
use mekbay_view2d::ViewTransform;

pub type Unit = u32;

/// Handle of a mounted page element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PageEl(pub u32);

/// Handle of an interaction service instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InteractionId(pub u32);

/// Handle of a canvas overlay instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CanvasId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mounted {
    pub unit: Unit,
    pub left: f64,
    pub interaction: InteractionId,
    pub canvas: CanvasId,
    pub selected: bool,
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    next_id: u32,
    pub transforms: Vec<ViewTransform>,
    pub swipe_offsets: Vec<(f64, Option<Transition>)>,
    pub frame_requests: usize,
    pub captured: Vec<PointerId>,
    pub released: Vec<PointerId>,
    pub reject_capture: bool,
    pub mounted: BTreeMap<u32, Mounted>,
    pub created_interactions: Vec<(Unit, InteractionId)>,
    pub destroyed_interactions: Vec<(Unit, InteractionId)>,
    pub destroyed_canvases: Vec<(Unit, CanvasId)>,
    pub loaded: HashSet<Unit>,
    pub preloaded: Vec<Unit>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Units of mounted pages, ordered by their left edge.
    pub fn mounted_units(&self) -> Vec<Unit> {
        let mut pages: Vec<&Mounted> = self.mounted.values().collect();
        pages.sort_by(|a, b| a.left.total_cmp(&b.left));
        pages.iter().map(|m| m.unit).collect()
    }

    /// Interaction service currently attached to `unit`'s page.
    pub fn interaction_of(&self, unit: Unit) -> Option<InteractionId> {
        self.mounted
            .values()
            .find(|m| m.unit == unit)
            .map(|m| m.interaction)
    }

    pub fn selected_units(&self) -> Vec<Unit> {
        self.mounted
            .values()
            .filter(|m| m.selected)
            .map(|m| m.unit)
            .collect()
    }

    pub fn last_transform(&self) -> Option<ViewTransform> {
        self.transforms.last().copied()
    }

    pub fn last_swipe_offset(&self) -> Option<(f64, Option<Transition>)> {
        self.swipe_offsets.last().copied()
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl ViewRenderer for RecordingHost {
    fn apply_transform(&mut self, view: ViewTransform) {
        self.transforms.push(view);
    }

    fn set_swipe_offset(&mut self, dx: f64, transition: Option<Transition>) {
        self.swipe_offsets.push((dx, transition));
    }

    fn request_animation_frame(&mut self) {
        self.frame_requests += 1;
    }

    fn capture_pointer(&mut self, id: PointerId) -> Result<(), RenderError> {
        if self.reject_capture {
            return Err(RenderError::CaptureRejected(id));
        }
        self.captured.push(id);
        Ok(())
    }

    fn release_pointer(&mut self, id: PointerId) -> Result<(), RenderError> {
        self.released.push(id);
        Ok(())
    }
}

impl PageHost<Unit> for RecordingHost {
    type Page = PageEl;
    type Interaction = InteractionId;
    type Canvas = CanvasId;

    fn mount_page(
        &mut self,
        unit: &Unit,
        left: f64,
        interaction: &InteractionId,
        canvas: &CanvasId,
    ) -> PageEl {
        let id = self.next();
        self.mounted.insert(
            id,
            Mounted {
                unit: *unit,
                left,
                interaction: *interaction,
                canvas: *canvas,
                selected: false,
            },
        );
        PageEl(id)
    }

    fn position_page(&mut self, page: &PageEl, left: f64) {
        if let Some(m) = self.mounted.get_mut(&page.0) {
            m.left = left;
        }
    }

    fn unmount_page(&mut self, page: PageEl) {
        self.mounted.remove(&page.0);
    }

    fn create_interaction(&mut self, unit: &Unit) -> InteractionId {
        let id = InteractionId(self.next());
        self.created_interactions.push((*unit, id));
        id
    }

    fn destroy_interaction(&mut self, unit: &Unit, interaction: InteractionId) {
        self.destroyed_interactions.push((*unit, interaction));
    }

    fn create_canvas(&mut self, _unit: &Unit) -> CanvasId {
        CanvasId(self.next())
    }

    fn destroy_canvas(&mut self, unit: &Unit, canvas: CanvasId) {
        self.destroyed_canvases.push((*unit, canvas));
    }

    fn set_selected(&mut self, page: &PageEl, selected: bool) {
        if let Some(m) = self.mounted.get_mut(&page.0) {
            m.selected = selected;
        }
    }

    fn is_loaded(&self, unit: &Unit) -> bool {
        self.loaded.contains(unit)
    }

    fn preload(&mut self, unit: &Unit) {
        self.preloaded.push(*unit);
        self.loaded.insert(*unit);
    }
}

/// The display request among `events`, if any.
pub fn display_request(events: &ViewerEvents<Unit>) -> Option<DisplayRequest<Unit>> {
    events.iter().find_map(|e| match e {
        ViewerEvent::Display(request) => Some(request.clone()),
        _ => None,
    })
}

/// The settle duration among `events`, if any.
pub fn settle_duration(events: &ViewerEvents<Unit>) -> Option<u32> {
    events.iter().find_map(|e| match e {
        ViewerEvent::SettleScheduled { duration_ms } => Some(*duration_ms),
        _ => None,
    })
}

/// The new selection among `events`, if any.
pub fn selection(events: &ViewerEvents<Unit>) -> Option<Unit> {
    events.iter().find_map(|e| match e {
        ViewerEvent::SelectionChanged(unit) => Some(*unit),
        _ => None,
    })
}

pub fn ptr(id: i32, x: f64, y: f64, t: u64) -> PointerInput {
    PointerInput::new(PointerId(id), Point::new(x, y), t)
}

pub fn on_page(id: i32, x: f64, y: f64, t: u64) -> PointerInput {
    ptr(id, x, y, t).with_target(TargetFlags::ON_PAGE)
}

pub fn size(w: f64, h: f64) -> Size {
    Size::new(w, h)
}
