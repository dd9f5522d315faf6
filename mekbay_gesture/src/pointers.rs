// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Active pointer tracking: per-pointer movement deltas and total offsets.
//!
//! ## Usage
//!
//! 1) Register a pointer with [`PointerSet::press`] at its initial position.
//! 2) On each move, call [`PointerSet::update`] to get the delta since the last update.
//! 3) Optionally call [`PointerSet::total_offset`] to get the offset from where it went down.
//! 4) Drop the pointer with [`PointerSet::release`].
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use mekbay_gesture::{PointerId, PointerSet};
//!
//! let mut pointers = PointerSet::default();
//! let id = PointerId(1);
//!
//! pointers.press(id, Point::new(10.0, 20.0));
//! assert_eq!(pointers.len(), 1);
//!
//! let delta = pointers.update(id, Point::new(15.0, 25.0)).unwrap();
//! assert_eq!((delta.x, delta.y), (5.0, 5.0));
//!
//! let total = pointers.total_offset(id).unwrap();
//! assert_eq!((total.x, total.y), (5.0, 5.0));
//! ```

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

/// Identifier of a DOM pointer (`PointerEvent.pointerId`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub i32);

/// One pointer that is currently down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedPointer {
    /// Pointer identifier.
    pub id: PointerId,
    /// Position where tracking started (pointer-down or the last re-baseline).
    pub start: Point,
    /// Last recorded position.
    pub last: Point,
}

impl TrackedPointer {
    fn new(id: PointerId, pos: Point) -> Self {
        Self {
            id,
            start: pos,
            last: pos,
        }
    }
}

/// The (at most two) pointers taking part in the current gesture.
///
/// Further pointers are ignored; a third finger never changes the gesture.
#[derive(Clone, Debug, Default)]
pub struct PointerSet {
    pointers: SmallVec<[TrackedPointer; 2]>,
}

impl PointerSet {
    /// Maximum number of tracked pointers.
    pub const CAPACITY: usize = 2;

    /// Number of tracked pointers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    /// Returns `true` when no pointer is down.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// Returns `true` if `id` is tracked.
    #[must_use]
    pub fn contains(&self, id: PointerId) -> bool {
        self.pointers.iter().any(|p| p.id == id)
    }

    /// Looks up a tracked pointer.
    #[must_use]
    pub fn get(&self, id: PointerId) -> Option<&TrackedPointer> {
        self.pointers.iter().find(|p| p.id == id)
    }

    /// Iterates over tracked pointers in press order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackedPointer> {
        self.pointers.iter()
    }

    /// Starts tracking `id` at `pos`.
    ///
    /// Returns `false` (and tracks nothing) when the set is full or the
    /// pointer is already tracked.
    pub fn press(&mut self, id: PointerId, pos: Point) -> bool {
        if self.pointers.len() >= Self::CAPACITY || self.contains(id) {
            return false;
        }
        self.pointers.push(TrackedPointer::new(id, pos));
        true
    }

    /// Records a new position, returning the delta since the last update.
    pub fn update(&mut self, id: PointerId, pos: Point) -> Option<Vec2> {
        let p = self.pointers.iter_mut().find(|p| p.id == id)?;
        let delta = pos - p.last;
        p.last = pos;
        Some(delta)
    }

    /// Offset of `id` from where its tracking started.
    #[must_use]
    pub fn total_offset(&self, id: PointerId) -> Option<Vec2> {
        self.get(id).map(|p| p.last - p.start)
    }

    /// Stops tracking `id`. Returns `true` if it was tracked.
    pub fn release(&mut self, id: PointerId) -> bool {
        let before = self.pointers.len();
        self.pointers.retain(|p| p.id != id);
        self.pointers.len() != before
    }

    /// Makes every pointer's current position its new start position.
    pub fn rebaseline(&mut self) {
        for p in &mut self.pointers {
            p.start = p.last;
        }
    }

    /// Drops every pointer, returning their ids.
    pub fn clear(&mut self) -> SmallVec<[PointerId; 2]> {
        self.pointers.drain(..).map(|p| p.id).collect()
    }

    /// Midpoint and distance of the two tracked pointers.
    #[must_use]
    pub fn pair_geometry(&self) -> Option<(Point, f64)> {
        match self.pointers.as_slice() {
            [a, b] => Some((a.last.midpoint(b.last), a.last.distance(b.last))),
            _ => None,
        }
    }
}
