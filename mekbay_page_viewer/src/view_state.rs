// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Saved view transforms, per unit and global.

use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use mekbay_view2d::ViewTransform;

/// Which saved view a canonical render restores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestorePolicy {
    /// The unit's own saved view.
    PerUnit,
    /// The view shared across all sheets.
    Global,
}

impl RestorePolicy {
    /// Chooses the policy for a canonical render.
    ///
    /// Only a single visible sheet reached by something other than a swipe,
    /// with zoom syncing off, gets its own saved view back.
    #[must_use]
    pub fn select(sync_zoom: bool, visible_pages: usize, swipe_driven: bool) -> Self {
        if !sync_zoom && visible_pages == 1 && !swipe_driven {
            Self::PerUnit
        } else {
            Self::Global
        }
    }
}

/// Single-writer store of saved views.
///
/// Views are written when the viewer navigates away from a window and read
/// back by the next canonical render.
pub struct ViewStateStore<K> {
    per_unit: HashMap<K, ViewTransform>,
    last_global: Option<ViewTransform>,
}

impl<K> fmt::Debug for ViewStateStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewStateStore")
            .field("saved_units", &self.per_unit.len())
            .field("last_global", &self.last_global)
            .finish()
    }
}

impl<K> Default for ViewStateStore<K> {
    fn default() -> Self {
        Self {
            per_unit: HashMap::new(),
            last_global: None,
        }
    }
}

impl<K: Eq + Hash> ViewStateStore<K> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved view of `unit`.
    #[must_use]
    pub fn get(&self, unit: &K) -> Option<ViewTransform> {
        self.per_unit.get(unit).copied()
    }

    /// Most recent view of any window.
    #[must_use]
    pub fn last_global(&self) -> Option<ViewTransform> {
        self.last_global
    }

    /// Saves the view of `unit` and makes it the global view too.
    pub fn save(&mut self, unit: K, view: ViewTransform) {
        if view.is_restorable() {
            self.per_unit.insert(unit, view);
            self.last_global = Some(view);
        }
    }

    /// Updates only the global view.
    pub fn save_global(&mut self, view: ViewTransform) {
        if view.is_restorable() {
            self.last_global = Some(view);
        }
    }

    /// View to restore under `policy`. `None` means reset to fit.
    #[must_use]
    pub fn resolve(&self, policy: RestorePolicy, unit: Option<&K>) -> Option<ViewTransform> {
        match policy {
            RestorePolicy::PerUnit => unit.and_then(|u| self.get(u)),
            RestorePolicy::Global => self.last_global,
        }
    }

    /// Keeps saved views only for units `keep` accepts.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.per_unit.retain(|unit, _| keep(unit));
    }
}
