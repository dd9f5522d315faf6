// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity-keyed cache of per-page overlays.
//!
//! Every displayed unit owns one interaction service and one drawing canvas.
//! They survive re-renders for as long as the unit stays in the kept set, so a
//! window that shifts by one page keeps the overlays of the pages it shares
//! with the old window. Nothing is evicted implicitly: entries only leave
//! through [`OverlayCache::retain`] or [`OverlayCache::drain`].

use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;

/// The overlays of one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overlays<I, C> {
    /// Per-page interaction service.
    pub interaction: I,
    /// Per-page drawing canvas.
    pub canvas: C,
}

/// Map from unit identity to its overlays.
pub struct OverlayCache<K, I, C> {
    entries: HashMap<K, Overlays<I, C>>,
}

impl<K, I, C> fmt::Debug for OverlayCache<K, I, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayCache")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<K, I, C> Default for OverlayCache<K, I, C> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, I, C> OverlayCache<K, I, C> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of units with live overlays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no overlays are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `unit` has live overlays.
    #[must_use]
    pub fn contains(&self, unit: &K) -> bool {
        self.entries.contains_key(unit)
    }

    /// Overlays of `unit`, created with `create` when missing.
    pub fn get_or_insert_with(
        &mut self,
        unit: &K,
        create: impl FnOnce() -> Overlays<I, C>,
    ) -> &Overlays<I, C> {
        self.entries.entry(unit.clone()).or_insert_with(create)
    }

    /// Evicts every unit for which `keep` returns `false`, handing each
    /// evicted entry to `destroy`.
    pub fn retain(
        &mut self,
        mut keep: impl FnMut(&K) -> bool,
        mut destroy: impl FnMut(K, Overlays<I, C>),
    ) {
        for (unit, overlays) in self.entries.extract_if(|unit, _| !keep(unit)) {
            destroy(unit, overlays);
        }
    }

    /// Evicts everything.
    pub fn drain(&mut self, mut destroy: impl FnMut(K, Overlays<I, C>)) {
        for (unit, overlays) in self.entries.drain() {
            destroy(unit, overlays);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{OverlayCache, Overlays};

    fn make(id: u32) -> Overlays<u32, u32> {
        Overlays {
            interaction: id,
            canvas: id + 100,
        }
    }

    #[test]
    fn existing_entry_is_reused() {
        let mut cache = OverlayCache::new();
        cache.get_or_insert_with(&"a", || make(1));
        let again = cache.get_or_insert_with(&"a", || make(2));
        assert_eq!(again.interaction, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn retain_destroys_only_units_outside_kept_set() {
        let mut cache = OverlayCache::new();
        for (unit, id) in [("a", 1), ("b", 2), ("c", 3)] {
            cache.get_or_insert_with(&unit, || make(id));
        }
        let mut destroyed = Vec::new();
        cache.retain(|u| *u != "a", |u, o| destroyed.push((u, o.interaction)));
        assert_eq!(destroyed, [("a", 1)]);
        assert!(cache.contains(&"b"));
        assert!(cache.contains(&"c"));

        let mut rest = Vec::new();
        cache.drain(|u, _| rest.push(u));
        rest.sort_unstable();
        assert_eq!(rest, ["b", "c"]);
        assert!(cache.is_empty());
    }
}
