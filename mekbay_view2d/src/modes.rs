// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// How pages are laid out horizontally inside the content strip.
///
/// This is consulted by [`crate::PageViewport::page_positions`] and by pan
/// clamping, which needs the unscaled content width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PageLayout {
    /// Pages sit next to each other separated by the configured gap.
    ///
    /// Page `i` starts at `i * (page_width + gap)`.
    #[default]
    Packed,
    /// Leftover container width at minimum zoom is split into equal gaps,
    /// including one before the first page and one after the last.
    ///
    /// Positions are derived at minimum zoom only, so zooming in does not
    /// shift pages relative to each other.
    SpaceEvenly,
}
