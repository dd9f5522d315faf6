// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Vec2};

/// Scale + translate snapshot of a page viewer.
///
/// Content coordinates map to container coordinates as
/// `view = content * scale + translate`, which is what the DOM adapter writes
/// as `translate(tx, ty) scale(s)` with a `0 0` transform origin.
///
/// This is also the "saved view" persisted per unit when the viewer
/// navigates away from it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Uniform zoom factor.
    pub scale: f64,
    /// Offset of the content origin inside the container, in container pixels.
    pub translate: Vec2,
}

impl ViewTransform {
    /// Scale `1.0`, no translation.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate: Vec2::ZERO,
    };

    /// Creates a transform from a scale and translate components.
    #[must_use]
    pub const fn new(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale,
            translate: Vec2::new(translate_x, translate_y),
        }
    }

    /// Content → container affine transform.
    #[must_use]
    pub fn to_affine(self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }

    /// Maps a point in content space into container space.
    #[must_use]
    pub fn apply(self, pt: Point) -> Point {
        Point::new(
            pt.x * self.scale + self.translate.x,
            pt.y * self.scale + self.translate.y,
        )
    }

    /// Returns `true` when the transform can be restored.
    ///
    /// Snapshots with a non-positive or non-finite scale are treated as "no
    /// saved view".
    #[must_use]
    pub fn is_restorable(self) -> bool {
        self.scale.is_finite()
            && self.scale > 0.0
            && self.translate.x.is_finite()
            && self.translate.y.is_finite()
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
