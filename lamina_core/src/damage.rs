// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage regions reported to the backend on present.

use alloc::vec::Vec;

use crate::rect::Rect;

/// A region of the root surface that was redrawn this frame.
///
/// Backends can use this to limit the copy to the visible display target to
/// the areas that actually changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DamageRegion {
    /// The entire surface was redrawn.
    #[default]
    Full,
    /// A list of rectangles, in root-local coordinates.
    Rects(Vec<Rect>),
    /// Nothing changed; the previous frame can be reused.
    None,
}

impl DamageRegion {
    /// Returns `true` if no region needs presenting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Merges another damage region into this one.
    pub fn merge(&mut self, other: &Self) {
        match (&*self, other) {
            (Self::Full, _) | (_, Self::Full) => *self = Self::Full,
            (Self::None, _) => *self = other.clone(),
            (_, Self::None) => {}
            (Self::Rects(a), Self::Rects(b)) => {
                let mut merged = a.clone();
                merged.extend(b.iter().filter(|r| !a.contains(r)));
                *self = Self::Rects(merged);
            }
        }
    }

    /// Returns the total area covered by the listed rectangles (overlaps are
    /// counted twice), or `None` for [`Full`](Self::Full).
    #[must_use]
    pub fn rect_area(&self) -> Option<i64> {
        match self {
            Self::Full => None,
            Self::Rects(rects) => Some(rects.iter().map(Rect::area).sum()),
            Self::None => Some(0),
        }
    }
}
