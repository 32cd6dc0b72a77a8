// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for pixel-surface integrations.
//!
//! The scene never touches pixels itself. Everything it needs from a
//! rendering backend is covered by the [`Backend`] trait:
//!
//! - **Allocation** of surfaces sized to a node, with or without per-pixel
//!   alpha.
//! - **Colorkey** configuration, so that cleared areas of a surface do not
//!   cover what lies beneath when it is blitted.
//! - **Fill** and **blit** of rectangular regions.
//! - **Present** of the root surface to the visible display target.
//!
//! # Crate boundaries
//!
//! `lamina_core` owns the node tree, the dirty tracker and the compositor.
//! Backend crates depend on `lamina_core` and implement [`Backend`]
//! (for example `lamina_backend_soft` on top of CPU pixel buffers).

use core::fmt;

use crate::damage::DamageRegion;
use crate::rect::{Point, Rect, Size};

/// An opaque reference to a backend-owned pixel surface.
///
/// Surface ids are assigned by the backend; core code passes them through
/// without interpreting the value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u32);

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({})", self.0)
    }
}

/// How a surface stores and blends alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlphaMode {
    /// No alpha channel. Blits copy pixels, skipping the colorkey.
    Opaque,
    /// Per-pixel alpha. Blits composite source-over.
    PerPixel,
}

/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha (255 is fully opaque).
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color with explicit alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Pixel operations a rendering backend provides to the compositor.
///
/// Every region is expressed in the local coordinates of the surface it
/// applies to. Implementations clip regions to surface bounds and ignore
/// unknown surface ids.
pub trait Backend {
    /// Allocates a surface of the given size.
    fn create_surface(&mut self, size: Size, alpha: AlphaMode) -> SurfaceId;

    /// Releases a surface. The id must not be used afterwards.
    fn destroy_surface(&mut self, surface: SurfaceId);

    /// Sets (or clears) the color treated as "no pixel" when `surface` is
    /// used as a blit source.
    fn set_colorkey(&mut self, surface: SurfaceId, key: Option<Color>);

    /// Fills `region` of `surface` with `color`, replacing what was there.
    fn fill(&mut self, surface: SurfaceId, region: Rect, color: Color);

    /// Copies `src_region` of `src` into `dst` with its top-left corner at
    /// `dest`, honoring the source's colorkey and alpha mode.
    fn blit(&mut self, dst: SurfaceId, src: SurfaceId, dest: Point, src_region: Rect);

    /// Shows `surface` on the visible display target. `damage` lists the
    /// areas that changed since the previous present.
    fn present(&mut self, surface: SurfaceId, damage: &DamageRegion);
}
