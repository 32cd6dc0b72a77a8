// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU pixel-buffer backend for `lamina_core`.
//!
//! [`SoftBackend`] keeps every surface as an [`RgbaImage`] and implements the
//! [`Backend`] contract in software:
//!
//! - `fill` overwrites pixels, alpha included.
//! - `blit` from an [`AlphaMode::Opaque`] source copies pixels, skipping
//!   those whose RGB matches the source's colorkey. A
//!   [`AlphaMode::PerPixel`] source is blended source-over.
//! - `present` copies the damaged regions of the root surface into a
//!   separate frame image, standing in for the visible display target.
//!
//! Every region is clipped to the surfaces involved. Operations on unknown
//! surface ids do nothing.

use image::{Pixel, Rgba, RgbaImage};
use lamina_core::backend::{AlphaMode, Backend, Color, SurfaceId};
use lamina_core::damage::DamageRegion;
use lamina_core::rect::{Point, Rect, Size};

struct Surface {
    pixels: RgbaImage,
    alpha: AlphaMode,
    colorkey: Option<Color>,
}

/// A [`Backend`] over in-memory RGBA images.
pub struct SoftBackend {
    surfaces: Vec<Option<Surface>>,
    frame: RgbaImage,
    presents: u64,
    last_damage: Option<DamageRegion>,
}

impl core::fmt::Debug for SoftBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SoftBackend")
            .field("surfaces", &self.surface_count())
            .field("frame", &self.frame.dimensions())
            .field("presents", &self.presents)
            .field("last_damage", &self.last_damage)
            .finish()
    }
}

impl Default for SoftBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftBackend {
    /// Creates a backend with no surfaces and an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            surfaces: Vec::new(),
            frame: RgbaImage::new(0, 0),
            presents: 0,
            last_damage: None,
        }
    }

    /// Returns the pixels of a surface.
    #[must_use]
    pub fn surface(&self, id: SurfaceId) -> Option<&RgbaImage> {
        self.get(id).map(|s| &s.pixels)
    }

    /// Returns the number of live surfaces.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.iter().flatten().count()
    }

    /// Returns the last presented frame.
    #[must_use]
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    /// Returns the frame pixel at `p`, or `None` outside the frame.
    #[must_use]
    pub fn frame_pixel(&self, p: Point) -> Option<Color> {
        pixel_at(&self.frame, p)
    }

    /// Returns the pixel of a surface at `p`.
    #[must_use]
    pub fn surface_pixel(&self, id: SurfaceId, p: Point) -> Option<Color> {
        pixel_at(&self.get(id)?.pixels, p)
    }

    /// Returns how many times [`present`](Backend::present) ran.
    #[must_use]
    pub fn present_count(&self) -> u64 {
        self.presents
    }

    /// Returns the damage passed to the most recent present.
    #[must_use]
    pub fn last_damage(&self) -> Option<&DamageRegion> {
        self.last_damage.as_ref()
    }

    fn get(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.0 as usize)?.as_ref()
    }

    fn get_mut(&mut self, id: SurfaceId) -> Option<&mut Surface> {
        self.surfaces.get_mut(id.0 as usize)?.as_mut()
    }
}

impl Backend for SoftBackend {
    fn create_surface(&mut self, size: Size, alpha: AlphaMode) -> SurfaceId {
        let surface = Surface {
            pixels: RgbaImage::new(size.w.max(0).unsigned_abs(), size.h.max(0).unsigned_abs()),
            alpha,
            colorkey: None,
        };
        let slot = match self.surfaces.iter().position(Option::is_none) {
            Some(free) => {
                self.surfaces[free] = Some(surface);
                free
            }
            None => {
                self.surfaces.push(Some(surface));
                self.surfaces.len() - 1
            }
        };
        SurfaceId(u32::try_from(slot).unwrap_or(u32::MAX))
    }

    fn destroy_surface(&mut self, surface: SurfaceId) {
        if let Some(slot) = self.surfaces.get_mut(surface.0 as usize) {
            *slot = None;
        }
    }

    fn set_colorkey(&mut self, surface: SurfaceId, key: Option<Color>) {
        if let Some(s) = self.get_mut(surface) {
            s.colorkey = key;
        }
    }

    fn fill(&mut self, surface: SurfaceId, region: Rect, color: Color) {
        let Some(s) = self.get_mut(surface) else {
            return;
        };
        let Some(area) = clip(region, &s.pixels) else {
            return;
        };
        let px = rgba(color);
        for (x, y) in coords(area) {
            s.pixels.put_pixel(x, y, px);
        }
    }

    fn blit(&mut self, dst: SurfaceId, src: SurfaceId, dest: Point, src_region: Rect) {
        if dst == src {
            return;
        }
        let Some(source) = self.surfaces.get_mut(src.0 as usize).and_then(Option::take) else {
            return;
        };
        if let Some(target) = self.get_mut(dst) {
            blit_into(target, &source, dest, src_region);
        }
        self.surfaces[src.0 as usize] = Some(source);
    }

    fn present(&mut self, surface: SurfaceId, damage: &DamageRegion) {
        let Some(Some(s)) = self.surfaces.get(surface.0 as usize) else {
            return;
        };
        let root = &s.pixels;
        let full = self.frame.dimensions() != root.dimensions();
        if full {
            self.frame = root.clone();
        } else {
            match damage {
                DamageRegion::Full => self.frame.clone_from(root),
                DamageRegion::Rects(rects) => {
                    for rect in rects {
                        let Some(area) = clip(*rect, root) else {
                            continue;
                        };
                        for (x, y) in coords(area) {
                            self.frame.put_pixel(x, y, *root.get_pixel(x, y));
                        }
                    }
                }
                DamageRegion::None => {}
            }
        }
        self.presents += 1;
        self.last_damage = Some(damage.clone());
    }
}

// ---------------------------------------------------------------------------
// Pixel helpers
// ---------------------------------------------------------------------------

fn rgba(c: Color) -> Rgba<u8> {
    Rgba([c.r, c.g, c.b, c.a])
}

fn pixel_at(img: &RgbaImage, p: Point) -> Option<Color> {
    let x = u32::try_from(p.x).ok()?;
    let y = u32::try_from(p.y).ok()?;
    let Rgba([r, g, b, a]) = *img.get_pixel_checked(x, y)?;
    Some(Color::rgba(r, g, b, a))
}

fn bounds(img: &RgbaImage) -> Rect {
    let (w, h) = img.dimensions();
    Rect::new(
        0,
        0,
        i32::try_from(w).unwrap_or(i32::MAX),
        i32::try_from(h).unwrap_or(i32::MAX),
    )
}

/// Clips `region` to the image. `None` if nothing remains.
fn clip(region: Rect, img: &RgbaImage) -> Option<Rect> {
    region.intersect(&bounds(img)).filter(|r| !r.is_empty())
}

/// Pixel coordinates of a non-negative rectangle, row by row.
fn coords(area: Rect) -> impl Iterator<Item = (u32, u32)> {
    let (x0, y0) = (area.x.unsigned_abs(), area.y.unsigned_abs());
    let (w, h) = (area.w.unsigned_abs(), area.h.unsigned_abs());
    (y0..y0 + h).flat_map(move |y| (x0..x0 + w).map(move |x| (x, y)))
}

fn blit_into(target: &mut Surface, source: &Surface, dest: Point, src_region: Rect) {
    let Some(from) = clip(src_region, &source.pixels) else {
        return;
    };
    // Shift the destination by whatever clipping removed from the source.
    let to = Rect::new(dest.x, dest.y, from.w, from.h).translate(from.pos() - src_region.pos());
    let Some(to_clipped) = clip(to, &target.pixels) else {
        return;
    };
    let delta = from.pos() - to.pos();
    let key = source.colorkey.map(rgba);

    for (x, y) in coords(to_clipped) {
        let sx = (i64::from(x) + i64::from(delta.x)).unsigned_abs();
        let sy = (i64::from(y) + i64::from(delta.y)).unsigned_abs();
        let (Ok(sx), Ok(sy)) = (u32::try_from(sx), u32::try_from(sy)) else {
            continue;
        };
        let src_px = *source.pixels.get_pixel(sx, sy);
        match source.alpha {
            AlphaMode::Opaque => {
                if key.is_some_and(|k| k.to_rgb() == src_px.to_rgb()) {
                    continue;
                }
                target.pixels.put_pixel(x, y, src_px);
            }
            AlphaMode::PerPixel => match src_px[3] {
                0 => {}
                255 => target.pixels.put_pixel(x, y, src_px),
                _ => target.pixels.get_pixel_mut(x, y).blend(&src_px),
            },
        }
    }
}
