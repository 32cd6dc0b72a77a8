// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A pixel-free backend that records every call, for unit tests.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::backend::{AlphaMode, Backend, Color, SurfaceId};
use crate::damage::DamageRegion;
use crate::rect::{Point, Rect, Size};

/// One recorded backend call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Op {
    Create {
        surface: SurfaceId,
        size: Size,
        alpha: AlphaMode,
    },
    Destroy {
        surface: SurfaceId,
    },
    SetColorkey {
        surface: SurfaceId,
        key: Option<Color>,
    },
    Fill {
        surface: SurfaceId,
        rect: Rect,
        color: Color,
    },
    Blit {
        dst: SurfaceId,
        src: SurfaceId,
        dest: Point,
        region: Rect,
    },
    Present {
        surface: SurfaceId,
        damage: DamageRegion,
    },
}

#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    surfaces: BTreeMap<SurfaceId, Size>,
    next_id: u32,
    ops: Vec<Op>,
}

impl RecordingBackend {
    pub(crate) fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub(crate) fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Number of surfaces currently allocated.
    pub(crate) fn live_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    /// Surfaces presented so far, in order.
    pub(crate) fn presents(&self) -> Vec<SurfaceId> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Present { surface, .. } => Some(*surface),
                _ => None,
            })
            .collect()
    }
}

impl Backend for RecordingBackend {
    fn create_surface(&mut self, size: Size, alpha: AlphaMode) -> SurfaceId {
        let surface = SurfaceId(self.next_id);
        self.next_id += 1;
        self.surfaces.insert(surface, size);
        self.ops.push(Op::Create {
            surface,
            size,
            alpha,
        });
        surface
    }

    fn destroy_surface(&mut self, surface: SurfaceId) {
        self.surfaces.remove(&surface);
        self.ops.push(Op::Destroy { surface });
    }

    fn set_colorkey(&mut self, surface: SurfaceId, key: Option<Color>) {
        self.ops.push(Op::SetColorkey { surface, key });
    }

    fn fill(&mut self, surface: SurfaceId, rect: Rect, color: Color) {
        self.ops.push(Op::Fill {
            surface,
            rect,
            color,
        });
    }

    fn blit(&mut self, dst: SurfaceId, src: SurfaceId, dest: Point, region: Rect) {
        self.ops.push(Op::Blit {
            dst,
            src,
            dest,
            region,
        });
    }

    fn present(&mut self, surface: SurfaceId, damage: &DamageRegion) {
        self.ops.push(Op::Present {
            surface,
            damage: damage.clone(),
        });
    }
}
