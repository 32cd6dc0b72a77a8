// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A backend that draws nothing, for building real trees in tests.

use lamina_core::{
    AlphaMode, App, Backend, Color, DamageRegion, Group, NodeDesc, Opacity, Point, Rect, Size,
    SurfaceId,
};

#[derive(Debug, Default)]
pub(crate) struct NullBackend {
    next: u32,
}

impl Backend for NullBackend {
    fn create_surface(&mut self, _: Size, _: AlphaMode) -> SurfaceId {
        self.next += 1;
        SurfaceId(self.next)
    }

    fn destroy_surface(&mut self, _: SurfaceId) {}

    fn set_colorkey(&mut self, _: SurfaceId, _: Option<Color>) {}

    fn fill(&mut self, _: SurfaceId, _: Rect, _: Color) {}

    fn blit(&mut self, _: SurfaceId, _: SurfaceId, _: Point, _: Rect) {}

    fn present(&mut self, _: SurfaceId, _: &DamageRegion) {}
}

/// An 8x8 opaque root.
pub(crate) fn app() -> App<NullBackend> {
    App::new(
        NullBackend::default(),
        NodeDesc::new(8, 8).opacity(Opacity::Opaque),
        Group,
    )
    .expect("opaque root")
}
