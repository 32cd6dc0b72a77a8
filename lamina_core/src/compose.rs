// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame compositing.
//!
//! The compositor walks the tree post-order so that every child finalises
//! its display surface before its parent blits from it. For each node:
//!
//! 1. Every child that is dirty while the node is not contributes its
//!    transition rectangles to the node's dirty set.
//! 2. Children that are visible, or were visible last frame, are composited
//!    recursively.
//! 3. A visible node with surfaces redraws either its whole surface (fully
//!    dirty) or just its dirty rectangles. Redrawing a region clears it to
//!    the colorkey, copies the background over it, then blits the matching
//!    part of every visible child's display surface in z-order. Transparent
//!    children own no surface: their children are blitted straight into this
//!    surface, clipped to the transparent node's bounds.
//! 4. The node's dirty state is cleared and its geometry and visibility are
//!    snapshotted for the next frame's comparison.

#[cfg(feature = "trace-rich")]
use alloc::vec::Vec;

use crate::backend::{Backend, SurfaceId};
use crate::damage::DamageRegion;
use crate::node::{INVALID, NodeId, Scene};
use crate::rect::{Point, Rect};
use crate::trace::FrameSummaryBuilder;
use crate::ui::{Ui, child_list};

impl Ui<'_> {
    /// Composites the tree rooted at `root` and returns the region of the
    /// root's display surface that changed.
    ///
    /// Does not present; [`App::tick`](crate::App::tick) does that when the
    /// result is not [`DamageRegion::None`].
    pub fn composite(&mut self, root: NodeId) -> DamageRegion {
        let mut summary = FrameSummaryBuilder::new(self.cx.frame_index);
        self.composite_node(root, &mut summary)
    }

    pub(crate) fn composite_node(
        &mut self,
        id: NodeId,
        summary: &mut FrameSummaryBuilder,
    ) -> DamageRegion {
        let i = id.idx as usize;
        let visible = self.scene.flags[i].visible;

        if visible {
            for child in child_list(self.scene, id) {
                if !self.scene.is_alive(child) || self.scene.parent[child.idx as usize] != id.idx {
                    continue;
                }
                let c = child.idx;
                if self.scene.is_dirty_at(c) && !self.scene.is_dirty_at(id.idx) {
                    for rect in self.scene.transition_rects_at(c) {
                        self.scene.add_dirty_rect_at(id.idx, rect);
                    }
                }
                let was_visible = self.scene.snapshot[c as usize].is_some_and(|s| s.visible);
                if self.scene.flags[c as usize].visible || was_visible {
                    self.composite_node(child, summary);
                }
            }
        }

        if !self.scene.is_alive(id) {
            return DamageRegion::None;
        }

        let mut damage = DamageRegion::None;
        if visible && self.scene.surfaces[i].is_some() {
            if self.scene.stale[i] {
                self.scene.stale[i] = false;
                self.refresh(id);
            }
            if let Some(surfaces) = self.scene.surfaces[i] {
                let display = surfaces.display;
                if self.scene.is_dirty_at(id.idx) {
                    let full = self.scene.rect[i].at_origin();
                    self.redraw_area(id, display, full);
                    summary.record_redraw(full.area());
                    self.trace_damage(id, &[full]);
                    damage = DamageRegion::Full;
                } else if !self.scene.dirty[i].rects.is_empty() {
                    let rects = self.scene.dirty[i].rects.clone();
                    for rect in &rects {
                        self.redraw_area(id, display, *rect);
                    }
                    summary.record_redraw(rects.iter().map(Rect::area).sum());
                    self.trace_damage(id, &rects);
                    damage = DamageRegion::Rects(rects);
                }
            }
        } else if self.scene.surfaces[i].is_none() {
            // Hidden surface nodes stay stale until they are drawn again.
            self.scene.stale[i] = false;
        }

        self.scene.finish_frame_at(id.idx);
        damage
    }

    /// Rebuilds `region` (own space) of the node's display surface.
    fn redraw_area(&mut self, id: NodeId, display: SurfaceId, region: Rect) {
        let i = id.idx as usize;
        let Some(s) = self.scene.surfaces[i] else {
            return;
        };
        self.backend.fill(display, region, s.colorkey);
        self.backend.blit(display, s.background, region.pos(), region);
        blit_children(self.scene, &mut *self.backend, id.idx, display, region, Point::ZERO);
    }

    #[cfg(feature = "trace-rich")]
    fn trace_damage(&mut self, id: NodeId, rects: &[Rect]) {
        if self.tracer.is_active() {
            let rects: Vec<crate::trace::DamageRect> =
                rects.iter().copied().map(Into::into).collect();
            self.tracer.damage_rects(self.cx.frame_index, id, &rects);
        }
    }

    #[cfg(not(feature = "trace-rich"))]
    fn trace_damage(&mut self, id: NodeId, rects: &[Rect]) {
        _ = (id, rects);
    }
}

/// Blits the part of every visible child of `idx` that overlaps `region`
/// into `display`. `region` is in `idx`'s space; `offset` maps that space
/// into the display surface's space.
fn blit_children(
    scene: &Scene,
    backend: &mut dyn Backend,
    idx: u32,
    display: SurfaceId,
    region: Rect,
    offset: Point,
) {
    let mut child = scene.first_child[idx as usize];
    while child != INVALID {
        let c = child as usize;
        if scene.flags[c].visible {
            let bounds = scene.rect[c];
            if let Some(area) = region.intersect(&bounds) {
                let local = area.translate(-bounds.pos());
                match scene.surfaces[c] {
                    // Flatten: the transparent node's children land in this
                    // display surface, clipped to the transparent node.
                    None => blit_children(
                        scene,
                        backend,
                        child,
                        display,
                        local,
                        offset + bounds.pos(),
                    ),
                    Some(cs) => backend.blit(display, cs.display, area.pos() + offset, local),
                }
            }
        }
        child = scene.next_sibling[c];
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::app::App;
    use crate::backend::Color;
    use crate::node::{Group, NodeDesc, Opacity};
    use crate::testing::{Op, RecordingBackend};

    fn app() -> App<RecordingBackend> {
        App::new(
            RecordingBackend::default(),
            NodeDesc::new(100, 100).opacity(Opacity::Opaque),
            Group,
        )
        .expect("opaque root")
    }

    fn display_of(app: &App<RecordingBackend>, id: NodeId) -> SurfaceId {
        app.scene().surfaces(id).expect("has surfaces").display
    }

    #[test]
    fn first_frame_redraws_everything_and_presents() {
        let mut app = app();
        let report = app.tick();
        assert_eq!(report.damage, DamageRegion::Full);
        assert!(report.presented);
        let root_display = display_of(&app, app.root());
        assert!(app.backend().presents().contains(&root_display));
    }

    #[test]
    fn second_tick_without_changes_is_idle() {
        let mut app = app();
        let root = app.root();
        let mut ui = app.ui();
        let child = ui.create(NodeDesc::new(20, 10).at(5, 5), Group);
        ui.register(root, child).unwrap();
        app.tick();

        app.backend_mut().clear_ops();
        let report = app.tick();
        assert_eq!(report.damage, DamageRegion::None);
        assert!(!report.presented);
        assert!(app.backend().ops().is_empty(), "no pixel work at all");
    }

    #[test]
    fn moving_a_child_redraws_the_combined_transition_rect() {
        let mut app = app();
        let root = app.root();
        let mut ui = app.ui();
        let child = ui.create(NodeDesc::new(20, 10).at(5, 5), Group);
        ui.register(root, child).unwrap();
        app.tick();
        app.backend_mut().clear_ops();

        app.ui().scene_mut().set_pos(child, Point::new(5, 15));
        let report = app.tick();
        assert_eq!(
            report.damage,
            DamageRegion::Rects(vec![Rect::new(5, 5, 20, 20)])
        );
        // Only the transition rect of the root is rebuilt.
        let root_display = display_of(&app, root);
        let root_fills: Vec<_> = app
            .backend()
            .ops()
            .iter()
            .filter_map(|op| match op {
                Op::Fill { surface, rect, .. } if *surface == root_display => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(root_fills, vec![Rect::new(5, 5, 20, 20)]);
    }

    #[test]
    fn distant_move_redraws_two_rects() {
        let mut app = app();
        let root = app.root();
        let mut ui = app.ui();
        let child = ui.create(NodeDesc::new(20, 10).at(5, 5), Group);
        ui.register(root, child).unwrap();
        app.tick();

        app.ui().scene_mut().set_pos(child, Point::new(60, 70));
        let report = app.tick();
        assert_eq!(
            report.damage,
            DamageRegion::Rects(vec![Rect::new(5, 5, 20, 10), Rect::new(60, 70, 20, 10)])
        );
    }

    #[test]
    fn hiding_a_child_erases_its_old_rect() {
        let mut app = app();
        let root = app.root();
        let mut ui = app.ui();
        let child = ui.create(NodeDesc::new(20, 10).at(5, 5), Group);
        ui.register(root, child).unwrap();
        app.tick();

        app.ui().hide(child);
        app.backend_mut().clear_ops();
        let report = app.tick();
        assert_eq!(report.damage, DamageRegion::Rects(vec![Rect::new(5, 5, 20, 10)]));
        let child_display = display_of(&app, child);
        assert!(
            !app.backend()
                .ops()
                .iter()
                .any(|op| matches!(op, Op::Blit { src, .. } if *src == child_display)),
            "hidden child is not blitted"
        );

        assert_eq!(app.tick().damage, DamageRegion::None);
    }

    #[test]
    fn transparent_container_flattens_into_parent() {
        let mut app = app();
        let root = app.root();
        let mut ui = app.ui();
        let group = ui.create(
            NodeDesc::new(60, 60).at(10, 10).opacity(Opacity::Transparent),
            Group,
        );
        let a = ui.create(NodeDesc::new(10, 10).at(0, 0).opacity(Opacity::Opaque), Group);
        let b = ui.create(NodeDesc::new(10, 10).at(30, 20).opacity(Opacity::Opaque), Group);
        ui.register(root, group).unwrap();
        ui.register_all(group, &[a, b]).unwrap();
        assert!(app.scene().surfaces(group).is_none());

        app.backend_mut().clear_ops();
        app.tick();
        let root_surfaces = app.scene().surfaces(root).expect("opaque root");
        let blits: Vec<_> = app
            .backend()
            .ops()
            .iter()
            .filter_map(|op| match *op {
                Op::Blit {
                    dst,
                    src,
                    dest,
                    region,
                } if dst == root_surfaces.display && src != root_surfaces.background => {
                    Some((src, dest, region))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            blits,
            vec![
                (display_of(&app, a), Point::new(10, 10), Rect::new(0, 0, 10, 10)),
                (display_of(&app, b), Point::new(40, 30), Rect::new(0, 0, 10, 10)),
            ]
        );
    }

    #[test]
    fn moving_child_of_transparent_node_damages_ancestor() {
        let mut app = app();
        let root = app.root();
        let mut ui = app.ui();
        let group = ui.create(
            NodeDesc::new(60, 60).at(10, 10).opacity(Opacity::Transparent),
            Group,
        );
        let a = ui.create(NodeDesc::new(10, 10).opacity(Opacity::Opaque), Group);
        ui.register(root, group).unwrap();
        ui.register(group, a).unwrap();
        app.tick();

        app.ui().scene_mut().set_pos(a, Point::new(5, 0));
        let report = app.tick();
        assert_eq!(
            report.damage,
            DamageRegion::Rects(vec![Rect::new(10, 10, 15, 10)])
        );
    }

    #[test]
    fn partial_background_update_redraws_only_that_rect() {
        let mut app = app();
        let root = app.root();
        let mut ui = app.ui();
        let child = ui.create(NodeDesc::new(40, 40).at(10, 10), Group);
        ui.register(root, child).unwrap();
        app.tick();

        app.ui()
            .fill_background_rect(child, Rect::new(2, 2, 4, 4), Color::WHITE);
        let report = app.tick();
        assert_eq!(report.damage, DamageRegion::Rects(vec![Rect::new(12, 12, 4, 4)]));
    }

    #[test]
    fn raising_z_redraws_the_node() {
        let mut app = app();
        let root = app.root();
        let mut ui = app.ui();
        let a = ui.create(NodeDesc::new(20, 20), Group);
        let b = ui.create(NodeDesc::new(20, 20).at(10, 10), Group);
        ui.register_all(root, &[a, b]).unwrap();
        app.tick();

        app.ui().set_z(a, 5);
        assert_eq!(app.scene().children(root).collect::<Vec<_>>(), vec![b, a]);
        let report = app.tick();
        assert_eq!(report.damage, DamageRegion::Rects(vec![Rect::new(0, 0, 20, 20)]));
    }

    #[test]
    fn stale_nodes_refresh_during_composite() {
        use alloc::rc::Rc;
        use core::cell::Cell;

        struct Counting(Rc<Cell<u32>>);
        impl crate::node::Widget for Counting {
            fn refresh(&mut self, _: &mut Ui<'_>, _: NodeId) {
                self.0.set(self.0.get() + 1);
            }
        }

        let mut app = app();
        let root = app.root();
        let count = Rc::new(Cell::new(0));
        let mut ui = app.ui();
        let child = ui.create(NodeDesc::new(20, 20), Counting(count.clone()));
        ui.register(root, child).unwrap();
        ui.load(child);
        assert_eq!(count.get(), 1);
        app.tick();

        app.ui().reload_style(root);
        assert!(app.scene().is_stale(child));
        let report = app.tick();
        assert_eq!(count.get(), 2);
        assert!(!app.scene().is_stale(child));
        assert_eq!(report.damage, DamageRegion::Full, "root is stale too");
    }

    #[test]
    fn style_reload_survives_a_hide_in_the_same_frame() {
        use alloc::rc::Rc;
        use core::cell::Cell;

        struct Counting(Rc<Cell<u32>>);
        impl crate::node::Widget for Counting {
            fn refresh(&mut self, _: &mut Ui<'_>, _: NodeId) {
                self.0.set(self.0.get() + 1);
            }
        }

        let mut app = app();
        let root = app.root();
        let count = Rc::new(Cell::new(0));
        let mut ui = app.ui();
        let child = ui.create(NodeDesc::new(20, 20), Counting(count.clone()));
        ui.register(root, child).unwrap();
        ui.load(child);
        app.tick();

        let mut ui = app.ui();
        ui.reload_style(root);
        ui.hide(child);
        app.tick();
        assert_eq!(count.get(), 1, "hidden nodes do not refresh");
        assert!(app.scene().is_stale(child));

        app.ui().show(child);
        app.tick();
        assert_eq!(count.get(), 2);
        assert!(!app.scene().is_stale(child));
    }

    #[test]
    fn unregister_erases_last_drawn_position() {
        let mut app = app();
        let root = app.root();
        let mut ui = app.ui();
        let child = ui.create(NodeDesc::new(20, 10).at(5, 5), Group);
        ui.register(root, child).unwrap();
        app.tick();

        assert!(app.ui().unregister(child));
        assert!(!app.ui().unregister(child), "second unregister is a no-op");
        assert_eq!(app.scene().snapshot(child), None);
        let report = app.tick();
        assert_eq!(report.damage, DamageRegion::Rects(vec![Rect::new(5, 5, 20, 10)]));
    }
}
