// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-region tracking.
//!
//! Each node carries a set of dirty rectangles in its own coordinate space,
//! plus the running sum of their areas. Adding a rectangle propagates it to
//! every ancestor, offset into each ancestor's space, so that every surface
//! on the path knows which of its pixels are stale. Once the summed area
//! would exceed the node's own area, the node is promoted to *fully dirty*
//! instead: its rectangles are withdrawn from the ancestors and replaced by
//! the node's full bounds in the parent.
//!
//! Movement and visibility changes are never recorded here. They are derived
//! by comparing the node against the [`Snapshot`] taken at the end of the
//! previous frame, and turned into parent-space *transition rectangles* by
//! the compositor.

use alloc::vec;
use alloc::vec::Vec;
use core::mem;

use crate::node::{INVALID, NodeId, Scene};
use crate::rect::Rect;

/// Per-node dirty bookkeeping for the current frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct DirtyState {
    /// Explicitly promoted to fully dirty.
    pub(crate) fully: bool,
    /// Own-space rectangles awaiting redraw. Empty while `fully` is set.
    pub(crate) rects: Vec<Rect>,
    /// Contributions behind each entry of `rects`. A rect reached from
    /// several descendants stays until every one of them withdrew it.
    pub(crate) counts: Vec<u32>,
    /// Sum of the areas in `rects`.
    pub(crate) area: i64,
}

/// A node's geometry and own visibility as of the end of the last frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Snapshot {
    /// Rectangle in the parent's space.
    pub rect: Rect,
    /// Own visibility flag.
    pub visible: bool,
}

impl Scene {
    /// Returns whether the node must be redrawn in full this frame.
    ///
    /// True if it was promoted to fully dirty, or if its rectangle or own
    /// visibility differs from the last snapshot. A node that was never
    /// drawn is dirty whenever it is visible.
    #[must_use]
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.validate(id);
        self.is_dirty_at(id.idx)
    }

    /// Returns the node's pending dirty rectangles, in its own space.
    #[must_use]
    pub fn dirty_rects(&self, id: NodeId) -> &[Rect] {
        self.validate(id);
        &self.dirty[id.idx as usize].rects
    }

    /// Returns the summed area of the node's pending dirty rectangles.
    #[must_use]
    pub fn dirty_area(&self, id: NodeId) -> i64 {
        self.validate(id);
        self.dirty[id.idx as usize].area
    }

    /// Returns the snapshot taken at the end of the node's last composite
    /// pass, or `None` if it was never composited since registration.
    #[must_use]
    pub fn snapshot(&self, id: NodeId) -> Option<Snapshot> {
        self.validate(id);
        self.snapshot[id.idx as usize]
    }

    /// Marks `rect` (own space) as stale and propagates it to the ancestors.
    ///
    /// Ignored if the node is already dirty or if the rectangle does not
    /// overlap the node. A rectangle that is already recorded is counted
    /// again rather than stored twice. Promotes the node to
    /// fully dirty once the recorded area would exceed the node's area.
    pub fn add_dirty_rect(&mut self, id: NodeId, rect: Rect) {
        self.validate(id);
        self.add_dirty_rect_at(id.idx, rect);
    }

    /// Promotes the node to fully dirty.
    pub fn mark_dirty(&mut self, id: NodeId) {
        self.validate(id);
        self.promote_at(id.idx);
    }

    // -- Internal --

    pub(crate) fn is_dirty_at(&self, idx: u32) -> bool {
        let i = idx as usize;
        if self.dirty[i].fully {
            return true;
        }
        let visible = self.flags[i].visible;
        match self.snapshot[i] {
            None => visible,
            Some(s) => s.rect != self.rect[i] || s.visible != visible,
        }
    }

    pub(crate) fn add_dirty_rect_at(&mut self, idx: u32, rect: Rect) {
        let i = idx as usize;
        let Some(rect) = self.clip_to_node(idx, rect) else {
            return;
        };
        if self.is_dirty_at(idx) {
            return;
        }

        if let Some(pos) = self.dirty[i].rects.iter().position(|r| *r == rect) {
            self.dirty[i].counts[pos] += 1;
        } else {
            if self.dirty[i].area + rect.area() > self.rect[i].area() {
                self.promote_at(idx);
                return;
            }
            self.dirty[i].rects.push(rect);
            self.dirty[i].counts.push(1);
            self.dirty[i].area += rect.area();
        }

        let p = self.parent[i];
        if p != INVALID {
            self.add_dirty_rect_at(p, rect.translate(self.rect[i].pos()));
        }
    }

    /// Withdraws one contribution of `rect` from the node and, while it
    /// keeps being found, from each ancestor. The rect itself is dropped
    /// once no contribution is left.
    pub(crate) fn clean_dirty_rect_at(&mut self, idx: u32, rect: Rect) {
        let i = idx as usize;
        let Some(rect) = self.clip_to_node(idx, rect) else {
            return;
        };
        let state = &mut self.dirty[i];
        let Some(pos) = state.rects.iter().position(|r| *r == rect) else {
            return;
        };
        state.counts[pos] -= 1;
        if state.counts[pos] == 0 {
            state.rects.swap_remove(pos);
            state.counts.swap_remove(pos);
            state.area -= rect.area();
        }

        let p = self.parent[i];
        if p != INVALID {
            self.clean_dirty_rect_at(p, rect.translate(self.rect[i].pos()));
        }
    }

    /// Withdraws every rectangle the node contributed to its ancestors,
    /// leaving its own set intact.
    pub(crate) fn withdraw_dirty_rects_at(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        if p == INVALID {
            return;
        }
        let offset = self.rect[idx as usize].pos();
        let state = &self.dirty[idx as usize];
        let contributed: Vec<(Rect, u32)> = state
            .rects
            .iter()
            .copied()
            .zip(state.counts.iter().copied())
            .collect();
        for (rect, count) in contributed {
            for _ in 0..count {
                self.clean_dirty_rect_at(p, rect.translate(offset));
            }
        }
    }

    fn clip_to_node(&self, idx: u32, rect: Rect) -> Option<Rect> {
        rect.intersect(&self.rect[idx as usize].at_origin())
            .filter(|r| !r.is_empty())
    }

    pub(crate) fn promote_at(&mut self, idx: u32) {
        let i = idx as usize;
        if self.dirty[i].fully {
            return;
        }
        self.withdraw_dirty_rects_at(idx);
        self.dirty[i] = DirtyState {
            fully: true,
            ..DirtyState::default()
        };

        let p = self.parent[i];
        if p != INVALID && self.flags[i].visible {
            self.add_dirty_rect_at(p, self.rect[i]);
        }
    }

    /// Parent-space rectangles the parent must redraw to reconcile the
    /// node's movement or visibility change since the last snapshot.
    pub(crate) fn transition_rects_at(&self, idx: u32) -> Vec<Rect> {
        let i = idx as usize;
        let now = self.rect[i];
        let visible = self.flags[i].visible;
        let was = self.snapshot[i].filter(|s| s.visible).map(|s| s.rect);

        match (was, visible) {
            (Some(old), true) => {
                let combined = old.union(&now);
                if combined.area() <= old.area() + now.area() {
                    vec![combined]
                } else {
                    vec![old, now]
                }
            }
            (Some(old), false) => vec![old],
            (None, true) => vec![now],
            (None, false) => Vec::new(),
        }
    }

    /// Clears the node's dirty state and snapshots its geometry and own
    /// visibility. Returns the rectangles that were pending.
    pub(crate) fn finish_frame_at(&mut self, idx: u32) -> Vec<Rect> {
        let i = idx as usize;
        let state = mem::take(&mut self.dirty[i]);
        self.snapshot[i] = Some(Snapshot {
            rect: self.rect[i],
            visible: self.flags[i].visible,
        });
        state.rects
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec;

    use super::*;
    use crate::node::{Group, NodeDesc};
    use crate::rect::Point;

    /// Root 100x100 with one 20x10 child at (5, 5), both already composited
    /// once.
    fn settled() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::new();
        let root = scene.alloc(NodeDesc::new(100, 100), None, Box::new(Group));
        let child = scene.alloc(NodeDesc::new(20, 10).at(5, 5), None, Box::new(Group));
        scene.link(root.idx, child.idx);
        scene.finish_frame_at(child.idx);
        scene.finish_frame_at(root.idx);
        (scene, root, child)
    }

    #[test]
    fn unsnapshotted_node_is_dirty_when_visible() {
        let mut scene = Scene::new();
        let a = scene.alloc(NodeDesc::new(10, 10), None, Box::new(Group));
        let b = scene.alloc(NodeDesc::new(10, 10).hidden(), None, Box::new(Group));
        assert!(scene.is_dirty(a));
        assert!(!scene.is_dirty(b));
    }

    #[test]
    fn settled_nodes_are_clean() {
        let (scene, root, child) = settled();
        assert!(!scene.is_dirty(root));
        assert!(!scene.is_dirty(child));
    }

    #[test]
    fn movement_and_visibility_are_implicit_damage() {
        let (mut scene, _, child) = settled();
        scene.set_pos(child, Point::new(5, 15));
        assert!(scene.is_dirty(child));
        assert!(scene.dirty_rects(child).is_empty(), "no explicit rects");

        let (mut scene, _, child) = settled();
        scene.flags[child.idx as usize].visible = false;
        assert!(scene.is_dirty(child));
    }

    #[test]
    fn added_rect_propagates_offset_into_parent() {
        let (mut scene, root, child) = settled();
        scene.add_dirty_rect(child, Rect::new(1, 2, 3, 4));

        assert_eq!(scene.dirty_rects(child), &[Rect::new(1, 2, 3, 4)]);
        assert_eq!(scene.dirty_rects(root), &[Rect::new(6, 7, 3, 4)]);
        assert_eq!(scene.dirty_area(child), 12);
        assert_eq!(scene.dirty_area(root), 12);
    }

    #[test]
    fn duplicate_and_empty_rects_are_ignored() {
        let (mut scene, root, child) = settled();
        scene.add_dirty_rect(child, Rect::new(0, 0, 2, 2));
        scene.add_dirty_rect(child, Rect::new(0, 0, 2, 2));
        scene.add_dirty_rect(child, Rect::new(3, 3, 0, 5));
        scene.add_dirty_rect(child, Rect::new(50, 50, 5, 5));
        assert_eq!(scene.dirty_rects(child).len(), 1);
        assert_eq!(scene.dirty_area(root), 4);
    }

    #[test]
    fn rects_are_clipped_to_own_bounds() {
        let (mut scene, root, child) = settled();
        scene.add_dirty_rect(child, Rect::new(15, 5, 10, 10));
        assert_eq!(scene.dirty_rects(child), &[Rect::new(15, 5, 5, 5)]);
        assert_eq!(scene.dirty_rects(root), &[Rect::new(20, 10, 5, 5)]);
    }

    #[test]
    fn exceeding_area_promotes_to_fully_dirty() {
        let (mut scene, root, child) = settled();
        scene.add_dirty_rect(child, Rect::new(0, 0, 15, 10));
        assert_eq!(scene.dirty_area(child), 150);

        scene.add_dirty_rect(child, Rect::new(10, 0, 10, 10));
        assert!(scene.is_dirty(child));
        assert!(scene.dirty_rects(child).is_empty(), "promotion clears rects");
        assert_eq!(scene.dirty_area(child), 0);

        // The parent swaps the withdrawn rect for the child's full bounds.
        assert_eq!(scene.dirty_rects(root), &[Rect::new(5, 5, 20, 10)]);
        assert_eq!(scene.dirty_area(root), 200);
    }

    #[test]
    fn dirty_area_never_exceeds_own_area() {
        let (mut scene, root, child) = settled();
        let own = scene.rect(child).area();
        for i in 0..20 {
            scene.add_dirty_rect(child, Rect::new(i % 17, i % 7, 4, 4));
            assert!(scene.dirty_area(child) <= own);
            assert!(scene.dirty_area(root) <= scene.rect(root).area());
            if scene.is_dirty(child) {
                assert!(scene.dirty_rects(child).is_empty());
            }
        }
        assert!(scene.is_dirty(child), "twenty 4x4 rects overflow a 20x10 node");
    }

    #[test]
    fn clean_reverses_propagation() {
        let (mut scene, root, child) = settled();
        scene.add_dirty_rect(child, Rect::new(1, 1, 2, 2));
        scene.add_dirty_rect(child, Rect::new(10, 1, 2, 2));
        scene.clean_dirty_rect_at(child.idx, Rect::new(1, 1, 2, 2));

        assert_eq!(scene.dirty_rects(child), &[Rect::new(10, 1, 2, 2)]);
        assert_eq!(scene.dirty_rects(root), &[Rect::new(15, 6, 2, 2)]);
        assert_eq!(scene.dirty_area(root), 4);

        // Unknown rects stop quietly.
        scene.clean_dirty_rect_at(child.idx, Rect::new(0, 0, 1, 1));
        assert_eq!(scene.dirty_area(child), 4);
    }

    #[test]
    fn shared_parent_rect_survives_one_withdrawal() {
        let (mut scene, root, a) = settled();
        let b = scene.alloc(NodeDesc::new(20, 10).at(5, 5), None, Box::new(Group));
        scene.link(root.idx, b.idx);
        scene.finish_frame_at(b.idx);
        scene.flags[a.idx as usize].visible = false;
        scene.finish_frame_at(a.idx);

        scene.add_dirty_rect(a, Rect::new(0, 0, 5, 5));
        scene.add_dirty_rect(b, Rect::new(0, 0, 5, 5));
        assert_eq!(scene.dirty_rects(root), &[Rect::new(5, 5, 5, 5)]);
        assert_eq!(scene.dirty_area(root), 25, "shared rect counted once");

        // The hidden sibling goes fully dirty and withdraws its share only.
        scene.mark_dirty(a);
        assert_eq!(scene.dirty_rects(root), &[Rect::new(5, 5, 5, 5)]);

        scene.clean_dirty_rect_at(b.idx, Rect::new(0, 0, 5, 5));
        assert!(scene.dirty_rects(root).is_empty());
        assert_eq!(scene.dirty_area(root), 0);
    }

    #[test]
    fn dirty_node_ignores_further_rects() {
        let (mut scene, root, child) = settled();
        scene.set_pos(child, Point::new(6, 5));
        scene.add_dirty_rect(child, Rect::new(0, 0, 2, 2));
        assert!(scene.dirty_rects(child).is_empty());
        assert!(scene.dirty_rects(root).is_empty());
    }

    #[test]
    fn transition_rects_combine_overlapping_moves() {
        let (mut scene, _, child) = settled();
        scene.set_pos(child, Point::new(5, 15));
        // 20x20 bounding box == 200 + 200.
        assert_eq!(
            scene.transition_rects_at(child.idx),
            vec![Rect::new(5, 5, 20, 20)]
        );
    }

    #[test]
    fn transition_rects_split_distant_moves() {
        let (mut scene, _, child) = settled();
        scene.set_pos(child, Point::new(70, 80));
        assert_eq!(
            scene.transition_rects_at(child.idx),
            vec![Rect::new(5, 5, 20, 10), Rect::new(70, 80, 20, 10)]
        );
    }

    #[test]
    fn transition_rects_follow_visibility() {
        let (mut scene, _, child) = settled();
        scene.flags[child.idx as usize].visible = false;
        assert_eq!(
            scene.transition_rects_at(child.idx),
            vec![Rect::new(5, 5, 20, 10)],
            "disappearing node erases its old rect"
        );

        scene.finish_frame_at(child.idx);
        assert!(scene.transition_rects_at(child.idx).is_empty());

        scene.flags[child.idx as usize].visible = true;
        scene.set_pos(child, Point::new(30, 30));
        assert_eq!(
            scene.transition_rects_at(child.idx),
            vec![Rect::new(30, 30, 20, 10)],
            "appearing node draws only its new rect"
        );
    }

    #[test]
    fn finish_frame_resets_state() {
        let (mut scene, root, child) = settled();
        scene.add_dirty_rect(child, Rect::new(0, 0, 2, 2));
        scene.mark_dirty(child);
        let pending = scene.finish_frame_at(child.idx);
        assert!(pending.is_empty());
        assert!(!scene.is_dirty(child));
        assert_eq!(scene.dirty_area(child), 0);
        assert_eq!(
            scene.snapshot(child),
            Some(Snapshot {
                rect: Rect::new(5, 5, 20, 10),
                visible: true,
            })
        );
        let pending = scene.finish_frame_at(root.idx);
        assert_eq!(pending, vec![Rect::new(5, 5, 20, 10)]);
    }
}
