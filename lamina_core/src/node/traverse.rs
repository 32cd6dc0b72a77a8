// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec::Vec;

use super::id::{INVALID, NodeId};
use super::store::Scene;

/// An iterator over the direct children of a node, in ascending z-order.
///
/// Created by [`Scene::children`].
#[derive(Debug)]
pub struct Children<'a> {
    scene: &'a Scene,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(scene: &'a Scene, first: u32) -> Self {
        Self {
            scene,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.scene.next_sibling[idx as usize];
        Some(self.scene.id_at(idx))
    }
}

impl Scene {
    /// Collects the subtree rooted at `id` in depth-first pre-order.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        self.validate(id);
        let mut out = Vec::new();
        self.dfs_collect(id.idx, &mut out);
        out
    }

    /// Depth-first pre-order collection starting from `idx`.
    fn dfs_collect(&self, idx: u32, out: &mut Vec<NodeId>) {
        out.push(self.id_at(idx));
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.dfs_collect(child, out);
            child = self.next_sibling[child as usize];
        }
    }
}
