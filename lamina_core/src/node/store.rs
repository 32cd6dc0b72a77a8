// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and flag queries.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::id::{INVALID, NodeId};
use super::traverse::Children;
use super::widget::Widget;
use crate::backend::{Color, SurfaceId};
use crate::dirty::{DirtyState, Snapshot};
use crate::rect::{Point, Rect};

/// How a node's pixels relate to what lies beneath it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Opacity {
    /// No backing surface. Children are composited straight into the
    /// nearest non-transparent ancestor.
    Transparent,
    /// Own surface with per-pixel alpha.
    #[default]
    Translucent,
    /// Own surface without alpha blending.
    Opaque,
}

/// Per-node boolean flags as set by the caller.
///
/// These are the node's *own* values. The effective values used for drawing
/// and dispatch also depend on the ancestor chain; see
/// [`Scene::is_visible`], [`Scene::can_hover`], [`Scene::can_click`] and
/// [`Scene::is_paused`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeFlags {
    /// Whether the node (and its subtree) is drawn.
    pub visible: bool,
    /// Whether the node receives pointer enter/exit/motion.
    pub hover: bool,
    /// Whether the node receives pointer down/up.
    pub click: bool,
    /// Whether a pointer down takes keyboard focus.
    pub focusable: bool,
    /// Whether per-frame update and input are suspended.
    pub paused: bool,
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self {
            visible: true,
            hover: true,
            click: true,
            focusable: false,
            paused: false,
        }
    }
}

/// Construction parameters for a node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeDesc {
    /// Geometry in the parent's coordinate space.
    pub rect: Rect,
    /// Draw order among siblings (ascending, ties in insertion order).
    pub z: i32,
    /// Style lookup key.
    pub name: Option<String>,
    /// Explicit lookup context. Inherited from ancestors when `None`.
    pub context: Option<String>,
    /// Initial flags.
    pub flags: NodeFlags,
    /// Opacity class, fixed for the node's lifetime.
    pub opacity: Opacity,
}

impl NodeDesc {
    /// A visible, hoverable, clickable translucent node of the given size at
    /// the origin.
    #[must_use]
    pub fn new(w: i32, h: i32) -> Self {
        Self {
            rect: Rect::new(0, 0, w, h),
            ..Self::default()
        }
    }

    /// Places the node at `(x, y)` in its parent's space.
    #[must_use]
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.rect.set_pos(Point::new(x, y));
        self
    }

    /// Sets the z-order.
    #[must_use]
    pub fn z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    /// Sets the style lookup key.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets an explicit lookup context.
    #[must_use]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Sets the opacity class.
    #[must_use]
    pub fn opacity(mut self, opacity: Opacity) -> Self {
        self.opacity = opacity;
        self
    }

    /// Starts the node hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.flags.visible = false;
        self
    }

    /// Sets whether the node receives hover events.
    #[must_use]
    pub fn hover(mut self, hover: bool) -> Self {
        self.flags.hover = hover;
        self
    }

    /// Sets whether the node receives click events.
    #[must_use]
    pub fn click(mut self, click: bool) -> Self {
        self.flags.click = click;
        self
    }

    /// Sets whether a pointer down on the node takes keyboard focus.
    #[must_use]
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.flags.focusable = focusable;
        self
    }
}

/// The background/display surface pair of a non-transparent node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Surfaces {
    /// What the node's widget draws into.
    pub background: SurfaceId,
    /// Background plus composited children; what the parent blits from.
    pub display: SurfaceId,
    /// Color that marks cleared pixels on both surfaces.
    pub colorkey: Color,
}

/// Struct-of-arrays storage for all nodes.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Destroyed nodes are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// Children are kept in ascending z-order. Nodes with equal z keep the order
/// in which they were linked.
pub struct Scene {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Local properties (set by callers) --
    pub(crate) rect: Vec<Rect>,
    pub(crate) z: Vec<i32>,
    pub(crate) name: Vec<Option<String>>,
    pub(crate) context: Vec<Option<String>>,
    pub(crate) flags: Vec<NodeFlags>,
    pub(crate) opacity: Vec<Opacity>,
    pub(crate) surfaces: Vec<Option<Surfaces>>,

    // -- Per-node state --
    pub(crate) hovered: Vec<bool>,
    pub(crate) loaded: Vec<bool>,
    pub(crate) stale: Vec<bool>,
    pub(crate) widgets: Vec<Option<Box<dyn Widget>>>,

    // -- Per-frame caches --
    pub(crate) dirty: Vec<DirtyState>,
    pub(crate) snapshot: Vec<Option<Snapshot>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            rect: Vec::new(),
            z: Vec::new(),
            name: Vec::new(),
            context: Vec::new(),
            flags: Vec::new(),
            opacity: Vec::new(),
            surfaces: Vec::new(),
            hovered: Vec::new(),
            loaded: Vec::new(),
            stale: Vec::new(),
            widgets: Vec::new(),
            dirty: Vec::new(),
            snapshot: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    // -- Allocation --

    /// Stores a new detached node and returns its handle.
    pub(crate) fn alloc(
        &mut self,
        desc: NodeDesc,
        surfaces: Option<Surfaces>,
        widget: Box<dyn Widget>,
    ) -> NodeId {
        let NodeDesc {
            rect,
            z,
            name,
            context,
            flags,
            opacity,
        } = desc;

        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot. The generation was bumped on release.
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.rect[i] = rect;
            self.z[i] = z;
            self.name[i] = name;
            self.context[i] = context;
            self.flags[i] = flags;
            self.opacity[i] = opacity;
            self.surfaces[i] = surfaces;
            self.hovered[i] = false;
            self.loaded[i] = false;
            self.stale[i] = false;
            self.widgets[i] = Some(widget);
            self.dirty[i] = DirtyState::default();
            self.snapshot[i] = None;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.rect.push(rect);
            self.z.push(z);
            self.name.push(name);
            self.context.push(context);
            self.flags.push(flags);
            self.opacity.push(opacity);
            self.surfaces.push(surfaces);
            self.hovered.push(false);
            self.loaded.push(false);
            self.stale.push(false);
            self.widgets.push(Some(widget));
            self.dirty.push(DirtyState::default());
            self.snapshot.push(None);
            self.generation.push(0);
            idx
        };

        self.id_at(idx)
    }

    /// Frees a detached, childless node and hands back what it owned.
    pub(crate) fn release(&mut self, id: NodeId) -> (Option<Surfaces>, Option<Box<dyn Widget>>) {
        self.validate(id);
        let i = id.idx as usize;
        assert!(
            self.first_child[i] == INVALID,
            "cannot release node with children"
        );
        assert!(self.parent[i] == INVALID, "cannot release attached node");

        // Bump generation so old handles immediately fail validation.
        self.generation[i] += 1;
        self.free_list.push(id.idx);

        self.name[i] = None;
        self.context[i] = None;
        self.dirty[i] = DirtyState::default();
        self.snapshot[i] = None;
        (self.surfaces[i].take(), self.widgets[i].take())
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Topology --

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.id_at(p))
    }

    /// Returns whether the node has no parent.
    #[must_use]
    pub fn is_root(&self, id: NodeId) -> bool {
        self.parent(id).is_none()
    }

    /// Returns an iterator over the direct children of a node, in ascending
    /// z-order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns whether `ancestor` is `node` or one of its ancestors.
    #[must_use]
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.validate(ancestor);
        self.validate(node);
        let mut i = node.idx;
        while i != INVALID {
            if i == ancestor.idx {
                return true;
            }
            i = self.parent[i as usize];
        }
        false
    }

    /// Links a detached `c` under `p`, after every sibling whose z is not
    /// greater than its own.
    pub(crate) fn link(&mut self, p: u32, c: u32) {
        let z = self.z[c as usize];
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        let mut before = self.first_child[p as usize];
        let mut last = INVALID;
        while before != INVALID && self.z[before as usize] <= z {
            last = before;
            before = self.next_sibling[before as usize];
        }

        self.prev_sibling[c as usize] = last;
        self.next_sibling[c as usize] = before;
        if last == INVALID {
            self.first_child[p as usize] = c;
        } else {
            self.next_sibling[last as usize] = c;
        }
        if before != INVALID {
            self.prev_sibling[before as usize] = c;
        }
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    pub(crate) fn unlink(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    // -- Property getters --

    /// Returns the node's rectangle in its parent's coordinate space.
    #[must_use]
    pub fn rect(&self, id: NodeId) -> Rect {
        self.validate(id);
        self.rect[id.idx as usize]
    }

    /// Returns the node's rectangle moved to the origin (its own space).
    #[must_use]
    pub fn rel_rect(&self, id: NodeId) -> Rect {
        self.rect(id).at_origin()
    }

    /// Returns the node's position in window coordinates.
    #[must_use]
    pub fn abs_pos(&self, id: NodeId) -> Point {
        self.validate(id);
        self.abs_pos_at(id.idx)
    }

    /// Returns the node's rectangle in window coordinates.
    #[must_use]
    pub fn abs_rect(&self, id: NodeId) -> Rect {
        let size = self.rect(id).size();
        let pos = self.abs_pos_at(id.idx);
        Rect::new(pos.x, pos.y, size.w, size.h)
    }

    /// Returns the node's z-order.
    #[must_use]
    pub fn z(&self, id: NodeId) -> i32 {
        self.validate(id);
        self.z[id.idx as usize]
    }

    /// Returns the node's style lookup key.
    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.validate(id);
        self.name[id.idx as usize].as_deref()
    }

    /// Returns the node's effective lookup context: its own, or else the
    /// nearest ancestor's.
    #[must_use]
    pub fn context(&self, id: NodeId) -> Option<&str> {
        self.validate(id);
        let mut i = id.idx;
        while i != INVALID {
            if let Some(cx) = &self.context[i as usize] {
                return Some(cx);
            }
            i = self.parent[i as usize];
        }
        None
    }

    /// Returns the node's own flags.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Returns the node's opacity class.
    #[must_use]
    pub fn opacity(&self, id: NodeId) -> Opacity {
        self.validate(id);
        self.opacity[id.idx as usize]
    }

    /// Returns the node's surfaces, or `None` for transparent nodes.
    #[must_use]
    pub fn surfaces(&self, id: NodeId) -> Option<Surfaces> {
        self.validate(id);
        self.surfaces[id.idx as usize]
    }

    /// Returns whether the pointer is currently over the node.
    #[must_use]
    pub fn is_hovered(&self, id: NodeId) -> bool {
        self.validate(id);
        self.hovered[id.idx as usize]
    }

    /// Returns whether [`load`](crate::Ui::load) has run for the node.
    #[must_use]
    pub fn is_loaded(&self, id: NodeId) -> bool {
        self.validate(id);
        self.loaded[id.idx as usize]
    }

    /// Returns whether the node will re-run its refresh hook on the next
    /// composite pass.
    #[must_use]
    pub fn is_stale(&self, id: NodeId) -> bool {
        self.validate(id);
        self.stale[id.idx as usize]
    }

    // -- Effective flags (derived from the ancestor chain on every call) --

    /// Own visibility AND every ancestor's.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.validate(id);
        self.all_ancestors(id.idx, |f| f.visible)
    }

    /// Own hover capability AND every ancestor's.
    #[must_use]
    pub fn can_hover(&self, id: NodeId) -> bool {
        self.validate(id);
        self.all_ancestors(id.idx, |f| f.hover)
    }

    /// Own click capability AND every ancestor's.
    #[must_use]
    pub fn can_click(&self, id: NodeId) -> bool {
        self.validate(id);
        self.all_ancestors(id.idx, |f| f.click)
    }

    /// Own pause flag OR any ancestor's.
    #[must_use]
    pub fn is_paused(&self, id: NodeId) -> bool {
        self.validate(id);
        !self.all_ancestors(id.idx, |f| !f.paused)
    }

    /// Own visible AND NOT own paused. Dispatch only descends into live
    /// children.
    #[must_use]
    pub fn is_live(&self, id: NodeId) -> bool {
        self.validate(id);
        self.is_live_at(id.idx)
    }

    // -- Simple setters (no hooks, no backend) --

    /// Moves the node within its parent's space.
    ///
    /// The change becomes visible on the next composite pass, which compares
    /// against the previous frame's snapshot.
    pub fn set_pos(&mut self, id: NodeId, pos: Point) {
        self.validate(id);
        self.rect[id.idx as usize].set_pos(pos);
    }

    /// Sets the node's style lookup key.
    pub fn set_name(&mut self, id: NodeId, name: Option<String>) {
        self.validate(id);
        self.name[id.idx as usize] = name;
    }

    /// Sets the node's explicit lookup context.
    pub fn set_context(&mut self, id: NodeId, context: Option<String>) {
        self.validate(id);
        self.context[id.idx as usize] = context;
    }

    /// Sets the node's own hover capability.
    pub fn set_hover(&mut self, id: NodeId, hover: bool) {
        self.validate(id);
        self.flags[id.idx as usize].hover = hover;
    }

    /// Sets the node's own click capability.
    pub fn set_click(&mut self, id: NodeId, click: bool) {
        self.validate(id);
        self.flags[id.idx as usize].click = click;
    }

    /// Sets whether a pointer down takes keyboard focus.
    pub fn set_focusable(&mut self, id: NodeId, focusable: bool) {
        self.validate(id);
        self.flags[id.idx as usize].focusable = focusable;
    }

    // -- Internal helpers --

    /// Builds a handle for a live slot.
    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    pub(crate) fn is_live_at(&self, idx: u32) -> bool {
        let f = self.flags[idx as usize];
        f.visible && !f.paused
    }

    pub(crate) fn abs_pos_at(&self, idx: u32) -> Point {
        let mut pos = Point::ZERO;
        let mut i = idx;
        while i != INVALID {
            pos = pos + self.rect[i as usize].pos();
            i = self.parent[i as usize];
        }
        pos
    }

    /// Returns `true` if `pred` holds for the node and every ancestor.
    fn all_ancestors(&self, idx: u32, pred: impl Fn(&NodeFlags) -> bool) -> bool {
        let mut i = idx;
        while i != INVALID {
            if !pred(&self.flags[i as usize]) {
                return false;
            }
            i = self.parent[i as usize];
        }
        true
    }

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }
}
