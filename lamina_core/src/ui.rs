// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree operations with access to hooks, focus and the backend.
//!
//! [`Scene`] alone only knows topology and flags. Anything that must run a
//! widget hook, allocate a surface or touch the focus owner goes through a
//! [`Ui`], which bundles the scene with the application context, the backend
//! and the tracer. Hosts get one from [`App::ui`](crate::App::ui); hooks
//! receive one as their first argument.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::app::AppContext;
use crate::backend::{AlphaMode, Backend, Color};
use crate::config::{Config, StyleValue};
use crate::error::TreeError;
use crate::input::PointerState;
use crate::node::{Handled, Message, NodeDesc, NodeId, Opacity, Scene, Surfaces, Widget};
use crate::rect::{Rect, Size};
use crate::trace::{
    FocusEvent, MessageDroppedEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, Tracer,
};

/// Mutable access to the whole tree, the focus owner and the backend.
pub struct Ui<'a> {
    pub(crate) scene: &'a mut Scene,
    pub(crate) cx: &'a mut AppContext,
    pub(crate) backend: &'a mut dyn Backend,
    pub(crate) tracer: Tracer<'a>,
}

impl core::fmt::Debug for Ui<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ui")
            .field("scene", &self.scene)
            .field("focus", &self.cx.focus)
            .finish_non_exhaustive()
    }
}

impl<'a> Ui<'a> {
    pub(crate) fn new(
        scene: &'a mut Scene,
        cx: &'a mut AppContext,
        backend: &'a mut dyn Backend,
        tracer: Tracer<'a>,
    ) -> Self {
        Self {
            scene,
            cx,
            backend,
            tracer,
        }
    }

    // -- Accessors --

    /// Returns the scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &*self.scene
    }

    /// Returns the scene for hook-free mutation (positions, names, dirty
    /// rectangles).
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut *self.scene
    }

    /// Returns the backend, for widgets that draw into their own
    /// [`background`](Surfaces::background) surface.
    pub fn backend(&mut self) -> &mut dyn Backend {
        &mut *self.backend
    }

    /// Returns the configuration collaborator.
    #[must_use]
    pub fn config(&self) -> &dyn Config {
        self.cx.config.as_ref()
    }

    /// Returns the current focus owner.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.cx.focus
    }

    /// Returns whether `id` is the focus owner.
    #[must_use]
    pub fn is_focused(&self, id: NodeId) -> bool {
        self.cx.focus == Some(id)
    }

    /// Returns the current pointer state, in window coordinates.
    #[must_use]
    pub fn pointer(&self) -> PointerState {
        self.cx.pointer
    }

    /// Returns the index of the frame being processed.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.cx.frame_index
    }

    // -- Configuration lookups --

    /// Resolves a style query for the node's name and effective context.
    #[must_use]
    pub fn style(&self, id: NodeId, query: &str) -> Option<StyleValue> {
        self.cx
            .config
            .style(query, self.scene.name(id), self.scene.context(id))
    }

    /// Resolves an option query for the node's name and effective context.
    #[must_use]
    pub fn option(&self, id: NodeId, query: &str) -> Option<StyleValue> {
        self.cx
            .config
            .option(query, self.scene.name(id), self.scene.context(id))
    }

    // -- Creation and destruction --

    /// Creates a detached node.
    ///
    /// Opaque and translucent nodes get a background and a display surface
    /// of the node's size, both cleared to the node's colorkey. Transparent
    /// nodes get none. Negative sizes are clamped to zero.
    pub fn create(&mut self, desc: NodeDesc, widget: impl Widget + 'static) -> NodeId {
        let mut desc = desc;
        desc.rect.set_size(desc.rect.size().clamped());
        let surfaces = self.alloc_surfaces(desc.rect.size(), desc.opacity);
        self.scene.alloc(desc, surfaces, Box::new(widget))
    }

    /// Detaches the node and destroys it with its whole subtree, releasing
    /// every surface.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy(&mut self, id: NodeId) {
        self.unregister(id);
        self.release_focus_within(id);
        if !self.scene.is_alive(id) {
            return;
        }

        // Reverse pre-order visits every child before its parent.
        for node in self.scene.subtree(id).into_iter().rev() {
            if self.scene.parent(node).is_some() {
                self.scene.unlink(node.idx);
            }
            let (surfaces, widget) = self.scene.release(node);
            if let Some(s) = surfaces {
                self.backend.destroy_surface(s.background);
                self.backend.destroy_surface(s.display);
            }
            drop(widget);
        }
    }

    // -- Topology --

    /// Attaches a detached `child` under `parent`, after every sibling whose
    /// z is not greater than its own, and marks it dirty if it is visible.
    ///
    /// # Errors
    ///
    /// - [`TreeError::AlreadyAttached`] if `child` already has a parent.
    /// - [`TreeError::Cycle`] if `parent` is `child` or one of its
    ///   descendants.
    ///
    /// Nothing changes when an error is returned.
    pub fn register(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.scene.validate(parent);
        if let Some(current) = self.scene.parent(child) {
            return Err(TreeError::AlreadyAttached {
                child,
                parent: current,
            });
        }
        if self.scene.is_ancestor_or_self(child, parent) {
            return Err(TreeError::Cycle { child, parent });
        }

        self.scene.link(parent.idx, child.idx);
        if self.scene.flags[child.idx as usize].visible {
            self.scene.promote_at(child.idx);
        }
        Ok(())
    }

    /// Registers each child in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn register_all(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), TreeError> {
        children
            .iter()
            .try_for_each(|&child| self.register(parent, child))
    }

    /// Detaches `child` from its parent.
    ///
    /// Withdraws the child's dirty rectangles from the ancestors, schedules
    /// the area it last covered for redraw in the old parent, releases focus
    /// and hover held inside the subtree, and forgets the child's snapshot.
    /// Returns `false` (and does nothing) if the node is not attached.
    pub fn unregister(&mut self, child: NodeId) -> bool {
        let Some(parent) = self.scene.parent(child) else {
            return false;
        };
        let c = child.idx as usize;

        self.release_focus_within(child);
        self.clear_hover_within(child);
        if !self.scene.is_alive(child) || self.scene.parent(child) != Some(parent) {
            // A release hook already moved or destroyed the node.
            return true;
        }

        self.scene.withdraw_dirty_rects_at(child.idx);
        if let Some(old) = self.scene.snapshot[c].filter(|s| s.visible) {
            self.scene.add_dirty_rect_at(parent.idx, old.rect);
        }
        self.scene.unlink(child.idx);
        self.scene.snapshot[c] = None;
        self.scene.dirty[c] = Default::default();
        true
    }

    /// Moves `child` under `new_parent`.
    ///
    /// # Errors
    ///
    /// [`TreeError::Cycle`] if `new_parent` is `child` or one of its
    /// descendants. Nothing changes when an error is returned.
    pub fn reparent(&mut self, child: NodeId, new_parent: NodeId) -> Result<(), TreeError> {
        self.scene.validate(new_parent);
        if self.scene.is_ancestor_or_self(child, new_parent) {
            return Err(TreeError::Cycle {
                child,
                parent: new_parent,
            });
        }
        self.unregister(child);
        self.register(new_parent, child)
    }

    /// Changes the node's z-order, re-inserting it among its siblings and
    /// marking it dirty.
    pub fn set_z(&mut self, id: NodeId, z: i32) {
        self.scene.validate(id);
        let i = id.idx as usize;
        if self.scene.z[i] == z {
            return;
        }
        self.scene.z[i] = z;
        let p = self.scene.parent[i];
        if p != crate::node::INVALID {
            self.scene.unlink(id.idx);
            self.scene.link(p, id.idx);
        }
        self.scene.promote_at(id.idx);
    }

    // -- Lifecycle --

    /// Runs the load hook (first call only), then refreshes the node and
    /// marks it dirty.
    pub fn load(&mut self, id: NodeId) {
        self.scene.validate(id);
        let i = id.idx as usize;
        if !self.scene.loaded[i] {
            self.call(id, |w, ui| w.load(ui, id));
            if !self.scene.is_alive(id) {
                return;
            }
            self.scene.loaded[i] = true;
        }
        self.refresh(id);
    }

    /// Loads the node and then every descendant, in pre-order.
    pub fn load_tree(&mut self, id: NodeId) {
        for node in self.scene.subtree(id) {
            if self.scene.is_alive(node) {
                self.load(node);
            }
        }
    }

    /// Runs the refresh hook and marks the node dirty.
    pub fn refresh(&mut self, id: NodeId) {
        self.call(id, |w, ui| w.refresh(ui, id));
        if self.scene.is_alive(id) {
            self.scene.promote_at(id.idx);
        }
    }

    /// Changes the node's size, reallocating its surfaces and refreshing it.
    ///
    /// Negative extents are clamped to zero. Returns `false` (and does
    /// nothing) if the size is unchanged.
    pub fn resize(&mut self, id: NodeId, size: Size) -> bool {
        self.scene.validate(id);
        let size = size.clamped();
        let i = id.idx as usize;
        if self.scene.rect[i].size() == size {
            return false;
        }
        self.scene.rect[i].set_size(size);

        if let Some(old) = self.scene.surfaces[i] {
            self.backend.destroy_surface(old.background);
            self.backend.destroy_surface(old.display);
            let mut fresh = self.alloc_surfaces(size, self.scene.opacity[i]);
            if let Some(s) = &mut fresh {
                s.colorkey = old.colorkey;
                self.apply_colorkey(*s);
            }
            self.scene.surfaces[i] = fresh;
        }
        self.refresh(id);
        true
    }

    /// Makes the node visible.
    pub fn show(&mut self, id: NodeId) {
        self.scene.validate(id);
        self.scene.flags[id.idx as usize].visible = true;
        self.call(id, |w, ui| w.show(ui, id));
    }

    /// Hides the node, releasing focus held anywhere in its subtree.
    pub fn hide(&mut self, id: NodeId) {
        self.scene.validate(id);
        self.scene.flags[id.idx as usize].visible = false;
        self.release_focus_within(id);
        self.call(id, |w, ui| w.hide(ui, id));
    }

    /// Shows the node if hidden, hides it otherwise.
    pub fn toggle_show(&mut self, id: NodeId) {
        if self.scene.flags(id).visible {
            self.hide(id);
        } else {
            self.show(id);
        }
    }

    /// Suspends updates and input for the node and its subtree.
    pub fn pause(&mut self, id: NodeId) {
        self.scene.validate(id);
        self.scene.flags[id.idx as usize].paused = true;
        self.call(id, |w, ui| w.pause(ui, id));
    }

    /// Resumes updates and input.
    pub fn unpause(&mut self, id: NodeId) {
        self.scene.validate(id);
        self.scene.flags[id.idx as usize].paused = false;
        self.call(id, |w, ui| w.unpause(ui, id));
    }

    /// Shows and unpauses the node.
    pub fn activate(&mut self, id: NodeId) {
        self.show(id);
        self.unpause(id);
        self.call(id, |w, ui| w.activate(ui, id));
    }

    /// Hides and pauses the node.
    pub fn deactivate(&mut self, id: NodeId) {
        self.hide(id);
        self.pause(id);
        self.call(id, |w, ui| w.deactivate(ui, id));
    }

    // -- Style and pixels --

    /// Marks the node and its subtree stale. Each stale surface re-runs its
    /// refresh hook and redraws in full on the next composite pass.
    pub fn reload_style(&mut self, id: NodeId) {
        for node in self.scene.subtree(id) {
            self.scene.stale[node.idx as usize] = true;
        }
    }

    /// Sets the color that marks cleared pixels on the node's surfaces and
    /// marks the node dirty. Does nothing for transparent nodes.
    pub fn set_colorkey(&mut self, id: NodeId, colorkey: Color) {
        self.scene.validate(id);
        let i = id.idx as usize;
        let Some(s) = &mut self.scene.surfaces[i] else {
            return;
        };
        s.colorkey = colorkey;
        let s = *s;
        self.apply_colorkey(s);
        self.scene.promote_at(id.idx);
    }

    /// Fills the node's whole background with `color` and marks it dirty.
    pub fn fill_background(&mut self, id: NodeId, color: Color) {
        let Some(s) = self.scene.surfaces(id) else {
            return;
        };
        let full = self.scene.rel_rect(id);
        self.backend.fill(s.background, full, color);
        self.scene.promote_at(id.idx);
    }

    /// Fills `region` (own space) of the node's background with `color` and
    /// records it as a dirty rectangle.
    pub fn fill_background_rect(&mut self, id: NodeId, region: Rect, color: Color) {
        let Some(s) = self.scene.surfaces(id) else {
            return;
        };
        self.backend.fill(s.background, region, color);
        self.scene.add_dirty_rect_at(id.idx, region);
    }

    // -- Focus --

    /// Makes `id` the focus owner, releasing the previous owner first.
    pub fn take_focus(&mut self, id: NodeId) {
        self.scene.validate(id);
        let old = self.cx.focus;
        if old == Some(id) {
            return;
        }
        if let Some(old) = old {
            self.cx.focus = None;
            if self.scene.is_alive(old) {
                self.call(old, |w, ui| w.release_focus(ui, old));
            }
        }
        self.cx.focus = Some(id);
        self.tracer.focus(&FocusEvent {
            frame_index: self.cx.frame_index,
            from: old,
            to: Some(id),
        });
        self.call(id, |w, ui| w.take_focus(ui, id));
    }

    /// Clears focus if `id` holds it. Returns whether it did.
    pub fn release_focus(&mut self, id: NodeId) -> bool {
        if self.cx.focus != Some(id) {
            return false;
        }
        self.cx.focus = None;
        self.tracer.focus(&FocusEvent {
            frame_index: self.cx.frame_index,
            from: Some(id),
            to: None,
        });
        if self.scene.is_alive(id) {
            self.call(id, |w, ui| w.release_focus(ui, id));
        }
        true
    }

    /// Releases focus if the owner is `id` or one of its descendants.
    fn release_focus_within(&mut self, id: NodeId) {
        if let Some(f) = self.cx.focus
            && self.scene.is_alive(f)
            && self.scene.is_ancestor_or_self(id, f)
        {
            self.release_focus(f);
        }
    }

    // -- Messages --

    /// Sends `message` from `from` to its parent, bubbling towards the root
    /// until a node consumes it.
    ///
    /// Returns whether the message was consumed. An unconsumed
    /// [`Message::Quit`] requests application exit; any other unconsumed
    /// message is dropped and reported to the trace sink.
    pub fn send_message(&mut self, from: NodeId, message: Message) -> bool {
        match self.scene.parent(from) {
            Some(parent) => self.deliver(parent, from, message),
            None => {
                self.drop_message(from, message);
                false
            }
        }
    }

    /// Hands `message` to `target`, then bubbles it up while unconsumed.
    pub(crate) fn deliver(&mut self, target: NodeId, sender: NodeId, message: Message) -> bool {
        let mut target = target;
        let mut sender = sender;
        loop {
            let handled = self
                .call(target, |w, ui| w.handle_message(ui, target, sender, &message))
                .unwrap_or_default();
            if handled == Handled::Consumed {
                return true;
            }
            if !self.scene.is_alive(target) {
                return false;
            }
            match self.scene.parent(target) {
                Some(parent) => {
                    sender = target;
                    target = parent;
                }
                None => {
                    self.drop_message(target, message);
                    return false;
                }
            }
        }
    }

    fn drop_message(&mut self, sender: NodeId, message: Message) {
        if message == Message::Quit {
            self.cx.exit_requested = true;
            return;
        }
        self.tracer.message_dropped(&MessageDroppedEvent {
            frame_index: self.cx.frame_index,
            sender,
            message,
        });
    }

    // -- Internal helpers --

    /// Runs `f` with the node's widget taken out of the scene.
    ///
    /// Returns `None` without running `f` if the widget is already out,
    /// which happens when a hook re-enters its own node.
    pub(crate) fn call<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut Self) -> R,
    ) -> Option<R> {
        self.scene.validate(id);
        let slot = id.idx as usize;
        let mut widget = self.scene.widgets[slot].take()?;
        let out = f(widget.as_mut(), self);
        // The hook may have destroyed its own node.
        if self.scene.is_alive(id) {
            self.scene.widgets[slot] = Some(widget);
        }
        Some(out)
    }

    pub(crate) fn with_phase<R>(&mut self, phase: PhaseKind, f: impl FnOnce(&mut Self) -> R) -> R {
        let frame_index = self.cx.frame_index;
        self.tracer.phase_begin(&PhaseBeginEvent { frame_index, phase });
        let out = f(self);
        self.tracer.phase_end(&PhaseEndEvent { frame_index, phase });
        out
    }

    fn alloc_surfaces(&mut self, size: Size, opacity: Opacity) -> Option<Surfaces> {
        let (alpha, colorkey) = match opacity {
            Opacity::Transparent => return None,
            Opacity::Translucent => (AlphaMode::PerPixel, Color::TRANSPARENT),
            Opacity::Opaque => (AlphaMode::Opaque, Color::BLACK),
        };
        let surfaces = Surfaces {
            background: self.backend.create_surface(size, alpha),
            display: self.backend.create_surface(size, alpha),
            colorkey,
        };
        self.apply_colorkey(surfaces);
        let full = Rect::from_size(size);
        self.backend.fill(surfaces.background, full, colorkey);
        self.backend.fill(surfaces.display, full, colorkey);
        Some(surfaces)
    }

    fn apply_colorkey(&mut self, s: Surfaces) {
        self.backend.set_colorkey(s.background, Some(s.colorkey));
        self.backend.set_colorkey(s.display, Some(s.colorkey));
    }
}

/// Collects the children of `id` so that hooks may restructure the tree
/// while the caller iterates.
pub(crate) fn child_list(scene: &Scene, id: NodeId) -> Vec<NodeId> {
    scene.children(id).collect()
}
