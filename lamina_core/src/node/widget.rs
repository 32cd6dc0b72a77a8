// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node behaviour.
//!
//! A [`Widget`] is the behaviour half of a node: the scene stores geometry,
//! flags and surfaces, while the widget reacts to lifecycle and input hooks.
//! Every hook has a no-op default, so a widget only overrides what it needs.
//!
//! While a hook runs, the widget is taken out of the scene so that the hook
//! can receive `&mut Ui` for the whole tree. Hooks may freely mutate other
//! nodes; a hook that triggers another hook on its *own* node is skipped.

use alloc::string::String;

use super::id::NodeId;
use crate::input::{KeyCombo, MouseButton, PointerSegment};
use crate::rect::Point;
use crate::ui::Ui;

/// A message travelling up the tree from a node towards the root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Message {
    /// A key combination resolved to a named control through the
    /// configuration collaborator.
    Control(String),
    /// A request to close the application. If it reaches the root
    /// unconsumed, the next frame report carries an exit request.
    Quit,
    /// An application-defined payload.
    User(u64),
}

/// Result of [`Widget::handle_message`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Handled {
    /// Stop bubbling.
    Consumed,
    /// Forward to the parent.
    #[default]
    Bubble,
}

/// Behaviour hooks for a node.
///
/// `id` is always the node the widget is attached to. Pointer positions and
/// segments are in that node's local coordinate space.
pub trait Widget {
    /// Runs once, the first time [`Ui::load`] is called for the node.
    fn load(&mut self, ui: &mut Ui<'_>, id: NodeId) {
        _ = (ui, id);
    }

    /// Draws the node's background for its current size.
    ///
    /// Runs after load, after every resize and after a style reload. It must
    /// not change the node's size or position.
    fn refresh(&mut self, ui: &mut Ui<'_>, id: NodeId) {
        _ = (ui, id);
    }

    /// The node was shown.
    fn show(&mut self, ui: &mut Ui<'_>, id: NodeId) {
        _ = (ui, id);
    }

    /// The node was hidden.
    fn hide(&mut self, ui: &mut Ui<'_>, id: NodeId) {
        _ = (ui, id);
    }

    /// The node was paused.
    fn pause(&mut self, ui: &mut Ui<'_>, id: NodeId) {
        _ = (ui, id);
    }

    /// The node was unpaused.
    fn unpause(&mut self, ui: &mut Ui<'_>, id: NodeId) {
        _ = (ui, id);
    }

    /// The node was shown and unpaused together.
    fn activate(&mut self, ui: &mut Ui<'_>, id: NodeId) {
        _ = (ui, id);
    }

    /// The node was hidden and paused together.
    fn deactivate(&mut self, ui: &mut Ui<'_>, id: NodeId) {
        _ = (ui, id);
    }

    /// The node became the focus owner.
    fn take_focus(&mut self, ui: &mut Ui<'_>, id: NodeId) {
        _ = (ui, id);
    }

    /// The node stopped being the focus owner.
    fn release_focus(&mut self, ui: &mut Ui<'_>, id: NodeId) {
        _ = (ui, id);
    }

    /// A key was pressed while the node had focus.
    fn key_down(
        &mut self,
        ui: &mut Ui<'_>,
        id: NodeId,
        unicode: Option<char>,
        combo: KeyCombo,
    ) {
        _ = (ui, id, unicode, combo);
    }

    /// A key was released while the node had focus.
    fn key_up(&mut self, ui: &mut Ui<'_>, id: NodeId, combo: KeyCombo) {
        _ = (ui, id, combo);
    }

    /// The pointer moved onto the node.
    fn pointer_enter(&mut self, ui: &mut Ui<'_>, id: NodeId, segment: &PointerSegment) {
        _ = (ui, id, segment);
    }

    /// The pointer left the node, or the window lost pointer focus.
    fn pointer_exit(&mut self, ui: &mut Ui<'_>, id: NodeId, segment: &PointerSegment) {
        _ = (ui, id, segment);
    }

    /// The pointer moved within the node.
    fn pointer_motion(&mut self, ui: &mut Ui<'_>, id: NodeId, segment: &PointerSegment) {
        _ = (ui, id, segment);
    }

    /// A button was pressed over the node.
    fn pointer_down(&mut self, ui: &mut Ui<'_>, id: NodeId, pos: Point, button: MouseButton) {
        _ = (ui, id, pos, button);
    }

    /// A button was released over the node.
    fn pointer_up(&mut self, ui: &mut Ui<'_>, id: NodeId, pos: Point, button: MouseButton) {
        _ = (ui, id, pos, button);
    }

    /// Runs once per frame, before hover is re-checked for the node.
    fn track(&mut self, ui: &mut Ui<'_>, id: NodeId) {
        _ = (ui, id);
    }

    /// Runs once per frame for live nodes, after all children updated.
    fn update(&mut self, ui: &mut Ui<'_>, id: NodeId) {
        _ = (ui, id);
    }

    /// Receives a message sent by `sender`, which is this node or one of its
    /// children.
    fn handle_message(
        &mut self,
        ui: &mut Ui<'_>,
        id: NodeId,
        sender: NodeId,
        message: &Message,
    ) -> Handled {
        _ = (ui, id, sender, message);
        Handled::Bubble
    }
}

/// A widget with no behaviour of its own.
///
/// Useful for pure containers and for nodes whose pixels are drawn directly
/// with [`Ui::fill_background`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Group;

impl Widget for Group {}
