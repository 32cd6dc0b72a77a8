// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchical input dispatch.
//!
//! Pointer events arrive in window coordinates, which is the root's parent
//! space. Each level tests the event against the node's rectangle in its
//! parent's space, re-expresses it in the node's own space, runs the hook,
//! and recurses into the children:
//!
//! - **Motion** reaches live, hover-capable nodes containing both ends of the
//!   segment.
//! - **Down** reaches live, click-capable nodes containing the point, children
//!   visited topmost first. A focusable node takes focus before its children
//!   see the event.
//! - **Up** is like down, children visited in z-order.
//!
//! Pointer enter and exit are not driven by events. Once per frame the
//! tracking pass compares every eligible node's rectangle against the
//! current pointer position and fires the hooks on each flip, which also
//! catches nodes that move or appear under a stationary pointer.
//!
//! Keyboard input goes to the focus owner (the root when nobody holds
//! focus). Key combinations that the configuration resolves to a control are
//! sent as [`Message::Control`] to the owner itself and bubble from there.

use alloc::string::String;
use alloc::vec::Vec;

use crate::input::{InputEvent, Key, KeyCombo, Modifiers, MouseButton, PointerSegment};
use crate::node::{Message, NodeId};
use crate::rect::Point;
use crate::ui::{Ui, child_list};

impl Ui<'_> {
    /// Dispatches one input event into the tree rooted at `root`.
    ///
    /// Pointer events also update the application's pointer state.
    pub fn dispatch_event(&mut self, root: NodeId, event: InputEvent) {
        match event {
            InputEvent::KeyDown { unicode, key, mods } => self.key_down(root, unicode, key, mods),
            InputEvent::KeyUp { key, mods } => self.key_up(root, key, mods),
            InputEvent::PointerMotion { pos, rel, buttons } => {
                self.cx.pointer.pos = pos;
                self.cx.pointer.buttons = buttons;
                let segment = PointerSegment {
                    start: pos - rel,
                    end: pos,
                    buttons,
                };
                self.pointer_motion_at(root, segment);
            }
            InputEvent::PointerDown { pos, button } => {
                self.cx.pointer.pos = pos;
                self.cx.pointer.buttons = self.cx.pointer.buttons.with(button, true);
                self.pointer_down_at(root, pos, button);
            }
            InputEvent::PointerUp { pos, button } => {
                self.cx.pointer.pos = pos;
                self.cx.pointer.buttons = self.cx.pointer.buttons.with(button, false);
                self.pointer_up_at(root, pos, button);
            }
        }
    }

    // -- Pointer events --

    /// `segment` is in the parent's space.
    fn pointer_motion_at(&mut self, id: NodeId, segment: PointerSegment) {
        if !self.scene.is_alive(id) {
            return;
        }
        let i = id.idx as usize;
        let rect = self.scene.rect[i];
        if !self.scene.is_live_at(id.idx)
            || !self.scene.flags[i].hover
            || !rect.collide_point(segment.start)
            || !rect.collide_point(segment.end)
        {
            return;
        }

        let local = segment.to_local(rect.pos());
        self.call(id, |w, ui| w.pointer_motion(ui, id, &local));
        for child in self.live_children(id) {
            self.pointer_motion_at(child, local);
        }
    }

    /// `pos` is in the parent's space.
    fn pointer_down_at(&mut self, id: NodeId, pos: Point, button: MouseButton) {
        if !self.scene.is_alive(id) {
            return;
        }
        let i = id.idx as usize;
        let rect = self.scene.rect[i];
        if !self.scene.is_live_at(id.idx) || !self.scene.flags[i].click || !rect.collide_point(pos)
        {
            return;
        }

        let local = pos - rect.pos();
        self.call(id, |w, ui| w.pointer_down(ui, id, local, button));
        if !self.scene.is_alive(id) {
            return;
        }
        if self.scene.flags[i].focusable && self.cx.focus != Some(id) {
            self.take_focus(id);
        }
        for child in self.live_children(id).into_iter().rev() {
            self.pointer_down_at(child, local, button);
        }
    }

    /// `pos` is in the parent's space.
    fn pointer_up_at(&mut self, id: NodeId, pos: Point, button: MouseButton) {
        if !self.scene.is_alive(id) {
            return;
        }
        let i = id.idx as usize;
        let rect = self.scene.rect[i];
        if !self.scene.is_live_at(id.idx) || !self.scene.flags[i].click || !rect.collide_point(pos)
        {
            return;
        }

        let local = pos - rect.pos();
        self.call(id, |w, ui| w.pointer_up(ui, id, local, button));
        for child in self.live_children(id) {
            self.pointer_up_at(child, local, button);
        }
    }

    /// Snapshot of the children of `id`. Empty if a hook destroyed `id`.
    fn live_children(&self, id: NodeId) -> Vec<NodeId> {
        if !self.scene.is_alive(id) {
            return Vec::new();
        }
        child_list(self.scene, id)
    }

    fn still_child_of(&self, child: NodeId, parent: NodeId) -> bool {
        self.scene.is_alive(child) && self.scene.parent[child.idx as usize] == parent.idx
    }

    // -- Hover tracking --

    /// Runs the per-frame tracking pass: `track` hooks in pre-order over live
    /// nodes, then hover enter/exit for every node whose hover state flipped
    /// since the last frame.
    pub(crate) fn track_frame(&mut self, root: NodeId) {
        let segment = PointerSegment {
            start: self.cx.last_pointer,
            end: self.cx.pointer.pos,
            buttons: self.cx.pointer.buttons,
        };
        if self.scene.is_live(root) {
            self.track_at(root, segment, true);
        } else {
            self.clear_hover_within(root);
        }
        self.cx.last_pointer = self.cx.pointer.pos;
    }

    /// `segment` is in the parent's space. `hover_ok` is the ancestors'
    /// combined hover capability.
    fn track_at(&mut self, id: NodeId, segment: PointerSegment, hover_ok: bool) {
        self.call(id, |w, ui| w.track(ui, id));
        if !self.scene.is_alive(id) {
            return;
        }

        let i = id.idx as usize;
        let rect = self.scene.rect[i];
        let local = segment.to_local(rect.pos());
        let eligible = hover_ok && self.scene.flags[i].hover;
        let hovered = eligible && self.cx.pointer.window_focused && rect.collide_point(segment.end);

        if hovered != self.scene.hovered[i] {
            self.scene.hovered[i] = hovered;
            if hovered {
                self.call(id, |w, ui| w.pointer_enter(ui, id, &local));
            } else {
                self.call(id, |w, ui| w.pointer_exit(ui, id, &local));
            }
        }

        for child in self.live_children(id) {
            if !self.still_child_of(child, id) {
                continue;
            }
            if self.scene.is_live(child) {
                self.track_at(child, local, eligible);
            } else {
                self.clear_hover_within(child);
            }
        }
    }

    /// Clears hover on `id` and its subtree, firing `pointer_exit` on every
    /// node that was hovered.
    pub(crate) fn clear_hover_within(&mut self, id: NodeId) {
        let pos = self.cx.pointer.pos;
        let buttons = self.cx.pointer.buttons;
        for node in self.scene.subtree(id) {
            let i = node.idx as usize;
            if !self.scene.is_alive(node) || !self.scene.hovered[i] {
                continue;
            }
            self.scene.hovered[i] = false;
            let origin = self.scene.abs_pos_at(node.idx);
            let local = PointerSegment {
                start: pos,
                end: pos,
                buttons,
            }
            .to_local(origin);
            self.call(node, |w, ui| w.pointer_exit(ui, node, &local));
        }
    }

    // -- Updates --

    /// Runs `update` hooks post-order: live children first, then the node.
    pub(crate) fn update_tree(&mut self, id: NodeId) {
        for child in self.live_children(id) {
            if self.still_child_of(child, id) && self.scene.is_live(child) {
                self.update_tree(child);
            }
        }
        if self.scene.is_alive(id) {
            self.call(id, |w, ui| w.update(ui, id));
        }
    }

    // -- Keyboard --

    fn key_target(&self, root: NodeId) -> NodeId {
        self.cx
            .focus
            .filter(|&f| self.scene.is_alive(f))
            .unwrap_or(root)
    }

    fn key_down(&mut self, root: NodeId, unicode: Option<char>, key: Key, mods: Modifiers) {
        let target = self.key_target(root);
        let combo = KeyCombo::new(key, mods);
        self.call(target, |w, ui| w.key_down(ui, target, unicode, combo));
        if !self.scene.is_alive(target) {
            return;
        }
        if let Some(control) = self.control_for(target, &combo) {
            self.deliver(target, target, Message::Control(control));
        }
    }

    fn key_up(&mut self, root: NodeId, key: Key, mods: Modifiers) {
        let target = self.key_target(root);
        let combo = KeyCombo::new(key, mods);
        self.call(target, |w, ui| w.key_up(ui, target, combo));
    }

    fn control_for(&self, id: NodeId, combo: &KeyCombo) -> Option<String> {
        self.cx.config.control(combo, self.scene.context(id))
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use crate::app::App;
    use crate::config::MapConfig;
    use crate::input::{Buttons, InputEvent, Key, Modifiers, MouseButton, PointerSegment, PointerState};
    use crate::node::{Handled, Message, NodeDesc, NodeId, Widget};
    use crate::rect::Point;
    use crate::testing::RecordingBackend;
    use crate::ui::Ui;

    type Log = Rc<RefCell<Vec<(&'static str, &'static str)>>>;

    /// Records every hook call as `(node label, hook)`.
    struct Probe {
        label: &'static str,
        log: Log,
        consume: bool,
    }

    impl Probe {
        fn new(label: &'static str, log: &Log) -> Self {
            Self {
                label,
                log: log.clone(),
                consume: false,
            }
        }

        fn push(&self, hook: &'static str) {
            self.log.borrow_mut().push((self.label, hook));
        }
    }

    impl Widget for Probe {
        fn take_focus(&mut self, _: &mut Ui<'_>, _: NodeId) {
            self.push("take_focus");
        }
        fn release_focus(&mut self, _: &mut Ui<'_>, _: NodeId) {
            self.push("release_focus");
        }
        fn key_down(&mut self, _: &mut Ui<'_>, _: NodeId, _: Option<char>, _: crate::KeyCombo) {
            self.push("key_down");
        }
        fn pointer_enter(&mut self, _: &mut Ui<'_>, _: NodeId, _: &PointerSegment) {
            self.push("enter");
        }
        fn pointer_exit(&mut self, _: &mut Ui<'_>, _: NodeId, _: &PointerSegment) {
            self.push("exit");
        }
        fn pointer_motion(&mut self, _: &mut Ui<'_>, _: NodeId, _: &PointerSegment) {
            self.push("motion");
        }
        fn pointer_down(&mut self, _: &mut Ui<'_>, _: NodeId, _: Point, _: MouseButton) {
            self.push("down");
        }
        fn pointer_up(&mut self, _: &mut Ui<'_>, _: NodeId, _: Point, _: MouseButton) {
            self.push("up");
        }
        fn update(&mut self, _: &mut Ui<'_>, _: NodeId) {
            self.push("update");
        }
        fn handle_message(
            &mut self,
            _: &mut Ui<'_>,
            _: NodeId,
            _: NodeId,
            message: &Message,
        ) -> Handled {
            if matches!(message, Message::Control(_)) {
                self.push("message");
            }
            if self.consume {
                Handled::Consumed
            } else {
                Handled::Bubble
            }
        }
    }

    fn app(log: &Log) -> App<RecordingBackend> {
        App::new(
            RecordingBackend::default(),
            NodeDesc::new(100, 100),
            Probe::new("root", log),
        )
        .expect("opaque root")
    }

    fn hooks_of(log: &Log, label: &str) -> Vec<&'static str> {
        log.borrow()
            .iter()
            .filter(|(l, _)| *l == label)
            .map(|(_, h)| *h)
            .collect()
    }

    fn pointer_at(x: i32, y: i32) -> PointerState {
        PointerState {
            pos: Point::new(x, y),
            buttons: Buttons::NONE,
            window_focused: true,
        }
    }

    #[test]
    fn hover_flips_once_per_frame() {
        let log = Log::default();
        let mut app = app(&log);
        let root = app.root();
        let mut ui = app.ui();
        let a = ui.create(NodeDesc::new(20, 20).at(10, 10), Probe::new("a", &log));
        ui.register(root, a).unwrap();

        app.set_pointer(pointer_at(15, 15));
        app.tick();
        app.tick();
        assert_eq!(hooks_of(&log, "a"), vec!["enter", "update", "update"]);
        assert!(app.scene().is_hovered(a));

        log.borrow_mut().clear();
        app.set_pointer(pointer_at(50, 50));
        app.tick();
        assert_eq!(hooks_of(&log, "a"), vec!["exit", "update"]);
        assert!(!app.scene().is_hovered(a));
    }

    #[test]
    fn node_appearing_under_stationary_pointer_is_entered() {
        let log = Log::default();
        let mut app = app(&log);
        let root = app.root();
        app.set_pointer(pointer_at(15, 15));
        app.tick();

        let mut ui = app.ui();
        let a = ui.create(NodeDesc::new(20, 20).at(10, 10).hidden(), Probe::new("a", &log));
        ui.register(root, a).unwrap();
        app.tick();
        assert!(hooks_of(&log, "a").is_empty(), "hidden nodes are not tracked");

        app.ui().show(a);
        app.tick();
        assert_eq!(hooks_of(&log, "a"), vec!["enter", "update"]);

        log.borrow_mut().clear();
        app.ui().hide(a);
        app.tick();
        assert_eq!(hooks_of(&log, "a"), vec!["exit"]);
    }

    #[test]
    fn window_losing_pointer_focus_exits_everything() {
        let log = Log::default();
        let mut app = app(&log);
        app.set_pointer(pointer_at(15, 15));
        app.tick();
        assert!(app.scene().is_hovered(app.root()));

        app.set_pointer(PointerState {
            window_focused: false,
            ..pointer_at(15, 15)
        });
        app.tick();
        assert!(!app.scene().is_hovered(app.root()));
        assert_eq!(hooks_of(&log, "root"), vec!["enter", "update", "exit", "update"]);
    }

    #[test]
    fn non_hoverable_node_is_skipped_but_siblings_are_not() {
        let log = Log::default();
        let mut app = app(&log);
        let root = app.root();
        let mut ui = app.ui();
        let blind = ui.create(
            NodeDesc::new(40, 40).at(10, 10).hover(false),
            Probe::new("blind", &log),
        );
        let inner = ui.create(NodeDesc::new(10, 10).at(5, 5), Probe::new("inner", &log));
        let sibling = ui.create(NodeDesc::new(40, 40).at(20, 20), Probe::new("sibling", &log));
        ui.register(root, blind).unwrap();
        ui.register(blind, inner).unwrap();
        ui.register(root, sibling).unwrap();

        // Motion from outside both nodes into their overlap, then out again.
        app.set_pointer(pointer_at(5, 5));
        app.tick();
        for to in [Point::new(30, 30), Point::new(90, 90)] {
            let from = app.ui().pointer().pos;
            app.push_event(InputEvent::PointerMotion {
                pos: to,
                rel: to - from,
                buttons: Buttons::NONE,
            });
            app.tick();
        }

        let blind_hooks = hooks_of(&log, "blind");
        assert!(!blind_hooks.contains(&"enter") && !blind_hooks.contains(&"exit"));
        assert!(!blind_hooks.contains(&"motion"));
        assert!(hooks_of(&log, "inner").iter().all(|h| *h == "update"));
        assert_eq!(
            hooks_of(&log, "sibling")
                .into_iter()
                .filter(|h| *h != "update")
                .collect::<Vec<_>>(),
            vec!["enter", "exit"]
        );
    }

    #[test]
    fn motion_reaches_nodes_containing_both_ends() {
        let log = Log::default();
        let mut app = app(&log);
        let root = app.root();
        let mut ui = app.ui();
        let a = ui.create(NodeDesc::new(20, 20).at(10, 10), Probe::new("a", &log));
        let b = ui.create(NodeDesc::new(20, 20).at(60, 60), Probe::new("b", &log));
        ui.register_all(root, &[a, b]).unwrap();

        ui.dispatch_event(
            root,
            InputEvent::PointerMotion {
                pos: Point::new(15, 15),
                rel: Point::new(2, 2),
                buttons: Buttons::NONE,
            },
        );
        ui.dispatch_event(
            root,
            InputEvent::PointerMotion {
                pos: Point::new(65, 65),
                rel: Point::new(50, 50),
                buttons: Buttons::NONE,
            },
        );
        assert_eq!(hooks_of(&log, "root"), vec!["motion", "motion"]);
        assert_eq!(hooks_of(&log, "a"), vec!["motion"]);
        assert!(hooks_of(&log, "b").is_empty(), "segment started outside b");
    }

    #[test]
    fn down_visits_topmost_first_and_up_in_order() {
        let log = Log::default();
        let mut app = app(&log);
        let root = app.root();
        let mut ui = app.ui();
        let low = ui.create(NodeDesc::new(50, 50).z(0), Probe::new("low", &log));
        let high = ui.create(NodeDesc::new(50, 50).z(1), Probe::new("high", &log));
        let off = ui.create(NodeDesc::new(5, 5).at(90, 90), Probe::new("off", &log));
        ui.register_all(root, &[high, low, off]).unwrap();

        let pos = Point::new(10, 10);
        ui.dispatch_event(root, InputEvent::PointerDown { pos, button: MouseButton::Left });
        ui.dispatch_event(root, InputEvent::PointerUp { pos, button: MouseButton::Left });

        let order: Vec<_> = log.borrow().iter().map(|(l, h)| (*l, *h)).collect();
        assert_eq!(
            order,
            vec![
                ("root", "down"),
                ("high", "down"),
                ("low", "down"),
                ("root", "up"),
                ("low", "up"),
                ("high", "up"),
            ]
        );
    }

    #[test]
    fn clicking_focusable_nodes_moves_focus() {
        let log = Log::default();
        let mut app = app(&log);
        let root = app.root();
        let mut ui = app.ui();
        let a = ui.create(NodeDesc::new(10, 10).focusable(true), Probe::new("a", &log));
        let b = ui.create(NodeDesc::new(10, 10).at(50, 0).focusable(true), Probe::new("b", &log));
        let plain = ui.create(NodeDesc::new(10, 10).at(0, 50), Probe::new("plain", &log));
        ui.register_all(root, &[a, b, plain]).unwrap();

        let click = |ui: &mut Ui<'_>, x, y| {
            ui.dispatch_event(
                root,
                InputEvent::PointerDown {
                    pos: Point::new(x, y),
                    button: MouseButton::Left,
                },
            );
        };

        click(&mut ui, 5, 5);
        assert_eq!(ui.focused(), Some(a));
        click(&mut ui, 55, 5);
        assert_eq!(ui.focused(), Some(b));
        click(&mut ui, 5, 55);
        assert_eq!(ui.focused(), Some(b), "non-focusable nodes leave focus alone");

        assert_eq!(hooks_of(&log, "a"), vec!["down", "take_focus", "release_focus"]);
        assert_eq!(hooks_of(&log, "b"), vec!["down", "take_focus"]);
    }

    #[test]
    fn paused_and_unclickable_children_are_skipped() {
        let log = Log::default();
        let mut app = app(&log);
        let root = app.root();
        let mut ui = app.ui();
        let paused = ui.create(NodeDesc::new(50, 50), Probe::new("paused", &log));
        let deaf = ui.create(NodeDesc::new(50, 50).click(false), Probe::new("deaf", &log));
        ui.register_all(root, &[paused, deaf]).unwrap();
        ui.pause(paused);

        ui.dispatch_event(
            root,
            InputEvent::PointerDown {
                pos: Point::new(1, 1),
                button: MouseButton::Right,
            },
        );
        assert!(hooks_of(&log, "paused").is_empty());
        assert!(hooks_of(&log, "deaf").is_empty());
    }

    #[test]
    fn keyboard_controls_bubble_from_focus_owner() {
        let log = Log::default();
        let config = MapConfig::new().with_control(None, "ctrl+s", "save");
        let mut app = app(&log).with_config(config);
        let root = app.root();
        let mut ui = app.ui();
        let panel = ui.create(NodeDesc::new(50, 50), Probe::new("panel", &log));
        let field = ui.create(NodeDesc::new(10, 10), Probe::new("field", &log));
        ui.register(root, panel).unwrap();
        ui.register(panel, field).unwrap();
        ui.take_focus(field);
        log.borrow_mut().clear();

        ui.dispatch_event(
            root,
            InputEvent::KeyDown {
                unicode: None,
                key: Key::Char('s'),
                mods: Modifiers::CTRL,
            },
        );
        let order: Vec<_> = log.borrow().clone();
        assert_eq!(
            order,
            vec![
                ("field", "key_down"),
                ("field", "message"),
                ("panel", "message"),
                ("root", "message"),
            ]
        );

        // Unmapped combos are delivered but never become messages.
        log.borrow_mut().clear();
        ui.dispatch_event(
            root,
            InputEvent::KeyDown {
                unicode: Some('x'),
                key: Key::Char('x'),
                mods: Modifiers::NONE,
            },
        );
        assert_eq!(log.borrow().clone(), vec![("field", "key_down")]);
    }

    #[test]
    fn consumed_message_stops_bubbling() {
        struct Sink;
        impl Widget for Sink {
            fn handle_message(
                &mut self,
                _: &mut Ui<'_>,
                _: NodeId,
                _: NodeId,
                _: &Message,
            ) -> Handled {
                Handled::Consumed
            }
        }

        let log = Log::default();
        let mut app = app(&log);
        let root = app.root();
        let mut ui = app.ui();
        let stop = ui.create(NodeDesc::new(50, 50), Sink);
        let leaf = ui.create(NodeDesc::new(10, 10), Probe::new("leaf", &log));
        ui.register(root, stop).unwrap();
        ui.register(stop, leaf).unwrap();

        assert!(ui.send_message(leaf, Message::Control("go".to_string())));
        assert!(log.borrow().is_empty(), "root never saw the message");
    }

    #[test]
    fn unconsumed_quit_requests_exit() {
        let log = Log::default();
        let mut app = app(&log);
        let root = app.root();
        let mut ui = app.ui();
        let leaf = ui.create(NodeDesc::new(10, 10), Probe::new("leaf", &log));
        ui.register(root, leaf).unwrap();
        assert!(!ui.send_message(leaf, Message::User(7)));
        assert!(!app.exit_requested(), "other messages are just dropped");

        assert!(!app.ui().send_message(leaf, Message::Quit));
        assert!(app.exit_requested());
        assert!(app.tick().exit_requested);
    }

    #[test]
    fn hiding_an_ancestor_releases_focus() {
        let log = Log::default();
        let mut app = app(&log);
        let root = app.root();
        let mut ui = app.ui();
        let panel = ui.create(NodeDesc::new(50, 50), Probe::new("panel", &log));
        let field = ui.create(NodeDesc::new(10, 10).focusable(true), Probe::new("field", &log));
        ui.register(root, panel).unwrap();
        ui.register(panel, field).unwrap();

        ui.take_focus(field);
        assert!(ui.is_focused(field));
        ui.hide(panel);
        assert_eq!(ui.focused(), None);
        assert_eq!(hooks_of(&log, "field"), vec!["take_focus", "release_focus"]);
    }

    #[test]
    fn at_most_one_node_holds_focus() {
        let log = Log::default();
        let mut app = app(&log);
        let root = app.root();
        let mut ui = app.ui();
        let nodes: Vec<_> = (0..4)
            .map(|i| {
                let n = ui.create(NodeDesc::new(10, 10).at(i * 10, 0), Probe::new("n", &log));
                ui.register(root, n).unwrap();
                n
            })
            .collect();
        for &n in nodes.iter().chain(nodes.iter().rev()) {
            ui.take_focus(n);
            let holders = nodes.iter().filter(|&&m| ui.is_focused(m)).count();
            assert_eq!(holders, 1);
        }
        ui.unregister(nodes[0]);
        assert_eq!(ui.focused(), None, "detaching the owner releases focus");
    }

    #[test]
    fn update_runs_post_order_over_live_nodes() {
        let log = Log::default();
        let mut app = app(&log);
        let root = app.root();
        let mut ui = app.ui();
        let a = ui.create(NodeDesc::new(10, 10), Probe::new("a", &log));
        let b = ui.create(NodeDesc::new(10, 10), Probe::new("b", &log));
        let c = ui.create(NodeDesc::new(10, 10), Probe::new("c", &log));
        ui.register(root, a).unwrap();
        ui.register(a, b).unwrap();
        ui.register(root, c).unwrap();
        ui.pause(c);

        app.tick();
        let order: Vec<_> = log.borrow().iter().map(|(l, _)| *l).collect();
        assert_eq!(order, vec!["b", "a", "root"]);
    }
}
