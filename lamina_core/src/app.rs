// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The application shell and the per-frame entry point.
//!
//! [`App`] owns the scene, the application context (focus owner, pointer
//! state, configuration, exit flag), the backend and the pending input
//! queue. The host calls [`App::tick`] once per frame:
//!
//! ```text
//!   push_event / pump ──► event queue
//!                              │
//!   tick() ────────────────────┘
//!     ├─ Dispatch   queued events, in arrival order
//!     ├─ Track      track hooks + hover enter/exit
//!     ├─ Update     update hooks, post-order
//!     ├─ Composite  dirty-rect redraw, post-order
//!     └─ Present    root display surface, only when damaged
//! ```

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;

use crate::backend::Backend;
use crate::config::{Config, NoConfig};
use crate::damage::DamageRegion;
use crate::error::TreeError;
use crate::input::{InputEvent, InputSource, PointerState};
use crate::node::{NodeDesc, NodeId, Opacity, Scene, Widget};
use crate::rect::Point;
use crate::trace::{FrameEvent, FrameSummaryBuilder, PhaseKind, TraceSink, Tracer};
use crate::ui::Ui;

/// State shared by every node of one application.
pub(crate) struct AppContext {
    /// The single focus owner.
    pub(crate) focus: Option<NodeId>,
    pub(crate) pointer: PointerState,
    /// Pointer position at the end of the previous tracking pass.
    pub(crate) last_pointer: Point,
    pub(crate) config: Box<dyn Config>,
    /// Sticky once set.
    pub(crate) exit_requested: bool,
    pub(crate) frame_index: u64,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("focus", &self.focus)
            .field("pointer", &self.pointer)
            .field("last_pointer", &self.last_pointer)
            .field("exit_requested", &self.exit_requested)
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self {
            focus: None,
            pointer: PointerState::default(),
            last_pointer: Point::ZERO,
            config: Box::new(NoConfig),
            exit_requested: false,
            frame_index: 0,
        }
    }
}

/// What one call to [`App::tick`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Index of the frame just processed.
    pub frame_index: u64,
    /// Region of the root display surface that was redrawn.
    pub damage: DamageRegion,
    /// Whether the root was presented.
    pub presented: bool,
    /// Whether an unconsumed [`Message::Quit`](crate::node::Message::Quit)
    /// has reached the root.
    pub exit_requested: bool,
}

/// A widget tree bound to a backend.
pub struct App<B: Backend> {
    scene: Scene,
    cx: AppContext,
    backend: B,
    root: NodeId,
    events: VecDeque<InputEvent>,
    sink: Option<Box<dyn TraceSink>>,
}

impl<B: Backend + fmt::Debug> fmt::Debug for App<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("scene", &self.scene)
            .field("cx", &self.cx)
            .field("backend", &self.backend)
            .field("root", &self.root)
            .field("events", &self.events.len())
            .field("tracing", &self.sink.is_some())
            .finish()
    }
}

impl<B: Backend> App<B> {
    /// Creates an application whose root node is built from `desc`.
    ///
    /// The root is the node that gets presented, so it needs its own
    /// surface.
    ///
    /// # Errors
    ///
    /// [`TreeError::TransparentRoot`] if `desc` is transparent.
    pub fn new(
        backend: B,
        desc: NodeDesc,
        widget: impl Widget + 'static,
    ) -> Result<Self, TreeError> {
        let transparent = desc.opacity == Opacity::Transparent;
        let mut scene = Scene::default();
        let mut cx = AppContext::default();
        let mut backend = backend;
        let mut ui = Ui::new(&mut scene, &mut cx, &mut backend, Tracer::none());
        let root = ui.create(desc, widget);
        if transparent {
            ui.destroy(root);
            return Err(TreeError::TransparentRoot(root));
        }
        Ok(Self {
            scene,
            cx,
            backend,
            root,
            events: VecDeque::new(),
            sink: None,
        })
    }

    /// Replaces the configuration collaborator.
    #[must_use]
    pub fn with_config(mut self, config: impl Config + 'static) -> Self {
        self.cx.config = Box::new(config);
        self
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Returns the backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the backend mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Borrows the tree for host-side operations.
    pub fn ui(&mut self) -> Ui<'_> {
        let tracer = Tracer::from_option(
            self.sink
                .as_deref_mut()
                .map(|s| s as &mut dyn TraceSink),
        );
        Ui::new(&mut self.scene, &mut self.cx, &mut self.backend, tracer)
    }

    /// Queues an input event for the next tick.
    pub fn push_event(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Sets the pointer state seen by the next tracking pass.
    pub fn set_pointer(&mut self, pointer: PointerState) {
        self.cx.pointer = pointer;
    }

    /// Drains `source` into the event queue and takes its pointer state.
    pub fn pump(&mut self, source: &mut dyn InputSource) {
        while let Some(event) = source.poll_event() {
            self.events.push_back(event);
        }
        self.cx.pointer = source.pointer();
    }

    /// Installs a trace sink, replacing any previous one.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = Some(sink);
    }

    /// Removes and returns the trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.sink.take()
    }

    /// Returns the focus owner.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.cx.focus
    }

    /// Returns whether an unconsumed quit message reached the root.
    #[must_use]
    pub fn exit_requested(&self) -> bool {
        self.cx.exit_requested
    }

    /// Runs one frame: dispatches queued input, tracks hover, runs update
    /// hooks, composites dirty regions and presents the root if it changed.
    pub fn tick(&mut self) -> FrameReport {
        let frame_index = self.cx.frame_index;
        let root = self.root;
        let events: Vec<InputEvent> = self.events.drain(..).collect();
        let mut summary = FrameSummaryBuilder::new(frame_index);
        summary.set_events(u32::try_from(events.len()).unwrap_or(u32::MAX));

        let mut ui = self.ui();
        ui.tracer.frame_begin(&FrameEvent { frame_index });

        ui.with_phase(PhaseKind::Dispatch, |ui| {
            for event in events {
                if !ui.scene.is_alive(root) {
                    break;
                }
                ui.dispatch_event(root, event);
            }
        });
        ui.with_phase(PhaseKind::Track, |ui| {
            if ui.scene.is_alive(root) {
                ui.track_frame(root);
            }
        });
        ui.with_phase(PhaseKind::Update, |ui| {
            if ui.scene.is_alive(root) && ui.scene.is_live(root) {
                ui.update_tree(root);
            }
        });
        let damage = ui.with_phase(PhaseKind::Composite, |ui| {
            if ui.scene.is_alive(root) {
                ui.composite_node(root, &mut summary)
            } else {
                DamageRegion::None
            }
        });
        let presented = ui.with_phase(PhaseKind::Present, |ui| {
            if damage.is_empty() || !ui.scene.is_alive(root) {
                return false;
            }
            let Some(surfaces) = ui.scene.surfaces(root) else {
                return false;
            };
            ui.backend.present(surfaces.display, &damage);
            true
        });

        summary.set_presented(presented);
        ui.tracer.frame_summary(&summary.finish());
        ui.tracer.frame_end(&FrameEvent { frame_index });

        self.cx.frame_index += 1;
        FrameReport {
            frame_index,
            damage,
            presented,
            exit_requested: self.cx.exit_requested,
        }
    }
}
