// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained-mode widget scene graph with dirty-rectangle compositing.
//!
//! `lamina_core` keeps a tree of rectangular nodes, routes pointer and
//! keyboard input through it, tracks which regions changed since the last
//! frame, and composites only those regions into per-node backend surfaces.
//! It is `no_std` compatible (with `alloc`) and never touches pixels itself:
//! everything pixel-related goes through the [`Backend`](backend::Backend)
//! trait.
//!
//! # Architecture
//!
//! ```text
//!   host input ──► App::push_event / App::pump
//!                            │
//!   App::tick() ─────────────┘
//!       │
//!       ├─► dispatch   pointer + keyboard events, focus, messages
//!       ├─► track      hover enter/exit against the current pointer
//!       ├─► update     per-node update hooks
//!       ├─► composite  dirty rects ──► Backend::fill / Backend::blit
//!       └─► present    root surface ──► Backend::present
//! ```
//!
//! **[`rect`]**: Integer rectangles with named edge and corner anchors,
//! hit testing, intersection and union.
//!
//! **[`node`]**: Struct-of-arrays node tree with generational handles,
//! z-sorted children and the [`Widget`](node::Widget) hook trait.
//!
//! **[`dirty`]**: Per-node dirty-rectangle tracking. Explicit rectangles
//! propagate to ancestors; moves and visibility changes are derived from a
//! per-frame snapshot.
//!
//! **[`ui`]**: [`Ui`], the handle through which hosts and hooks change the
//! tree: registration, lifecycle, focus and message bubbling.
//!
//! **[`dispatch`]**: Hierarchical pointer and keyboard dispatch, hover
//! tracking and update hooks.
//!
//! **[`compose`]**: The post-order compositor, including flattening of
//! transparent nodes into their nearest surface-owning ancestor.
//!
//! **[`app`]**: [`App`], the owner of everything above, and its per-frame
//! [`tick`](App::tick).
//!
//! **[`config`]**: The key-control, style and option lookup collaborator.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-node
//!   damage-rect events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod app;
pub mod backend;
pub mod compose;
pub mod config;
pub mod damage;
pub mod dirty;
pub mod dispatch;
pub mod error;
pub mod input;
pub mod node;
pub mod rect;
pub mod trace;
pub mod ui;

#[cfg(test)]
mod testing;

pub use app::{App, FrameReport};
pub use backend::{AlphaMode, Backend, Color, SurfaceId};
pub use config::{Config, MapConfig, NoConfig, StyleValue};
pub use damage::DamageRegion;
pub use error::TreeError;
pub use input::{
    Buttons, InputEvent, InputSource, Key, KeyCombo, Modifiers, MouseButton, PointerSegment,
    PointerState,
};
pub use node::{Group, Handled, Message, NodeDesc, NodeFlags, NodeId, Opacity, Scene, Widget};
pub use rect::{Point, Rect, Size};
pub use ui::Ui;
