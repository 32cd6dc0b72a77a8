// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! [`App::tick`](crate::App::tick) and the tree operations call as they run.
//! All method bodies default to no-ops, so implementing only the events you
//! care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! The core has no clock. Sinks that need timings stamp events on receipt.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates per-node [`DamageRect`] events
//!   and the corresponding `TraceSink` method.

use crate::node::{Message, NodeId};
#[cfg(feature = "trace-rich")]
use crate::rect::Rect;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of [`App::tick`](crate::App::tick) is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Queued input events are dispatched into the tree.
    Dispatch,
    /// Per-frame hover re-check and `track` hooks.
    Track,
    /// Post-order `update` hooks over live nodes.
    Update,
    /// Dirty-region redraw of every surface.
    Composite,
    /// Handing the root surface to the backend.
    Present,
}

impl PhaseKind {
    /// All phases, in execution order.
    pub const ALL: [Self; 5] = [
        Self::Dispatch,
        Self::Track,
        Self::Update,
        Self::Composite,
        Self::Present,
    ];

    /// A short lowercase label.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dispatch => "dispatch",
            Self::Track => "track",
            Self::Update => "update",
            Self::Composite => "composite",
            Self::Present => "present",
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted at the start and end of every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Marks the beginning of a frame-loop phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
}

/// Marks the end of a frame-loop phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
}

/// Emitted whenever the focus owner changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Previous focus owner.
    pub from: Option<NodeId>,
    /// New focus owner.
    pub to: Option<NodeId>,
}

/// Emitted when a message bubbled to the root without being consumed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageDroppedEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The node that last forwarded the message.
    pub sender: NodeId,
    /// The message.
    pub message: Message,
}

/// Per-frame redraw summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Input events dispatched this frame.
    pub events: u32,
    /// Non-transparent nodes that redrew at least one region.
    pub redrawn_nodes: u32,
    /// Total redrawn area over all surfaces, in pixels.
    pub redrawn_area: i64,
    /// Whether the root surface was presented.
    pub presented: bool,
}

/// An axis-aligned damage rectangle.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

#[cfg(feature = "trace-rich")]
impl From<Rect> for DamageRect {
    fn from(r: Rect) -> Self {
        Self {
            x: r.x,
            y: r.y,
            width: r.w.max(0).unsigned_abs(),
            height: r.h.max(0).unsigned_abs(),
        }
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the frame loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a frame starts.
    fn on_frame_begin(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called when a frame ends, after the summary.
    fn on_frame_end(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called at the beginning of a frame-loop phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a frame-loop phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called when the focus owner changes.
    fn on_focus(&mut self, e: &FocusEvent) {
        _ = e;
    }

    /// Called when an unconsumed message is dropped at the root.
    fn on_message_dropped(&mut self, e: &MessageDroppedEvent) {
        _ = e;
    }

    /// Called with a per-frame redraw summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Called with the regions one node redrew (requires `trace-rich`
    /// feature). Rectangles are in the node's own space.
    #[cfg(feature = "trace-rich")]
    fn on_damage_rects(&mut self, frame_index: u64, node: NodeId, rects: &[DamageRect]) {
        _ = (frame_index, node, rects);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        Self::from_option(Some(sink))
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::from_option(None)
    }

    /// Creates a tracer from an optional sink.
    #[inline]
    #[must_use]
    pub fn from_option(sink: Option<&'a mut dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits the start of a frame.
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits the end of a frame.
    #[inline]
    pub fn frame_end(&mut self, e: &FrameEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FocusEvent`].
    #[inline]
    pub fn focus(&mut self, e: &FocusEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_focus(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`MessageDroppedEvent`].
    #[inline]
    pub fn message_dropped(&mut self, e: &MessageDroppedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_message_dropped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits the regions one node redrew (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn damage_rects(&mut self, frame_index: u64, node: NodeId, rects: &[DamageRect]) {
        if let Some(s) = &mut self.sink {
            s.on_damage_rects(frame_index, node, rects);
        }
    }

    /// Returns whether a sink is attached.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects redraw statistics during a frame and produces a [`FrameSummary`].
#[derive(Clone, Copy, Debug)]
pub struct FrameSummaryBuilder {
    summary: FrameSummary,
}

impl FrameSummaryBuilder {
    /// Starts building a summary for the given frame.
    #[must_use]
    pub fn new(frame_index: u64) -> Self {
        Self {
            summary: FrameSummary {
                frame_index,
                ..FrameSummary::default()
            },
        }
    }

    /// Records the number of input events dispatched.
    pub fn set_events(&mut self, events: u32) {
        self.summary.events = events;
    }

    /// Records one node's redraw of `area` pixels.
    pub fn record_redraw(&mut self, area: i64) {
        self.summary.redrawn_nodes += 1;
        self.summary.redrawn_area += area;
    }

    /// Sets whether the root surface was presented.
    pub fn set_presented(&mut self, presented: bool) {
        self.summary.presented = presented;
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        self.summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
