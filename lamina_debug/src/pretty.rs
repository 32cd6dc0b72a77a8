// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Phase lines
//! carry the time elapsed since the sink was created.

use std::io::Write;
use std::time::Instant;

use lamina_core::node::{Message, NodeId};
use lamina_core::trace::{
    DamageRect, FocusEvent, FrameEvent, FrameSummary, MessageDroppedEvent, PhaseBeginEvent,
    PhaseEndEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    start: Instant,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("start", &self.start)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            start: Instant::now(),
        }
    }

    /// Consumes the sink and returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn elapsed_us(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1_000_000.0
    }
}

fn node(id: Option<NodeId>) -> String {
    id.map_or_else(|| "-".to_owned(), |id| format!("#{}", id.index()))
}

fn message(m: &Message) -> String {
    match m {
        Message::Control(name) => format!("control:{name}"),
        Message::Quit => "quit".to_owned(),
        Message::User(code) => format!("user:{code}"),
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameEvent) {
        let _ = writeln!(self.writer, "[frame:begin] frame={}", e.frame_index);
    }

    fn on_frame_end(&mut self, e: &FrameEvent) {
        let _ = writeln!(self.writer, "[frame:end] frame={}", e.frame_index);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let at = self.elapsed_us();
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} at {at:.1}µs",
            e.frame_index,
            e.phase.name(),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let at = self.elapsed_us();
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} at {at:.1}µs",
            e.frame_index,
            e.phase.name(),
        );
    }

    fn on_focus(&mut self, e: &FocusEvent) {
        let _ = writeln!(
            self.writer,
            "[focus] frame={} {} -> {}",
            e.frame_index,
            node(e.from),
            node(e.to),
        );
    }

    fn on_message_dropped(&mut self, e: &MessageDroppedEvent) {
        let _ = writeln!(
            self.writer,
            "[dropped] frame={} from={} {}",
            e.frame_index,
            node(Some(e.sender)),
            message(&e.message),
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let presented = if s.presented { "yes" } else { "no" };
        let _ = writeln!(
            self.writer,
            "[summary] frame={} events={} redrawn={} area={}px presented={presented}",
            s.frame_index, s.events, s.redrawn_nodes, s.redrawn_area,
        );
    }

    fn on_damage_rects(&mut self, frame_index: u64, node_id: NodeId, rects: &[DamageRect]) {
        let _ = writeln!(
            self.writer,
            "[damage] frame={frame_index} node={} rects={}",
            node(Some(node_id)),
            rects.len(),
        );
    }
}
