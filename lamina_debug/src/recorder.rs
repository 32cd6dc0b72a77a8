// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records. The core has no clock, so every
//! record starts with the nanoseconds elapsed between the recorder's
//! creation and the event's arrival. [`decode`] reads the records back as an
//! iterator of [`Record`].
//!
//! [`on_damage_rects`](TraceSink::on_damage_rects) stores only the count and
//! total area of the rectangles.

use std::time::Instant;

use lamina_core::node::{Message, NodeId};
use lamina_core::trace::{
    DamageRect, FocusEvent, FrameEvent, FrameSummary, MessageDroppedEvent, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_BEGIN: u8 = 1;
const TAG_FRAME_END: u8 = 2;
const TAG_PHASE_BEGIN: u8 = 3;
const TAG_PHASE_END: u8 = 4;
const TAG_FOCUS: u8 = 5;
const TAG_MESSAGE_DROPPED: u8 = 6;
const TAG_FRAME_SUMMARY: u8 = 7;
const TAG_DAMAGE_RECTS: u8 = 8;

const MSG_CONTROL: u8 = 0;
const MSG_QUIT: u8 = 1;
const MSG_USER: u8 = 2;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug)]
pub struct RecorderSink {
    buf: Vec<u8>,
    start: Instant,
}

impl Default for RecorderSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderSink {
    /// Creates an empty recorder. Timestamps count from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            start: Instant::now(),
        }
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn begin(&mut self, tag: u8) {
        let elapsed = u64::try_from(self.start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.write_u8(tag);
        self.write_u64(elapsed);
    }

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_node(&mut self, id: NodeId) {
        self.write_u32(id.index());
        self.write_u32(id.generation());
    }

    fn write_option_node(&mut self, id: Option<NodeId>) {
        match id {
            Some(id) => {
                self.write_u8(1);
                self.write_node(id);
            }
            None => {
                self.write_u8(0);
                self.write_u32(0);
                self.write_u32(0);
            }
        }
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Dispatch => 0,
            PhaseKind::Track => 1,
            PhaseKind::Update => 2,
            PhaseKind::Composite => 3,
            PhaseKind::Present => 4,
        });
    }

    fn write_message(&mut self, m: &Message) {
        match m {
            Message::Control(name) => {
                self.write_u8(MSG_CONTROL);
                let bytes = name.as_bytes();
                let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
                self.write_u32(len);
                self.buf.extend_from_slice(&bytes[..len as usize]);
            }
            Message::Quit => self.write_u8(MSG_QUIT),
            Message::User(code) => {
                self.write_u8(MSG_USER);
                self.write_u64(*code);
            }
        }
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_begin(&mut self, e: &FrameEvent) {
        self.begin(TAG_FRAME_BEGIN);
        self.write_u64(e.frame_index);
    }

    fn on_frame_end(&mut self, e: &FrameEvent) {
        self.begin(TAG_FRAME_END);
        self.write_u64(e.frame_index);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.begin(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.begin(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
    }

    fn on_focus(&mut self, e: &FocusEvent) {
        self.begin(TAG_FOCUS);
        self.write_u64(e.frame_index);
        self.write_option_node(e.from);
        self.write_option_node(e.to);
    }

    fn on_message_dropped(&mut self, e: &MessageDroppedEvent) {
        self.begin(TAG_MESSAGE_DROPPED);
        self.write_u64(e.frame_index);
        self.write_node(e.sender);
        self.write_message(&e.message);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.begin(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u32(s.events);
        self.write_u32(s.redrawn_nodes);
        self.write_i64(s.redrawn_area);
        self.write_u8(u8::from(s.presented));
    }

    fn on_damage_rects(&mut self, frame_index: u64, node: NodeId, rects: &[DamageRect]) {
        self.begin(TAG_DAMAGE_RECTS);
        self.write_u64(frame_index);
        self.write_node(node);
        self.write_u32(u32::try_from(rects.len()).unwrap_or(u32::MAX));
        let area: u64 = rects
            .iter()
            .map(|r| u64::from(r.width) * u64::from(r.height))
            .sum();
        self.write_u64(area);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A node handle as recorded: slot index and generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    /// Slot index.
    pub index: u32,
    /// Generation counter.
    pub generation: u32,
}

impl From<NodeId> for NodeRef {
    fn from(id: NodeId) -> Self {
        Self {
            index: id.index(),
            generation: id.generation(),
        }
    }
}

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// Start of a frame.
    FrameBegin {
        /// Frame counter.
        frame_index: u64,
    },
    /// End of a frame.
    FrameEnd {
        /// Frame counter.
        frame_index: u64,
    },
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// Focus moved.
    Focus {
        /// Frame counter.
        frame_index: u64,
        /// Previous owner.
        from: Option<NodeRef>,
        /// New owner.
        to: Option<NodeRef>,
    },
    /// An unconsumed message was dropped at the root.
    MessageDropped {
        /// Frame counter.
        frame_index: u64,
        /// The node that last forwarded it.
        sender: NodeRef,
        /// The message.
        message: Message,
    },
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
    /// One node's redraw.
    DamageRects {
        /// Frame counter.
        frame_index: u64,
        /// The redrawn node.
        node: NodeRef,
        /// Number of rectangles.
        count: u32,
        /// Summed area of the rectangles.
        area: u64,
    },
}

/// One decoded record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Nanoseconds since the recorder was created.
    pub at_nanos: u64,
    /// The event.
    pub event: RecordedEvent,
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`Record`]s.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded records.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take(&mut self, n: usize) -> Option<&[u8]> {
        let end = self.pos.checked_add(n)?;
        let bytes = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        Some(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.take(4)?.try_into().ok()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take(8)?.try_into().ok()?))
    }

    fn read_i64(&mut self) -> Option<i64> {
        Some(i64::from_le_bytes(self.take(8)?.try_into().ok()?))
    }

    fn read_node(&mut self) -> Option<NodeRef> {
        Some(NodeRef {
            index: self.read_u32()?,
            generation: self.read_u32()?,
        })
    }

    fn read_option_node(&mut self) -> Option<Option<NodeRef>> {
        let present = self.read_u8()?;
        let node = self.read_node()?;
        Some((present != 0).then_some(node))
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Dispatch,
            1 => PhaseKind::Track,
            2 => PhaseKind::Update,
            3 => PhaseKind::Composite,
            _ => PhaseKind::Present,
        })
    }

    fn read_message(&mut self) -> Option<Message> {
        Some(match self.read_u8()? {
            MSG_CONTROL => {
                let len = self.read_u32()? as usize;
                let bytes = self.take(len)?;
                Message::Control(String::from_utf8_lossy(bytes).into_owned())
            }
            MSG_QUIT => Message::Quit,
            MSG_USER => Message::User(self.read_u64()?),
            _ => return None,
        })
    }

    fn decode_event(&mut self, tag: u8) -> Option<RecordedEvent> {
        Some(match tag {
            TAG_FRAME_BEGIN => RecordedEvent::FrameBegin {
                frame_index: self.read_u64()?,
            },
            TAG_FRAME_END => RecordedEvent::FrameEnd {
                frame_index: self.read_u64()?,
            },
            TAG_PHASE_BEGIN => RecordedEvent::PhaseBegin(PhaseBeginEvent {
                frame_index: self.read_u64()?,
                phase: self.read_phase()?,
            }),
            TAG_PHASE_END => RecordedEvent::PhaseEnd(PhaseEndEvent {
                frame_index: self.read_u64()?,
                phase: self.read_phase()?,
            }),
            TAG_FOCUS => RecordedEvent::Focus {
                frame_index: self.read_u64()?,
                from: self.read_option_node()?,
                to: self.read_option_node()?,
            },
            TAG_MESSAGE_DROPPED => RecordedEvent::MessageDropped {
                frame_index: self.read_u64()?,
                sender: self.read_node()?,
                message: self.read_message()?,
            },
            TAG_FRAME_SUMMARY => RecordedEvent::FrameSummary(FrameSummary {
                frame_index: self.read_u64()?,
                events: self.read_u32()?,
                redrawn_nodes: self.read_u32()?,
                redrawn_area: self.read_i64()?,
                presented: self.read_u8()? != 0,
            }),
            TAG_DAMAGE_RECTS => RecordedEvent::DamageRects {
                frame_index: self.read_u64()?,
                node: self.read_node()?,
                count: self.read_u32()?,
                area: self.read_u64()?,
            },
            // Unknown tag: stop iteration.
            _ => return None,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        let at_nanos = self.read_u64()?;
        let event = self.decode_event(tag)?;
        Some(Record { at_nanos, event })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
