// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use lamina_core::node::Message;
use serde_json::{Value, json};

use crate::recorder::{NodeRef, Record, RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Phases become duration slices; everything else is an instant event.
/// Timestamps are the recorder's receipt times, in microseconds.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes).map(to_json).collect();
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn to_json(record: Record) -> Value {
    let ts = record.at_nanos as f64 / 1000.0;
    match record.event {
        RecordedEvent::FrameBegin { frame_index } => instant("FrameBegin", "Frame", ts, json!({
            "frame_index": frame_index,
        })),
        RecordedEvent::FrameEnd { frame_index } => instant("FrameEnd", "Frame", ts, json!({
            "frame_index": frame_index,
        })),
        RecordedEvent::PhaseBegin(e) => json!({
            "ph": "B",
            "name": e.phase.name(),
            "cat": "Phase",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "args": {
                "frame_index": e.frame_index,
            }
        }),
        RecordedEvent::PhaseEnd(e) => json!({
            "ph": "E",
            "name": e.phase.name(),
            "cat": "Phase",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "args": {
                "frame_index": e.frame_index,
            }
        }),
        RecordedEvent::Focus {
            frame_index,
            from,
            to,
        } => instant("Focus", "Input", ts, json!({
            "frame_index": frame_index,
            "from": from.map(node),
            "to": to.map(node),
        })),
        RecordedEvent::MessageDropped {
            frame_index,
            sender,
            message,
        } => {
            let message = match message {
                Message::Control(name) => json!({ "control": name }),
                Message::Quit => json!("quit"),
                Message::User(code) => json!({ "user": code }),
            };
            instant("MessageDropped", "Input", ts, json!({
                "frame_index": frame_index,
                "sender": node(sender),
                "message": message,
            }))
        }
        RecordedEvent::FrameSummary(s) => instant("FrameSummary", "Summary", ts, json!({
            "frame_index": s.frame_index,
            "events": s.events,
            "redrawn_nodes": s.redrawn_nodes,
            "redrawn_area": s.redrawn_area,
            "presented": s.presented,
        })),
        RecordedEvent::DamageRects {
            frame_index,
            node: id,
            count,
            area,
        } => instant("DamageRects", "Rich", ts, json!({
            "frame_index": frame_index,
            "node": node(id),
            "count": count,
            "area": area,
        })),
    }
}

fn instant(name: &str, cat: &str, ts: f64, args: Value) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": cat,
        "ts": ts,
        "pid": 0,
        "tid": 0,
        "s": "t",
        "args": args,
    })
}

fn node(id: NodeRef) -> String {
    format!("{}@gen{}", id.index, id.generation)
}
