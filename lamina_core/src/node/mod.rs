// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The node tree.
//!
//! Nodes live in a struct-of-arrays [`Scene`] and are addressed by
//! generational [`NodeId`] handles. Each node carries a rectangle in its
//! parent's coordinate space, a z-order, visibility and input flags, an
//! optional pair of backend surfaces, and a boxed [`Widget`] supplying its
//! behavior hooks.

mod id;
mod store;
mod traverse;
mod widget;

pub(crate) use id::INVALID;
pub use id::NodeId;
pub use store::{NodeDesc, NodeFlags, Opacity, Scene, Surfaces};
pub use traverse::Children;
pub use widget::{Group, Handled, Message, Widget};
