// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors for malformed tree operations.

use crate::node::NodeId;

/// A tree operation that would break the ownership invariants.
///
/// The operation is aborted before any state is changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The child is already registered under a parent.
    #[error("{child:?} is already attached to {parent:?}")]
    AlreadyAttached {
        /// The node being registered.
        child: NodeId,
        /// Its current parent.
        parent: NodeId,
    },
    /// The new parent is the child itself or one of its descendants.
    #[error("registering {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// The node being registered.
        child: NodeId,
        /// The requested parent.
        parent: NodeId,
    },
    /// The root of an application must own a surface to present.
    #[error("root {0:?} is transparent and has no surface to present")]
    TransparentRoot(NodeId),
}
