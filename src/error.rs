//! Error types for tola-reconcile.
//!
//! Every variant is an invariant violation raised by tree construction or call
//! ordering upstream of the reconciler. None of them is retried: reconciliation
//! is deterministic, so a retry would hit the same condition again.

use thiserror::Error;

use crate::node::NodeKind;

/// Errors that can occur while mounting, patching or destroying a tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// A node expected to be mounted has no host handle
    #[error("{kind} node is not mounted")]
    NotMounted {
        /// Kind of the offending node
        kind: NodeKind,
    },

    /// A node was mounted twice without being destroyed in between
    #[error("{kind} node is already mounted")]
    AlreadyMounted {
        /// Kind of the offending node
        kind: NodeKind,
    },

    /// Patch recursion went deeper than the configured limit
    #[error("patch depth limit exceeded: {depth} > {limit}")]
    DepthExceeded {
        /// Depth reached
        depth: usize,
        /// Configured limit
        limit: usize,
    },
}

/// Result type alias for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

impl ReconcileError {
    /// Create a not-mounted error for a node kind.
    pub fn not_mounted(kind: NodeKind) -> Self {
        Self::NotMounted { kind }
    }

    /// Create an already-mounted error for a node kind.
    pub fn already_mounted(kind: NodeKind) -> Self {
        Self::AlreadyMounted { kind }
    }
}
