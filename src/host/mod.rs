//! Host tree abstraction
//!
//! The reconciler never touches a concrete rendering platform. All live-tree
//! mutations go through [`HostTree`], which a platform binding (a browser DOM,
//! a terminal UI, [`MemoryHost`] in tests) implements.

mod memory;
mod render;

pub use memory::{HostNode, HostNodeKind, MemoryHost, Mutation};
pub use render::render_html;

use std::fmt;

use crate::attr::AttrValue;
use crate::event::Handler;

// =============================================================================
// HostId
// =============================================================================

/// Opaque handle to a live host node.
///
/// A handle is owned by exactly one mounted VDOM node at a time. It is moved,
/// never shared, when a patch carries a node over into the new tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use]
pub struct HostId(u64);

impl HostId {
    /// Create a handle from a raw value chosen by the host
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value
    #[inline]
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostId({:x})", self.0)
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

// =============================================================================
// HostTree
// =============================================================================

/// Primitive operations on a live host tree.
///
/// Positions are indices into a parent's child list. Implementations are
/// infallible by contract: the reconciler only hands out handles it created
/// through this trait and has not yet removed.
pub trait HostTree {
    /// Create a detached element node
    fn create_element(&mut self, tag: &str) -> HostId;

    /// Create a detached text node
    fn create_text(&mut self, value: &str) -> HostId;

    /// Insert `child` into `parent` before the child currently at `index`.
    ///
    /// `child` is detached from its current parent first, so this also
    /// relocates an attached node. `None` or an index past the end appends.
    fn insert(&mut self, parent: HostId, child: HostId, index: Option<usize>);

    /// Detach a node from its parent and release it
    fn remove(&mut self, node: HostId);

    /// Position of `child` among the children of `parent`
    fn index_of(&self, parent: HostId, child: HostId) -> Option<usize>;

    /// Replace the content of a text node
    fn set_text(&mut self, node: HostId, value: &str);

    /// Set an attribute
    fn set_attribute(&mut self, node: HostId, name: &str, value: &AttrValue);

    /// Remove an attribute
    fn remove_attribute(&mut self, node: HostId, name: &str);

    /// Add a CSS class token
    fn add_class(&mut self, node: HostId, token: &str);

    /// Remove a CSS class token
    fn remove_class(&mut self, node: HostId, token: &str);

    /// Set an inline style property
    fn set_style(&mut self, node: HostId, name: &str, value: &str);

    /// Remove an inline style property
    fn remove_style(&mut self, node: HostId, name: &str);

    /// Bind an event handler
    fn add_listener(&mut self, node: HostId, event: &str, handler: &Handler);

    /// Unbind a previously bound event handler
    fn remove_listener(&mut self, node: HostId, event: &str, handler: &Handler);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_id_format() {
        let id = HostId::from_raw(255);
        assert_eq!(id.as_raw(), 255);
        assert_eq!(id.to_string(), "#ff");
        assert_eq!(format!("{id:?}"), "HostId(ff)");
    }
}
