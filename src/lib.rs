//! tola-reconcile - Virtual DOM reconciliation engine
//!
//! ## Core Concepts
//!
//! A view renders a fresh [`Node`] tree on every state change. The reconciler
//! compares it with the committed tree and applies the minimal set of
//! mutations to a live host tree, reusing host nodes wherever the two trees
//! agree.
//!
//! ## Modules
//! - `node`: Node/Element/Fragment/Text types and the `h` construction API
//! - `attr`: Attribute, class and style maps
//! - `event`: Event handlers compared by identity
//! - `algo`: Pure diffs (`same_slot`, `diff_map`, `diff_sequence`)
//! - `patch`: Patch executor (`patch`, `Reconciler`, `PatchConfig`)
//! - `lifecycle`: `mount` and `destroy`
//! - `host`: `HostTree` abstraction and the in-memory `MemoryHost`
//! - `app`: State + view + reducers render loop
//!
//! ## Usage
//!
//! ```
//! use tola_reconcile::prelude::*;
//!
//! let mut host = MemoryHost::new();
//! let root = host.create_root("body");
//!
//! fn view(items: &[&str]) -> Node {
//!     h("ul").with_children(items.iter().map(|i| h("li").with_key(*i).text(*i))).into()
//! }
//!
//! let mut tree = view(&["a", "b", "c"]);
//! mount(&mut tree, root, None, &mut host).unwrap();
//!
//! let tree = patch_with_config(tree, view(&["c", "a"]), root, &mut host, PatchConfig::keyed()).unwrap();
//! assert_eq!(host.text_content(root), "ca");
//! assert!(tree.is_mounted());
//! ```

#[macro_use]
mod macros;

// =============================================================================
// Core modules
// =============================================================================

/// Node types: Element, Fragment, Node, Text
pub mod node;

/// Attribute types
pub mod attr;

/// Event handlers
pub mod event;

/// Algorithms: slot identity, flat diff, sequence diff
pub mod algo;

/// Patch executor
pub mod patch;

/// Mount and destroy
pub mod lifecycle;

/// Host tree abstraction
pub mod host;

/// Application render loop
pub mod app;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Node types
pub use node::{fragment, h, text, Children, Element, Fragment, IntoChild, Node, NodeKind, Text};

// Attribute types
pub use attr::{AttrKey, AttrValue, Attrs, ClassList, Props, Styles};

// Events
pub use event::{Event, Handler};

// Algorithms
pub use algo::{diff_map, diff_sequence, same_slot, Identity, MapDiff, SeqDiff, SeqOp};

// Patch
pub use lifecycle::{destroy, mount};
pub use patch::{patch, patch_with_config, PatchConfig, PatchStats, Reconciler};

// Host
pub use host::{HostId, HostTree, MemoryHost};

// Error types
pub use error::{ReconcileError, ReconcileResult};

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    // Trees built on one thread can be handed to another for patching
    assert_impl_all!(Node: Send, Sync);
    assert_impl_all!(Handler: Send, Sync, Clone);
    assert_impl_all!(ReconcileError: std::error::Error, Send, Sync);
    assert_impl_all!(app::Emitter<u32>: Send, Sync, Clone);

    #[test]
    fn test_crate_exports() {
        let node: Node = h("p").child(text("x")).child(fragment(["y"])).into();
        assert_eq!(node.kind(), NodeKind::Element);
        assert!(same_slot(&node, &h("p").into()));
    }
}
