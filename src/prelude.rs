//! Prelude for common imports.
//!
//! ```
//! use tola_reconcile::prelude::*;
//! ```

// Node types
pub use crate::node::{fragment, h, text, Children, Element, Fragment, IntoChild, Node, NodeKind, Text};

// Attributes and events
pub use crate::attr::{AttrKey, AttrValue, Attrs, AttrsExt, ClassList, Props, Styles};
pub use crate::event::{Event, Handler};

// Algorithms
pub use crate::algo::{
    apply_ops, diff_map, diff_sequence, diff_sequence_by, diff_set, same_slot, Identity, MapDiff,
    SeqDiff, SeqOp, SeqStats, SlotKey,
};

// Reconciliation
pub use crate::lifecycle::{destroy, mount};
pub use crate::patch::{patch, patch_with_config, PatchConfig, PatchStats, Reconciler};

// Host
pub use crate::host::{render_html, HostId, HostTree, MemoryHost, Mutation};

// App
pub use crate::app::{App, Command, Emitter};

// Error
pub use crate::error::{ReconcileError, ReconcileResult};
