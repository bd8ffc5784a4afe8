//! Patch executor
//!
//! Reconciles a committed tree against a freshly rendered one, mutating the
//! host tree in place.
//!
//! # Algorithm
//!
//! 1. Nodes in different slots (see [`same_slot`]) are replaced: the old
//!    subtree is destroyed and the new one mounted at the same position.
//! 2. Otherwise the host handle moves from the old node to the new one and
//!    the node's properties are reconciled with the flat diff.
//! 3. Child lists are flattened (fragments spliced into their parent) and
//!    reconciled with the sequence diff. Matched children recurse.
//!
//! # Ownership
//!
//! [`patch`] consumes both trees. Host handles of the old tree either move
//! into the returned committed tree or are released through destroy, so a
//! handle is never owned by two nodes.

mod children;
mod props;

use compact_str::CompactString;
use tracing::{debug, warn};

use crate::algo::{same_slot, Identity};
use crate::error::{ReconcileError, ReconcileResult};
use crate::host::{HostId, HostTree};
use crate::node::{Node, NodeKind, DEFAULT_KEY_PROP};

/// Default maximum tree depth accepted by mount and patch.
const DEFAULT_MAX_DEPTH: usize = 512;

// =============================================================================
// Public Types
// =============================================================================

/// Configuration for reconciliation.
///
/// The default matches children positionally by slot, which is what a view
/// without keys needs. Keyed lists should use [`PatchConfig::keyed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchConfig {
    /// How old and new children are matched
    pub identity: Identity,
    /// Attribute carrying the child key. Never written to the host.
    pub key_prop: CompactString,
    /// Maximum tree depth; deeper trees are refused by mount and patch with
    /// `DepthExceeded`
    pub max_depth: usize,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            identity: Identity::Slot,
            key_prop: DEFAULT_KEY_PROP.into(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl PatchConfig {
    /// Match children by key attribute.
    pub fn keyed() -> Self {
        Self {
            identity: Identity::Keyed,
            ..Self::default()
        }
    }

    /// Match element children by content fingerprint.
    ///
    /// Reordered but otherwise unchanged elements are moved instead of
    /// patched in place.
    pub fn by_content() -> Self {
        Self {
            identity: Identity::Content,
            ..Self::default()
        }
    }

    /// Set the recursion limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Use another attribute as child key.
    pub fn with_key_prop(mut self, key_prop: impl Into<CompactString>) -> Self {
        self.key_prop = key_prop.into();
        self
    }
}

/// Statistics from reconciliation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PatchStats {
    /// Number of nodes patched in place
    pub nodes_patched: usize,
    /// Number of text content updates
    pub text_updates: usize,
    /// Number of attributes set or removed
    pub attr_updates: usize,
    /// Number of class tokens added or removed
    pub class_updates: usize,
    /// Number of style properties set or removed
    pub style_updates: usize,
    /// Number of event handlers bound
    pub listeners_bound: usize,
    /// Number of event handlers unbound
    pub listeners_unbound: usize,
    /// Number of host nodes relocated
    pub nodes_moved: usize,
    /// Number of nodes replaced (destroyed and remounted)
    pub nodes_replaced: usize,
    /// Number of host nodes created
    pub nodes_mounted: usize,
    /// Number of host nodes released
    pub nodes_destroyed: usize,
}

impl PatchStats {
    /// Number of host mutations counted (not counting in-place matches)
    pub fn mutation_count(&self) -> usize {
        self.text_updates
            + self.attr_updates
            + self.class_updates
            + self.style_updates
            + self.listeners_bound
            + self.listeners_unbound
            + self.nodes_moved
            + self.nodes_mounted
            + self.nodes_destroyed
    }

    /// Check if the host tree was left untouched
    pub fn is_empty(&self) -> bool {
        self.mutation_count() == 0
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Patch `old` into `new` under host parent `parent`, using the default
/// configuration.
///
/// Returns the committed tree: `new` with host handles attached.
///
/// # Example
///
/// ```
/// use tola_reconcile::host::MemoryHost;
/// use tola_reconcile::lifecycle::mount;
/// use tola_reconcile::node::{h, Node};
/// use tola_reconcile::patch::patch;
///
/// let mut host = MemoryHost::new();
/// let root = host.create_root("body");
///
/// let mut old: Node = h("p").text("Hello").into();
/// mount(&mut old, root, None, &mut host).unwrap();
///
/// let new: Node = h("p").text("Hello, world").into();
/// let committed = patch(old, new, root, &mut host).unwrap();
/// assert!(committed.is_mounted());
/// assert_eq!(host.text_content(root), "Hello, world");
/// ```
pub fn patch<H>(old: Node, new: Node, parent: HostId, host: &mut H) -> ReconcileResult<Node>
where
    H: HostTree + ?Sized,
{
    Reconciler::new(host).patch(old, new, parent)
}

/// Patch with custom configuration.
pub fn patch_with_config<H>(
    old: Node,
    new: Node,
    parent: HostId,
    host: &mut H,
    config: PatchConfig,
) -> ReconcileResult<Node>
where
    H: HostTree + ?Sized,
{
    Reconciler::with_config(host, config).patch(old, new, parent)
}

// =============================================================================
// Reconciler
// =============================================================================

/// Reconciliation context bound to a host tree.
///
/// Accumulates [`PatchStats`] across calls, so one reconciler can be used for
/// a whole render pass.
pub struct Reconciler<'h, H: HostTree + ?Sized> {
    pub(crate) host: &'h mut H,
    pub(crate) config: PatchConfig,
    pub(crate) stats: PatchStats,
    depth: usize,
}

impl<'h, H: HostTree + ?Sized> Reconciler<'h, H> {
    /// Create a reconciler with the default configuration
    pub fn new(host: &'h mut H) -> Self {
        Self::with_config(host, PatchConfig::default())
    }

    /// Create a reconciler with custom configuration
    pub fn with_config(host: &'h mut H, config: PatchConfig) -> Self {
        Self {
            host,
            config,
            stats: PatchStats::default(),
            depth: 0,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    /// Statistics accumulated so far
    pub fn stats(&self) -> PatchStats {
        self.stats
    }

    /// Patch `old` into `new` under host parent `parent`.
    ///
    /// Returns the committed tree. On error both trees are released from the
    /// host: every host node the old tree owned or the patch created is
    /// removed, so the caller is left with an empty slot under `parent`. The
    /// error always stems from an invalid tree, call order or depth limit,
    /// not from the host.
    pub fn patch(&mut self, old: Node, mut new: Node, parent: HostId) -> ReconcileResult<Node> {
        self.depth = 0;
        if let Err(err) = self.patch_node(old, &mut new, parent) {
            warn!(parent = %parent, %err, "patch failed, releasing both trees");
            self.discard(&mut new);
            return Err(err);
        }
        debug!(
            parent = %parent,
            patched = self.stats.nodes_patched,
            mutations = self.stats.mutation_count(),
            "patch complete"
        );
        Ok(new)
    }

    /// Enter one level of recursion, failing once `max_depth` is reached
    pub(crate) fn descend(&mut self) -> ReconcileResult<()> {
        if self.depth >= self.config.max_depth {
            return Err(ReconcileError::DepthExceeded {
                depth: self.depth + 1,
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn ascend(&mut self) {
        self.depth -= 1;
    }

    /// Patch one node, guarding recursion depth.
    ///
    /// On error `old` is released rather than dropped with its host nodes
    /// still attached.
    pub(crate) fn patch_node(&mut self, mut old: Node, new: &mut Node, parent: HostId) -> ReconcileResult<()> {
        if let Err(err) = self.descend() {
            self.discard(&mut old);
            return Err(err);
        }
        let result = self.patch_in_place(old, new, parent);
        self.ascend();
        result
    }

    fn patch_in_place(&mut self, old: Node, new: &mut Node, parent: HostId) -> ReconcileResult<()> {
        if new.is_mounted() {
            return Err(ReconcileError::already_mounted(new.kind()));
        }

        if !same_slot(&old, new) {
            return self.replace(old, new, parent);
        }

        match (old, new) {
            (Node::Text(old), Node::Text(new)) => {
                let id = old.host.ok_or_else(|| ReconcileError::not_mounted(NodeKind::Text))?;
                if old.value != new.value {
                    self.host.set_text(id, &new.value);
                    self.stats.text_updates += 1;
                }
                new.host = Some(id);
            }
            (Node::Element(mut old), Node::Element(new)) => {
                let id = old.host.take().ok_or_else(|| ReconcileError::not_mounted(NodeKind::Element))?;
                new.host = Some(id);
                self.patch_props(id, &mut old, new);
                self.patch_children(std::mem::take(&mut old.children), &mut new.children, id, Some(0))?;
            }
            (Node::Fragment(mut old), Node::Fragment(new)) => {
                let container = old.container.ok_or_else(|| ReconcileError::not_mounted(NodeKind::Fragment))?;
                new.container = Some(container);
                // Fragment children start where the first old child sits.
                // Without old children the new ones are appended.
                let base = old
                    .children
                    .iter()
                    .find_map(Node::first_host)
                    .and_then(|id| self.host.index_of(container, id));
                self.patch_children(std::mem::take(&mut old.children), &mut new.children, container, base)?;
            }
            (old, new) => {
                debug_assert!(false, "same_slot admitted {} -> {}", old.kind(), new.kind());
                return self.replace(old, new, parent);
            }
        }

        self.stats.nodes_patched += 1;
        Ok(())
    }

    /// Destroy `old` and mount `new` where `old` was
    fn replace(&mut self, mut old: Node, new: &mut Node, parent: HostId) -> ReconcileResult<()> {
        let index = old.first_host().and_then(|id| self.host.index_of(parent, id));
        debug!(old = %old.kind(), new = %new.kind(), ?index, "replacing node");

        if let Err(err) = self.destroy(&mut old) {
            self.discard(&mut old);
            return Err(err);
        }

        // The replacement sits at the level of the node it replaces
        self.ascend();
        let mounted = self.mount(new, parent, index);
        self.depth += 1;
        mounted?;

        self.stats.nodes_replaced += 1;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
