//! Child list reconciliation
//!
//! Both child lists are flattened first: a fragment contributes its children
//! in place, since it has no host node of its own. The flat lists are then
//! matched with [`diff_sequence`] over precomputed [`SlotKey`]s and the ops
//! replayed on the host, with positions offset by `base`.

use tracing::{debug, trace};

use crate::algo::{diff_sequence, SeqOp, SlotKey};
use crate::error::{ReconcileError, ReconcileResult};
use crate::host::{HostId, HostTree};
use crate::node::{Children, Node};

use super::Reconciler;

impl<H: HostTree + ?Sized> Reconciler<'_, H> {
    /// Reconcile `old` children into `new` children under host `parent`.
    ///
    /// `base` is the host index of the first child slot. `None` appends every
    /// added child.
    pub(super) fn patch_children(
        &mut self,
        old: Children,
        new: &mut Children,
        parent: HostId,
        base: Option<usize>,
    ) -> ReconcileResult<()> {
        let mut old_flat = Vec::with_capacity(old.len());
        flatten_owned(old, &mut old_flat);
        let mut new_flat = Vec::with_capacity(new.len());
        flatten_mut(new, parent, &mut new_flat);

        let identity = self.config.identity;
        let key_prop = self.config.key_prop.as_str();
        let old_keys: Vec<SlotKey> = old_flat.iter().map(|n| SlotKey::of(n, identity, key_prop)).collect();
        let new_keys: Vec<SlotKey> = new_flat.iter().map(|n| SlotKey::of(n, identity, key_prop)).collect();

        let diff = diff_sequence(&old_keys, &new_keys);
        if !diff.is_empty() {
            debug!(
                parent = %parent,
                kept = diff.stats.kept,
                added = diff.stats.added,
                removed = diff.stats.removed,
                moved = diff.stats.moved,
                "reconciling children"
            );
        }

        let mut old_slots: Vec<Option<Node>> = old_flat.into_iter().map(Some).collect();
        for op in diff.ops {
            if let Err(err) = self.apply_child_op(op, &mut old_slots, &mut new_flat, parent, base) {
                // Old children the ops never reached still sit in the host
                for node in old_slots.iter_mut().flatten() {
                    self.discard(node);
                }
                return Err(err);
            }
        }

        Ok(())
    }

    fn apply_child_op(
        &mut self,
        op: SeqOp,
        old_slots: &mut [Option<Node>],
        new_flat: &mut [&mut Node],
        parent: HostId,
        base: Option<usize>,
    ) -> ReconcileResult<()> {
        let at = |index: usize| base.map(|b| b + index);

        match op {
            SeqOp::Remove { old_idx, .. } => {
                if let Some(mut node) = take_slot(old_slots, old_idx) {
                    self.destroy(&mut node)?;
                }
            }
            SeqOp::Add { index } => {
                self.mount(&mut *new_flat[index], parent, at(index))?;
            }
            SeqOp::Move { from, to, old_idx } => {
                let Some(node) = take_slot(old_slots, old_idx) else { return Ok(()) };
                let id = node.host_id().ok_or_else(|| ReconcileError::not_mounted(node.kind()))?;
                trace!(node = %id, from, to, "moving child");
                self.host.insert(parent, id, at(to));
                self.stats.nodes_moved += 1;
                self.patch_node(node, &mut *new_flat[to], parent)?;
            }
            SeqOp::NoOp { old_idx, new_idx } => {
                if let Some(node) = take_slot(old_slots, old_idx) {
                    self.patch_node(node, &mut *new_flat[new_idx], parent)?;
                }
            }
        }
        Ok(())
    }
}

fn take_slot(slots: &mut [Option<Node>], index: usize) -> Option<Node> {
    let node = slots[index].take();
    debug_assert!(node.is_some(), "old child {index} consumed twice");
    node
}

/// Move non-fragment descendants of `children` into `out`, in order
fn flatten_owned(children: Children, out: &mut Vec<Node>) {
    for child in children {
        match child {
            Node::Fragment(fragment) => {
                let fragment = *fragment;
                flatten_owned(fragment.children, out);
            }
            other => out.push(other),
        }
    }
}

/// Collect non-fragment descendants of `children`, recording `parent` as the
/// container of every fragment passed through
fn flatten_mut<'a>(children: &'a mut Children, parent: HostId, out: &mut Vec<&'a mut Node>) {
    for child in children.iter_mut() {
        match child {
            Node::Fragment(fragment) => {
                fragment.container = Some(parent);
                flatten_mut(&mut fragment.children, parent, out);
            }
            other => out.push(other),
        }
    }
}
