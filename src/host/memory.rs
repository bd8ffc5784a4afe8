//! In-memory host tree
//!
//! `MemoryHost` is an arena of host nodes that records every mutation it
//! receives. It backs headless rendering and lets reconciliation be asserted
//! on exactly (which nodes moved, which survived, which were recreated).
//!
//! Released slots are reused. A handle carries the generation of its slot,
//! so a stale handle never reaches the node that took its place. The
//! mutation log is unbounded until drained with
//! [`MemoryHost::take_mutations`] or [`MemoryHost::clear_mutations`].

use compact_str::CompactString;
use tracing::{trace, warn};

use super::{HostId, HostTree};
use crate::attr::{AttrKey, AttrValue, Attrs, AttrsExt, ClassList, Styles};
use crate::event::{Event, Handler, Listeners};

// =============================================================================
// HostNode
// =============================================================================

/// Kind of a live host node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostNodeKind {
    Element { tag: CompactString },
    Text { value: String },
}

/// A live node in a [`MemoryHost`]
#[derive(Debug, Clone)]
pub struct HostNode {
    pub kind: HostNodeKind,
    pub parent: Option<HostId>,
    pub children: Vec<HostId>,
    pub attrs: Attrs,
    pub classes: ClassList,
    pub styles: Styles,
    pub listeners: Listeners,
}

impl HostNode {
    fn new(kind: HostNodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attrs: Attrs::new(),
            classes: ClassList::new(),
            styles: Styles::new(),
            listeners: Listeners::new(),
        }
    }

    /// Tag name, if this is an element
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            HostNodeKind::Element { tag } => Some(tag),
            HostNodeKind::Text { .. } => None,
        }
    }
}

// =============================================================================
// Mutation log
// =============================================================================

/// A single recorded host mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateElement { node: HostId, tag: CompactString },
    CreateText { node: HostId, value: String },
    Insert { parent: HostId, child: HostId, index: Option<usize> },
    Remove { node: HostId },
    SetText { node: HostId, value: String },
    SetAttribute { node: HostId, name: AttrKey, value: AttrValue },
    RemoveAttribute { node: HostId, name: AttrKey },
    AddClass { node: HostId, token: CompactString },
    RemoveClass { node: HostId, token: CompactString },
    SetStyle { node: HostId, name: AttrKey, value: CompactString },
    RemoveStyle { node: HostId, name: AttrKey },
    AddListener { node: HostId, event: AttrKey },
    RemoveListener { node: HostId, event: AttrKey },
}

impl Mutation {
    /// Check if this mutation creates a host node
    pub fn is_create(&self) -> bool {
        matches!(self, Self::CreateElement { .. } | Self::CreateText { .. })
    }

    /// Check if this mutation releases a host node
    pub fn is_remove(&self) -> bool {
        matches!(self, Self::Remove { .. })
    }
}

// =============================================================================
// MemoryHost
// =============================================================================

/// Arena slot, bumped to a new generation each time it is reused
#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<HostNode>,
}

/// Arena-backed host tree with a mutation log
#[derive(Debug, Default)]
pub struct MemoryHost {
    slots: Vec<Slot>,
    free: Vec<u32>,
    log: Vec<Mutation>,
}

impl MemoryHost {
    /// Create an empty host
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached root element without logging it
    pub fn create_root(&mut self, tag: &str) -> HostId {
        let id = self.alloc(HostNodeKind::Element { tag: tag.into() });
        trace!(node = %id, tag, "create root");
        id
    }

    /// Get a live node
    pub fn node(&self, id: HostId) -> Option<&HostNode> {
        self.slot(id).and_then(|slot| slot.node.as_ref())
    }

    /// Check if a handle refers to a live node
    pub fn is_live(&self, id: HostId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    /// Number of arena slots, live or free
    pub fn arena_len(&self) -> usize {
        self.slots.len()
    }

    /// Children of a node (empty for released nodes)
    pub fn children(&self, id: HostId) -> &[HostId] {
        self.node(id).map_or(&[][..], |n| n.children.as_slice())
    }

    /// Parent of a node
    pub fn parent(&self, id: HostId) -> Option<HostId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Attribute value of an element
    pub fn attribute(&self, id: HostId, name: &str) -> Option<&AttrValue> {
        self.node(id).and_then(|n| n.attrs.get_attr(name))
    }

    /// Check if an element carries a class token
    pub fn has_class(&self, id: HostId, token: &str) -> bool {
        self.node(id).is_some_and(|n| n.classes.contains(token))
    }

    /// Inline style value of an element
    pub fn style(&self, id: HostId, name: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.styles.get_attr(name)).map(CompactString::as_str)
    }

    /// Number of handlers bound for an event
    pub fn listener_count(&self, id: HostId, event: &str) -> usize {
        self.node(id)
            .map_or(0, |n| n.listeners.iter().filter(|(e, _)| e == event).count())
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: HostId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: HostId, out: &mut String) {
        let Some(node) = self.node(id) else { return };
        match &node.kind {
            HostNodeKind::Text { value } => out.push_str(value),
            HostNodeKind::Element { .. } => {
                for &child in &node.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Dispatch an event to the handlers bound on a node.
    ///
    /// Returns the number of handlers invoked.
    pub fn fire(&self, id: HostId, event: &str) -> usize {
        self.fire_event(&Event::new(event, id))
    }

    /// Dispatch a prepared event to the handlers bound on its target
    pub fn fire_event(&self, event: &Event) -> usize {
        let Some(node) = self.node(event.target) else {
            return 0;
        };
        let handlers: Vec<Handler> = node
            .listeners
            .iter()
            .filter(|(e, _)| *e == event.name)
            .map(|(_, h)| h.clone())
            .collect();
        for handler in &handlers {
            handler.call(event);
        }
        handlers.len()
    }

    /// Recorded mutations since the last drain
    pub fn mutations(&self) -> &[Mutation] {
        &self.log
    }

    /// Drain the mutation log
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.log)
    }

    /// Clear the mutation log
    pub fn clear_mutations(&mut self) {
        self.log.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Pack a slot index and generation into a handle
    fn handle(index: u32, generation: u32) -> HostId {
        HostId::from_raw((u64::from(generation) << 32) | u64::from(index))
    }

    /// Split a handle into slot index and generation
    fn unpack(id: HostId) -> (usize, u32) {
        let raw = id.as_raw();
        ((raw & u64::from(u32::MAX)) as usize, (raw >> 32) as u32)
    }

    fn slot(&self, id: HostId) -> Option<&Slot> {
        let (index, generation) = Self::unpack(id);
        self.slots.get(index).filter(|slot| slot.generation == generation)
    }

    fn slot_mut(&mut self, id: HostId) -> Option<&mut Slot> {
        let (index, generation) = Self::unpack(id);
        self.slots.get_mut(index).filter(|slot| slot.generation == generation)
    }

    fn alloc(&mut self, kind: HostNodeKind) -> HostId {
        let node = Some(HostNode::new(kind));
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                slot.generation = slot.generation.wrapping_add(1);
                slot.node = node;
                return Self::handle(index, slot.generation);
            }
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot { generation: 0, node });
        Self::handle(index, 0)
    }

    fn live_mut(&mut self, id: HostId, op: &'static str) -> Option<&mut HostNode> {
        let node = self.slot_mut(id).and_then(|slot| slot.node.as_mut());
        if node.is_none() {
            warn!(node = %id, op, "host call on released node");
        }
        node
    }

    fn detach(&mut self, id: HostId) {
        let Some(parent) = self.parent(id) else { return };
        if let Some(p) = self.live_mut(parent, "detach") {
            p.children.retain(|&c| c != id);
        }
        if let Some(n) = self.live_mut(id, "detach") {
            n.parent = None;
        }
    }

    fn release(&mut self, id: HostId) {
        let Some(node) = self.slot_mut(id).and_then(|slot| slot.node.take()) else {
            return;
        };
        self.free.push(Self::unpack(id).0 as u32);
        for child in node.children {
            self.release(child);
        }
    }
}

impl HostTree for MemoryHost {
    fn create_element(&mut self, tag: &str) -> HostId {
        let id = self.alloc(HostNodeKind::Element { tag: tag.into() });
        trace!(node = %id, tag, "create element");
        self.log.push(Mutation::CreateElement { node: id, tag: tag.into() });
        id
    }

    fn create_text(&mut self, value: &str) -> HostId {
        let id = self.alloc(HostNodeKind::Text { value: value.to_string() });
        trace!(node = %id, "create text");
        self.log.push(Mutation::CreateText { node: id, value: value.to_string() });
        id
    }

    fn insert(&mut self, parent: HostId, child: HostId, index: Option<usize>) {
        if !self.is_live(child) || !self.is_live(parent) {
            warn!(%parent, %child, "insert with released node");
            return;
        }
        self.detach(child);
        if let Some(p) = self.live_mut(parent, "insert") {
            let at = index.map_or(p.children.len(), |i| i.min(p.children.len()));
            p.children.insert(at, child);
        }
        if let Some(c) = self.live_mut(child, "insert") {
            c.parent = Some(parent);
        }
        trace!(%parent, %child, ?index, "insert");
        self.log.push(Mutation::Insert { parent, child, index });
    }

    fn remove(&mut self, node: HostId) {
        if !self.is_live(node) {
            warn!(%node, "remove of released node");
            return;
        }
        self.detach(node);
        self.release(node);
        trace!(%node, "remove");
        self.log.push(Mutation::Remove { node });
    }

    fn index_of(&self, parent: HostId, child: HostId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    fn set_text(&mut self, node: HostId, value: &str) {
        if let Some(HostNode { kind: HostNodeKind::Text { value: current }, .. }) =
            self.live_mut(node, "set_text")
        {
            *current = value.to_string();
            self.log.push(Mutation::SetText { node, value: value.to_string() });
        }
    }

    fn set_attribute(&mut self, node: HostId, name: &str, value: &AttrValue) {
        if value.is_absent() {
            self.remove_attribute(node, name);
            return;
        }
        if let Some(n) = self.live_mut(node, "set_attribute") {
            n.attrs.set_attr(name, value.clone());
            self.log.push(Mutation::SetAttribute {
                node,
                name: name.into(),
                value: value.clone(),
            });
        }
    }

    fn remove_attribute(&mut self, node: HostId, name: &str) {
        if let Some(n) = self.live_mut(node, "remove_attribute") {
            n.attrs.remove_attr(name);
            self.log.push(Mutation::RemoveAttribute { node, name: name.into() });
        }
    }

    fn add_class(&mut self, node: HostId, token: &str) {
        if let Some(n) = self.live_mut(node, "add_class") {
            n.classes.add(token);
            self.log.push(Mutation::AddClass { node, token: token.into() });
        }
    }

    fn remove_class(&mut self, node: HostId, token: &str) {
        if let Some(n) = self.live_mut(node, "remove_class") {
            n.classes = n.classes.tokens().iter().filter(|t| *t != token).collect();
            self.log.push(Mutation::RemoveClass { node, token: token.into() });
        }
    }

    fn set_style(&mut self, node: HostId, name: &str, value: &str) {
        if let Some(n) = self.live_mut(node, "set_style") {
            n.styles.set_attr(name, value.into());
            self.log.push(Mutation::SetStyle {
                node,
                name: name.into(),
                value: value.into(),
            });
        }
    }

    fn remove_style(&mut self, node: HostId, name: &str) {
        if let Some(n) = self.live_mut(node, "remove_style") {
            n.styles.remove_attr(name);
            self.log.push(Mutation::RemoveStyle { node, name: name.into() });
        }
    }

    fn add_listener(&mut self, node: HostId, event: &str, handler: &Handler) {
        if let Some(n) = self.live_mut(node, "add_listener") {
            n.listeners.push((event.into(), handler.clone()));
            self.log.push(Mutation::AddListener { node, event: event.into() });
        }
    }

    fn remove_listener(&mut self, node: HostId, event: &str, handler: &Handler) {
        if let Some(n) = self.live_mut(node, "remove_listener") {
            if let Some(pos) = n
                .listeners
                .iter()
                .position(|(e, h)| e == event && h.ptr_eq(handler))
            {
                n.listeners.remove(pos);
            }
            self.log.push(Mutation::RemoveListener { node, event: event.into() });
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
