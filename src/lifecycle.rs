//! Mount and destroy
//!
//! Mounting materializes a node as host nodes and attaches them under a
//! parent. Destroying reverses it bottom-up: children first, then listeners,
//! then the host node itself. Both record the outcome on the node: a mounted
//! node owns its host handle, a destroyed one owns nothing.

use crate::error::{ReconcileError, ReconcileResult};
use crate::host::{HostId, HostTree};
use crate::node::{Element, Node, NodeKind};
use crate::patch::Reconciler;

/// Mount `node` under `parent` at child position `index` (`None` appends)
pub fn mount<H>(node: &mut Node, parent: HostId, index: Option<usize>, host: &mut H) -> ReconcileResult<()>
where
    H: HostTree + ?Sized,
{
    Reconciler::new(host).mount(node, parent, index)
}

/// Destroy a mounted node, releasing its host nodes
pub fn destroy<H>(node: &mut Node, host: &mut H) -> ReconcileResult<()>
where
    H: HostTree + ?Sized,
{
    Reconciler::new(host).destroy(node)
}

impl<H: HostTree + ?Sized> Reconciler<'_, H> {
    /// Mount `node` under `parent` at child position `index`.
    ///
    /// A fragment inserts its children one after another starting at
    /// `index`. Mounting a node that already owns a host handle fails with
    /// [`ReconcileError::AlreadyMounted`], a tree deeper than
    /// [`PatchConfig::max_depth`](crate::patch::PatchConfig) with
    /// [`ReconcileError::DepthExceeded`]. A failed mount leaves neither the
    /// host nor `node` holding anything it created.
    pub fn mount(&mut self, node: &mut Node, parent: HostId, index: Option<usize>) -> ReconcileResult<()> {
        if node.is_mounted() {
            return Err(ReconcileError::already_mounted(node.kind()));
        }

        self.descend()?;
        let result = self.mount_node(node, parent, index);
        self.ascend();
        result
    }

    fn mount_node(&mut self, node: &mut Node, parent: HostId, index: Option<usize>) -> ReconcileResult<()> {
        match node {
            Node::Text(text) => {
                let id = self.host.create_text(&text.value);
                self.host.insert(parent, id, index);
                text.host = Some(id);
                self.stats.nodes_mounted += 1;
            }
            Node::Element(elem) => {
                let id = self.host.create_element(&elem.tag);
                elem.host = Some(id);
                self.mount_props(id, elem);
                if let Err(err) = self.mount_children(&mut elem.children, id, None) {
                    // Never inserted, so the host parent is untouched
                    for (event, handler) in elem.listeners.drain(..) {
                        self.host.remove_listener(id, &event, &handler);
                        self.stats.listeners_unbound += 1;
                    }
                    self.host.remove(id);
                    elem.host = None;
                    return Err(err);
                }
                self.host.insert(parent, id, index);
                self.stats.nodes_mounted += 1;
            }
            Node::Fragment(fragment) => {
                fragment.container = Some(parent);
                if let Err(err) = self.mount_children(&mut fragment.children, parent, index) {
                    fragment.container = None;
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Mount `children` consecutively from `index`. On failure the children
    /// mounted so far are destroyed again.
    fn mount_children(&mut self, children: &mut [Node], parent: HostId, index: Option<usize>) -> ReconcileResult<()> {
        let mut offset = 0;
        for i in 0..children.len() {
            if let Err(err) = self.mount(&mut children[i], parent, index.map(|at| at + offset)) {
                for child in &mut children[..i] {
                    self.discard(child);
                }
                return Err(err);
            }
            offset += children[i].host_len();
        }
        Ok(())
    }

    /// Write every declared property of `elem` to the fresh host node `id`
    fn mount_props(&mut self, id: HostId, elem: &mut Element) {
        let key_prop = self.config.key_prop.as_str();
        for (name, value) in &elem.props.attrs {
            if name.as_str() != key_prop && !value.is_absent() {
                self.host.set_attribute(id, name, value);
            }
        }
        for token in elem.props.class.tokens() {
            self.host.add_class(id, token);
        }
        for (name, value) in &elem.props.style {
            self.host.set_style(id, name, value);
        }

        debug_assert!(elem.listeners.is_empty(), "unmounted element with bound listeners");
        for (event, handler) in &elem.props.on {
            self.host.add_listener(id, event, handler);
            self.stats.listeners_bound += 1;
        }
        elem.listeners = elem.props.on.clone();
    }

    /// Destroy a mounted node, children first.
    ///
    /// Fails with [`ReconcileError::NotMounted`] if the node owns no host
    /// handle (fragments: was never mounted).
    pub fn destroy(&mut self, node: &mut Node) -> ReconcileResult<()> {
        match node {
            Node::Text(text) => {
                let id = text.host.take().ok_or_else(|| ReconcileError::not_mounted(NodeKind::Text))?;
                self.host.remove(id);
                self.stats.nodes_destroyed += 1;
            }
            Node::Element(elem) => {
                let id = elem.host.ok_or_else(|| ReconcileError::not_mounted(NodeKind::Element))?;
                for child in elem.children.iter_mut() {
                    self.destroy(child)?;
                }
                for (event, handler) in elem.listeners.drain(..) {
                    self.host.remove_listener(id, &event, &handler);
                    self.stats.listeners_unbound += 1;
                }
                self.host.remove(id);
                elem.host = None;
                self.stats.nodes_destroyed += 1;
            }
            Node::Fragment(fragment) => {
                if fragment.container.is_none() {
                    return Err(ReconcileError::not_mounted(NodeKind::Fragment));
                }
                for child in fragment.children.iter_mut() {
                    self.destroy(child)?;
                }
                fragment.container = None;
            }
        }
        Ok(())
    }

    /// Release whatever part of `node` is mounted, skipping unmounted parts.
    ///
    /// Unlike [`Reconciler::destroy`] this never fails. It cleans up trees
    /// left half-committed by a failed mount or patch.
    pub(crate) fn discard(&mut self, node: &mut Node) {
        match node {
            Node::Text(text) => {
                if let Some(id) = text.host.take() {
                    self.host.remove(id);
                    self.stats.nodes_destroyed += 1;
                }
            }
            Node::Element(elem) => {
                for child in elem.children.iter_mut() {
                    self.discard(child);
                }
                let Some(id) = elem.host.take() else {
                    elem.listeners.clear();
                    return;
                };
                for (event, handler) in elem.listeners.drain(..) {
                    self.host.remove_listener(id, &event, &handler);
                    self.stats.listeners_unbound += 1;
                }
                self.host.remove(id);
                self.stats.nodes_destroyed += 1;
            }
            Node::Fragment(fragment) => {
                for child in fragment.children.iter_mut() {
                    self.discard(child);
                }
                fragment.container = None;
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::AttrValue;
    use crate::event::Handler;
    use crate::host::{render_html, MemoryHost, Mutation};
    use crate::node::{fragment, h, text};
    use crate::patch::PatchConfig;

    fn nested(levels: usize, leaf: &str) -> Node {
        let mut node: Node = text(leaf).into();
        for _ in 1..levels {
            node = h("div").child(node).into();
        }
        node
    }

    #[test]
    fn test_mount_element() {
        let mut host = MemoryHost::new();
        let root = host.create_root("body");
        let mut node: Node = h("a")
            .with_key("k")
            .attr("href", "/home")
            .attr("hidden", None::<bool>)
            .with_class("nav")
            .style("color", "red")
            .on("click", Handler::new(|_| {}))
            .text("Home")
            .into();

        mount(&mut node, root, None, &mut host).unwrap();

        let id = node.host_id().unwrap();
        assert_eq!(host.children(root), [id]);
        assert_eq!(host.attribute(id, "href"), Some(&AttrValue::from("/home")));
        assert_eq!(host.attribute(id, "key"), None);
        assert_eq!(host.attribute(id, "hidden"), None);
        assert_eq!(host.listener_count(id, "click"), 1);
        assert_eq!(node.as_element().unwrap().listeners.len(), 1);
        assert_eq!(
            render_html(&host, root),
            r#"<body><a class="nav" style="color: red" href="/home">Home</a></body>"#
        );

        // Children are attached before the element is inserted
        let log = host.mutations();
        let insert_self = log.iter().position(|m| matches!(m, Mutation::Insert { child, .. } if *child == id));
        assert_eq!(insert_self, Some(log.len() - 1));
    }

    #[test]
    fn test_mount_fragment_at_index() {
        let mut host = MemoryHost::new();
        let root = host.create_root("body");
        let mut first: Node = text("[").into();
        let mut last: Node = text("]").into();
        mount(&mut first, root, None, &mut host).unwrap();
        mount(&mut last, root, None, &mut host).unwrap();

        let mut frag: Node = fragment([Node::from("a"), fragment(["b", "c"]).into(), Node::from("d")]).into();
        mount(&mut frag, root, Some(1), &mut host).unwrap();

        assert_eq!(host.text_content(root), "[abcd]");
        assert_eq!(frag.as_fragment().unwrap().container, Some(root));
        assert_eq!(frag.first_host(), Some(host.children(root)[1]));
    }

    #[test]
    fn test_mount_twice_is_error() {
        let mut host = MemoryHost::new();
        let root = host.create_root("body");
        let mut node: Node = h("div").into();
        mount(&mut node, root, None, &mut host).unwrap();
        let err = mount(&mut node, root, None, &mut host).unwrap_err();
        assert_eq!(err, ReconcileError::already_mounted(NodeKind::Element));
    }

    #[test]
    fn test_destroy_bottom_up() {
        let mut host = MemoryHost::new();
        let root = host.create_root("body");
        let mut node: Node = h("ul")
            .on("click", Handler::new(|_| {}))
            .child(h("li").text("a"))
            .child(fragment(["b"]))
            .into();
        mount(&mut node, root, None, &mut host).unwrap();
        let ul = node.host_id().unwrap();
        host.clear_mutations();

        destroy(&mut node, &mut host).unwrap();

        assert!(!node.is_mounted());
        assert!(node.children().iter().all(|c| !c.is_mounted()));
        assert!(host.children(root).is_empty());
        assert_eq!(host.live_count(), 1);

        let log = host.take_mutations();
        assert_eq!(log.last(), Some(&Mutation::Remove { node: ul }));
        assert!(log.contains(&Mutation::RemoveListener { node: ul, event: "click".into() }));
        assert_eq!(log.iter().filter(|m| m.is_remove()).count(), 4);
    }

    #[test]
    fn test_destroy_unmounted_is_error() {
        let mut host = MemoryHost::new();
        let mut node: Node = text("x").into();
        let err = destroy(&mut node, &mut host).unwrap_err();
        assert_eq!(err, ReconcileError::not_mounted(NodeKind::Text));

        let mut node: Node = fragment(["x"]).into();
        assert!(destroy(&mut node, &mut host).is_err());
    }

    #[test]
    fn test_depth_limit_applies_to_mount() {
        let config = PatchConfig::default().with_max_depth(4);
        let mut host = MemoryHost::new();
        let root = host.create_root("body");

        // Too deep: refused before anything reaches the host parent
        let mut deep = nested(5, "a");
        let err = Reconciler::with_config(&mut host, config.clone())
            .mount(&mut deep, root, None)
            .unwrap_err();
        assert_eq!(err, ReconcileError::DepthExceeded { depth: 5, limit: 4 });
        assert!(!deep.is_mounted());
        assert!(deep.children().iter().all(|c| !c.is_mounted()));
        assert!(host.children(root).is_empty());
        assert_eq!(host.live_count(), 1);

        // At the limit: mounts, and a re-render of the same shape patches
        let mut tree = nested(4, "a");
        Reconciler::with_config(&mut host, config.clone()).mount(&mut tree, root, None).unwrap();
        let tree = Reconciler::with_config(&mut host, config).patch(tree, nested(4, "b"), root).unwrap();
        assert!(tree.is_mounted());
        assert_eq!(host.text_content(root), "b");
    }

    #[test]
    fn test_failed_fragment_mount_rolls_back() {
        let mut host = MemoryHost::new();
        let root = host.create_root("body");
        let mut first: Node = text("[").into();
        mount(&mut first, root, None, &mut host).unwrap();

        let mut frag: Node = fragment([Node::from("a"), h("p").child(h("b").text("x")).into()]).into();
        let config = PatchConfig::default().with_max_depth(2);
        let err = Reconciler::with_config(&mut host, config)
            .mount(&mut frag, root, None)
            .unwrap_err();

        assert_eq!(err, ReconcileError::DepthExceeded { depth: 3, limit: 2 });
        assert!(!frag.is_mounted());
        assert_eq!(frag.first_host(), None);
        assert_eq!(host.children(root), [first.host_id().unwrap()]);
        assert_eq!(host.live_count(), 2);
    }
}
