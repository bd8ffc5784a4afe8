//! Node identity: when two nodes occupy the same slot
//!
//! [`same_slot`] decides whether a patch can update a node in place or must
//! replace it. [`SlotKey`] extends it with an [`Identity`] strategy for
//! matching children across positions.

use compact_str::CompactString;

use crate::attr::{AttrValue, AttrsExt};
use crate::node::{Node, NodeKind};

/// Check if two nodes can be patched into each other.
///
/// Nodes of different kinds never match. Elements additionally need equal
/// tags. Text and fragment nodes match any node of their own kind.
pub fn same_slot(a: &Node, b: &Node) -> bool {
    match (a, b) {
        (Node::Element(x), Node::Element(y)) => x.tag == y.tag,
        _ => a.kind() == b.kind(),
    }
}

// =============================================================================
// Identity
// =============================================================================

/// Strategy for matching old and new children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Identity {
    /// Match by [`same_slot`] only
    #[default]
    Slot,
    /// Match by slot and equal key attribute (absent matches absent)
    Keyed,
    /// Match elements by slot and equal content fingerprint
    ///
    /// Text nodes still match by slot, so changed text is updated in place.
    Content,
}

// =============================================================================
// SlotKey
// =============================================================================

/// Precomputed identity of a child node under some [`Identity`].
///
/// Two children match exactly when their keys are equal. Computing keys once
/// per child keeps the quadratic matching scan free of hashing.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotKey {
    kind: NodeKind,
    tag: Option<CompactString>,
    key: Option<AttrValue>,
    fingerprint: Option<u64>,
}

impl SlotKey {
    /// Derive the key of `node`
    pub fn of(node: &Node, identity: Identity, key_prop: &str) -> Self {
        let elem = node.as_element();
        let key = match (identity, elem) {
            (Identity::Keyed, Some(e)) => e.props.attrs.get_attr(key_prop).filter(|v| !v.is_null()).cloned(),
            _ => None,
        };
        let fingerprint = match (identity, elem) {
            (Identity::Content, Some(_)) => Some(node.fingerprint()),
            _ => None,
        };

        Self {
            kind: node.kind(),
            tag: elem.map(|e| e.tag.clone()),
            key,
            fingerprint,
        }
    }

    /// Node kind this key was derived from
    pub fn kind(&self) -> NodeKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::node::{fragment, h, text};

    fn key(node: impl Into<Node>, identity: Identity) -> SlotKey {
        SlotKey::of(&node.into(), identity, "key")
    }

    #[test]
    fn test_same_slot() {
        let div: Node = h("div").attr("id", "a").into();
        let div2: Node = h("div").child("x").into();
        let span: Node = h("span").into();
        let t1: Node = text("a").into();
        let t2: Node = text("b").into();
        let frag: Node = fragment(["a"]).into();

        assert!(same_slot(&div, &div2));
        assert!(!same_slot(&div, &span));
        assert!(same_slot(&t1, &t2));
        assert!(!same_slot(&t1, &div));
        assert!(same_slot(&frag, &fragment(Vec::<Node>::new()).into()));
        assert!(!same_slot(&frag, &t1));
    }

    #[test]
    fn test_keyed_identity() {
        assert_eq!(key(h("li").with_key("a"), Identity::Keyed), key(h("li").with_key("a"), Identity::Keyed));
        assert_ne!(key(h("li").with_key("a"), Identity::Keyed), key(h("li").with_key("b"), Identity::Keyed));
        assert_ne!(key(h("li").with_key("a"), Identity::Keyed), key(h("li"), Identity::Keyed));
        assert_eq!(key(h("li"), Identity::Keyed), key(h("li"), Identity::Keyed));

        // Same key, different tag
        assert_ne!(key(h("li").with_key("a"), Identity::Keyed), key(h("p").with_key("a"), Identity::Keyed));

        // Keys are ignored by the slot strategy
        assert_eq!(key(h("li").with_key("a"), Identity::Slot), key(h("li").with_key("b"), Identity::Slot));
    }

    #[test]
    fn test_content_identity() {
        let a = || h("li").text("A");
        let b = || h("li").text("B");
        assert_eq!(key(a(), Identity::Content), key(a(), Identity::Content));
        assert_ne!(key(a(), Identity::Content), key(b(), Identity::Content));

        // Text nodes still match by slot
        assert_eq!(key(text("x"), Identity::Content), key(text("y"), Identity::Content));
    }

    fn arb_node() -> impl Strategy<Value = Node> {
        prop_oneof![
            "[ab]".prop_map(|s| Node::from(text(s))),
            (prop::sample::select(vec!["li", "p"]), prop::option::of("[xy]"), "[ab]").prop_map(|(tag, k, t)| {
                let mut e = h(tag).text(t);
                if let Some(k) = k {
                    e = e.with_key(k);
                }
                Node::from(e)
            }),
            Just(Node::from(fragment(["a"]))),
        ]
    }

    fn arb_identity() -> impl Strategy<Value = Identity> {
        prop::sample::select(vec![Identity::Slot, Identity::Keyed, Identity::Content])
    }

    proptest! {
        #[test]
        fn test_oracle_symmetry(a in arb_node(), b in arb_node(), identity in arb_identity()) {
            prop_assert_eq!(same_slot(&a, &b), same_slot(&b, &a));
            prop_assert!(same_slot(&a, &a));

            let ka = SlotKey::of(&a, identity, "key");
            let kb = SlotKey::of(&b, identity, "key");
            prop_assert_eq!(ka == kb, kb == ka);
            prop_assert_eq!(&ka, &SlotKey::of(&a, identity, "key"));

            // Every strategy refines the slot check
            if ka == kb {
                prop_assert!(same_slot(&a, &b));
            }
        }
    }
}
