//! Render-tree node types.
//!
//! A [`Node`] is an immutable description of a piece of UI produced by view
//! code. Once mounted, element and text nodes own the handle of the host node
//! they correspond to; fragments remember the host parent their children were
//! inserted into.
//!
//! # Construction
//!
//! ```
//! use tola_reconcile::node::{fragment, h, text, Element};
//!
//! let list = h("ul")
//!     .with_class("todo")
//!     .child(h("li").with_key("a").text("Buy milk"))
//!     .child(fragment([h("li").with_key("b").text("Walk dog")]))
//!     .child(text("done"))
//!     .child(None::<Element>);
//! assert_eq!(list.children.len(), 3);
//! ```
//!
//! Builders take any [`IntoChild`]. `None` children are skipped, which keeps
//! conditional children inline: `.child(show.then(|| h("p")))`.

mod element;
mod fragment;
mod text;

pub use element::{Element, DEFAULT_KEY_PROP};
pub use fragment::Fragment;
pub use text::Text;

use std::fmt;

use smallvec::SmallVec;

use crate::algo::StableHasher;
use crate::attr::AttrsExt;
use crate::host::HostId;

/// Type alias for children collection.
pub type Children = SmallVec<[Node; 8]>;

// =============================================================================
// NodeKind
// =============================================================================

/// Discriminant of a [`Node`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Element,
    Fragment,
    Text,
}

impl NodeKind {
    /// Lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::Fragment => "fragment",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Node
// =============================================================================

/// Node in a render tree - Element, Fragment or Text.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Box<Element>),
    Fragment(Box<Fragment>),
    Text(Text),
}

impl Node {
    impl_enum_accessors!(element, fragment, text);

    /// Node discriminant
    #[inline]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Element(_) => NodeKind::Element,
            Self::Fragment(_) => NodeKind::Fragment,
            Self::Text(_) => NodeKind::Text,
        }
    }

    /// Handle of the host node this node owns.
    ///
    /// Fragments own no host node and always return `None`.
    #[inline]
    pub fn host_id(&self) -> Option<HostId> {
        match self {
            Self::Element(e) => e.host,
            Self::Text(t) => t.host,
            Self::Fragment(_) => None,
        }
    }

    /// Check if this node is currently mounted
    pub fn is_mounted(&self) -> bool {
        match self {
            Self::Element(e) => e.host.is_some(),
            Self::Text(t) => t.host.is_some(),
            Self::Fragment(f) => f.container.is_some(),
        }
    }

    /// Handle of the first host node this subtree occupies in its parent
    pub fn first_host(&self) -> Option<HostId> {
        match self {
            Self::Fragment(f) => f.children.iter().find_map(Node::first_host),
            other => other.host_id(),
        }
    }

    /// Number of host-parent slots this subtree occupies.
    ///
    /// Elements and text nodes take one slot; fragments take the slots of
    /// their children.
    pub fn host_len(&self) -> usize {
        match self {
            Self::Fragment(f) => f.children.iter().map(Node::host_len).sum(),
            _ => 1,
        }
    }

    /// Child list, empty for text nodes
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Element(e) => &e.children,
            Self::Fragment(f) => &f.children,
            Self::Text(_) => &[],
        }
    }

    /// Deterministic hash of the node's content.
    ///
    /// Covers kind, tag, attributes, classes, styles, event names and the
    /// whole subtree. Handlers and host handles are not part of the hash.
    pub fn fingerprint(&self) -> u64 {
        self.hash_into(StableHasher::new()).finish()
    }

    fn hash_into(&self, hasher: StableHasher) -> StableHasher {
        let hasher = hasher.update_str(self.kind().name());
        match self {
            Self::Text(t) => hasher.update_str(&t.value),
            Self::Fragment(f) => hash_children(hasher, &f.children),
            Self::Element(e) => {
                let mut hasher = hasher.update_str(&e.tag);

                let mut attrs: Vec<_> = e.props.attrs.iter().collect();
                attrs.sort_unstable_by(|a, b| a.0.cmp(&b.0));
                for (k, v) in attrs {
                    hasher = hasher.update_str(k).update_str(&v.to_string());
                }

                let mut classes: Vec<_> = e.props.class.tokens().iter().collect();
                classes.sort_unstable();
                for token in classes {
                    hasher = hasher.update_str("class").update_str(token);
                }

                let mut styles: Vec<_> = e.props.style.iter().collect();
                styles.sort_unstable_by(|a, b| a.0.cmp(&b.0));
                for (k, v) in styles {
                    hasher = hasher.update_str("style").update_str(k).update_str(v);
                }

                let mut events: Vec<_> = e.props.on.iter().map(|(name, _)| name).collect();
                events.sort_unstable();
                for name in events {
                    hasher = hasher.update_str("on").update_str(name);
                }

                hash_children(hasher, &e.children)
            }
        }
    }

    /// Value of a keying attribute, if this is an element carrying it
    pub fn key(&self, key_prop: &str) -> Option<String> {
        self.as_element()
            .and_then(|e| e.props.attrs.get_attr(key_prop))
            .map(ToString::to_string)
    }
}

fn hash_children(hasher: StableHasher, children: &[Node]) -> StableHasher {
    let mut hasher = hasher.update_usize(children.len());
    for child in children {
        hasher = hasher.update_u64(child.fingerprint());
    }
    hasher
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Self::Element(Box::new(e))
    }
}

impl From<Fragment> for Node {
    fn from(f: Fragment) -> Self {
        Self::Fragment(Box::new(f))
    }
}

impl From<Text> for Node {
    fn from(t: Text) -> Self {
        Self::Text(t)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::Text(Text::new(s))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::Text(Text::new(s))
    }
}

// =============================================================================
// IntoChild
// =============================================================================

/// Value accepted as a child by the builders. `None` yields no child.
pub trait IntoChild {
    /// Convert into a child node, or `None` to skip
    fn into_child(self) -> Option<Node>;
}

macro_rules! impl_into_child {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoChild for $ty {
                #[inline]
                fn into_child(self) -> Option<Node> {
                    Some(self.into())
                }
            }
        )*
    };
}

impl_into_child!(Node, Element, Fragment, Text, &str, String);

impl<T: Into<Node>> IntoChild for Option<T> {
    #[inline]
    fn into_child(self) -> Option<Node> {
        self.map(Into::into)
    }
}

// =============================================================================
// Construction API
// =============================================================================

/// Create an element builder
pub fn h(tag: &str) -> Element {
    Element::new(tag)
}

/// Create a fragment from children
pub fn fragment<I>(children: I) -> Fragment
where
    I: IntoIterator,
    I::Item: IntoChild,
{
    Fragment::new(children)
}

/// Create a text node
pub fn text(value: impl Into<String>) -> Text {
    Text::new(value)
}

// =============================================================================
// Tests
// =============================================================================
