//! Element type - tagged nodes with properties and children

use compact_str::CompactString;

use crate::attr::{AttrValue, AttrsExt, ClassList, Props};
use crate::event::{Handler, Listeners};
use crate::host::HostId;

use super::{Children, IntoChild, Node, Text};

/// Attribute name used by [`Element::with_key`]
pub const DEFAULT_KEY_PROP: &str = "key";

// =============================================================================
// Element
// =============================================================================

/// Element with properties, children and, once mounted, its host handle
#[derive(Debug, PartialEq)]
pub struct Element {
    /// Tag name
    pub tag: CompactString,
    /// Declared properties
    pub props: Props,
    /// Child nodes
    pub children: Children,
    /// Handlers currently bound on the host node
    pub listeners: Listeners,
    /// Host node owned by this element while mounted
    pub host: Option<HostId>,
}

impl Element {
    /// Create an element without properties or children
    pub fn new(tag: impl Into<CompactString>) -> Self {
        Self {
            tag: tag.into(),
            props: Props::default(),
            children: Children::new(),
            listeners: Listeners::new(),
            host: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder
    // ─────────────────────────────────────────────────────────────────────────

    /// Set an attribute
    pub fn attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.props.attrs.set_attr(name, value.into());
        self
    }

    /// Add CSS classes (whitespace-separated string or token list)
    pub fn with_class(mut self, classes: impl Into<ClassList>) -> Self {
        let classes = classes.into();
        for token in classes.tokens() {
            self.props.class.add(token);
        }
        self
    }

    /// Set an inline style property
    pub fn style(mut self, name: &str, value: &str) -> Self {
        self.props.style.set_attr(name, value.into());
        self
    }

    /// Declare an event handler
    pub fn on(mut self, event: &str, handler: Handler) -> Self {
        self.props.on.set_attr(event, handler);
        self
    }

    /// Set the identity key used by keyed reconciliation
    pub fn with_key(self, key: impl Into<AttrValue>) -> Self {
        self.attr(DEFAULT_KEY_PROP, key)
    }

    /// Append a child node. `None` appends nothing.
    pub fn child(mut self, child: impl IntoChild) -> Self {
        self.children.extend(child.into_child());
        self
    }

    /// Append several child nodes, skipping `None`
    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoChild,
    {
        self.children.extend(children.into_iter().filter_map(IntoChild::into_child));
        self
    }

    /// Append a text child
    pub fn text(self, value: impl Into<String>) -> Self {
        self.child(Text::new(value))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Get attribute value by name
    pub fn get_attr(&self, name: &str) -> Option<&AttrValue> {
        self.props.attrs.get_attr(name)
    }

    /// Check if element has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Get text content of this element (concatenated from all text nodes)
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        collect_text(&self.children, &mut result);
        result
    }
}

fn collect_text(children: &[Node], buf: &mut String) {
    for child in children {
        match child {
            Node::Text(t) => buf.push_str(&t.value),
            Node::Element(e) => collect_text(&e.children, buf),
            Node::Fragment(f) => collect_text(&f.children, buf),
        }
    }
}

/// Cloning yields an unmounted copy: the host handle and bound listeners stay
/// with the original.
impl Clone for Element {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            props: self.props.clone(),
            children: self.children.clone(),
            listeners: Listeners::new(),
            host: None,
        }
    }
}
