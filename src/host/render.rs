//! HTML rendering for the in-memory host
//!
//! Serializes a live [`MemoryHost`] subtree. Used for snapshot-style
//! assertions and headless output.

use super::memory::{HostNodeKind, MemoryHost};
use super::HostId;
use crate::attr::AttrValue;

/// Render a host subtree to an HTML string.
///
/// Released handles render as an empty string.
pub fn render_html(host: &MemoryHost, id: HostId) -> String {
    let mut output = String::new();
    render_node(host, id, &mut output);
    output
}

fn render_node(host: &MemoryHost, id: HostId, output: &mut String) {
    let Some(node) = host.node(id) else { return };

    let tag = match &node.kind {
        HostNodeKind::Text { value } => {
            output.push_str(&escape_html(value));
            return;
        }
        HostNodeKind::Element { tag } => tag,
    };

    output.push('<');
    output.push_str(tag);

    if !node.classes.is_empty() {
        push_attr(output, "class", &node.classes.to_string());
    }

    if !node.styles.is_empty() {
        let style = node
            .styles
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ");
        push_attr(output, "style", &style);
    }

    for (name, value) in &node.attrs {
        match value {
            AttrValue::Bool(true) => {
                output.push(' ');
                output.push_str(name);
            }
            value if value.is_absent() => {}
            value => push_attr(output, name, &value.to_string()),
        }
    }

    if is_void_element(tag) {
        output.push_str(" />");
        return;
    }

    output.push('>');

    for &child in &node.children {
        render_node(host, child, output);
    }

    output.push_str("</");
    output.push_str(tag);
    output.push('>');
}

fn push_attr(output: &mut String, name: &str, value: &str) {
    output.push(' ');
    output.push_str(name);
    output.push_str("=\"");
    output.push_str(&escape_attr(value));
    output.push('"');
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape attribute value special characters.
fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Check if element is a void element (self-closing).
fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

// =============================================================================
// Tests
// =============================================================================
