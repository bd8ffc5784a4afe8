//! Text node type
//!
//! Simple text content nodes in the render tree.

use crate::host::HostId;

// =============================================================================
// Text
// =============================================================================

/// Text content node
#[derive(Debug, PartialEq)]
pub struct Text {
    /// Text content
    pub value: String,
    /// Host text node owned by this node while mounted
    pub host: Option<HostId>,
}

impl Text {
    /// Create a new text node
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            host: None,
        }
    }

    /// Check if text content is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Get text length in bytes
    pub fn len(&self) -> usize {
        self.value.len()
    }
}

/// Cloning yields an unmounted copy.
impl Clone for Text {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}
