//! Fragment type - a child list without a host node of its own

use crate::host::HostId;

use super::{Children, IntoChild};

/// Group of sibling nodes spliced into the parent's child list.
///
/// Fragments create no host node. While mounted, `container` records the host
/// parent the children were inserted into.
#[derive(Debug, Default, PartialEq)]
pub struct Fragment {
    /// Child nodes
    pub children: Children,
    /// Host parent of the children while mounted (not owned)
    pub container: Option<HostId>,
}

impl Fragment {
    /// Create a fragment from children, skipping `None`
    pub fn new<I>(children: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoChild,
    {
        Self {
            children: children.into_iter().filter_map(IntoChild::into_child).collect(),
            container: None,
        }
    }

    /// Check if the fragment has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Cloning yields an unmounted copy.
impl Clone for Fragment {
    fn clone(&self) -> Self {
        Self {
            children: self.children.clone(),
            container: None,
        }
    }
}
