//! Event handlers
//!
//! A [`Handler`] is a shared closure compared by identity, not by behavior:
//! two handlers are equal only if they are clones of the same `Arc`. This is
//! what lets the flat diff tell an unchanged handler from a re-created one.

use std::fmt;
use std::sync::Arc;

use crate::attr::{AttrKey, AttrValue};
use crate::host::HostId;

/// Declared event handlers (`event name -> handler`)
pub type EventMap = Vec<(AttrKey, Handler)>;

/// Handlers currently bound on a host node (`event name -> handler`)
pub type Listeners = Vec<(AttrKey, Handler)>;

/// Event delivered to a handler by the host
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Event name, e.g. `click`
    pub name: AttrKey,
    /// Host node the listener is bound on
    pub target: HostId,
    /// Optional payload supplied by the host
    pub detail: AttrValue,
}

impl Event {
    /// Create an event without payload
    pub fn new(name: impl Into<AttrKey>, target: HostId) -> Self {
        Self {
            name: name.into(),
            target,
            detail: AttrValue::Null,
        }
    }

    /// Attach a payload
    pub fn with_detail(mut self, detail: impl Into<AttrValue>) -> Self {
        self.detail = detail.into();
        self
    }
}

/// Shared event handler with identity equality
#[derive(Clone)]
pub struct Handler(Arc<dyn Fn(&Event) + Send + Sync>);

impl Handler {
    /// Wrap a closure
    pub fn new(f: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the handler
    #[inline]
    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    /// Check if two handlers are the same closure
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Arc::as_ptr(&self.0).cast::<()>())
    }
}
