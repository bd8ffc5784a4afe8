//! Property reconciliation for a single element
//!
//! Each of the four property maps is diffed on its own and applied removals
//! first.

use crate::algo::{diff_map, diff_set};
use crate::attr::AttrsExt;
use crate::host::{HostId, HostTree};
use crate::node::Element;

use super::Reconciler;

impl<H: HostTree + ?Sized> Reconciler<'_, H> {
    /// Bring the host node `id` from `old`'s properties to `new`'s.
    ///
    /// Moves the bound listener map from `old` to `new`, updated so it lists
    /// exactly the handlers now bound on the host.
    pub(super) fn patch_props(&mut self, id: HostId, old: &mut Element, new: &mut Element) {
        // Attributes (the key attribute never reaches the host)
        let attrs = diff_map(&old.props.attrs, &new.props.attrs);
        let key_prop = self.config.key_prop.clone();
        for name in attrs.removed.iter().filter(|k| k.as_str() != key_prop.as_str()) {
            self.host.remove_attribute(id, name);
            self.stats.attr_updates += 1;
        }
        for name in attrs.upserts().filter(|k| k.as_str() != key_prop.as_str()) {
            let Some(value) = new.props.attrs.get_attr(name) else { continue };
            if value.is_absent() {
                self.host.remove_attribute(id, name);
            } else {
                self.host.set_attribute(id, name, value);
            }
            self.stats.attr_updates += 1;
        }

        // Classes
        let classes = diff_set(old.props.class.tokens(), new.props.class.tokens());
        for token in &classes.removed {
            self.host.remove_class(id, token);
        }
        for token in &classes.added {
            self.host.add_class(id, token);
        }
        self.stats.class_updates += classes.len();

        // Styles
        let styles = diff_map(&old.props.style, &new.props.style);
        for name in &styles.removed {
            self.host.remove_style(id, name);
        }
        for name in styles.upserts() {
            if let Some(value) = new.props.style.get_attr(name) {
                self.host.set_style(id, name, value);
            }
        }
        self.stats.style_updates += styles.len();

        // Events: unbind what is bound for removed or replaced handlers, then
        // bind the new ones. Unchanged handlers stay bound and recorded.
        let events = diff_map(&old.props.on, &new.props.on);
        let mut bound = std::mem::take(&mut old.listeners);
        for name in events.removed.iter().chain(&events.updated) {
            if let Some(handler) = bound.remove_attr(name) {
                self.host.remove_listener(id, name, &handler);
                self.stats.listeners_unbound += 1;
            }
        }
        for name in events.upserts() {
            if let Some(handler) = new.props.on.get_attr(name) {
                self.host.add_listener(id, name, handler);
                bound.set_attr(name.clone(), handler.clone());
                self.stats.listeners_bound += 1;
            }
        }
        new.listeners = bound;
    }
}
