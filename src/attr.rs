//! Property system for VDOM elements
//!
//! Element properties are split into four flat maps that are diffed
//! independently: plain attributes, CSS classes, inline styles and event
//! handlers (see [`crate::event`]).
//!
//! Every map is a `Vec<(key, value)>` with unique keys. Insertion order is
//! kept so that mounting and rendering are deterministic.

use std::fmt;

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::event::EventMap;

/// Attribute, style and event names
pub type AttrKey = CompactString;

/// Element attributes as ordered key-value pairs
pub type Attrs = Vec<(AttrKey, AttrValue)>;

/// Inline style declarations (`property -> value`)
pub type Styles = Vec<(AttrKey, CompactString)>;

// =============================================================================
// AttrValue
// =============================================================================

/// Attribute value.
///
/// `Null` means "unset": assigning it to a host attribute removes the attribute.
/// Booleans follow HTML boolean attributes: `true` is present with no value,
/// `false` is absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttrValue {
    Str(CompactString),
    Number(f64),
    Bool(bool),
    #[default]
    Null,
}

impl AttrValue {
    /// Check if this value unsets the attribute
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if the attribute is absent from the host when set to this value
    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Null | Self::Bool(false))
    }

    /// Get the value as a string slice if it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => Ok(()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<CompactString> for AttrValue {
    fn from(s: CompactString) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

// =============================================================================
// AttrsExt
// =============================================================================

/// Map-like operations on `Vec<(AttrKey, V)>`
pub trait AttrsExt<V> {
    /// Get a value by name
    fn get_attr(&self, name: &str) -> Option<&V>;

    /// Check if a name exists
    fn has_attr(&self, name: &str) -> bool;

    /// Set a value (insert or update)
    fn set_attr(&mut self, name: impl Into<AttrKey>, value: V);

    /// Remove a name, returning the old value if present
    fn remove_attr(&mut self, name: &str) -> Option<V>;
}

impl<V> AttrsExt<V> for Vec<(AttrKey, V)> {
    fn get_attr(&self, name: &str) -> Option<&V> {
        self.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    fn has_attr(&self, name: &str) -> bool {
        self.iter().any(|(k, _)| k == name)
    }

    fn set_attr(&mut self, name: impl Into<AttrKey>, value: V) {
        let name = name.into();
        if let Some(attr) = self.iter_mut().find(|(k, _)| *k == name) {
            attr.1 = value;
        } else {
            self.push((name, value));
        }
    }

    fn remove_attr(&mut self, name: &str) -> Option<V> {
        self.iter()
            .position(|(k, _)| k == name)
            .map(|pos| self.remove(pos).1)
    }
}

// =============================================================================
// ClassList
// =============================================================================

/// Set of CSS class tokens.
///
/// Built from a whitespace-separated string or a token list. Blank tokens are
/// dropped and duplicates are ignored, so the list behaves as a set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList(SmallVec<[CompactString; 4]>);

impl ClassList {
    /// Create an empty class list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whitespace-separated class string
    pub fn parse(classes: &str) -> Self {
        classes.split_whitespace().collect()
    }

    /// Add a token, ignoring blanks and duplicates
    pub fn add(&mut self, token: &str) {
        let token = token.trim();
        if !token.is_empty() && !self.contains(token) {
            self.0.push(token.into());
        }
    }

    /// Check if a token is present
    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    /// Tokens in insertion order
    pub fn tokens(&self) -> &[CompactString] {
        &self.0
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no tokens
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ClassList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        for token in iter {
            list.add(token.as_ref());
        }
        list
    }
}

impl From<&str> for ClassList {
    fn from(classes: &str) -> Self {
        Self::parse(classes)
    }
}

impl From<&[&str]> for ClassList {
    fn from(tokens: &[&str]) -> Self {
        tokens.iter().collect()
    }
}

impl<const N: usize> From<[&str; N]> for ClassList {
    fn from(tokens: [&str; N]) -> Self {
        tokens.iter().collect()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(token)?;
        }
        Ok(())
    }
}

// =============================================================================
// Props
// =============================================================================

/// All properties of an element, pre-split into the four diffable maps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    /// Plain attributes
    pub attrs: Attrs,
    /// CSS classes
    pub class: ClassList,
    /// Inline styles
    pub style: Styles,
    /// Declared event handlers
    pub on: EventMap,
}

impl Props {
    /// Create empty props
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no property is set
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty() && self.class.is_empty() && self.style.is_empty() && self.on.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
