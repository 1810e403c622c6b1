//! Element attribute storage.
//!
//! [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
//!
//! Attributes are kept twice: an ordered list that fixes serialization
//! order, and a map view for O(1) lookup by name. Both views always hold the
//! same set of names.

use std::collections::HashMap;

/// A single `name="value"` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lower-cased attribute name (`xlink:href` keeps its prefix).
    pub name: String,
    /// Attribute value, case preserved.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered attribute list with a map view.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    list: Vec<Attribute>,
    map: HashMap<String, String>,
}

impl Attributes {
    /// Create an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    /// Returns true if the attribute is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Set an attribute, keeping its position if it already exists.
    ///
    /// The name is lower-cased; attribute keys are unique per node.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        if let Some(existing) = self.list.iter_mut().find(|attr| attr.name == name) {
            existing.value.clone_from(&value);
        } else {
            self.list.push(Attribute::new(name.clone(), value.clone()));
        }
        let _ = self.map.insert(name, value);
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let removed = self.map.remove(name)?;
        self.list.retain(|attr| attr.name != name);
        Some(removed)
    }

    /// Iterate attributes in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.list.iter()
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns true if there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Remove every attribute.
    pub fn clear(&mut self) {
        self.list.clear();
        self.map.clear();
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        let mut attributes = Self::new();
        for attr in iter {
            attributes.set(&attr.name, attr.value);
        }
        attributes
    }
}
