//! Element and attribute rules.

use std::collections::{HashMap, HashSet};

use quokka_ast::Attribute;

/// Placeholder in default/forced attribute values that is replaced by a
/// per-parse unique id.
pub const UID_PLACEHOLDER: &str = "{$uid}";

/// What happens to an element that ends up with no content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyPolicy {
    /// Leave it as it is.
    #[default]
    Keep,
    /// Delete it (blocks) or unwrap it (inline elements).
    Remove,
    /// Insert a filler so it keeps its box.
    Pad,
}

/// Per-attribute constraints of an [`ElementRule`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRule {
    /// Attribute name.
    pub name: String,
    /// The element is unwrapped when none of its required attributes exist.
    pub required: bool,
    /// Value set when the attribute is missing.
    pub default_value: Option<String>,
    /// Value that always replaces whatever the input had.
    pub forced_value: Option<String>,
    /// When present, the attribute is dropped unless its value is listed.
    pub valid_values: Option<HashSet<String>>,
}

impl AttributeRule {
    /// A plain rule that just allows the attribute.
    #[must_use]
    pub fn allow(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// Immutable allow-list entry for one element name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementRule {
    /// Element name this rule applies to.
    pub name: String,
    /// Allowed attributes, by name.
    pub attributes: HashMap<String, AttributeRule>,
    /// Attributes set only when absent, in declaration order.
    pub attributes_default: Vec<Attribute>,
    /// Attributes always set, in declaration order.
    pub attributes_forced: Vec<Attribute>,
    /// At least one of these must be present or the element is unwrapped.
    pub attributes_required: Vec<String>,
    /// Unwrap the element when it ends up with no attributes.
    pub remove_empty_attrs: bool,
    /// Rename the element to this on output (`b` → `strong`).
    pub output_name: Option<String>,
    /// Behavior when the element is empty.
    pub empty: EmptyPolicy,
    /// Pad the element when it is empty inside an empty text-root block.
    pub padd_in_empty_block: bool,
}

impl ElementRule {
    /// A rule allowing `name` with the given attributes.
    #[must_use]
    pub fn new<'a>(name: &str, attributes: impl IntoIterator<Item = &'a str>) -> Self {
        let mut rule = Self {
            name: name.to_string(),
            ..Self::default()
        };
        for attr in attributes {
            rule.add_attribute(AttributeRule::allow(attr));
        }
        rule
    }

    /// Add (or replace) an attribute rule, updating the derived lists.
    pub fn add_attribute(&mut self, attribute: AttributeRule) {
        self.remove_attribute(&attribute.name);
        if let Some(value) = &attribute.default_value {
            self.attributes_default
                .push(Attribute::new(attribute.name.clone(), value.clone()));
        }
        if let Some(value) = &attribute.forced_value {
            self.attributes_forced
                .push(Attribute::new(attribute.name.clone(), value.clone()));
        }
        if attribute.required {
            self.attributes_required.push(attribute.name.clone());
        }
        let _ = self.attributes.insert(attribute.name.clone(), attribute);
    }

    /// Remove an attribute rule and everything derived from it.
    pub fn remove_attribute(&mut self, name: &str) {
        if self.attributes.remove(name).is_some() {
            self.attributes_default.retain(|attr| attr.name != name);
            self.attributes_forced.retain(|attr| attr.name != name);
            self.attributes_required.retain(|attr| attr != name);
        }
    }

    /// Returns true if the attribute is allowed on this element.
    #[must_use]
    pub fn allows_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Returns true if `value` is acceptable for the attribute.
    #[must_use]
    pub fn allows_value(&self, name: &str, value: &str) -> bool {
        self.attributes
            .get(name)
            .and_then(|attr| attr.valid_values.as_ref())
            .is_none_or(|values| values.contains(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_attribute_derives_lists() {
        let mut rule = ElementRule::new("a", ["href"]);
        rule.add_attribute(AttributeRule {
            name: "target".to_string(),
            default_value: Some("_blank".to_string()),
            ..AttributeRule::default()
        });
        rule.add_attribute(AttributeRule {
            name: "href".to_string(),
            required: true,
            ..AttributeRule::default()
        });

        assert_eq!(rule.attributes_default, [Attribute::new("target", "_blank")]);
        assert_eq!(rule.attributes_required, ["href"]);

        rule.remove_attribute("target");
        assert!(rule.attributes_default.is_empty());
        assert!(!rule.allows_attribute("target"));
    }

    #[test]
    fn test_allows_value() {
        let mut rule = ElementRule::new("ol", []);
        rule.add_attribute(AttributeRule {
            name: "type".to_string(),
            valid_values: Some(["1", "a"].into_iter().map(String::from).collect()),
            ..AttributeRule::default()
        });
        assert!(rule.allows_value("type", "a"));
        assert!(!rule.allows_value("type", "i"));
        assert!(rule.allows_value("start", "3"));
    }
}
