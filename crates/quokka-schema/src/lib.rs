//! Allow-list schema for the Quokka HTML parser.
//!
//! The schema answers every policy question the parser asks:
//!
//! - is an element allowed, and with which attributes ([`ElementRule`])
//! - which attributes are forced, defaulted or required
//! - is child X valid under parent Y (the content model)
//! - which elements are block, void, whitespace-preserving, non-empty or
//!   special (raw content)
//!
//! A [`Schema`] is built once and only read while parsing; it can be shared
//! between any number of parses.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

mod error;
pub mod html5;
mod rule;
mod valid_elements;

pub use error::SchemaError;
pub use rule::{AttributeRule, ElementRule, EmptyPolicy, UID_PLACEHOLDER};
pub use valid_elements::parse_valid_elements;

/// Schema configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchemaSettings {
    /// Replaces the default HTML5 element rules entirely.
    pub valid_elements: Option<String>,
    /// Rules added on top of the base rules, replacing same-named ones.
    pub extended_valid_elements: Option<String>,
    /// Pad inline formatting elements that are empty inside an empty
    /// text-root block.
    pub padd_empty_block_inline_children: bool,
}

/// The allow-list policy object.
#[derive(Debug, Clone)]
pub struct Schema {
    elements: HashMap<String, ElementRule>,
    children: HashMap<String, HashSet<String>>,
    block_elements: HashSet<String>,
    text_block_elements: HashSet<String>,
    text_root_block_elements: HashSet<String>,
    void_elements: HashSet<String>,
    non_empty_elements: HashSet<String>,
    whitespace_elements: HashSet<String>,
    special_elements: HashSet<String>,
    bool_attributes: HashSet<String>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::html5()
    }
}

impl Schema {
    /// The default HTML5 schema.
    #[must_use]
    pub fn html5() -> Self {
        let mut schema = Self::with_sets();
        schema.load_html5_tables();
        schema
    }

    /// Build a schema from settings.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if `valid_elements` or
    /// `extended_valid_elements` is not a well-formed rule string.
    pub fn new(settings: &SchemaSettings) -> Result<Self, SchemaError> {
        let mut schema = Self::with_sets();
        schema.load_html5_tables();

        if let Some(valid_elements) = &settings.valid_elements {
            schema.elements.clear();
            for rule in parse_valid_elements(valid_elements)? {
                let _ = schema.elements.insert(rule.name.clone(), rule);
            }
            schema.restrict_children();
        }

        if let Some(extended) = &settings.extended_valid_elements {
            schema.add_valid_elements(extended)?;
        }

        if settings.padd_empty_block_inline_children {
            for name in html5::INLINE_FORMAT_ELEMENTS.split_whitespace() {
                if let Some(rule) = schema.elements.get_mut(name) {
                    rule.padd_in_empty_block = true;
                }
            }
        }

        Ok(schema)
    }

    fn with_sets() -> Self {
        let set = |names: &[&str]| -> HashSet<String> {
            names
                .iter()
                .flat_map(|list| list.split_whitespace())
                .map(str::to_string)
                .collect()
        };

        Self {
            elements: HashMap::new(),
            children: HashMap::new(),
            block_elements: set(&[html5::BLOCK_ELEMENTS, html5::TEXT_BLOCK_ELEMENTS]),
            text_block_elements: set(&[html5::TEXT_BLOCK_ELEMENTS]),
            text_root_block_elements: set(&[
                html5::TEXT_BLOCK_ELEMENTS,
                html5::TEXT_ROOT_BLOCK_ELEMENTS,
            ]),
            void_elements: set(&[html5::VOID_ELEMENTS]),
            non_empty_elements: set(&[html5::VOID_ELEMENTS, html5::NON_EMPTY_ELEMENTS]),
            whitespace_elements: set(&[html5::WHITESPACE_ELEMENTS]),
            special_elements: set(&[html5::SPECIAL_ELEMENTS]),
            bool_attributes: set(&[html5::BOOL_ATTRIBUTES]),
        }
    }

    fn load_html5_tables(&mut self) {
        for spec in html5::ELEMENTS {
            for name in spec.names.split_whitespace() {
                let attributes = html5::GLOBAL_ATTRIBUTES
                    .split_whitespace()
                    .chain(spec.attributes.split_whitespace());
                let _ = self
                    .elements
                    .insert(name.to_string(), ElementRule::new(name, attributes));
                let _ = self.children.insert(
                    name.to_string(),
                    html5::expand_children(spec.children)
                        .map(str::to_string)
                        .collect(),
                );
            }
        }

        let mut set_policy = |names: &str, policy: EmptyPolicy| {
            for name in names.split_whitespace() {
                if let Some(rule) = self.elements.get_mut(name) {
                    rule.empty = policy;
                }
            }
        };
        set_policy(html5::PAD_EMPTY_ELEMENTS, EmptyPolicy::Pad);
        set_policy(html5::REMOVE_EMPTY_ELEMENTS, EmptyPolicy::Remove);

        for name in html5::REMOVE_EMPTY_ATTRS_ELEMENTS.split_whitespace() {
            if let Some(rule) = self.elements.get_mut(name) {
                rule.remove_empty_attrs = true;
            }
        }
    }

    /// Drop content-model entries for elements the rule set does not declare.
    fn restrict_children(&mut self) {
        let declared: HashSet<&str> = self.elements.keys().map(String::as_str).collect();
        self.children.retain(|parent, _| {
            declared.contains(parent.as_str())
                || html5::STRUCTURAL_ELEMENTS
                    .split_whitespace()
                    .any(|name| name == parent)
        });
        for allowed in self.children.values_mut() {
            allowed.retain(|child| child.starts_with('#') || declared.contains(child.as_str()));
        }
    }

    /// Add element rules from a rule string. A rule for an element that is
    /// already known replaces the existing one.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the rule string is malformed.
    pub fn add_valid_elements(&mut self, rules: &str) -> Result<(), SchemaError> {
        for rule in parse_valid_elements(rules)? {
            let _ = self.elements.insert(rule.name.clone(), rule);
        }
        Ok(())
    }

    /// Allow `child` directly under `parent` in the content model.
    pub fn add_valid_child(&mut self, parent: &str, child: &str) {
        let _ = self
            .children
            .entry(parent.to_string())
            .or_default()
            .insert(child.to_string());
    }

    /// The rule for an element, if the element is allowed.
    #[must_use]
    pub fn element_rule(&self, name: &str) -> Option<&ElementRule> {
        self.elements.get(name)
    }

    /// Returns true if the element has a rule.
    #[must_use]
    pub fn is_valid_element(&self, name: &str) -> bool {
        self.elements.contains_key(name)
    }

    /// Returns true if the attribute is allowed on the element.
    #[must_use]
    pub fn is_valid_attribute(&self, element: &str, attribute: &str) -> bool {
        self.elements
            .get(element)
            .is_some_and(|rule| rule.allows_attribute(attribute))
    }

    /// [§ 3.2.5 Content models](https://html.spec.whatwg.org/multipage/dom.html#content-models)
    ///
    /// Returns true if `child` may appear directly inside `parent`.
    #[must_use]
    pub fn is_valid_child(&self, parent: &str, child: &str) -> bool {
        self.children
            .get(parent)
            .is_some_and(|allowed| allowed.contains(child))
    }

    /// Returns true if the content model constrains where `name` may appear.
    #[must_use]
    pub fn has_child_rules(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// The allowed children of an element.
    #[must_use]
    pub fn valid_children(&self, parent: &str) -> Option<&HashSet<String>> {
        self.children.get(parent)
    }

    /// Block-level elements, text blocks included.
    #[must_use]
    pub const fn block_elements(&self) -> &HashSet<String> {
        &self.block_elements
    }

    /// Block elements that directly hold text (`p`, `h1`, `div`, ...).
    #[must_use]
    pub const fn text_block_elements(&self) -> &HashSet<String> {
        &self.text_block_elements
    }

    /// Elements that can be the innermost block around text.
    #[must_use]
    pub const fn text_root_block_elements(&self) -> &HashSet<String> {
        &self.text_root_block_elements
    }

    /// Elements that never have children.
    #[must_use]
    pub const fn void_elements(&self) -> &HashSet<String> {
        &self.void_elements
    }

    /// Elements that count as content on their own.
    #[must_use]
    pub const fn non_empty_elements(&self) -> &HashSet<String> {
        &self.non_empty_elements
    }

    /// Elements inside which whitespace is preserved.
    #[must_use]
    pub const fn whitespace_elements(&self) -> &HashSet<String> {
        &self.whitespace_elements
    }

    /// Raw-content (RAWTEXT/RCDATA) elements.
    #[must_use]
    pub const fn special_elements(&self) -> &HashSet<String> {
        &self.special_elements
    }

    /// Boolean attributes.
    #[must_use]
    pub const fn bool_attributes(&self) -> &HashSet<String> {
        &self.bool_attributes
    }

    /// Returns true for block-level elements.
    #[must_use]
    pub fn is_block(&self, name: &str) -> bool {
        self.block_elements.contains(name)
    }

    /// Returns true for text-block elements.
    #[must_use]
    pub fn is_text_block(&self, name: &str) -> bool {
        self.text_block_elements.contains(name)
    }

    /// Returns true for raw-content elements.
    #[must_use]
    pub fn is_special(&self, name: &str) -> bool {
        self.special_elements.contains(name)
    }

    /// Returns true for void elements.
    #[must_use]
    pub fn is_void(&self, name: &str) -> bool {
        self.void_elements.contains(name)
    }
}
