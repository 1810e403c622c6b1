//! Schema-backed sanitizer hooks.

use std::sync::LazyLock;

use quokka_ast::{BOGUS_ATTR, INTERNAL_ATTR};
use quokka_common::url::{UrlPolicy, is_invalid_uri, is_url_attribute};
use quokka_schema::{Schema, UID_PLACEHOLDER};
use regex::Regex;

use crate::native::{NativeKind, NativeNode};
use crate::sanitize::{AttributeCandidate, NodeVerdict, SanitizeHooks};
use crate::settings::ParserSettings;

static CONDITIONAL_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\[if").expect("valid regex"));

/// Attributes an internal element keeps even when the schema rejects them.
const INTERNAL_ELEMENT_ATTRIBUTES: &[&str] = &["id", "class", "style"];

/// Enforces a [`Schema`] during sanitization.
///
/// One policy is created per parse; it owns the counter behind `{$uid}`
/// attribute values.
pub struct SchemaPolicy<'a> {
    schema: &'a Schema,
    settings: &'a ParserSettings,
    url_policy: UrlPolicy,
    uid: usize,
}

impl<'a> SchemaPolicy<'a> {
    /// Create a policy for one parse.
    #[must_use]
    pub const fn new(schema: &'a Schema, settings: &'a ParserSettings) -> Self {
        Self {
            schema,
            settings,
            url_policy: settings.url_policy(),
            uid: 0,
        }
    }

    /// Replace the uid placeholder with a fresh per-parse id.
    fn expand_value(&mut self, value: &str) -> String {
        if value == UID_PLACEHOLDER {
            let id = format!("qk_{}", self.uid);
            self.uid += 1;
            id
        } else {
            value.to_string()
        }
    }

    /// Apply forced and default attributes of the element's rule.
    fn apply_rule_attributes(&mut self, node: &mut NativeNode) {
        let schema = self.schema;
        let Some(rule) = schema.element_rule(&node.name) else {
            return;
        };
        for attr in &rule.attributes_forced {
            let value = self.expand_value(&attr.value);
            node.set_attr(&attr.name, &value);
        }
        for attr in &rule.attributes_default {
            if !node.has_attr(&attr.name) {
                let value = self.expand_value(&attr.value);
                node.set_attr(&attr.name, &value);
            }
        }
    }
}

impl SanitizeHooks for SchemaPolicy<'_> {
    fn on_element(&mut self, node: &mut NativeNode) -> NodeVerdict {
        // STEP 1: Neutralize conditional comments.
        if node.kind == NativeKind::Comment {
            if !self.settings.allow_conditional_comments && CONDITIONAL_COMMENT.is_match(&node.value)
            {
                node.value.insert(0, ' ');
            }
            return NodeVerdict::Keep;
        }

        // STEP 2: Internal elements bypass attribute policy.
        let is_internal = node.has_attr(INTERNAL_ATTR);

        // STEP 3: Bogus elements never reach the output.
        if !is_internal && let Some(bogus) = node.attr(BOGUS_ATTR) {
            return if bogus == "all" {
                NodeVerdict::Remove
            } else {
                NodeVerdict::Unwrap
            };
        }

        // STEP 4: Unknown elements are unwrapped; raw-content ones are
        // dropped with their text.
        let validate = self.settings.validate;
        let Some(rule) = self.schema.element_rule(&node.name) else {
            if !validate {
                return NodeVerdict::Keep;
            }
            log::debug!(target: "quokka.sanitize", "<{}> is not in the schema", node.name);
            return if self.schema.is_special(&node.name) {
                NodeVerdict::Remove
            } else {
                NodeVerdict::Unwrap
            };
        };

        // STEP 5: Forced/default attributes and renaming.
        if validate && !is_internal {
            let output_name = rule.output_name.clone();
            self.apply_rule_attributes(node);
            if let Some(output_name) = output_name
                && output_name != node.name
            {
                node.name = output_name;
            }
        }

        NodeVerdict::Keep
    }

    fn on_attribute(&mut self, element: &NativeNode, candidate: &mut AttributeCandidate) {
        let name = candidate.name.as_str();
        let tag = element.name.as_str();
        let validate = self.settings.validate;

        candidate.keep = !validate
            || self.schema.is_valid_attribute(tag, name)
            || name.starts_with("data-")
            || name.starts_with("aria-");

        if candidate.keep
            && validate
            && let Some(rule) = self.schema.element_rule(tag)
            && !rule.allows_value(name, &candidate.value)
        {
            candidate.keep = false;
        }

        if is_url_attribute(name) && is_invalid_uri(&self.url_policy, &candidate.value, Some(tag)) {
            log::debug!(target: "quokka.sanitize", "rejecting unsafe {name} on <{tag}>");
            candidate.keep = false;
        }

        if candidate.keep {
            if self.schema.bool_attributes().contains(name) {
                candidate.value.clone_from(&candidate.name);
            }
            if self.settings.allow_svg_data_urls == Some(true)
                && candidate.value.starts_with("data:image/svg+xml")
            {
                candidate.force_keep = true;
            }
        } else if element.has_attr(INTERNAL_ATTR) && INTERNAL_ELEMENT_ATTRIBUTES.contains(&name) {
            candidate.force_keep = true;
        }
    }

    fn after_attributes(&mut self, node: &mut NativeNode) -> NodeVerdict {
        if !self.settings.validate || node.has_attr(INTERNAL_ATTR) {
            return NodeVerdict::Keep;
        }
        let Some(rule) = self.schema.element_rule(&node.name) else {
            return NodeVerdict::Keep;
        };

        // None of the required attributes survived.
        if !rule.attributes_required.is_empty()
            && !rule.attributes_required.iter().any(|attr| node.has_attr(attr))
        {
            return NodeVerdict::Unwrap;
        }
        if rule.remove_empty_attrs && node.attributes.is_empty() {
            return NodeVerdict::Unwrap;
        }
        NodeVerdict::Keep
    }
}
