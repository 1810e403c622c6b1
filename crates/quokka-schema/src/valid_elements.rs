//! Parser for compact rule strings.
//!
//! A rule string is a comma-separated list of element rules:
//!
//! ```text
//! @[id|class|title],a[!href|target<_blank?_self|rel],#p,-ul,strong/b,img[src|alt=]
//! ```
//!
//! - `@[..]` declares attributes added to every element rule that follows.
//! - Element prefixes: `#` pads the element when empty, `-` removes it when
//!   empty, `+` pads it when it is empty inside an empty text-root block.
//! - `!` before `[` unwraps the element when no attributes remain.
//! - `a/b` declares `b` as an alias that is renamed to `a` on output.
//! - Attribute prefixes: `!` marks it required, `-` removes an inherited global.
//! - Attribute suffixes: `=v` default value, `~v` forced value, `<a?b` allowed
//!   values.

use std::sync::LazyLock;

use quokka_common::warning::warn_once;
use regex::Regex;

use crate::SchemaError;
use crate::rule::{AttributeRule, ElementRule, EmptyPolicy};

static ELEMENT_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([#+\-])?([^\[!/]+)(?:/([^\[!]+))?(?:(!?)\[([^\]]*)\])?$").expect("valid regex")
});
static ATTRIBUTE_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([!\-])?([^=~<]+)(?:([=~<])(.*))?$").expect("valid regex"));

/// One attribute pattern of an element rule.
enum AttributePattern {
    Add(AttributeRule),
    Remove(String),
}

/// Parse a rule string into element rules, in declaration order.
///
/// Aliases produce their own rule with `output_name` set. Wildcard names
/// are not supported and are skipped with a warning.
///
/// # Errors
///
/// Returns a [`SchemaError`] when a rule has no element name, an attribute
/// list is never closed, or a rule or attribute does not match the grammar.
pub fn parse_valid_elements(input: &str) -> Result<Vec<ElementRule>, SchemaError> {
    let mut globals: Vec<AttributeRule> = Vec::new();
    let mut rules = Vec::new();

    for entry in split_rules(input)? {
        let captures = ELEMENT_RULE.captures(entry).ok_or_else(|| {
            if entry.starts_with('[') || entry.chars().all(|c| matches!(c, '#' | '+' | '-' | '!')) {
                SchemaError::EmptyElementName {
                    rule: entry.to_string(),
                }
            } else {
                SchemaError::InvalidRule {
                    rule: entry.to_string(),
                }
            }
        })?;

        let prefix = captures.get(1).map(|m| m.as_str());
        let name = captures[2].trim().to_ascii_lowercase();
        let aliases = captures.get(3).map_or("", |m| m.as_str());
        let remove_empty_attrs = captures.get(4).is_some_and(|m| m.as_str() == "!");
        let patterns = match captures.get(5) {
            Some(attrs) => parse_attributes(entry, attrs.as_str())?,
            None => Vec::new(),
        };

        if name.chars().all(|c| matches!(c, '#' | '+' | '-')) {
            return Err(SchemaError::EmptyElementName {
                rule: entry.to_string(),
            });
        }

        if name == "@" {
            globals.extend(patterns.into_iter().filter_map(|pattern| match pattern {
                AttributePattern::Add(rule) => Some(rule),
                AttributePattern::Remove(_) => None,
            }));
            continue;
        }

        if name.contains(['*', '?']) {
            warn_once(
                "Schema",
                &format!("wildcard element rule `{entry}` is not supported, skipping"),
            );
            continue;
        }

        let mut rule = ElementRule::new(&name, []);
        for global in &globals {
            rule.add_attribute(global.clone());
        }
        for pattern in patterns {
            match pattern {
                AttributePattern::Add(attribute) => rule.add_attribute(attribute),
                AttributePattern::Remove(attribute) => rule.remove_attribute(&attribute),
            }
        }
        rule.remove_empty_attrs = remove_empty_attrs;
        match prefix {
            Some("#") => rule.empty = EmptyPolicy::Pad,
            Some("-") => rule.empty = EmptyPolicy::Remove,
            Some("+") => rule.padd_in_empty_block = true,
            _ => {}
        }

        for alias in aliases.split('/').map(str::trim).filter(|a| !a.is_empty()) {
            let mut alias_rule = rule.clone();
            alias_rule.name = alias.to_ascii_lowercase();
            alias_rule.output_name = Some(name.clone());
            rules.push(alias_rule);
        }
        rules.push(rule);
    }

    Ok(rules)
}

/// Split on commas that are not inside an attribute list.
fn split_rules(input: &str) -> Result<Vec<&str>, SchemaError> {
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, c) in input.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                entries.push(&input[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(SchemaError::UnterminatedAttributes {
            rule: input[start..].trim().to_string(),
        });
    }
    entries.push(&input[start..]);

    Ok(entries
        .into_iter()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect())
}

fn parse_attributes(rule: &str, list: &str) -> Result<Vec<AttributePattern>, SchemaError> {
    let mut patterns = Vec::new();
    for raw in list.split('|').map(str::trim).filter(|a| !a.is_empty()) {
        let invalid = || SchemaError::InvalidAttribute {
            rule: rule.to_string(),
            attribute: raw.to_string(),
        };
        let captures = ATTRIBUTE_RULE.captures(raw).ok_or_else(invalid)?;
        let name = captures[2].trim().to_ascii_lowercase();
        if name.is_empty() {
            return Err(invalid());
        }

        if captures.get(1).is_some_and(|m| m.as_str() == "-") {
            patterns.push(AttributePattern::Remove(name));
            continue;
        }

        let mut attribute = AttributeRule::allow(&name);
        attribute.required = captures.get(1).is_some_and(|m| m.as_str() == "!");
        let value = captures.get(4).map_or("", |m| m.as_str());
        match captures.get(3).map(|m| m.as_str()) {
            Some("=") => attribute.default_value = Some(value.to_string()),
            Some("~") => attribute.forced_value = Some(value.to_string()),
            Some("<") => {
                attribute.valid_values = Some(value.split('?').map(str::to_string).collect());
            }
            _ => {}
        }
        patterns.push(AttributePattern::Add(attribute));
    }
    Ok(patterns)
}
