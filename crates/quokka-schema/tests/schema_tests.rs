//! Tests for the default HTML5 schema and rule-string configuration.

use quokka_schema::{EmptyPolicy, Schema, SchemaError, SchemaSettings};

fn schema_with(valid_elements: &str) -> Schema {
    Schema::new(&SchemaSettings {
        valid_elements: Some(valid_elements.to_string()),
        ..SchemaSettings::default()
    })
    .unwrap()
}

// ========== default schema ==========

#[test]
fn test_html5_elements_and_globals() {
    let schema = Schema::html5();

    assert!(schema.is_valid_element("p"));
    assert!(schema.is_valid_element("table"));
    assert!(!schema.is_valid_element("foo"));
    assert!(!schema.is_valid_element("font"));

    assert!(schema.is_valid_attribute("a", "href"));
    assert!(schema.is_valid_attribute("p", "class"));
    assert!(!schema.is_valid_attribute("p", "onclick"));
    assert!(!schema.is_valid_attribute("foo", "class"));
}

#[test]
fn test_html5_content_model() {
    let schema = Schema::html5();

    assert!(schema.is_valid_child("body", "p"));
    assert!(schema.is_valid_child("body", "#text"));
    assert!(schema.is_valid_child("p", "b"));
    assert!(!schema.is_valid_child("p", "div"));
    assert!(!schema.is_valid_child("p", "tr"));
    assert!(schema.is_valid_child("ul", "li"));
    assert!(!schema.is_valid_child("ul", "#text"));
    assert!(schema.is_valid_child("tr", "td"));
    assert!(schema.has_child_rules("tr"));
    assert!(!schema.has_child_rules("foo"));
}

#[test]
fn test_html5_sets() {
    let schema = Schema::html5();

    assert!(schema.is_block("p"));
    assert!(schema.is_block("table"));
    assert!(!schema.is_block("span"));
    assert!(schema.is_text_block("h1"));
    assert!(!schema.is_text_block("li"));
    assert!(schema.text_root_block_elements().contains("li"));
    assert!(schema.is_void("br"));
    assert!(schema.non_empty_elements().contains("img"));
    assert!(schema.non_empty_elements().contains("td"));
    assert!(schema.whitespace_elements().contains("pre"));
    assert!(schema.is_special("script"));
    assert!(schema.bool_attributes().contains("checked"));
}

#[test]
fn test_html5_empty_policies() {
    let schema = Schema::html5();

    assert_eq!(schema.element_rule("p").unwrap().empty, EmptyPolicy::Pad);
    assert_eq!(schema.element_rule("td").unwrap().empty, EmptyPolicy::Pad);
    assert_eq!(schema.element_rule("ul").unwrap().empty, EmptyPolicy::Remove);
    assert_eq!(schema.element_rule("b").unwrap().empty, EmptyPolicy::Keep);
    assert!(schema.element_rule("span").unwrap().remove_empty_attrs);
}

// ========== rule strings ==========

#[test]
fn test_custom_valid_elements() {
    let schema = schema_with("@[class],#p[align],-ul,li,strong/b,a[!href|target~_blank]");

    assert!(schema.is_valid_element("p"));
    assert!(!schema.is_valid_element("div"));
    assert!(schema.is_valid_attribute("p", "class"));
    assert!(schema.is_valid_attribute("p", "align"));
    assert!(schema.is_valid_attribute("li", "class"));

    assert_eq!(schema.element_rule("p").unwrap().empty, EmptyPolicy::Pad);
    assert_eq!(schema.element_rule("ul").unwrap().empty, EmptyPolicy::Remove);

    let b = schema.element_rule("b").unwrap();
    assert_eq!(b.output_name.as_deref(), Some("strong"));
    assert!(schema.element_rule("strong").unwrap().output_name.is_none());

    let a = schema.element_rule("a").unwrap();
    assert_eq!(a.attributes_required, ["href"]);
    assert_eq!(a.attributes_forced[0].value, "_blank");
}

#[test]
fn test_custom_valid_elements_restrict_children() {
    let schema = schema_with("p,b");

    assert!(schema.is_valid_child("body", "p"));
    assert!(!schema.is_valid_child("body", "div"));
    assert!(schema.is_valid_child("p", "#text"));
    assert!(!schema.has_child_rules("table"));
}

#[test]
fn test_global_removal_and_remove_empty_attrs() {
    let schema = schema_with("@[id|title],span![-title]");
    let span = schema.element_rule("span").unwrap();

    assert!(span.remove_empty_attrs);
    assert!(span.allows_attribute("id"));
    assert!(!span.allows_attribute("title"));
}

#[test]
fn test_extended_valid_elements_replace_rule() {
    let schema = Schema::new(&SchemaSettings {
        extended_valid_elements: Some("img[src|data-x],font[color|size|face]".to_string()),
        ..SchemaSettings::default()
    })
    .unwrap();

    assert!(schema.is_valid_element("font"));
    assert!(schema.is_valid_attribute("img", "src"));
    assert!(!schema.is_valid_attribute("img", "alt"));
    assert!(schema.is_valid_element("p"));
}

#[test]
fn test_padd_empty_block_inline_children() {
    let schema = Schema::new(&SchemaSettings {
        padd_empty_block_inline_children: true,
        ..SchemaSettings::default()
    })
    .unwrap();

    assert!(schema.element_rule("strong").unwrap().padd_in_empty_block);
    assert!(!schema.element_rule("p").unwrap().padd_in_empty_block);
}

#[test]
fn test_settings_from_json() {
    let settings: SchemaSettings =
        serde_json::from_str(r#"{"valid_elements": "p,br", "padd_empty_block_inline_children": true}"#)
            .unwrap();
    assert_eq!(settings.valid_elements.as_deref(), Some("p,br"));
    assert!(settings.extended_valid_elements.is_none());
}

// ========== errors ==========

#[test]
fn test_malformed_rules() {
    let err = |rules: &str| {
        Schema::new(&SchemaSettings {
            valid_elements: Some(rules.to_string()),
            ..SchemaSettings::default()
        })
        .unwrap_err()
    };

    assert!(matches!(err("p,a[href"), SchemaError::UnterminatedAttributes { .. }));
    assert!(matches!(err("[href]"), SchemaError::EmptyElementName { .. }));
    assert!(matches!(err("#"), SchemaError::EmptyElementName { .. }));
    assert!(matches!(err("a[=x]"), SchemaError::InvalidAttribute { .. }));
    assert_eq!(
        err("p,a[href").to_string(),
        "unterminated attribute list in `a[href`"
    );
}

#[test]
fn test_add_valid_child() {
    let mut schema = Schema::html5();
    assert!(!schema.is_valid_child("p", "div"));
    schema.add_valid_child("p", "div");
    assert!(schema.is_valid_child("p", "div"));
}

#[test]
fn test_valid_children() {
    let schema = Schema::html5();
    let children = schema.valid_children("ul").unwrap();
    assert!(children.contains("li"));
    assert!(!children.contains("p"));
    assert!(schema.valid_children("foo").is_none());
}
