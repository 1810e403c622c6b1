//! End-to-end tests for the filters every parser registers.

use quokka_parser::{DomParser, ParserArgs, ParserSettings, serialize};
use quokka_schema::{Schema, SchemaSettings};

/// Helper to parse with the given settings and schema and serialize the result
fn run(settings: ParserSettings, schema: Schema, html: &str) -> String {
    let parser = DomParser::new(settings, schema);
    let tree = parser.parse(html, &mut ParserArgs::default());
    serialize(&tree, parser.schema())
}

/// Helper to parse with the given settings and the default schema
fn run_default_schema(settings: ParserSettings, html: &str) -> String {
    run(settings, Schema::html5(), html)
}

// ========== trailing line breaks ==========

fn trailing_brs() -> ParserSettings {
    ParserSettings {
        remove_trailing_brs: true,
        ..ParserSettings::default()
    }
}

#[test]
fn test_trailing_br_is_removed() {
    assert_eq!(run_default_schema(trailing_brs(), "<p>a<br></p>"), "<p>a</p>");
}

#[test]
fn test_double_br_is_kept() {
    assert_eq!(
        run_default_schema(trailing_brs(), "<p>a<br><br></p>"),
        "<p>a<br><br></p>"
    );
}

#[test]
fn test_block_emptied_by_br_removal_is_padded() {
    assert_eq!(run_default_schema(trailing_brs(), "<p><br></p>"), "<p>&nbsp;</p>");
}

#[test]
fn test_lone_br_in_inline_chain_becomes_nbsp() {
    assert_eq!(
        run_default_schema(trailing_brs(), "<p><b><br></b></p>"),
        "<p><b>&nbsp;</b></p>"
    );
}

#[test]
fn test_trailing_brs_kept_by_default() {
    assert_eq!(
        run_default_schema(ParserSettings::default(), "<p>a<br></p>"),
        "<p>a<br></p>"
    );
}

// ========== link targets ==========

#[test]
fn test_blank_target_gets_noopener() {
    assert_eq!(
        run_default_schema(
            ParserSettings::default(),
            r#"<a href="x" target="_blank">y</a>"#
        ),
        r#"<a href="x" target="_blank" rel="noopener">y</a>"#
    );
}

#[test]
fn test_existing_rel_is_merged() {
    assert_eq!(
        run_default_schema(
            ParserSettings::default(),
            r#"<a href="x" target="_blank" rel="nofollow">y</a>"#
        ),
        r#"<a href="x" target="_blank" rel="nofollow noopener">y</a>"#
    );
}

#[test]
fn test_unsafe_link_target_allowed_by_setting() {
    let settings = ParserSettings {
        allow_unsafe_link_target: true,
        ..ParserSettings::default()
    };
    assert_eq!(
        run_default_schema(settings, r#"<a href="x" target="_blank">y</a>"#),
        r#"<a href="x" target="_blank">y</a>"#
    );
}

// ========== named anchors ==========

#[test]
fn test_named_anchor_content_moves_out() {
    assert_eq!(
        run_default_schema(ParserSettings::default(), r#"<p><a name="top">x</a></p>"#),
        r#"<p><a name="top"></a>x</p>"#
    );
}

#[test]
fn test_html_in_named_anchor_allowed_by_setting() {
    let settings = ParserSettings {
        allow_html_in_named_anchor: true,
        ..ParserSettings::default()
    };
    assert_eq!(
        run_default_schema(settings, r#"<p><a name="top">x</a></p>"#),
        r#"<p><a name="top">x</a></p>"#
    );
}

#[test]
fn test_link_content_is_untouched() {
    assert_eq!(
        run_default_schema(ParserSettings::default(), r#"<a href="x" id="l">y</a>"#),
        r#"<a href="x" id="l">y</a>"#
    );
}

// ========== nested lists ==========

#[test]
fn test_list_nested_in_list_joins_previous_item() {
    let settings = ParserSettings {
        validate: false,
        fix_list_elements: true,
        ..ParserSettings::default()
    };
    assert_eq!(
        run_default_schema(settings, "<ul><li>a</li><ol><li>b</li></ol></ul>"),
        "<ul><li>a<ol><li>b</li></ol></li></ul>"
    );
}

#[test]
fn test_list_without_previous_item_gets_unstyled_item() {
    let settings = ParserSettings {
        validate: false,
        fix_list_elements: true,
        ..ParserSettings::default()
    };
    assert_eq!(
        run_default_schema(settings, "<ul><ol><li>b</li></ol></ul>"),
        r#"<ul><li style="list-style-type: none"><ol><li>b</li></ol></li></ul>"#
    );
}

// ========== presentational elements ==========

fn legacy_schema() -> Schema {
    Schema::new(&SchemaSettings {
        extended_valid_elements: Some("font[color|face|size|style],strike".to_string()),
        ..SchemaSettings::default()
    })
    .unwrap()
}

#[test]
fn test_font_and_strike_are_converted() {
    let settings = ParserSettings {
        inline_styles: true,
        convert_fonts_to_spans: true,
        ..ParserSettings::default()
    };
    assert_eq!(
        run(
            settings,
            legacy_schema(),
            r#"<p><font color="red" size="2">x</font><strike>y</strike></p>"#
        ),
        r#"<p><span style="color: red; font-size: small;">x</span><s>y</s></p>"#
    );
}

#[test]
fn test_fonts_kept_without_conversion() {
    let settings = ParserSettings {
        inline_styles: true,
        ..ParserSettings::default()
    };
    assert_eq!(
        run(
            settings,
            legacy_schema(),
            r#"<p><font face="serif">x</font><strike>y</strike></p>"#
        ),
        r#"<p><font face="serif">x</font><s>y</s></p>"#
    );
}

#[test]
fn test_no_conversion_without_inline_styles() {
    assert_eq!(
        run(
            ParserSettings::default(),
            legacy_schema(),
            "<p><strike>y</strike></p>"
        ),
        "<p><strike>y</strike></p>"
    );
}
