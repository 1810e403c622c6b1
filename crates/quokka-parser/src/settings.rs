//! Parser configuration.
//!
//! Settings are fixed for the lifetime of a [`DomParser`](crate::DomParser).
//! Per-call options live in [`ParserArgs`](crate::ParserArgs).

use std::collections::BTreeMap;

use quokka_common::url::UrlPolicy;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings document is not valid JSON or has the wrong shape.
    #[error("invalid parser settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// The `forced_root_block` setting: `false`, `true` or a tag name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ForcedRootBlock {
    /// `true` wraps in `p`, `false` disables wrapping.
    Enabled(bool),
    /// Wrap in this element; an empty name disables wrapping.
    Named(String),
}

impl Default for ForcedRootBlock {
    fn default() -> Self {
        Self::Enabled(false)
    }
}

impl ForcedRootBlock {
    /// The block element to wrap stray root content in, if any.
    #[must_use]
    pub fn block_name(&self) -> Option<&str> {
        match self {
            Self::Enabled(true) => Some("p"),
            Self::Enabled(false) => None,
            Self::Named(name) if name.is_empty() => None,
            Self::Named(name) => Some(name),
        }
    }
}

impl From<&str> for ForcedRootBlock {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<bool> for ForcedRootBlock {
    fn from(enabled: bool) -> Self {
        Self::Enabled(enabled)
    }
}

const DEFAULT_FONT_SIZE_LEGACY_VALUES: &str =
    "xx-small,small,medium,large,x-large,xx-large,300%";

/// Parser-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ParserSettings {
    /// Enforce the schema. When off, every element and attribute survives
    /// (URL checks still apply).
    pub validate: bool,
    /// Name of the synthetic root when no context is given.
    pub root_name: String,
    /// Block element wrapped around stray root-level content.
    pub forced_root_block: ForcedRootBlock,
    /// Attributes set on every created root block.
    pub forced_root_block_attrs: BTreeMap<String, String>,
    /// Accept `javascript:` and other script URLs.
    pub allow_script_urls: bool,
    /// Accept every `data:` URL.
    pub allow_html_data_urls: bool,
    /// Accept or reject `data:image/svg+xml` URLs; unset accepts them only
    /// on `img` and `video`.
    pub allow_svg_data_urls: Option<bool>,
    /// Keep `<!--[if ...]>` comments as they are.
    pub allow_conditional_comments: bool,
    /// Keep content inside named anchors (`<a id=..>`).
    pub allow_html_in_named_anchor: bool,
    /// Leave `target="_blank"` links without `rel="noopener"`.
    pub allow_unsafe_link_target: bool,
    /// Turn `font` into styled `span` elements.
    pub convert_fonts_to_spans: bool,
    /// CSS values for legacy font sizes 1 to 7.
    pub font_size_legacy_values: String,
    /// Move nested lists into the preceding `li`.
    pub fix_list_elements: bool,
    /// Remove `<br>` at the end of blocks.
    pub remove_trailing_brs: bool,
    /// Pad empty blocks with `<br>` instead of a non-breaking space.
    pub pad_empty_with_br: bool,
    /// Run legacy element conversions (`font`, `strike`).
    pub inline_styles: bool,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            validate: true,
            root_name: "body".to_string(),
            forced_root_block: ForcedRootBlock::default(),
            forced_root_block_attrs: BTreeMap::new(),
            allow_script_urls: false,
            allow_html_data_urls: false,
            allow_svg_data_urls: None,
            allow_conditional_comments: false,
            allow_html_in_named_anchor: false,
            allow_unsafe_link_target: false,
            convert_fonts_to_spans: false,
            font_size_legacy_values: DEFAULT_FONT_SIZE_LEGACY_VALUES.to_string(),
            fix_list_elements: false,
            remove_trailing_brs: false,
            pad_empty_with_br: false,
            inline_styles: false,
        }
    }
}

impl ParserSettings {
    /// Load settings from a JSON object; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Json`] if the input is not a valid settings
    /// object.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The URL policy derived from the `allow_*_urls` settings.
    #[must_use]
    pub const fn url_policy(&self) -> UrlPolicy {
        UrlPolicy {
            allow_script_urls: self.allow_script_urls,
            allow_html_data_urls: self.allow_html_data_urls,
            allow_svg_data_urls: self.allow_svg_data_urls,
        }
    }

    /// Legacy `<font size>` values, indexed by size minus one.
    #[must_use]
    pub fn font_sizes(&self) -> Vec<&str> {
        self.font_size_legacy_values
            .split([',', ' '])
            .filter(|value| !value.is_empty())
            .collect()
    }
}
