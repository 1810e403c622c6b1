//! Per-call parse options.

use serde_json::{Map, Value};
use strum_macros::{Display, EnumString};

use crate::settings::ForcedRootBlock;

/// Input markup flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Format {
    /// `text/html`
    #[default]
    Html,
    /// `application/xhtml+xml`
    Xhtml,
}

/// Options for one [`DomParser::parse`](crate::DomParser::parse) call.
///
/// The same object is handed to every filter callback, which may read the
/// free-form [`extra`](Self::extra) bag or record results in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserArgs {
    /// Parse as a fragment to be inserted into this element instead of the
    /// configured root.
    pub context: Option<String>,
    /// The content is the whole root content (affects edge whitespace and
    /// root-block wrapping).
    pub is_root_content: bool,
    /// Input flavor.
    pub format: Format,
    /// Overrides the configured forced root block.
    pub forced_root_block: Option<ForcedRootBlock>,
    /// The content is being inserted; padding prefers bogus `<br>` elements.
    pub insert: bool,
    /// Output: set when a contextual parse found top-level content that is
    /// not valid inside the context element.
    pub invalid: bool,
    /// Values forwarded verbatim to filters.
    pub extra: Map<String, Value>,
}

impl ParserArgs {
    /// Options for parsing a fragment destined for `context`.
    #[must_use]
    pub fn with_context(context: &str) -> Self {
        Self {
            context: Some(context.to_string()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_format_strings() {
        assert_eq!(Format::from_str("xhtml").unwrap(), Format::Xhtml);
        assert_eq!(Format::Html.to_string(), "html");
        assert!(Format::from_str("xml").is_err());
    }
}
