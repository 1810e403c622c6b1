//! Schema construction errors.

use thiserror::Error;

/// Errors raised while parsing a rule string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// An element rule had no element name (`[href]`, `#`).
    #[error("element rule `{rule}` has no element name")]
    EmptyElementName {
        /// The offending rule.
        rule: String,
    },

    /// A `[` was never closed.
    #[error("unterminated attribute list in `{rule}`")]
    UnterminatedAttributes {
        /// The offending rule.
        rule: String,
    },

    /// The rule does not match the element rule grammar.
    #[error("malformed element rule `{rule}`")]
    InvalidRule {
        /// The offending rule.
        rule: String,
    },

    /// An attribute inside an element rule is malformed.
    #[error("malformed attribute `{attribute}` in element rule `{rule}`")]
    InvalidAttribute {
        /// The element rule containing the attribute.
        rule: String,
        /// The offending attribute pattern.
        attribute: String,
    },
}
