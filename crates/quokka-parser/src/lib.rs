//! Sanitizing HTML fragment parser for Quokka.
//!
//! # Scope
//!
//! This crate implements:
//! - **Sanitization** of untrusted markup against a [`Schema`](quokka_schema::Schema)
//!   - html5ever parsing ([WHATWG § 13.2](https://html.spec.whatwg.org/multipage/parsing.html))
//!   - element and attribute allow-listing, URL safety, bogus/internal markers
//! - **Tree building** into a [`quokka_ast::AstTree`]
//! - **Normalization** in one tree walk
//!   - whitespace collapsing and edge trimming
//!   - empty element padding and removal
//!   - invalid child collection and repair
//! - **Root-block wrapping** of stray root content
//! - **Filters** keyed by tag or attribute name, plus the built-in ones
//! - **Serialization** back to HTML
//!
//! # Example
//!
//! ```
//! use quokka_parser::{DomParser, ParserArgs, serialize};
//!
//! let parser = DomParser::default();
//! let tree = parser.parse("<p>a    b</p><foo>c</foo>", &mut ParserArgs::default());
//! assert_eq!(serialize(&tree, parser.schema()), "<p>a b</p>c");
//! ```

/// Per-call parse options.
pub mod args;
/// Transcription of the sanitized tree into the AST.
pub mod builder;
/// Filters registered by every parser.
mod builtin_filters;
/// The parse pipeline.
pub mod dom_parser;
/// Filter registration and dispatch.
pub mod filter;
/// Invalid-child detection and repair.
pub mod invalid;
/// Presentational element conversions.
mod legacy;
/// html5ever parsing into an owned tree.
pub mod native;
/// Schema-backed sanitizer hooks.
pub mod policy;
/// Root-block wrapping.
pub mod root_block;
/// The hook-driven sanitizer.
pub mod sanitize;
/// HTML serialization.
pub mod serializer;
/// Parser configuration.
pub mod settings;
/// `style` attribute declarations.
pub mod styles;
/// Helpers shared by the normalization passes.
pub mod utils;
/// The traversal primitive.
pub mod walker;
/// Whitespace normalization.
pub mod whitespace;

pub use args::{Format, ParserArgs};
pub use dom_parser::DomParser;
pub use filter::{FilterCallback, ParserFilter};
pub use serializer::serialize;
pub use settings::{ForcedRootBlock, ParserSettings, SettingsError};
