//! Common utilities for the Quokka parser.
//!
//! This crate provides shared infrastructure used by all parser components:
//! - **Warning System** - deduplicated warnings for misconfiguration
//! - **URL Policy** - the URL-safety check applied to URL-bearing attributes

pub mod url;
pub mod warning;
