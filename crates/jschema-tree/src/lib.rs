#![doc = include_str!("../README.md")]
//! Document tree representation for JSON.
//!
//! This crate provides the value model shared by data documents and
//! schemas: parsing into spanned values, path access, serialization and
//! rendering of syntax errors.

mod builder;
mod diagnostic;
mod format;
mod json;
mod path;
mod value;

pub use builder::{BuildError, TreeBuilder};
pub use diagnostic::{ParseError, ariadne_config};
pub use format::{FormatOptions, escape_string, stringify, stringify_with_options};
pub use jschema_parse::{Axiom, ParseErrorKind, ScalarKind, Span};
pub use json::{from_serde, to_json_value, to_serde};
pub use path::{JsonPath, PathSegment};
pub use value::{Array, Entry, Number, Object, Payload, Value, ValueKind};

/// Parse a JSON document into a tree, failing on the first syntax error.
pub fn parse(source: &str) -> Result<Value, BuildError> {
    let mut parser = jschema_parse::Parser::new(source);
    let mut builder = TreeBuilder::new();
    while let Some(event) = parser.next_event() {
        builder.event(event);
    }
    builder.finish()
}

/// What [`parse_tolerant`] could make of a document.
#[derive(Debug, Clone)]
pub struct Parsed {
    /// The recovered root value, if any part of one was found.
    pub value: Option<Value>,
    /// Every syntax error and warning, in source order of discovery.
    pub errors: Vec<ParseError>,
}

/// Parse a JSON document, recovering from syntax errors.
pub fn parse_tolerant(source: &str, axiom: Axiom) -> Parsed {
    let mut parser = jschema_parse::Parser::new(source).with_axiom(axiom);
    let mut builder = TreeBuilder::new();
    while let Some(event) = parser.next_event() {
        builder.event(event);
    }
    let (value, errors) = builder.finish_tolerant();
    tracing::debug!(
        recovered = value.is_some(),
        errors = errors.len(),
        "tolerant parse"
    );
    Parsed { value, errors }
}

#[cfg(test)]
mod tests;
