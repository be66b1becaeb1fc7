#![doc = include_str!("../README.md")]
//! JSON Schema support for jschema documents.
//!
//! This crate provides:
//! - A tolerant schema interpreter ([`SchemaNode`])
//! - Validation with path-qualified errors and renderer/format metadata
//! - Schema-driven value synthesis ([`propose`])
//! - Localized messages ([`Message`], [`set_lang`])

mod format;
mod lang;
mod message;
mod propose;
mod result;
mod schema;
mod validate;

pub use format::{BuiltinFormats, FormatChecker};
pub use lang::{Lang, current_lang, set_lang};
pub use message::Message;
pub use propose::{propose, synthesize};
pub use result::{ValidationError, ValidationResult};
pub use schema::{AdditionalProperties, RefError, Renderer, SchemaNode, TypeName};
pub use validate::{Validator, validate};
