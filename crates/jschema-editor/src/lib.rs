#![doc = include_str!("../README.md")]
//! Editor services for JSON documents.
//!
//! This crate provides:
//! - [`JsonParser::parse`]: syntax and schema markers plus style spans
//! - [`JsonParser::predict`]: completion proposals at a cursor
//! - [`compute_styles`]: highlighting without a schema

mod highlight;
mod marker;
mod parser;
mod predict;

pub use highlight::{Style, StyleKind, compute_styles};
pub use marker::{Marker, MarkerMessage, Severity, syntax_message};
pub use parser::{JsonParser, ParseRequest, ParseResult, ParserOptions, get_json_parser};
pub use predict::{PredictRequest, PredictResult, Proposal};
