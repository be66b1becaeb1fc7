#![doc = include_str!("../README.md")]

use indexmap::IndexMap;

pub use jschema_editor::{
    JsonParser, Marker, MarkerMessage, ParseRequest, ParseResult, ParserOptions, PredictRequest,
    PredictResult, Proposal, Severity, Style, StyleKind, compute_styles,
};
pub use jschema_schema::{
    BuiltinFormats, FormatChecker, Message, Renderer, ValidationError, ValidationResult,
    Validator, current_lang,
};
pub use jschema_tree::{
    BuildError, FormatOptions, JsonPath, ParseError, Value, ariadne_config, stringify_with_options,
    to_serde,
};

/// A validation error as plain strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    /// Dot-delimited path of the failing node (`""` for the root).
    pub path: String,
    /// The message in the current language.
    pub message: String,
}

/// Set the language for messages resolved without an explicit locale.
pub fn set_lang(language: &str) {
    jschema_schema::set_lang(language);
}

/// Validate `value` against `schema`.
///
/// The result borrows both inputs; neither is modified.
pub fn validate<'a>(schema: &'a Value, value: &'a Value) -> ValidationResult<'a> {
    jschema_schema::validate(schema, value)
}

/// Errors at `path` or below it (`""` for all), messages in the current
/// language.
pub fn get_errors(result: &ValidationResult<'_>, path: &str) -> Vec<ErrorEntry> {
    result
        .get_errors(path)
        .into_iter()
        .map(|error| ErrorEntry {
            path: error.path.to_string(),
            message: error.message.to_string(),
        })
        .collect()
}

/// Candidate values for the node at `path`. Descendants deeper than
/// `max_depth` are `null`; `-1` builds only the node itself.
pub fn propose(result: &ValidationResult<'_>, path: &str, max_depth: i32) -> Vec<Value> {
    result.propose(path, max_depth)
}

/// Renderers declared along the validation walk, keyed by path.
pub fn get_renderers<'r, 'a>(result: &'r ValidationResult<'a>) -> &'r IndexMap<String, Renderer<'a>> {
    result.renderers()
}

/// Formats declared for the node at `path`.
pub fn get_formats(result: &ValidationResult<'_>, path: &str) -> Vec<String> {
    result
        .formats(path)
        .iter()
        .map(|format| format.to_string())
        .collect()
}

/// A parser bound to `schema`, for `parse` and `predict` requests.
pub fn get_json_parser(schema: Value) -> JsonParser {
    jschema_editor::get_json_parser(schema)
}

/// Parse JSON text into a value. Any syntax error is an error.
pub fn parse_value(text: &str) -> Result<Value, BuildError> {
    jschema_tree::parse(text)
}

/// Compact JSON text for a value; parsing it gives back an equal value.
pub fn stringify_value(value: &Value) -> String {
    jschema_tree::stringify(value)
}

/// The tagged form of a value: `{"tag": "jv-number", "value": "123"}`.
pub fn to_json_value(value: &Value) -> serde_json::Value {
    jschema_tree::to_json_value(value)
}
