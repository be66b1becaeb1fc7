//! Schema-aware document parsing for editors.

use jschema_parse::{Axiom, ParseErrorKind};
use jschema_schema::{Lang, Validator};
use jschema_tree::{Value, parse_tolerant};
use tracing::debug;

use crate::highlight::{Style, compute_styles};
use crate::marker::{Marker, syntax_message};
use crate::predict::{PredictRequest, PredictResult, predict};

/// Options for a [`JsonParser`].
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Depth limit for value proposals; see [`jschema_schema::propose`].
    pub proposal_depth: i32,
    /// Locale for markers and error strings; `None` follows the
    /// process-wide language.
    pub lang: Option<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            proposal_depth: -1,
            lang: None,
        }
    }
}

impl ParserOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn proposal_depth(mut self, depth: i32) -> Self {
        self.proposal_depth = depth;
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub(crate) fn resolved_lang(&self) -> Lang {
        match &self.lang {
            Some(locale) => Lang::from_locale(locale),
            None => Lang::current(),
        }
    }
}

/// A parse request.
#[derive(Debug, Clone, Copy)]
pub struct ParseRequest<'a> {
    /// The document text.
    pub text: &'a str,
    /// Start symbol: `"value"` (default), `"object"` or `"array"`.
    pub axiom: Option<&'a str>,
}

impl<'a> ParseRequest<'a> {
    pub fn new(text: &'a str) -> Self {
        ParseRequest { text, axiom: None }
    }

    pub fn with_axiom(mut self, axiom: &'a str) -> Self {
        self.axiom = Some(axiom);
        self
    }
}

/// What parsing a document found.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// False only when there is no document to speak of (or the request
    /// itself was malformed).
    pub success: bool,
    /// Why `success` is false.
    pub error: Option<String>,
    /// Syntax markers first, then validation markers.
    pub markers: Vec<Marker>,
    /// Highlighting, in source order.
    pub styles: Vec<Style>,
}

impl ParseResult {
    fn failure(error: String, styles: Vec<Style>) -> Self {
        ParseResult {
            success: false,
            error: Some(error),
            markers: Vec::new(),
            styles,
        }
    }
}

/// Parses and completes documents against one schema.
#[derive(Debug)]
pub struct JsonParser {
    schema: Value,
    validator: Validator,
    options: ParserOptions,
}

impl JsonParser {
    /// A parser for documents described by `schema`.
    pub fn new(schema: Value) -> Self {
        JsonParser {
            schema,
            validator: Validator::new(),
            options: ParserOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a specific validator, for instance one that enforces formats.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse a document into markers and style spans.
    ///
    /// Syntax errors never stop the parse; the recovered value is validated
    /// against the schema and each validation error becomes a marker on the
    /// failing node.
    pub fn parse(&self, request: &ParseRequest<'_>) -> ParseResult {
        let text = request.text;
        let lang = self.options.resolved_lang();
        let styles = compute_styles(text);

        let axiom = match request.axiom {
            None => Axiom::Value,
            Some(name) => match Axiom::from_name(name) {
                Some(axiom) => axiom,
                None => {
                    return ParseResult::failure(format!("unknown axiom '{name}'"), styles);
                }
            },
        };

        let parsed = parse_tolerant(text, axiom);
        if parsed
            .errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::EmptyDocument)
        {
            let error = syntax_message(&ParseErrorKind::EmptyDocument, lang).to_string();
            return ParseResult::failure(error, styles);
        }

        // Phase 1: syntax
        let mut markers: Vec<Marker> = parsed.errors.iter().map(Marker::syntax).collect();

        // Phase 2: schema, against whatever value was recovered
        let placeholder = Value::null();
        let value = parsed.value.as_ref().unwrap_or(&placeholder);
        let result = self.validator.validate(&self.schema, value);
        let text_len = u32::try_from(text.len()).unwrap_or(u32::MAX);
        markers.extend(
            result
                .errors
                .iter()
                .map(|error| Marker::validation(error, text_len)),
        );

        if let Some(locale) = &self.options.lang {
            for marker in &mut markers {
                marker.locale = Some(locale.clone());
            }
        }

        debug!(
            syntax = parsed.errors.len(),
            validation = result.errors.len(),
            styles = styles.len(),
            "parsed document"
        );
        ParseResult {
            success: true,
            error: None,
            markers,
            styles,
        }
    }

    /// Completion proposals at a cursor offset.
    pub fn predict(&self, request: &PredictRequest<'_>) -> PredictResult {
        predict(&self.schema, &self.options, request)
    }
}

/// A parser for documents described by `schema`.
pub fn get_json_parser(schema: Value) -> JsonParser {
    JsonParser::new(schema)
}
