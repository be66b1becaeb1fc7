//! Validation results and errors.

use ariadne::{Color, Label, Report, ReportKind, Source};
use indexmap::IndexMap;
use jschema_tree::{JsonPath, Span, Value, ariadne_config};

use crate::lang::Lang;
use crate::message::Message;
use crate::schema::Renderer;

/// Everything one validation pass found.
///
/// `schema` and `value` are the inputs themselves, not copies. Renderers
/// and formats are keyed by the dot-delimited path of the node that
/// declared them (`""` for the root), in the order the walk reached them.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult<'a> {
    /// The schema that was applied.
    pub schema: &'a Value,
    /// The value that was checked.
    pub value: &'a Value,
    /// Errors in the order they were found.
    pub errors: Vec<ValidationError>,
    renderers: IndexMap<String, Renderer<'a>>,
    formats: IndexMap<String, Vec<&'a str>>,
}

impl<'a> ValidationResult<'a> {
    pub(crate) fn new(schema: &'a Value, value: &'a Value) -> Self {
        Self {
            schema,
            value,
            errors: Vec::new(),
            renderers: IndexMap::new(),
            formats: IndexMap::new(),
        }
    }

    /// Check if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn error(&mut self, error: ValidationError) {
        tracing::debug!(path = %error.path, message = ?error.message, "validation error");
        self.errors.push(error);
    }

    /// Errors at `path` or anywhere below it. The empty path returns all.
    pub fn get_errors(&self, path: &str) -> Vec<&ValidationError> {
        let prefix = JsonPath::parse(path);
        self.errors
            .iter()
            .filter(|error| error.path.starts_with(&prefix))
            .collect()
    }

    pub(crate) fn record_renderer(&mut self, path: &JsonPath, renderer: Renderer<'a>) {
        self.renderers.entry(path.to_string()).or_insert(renderer);
    }

    pub(crate) fn record_format(&mut self, path: &JsonPath, format: &'a str) {
        let formats = self.formats.entry(path.to_string()).or_default();
        if !formats.contains(&format) {
            formats.push(format);
        }
    }

    /// Every renderer, keyed by path.
    pub fn renderers(&self) -> &IndexMap<String, Renderer<'a>> {
        &self.renderers
    }

    /// The renderer declared for the node at `path`.
    pub fn renderer(&self, path: &str) -> Option<&Renderer<'a>> {
        self.renderers.get(&JsonPath::parse(path).to_string())
    }

    /// Formats declared for the node at `path` (empty when none).
    pub fn formats(&self, path: &str) -> &[&'a str] {
        self.formats
            .get(&JsonPath::parse(path).to_string())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every format list, keyed by path.
    pub fn all_formats(&self) -> &IndexMap<String, Vec<&'a str>> {
        &self.formats
    }

    /// Candidate values for the node at `path`; see [`propose`](crate::propose).
    pub fn propose(&self, path: &str, max_depth: i32) -> Vec<Value> {
        crate::propose::propose(self, path, max_depth)
    }

    /// Render all errors with ariadne.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| {
            self.errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    /// Write all error reports to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, mut writer: W) {
        for error in &self.errors {
            error.write_report(filename, source, &mut writer);
        }
    }
}

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Path of the failing node (e.g., `server.ports.0`).
    pub path: JsonPath,
    /// Source span of the failing node, or of its nearest ancestor with one.
    pub span: Option<Span>,
    /// What went wrong.
    pub message: Message,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(path: JsonPath, message: Message) -> Self {
        Self {
            path,
            span: None,
            message,
        }
    }

    /// Set the span.
    pub fn with_span(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    /// The message for a locale such as `"en"` or `"fr"`.
    pub fn message_in(&self, locale: &str) -> String {
        self.message.text(locale)
    }

    /// Render this error with ariadne.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let report = self.build_report(filename);
        let _ = report
            .with_config(ariadne_config())
            .finish()
            .write((filename, Source::from(source)), writer);
    }

    fn build_report<'a>(
        &self,
        filename: &'a str,
    ) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
        let range = self
            .span
            .map(|s| s.start as usize..s.end as usize)
            .unwrap_or(0..0);
        let lang = Lang::current();

        let label = match &self.message {
            Message::MissingRequired { property } => format!("add '{property}' here"),
            Message::UnknownProperty { .. } => "not declared in schema".to_string(),
            Message::UnresolvedRef { .. } => "checked against a missing definition".to_string(),
            _ if self.path.is_root() => "at the document root".to_string(),
            _ => format!("at '{}'", self.path),
        };

        let mut builder = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(self.message.text_for(lang))
            .with_label(
                Label::new((filename, range))
                    .with_message(label)
                    .with_color(Color::Red),
            );
        if let Message::UnknownProperty {
            suggestion: Some(suggestion),
            ..
        } = &self.message
        {
            builder = builder.with_help(format!("did you mean '{suggestion}'?"));
        }
        builder
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}
