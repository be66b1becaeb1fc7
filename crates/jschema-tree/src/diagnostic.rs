//! Diagnostic rendering for parser errors.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use jschema_parse::{LexErrorKind, ParseErrorKind, Span};

/// Get ariadne config, respecting NO_COLOR env var.
pub fn ariadne_config() -> Config {
    let no_color = std::env::var("NO_COLOR").is_ok();
    if no_color {
        Config::default().with_color(false)
    } else {
        Config::default()
    }
}

/// A parser error with source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Source location.
    pub span: Span,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
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
        let range: std::ops::Range<usize> = self.span.into();
        let kind = if self.kind.is_warning() {
            ReportKind::Warning
        } else {
            ReportKind::Error
        };

        let (label, help): (&str, Option<&str>) = match &self.kind {
            ParseErrorKind::DuplicateKey { original } => {
                let original_range: std::ops::Range<usize> = (*original).into();
                return Report::build(kind, (filename, range.clone()))
                    .with_message("duplicate key")
                    .with_label(
                        Label::new((filename, original_range))
                            .with_message("first defined here")
                            .with_color(Color::Blue),
                    )
                    .with_label(
                        Label::new((filename, range))
                            .with_message("duplicate key")
                            .with_color(Color::Yellow),
                    )
                    .with_help("the last value wins; remove one of the entries");
            }
            ParseErrorKind::UnclosedObject => ("object opened here", Some("add a closing '}'")),
            ParseErrorKind::UnclosedArray => ("array opened here", Some("add a closing ']'")),
            ParseErrorKind::InvalidToken(LexErrorKind::InvalidEscape) => (
                "invalid escape",
                Some("valid escapes are: \\\", \\\\, \\/, \\b, \\f, \\n, \\r, \\t, \\uXXXX"),
            ),
            ParseErrorKind::InvalidToken(LexErrorKind::UnterminatedString) => {
                ("string starts here", Some("add a closing '\"'"))
            }
            ParseErrorKind::InvalidToken(LexErrorKind::InvalidNumber) => (
                "not a valid number",
                Some("numbers look like -12, 0.5 or 1e10; no leading zeros"),
            ),
            ParseErrorKind::InvalidToken(LexErrorKind::InvalidLiteral) => (
                "not a value",
                Some("strings need double quotes; the only bare words are true, false and null"),
            ),
            ParseErrorKind::InvalidToken(LexErrorKind::UnexpectedChar) => ("unexpected", None),
            ParseErrorKind::UnexpectedToken => ("unexpected", None),
            ParseErrorKind::ExpectedValue => ("expected a value here", None),
            ParseErrorKind::ExpectedKey => {
                ("expected a property name here", Some("property names are double-quoted strings"))
            }
            ParseErrorKind::ExpectedColon => ("expected ':' before this", None),
            ParseErrorKind::ExpectedCommaOrEnd => ("expected ',' before this", None),
            ParseErrorKind::ExpectedObject => ("the document must be an object", None),
            ParseErrorKind::ExpectedArray => ("the document must be an array", None),
            ParseErrorKind::TrailingComma => ("remove this comma", None),
            ParseErrorKind::TrailingContent => (
                "unexpected content here",
                Some("a JSON document holds exactly one value"),
            ),
            ParseErrorKind::EmptyDocument => ("input ends here", None),
        };

        let mut report = Report::build(kind, (filename, range.clone()))
            .with_message(self.kind.to_string())
            .with_label(
                Label::new((filename, range))
                    .with_message(label)
                    .with_color(Color::Red),
            );
        if let Some(help) = help {
            report = report.with_help(help);
        }
        report
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.span.start)
    }
}

impl std::error::Error for ParseError {}
