//! Diagnostic markers.

use jschema_parse::{LexErrorKind, ParseErrorKind};
use jschema_schema::{Lang, Message, ValidationError};
use jschema_tree::{ParseError, Span};

/// How serious a marker is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// What a marker reports, resolvable in any supported language.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerMessage {
    /// A syntax problem found by the parser.
    Syntax(ParseErrorKind),
    /// A schema violation found by the validator.
    Validation(Message),
}

impl MarkerMessage {
    pub fn text(&self, lang: Lang) -> String {
        match self {
            MarkerMessage::Syntax(kind) => syntax_message(kind, lang).to_string(),
            MarkerMessage::Validation(message) => message.text_for(lang),
        }
    }
}

/// A diagnostic attached to a range of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Byte offset where the range starts.
    pub offset: u32,
    /// Length of the range in bytes.
    pub length: u32,
    pub severity: Severity,
    /// The problem, not yet rendered to text.
    pub message: MarkerMessage,
    /// Locale used by [`Marker::message`] instead of the process-wide one.
    pub locale: Option<String>,
}

impl Marker {
    pub(crate) fn syntax(error: &ParseError) -> Self {
        Marker {
            offset: error.span.start,
            length: error.span.len(),
            severity: if error.kind.is_warning() {
                Severity::Warning
            } else {
                Severity::Error
            },
            message: MarkerMessage::Syntax(error.kind.clone()),
            locale: None,
        }
    }

    /// A marker for a validation error. Errors on nodes without a span
    /// cover the whole document.
    pub(crate) fn validation(error: &ValidationError, text_len: u32) -> Self {
        let span = error.span.unwrap_or(Span::new(0, text_len));
        Marker {
            offset: span.start,
            length: span.len(),
            severity: Severity::Error,
            message: MarkerMessage::Validation(error.message.clone()),
            locale: None,
        }
    }

    /// The message in the given locale (`"en"`, `"fr"`, ...).
    pub fn get_message(&self, locale: &str) -> String {
        self.message.text(Lang::from_locale(locale))
    }

    /// The message in this marker's locale, or else the process-wide one.
    pub fn message(&self) -> String {
        let lang = match &self.locale {
            Some(locale) => Lang::from_locale(locale),
            None => Lang::current(),
        };
        self.message.text(lang)
    }

    /// The covered byte range.
    pub fn span(&self) -> Span {
        Span::new(self.offset, self.offset + self.length)
    }
}

/// Text of a syntax error.
pub fn syntax_message(kind: &ParseErrorKind, lang: Lang) -> &'static str {
    match lang {
        Lang::En => english(kind),
        Lang::Fr => french(kind),
    }
}

fn english(kind: &ParseErrorKind) -> &'static str {
    match kind {
        ParseErrorKind::UnexpectedToken => "Unexpected token",
        ParseErrorKind::InvalidToken(lex) => match lex {
            LexErrorKind::UnterminatedString => "Unterminated string",
            LexErrorKind::InvalidEscape => "Invalid escape sequence",
            LexErrorKind::InvalidNumber => "Invalid number",
            LexErrorKind::InvalidLiteral => "Invalid literal",
            LexErrorKind::UnexpectedChar => "Unexpected character",
        },
        ParseErrorKind::ExpectedValue => "Value expected",
        ParseErrorKind::ExpectedKey => "Property name expected",
        ParseErrorKind::ExpectedColon => "Colon expected",
        ParseErrorKind::ExpectedCommaOrEnd => "Comma or closing bracket expected",
        ParseErrorKind::ExpectedObject => "Object expected",
        ParseErrorKind::ExpectedArray => "Array expected",
        ParseErrorKind::UnclosedObject => "Unclosed object",
        ParseErrorKind::UnclosedArray => "Unclosed array",
        ParseErrorKind::TrailingComma => "Trailing comma",
        ParseErrorKind::DuplicateKey { .. } => "Duplicate property",
        ParseErrorKind::TrailingContent => "End of file expected",
        ParseErrorKind::EmptyDocument => "Empty document",
    }
}

fn french(kind: &ParseErrorKind) -> &'static str {
    match kind {
        ParseErrorKind::UnexpectedToken => "Jeton inattendu",
        ParseErrorKind::InvalidToken(lex) => match lex {
            LexErrorKind::UnterminatedString => "Chaîne non terminée",
            LexErrorKind::InvalidEscape => "Séquence d'échappement invalide",
            LexErrorKind::InvalidNumber => "Nombre invalide",
            LexErrorKind::InvalidLiteral => "Littéral invalide",
            LexErrorKind::UnexpectedChar => "Caractère inattendu",
        },
        ParseErrorKind::ExpectedValue => "Valeur attendue",
        ParseErrorKind::ExpectedKey => "Nom de propriété attendu",
        ParseErrorKind::ExpectedColon => "Deux-points attendu",
        ParseErrorKind::ExpectedCommaOrEnd => "Virgule ou crochet fermant attendu",
        ParseErrorKind::ExpectedObject => "Objet attendu",
        ParseErrorKind::ExpectedArray => "Tableau attendu",
        ParseErrorKind::UnclosedObject => "Objet non fermé",
        ParseErrorKind::UnclosedArray => "Tableau non fermé",
        ParseErrorKind::TrailingComma => "Virgule finale",
        ParseErrorKind::DuplicateKey { .. } => "Propriété en double",
        ParseErrorKind::TrailingContent => "Fin de fichier attendue",
        ParseErrorKind::EmptyDocument => "Document vide",
    }
}
