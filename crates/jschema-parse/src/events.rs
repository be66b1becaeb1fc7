//! Event types for the event-based JSON parser.

use std::borrow::Cow;
use std::fmt;

use crate::{LexErrorKind, Span};

/// Events emitted by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'src> {
    // Document boundaries
    /// Start of document.
    DocumentStart,
    /// End of document.
    DocumentEnd,

    // Objects
    /// Start of an object `{ ... }`.
    ObjectStart {
        /// Span of the opening brace.
        span: Span,
    },
    /// End of an object.
    ObjectEnd {
        /// Span of the closing brace, or an empty span at the end of input
        /// when the object was never closed.
        span: Span,
    },

    // Arrays
    /// Start of an array `[ ... ]`.
    ArrayStart {
        /// Span of the opening bracket.
        span: Span,
    },
    /// End of an array.
    ArrayEnd {
        /// Span of the closing bracket, or an empty span at the end of input.
        span: Span,
    },

    /// A property name inside an object.
    ///
    /// A key is normally followed by exactly one value. After a syntax error
    /// the value may be missing; consumers drop keys that never get one.
    Key {
        /// Span of the key, quotes included.
        span: Span,
        /// Key after escape processing.
        name: Cow<'src, str>,
    },

    /// A scalar value.
    Scalar {
        /// Span of the scalar.
        span: Span,
        /// For strings, the decoded text; for everything else, the source text.
        value: Cow<'src, str>,
        /// Kind of scalar.
        kind: ScalarKind,
    },

    // Errors
    /// Parse error.
    Error {
        /// Span where error occurred.
        span: Span,
        /// Kind of error.
        kind: ParseErrorKind,
    },
}

impl Event<'_> {
    /// The span this event covers, if it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Event::DocumentStart | Event::DocumentEnd => None,
            Event::ObjectStart { span }
            | Event::ObjectEnd { span }
            | Event::ArrayStart { span }
            | Event::ArrayEnd { span }
            | Event::Key { span, .. }
            | Event::Scalar { span, .. }
            | Event::Error { span, .. } => Some(*span),
        }
    }
}

/// Kind of scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// `"..."`
    String,
    /// Number literal, kept as written.
    Number,
    /// `true` or `false`.
    Bool,
    /// `null`.
    Null,
}

/// Parse error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token that makes no sense where it appears.
    UnexpectedToken,
    /// The tokenizer could not make sense of this stretch of input.
    InvalidToken(LexErrorKind),
    /// Expected a value.
    ExpectedValue,
    /// Expected a quoted property name.
    ExpectedKey,
    /// Expected `:` after a property name.
    ExpectedColon,
    /// Expected `,` or the closing delimiter after a value.
    ExpectedCommaOrEnd,
    /// The document root must be an object.
    ExpectedObject,
    /// The document root must be an array.
    ExpectedArray,
    /// Unclosed object (missing `}`).
    UnclosedObject,
    /// Unclosed array (missing `]`).
    UnclosedArray,
    /// A comma right before a closing delimiter.
    TrailingComma,
    /// Duplicate key in object.
    DuplicateKey {
        /// Span of the first occurrence.
        original: Span,
    },
    /// Content after the root value.
    TrailingContent,
    /// The document holds no value at all.
    EmptyDocument,
}

impl ParseErrorKind {
    /// Whether this problem should be reported as a warning rather than an error.
    ///
    /// Duplicate keys are accepted by most JSON readers (last one wins), so they
    /// don't make the document unusable.
    pub fn is_warning(&self) -> bool {
        matches!(self, ParseErrorKind::DuplicateKey { .. })
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedToken => write!(f, "unexpected token"),
            ParseErrorKind::InvalidToken(kind) => match kind {
                LexErrorKind::UnterminatedString => write!(f, "unterminated string"),
                LexErrorKind::InvalidEscape => write!(f, "invalid escape sequence"),
                LexErrorKind::InvalidNumber => write!(f, "invalid number"),
                LexErrorKind::InvalidLiteral => write!(f, "invalid literal"),
                LexErrorKind::UnexpectedChar => write!(f, "unexpected character"),
            },
            ParseErrorKind::ExpectedValue => write!(f, "expected value"),
            ParseErrorKind::ExpectedKey => write!(f, "expected property name"),
            ParseErrorKind::ExpectedColon => write!(f, "expected ':'"),
            ParseErrorKind::ExpectedCommaOrEnd => write!(f, "expected ',' or closing delimiter"),
            ParseErrorKind::ExpectedObject => write!(f, "expected an object"),
            ParseErrorKind::ExpectedArray => write!(f, "expected an array"),
            ParseErrorKind::UnclosedObject => write!(f, "unclosed object"),
            ParseErrorKind::UnclosedArray => write!(f, "unclosed array"),
            ParseErrorKind::TrailingComma => write!(f, "trailing comma"),
            ParseErrorKind::DuplicateKey { .. } => write!(f, "duplicate key"),
            ParseErrorKind::TrailingContent => write!(f, "trailing content after value"),
            ParseErrorKind::EmptyDocument => write!(f, "empty document"),
        }
    }
}
