//! Token types for the JSON tokenizer.

use crate::Span;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structural tokens
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,

    // Literals
    /// String literal, quotes included: `"hello"`
    String,
    /// Number literal, kept as source text: `-12.5e3`
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,

    // Whitespace
    /// Spaces, tabs and carriage returns not followed by `\n`
    Whitespace,
    /// `\n` or `\r\n`
    Newline,

    // Special tokens
    /// End of input
    Eof,
    /// Malformed input; the scan continues after it
    Error(LexErrorKind),
}

/// Why a stretch of input could not be tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexErrorKind {
    /// A string literal runs to the end of its line or of the input.
    UnterminatedString,
    /// A string literal contains an escape JSON does not allow.
    InvalidEscape,
    /// Something that starts like a number but is not one (`01`, `1.`, `-`).
    InvalidNumber,
    /// A bare word other than `true`, `false` or `null`.
    InvalidLiteral,
    /// A character that cannot start any token.
    UnexpectedChar,
}

impl TokenKind {
    /// Whether this token is insignificant for the grammar.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Newline)
    }

    /// Whether this token is a complete scalar value.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::Number
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }

    /// Whether this token can begin a value.
    pub fn is_value_start(&self) -> bool {
        self.is_scalar() || matches!(self, TokenKind::LBrace | TokenKind::LBracket)
    }

    /// Whether this token is one of the structural delimiters.
    pub fn is_punctuation(&self) -> bool {
        matches!(
            self,
            TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::LBracket
                | TokenKind::RBracket
                | TokenKind::Colon
                | TokenKind::Comma
        )
    }
}

/// A token with its kind, span, and source text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in the source text.
    pub span: Span,
    /// The source text of this token.
    pub text: &'src str,
}

impl<'src> Token<'src> {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span, text: &'src str) -> Self {
        Self { kind, span, text }
    }

    /// Whether this token is a lexer error.
    pub fn is_error(&self) -> bool {
        matches!(self.kind, TokenKind::Error(_))
    }
}
