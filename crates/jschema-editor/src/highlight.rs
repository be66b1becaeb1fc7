//! Style spans for syntax highlighting.

use jschema_parse::{LexErrorKind, Span, Token, TokenKind, Tokenizer};

/// Style classes we emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    /// Object keys
    Property,
    /// String values
    String,
    /// Numbers
    Number,
    /// `true`, `false` and `null`
    Keyword,
}

impl StyleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleKind::Property => "property",
            StyleKind::String => "string",
            StyleKind::Number => "number",
            StyleKind::Keyword => "keyword",
        }
    }
}

/// A highlighted stretch of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// Byte offset where the span starts.
    pub offset: u32,
    /// Length in bytes.
    pub length: u32,
    /// What the text is.
    pub kind: StyleKind,
}

impl Style {
    fn new(span: Span, kind: StyleKind) -> Self {
        Style {
            offset: span.start,
            length: span.len(),
            kind,
        }
    }

    /// The style class name (`property`, `string`, `number`, `keyword`).
    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// Classify every literal token of `source`, in source order.
///
/// Works on tokens alone, so malformed documents are highlighted too. A
/// string is a property when the next significant token is `:`.
/// Punctuation gets no style.
pub fn compute_styles(source: &str) -> Vec<Style> {
    let tokens: Vec<Token<'_>> = Tokenizer::new(source)
        .filter(|token| !token.kind.is_trivia())
        .collect();

    let mut styles = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        let kind = match token.kind {
            TokenKind::String
            | TokenKind::Error(LexErrorKind::UnterminatedString | LexErrorKind::InvalidEscape) => {
                let is_key = tokens
                    .get(i + 1)
                    .is_some_and(|next| next.kind == TokenKind::Colon);
                if is_key {
                    StyleKind::Property
                } else {
                    StyleKind::String
                }
            }
            TokenKind::Number | TokenKind::Error(LexErrorKind::InvalidNumber) => StyleKind::Number,
            TokenKind::True | TokenKind::False | TokenKind::Null => StyleKind::Keyword,
            _ => continue,
        };
        if !token.span.is_empty() {
            styles.push(Style::new(token.span, kind));
        }
    }
    tracing::trace!(count = styles.len(), "computed styles");
    styles
}
