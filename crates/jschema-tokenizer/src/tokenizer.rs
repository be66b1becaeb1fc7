//! Tokenizer for JSON text.

use crate::{LexErrorKind, Span, Token, TokenKind};
use tracing::trace;

/// A tokenizer that produces tokens from JSON source text.
///
/// Malformed input never stops the scan: each bad stretch becomes one
/// [`TokenKind::Error`] token and tokenizing resumes right after it.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
        }
    }

    /// Get the current byte position.
    #[inline]
    pub fn position(&self) -> u32 {
        self.pos
    }

    /// Check if we're at the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    /// The full source text.
    #[inline]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Peek at the nth character (0-indexed) without consuming.
    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    /// Advance while `pred` holds; returns how many characters were consumed.
    fn advance_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.advance();
            count += 1;
        }
        count
    }

    /// Create a token from the given start position to current position.
    fn token(&self, kind: TokenKind, start: u32) -> Token<'src> {
        let span = Span::new(start, self.pos);
        let text = &self.source[start as usize..self.pos as usize];
        trace!("Token {:?} at {:?}: {:?}", kind, span, text);
        Token::new(kind, span, text)
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        let Some(c) = self.peek() else {
            return self.token(TokenKind::Eof, self.pos);
        };
        let start = self.pos;

        match c {
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ':' => self.single(TokenKind::Colon),
            ',' => self.single(TokenKind::Comma),

            '"' => self.tokenize_string(),
            '-' | '0'..='9' => self.tokenize_number(),

            '\n' => self.single(TokenKind::Newline),
            '\r' if self.peek_nth(1) == Some('\n') => {
                self.advance();
                self.advance();
                self.token(TokenKind::Newline, start)
            }
            ' ' | '\t' | '\r' => self.tokenize_whitespace(),

            c if c.is_ascii_alphabetic() || c == '_' => self.tokenize_word(),

            _ => {
                self.advance();
                self.token(TokenKind::Error(LexErrorKind::UnexpectedChar), start)
            }
        }
    }

    /// Consume exactly one character as a token of `kind`.
    fn single(&mut self, kind: TokenKind) -> Token<'src> {
        let start = self.pos;
        self.advance();
        self.token(kind, start)
    }

    /// Tokenize horizontal whitespace (spaces, tabs, lone carriage returns).
    fn tokenize_whitespace(&mut self) -> Token<'src> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' => {
                    self.advance();
                }
                '\r' if self.peek_nth(1) != Some('\n') => {
                    self.advance();
                }
                _ => break,
            }
        }
        self.token(TokenKind::Whitespace, start)
    }

    /// Tokenize `true`, `false`, `null`, or an invalid bare word.
    fn tokenize_word(&mut self) -> Token<'src> {
        let start = self.pos;
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let kind = match &self.source[start as usize..self.pos as usize] {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::Error(LexErrorKind::InvalidLiteral),
        };
        self.token(kind, start)
    }

    /// Tokenize a string literal, quotes included.
    ///
    /// A raw line break ends an unterminated string so that one missing quote
    /// does not swallow the rest of the document.
    fn tokenize_string(&mut self) -> Token<'src> {
        let start = self.pos;
        let mut bad_escape = false;

        // Consume opening quote
        self.advance();

        loop {
            match self.peek() {
                None | Some('\n') => {
                    return self.token(TokenKind::Error(LexErrorKind::UnterminatedString), start);
                }
                Some('\r') if self.peek_nth(1) == Some('\n') => {
                    return self.token(TokenKind::Error(LexErrorKind::UnterminatedString), start);
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't') => {
                            self.advance();
                        }
                        Some('u') => {
                            self.advance();
                            let digits = self.advance_while_max(4, |c| c.is_ascii_hexdigit());
                            if digits != 4 {
                                bad_escape = true;
                            }
                        }
                        // Let the loop report the unterminated string
                        None | Some('\n') => {}
                        Some(_) => {
                            bad_escape = true;
                            self.advance();
                        }
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        if bad_escape {
            self.token(TokenKind::Error(LexErrorKind::InvalidEscape), start)
        } else {
            self.token(TokenKind::String, start)
        }
    }

    /// Like `advance_while`, but stops after `max` characters.
    fn advance_while_max(&mut self, max: usize, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while count < max {
            match self.peek() {
                Some(c) if pred(c) => {
                    self.advance();
                    count += 1;
                }
                _ => break,
            }
        }
        count
    }

    /// Tokenize a number literal following the JSON grammar.
    ///
    /// `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`
    ///
    /// Anything number-like glued to the end (`01`, `1.2.3`, `12px`) turns the
    /// whole run into a single `InvalidNumber` error token.
    fn tokenize_number(&mut self) -> Token<'src> {
        let start = self.pos;
        let mut valid = true;

        if self.peek() == Some('-') {
            self.advance();
        }

        match self.peek() {
            Some('0') => {
                self.advance();
            }
            Some('1'..='9') => {
                self.advance_while(|c| c.is_ascii_digit());
            }
            _ => valid = false,
        }

        if valid && self.peek() == Some('.') {
            self.advance();
            if self.advance_while(|c| c.is_ascii_digit()) == 0 {
                valid = false;
            }
        }

        if valid && matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if self.advance_while(|c| c.is_ascii_digit()) == 0 {
                valid = false;
            }
        }

        if self.advance_while(is_number_tail_char) > 0 {
            valid = false;
        }

        if valid {
            self.token(TokenKind::Number, start)
        } else {
            self.token(TokenKind::Error(LexErrorKind::InvalidNumber), start)
        }
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

/// Characters that, glued to a number, make it malformed.
fn is_number_tail_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-' | '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init();
    }

    fn tokenize(source: &str) -> Vec<(TokenKind, &str)> {
        init_tracing();
        Tokenizer::new(source).map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn test_structural_tokens() {
        assert_eq!(tokenize("{"), vec![(TokenKind::LBrace, "{")]);
        assert_eq!(tokenize("}"), vec![(TokenKind::RBrace, "}")]);
        assert_eq!(tokenize("["), vec![(TokenKind::LBracket, "[")]);
        assert_eq!(tokenize("]"), vec![(TokenKind::RBracket, "]")]);
        assert_eq!(tokenize(":"), vec![(TokenKind::Colon, ":")]);
        assert_eq!(tokenize(","), vec![(TokenKind::Comma, ",")]);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(tokenize("true"), vec![(TokenKind::True, "true")]);
        assert_eq!(tokenize("false"), vec![(TokenKind::False, "false")]);
        assert_eq!(tokenize("null"), vec![(TokenKind::Null, "null")]);
        assert_eq!(
            tokenize("nul"),
            vec![(TokenKind::Error(LexErrorKind::InvalidLiteral), "nul")]
        );
        assert_eq!(
            tokenize("trueish"),
            vec![(TokenKind::Error(LexErrorKind::InvalidLiteral), "trueish")]
        );
    }

    #[test]
    fn test_numbers() {
        for ok in ["0", "-0", "42", "-12.5", "1e10", "1.5E-3", "0.000001"] {
            assert_eq!(tokenize(ok), vec![(TokenKind::Number, ok)], "{ok}");
        }
        let invalid = TokenKind::Error(LexErrorKind::InvalidNumber);
        for bad in ["01", "-", "1.", "1e", "1.2.3", "12px", "-abc"] {
            assert_eq!(tokenize(bad), vec![(invalid, bad)], "{bad}");
        }
    }

    #[test]
    fn test_number_keeps_source_text() {
        let tokens = tokenize("123456789012345678901234567890.000");
        assert_eq!(
            tokens,
            vec![(TokenKind::Number, "123456789012345678901234567890.000")]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            tokenize(r#""hello world""#),
            vec![(TokenKind::String, r#""hello world""#)]
        );
        assert_eq!(
            tokenize(r#""with \"escapes\" é""#),
            vec![(TokenKind::String, r#""with \"escapes\" é""#)]
        );
    }

    #[test]
    fn test_invalid_escape_keeps_scanning() {
        let tokens = tokenize(r#"["a\qb", 1]"#);
        assert_eq!(
            tokens,
            vec![
                (TokenKind::LBracket, "["),
                (TokenKind::Error(LexErrorKind::InvalidEscape), r#""a\qb""#),
                (TokenKind::Comma, ","),
                (TokenKind::Whitespace, " "),
                (TokenKind::Number, "1"),
                (TokenKind::RBracket, "]"),
            ]
        );
        assert_eq!(
            tokenize(r#""\u12""#),
            vec![(TokenKind::Error(LexErrorKind::InvalidEscape), r#""\u12""#)]
        );
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        let tokens = tokenize("\"hello\n1");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Error(LexErrorKind::UnterminatedString), "\"hello"),
                (TokenKind::Newline, "\n"),
                (TokenKind::Number, "1"),
            ]
        );
        assert_eq!(
            tokenize("\"abc"),
            vec![(TokenKind::Error(LexErrorKind::UnterminatedString), "\"abc")]
        );
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(tokenize("  \t"), vec![(TokenKind::Whitespace, "  \t")]);
        assert_eq!(tokenize("\n"), vec![(TokenKind::Newline, "\n")]);
        assert_eq!(tokenize("\r\n"), vec![(TokenKind::Newline, "\r\n")]);
        assert_eq!(tokenize(" \r"), vec![(TokenKind::Whitespace, " \r")]);
    }

    #[test]
    fn test_unexpected_char() {
        assert_eq!(
            tokenize("{#}"),
            vec![
                (TokenKind::LBrace, "{"),
                (TokenKind::Error(LexErrorKind::UnexpectedChar), "#"),
                (TokenKind::RBrace, "}"),
            ]
        );
    }

    #[test]
    fn test_mixed() {
        let tokens = tokenize(r#"{"a": [1, true]}"#);
        assert_eq!(
            tokens,
            vec![
                (TokenKind::LBrace, "{"),
                (TokenKind::String, r#""a""#),
                (TokenKind::Colon, ":"),
                (TokenKind::Whitespace, " "),
                (TokenKind::LBracket, "["),
                (TokenKind::Number, "1"),
                (TokenKind::Comma, ","),
                (TokenKind::Whitespace, " "),
                (TokenKind::True, "true"),
                (TokenKind::RBracket, "]"),
                (TokenKind::RBrace, "}"),
            ]
        );
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let tokens: Vec<_> = Tokenizer::new("[\"é\", 1]").collect();
        assert_eq!(tokens[1].span, Span::new(1, 5));
        assert_eq!(tokens[4].span, Span::new(7, 8));
    }
}
