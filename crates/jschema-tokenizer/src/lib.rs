#![doc = include_str!("../README.md")]

mod span;
pub use span::Span;

mod token;
pub use token::{LexErrorKind, Token, TokenKind};

mod tokenizer;
pub use tokenizer::Tokenizer;

mod unescape;
pub use unescape::{EscapeError, unescape};
