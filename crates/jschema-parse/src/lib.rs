#![doc = include_str!("../README.md")]

pub use jschema_tokenizer::{LexErrorKind, Span, Token, TokenKind, Tokenizer};

mod events;
pub use events::{Event, ParseErrorKind, ScalarKind};

mod path;
pub use path::PathSegment;

mod parser;
pub use parser::{Axiom, Context, Parser, ParserState};
