//! Pull-based event parser for JSON.

use std::borrow::Cow;
use std::collections::{HashMap, VecDeque};

use jschema_tokenizer::{LexErrorKind, unescape};
use tracing::{debug, trace};

use crate::events::{ParseErrorKind, ScalarKind};
use crate::{Event, PathSegment, Span, Token, TokenKind, Tokenizer};

/// Which kind of value the document root may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axiom {
    /// Any JSON value.
    #[default]
    Value,
    /// Only an object.
    Object,
    /// Only an array.
    Array,
}

impl Axiom {
    /// Look up an axiom by its name (`value`, `object` or `array`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "value" => Some(Axiom::Value),
            "object" => Some(Axiom::Object),
            "array" => Some(Axiom::Array),
            _ => None,
        }
    }
}

/// Parser state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Haven't emitted DocumentStart yet.
    BeforeDocument,
    /// Waiting for the root value.
    ExpectValue,
    /// Right after `{` or `,` in an object.
    InObjectExpectKeyOrEnd,
    /// After a property name.
    InObjectExpectColon,
    /// After `:`.
    InObjectExpectValue,
    /// After a property value.
    InObjectExpectCommaOrEnd,
    /// Right after `[` or `,` in an array.
    InArrayExpectValueOrEnd,
    /// After an array element.
    InArrayExpectCommaOrEnd,
    /// The root value is complete; only trailing trivia may follow.
    Done,
    /// Skipping input after a syntax error, until a delimiter the enclosing
    /// container understands.
    Error,
    /// DocumentEnd was emitted.
    AfterDocument,
}

/// An open container.
#[derive(Debug, Clone)]
enum Frame {
    Object {
        open: Span,
        seen_keys: HashMap<String, Span>,
        /// Key of the entry being parsed.
        key: Option<String>,
        /// Last accepted comma, if nothing followed it yet.
        comma: Option<Span>,
    },
    Array {
        open: Span,
        /// Number of elements started so far.
        len: usize,
        comma: Option<Span>,
    },
}

impl Frame {
    fn closes_with(&self, kind: TokenKind) -> bool {
        matches!(
            (self, kind),
            (Frame::Object { .. }, TokenKind::RBrace) | (Frame::Array { .. }, TokenKind::RBracket)
        )
    }

    /// The segment leading to the child currently being parsed.
    fn current_segment(&self) -> Option<PathSegment> {
        match self {
            Frame::Object { key, .. } => key.clone().map(PathSegment::Key),
            Frame::Array { len, .. } => len.checked_sub(1).map(PathSegment::Index),
        }
    }
}

/// Where the grammar stands at a given byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// State the parser is in at the offset.
    pub state: ParserState,
    /// Path of the innermost open container (empty at the root).
    pub path: Vec<PathSegment>,
    /// The entry of that container being filled at the offset, if known.
    ///
    /// In an object this is the current key once it has been read; in an
    /// array it is the index the next (or current) element takes.
    pub entry: Option<PathSegment>,
    /// Kind and span of a word-like token the offset sits in or right after.
    pub token: Option<(TokenKind, Span)>,
}

impl Context {
    /// Path of the value being typed at the offset: the container path plus
    /// the current entry, if any.
    pub fn value_path(&self) -> Vec<PathSegment> {
        let mut path = self.path.clone();
        if let Some(entry) = &self.entry {
            path.push(entry.clone());
        }
        path
    }
}

/// Pull-based event parser for JSON.
#[derive(Clone)]
pub struct Parser<'src> {
    input: &'src str,
    tokenizer: Tokenizer<'src>,
    /// A token read but handed back for the next state to look at.
    pending: Option<Token<'src>>,
    state: ParserState,
    stack: Vec<Frame>,
    event_queue: VecDeque<Event<'src>>,
    axiom: Axiom,
    /// Nesting depth of brackets skipped while recovering.
    skip_depth: u32,
    /// Whether anything other than trivia appeared at the root.
    saw_root: bool,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source.
    pub fn new(source: &'src str) -> Self {
        Self {
            input: source,
            tokenizer: Tokenizer::new(source),
            pending: None,
            state: ParserState::BeforeDocument,
            stack: Vec::new(),
            event_queue: VecDeque::new(),
            axiom: Axiom::Value,
            skip_depth: 0,
            saw_root: false,
        }
    }

    /// Restrict which kind of value the root may hold.
    pub fn with_axiom(mut self, axiom: Axiom) -> Self {
        self.axiom = axiom;
        self
    }

    /// The source text being parsed.
    pub fn input(&self) -> &'src str {
        self.input
    }

    /// Get the next event from the parser.
    pub fn next_event(&mut self) -> Option<Event<'src>> {
        loop {
            // Drain queue first
            if let Some(event) = self.event_queue.pop_front() {
                return Some(event);
            }
            if self.state == ParserState::AfterDocument {
                return None;
            }
            // Advance state machine
            self.advance();
        }
    }

    /// Parse all events into a vector.
    pub fn parse_to_vec(mut self) -> Vec<Event<'src>> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event() {
            events.push(event);
        }
        events
    }

    /// Replay the grammar up to `offset` and report where it stands there.
    ///
    /// Tokens that start at or after the offset are not looked at. A string,
    /// number, keyword or invalid literal that the offset falls into (or sits
    /// right after, for anything but a closed string) is reported in
    /// [`Context::token`] and not consumed either, so the state is the one in
    /// which that token would be read.
    pub fn context_at(mut self, offset: u32) -> Context {
        let token = loop {
            self.event_queue.clear();
            match self.state {
                ParserState::BeforeDocument => {
                    self.advance();
                    continue;
                }
                ParserState::AfterDocument => break None,
                _ => {}
            }
            let token = self.peek_token();
            if token.kind == TokenKind::Eof || token.span.start >= offset {
                break None;
            }
            if is_under_cursor(&token, offset) {
                break Some((token.kind, token.span));
            }
            self.advance();
        };

        let (path, entry) = self.current_location();
        debug!(offset, state = ?self.state, ?path, ?entry, "context");
        Context {
            state: self.state,
            path,
            entry,
            token,
        }
    }

    /// Container path and current entry for the present state.
    fn current_location(&self) -> (Vec<PathSegment>, Option<PathSegment>) {
        let mut path = Vec::new();
        if let Some((_, parents)) = self.stack.split_last() {
            for frame in parents {
                if let Some(segment) = frame.current_segment() {
                    path.push(segment);
                }
            }
        }

        let entry = match (self.state, self.stack.last()) {
            (
                ParserState::InObjectExpectColon
                | ParserState::InObjectExpectValue
                | ParserState::InObjectExpectCommaOrEnd,
                Some(Frame::Object { key, .. }),
            ) => key.clone().map(PathSegment::Key),
            (ParserState::InArrayExpectValueOrEnd, Some(Frame::Array { len, .. })) => {
                Some(PathSegment::Index(*len))
            }
            (ParserState::InArrayExpectCommaOrEnd, Some(frame)) => frame.current_segment(),
            _ => None,
        };
        (path, entry)
    }

    // ------------------------------------------------------------------
    // Token source
    // ------------------------------------------------------------------

    /// Next significant token, skipping whitespace and newlines.
    fn next_token(&mut self) -> Token<'src> {
        if let Some(token) = self.pending.take() {
            return token;
        }
        loop {
            let token = self.tokenizer.next_token();
            if !token.kind.is_trivia() {
                return token;
            }
        }
    }

    fn peek_token(&mut self) -> Token<'src> {
        let token = self.next_token();
        self.pending = Some(token.clone());
        token
    }

    /// Hand a token back so the next state reads it again.
    fn stash(&mut self, token: Token<'src>) {
        debug_assert!(self.pending.is_none(), "double stash");
        self.pending = Some(token);
    }

    fn error(&mut self, span: Span, kind: ParseErrorKind) {
        debug!(?span, %kind, state = ?self.state, "syntax error");
        self.event_queue.push_back(Event::Error { span, kind });
    }

    // ------------------------------------------------------------------
    // State machine
    // ------------------------------------------------------------------

    /// Advance the state machine by one step.
    fn advance(&mut self) {
        trace!(state = ?self.state, depth = self.stack.len(), "advance");
        match self.state {
            ParserState::BeforeDocument => {
                self.event_queue.push_back(Event::DocumentStart);
                self.state = ParserState::ExpectValue;
            }
            ParserState::ExpectValue => self.advance_root_value(),
            ParserState::InObjectExpectKeyOrEnd => self.advance_object_key(),
            ParserState::InObjectExpectColon => self.advance_object_colon(),
            ParserState::InObjectExpectValue => self.advance_object_value(),
            ParserState::InObjectExpectCommaOrEnd => self.advance_object_comma(),
            ParserState::InArrayExpectValueOrEnd => self.advance_array_value(),
            ParserState::InArrayExpectCommaOrEnd => self.advance_array_comma(),
            ParserState::Done => self.check_trailing_content(),
            ParserState::Error => self.advance_recovering(),
            ParserState::AfterDocument => {}
        }
    }

    fn advance_root_value(&mut self) {
        let token = self.next_token();
        match token.kind {
            TokenKind::Eof => {
                if self.saw_root {
                    self.error(token.span, ParseErrorKind::ExpectedValue);
                } else {
                    self.error(token.span, ParseErrorKind::EmptyDocument);
                }
                self.event_queue.push_back(Event::DocumentEnd);
                self.state = ParserState::AfterDocument;
            }
            kind if kind.is_value_start() => {
                self.saw_root = true;
                match (self.axiom, kind) {
                    (Axiom::Object, TokenKind::LBrace)
                    | (Axiom::Array, TokenKind::LBracket)
                    | (Axiom::Value, _) => {}
                    (Axiom::Object, _) => self.error(token.span, ParseErrorKind::ExpectedObject),
                    (Axiom::Array, _) => self.error(token.span, ParseErrorKind::ExpectedArray),
                }
                self.begin_value(token);
            }
            TokenKind::Error(lex) => {
                self.saw_root = true;
                self.error(token.span, ParseErrorKind::InvalidToken(lex));
                self.state = ParserState::Done;
            }
            _ => {
                self.saw_root = true;
                self.error(token.span, ParseErrorKind::UnexpectedToken);
            }
        }
    }

    fn advance_object_key(&mut self) {
        let token = self.next_token();
        match token.kind {
            TokenKind::String => {
                let name = string_content(token.text);
                self.accept_key(token.span, name);
            }
            TokenKind::Error(lex @ (LexErrorKind::UnterminatedString | LexErrorKind::InvalidEscape)) => {
                // Still a key, even if a broken one; keeps the rest of the
                // entry parseable.
                self.error(token.span, ParseErrorKind::InvalidToken(lex));
                let name = string_content(token.text);
                self.accept_key(token.span, name);
            }
            TokenKind::RBrace | TokenKind::RBracket => self.close_or_unwind(token),
            TokenKind::Eof => self.unclose_top(token.span.start),
            TokenKind::Comma => self.error(token.span, ParseErrorKind::ExpectedKey),
            TokenKind::Colon => {
                self.error(token.span, ParseErrorKind::ExpectedKey);
                self.set_key(None);
                self.state = ParserState::InObjectExpectValue;
            }
            _ => {
                self.error(token.span, ParseErrorKind::ExpectedKey);
                self.recover_from(&token);
            }
        }
    }

    fn advance_object_colon(&mut self) {
        let token = self.next_token();
        match token.kind {
            TokenKind::Colon => self.state = ParserState::InObjectExpectValue,
            TokenKind::Eof => self.unclose_top(token.span.start),
            TokenKind::Comma | TokenKind::RBrace => {
                self.error(token.span, ParseErrorKind::ExpectedColon);
                self.stash(token);
                self.state = ParserState::InObjectExpectCommaOrEnd;
            }
            TokenKind::RBracket => self.close_or_unwind(token),
            _ => {
                // Missing colon; read what follows as the value.
                self.error(token.span, ParseErrorKind::ExpectedColon);
                self.stash(token);
                self.state = ParserState::InObjectExpectValue;
            }
        }
    }

    fn advance_object_value(&mut self) {
        let token = self.next_token();
        match token.kind {
            kind if kind.is_value_start() => self.begin_value(token),
            TokenKind::Error(lex) => {
                self.error(token.span, ParseErrorKind::InvalidToken(lex));
                self.after_value();
            }
            TokenKind::Comma | TokenKind::RBrace => {
                self.error(token.span, ParseErrorKind::ExpectedValue);
                self.stash(token);
                self.state = ParserState::InObjectExpectCommaOrEnd;
            }
            TokenKind::Eof => {
                self.error(token.span, ParseErrorKind::ExpectedValue);
                self.unclose_top(token.span.start);
            }
            TokenKind::RBracket => self.close_or_unwind(token),
            _ => self.error(token.span, ParseErrorKind::UnexpectedToken),
        }
    }

    fn advance_object_comma(&mut self) {
        let token = self.next_token();
        match token.kind {
            TokenKind::Comma => {
                if let Some(Frame::Object { key, comma, .. }) = self.stack.last_mut() {
                    *key = None;
                    *comma = Some(token.span);
                }
                self.state = ParserState::InObjectExpectKeyOrEnd;
            }
            TokenKind::RBrace | TokenKind::RBracket => self.close_or_unwind(token),
            TokenKind::Eof => self.unclose_top(token.span.start),
            TokenKind::String => {
                // Missing comma between entries.
                self.error(token.span, ParseErrorKind::ExpectedCommaOrEnd);
                self.stash(token);
                self.set_key(None);
                self.state = ParserState::InObjectExpectKeyOrEnd;
            }
            _ => {
                self.error(token.span, ParseErrorKind::ExpectedCommaOrEnd);
                self.recover_from(&token);
            }
        }
    }

    fn advance_array_value(&mut self) {
        let token = self.next_token();
        match token.kind {
            TokenKind::RBracket | TokenKind::RBrace => self.close_or_unwind(token),
            kind if kind.is_value_start() => {
                if let Some(Frame::Array { len, comma, .. }) = self.stack.last_mut() {
                    *len += 1;
                    *comma = None;
                }
                self.begin_value(token);
            }
            TokenKind::Error(lex) => {
                self.error(token.span, ParseErrorKind::InvalidToken(lex));
                self.state = ParserState::InArrayExpectCommaOrEnd;
            }
            TokenKind::Comma => self.error(token.span, ParseErrorKind::ExpectedValue),
            TokenKind::Eof => self.unclose_top(token.span.start),
            _ => self.error(token.span, ParseErrorKind::UnexpectedToken),
        }
    }

    fn advance_array_comma(&mut self) {
        let token = self.next_token();
        match token.kind {
            TokenKind::Comma => {
                if let Some(Frame::Array { comma, .. }) = self.stack.last_mut() {
                    *comma = Some(token.span);
                }
                self.state = ParserState::InArrayExpectValueOrEnd;
            }
            TokenKind::RBracket | TokenKind::RBrace => self.close_or_unwind(token),
            TokenKind::Eof => self.unclose_top(token.span.start),
            kind if kind.is_value_start() || matches!(kind, TokenKind::Error(_)) => {
                // Missing comma between elements.
                self.error(token.span, ParseErrorKind::ExpectedCommaOrEnd);
                self.stash(token);
                self.state = ParserState::InArrayExpectValueOrEnd;
            }
            _ => {
                self.error(token.span, ParseErrorKind::ExpectedCommaOrEnd);
                self.recover_from(&token);
            }
        }
    }

    /// Skip tokens until a delimiter that means something to the innermost
    /// open container.
    fn advance_recovering(&mut self) {
        let token = self.next_token();
        match token.kind {
            TokenKind::Eof => {
                if self.stack.is_empty() {
                    self.state = ParserState::Done;
                } else {
                    self.unclose_top(token.span.start);
                }
            }
            TokenKind::LBrace | TokenKind::LBracket => self.skip_depth += 1,
            TokenKind::RBrace | TokenKind::RBracket if self.skip_depth > 0 => {
                self.skip_depth -= 1;
            }
            TokenKind::RBrace | TokenKind::RBracket => {
                let known = self.stack.iter().any(|frame| frame.closes_with(token.kind));
                if known {
                    self.close_or_unwind(token);
                }
            }
            TokenKind::Comma if self.skip_depth == 0 => {
                debug!(at = token.span.start, "resuming after comma");
                match self.stack.last() {
                    Some(Frame::Object { .. }) => {
                        self.set_key(None);
                        self.state = ParserState::InObjectExpectKeyOrEnd;
                    }
                    Some(Frame::Array { .. }) => {
                        self.state = ParserState::InArrayExpectValueOrEnd;
                    }
                    None => {}
                }
            }
            TokenKind::Colon
                if self.skip_depth == 0 && matches!(self.stack.last(), Some(Frame::Object { .. })) =>
            {
                debug!(at = token.span.start, "resuming after colon");
                self.set_key(None);
                self.state = ParserState::InObjectExpectValue;
            }
            _ => trace!(span = ?token.span, "skipping"),
        }
    }

    /// Check for trailing content after the root value.
    fn check_trailing_content(&mut self) {
        let token = self.next_token();
        if token.kind != TokenKind::Eof {
            // Consume remaining tokens to find the full extent of trailing content
            let mut end = token.span.end;
            loop {
                let next = self.next_token();
                if next.kind == TokenKind::Eof {
                    break;
                }
                end = next.span.end;
            }
            self.error(
                Span::new(token.span.start, end),
                ParseErrorKind::TrailingContent,
            );
        }
        self.event_queue.push_back(Event::DocumentEnd);
        self.state = ParserState::AfterDocument;
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Start a value whose first token is `token`.
    fn begin_value(&mut self, token: Token<'src>) {
        match token.kind {
            TokenKind::LBrace => {
                self.event_queue
                    .push_back(Event::ObjectStart { span: token.span });
                self.stack.push(Frame::Object {
                    open: token.span,
                    seen_keys: HashMap::new(),
                    key: None,
                    comma: None,
                });
                self.state = ParserState::InObjectExpectKeyOrEnd;
            }
            TokenKind::LBracket => {
                self.event_queue
                    .push_back(Event::ArrayStart { span: token.span });
                self.stack.push(Frame::Array {
                    open: token.span,
                    len: 0,
                    comma: None,
                });
                self.state = ParserState::InArrayExpectValueOrEnd;
            }
            _ => {
                let (value, kind) = match token.kind {
                    TokenKind::String => (string_content(token.text), ScalarKind::String),
                    TokenKind::Number => (Cow::Borrowed(token.text), ScalarKind::Number),
                    TokenKind::True | TokenKind::False => (Cow::Borrowed(token.text), ScalarKind::Bool),
                    _ => (Cow::Borrowed(token.text), ScalarKind::Null),
                };
                self.event_queue.push_back(Event::Scalar {
                    span: token.span,
                    value,
                    kind,
                });
                self.after_value();
            }
        }
    }

    /// Move to the state that follows a complete value.
    fn after_value(&mut self) {
        self.state = match self.stack.last() {
            Some(Frame::Object { .. }) => ParserState::InObjectExpectCommaOrEnd,
            Some(Frame::Array { .. }) => ParserState::InArrayExpectCommaOrEnd,
            None => ParserState::Done,
        };
    }

    fn accept_key(&mut self, span: Span, name: Cow<'src, str>) {
        let mut duplicate = None;
        if let Some(Frame::Object {
            seen_keys,
            key,
            comma,
            ..
        }) = self.stack.last_mut()
        {
            *comma = None;
            *key = Some(name.to_string());
            match seen_keys.get(name.as_ref()) {
                Some(original) => duplicate = Some(*original),
                None => {
                    seen_keys.insert(name.to_string(), span);
                }
            }
        }
        if let Some(original) = duplicate {
            self.error(span, ParseErrorKind::DuplicateKey { original });
        }
        self.event_queue.push_back(Event::Key { span, name });
        self.state = ParserState::InObjectExpectColon;
    }

    fn set_key(&mut self, new_key: Option<String>) {
        if let Some(Frame::Object { key, .. }) = self.stack.last_mut() {
            *key = new_key;
        }
    }

    /// Enter recovery after an error on `token`.
    fn recover_from(&mut self, token: &Token<'src>) {
        self.skip_depth = u32::from(matches!(
            token.kind,
            TokenKind::LBrace | TokenKind::LBracket
        ));
        self.state = ParserState::Error;
    }

    /// Handle a closing delimiter.
    ///
    /// If it closes the innermost container, close it. If it closes one
    /// further out, the innermost one was left open: report it, close it, and
    /// look at the delimiter again from the parent.
    fn close_or_unwind(&mut self, token: Token<'src>) {
        let Some(top) = self.stack.last() else {
            self.error(token.span, ParseErrorKind::UnexpectedToken);
            return;
        };

        if top.closes_with(token.kind) {
            let in_entry_start = matches!(
                self.state,
                ParserState::InObjectExpectKeyOrEnd | ParserState::InArrayExpectValueOrEnd
            );
            let Some(frame) = self.stack.pop() else {
                return;
            };
            let comma = match &frame {
                Frame::Object { comma, .. } | Frame::Array { comma, .. } => *comma,
            };
            if in_entry_start && let Some(comma) = comma {
                self.error(comma, ParseErrorKind::TrailingComma);
            }
            let event = match frame {
                Frame::Object { .. } => Event::ObjectEnd { span: token.span },
                Frame::Array { .. } => Event::ArrayEnd { span: token.span },
            };
            self.event_queue.push_back(event);
            self.after_value();
            return;
        }

        let closes_outer = self
            .stack
            .iter()
            .rev()
            .skip(1)
            .any(|frame| frame.closes_with(token.kind));
        if closes_outer {
            self.unclose_top(token.span.start);
            self.stash(token);
        } else {
            self.error(token.span, ParseErrorKind::UnexpectedToken);
            if self.state != ParserState::Error {
                self.recover_from(&token);
            }
        }
    }

    /// Close the innermost container without its closing delimiter.
    fn unclose_top(&mut self, at: u32) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let end = Span::empty(at);
        match frame {
            Frame::Object { open, .. } => {
                self.error(open, ParseErrorKind::UnclosedObject);
                self.event_queue.push_back(Event::ObjectEnd { span: end });
            }
            Frame::Array { open, .. } => {
                self.error(open, ParseErrorKind::UnclosedArray);
                self.event_queue.push_back(Event::ArrayEnd { span: end });
            }
        }
        self.skip_depth = 0;
        self.after_value();
    }
}

/// Whether the cursor at `offset` is inside a word-like token.
fn is_under_cursor(token: &Token<'_>, offset: u32) -> bool {
    match token.kind {
        // A closed string is left once the cursor passes its closing quote.
        TokenKind::String => token.span.start < offset && offset < token.span.end,
        TokenKind::Number
        | TokenKind::True
        | TokenKind::False
        | TokenKind::Null
        | TokenKind::Error(_) => token.span.start < offset && offset <= token.span.end,
        _ => false,
    }
}

/// Decoded content of a string token, tolerating a missing closing quote and
/// bad escapes (kept verbatim).
fn string_content(text: &str) -> Cow<'_, str> {
    let inner = text.strip_prefix('"').unwrap_or(text);
    let inner = if !inner.is_empty() && inner.ends_with('"') && !ends_with_escaped_quote(inner) {
        &inner[..inner.len() - 1]
    } else {
        inner
    };
    unescape(inner).unwrap_or(Cow::Borrowed(inner))
}

/// Whether the final `"` of `s` is escaped by an odd run of backslashes.
fn ends_with_escaped_quote(s: &str) -> bool {
    let body = &s[..s.len() - 1];
    body.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}
