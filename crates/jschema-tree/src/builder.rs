//! Tree builder from parse events.

use jschema_parse::{Event, LexErrorKind, ParseErrorKind, ScalarKind, Span};

use crate::ParseError;
use crate::value::{Array, Entry, Number, Object, Payload, Value};

/// Error during tree building.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// The input holds no value.
    EmptyDocument,
    /// The input has a syntax error (the first one found).
    Syntax(ParseError),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::EmptyDocument => write!(f, "empty document"),
            BuildError::Syntax(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for BuildError {}

/// Builder that constructs a tree from parse events.
///
/// Tolerates the streams the parser produces for broken input: a key whose
/// value never came is dropped. A value that arrives in an object without a
/// key, or a number that does not parse, is dropped with an error recorded.
#[derive(Default)]
pub struct TreeBuilder {
    stack: Vec<BuilderFrame>,
    root: Option<Value>,
    errors: Vec<ParseError>,
}

enum BuilderFrame {
    Object {
        object: Object,
        open: Span,
        pending_key: Option<(String, Span)>,
    },
    Array {
        items: Vec<Value>,
        open: Span,
    },
}

impl TreeBuilder {
    /// Create a new tree builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event.
    pub fn event(&mut self, event: Event<'_>) {
        match event {
            Event::DocumentStart | Event::DocumentEnd => {
                // No-op for tree building
            }

            Event::ObjectStart { span } => {
                self.stack.push(BuilderFrame::Object {
                    object: Object::default(),
                    open: span,
                    pending_key: None,
                });
            }

            Event::ObjectEnd { span } => {
                if let Some(BuilderFrame::Object { object, open, .. }) = self.stack.pop() {
                    let value = Value {
                        payload: Payload::Object(object),
                        span: Some(open.extend(span)),
                    };
                    self.push_value(value);
                }
            }

            Event::ArrayStart { span } => {
                self.stack.push(BuilderFrame::Array {
                    items: Vec::new(),
                    open: span,
                });
            }

            Event::ArrayEnd { span } => {
                if let Some(BuilderFrame::Array { items, open }) = self.stack.pop() {
                    let value = Value {
                        payload: Payload::Array(Array { items }),
                        span: Some(open.extend(span)),
                    };
                    self.push_value(value);
                }
            }

            Event::Key { span, name } => {
                if let Some(BuilderFrame::Object { pending_key, .. }) = self.stack.last_mut() {
                    *pending_key = Some((name.into_owned(), span));
                }
            }

            Event::Scalar { span, value, kind } => {
                let payload = match kind {
                    ScalarKind::String => Payload::String(value.into_owned()),
                    ScalarKind::Number => match Number::parse(&value) {
                        Some(n) => Payload::Number(n),
                        None => {
                            let kind = ParseErrorKind::InvalidToken(LexErrorKind::InvalidNumber);
                            self.record(kind, span);
                            return;
                        }
                    },
                    ScalarKind::Bool => Payload::Bool(value == "true"),
                    ScalarKind::Null => Payload::Null,
                };
                self.push_value(Value {
                    payload,
                    span: Some(span),
                });
            }

            Event::Error { span, kind } => self.record(kind, span),
        }
    }

    /// Finish building, failing on the first syntax error.
    ///
    /// Warnings (duplicate keys) don't count as failures.
    pub fn finish(self) -> Result<Value, BuildError> {
        if let Some(error) = self.errors.into_iter().find(|e| !e.kind.is_warning()) {
            return Err(match error.kind {
                ParseErrorKind::EmptyDocument => BuildError::EmptyDocument,
                _ => BuildError::Syntax(error),
            });
        }
        self.root.ok_or(BuildError::EmptyDocument)
    }

    /// Finish building, returning whatever value was recovered along with
    /// every error seen.
    pub fn finish_tolerant(self) -> (Option<Value>, Vec<ParseError>) {
        (self.root, self.errors)
    }

    /// Record an error, unless the parser already reported one at `span`.
    fn record(&mut self, kind: ParseErrorKind, span: Span) {
        if self.errors.iter().any(|e| e.span == span) {
            return;
        }
        tracing::trace!(?kind, ?span, "tree builder error");
        self.errors.push(ParseError::new(kind, span));
    }

    /// Push a value to the current context.
    fn push_value(&mut self, value: Value) {
        match self.stack.last_mut() {
            Some(BuilderFrame::Object {
                object,
                pending_key,
                ..
            }) => {
                if let Some((key, key_span)) = pending_key.take() {
                    object.insert_entry(Entry {
                        key,
                        key_span: Some(key_span),
                        value,
                    });
                } else if let Some(span) = value.span {
                    self.record(ParseErrorKind::ExpectedKey, span);
                }
            }
            Some(BuilderFrame::Array { items, .. }) => items.push(value),
            None => {
                // Only the first root value counts
                if self.root.is_none() {
                    self.root = Some(value);
                }
            }
        }
    }
}
