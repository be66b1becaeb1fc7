//! Value types for JSON documents.
//!
//! The same tree describes data documents and schemas. Values produced by the
//! parser carry the span they were read from; values built in code have none.
//! Equality is structural and ignores spans.

use std::cmp::Ordering;
use std::fmt;

use jschema_parse::{PathSegment, Span, TokenKind, Tokenizer};

use crate::path::JsonPath;

/// A JSON value with an optional source span.
#[derive(Debug, Clone)]
pub struct Value {
    /// What the value holds.
    pub payload: Payload,
    /// Source span (None if programmatically constructed).
    pub span: Option<Span>,
}

/// The payload of a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `null`
    Null,
    /// `true` or `false`
    Bool(bool),
    /// A number, kept as written.
    Number(Number),
    /// A string, escapes decoded.
    String(String),
    /// `[ ... ]`
    Array(Array),
    /// `{ ... }`
    Object(Object),
}

/// The runtime kind of a value, as named by JSON Schema's `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `null`
    Null,
    /// `boolean`
    Boolean,
    /// `number`
    Number,
    /// `string`
    String,
    /// `array`
    Array,
    /// `object`
    Object,
}

impl ValueKind {
    /// The JSON Schema type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON number stored as its source text, so that nothing is lost to
/// floating point.
#[derive(Debug, Clone)]
pub struct Number {
    text: String,
}

/// An array.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    /// Items in the array.
    pub items: Vec<Value>,
}

/// An object, entries kept in insertion order.
///
/// Equality ignores entry order, as JSON object semantics do.
#[derive(Debug, Clone, Default)]
pub struct Object {
    /// Entries in the object.
    pub entries: Vec<Entry>,
}

/// An entry in an object.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The key, escapes decoded.
    pub key: String,
    /// Span of the key, quotes included.
    pub key_span: Option<Span>,
    /// The value.
    pub value: Value,
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

impl Number {
    /// Wrap number text, checking it against the JSON number grammar.
    pub fn parse(text: &str) -> Option<Self> {
        let mut tokens = Tokenizer::new(text);
        let token = tokens.next()?;
        if token.kind != TokenKind::Number || tokens.next().is_some() {
            return None;
        }
        Some(Number {
            text: text.to_string(),
        })
    }

    /// Format a float the shortest way that reads back to the same value.
    ///
    /// Returns `None` for NaN and infinities, which JSON cannot represent.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let text = if value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{}", value as i64)
        } else {
            format!("{value}")
        };
        Some(Number { text })
    }

    /// The number as written.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The number as a float (may lose precision).
    pub fn as_f64(&self) -> f64 {
        self.text.parse().unwrap_or(f64::NAN)
    }

    /// The number as an `i64`, if it is integral and fits.
    pub fn as_i64(&self) -> Option<i64> {
        if let Ok(n) = self.text.parse::<i64>() {
            return Some(n);
        }
        let f = self.as_f64();
        if self.is_integer() && f.abs() < 9.007_199_254_740_992e15 {
            Some(f as i64)
        } else {
            None
        }
    }

    /// Whether the number has no fractional part (`1.0` and `1e2` count).
    pub fn is_integer(&self) -> bool {
        self.decimal().exponent >= 0
    }

    fn decimal(&self) -> Decimal {
        Decimal::parse(&self.text)
    }
}

/// Equality and ordering are exact: `1.0 == 1` and `1e2 == 100`, but two
/// integers that round to the same float stay distinct.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text || self.decimal() == other.decimal()
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.decimal().cmp(&other.decimal())
    }
}

/// A number as `digits × 10^exponent`, with no leading or trailing zeros
/// in `digits`. Zero has empty digits, exponent 0 and no sign.
#[derive(Debug, PartialEq, Eq)]
struct Decimal {
    negative: bool,
    digits: String,
    exponent: i64,
}

impl Decimal {
    /// `text` must already match the JSON number grammar.
    fn parse(text: &str) -> Self {
        let (negative, rest) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (mantissa, exponent) = match rest.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => (mantissa, parse_exponent(exponent)),
            None => (rest, 0),
        };
        let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let all: String = int.chars().chain(frac.chars()).collect();
        let trimmed = all.trim_end_matches('0');
        let exponent = exponent
            .saturating_sub(frac.len() as i64)
            .saturating_add((all.len() - trimmed.len()) as i64);
        let digits = trimmed.trim_start_matches('0').to_string();
        if digits.is_empty() {
            return Decimal {
                negative: false,
                digits,
                exponent: 0,
            };
        }
        Decimal {
            negative,
            digits,
            exponent,
        }
    }

    fn signum(&self) -> i8 {
        match (self.digits.is_empty(), self.negative) {
            (true, _) => 0,
            (false, true) => -1,
            (false, false) => 1,
        }
    }

    /// Position of the leading digit.
    fn magnitude(&self) -> i64 {
        (self.digits.len() as i64).saturating_add(self.exponent)
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.signum().cmp(&other.signum()).then_with(|| {
            // Same leading position: digit strings compare like padded decimals.
            let magnitude = self
                .magnitude()
                .cmp(&other.magnitude())
                .then_with(|| self.digits.cmp(&other.digits));
            if self.negative {
                magnitude.reverse()
            } else {
                magnitude
            }
        })
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn parse_exponent(text: &str) -> i64 {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let value = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    if negative { -value } else { value }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number {
            text: value.to_string(),
        }
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number {
            text: value.to_string(),
        }
    }
}

impl Value {
    fn new(payload: Payload) -> Self {
        Value {
            payload,
            span: None,
        }
    }

    /// Create `null`.
    pub fn null() -> Self {
        Value::new(Payload::Null)
    }

    /// Create a boolean.
    pub fn bool(value: bool) -> Self {
        Value::new(Payload::Bool(value))
    }

    /// Create a number.
    pub fn number(value: impl Into<Number>) -> Self {
        Value::new(Payload::Number(value.into()))
    }

    /// Create a string.
    pub fn string(value: impl Into<String>) -> Self {
        Value::new(Payload::String(value.into()))
    }

    /// Create an array with items.
    pub fn array(items: Vec<Value>) -> Self {
        Value::new(Payload::Array(Array { items }))
    }

    /// Create an object from key/value pairs, in order.
    ///
    /// A repeated key replaces the earlier value in place.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let mut object = Object::default();
        for (key, value) in entries {
            object.insert(key, value);
        }
        Value::new(Payload::Object(object))
    }

    /// Attach a source span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// A deep copy with every span (key spans included) removed.
    pub fn without_spans(&self) -> Value {
        let payload = match &self.payload {
            Payload::Array(arr) => Payload::Array(Array {
                items: arr.iter().map(Value::without_spans).collect(),
            }),
            Payload::Object(obj) => Payload::Object(Object {
                entries: obj
                    .entries
                    .iter()
                    .map(|entry| Entry {
                        key: entry.key.clone(),
                        key_span: None,
                        value: entry.value.without_spans(),
                    })
                    .collect(),
            }),
            other => other.clone(),
        };
        Value::new(payload)
    }

    /// The runtime kind of this value.
    pub fn kind(&self) -> ValueKind {
        match &self.payload {
            Payload::Null => ValueKind::Null,
            Payload::Bool(_) => ValueKind::Boolean,
            Payload::Number(_) => ValueKind::Number,
            Payload::String(_) => ValueKind::String,
            Payload::Array(_) => ValueKind::Array,
            Payload::Object(_) => ValueKind::Object,
        }
    }

    /// Check if this is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self.payload, Payload::Null)
    }

    /// Get as boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self.payload {
            Payload::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Get as number.
    pub fn as_number(&self) -> Option<&Number> {
        match &self.payload {
            Payload::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Get as string.
    pub fn as_str(&self) -> Option<&str> {
        match &self.payload {
            Payload::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as array.
    pub fn as_array(&self) -> Option<&Array> {
        match &self.payload {
            Payload::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as object.
    pub fn as_object(&self) -> Option<&Object> {
        match &self.payload {
            Payload::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get as mutable object.
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match &mut self.payload {
            Payload::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get a value by path.
    ///
    /// Segments are separated by `/` or `.`; numeric segments index arrays.
    /// The empty path is the value itself.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.get_path(JsonPath::parse(path).segments())
    }

    /// Get a value by already split path.
    pub fn get_path(&self, path: &[PathSegment]) -> Option<&Value> {
        let Some((segment, rest)) = path.split_first() else {
            return Some(self);
        };
        let child = match (&self.payload, segment) {
            (Payload::Object(obj), PathSegment::Key(key)) => obj.get(key),
            (Payload::Object(obj), PathSegment::Index(index)) => obj.get(&index.to_string()),
            (Payload::Array(arr), PathSegment::Index(index)) => arr.get(*index),
            _ => None,
        }?;
        child.get_path(rest)
    }

    /// The span of the value at `path`, or of its nearest ancestor that has one.
    pub fn span_at(&self, path: &[PathSegment]) -> Option<Span> {
        let mut best = self.span;
        let mut current = self;
        for segment in path {
            let next = match (&current.payload, segment) {
                (Payload::Object(obj), PathSegment::Key(key)) => obj.get(key),
                (Payload::Object(obj), PathSegment::Index(index)) => obj.get(&index.to_string()),
                (Payload::Array(arr), PathSegment::Index(index)) => arr.get(*index),
                _ => None,
            };
            match next {
                Some(child) => {
                    current = child;
                    best = child.span.or(best);
                }
                None => break,
            }
        }
        best
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::string(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::string(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::number(value)
    }
}

impl Object {
    /// Get entry value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.value)
    }

    /// Get the entry for a key.
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Iterate over entries as (key, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|e| (e.key.as_str(), &e.value))
    }

    /// Iterate over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Check if key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or update an entry; an existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.insert_entry(Entry {
            key: key.into(),
            key_span: None,
            value,
        });
    }

    /// Insert or update a full entry; an existing key keeps its position.
    pub fn insert_entry(&mut self, entry: Entry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.key == entry.key) {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }
}

impl Array {
    /// Get item by index.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over items.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }
}
