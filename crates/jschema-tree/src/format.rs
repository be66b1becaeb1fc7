//! Serializing values back to JSON text.

use std::borrow::Cow;

use crate::value::{Payload, Value};

/// Options for JSON serialization.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Indentation for nested lines; `None` writes everything on one line
    /// with no whitespace (default).
    pub indent: Option<&'static str>,
}

impl FormatOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single line, no whitespace.
    pub fn compact(mut self) -> Self {
        self.indent = None;
        self
    }

    /// One entry per line, indented by two spaces.
    pub fn pretty(mut self) -> Self {
        self.indent = Some("  ");
        self
    }

    /// Set a custom indentation string (implies pretty output).
    pub fn indent(mut self, indent: &'static str) -> Self {
        self.indent = Some(indent);
        self
    }
}

/// Serialize a value as compact JSON.
pub fn stringify(value: &Value) -> String {
    stringify_with_options(value, &FormatOptions::default())
}

/// Serialize a value with the given options.
pub fn stringify_with_options(value: &Value, options: &FormatOptions) -> String {
    let mut writer = JsonWriter {
        out: String::new(),
        options,
    };
    writer.write_value(value, 0);
    writer.out
}

struct JsonWriter<'a> {
    out: String,
    options: &'a FormatOptions,
}

impl JsonWriter<'_> {
    fn write_value(&mut self, value: &Value, depth: usize) {
        match &value.payload {
            Payload::Null => self.out.push_str("null"),
            Payload::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Payload::Number(n) => self.out.push_str(n.as_str()),
            Payload::String(s) => self.write_string(s),
            Payload::Array(arr) => {
                if arr.is_empty() {
                    self.out.push_str("[]");
                    return;
                }
                self.out.push('[');
                for (i, item) in arr.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.newline(depth + 1);
                    self.write_value(item, depth + 1);
                }
                self.newline(depth);
                self.out.push(']');
            }
            Payload::Object(obj) => {
                if obj.is_empty() {
                    self.out.push_str("{}");
                    return;
                }
                self.out.push('{');
                for (i, (key, item)) in obj.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.newline(depth + 1);
                    self.write_string(key);
                    self.out.push(':');
                    if self.options.indent.is_some() {
                        self.out.push(' ');
                    }
                    self.write_value(item, depth + 1);
                }
                self.newline(depth);
                self.out.push('}');
            }
        }
    }

    fn newline(&mut self, depth: usize) {
        if let Some(indent) = self.options.indent {
            self.out.push('\n');
            for _ in 0..depth {
                self.out.push_str(indent);
            }
        }
    }

    fn write_string(&mut self, s: &str) {
        self.out.push('"');
        self.out.push_str(&escape_string(s));
        self.out.push('"');
    }
}

/// Escape a string for use between double quotes.
pub fn escape_string(s: &str) -> Cow<'_, str> {
    // Check if any escapes needed
    if !s.chars().any(|c| matches!(c, '"' | '\\') || c.is_control()) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\u{8}' => result.push_str("\\b"),
            '\u{c}' => result.push_str("\\f"),
            c if c.is_control() => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    result.push_str(&format!("\\u{unit:04x}"));
                }
            }
            c => result.push(c),
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        Value::object([
            ("name", Value::string("Alice")),
            (
                "tags",
                Value::array(vec![Value::string("a"), Value::bool(true), Value::null()]),
            ),
            ("empty", Value::object(Vec::<(String, Value)>::new())),
            ("age", Value::number(30i64)),
        ])
    }

    #[test]
    fn test_compact() {
        assert_eq!(
            stringify(&sample()),
            r#"{"name":"Alice","tags":["a",true,null],"empty":{},"age":30}"#
        );
    }

    #[test]
    fn test_pretty() {
        let text = stringify_with_options(&sample(), &FormatOptions::new().pretty());
        insta::assert_snapshot!(text, @r#"
        {
          "name": "Alice",
          "tags": [
            "a",
            true,
            null
          ],
          "empty": {},
          "age": 30
        }
        "#);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(escape_string("plain"), "plain");
        assert_eq!(escape_string("a\"b\\c\nd"), r#"a\"b\\c\nd"#);
        assert_eq!(escape_string("\u{1}"), r"\u0001");
        assert_eq!(stringify(&Value::string("tab\there")), r#""tab\there""#);
    }
}
