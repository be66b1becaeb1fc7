//! Checking values against a schema.

use jschema_tree::{JsonPath, Payload, Value, stringify};

use crate::format::FormatChecker;
use crate::message::Message;
use crate::result::{ValidationError, ValidationResult};
use crate::schema::{AdditionalProperties, SchemaNode};

/// Compute Levenshtein distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row = vec![0; b_len + 1];

    for (i, a_char) in a.chars().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b.chars().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}

/// The declared name closest to an unknown one, if any is close enough.
fn suggest_similar<'a>(unknown: &str, valid: &[&'a str]) -> Option<&'a str> {
    let unknown_lower = unknown.to_lowercase();
    valid
        .iter()
        .filter_map(|v| {
            let dist = levenshtein(&unknown_lower, &v.to_lowercase());
            // At most two edits, and fewer edits than the name has characters.
            if dist <= 2 && dist < unknown.chars().count().max(1) {
                Some((*v, dist))
            } else {
                None
            }
        })
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name)
}

/// Validates values against a schema.
///
/// Stateless apart from its configuration: one validator can check any
/// number of documents, from any number of threads.
#[derive(Default)]
pub struct Validator {
    format_checker: Option<Box<dyn FormatChecker>>,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("format_checker", &self.format_checker.is_some())
            .finish()
    }
}

impl Validator {
    /// A validator that records formats without enforcing them.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject strings that `checker` says do not match their `format`.
    pub fn with_format_checker(mut self, checker: Box<dyn FormatChecker>) -> Self {
        self.format_checker = Some(checker);
        self
    }

    /// Validate `value` against `schema`.
    pub fn validate<'a>(&self, schema: &'a Value, value: &'a Value) -> ValidationResult<'a> {
        let mut result = ValidationResult::new(schema, value);
        self.validate_node(
            &mut result,
            SchemaNode::new(schema),
            Some(value),
            &JsonPath::root(),
        );
        tracing::debug!(
            errors = result.errors.len(),
            renderers = result.renderers().len(),
            "validated document"
        );
        result
    }

    /// Validate one node; `value` is `None` for a declared property the
    /// object does not have, which is walked for metadata only.
    fn validate_node<'a>(
        &self,
        result: &mut ValidationResult<'a>,
        schema: SchemaNode<'a>,
        value: Option<&'a Value>,
        path: &JsonPath,
    ) {
        record_metadata(result, schema, path);
        let schema = match schema.resolve() {
            Ok(resolved) => resolved,
            Err(err) => {
                if value.is_some() {
                    self.error(
                        result,
                        path,
                        Message::UnresolvedRef {
                            reference: err.reference,
                        },
                    );
                }
                return;
            }
        };
        record_metadata(result, schema, path);

        let Some(value) = value else {
            self.walk_absent(result, schema, path, &mut Vec::new());
            return;
        };

        if let Some(types) = schema.types()
            && !types.iter().any(|ty| ty.matches(value))
        {
            tracing::trace!(%path, kind = %value.kind(), "type mismatch, not descending");
            let expected = types.iter().map(|ty| ty.as_str().to_string()).collect();
            self.error(result, path, Message::InvalidType { expected });
            // Missing required properties are reported even on a mismatch.
            self.validate_required(result, schema, value, path);
            return;
        }

        if let Some(expected) = schema.const_value()
            && value != expected
        {
            let expected = stringify(expected);
            self.error(result, path, Message::NotConst { expected });
        }

        if let Some(members) = schema.enum_values()
            && !members.contains(&value)
        {
            let allowed = members.iter().map(|m| stringify(m)).collect();
            self.error(result, path, Message::NotInEnum { allowed });
        }

        match &value.payload {
            Payload::String(s) => self.validate_string(result, schema, s, path),
            Payload::Number(_) => self.validate_number(result, schema, value, path),
            Payload::Array(arr) => {
                let count = arr.len() as u64;
                if let Some(min) = schema.min_items()
                    && count < min
                {
                    self.error(result, path, Message::TooFewItems { min });
                }
                if let Some(max) = schema.max_items()
                    && count > max
                {
                    self.error(result, path, Message::TooManyItems { max });
                }
                if let Some(items) = schema.items() {
                    for (index, item) in arr.iter().enumerate() {
                        self.validate_node(result, items, Some(item), &path.child(index));
                    }
                }
            }
            Payload::Object(_) => self.validate_object(result, schema, value, path),
            Payload::Null | Payload::Bool(_) => {}
        }
    }

    fn validate_string<'a>(
        &self,
        result: &mut ValidationResult<'a>,
        schema: SchemaNode<'a>,
        s: &str,
        path: &JsonPath,
    ) {
        let length = s.chars().count() as u64;
        if let Some(min) = schema.min_length()
            && length < min
        {
            self.error(result, path, Message::TooShort { min });
        }
        if let Some(max) = schema.max_length()
            && length > max
        {
            self.error(result, path, Message::TooLong { max });
        }
        if let (Some(checker), Some(format)) = (&self.format_checker, schema.format())
            && checker.check(format, s) == Some(false)
        {
            self.error(
                result,
                path,
                Message::InvalidFormat {
                    format: format.to_string(),
                },
            );
        }
    }

    fn validate_number<'a>(
        &self,
        result: &mut ValidationResult<'a>,
        schema: SchemaNode<'a>,
        value: &Value,
        path: &JsonPath,
    ) {
        let Some(n) = value.as_number() else {
            return;
        };
        if let Some(minimum) = schema.minimum()
            && n < minimum
        {
            let minimum = minimum.to_string();
            self.error(result, path, Message::TooSmall { minimum });
        }
        if let Some(maximum) = schema.maximum()
            && n > maximum
        {
            let maximum = maximum.to_string();
            self.error(result, path, Message::TooLarge { maximum });
        }
    }

    fn validate_object<'a>(
        &self,
        result: &mut ValidationResult<'a>,
        schema: SchemaNode<'a>,
        value: &'a Value,
        path: &JsonPath,
    ) {
        let Some(obj) = value.as_object() else {
            return;
        };

        self.validate_required(result, schema, value, path);

        let declared: Vec<&str> = schema.properties().map(|(name, _)| name).collect();
        for (name, child) in schema.properties() {
            self.validate_node(result, child, obj.get(name), &path.child(name));
        }

        let additional = schema.additional_properties();
        for (key, item) in obj.iter() {
            if declared.contains(&key) {
                continue;
            }
            match additional {
                AdditionalProperties::Allowed => {}
                AdditionalProperties::Forbidden => {
                    let suggestion = suggest_similar(key, &declared).map(str::to_string);
                    self.error(
                        result,
                        &path.child(key),
                        Message::UnknownProperty {
                            property: key.to_string(),
                            suggestion,
                        },
                    );
                }
                AdditionalProperties::Schema(extra) => {
                    self.validate_node(result, extra, Some(item), &path.child(key));
                }
            }
        }
    }

    /// Report each `required` property an object value lacks. Non-objects
    /// have nothing to report.
    fn validate_required<'a>(
        &self,
        result: &mut ValidationResult<'a>,
        schema: SchemaNode<'a>,
        value: &'a Value,
        path: &JsonPath,
    ) {
        let Some(obj) = value.as_object() else {
            return;
        };
        for name in schema.required() {
            if !obj.contains_key(name) {
                self.error(
                    result,
                    path,
                    Message::MissingRequired {
                        property: name.to_string(),
                    },
                );
            }
        }
    }

    /// Collect renderers and formats under a property that is not there.
    ///
    /// `seen` holds the schema nodes on the current chain, so that a
    /// recursive schema is walked once.
    fn walk_absent<'a>(
        &self,
        result: &mut ValidationResult<'a>,
        schema: SchemaNode<'a>,
        path: &JsonPath,
        seen: &mut Vec<*const Value>,
    ) {
        let id: *const Value = schema.value();
        if seen.contains(&id) {
            return;
        }
        seen.push(id);
        for (name, child) in schema.properties() {
            let child_path = path.child(name);
            record_metadata(result, child, &child_path);
            if let Ok(child) = child.resolve() {
                record_metadata(result, child, &child_path);
                self.walk_absent(result, child, &child_path, seen);
            }
        }
        seen.pop();
    }

    fn error(&self, result: &mut ValidationResult<'_>, path: &JsonPath, message: Message) {
        let span = result.value.span_at(path.segments());
        result.error(ValidationError::new(path.clone(), message).with_span(span));
    }
}

fn record_metadata<'a>(result: &mut ValidationResult<'a>, schema: SchemaNode<'a>, path: &JsonPath) {
    if let Some(renderer) = schema.renderer() {
        result.record_renderer(path, renderer);
    }
    if let Some(format) = schema.format() {
        result.record_format(path, format);
    }
}

/// Validate `value` against `schema` with a default [`Validator`].
pub fn validate<'a>(schema: &'a Value, value: &'a Value) -> ValidationResult<'a> {
    Validator::new().validate(schema, value)
}
