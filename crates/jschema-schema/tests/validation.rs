//! Validation tests for jschema-schema.

use jschema_schema::{BuiltinFormats, Message, Validator, validate};
use jschema_tree::{Span, Value, parse, stringify};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Helper to parse a schema or document.
fn doc(source: &str) -> Value {
    parse(source).expect("document should parse")
}

fn messages(result: &jschema_schema::ValidationResult<'_>) -> Vec<(String, String)> {
    result
        .errors
        .iter()
        .map(|e| (e.path.to_string(), e.message_in("en")))
        .collect()
}

#[test]
fn test_type_mismatch() {
    let schema = doc(r#"{"type": "string"}"#);
    let value = doc("123");
    let result = validate(&schema, &value);

    let errors = result.get_errors("");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path.to_string(), "");
    assert_eq!(errors[0].message_in("en"), "Invalid type: expected string");
    assert_eq!(errors[0].span, Some(Span::new(0, 3)));
}

#[test]
fn test_type_match() {
    let schema = doc(r#"{"type": "string"}"#);
    let value = doc(r#""toto""#);
    let result = validate(&schema, &value);
    assert!(result.is_valid(), "errors: {:?}", result.errors);
}

#[test]
fn test_type_union_message() {
    let schema = doc(r#"{"type": ["string", "null"]}"#);
    let value = doc("1");
    let result = validate(&schema, &value);
    assert_eq!(
        messages(&result),
        vec![(
            String::new(),
            "Invalid type: expected string or null".to_string()
        )]
    );
}

#[test]
fn test_error_at_nearest_failing_node() {
    init_tracing();
    let schema = doc(
        r#"{
            "type": "object",
            "properties": {
                "server": {
                    "type": "object",
                    "properties": {"ports": {"type": "array", "items": {"type": "integer"}}}
                }
            }
        }"#,
    );
    let source = r#"{"server": {"ports": [80, "x", 8.5]}}"#;
    let value = doc(source);
    let result = validate(&schema, &value);

    assert_eq!(
        messages(&result),
        vec![
            (
                "server.ports.1".to_string(),
                "Invalid type: expected integer".to_string()
            ),
            (
                "server.ports.2".to_string(),
                "Invalid type: expected integer".to_string()
            ),
        ]
    );
    assert_eq!(result.errors[0].span.map(|s| s.slice(source)), Some(r#""x""#));
}

#[test]
fn test_type_mismatch_short_circuits() {
    let schema = doc(
        r#"{"type": "object", "required": ["a"], "properties": {"a": {"renderer": "R"}}}"#,
    );
    let value = doc("[]");
    let result = validate(&schema, &value);
    assert_eq!(result.errors.len(), 1);
    assert!(result.renderers().is_empty());
}

#[test]
fn test_missing_required_at_object_path() {
    let schema = doc(
        r#"{"properties": {"user": {"type": "object", "required": ["name", "age"]}}}"#,
    );
    let value = doc(r#"{"user": {"age": 3}}"#);
    let result = validate(&schema, &value);
    assert_eq!(
        messages(&result),
        vec![(
            "user".to_string(),
            "Missing required property: name".to_string()
        )]
    );
}

#[test]
fn test_missing_required_despite_type_mismatch() {
    let schema = doc(r#"{"type": "string", "required": ["a"]}"#);
    let value = doc("{}");
    let result = validate(&schema, &value);
    assert_eq!(
        messages(&result),
        vec![
            (String::new(), "Invalid type: expected string".to_string()),
            (String::new(), "Missing required property: a".to_string()),
        ]
    );
}

#[test]
fn test_numbers_compare_exactly() {
    let schema = doc(r#"{"const": 9007199254740993}"#);
    assert!(!validate(&schema, &doc("9007199254740992")).is_valid());
    assert!(validate(&schema, &doc("9007199254740993")).is_valid());
    assert!(validate(&schema, &doc("9007199254740993.0")).is_valid());

    let schema = doc(r#"{"enum": [1e400]}"#);
    assert!(!validate(&schema, &doc("2e400")).is_valid());
    assert!(validate(&schema, &doc("10e399")).is_valid());

    let schema = doc(r#"{"maximum": 9007199254740992}"#);
    let value = doc("9007199254740993");
    let result = validate(&schema, &value);
    assert_eq!(
        messages(&result),
        vec![(
            String::new(),
            "Number too large: maximum is 9007199254740992".to_string()
        )]
    );
}

#[test]
fn test_get_errors_filters_by_prefix() {
    let schema = doc(
        r#"{"properties": {
            "a": {"properties": {"x": {"type": "string"}}},
            "ab": {"type": "string"}
        }}"#,
    );
    let value = doc(r#"{"a": {"x": 1}, "ab": 2}"#);
    let result = validate(&schema, &value);

    assert_eq!(result.get_errors("").len(), 2);
    let under_a: Vec<_> = result
        .get_errors("a")
        .iter()
        .map(|e| e.path.to_string())
        .collect();
    assert_eq!(under_a, vec!["a.x"]);
    assert_eq!(result.get_errors("/a/x").len(), 1);
    assert!(result.get_errors("b").is_empty());
}

#[test]
fn test_unknown_property_with_suggestion() {
    let schema = doc(r#"{"properties": {"name": {}}, "additionalProperties": false}"#);
    let value = doc(r#"{"nmae": "x"}"#);
    let result = validate(&schema, &value);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path.to_string(), "nmae");
    assert_eq!(
        result.errors[0].message,
        Message::UnknownProperty {
            property: "nmae".into(),
            suggestion: Some("name".into()),
        }
    );
}

#[test]
fn test_additional_properties_schema() {
    let schema = doc(r#"{"additionalProperties": {"type": "number"}}"#);
    let value = doc(r#"{"a": 1, "b": "two"}"#);
    let result = validate(&schema, &value);
    assert_eq!(
        messages(&result),
        vec![("b".to_string(), "Invalid type: expected number".to_string())]
    );
}

#[test]
fn test_constraints() {
    let schema = doc(
        r#"{"properties": {
            "name": {"type": "string", "minLength": 2, "maxLength": 4},
            "age": {"type": "integer", "minimum": 0, "maximum": 150},
            "tags": {"type": "array", "minItems": 1, "maxItems": 2},
            "mode": {"enum": ["fast", "slow"]},
            "kind": {"const": "user"}
        }}"#,
    );
    let value = doc(r#"{"name": "a", "age": 200, "tags": [], "mode": "medium", "kind": "admin"}"#);
    let result = validate(&schema, &value);
    assert_eq!(
        messages(&result),
        vec![
            (
                "name".to_string(),
                "String too short: minimum length is 2".to_string()
            ),
            ("age".to_string(), "Number too large: maximum is 150".to_string()),
            ("tags".to_string(), "Too few items: minimum is 1".to_string()),
            (
                "mode".to_string(),
                r#"Value not allowed: expected one of "fast", "slow""#.to_string()
            ),
            ("kind".to_string(), r#"Invalid value: expected "user""#.to_string()),
        ]
    );
}

#[test]
fn test_refs() {
    init_tracing();
    let schema = doc(
        r##"{
            "definitions": {"port": {"type": "integer", "renderer": "port-picker"}},
            "properties": {"http": {"$ref": "#/definitions/port"}, "bad": {"$ref": "#/definitions/nope"}}
        }"##,
    );
    let value = doc(r#"{"http": "eighty", "bad": 1}"#);
    let result = validate(&schema, &value);
    assert_eq!(
        messages(&result),
        vec![
            ("http".to_string(), "Invalid type: expected integer".to_string()),
            (
                "bad".to_string(),
                "Unresolved schema reference: #/definitions/nope".to_string()
            ),
        ]
    );
    assert_eq!(result.renderer("http").map(|r| r.key), Some("port-picker"));
}

#[test]
fn test_renderer_string_form() {
    let schema = doc(r#"{"renderer": "X"}"#);
    let value = doc("{}");
    let result = validate(&schema, &value);

    assert_eq!(result.renderers().len(), 1);
    let renderer = result.renderer("").unwrap();
    assert_eq!(renderer.key, "X");
    assert!(std::ptr::eq(renderer.schema_value, &schema));
    assert!(result.renderer("foo").is_none());
}

#[test]
fn test_renderer_object_form() {
    let schema = doc(r#"{"renderer": {"key": "X", "foo": 123}}"#);
    let value = doc("{}");
    let result = validate(&schema, &value);

    assert_eq!(result.renderers().len(), 1);
    let renderer = result.renderer("").unwrap();
    assert_eq!(renderer.key, "X");
    assert!(std::ptr::eq(renderer.schema_value, &schema));
    assert_eq!(
        renderer.metadata().collect::<Vec<_>>(),
        vec![("foo", &Value::number(123i64))]
    );
    assert!(result.renderer("foo").is_none());
}

#[test]
fn test_metadata_under_absent_properties() {
    let schema = doc(
        r#"{"properties": {
            "when": {"type": "string", "format": "date"},
            "contact": {"properties": {"mail": {"format": "email", "renderer": "mail"}}}
        }}"#,
    );
    let value = doc("{}");
    let result = validate(&schema, &value);

    assert!(result.is_valid());
    assert_eq!(result.formats("when"), &["date"]);
    assert_eq!(result.formats("contact.mail"), &["email"]);
    assert_eq!(result.renderer("contact/mail").map(|r| r.key), Some("mail"));
    assert!(result.formats("contact").is_empty());
}

#[test]
fn test_formats_are_advisory_by_default() {
    let schema = doc(r#"{"type": "string", "format": "date"}"#);
    let value = doc(r#""not a date""#);
    assert!(validate(&schema, &value).is_valid());

    let validator = Validator::new().with_format_checker(Box::new(BuiltinFormats));
    let result = validator.validate(&schema, &value);
    assert_eq!(
        messages(&result),
        vec![(String::new(), "Invalid format: expected date".to_string())]
    );
}

#[test]
fn test_idempotent_and_identity() {
    let schema = doc(r#"{"properties": {"a": {"type": "string", "renderer": "R"}}}"#);
    let value = doc(r#"{"a": 1}"#);
    let schema_text = stringify(&schema);
    let value_text = stringify(&value);

    let first = validate(&schema, &value);
    let second = validate(&schema, &value);
    assert_eq!(first, second);
    assert!(std::ptr::eq(first.schema, &schema));
    assert!(std::ptr::eq(first.value, &value));
    assert_eq!(stringify(&schema), schema_text);
    assert_eq!(stringify(&value), value_text);
}

#[test]
fn test_propose_leaf() {
    let schema = doc(r#"{"type": "string"}"#);
    let value = doc(r#""foo""#);
    let result = validate(&schema, &value);
    assert_eq!(result.propose("", -1), vec![Value::string("")]);
}

#[test]
fn test_propose_depth_bound() {
    init_tracing();
    let schema = doc(r#"{"properties": {"foo": {"type": "string"}, "bar": {"type": "number"}}}"#);
    let value = doc("{}");
    let result = validate(&schema, &value);

    let shallow = result.propose("", -1);
    assert_eq!(shallow.len(), 1);
    assert_eq!(stringify(&shallow[0]), r#"{"foo":null,"bar":null}"#);

    let deep = result.propose("", 2);
    assert_eq!(deep.len(), 1);
    assert_eq!(stringify(&deep[0]), r#"{"foo":"","bar":0}"#);
}

#[test]
fn test_propose_nested_path() {
    let schema = doc(
        r#"{"properties": {"items": {"type": "array", "items": {"properties": {"id": {"type": "integer"}}}}}}"#,
    );
    let value = doc(r#"{"items": []}"#);
    let result = validate(&schema, &value);

    assert_eq!(
        result.propose("items.0", 1).iter().map(stringify).collect::<Vec<_>>(),
        vec![r#"{"id":0}"#]
    );
    assert!(result.propose("nothing", 1).is_empty());
}

#[test]
fn test_render_report() {
    let schema = doc(r#"{"properties": {"port": {"type": "integer"}}}"#);
    let source = r#"{"port": "http"}"#;
    let value = doc(source);
    let result = validate(&schema, &value);

    let rendered = result.render("config.json", source);
    let plain = String::from_utf8(strip_ansi_escapes::strip(rendered)).unwrap();
    assert!(plain.contains("Invalid type: expected integer"), "{plain}");
    assert!(plain.contains("config.json"), "{plain}");
    assert!(plain.contains("at 'port'"), "{plain}");
}
