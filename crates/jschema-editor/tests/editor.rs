//! Parsing and completion through a schema-bound parser.

use jschema_editor::{
    JsonParser, Marker, ParseRequest, ParserOptions, PredictRequest, Severity,
};
use jschema_tree::{Span, Value, parse};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

fn parser(schema: &str) -> JsonParser {
    init_tracing();
    JsonParser::new(parse(schema).expect("schema should parse"))
        .with_options(ParserOptions::new().lang("en"))
}

fn summary(markers: &[Marker]) -> Vec<(u32, u32, Severity, String)> {
    markers
        .iter()
        .map(|m| (m.offset, m.length, m.severity, m.message()))
        .collect()
}

fn proposals(parser: &JsonParser, text: &str, offset: usize) -> Vec<(String, Option<Span>)> {
    let result = parser.predict(&PredictRequest::new(text, offset));
    assert!(result.success, "{:?}", result.error);
    result
        .proposals
        .into_iter()
        .map(|p| (p.text, p.replace))
        .collect()
}

fn texts(parser: &JsonParser, text: &str, offset: usize) -> Vec<String> {
    proposals(parser, text, offset)
        .into_iter()
        .map(|(text, _)| text)
        .collect()
}

// ============================================================================
// parse
// ============================================================================

#[test]
fn test_parse_baseline() {
    let result = parser("{}").parse(&ParseRequest::new("{}"));
    assert!(result.success);
    assert_eq!(result.error, None);
    assert!(result.markers.is_empty());
    assert!(result.styles.is_empty());
}

#[test]
fn test_validation_surfaces_as_marker() {
    let result = parser(r#"{"type": "string"}"#).parse(&ParseRequest::new("true"));
    assert!(result.success);
    assert_eq!(result.markers.len(), 1);
    let marker = &result.markers[0];
    assert_eq!((marker.offset, marker.length), (0, 4));
    assert_eq!(marker.severity.as_str(), "error");
    assert_eq!(marker.get_message("en"), "Invalid type: expected string");
    assert_eq!(marker.get_message("fr"), "Type invalide : string attendu");
}

#[test]
fn test_empty_input_fails() {
    let result = parser("{}").parse(&ParseRequest::new("  "));
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Empty document"));
    assert!(result.markers.is_empty());
}

#[test]
fn test_syntax_errors_do_not_stop_validation() {
    let source = r#"{"a": tru, "b": 1,}"#;
    let result = parser(r#"{"properties": {"b": {"type": "string"}}}"#)
        .parse(&ParseRequest::new(source));
    assert!(result.success);
    assert_eq!(
        summary(&result.markers),
        vec![
            (6, 3, Severity::Error, "Invalid literal".to_string()),
            (17, 1, Severity::Error, "Trailing comma".to_string()),
            (
                16,
                1,
                Severity::Error,
                "Invalid type: expected string".to_string()
            ),
        ]
    );
}

#[test]
fn test_unparseable_value_marks_whole_document() {
    let result = parser(r#"{"type": "string"}"#).parse(&ParseRequest::new("tru"));
    assert!(result.success);
    assert_eq!(
        summary(&result.markers),
        vec![
            (0, 3, Severity::Error, "Invalid literal".to_string()),
            (
                0,
                3,
                Severity::Error,
                "Invalid type: expected string".to_string()
            ),
        ]
    );
}

#[test]
fn test_missing_required_marks_object() {
    let source = r#"{"a": 1}"#;
    let result =
        parser(r#"{"required": ["name"]}"#).parse(&ParseRequest::new(source));
    assert_eq!(
        summary(&result.markers),
        vec![(
            0,
            8,
            Severity::Error,
            "Missing required property: name".to_string()
        )]
    );
}

#[test]
fn test_duplicate_key_warning() {
    let result = parser("{}").parse(&ParseRequest::new(r#"{"a": 1, "a": 2}"#));
    assert!(result.success);
    assert_eq!(result.markers.len(), 1);
    assert_eq!(result.markers[0].severity, Severity::Warning);
    assert_eq!(result.markers[0].span(), Span::new(9, 12));
}

#[test]
fn test_axiom() {
    let p = parser("{}");
    let result = p.parse(&ParseRequest::new("[1]").with_axiom("object"));
    assert!(result.success);
    assert!(
        result
            .markers
            .iter()
            .any(|m| m.message() == "Object expected" && m.offset == 0)
    );

    let result = p.parse(&ParseRequest::new("{}").with_axiom("object"));
    assert!(result.markers.is_empty());

    let result = p.parse(&ParseRequest::new("{}").with_axiom("document"));
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("unknown axiom 'document'"));
}

#[test]
fn test_styles_follow_tokens() {
    let result = parser("{}").parse(&ParseRequest::new(r#"{"a": [1, true, "x"]}"#));
    let names: Vec<_> = result.styles.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["property", "number", "keyword", "string"]);
}

// ============================================================================
// predict
// ============================================================================

const FOO_SCHEMA: &str = r#"{"type": "object", "properties": {"foo": {"type": "string"}}}"#;

#[test]
fn test_predict_in_empty_object() {
    let p = parser(FOO_SCHEMA);
    assert_eq!(
        proposals(&p, "{}", 1),
        vec![
            ("}".to_string(), None),
            (r#""foo""#.to_string(), None),
            (r#""""#.to_string(), None),
        ]
    );
}

#[test]
fn test_predict_skips_present_keys() {
    let p = parser(
        r#"{"properties": {"foo": {"type": "string"}, "bar": {"type": "number"}}}"#,
    );
    assert_eq!(texts(&p, r#"{"foo": "x", }"#, 13), vec![r#""bar""#, r#""""#]);
}

#[test]
fn test_predict_no_close_brace_after_comma() {
    let p = parser(FOO_SCHEMA);
    assert_eq!(texts(&p, r#"{"a": 1,"#, 8), vec![r#""foo""#, r#""""#]);
    assert_eq!(texts(&p, "{\"a\": 1,\n  ", 11), vec![r#""foo""#, r#""""#]);
}

#[test]
fn test_predict_partial_key_replaces_token() {
    let p = parser(FOO_SCHEMA);
    assert_eq!(
        proposals(&p, r#"{"fo"#, 4),
        vec![(r#""foo""#.to_string(), Some(Span::new(1, 4)))]
    );
}

#[test]
fn test_predict_key_under_cursor_is_not_present() {
    let p = parser(FOO_SCHEMA);
    assert_eq!(
        proposals(&p, r#"{"foo": "x"}"#, 3),
        vec![(r#""foo""#.to_string(), Some(Span::new(1, 6)))]
    );
}

#[test]
fn test_predict_value_position() {
    let p = parser(FOO_SCHEMA);
    assert_eq!(texts(&p, r#"{"foo": }"#, 8), vec![r#""""#]);
}

#[test]
fn test_predict_after_key_and_value() {
    let p = parser(FOO_SCHEMA);
    assert_eq!(texts(&p, r#"{"foo" }"#, 6), vec![":"]);
    assert_eq!(texts(&p, r#"{"foo": "" }"#, 10), vec![",", "}"]);
}

#[test]
fn test_predict_in_array() {
    let p = parser(r#"{"type": "array", "items": {"type": "boolean"}}"#);
    assert_eq!(texts(&p, "[", 1), vec!["]", "false", "true"]);
    assert_eq!(texts(&p, "[true ", 6), vec![",", "]"]);
    assert_eq!(
        proposals(&p, "[tr", 3),
        vec![("true".to_string(), Some(Span::new(1, 3)))]
    );
}

#[test]
fn test_predict_root_value_with_depth() {
    let schema = r#"{"properties": {"foo": {"type": "string"}, "bar": {"type": "number"}}}"#;
    let p = parser(schema);
    assert_eq!(texts(&p, "", 0), vec![r#"{"foo":null,"bar":null}"#]);

    let p = JsonParser::new(parse(schema).unwrap())
        .with_options(ParserOptions::new().proposal_depth(2));
    assert_eq!(texts(&p, "", 0), vec![r#"{"foo":"","bar":0}"#]);
}

#[test]
fn test_predict_unknown_path_offers_grammar_only() {
    let p = parser(FOO_SCHEMA);
    assert_eq!(texts(&p, r#"{"other": {}"#, 11), vec!["}", r#""""#]);
}

#[test]
fn test_predict_request_errors() {
    let p = parser("{}");
    let result = p.predict(&PredictRequest::new("{}", 3));
    assert!(!result.success);
    assert!(result.proposals.is_empty());
    assert!(result.error.is_some());

    let result = p.predict(&PredictRequest::new("\"é\"", 2));
    assert!(!result.success);
}

#[test]
fn test_parser_keeps_schema() {
    let schema = parse(r#"{"type": "null"}"#).unwrap();
    let p = JsonParser::new(schema.clone());
    assert_eq!(p.schema(), &schema);
    assert_eq!(p.schema(), &Value::object([("type", Value::string("null"))]));
}
