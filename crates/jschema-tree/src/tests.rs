use super::*;

#[test]
fn test_parse_simple() {
    let value = parse(r#"{"name": "Alice", "age": 30}"#).unwrap();
    assert_eq!(value.get("name").and_then(|v| v.as_str()), Some("Alice"));
    assert_eq!(
        value.get("age").and_then(|v| v.as_number()).map(|n| n.as_str()),
        Some("30")
    );
}

#[test]
fn test_parse_empty() {
    assert_eq!(parse(""), Err(BuildError::EmptyDocument));
    assert_eq!(parse("   "), Err(BuildError::EmptyDocument));
}

#[test]
fn test_parse_rejects_syntax_errors() {
    match parse("[1,]") {
        Err(BuildError::Syntax(error)) => {
            assert_eq!(error.kind, ParseErrorKind::TrailingComma);
            assert_eq!(error.span, Span::new(2, 3));
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn test_duplicate_key_is_not_fatal() {
    let value = parse(r#"{"a": 1, "a": 2}"#).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.len(), 1);
    assert_eq!(obj.get("a"), Some(&Value::number(2i64)));
}

#[test]
fn test_spans() {
    let source = r#"{"a": [true, "x"]}"#;
    let value = parse(source).unwrap();
    assert_eq!(value.span, Some(Span::new(0, 18)));

    let arr = value.get("a").unwrap();
    assert_eq!(arr.span.map(|s| s.slice(source)), Some(r#"[true, "x"]"#));

    let x = value.get("a.1").unwrap();
    assert_eq!(x.span.map(|s| s.slice(source)), Some(r#""x""#));

    let entry = value.as_object().unwrap().entry("a").unwrap();
    assert_eq!(entry.key_span, Some(Span::new(1, 4)));
}

#[test]
fn test_tolerant_recovers_partial_value() {
    let parsed = parse_tolerant(r#"{"a": 1, "b": tru, "c": [1, 2"#, Axiom::Value);
    let value = parsed.value.unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.get("a"), Some(&Value::number(1i64)));
    assert!(!obj.contains_key("b"));
    assert_eq!(
        obj.get("c"),
        Some(&Value::array(vec![Value::number(1i64), Value::number(2i64)]))
    );

    let kinds: Vec<_> = parsed.errors.iter().map(|e| e.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            ParseErrorKind::InvalidToken(jschema_parse::LexErrorKind::InvalidLiteral),
            ParseErrorKind::UnclosedArray,
            ParseErrorKind::UnclosedObject,
        ]
    );
}

#[test]
fn test_unclosed_span_runs_to_end() {
    let source = r#"{"a": 1"#;
    let parsed = parse_tolerant(source, Axiom::Value);
    assert_eq!(parsed.value.unwrap().span, Some(Span::new(0, 7)));
}

#[test]
fn test_stringify_round_trip() {
    let source = r#"{ "a" : [ 1.50, -0, 1e3 ], "b\n": { "c": null } }"#;
    let value = parse(source).unwrap();
    let text = stringify(&value);
    assert_eq!(text, r#"{"a":[1.50,-0,1e3],"b\n":{"c":null}}"#);
    assert_eq!(parse(&text).unwrap(), value);
}

#[test]
fn test_keyless_value_is_reported() {
    use jschema_parse::Event;

    let mut builder = TreeBuilder::new();
    builder.event(Event::ObjectStart {
        span: Span::new(0, 1),
    });
    builder.event(Event::Scalar {
        span: Span::new(2, 3),
        value: "1".into(),
        kind: ScalarKind::Number,
    });
    builder.event(Event::ObjectEnd {
        span: Span::new(4, 5),
    });

    let (value, errors) = builder.finish_tolerant();
    assert_eq!(value.unwrap().as_object().map(|o| o.len()), Some(0));
    assert_eq!(errors, vec![ParseError::new(ParseErrorKind::ExpectedKey, Span::new(2, 3))]);
}

#[test]
fn test_unparseable_number_is_reported() {
    use jschema_parse::{Event, LexErrorKind};

    let mut builder = TreeBuilder::new();
    builder.event(Event::Scalar {
        span: Span::new(0, 2),
        value: "1.".into(),
        kind: ScalarKind::Number,
    });

    match builder.finish() {
        Err(BuildError::Syntax(error)) => {
            assert_eq!(
                error.kind,
                ParseErrorKind::InvalidToken(LexErrorKind::InvalidNumber)
            );
            assert_eq!(error.span, Span::new(0, 2));
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}
