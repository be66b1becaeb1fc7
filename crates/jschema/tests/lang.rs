//! The process-wide message language.
//!
//! Kept in its own test binary: changing the language affects every test
//! running in the same process.

use jschema::{ParseRequest, current_lang, get_errors, get_json_parser, parse_value, set_lang, validate};

#[test]
fn test_set_lang() {
    assert_eq!(current_lang(), "en");

    let schema = parse_value(r#"{"type": "string"}"#).unwrap();
    let value = parse_value("1").unwrap();
    let result = validate(&schema, &value);
    assert_eq!(get_errors(&result, "")[0].message, "Invalid type: expected string");

    set_lang("fr");
    assert_eq!(current_lang(), "fr");
    assert_eq!(get_errors(&result, "")[0].message, "Type invalide : string attendu");

    let parsed = get_json_parser(schema.clone()).parse(&ParseRequest::new("[1,]"));
    let messages: Vec<_> = parsed.markers.iter().map(|m| m.message()).collect();
    assert_eq!(messages, vec!["Virgule finale", "Type invalide : string attendu"]);
    assert_eq!(parsed.markers[0].get_message("en"), "Trailing comma");

    set_lang("xx");
    assert_eq!(get_errors(&result, "")[0].message, "Invalid type: expected string");
    set_lang("en");
}
