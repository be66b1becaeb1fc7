//! Serializing then parsing any value gives back an equal value.

use jschema_tree::{FormatOptions, Number, Value, parse, stringify, stringify_with_options};
use proptest::prelude::*;

fn number() -> impl Strategy<Value = Number> {
    prop_oneof![
        any::<i64>().prop_map(Number::from),
        any::<f64>().prop_filter_map("finite", Number::from_f64),
        "-?(0|[1-9][0-9]{0,30})(\\.[0-9]{1,10})?([eE][+-]?[0-9]{1,3})?"
            .prop_filter_map("valid number", |text| Number::parse(&text)),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::null()),
        any::<bool>().prop_map(Value::bool),
        number().prop_map(|n| Value::number(n)),
        any::<String>().prop_map(|s| Value::string(s)),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::array),
            prop::collection::vec((any::<String>(), inner), 0..8)
                .prop_map(|entries| Value::object(entries)),
        ]
    })
}

proptest! {
    #[test]
    fn compact_round_trip(v in value()) {
        let text = stringify(&v);
        let back = parse(&text).map_err(|e| TestCaseError::fail(format!("{e}: {text}")))?;
        prop_assert_eq!(back, v);
    }

    #[test]
    fn pretty_round_trip(v in value()) {
        let text = stringify_with_options(&v, &FormatOptions::new().pretty());
        let back = parse(&text).map_err(|e| TestCaseError::fail(format!("{e}: {text}")))?;
        prop_assert_eq!(back, v);
    }
}
