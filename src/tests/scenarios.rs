//! End-to-end behavior on the headline cases.

use super::*;

#[test]
fn valid_input_is_untouched() {
    let s = r#"{"a": 1, "b": 2}"#;
    assert_eq!(repaired(s), r#"{"a": 1, "b": 2}"#);
    let (out, log) = crate::repair_with_log(s, &opts()).unwrap();
    assert_eq!(out, r#"{"a": 1, "b": 2}"#);
    assert!(log.is_empty());
}

#[test]
fn missing_closing_brace() {
    let (out, log) = crate::repair_with_log(r#"{"a": 1, "b": 2"#, &opts()).unwrap();
    assert_eq!(out, r#"{"a": 1, "b": 2}"#);
    assert_eq!(log.len(), 1);
    assert!(log[0].message.contains("closing }"));
}

#[test]
fn single_quotes_and_trailing_comma() {
    let s = r#"{'a': "x", "b": 'y',}"#;
    assert_eq!(repaired(s), r#"{"a": "x", "b": "y"}"#);
}

#[test]
fn prose_around_the_payload() {
    let s = r#"Here is your json: {"k": "v"} thanks!"#;
    assert_eq!(repaired(s), r#"{"k": "v"}"#);
}

#[test]
fn fenced_array_with_trailing_comma() {
    let s = "```json\n[1, 2, 3,]\n```";
    assert_eq!(repaired(s), "[1, 2, 3]");
}

#[test]
fn multiple_top_level_values() {
    let s = r#"{"a": 1}{"b": 2}"#;
    assert_eq!(repaired(s), r#"[{"a": 1}, {"b": 2}]"#);

    let stable = Options {
        stream_stable: true,
        ..Options::default()
    };
    assert_eq!(crate::repair(s, &stable).unwrap(), r#"{"a": 1}"#);
}

#[test]
fn identity_on_valid_input() {
    let cases = [
        r#"null"#,
        r#"true"#,
        r#"42"#,
        r#"-1.5"#,
        r#""hello""#,
        r#"[1, "two", null, false]"#,
        r#"{"nested": {"deep": [1, 2, {"x": "y"}]}}"#,
    ];
    for s in cases {
        let expected = Value::from(serde_json::from_str::<serde_json::Value>(s).unwrap());
        assert_eq!(crate::repair_to_value(s, &opts()).unwrap(), expected);
        // the repair engine itself agrees with the conformant decoder
        assert_eq!(crate::repair_to_value(s, &skip_opts()).unwrap(), expected);
    }
}

#[test]
fn idempotence() {
    let cases = [
        r#"{'a': 1, b: "x"}"#,
        r#"{"a": 1, "b": 2"#,
        "```json\n{\"k\": [1, 2,]}\n```",
        r#"Sure! {"answer": "42"} Let me know if you need more."#,
        r#"[1 2 3]"#,
        r#"{"key": "lorem "ipsum" sic"}"#,
    ];
    for s in cases {
        let once = repaired(s);
        assert_eq!(repaired(&once), once, "not idempotent for {:?}", s);
    }
}

#[test]
fn pathological_nesting_is_bounded() {
    let deep: String = std::iter::repeat('[').take(2000).collect();
    let v = crate::repair_to_value(&deep, &opts()).unwrap();
    let mut depth = 0usize;
    let mut cursor = &v;
    while let Value::Array(items) = cursor {
        depth += 1;
        match items.first() {
            Some(inner) => cursor = inner,
            None => break,
        }
    }
    assert!(depth <= Options::default().max_depth);
}

#[test]
fn empty_input_yields_empty_result() {
    assert_eq!(repaired(""), r#""""#);
    assert_eq!(repaired("   "), r#""""#);
    assert_eq!(repaired("\n"), r#""""#);
}
