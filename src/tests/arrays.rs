use super::*;

#[test]
fn plain_arrays() {
    assert_eq!(repaired("[]"), "[]");
    assert_eq!(repaired("[1, 2, 3, 4]"), "[1, 2, 3, 4]");
    assert_eq!(repaired("["), "[]");
    assert_eq!(repaired(r#"[""#), "[]");
    assert_eq!(repaired("]"), r#""""#);
}

#[test]
fn unclosed_arrays() {
    assert_eq!(repaired("[1, 2, 3,"), "[1, 2, 3]");
    assert_eq!(repaired("[[1\n\n]"), "[[1]]");
    assert_eq!(
        as_json(r#"{"employees":["John", "Anna","#),
        serde_json::json!({"employees": ["John", "Anna"]})
    );
    assert_eq!(
        as_json(r#"{"key1": {"key2": [1, 2, 3"#),
        serde_json::json!({"key1": {"key2": [1, 2, 3]}})
    );
}

#[test]
fn missing_commas_between_elements() {
    assert_eq!(repaired("[1 2 3]"), "[1, 2, 3]");
    assert_eq!(as_json(r#"["a" "b" "c" 1"#), serde_json::json!(["a", "b", "c", 1]));
    assert_eq!(
        as_json(r#"{"key": ["value" "value1" "value2"]}"#),
        serde_json::json!({"key": ["value", "value1", "value2"]})
    );
}

#[test]
fn ellipsis_elements_are_dropped() {
    assert_eq!(repaired("[1, 2, 3, ...]"), "[1, 2, 3]");
    assert_eq!(repaired("[1, 2, ... , 3]"), "[1, 2, 3]");
    assert_eq!(repaired("[true, false, null, ...]"), "[true, false, null]");
    // a quoted ellipsis is an honest string
    assert_eq!(repaired("[1, 2, '...', 3]"), r#"[1, 2, "...", 3]"#);
}

#[test]
fn close_bracket_inside_string_value() {
    assert_eq!(
        as_json(r#"{"key": ["value]}"#),
        serde_json::json!({"key": ["value"]})
    );
    assert_eq!(
        as_json(r#"["lorem "ipsum" sic"]"#),
        serde_json::json!(["lorem \"ipsum\" sic"])
    );
}

#[test]
fn array_terminated_by_object_brace() {
    assert_eq!(
        as_json(r#"{"key1": ["value1", "value2"}, "key2": ["value3", "value4"]}"#),
        serde_json::json!({"key1": ["value1", "value2"], "key2": ["value3", "value4"]})
    );
}

#[test]
fn missing_quotes_in_elements() {
    assert_eq!(
        as_json(r#"["value1" value2", "value3"]"#),
        serde_json::json!(["value1", "value2", "value3"])
    );
}

#[test]
fn object_without_brace_inside_array() {
    assert_eq!(
        as_json(r#"["key":"value"}]"#),
        serde_json::json!([{"key": "value"}])
    );
}

#[test]
fn stray_characters_in_arrays() {
    assert_eq!(repaired("[-  "), "[]");
    // an empty object from bracket soup stays an object
    assert_eq!(repaired("[{]"), "[{}]");
}
