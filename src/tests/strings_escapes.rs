use super::*;

#[test]
fn missing_and_mixed_quotes() {
    assert_eq!(
        as_json(r#"{"name": "John", "age": 30, "city": "New York"#),
        serde_json::json!({"name": "John", "age": 30, "city": "New York"})
    );
    assert_eq!(
        as_json(r#"{"name": "John", "age": 30, city: "New York"}"#),
        serde_json::json!({"name": "John", "age": 30, "city": "New York"})
    );
    assert_eq!(
        as_json(r#"{"name": "John", "age": 30, "city": New York}"#),
        serde_json::json!({"name": "John", "age": 30, "city": "New York"})
    );
    assert_eq!(
        as_json(r#"{"name": John, "age": 30, "city": "New York"}"#),
        serde_json::json!({"name": "John", "age": 30, "city": "New York"})
    );
    assert_eq!(
        as_json(r#"{"name": "John", "age": 30, "city": "New York, "gender": "male"}"#),
        serde_json::json!({"name": "John", "age": 30, "city": "New York", "gender": "male"})
    );
}

#[test]
fn fancy_quotes() {
    assert_eq!(
        as_json(r#"{“slanted_delimiter”: "value"}"#),
        serde_json::json!({"slanted_delimiter": "value"})
    );
    assert_eq!(
        as_json("{‘single’: ‘fancy’}"),
        serde_json::json!({"single": "fancy"})
    );
    // the table is configurable
    let plain = Options {
        fancy_quotes: Vec::new(),
        ..Options::default()
    };
    let v = crate::repair_to_value("[“a”]", &plain).unwrap();
    assert_eq!(v.as_array().unwrap()[0].as_str(), Some("a”"));
}

#[test]
fn interior_quotes_kept_by_lookahead() {
    assert_eq!(
        as_json(r#"{"key": "lorem "ipsum" sic"}"#),
        serde_json::json!({"key": "lorem \"ipsum\" sic"})
    );
    assert_eq!(
        as_json(r#"{"key": "v"alue"}"#),
        serde_json::json!({"key": "v\"alue\""})
    );
    assert_eq!(
        as_json(r#"{"key": "v"alue", "key2": "value2"}"#),
        serde_json::json!({"key": "v\"alue", "key2": "value2"})
    );
    assert_eq!(
        as_json(r#"{"key": "Lorem "ipsum" s,"}"#),
        serde_json::json!({"key": "Lorem \"ipsum\" s,"})
    );
}

#[test]
fn doubled_quote_artifacts() {
    assert_eq!(
        as_json(r#"{"key": ""value"}"#),
        serde_json::json!({"key": "value"})
    );
    assert_eq!(
        as_json(r#"{""answer"":[{""traits"":''Female aged 60+'',""answer1"":""5""}]}"#),
        serde_json::json!({"answer": [{"traits": "Female aged 60+", "answer1": "5"}]})
    );
}

#[test]
fn standard_escapes_decode() {
    let v = crate::repair_to_value(r#"{"key": "a\nb\tc\\d\"e\/f"}"#, &skip_opts()).unwrap();
    assert_eq!(v.get("key").unwrap().as_str(), Some("a\nb\tc\\d\"e/f"));
    let v = crate::repair_to_value(
        "{\"key\": \"\\u0076\\u0061\\u006C\\u0075\\u0065\"}",
        &skip_opts(),
    )
    .unwrap();
    assert_eq!(v.get("key").unwrap().as_str(), Some("value"));
}

#[test]
fn surrogate_pairs_combine() {
    let v = crate::repair_to_value(r#""😀""#, &skip_opts()).unwrap();
    assert_eq!(v.as_str(), Some("\u{1F600}"));
}

#[test]
fn unknown_escapes_stay_verbatim() {
    assert_eq!(
        as_json(r#"{"a": "x\qy"}"#),
        serde_json::json!({"a": "x\\qy"})
    );
}

#[test]
fn doubled_escaping_is_stripped() {
    assert_eq!(
        as_json(r#"{"foo": "\"bar\"""#),
        serde_json::json!({"foo": "\"bar\""})
    );
}

#[test]
fn barewords_with_stray_quotes() {
    assert_eq!(
        as_json(r#"{ "words": abcdef", "numbers": 12345", "words2": ghijkl" }"#),
        serde_json::json!({"words": "abcdef", "numbers": 12345, "words2": "ghijkl"})
    );
    assert_eq!(
        as_json(r#"{"lorem": ipsum, sic, datum.",}"#),
        serde_json::json!({"lorem": "ipsum, sic, datum."})
    );
    assert_eq!(
        as_json(r#"{"lorem": sic tamet. "ipsum": sic tamet, quick brown fox. "sic": ipsum}"#),
        serde_json::json!({"lorem": "sic tamet.", "ipsum": "sic tamet", "sic": "ipsum"})
    );
}

#[test]
fn braces_inside_strings() {
    assert_eq!(
        as_json("{'text': 'words{words in brackets}more words'}"),
        serde_json::json!({"text": "words{words in brackets}more words"})
    );
    assert_eq!(
        as_json("{text:words{words in brackets}}"),
        serde_json::json!({"text": "words{words in brackets}"})
    );
}

#[test]
fn keys_missing_their_right_quote() {
    assert_eq!(as_json(r#"{"key:"value"}"#), serde_json::json!({"key": "value"}));
    assert_eq!(as_json(r#"{"key:value}"#), serde_json::json!({"key": "value"}));
}

#[test]
fn control_characters_are_escaped_on_output() {
    assert_eq!(repaired("{\"key\t_\": \"value\"}"), "{\"key\\t_\": \"value\"}");
    // a trailing newline inside an unterminated key is trimmed
    assert_eq!(
        as_json("{\"key_1\n\": \"value\"}"),
        serde_json::json!({"key_1": "value"})
    );
}

#[test]
fn top_level_strings() {
    assert_eq!(repaired("\""), r#""""#);
    assert_eq!(repaired("'\"'"), r#""\"""#);
    assert_eq!(repaired("'string\""), r#""string\"""#);
}

#[test]
fn ensure_ascii_escapes_non_ascii() {
    let ascii = Options {
        ensure_ascii: true,
        ..Options::default()
    };
    assert_eq!(
        crate::repair("{\"key\": \"value\u{263A}\"}", &ascii).unwrap(),
        "{\"key\": \"value\\u263a\"}"
    );
    assert_eq!(
        crate::repair("{\"e\": \"\u{1F600}\"}", &ascii).unwrap(),
        "{\"e\": \"\\ud83d\\ude00\"}"
    );
    // off by default
    assert_eq!(repaired(r#"{"key": "value☺"}"#), r#"{"key": "value☺"}"#);
}
