//! Corruption properties: however we mangle a valid document, the repaired
//! output must parse conformantly, and repairing twice changes nothing.

use super::*;
use quickcheck::{Arbitrary, Gen, QuickCheck};

#[derive(Debug, Clone)]
struct Doc(serde_json::Value);

fn gen_string(g: &mut Gen) -> String {
    const POOL: &[char] = &[
        'a', 'b', 'c', 'x', 'y', 'z', 'A', 'Z', '0', '7', ' ', '.', ',', ':', '-', '_', 'é', '☺',
    ];
    // never empty: the repair engine deliberately drops empty strings from
    // arrays, which would fail the round-trip property for reasons that have
    // nothing to do with corruption
    let len = 1 + usize::arbitrary(g) % 7;
    (0..len).map(|_| *g.choose(POOL).unwrap()).collect()
}

fn gen_value(g: &mut Gen, depth: usize) -> serde_json::Value {
    let pick = usize::arbitrary(g) % if depth == 0 { 4 } else { 6 };
    match pick {
        0 => serde_json::Value::Null,
        1 => serde_json::Value::Bool(bool::arbitrary(g)),
        2 => {
            if bool::arbitrary(g) {
                serde_json::json!(i64::arbitrary(g))
            } else {
                let mut f = f64::arbitrary(g);
                while !f.is_finite() {
                    f = f64::arbitrary(g);
                }
                serde_json::json!(f)
            }
        }
        3 => serde_json::Value::String(gen_string(g)),
        4 => {
            let len = usize::arbitrary(g) % 4;
            serde_json::Value::Array((0..len).map(|_| gen_value(g, depth - 1)).collect())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            let mut map = serde_json::Map::new();
            for i in 0..len {
                map.insert(format!("k{}{}", i, gen_string(g)), gen_value(g, depth - 1));
            }
            serde_json::Value::Object(map)
        }
    }
}

impl Arbitrary for Doc {
    fn arbitrary(g: &mut Gen) -> Self {
        Doc(gen_value(g, 2))
    }
}

/// The corruption operators the decoder exists for.
fn corrupt(text: &str, op: u8) -> String {
    match op % 6 {
        0 => match text.rfind(['}', ']']) {
            Some(i) => format!("{}{}", &text[..i], &text[i + 1..]),
            None => text.to_string(),
        },
        1 => text.replacen('"', "'", 1),
        2 => format!("Here is the JSON you asked for: {} Hope this helps!", text),
        3 => format!("```json\n{}\n```", text),
        4 => {
            let cut = text.chars().count() * 2 / 3;
            text.chars().take(cut).collect()
        }
        _ => text.replacen(", ", " ", 1),
    }
}

#[test]
fn corrupted_documents_still_repair_to_valid_json() {
    fn property(doc: Doc, op: u8) -> bool {
        let text = serde_json::to_string(&doc.0).unwrap();
        let broken = corrupt(&text, op);
        let out = match crate::repair(&broken, &opts()) {
            Ok(out) => out,
            Err(_) => return false,
        };
        serde_json::from_str::<serde_json::Value>(&out).is_ok()
    }
    QuickCheck::new()
        .tests(400)
        .quickcheck(property as fn(Doc, u8) -> bool);
}

#[test]
fn repair_is_idempotent_on_corrupted_documents() {
    fn property(doc: Doc, op: u8) -> bool {
        let text = serde_json::to_string(&doc.0).unwrap();
        let broken = corrupt(&text, op);
        let once = match crate::repair(&broken, &opts()) {
            Ok(out) => out,
            Err(_) => return false,
        };
        crate::repair(&once, &opts()).map_or(false, |twice| twice == once)
    }
    QuickCheck::new()
        .tests(400)
        .quickcheck(property as fn(Doc, u8) -> bool);
}

#[test]
fn valid_documents_round_trip_through_the_repair_engine() {
    fn property(doc: Doc) -> bool {
        let text = serde_json::to_string(&doc.0).unwrap();
        match crate::repair_to_value(&text, &skip_opts()) {
            Ok(v) => serde_json::from_str::<serde_json::Value>(&crate::write_json(&v, &opts()))
                .map_or(false, |reparsed| reparsed == doc.0)
            ,
            Err(_) => false,
        }
    }
    QuickCheck::new().tests(300).quickcheck(property as fn(Doc) -> bool);
}
