//! The value tree produced by the repairing parser.

use indexmap::IndexMap;

/// Object representation. Keys keep first-insertion order; writing an
/// existing key again replaces the value but keeps the original position.
pub type Map = IndexMap<String, Value>;
pub type Array = Vec<Value>;

/// Any JSON value, as a tagged union so matching stays exhaustive.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Array),
    Object(Map),
}

/// A JSON number. The original lexical form is preserved whenever a native
/// machine number would lose digits.
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
    /// Verbatim decimal text: integers outside i64 range, decimals with more
    /// significant digits than f64 can round-trip, overflowing exponents.
    /// Always a valid JSON number literal.
    Literal(String),
}

/// Significant decimal digits f64 can round-trip.
const F64_ROUND_TRIP_DIGITS: usize = 17;

impl Number {
    /// Interpret a numeric token. Returns `None` when the text is not a
    /// number at all (the caller falls back to the string parser).
    pub(crate) fn from_literal(text: &str) -> Option<Number> {
        if text.is_empty() || text == "-" {
            return None;
        }
        let digits = text.strip_prefix('-').unwrap_or(text);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return match text.parse::<i64>() {
                Ok(i) => Some(Number::Int(i)),
                Err(_) => Some(Number::Literal(text.to_string())),
            };
        }
        let f = text.parse::<f64>().ok()?;
        if !f.is_finite() || significant_digits(text) > F64_ROUND_TRIP_DIGITS {
            return Some(Number::Literal(text.to_string()));
        }
        Some(Number::Float(f))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Number::Int(i) => Some(*i as f64),
            Number::Float(f) => Some(*f),
            Number::Literal(s) => s.parse().ok(),
        }
    }
}

/// Digits of the mantissa, leading zeros excluded. "0.000120" has three.
fn significant_digits(text: &str) -> usize {
    let mantissa = text
        .split(|c| c == 'e' || c == 'E')
        .next()
        .unwrap_or(text);
    let mut seen_nonzero = false;
    let mut count = 0usize;
    for b in mantissa.bytes() {
        match b {
            b'1'..=b'9' => {
                seen_nonzero = true;
                count += 1;
            }
            b'0' => {
                if seen_nonzero {
                    count += 1;
                }
            }
            _ => {}
        }
    }
    count
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Member lookup, `None` for non-objects and missing keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|m| m.get(key))
    }

    /// The parser uses the empty string as its "nothing here" marker, the
    /// way the original tool does.
    pub(crate) fn is_empty_string(&self) -> bool {
        matches!(self, Value::String(s) if s.is_empty())
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(Number::Int(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(Number::Float(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Value::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Object(v)
    }
}

/// Bridge for the conformant fast path. `preserve_order` keeps serde_json's
/// object member order intact.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Number(Number::Int(i))
                } else if let Some(u) = n.as_u64() {
                    // beyond i64: keep every digit
                    Value::Number(Number::Literal(u.to_string()))
                } else {
                    Value::Number(Number::Float(n.as_f64().unwrap_or(0.0)))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(a) => {
                Value::Array(a.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(m) => {
                let mut map = Map::with_capacity(m.len());
                for (k, v) in m {
                    map.insert(k, Value::from(v));
                }
                Value::Object(map)
            }
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let writer = crate::emit::JsonWriter::compact();
        f.write_str(&writer.to_string(self))
    }
}
