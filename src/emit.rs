//! Serialize a [`Value`] back to JSON text.
//!
//! Output shape follows the original tool's serializer: `", "` and `": "`
//! separators when compact, one item per line with `indent` spaces per level
//! when pretty-printing, and empty containers always printed inline.

use crate::options::Options;
use crate::value::{Number, Value};
use memchr::memchr2;

pub(crate) struct JsonWriter {
    ensure_ascii: bool,
    indent: Option<usize>,
}

impl JsonWriter {
    pub(crate) fn from_options(opts: &Options) -> Self {
        Self {
            ensure_ascii: opts.ensure_ascii,
            indent: opts.indent,
        }
    }

    pub(crate) fn compact() -> Self {
        Self {
            ensure_ascii: false,
            indent: None,
        }
    }

    pub(crate) fn to_string(&self, value: &Value) -> String {
        let mut out = String::new();
        self.write_value(value, 0, &mut out);
        out
    }

    fn write_value(&self, value: &Value, depth: usize, out: &mut String) {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(true) => out.push_str("true"),
            Value::Bool(false) => out.push_str("false"),
            Value::Number(n) => write_number(n, out),
            Value::String(s) => write_string(s, self.ensure_ascii, out),
            Value::Array(items) => {
                if items.is_empty() {
                    out.push_str("[]");
                    return;
                }
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                        if self.indent.is_none() {
                            out.push(' ');
                        }
                    }
                    self.newline_indent(depth + 1, out);
                    self.write_value(item, depth + 1, out);
                }
                self.newline_indent(depth, out);
                out.push(']');
            }
            Value::Object(map) => {
                if map.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push('{');
                for (i, (key, val)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                        if self.indent.is_none() {
                            out.push(' ');
                        }
                    }
                    self.newline_indent(depth + 1, out);
                    write_string(key, self.ensure_ascii, out);
                    out.push_str(": ");
                    self.write_value(val, depth + 1, out);
                }
                self.newline_indent(depth, out);
                out.push('}');
            }
        }
    }

    fn newline_indent(&self, depth: usize, out: &mut String) {
        if let Some(step) = self.indent {
            out.push('\n');
            for _ in 0..depth * step {
                out.push(' ');
            }
        }
    }
}

fn write_number(n: &Number, out: &mut String) {
    match n {
        Number::Int(i) => out.push_str(&i.to_string()),
        Number::Float(f) => {
            let s = f.to_string();
            out.push_str(&s);
            // keep floats recognizably floats, like serde_json does
            if !s.contains('.') && !s.contains('e') && !s.contains('E') {
                out.push_str(".0");
            }
        }
        Number::Literal(text) => out.push_str(text),
    }
}

fn write_string(s: &str, ensure_ascii: bool, out: &mut String) {
    let bytes = s.as_bytes();
    // Fast path: printable ASCII with nothing to escape is copied whole.
    if s.is_ascii()
        && memchr2(b'"', b'\\', bytes).is_none()
        && !bytes.iter().any(|b| *b < 0x20)
    {
        out.push('"');
        out.push_str(s);
        out.push('"');
        return;
    }

    out.push('"');
    for ch in s.chars() {
        let code = ch as u32;
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ if code < 0x20 => {
                push_u_escape(code, out);
            }
            _ if ensure_ascii && code > 0x7F => {
                if code <= 0xFFFF {
                    push_u_escape(code, out);
                } else {
                    let u = code - 0x1_0000;
                    push_u_escape(0xD800 + ((u >> 10) & 0x3FF), out);
                    push_u_escape(0xDC00 + (u & 0x3FF), out);
                }
            }
            _ => out.push(ch),
        }
    }
    out.push('"');
}

fn push_u_escape(code: u32, out: &mut String) {
    use std::fmt::Write;
    let _ = write!(out, "\\u{:04x}", code);
}
