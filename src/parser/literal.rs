//! Boolean and null barewords.

use super::{empty, PResult, Parser};
use crate::error::RepairErrorKind;
use crate::value::Value;

impl<'o> Parser<'o> {
    /// Case-insensitive `true`/`false`/`null`, plus the pythonic `None`. A
    /// prefix cut by end-of-input completes to the literal outside strict
    /// mode. Anything else rolls the cursor back and yields nothing, so the
    /// caller can fall through to the string parser.
    pub(super) fn parse_boolean_or_null(&mut self) -> PResult<Value> {
        let starting_index = self.index;
        let candidate: Option<(&str, Value)> = match self.char_at(0).map(|c| c.to_ascii_lowercase())
        {
            Some('t') => Some(("true", Value::Bool(true))),
            Some('f') => Some(("false", Value::Bool(false))),
            Some('n') => {
                if self.char_at(1).map(|c| c.to_ascii_lowercase()) == Some('o') {
                    Some(("none", Value::Null))
                } else {
                    Some(("null", Value::Null))
                }
            }
            _ => None,
        };
        if let Some((word, value)) = candidate {
            let canonical = if word == "none" { "null" } else { word };
            let mut matched = 0usize;
            let mut exact = word != "none";
            for expected in word.chars() {
                match self.char_at(0) {
                    Some(c) if c.to_ascii_lowercase() == expected => {
                        if c != expected {
                            exact = false;
                        }
                        matched += 1;
                        self.index += 1;
                    }
                    _ => break,
                }
            }
            if matched == word.len() {
                if !exact {
                    self.repair(
                        RepairErrorKind::Parse("Non-standard literal spelling".to_string()),
                        format!(
                            "While parsing a literal we found a non-standard spelling, normalizing it to {}",
                            canonical
                        ),
                    )?;
                }
                return Ok(value);
            }
            if matched > 0 && self.char_at(0).is_none() && !self.opts.strict {
                // truncated output like "tr" or "fals": nothing else fits here
                self.log(format!(
                    "While parsing a literal we hit the end of input, completing it to {}",
                    canonical
                ));
                return Ok(value);
            }
        }
        self.index = starting_index;
        Ok(empty())
    }
}
