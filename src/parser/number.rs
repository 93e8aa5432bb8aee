//! Number tokens, including the things LLMs put inside them.

use super::context::ContextValue;
use super::{empty, PResult, Parser};
use crate::error::RepairErrorKind;
use crate::value::{Number, Value};

/// Characters that may participate in a number-ish run. `/` and `,` are in
/// the set so that fractions and separator-riddled tokens are captured whole
/// and classified afterwards. In arrays a comma always separates elements.
const NUMBER_CHARS: &str = "0123456789-.eE/,";

/// Suffixes that detach from a number instead of turning the whole run into
/// a string: `10ms` parses as `10` with `ms` left for the string parser.
const UNIT_SUFFIXES: &[&str] = &[
    "px", "em", "rem", "pt", "ms", "s", "m", "h", "d", "kb", "mb", "gb", "tb", "k",
];

impl<'o> Parser<'o> {
    pub(super) fn parse_number(&mut self) -> PResult<Value> {
        if self.char_at(0) == Some('+') {
            self.repair(
                RepairErrorKind::Parse("Leading + in number".to_string()),
                "While parsing a number we found a leading +, stripping it",
            )?;
            self.index += 1;
        }
        let mut number_str = String::new();
        let is_array = self.context.is_current(ContextValue::Array);
        while let Some(c) = self.char_at(0) {
            if !NUMBER_CHARS.contains(c) || (is_array && c == ',') {
                break;
            }
            number_str.push(c);
            self.index += 1;
        }
        if !number_str.is_empty()
            && matches!(number_str.chars().last(), Some('-' | 'e' | 'E' | '/' | ','))
        {
            // a number can't end on those, roll back one
            number_str.pop();
            self.index -= 1;
        } else if self.char_at(0).map_or(false, |c| c.is_alphabetic()) {
            let suffix = self.peek_alpha_run();
            if is_unit_suffix(&suffix) {
                if let Some(n) = Number::from_literal(&number_str) {
                    self.repair(
                        RepairErrorKind::Parse("Unit suffix after number".to_string()),
                        format!(
                            "While parsing a number we found the unit suffix {:?}, splitting it off",
                            suffix
                        ),
                    )?;
                    return Ok(Value::Number(n));
                }
            }
            // this was a string instead, sorry
            self.index -= number_str.chars().count();
            return self.parse_string();
        }
        if number_str.is_empty() {
            return Ok(empty());
        }

        // thousands separators, only when the grouping is unambiguous
        if number_str.contains(',') {
            if is_thousands_separated(&number_str) {
                let stripped: String = number_str.chars().filter(|c| *c != ',').collect();
                if let Some(n) = Number::from_literal(&stripped) {
                    self.repair(
                        RepairErrorKind::Parse("Thousands separators in number".to_string()),
                        "While parsing a number we found thousands separators, stripping them",
                    )?;
                    return Ok(Value::Number(n));
                }
            }
            return Ok(Value::String(number_str));
        }

        // .25 means 0.25
        if (number_str.starts_with('.') || number_str.starts_with("-."))
            && number_str.bytes().any(|b| b.is_ascii_digit())
        {
            let padded = match number_str.strip_prefix('-') {
                Some(rest) => format!("-0{}", rest),
                None => format!("0{}", number_str),
            };
            if let Some(n) = Number::from_literal(&padded) {
                self.repair(
                    RepairErrorKind::Parse("Leading dot in number".to_string()),
                    "While parsing a number we found a leading dot, adding a zero",
                )?;
                return Ok(Value::Number(n));
            }
        }

        // 12. means 12
        if let Some(stripped) = number_str.strip_suffix('.') {
            let digits = stripped.strip_prefix('-').unwrap_or(stripped);
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                if let Some(n) = Number::from_literal(stripped) {
                    self.repair(
                        RepairErrorKind::Parse("Trailing dot in number".to_string()),
                        "While parsing a number we found a trailing dot, dropping it",
                    )?;
                    return Ok(Value::Number(n));
                }
            }
        }

        match Number::from_literal(&number_str) {
            Some(n) => Ok(Value::Number(n)),
            None => {
                self.repair(
                    RepairErrorKind::Parse("Number-like token".to_string()),
                    "While parsing a number the token turned out not to be one, treating it as a string",
                )?;
                Ok(Value::String(number_str))
            }
        }
    }

    fn peek_alpha_run(&mut self) -> String {
        let mut out = String::new();
        let mut i = 0isize;
        while let Some(c) = self.char_at(i) {
            if !c.is_alphabetic() {
                break;
            }
            out.push(c);
            i += 1;
        }
        out
    }
}

fn is_unit_suffix(suffix: &str) -> bool {
    !suffix.is_empty() && UNIT_SUFFIXES.contains(&suffix.to_ascii_lowercase().as_str())
}

/// `1,234,567` or `-1,234.56`: first group of 1-3 digits, every following
/// group exactly 3, optional all-digit fraction.
fn is_thousands_separated(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (int_part, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    let mut groups = int_part.split(',');
    let Some(first) = groups.next() else {
        return false;
    };
    if first.is_empty() || first.len() > 3 || !first.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let mut rest = 0usize;
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        rest += 1;
    }
    if rest == 0 {
        return false;
    }
    match fraction {
        Some(f) => !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()),
        None => true,
    }
}
