//! Array parser.

use super::context::ContextValue;
use super::{empty, PResult, Parser};
use crate::error::RepairErrorKind;
use crate::value::Value;

impl<'o> Parser<'o> {
    /// The dispatcher has already consumed the `[`.
    pub(super) fn parse_array(&mut self) -> PResult<Value> {
        if self.over_depth_limit()? {
            return Ok(empty());
        }
        self.depth += 1;
        let result = self.parse_array_inner();
        self.depth -= 1;
        result
    }

    fn parse_array_inner(&mut self) -> PResult<Value> {
        let mut arr: Vec<Value> = Vec::new();
        self.context.set(ContextValue::Array);
        let mut ch;
        loop {
            self.skip_whitespaces();
            ch = self.char_at(0);
            if ch.map_or(true, |c| c == ']' || c == '}') {
                break;
            }
            let idx_before = self.index;
            let value = if self.reopen_object {
                // a duplicate key split the previous object right here
                self.reopen_object = false;
                self.parse_object()?
            } else {
                match self.char_at(0) {
                    // a quoted string, or an object that forgot its brace and
                    // which announces itself with a ':' after the string
                    Some(q) if q != '`' && self.is_string_delimiter(q) => {
                        let quotes = self.quote_class(q);
                        let i = self.skip_to_quote(&quotes, 1);
                        let i = self.skip_whitespaces_at(i + 1, false);
                        if self.char_at(i as isize) == Some(':') {
                            self.repair(
                                RepairErrorKind::Parse("Object missing its brace".to_string()),
                                "While parsing an array we found a key-value pair without an object, reopening one",
                            )?;
                            self.parse_object()?
                        } else {
                            self.parse_string()?
                        }
                    }
                    _ => self.parse_json()?,
                }
            };

            if value.is_empty_string() && !self.opts.strict {
                // nothing usable: drop it, and never stall
                if self.index == idx_before {
                    self.repair(
                        RepairErrorKind::StrayCharacters,
                        "While parsing an array we found a character that fits nothing, ignoring it",
                    )?;
                    self.index += 1;
                }
            } else if value.as_str() == Some("...") && self.char_at(-1) == Some('.') {
                self.repair(
                    RepairErrorKind::StrayCharacters,
                    "While parsing an array, found a stray '...'; ignoring it",
                )?;
            } else {
                arr.push(value);
            }

            ch = self.char_at(0);
            let mut commas = 0usize;
            while ch.map_or(false, |c| c != ']' && (c.is_whitespace() || c == ',')) {
                if ch == Some(',') {
                    commas += 1;
                }
                self.index += 1;
                ch = self.char_at(0);
            }
            if commas > 1 {
                self.repair(
                    RepairErrorKind::MissingComma,
                    "While parsing an array we found several commas in a row, treating them as one",
                )?;
            }
            if commas > 0 && ch.map_or(true, |c| c == ']' || c == '}') {
                self.repair(
                    RepairErrorKind::EmptyValue,
                    "While parsing an array we found a trailing comma, removing it",
                )?;
            }
            if commas == 0 && ch.map_or(false, |c| c != ']' && c != '}') {
                self.repair(
                    RepairErrorKind::MissingComma,
                    "While parsing an array we missed a , between elements, adding it back",
                )?;
            }
        }

        if let Some(c) = ch {
            if c != ']' {
                self.repair(
                    RepairErrorKind::UnclosedContainer,
                    "While parsing an array we missed the closing ], ignoring it",
                )?;
            }
        } else {
            self.repair(
                RepairErrorKind::UnclosedContainer,
                "While parsing an array we missed the closing ], adding it back",
            )?;
        }
        self.index += 1;
        self.context.reset();
        Ok(Value::Array(arr))
    }
}
