//! Object parser.

use super::context::ContextValue;
use super::{empty, PResult, Parser};
use crate::emit::JsonWriter;
use crate::error::RepairErrorKind;
use crate::value::{Map, Value};

impl<'o> Parser<'o> {
    /// The dispatcher has already consumed the `{` (or a duplicate-key split
    /// re-enters without one).
    pub(super) fn parse_object(&mut self) -> PResult<Value> {
        if self.over_depth_limit()? {
            return Ok(empty());
        }
        self.depth += 1;
        let result = self.parse_object_inner();
        self.depth -= 1;
        result
    }

    fn parse_object_inner(&mut self) -> PResult<Value> {
        let mut obj = Map::new();
        let start_index = self.index;

        while self.char_at(0).map_or(false, |c| c != '}') {
            self.skip_whitespaces();
            if self.char_at(0).map_or(true, |c| c == '}') {
                continue;
            }

            // a ':' before any key
            if self.char_at(0) == Some(':') {
                self.repair(
                    RepairErrorKind::StrayCharacters,
                    "While parsing an object we found a : before a key, ignoring it",
                )?;
                self.index += 1;
            }

            self.context.set(ContextValue::ObjectKey);

            // checkpoint for the duplicate-key rollback
            let mut rollback_index = self.index;
            let mut key = String::new();
            while self.char_at(0).is_some() {
                rollback_index = self.index;
                if self.char_at(0) == Some('[') && key.is_empty() {
                    // an array where a key should be: merge it into the
                    // previous member when that member holds an array
                    let prev_is_array =
                        matches!(obj.last(), Some((_, Value::Array(_))));
                    if prev_is_array {
                        self.repair(
                            RepairErrorKind::MissingComma,
                            "While parsing an object we found an array where a key should be, merging it into the previous value",
                        )?;
                        self.index += 1;
                        let new_array = self.parse_array()?;
                        if let Value::Array(mut items) = new_array {
                            if let Some((_, Value::Array(prev))) = obj.last_mut() {
                                if items.len() == 1 && matches!(items[0], Value::Array(_)) {
                                    if let Some(Value::Array(inner)) = items.pop() {
                                        prev.extend(inner);
                                    }
                                } else {
                                    prev.extend(items);
                                }
                            }
                        }
                        self.skip_whitespaces();
                        if self.char_at(0) == Some(',') {
                            self.index += 1;
                        }
                        self.skip_whitespaces();
                        continue;
                    }
                }
                key = match self.parse_string()? {
                    Value::String(s) => s,
                    other => JsonWriter::compact().to_string(&other),
                };
                if key.is_empty() {
                    self.skip_whitespaces();
                }
                if !key.is_empty() || matches!(self.char_at(0), Some(':') | Some('}')) {
                    // an empty key with a divider right after is settled
                    break;
                }
            }

            // a duplicate key inside an array means a new object started
            // without its '{'; close this one and reopen at the key
            if self.context.is_any(ContextValue::Array) && obj.contains_key(&key) {
                self.repair(
                    RepairErrorKind::DuplicateKey(key.clone()),
                    "While parsing an object we found a duplicate key, closing the object here and rolling back the index",
                )?;
                self.index = rollback_index;
                self.reopen_object = true;
                self.context.reset();
                return Ok(Value::Object(obj));
            }

            self.skip_whitespaces();

            // the object ends right after a key (or the input does)
            if self.char_at(0).map_or(true, |c| c == '}') {
                self.context.reset();
                continue;
            }

            if self.char_at(0) == Some(':') {
                self.index += 1;
            } else {
                self.repair(
                    RepairErrorKind::MissingColon,
                    "While parsing an object we missed a : after a key, adding it back",
                )?;
            }

            self.context.reset();
            self.context.set(ContextValue::ObjectValue);
            self.skip_whitespaces();

            let mut value = empty();
            if matches!(self.char_at(0), Some(',') | Some('}')) {
                // a member with nothing in its value slot
                self.repair(
                    RepairErrorKind::EmptyValue,
                    "While parsing an object value we found a stray , ignoring it",
                )?;
            } else {
                value = self.parse_json()?;
            }
            self.context.reset();

            if key.is_empty() {
                self.repair(
                    RepairErrorKind::EmptyKey,
                    "While parsing an object we found an empty key",
                )?;
                if value.is_empty_string() {
                    self.log(
                        "While parsing an object we found an empty key and an empty value, dropping the pair",
                    );
                } else {
                    obj.insert(key, value);
                }
            } else {
                if obj.contains_key(&key) {
                    self.repair(
                        RepairErrorKind::DuplicateKey(key.clone()),
                        "While parsing an object we found a duplicate key, keeping the last value",
                    )?;
                }
                // last writer wins, first insertion keeps its position
                obj.insert(key, value);
            }

            match self.char_at(0) {
                Some(',') => {
                    self.index += 1;
                    self.skip_whitespaces();
                    if self.char_at(0).map_or(true, |c| c == '}') {
                        self.repair(
                            RepairErrorKind::EmptyValue,
                            "While parsing an object we found a trailing comma, removing it",
                        )?;
                    }
                }
                Some('\'') | Some('"') => {
                    self.repair(
                        RepairErrorKind::MissingComma,
                        "While parsing an object we found a stray quote after a value, ignoring it",
                    )?;
                    self.index += 1;
                }
                Some('}') | None => {}
                Some(_) => {
                    self.repair(
                        RepairErrorKind::MissingComma,
                        "While parsing an object we missed a , between members, adding it back",
                    )?;
                }
            }
            self.skip_whitespaces();
        }

        if self.char_at(0).is_none() {
            self.repair(
                RepairErrorKind::UnclosedContainer,
                "While parsing an object, we couldn't find the closing }, adding it back",
            )?;
        }
        self.index += 1;

        // an object that parsed empty over a non-trivial span was probably
        // an array with the wrong brackets
        if obj.is_empty() && self.index - start_index > 2 {
            self.repair(
                RepairErrorKind::Parse("Parsed object is empty".to_string()),
                "Parsed object is empty, we will try to parse this as an array instead",
            )?;
            self.index = start_index;
            return self.parse_array();
        }

        // '{…}, "key2": value' at the top level continues the same object
        if !self.context.is_empty() {
            return Ok(Value::Object(obj));
        }
        self.skip_whitespaces();
        if self.char_at(0) != Some(',') {
            return Ok(Value::Object(obj));
        }
        self.index += 1;
        self.skip_whitespaces();
        if !self
            .char_at(0)
            .map_or(false, |c| self.is_string_delimiter(c))
        {
            return Ok(Value::Object(obj));
        }
        self.repair(
            RepairErrorKind::MissingComma,
            "Found a comma and a string after the object closed, checking for additional key-value pairs",
        )?;
        let additional = self.parse_object()?;
        if let Value::Object(extra) = additional {
            for (k, v) in extra {
                obj.insert(k, v);
            }
        }
        Ok(Value::Object(obj))
    }
}
