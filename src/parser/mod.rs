//! Hand-written recursive-descent repairing parser.
//!
//! One forward-moving character cursor, a small grammar-context stack, and a
//! pile of local heuristics deciding at each ambiguous character what the
//! author most plausibly meant. In non-strict mode there are no recoverable
//! errors: every ambiguity resolves to a deterministic repair, and the only
//! terminal outcome is "nothing parseable at all", which yields an empty
//! value. In strict mode every repair is a fatal [`RepairError`].

pub(crate) mod context;
pub(crate) mod cursor;

mod array;
mod comment;
mod literal;
mod number;
mod object;
mod strings;

use crate::error::{RepairError, RepairErrorKind};
use crate::options::Options;
use crate::repair::RepairLogEntry;
use crate::value::Value;
use context::{ContextStack, ContextValue};
use cursor::Source;

pub(crate) type PResult<T> = Result<T, RepairError>;

/// The parser's "nothing here" marker, shared with the original tool's
/// convention of returning an empty string where no value could be built.
pub(super) fn empty() -> Value {
    Value::String(String::new())
}

pub(crate) struct Parser<'o> {
    source: Source,
    /// Current character offset. Monotonically non-decreasing, except for
    /// rollbacks to checkpoints a parser saved itself.
    index: usize,
    context: ContextStack,
    log: Vec<RepairLogEntry>,
    opts: &'o Options,
    depth: usize,
    /// One-shot: the next value parse re-enters an object without an '{',
    /// used when a duplicate key splits an object inside an array.
    reopen_object: bool,
}

impl<'o> Parser<'o> {
    pub(crate) fn new(source: Source, opts: &'o Options) -> Self {
        Self {
            source,
            index: 0,
            context: ContextStack::default(),
            log: Vec::new(),
            opts,
            depth: 0,
            reopen_object: false,
        }
    }

    pub(crate) fn into_log(self) -> Vec<RepairLogEntry> {
        self.log
    }

    pub(crate) fn take_io_error(&mut self) -> Option<std::io::Error> {
        self.source.take_io_error()
    }

    /// Driver: one value, or all top-level values wrapped in an array.
    pub(crate) fn parse(&mut self) -> PResult<Value> {
        let mut first = self.parse_json()?;
        if self.opts.stream_stable {
            // only the first complete value; a growing stream stays stable
            return Ok(first);
        }
        if self.char_at(0).is_none() {
            return Ok(first);
        }
        let mut items: Vec<Value> = Vec::new();
        let mut wrapped = false;
        let mut last_index = self.index;
        while self.char_at(0).is_some() {
            let j = self.parse_json()?;
            if !j.is_empty_string() {
                if first.is_empty_string() {
                    // nothing usable came before this value
                    first = j;
                } else {
                    if !wrapped {
                        self.repair(
                            RepairErrorKind::MultipleTopLevel,
                            "The parser returned early, checking if there's more json elements",
                        )?;
                        wrapped = true;
                    }
                    items.push(j);
                }
            }
            if self.index == last_index {
                self.index += 1;
            }
            last_index = self.index;
        }
        if wrapped {
            items.insert(0, first);
            Ok(Value::Array(items))
        } else {
            Ok(first)
        }
    }

    /// Value dispatcher: peek the next character and route.
    pub(crate) fn parse_json(&mut self) -> PResult<Value> {
        let mut junk_start: Option<usize> = None;
        let mut junk_non_ws = false;
        loop {
            if self.reopen_object {
                self.reopen_object = false;
                self.end_junk_run(junk_start, junk_non_ws)?;
                return self.parse_object();
            }
            let Some(ch) = self.char_at(0) else {
                self.end_junk_run(junk_start, junk_non_ws)?;
                return Ok(empty());
            };
            let in_context = !self.context.is_empty();
            match ch {
                '{' => {
                    self.end_junk_run(junk_start, junk_non_ws)?;
                    self.index += 1;
                    return self.parse_object();
                }
                '[' => {
                    self.end_junk_run(junk_start, junk_non_ws)?;
                    self.index += 1;
                    return self.parse_array();
                }
                // a key with a missing value right before the object closes
                '}' if self.context.is_current(ContextValue::ObjectValue) => {
                    self.end_junk_run(junk_start, junk_non_ws)?;
                    self.repair(
                        RepairErrorKind::EmptyValue,
                        "At the end of an object we found a key with missing value, skipping",
                    )?;
                    return Ok(empty());
                }
                '#' | '/' => {
                    self.end_junk_run(junk_start, junk_non_ws)?;
                    junk_start = None;
                    junk_non_ws = false;
                    // comments count as whitespace: skip and go around again
                    self.parse_comment()?;
                }
                _ if self.is_string_delimiter(ch) || (in_context && ch.is_alphabetic()) => {
                    self.end_junk_run(junk_start, junk_non_ws)?;
                    return self.parse_string();
                }
                _ if ch.is_ascii_digit() || ch == '-' || ch == '+' || ch == '.' => {
                    self.end_junk_run(junk_start, junk_non_ws)?;
                    junk_start = None;
                    junk_non_ws = false;
                    let before = self.index;
                    let value = self.parse_number()?;
                    if value.is_empty_string() && self.index == before {
                        // a lone sign or dot, not a number after all
                        junk_start = Some(self.index);
                        junk_non_ws = true;
                        self.index += 1;
                        continue;
                    }
                    return Ok(value);
                }
                _ if ch.is_alphabetic() => {
                    // top level: a literal, or prose wrapped around the payload
                    self.end_junk_run(junk_start, junk_non_ws)?;
                    junk_start = None;
                    junk_non_ws = false;
                    if matches!(ch.to_ascii_lowercase(), 't' | 'f' | 'n') {
                        let literal = self.parse_boolean_or_null()?;
                        if !literal.is_empty_string() {
                            return Ok(literal);
                        }
                    }
                    let ahead = self.skip_to_one_of(&['{', '['], 0);
                    if self.char_at(ahead as isize).is_some() {
                        self.index += ahead;
                        self.repair(
                            RepairErrorKind::StrayCharacters,
                            "Found text around the JSON, skipping ahead to the first bracket",
                        )?;
                    } else {
                        self.index += ahead;
                        self.repair(
                            RepairErrorKind::StrayCharacters,
                            "The remaining text contains no JSON structure, ignoring it",
                        )?;
                        return Ok(empty());
                    }
                }
                _ => {
                    // nothing we recognize: skip and retry
                    if junk_start.is_none() {
                        junk_start = Some(self.index);
                    }
                    if !ch.is_whitespace() {
                        junk_non_ws = true;
                    }
                    self.index += 1;
                }
            }
        }
    }

    /// A contiguous run of skipped characters is one repair, unless it was
    /// whitespace only.
    fn end_junk_run(&mut self, start: Option<usize>, non_ws: bool) -> PResult<()> {
        if let Some(pos) = start {
            if non_ws {
                self.repair_at(
                    RepairErrorKind::StrayCharacters,
                    pos,
                    "Ignoring characters that are not part of any JSON element",
                )?;
            }
        }
        Ok(())
    }

    // ---- cursor helpers ----

    /// Character at the cursor plus `offset`, `None` past either end.
    pub(super) fn char_at(&mut self, offset: isize) -> Option<char> {
        let idx = self.index as isize + offset;
        if idx < 0 {
            return None;
        }
        self.source.char_at(idx as usize)
    }

    /// Port of the original whitespace skipper: moves the main cursor, or
    /// just the probe offset when `move_main_index` is off.
    pub(super) fn skip_whitespaces_at(&mut self, mut idx: usize, move_main_index: bool) -> usize {
        loop {
            match self.source.char_at(self.index + idx) {
                Some(c) if c.is_whitespace() => {
                    if move_main_index {
                        self.index += 1;
                    } else {
                        idx += 1;
                    }
                }
                _ => return idx,
            }
        }
    }

    pub(super) fn skip_whitespaces(&mut self) {
        self.skip_whitespaces_at(0, true);
    }

    /// Probe forward (no cursor movement) to the first occurrence of
    /// `target`; returns the relative offset, landing at end-of-input when
    /// the character never appears.
    pub(super) fn skip_to_character(&mut self, target: char, mut idx: usize) -> usize {
        loop {
            match self.source.char_at(self.index + idx) {
                None => return idx,
                Some(c) if c == target => return idx,
                Some(_) => idx += 1,
            }
        }
    }

    pub(super) fn skip_to_one_of(&mut self, targets: &[char], mut idx: usize) -> usize {
        loop {
            match self.source.char_at(self.index + idx) {
                None => return idx,
                Some(c) if targets.contains(&c) => return idx,
                Some(_) => idx += 1,
            }
        }
    }

    /// Absolute-range slice, clamped; used for escape digits and log windows.
    pub(super) fn slice(&mut self, start: usize, end: usize) -> String {
        self.source.window(start, end)
    }

    // ---- quote tables ----

    pub(super) fn is_string_delimiter(&self, c: char) -> bool {
        c == '"' || c == '\'' || c == '`' || self.opts.fancy_quotes.iter().any(|(f, _)| *f == c)
    }

    fn canonical_quote(&self, c: char) -> char {
        self.opts
            .fancy_quotes
            .iter()
            .find(|(f, _)| *f == c)
            .map(|(_, s)| *s)
            .unwrap_or(c)
    }

    /// Every quote character equivalent to `c`: its canonical straight quote
    /// plus all fancy quotes mapping to the same canonical one.
    pub(super) fn quote_class(&self, c: char) -> Vec<char> {
        let canon = self.canonical_quote(c);
        let mut class = vec![canon];
        for (f, s) in &self.opts.fancy_quotes {
            if *s == canon {
                class.push(*f);
            }
        }
        class
    }

    // ---- repair log ----

    pub(super) fn log(&mut self, message: impl Into<String>) {
        if !self.opts.logging {
            return;
        }
        let window = self.opts.log_context_window;
        let start = self.index.saturating_sub(window);
        let context = self.source.window(start, self.index + window);
        self.log.push(RepairLogEntry {
            message: message.into(),
            context,
        });
    }

    /// The single funnel every heuristic goes through: strict mode turns the
    /// repair into a fatal error, otherwise it is recorded and parsing
    /// continues.
    pub(super) fn repair(
        &mut self,
        kind: RepairErrorKind,
        message: impl Into<String>,
    ) -> PResult<()> {
        let position = self.index;
        self.repair_at(kind, position, message)
    }

    pub(super) fn repair_at(
        &mut self,
        kind: RepairErrorKind,
        position: usize,
        message: impl Into<String>,
    ) -> PResult<()> {
        if self.opts.strict {
            return Err(RepairError::new(kind, position));
        }
        self.log(message);
        Ok(())
    }

    // ---- shared container plumbing ----

    pub(super) fn over_depth_limit(&mut self) -> PResult<bool> {
        if self.depth < self.opts.max_depth {
            return Ok(false);
        }
        self.repair(
            RepairErrorKind::DepthLimit,
            "Nesting is deeper than the configured limit, skipping this bracket",
        )?;
        Ok(true)
    }

}
