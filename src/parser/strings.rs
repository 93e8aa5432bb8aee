//! The string parser. Most of the repair intelligence lives here: choosing
//! the opening quote (or none), matching fancy quotes, deciding whether an
//! interior quote really closes the string, normalizing broken escapes, and
//! cutting barewords at the structural boundary the current context implies.

use super::context::ContextValue;
use super::{empty, PResult, Parser};
use crate::error::RepairErrorKind;
use crate::value::Value;

fn ends_with_any(s: &str, set: &[char]) -> bool {
    s.chars().last().map_or(false, |c| set.contains(&c))
}

impl<'o> Parser<'o> {
    pub(super) fn parse_string(&mut self) -> PResult<Value> {
        let mut missing_quotes = false;
        let mut doubled_quotes = false;

        let mut ch = self.char_at(0);
        if matches!(ch, Some('#') | Some('/')) {
            self.parse_comment()?;
            return Ok(empty());
        }

        // a string can only start at a quote or a literal; skip the debris
        let skip_start = self.index;
        let mut skipped_non_ws = false;
        while let Some(c) = ch {
            if self.is_string_delimiter(c) || c.is_alphanumeric() {
                break;
            }
            if !c.is_whitespace() {
                skipped_non_ws = true;
            }
            self.index += 1;
            ch = self.char_at(0);
        }
        if skipped_non_ws {
            self.repair_at(
                RepairErrorKind::StrayCharacters,
                skip_start,
                "While parsing a string we found stray characters before it, ignoring them",
            )?;
        }

        let Some(first) = ch else {
            // nothing but debris: an empty string
            return Ok(empty());
        };

        let quotes: Vec<char>;
        if self.is_string_delimiter(first) {
            if first == '`' && self.char_at(1) == Some('`') && self.char_at(2) == Some('`') {
                return self.parse_fenced_block();
            }
            if first != '"' {
                self.repair(
                    RepairErrorKind::Parse("Non-standard quotes".to_string()),
                    "While parsing a string, we found a non-standard quote, replacing it with a double quote",
                )?;
            }
            quotes = self.quote_class(first);
        } else {
            // a bareword; (T)rue, (F)alse and (N)ull are not strings, but
            // object keys always are
            if matches!(first.to_ascii_lowercase(), 't' | 'f' | 'n')
                && !self.context.is_current(ContextValue::ObjectKey)
            {
                let value = self.parse_boolean_or_null()?;
                if !value.is_empty_string() {
                    return Ok(value);
                }
            }
            self.repair(
                RepairErrorKind::Parse("String missing quotes".to_string()),
                "While parsing a string, we found a literal instead of a quote",
            )?;
            missing_quotes = true;
            quotes = self.quote_class('"');
        }
        if !missing_quotes {
            self.index += 1;
        }

        // doubled quotes right at the start: '""…""' artifacts, empty keys
        // and values, or a plain mistake
        if !missing_quotes && self.char_at(0).map_or(false, |c| quotes.contains(&c)) {
            if (self.context.is_current(ContextValue::ObjectKey) && self.char_at(1) == Some(':'))
                || (self.context.is_current(ContextValue::ObjectValue)
                    && matches!(self.char_at(1), Some(',') | Some('}')))
            {
                // an empty key or value with both quotes intact
                self.index += 1;
                return Ok(empty());
            }
            if self.char_at(1).map_or(false, |c| quotes.contains(&c)) {
                self.repair(
                    RepairErrorKind::Parse("Doubled quotes".to_string()),
                    "While parsing a string, we found a doubled quote and then a quote again, ignoring it",
                )?;
                return Ok(empty());
            }
            let i = self.skip_to_quote(&quotes, 1);
            let next_c = self.char_at(i as isize);
            if next_c.is_some() && self.char_at(i as isize + 1).map_or(false, |c| quotes.contains(&c)) {
                self.repair(
                    RepairErrorKind::Parse("Doubled quotes".to_string()),
                    "While parsing a string, we found a valid starting doubled quote",
                )?;
                doubled_quotes = true;
                self.index += 1;
            } else {
                let i = self.skip_whitespaces_at(1, false);
                let nc = self.char_at(i as isize);
                if nc.map_or(false, |c| self.is_string_delimiter(c) || c == '{' || c == '[') {
                    self.repair(
                        RepairErrorKind::Parse("Doubled quotes".to_string()),
                        "While parsing a string, we found a doubled quote but also another quote afterwards, ignoring it",
                    )?;
                    self.index += 1;
                    return Ok(empty());
                }
                if !matches!(nc, Some(',') | Some(']') | Some('}')) {
                    self.repair(
                        RepairErrorKind::Parse("Doubled quotes".to_string()),
                        "While parsing a string, we found a doubled quote but it was a mistake, removing one quote",
                    )?;
                    self.index += 1;
                }
            }
        }

        let mut string_acc = String::new();
        let mut unmatched_delimiter = false;
        let mut ch = self.char_at(0);

        // Stop on a closing quote, on end-of-input, or, when quotes are
        // missing, at the structural terminator the context implies.
        loop {
            let Some(c) = ch else { break };
            if quotes.contains(&c) {
                break;
            }

            if missing_quotes {
                if self.context.is_current(ContextValue::ObjectKey)
                    && (c == ':' || c.is_whitespace())
                {
                    self.repair(
                        RepairErrorKind::UnterminatedString,
                        "While parsing a string missing the left delimiter in object key context, we found a :, stopping here",
                    )?;
                    break;
                }
                if self.context.is_current(ContextValue::Array) && (c == ']' || c == ',') {
                    self.repair(
                        RepairErrorKind::UnterminatedString,
                        "While parsing a string missing the left delimiter in array context, we found a ] or ,, stopping here",
                    )?;
                    break;
                }
            }

            // in object-value position, a ',' or '}' may mean the closing
            // quote never came; look ahead before deciding
            if !self.opts.stream_stable
                && self.context.is_current(ContextValue::ObjectValue)
                && (c == ',' || c == '}')
                && !ends_with_any(&string_acc, &quotes)
            {
                let mut rdelimiter_missing = true;
                self.skip_whitespaces();
                if self.char_at(1) == Some('\\') {
                    // an escape right after: this is a quoted run
                    rdelimiter_missing = false;
                }
                let i0 = self.skip_to_quote(&quotes, 1);
                if self.char_at(i0 as isize).is_some() {
                    let i = self.skip_whitespaces_at(i0 + 1, false);
                    let nc = self.char_at(i as isize);
                    if nc.is_none() || matches!(nc, Some(',') | Some('}')) {
                        rdelimiter_missing = false;
                    } else {
                        // garbage at the end of the string? look for another
                        // opening quote and a ':' after it
                        let i2 = self.skip_to_quote(&quotes, i);
                        if self.char_at(i2 as isize).is_none() {
                            rdelimiter_missing = false;
                        } else {
                            let i3 = self.skip_whitespaces_at(i2 + 1, false);
                            let nc3 = self.char_at(i3 as isize);
                            if nc3.is_some() && nc3 != Some(':') {
                                rdelimiter_missing = false;
                            }
                        }
                    }
                } else {
                    // no quote anywhere ahead; a ':' means the whole output
                    // skipped its quotes systematically
                    let i = self.skip_to_character(':', 1);
                    if self.char_at(i as isize).is_some() {
                        self.repair(
                            RepairErrorKind::UnterminatedString,
                            "While parsing a string missing the left delimiter in object value context, we found a , or } and we couldn't determine that a right delimiter was present. Stopping here",
                        )?;
                        break;
                    }
                    let i = self.skip_whitespaces_at(1, false);
                    let j = self.skip_to_character('}', i);
                    if j - i > 1 {
                        rdelimiter_missing = false;
                    } else if self.char_at(j as isize).is_some() {
                        // an unmatched '{' inside means the brace is content
                        for prev in string_acc.chars().rev() {
                            if prev == '{' {
                                rdelimiter_missing = false;
                                break;
                            }
                        }
                    }
                }
                if rdelimiter_missing {
                    self.repair(
                        RepairErrorKind::UnterminatedString,
                        "While parsing a string missing the left delimiter in object value context, we found a , or } and we couldn't determine that a right delimiter was present. Stopping here",
                    )?;
                    break;
                }
            }

            // a ']' inside an array with no closing quote anywhere ahead
            if !self.opts.stream_stable
                && c == ']'
                && self.context.is_any(ContextValue::Array)
                && !ends_with_any(&string_acc, &quotes)
            {
                let i = self.skip_to_quote(&quotes, 0);
                if self.char_at(i as isize).is_none() {
                    self.repair(
                        RepairErrorKind::UnterminatedString,
                        "While parsing a string inside an array, we found a ] with no closing quote ahead, stopping here",
                    )?;
                    break;
                }
            }

            // a '}' that really closes the surrounding object
            if self.context.is_current(ContextValue::ObjectValue) && c == '}' {
                let i = self.skip_whitespaces_at(1, false);
                let nc = self.char_at(i as isize);
                if nc == Some('`')
                    && self.char_at(i as isize + 1) == Some('`')
                    && self.char_at(i as isize + 2) == Some('`')
                {
                    self.repair(
                        RepairErrorKind::UnterminatedString,
                        "While parsing a string in object value context, we found a } that closes the object before code fences, stopping here",
                    )?;
                    break;
                }
                if nc.is_none() {
                    self.repair(
                        RepairErrorKind::UnterminatedString,
                        "While parsing a string in object value context, we found a } that closes the object, stopping here",
                    )?;
                    break;
                }
            }

            string_acc.push(c);
            self.index += 1;
            ch = self.char_at(0);

            // an unclosed string ending in '\' stays stable while a stream
            // grows
            if self.opts.stream_stable && ch.is_none() && string_acc.ends_with('\\') {
                string_acc.pop();
            }

            // escape sequences, including the doubly-escaped kind
            if let Some(c2) = ch {
                if string_acc.ends_with('\\') {
                    if quotes.contains(&c2) || matches!(c2, 't' | 'n' | 'r' | 'b' | 'f' | '/' | '\\')
                    {
                        string_acc.pop();
                        string_acc.push(match c2 {
                            't' => '\t',
                            'n' => '\n',
                            'r' => '\r',
                            'b' => '\u{0008}',
                            'f' => '\u{000C}',
                            other => other,
                        });
                        self.index += 1;
                        ch = self.char_at(0);
                        // collapse one layer of doubled escaping: \\" -> "
                        while let Some(c3) = ch {
                            if string_acc.ends_with('\\') && (quotes.contains(&c3) || c3 == '\\') {
                                string_acc.pop();
                                string_acc.push(c3);
                                self.index += 1;
                                ch = self.char_at(0);
                            } else {
                                break;
                            }
                        }
                        continue;
                    }
                    if matches!(c2, 'u' | 'x') {
                        if let Some(next) = self.decode_hex_escape(c2, &mut string_acc)? {
                            ch = next;
                            continue;
                        }
                    } else if self.is_string_delimiter(c2) && !quotes.contains(&c2) {
                        self.repair(
                            RepairErrorKind::Parse("Escaped quote of the wrong kind".to_string()),
                            "Found a delimiter that was escaped but shouldn't be escaped, removing the escape",
                        )?;
                        string_acc.pop();
                        string_acc.push(c2);
                        self.index += 1;
                        ch = self.char_at(0);
                        continue;
                    }
                    // unknown escapes stay exactly as written
                }
            }

            // a ':' in key position can mean the key lost its right quote
            if ch == Some(':')
                && !missing_quotes
                && self.context.is_current(ContextValue::ObjectKey)
            {
                let i = self.skip_to_quote(&quotes, 1);
                if self.char_at(i as isize).is_some() {
                    let i2 = self.skip_to_quote(&quotes, i + 1);
                    if self.char_at(i2 as isize).is_some() {
                        let i3 = self.skip_whitespaces_at(i2 + 1, false);
                        let nc = self.char_at(i3 as isize);
                        if matches!(nc, Some(',') | Some('}')) {
                            self.repair(
                                RepairErrorKind::UnterminatedString,
                                "While parsing a string missing the right delimiter in object key context, we found a :, stopping here",
                            )?;
                            break;
                        }
                    }
                } else {
                    self.repair(
                        RepairErrorKind::UnterminatedString,
                        "While parsing a string missing the right delimiter in object key context, we found a :, stopping here",
                    )?;
                    break;
                }
            }

            // a quote that might close the string, or might not
            let Some(c2) = ch else { continue };
            if !quotes.contains(&c2) || string_acc.ends_with('\\') {
                continue;
            }
            if doubled_quotes && self.char_at(1).map_or(false, |n| quotes.contains(&n)) {
                self.repair(
                    RepairErrorKind::Parse("Doubled quotes".to_string()),
                    "While parsing a string, we found a doubled quote, ignoring it",
                )?;
                self.index += 1;
                // the quote under the cursor still terminates the loop
            } else if missing_quotes && self.context.is_current(ContextValue::ObjectValue) {
                // with no opening quote, this might open the *next* key
                let mut i = 1usize;
                loop {
                    match self.char_at(i as isize) {
                        None => break,
                        Some(n) if quotes.contains(&n) => break,
                        Some(_) => i += 1,
                    }
                }
                if self.char_at(i as isize).is_some() {
                    let i2 = self.skip_whitespaces_at(i + 1, false);
                    if self.char_at(i2 as isize) == Some(':') {
                        self.index -= 1;
                        ch = self.char_at(0);
                        self.repair(
                            RepairErrorKind::UnterminatedString,
                            "In a string with missing quotes and object value context, I found a delimiter but it turns out it was the beginning of the next key. Stopping here",
                        )?;
                        break;
                    }
                }
            } else if unmatched_delimiter {
                unmatched_delimiter = false;
                string_acc.push(c2);
                self.index += 1;
                ch = self.char_at(0);
            } else {
                // scan ahead: if no other quote shows up before a structural
                // character, this one closes the string
                let mut i = 1usize;
                let mut check_comma_in_object_value = true;
                let nc = loop {
                    match self.char_at(i as isize) {
                        None => break None,
                        Some(n) if quotes.contains(&n) => break Some(n),
                        Some(n) => {
                            if check_comma_in_object_value && n.is_alphabetic() {
                                check_comma_in_object_value = false;
                            }
                            if (self.context.is_any(ContextValue::ObjectKey)
                                && (n == ':' || n == '}'))
                                || (self.context.is_any(ContextValue::ObjectValue) && n == '}')
                                || (self.context.is_any(ContextValue::Array)
                                    && (n == ']' || n == ','))
                                || (check_comma_in_object_value
                                    && self.context.is_current(ContextValue::ObjectValue)
                                    && n == ',')
                            {
                                break Some(n);
                            }
                            i += 1;
                        }
                    }
                };
                let nc_is_quote = nc.map_or(false, |n| quotes.contains(&n));
                if nc == Some(',') && self.context.is_current(ContextValue::ObjectValue) {
                    // the comma may still belong to the string when the real
                    // quote closes the last member of the object
                    let i2 = self.skip_to_quote(&quotes, i + 1);
                    let i3 = self.skip_whitespaces_at(i2 + 1, false);
                    if matches!(self.char_at(i3 as isize), Some('}') | Some(',')) {
                        self.repair(
                            RepairErrorKind::Parse("Misplaced quote".to_string()),
                            "While parsing a string, we found a misplaced quote that would have closed the string but has a different meaning here, ignoring it",
                        )?;
                        string_acc.push(c2);
                        self.index += 1;
                        ch = self.char_at(0);
                        continue;
                    }
                } else if nc_is_quote && self.char_at(i as isize - 1) != Some('\\') {
                    // only whitespace up to the next quote: this one closes
                    let mut all_ws = true;
                    for j in 1..i {
                        if let Some(cj) = self.char_at(j as isize) {
                            if !cj.is_whitespace() {
                                all_ws = false;
                                break;
                            }
                        }
                    }
                    if all_ws {
                        break;
                    }
                    match self.context.current() {
                        Some(ContextValue::ObjectValue) => {
                            let i4 = self.skip_whitespaces_at(i + 1, false);
                            if self.char_at(i4 as isize) == Some(',') {
                                // the "va"lue", shape: is a proper key coming next?
                                let i5 = self.skip_to_quote(&quotes, i4 + 1);
                                let i6 = self.skip_to_quote(&quotes, i5 + 2);
                                let i7 = self.skip_whitespaces_at(i6 + 1, false);
                                if self.char_at(i7 as isize) == Some(':') {
                                    self.repair(
                                        RepairErrorKind::Parse("Misplaced quote".to_string()),
                                        "While parsing a string, we found a misplaced quote that would have closed the string but has a different meaning here, ignoring it",
                                    )?;
                                    string_acc.push(c2);
                                    self.index += 1;
                                    ch = self.char_at(0);
                                    continue;
                                }
                            }
                            // a quote followed (eventually) by ':' means a
                            // key; only without one the quote is misplaced
                            let mut i8 = self.skip_to_quote(&quotes, i + 1) + 1;
                            let nc8 = loop {
                                match self.char_at(i8 as isize) {
                                    None => break None,
                                    Some(':') => break Some(':'),
                                    Some(n) if matches!(n, ',' | ']' | '}') => break Some(n),
                                    Some(n) => {
                                        if quotes.contains(&n)
                                            && self.char_at(i8 as isize - 1) != Some('\\')
                                        {
                                            break Some(n);
                                        }
                                        i8 += 1;
                                    }
                                }
                            };
                            if nc8 != Some(':') {
                                self.repair(
                                    RepairErrorKind::Parse("Misplaced quote".to_string()),
                                    "While parsing a string, we found a misplaced quote that would have closed the string but has a different meaning here, ignoring it",
                                )?;
                                unmatched_delimiter = !unmatched_delimiter;
                                string_acc.push(c2);
                                self.index += 1;
                                ch = self.char_at(0);
                            }
                        }
                        Some(ContextValue::Array) => {
                            // ["bla "puppy" bla "kitty" bla"]: an even count
                            // of quotes up to the ']' marks interior quotes
                            let mut even_delimiters = true;
                            let mut i9 = i;
                            let mut nc9 = nc;
                            let mut targets = quotes.clone();
                            targets.push(']');
                            while nc9.map_or(false, |n| quotes.contains(&n)) {
                                i9 = self.skip_to_one_of(&targets, i9 + 1);
                                nc9 = self.char_at(i9 as isize);
                                if nc9.map_or(true, |n| !quotes.contains(&n)) {
                                    even_delimiters = false;
                                    break;
                                }
                                i9 = self.skip_to_one_of(&targets, i9 + 1);
                                nc9 = self.char_at(i9 as isize);
                            }
                            if even_delimiters {
                                self.repair(
                                    RepairErrorKind::Parse("Misplaced quote".to_string()),
                                    "While parsing a string in array context, we detected a quoted section that would have closed the string but has a different meaning here, ignoring it",
                                )?;
                                unmatched_delimiter = !unmatched_delimiter;
                                string_acc.push(c2);
                                self.index += 1;
                                ch = self.char_at(0);
                            } else {
                                break;
                            }
                        }
                        Some(ContextValue::ObjectKey) => {
                            self.repair(
                                RepairErrorKind::Parse("Misplaced quote".to_string()),
                                "While parsing a string in object key context, we detected a quoted section that would have closed the string but has a different meaning here, ignoring it",
                            )?;
                            string_acc.push(c2);
                            self.index += 1;
                            ch = self.char_at(0);
                        }
                        _ => {}
                    }
                }
            }
        }

        // a bareword key that turned out to be prose: invalidate it
        if let Some(c) = ch {
            if missing_quotes
                && self.context.is_current(ContextValue::ObjectKey)
                && c.is_whitespace()
            {
                self.repair(
                    RepairErrorKind::Parse("Prose instead of key".to_string()),
                    "While parsing a string, handling an extreme corner case in which the LLM added a comment instead of valid string, invalidate the string and return an empty value",
                )?;
                self.skip_whitespaces();
                if !matches!(self.char_at(0), Some(':') | Some(',')) {
                    return Ok(empty());
                }
            }
        }

        if !ch.map_or(false, |c| quotes.contains(&c)) {
            if !self.opts.stream_stable {
                self.repair(
                    RepairErrorKind::UnterminatedString,
                    "While parsing a string, we missed the closing quote, ignoring",
                )?;
                let trimmed = string_acc.trim_end().len();
                string_acc.truncate(trimmed);
            }
        } else {
            self.index += 1;
        }

        if !self.opts.stream_stable && (missing_quotes || string_acc.ends_with('\n')) {
            let trimmed = string_acc.trim_end().len();
            string_acc.truncate(trimmed);
        }

        Ok(Value::String(string_acc))
    }

    /// `\uXXXX` (with surrogate pairs) and the nonstandard `\xXX`. The
    /// backslash is already in `string_acc`; the cursor sits on the `u`/`x`.
    /// Returns the character now under the cursor when the escape was
    /// decoded, `None` when the digits were invalid and nothing changed.
    fn decode_hex_escape(
        &mut self,
        kind: char,
        string_acc: &mut String,
    ) -> PResult<Option<Option<char>>> {
        let num_chars = if kind == 'u' { 4 } else { 2 };
        let hex = self.slice(self.index + 1, self.index + 1 + num_chars);
        if hex.chars().count() != num_chars || !hex.chars().all(|h| h.is_ascii_hexdigit()) {
            return Ok(None);
        }
        let code = u32::from_str_radix(&hex, 16).unwrap_or(0);
        if kind == 'x' {
            self.repair(
                RepairErrorKind::Parse("Nonstandard \\x escape".to_string()),
                "Found a hex escape sequence, normalizing it",
            )?;
        }
        string_acc.pop();
        if (0xD800..=0xDBFF).contains(&code) {
            // a high surrogate: pair it with the \uXXXX that should follow
            if self.char_at(5) == Some('\\') && self.char_at(6) == Some('u') {
                let lo_hex = self.slice(self.index + 7, self.index + 11);
                if lo_hex.chars().count() == 4 && lo_hex.chars().all(|h| h.is_ascii_hexdigit()) {
                    let lo = u32::from_str_radix(&lo_hex, 16).unwrap_or(0);
                    if (0xDC00..=0xDFFF).contains(&lo) {
                        let combined = 0x1_0000 + ((code - 0xD800) << 10) + (lo - 0xDC00);
                        if let Some(decoded) = char::from_u32(combined) {
                            string_acc.push(decoded);
                            self.index += 1 + num_chars + 6;
                            return Ok(Some(self.char_at(0)));
                        }
                    }
                }
            }
            self.repair(
                RepairErrorKind::Parse("Lone surrogate".to_string()),
                "Found a lone surrogate escape, replacing it",
            )?;
            string_acc.push('\u{FFFD}');
            self.index += 1 + num_chars;
            return Ok(Some(self.char_at(0)));
        }
        if (0xDC00..=0xDFFF).contains(&code) {
            self.repair(
                RepairErrorKind::Parse("Lone surrogate".to_string()),
                "Found a lone surrogate escape, replacing it",
            )?;
            string_acc.push('\u{FFFD}');
            self.index += 1 + num_chars;
            return Ok(Some(self.char_at(0)));
        }
        match char::from_u32(code) {
            Some(decoded) => string_acc.push(decoded),
            None => string_acc.push('\u{FFFD}'),
        }
        self.index += 1 + num_chars;
        Ok(Some(self.char_at(0)))
    }

    /// Strip a markdown fence opener (backticks plus an optional language
    /// tag), parse the fenced body as a value, and consume the closing fence
    /// when there is one.
    fn parse_fenced_block(&mut self) -> PResult<Value> {
        let fence_start = self.index;
        self.repair_at(
            RepairErrorKind::Comment,
            fence_start,
            "Found a markdown code fence around the JSON, stripping it",
        )?;
        // tolerate more than three backticks
        while self.char_at(0) == Some('`') {
            self.index += 1;
        }
        // optional language token, spaces and one newline
        while self
            .char_at(0)
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.index += 1;
        }
        while matches!(self.char_at(0), Some(' ') | Some('\t')) {
            self.index += 1;
        }
        if self.char_at(0) == Some('\r') {
            self.index += 1;
        }
        if self.char_at(0) == Some('\n') {
            self.index += 1;
        }
        let value = self.parse_json()?;
        self.skip_whitespaces();
        while self.char_at(0) == Some('`') {
            self.index += 1;
        }
        Ok(value)
    }

    pub(super) fn skip_to_quote(&mut self, quotes: &[char], mut idx: usize) -> usize {
        loop {
            match self.char_at(idx as isize) {
                None => return idx,
                Some(c) if quotes.contains(&c) => return idx,
                Some(_) => idx += 1,
            }
        }
    }
}
