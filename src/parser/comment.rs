//! `// …`, `# …` and `/* … */` comments, treated as whitespace.

use super::context::ContextValue;
use super::{PResult, Parser};
use crate::error::RepairErrorKind;

impl<'o> Parser<'o> {
    /// Skip one comment. Line comments end at a newline, or earlier at the
    /// structural character that would close the surrounding context, so a
    /// comment can never swallow the `}`/`]`/`:` the container still needs.
    pub(super) fn parse_comment(&mut self) -> PResult<()> {
        let start = self.index;
        let mut termination_characters = vec!['\n', '\r'];
        if self.context.is_any(ContextValue::Array) {
            termination_characters.push(']');
        }
        if self.context.is_any(ContextValue::ObjectValue) {
            termination_characters.push('}');
        }
        if self.context.is_any(ContextValue::ObjectKey) {
            termination_characters.push(':');
        }
        match self.char_at(0) {
            Some('#') => {
                let mut comment = String::new();
                while let Some(c) = self.char_at(0) {
                    if termination_characters.contains(&c) {
                        break;
                    }
                    comment.push(c);
                    self.index += 1;
                }
                self.repair_at(
                    RepairErrorKind::Comment,
                    start,
                    format!("Found line comment: {}, ignoring", comment),
                )?;
            }
            Some('/') => match self.char_at(1) {
                Some('/') => {
                    let mut comment = String::from("//");
                    self.index += 2;
                    while let Some(c) = self.char_at(0) {
                        if termination_characters.contains(&c) {
                            break;
                        }
                        comment.push(c);
                        self.index += 1;
                    }
                    self.repair_at(
                        RepairErrorKind::Comment,
                        start,
                        format!("Found line comment: {}, ignoring", comment),
                    )?;
                }
                Some('*') => {
                    let mut comment = String::from("/*");
                    self.index += 2;
                    loop {
                        match self.char_at(0) {
                            None => {
                                self.repair_at(
                                    RepairErrorKind::Comment,
                                    start,
                                    "Reached end-of-input while parsing a block comment; unclosed block comment",
                                )?;
                                break;
                            }
                            Some(c) => {
                                comment.push(c);
                                self.index += 1;
                                if comment.ends_with("*/") {
                                    break;
                                }
                            }
                        }
                    }
                    if comment.ends_with("*/") {
                        self.repair_at(
                            RepairErrorKind::Comment,
                            start,
                            format!("Found block comment: {}, ignoring", comment),
                        )?;
                    }
                }
                _ => {
                    // a lone slash that never became a comment
                    self.repair(RepairErrorKind::StrayCharacters, "Found a stray '/', ignoring it")?;
                    self.index += 1;
                }
            },
            _ => {}
        }
        Ok(())
    }
}
