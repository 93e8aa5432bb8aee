//! Fault-tolerant JSON decoding for the JSON that LLMs actually emit:
//! unbalanced brackets, unterminated strings, single or fancy quotes, stray
//! prose, trailing commas, comments, markdown fences, concatenated values
//! and truncated numbers. The repairing parser resolves every ambiguity with
//! a deterministic heuristic and returns either a [`Value`] tree or
//! serialized JSON text; strictly valid input round-trips through a
//! conformant decoder untouched.
//!
//! ```
//! use jsonmend::{repair, Options};
//!
//! let out = repair("{'answer': 42,}", &Options::default()).unwrap();
//! assert_eq!(out, r#"{"answer": 42}"#);
//! ```

pub mod cli;
mod emit;
mod error;
mod options;
mod parser;
mod repair;
mod value;

pub use error::{RepairError, RepairErrorKind};
pub use options::Options;
pub use repair::RepairLogEntry;
pub use value::{Array, Map, Number, Value};

use std::path::Path;

/// Repair `input` and serialize the result back to JSON text.
pub fn repair(input: &str, opts: &Options) -> Result<String, RepairError> {
    let value = repair::repair_to_value(input, opts)?;
    Ok(emit::JsonWriter::from_options(opts).to_string(&value))
}

/// Repair `input` and return the value tree directly.
pub fn repair_to_value(input: &str, opts: &Options) -> Result<Value, RepairError> {
    repair::repair_to_value(input, opts)
}

/// Like [`repair`], also returning one log entry per repair performed.
pub fn repair_with_log(
    input: &str,
    opts: &Options,
) -> Result<(String, Vec<RepairLogEntry>), RepairError> {
    let (value, log) = repair::repair_to_value_with_log(input, opts)?;
    Ok((emit::JsonWriter::from_options(opts).to_string(&value), log))
}

/// Like [`repair_to_value`], also returning the repair log.
pub fn repair_to_value_with_log(
    input: &str,
    opts: &Options,
) -> Result<(Value, Vec<RepairLogEntry>), RepairError> {
    repair::repair_to_value_with_log(input, opts)
}

/// Read and repair a file. Large files are paged in chunks instead of being
/// read whole, so peak memory stays proportional to the produced value.
pub fn load_file(path: impl AsRef<Path>, opts: &Options) -> Result<Value, RepairError> {
    repair::load_file(path.as_ref(), opts)
}

/// Serialize a [`Value`] with the formatting options (`indent`,
/// `ensure_ascii`) in `opts`.
pub fn write_json(value: &Value, opts: &Options) -> String {
    emit::JsonWriter::from_options(opts).to_string(value)
}

#[cfg(test)]
mod tests;
