//! Entry-point plumbing: the conformant fast path, parser construction and
//! the repair log type.

use std::fs;
use std::io::BufReader;
use std::path::Path;

use crate::error::RepairError;
use crate::options::Options;
use crate::parser::cursor::Source;
use crate::parser::Parser;
use crate::value::Value;

/// One record per repair: which heuristic fired and the input around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairLogEntry {
    pub message: String,
    pub context: String,
}

pub(crate) fn repair_to_value(input: &str, opts: &Options) -> Result<Value, RepairError> {
    // Fast path: strictly valid input never reaches the repair engine, so
    // behavior on valid documents is exactly the conformant decoder's.
    if !opts.skip_initial_validation {
        if let Ok(v) = serde_json::from_str::<serde_json::Value>(input) {
            return Ok(Value::from(v));
        }
    }
    let mut parser = Parser::new(Source::from_text(input), opts);
    parser.parse()
}

pub(crate) fn repair_to_value_with_log(
    input: &str,
    opts: &Options,
) -> Result<(Value, Vec<RepairLogEntry>), RepairError> {
    let mut opts = opts.clone();
    opts.logging = true;
    if !opts.skip_initial_validation {
        if let Ok(v) = serde_json::from_str::<serde_json::Value>(input) {
            return Ok((Value::from(v), Vec::new()));
        }
    }
    let mut parser = Parser::new(Source::from_text(input), &opts);
    let value = parser.parse()?;
    Ok((value, parser.into_log()))
}

pub(crate) fn load_file(path: &Path, opts: &Options) -> Result<Value, RepairError> {
    if !opts.skip_initial_validation {
        let file = fs::File::open(path)?;
        if let Ok(v) = serde_json::from_reader::<_, serde_json::Value>(BufReader::new(file)) {
            return Ok(Value::from(v));
        }
    }
    let source = Source::from_file(path, opts.chunk_size())?;
    let mut parser = Parser::new(source, opts);
    let value = parser.parse()?;
    // a read failure mid-parse surfaces here instead of truncating silently
    if let Some(err) = parser.take_io_error() {
        return Err(err.into());
    }
    Ok(value)
}
