//! Character-indexed view over the input.
//!
//! The parsers only ever ask two things: "which character sits at offset N"
//! and "give me the characters in this range". For in-memory input that is a
//! decoded char vector; for files it is a paging layer that reads fixed-size
//! byte chunks on demand, keeps a couple of them decoded, and re-reads
//! evicted chunks when a heuristic looks that far back.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

pub(crate) enum Source {
    Text(Vec<char>),
    File(PagedFile),
}

impl Source {
    pub(crate) fn from_text(input: &str) -> Self {
        Source::Text(input.chars().collect())
    }

    pub(crate) fn from_file(path: &Path, chunk_bytes: usize) -> io::Result<Self> {
        Ok(Source::File(PagedFile::open(path, chunk_bytes)?))
    }

    pub(crate) fn char_at(&mut self, idx: usize) -> Option<char> {
        match self {
            Source::Text(chars) => chars.get(idx).copied(),
            Source::File(paged) => paged.char_at(idx),
        }
    }

    /// Clamped slice; used for log context windows and escape digits.
    pub(crate) fn window(&mut self, start: usize, end: usize) -> String {
        match self {
            Source::Text(chars) => {
                let start = start.min(chars.len());
                let end = end.min(chars.len()).max(start);
                chars[start..end].iter().collect()
            }
            Source::File(paged) => {
                let mut out = String::new();
                for idx in start..end {
                    match paged.char_at(idx) {
                        Some(c) => out.push(c),
                        None => break,
                    }
                }
                out
            }
        }
    }

    /// A read failure mid-parse poisons the source (the parsers just see
    /// end-of-input); the entry point picks the error up afterwards.
    pub(crate) fn take_io_error(&mut self) -> Option<io::Error> {
        match self {
            Source::Text(_) => None,
            Source::File(paged) => paged.error.take(),
        }
    }
}

pub(crate) struct PagedFile {
    file: File,
    chunk_bytes: usize,
    /// Chunks currently decoded in memory, keyed by chunk index.
    chunks: HashMap<usize, Vec<char>>,
    /// Load order for oldest-first eviction.
    order: Vec<usize>,
    /// Byte offset where each discovered chunk starts, plus one trailing
    /// entry for the start of the next undiscovered chunk.
    byte_starts: Vec<u64>,
    /// Char offset of each discovered chunk, same shape as `byte_starts`.
    char_starts: Vec<usize>,
    total_chars: Option<usize>,
    max_cached: usize,
    error: Option<io::Error>,
}

impl PagedFile {
    fn open(path: &Path, chunk_bytes: usize) -> io::Result<Self> {
        let file = File::open(path)?;
        // a chunk must be able to hold at least one UTF-8 character
        let chunk_bytes = chunk_bytes.max(8);
        Ok(Self {
            file,
            chunk_bytes,
            chunks: HashMap::new(),
            order: Vec::new(),
            byte_starts: vec![0],
            char_starts: vec![0],
            total_chars: None,
            max_cached: (2_000_000 / chunk_bytes).max(2),
            error: None,
        })
    }

    fn char_at(&mut self, idx: usize) -> Option<char> {
        if self.error.is_some() {
            return None;
        }
        loop {
            if let Some(total) = self.total_chars {
                if idx >= total {
                    return None;
                }
            }
            let discovered_end = *self.char_starts.last()?;
            if idx < discovered_end {
                let chunk_idx = match self.char_starts.binary_search(&idx) {
                    Ok(i) => i,
                    Err(i) => i - 1,
                };
                let offset = idx - self.char_starts[chunk_idx];
                return self.chunk(chunk_idx)?.get(offset).copied();
            }
            if !self.read_next_chunk() {
                return None;
            }
        }
    }

    /// Chunk by index, re-reading it if it was evicted.
    fn chunk(&mut self, chunk_idx: usize) -> Option<&Vec<char>> {
        if !self.chunks.contains_key(&chunk_idx) {
            let start = self.byte_starts[chunk_idx];
            let len = (self.byte_starts[chunk_idx + 1] - start) as usize;
            match self.read_decoded(start, len) {
                Ok((chars, _)) => self.insert_chunk(chunk_idx, chars),
                Err(err) => {
                    self.error = Some(err);
                    return None;
                }
            }
        }
        self.chunks.get(&chunk_idx)
    }

    fn read_next_chunk(&mut self) -> bool {
        let chunk_idx = self.char_starts.len() - 1;
        let start = self.byte_starts[chunk_idx];
        match self.read_decoded(start, self.chunk_bytes) {
            Ok((chars, consumed)) => {
                if chars.is_empty() {
                    self.total_chars = Some(self.char_starts[chunk_idx]);
                    return false;
                }
                self.byte_starts.push(start + consumed as u64);
                self.char_starts
                    .push(self.char_starts[chunk_idx] + chars.len());
                self.insert_chunk(chunk_idx, chars);
                true
            }
            Err(err) => {
                self.error = Some(err);
                false
            }
        }
    }

    /// Read up to `len` bytes at `start` and decode the valid UTF-8 prefix.
    /// Bytes of a character cut at the chunk boundary stay for the next
    /// chunk; actually invalid UTF-8 is an error.
    fn read_decoded(&mut self, start: u64, len: usize) -> io::Result<(Vec<char>, usize)> {
        self.file.seek(SeekFrom::Start(start))?;
        let mut buf = vec![0u8; len];
        let mut filled = 0usize;
        while filled < len {
            let n = self.file.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        buf.truncate(filled);
        match std::str::from_utf8(&buf) {
            Ok(text) => Ok((text.chars().collect(), filled)),
            Err(err) => {
                let valid = err.valid_up_to();
                if err.error_len().is_some() || valid == 0 {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "input file is not valid UTF-8",
                    ));
                }
                let text = std::str::from_utf8(&buf[..valid])
                    .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "utf-8 decode"))?;
                Ok((text.chars().collect(), valid))
            }
        }
    }

    fn insert_chunk(&mut self, chunk_idx: usize, chars: Vec<char>) {
        self.chunks.insert(chunk_idx, chars);
        self.order.retain(|i| *i != chunk_idx);
        self.order.push(chunk_idx);
        while self.chunks.len() > self.max_cached {
            let Some(pos) = self.order.iter().position(|i| *i != chunk_idx) else {
                break;
            };
            let evicted = self.order.remove(pos);
            self.chunks.remove(&evicted);
        }
    }
}
