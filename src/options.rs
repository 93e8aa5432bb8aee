#[derive(Clone, Debug)]
pub struct Options {
    /// Skip the initial conformant decode. By default valid JSON is parsed by
    /// serde_json and returned untouched; the repair engine never runs.
    pub skip_initial_validation: bool,
    /// Refuse to repair: the first anomaly becomes a fatal `RepairError`
    /// carrying position and reason.
    pub strict: bool,
    /// When multiple top-level values appear, return only the first and stop.
    /// Also keeps unterminated strings byte-stable while a stream grows
    /// (no trailing-whitespace trimming, trailing lone backslash dropped).
    pub stream_stable: bool,
    /// Escape non-ASCII characters in serialized output as \uXXXX.
    pub ensure_ascii: bool,
    /// Pretty-print serialized output with this many spaces per level.
    pub indent: Option<usize>,
    /// Record repair log entries. Retrieve them with the `_with_log` entry
    /// points.
    pub logging: bool,
    /// Characters captured on each side of the position in log context
    /// snippets.
    pub log_context_window: usize,
    /// Container nesting bound. Beyond it, an opening bracket is treated as a
    /// stray character (fatal in strict mode).
    pub max_depth: usize,
    /// Fancy quote characters and the straight quote each one stands for.
    /// Quotes mapping to the same canonical quote open and close each other.
    pub fancy_quotes: Vec<(char, char)>,
    /// Chunk length in bytes for paged file reads. 0 means the 1 MiB default.
    pub file_chunk_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            skip_initial_validation: false,
            strict: false,
            stream_stable: false,
            ensure_ascii: false,
            indent: None,
            logging: false,
            log_context_window: 10,
            max_depth: 512,
            fancy_quotes: vec![
                ('\u{201C}', '"'),  // “
                ('\u{201D}', '"'),  // ”
                ('\u{2018}', '\''), // ‘
                ('\u{2019}', '\''), // ’
            ],
            file_chunk_size: 0,
        }
    }
}

impl Options {
    pub(crate) fn chunk_size(&self) -> usize {
        if self.file_chunk_size < 2 {
            1_000_000
        } else {
            self.file_chunk_size
        }
    }
}
