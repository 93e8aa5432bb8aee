use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairErrorKind {
    /// More than one top-level JSON element was found.
    MultipleTopLevel,
    /// The same key appeared twice in one object.
    DuplicateKey(String),
    /// An object member with an empty key.
    EmptyKey,
    /// No ':' between a key and its value.
    MissingColon,
    /// No ',' between two members or elements.
    MissingComma,
    /// A member or element slot with nothing parseable in it.
    EmptyValue,
    /// A string that never found its closing quote.
    UnterminatedString,
    /// Input ended with an object or array still open.
    UnclosedContainer,
    /// Characters that belong to no JSON token (prose, stray punctuation).
    StrayCharacters,
    /// A comment or markdown fence, which strict JSON does not allow.
    Comment,
    /// Container nesting exceeded the configured limit.
    DepthLimit,
    /// Error reported by the underlying file.
    Io(String),
    /// Anything else, with a human-readable reason.
    Parse(String),
}

/// Raised only in strict mode (and for I/O failures): carries the character
/// offset at which the anomaly was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairError {
    pub kind: RepairErrorKind,
    pub position: usize,
}

impl RepairError {
    pub fn new(kind: RepairErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

impl fmt::Display for RepairError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RepairErrorKind::MultipleTopLevel => {
                write!(f, "Multiple top-level JSON elements at position {}", self.position)
            }
            RepairErrorKind::DuplicateKey(k) => {
                write!(f, "Duplicate key found: {:?} at position {}", k, self.position)
            }
            RepairErrorKind::EmptyKey => {
                write!(f, "Empty key found at position {}", self.position)
            }
            RepairErrorKind::MissingColon => {
                write!(f, "Missing ':' after key at position {}", self.position)
            }
            RepairErrorKind::MissingComma => {
                write!(f, "Missing ',' between elements at position {}", self.position)
            }
            RepairErrorKind::EmptyValue => {
                write!(f, "Parsed value is empty at position {}", self.position)
            }
            RepairErrorKind::UnterminatedString => {
                write!(f, "Unterminated string at position {}", self.position)
            }
            RepairErrorKind::UnclosedContainer => {
                write!(f, "Unclosed object or array at position {}", self.position)
            }
            RepairErrorKind::StrayCharacters => {
                write!(f, "Unexpected characters at position {}", self.position)
            }
            RepairErrorKind::Comment => {
                write!(f, "Comment not allowed at position {}", self.position)
            }
            RepairErrorKind::DepthLimit => {
                write!(f, "Nesting depth limit exceeded at position {}", self.position)
            }
            RepairErrorKind::Io(msg) => write!(f, "I/O error: {}", msg),
            RepairErrorKind::Parse(msg) => write!(f, "{} at position {}", msg, self.position),
        }
    }
}

impl std::error::Error for RepairError {}

impl From<std::io::Error> for RepairError {
    fn from(err: std::io::Error) -> Self {
        RepairError::new(RepairErrorKind::Io(err.to_string()), 0)
    }
}
