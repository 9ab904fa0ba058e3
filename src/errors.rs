use std::fmt;
use thiserror::Error;

/// Error type for VGM decoding and serialization.
///
/// Every failure the codec can report is a distinct variant carrying enough
/// context (offsets, opcode values, field names) for a caller to diagnose the
/// input without re-parsing it. Errors also expose a stable numeric code for
/// programmatic handling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VgmError {
    // ========== I/O ERRORS (1000-1099) ==========
    /// Error reading file contents
    #[error("Failed to read file {path}: {reason}")]
    FileRead { path: String, reason: String },

    /// Error writing serialized output to a sink
    #[error("Failed to write VGM output: {reason}")]
    SinkWrite { reason: String },

    // ========== CONTAINER ERRORS (2000-2099) ==========
    /// Neither the VGM magic nor a gzip stream wrapping one was found
    #[error("Not a valid VGM container: {reason}")]
    InvalidContainer { reason: String },

    /// Buffer ends before the fixed header region
    #[error("Truncated VGM header: {needed} bytes required, only {available} available")]
    TruncatedHeader { needed: usize, available: usize },

    /// A computed read fell outside the buffer
    #[error("Read out of range at {context}: offset {offset} + {needed} bytes exceeds buffer of {available}")]
    OffsetOutOfRange {
        context: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    // ========== VERSION ERRORS (3000-3099) ==========
    /// Decoded version is not in the recognized set
    #[error("VGM version {version_str} (0x{version:08X}) is not supported")]
    UnsupportedVersion { version: u32, version_str: String },

    // ========== TAG BLOCK ERRORS (4000-4099) ==========
    /// GD3 payload did not yield the fixed field count
    #[error("Malformed GD3 tag block: expected {expected} fields, found {found}")]
    MalformedGd3 { expected: usize, found: usize },

    /// A GD3 field contained invalid UTF-16 data
    #[error("Invalid UTF-16 in GD3 field '{field}'")]
    InvalidUtf16 { field: &'static str },

    // ========== COMMAND STREAM ERRORS (5000-5099) ==========
    /// Opcode outside every enumerated range
    #[error("Unknown command opcode 0x{opcode:02X} at position {position}")]
    UnknownOpcode { opcode: u8, position: usize },

    /// Stream ended inside a command's operand or sub-block
    #[error("Incomplete command 0x{opcode:02X} at position {position}: {needed} operand bytes expected, {available} available")]
    IncompleteCommand {
        opcode: u8,
        position: usize,
        needed: usize,
        available: usize,
    },

    // ========== SERIALIZATION ERRORS (6000-6099) ==========
    /// A header field required by the format table is missing from the map
    #[error("Header field '{field}' missing from metadata map")]
    MissingHeaderField { field: &'static str },

    /// Save refused because the extracted data block cannot be re-embedded
    #[error("Cannot serialize: file contains a data block, which save does not re-embed")]
    DataBlockPresent,
}

impl VgmError {
    /// Get the error code for machine-readable processing
    pub fn code(&self) -> u16 {
        match self {
            Self::FileRead { .. } => 1001,
            Self::SinkWrite { .. } => 1002,
            Self::InvalidContainer { .. } => 2001,
            Self::TruncatedHeader { .. } => 2002,
            Self::OffsetOutOfRange { .. } => 2003,
            Self::UnsupportedVersion { .. } => 3001,
            Self::MalformedGd3 { .. } => 4001,
            Self::InvalidUtf16 { .. } => 4002,
            Self::UnknownOpcode { .. } => 5001,
            Self::IncompleteCommand { .. } => 5002,
            Self::MissingHeaderField { .. } => 6001,
            Self::DataBlockPresent => 6002,
        }
    }

    /// Get the error category for grouping related errors
    pub fn category(&self) -> ErrorCategory {
        match self.code() {
            1000..=1099 => ErrorCategory::Io,
            2000..=2099 => ErrorCategory::Container,
            3000..=3099 => ErrorCategory::Version,
            4000..=4099 => ErrorCategory::TagBlock,
            5000..=5099 => ErrorCategory::CommandStream,
            6000..=6099 => ErrorCategory::Serialization,
            _ => ErrorCategory::Unknown,
        }
    }
}

/// Error categories for grouping related error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Io,
    Container,
    Version,
    TagBlock,
    CommandStream,
    Serialization,
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "I/O"),
            Self::Container => write!(f, "Container"),
            Self::Version => write!(f, "Version"),
            Self::TagBlock => write!(f, "Tag Block"),
            Self::CommandStream => write!(f, "Command Stream"),
            Self::Serialization => write!(f, "Serialization"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Result type alias for VGM operations
pub type VgmResult<T> = Result<T, VgmError>;
