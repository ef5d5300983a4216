//! Error vocabulary shared across crates
//!
//! Library crates keep their own `thiserror` enums; each variant maps onto
//! one [`ErrorKind`] so callers see a stable set of names on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable error kind names reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The requested path does not exist or is not a directory
    DirectoryNotFound,
    /// The directory holds no file the sniffer could classify
    NoAudioFiles,
    /// Every classified file failed extraction
    NoUsableMetadata,
    /// File extension and signature match no known container family
    UnsupportedFormat,
    /// ID3v2 header or frame structure is broken
    MalformedId3Tag,
    /// No MPEG audio frame could be located
    MalformedMpegStream,
    /// FLAC stream lacks its mandatory STREAMINFO block
    MissingStreamInfo,
    /// FLAC signature or metadata block chain is broken
    MalformedFlacStream,
    /// APEv2 footer found but its size or items are inconsistent
    CorruptApeFooter,
    /// WavPack file does not start with a `wvpk` block
    MissingWavPackHeader,
    /// DSF `DSD ` or `fmt ` chunk is broken
    MalformedDsfChunk,
    /// Declared track totals disagree across files
    InconsistentTrackTotal,
    /// Request command is not recognized
    UnknownCommand,
    /// Request envelope or parameters are malformed
    InvalidParams,
    /// Underlying I/O failure
    Io,
    /// Unexpected internal failure
    Internal,
}

impl ErrorKind {
    /// Name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DirectoryNotFound => "DirectoryNotFound",
            ErrorKind::NoAudioFiles => "NoAudioFiles",
            ErrorKind::NoUsableMetadata => "NoUsableMetadata",
            ErrorKind::UnsupportedFormat => "UnsupportedFormat",
            ErrorKind::MalformedId3Tag => "MalformedId3Tag",
            ErrorKind::MalformedMpegStream => "MalformedMpegStream",
            ErrorKind::MissingStreamInfo => "MissingStreamInfo",
            ErrorKind::MalformedFlacStream => "MalformedFlacStream",
            ErrorKind::CorruptApeFooter => "CorruptApeFooter",
            ErrorKind::MissingWavPackHeader => "MissingWavPackHeader",
            ErrorKind::MalformedDsfChunk => "MalformedDsfChunk",
            ErrorKind::InconsistentTrackTotal => "InconsistentTrackTotal",
            ErrorKind::UnknownCommand => "UnknownCommand",
            ErrorKind::InvalidParams => "InvalidParams",
            ErrorKind::Io => "Io",
            ErrorKind::Internal => "Internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured error or warning attached to one file (or none)
///
/// Used both for per-file diagnostics next to an assembled release and
/// for the body of an error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error kind name
    pub kind: ErrorKind,

    /// Human-readable description
    pub message: String,

    /// File name the diagnostic refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic not tied to a file
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            file: None,
        }
    }

    /// Attach the file name
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// Returned when a string names no supported container family
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown container format: {0}")]
pub struct UnknownFormat(pub String);
