/// Tag extraction and assembly errors
use mdreader_core::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `TagReadError`
pub type Result<T> = std::result::Result<T, TagReadError>;

/// Failure reading one file
#[derive(Error, Debug)]
pub enum TagReadError {
    /// Extension and signature match no supported family
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// ID3v2 header or frame structure is broken
    #[error("Malformed ID3v2 tag: {0}")]
    MalformedId3(String),

    /// No MPEG audio frame found
    #[error("Malformed MPEG stream: {0}")]
    MalformedMpeg(String),

    /// First FLAC metadata block is not a 34-byte STREAMINFO
    #[error("Missing STREAMINFO block")]
    MissingStreamInfo,

    /// FLAC signature or block chain is broken
    #[error("Malformed FLAC stream: {0}")]
    MalformedFlac(String),

    /// APEv2 footer or item list is inconsistent
    #[error("Corrupt APEv2 footer: {0}")]
    CorruptApeFooter(String),

    /// File does not start with a valid `wvpk` block
    #[error("Missing WavPack block header: {0}")]
    MissingWavPackHeader(String),

    /// DSF chunk structure is broken
    #[error("Malformed DSF chunk: {0}")]
    MalformedDsf(String),

    /// File is larger than the configured read limit
    #[error("File too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge {
        /// Actual size
        size: u64,
        /// Configured limit
        limit: u64,
    },

    /// Reader panicked on this file
    #[error("Reader panicked: {0}")]
    Panicked(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TagReadError {
    /// Wire error kind for this failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            TagReadError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            TagReadError::MalformedId3(_) => ErrorKind::MalformedId3Tag,
            TagReadError::MalformedMpeg(_) => ErrorKind::MalformedMpegStream,
            TagReadError::MissingStreamInfo => ErrorKind::MissingStreamInfo,
            TagReadError::MalformedFlac(_) => ErrorKind::MalformedFlacStream,
            TagReadError::CorruptApeFooter(_) => ErrorKind::CorruptApeFooter,
            TagReadError::MissingWavPackHeader(_) => ErrorKind::MissingWavPackHeader,
            TagReadError::MalformedDsf(_) => ErrorKind::MalformedDsfChunk,
            TagReadError::TooLarge { .. } | TagReadError::Io(_) => ErrorKind::Io,
            TagReadError::Panicked(_) => ErrorKind::Internal,
        }
    }
}

/// Failure assembling a release from a directory
#[derive(Error, Debug)]
pub enum AssemblyError {
    /// Path is missing or not a directory
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Directory holds nothing the sniffer recognizes
    #[error("No audio files in {}", .0.display())]
    NoAudioFiles(PathBuf),

    /// Every recognized file failed extraction
    #[error("No usable metadata in {}: {failed} file(s) failed", .dir.display())]
    NoUsableMetadata {
        /// Directory that was scanned
        dir: PathBuf,
        /// Number of files that failed
        failed: usize,
    },

    /// Directory listing failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AssemblyError {
    /// Wire error kind for this failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssemblyError::DirectoryNotFound(_) => ErrorKind::DirectoryNotFound,
            AssemblyError::NoAudioFiles(_) => ErrorKind::NoAudioFiles,
            AssemblyError::NoUsableMetadata { .. } => ErrorKind::NoUsableMetadata,
            AssemblyError::Io(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_errors_map_to_wire_kinds() {
        assert_eq!(
            TagReadError::MalformedId3("bad".into()).kind(),
            ErrorKind::MalformedId3Tag
        );
        assert_eq!(TagReadError::MissingStreamInfo.kind(), ErrorKind::MissingStreamInfo);
        assert_eq!(
            TagReadError::TooLarge { size: 2, limit: 1 }.kind(),
            ErrorKind::Io
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(TagReadError::from(io).kind(), ErrorKind::Io);
    }

    #[test]
    fn assembly_errors_name_the_directory() {
        let err = AssemblyError::NoAudioFiles(PathBuf::from("/music/empty"));
        assert_eq!(err.kind(), ErrorKind::NoAudioFiles);
        assert!(err.to_string().contains("/music/empty"));
    }
}
