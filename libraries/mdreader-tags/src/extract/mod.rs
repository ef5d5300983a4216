//! Per-format extractors
//!
//! Each family has one module with a `read` function that fills a
//! [`RawTagBag`] from a seekable source. [`extract`] opens the file,
//! records its [`FileInfo`] and dispatches on [`FormatKind`].

mod apev2;
mod dsf;
mod flac;
mod id3v2;
mod image;
mod mp3;
mod mpeg;
mod wavpack;

use crate::bag::RawTagBag;
use crate::binary::Source;
use crate::error::{Result, TagReadError};
use mdreader_core::{FileInfo, FormatKind};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::time::UNIX_EPOCH;
use tracing::debug;

pub(crate) use id3v2::TagHeader as Id3Header;

/// Default upper bound on the size of a file that will be read
pub const DEFAULT_MAX_FILE_SIZE: u64 = 2 * 1024 * 1024 * 1024;

/// Bounds applied to every extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractLimits {
    /// Files larger than this fail with an I/O-kind error
    pub max_file_size: u64,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Read one file's tags, pictures and audio parameters
pub fn extract(path: &Path, format: FormatKind, limits: &ExtractLimits) -> Result<RawTagBag> {
    let metadata = std::fs::metadata(path)?;
    if metadata.len() > limits.max_file_size {
        return Err(TagReadError::TooLarge {
            size: metadata.len(),
            limit: limits.max_file_size,
        });
    }

    let file_info = FileInfo {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        container_format: format,
        file_size: metadata.len(),
        mod_time: metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .and_then(|d| i64::try_from(d.as_secs()).ok()),
    };

    let file = File::open(path)?;
    let bag = extract_from(BufReader::new(file), file_info)?;
    debug!(
        file = %path.display(),
        format = %format,
        tags = bag.len(),
        pictures = bag.pictures.len(),
        "extracted tags"
    );
    Ok(bag)
}

/// Run the extractor for `file_info.container_format` over any seekable input
pub fn extract_from<R: Read + Seek>(reader: R, file_info: FileInfo) -> Result<RawTagBag> {
    let format = file_info.container_format;
    let mut source = Source::new(reader)?;
    let mut bag = RawTagBag::new(file_info);
    match format {
        FormatKind::Mp3 => mp3::read(&mut source, &mut bag)?,
        FormatKind::Flac => flac::read(&mut source, &mut bag)?,
        FormatKind::WavPack => wavpack::read(&mut source, &mut bag)?,
        FormatKind::Dsf => dsf::read(&mut source, &mut bag)?,
    }
    Ok(bag)
}
