//! Container family detection
//!
//! The file extension decides when it names a supported family. Otherwise
//! the first bytes are checked against each family's signature, skipping a
//! leading ID3v2 tag to tell ID3-prefixed FLAC from MP3.

use crate::error::{Result, TagReadError};
use crate::extract::Id3Header;
use mdreader_core::FormatKind;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

const SIGNATURE_LEN: usize = 10;

/// Classify a file by extension, falling back to its signature
pub fn classify(path: &Path) -> Result<FormatKind> {
    if let Some(kind) = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(FormatKind::from_extension)
    {
        return Ok(kind);
    }

    let mut file = File::open(path)?;
    let mut head = [0u8; SIGNATURE_LEN];
    let read = read_prefix(&mut file, &mut head)?;
    let head = &head[..read];

    if let Some(Ok(header)) = Id3Header::parse(head) {
        let mut after = [0u8; 4];
        file.seek(SeekFrom::Start(header.total_len()))?;
        let read = read_prefix(&mut file, &mut after)?;
        return Ok(match classify_signature(&after[..read]) {
            Some(FormatKind::Flac) => FormatKind::Flac,
            _ => FormatKind::Mp3,
        });
    }

    classify_signature(head).ok_or_else(|| {
        TagReadError::UnsupportedFormat(format!(
            "{} matches no known extension or signature",
            path.display()
        ))
    })
}

/// Family whose signature starts `head`
pub fn classify_signature(head: &[u8]) -> Option<FormatKind> {
    match head {
        [b'f', b'L', b'a', b'C', ..] => Some(FormatKind::Flac),
        [b'w', b'v', b'p', b'k', ..] => Some(FormatKind::WavPack),
        [b'D', b'S', b'D', b' ', ..] => Some(FormatKind::Dsf),
        [b'I', b'D', b'3', ..] => Some(FormatKind::Mp3),
        [0xFF, b, ..] if b & 0xE0 == 0xE0 => Some(FormatKind::Mp3),
        _ => None,
    }
}

fn read_prefix(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
