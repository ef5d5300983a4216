//! MP3 files: leading ID3v2 tag plus MPEG frame headers
use crate::bag::RawTagBag;
use crate::binary::Source;
use crate::error::{Result, TagReadError};
use crate::extract::{id3v2, mpeg};
use mdreader_core::{Diagnostic, ErrorKind};
use std::io::{Read, Seek};
use tracing::{debug, warn};

/// Bytes scanned for the first MPEG frame after the tag
const SYNC_WINDOW: u64 = 64 * 1024;

const ID3V1_LEN: u64 = 128;

pub(crate) fn read<R: Read + Seek>(source: &mut Source<R>, bag: &mut RawTagBag) -> Result<()> {
    let (audio_start, tag_error) = read_tag(source, bag)?;

    let window = source.read_up_to(audio_start, SYNC_WINDOW)?;
    let Some((offset, header)) = mpeg::find_frame(&window) else {
        return match tag_error {
            Some(err) => Err(err),
            None if bag.is_empty() => Err(TagReadError::MalformedMpeg(
                "no ID3 tag and no MPEG frame sync".into(),
            )),
            None => {
                bag.warnings.push(Diagnostic::new(
                    ErrorKind::MalformedMpegStream,
                    "no MPEG frame found after the tag",
                ));
                Ok(())
            }
        };
    };

    if let Some(err) = tag_error {
        warn!(file = %bag.file_info.file_name, error = %err, "ignoring malformed ID3 tag");
        bag.warnings.push(Diagnostic::new(err.kind(), err.to_string()));
    }

    let stream_start = audio_start + offset as u64;
    let stream_end = source.len() - id3v1_len(source)?;
    let audio_len = stream_end.saturating_sub(stream_start);
    let exact_ms = bag
        .first("TLEN")
        .and_then(|ms| ms.trim().parse::<u64>().ok());

    bag.audio = mpeg::audio_info(&window[offset..], &header, audio_len, exact_ms);
    debug!(
        offset = stream_start,
        bitrate = header.bitrate_kbps,
        sample_rate = header.sample_rate,
        "located MPEG stream"
    );
    Ok(())
}

/// Parse the leading tag if any
///
/// Returns where the audio search starts and the tag error, if the tag
/// was present but unreadable. Tag data only reaches `bag` when the
/// whole tag parsed.
fn read_tag<R: Read + Seek>(
    source: &mut Source<R>,
    bag: &mut RawTagBag,
) -> Result<(u64, Option<TagReadError>)> {
    let head = source.read_up_to(0, id3v2::HEADER_LEN as u64)?;
    let header = match id3v2::TagHeader::parse(&head) {
        None => return Ok((0, None)),
        Some(Err(err)) => return Ok((0, Some(err))),
        Some(Ok(header)) => header,
    };

    let tag_len = header.total_len().min(source.len());
    let data = source.read_up_to(0, tag_len)?;
    let mut scratch = RawTagBag::new(bag.file_info.clone());
    match id3v2::parse_tag(&data, &mut scratch) {
        Ok(_) => {
            bag.absorb(scratch);
            Ok((tag_len, None))
        }
        Err(err @ TagReadError::MalformedId3(_)) => Ok((tag_len, Some(err))),
        Err(err) => Err(err),
    }
}

fn id3v1_len<R: Read + Seek>(source: &mut Source<R>) -> Result<u64> {
    if source.len() < ID3V1_LEN {
        return Ok(0);
    }
    let marker = source.read_up_to(source.len() - ID3V1_LEN, 3)?;
    Ok(if marker == b"TAG" { ID3V1_LEN } else { 0 })
}
