//! DSF (DSD stream file) chunks with an embedded ID3v2 tag
use crate::bag::RawTagBag;
use crate::binary::{ByteCursor, Source};
use crate::error::{Result, TagReadError};
use crate::extract::id3v2;
use mdreader_core::AudioInfo;
use std::io::{Read, Seek};
use tracing::debug;

const DSD_CHUNK_LEN: u64 = 28;
const FMT_CHUNK_LEN: u64 = 52;

fn malformed(message: impl Into<String>) -> TagReadError {
    TagReadError::MalformedDsf(message.into())
}

pub(crate) fn read<R: Read + Seek>(source: &mut Source<R>, bag: &mut RawTagBag) -> Result<()> {
    let head = source.read_at(0, DSD_CHUNK_LEN + FMT_CHUNK_LEN, TagReadError::MalformedDsf)?;
    let mut cur = ByteCursor::new(&head, TagReadError::MalformedDsf);

    if cur.take(4)? != b"DSD " {
        return Err(malformed("missing DSD chunk"));
    }
    if cur.u64_le()? != DSD_CHUNK_LEN {
        return Err(malformed("DSD chunk size is not 28"));
    }
    let declared_len = cur.u64_le()?;
    if declared_len != source.len() {
        return Err(malformed(format!(
            "declared file size {} does not match actual size {}",
            declared_len,
            source.len()
        )));
    }
    let metadata_offset = cur.u64_le()?;

    if cur.take(4)? != b"fmt " {
        return Err(malformed("missing fmt chunk"));
    }
    if cur.u64_le()? != FMT_CHUNK_LEN {
        return Err(malformed("fmt chunk size is not 52"));
    }
    let _format_version = cur.u32_le()?;
    let format_id = cur.u32_le()?;
    let _channel_type = cur.u32_le()?;
    let channels = cur.u32_le()?;
    let sample_rate = cur.u32_le()?;
    let _bits_per_sample = cur.u32_le()?;
    let sample_count = cur.u64_le()?;

    if format_id != 0 {
        return Err(malformed(format!("unsupported format id {}", format_id)));
    }
    if sample_rate == 0 || channels == 0 {
        return Err(malformed("zero sample rate or channel count"));
    }

    let duration_ms = sample_count
        .checked_mul(1000)
        .map(|ms| ms / u64::from(sample_rate))
        .filter(|ms| *ms > 0);
    bag.audio = AudioInfo {
        sample_rate: Some(sample_rate),
        sample_size: Some(1),
        channels: u16::try_from(channels).ok(),
        duration_ms,
        avg_bitrate: Some((u64::from(sample_rate) * u64::from(channels) / 1000) as u32),
    };

    if metadata_offset == 0 {
        debug!("DSF file carries no metadata chunk");
        return Ok(());
    }
    if metadata_offset >= source.len() {
        return Err(malformed(format!(
            "metadata pointer {} is past end of file",
            metadata_offset
        )));
    }
    let tag = source.read_at(
        metadata_offset,
        source.len() - metadata_offset,
        TagReadError::MalformedDsf,
    )?;
    if id3v2::TagHeader::parse(&tag).is_none() {
        return Err(malformed("metadata pointer does not reference an ID3 tag"));
    }
    id3v2::parse_tag(&tag, bag)?;
    Ok(())
}
