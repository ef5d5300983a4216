//! FLAC metadata block chain
use crate::bag::RawTagBag;
use crate::binary::{ByteCursor, Source};
use crate::error::{Result, TagReadError};
use crate::extract::{id3v2, image};
use mdreader_core::{AudioInfo, PictType, Picture, PictureMeta};
use std::io::{Read, Seek};
use tracing::debug;

const BLOCK_STREAMINFO: u8 = 0;
const BLOCK_VORBIS_COMMENT: u8 = 4;
const BLOCK_PICTURE: u8 = 6;
const BLOCK_INVALID: u8 = 127;

const STREAMINFO_LEN: u32 = 34;

pub(crate) fn read<R: Read + Seek>(source: &mut Source<R>, bag: &mut RawTagBag) -> Result<()> {
    let start = leading_id3_len(source)?;
    let marker = source.read_at(start, 4, TagReadError::MalformedFlac)?;
    if marker != b"fLaC" {
        return Err(TagReadError::MalformedFlac("missing fLaC signature".into()));
    }

    let mut pos = start + 4;
    let mut first = true;
    let mut total_samples = 0u64;
    loop {
        let head = source.read_at(pos, 4, TagReadError::MalformedFlac)?;
        let last = head[0] & 0x80 != 0;
        let kind = head[0] & 0x7F;
        let len = u32::from_be_bytes([0, head[1], head[2], head[3]]);
        pos += 4;

        if first && (kind != BLOCK_STREAMINFO || len != STREAMINFO_LEN) {
            return Err(TagReadError::MissingStreamInfo);
        }
        if kind == BLOCK_INVALID {
            return Err(TagReadError::MalformedFlac("invalid metadata block type".into()));
        }

        match kind {
            BLOCK_STREAMINFO if first => {
                let body = source.read_at(pos, u64::from(len), TagReadError::MalformedFlac)?;
                let (info, samples) = stream_info(&body)?;
                bag.audio = info;
                total_samples = samples;
            }
            BLOCK_VORBIS_COMMENT => {
                let body = source.read_at(pos, u64::from(len), TagReadError::MalformedFlac)?;
                vorbis_comments(&body, bag)?;
            }
            BLOCK_PICTURE => {
                let body = source.read_at(pos, u64::from(len), TagReadError::MalformedFlac)?;
                bag.pictures.push(picture(&body)?);
            }
            _ => debug!(block = kind, len, "skipping metadata block"),
        }

        pos += u64::from(len);
        first = false;
        if last {
            break;
        }
    }

    if let Some(duration_ms) = bag.audio.duration_ms.filter(|ms| *ms > 0) {
        let audio_bytes = source.len().saturating_sub(pos);
        bag.audio.avg_bitrate = Some((audio_bytes * 8 / duration_ms) as u32);
    }
    debug!(total_samples, audio_offset = pos, "read FLAC metadata");
    Ok(())
}

fn leading_id3_len<R: Read + Seek>(source: &mut Source<R>) -> Result<u64> {
    let head = source.read_up_to(0, id3v2::HEADER_LEN as u64)?;
    match id3v2::TagHeader::parse(&head) {
        None => Ok(0),
        Some(Ok(header)) => {
            debug!(len = header.total_len(), "skipping ID3 tag before FLAC stream");
            Ok(header.total_len())
        }
        Some(Err(err)) => Err(TagReadError::MalformedFlac(format!(
            "unreadable ID3 tag before stream: {}",
            err
        ))),
    }
}

/// Decode STREAMINFO into audio parameters and the total sample count
fn stream_info(body: &[u8]) -> Result<(AudioInfo, u64)> {
    let mut cur = ByteCursor::new(body, TagReadError::MalformedFlac);
    cur.skip(10)?;
    let packed = cur.u64_be()?;
    let sample_rate = (packed >> 44) as u32;
    let channels = ((packed >> 41) & 0x07) as u16 + 1;
    let bits = ((packed >> 36) & 0x1F) as u16 + 1;
    let total_samples = packed & 0x0F_FFFF_FFFF;

    if sample_rate == 0 {
        return Err(TagReadError::MalformedFlac("STREAMINFO sample rate is zero".into()));
    }
    let duration_ms = (total_samples > 0).then(|| total_samples * 1000 / u64::from(sample_rate));

    Ok((
        AudioInfo {
            sample_rate: Some(sample_rate),
            sample_size: Some(bits),
            channels: Some(channels),
            duration_ms,
            avg_bitrate: None,
        },
        total_samples,
    ))
}

/// Little-endian `KEY=value` list; keys are stored uppercased
pub(crate) fn vorbis_comments(body: &[u8], bag: &mut RawTagBag) -> Result<()> {
    let mut cur = ByteCursor::new(body, TagReadError::MalformedFlac);
    let vendor_len = cur.u32_le()?;
    cur.take_u32(vendor_len)?;
    let count = cur.u32_le()?;
    for _ in 0..count {
        let len = cur.u32_le()?;
        let entry = String::from_utf8_lossy(cur.take_u32(len)?);
        match entry.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                let value = value.trim();
                if !value.is_empty() {
                    bag.push(key.to_ascii_uppercase(), value);
                }
            }
            _ => debug!(entry = %entry, "skipping comment without key"),
        }
    }
    Ok(())
}

fn picture(body: &[u8]) -> Result<Picture> {
    let mut cur = ByteCursor::new(body, TagReadError::MalformedFlac);
    let code = cur.u32_be()?;
    let mime_len = cur.u32_be()?;
    let mime = String::from_utf8_lossy(cur.take_u32(mime_len)?).into_owned();
    let desc_len = cur.u32_be()?;
    let description = String::from_utf8_lossy(cur.take_u32(desc_len)?)
        .trim()
        .to_string();
    let width = cur.u32_be()?;
    let height = cur.u32_be()?;
    let depth = cur.u32_be()?;
    cur.skip(4)?;
    let data_len = cur.u32_be()?;
    let data = cur.take_u32(data_len)?;

    Ok(Picture {
        pict_type: PictType::from_code(code),
        pict_meta: PictureMeta {
            mime_type: image::resolve_mime(&mime, data),
            description: (!description.is_empty()).then_some(description),
            width: (width > 0).then_some(width),
            height: (height > 0).then_some(height),
            color_depth: (depth > 0).then_some(depth),
        },
        bytes: data.to_vec(),
    })
}
