//! APEv2 tags, located from the end of the file
use crate::bag::RawTagBag;
use crate::binary::{ByteCursor, Source};
use crate::error::{Result, TagReadError};
use crate::extract::image;
use mdreader_core::{PictType, Picture, PictureMeta};
use std::io::{Read, Seek};
use tracing::debug;

const PREAMBLE: &[u8; 8] = b"APETAGEX";
const FOOTER_LEN: u64 = 32;
const ID3V1_LEN: u64 = 128;
/// Smallest possible item: two length fields, a one-byte key, its NUL
const MIN_ITEM_LEN: u32 = 10;

const ITEM_TEXT: u32 = 0;
const ITEM_BINARY: u32 = 1;

/// Cover art item names in picture-type order
const COVER_NAMES: [&str; 21] = [
    "other",
    "png icon",
    "icon",
    "front",
    "back",
    "leaflet",
    "media",
    "lead artist",
    "artist",
    "conductor",
    "band",
    "composer",
    "lyricist",
    "recording location",
    "during recording",
    "during performance",
    "video capture",
    "a bright coloured fish",
    "illustration",
    "band logotype",
    "publisher logotype",
];

fn corrupt(message: impl Into<String>) -> TagReadError {
    TagReadError::CorruptApeFooter(message.into())
}

/// Read the tag ending at end of file or just before an ID3v1 block
///
/// Returns `false` when no tag is present.
pub(crate) fn read<R: Read + Seek>(source: &mut Source<R>, bag: &mut RawTagBag) -> Result<bool> {
    let mut candidates = vec![source.len()];
    if source.len() >= ID3V1_LEN + FOOTER_LEN {
        let marker = source.read_up_to(source.len() - ID3V1_LEN, 3)?;
        if marker == b"TAG" {
            candidates.push(source.len() - ID3V1_LEN);
        }
    }

    for end in candidates {
        if end < FOOTER_LEN {
            continue;
        }
        let footer = source.read_at(end - FOOTER_LEN, FOOTER_LEN, TagReadError::CorruptApeFooter)?;
        if !footer.starts_with(PREAMBLE) {
            continue;
        }
        read_items(source, &footer, end, bag)?;
        return Ok(true);
    }
    debug!("no APEv2 tag");
    Ok(false)
}

fn read_items<R: Read + Seek>(
    source: &mut Source<R>,
    footer: &[u8],
    end: u64,
    bag: &mut RawTagBag,
) -> Result<()> {
    let mut cur = ByteCursor::new(footer, TagReadError::CorruptApeFooter);
    cur.skip(PREAMBLE.len())?;
    let version = cur.u32_le()?;
    let size = cur.u32_le()?;
    let count = cur.u32_le()?;

    if u64::from(size) < FOOTER_LEN || u64::from(size) > end {
        return Err(corrupt(format!("tag size {} out of range", size)));
    }
    let items_len = size - FOOTER_LEN as u32;
    if count > items_len / MIN_ITEM_LEN {
        return Err(corrupt(format!(
            "{} items cannot fit in {} bytes",
            count, items_len
        )));
    }

    let items_start = end - u64::from(size);
    let items = source.read_at(items_start, u64::from(items_len), TagReadError::CorruptApeFooter)?;
    let mut cur = ByteCursor::new(&items, TagReadError::CorruptApeFooter);
    for _ in 0..count {
        let value_len = cur.u32_le()?;
        let flags = cur.u32_le()?;
        let key = item_key(&mut cur)?;
        let value = cur
            .take_u32(value_len)
            .map_err(|_| corrupt(format!("item {} overruns the tag", key)))?;

        match (flags >> 1) & 0x03 {
            ITEM_TEXT => {
                for v in String::from_utf8_lossy(value).split('\0') {
                    let v = v.trim();
                    if !v.is_empty() {
                        bag.push(key.to_ascii_uppercase(), v);
                    }
                }
            }
            ITEM_BINARY => {
                if let Some(picture) = cover_art(&key, value) {
                    bag.pictures.push(picture);
                } else {
                    debug!(key = %key, "skipping binary item");
                }
            }
            _ => debug!(key = %key, "skipping external item"),
        }
    }
    debug!(version, count, "read APEv2 tag");
    Ok(())
}

fn item_key(cur: &mut ByteCursor<'_>) -> Result<String> {
    let mut key = Vec::new();
    loop {
        match cur.u8()? {
            0 => break,
            b @ 0x20..=0x7E => key.push(b),
            b => return Err(corrupt(format!("invalid key byte 0x{:02X}", b))),
        }
    }
    if key.is_empty() {
        return Err(corrupt("empty item key"));
    }
    Ok(String::from_utf8_lossy(&key).into_owned())
}

/// `Cover Art (Front)` style items hold `file name \0 image bytes`
fn cover_art(key: &str, value: &[u8]) -> Option<Picture> {
    let lower = key.to_ascii_lowercase();
    let name = lower.strip_prefix("cover art (")?.strip_suffix(')')?;
    let code = COVER_NAMES.iter().position(|n| *n == name).unwrap_or(0);

    let split = value.iter().position(|b| *b == 0)?;
    let file_name = String::from_utf8_lossy(&value[..split]).into_owned();
    let data = &value[split + 1..];
    if data.is_empty() {
        return None;
    }
    let declared = image::mime_from_name(&file_name).unwrap_or_default();
    let file_name = file_name.trim();

    Some(Picture {
        pict_type: PictType::from_code(code as u32),
        pict_meta: PictureMeta {
            mime_type: image::resolve_mime(declared, data),
            description: (!file_name.is_empty()).then(|| file_name.to_string()),
            ..PictureMeta::default()
        },
        bytes: data.to_vec(),
    })
}
