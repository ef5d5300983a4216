//! ID3v2.2, 2.3 and 2.4 tag parsing
//!
//! Frame values land in the bag under their 2.3/2.4 frame id. Described
//! frames get compound keys: `TXXX:<DESCRIPTION>` (uppercased),
//! `COMM` or `COMM:<description>`, and `TIPL:<role>` for each involved
//! person pair. `TMCL` musician credits are stored by name under `TMCL`.
//! Lyrics frames land under `USLT` or `SYLT` with their language code
//! under `USLT:LANG` / `SYLT:LANG`.

use crate::bag::RawTagBag;
use crate::binary::{syncsafe, ByteCursor};
use crate::error::{Result, TagReadError};
use crate::extract::image;
use mdreader_core::{PictType, Picture, PictureMeta};
use std::borrow::Cow;
use tracing::debug;

pub(crate) const HEADER_LEN: usize = 10;

const FLAG_UNSYNC: u8 = 0x80;
const FLAG_EXTENDED: u8 = 0x40;
const FLAG_FOOTER: u8 = 0x10;

const ENC_LATIN1: u8 = 0;
const ENC_UTF16: u8 = 1;
const ENC_UTF16BE: u8 = 2;

/// Frame id equivalents for 2.2 three-character ids
const V22_IDS: &[(&str, &str)] = &[
    ("TT1", "TIT1"),
    ("TT2", "TIT2"),
    ("TT3", "TIT3"),
    ("TAL", "TALB"),
    ("TP1", "TPE1"),
    ("TP2", "TPE2"),
    ("TP3", "TPE3"),
    ("TP4", "TPE4"),
    ("TCM", "TCOM"),
    ("TXT", "TEXT"),
    ("TCO", "TCON"),
    ("TRK", "TRCK"),
    ("TPA", "TPOS"),
    ("TYE", "TYER"),
    ("TOR", "TORY"),
    ("TLE", "TLEN"),
    ("TPB", "TPUB"),
    ("TCR", "TCOP"),
    ("TRC", "TSRC"),
    ("TMT", "TMED"),
    ("TOA", "TOPE"),
    ("TLA", "TLAN"),
    ("TXX", "TXXX"),
    ("COM", "COMM"),
    ("ULT", "USLT"),
    ("SLT", "SYLT"),
    ("IPL", "IPLS"),
    ("PIC", "PIC"),
];

fn malformed(message: impl Into<String>) -> TagReadError {
    TagReadError::MalformedId3(message.into())
}

/// The fixed 10-byte tag header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TagHeader {
    pub(crate) major: u8,
    pub(crate) flags: u8,
    pub(crate) size: u32,
}

impl TagHeader {
    /// `None` when `head` does not start with the `ID3` marker
    pub(crate) fn parse(head: &[u8]) -> Option<Result<Self>> {
        if head.len() < HEADER_LEN || !head.starts_with(b"ID3") {
            return None;
        }
        Some(Self::parse_marked(head))
    }

    fn parse_marked(head: &[u8]) -> Result<Self> {
        let major = head[3];
        if !(2..=4).contains(&major) {
            return Err(malformed(format!("unsupported version 2.{}", major)));
        }
        let size = syncsafe([head[6], head[7], head[8], head[9]])
            .ok_or_else(|| malformed("tag size is not syncsafe"))?;
        Ok(Self {
            major,
            flags: head[5],
            size,
        })
    }

    /// Bytes occupied by the tag, header and footer included
    pub(crate) fn total_len(&self) -> u64 {
        let footer = if self.major == 4 && self.flags & FLAG_FOOTER != 0 {
            HEADER_LEN as u64
        } else {
            0
        };
        HEADER_LEN as u64 + u64::from(self.size) + footer
    }
}

/// Parse a complete tag (header first) into `bag`
pub(crate) fn parse_tag(data: &[u8], bag: &mut RawTagBag) -> Result<TagHeader> {
    let header = TagHeader::parse(data).ok_or_else(|| malformed("missing ID3 marker"))??;
    let end = HEADER_LEN + header.size as usize;
    if data.len() < end {
        return Err(malformed(format!(
            "tag declares {} bytes but only {} are present",
            header.size,
            data.len() - HEADER_LEN
        )));
    }

    let tag_unsync = header.flags & FLAG_UNSYNC != 0;
    let raw = &data[HEADER_LEN..end];
    let body: Cow<'_, [u8]> = if header.major < 4 && tag_unsync {
        Cow::Owned(remove_unsync(raw))
    } else {
        Cow::Borrowed(raw)
    };

    let mut cur = ByteCursor::new(&body, TagReadError::MalformedId3);
    if header.flags & FLAG_EXTENDED != 0 {
        skip_extended_header(&mut cur, header.major)?;
    }

    let (id_len, frame_header_len) = if header.major == 2 { (3, 6) } else { (4, 10) };
    let mut frames = 0usize;
    while cur.remaining() >= frame_header_len {
        let id_bytes = cur.take(id_len)?;
        if id_bytes[0] == 0 {
            break;
        }
        if !id_bytes
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            debug!(offset = cur.position(), "invalid frame id, stopping frame walk");
            break;
        }
        let raw_id = String::from_utf8_lossy(id_bytes).into_owned();

        let (size, flags) = match header.major {
            2 => (cur.u24_be()?, 0u16),
            3 => (cur.u32_be()?, cur.u16_be()?),
            _ => {
                let size = syncsafe(cur.array()?)
                    .ok_or_else(|| malformed(format!("frame {} size is not syncsafe", raw_id)))?;
                (size, cur.u16_be()?)
            }
        };
        let payload = cur
            .take_u32(size)
            .map_err(|_| malformed(format!("frame {} overruns the tag", raw_id)))?;
        frames += 1;

        let id = if header.major == 2 {
            match V22_IDS.iter().find(|(old, _)| *old == raw_id) {
                Some((_, new)) => (*new).to_string(),
                None => {
                    debug!(frame = %raw_id, "skipping unmapped 2.2 frame");
                    continue;
                }
            }
        } else {
            raw_id
        };

        match frame_body(header.major, flags, tag_unsync, payload) {
            Some(body) => decode_frame(&id, &body, bag),
            None => debug!(frame = %id, flags, "skipping compressed or encrypted frame"),
        }
    }

    debug!(version = header.major, frames, "parsed ID3v2 tag");
    Ok(header)
}

fn skip_extended_header(cur: &mut ByteCursor<'_>, major: u8) -> Result<()> {
    match major {
        3 => {
            let size = cur.u32_be()?;
            cur.take_u32(size).map(|_| ())
        }
        4 => {
            let size = syncsafe(cur.array()?)
                .ok_or_else(|| malformed("extended header size is not syncsafe"))?;
            let rest = size
                .checked_sub(4)
                .ok_or_else(|| malformed("extended header too short"))?;
            cur.take_u32(rest).map(|_| ())
        }
        _ => Err(malformed("compressed 2.2 tags are not supported")),
    }
}

/// Strip frame-level framing: grouping byte, data length indicator and
/// unsynchronisation. `None` for compressed or encrypted frames.
fn frame_body(major: u8, flags: u16, tag_unsync: bool, payload: &[u8]) -> Option<Cow<'_, [u8]>> {
    match major {
        3 => {
            if flags & 0x00C0 != 0 {
                return None;
            }
            let body = if flags & 0x0020 != 0 {
                payload.get(1..)?
            } else {
                payload
            };
            Some(Cow::Borrowed(body))
        }
        4 => {
            if flags & 0x000C != 0 {
                return None;
            }
            let mut body = payload;
            if flags & 0x0040 != 0 {
                body = body.get(1..)?;
            }
            if flags & 0x0001 != 0 {
                body = body.get(4..)?;
            }
            if flags & 0x0002 != 0 || tag_unsync {
                Some(Cow::Owned(remove_unsync(body)))
            } else {
                Some(Cow::Borrowed(body))
            }
        }
        _ => Some(Cow::Borrowed(payload)),
    }
}

fn decode_frame(id: &str, body: &[u8], bag: &mut RawTagBag) {
    let Some((&encoding, rest)) = body.split_first() else {
        return;
    };
    match id {
        "TXXX" => {
            let (desc, value) = split_first(encoding, rest);
            let key = format!("TXXX:{}", decode(encoding, desc).trim().to_uppercase());
            for v in split_values(encoding, value) {
                bag.push(key.clone(), v);
            }
        }
        "TIPL" | "IPLS" => {
            for pair in split_raw(encoding, rest).chunks(2) {
                if let [role, name] = pair {
                    let name = name.trim();
                    if !name.is_empty() {
                        bag.push(format!("TIPL:{}", role.trim().to_lowercase()), name);
                    }
                }
            }
        }
        "TMCL" => {
            for pair in split_raw(encoding, rest).chunks(2) {
                if let [_instrument, name] = pair {
                    let name = name.trim();
                    if !name.is_empty() {
                        bag.push("TMCL", name);
                    }
                }
            }
        }
        "COMM" => {
            if rest.len() < 3 {
                return;
            }
            let (desc, text) = split_first(encoding, &rest[3..]);
            let desc = decode(encoding, desc);
            let text = decode(encoding, text);
            let text = text.trim_end_matches('\0').trim();
            if text.is_empty() {
                return;
            }
            let key = if desc.trim().is_empty() {
                "COMM".to_string()
            } else {
                format!("COMM:{}", desc.trim())
            };
            bag.push(key, text);
        }
        "USLT" => {
            if rest.len() < 3 {
                return;
            }
            let (_desc, text) = split_first(encoding, &rest[3..]);
            let text = decode(encoding, text);
            let text = text.trim_end_matches('\0').trim();
            if !text.is_empty() {
                bag.push("USLT", text);
                push_language(bag, "USLT:LANG", &rest[..3]);
            }
        }
        "SYLT" => {
            // language, timestamp format, content type, then the descriptor
            if rest.len() < 5 {
                return;
            }
            let (_desc, mut sync) = split_first(encoding, &rest[5..]);
            let mut lines = Vec::new();
            while !sync.is_empty() {
                let (text, after) = split_first(encoding, sync);
                let line = decode(encoding, text);
                let line = line.trim();
                if !line.is_empty() {
                    lines.push(line.to_string());
                }
                sync = after.get(4..).unwrap_or_default();
            }
            if !lines.is_empty() {
                bag.push("SYLT", lines.join("\n"));
                push_language(bag, "SYLT:LANG", &rest[..3]);
            }
        }
        "APIC" | "PIC" => {
            if let Some(picture) = decode_picture(encoding, rest, id == "PIC") {
                bag.pictures.push(picture);
            }
        }
        _ if id.starts_with('T') => {
            for v in split_values(encoding, rest) {
                bag.push(id, v);
            }
        }
        _ => debug!(frame = id, "skipping frame"),
    }
}

fn push_language(bag: &mut RawTagBag, key: &str, code: &[u8]) {
    if code.iter().all(u8::is_ascii_alphabetic) && !code.eq_ignore_ascii_case(b"xxx") {
        bag.push(key, String::from_utf8_lossy(code).to_lowercase());
    }
}

fn decode_picture(encoding: u8, rest: &[u8], v22: bool) -> Option<Picture> {
    let (declared, rest) = if v22 {
        let format = rest.get(..3)?;
        (String::from_utf8_lossy(format).into_owned(), &rest[3..])
    } else {
        let (mime, rest) = split_first(ENC_LATIN1, rest);
        (String::from_utf8_lossy(mime).into_owned(), rest)
    };
    if declared.trim() == "-->" {
        debug!("skipping linked picture");
        return None;
    }
    let (&code, rest) = rest.split_first()?;
    let (desc, data) = split_first(encoding, rest);
    if data.is_empty() {
        return None;
    }
    let description = decode(encoding, desc);
    let description = description.trim();
    Some(Picture {
        pict_type: PictType::from_code(u32::from(code)),
        pict_meta: PictureMeta {
            mime_type: image::resolve_mime(&declared, data),
            description: (!description.is_empty()).then(|| description.to_string()),
            ..PictureMeta::default()
        },
        bytes: data.to_vec(),
    })
}

fn is_wide(encoding: u8) -> bool {
    encoding == ENC_UTF16 || encoding == ENC_UTF16BE
}

/// Split off the first terminated string
fn split_first(encoding: u8, bytes: &[u8]) -> (&[u8], &[u8]) {
    if is_wide(encoding) {
        let mut i = 0;
        while i + 1 < bytes.len() {
            if bytes[i] == 0 && bytes[i + 1] == 0 {
                return (&bytes[..i], &bytes[i + 2..]);
            }
            i += 2;
        }
        (bytes, &[])
    } else {
        match bytes.iter().position(|b| *b == 0) {
            Some(i) => (&bytes[..i], &bytes[i + 1..]),
            None => (bytes, &[]),
        }
    }
}

/// Every terminated string, empty ones included
fn split_raw(encoding: u8, mut bytes: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    while !bytes.is_empty() {
        let (value, rest) = split_first(encoding, bytes);
        out.push(decode(encoding, value));
        bytes = rest;
    }
    out
}

/// Non-empty values of a multi-value text field
fn split_values(encoding: u8, bytes: &[u8]) -> Vec<String> {
    split_raw(encoding, bytes)
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn decode(encoding: u8, bytes: &[u8]) -> String {
    match encoding {
        ENC_LATIN1 => bytes.iter().map(|&b| char::from(b)).collect(),
        ENC_UTF16 => match bytes {
            [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, true),
            [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, false),
            _ => decode_utf16(bytes, true),
        },
        ENC_UTF16BE => decode_utf16(bytes, false),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn decode_utf16(bytes: &[u8], little_endian: bool) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| {
            if little_endian {
                u16::from_le_bytes([pair[0], pair[1]])
            } else {
                u16::from_be_bytes([pair[0], pair[1]])
            }
        })
        .collect();
    String::from_utf16_lossy(&units)
}

/// Undo unsynchronisation: every `FF 00` becomes `FF`
fn remove_unsync(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut after_ff = false;
    for &b in data {
        if after_ff && b == 0 {
            after_ff = false;
            continue;
        }
        out.push(b);
        after_ff = b == 0xFF;
    }
    out
}
