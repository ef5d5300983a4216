//! Byte-level fixture builders for the four container families
#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Literal tag values every format fixture carries
pub mod fixtures {
    pub const ALBUM: &str = "test_album_title";
    pub const COMPOSER: &str = "test_composer";
    pub const PERFORMER: &str = "test_performer";
    pub const GENRE: &str = "test_genre";
    pub const TOTAL_TRACKS: u32 = 10;
    pub const POSITION: u32 = 3;
    pub const TRACK_TITLE: &str = "test_track_title";
    pub const TRACK_ARTIST: &str = "test_track_artist";
    pub const COUNTRY: &str = "test_country";
    pub const LABEL: &str = "test_label";
    pub const CATNO: &str = "test_catno";
    pub const YEAR: i32 = 2000;
    pub const NOTES: &str = "test_notes";
    pub const DISCOGS_ID: &str = "123456789";
}

use fixtures::*;

pub fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}

//
// ID3v2 and MPEG
//

fn id3_frame(id: &str, body: &[u8]) -> Vec<u8> {
    let mut out = id.as_bytes().to_vec();
    out.extend(u32::try_from(body.len()).unwrap().to_be_bytes());
    out.extend([0, 0]);
    out.extend(body);
    out
}

pub fn text_frame(id: &str, value: &str) -> Vec<u8> {
    let mut body = vec![0u8];
    body.extend(value.as_bytes());
    id3_frame(id, &body)
}

pub fn txxx_frame(desc: &str, value: &str) -> Vec<u8> {
    let mut body = vec![0u8];
    body.extend(desc.as_bytes());
    body.push(0);
    body.extend(value.as_bytes());
    id3_frame("TXXX", &body)
}

pub fn comm_frame(text: &str) -> Vec<u8> {
    let mut body = vec![0u8];
    body.extend(b"eng");
    body.push(0);
    body.extend(text.as_bytes());
    id3_frame("COMM", &body)
}

pub fn apic_frame(mime: &str, pict_type: u8, data: &[u8]) -> Vec<u8> {
    let mut body = vec![0u8];
    body.extend(mime.as_bytes());
    body.push(0);
    body.push(pict_type);
    body.push(0);
    body.extend(data);
    id3_frame("APIC", &body)
}

/// ID3v2.3 tag around `frames`, with a little padding
pub fn id3v23_tag(frames: &[Vec<u8>]) -> Vec<u8> {
    let mut body: Vec<u8> = frames.concat();
    body.extend([0u8; 16]);
    let size = u32::try_from(body.len()).unwrap();
    let mut out = b"ID3\x03\x00\x00".to_vec();
    out.extend([
        ((size >> 21) & 0x7F) as u8,
        ((size >> 14) & 0x7F) as u8,
        ((size >> 7) & 0x7F) as u8,
        (size & 0x7F) as u8,
    ]);
    out.extend(body);
    out
}

/// The full set of fixture values as ID3 frames
pub fn fixture_id3_frames(position: &str) -> Vec<Vec<u8>> {
    vec![
        text_frame("TALB", ALBUM),
        text_frame("TCOM", COMPOSER),
        text_frame("TPE2", PERFORMER),
        text_frame("TCON", GENRE),
        text_frame("TRCK", position),
        text_frame("TIT2", TRACK_TITLE),
        text_frame("TPE1", TRACK_ARTIST),
        txxx_frame("COUNTRY", COUNTRY),
        text_frame("TPUB", LABEL),
        txxx_frame("CATALOGNUMBER", CATNO),
        text_frame("TYER", &YEAR.to_string()),
        comm_frame(NOTES),
        txxx_frame("DISCOGS_RELEASE_ID", DISCOGS_ID),
    ]
}

/// MPEG-1 layer III, 128 kbit/s, 44.1 kHz, mono
pub const MPEG_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0xC4];
pub const MPEG_FRAME_LEN: usize = 417;

pub fn mpeg_frames(count: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(count * MPEG_FRAME_LEN);
    for _ in 0..count {
        out.extend(MPEG_HEADER);
        out.resize(out.len() + MPEG_FRAME_LEN - 4, 0);
    }
    out
}

pub fn mp3_file(frames: &[Vec<u8>]) -> Vec<u8> {
    let mut out = id3v23_tag(frames);
    out.extend(mpeg_frames(40));
    out
}

pub fn fixture_mp3() -> Vec<u8> {
    mp3_file(&fixture_id3_frames("3/10"))
}

/// Unsupported tag version and no audio behind it
pub fn corrupt_mp3() -> Vec<u8> {
    let mut out = b"ID3\x09\x00\x00\x00\x00\x00\x10".to_vec();
    out.extend([0u8; 16]);
    out
}

//
// FLAC
//

pub const FLAC_RATE: u64 = 44_100;

fn flac_block(kind: u8, last: bool, body: &[u8]) -> Vec<u8> {
    let len = u32::try_from(body.len()).unwrap().to_be_bytes();
    let mut out = vec![if last { kind | 0x80 } else { kind }, len[1], len[2], len[3]];
    out.extend(body);
    out
}

pub fn stream_info(samples: u64) -> Vec<u8> {
    let mut body = Vec::with_capacity(34);
    body.extend(4096u16.to_be_bytes());
    body.extend(4096u16.to_be_bytes());
    body.extend([0u8; 6]);
    let packed = (FLAC_RATE << 44) | (1 << 41) | (15 << 36) | samples;
    body.extend(packed.to_be_bytes());
    body.extend([0u8; 16]);
    body
}

pub fn vorbis_comment(comments: &[(&str, &str)]) -> Vec<u8> {
    let vendor = b"mdreader fixtures";
    let mut body = u32::try_from(vendor.len()).unwrap().to_le_bytes().to_vec();
    body.extend(vendor);
    body.extend(u32::try_from(comments.len()).unwrap().to_le_bytes());
    for (key, value) in comments {
        let entry = format!("{}={}", key, value);
        body.extend(u32::try_from(entry.len()).unwrap().to_le_bytes());
        body.extend(entry.as_bytes());
    }
    body
}

pub fn flac_picture(pict_type: u32, mime: &str, data: &[u8]) -> Vec<u8> {
    let mut body = pict_type.to_be_bytes().to_vec();
    body.extend(u32::try_from(mime.len()).unwrap().to_be_bytes());
    body.extend(mime.as_bytes());
    body.extend(0u32.to_be_bytes());
    body.extend(1u32.to_be_bytes());
    body.extend(1u32.to_be_bytes());
    body.extend(24u32.to_be_bytes());
    body.extend(0u32.to_be_bytes());
    body.extend(u32::try_from(data.len()).unwrap().to_be_bytes());
    body.extend(data);
    body
}

pub fn flac_file(comments: &[(&str, &str)], pictures: &[Vec<u8>]) -> Vec<u8> {
    let mut out = b"fLaC".to_vec();
    out.extend(flac_block(0, false, &stream_info(FLAC_RATE * 2)));
    out.extend(flac_block(4, pictures.is_empty(), &vorbis_comment(comments)));
    for (i, picture) in pictures.iter().enumerate() {
        out.extend(flac_block(6, i + 1 == pictures.len(), picture));
    }
    out.extend([0u8; 256]);
    out
}

pub fn fixture_vorbis_comments(position: &'static str) -> Vec<(&'static str, &'static str)> {
    vec![
        ("ALBUM", ALBUM),
        ("COMPOSER", COMPOSER),
        ("PERFORMER", PERFORMER),
        ("GENRE", GENRE),
        ("TRACKNUMBER", position),
        ("TRACKTOTAL", "10"),
        ("TITLE", TRACK_TITLE),
        ("ARTIST", TRACK_ARTIST),
        ("COUNTRY", COUNTRY),
        ("LABEL", LABEL),
        ("CATALOGNUMBER", CATNO),
        ("DATE", "2000"),
        ("DESCRIPTION", NOTES),
        ("DISCOGS_RELEASE_ID", DISCOGS_ID),
    ]
}

pub fn fixture_flac() -> Vec<u8> {
    flac_file(&fixture_vorbis_comments("3"), &[])
}

/// Vorbis comment where STREAMINFO must come first
pub fn corrupt_flac() -> Vec<u8> {
    let mut out = b"fLaC".to_vec();
    out.extend(flac_block(4, true, &vorbis_comment(&[("ALBUM", "broken")])));
    out
}

//
// WavPack and APEv2
//

/// 16-bit, 44.1 kHz, single stereo block
const WAVPACK_FLAGS: u32 = 0x01 | (9 << 23) | 0x0800 | 0x1000;

pub fn wavpack_block(samples: u32) -> Vec<u8> {
    let body = [0u8; 16];
    let mut out = b"wvpk".to_vec();
    out.extend(u32::try_from(32 - 8 + body.len()).unwrap().to_le_bytes());
    out.extend(0x410u16.to_le_bytes());
    out.push(0);
    out.push(0);
    out.extend(samples.to_le_bytes());
    out.extend(0u32.to_le_bytes());
    out.extend(samples.to_le_bytes());
    out.extend(WAVPACK_FLAGS.to_le_bytes());
    out.extend(0u32.to_le_bytes());
    out.extend(body);
    out
}

pub fn ape_item(key: &str, value: &[u8], binary: bool) -> Vec<u8> {
    let mut out = u32::try_from(value.len()).unwrap().to_le_bytes().to_vec();
    out.extend(if binary { 2u32 } else { 0u32 }.to_le_bytes());
    out.extend(key.as_bytes());
    out.push(0);
    out.extend(value);
    out
}

pub fn ape_tag(items: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = items.concat();
    let mut out = body.clone();
    out.extend(b"APETAGEX");
    out.extend(2000u32.to_le_bytes());
    out.extend(u32::try_from(body.len() + 32).unwrap().to_le_bytes());
    out.extend(u32::try_from(items.len()).unwrap().to_le_bytes());
    out.extend(0u32.to_le_bytes());
    out.extend([0u8; 8]);
    out
}

pub fn wavpack_file(items: &[Vec<u8>]) -> Vec<u8> {
    let mut out = wavpack_block(44_100 * 2);
    out.extend(ape_tag(items));
    out
}

pub fn fixture_ape_items(position: &str) -> Vec<Vec<u8>> {
    [
        ("Album", ALBUM),
        ("Composer", COMPOSER),
        ("Performer", PERFORMER),
        ("Genre", GENRE),
        ("Track", position),
        ("TrackTotal", "10"),
        ("Title", TRACK_TITLE),
        ("Artist", TRACK_ARTIST),
        ("Country", COUNTRY),
        ("Label", LABEL),
        ("CatalogNumber", CATNO),
        ("Year", "2000"),
        ("Comment", NOTES),
        ("DISCOGS_RELEASE_ID", DISCOGS_ID),
    ]
    .iter()
    .map(|(k, v)| ape_item(k, v.as_bytes(), false))
    .collect()
}

pub fn fixture_wavpack() -> Vec<u8> {
    wavpack_file(&fixture_ape_items("3"))
}

/// Footer claiming more items than the tag can hold
pub fn corrupt_wavpack() -> Vec<u8> {
    let mut out = wavpack_block(44_100);
    let item = ape_item("Album", b"broken", false);
    out.extend(&item);
    out.extend(b"APETAGEX");
    out.extend(2000u32.to_le_bytes());
    out.extend(u32::try_from(item.len() + 32).unwrap().to_le_bytes());
    out.extend(500u32.to_le_bytes());
    out.extend(0u32.to_le_bytes());
    out.extend([0u8; 8]);
    out
}

//
// DSF
//

pub const DSD64_RATE: u32 = 2_822_400;

pub fn dsf_file(tag: Option<&[u8]>) -> Vec<u8> {
    let audio = vec![0x69u8; 64];
    let data_len = 12 + audio.len() as u64;
    let metadata_offset = tag.map_or(0, |_| 28 + 52 + data_len);
    let total_len = 28 + 52 + data_len + tag.map_or(0, |t| t.len() as u64);

    let mut out = b"DSD ".to_vec();
    out.extend(28u64.to_le_bytes());
    out.extend(total_len.to_le_bytes());
    out.extend(metadata_offset.to_le_bytes());
    out.extend(b"fmt ");
    out.extend(52u64.to_le_bytes());
    out.extend(1u32.to_le_bytes());
    out.extend(0u32.to_le_bytes());
    out.extend(2u32.to_le_bytes());
    out.extend(2u32.to_le_bytes());
    out.extend(DSD64_RATE.to_le_bytes());
    out.extend(1u32.to_le_bytes());
    out.extend((u64::from(DSD64_RATE) * 2).to_le_bytes());
    out.extend(4096u32.to_le_bytes());
    out.extend(0u32.to_le_bytes());
    out.extend(b"data");
    out.extend(data_len.to_le_bytes());
    out.extend(audio);
    if let Some(tag) = tag {
        out.extend(tag);
    }
    out
}

pub fn fixture_dsf() -> Vec<u8> {
    dsf_file(Some(&id3v23_tag(&fixture_id3_frames("3/10"))))
}

/// Metadata pointer to a tag with an unsupported version
pub fn corrupt_dsf() -> Vec<u8> {
    dsf_file(Some(b"ID3\x09\x00\x00\x00\x00\x00\x00"))
}

/// A minimal PNG signature followed by filler
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4];
