//! Common test utilities and fixtures
#![allow(dead_code)]

use mdreader_server::{api, AppState, RequestService};
use mdreader_tags::{Assembler, ExtractLimits, ExtractionPool};
use std::{path::Path, sync::Arc};

pub mod fixtures {
    pub const ALBUM: &str = "Kind of Blue";
    pub const TRACK_TITLE: &str = "So What";
    pub const TRACK_ARTIST: &str = "Miles Davis";
}

const SAMPLE_RATE: u64 = 44_100;

pub fn test_service() -> Arc<RequestService> {
    let pool = ExtractionPool::new(2).unwrap();
    Arc::new(RequestService::new(Assembler::new(
        Arc::new(pool),
        ExtractLimits::default(),
    )))
}

pub fn test_app() -> axum::Router {
    api::router(AppState::new(test_service()))
}

/// Minimal two-second FLAC stream with the given Vorbis comments
pub fn flac_file(comments: &[(&str, &str)]) -> Vec<u8> {
    let mut info = Vec::with_capacity(34);
    info.extend(4096u16.to_be_bytes());
    info.extend(4096u16.to_be_bytes());
    info.extend([0u8; 6]);
    let packed = (SAMPLE_RATE << 44) | (1 << 41) | (15 << 36) | (SAMPLE_RATE * 2);
    info.extend(packed.to_be_bytes());
    info.extend([0u8; 16]);

    let vendor = b"mdreader fixtures";
    let mut comment = u32::try_from(vendor.len()).unwrap().to_le_bytes().to_vec();
    comment.extend(vendor);
    comment.extend(u32::try_from(comments.len()).unwrap().to_le_bytes());
    for (key, value) in comments {
        let entry = format!("{}={}", key, value);
        comment.extend(u32::try_from(entry.len()).unwrap().to_le_bytes());
        comment.extend(entry.as_bytes());
    }

    let mut out = b"fLaC".to_vec();
    out.extend(block_header(0, false, info.len()));
    out.extend(info);
    out.extend(block_header(4, true, comment.len()));
    out.extend(comment);
    out.extend([0u8; 64]);
    out
}

fn block_header(kind: u8, last: bool, len: usize) -> [u8; 4] {
    let len = u32::try_from(len).unwrap().to_be_bytes();
    [if last { kind | 0x80 } else { kind }, len[1], len[2], len[3]]
}

/// Album directory with one tagged track
pub fn write_album(dir: &Path) {
    let bytes = flac_file(&[
        ("ALBUM", fixtures::ALBUM),
        ("TITLE", fixtures::TRACK_TITLE),
        ("ARTIST", fixtures::TRACK_ARTIST),
        ("TRACKNUMBER", "1"),
    ]);
    std::fs::write(dir.join("01.flac"), bytes).unwrap();
}
