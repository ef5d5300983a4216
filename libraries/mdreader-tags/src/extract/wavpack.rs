//! WavPack block header and APEv2 tag
use crate::bag::RawTagBag;
use crate::binary::{ByteCursor, Source};
use crate::error::{Result, TagReadError};
use crate::extract::apev2;
use mdreader_core::AudioInfo;
use std::io::{Read, Seek};
use tracing::debug;

const HEADER_LEN: u64 = 32;
/// Sub-blocks beyond this are audio data and never needed
const MAX_BLOCK_READ: u64 = 1 << 20;

const FLAG_BYTES_MASK: u32 = 0x03;
const FLAG_MONO: u32 = 0x04;
const FLAG_INITIAL: u32 = 0x0800;
const FLAG_FINAL: u32 = 0x1000;
const FLAG_FALSE_STEREO: u32 = 0x4000_0000;
const FLAG_DSD: u32 = 0x8000_0000;
const SRATE_SHIFT: u32 = 23;
const SRATE_MASK: u32 = 0x0F;

const ID_UNIQUE: u8 = 0x3F;
const ID_ODD_SIZE: u8 = 0x40;
const ID_LARGE: u8 = 0x80;
const ID_CHANNEL_INFO: u8 = 0x0D;
const ID_SAMPLE_RATE: u8 = 0x27;

const SAMPLE_RATES: [u32; 15] = [
    6_000, 8_000, 9_600, 11_025, 12_000, 16_000, 22_050, 24_000, 32_000, 44_100, 48_000, 64_000,
    88_200, 96_000, 192_000,
];

fn missing(message: impl Into<String>) -> TagReadError {
    TagReadError::MissingWavPackHeader(message.into())
}

#[derive(Debug, Default)]
struct SubBlocks {
    channels: Option<u16>,
    sample_rate: Option<u32>,
}

pub(crate) fn read<R: Read + Seek>(source: &mut Source<R>, bag: &mut RawTagBag) -> Result<()> {
    let header = source.read_at(0, HEADER_LEN, TagReadError::MissingWavPackHeader)?;
    let mut cur = ByteCursor::new(&header, TagReadError::MissingWavPackHeader);
    if cur.take(4)? != b"wvpk" {
        return Err(missing("file does not start with a wvpk block"));
    }
    let block_size = cur.u32_le()?;
    let version = cur.u16_le()?;
    let _block_index_high = cur.u8()?;
    let total_high = cur.u8()?;
    let total_low = cur.u32_le()?;
    cur.skip(8)?;
    let flags = cur.u32_le()?;

    if !(0x402..=0x410).contains(&version) {
        return Err(missing(format!("unsupported stream version 0x{:X}", version)));
    }

    let body_len = (u64::from(block_size) + 8)
        .checked_sub(HEADER_LEN)
        .ok_or_else(|| missing("block size smaller than its header"))?;
    let body = source.read_up_to(HEADER_LEN, body_len.min(MAX_BLOCK_READ))?;
    let sub = sub_blocks(&body);

    bag.audio = audio_info(flags, total_high, total_low, &sub, source.len());
    debug!(version, flags, "read WavPack block header");

    apev2::read(source, bag)?;
    Ok(())
}

fn audio_info(
    flags: u32,
    total_high: u8,
    total_low: u32,
    sub: &SubBlocks,
    file_len: u64,
) -> AudioInfo {
    let mut info = AudioInfo {
        channels: channels(flags, sub),
        ..AudioInfo::default()
    };
    if flags & FLAG_DSD != 0 {
        return info;
    }

    info.sample_size = Some((((flags & FLAG_BYTES_MASK) + 1) * 8) as u16);
    let index = ((flags >> SRATE_SHIFT) & SRATE_MASK) as usize;
    info.sample_rate = SAMPLE_RATES.get(index).copied().or(sub.sample_rate);

    let total_samples = (total_low != u32::MAX)
        .then(|| (u64::from(total_high) << 32) | u64::from(total_low));
    if let (Some(samples), Some(rate)) = (total_samples, info.sample_rate) {
        if samples > 0 && rate > 0 {
            let ms = samples * 1000 / u64::from(rate);
            if ms > 0 {
                info.duration_ms = Some(ms);
                info.avg_bitrate = Some((file_len * 8 / ms) as u32);
            }
        }
    }
    info
}

/// Channel count only when the header states it unambiguously
fn channels(flags: u32, sub: &SubBlocks) -> Option<u16> {
    if flags & FLAG_MONO != 0 && flags & FLAG_FALSE_STEREO == 0 {
        return Some(1);
    }
    if let Some(count) = sub.channels {
        return Some(count);
    }
    let single_block = flags & FLAG_INITIAL != 0 && flags & FLAG_FINAL != 0;
    if single_block || flags & FLAG_FALSE_STEREO != 0 {
        return Some(2);
    }
    None
}

/// Walk metadata sub-blocks, stopping quietly at the first malformed one
fn sub_blocks(body: &[u8]) -> SubBlocks {
    let mut found = SubBlocks::default();
    let mut cur = ByteCursor::new(body, TagReadError::MissingWavPackHeader);
    while !cur.is_empty() {
        let Ok(id) = cur.u8() else { break };
        let words = if id & ID_LARGE != 0 {
            cur.u24_le()
        } else {
            cur.u8().map(u32::from)
        };
        let Ok(words) = words else { break };
        let Ok(data) = cur.take_u32(words * 2) else { break };
        let data = if id & ID_ODD_SIZE != 0 && !data.is_empty() {
            &data[..data.len() - 1]
        } else {
            data
        };

        match id & ID_UNIQUE {
            ID_CHANNEL_INFO if !data.is_empty() => {
                found.channels = Some(u16::from(data[0]));
            }
            ID_SAMPLE_RATE if data.len() >= 3 => {
                found.sample_rate = Some(u32::from_le_bytes([data[0], data[1], data[2], 0]));
            }
            _ => {}
        }
    }
    found
}
