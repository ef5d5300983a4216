//! MPEG audio frame headers
use mdreader_core::AudioInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MpegVersion {
    V1,
    V2,
    V25,
}

/// A decoded 4-byte frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameHeader {
    pub(crate) version: MpegVersion,
    pub(crate) layer: u8,
    pub(crate) bitrate_kbps: u32,
    pub(crate) sample_rate: u32,
    pub(crate) channels: u16,
    pub(crate) protected: bool,
    pub(crate) frame_len: usize,
    pub(crate) samples_per_frame: u32,
}

const BITRATES_V1: [[u32; 15]; 3] = [
    [0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448],
    [0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384],
    [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320],
];

const BITRATES_V2: [[u32; 15]; 3] = [
    [0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256],
    [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160],
    [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160],
];

impl FrameHeader {
    pub(crate) fn parse(b: [u8; 4]) -> Option<Self> {
        if b[0] != 0xFF || b[1] & 0xE0 != 0xE0 {
            return None;
        }
        let version = match (b[1] >> 3) & 0x03 {
            0 => MpegVersion::V25,
            2 => MpegVersion::V2,
            3 => MpegVersion::V1,
            _ => return None,
        };
        let layer = match (b[1] >> 1) & 0x03 {
            1 => 3,
            2 => 2,
            3 => 1,
            _ => return None,
        };
        let bitrate_index = usize::from(b[2] >> 4);
        if bitrate_index == 0 || bitrate_index == 15 {
            return None;
        }
        let table = match version {
            MpegVersion::V1 => &BITRATES_V1,
            MpegVersion::V2 | MpegVersion::V25 => &BITRATES_V2,
        };
        let bitrate_kbps = table[usize::from(layer - 1)][bitrate_index];

        let base_rate = match (b[2] >> 2) & 0x03 {
            0 => 44_100,
            1 => 48_000,
            2 => 32_000,
            _ => return None,
        };
        let sample_rate = match version {
            MpegVersion::V1 => base_rate,
            MpegVersion::V2 => base_rate / 2,
            MpegVersion::V25 => base_rate / 4,
        };
        let padding = u32::from((b[2] >> 1) & 0x01);
        let channels = if b[3] >> 6 == 3 { 1 } else { 2 };

        let samples_per_frame = match (layer, version) {
            (1, _) => 384,
            (2, _) | (3, MpegVersion::V1) => 1152,
            _ => 576,
        };
        let frame_len = if layer == 1 {
            (12 * bitrate_kbps * 1000 / sample_rate + padding) * 4
        } else {
            samples_per_frame / 8 * bitrate_kbps * 1000 / sample_rate + padding
        };

        Some(Self {
            version,
            layer,
            bitrate_kbps,
            sample_rate,
            channels,
            protected: b[1] & 0x01 == 0,
            frame_len: frame_len as usize,
            samples_per_frame,
        })
    }

    /// Offset of a Xing/Info header inside the frame
    fn xing_offset(&self) -> usize {
        let side_info = match (self.version, self.channels) {
            (MpegVersion::V1, 1) => 17,
            (MpegVersion::V1, _) => 32,
            (_, 1) => 9,
            _ => 17,
        };
        4 + side_info + if self.protected { 2 } else { 0 }
    }
}

fn header_at(data: &[u8], pos: usize) -> Option<FrameHeader> {
    let bytes = data.get(pos..pos + 4)?;
    FrameHeader::parse([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// First frame header in `data`, confirmed by the following frame when
/// it lies inside the buffer
pub(crate) fn find_frame(data: &[u8]) -> Option<(usize, FrameHeader)> {
    (0..data.len().saturating_sub(3)).find_map(|pos| {
        let header = header_at(data, pos)?;
        let next = pos + header.frame_len;
        if next + 4 <= data.len() {
            let following = header_at(data, next)?;
            if following.version != header.version || following.layer != header.layer {
                return None;
            }
        }
        Some((pos, header))
    })
}

/// Frame count from a Xing or Info header in the frame at `data[0..]`
pub(crate) fn xing_frames(data: &[u8], header: &FrameHeader) -> Option<u32> {
    let offset = header.xing_offset();
    let marker = data.get(offset..offset + 4)?;
    if marker != b"Xing" && marker != b"Info" {
        return None;
    }
    let flags = data.get(offset + 4..offset + 8)?;
    if flags[3] & 0x01 == 0 {
        return None;
    }
    let frames = data.get(offset + 8..offset + 12)?;
    Some(u32::from_be_bytes([frames[0], frames[1], frames[2], frames[3]]))
}

/// Structural parameters of an MPEG stream
///
/// `data` starts at the first frame; `audio_len` is the byte length of
/// the whole stream. An exact `duration_ms` (from a length tag) wins
/// over the estimate.
pub(crate) fn audio_info(
    data: &[u8],
    header: &FrameHeader,
    audio_len: u64,
    exact_ms: Option<u64>,
) -> AudioInfo {
    let frames = xing_frames(data, header).map(u64::from);
    let estimated_ms = match frames {
        Some(frames) => {
            Some(frames * u64::from(header.samples_per_frame) * 1000 / u64::from(header.sample_rate))
        }
        None if header.frame_len > 0 => {
            let count = audio_len / header.frame_len as u64;
            Some(count * u64::from(header.samples_per_frame) * 1000 / u64::from(header.sample_rate))
        }
        None => None,
    };
    let duration_ms = exact_ms.or(estimated_ms).filter(|ms| *ms > 0);

    let avg_bitrate = match (frames, duration_ms) {
        (Some(_), Some(ms)) => Some((audio_len * 8 / ms) as u32),
        _ => Some(header.bitrate_kbps),
    };

    AudioInfo {
        sample_rate: Some(header.sample_rate),
        sample_size: None,
        channels: Some(header.channels),
        duration_ms,
        avg_bitrate,
    }
}
