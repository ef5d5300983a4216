//! Structural audio facts and file facts
use crate::types::FormatKind;
use serde::{Deserialize, Serialize};

/// Structural audio parameters read from container headers
///
/// Every field is optional: `None` means the value is not determinable
/// for this file or format, which is distinct from a zero reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioInfo {
    /// Sample rate in Hz
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,

    /// Bits per sample
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<u16>,

    /// Number of channels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u16>,

    /// Duration in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    /// Average bitrate in kbit/s
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_bitrate: Option<u32>,
}

impl AudioInfo {
    /// Check whether any parameter is known
    pub fn is_empty(&self) -> bool {
        self.sample_rate.is_none()
            && self.sample_size.is_none()
            && self.channels.is_none()
            && self.duration_ms.is_none()
            && self.avg_bitrate.is_none()
    }

    /// Duration in whole seconds, rounded to nearest
    pub fn duration_secs(&self) -> Option<u64> {
        self.duration_ms.map(|ms| (ms + 500) / 1000)
    }
}

/// Facts about the file a track came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// File name without directory
    pub file_name: String,

    /// Container family the file was classified as
    pub container_format: FormatKind,

    /// Size in bytes
    pub file_size: u64,

    /// Modification time, Unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mod_time: Option<i64>,
}
