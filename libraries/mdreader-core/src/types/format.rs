//! Container format families
use crate::error::UnknownFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported container families
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    /// MPEG audio with ID3v2 tags
    Mp3,
    /// FLAC with Vorbis comment blocks
    Flac,
    /// WavPack with APEv2 tags
    WavPack,
    /// DSD stream file with an embedded ID3v2 chunk
    Dsf,
}

impl FormatKind {
    /// Every supported family
    pub const ALL: &'static [FormatKind] = &[
        FormatKind::Mp3,
        FormatKind::Flac,
        FormatKind::WavPack,
        FormatKind::Dsf,
    ];

    /// Lowercase family name
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatKind::Mp3 => "mp3",
            FormatKind::Flac => "flac",
            FormatKind::WavPack => "wavpack",
            FormatKind::Dsf => "dsf",
        }
    }

    /// File extension (lowercase, without the dot)
    pub fn extension(&self) -> &'static str {
        match self {
            FormatKind::Mp3 => "mp3",
            FormatKind::Flac => "flac",
            FormatKind::WavPack => "wv",
            FormatKind::Dsf => "dsf",
        }
    }

    /// Look up a family by file extension, ignoring case
    pub fn from_extension(ext: &str) -> Option<Self> {
        FormatKind::ALL
            .iter()
            .find(|kind| kind.extension().eq_ignore_ascii_case(ext))
            .copied()
    }
}

impl FromStr for FormatKind {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatKind::ALL
            .iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s) || kind.extension().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
