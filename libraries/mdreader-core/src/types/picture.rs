//! Embedded artwork
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Picture type as defined by the ID3v2 APIC frame and FLAC PICTURE block
///
/// Both formats share the same 0-20 code table. Serialized as the code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PictType {
    /// 0
    #[default]
    Other,
    /// 1, 32x32 PNG file icon
    FileIcon,
    /// 2
    OtherFileIcon,
    /// 3
    CoverFront,
    /// 4
    CoverBack,
    /// 5
    Leaflet,
    /// 6
    Media,
    /// 7
    LeadArtist,
    /// 8
    Artist,
    /// 9
    Conductor,
    /// 10
    Band,
    /// 11
    Composer,
    /// 12
    Lyricist,
    /// 13
    RecordingLocation,
    /// 14
    DuringRecording,
    /// 15
    DuringPerformance,
    /// 16
    ScreenCapture,
    /// 17
    BrightColouredFish,
    /// 18
    Illustration,
    /// 19
    ArtistLogotype,
    /// 20
    PublisherLogotype,
}

impl PictType {
    const TABLE: [PictType; 21] = [
        PictType::Other,
        PictType::FileIcon,
        PictType::OtherFileIcon,
        PictType::CoverFront,
        PictType::CoverBack,
        PictType::Leaflet,
        PictType::Media,
        PictType::LeadArtist,
        PictType::Artist,
        PictType::Conductor,
        PictType::Band,
        PictType::Composer,
        PictType::Lyricist,
        PictType::RecordingLocation,
        PictType::DuringRecording,
        PictType::DuringPerformance,
        PictType::ScreenCapture,
        PictType::BrightColouredFish,
        PictType::Illustration,
        PictType::ArtistLogotype,
        PictType::PublisherLogotype,
    ];

    /// Map a tag code; codes above 20 fold into `Other`
    pub fn from_code(code: u32) -> Self {
        Self::TABLE
            .get(code as usize)
            .copied()
            .unwrap_or(PictType::Other)
    }

    /// Numeric tag code
    pub fn as_code(&self) -> u8 {
        *self as u8
    }
}

impl Serialize for PictType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_code())
    }
}

impl<'de> Deserialize<'de> for PictType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u32::deserialize(deserializer)?;
        Ok(PictType::from_code(code))
    }
}

/// Descriptive facts about an embedded image
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PictureMeta {
    /// MIME type such as `image/jpeg`
    pub mime_type: String,

    /// Free-form description from the tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Width in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Height in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Bits per pixel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_depth: Option<u32>,
}

/// An embedded image with its raw bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Picture {
    /// What the image depicts
    pub pict_type: PictType,

    /// Image facts
    pub pict_meta: PictureMeta,

    /// Encoded image data, base64 on the wire
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

impl Picture {
    /// Two pictures are the same artwork when type, MIME and bytes agree
    pub fn same_artwork(&self, other: &Picture) -> bool {
        self.pict_type == other.pict_type
            && self.pict_meta.mime_type == other.pict_meta.mime_type
            && self.bytes == other.bytes
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
