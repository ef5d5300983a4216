//! A single track and the credits attached to it
use crate::types::{Actors, AudioInfo, FileInfo, Genres};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Credits of the underlying musical work
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    /// Composers, lyricists and writers
    #[serde(default)]
    pub actor_roles: Actors,
}

/// Credits and classification of this particular recording
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Performers, track artists, producers and so on
    #[serde(default)]
    pub actors: Actors,

    /// Genres declared on the track
    #[serde(default)]
    pub genres: Genres,

    /// Moods declared on the track
    #[serde(default, skip_serializing_if = "Genres::is_empty")]
    pub moods: Genres,
}

/// Lyrics text and its language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyrics {
    /// Lyrics text, lines separated by `\n`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Text came from time-synchronised lyrics
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synced: bool,

    /// ISO 639-2 language code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Tags no canonical field consumed, keyed by their format-native name
///
/// Keeps first-seen key order. Serialized as an object of string arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap(Vec<(String, Vec<String>)>);

impl TagMap {
    /// Append `value` under `key`
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            None => self.0.push((key, vec![value])),
        }
    }

    /// Values recorded under `key`
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Iterate `(key, values)` in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether no tag is recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for TagMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, values) in &self.0 {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TagMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TagMapVisitor;

        impl<'de> Visitor<'de> for TagMapVisitor {
            type Value = TagMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of tag names to value lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut tags = TagMap::default();
                while let Some((key, values)) = access.next_entry::<String, Vec<String>>()? {
                    for value in values {
                        tags.push(key.clone(), value);
                    }
                }
                Ok(tags)
            }
        }

        deserializer.deserialize_map(TagMapVisitor)
    }
}

/// One audio file as a release track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Track position, zero-padded to at least two digits ("03")
    pub position: String,

    /// Disc number, 1-based
    pub disc: u32,

    /// Track title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Duration in whole seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,

    /// Source file facts
    pub file_info: FileInfo,

    /// Structural audio facts
    pub audio_info: AudioInfo,

    /// Work credits
    #[serde(default)]
    pub composition: Composition,

    /// Recording credits
    #[serde(default)]
    pub record: Record,

    /// International Standard Recording Code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isrc: Option<String>,

    /// Free-form track notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Content group (work or movement grouping)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_group: Option<String>,

    /// Lyrics, unsynchronised text preferred
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<Lyrics>,

    /// Tags left over after normalization
    #[serde(default, skip_serializing_if = "TagMap::is_empty")]
    pub unprocessed: TagMap,
}

impl Track {
    /// Numeric value of the position, if it parses
    pub fn position_number(&self) -> Option<u32> {
        self.position.trim().parse().ok()
    }
}

/// Render a track number the way positions are reported
pub fn format_position(number: u32) -> String {
    format!("{:02}", number)
}
