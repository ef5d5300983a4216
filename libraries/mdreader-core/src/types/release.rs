//! Album-level release model
use crate::types::{Actors, Genres, Picture, Track};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Album-level work credits (composers and other writers)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    /// Contributors to the composition
    #[serde(default)]
    pub actors: Actors,
}

/// Album-level recording credits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// Performers and other recording contributors
    #[serde(default)]
    pub actors: Actors,

    /// Union of genres across tracks
    #[serde(default)]
    pub genres: Genres,
}

/// A disc of the release
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Disc {
    /// 1-based disc number
    pub number: u32,

    /// Disc set subtitle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Disc identifier such as a CDDB id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Physical or digital medium ("CD", "Vinyl", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
}

impl Disc {
    /// A disc carrying only its number
    pub fn numbered(number: u32) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }
}

/// A label and catalogue number pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Publishing {
    /// Label name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Catalogue number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catno: Option<String>,
}

/// External identifiers keyed by name (`DISCOGS_RELEASE_ID`, `BARCODE`, ...)
///
/// Keeps insertion order and the first value seen for a key. Serialized as
/// a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identifiers(Vec<(String, String)>);

impl Identifiers {
    /// Record `key = value` unless the key is already present
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        let value = value.into();
        if key.is_empty() || value.is_empty() || self.get(&key).is_some() {
            return false;
        }
        self.0.push((key, value));
        true
    }

    /// Value recorded for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Add every entry of `other` whose key is new
    pub fn merge(&mut self, other: &Identifiers) {
        for (key, value) in other.iter() {
            self.insert(key, value);
        }
    }

    /// Iterate `(key, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of identifiers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether no identifier is recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Identifiers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Identifiers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdentifiersVisitor;

        impl<'de> Visitor<'de> for IdentifiersVisitor {
            type Value = Identifiers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of identifier names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut ids = Identifiers::default();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    ids.insert(key, value);
                }
                Ok(ids)
            }
        }

        deserializer.deserialize_map(IdentifiersVisitor)
    }
}

/// One album assembled from a directory of tracks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Album title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Year of first release
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_year: Option<i32>,

    /// Album-level composition credits
    #[serde(default)]
    pub work: Work,

    /// Album-level recording credits
    #[serde(default)]
    pub recording: Recording,

    /// Distinct discs, ascending
    #[serde(default)]
    pub discs: Vec<Disc>,

    /// Various-artists compilation
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub compilation: bool,

    /// Number of tracks on the release
    #[serde(default)]
    pub total_tracks: u32,

    /// Tracks ordered by disc then position
    #[serde(default)]
    pub tracks: Vec<Track>,

    /// Release country
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Label and catalogue number pairs
    #[serde(default)]
    pub publishing: Vec<Publishing>,

    /// Year of this edition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    /// Free-form album notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// External identifiers
    #[serde(default)]
    pub identifiers: Identifiers,

    /// Distinct embedded pictures
    #[serde(default)]
    pub pictures: Vec<Picture>,
}

impl Release {
    /// Add a picture unless the same artwork is already present
    pub fn add_picture(&mut self, picture: Picture) -> bool {
        if self.pictures.iter().any(|p| p.same_artwork(&picture)) {
            return false;
        }
        self.pictures.push(picture);
        true
    }

    /// Add a publishing pair unless already present or empty
    pub fn add_publishing(&mut self, publishing: Publishing) -> bool {
        if publishing.name.is_none() && publishing.catno.is_none() {
            return false;
        }
        if self.publishing.contains(&publishing) {
            return false;
        }
        self.publishing.push(publishing);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identifiers_keep_first_value_and_order() {
        let mut ids = Identifiers::default();
        assert!(ids.insert("DISCOGS_RELEASE_ID", "123456789"));
        assert!(ids.insert("BARCODE", "0123"));
        assert!(!ids.insert("DISCOGS_RELEASE_ID", "999"));

        assert_eq!(ids.get("DISCOGS_RELEASE_ID"), Some("123456789"));
        assert_eq!(
            serde_json::to_string(&ids).unwrap(),
            r#"{"DISCOGS_RELEASE_ID":"123456789","BARCODE":"0123"}"#
        );
    }

    #[test]
    fn identifiers_read_back_from_json() {
        let ids: Identifiers = serde_json::from_str(r#"{"RUTRACKER":"42"}"#).unwrap();
        assert_eq!(ids.get("RUTRACKER"), Some("42"));
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn publishing_pairs_are_unique() {
        let mut release = Release::default();
        let pair = Publishing {
            name: Some("Columbia".into()),
            catno: Some("CL 1355".into()),
        };
        assert!(release.add_publishing(pair.clone()));
        assert!(!release.add_publishing(pair));
        assert!(!release.add_publishing(Publishing::default()));
        assert_eq!(release.publishing.len(), 1);
    }

    #[test]
    fn empty_release_serializes_collections() {
        let json = serde_json::to_value(Release::default()).unwrap();
        assert_eq!(json["total_tracks"], 0);
        assert!(json["tracks"].as_array().unwrap().is_empty());
        assert!(json["identifiers"].as_object().unwrap().is_empty());
        assert!(json.get("title").is_none());
        assert!(json.get("compilation").is_none());
    }

    #[test]
    fn disc_omits_unknown_attributes() {
        let json = serde_json::to_value(Disc::numbered(2)).unwrap();
        assert_eq!(json, serde_json::json!({"number": 2}));

        let disc = Disc {
            media: Some("CD".into()),
            ..Disc::numbered(1)
        };
        assert_eq!(serde_json::to_value(disc).unwrap()["media"], "CD");
    }

    proptest! {
        #[test]
        fn identifiers_never_hold_duplicate_keys(
            entries in proptest::collection::vec(("[A-C]{1,2}", "[0-9]{1,3}"), 0..20)
        ) {
            let mut ids = Identifiers::default();
            for (k, v) in &entries {
                ids.insert(k.clone(), v.clone());
            }
            let mut keys: Vec<_> = ids.iter().map(|(k, _)| k.to_string()).collect();
            let count = keys.len();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), count);

            for (k, v) in ids.iter() {
                let first = entries.iter().find(|(ek, _)| ek == k).map(|(_, ev)| ev.as_str());
                prop_assert_eq!(Some(v), first);
            }
        }
    }
}
