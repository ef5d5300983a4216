/// Raw, format-native tag data for one file
use mdreader_core::{AudioInfo, Diagnostic, FileInfo, Picture};

/// Tag values keyed by their format-native name
///
/// Keys keep first-insertion order and each key holds its values in the
/// order they were read. Vorbis and APEv2 keys are stored uppercased;
/// ID3 keys are frame ids, with `TXXX:<DESC>` and `COMM:<desc>` forms
/// for described frames.
#[derive(Debug, Clone)]
pub struct RawTagBag {
    /// File the tags were read from
    pub file_info: FileInfo,

    /// Structural audio parameters
    pub audio: AudioInfo,

    /// Embedded pictures in file order
    pub pictures: Vec<Picture>,

    /// Non-fatal problems found while reading
    pub warnings: Vec<Diagnostic>,

    tags: Vec<(String, Vec<String>)>,
}

impl RawTagBag {
    /// Create an empty bag for a file
    pub fn new(file_info: FileInfo) -> Self {
        Self {
            file_info,
            audio: AudioInfo::default(),
            pictures: Vec::new(),
            warnings: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Append a value under `key`
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.tags.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.tags.push((key, vec![value])),
        }
    }

    /// All values under `key`
    pub fn values(&self, key: &str) -> &[String] {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map_or(&[], |(_, v)| v.as_slice())
    }

    /// First value under `key`
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values(key).first().map(String::as_str)
    }

    /// Iterate keys with their values, in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check whether no tag was read
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.pictures.is_empty()
    }

    /// Move tags and pictures of `other` into this bag
    pub(crate) fn absorb(&mut self, other: RawTagBag) {
        for (key, values) in other.tags {
            for value in values {
                self.push(key.clone(), value);
            }
        }
        self.pictures.extend(other.pictures);
        self.warnings.extend(other.warnings);
    }
}

#[cfg(test)]
pub(crate) fn test_bag(format: mdreader_core::FormatKind) -> RawTagBag {
    RawTagBag::new(FileInfo {
        file_name: format!("test.{}", format.extension()),
        container_format: format,
        file_size: 0,
        mod_time: None,
    })
}
