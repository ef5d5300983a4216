//! mdreader Core
//!
//! Format-agnostic domain types shared by the tag extractors and the
//! request service.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Release model**: `Release`, `Track`, `Disc`, `Publishing`, `Picture`
//! - **Contributors**: `Actor`, `ActorRole` and the ordered `Actors` list
//! - **File facts**: `FormatKind`, `FileInfo`, `AudioInfo`
//! - **Error vocabulary**: `ErrorKind` and the `Diagnostic` record that
//!   carries it over the wire
//!
//! # Example
//!
//! ```rust
//! use mdreader_core::{ActorRole, Actors, Release};
//!
//! let mut release = Release::default();
//! release.title = Some("Kind of Blue".to_string());
//! release.recording.actors.add("Miles Davis", ActorRole::Performer);
//! assert_eq!(release.recording.actors.first(), Some("Miles Davis"));
//!
//! // The same name in the same role is stored once
//! let mut actors = Actors::default();
//! assert!(actors.add("Bill Evans", ActorRole::Performer));
//! assert!(!actors.add("Bill Evans", ActorRole::Performer));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;

pub use error::{Diagnostic, ErrorKind, UnknownFormat};
pub use types::{
    format_position, Actor, ActorRole, Actors, AudioInfo, Composition, Disc, FileInfo,
    FormatKind, Genres, Identifiers, Lyrics, PictType, Picture, PictureMeta, Publishing, Record,
    Recording, Release, TagMap, Track, Work,
};
