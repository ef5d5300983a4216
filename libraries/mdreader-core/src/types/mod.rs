//! Domain types
mod actor;
mod audio;
mod format;
mod picture;
mod release;
mod track;

pub use actor::{Actor, ActorRole, Actors, Genres};
pub use audio::{AudioInfo, FileInfo};
pub use format::FormatKind;
pub use picture::{PictType, Picture, PictureMeta};
pub use release::{Disc, Identifiers, Publishing, Recording, Release, Work};
pub use track::{format_position, Composition, Lyrics, Record, TagMap, Track};
