//! Per-format tag key to canonical field tables
//!
//! MP3 and DSF share the ID3 table. Vorbis and APEv2 keys are matched
//! uppercased; ID3 frame ids exactly.

use mdreader_core::{ActorRole, FormatKind};

/// Canonical destination of a raw tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    AlbumTitle,
    TrackTitle,
    TrackSubtitle,
    Actor(ActorRole),
    Genre,
    TrackNumber,
    TrackTotal,
    DiscNumber,
    DiscTotal,
    Label,
    CatalogNumber,
    Copyright,
    Country,
    Year,
    OriginalYear,
    Notes,
    Isrc,
    Identifier(&'static str),
    Mood,
    Compilation,
    UnsyncedLyrics,
    SyncedLyrics,
    Language,
    Media,
    DiscId,
    DiscSubtitle,
    ContentGroup,
    /// Duration text, milliseconds or `h:mm:ss`
    Length,
    RecordingDates,
}

use ActorRole::{
    Arranger, Composer, Conductor, Engineer, Ensemble, Lyricist, Mixer, Performer, Producer,
    Remixer, Soloist, TrackArtist, Writer,
};
use Field::{
    Actor, AlbumTitle, CatalogNumber, Compilation, ContentGroup, Copyright, Country, DiscId,
    DiscNumber, DiscSubtitle, DiscTotal, Genre, Identifier, Isrc, Label, Language, Length,
    Media, Mood, Notes, OriginalYear, RecordingDates, SyncedLyrics, TrackNumber, TrackSubtitle,
    TrackTitle, TrackTotal, UnsyncedLyrics, Year,
};

const ID3: &[(&str, Field)] = &[
    ("TALB", AlbumTitle),
    ("TIT2", TrackTitle),
    ("TIT3", TrackSubtitle),
    ("TPE2", Actor(Performer)),
    ("TMCL", Actor(Performer)),
    ("TPE1", Actor(TrackArtist)),
    ("TCOM", Actor(Composer)),
    ("TEXT", Actor(Lyricist)),
    ("TPE3", Actor(Conductor)),
    ("TPE4", Actor(Remixer)),
    ("TIPL:arranger", Actor(Arranger)),
    ("TIPL:engineer", Actor(Engineer)),
    ("TIPL:producer", Actor(Producer)),
    ("TIPL:mix", Actor(Mixer)),
    ("TIPL:dj-mix", Actor(Mixer)),
    ("TCON", Genre),
    ("TRCK", TrackNumber),
    ("TXXX:TRACKTOTAL", TrackTotal),
    ("TXXX:TOTALTRACKS", TrackTotal),
    ("TPOS", DiscNumber),
    ("TXXX:DISCTOTAL", DiscTotal),
    ("TXXX:TOTALDISCS", DiscTotal),
    ("TPUB", Label),
    ("TXXX:LABEL", Label),
    ("TXXX:CATALOGNUMBER", CatalogNumber),
    ("TCOP", Copyright),
    ("TXXX:COUNTRY", Country),
    ("TXXX:RELEASECOUNTRY", Country),
    ("TYER", Year),
    ("TDRC", Year),
    ("TORY", OriginalYear),
    ("TDOR", OriginalYear),
    ("COMM", Notes),
    ("TSRC", Isrc),
    ("TXXX:BARCODE", Identifier("BARCODE")),
    ("TXXX:UPC", Identifier("BARCODE")),
    ("TXXX:DISCOGS_RELEASE_ID", Identifier("DISCOGS_RELEASE_ID")),
    ("TXXX:MUSICBRAINZ_ALBUMID", Identifier("MUSICBRAINZ_ALBUMID")),
    ("TXXX:MUSICBRAINZ ALBUM ID", Identifier("MUSICBRAINZ_ALBUMID")),
    ("TXXX:RUTRACKER", Identifier("RUTRACKER")),
    ("TXXX:ACCURATERIPDISCID", Identifier("ACCURATERIPDISCID")),
    ("TMOO", Mood),
    ("TCMP", Compilation),
    ("TXXX:COMPILATION", Compilation),
    ("USLT", UnsyncedLyrics),
    ("SYLT", SyncedLyrics),
    ("TLAN", Language),
    ("USLT:LANG", Language),
    ("SYLT:LANG", Language),
    ("TMED", Media),
    ("TXXX:MEDIA", Media),
    ("TXXX:DISCID", DiscId),
    ("TSST", DiscSubtitle),
    ("TIT1", ContentGroup),
    ("TLEN", Length),
    ("TRDA", RecordingDates),
];

const VORBIS: &[(&str, Field)] = &[
    ("ALBUM", AlbumTitle),
    ("TITLE", TrackTitle),
    ("SUBTITLE", TrackSubtitle),
    ("ALBUMARTIST", Actor(Performer)),
    ("PERFORMER", Actor(Performer)),
    ("ARTIST", Actor(TrackArtist)),
    ("COMPOSER", Actor(Composer)),
    ("LYRICIST", Actor(Lyricist)),
    ("AUTHOR", Actor(Writer)),
    ("WRITER", Actor(Writer)),
    ("ARRANGER", Actor(Arranger)),
    ("CONDUCTOR", Actor(Conductor)),
    ("ENSEMBLE", Actor(Ensemble)),
    ("ENGINEER", Actor(Engineer)),
    ("MIXER", Actor(Mixer)),
    ("PRODUCER", Actor(Producer)),
    ("REMIXER", Actor(Remixer)),
    ("SOLOISTS", Actor(Soloist)),
    ("GENRE", Genre),
    ("STYLE", Genre),
    ("TRACKNUMBER", TrackNumber),
    ("TRACKTOTAL", TrackTotal),
    ("TOTALTRACKS", TrackTotal),
    ("DISCNUMBER", DiscNumber),
    ("DISCTOTAL", DiscTotal),
    ("TOTALDISCS", DiscTotal),
    ("LABEL", Label),
    ("PUBLISHER", Label),
    ("ORGANIZATION", Label),
    ("CATALOGNUMBER", CatalogNumber),
    ("LABELNO", CatalogNumber),
    ("COPYRIGHT", Copyright),
    ("COUNTRY", Country),
    ("RELEASECOUNTRY", Country),
    ("DATE", Year),
    ("YEAR", Year),
    ("ORIGINALDATE", OriginalYear),
    ("ORIGINALYEAR", OriginalYear),
    ("DESCRIPTION", Notes),
    ("COMMENT", Notes),
    ("ISRC", Isrc),
    ("BARCODE", Identifier("BARCODE")),
    ("UPC", Identifier("BARCODE")),
    ("DISCOGS_RELEASE_ID", Identifier("DISCOGS_RELEASE_ID")),
    ("MUSICBRAINZ_ALBUMID", Identifier("MUSICBRAINZ_ALBUMID")),
    ("RUTRACKER", Identifier("RUTRACKER")),
    ("ACCURATERIPDISCID", Identifier("ACCURATERIPDISCID")),
    ("MOOD", Mood),
    ("COMPILATION", Compilation),
    ("LYRICS", UnsyncedLyrics),
    ("UNSYNCEDLYRICS", UnsyncedLyrics),
    ("LANGUAGE", Language),
    ("MEDIA", Media),
    ("DISCID", DiscId),
    ("DISCSUBTITLE", DiscSubtitle),
    ("GROUPING", ContentGroup),
];

const APE: &[(&str, Field)] = &[
    ("ALBUM", AlbumTitle),
    ("TITLE", TrackTitle),
    ("SUBTITLE", TrackSubtitle),
    ("ALBUMARTIST", Actor(Performer)),
    ("ALBUM ARTIST", Actor(Performer)),
    ("PERFORMER", Actor(Performer)),
    ("ARTIST", Actor(TrackArtist)),
    ("COMPOSER", Actor(Composer)),
    ("LYRICIST", Actor(Lyricist)),
    ("WRITER", Actor(Writer)),
    ("ARRANGER", Actor(Arranger)),
    ("CONDUCTOR", Actor(Conductor)),
    ("ENGINEER", Actor(Engineer)),
    ("MIXER", Actor(Mixer)),
    ("PRODUCER", Actor(Producer)),
    ("MIXARTIST", Actor(Remixer)),
    ("GENRE", Genre),
    ("TRACK", TrackNumber),
    ("TRACKTOTAL", TrackTotal),
    ("DISC", DiscNumber),
    ("DISCTOTAL", DiscTotal),
    ("LABEL", Label),
    ("PUBLISHER", Label),
    ("CATALOGNUMBER", CatalogNumber),
    ("COPYRIGHT", Copyright),
    ("COUNTRY", Country),
    ("RELEASECOUNTRY", Country),
    ("YEAR", Year),
    ("ORIGINALYEAR", OriginalYear),
    ("COMMENT", Notes),
    ("ISRC", Isrc),
    ("BARCODE", Identifier("BARCODE")),
    ("UPC", Identifier("BARCODE")),
    ("DISCOGS_RELEASE_ID", Identifier("DISCOGS_RELEASE_ID")),
    ("MUSICBRAINZ_ALBUMID", Identifier("MUSICBRAINZ_ALBUMID")),
    ("RUTRACKER", Identifier("RUTRACKER")),
    ("ACCURATERIPDISCID", Identifier("ACCURATERIPDISCID")),
    ("MOOD", Mood),
    ("COMPILATION", Compilation),
    ("LYRICS", UnsyncedLyrics),
    ("LANGUAGE", Language),
    ("MEDIA", Media),
    ("DISCID", DiscId),
    ("DISCSUBTITLE", DiscSubtitle),
    ("GROUPING", ContentGroup),
];

/// Mapping table for a container family
pub(crate) fn table(format: FormatKind) -> &'static [(&'static str, Field)] {
    match format {
        FormatKind::Mp3 | FormatKind::Dsf => ID3,
        FormatKind::Flac => VORBIS,
        FormatKind::WavPack => APE,
    }
}

/// Canonical field for a raw key
pub(crate) fn lookup(format: FormatKind, key: &str) -> Option<Field> {
    table(format)
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, field)| *field)
}
