//! Raw tag bag to canonical per-track record
//!
//! Each [`FormatKind`] has one mapping table in [`tables`]. Keys are visited
//! in bag order, so when two synonyms feed the same scalar field the one
//! read first wins. Multi-valued fields (actors, genres) are split on `;`,
//! trimmed and de-duplicated in first-seen order. Keys no table knows are
//! kept verbatim as unprocessed tags.

mod genres;
mod tables;

use crate::bag::RawTagBag;
use mdreader_core::{
    ActorRole, Actors, AudioInfo, Diagnostic, FileInfo, FormatKind, Genres, Identifiers, Lyrics,
    Picture, Publishing, TagMap,
};
use tables::Field;

/// Album-level candidates read from one file
///
/// The assembler folds these across tracks with first-wins or union rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumFields {
    pub title: Option<String>,
    /// Performer-role actors; feed the release recording
    pub performers: Actors,
    pub publishing: Vec<Publishing>,
    pub country: Option<String>,
    pub year: Option<i32>,
    pub original_year: Option<i32>,
    pub identifiers: Identifiers,
    pub compilation: bool,
}

/// One file's metadata in canonical form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTrack {
    pub file_info: FileInfo,
    pub audio_info: AudioInfo,
    pub title: Option<String>,
    /// Disc-relative position, unset when the file carries none
    pub position: Option<u32>,
    pub disc: Option<u32>,
    pub total_tracks: Option<u32>,
    pub total_discs: Option<u32>,
    /// Composer, lyricist and writer actors
    pub composition: Actors,
    /// Track-level recording actors other than album performers
    pub record_actors: Actors,
    pub genres: Genres,
    pub moods: Genres,
    pub isrc: Option<String>,
    pub notes: Option<String>,
    /// Recording date text, reported as a track note
    pub recording_dates: Option<String>,
    pub content_group: Option<String>,
    pub lyrics: Option<Lyrics>,
    pub disc_subtitle: Option<String>,
    pub disc_id: Option<String>,
    pub media: Option<String>,
    pub album: AlbumFields,
    pub pictures: Vec<Picture>,
    /// Tags without a canonical field
    pub unprocessed: TagMap,
    /// Non-fatal problems carried over from extraction
    pub warnings: Vec<Diagnostic>,
}

impl NormalizedTrack {
    fn empty(file_info: FileInfo, audio_info: AudioInfo) -> Self {
        Self {
            file_info,
            audio_info,
            title: None,
            position: None,
            disc: None,
            total_tracks: None,
            total_discs: None,
            composition: Actors::default(),
            record_actors: Actors::default(),
            genres: Genres::default(),
            moods: Genres::default(),
            isrc: None,
            notes: None,
            recording_dates: None,
            content_group: None,
            lyrics: None,
            disc_subtitle: None,
            disc_id: None,
            media: None,
            album: AlbumFields::default(),
            pictures: Vec::new(),
            unprocessed: TagMap::default(),
            warnings: Vec::new(),
        }
    }
}

#[derive(Default)]
struct Pending {
    subtitle: Option<String>,
    labels: Vec<String>,
    catnos: Vec<String>,
    copyright: Option<String>,
    pair_total: Option<u32>,
    pair_disc_total: Option<u32>,
    dotted_disc: Option<u32>,
    length_ms: Option<u64>,
}

/// Map a raw bag onto canonical fields using the table for `format`
pub fn normalize(bag: RawTagBag, format: FormatKind) -> NormalizedTrack {
    let mut track = NormalizedTrack::empty(bag.file_info.clone(), bag.audio);
    let mut pending = Pending::default();

    for (key, values) in bag.iter() {
        let field = tables::lookup(format, key);
        for value in values {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match field {
                Some(field) => apply(&mut track, &mut pending, format, field, value),
                None => track.unprocessed.push(key, value),
            }
        }
    }

    finish(&mut track, pending);
    track.pictures = bag.pictures;
    track.warnings = bag.warnings;
    track
}

fn apply(
    track: &mut NormalizedTrack,
    pending: &mut Pending,
    format: FormatKind,
    field: Field,
    value: &str,
) {
    match field {
        Field::AlbumTitle => set_once(&mut track.album.title, value),
        Field::TrackTitle => set_once(&mut track.title, value),
        Field::TrackSubtitle => set_once(&mut pending.subtitle, value),
        Field::Actor(role) => {
            for name in split_multi(value) {
                add_actor(track, name, role);
            }
        }
        Field::Genre => {
            for item in split_multi(value) {
                if matches!(format, FormatKind::Mp3 | FormatKind::Dsf) {
                    for genre in genres::resolve(item) {
                        track.genres.add(genre);
                    }
                } else {
                    track.genres.add(item);
                }
            }
        }
        Field::TrackNumber => {
            let (disc, position, total) = parse_position(value);
            if track.position.is_none() {
                track.position = position;
                pending.dotted_disc = disc;
            }
            if pending.pair_total.is_none() {
                pending.pair_total = total;
            }
        }
        Field::TrackTotal => {
            if track.total_tracks.is_none() {
                track.total_tracks = parse_number(value);
            }
        }
        Field::DiscNumber => {
            let (number, total) = parse_pair(value);
            if track.disc.is_none() {
                track.disc = number;
            }
            if pending.pair_disc_total.is_none() {
                pending.pair_disc_total = total;
            }
        }
        Field::DiscTotal => {
            if track.total_discs.is_none() {
                track.total_discs = parse_number(value);
            }
        }
        Field::Label => pending.labels.push(value.to_string()),
        Field::CatalogNumber => pending.catnos.push(value.to_string()),
        Field::Copyright => set_once(&mut pending.copyright, value),
        Field::Country => set_once(&mut track.album.country, value),
        Field::Year => {
            let (year, original) = parse_years(value);
            if track.album.year.is_none() {
                track.album.year = year;
            }
            if track.album.original_year.is_none() {
                track.album.original_year = original;
            }
        }
        Field::OriginalYear => {
            let (year, original) = parse_years(value);
            if track.album.original_year.is_none() {
                track.album.original_year = original.or(year);
            }
        }
        Field::Notes => set_once(&mut track.notes, value),
        Field::Isrc => set_once(&mut track.isrc, value),
        Field::Identifier(name) => {
            track.album.identifiers.insert(name, value);
        }
        Field::Mood => {
            for mood in split_multi(value) {
                track.moods.add(mood);
            }
        }
        Field::Compilation => {
            track.album.compilation |= parse_flag(value);
        }
        Field::UnsyncedLyrics => {
            let lyrics = track.lyrics.get_or_insert_with(Lyrics::default);
            if lyrics.text.is_none() || lyrics.synced {
                lyrics.text = Some(value.to_string());
                lyrics.synced = false;
            }
        }
        Field::SyncedLyrics => {
            let lyrics = track.lyrics.get_or_insert_with(Lyrics::default);
            if lyrics.text.is_none() {
                lyrics.text = Some(value.to_string());
                lyrics.synced = true;
            }
        }
        Field::Language => {
            let lyrics = track.lyrics.get_or_insert_with(Lyrics::default);
            set_once(&mut lyrics.language, value);
        }
        Field::Media => set_once(&mut track.media, value),
        Field::DiscId => set_once(&mut track.disc_id, value),
        Field::DiscSubtitle => set_once(&mut track.disc_subtitle, value),
        Field::ContentGroup => set_once(&mut track.content_group, value),
        Field::Length => {
            if pending.length_ms.is_none() {
                pending.length_ms = parse_length(value);
            }
        }
        Field::RecordingDates => set_once(&mut track.recording_dates, value),
    }
}

fn finish(track: &mut NormalizedTrack, pending: Pending) {
    if let (Some(title), Some(subtitle)) = (track.title.as_mut(), pending.subtitle) {
        *title = format!("{} ({})", title, subtitle);
    }
    if track.total_tracks.is_none() {
        track.total_tracks = pending.pair_total;
    }
    if track.total_discs.is_none() {
        track.total_discs = pending.pair_disc_total;
    }
    if track.disc.is_none() {
        track.disc = pending.dotted_disc;
    }
    if track.audio_info.duration_ms.is_none() {
        track.audio_info.duration_ms = pending.length_ms;
    }

    let mut labels = pending.labels;
    if labels.is_empty() {
        labels.extend(pending.copyright);
    }
    let pairs = labels.len().max(pending.catnos.len());
    for i in 0..pairs {
        let entry = Publishing {
            name: labels.get(i).cloned(),
            catno: pending.catnos.get(i).cloned(),
        };
        if !track.album.publishing.contains(&entry) {
            track.album.publishing.push(entry);
        }
    }
}

fn add_actor(track: &mut NormalizedTrack, name: &str, role: ActorRole) {
    if role.is_composition() {
        track.composition.add(name, role);
    } else if role == ActorRole::Performer {
        track.album.performers.add(name, role);
    } else {
        track.record_actors.add(name, role);
    }
}

fn set_once(slot: &mut Option<String>, value: &str) {
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}

/// Split a multi-valued text on `;`, dropping blanks
fn split_multi(value: &str) -> impl Iterator<Item = &str> {
    value.split(';').map(str::trim).filter(|v| !v.is_empty())
}

/// Leading decimal digits of `value`, zero treated as unset
fn parse_number(value: &str) -> Option<u32> {
    let value = value.trim();
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok().filter(|n| *n > 0)
}

/// Truthy flag text: `1`, `true` or `yes`
fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}

/// Duration in milliseconds from `"245000"` or `"[h:]m:ss[.fff]"`
fn parse_length(value: &str) -> Option<u64> {
    let value = value.trim();
    if !value.contains(':') {
        return value.parse().ok().filter(|ms| *ms > 0);
    }
    let mut parts: Vec<&str> = value.split(':').collect();
    if parts.len() > 3 {
        return None;
    }
    let seconds = parts.pop()?;
    let (whole, fraction) = seconds.split_once('.').unwrap_or((seconds, ""));
    let mut ms: u64 = whole.parse::<u64>().ok()?.checked_mul(1000)?;
    if !fraction.is_empty() {
        let digits: String = fraction.chars().chain("000".chars()).take(3).collect();
        ms = ms.checked_add(digits.parse().ok()?)?;
    }
    let mut scale = 60_000u64;
    for part in parts.iter().rev() {
        let n: u64 = part.parse().ok()?;
        ms = ms.checked_add(n.checked_mul(scale)?)?;
        scale *= 60;
    }
    Some(ms).filter(|ms| *ms > 0)
}

/// `"N"` or `"N/T"`
fn parse_pair(value: &str) -> (Option<u32>, Option<u32>) {
    match value.split_once('/') {
        Some((n, t)) => (parse_number(n), parse_number(t)),
        None => (parse_number(value), None),
    }
}

/// Track position as `(disc, position, total)`
///
/// Accepts `"3"`, `"03"`, `"3/10"` and disc-prefixed `"2.03"`.
fn parse_position(value: &str) -> (Option<u32>, Option<u32>, Option<u32>) {
    let (number, total) = parse_pair(value);
    let head = value.split('/').next().unwrap_or_default().trim();
    match head.split_once('.') {
        Some((disc, position)) => (parse_number(disc), parse_number(position), total),
        None => (None, number, total),
    }
}

/// Release year and original year from a date-ish text
///
/// `"2000"` and `"2000-03-01"` give a year only. A list like `"1961/2005"`
/// gives the last entry as year and the first as original year.
fn parse_years(value: &str) -> (Option<i32>, Option<i32>) {
    let years: Vec<i32> = value
        .split(['/', ',', ';'])
        .filter_map(|item| {
            let item = item.trim();
            let head = item.get(..4)?;
            let rest = &item[4..];
            if head.bytes().all(|b| b.is_ascii_digit())
                && !rest.starts_with(|c: char| c.is_ascii_digit())
            {
                head.parse().ok()
            } else {
                None
            }
        })
        .collect();
    match years.as_slice() {
        [] => (None, None),
        [year] => (Some(*year), None),
        [first, .., last] => (Some(*last), Some(*first)),
    }
}
