//! Directory of tracks to one [`Release`]
//!
//! Files directly inside the directory are classified, then extracted and
//! normalized on the [`ExtractionPool`]. A file that fails is excluded and
//! reported as a diagnostic; the rest still form the release. A reader
//! panic counts as a failed file.

use crate::error::{AssemblyError, TagReadError};
use crate::extract::{extract, ExtractLimits};
use crate::normalize::{normalize, NormalizedTrack};
use crate::pool::ExtractionPool;
use crate::sniffer::classify;
use mdreader_core::{
    format_position, Composition, Diagnostic, Disc, ErrorKind, FormatKind, Record, Release, Track,
};
use std::collections::{BTreeMap, HashMap};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A release with the per-file problems met while building it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    pub release: Release,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds releases from directories
///
/// Holds only immutable shared state, so one instance serves every request.
#[derive(Debug, Clone)]
pub struct Assembler {
    pool: Arc<ExtractionPool>,
    limits: ExtractLimits,
}

impl Assembler {
    pub fn new(pool: Arc<ExtractionPool>, limits: ExtractLimits) -> Self {
        Self { pool, limits }
    }

    /// Assemble the release for the audio files directly inside `dir`
    pub fn assemble(&self, dir: &Path) -> Result<Assembled, AssemblyError> {
        if !dir.is_dir() {
            return Err(AssemblyError::DirectoryNotFound(dir.to_path_buf()));
        }

        let mut diagnostics = Vec::new();
        let mut candidates: Vec<(PathBuf, String, FormatKind)> = Vec::new();
        for path in list_files(dir)? {
            let name = display_name(&path);
            match classify(&path) {
                Ok(format) => candidates.push((path, name, format)),
                Err(err) => {
                    debug!(file = %path.display(), error = %err, "skipping unrecognized file");
                    diagnostics.push(Diagnostic::new(err.kind(), err.to_string()).with_file(name));
                }
            }
        }
        if candidates.is_empty() {
            return Err(AssemblyError::NoAudioFiles(dir.to_path_buf()));
        }

        let limits = self.limits;
        let results = self.pool.map(&candidates, |(path, _, format)| {
            read_track(path, *format, &limits)
        });

        let mut tracks = Vec::with_capacity(results.len());
        let mut failed = 0;
        for ((path, name, _), result) in candidates.iter().zip(results) {
            match result {
                Ok(mut track) => {
                    for warning in track.warnings.drain(..) {
                        diagnostics.push(warning.with_file(name.clone()));
                    }
                    tracks.push(track);
                }
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "excluding file from release");
                    failed += 1;
                    diagnostics.push(Diagnostic::new(err.kind(), err.to_string()).with_file(name.clone()));
                }
            }
        }
        if tracks.is_empty() {
            return Err(AssemblyError::NoUsableMetadata {
                dir: dir.to_path_buf(),
                failed,
            });
        }

        let release = build_release(tracks, &mut diagnostics);
        info!(
            dir = %dir.display(),
            tracks = release.tracks.len(),
            diagnostics = diagnostics.len(),
            "assembled release"
        );
        Ok(Assembled {
            release,
            diagnostics,
        })
    }
}

fn read_track(
    path: &Path,
    format: FormatKind,
    limits: &ExtractLimits,
) -> Result<NormalizedTrack, TagReadError> {
    guarded(|| extract(path, format, limits).map(|bag| normalize(bag, format)))
}

/// Run `read`, turning a panic into [`TagReadError::Panicked`]
fn guarded<T>(read: impl FnOnce() -> Result<T, TagReadError>) -> Result<T, TagReadError> {
    panic::catch_unwind(AssertUnwindSafe(read))
        .unwrap_or_else(|payload| Err(TagReadError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("unknown panic")
    }
}

/// Regular files directly inside `dir`, sorted by file name
fn list_files(dir: &Path) -> Result<Vec<PathBuf>, AssemblyError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Fold normalized tracks, given in file order, into a release
fn build_release(normalized: Vec<NormalizedTrack>, diagnostics: &mut Vec<Diagnostic>) -> Release {
    let mut release = Release::default();
    let mut declared_totals: Vec<u32> = Vec::new();
    let mut discs: BTreeMap<u32, Disc> = BTreeMap::new();
    let mut seen_per_disc: HashMap<u32, u32> = HashMap::new();
    let mut keyed = Vec::with_capacity(normalized.len());

    for track in normalized {
        let album = &track.album;
        first_wins(&mut release.title, album.title.as_ref());
        first_wins(&mut release.country, album.country.as_ref());
        first_wins(&mut release.notes, track.notes.as_ref());
        release.year = release.year.or(album.year);
        release.original_year = release.original_year.or(album.original_year);

        release.work.actors.merge(&track.composition);
        release.recording.actors.merge(&album.performers);
        release.recording.genres.merge(&track.genres);
        release.compilation |= album.compilation;
        release.identifiers.merge(&album.identifiers);
        for entry in &album.publishing {
            release.add_publishing(entry.clone());
        }

        if let Some(total) = track.total_tracks {
            if !declared_totals.contains(&total) {
                declared_totals.push(total);
            }
        }

        let disc = track.disc.unwrap_or(1);
        let entry = discs.entry(disc).or_insert_with(|| Disc::numbered(disc));
        first_wins(&mut entry.subtitle, track.disc_subtitle.as_ref());
        first_wins(&mut entry.id, track.disc_id.as_ref());
        first_wins(&mut entry.media, track.media.as_ref());
        let order = seen_per_disc.entry(disc).or_insert(0);
        *order += 1;
        let position = track.position.unwrap_or(*order);

        for picture in track.pictures {
            release.add_picture(picture);
        }
        let notes = match (track.notes, track.recording_dates) {
            (Some(notes), Some(dates)) => Some(format!("{}\nRecording: {}", notes, dates)),
            (None, Some(dates)) => Some(format!("Recording: {}", dates)),
            (notes, None) => notes,
        };
        keyed.push((
            disc,
            position,
            Track {
                position: format_position(position),
                disc,
                title: track.title,
                duration: track.audio_info.duration_secs(),
                file_info: track.file_info,
                audio_info: track.audio_info,
                composition: Composition {
                    actor_roles: track.composition,
                },
                record: Record {
                    actors: track.record_actors,
                    genres: track.genres,
                    moods: track.moods,
                },
                isrc: track.isrc,
                notes,
                content_group: track.content_group,
                lyrics: track.lyrics,
                unprocessed: track.unprocessed,
            },
        ));
    }

    keyed.sort_by(|a, b| {
        (a.0, a.1, &a.2.file_info.file_name).cmp(&(b.0, b.1, &b.2.file_info.file_name))
    });
    release.tracks = keyed.into_iter().map(|(_, _, track)| track).collect();
    release.discs = discs.into_values().collect();

    let discovered = u32::try_from(release.tracks.len()).unwrap_or(u32::MAX);
    release.total_tracks = match declared_totals.as_slice() {
        [total] => *total,
        [] => discovered,
        conflicting => {
            diagnostics.push(Diagnostic::new(
                ErrorKind::InconsistentTrackTotal,
                format!(
                    "declared track totals disagree ({:?}); using the {} tracks found",
                    conflicting, discovered
                ),
            ));
            discovered
        }
    };
    release
}

fn first_wins(slot: &mut Option<String>, candidate: Option<&String>) {
    if slot.is_none() {
        *slot = candidate.cloned();
    }
}
