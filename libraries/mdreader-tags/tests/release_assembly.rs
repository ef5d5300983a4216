/// Integration tests for directory assembly
///
/// Every fixture is synthesized into a temporary directory, then assembled
/// through the public `Assembler` API.
mod common;

use common::fixtures::*;
use common::*;
use mdreader_core::{ActorRole, ErrorKind, FormatKind, PictType};
use mdreader_tags::{Assembled, Assembler, AssemblyError, ExtractLimits, ExtractionPool};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn assembler() -> Assembler {
    let pool = ExtractionPool::new(2).expect("pool");
    Assembler::new(Arc::new(pool), ExtractLimits::default())
}

fn assemble(dir: &Path) -> Assembled {
    assembler().assemble(dir).expect("release assembles")
}

fn fixture(format: FormatKind) -> Vec<u8> {
    match format {
        FormatKind::Mp3 => fixture_mp3(),
        FormatKind::Flac => fixture_flac(),
        FormatKind::WavPack => fixture_wavpack(),
        FormatKind::Dsf => fixture_dsf(),
    }
}

fn corrupt(format: FormatKind) -> Vec<u8> {
    match format {
        FormatKind::Mp3 => corrupt_mp3(),
        FormatKind::Flac => corrupt_flac(),
        FormatKind::WavPack => corrupt_wavpack(),
        FormatKind::Dsf => corrupt_dsf(),
    }
}

fn assert_fixture_release(assembled: &Assembled, format: FormatKind) {
    let r = &assembled.release;
    assert_eq!(r.title.as_deref(), Some(ALBUM), "{:?}", format);
    assert_eq!(r.work.actors.first(), Some(COMPOSER), "{:?}", format);
    assert!(r.work.actors.contains(COMPOSER, ActorRole::Composer));
    assert_eq!(r.recording.actors.first(), Some(PERFORMER), "{:?}", format);
    assert_eq!(r.recording.genres.first(), Some(GENRE), "{:?}", format);
    assert_eq!(r.total_tracks, TOTAL_TRACKS, "{:?}", format);
    assert_eq!(r.country.as_deref(), Some(COUNTRY), "{:?}", format);
    assert_eq!(r.publishing.len(), 1, "{:?}", format);
    assert_eq!(r.publishing[0].name.as_deref(), Some(LABEL));
    assert_eq!(r.publishing[0].catno.as_deref(), Some(CATNO));
    assert_eq!(r.year, Some(YEAR), "{:?}", format);
    assert_eq!(r.notes.as_deref(), Some(NOTES), "{:?}", format);
    assert_eq!(r.identifiers.get("DISCOGS_RELEASE_ID"), Some(DISCOGS_ID));
    assert_eq!(r.discs.len(), 1);
    assert_eq!(r.discs[0].number, 1);

    assert_eq!(r.tracks.len(), 1);
    let t = &r.tracks[0];
    assert_eq!(t.position, "03", "{:?}", format);
    assert_eq!(t.disc, 1);
    assert_eq!(t.title.as_deref(), Some(TRACK_TITLE), "{:?}", format);
    assert_eq!(t.record.actors.first(), Some(TRACK_ARTIST), "{:?}", format);
    assert_eq!(t.composition.actor_roles.first(), Some(COMPOSER));
    assert_eq!(t.file_info.container_format, format);
    assert_eq!(t.notes.as_deref(), Some(NOTES));
}

#[test]
fn every_format_yields_the_fixture_values() {
    for format in FormatKind::ALL {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            &format!("03.{}", format.extension()),
            &fixture(*format),
        );
        let assembled = assemble(dir.path());
        assert_fixture_release(&assembled, *format);
        assert!(
            assembled.diagnostics.is_empty(),
            "{:?}: {:?}",
            format,
            assembled.diagnostics
        );
    }
}

#[test]
fn audio_parameters_are_reported_per_format() {
    let dir = TempDir::new().unwrap();
    for format in FormatKind::ALL {
        write(
            dir.path(),
            &format!("track.{}", format.extension()),
            &fixture(*format),
        );
    }
    let release = assemble(dir.path()).release;
    let by_format = |format: FormatKind| {
        release
            .tracks
            .iter()
            .find(|t| t.file_info.container_format == format)
            .expect("track present")
    };

    let flac = by_format(FormatKind::Flac);
    assert_eq!(flac.audio_info.sample_rate, Some(44_100));
    assert_eq!(flac.audio_info.sample_size, Some(16));
    assert_eq!(flac.audio_info.channels, Some(2));
    assert_eq!(flac.duration, Some(2));

    let mp3 = by_format(FormatKind::Mp3);
    assert_eq!(mp3.audio_info.sample_rate, Some(44_100));
    assert_eq!(mp3.audio_info.channels, Some(1));
    assert_eq!(mp3.audio_info.sample_size, None);
    assert_eq!(mp3.duration, Some(1));

    let wv = by_format(FormatKind::WavPack);
    assert_eq!(wv.audio_info.sample_rate, Some(44_100));
    assert_eq!(wv.audio_info.sample_size, Some(16));
    assert_eq!(wv.audio_info.channels, Some(2));
    assert_eq!(wv.duration, Some(2));

    let dsf = by_format(FormatKind::Dsf);
    assert_eq!(dsf.audio_info.sample_rate, Some(DSD64_RATE));
    assert_eq!(dsf.audio_info.sample_size, Some(1));
    assert_eq!(dsf.audio_info.channels, Some(2));
    assert_eq!(dsf.duration, Some(2));
}

#[test]
fn total_tracks_comes_from_tags_not_file_count() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "03.flac", &fixture_flac());
    write(
        dir.path(),
        "04.flac",
        &flac_file(&fixture_vorbis_comments("4"), &[]),
    );
    let release = assemble(dir.path()).release;
    assert_eq!(release.tracks.len(), 2);
    assert_eq!(release.total_tracks, 10);
    let positions: Vec<_> = release.tracks.iter().map(|t| t.position.as_str()).collect();
    assert_eq!(positions, ["03", "04"]);
}

#[test]
fn untagged_totals_count_discovered_tracks() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.flac", &flac_file(&[("TITLE", "One")], &[]));
    write(dir.path(), "b.flac", &flac_file(&[("TITLE", "Two")], &[]));
    let release = assemble(dir.path()).release;
    assert_eq!(release.total_tracks, 2);
    assert_eq!(release.discs.len(), 1);
    assert_eq!(release.discs[0].number, 1);
    let positions: Vec<_> = release.tracks.iter().map(|t| t.position.as_str()).collect();
    assert_eq!(positions, ["01", "02"]);
}

#[test]
fn tracks_sort_by_disc_then_position() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "a.flac",
        &flac_file(&[("DISCNUMBER", "2"), ("TRACKNUMBER", "1")], &[]),
    );
    write(
        dir.path(),
        "b.flac",
        &flac_file(&[("DISCNUMBER", "1/2"), ("TRACKNUMBER", "2")], &[]),
    );
    write(
        dir.path(),
        "c.flac",
        &flac_file(&[("DISCNUMBER", "1"), ("TRACKNUMBER", "1")], &[]),
    );
    let release = assemble(dir.path()).release;
    let order: Vec<_> = release
        .tracks
        .iter()
        .map(|t| t.file_info.file_name.as_str())
        .collect();
    assert_eq!(order, ["c.flac", "b.flac", "a.flac"]);
    let discs: Vec<_> = release.discs.iter().map(|d| d.number).collect();
    assert_eq!(discs, [1, 2]);
}

#[test]
fn empty_directory_has_no_audio_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "cover.jpg", &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0]);
    write(dir.path(), "notes.txt", b"liner notes");
    std::fs::create_dir(dir.path().join("scans")).unwrap();
    write(&dir.path().join("scans"), "01.flac", &fixture_flac());

    let err = assembler().assemble(dir.path()).unwrap_err();
    assert!(matches!(err, AssemblyError::NoAudioFiles(_)));
    assert_eq!(err.kind(), ErrorKind::NoAudioFiles);
}

#[test]
fn missing_directory_is_not_found() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("gone");
    let err = assembler().assemble(&missing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DirectoryNotFound);

    let file = write(dir.path(), "01.flac", &fixture_flac());
    let err = assembler().assemble(&file).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DirectoryNotFound);
}

#[test]
fn every_file_failing_is_no_usable_metadata() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "01.flac", &corrupt_flac());
    let err = assembler().assemble(dir.path()).unwrap_err();
    assert!(matches!(err, AssemblyError::NoUsableMetadata { failed: 1, .. }));
}

#[test]
fn corrupt_file_is_isolated_for_every_format() {
    let expected = [
        (FormatKind::Mp3, ErrorKind::MalformedId3Tag),
        (FormatKind::Flac, ErrorKind::MissingStreamInfo),
        (FormatKind::WavPack, ErrorKind::CorruptApeFooter),
        (FormatKind::Dsf, ErrorKind::MalformedId3Tag),
    ];
    for (format, kind) in expected {
        let dir = TempDir::new().unwrap();
        let ext = format.extension();
        write(dir.path(), &format!("01.{}", ext), &corrupt(format));
        write(dir.path(), &format!("03.{}", ext), &fixture(format));

        let assembled = assemble(dir.path());
        assert_fixture_release(&assembled, format);
        assert_eq!(assembled.diagnostics.len(), 1, "{:?}", format);
        let diagnostic = &assembled.diagnostics[0];
        assert_eq!(diagnostic.kind, kind, "{:?}", format);
        assert_eq!(diagnostic.file.as_deref(), Some(format!("01.{}", ext).as_str()));
    }
}

#[test]
fn unsupported_files_are_diagnostics() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "01.flac", &fixture_flac());
    write(dir.path(), "folder.jpg", &[0xFF, 0xD8, 0xFF, 0xE0]);

    let assembled = assemble(dir.path());
    assert_eq!(assembled.release.tracks.len(), 1);
    assert_eq!(assembled.diagnostics.len(), 1);
    assert_eq!(assembled.diagnostics[0].kind, ErrorKind::UnsupportedFormat);
    assert_eq!(assembled.diagnostics[0].file.as_deref(), Some("folder.jpg"));
}

#[test]
fn malformed_mp3_tag_with_audio_is_a_warning() {
    let dir = TempDir::new().unwrap();
    let mut bytes = b"ID3\x09\x00\x00\x00\x00\x00\x00".to_vec();
    bytes.extend(mpeg_frames(20));
    write(dir.path(), "01.mp3", &bytes);

    let assembled = assemble(dir.path());
    assert_eq!(assembled.release.tracks.len(), 1);
    assert_eq!(assembled.release.tracks[0].position, "01");
    assert_eq!(assembled.diagnostics.len(), 1);
    assert_eq!(assembled.diagnostics[0].kind, ErrorKind::MalformedId3Tag);
}

#[test]
fn conflicting_totals_warn_and_count() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "01.flac",
        &flac_file(&[("TRACKNUMBER", "1"), ("TRACKTOTAL", "10")], &[]),
    );
    write(
        dir.path(),
        "02.flac",
        &flac_file(&[("TRACKNUMBER", "2"), ("TRACKTOTAL", "12")], &[]),
    );
    let assembled = assemble(dir.path());
    assert_eq!(assembled.release.total_tracks, 2);
    assert_eq!(assembled.diagnostics.len(), 1);
    assert_eq!(assembled.diagnostics[0].kind, ErrorKind::InconsistentTrackTotal);
}

#[test]
fn pictures_are_collected_once() {
    let dir = TempDir::new().unwrap();
    let cover = flac_picture(3, "image/png", PNG_BYTES);
    write(
        dir.path(),
        "01.flac",
        &flac_file(&[("TRACKNUMBER", "1")], &[cover.clone()]),
    );
    write(
        dir.path(),
        "02.flac",
        &flac_file(&[("TRACKNUMBER", "2")], &[cover]),
    );
    write(
        dir.path(),
        "03.mp3",
        &mp3_file(&[apic_frame("image/png", 4, PNG_BYTES)]),
    );

    let release = assemble(dir.path()).release;
    assert_eq!(release.pictures.len(), 2);
    assert_eq!(release.pictures[0].pict_type, PictType::CoverFront);
    assert_eq!(release.pictures[0].pict_meta.mime_type, "image/png");
    assert_eq!(release.pictures[0].pict_meta.width, Some(1));
    assert_eq!(release.pictures[1].pict_type, PictType::CoverBack);
}

#[test]
fn wavpack_cover_art_item_is_a_picture() {
    let dir = TempDir::new().unwrap();
    let mut value = b"cover.png\0".to_vec();
    value.extend(PNG_BYTES);
    let mut items = fixture_ape_items("3");
    items.push(ape_item("Cover Art (Front)", &value, true));
    write(dir.path(), "03.wv", &wavpack_file(&items));

    let release = assemble(dir.path()).release;
    assert_eq!(release.pictures.len(), 1);
    assert_eq!(release.pictures[0].pict_type, PictType::CoverFront);
    assert_eq!(release.pictures[0].pict_meta.mime_type, "image/png");
    assert_eq!(release.pictures[0].bytes, PNG_BYTES);
}

#[test]
fn assembly_is_idempotent() {
    let dir = TempDir::new().unwrap();
    for format in FormatKind::ALL {
        write(
            dir.path(),
            &format!("track.{}", format.extension()),
            &fixture(*format),
        );
    }
    write(dir.path(), "zz.flac", &corrupt_flac());

    let first = assemble(dir.path());
    let second = assemble(dir.path());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.release).unwrap(),
        serde_json::to_string(&second.release).unwrap()
    );
}

#[test]
fn actor_order_is_first_seen() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "01.flac",
        &flac_file(
            &[("TRACKNUMBER", "1"), ("PERFORMER", "B"), ("PERFORMER", "A")],
            &[],
        ),
    );
    write(
        dir.path(),
        "02.flac",
        &flac_file(
            &[("TRACKNUMBER", "2"), ("PERFORMER", "C; A"), ("GENRE", "Jazz")],
            &[],
        ),
    );
    let release = assemble(dir.path()).release;
    let names: Vec<_> = release
        .recording
        .actors
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, ["B", "A", "C"]);
    assert_eq!(release.recording.genres.first(), Some("Jazz"));
}

#[test]
fn oversized_dsf_sample_count_still_assembles() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "01.flac", &fixture_flac());
    let mut dsf = dsf_file(None);
    dsf[64..72].copy_from_slice(&u64::MAX.to_le_bytes());
    write(dir.path(), "02.dsf", &dsf);

    let assembled = assemble(dir.path());
    let tracks = &assembled.release.tracks;
    assert_eq!(tracks.len(), 2);
    let dsf_track = tracks
        .iter()
        .find(|t| t.file_info.container_format == FormatKind::Dsf)
        .expect("dsf track kept");
    assert_eq!(dsf_track.duration, None);
    assert_eq!(dsf_track.audio_info.sample_rate, Some(DSD64_RATE));
}

#[test]
fn extended_vorbis_fields_reach_the_release() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "01.flac",
        &flac_file(
            &[
                ("TITLE", "Opening"),
                ("TRACKNUMBER", "1"),
                ("COMPILATION", "1"),
                ("MOOD", "Calm"),
                ("LYRICS", "La la la"),
                ("LANGUAGE", "eng"),
                ("GROUPING", "Suite No. 1"),
                ("DISCSUBTITLE", "Live"),
                ("MEDIA", "CD"),
                ("DISCID", "a50bcd0c"),
                ("REPLAYGAIN_TRACK_GAIN", "-6.10 dB"),
            ],
            &[],
        ),
    );

    let release = assemble(dir.path()).release;
    assert!(release.compilation);
    assert_eq!(release.discs[0].subtitle.as_deref(), Some("Live"));
    assert_eq!(release.discs[0].media.as_deref(), Some("CD"));
    assert_eq!(release.discs[0].id.as_deref(), Some("a50bcd0c"));

    let track = &release.tracks[0];
    assert_eq!(track.record.moods.first(), Some("Calm"));
    assert_eq!(track.content_group.as_deref(), Some("Suite No. 1"));
    let lyrics = track.lyrics.as_ref().expect("lyrics");
    assert_eq!(lyrics.text.as_deref(), Some("La la la"));
    assert_eq!(lyrics.language.as_deref(), Some("eng"));
    assert!(!lyrics.synced);
    assert_eq!(
        track.unprocessed.get("REPLAYGAIN_TRACK_GAIN"),
        Some(&["-6.10 dB".to_string()][..])
    );

    let json = serde_json::to_value(&release).unwrap();
    assert_eq!(json["compilation"], true);
    assert_eq!(json["tracks"][0]["unprocessed"]["REPLAYGAIN_TRACK_GAIN"][0], "-6.10 dB");
}
