use std::{fs, path::Path};

use gifsmith::{convert_dir, GifsmithError, GifsmithResult, MediaEncoder};

/// Stands in for ffmpeg: "converts" by writing a marker file.
struct StubEncoder;

impl MediaEncoder for StubEncoder {
    fn encode(&self, source: &Path, destination: &Path) -> GifsmithResult<()> {
        fs::write(destination, format!("converted from {}", source.display()))
            .map_err(|e| GifsmithError::encode(e.to_string()))
    }
}

struct FailingEncoder;

impl MediaEncoder for FailingEncoder {
    fn encode(&self, _source: &Path, _destination: &Path) -> GifsmithResult<()> {
        Err(GifsmithError::encode("simulated encoder failure"))
    }
}

#[test]
fn existing_destinations_are_skipped_and_the_rest_convert() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    fs::write(src.path().join("a.gif"), b"gif-a").unwrap();
    fs::write(src.path().join("b.gif"), b"gif-b").unwrap();
    fs::write(dst.path().join("a.mp4"), b"already here").unwrap();

    let report = convert_dir(src.path(), dst.path(), &StubEncoder).unwrap();

    assert_eq!(report.skipped, vec![src.path().join("a.gif")]);
    assert_eq!(report.converted, vec![dst.path().join("b.mp4")]);

    // The pre-existing destination was not overwritten.
    assert_eq!(fs::read(dst.path().join("a.mp4")).unwrap(), b"already here");
    assert!(dst.path().join("b.mp4").exists());
}

#[test]
fn non_media_files_are_ignored() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    fs::write(src.path().join("notes.txt"), b"text").unwrap();
    fs::write(src.path().join("clip.mp4"), b"video").unwrap();

    let report = convert_dir(src.path(), dst.path(), &StubEncoder).unwrap();

    assert_eq!(report.converted, vec![dst.path().join("clip.mp4")]);
    assert!(report.skipped.is_empty());
    assert!(!dst.path().join("notes.mp4").exists());
}

#[test]
fn encoder_failure_propagates() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    fs::write(src.path().join("a.gif"), b"gif-a").unwrap();

    let err = convert_dir(src.path(), dst.path(), &FailingEncoder).unwrap_err();
    assert!(matches!(err, GifsmithError::Encode(_)));
}

#[test]
fn destination_directory_is_created_when_missing() {
    let src = tempfile::tempdir().unwrap();
    let dst_root = tempfile::tempdir().unwrap();
    let dst = dst_root.path().join("mp4s");
    fs::write(src.path().join("a.gif"), b"gif-a").unwrap();

    let report = convert_dir(src.path(), &dst, &StubEncoder).unwrap();
    assert!(dst.is_dir());
    assert_eq!(report.converted, vec![dst.join("a.mp4")]);
}
