use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::Context as _;

use crate::error::{GifsmithError, GifsmithResult};

/// External media-conversion capability: turn `source` into a video file
/// at `destination`, or fail. Injectable so the batch walk can be tested
/// without a system encoder.
pub trait MediaEncoder {
    fn encode(&self, source: &Path, destination: &Path) -> GifsmithResult<()>;
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Converts via the system `ffmpeg` binary.
///
/// Output dimensions are rounded down to even so the default yuv420p
/// pixel format always applies, whatever the source canvas size.
#[derive(Debug, Default)]
pub struct FfmpegEncoder;

impl MediaEncoder for FfmpegEncoder {
    fn encode(&self, source: &Path, destination: &Path) -> GifsmithResult<()> {
        let output = Command::new("ffmpeg")
            .args(["-loglevel", "error", "-y", "-i"])
            .arg(source)
            .args([
                "-movflags",
                "+faststart",
                "-pix_fmt",
                "yuv420p",
                "-vf",
                "scale=trunc(iw/2)*2:trunc(ih/2)*2",
                "-an",
            ])
            .arg(destination)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .output()
            .map_err(|e| {
                GifsmithError::encode(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GifsmithError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Destination path for `source`: same stem, `.mp4` suffix, under
/// `dest_dir`.
pub fn mp4_destination(source: &Path, dest_dir: &Path) -> PathBuf {
    let mut name = source.file_stem().unwrap_or_default().to_os_string();
    name.push(".mp4");
    dest_dir.join(name)
}

#[derive(Debug, Default)]
pub struct ConvertReport {
    pub converted: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Convert every media file in `source_dir` into `dest_dir`.
///
/// Sources whose destination already exists are skipped with a warning
/// notice and the walk continues; an encoder failure aborts the walk.
#[tracing::instrument(skip(encoder))]
pub fn convert_dir(
    source_dir: &Path,
    dest_dir: &Path,
    encoder: &dyn MediaEncoder,
) -> GifsmithResult<ConvertReport> {
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("create destination directory '{}'", dest_dir.display()))?;

    let mut sources: Vec<PathBuf> = fs::read_dir(source_dir)
        .with_context(|| format!("read source directory '{}'", source_dir.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("walk source directory '{}'", source_dir.display()))?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_media_source(path))
        .collect();
    sources.sort();

    let mut report = ConvertReport::default();
    for source in sources {
        let destination = mp4_destination(&source, dest_dir);
        if destination.exists() {
            tracing::warn!(
                source = %source.display(),
                dest = %destination.display(),
                "destination already exists, skipping"
            );
            report.skipped.push(source);
            continue;
        }

        tracing::info!(source = %source.display(), dest = %destination.display(), "convert");
        encoder.encode(&source, &destination)?;
        report.converted.push(destination);
    }

    Ok(report)
}

fn is_media_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ext == "gif" || ext == "mp4"
        })
        .unwrap_or(false)
}
