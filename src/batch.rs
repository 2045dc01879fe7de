use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Context as _;
use sha2::Digest as _;

use crate::{
    builder::{AnimationBuilder, IdSource, UuidSource},
    config::AnimationConfig,
    error::{GifsmithError, GifsmithResult},
};

/// Content-checksum capability for the batch uniqueness assertion.
///
/// Injectable so tests can force a duplicate and exercise the abort path.
pub trait ContentDigest {
    fn digest(&self, bytes: &[u8]) -> String;
}

#[derive(Debug, Default)]
pub struct Sha256Digest;

impl ContentDigest for Sha256Digest {
    fn digest(&self, bytes: &[u8]) -> String {
        let digest = sha2::Sha256::digest(bytes);
        let mut out = String::with_capacity(digest.len() * 2);
        for b in digest {
            out.push_str(&format!("{b:02x}"));
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactReport {
    pub path: PathBuf,
    pub checksum: String,
    pub size_bytes: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    /// The timestamped directory all artifacts were written into.
    pub directory: PathBuf,
    pub artifacts: Vec<ArtifactReport>,
}

/// Runs a sequential batch of artifact builds into one timestamped
/// directory, asserting every artifact's content checksum is new.
///
/// Holds no state across runs; within one run the seen-checksum set only
/// grows and is discarded when the run ends.
pub struct BatchRunner {
    builder: AnimationBuilder,
    ids: Box<dyn IdSource>,
    digest: Box<dyn ContentDigest>,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchRunner {
    pub fn new() -> Self {
        Self {
            builder: AnimationBuilder::new(),
            ids: Box::new(UuidSource),
            digest: Box::new(Sha256Digest),
        }
    }

    /// Assemble a runner from explicit parts (used by tests to inject a
    /// deterministic id source or a colliding digest).
    pub fn with_parts(
        builder: AnimationBuilder,
        ids: Box<dyn IdSource>,
        digest: Box<dyn ContentDigest>,
    ) -> Self {
        Self {
            builder,
            ids,
            digest,
        }
    }

    /// Build one artifact per config into `{base_dir}/{timestamp}/`,
    /// named `{batch_id}_{index}.gif` with a shared batch id and indices
    /// from 1. Artifact N+1 does not start until N is written and
    /// checksummed. Returns the per-artifact reports.
    #[tracing::instrument(skip_all, fields(configs = configs.len()))]
    pub fn run(
        &mut self,
        base_dir: &Path,
        configs: &[AnimationConfig],
    ) -> GifsmithResult<BatchReport> {
        let directory = base_dir.join(timestamp_dirname());
        fs::create_dir_all(&directory)
            .with_context(|| format!("create batch directory '{}'", directory.display()))?;

        let batch_id = self.ids.next_id();
        tracing::info!(dir = %directory.display(), %batch_id, "running batch creation");

        let mut seen: HashSet<String> = HashSet::new();
        let mut artifacts = Vec::with_capacity(configs.len());

        for (i, config) in configs.iter().enumerate() {
            let index = i + 1;
            let destination = directory.join(format!("{batch_id}_{index}.gif"));
            tracing::info!(artifact = %destination.display(), "create");

            let start = Instant::now();
            self.builder.create(&destination, config)?;
            let elapsed = start.elapsed();

            let bytes = fs::read(&destination)
                .with_context(|| format!("read back artifact '{}'", destination.display()))?;
            let checksum = self.digest.digest(&bytes);
            let size_bytes = bytes.len() as u64;

            tracing::info!(
                %checksum,
                size = %human_size(size_bytes),
                elapsed_ms = elapsed.as_millis() as u64,
                "artifact report"
            );

            if !seen.insert(checksum.clone()) {
                return Err(GifsmithError::ChecksumCollision {
                    checksum,
                    artifact: destination,
                });
            }

            artifacts.push(ArtifactReport {
                path: destination,
                checksum,
                size_bytes,
                elapsed,
            });
        }

        Ok(BatchReport {
            directory,
            artifacts,
        })
    }
}

/// Current local time at second precision, ISO-8601 with `:` replaced by
/// `-` for path safety.
fn timestamp_dirname() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// Binary-unit human-readable size, e.g. `58.2 KiB`.
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
