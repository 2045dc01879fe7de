#![forbid(unsafe_code)]

//! Synthetic, guaranteed-unique GIF fixtures.
//!
//! Every artifact is a square canvas with a disc growing out from the
//! center, one pass per palette color, each frame stamped with a fresh
//! uuid watermark. The watermark (plus randomized color pairing) makes
//! two builds from the same config byte-distinct with overwhelming
//! probability, which the batch driver asserts via content checksums.

pub mod batch;
pub mod builder;
pub mod color;
pub mod config;
pub mod convert;
pub mod error;
pub mod glyph;

pub use batch::{ArtifactReport, BatchReport, BatchRunner, ContentDigest, Sha256Digest};
pub use builder::{AnimationBuilder, IdSource, PartnerPicker, RandomPicker, UuidSource};
pub use config::{preset_named, presets, AnimationConfig};
pub use convert::{convert_dir, is_ffmpeg_on_path, ConvertReport, FfmpegEncoder, MediaEncoder};
pub use error::{GifsmithError, GifsmithResult};
