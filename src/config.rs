use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{
    color,
    error::{GifsmithError, GifsmithResult},
};

fn default_text_color() -> String {
    "red".to_string()
}

/// Parameters for one animation build.
///
/// `radius` is carried through config dumps for parity with the preset
/// catalog but does not enter the geometry derivation; the animation
/// always sweeps the disc out to `floor(center * 1.5)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Square canvas side in pixels.
    pub width: u32,
    /// Color names to alternate between background and disc, in order.
    pub colors: Vec<String>,
    /// Nominal radius factor (informational, see type docs).
    pub radius: f64,
    /// Radius increment between consecutive frames.
    pub step: u32,
    /// Delay between frames in milliseconds.
    pub duration: u32,
    /// Watermark text color.
    #[serde(default = "default_text_color")]
    pub text_color: String,
}

impl AnimationConfig {
    /// Center point of the square canvas (integer floor).
    pub fn center(&self) -> u32 {
        self.width / 2
    }

    /// How far out from the center the disc sweeps.
    pub fn max_radius(&self) -> u32 {
        (f64::from(self.center()) * 1.5) as u32
    }

    /// Frames rendered by one circle pass.
    pub fn frames_per_pass(&self) -> u32 {
        self.max_radius().div_ceil(self.step.max(1))
    }

    /// Frames in the finished artifact: one pass per palette color.
    pub fn total_frames(&self) -> u32 {
        self.frames_per_pass() * self.colors.len() as u32
    }

    pub fn validate(&self) -> GifsmithResult<()> {
        if self.width == 0 {
            return Err(GifsmithError::validation("width must be non-zero"));
        }
        if self.step == 0 {
            return Err(GifsmithError::validation("step must be non-zero"));
        }
        if self.duration == 0 {
            return Err(GifsmithError::validation("duration must be non-zero"));
        }
        if !(self.radius > 0.0) {
            return Err(GifsmithError::validation("radius must be positive"));
        }

        let mut distinct: Vec<String> = self
            .colors
            .iter()
            .map(|c| c.to_ascii_lowercase())
            .collect();
        distinct.sort();
        distinct.dedup();
        if distinct.len() < 2 {
            return Err(GifsmithError::validation(format!(
                "at least 2 distinct colors are required, got {:?}",
                self.colors
            )));
        }

        for name in self.colors.iter().chain(std::iter::once(&self.text_color)) {
            if color::named(name).is_none() {
                return Err(GifsmithError::validation(format!(
                    "unknown color name '{name}'"
                )));
            }
        }

        Ok(())
    }
}

fn preset(width: u32, colors: &[&str], radius: f64, step: u32, duration: u32) -> AnimationConfig {
    AnimationConfig {
        width,
        colors: colors.iter().map(|c| (*c).to_string()).collect(),
        radius,
        step,
        duration,
        text_color: default_text_color(),
    }
}

/// Named configurations keyed by approximate output size, consulted
/// read-only. Insertion order is the display order.
static PRESETS: Lazy<IndexMap<&'static str, AnimationConfig>> = Lazy::new(|| {
    IndexMap::from([
        ("58KiB", preset(200, &["black", "white"], 1.5, 8, 40)),
        ("596KiB", preset(400, &["black", "white"], 6.5, 2, 40)),
        ("1.1MiB", preset(600, &["black", "white"], 20.0, 2, 10)),
        (
            "144KiB",
            preset(200, &["black", "white", "grey", "cyan", "gold"], 1.5, 8, 40),
        ),
        (
            "3MiB",
            preset(600, &["black", "white", "grey", "cyan", "gold"], 20.0, 2, 10),
        ),
        (
            "4MiB",
            preset(
                600,
                &["black", "white", "grey", "cyan", "gold", "beige", "aliceblue"],
                1.5,
                2,
                10,
            ),
        ),
        // Large: frames for this one can take minutes and hold several
        // gigabytes of raster data in memory before the file is written.
        (
            "12MiB",
            preset(
                800,
                &["black", "white", "grey", "cyan", "gold", "beige", "aliceblue"],
                8.5,
                1,
                10,
            ),
        ),
    ])
});

pub fn presets() -> &'static IndexMap<&'static str, AnimationConfig> {
    &PRESETS
}

pub fn preset_named(name: &str) -> Option<&'static AnimationConfig> {
    PRESETS.get(name)
}
