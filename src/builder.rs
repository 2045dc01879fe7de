use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use image::{
    codecs::gif::{GifEncoder, Repeat},
    Delay, Frame, Rgba, RgbaImage,
};
use rand::Rng as _;
use uuid::Uuid;

use crate::{
    color,
    config::AnimationConfig,
    error::{GifsmithError, GifsmithResult},
    glyph,
};

/// Vertical offset of the watermark's top edge, in pixels from the top.
pub const WATERMARK_TOP: i64 = 20;

/// Source of per-frame watermark ids (and batch ids).
///
/// Every frame gets a freshly generated id, which is what makes two
/// artifacts built from the same config byte-distinct. The default draws
/// random 128-bit uuids; tests substitute a deterministic source.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

#[derive(Debug, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Chooses the disc color partner for a pass from the eligible candidates.
pub trait PartnerPicker {
    /// Pick an index into a candidate list of length `len` (`len >= 1`).
    fn pick(&mut self, len: usize) -> usize;
}

#[derive(Debug, Default)]
pub struct RandomPicker;

impl PartnerPicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Builds one animated GIF artifact from an [`AnimationConfig`].
///
/// The animation is a filled disc growing from the canvas center past its
/// edges, one pass per palette color: the pass color paints the
/// background and a randomly chosen *different* palette color paints the
/// disc. The partner is re-chosen independently for each pass, so two
/// passes may coincidentally repeat a pairing.
///
/// All frames for one artifact are held in memory until the file is
/// written; large presets can grow to several gigabytes.
pub struct AnimationBuilder {
    ids: Box<dyn IdSource>,
    picker: Box<dyn PartnerPicker>,
}

impl Default for AnimationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationBuilder {
    pub fn new() -> Self {
        Self {
            ids: Box::new(UuidSource),
            picker: Box::new(RandomPicker),
        }
    }

    /// Replace the ambient id and random-choice capabilities.
    pub fn with_sources(ids: Box<dyn IdSource>, picker: Box<dyn PartnerPicker>) -> Self {
        Self { ids, picker }
    }

    /// Render all passes for `config` and write one GIF at `destination`.
    ///
    /// Validates the config before any frame is rendered or file touched.
    /// Returns the destination path.
    #[tracing::instrument(skip_all, fields(dest = %destination.display()))]
    pub fn create(
        &mut self,
        destination: &Path,
        config: &AnimationConfig,
    ) -> GifsmithResult<PathBuf> {
        config.validate()?;

        let palette = resolve_palette(config)?;
        let text_color = color::named(&config.text_color).ok_or_else(|| {
            GifsmithError::validation(format!("unknown color name '{}'", config.text_color))
        })?;

        let center = config.center();
        let max_radius = config.max_radius();

        if let Ok(mut echo) = serde_json::to_value(config) {
            echo["center"] = center.into();
            echo["max_radius"] = max_radius.into();
            tracing::debug!(options = %echo, "effective build options");
        }

        let mut frames: Vec<RgbaImage> = Vec::with_capacity(config.total_frames() as usize);
        for current in 0..palette.len() {
            let candidates = partner_candidates(&palette, current);
            let partner = candidates[self.picker.pick(candidates.len())];
            self.render_circle_pass(
                &mut frames,
                config.width,
                max_radius,
                config.step,
                center,
                palette[current].1,
                partner,
                text_color,
            );
        }

        ensure_parent_dir(destination)?;
        let file = File::create(destination)
            .with_context(|| format!("create artifact '{}'", destination.display()))?;

        let mut encoder = GifEncoder::new(BufWriter::new(file));
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| GifsmithError::encode(format!("set gif loop mode: {e}")))?;
        for image in frames {
            let frame = Frame::from_parts(
                image,
                0,
                0,
                Delay::from_numer_denom_ms(config.duration, 1),
            );
            encoder
                .encode_frame(frame)
                .map_err(|e| GifsmithError::encode(format!("encode gif frame: {e}")))?;
        }
        drop(encoder);

        tracing::info!(
            frames = config.total_frames(),
            dest = %destination.display(),
            "artifact written"
        );

        Ok(destination.to_path_buf())
    }

    /// One sweep of growing-disc frames for a single color pairing.
    #[allow(clippy::too_many_arguments)]
    fn render_circle_pass(
        &mut self,
        frames: &mut Vec<RgbaImage>,
        width: u32,
        max_radius: u32,
        step: u32,
        center: u32,
        background: Rgba<u8>,
        circle: Rgba<u8>,
        text_color: Rgba<u8>,
    ) {
        let mut rendered = 0u32;
        for radius in (0..max_radius).step_by(step as usize) {
            let mut image = RgbaImage::from_pixel(width, width, background);
            draw_disc(&mut image, center, center, radius, circle);

            let watermark = self.ids.next_id();
            let x = (i64::from(width) - i64::from(glyph::text_width(&watermark))) / 2;
            glyph::draw_text(&mut image, x, WATERMARK_TOP, &watermark, text_color);

            frames.push(image);
            rendered += 1;
        }
        tracing::debug!(frames = rendered, max_radius, "circle pass rendered");
    }
}

fn resolve_palette(config: &AnimationConfig) -> GifsmithResult<Vec<(String, Rgba<u8>)>> {
    config
        .colors
        .iter()
        .map(|name| {
            color::named(name)
                .map(|rgba| (name.to_ascii_lowercase(), rgba))
                .ok_or_else(|| GifsmithError::validation(format!("unknown color name '{name}'")))
        })
        .collect()
}

/// Disc colors eligible to pair with `palette[current]` as background:
/// every palette entry with a different name.
fn partner_candidates(palette: &[(String, Rgba<u8>)], current: usize) -> Vec<Rgba<u8>> {
    let (ref current_name, _) = palette[current];
    palette
        .iter()
        .filter(|(name, _)| name != current_name)
        .map(|(_, rgba)| *rgba)
        .collect()
}

fn draw_disc(image: &mut RgbaImage, cx: u32, cy: u32, radius: u32, fill: Rgba<u8>) {
    let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(radius));
    let r2 = r * r;
    for y in (cy - r).max(0)..=(cy + r).min(i64::from(image.height()) - 1) {
        for x in (cx - r).max(0)..=(cx + r).min(i64::from(image.width()) - 1) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= r2 {
                image.put_pixel(x as u32, y as u32, fill);
            }
        }
    }
}

fn ensure_parent_dir(path: &Path) -> GifsmithResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("create output directory '{}'", parent.display())
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SeqIds(u32);

    impl IdSource for SeqIds {
        fn next_id(&mut self) -> String {
            self.0 += 1;
            format!("{:08x}-0000-4000-8000-000000000000", self.0)
        }
    }

    struct FirstPicker;

    impl PartnerPicker for FirstPicker {
        fn pick(&mut self, _len: usize) -> usize {
            0
        }
    }

    fn two_color_config() -> AnimationConfig {
        AnimationConfig {
            width: 64,
            colors: vec!["black".into(), "white".into()],
            radius: 1.5,
            step: 8,
            duration: 40,
            text_color: "red".into(),
        }
    }

    fn test_builder() -> AnimationBuilder {
        AnimationBuilder::with_sources(Box::new(SeqIds(0)), Box::new(FirstPicker))
    }

    #[test]
    fn candidates_exclude_the_current_color() {
        let palette = resolve_palette(&AnimationConfig {
            colors: vec!["black".into(), "white".into(), "gold".into()],
            ..two_color_config()
        })
        .unwrap();

        for current in 0..palette.len() {
            let candidates = partner_candidates(&palette, current);
            assert_eq!(candidates.len(), 2);
            assert!(!candidates.contains(&palette[current].1));
        }
    }

    #[test]
    fn disc_fills_center_and_respects_radius() {
        let bg = Rgba([0, 0, 0, 255]);
        let fg = Rgba([255, 255, 255, 255]);
        let mut image = RgbaImage::from_pixel(21, 21, bg);
        draw_disc(&mut image, 10, 10, 4, fg);

        assert_eq!(*image.get_pixel(10, 10), fg);
        assert_eq!(*image.get_pixel(10, 6), fg);
        assert_eq!(*image.get_pixel(10, 5), bg);
        assert_eq!(*image.get_pixel(0, 0), bg);
    }

    #[test]
    fn zero_radius_disc_paints_a_single_pixel() {
        let bg = Rgba([0, 0, 0, 255]);
        let fg = Rgba([255, 255, 255, 255]);
        let mut image = RgbaImage::from_pixel(9, 9, bg);
        draw_disc(&mut image, 4, 4, 0, fg);
        assert_eq!(image.pixels().filter(|p| **p == fg).count(), 1);
    }

    #[test]
    fn disc_clips_when_radius_exceeds_canvas() {
        let fg = Rgba([255, 255, 255, 255]);
        let mut image = RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 255]));
        // max_radius sweeps past the canvas edge by design; must not panic.
        draw_disc(&mut image, 8, 8, 40, fg);
        assert!(image.pixels().all(|p| *p == fg));
    }

    #[test]
    fn pass_renders_ceil_max_radius_over_step_frames() {
        let cfg = two_color_config();
        let mut builder = test_builder();
        let mut frames = Vec::new();
        builder.render_circle_pass(
            &mut frames,
            cfg.width,
            cfg.max_radius(),
            cfg.step,
            cfg.center(),
            Rgba([0, 0, 0, 255]),
            Rgba([255, 255, 255, 255]),
            Rgba([255, 0, 0, 255]),
        );
        // width 64 -> center 32 -> max radius 48 -> ceil(48 / 8) = 6.
        assert_eq!(frames.len(), 6);
        assert_eq!(frames.len() as u32, cfg.frames_per_pass());
    }

    #[test]
    fn pass_frames_carry_background_and_disc_colors() {
        let bg = Rgba([0, 0, 0, 255]);
        let fg = Rgba([255, 255, 255, 255]);
        let mut builder = test_builder();
        let mut frames = Vec::new();
        builder.render_circle_pass(&mut frames, 64, 48, 8, 32, bg, fg, Rgba([255, 0, 0, 255]));

        // Second frame: radius 8 disc around the center, background corners.
        let frame = &frames[1];
        assert_eq!(*frame.get_pixel(32, 32), fg);
        assert_eq!(*frame.get_pixel(0, 63), bg);
    }

    #[test]
    fn create_rejects_single_color_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("bad.gif");
        let mut cfg = two_color_config();
        cfg.colors = vec!["black".into()];

        let err = test_builder().create(&dest, &cfg).unwrap_err();
        assert!(matches!(err, GifsmithError::Validation(_)));
        assert!(!dest.exists());
    }

    #[test]
    fn create_writes_a_gif_with_the_expected_frame_count() {
        use image::AnimationDecoder as _;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.gif");
        let cfg = two_color_config();

        let written = test_builder().create(&dest, &cfg).unwrap();
        assert_eq!(written, dest);

        let reader = std::io::BufReader::new(File::open(&dest).unwrap());
        let decoder = image::codecs::gif::GifDecoder::new(reader).unwrap();
        let frames = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(frames.len() as u32, cfg.total_frames());
    }
}
