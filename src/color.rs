use image::Rgba;

/// Resolve a CSS-style color name to an opaque RGBA pixel.
///
/// Lookup is case-insensitive. The table covers every name the preset
/// catalog uses plus the usual basic set; unknown names return `None` and
/// are reported as validation errors by config validation.
pub fn named(name: &str) -> Option<Rgba<u8>> {
    let rgb: [u8; 3] = match name.to_ascii_lowercase().as_str() {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "grey" | "gray" => [128, 128, 128],
        "silver" => [192, 192, 192],
        "red" => [255, 0, 0],
        "maroon" => [128, 0, 0],
        "lime" => [0, 255, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "navy" => [0, 0, 128],
        "yellow" => [255, 255, 0],
        "cyan" | "aqua" => [0, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255],
        "teal" => [0, 128, 128],
        "purple" => [128, 0, 128],
        "orange" => [255, 165, 0],
        "gold" => [255, 215, 0],
        "beige" => [245, 245, 220],
        "aliceblue" => [240, 248, 255],
        _ => return None,
    };
    Some(Rgba([rgb[0], rgb[1], rgb[2], 255]))
}
