//! Image output.
//!
//! Both writers apply the same display transform to the linear radiance in
//! an [`ImageBuffer`]: NaN components become 0, gamma 2 (square root), clamp
//! to [0, 0.999], then quantize to 0..=255.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::OutputError;
use crate::renderer::ImageBuffer;
use crate::Color;
use kiln_math::Interval;

const DISPLAY_RANGE: Interval = Interval::new(0.0, 0.999);

/// Convert one channel of linear radiance to an 8-bit display value.
fn quantize(linear: f64) -> u8 {
    // NaN and negative radiance both display as black
    let linear = if linear.is_nan() { 0.0 } else { linear.max(0.0) };
    (256.0 * DISPLAY_RANGE.clamp(linear.sqrt())) as u8
}

/// Convert a linear color to 8-bit gamma-corrected RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Write a plain-text PPM (`P3`): header, then one `R G B` line per pixel,
/// row-major, top row first.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut out: W) -> Result<(), OutputError> {
    writeln!(out, "P3")?;
    writeln!(out, "{} {}", image.width, image.height)?;
    writeln!(out, "255")?;

    for color in &image.pixels {
        let [r, g, b] = color_to_rgb8(*color);
        writeln!(out, "{r} {g} {b}")?;
    }

    out.flush()?;
    Ok(())
}

/// Save an image, choosing the format from the file extension (`.ppm` or
/// `.png`).
pub fn save_image(image: &ImageBuffer, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("ppm") => {
            let file = File::create(path)?;
            write_ppm(image, BufWriter::new(file))?;
        }
        Some("png") => {
            let rgb = image::RgbImage::from_fn(image.width, image.height, |x, y| {
                image::Rgb(color_to_rgb8(image.get(x, y)))
            });
            rgb.save_with_format(path, image::ImageFormat::Png)?;
        }
        _ => return Err(OutputError::UnsupportedFormat(path.display().to_string())),
    }

    log::info!("Wrote {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_display_transform() {
        assert_eq!(color_to_rgb8(Color::ZERO), [0, 0, 0]);
        // sqrt(0.25) = 0.5 -> 128
        assert_eq!(color_to_rgb8(Color::splat(0.25)), [128, 128, 128]);
        // Clamped to 0.999 -> 255
        assert_eq!(color_to_rgb8(Color::new(1.0, 4.0, 100.0)), [255, 255, 255]);
    }

    #[test]
    fn test_nan_and_negative_become_black() {
        assert_eq!(color_to_rgb8(Color::new(f64::NAN, -1.0, 0.25)), [0, 0, 128]);
    }

    #[test]
    fn test_ppm_layout() {
        let mut image = ImageBuffer::new(2, 2);
        image.set(0, 0, Color::new(1.0, 0.0, 0.0));
        image.set(1, 1, Color::splat(0.25));

        let mut out = Vec::new();
        write_ppm(&image, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text, "P3\n2 2\n255\n255 0 0\n0 0 0\n0 0 0\n128 128 128\n");
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let image = ImageBuffer::new(1, 1);
        let result = save_image(&image, std::env::temp_dir().join("kiln_output.bmpx"));
        assert!(matches!(result, Err(OutputError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_save_png_and_ppm() {
        let mut image = ImageBuffer::new(3, 2);
        image.set(2, 1, Color::ONE);

        let dir = std::env::temp_dir();
        let png = dir.join(format!("kiln_output_{}.png", std::process::id()));
        let ppm = dir.join(format!("kiln_output_{}.ppm", std::process::id()));

        save_image(&image, &png).unwrap();
        save_image(&image, &ppm).unwrap();

        let decoded = image::open(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [255, 255, 255]);
        assert!(std::fs::read_to_string(&ppm).unwrap().starts_with("P3\n3 2\n255\n"));

        let _ = std::fs::remove_file(png);
        let _ = std::fs::remove_file(ppm);
    }
}
