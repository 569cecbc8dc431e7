//! Pixel-buffer masking primitives.
//!
//! Both primitives write a single fill colour into the pixels selected by a
//! [`Coverage`] bitmap. The colour is given as 8-bit RGB and adapted to the
//! buffer's layout:
//!
//! - gray buffers take the colour's luma
//! - 16-bit channels widen `c` to `c * 257`
//! - float channels scale `c` to `c / 255`
//! - alpha, when present, is set opaque

use image::{DynamicImage, GenericImageView, ImageBuffer, Luma, LumaA, Pixel, Rgb, Rgba};
use shutter_common::RgbColor;
use shutter_geom::{Coverage, Region};

use crate::ShutterError;
use crate::overlay::OverlayBitmap;
use crate::params::Occlusion;

/// Fill the occluded side of `region` in a copy of `image`.
///
/// # Errors
///
/// Returns [`ShutterError::UnsupportedPixelLayout`] if the buffer layout
/// cannot be written.
pub fn mask_region(
    image: &DynamicImage,
    region: &Region,
    occlusion: Occlusion,
    color: RgbColor,
) -> Result<DynamicImage, ShutterError> {
    let (width, height) = image.dimensions();
    let coverage = region.rasterize(width, height);
    let mut masked = image.clone();
    fill_where(
        &mut masked,
        &coverage,
        occlusion == Occlusion::Outside,
        color,
    )?;
    Ok(masked)
}

/// Fill every pixel of `image` set in `overlay`; other pixels are kept.
///
/// # Errors
///
/// Returns [`ShutterError::CoverageMismatch`] if the overlay was extracted
/// for a different size, or [`ShutterError::UnsupportedPixelLayout`] if the
/// buffer layout cannot be written.
pub fn composite_mask(
    mut image: DynamicImage,
    overlay: &OverlayBitmap,
    color: RgbColor,
) -> Result<DynamicImage, ShutterError> {
    fill_where(&mut image, overlay.coverage(), false, color)?;
    Ok(image)
}

/// Write `color` into covered pixels, or into uncovered ones when
/// `fill_uncovered` is set.
fn fill_where(
    image: &mut DynamicImage,
    coverage: &Coverage,
    fill_uncovered: bool,
    color: RgbColor,
) -> Result<(), ShutterError> {
    let (image_width, image_height) = image.dimensions();
    if (coverage.width(), coverage.height()) != (image_width, image_height) {
        return Err(ShutterError::CoverageMismatch {
            coverage_width: coverage.width(),
            coverage_height: coverage.height(),
            image_width,
            image_height,
        });
    }

    let gray = color.luma();
    let RgbColor { r, g, b } = color;
    match image {
        DynamicImage::ImageLuma8(buf) => fill_buffer(buf, coverage, fill_uncovered, Luma([gray])),
        DynamicImage::ImageLumaA8(buf) => {
            fill_buffer(buf, coverage, fill_uncovered, LumaA([gray, u8::MAX]));
        }
        DynamicImage::ImageRgb8(buf) => fill_buffer(buf, coverage, fill_uncovered, Rgb([r, g, b])),
        DynamicImage::ImageRgba8(buf) => {
            fill_buffer(buf, coverage, fill_uncovered, Rgba([r, g, b, u8::MAX]));
        }
        DynamicImage::ImageLuma16(buf) => {
            fill_buffer(buf, coverage, fill_uncovered, Luma([widen(gray)]));
        }
        DynamicImage::ImageLumaA16(buf) => {
            fill_buffer(buf, coverage, fill_uncovered, LumaA([widen(gray), u16::MAX]));
        }
        DynamicImage::ImageRgb16(buf) => {
            let fill = Rgb([widen(r), widen(g), widen(b)]);
            fill_buffer(buf, coverage, fill_uncovered, fill);
        }
        DynamicImage::ImageRgba16(buf) => {
            let fill = Rgba([widen(r), widen(g), widen(b), u16::MAX]);
            fill_buffer(buf, coverage, fill_uncovered, fill);
        }
        DynamicImage::ImageRgb32F(buf) => {
            let fill = Rgb([unit(r), unit(g), unit(b)]);
            fill_buffer(buf, coverage, fill_uncovered, fill);
        }
        DynamicImage::ImageRgba32F(buf) => {
            let fill = Rgba([unit(r), unit(g), unit(b), 1.0]);
            fill_buffer(buf, coverage, fill_uncovered, fill);
        }
        other => return Err(ShutterError::UnsupportedPixelLayout(other.color())),
    }
    Ok(())
}

fn fill_buffer<P: Pixel>(
    buf: &mut ImageBuffer<P, Vec<P::Subpixel>>,
    coverage: &Coverage,
    fill_uncovered: bool,
    fill: P,
) {
    for (x, y, pixel) in buf.enumerate_pixels_mut() {
        if coverage.is_covered(x, y) != fill_uncovered {
            *pixel = fill;
        }
    }
}

/// Widen an 8-bit channel to 16 bits so that 0xFF maps to 0xFFFF.
fn widen(channel: u8) -> u16 {
    u16::from(channel) * 257
}

fn unit(channel: u8) -> f32 {
    f32::from(channel) / 255.0
}
