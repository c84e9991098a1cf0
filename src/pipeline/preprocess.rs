//! Image preprocessing for better OCR accuracy.
//!
//! A deterministic transform applied to every page before recognition:
//! single-channel grayscale, a fixed +50% contrast boost, and a mild
//! sharpening pass. Scanned menus are overwhelmingly low-contrast photos or
//! faxed copies; flattening color and pushing contrast is the cheapest change
//! with the largest accuracy win for Tesseract. Pure function, no I/O.

use image::DynamicImage;

/// Contrast adjustment in percent.
const CONTRAST_BOOST: f32 = 50.0;

/// Unsharp-mask parameters approximating a +20% sharpness boost.
const SHARPEN_SIGMA: f32 = 1.2;
const SHARPEN_THRESHOLD: i32 = 2;

/// Prepare a rasterized page for OCR.
///
/// Always succeeds for a valid image; the output is single-channel.
pub fn preprocess(image: &DynamicImage) -> DynamicImage {
    image
        .grayscale()
        .adjust_contrast(CONTRAST_BOOST)
        .unsharpen(SHARPEN_SIGMA, SHARPEN_THRESHOLD)
}
