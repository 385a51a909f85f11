use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

/// Phone photos of receipts routinely exceed what the recognizer needs;
/// anything larger gets downscaled before normalization.
const MAX_DIMENSION: u32 = 2400;

/// Fraction of pixels clipped at each end of the histogram when stretching.
/// Receipt photos carry specular glare and shadow specks that pin the raw
/// min/max, so the stretch window is taken at the 1st/99th percentiles.
const CLIP_FRACTION: f64 = 0.01;

/// Load an image file, normalize it, and return PNG bytes ready for OCR.
pub fn prepare_for_ocr(path: &Path) -> Result<Vec<u8>, PreprocessError> {
    let img = image::open(path)?;
    encode_as_png(normalize(img))
}

/// Normalize raw image bytes (JPEG / PNG / WEBP / …) into OCR-ready PNG bytes.
pub fn prepare_for_ocr_from_bytes(data: &[u8]) -> Result<Vec<u8>, PreprocessError> {
    let img = image::load_from_memory(data)?;
    encode_as_png(normalize(img))
}

/// Grayscale + percentile contrast stretch.
fn normalize(img: DynamicImage) -> DynamicImage {
    let img = if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, image::imageops::FilterType::Lanczos3)
    } else {
        img
    };

    let gray: GrayImage = img.to_luma8();
    let (lo, hi) = percentile_window(&gray, CLIP_FRACTION);

    if hi <= lo {
        // Uniform image — nothing to stretch.
        return DynamicImage::ImageLuma8(gray);
    }

    let range = (hi - lo) as u32;
    let stretched: GrayImage = ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        let p = gray.get_pixel(x, y)[0].clamp(lo, hi);
        let v = ((p - lo) as u32 * 255 / range) as u8;
        Luma([v])
    });

    DynamicImage::ImageLuma8(stretched)
}

/// Low/high luminance bounds with `clip` of the pixel mass discarded at each
/// tail of the 256-bin histogram.
fn percentile_window(gray: &GrayImage, clip: f64) -> (u8, u8) {
    let mut histogram = [0u64; 256];
    for p in gray.pixels() {
        histogram[p[0] as usize] += 1;
    }
    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return (0, 255);
    }
    let cut = (total as f64 * clip) as u64;

    let mut lo = 0u8;
    let mut seen = 0u64;
    for (value, count) in histogram.iter().enumerate() {
        seen += count;
        if seen > cut {
            lo = value as u8;
            break;
        }
    }

    let mut hi = 255u8;
    seen = 0;
    for (value, count) in histogram.iter().enumerate().rev() {
        seen += count;
        if seen > cut {
            hi = value as u8;
            break;
        }
    }

    (lo, hi)
}

fn encode_as_png(img: DynamicImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_gray(width: u32, height: u32, value: u8) -> DynamicImage {
        let img: GrayImage = ImageBuffer::from_fn(width, height, |_, _| Luma([value]));
        DynamicImage::ImageLuma8(img)
    }

    fn gradient_gray(width: u32, height: u32) -> DynamicImage {
        let img: GrayImage =
            ImageBuffer::from_fn(width, height, |x, _| Luma([(x * 255 / width) as u8]));
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn normalize_uniform_image_does_not_panic() {
        let result = normalize(solid_gray(10, 10, 128));
        assert_eq!(result.width(), 10);
        assert_eq!(result.height(), 10);
    }

    #[test]
    fn normalize_gradient_stretches_to_full_range() {
        let result = normalize(gradient_gray(256, 4));
        let gray = result.to_luma8();
        let min = gray.pixels().map(|p| p[0]).min().unwrap();
        let max = gray.pixels().map(|p| p[0]).max().unwrap();
        assert_eq!(min, 0);
        assert_eq!(max, 255);
    }

    #[test]
    fn percentile_window_ignores_outlier_specks() {
        // Mostly mid-gray with a handful of glare pixels at 255: the high
        // bound should sit at the bulk, not the glare.
        let img: GrayImage = ImageBuffer::from_fn(100, 100, |x, y| {
            if x < 2 && y == 0 { Luma([255u8]) } else { Luma([120u8]) }
        });
        let (lo, hi) = percentile_window(&img, 0.01);
        assert_eq!(lo, 120);
        assert_eq!(hi, 120);
    }

    #[test]
    fn prepare_from_bytes_produces_png() {
        let mut png_bytes = Vec::new();
        solid_gray(4, 4, 100)
            .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
            .unwrap();
        let result = prepare_for_ocr_from_bytes(&png_bytes).unwrap();
        assert_eq!(&result[..4], b"\x89PNG");
    }

    #[test]
    fn prepare_from_bytes_rejects_garbage() {
        assert!(matches!(
            prepare_for_ocr_from_bytes(b"not an image"),
            Err(PreprocessError::Load(_))
        ));
    }

    #[test]
    fn oversized_photo_is_downscaled() {
        let img: GrayImage = ImageBuffer::from_fn(3000, 1000, |_, _| Luma([200u8]));
        let result = normalize(DynamicImage::ImageLuma8(img));
        assert!(result.width() <= MAX_DIMENSION && result.height() <= MAX_DIMENSION);
    }
}
