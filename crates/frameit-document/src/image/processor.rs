// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decoding, lossless rotation, and JPEG/PNG encoding of
// captured photos and rectified crops. Operates on in-memory images using the
// `image` crate.

use std::path::Path;

use frameit_core::error::FrameitError;
use image::{DynamicImage, ImageError, ImageFormat};
use tracing::{debug, info, instrument};

/// Holds a single in-memory image on its way in or out of the scanner.
///
/// Transformations consume `self` and return a new `ImageProcessor`, enabling
/// method chaining.
///
/// ```ignore
/// let jpeg = ImageProcessor::open("crop.png")?
///     .rotate(90.0)
///     .to_jpeg_bytes(95)?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    /// Decode the photo at `path`.
    ///
    /// A missing file is reported as `FrameitError::FileNotFound` so callers
    /// can tell it apart from a file that exists but cannot be decoded.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FrameitError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|err| match err {
            ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                FrameitError::FileNotFound(path.to_path_buf())
            }
            other => FrameitError::ImageError(format!(
                "failed to open {}: {}",
                path.display(),
                other
            )),
        })?;
        info!(
            width = img.width(),
            height = img.height(),
            "Image loaded"
        );
        Ok(Self { image: img })
    }

    /// Decode an in-memory photo; the format is sniffed from the bytes.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, FrameitError> {
        let img = image::load_from_memory(data).map_err(|err| {
            FrameitError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    /// Rotate the image clockwise by a multiple of 90 degrees.
    ///
    /// A 90 degree turn is a transpose followed by a horizontal flip. Angles
    /// that are not a multiple of 90 leave the image unchanged.
    #[instrument(skip(self))]
    pub fn rotate(self, degrees: f32) -> Self {
        let normalised = degrees.rem_euclid(360.0);
        let image = if (normalised - 90.0).abs() < 0.01 {
            self.image.rotate90()
        } else if (normalised - 180.0).abs() < 0.01 {
            self.image.rotate180()
        } else if (normalised - 270.0).abs() < 0.01 {
            self.image.rotate270()
        } else {
            debug!(degrees, "Not a quarter turn; leaving image unchanged");
            self.image
        };
        debug!(
            new_w = image.width(),
            new_h = image.height(),
            "Rotation applied"
        );
        Self { image }
    }

    /// Lossless encoding, used where output must compare byte-for-byte.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, FrameitError> {
        encode_to_format(&self.image, ImageFormat::Png)
    }

    /// JPEG-encode as RGB (alpha is dropped) at `quality` (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, FrameitError> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder).map_err(|err| {
            FrameitError::ImageError(format!("JPEG encoding failed: {}", err))
        })?;
        debug!(bytes = buffer.len(), quality, "JPEG encoded");
        Ok(buffer)
    }

    /// Save to `path`, choosing the codec from its extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FrameitError> {
        self.image.save(path.as_ref()).map_err(|err| {
            FrameitError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

fn encode_to_format(
    image: &DynamicImage,
    format: ImageFormat,
) -> Result<Vec<u8>, FrameitError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image.write_to(&mut cursor, format).map_err(|err| {
        FrameitError::ImageError(format!("image encoding failed: {}", err))
    })?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn open_missing_file_is_not_found() {
        let err = ImageProcessor::open("/no/such/photo.jpg").err().unwrap();
        assert!(matches!(err, FrameitError::FileNotFound(_)));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = ImageProcessor::from_bytes(b"definitely not an image").err().unwrap();
        assert!(matches!(err, FrameitError::ImageError(_)));
    }

    #[test]
    fn quarter_turn_swaps_dimensions_and_moves_pixels() {
        let mut img = RgbImage::new(4, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));

        let rotated = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(img)).rotate(90.0);
        assert_eq!((rotated.width(), rotated.height()), (2, 4));

        // Clockwise: the top-left pixel ends up top-right.
        let out = rotated.into_dynamic().to_rgb8();
        assert_eq!(out.get_pixel(1, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn odd_angle_is_a_no_op() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(5, 3));
        let out = ImageProcessor::from_dynamic(img).rotate(45.0);
        assert_eq!((out.width(), out.height()), (5, 3));
    }

    #[test]
    fn jpeg_bytes_decode_back() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 8, Rgb([10, 200, 30])));
        let jpeg = ImageProcessor::from_dynamic(img).to_jpeg_bytes(95).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let decoded = ImageProcessor::from_bytes(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }
}
