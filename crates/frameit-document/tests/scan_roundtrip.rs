// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detect a page in a photo on disk, then crop it out.

use frameit_core::{FrameitError, ImagePoint};
use frameit_document::{CornerDetector, ImageProcessor, PerspectiveRectifier, default_corners};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

fn write_page_photo(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let mut img = RgbImage::from_pixel(600, 800, Rgb([0, 0, 0]));
    draw_filled_rect_mut(&mut img, Rect::at(50, 50).of_size(500, 700), Rgb([255, 255, 255]));
    let path = dir.path().join("page.png");
    ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(img))
        .save(&path)
        .unwrap();
    path
}

#[test]
fn detect_then_crop_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_page_photo(&dir);

    let corners = CornerDetector::default().detect_path(&path);
    let expected = [(50, 50), (550, 50), (550, 750), (50, 750)];
    for (found, (x, y)) in corners.to_image_points().iter().zip(expected) {
        assert!(
            (found.x - x).abs() <= 5 && (found.y - y).abs() <= 5,
            "expected ~({x}, {y}), got {found:?}"
        );
    }

    let photo = ImageProcessor::open(&path).unwrap();
    let crop = PerspectiveRectifier::new()
        .rectify(photo.as_dynamic(), &corners)
        .unwrap();
    let (w, h) = (crop.width() as i32, crop.height() as i32);
    assert!((w - 500).abs() <= 10 && (h - 700).abs() <= 10, "crop was {w}x{h}");

    let jpeg = ImageProcessor::from_dynamic(crop).to_jpeg_bytes(95).unwrap();
    let out = dir.path().join("crop.jpg");
    std::fs::write(&out, &jpeg).unwrap();
    let reopened = ImageProcessor::open(&out).unwrap();
    assert_eq!(reopened.width() as i32, w);
}

#[test]
fn corrupt_file_falls_back_to_canvas_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.jpg");
    std::fs::write(&path, b"not a jpeg").unwrap();

    let corners = CornerDetector::default().detect_path(&path);
    assert_eq!(
        corners.to_image_points(),
        [
            ImagePoint::new(100, 100),
            ImagePoint::new(900, 100),
            ImagePoint::new(900, 900),
            ImagePoint::new(100, 900),
        ]
    );
}

#[test]
fn missing_file_is_reported_as_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = ImageProcessor::open(dir.path().join("absent.png")).err().unwrap();
    assert!(matches!(err, FrameitError::FileNotFound(_)));
}

#[test]
fn default_rectangle_is_shared_by_every_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.png");
    ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(RgbImage::from_pixel(
        320,
        240,
        Rgb([128, 128, 128]),
    )))
    .save(&path)
    .unwrap();

    assert_eq!(CornerDetector::default().detect_path(&path), default_corners(320, 240));
}
