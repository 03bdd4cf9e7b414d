// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for corner detection and perspective rectification on
// a synthetic photo of a page.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use frameit_core::{Corners, Point};
use frameit_document::{CornerDetector, PerspectiveRectifier};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A 600x800 black canvas with a white 500x700 page at (50, 50).
fn page_photo() -> DynamicImage {
    let mut img = RgbImage::from_pixel(600, 800, Rgb([0, 0, 0]));
    draw_filled_rect_mut(&mut img, Rect::at(50, 50).of_size(500, 700), Rgb([255, 255, 255]));
    DynamicImage::ImageRgb8(img)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Full detection pipeline on the standard profile.
fn bench_detect(c: &mut Criterion) {
    let photo = page_photo();
    let detector = CornerDetector::default();

    c.bench_function("detect_corners (600x800)", |b| {
        b.iter(|| black_box(detector.detect(black_box(&photo))));
    });
}

/// Homography solve plus bilinear warp of a slightly skewed page.
fn bench_rectify(c: &mut Criterion) {
    let photo = page_photo();
    let corners = Corners::new(
        Point::new(60.0, 45.0),
        Point::new(545.0, 60.0),
        Point::new(550.0, 755.0),
        Point::new(48.0, 740.0),
    );
    let rectifier = PerspectiveRectifier::new();

    c.bench_function("rectify (600x800)", |b| {
        b.iter(|| black_box(rectifier.rectify(black_box(&photo), &corners)));
    });
}

criterion_group!(benches, bench_detect, bench_rectify);
criterion_main!(benches);
