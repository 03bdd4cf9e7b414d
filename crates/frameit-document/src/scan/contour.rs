// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge mask construction and contour candidate extraction.

use frameit_core::{CandidateSelection, ContourMode, DetectionParams, Point};
use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::morphology::{close, dilate};
use imageproc::point::Point as PixelPoint;
use imageproc::stats::cumulative_histogram;
use tracing::debug;

use super::geometry::shoelace_area;

/// Douglas-Peucker tolerance as a fraction of the contour perimeter.
const APPROX_EPSILON_FRACTION: f64 = 0.02;

/// A traced contour that passed the area floor.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub points: Vec<PixelPoint<i32>>,
    pub area: f64,
}

/// Gaussian sigma equivalent to a `kernel` x `kernel` blur (the usual
/// `0.3 * ((k - 1) / 2 - 1) + 0.8` rule).
pub(crate) fn kernel_sigma(kernel: u32) -> f32 {
    0.3 * ((kernel as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Blur, Canny, then bridge broken edges with a square structuring element.
pub(crate) fn edge_mask(gray: &GrayImage, params: &DetectionParams) -> GrayImage {
    let blurred = gaussian_blur_f32(gray, kernel_sigma(params.blur_kernel));
    let edges = canny(&blurred, params.canny_low, params.canny_high);

    // An LInf ball of radius r is a (2r+1) x (2r+1) square.
    let radius = u8::try_from(params.morph_kernel / 2).unwrap_or(u8::MAX);
    let closed = close(&edges, Norm::LInf, radius);
    if params.use_dilation {
        dilate(&closed, Norm::LInf, radius)
    } else {
        closed
    }
}

/// Trace the mask and return the contours worth approximating, largest first.
pub(crate) fn candidates(mask: &GrayImage, params: &DetectionParams) -> Vec<Candidate> {
    let (width, height) = mask.dimensions();
    let min_area = width as f64 * height as f64 * params.min_area_fraction;

    let contours = find_contours::<i32>(mask);
    debug!(count = contours.len(), "Contours traced");

    let mut ranked: Vec<Candidate> = contours
        .into_iter()
        .filter(|contour| match params.contour_mode {
            ContourMode::List => true,
            ContourMode::External => {
                matches!(contour.border_type, BorderType::Outer) && contour.parent.is_none()
            }
        })
        .map(|contour| {
            let area = shoelace_area(&to_points(&contour.points));
            Candidate {
                points: contour.points,
                area,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.area.total_cmp(&a.area));

    if params.candidate_selection == CandidateSelection::LargestOnly {
        ranked.truncate(1);
    }
    ranked.retain(|candidate| candidate.area > min_area);

    debug!(
        count = ranked.len(),
        min_area,
        "Contours above the area floor"
    );
    ranked
}

/// Histogram equalization that stretches the occupied range to the full
/// 0..=255: the darkest level present maps to 0 and the brightest to 255.
pub(crate) fn equalize(gray: &GrayImage) -> GrayImage {
    let histogram = cumulative_histogram(gray);
    let Some(cdf) = histogram.channels.first() else {
        return gray.clone();
    };
    let total = u64::from(cdf[255]);
    let Some(cdf_min) = cdf.iter().copied().find(|&count| count > 0).map(u64::from) else {
        return gray.clone();
    };
    if total == cdf_min {
        // A single grey level: nothing to stretch.
        return gray.clone();
    }

    let scale = 255.0 / (total - cdf_min) as f64;
    let lut: [u8; 256] = std::array::from_fn(|level| {
        let above_min = u64::from(cdf[level]).saturating_sub(cdf_min);
        (above_min as f64 * scale).round().clamp(0.0, 255.0) as u8
    });

    let mut out = gray.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = lut[usize::from(pixel.0[0])];
    }
    out
}

/// Simplify a closed contour with a tolerance of 2% of its perimeter.
///
/// The contour is split at two extreme points (A, the point farthest from
/// the first traced pixel, and B, the point farthest from A) and each half is
/// simplified as an open curve, so the pixel where tracing happened to start
/// is not forced to be a vertex.
///
/// Contours too short to form a polygon come back empty.
pub(crate) fn approximate(points: &[PixelPoint<i32>]) -> Vec<PixelPoint<i32>> {
    if points.len() < 3 {
        return Vec::new();
    }
    let epsilon = APPROX_EPSILON_FRACTION * arc_length(points, true);
    if epsilon <= 0.0 {
        return Vec::new();
    }

    let n = points.len();
    let far_a = farthest_from(points, points[0]);
    let far_b = farthest_from(points, points[far_a]);
    // Walk the contour starting at B; A sits at `split`.
    let rotated: Vec<PixelPoint<i32>> = points[far_b..]
        .iter()
        .chain(&points[..far_b])
        .copied()
        .collect();
    let split = (far_a + n - far_b) % n;
    if split == 0 {
        return Vec::new();
    }

    let mut polygon = approximate_polygon_dp(&rotated[..=split], epsilon, false);
    let mut back: Vec<PixelPoint<i32>> = rotated[split..].to_vec();
    back.push(rotated[0]);
    let back = approximate_polygon_dp(&back, epsilon, false);
    // `back` runs A..=B; both ends are already in `polygon`.
    if back.len() > 2 {
        polygon.extend_from_slice(&back[1..back.len() - 1]);
    }
    polygon
}

/// Index of the contour point farthest from `from`, first one on ties.
fn farthest_from(points: &[PixelPoint<i32>], from: PixelPoint<i32>) -> usize {
    let dist = |p: &PixelPoint<i32>| {
        let (dx, dy) = (i64::from(p.x - from.x), i64::from(p.y - from.y));
        dx * dx + dy * dy
    };
    let mut best = 0;
    for (i, p) in points.iter().enumerate() {
        if dist(p) > dist(&points[best]) {
            best = i;
        }
    }
    best
}

pub(crate) fn to_points(pixels: &[PixelPoint<i32>]) -> Vec<Point> {
    pixels
        .iter()
        .map(|p| Point::new(p.x as f64, p.y as f64))
        .collect()
}
