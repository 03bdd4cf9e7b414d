// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification — warp a document quadrilateral into an upright
// rectangle.

use frameit_core::error::{FrameitError, Result};
use frameit_core::{Corners, Orientation, Point};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, info, instrument};

use super::geometry::shoelace_area;
use crate::image::processor::ImageProcessor;

/// Corners closer than this (in pixels) are treated as coincident.
const MIN_CORNER_SEPARATION: f64 = 1.0;

/// Any three corners spanning a triangle smaller than this (in square pixels)
/// are treated as collinear.
const MIN_TRIANGLE_AREA: f64 = 1.0;

/// Largest output side we are willing to allocate.
const MAX_OUTPUT_SIDE: u32 = 32_768;

/// Output geometry for one rectification, computed before any pixels move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectifyPlan {
    /// `(width, height)` of the source image.
    pub source_size: (u32, u32),
    /// Warp target width (after any orientation swap).
    pub target_width: f64,
    /// Warp target height (after any orientation swap).
    pub target_height: f64,
    /// Whether the naive target disagreed with the source orientation and
    /// its sides were swapped.
    pub swapped: bool,
}

impl RectifyPlan {
    /// Size the output for `corners` taken from a `width` x `height` image.
    ///
    /// Fails with `DegenerateGeometry` for coincident corners, a collapsed
    /// quadrilateral, or an output that rounds to nothing.
    pub fn new(width: u32, height: u32, corners: &Corners) -> Result<Self> {
        check_corners(corners)?;

        let [tl, tr, br, bl] = *corners.as_array();
        let top = tl.distance(&tr);
        let bottom = bl.distance(&br);
        let left = tl.distance(&bl);
        let right = tr.distance(&br);

        let naive_width = top.max(bottom);
        let naive_height = left.max(right);

        let source = Orientation::of(width as f64, height as f64);
        let target = Orientation::of(naive_width, naive_height);
        let swapped = source != target;
        let (target_width, target_height) = if swapped {
            (naive_height, naive_width)
        } else {
            (naive_width, naive_height)
        };

        let plan = Self {
            source_size: (width, height),
            target_width,
            target_height,
            swapped,
        };
        let (w, h) = plan.warp_size();
        if w == 0 || h == 0 {
            return Err(FrameitError::DegenerateGeometry(format!(
                "output would be {w}x{h} pixels"
            )));
        }
        if w > MAX_OUTPUT_SIDE || h > MAX_OUTPUT_SIDE {
            return Err(FrameitError::DegenerateGeometry(format!(
                "output of {w}x{h} pixels exceeds the {MAX_OUTPUT_SIDE} pixel limit"
            )));
        }
        Ok(plan)
    }

    /// Pixel size of the warp buffer.
    pub fn warp_size(&self) -> (u32, u32) {
        (
            self.target_width.round() as u32,
            self.target_height.round() as u32,
        )
    }

    /// Pixel size of the returned image: the warp buffer, turned a quarter
    /// when the sides were swapped.
    pub fn output_size(&self) -> (u32, u32) {
        let (w, h) = self.warp_size();
        if self.swapped { (h, w) } else { (w, h) }
    }

    /// Destination rectangle `[(0,0), (w,0), (w,h), (0,h)]` for the homography.
    pub fn destination(&self) -> [Point; 4] {
        let (w, h) = (self.target_width, self.target_height);
        [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ]
    }
}

fn check_corners(corners: &Corners) -> Result<()> {
    let points = corners.as_array();
    if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(FrameitError::InvalidArgument(
            "corner coordinates must be finite".into(),
        ));
    }
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            if a.distance(b) < MIN_CORNER_SEPARATION {
                return Err(FrameitError::DegenerateGeometry(format!(
                    "coincident corners at ({}, {})",
                    a.x, a.y
                )));
            }
        }
    }
    // Self-intersecting quadrilaterals are allowed; only collinear triples
    // leave the homography underdetermined.
    for skip in 0..4 {
        let triple: Vec<Point> = (0..4).filter(|&i| i != skip).map(|i| points[i]).collect();
        let area = shoelace_area(&triple);
        if area < MIN_TRIANGLE_AREA {
            return Err(FrameitError::DegenerateGeometry(format!(
                "three corners are collinear (triangle of {area:.2} square pixels)"
            )));
        }
    }
    Ok(())
}

fn control_points(points: &[Point; 4]) -> [(f32, f32); 4] {
    points.map(|p| (p.x as f32, p.y as f32))
}

/// Maps four document corners onto an axis-aligned rectangle.
///
/// The output is sized from the longer of each pair of opposite sides, and
/// a quarter turn is applied when that size disagrees with the source's
/// portrait/landscape orientation. Pixels outside the source are black.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerspectiveRectifier;

impl PerspectiveRectifier {
    pub fn new() -> Self {
        Self
    }

    /// Plan the output for `corners` over `image` without warping.
    pub fn plan(&self, image: &DynamicImage, corners: &Corners) -> Result<RectifyPlan> {
        RectifyPlan::new(image.width(), image.height(), corners)
    }

    /// Produce the perspective-corrected crop.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn rectify(&self, image: &DynamicImage, corners: &Corners) -> Result<DynamicImage> {
        let plan = self.plan(image, corners)?;
        let (w, h) = plan.warp_size();
        debug!(
            target_width = plan.target_width,
            target_height = plan.target_height,
            swapped = plan.swapped,
            "Rectification planned"
        );

        let projection = Projection::from_control_points(
            control_points(corners.as_array()),
            control_points(&plan.destination()),
        )
        .ok_or_else(|| {
            FrameitError::DegenerateGeometry("corners do not define a perspective transform".into())
        })?;

        let warped = match image {
            DynamicImage::ImageLuma8(gray) => {
                let mut out = GrayImage::new(w, h);
                warp_into(gray, &projection, Interpolation::Bilinear, Luma([0]), &mut out);
                DynamicImage::ImageLuma8(out)
            }
            other if other.color().has_alpha() => {
                let src = other.to_rgba8();
                let mut out = RgbaImage::new(w, h);
                warp_into(&src, &projection, Interpolation::Bilinear, Rgba([0, 0, 0, 0]), &mut out);
                DynamicImage::ImageRgba8(out)
            }
            other => {
                let src = other.to_rgb8();
                let mut out = RgbImage::new(w, h);
                warp_into(&src, &projection, Interpolation::Bilinear, Rgb([0, 0, 0]), &mut out);
                DynamicImage::ImageRgb8(out)
            }
        };

        let output = if plan.swapped {
            debug!("Orientation disagreed with the source, rotating result");
            ImageProcessor::from_dynamic(warped).rotate(90.0).into_dynamic()
        } else {
            warped
        };

        info!(
            width = output.width(),
            height = output.height(),
            "Rectified crop produced"
        );
        Ok(output)
    }
}
