// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document corner detection — locate the four corners of a page in a photo.

use std::path::Path;

use frameit_core::{Corners, Point, ScannerConfig};
use image::DynamicImage;
use tracing::{debug, info, instrument, warn};

use super::contour;
use super::corners::{order_corners, reduce_to_four};
use crate::image::processor::ImageProcessor;

/// Largest vertex count of a polygon approximation still treated as a
/// near-quadrilateral.
const MAX_VERTICES: usize = 6;

/// Inset of the fallback rectangle, as a fraction of each dimension.
pub const DEFAULT_MARGIN_FRACTION: f64 = 0.1;

/// Outcome of one detection run, before the fallback policy is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// A candidate contour produced four ordered corners.
    Detected(Corners),
    /// The image was processed but no contour qualified.
    NotFound,
    /// The image could not be processed at all.
    Error(String),
}

impl Detection {
    pub fn corners(&self) -> Option<&Corners> {
        match self {
            Self::Detected(corners) => Some(corners),
            _ => None,
        }
    }
}

/// The rectangle used whenever detection has nothing better to offer: inset
/// by 10% of `width` and `height` from the image bounds.
pub fn default_corners(width: u32, height: u32) -> Corners {
    inset_corners(width, height, DEFAULT_MARGIN_FRACTION)
}

fn inset_corners(width: u32, height: u32, margin_fraction: f64) -> Corners {
    let (w, h) = (width as f64, height as f64);
    let (mx, my) = (w * margin_fraction, h * margin_fraction);
    Corners::new(
        Point::new(mx, my),
        Point::new(w - mx, my),
        Point::new(w - mx, h - my),
        Point::new(mx, h - my),
    )
}

/// Finds the document quadrilateral in a captured photo.
///
/// ## Pipeline
///
/// 1. Grayscale + histogram equalization (darkest level to 0, brightest to 255)
/// 2. Pick the high-resolution or standard profile by image size
/// 3. Gaussian blur, Canny edges, morphological close (and dilate)
/// 4. Trace contours, keep those above the profile's area floor
/// 5. Approximate each candidate with a polygon (2% of its perimeter)
/// 6. Accept 3–6 vertex polygons (4–6 in the standard profile), reduce them to
///    four points, and order those as top-left, top-right, bottom-right,
///    bottom-left
///
/// `detect` never fails: when nothing qualifies, or the image is unusable, it
/// returns the inset default rectangle so the user always has handles to drag.
/// `analyze` exposes the undecorated outcome.
#[derive(Debug, Clone, Default)]
pub struct CornerDetector {
    config: ScannerConfig,
}

impl CornerDetector {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Detect corners, falling back to the default rectangle on any failure.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn detect(&self, image: &DynamicImage) -> Corners {
        match self.analyze(image) {
            Detection::Detected(corners) => corners,
            Detection::NotFound => {
                warn!("No suitable document contour found, using default rectangle");
                self.fallback(image.width(), image.height())
            }
            Detection::Error(reason) => {
                warn!(%reason, "Detection failed, using default canvas rectangle");
                self.canvas_fallback()
            }
        }
    }

    /// Decode `data` and detect corners. Undecodable data yields the default
    /// rectangle of the fallback canvas.
    #[instrument(skip_all, fields(data_len = data.len()))]
    pub fn detect_bytes(&self, data: &[u8]) -> Corners {
        match ImageProcessor::from_bytes(data) {
            Ok(processor) => self.detect(processor.as_dynamic()),
            Err(err) => {
                warn!(error = %err, "Image decode failed, using default canvas rectangle");
                self.canvas_fallback()
            }
        }
    }

    /// Load the image at `path` and detect corners. An unreadable file yields
    /// the default rectangle of the fallback canvas.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn detect_path(&self, path: impl AsRef<Path>) -> Corners {
        match ImageProcessor::open(path) {
            Ok(processor) => self.detect(processor.as_dynamic()),
            Err(err) => {
                warn!(error = %err, "Image load failed, using default canvas rectangle");
                self.canvas_fallback()
            }
        }
    }

    /// Run the pipeline and report what happened without applying the
    /// fallback policy.
    pub fn analyze(&self, image: &DynamicImage) -> Detection {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Detection::Error(format!("image has no pixels ({width}x{height})"));
        }

        let (profile, params) = self.config.params_for(width, height);
        if let Err(err) = params.validate() {
            return Detection::Error(err.to_string());
        }
        info!(width, height, ?profile, "Starting document corner detection");

        let gray = contour::equalize(&image.to_luma8());
        let mask = contour::edge_mask(&gray, params);
        let candidates = contour::candidates(&mask, params);

        for candidate in &candidates {
            let approx = contour::approximate(&candidate.points);
            let vertices = approx.len();
            if !(params.min_vertices..=MAX_VERTICES).contains(&vertices) {
                debug!(vertices, area = candidate.area, "Candidate is not near-quadrilateral");
                continue;
            }
            debug!(vertices, area = candidate.area, "Found near-quadrilateral shape");

            let Some(points) = reduce_to_four(&approx, params, width, height) else {
                debug!(vertices, "Candidate could not be reduced to 4 points");
                continue;
            };
            if let Some(corners) = order_corners(&points, params.ordering, width, height) {
                info!(?corners, "Detected document corners");
                return Detection::Detected(corners);
            }
        }

        Detection::NotFound
    }

    /// Default rectangle for a `width` x `height` image, using the configured
    /// margin.
    pub fn fallback(&self, width: u32, height: u32) -> Corners {
        inset_corners(width, height, self.config.margin_fraction)
    }

    fn canvas_fallback(&self) -> Corners {
        let (width, height) = self.config.fallback_canvas;
        self.fallback(width, height)
    }
}
