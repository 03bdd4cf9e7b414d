// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner configuration: the two detection profiles and the policies shared
// by the detector, the rectifier, and the bridge.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FrameitError, Result};

/// The two detection parameter sets, chosen by image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Either side above `high_res_threshold`.
    HighResolution,
    Standard,
}

/// Which traced contours are considered as document candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContourMode {
    /// Every traced border, including holes and nested borders.
    List,
    /// Only outermost outer borders.
    External,
}

/// How candidates are walked once sorted by descending area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSelection {
    /// Try each contour above the area floor; the first near-quadrilateral wins.
    FirstQualifying,
    /// Only the single largest contour is examined.
    LargestOnly,
}

/// How a convex hull with more than four vertices is cut down to four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HullReduction {
    /// The hull vertex nearest to each image corner.
    NearestImageCorner,
    /// The four hull vertices farthest from the hull centroid.
    FarthestFromCentroid,
}

/// How four points are assigned to the top-left/top-right/bottom-right/
/// bottom-left slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerOrdering {
    /// Ascending polar angle around the centroid, taken directly as tl/tr/br/bl.
    Angular,
    /// Diagonal sum/difference relative to the centroid.
    DiagonalSum,
    /// Each slot takes the point nearest to the matching image-bounds corner.
    NearestImageCorner,
}

/// One parameter profile of the corner-detection pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionParams {
    /// Gaussian kernel edge length in pixels (odd).
    pub blur_kernel: u32,
    /// Canny hysteresis thresholds.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Rectangular structuring element edge length in pixels (odd).
    pub morph_kernel: u32,
    /// Dilate after closing.
    pub use_dilation: bool,
    pub contour_mode: ContourMode,
    /// Minimum contour area as a fraction of the image area.
    pub min_area_fraction: f64,
    pub candidate_selection: CandidateSelection,
    /// Smallest accepted vertex count of a polygon approximation. The largest
    /// is always 6.
    pub min_vertices: usize,
    /// Route four-vertex approximations through the convex hull too.
    pub always_hull: bool,
    pub hull_reduction: HullReduction,
    /// Fill hulls with fewer than four vertices from the image corners.
    pub pad_with_image_corners: bool,
    pub ordering: CornerOrdering,
}

impl DetectionParams {
    /// Profile for images with either dimension above the high-resolution
    /// threshold.
    pub fn high_resolution() -> Self {
        Self {
            blur_kernel: 7,
            canny_low: 20.0,
            canny_high: 120.0,
            morph_kernel: 11,
            use_dilation: true,
            contour_mode: ContourMode::List,
            min_area_fraction: 0.02,
            candidate_selection: CandidateSelection::FirstQualifying,
            min_vertices: 3,
            always_hull: true,
            hull_reduction: HullReduction::NearestImageCorner,
            pad_with_image_corners: true,
            ordering: CornerOrdering::Angular,
        }
    }

    /// Profile for everything else.
    pub fn standard() -> Self {
        Self {
            blur_kernel: 5,
            canny_low: 50.0,
            canny_high: 150.0,
            morph_kernel: 7,
            use_dilation: false,
            contour_mode: ContourMode::External,
            min_area_fraction: 0.05,
            candidate_selection: CandidateSelection::LargestOnly,
            min_vertices: 4,
            always_hull: false,
            hull_reduction: HullReduction::FarthestFromCentroid,
            pad_with_image_corners: false,
            ordering: CornerOrdering::DiagonalSum,
        }
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.blur_kernel == 0 || self.blur_kernel % 2 == 0 {
            return Err(FrameitError::InvalidConfig(format!(
                "blur_kernel must be odd, got {}",
                self.blur_kernel
            )));
        }
        if self.morph_kernel == 0 || self.morph_kernel % 2 == 0 {
            return Err(FrameitError::InvalidConfig(format!(
                "morph_kernel must be odd, got {}",
                self.morph_kernel
            )));
        }
        if self.morph_kernel > 511 {
            return Err(FrameitError::InvalidConfig(format!(
                "morph_kernel too large: {}",
                self.morph_kernel
            )));
        }
        if !(self.canny_low >= 0.0 && self.canny_low <= self.canny_high) {
            return Err(FrameitError::InvalidConfig(format!(
                "canny thresholds must satisfy 0 <= low <= high, got ({}, {})",
                self.canny_low, self.canny_high
            )));
        }
        if !(self.min_area_fraction > 0.0 && self.min_area_fraction < 1.0) {
            return Err(FrameitError::InvalidConfig(format!(
                "min_area_fraction must be in (0, 1), got {}",
                self.min_area_fraction
            )));
        }
        if !(3..=6).contains(&self.min_vertices) {
            return Err(FrameitError::InvalidConfig(format!(
                "min_vertices must be in 3..=6, got {}",
                self.min_vertices
            )));
        }
        Ok(())
    }
}

/// Persistent scanner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Images with width or height strictly above this use the high-resolution
    /// profile.
    pub high_res_threshold: u32,
    /// Inset of the fallback rectangle, as a fraction of each dimension.
    pub margin_fraction: f64,
    /// Canvas the fallback rectangle is computed on when the image itself is
    /// unusable.
    pub fallback_canvas: (u32, u32),
    /// JPEG quality (1-100) of encoded crops.
    pub jpeg_quality: u8,
    pub high_res: DetectionParams,
    pub standard: DetectionParams,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            high_res_threshold: 2000,
            margin_fraction: 0.1,
            fallback_canvas: (1000, 1000),
            jpeg_quality: 95,
            high_res: DetectionParams::high_resolution(),
            standard: DetectionParams::standard(),
        }
    }
}

impl ScannerConfig {
    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json_pretty()?)?;
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.margin_fraction >= 0.0 && self.margin_fraction < 0.5) {
            return Err(FrameitError::InvalidConfig(format!(
                "margin_fraction must be in [0, 0.5), got {}",
                self.margin_fraction
            )));
        }
        if self.fallback_canvas.0 == 0 || self.fallback_canvas.1 == 0 {
            return Err(FrameitError::InvalidConfig("fallback_canvas must be non-empty".into()));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(FrameitError::InvalidConfig(format!(
                "jpeg_quality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }
        self.high_res.validate()?;
        self.standard.validate()
    }

    /// Which profile applies to an image of the given size.
    pub fn profile_for(&self, width: u32, height: u32) -> Profile {
        if width > self.high_res_threshold || height > self.high_res_threshold {
            Profile::HighResolution
        } else {
            Profile::Standard
        }
    }

    pub fn params(&self, profile: Profile) -> &DetectionParams {
        match profile {
            Profile::HighResolution => &self.high_res,
            Profile::Standard => &self.standard,
        }
    }

    /// Pick the detection profile for an image of the given size.
    pub fn params_for(&self, width: u32, height: u32) -> (Profile, &DetectionParams) {
        let profile = self.profile_for(width, height);
        (profile, self.params(profile))
    }
}
