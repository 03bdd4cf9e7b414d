// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — document corner detection and perspective rectification.

pub mod corners;
pub mod detect;
pub mod geometry;
pub mod rectify;

mod contour;

pub use detect::{CornerDetector, Detection, default_corners};
pub use rectify::{PerspectiveRectifier, RectifyPlan};
