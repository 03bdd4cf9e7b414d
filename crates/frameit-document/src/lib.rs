// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// frameit-document — Document image processing for the Frameit scanner.
//
// Provides image loading and encoding, document corner detection on a
// captured photo, and perspective rectification of the enclosed page.

pub mod image;
pub mod scan;

// Re-export the primary structs so callers can use `frameit_document::CornerDetector` etc.
pub use crate::image::processor::ImageProcessor;
pub use crate::scan::detect::{CornerDetector, Detection, default_corners};
pub use crate::scan::rectify::{PerspectiveRectifier, RectifyPlan};
