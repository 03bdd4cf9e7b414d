// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Frameit — Bridge between the host application and the scanner.
//
// The host sends named method calls with JSON arguments; `ScannerChannel`
// decodes them and forwards to a `DocumentScanner`. `NativeScanner` is the
// in-process implementation backed by frameit-document.

pub mod channel;
pub mod error;
pub mod scanner;
pub mod traits;

use std::path::Path;

use frameit_core::ImagePoint;

pub use channel::{MethodCall, MethodResponse, ScannerChannel};
pub use error::{BridgeError, ErrorCode};
pub use scanner::{NativeScanner, crop_image_async, detect_document_corners_async};
pub use traits::DocumentScanner;

/// Detect corners with the default configuration.
pub fn detect_document_corners(path: impl AsRef<Path>) -> Result<[ImagePoint; 4], BridgeError> {
    NativeScanner::default().detect_document_corners(path.as_ref())
}

/// Crop with the default configuration; JPEG bytes or `None`.
pub fn crop_image(path: impl AsRef<Path>, points: &[ImagePoint]) -> Option<Vec<u8>> {
    NativeScanner::default().crop_image(path.as_ref(), points)
}
