// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The two operations the host application calls, as a trait so the channel
// can be driven by the real scanner or a test double.

use std::path::Path;

use frameit_core::ImagePoint;

use crate::error::BridgeError;

pub trait DocumentScanner: Send + Sync {
    /// Human-readable backend name for logs (e.g. "native").
    fn backend_name(&self) -> &str;

    /// Find the four document corners in the photo at `path`, as
    /// `[top-left, top-right, bottom-right, bottom-left]`.
    ///
    /// Only a missing file is an error; anything else yields the default
    /// rectangle.
    fn detect_document_corners(&self, path: &Path) -> Result<[ImagePoint; 4], BridgeError>;

    /// Rectify the region outlined by `points` and return it JPEG-encoded.
    /// `None` on any failure.
    fn crop_image(&self, path: &Path, points: &[ImagePoint]) -> Option<Vec<u8>>;
}
