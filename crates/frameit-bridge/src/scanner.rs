// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process scanner backed by frameit-document.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use frameit_core::error::{FrameitError, Result};
use frameit_core::{Corners, ImagePoint, ScannerConfig};
use frameit_document::{CornerDetector, ImageProcessor, PerspectiveRectifier};
use tracing::{info, instrument, warn};

use crate::error::{BridgeError, ErrorCode};
use crate::traits::DocumentScanner;

/// Runs detection and cropping in the calling thread.
#[derive(Debug, Clone, Default)]
pub struct NativeScanner {
    detector: CornerDetector,
    rectifier: PerspectiveRectifier,
}

impl NativeScanner {
    pub fn new(config: ScannerConfig) -> Self {
        Self {
            detector: CornerDetector::new(config),
            rectifier: PerspectiveRectifier::new(),
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        self.detector.config()
    }

    /// Load, rectify and JPEG-encode, keeping the typed error.
    #[instrument(skip_all, fields(path = %path.display(), points = points.len()))]
    pub fn try_crop(&self, path: &Path, points: &[ImagePoint]) -> Result<Vec<u8>> {
        let corners = Corners::from_image_points(points)?;
        let photo = ImageProcessor::open(path)?;
        let crop = self.rectifier.rectify(photo.as_dynamic(), &corners)?;
        let jpeg = ImageProcessor::from_dynamic(crop).to_jpeg_bytes(self.config().jpeg_quality)?;
        info!(bytes = jpeg.len(), "Cropped image encoded");
        Ok(jpeg)
    }
}

impl DocumentScanner for NativeScanner {
    fn backend_name(&self) -> &str {
        "native"
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    fn detect_document_corners(&self, path: &Path) -> std::result::Result<[ImagePoint; 4], BridgeError> {
        if !path.exists() {
            warn!("Source photo does not exist");
            return Err(FrameitError::FileNotFound(path.to_path_buf()).into());
        }
        let corners = self.detector.detect_path(path);
        Ok(corners.to_image_points())
    }

    fn crop_image(&self, path: &Path, points: &[ImagePoint]) -> Option<Vec<u8>> {
        match self.try_crop(path, points) {
            Ok(jpeg) => Some(jpeg),
            Err(err) => {
                warn!(error = %err, "Crop failed");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Async wrappers
// ---------------------------------------------------------------------------

/// Run corner detection on tokio's blocking pool.
pub async fn detect_document_corners_async(
    scanner: Arc<dyn DocumentScanner>,
    path: PathBuf,
) -> std::result::Result<[ImagePoint; 4], BridgeError> {
    tokio::task::spawn_blocking(move || scanner.detect_document_corners(&path))
        .await
        .map_err(|err| BridgeError::new(ErrorCode::DetectionError, format!("detection task failed: {err}")))?
}

/// Run a crop on tokio's blocking pool. A failed task is reported as `None`.
pub async fn crop_image_async(
    scanner: Arc<dyn DocumentScanner>,
    path: PathBuf,
    points: Vec<ImagePoint>,
) -> Option<Vec<u8>> {
    match tokio::task::spawn_blocking(move || scanner.crop_image(&path, &points)).await {
        Ok(result) => result,
        Err(err) => {
            warn!(error = %err, "Crop task failed");
            None
        }
    }
}
