// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Method channel — named calls with JSON arguments coming from the host
// application, dispatched to a `DocumentScanner`.
//
// Methods:
//   detectDocumentCorners { path }          -> [{x, y}; 4]
//   cropImage             { path, points }  -> bytes | null

use std::path::PathBuf;
use std::sync::Arc;

use frameit_core::ImagePoint;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{BridgeError, ErrorCode};
use crate::traits::DocumentScanner;

pub const DETECT_DOCUMENT_CORNERS: &str = "detectDocumentCorners";
pub const CROP_IMAGE: &str = "cropImage";

/// One call from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Reply to a `MethodCall`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "payload", rename_all = "snake_case")]
pub enum MethodResponse {
    Success(Value),
    Error { code: ErrorCode, message: String },
    NotImplemented,
}

impl From<BridgeError> for MethodResponse {
    fn from(err: BridgeError) -> Self {
        Self::Error {
            code: err.code,
            message: err.message,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DetectArgs {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CropArgs {
    path: PathBuf,
    points: Vec<ImagePoint>,
}

fn parse_args<T: DeserializeOwned>(method: &str, arguments: &Value) -> Result<T, BridgeError> {
    T::deserialize(arguments).map_err(|err| {
        BridgeError::new(
            ErrorCode::DetectionError,
            format!("invalid arguments for {method}: {err}"),
        )
    })
}

/// Routes host calls to a scanner.
#[derive(Clone)]
pub struct ScannerChannel {
    scanner: Arc<dyn DocumentScanner>,
}

impl ScannerChannel {
    pub fn new(scanner: Arc<dyn DocumentScanner>) -> Self {
        Self { scanner }
    }

    /// Handle one call in the calling thread.
    pub fn handle(&self, call: &MethodCall) -> MethodResponse {
        info!(
            method = %call.method,
            backend = self.scanner.backend_name(),
            "Method call received"
        );
        match call.method.as_str() {
            DETECT_DOCUMENT_CORNERS => self.detect(&call.arguments),
            CROP_IMAGE => self.crop(&call.arguments),
            other => {
                warn!(method = other, "Unknown method");
                MethodResponse::NotImplemented
            }
        }
    }

    /// Handle one call on tokio's blocking pool.
    pub async fn handle_async(&self, call: MethodCall) -> MethodResponse {
        let channel = self.clone();
        match tokio::task::spawn_blocking(move || channel.handle(&call)).await {
            Ok(response) => response,
            Err(err) => BridgeError::new(
                ErrorCode::DetectionError,
                format!("method task failed: {err}"),
            )
            .into(),
        }
    }

    fn detect(&self, arguments: &Value) -> MethodResponse {
        let args: DetectArgs = match parse_args(DETECT_DOCUMENT_CORNERS, arguments) {
            Ok(args) => args,
            Err(err) => return err.into(),
        };
        let points = match self.scanner.detect_document_corners(&args.path) {
            Ok(points) => points,
            Err(err) => return err.into(),
        };
        debug!(?points, "Returning corners");
        match serde_json::to_value(points) {
            Ok(value) => MethodResponse::Success(value),
            Err(err) => BridgeError::new(ErrorCode::DetectionError, err.to_string()).into(),
        }
    }

    fn crop(&self, arguments: &Value) -> MethodResponse {
        // Crop failures of any kind surface to the host as a null payload.
        let args: CropArgs = match parse_args(CROP_IMAGE, arguments) {
            Ok(args) => args,
            Err(err) => {
                warn!(error = %err.message, "Ignoring malformed cropImage arguments");
                return MethodResponse::Success(Value::Null);
            }
        };
        match self.scanner.crop_image(&args.path, &args.points) {
            Some(bytes) => MethodResponse::Success(Value::from(bytes)),
            None => MethodResponse::Success(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    /// Records nothing, answers fixed values.
    struct FixedScanner;

    impl DocumentScanner for FixedScanner {
        fn backend_name(&self) -> &str {
            "fixed"
        }

        fn detect_document_corners(&self, path: &Path) -> Result<[ImagePoint; 4], BridgeError> {
            if path.ends_with("missing.jpg") {
                return Err(BridgeError::new(ErrorCode::FileNotFound, "gone"));
            }
            Ok([
                ImagePoint::new(1, 2),
                ImagePoint::new(3, 4),
                ImagePoint::new(5, 6),
                ImagePoint::new(7, 8),
            ])
        }

        fn crop_image(&self, _path: &Path, points: &[ImagePoint]) -> Option<Vec<u8>> {
            (points.len() == 4).then(|| vec![0xFF, 0xD8, 0xFF])
        }
    }

    fn channel() -> ScannerChannel {
        ScannerChannel::new(Arc::new(FixedScanner))
    }

    #[test]
    fn detect_returns_points_as_objects() {
        let response = channel().handle(&MethodCall::new(
            DETECT_DOCUMENT_CORNERS,
            json!({ "path": "/photos/page.jpg" }),
        ));
        assert_eq!(
            response,
            MethodResponse::Success(json!([
                { "x": 1, "y": 2 },
                { "x": 3, "y": 4 },
                { "x": 5, "y": 6 },
                { "x": 7, "y": 8 }
            ]))
        );
    }

    #[test]
    fn detect_missing_file_keeps_its_code() {
        let response = channel().handle(&MethodCall::new(
            DETECT_DOCUMENT_CORNERS,
            json!({ "path": "/photos/missing.jpg" }),
        ));
        assert!(matches!(
            response,
            MethodResponse::Error { code: ErrorCode::FileNotFound, .. }
        ));
    }

    #[test]
    fn detect_without_path_is_detection_error() {
        let response = channel().handle(&MethodCall::new(DETECT_DOCUMENT_CORNERS, json!({})));
        match response {
            MethodResponse::Error { code, message } => {
                assert_eq!(code, ErrorCode::DetectionError);
                assert!(message.contains("path"), "{message}");
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn crop_returns_bytes() {
        let response = channel().handle(&MethodCall::new(
            CROP_IMAGE,
            json!({
                "path": "/photos/page.jpg",
                "points": [
                    { "x": 0, "y": 0 }, { "x": 10, "y": 0 },
                    { "x": 10, "y": 10 }, { "x": 0, "y": 10 }
                ]
            }),
        ));
        assert_eq!(response, MethodResponse::Success(json!([255, 216, 255])));
    }

    #[test]
    fn failed_crop_is_null_not_an_error() {
        let response = channel().handle(&MethodCall::new(
            CROP_IMAGE,
            json!({ "path": "/photos/page.jpg", "points": [{ "x": 0, "y": 0 }] }),
        ));
        assert_eq!(response, MethodResponse::Success(Value::Null));
    }

    #[test]
    fn crop_without_points_is_null() {
        let response = channel().handle(&MethodCall::new(
            CROP_IMAGE,
            json!({ "path": "/photos/page.jpg" }),
        ));
        assert_eq!(response, MethodResponse::Success(Value::Null));
    }

    #[test]
    fn crop_with_ill_typed_arguments_is_null() {
        for arguments in [
            json!({ "path": 5, "points": [] }),
            json!({ "path": "/photos/page.jpg", "points": "x" }),
            Value::Null,
        ] {
            let response = channel().handle(&MethodCall::new(CROP_IMAGE, arguments));
            assert_eq!(response, MethodResponse::Success(Value::Null));
        }
    }

    #[test]
    fn unknown_method_is_not_implemented() {
        let response = channel().handle(&MethodCall::new("enhanceImage", Value::Null));
        assert_eq!(response, MethodResponse::NotImplemented);
    }

    #[test]
    fn call_parses_from_host_json() {
        let call: MethodCall =
            serde_json::from_str(r#"{"method":"detectDocumentCorners","arguments":{"path":"/a.jpg"}}"#)
                .unwrap();
        assert_eq!(call.method, DETECT_DOCUMENT_CORNERS);

        let bare: MethodCall = serde_json::from_str(r#"{"method":"cropImage"}"#).unwrap();
        assert_eq!(bare.arguments, Value::Null);
    }

    #[test]
    fn error_response_serializes_with_code() {
        let response: MethodResponse =
            BridgeError::new(ErrorCode::FileNotFound, "gone").into();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "status": "error",
                "payload": { "code": "FILE_NOT_FOUND", "message": "gone" }
            })
        );
    }

    #[tokio::test]
    async fn async_handling_matches_sync() {
        let call = MethodCall::new(DETECT_DOCUMENT_CORNERS, json!({ "path": "/photos/page.jpg" }));
        let channel = channel();
        assert_eq!(channel.handle_async(call.clone()).await, channel.handle(&call));
    }
}
