// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Drive the native scanner through the method channel the way the host does.

use std::sync::Arc;

use frameit_bridge::{ErrorCode, MethodCall, MethodResponse, NativeScanner, ScannerChannel};
use frameit_core::ImagePoint;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use serde_json::{Value, json};

fn channel() -> ScannerChannel {
    ScannerChannel::new(Arc::new(NativeScanner::default()))
}

fn write_page(dir: &tempfile::TempDir) -> String {
    let mut img = RgbImage::from_pixel(600, 800, Rgb([0, 0, 0]));
    draw_filled_rect_mut(&mut img, Rect::at(50, 50).of_size(500, 700), Rgb([255, 255, 255]));
    let path = dir.path().join("page.png");
    DynamicImage::ImageRgb8(img).save(&path).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn detect_then_crop_through_channel() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_page(&dir);
    let channel = channel();

    let MethodResponse::Success(points) = channel.handle(&MethodCall::new(
        "detectDocumentCorners",
        json!({ "path": path }),
    )) else {
        panic!("detection should succeed");
    };
    let points: Vec<ImagePoint> = serde_json::from_value(points).unwrap();
    assert_eq!(points.len(), 4);
    assert!((points[0].x - 50).abs() <= 5 && (points[0].y - 50).abs() <= 5);

    let response = channel.handle(&MethodCall::new(
        "cropImage",
        json!({ "path": path, "points": points }),
    ));
    let MethodResponse::Success(Value::Array(bytes)) = response else {
        panic!("crop should return bytes, got {response:?}");
    };
    assert_eq!(bytes[0], json!(0xFF));
    assert_eq!(bytes[1], json!(0xD8));
}

#[test]
fn detect_missing_file_reports_file_not_found() {
    let response = channel().handle(&MethodCall::new(
        "detectDocumentCorners",
        json!({ "path": "/nowhere/photo.jpg" }),
    ));
    assert!(matches!(
        response,
        MethodResponse::Error { code: ErrorCode::FileNotFound, .. }
    ));
}

#[test]
fn crop_of_missing_file_is_null() {
    let response = channel().handle(&MethodCall::new(
        "cropImage",
        json!({
            "path": "/nowhere/photo.jpg",
            "points": [
                { "x": 0, "y": 0 }, { "x": 10, "y": 0 },
                { "x": 10, "y": 10 }, { "x": 0, "y": 10 }
            ]
        }),
    ));
    assert_eq!(response, MethodResponse::Success(Value::Null));
}

#[test]
fn free_functions_use_default_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_page(&dir);

    let points = frameit_bridge::detect_document_corners(&path).unwrap();
    let jpeg = frameit_bridge::crop_image(&path, &points).unwrap();
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
}
