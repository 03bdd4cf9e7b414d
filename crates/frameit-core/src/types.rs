// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for document corner detection and rectification.

use serde::{Deserialize, Serialize};

use crate::error::{FrameitError, Result};

/// A real-valued image coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared Euclidean distance to `other`.
    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// An integer pixel coordinate, the shape exchanged with the host application
/// (`{"x": 12, "y": 34}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ImagePoint {
    pub x: i32,
    pub y: i32,
}

impl ImagePoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<ImagePoint> for Point {
    fn from(p: ImagePoint) -> Self {
        Point::new(p.x as f64, p.y as f64)
    }
}

impl From<Point> for ImagePoint {
    /// Truncates toward zero.
    fn from(p: Point) -> Self {
        ImagePoint::new(p.x as i32, p.y as i32)
    }
}

/// Four document corners in the order
/// `[top-left, top-right, bottom-right, bottom-left]`.
///
/// Only the count is guaranteed. Convexity and winding are best-effort, so
/// consumers must tolerate a non-strictly-convex quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corners(pub [Point; 4]);

impl Corners {
    pub const fn new(top_left: Point, top_right: Point, bottom_right: Point, bottom_left: Point) -> Self {
        Self([top_left, top_right, bottom_right, bottom_left])
    }

    /// Build corners from integer points, failing unless exactly four are given.
    pub fn from_image_points(points: &[ImagePoint]) -> Result<Self> {
        let array: [ImagePoint; 4] = points.try_into().map_err(|_| {
            FrameitError::InvalidArgument(format!("expected 4 corner points, got {}", points.len()))
        })?;
        Ok(Self(array.map(Point::from)))
    }

    pub fn top_left(&self) -> Point {
        self.0[0]
    }

    pub fn top_right(&self) -> Point {
        self.0[1]
    }

    pub fn bottom_right(&self) -> Point {
        self.0[2]
    }

    pub fn bottom_left(&self) -> Point {
        self.0[3]
    }

    pub fn as_array(&self) -> &[Point; 4] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.0.iter()
    }

    /// Integer coordinates, truncated toward zero.
    pub fn to_image_points(&self) -> [ImagePoint; 4] {
        self.0.map(ImagePoint::from)
    }
}

/// Landscape/portrait classification of a width × height pair.
///
/// Square counts as portrait (`width > height` is the landscape test).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn of(width: f64, height: f64) -> Self {
        if width > height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert!((a.distance_squared(&b) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn image_point_truncates() {
        let p = ImagePoint::from(Point::new(99.9, -0.7));
        assert_eq!(p, ImagePoint::new(99, 0));
    }

    #[test]
    fn corners_require_exactly_four_points() {
        let three = [ImagePoint::new(0, 0); 3];
        assert!(matches!(
            Corners::from_image_points(&three),
            Err(FrameitError::InvalidArgument(_))
        ));

        let four = [
            ImagePoint::new(1, 2),
            ImagePoint::new(3, 4),
            ImagePoint::new(5, 6),
            ImagePoint::new(7, 8),
        ];
        let corners = Corners::from_image_points(&four).unwrap();
        assert_eq!(corners.bottom_left(), Point::new(7.0, 8.0));
        assert_eq!(corners.to_image_points(), four);
    }

    #[test]
    fn corners_serialize_as_point_list() {
        let corners = Corners::new(
            Point::new(1.0, 2.0),
            Point::new(3.0, 4.0),
            Point::new(5.0, 6.0),
            Point::new(7.0, 8.0),
        );
        let json = serde_json::to_value(corners).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(4));
        assert_eq!(json[0]["x"], 1.0);
    }

    #[test]
    fn square_is_portrait() {
        assert_eq!(Orientation::of(100.0, 100.0), Orientation::Portrait);
        assert_eq!(Orientation::of(101.0, 100.0), Orientation::Landscape);
    }
}
