// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plane geometry helpers shared by detection and rectification.

use frameit_core::Point;

/// Arithmetic mean of a point set. `None` for an empty set.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Area of a simple polygon using the shoelace formula. The vertices should
/// be in order (CW or CCW).
pub fn shoelace_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area.abs() / 2.0
}

/// Sort points by ascending polar angle around `center`.
///
/// Angles come from `atan2` in image coordinates (y down), so the sequence
/// starts near the upper-left and proceeds clockwise on screen.
pub fn sort_by_polar_angle(points: &mut [Point], center: Point) {
    points.sort_by(|a, b| {
        let angle_a = (a.y - center.y).atan2(a.x - center.x);
        let angle_b = (b.y - center.y).atan2(b.x - center.x);
        angle_a.total_cmp(&angle_b)
    });
}

/// Corners of the `width` x `height` image bounds:
/// `[(0,0), (w,0), (w,h), (0,h)]`.
pub fn bounds_corners(width: u32, height: u32) -> [Point; 4] {
    let (w, h) = (width as f64, height as f64);
    [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ]
}

/// The point of `points` nearest to `target`, first one on ties.
pub fn nearest_to(points: &[Point], target: Point) -> Option<Point> {
    points
        .iter()
        .copied()
        .min_by(|a, b| a.distance_squared(&target).total_cmp(&b.distance_squared(&target)))
}
