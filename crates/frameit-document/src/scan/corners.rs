// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reduce a near-quadrilateral polygon to four points and assign them to the
// top-left/top-right/bottom-right/bottom-left slots.

use frameit_core::{Corners, CornerOrdering, DetectionParams, HullReduction, Point};
use imageproc::geometry::convex_hull;
use imageproc::point::Point as PixelPoint;
use tracing::debug;

use super::contour::to_points;
use super::geometry::{bounds_corners, centroid, nearest_to, sort_by_polar_angle};

/// Cut an approximated polygon down to four points.
///
/// Returns `None` when the profile cannot make four points out of it (a hull
/// of fewer than four vertices without image-corner padding).
pub fn reduce_to_four(
    approx: &[PixelPoint<i32>],
    params: &DetectionParams,
    width: u32,
    height: u32,
) -> Option<Vec<Point>> {
    if approx.len() == 4 && !params.always_hull {
        return Some(to_points(approx));
    }

    let hull = to_points(&convex_hull(approx));
    match hull.len() {
        4 => Some(hull),
        n if n > 4 => {
            debug!(from = n, "Reducing hull to 4 points");
            Some(match params.hull_reduction {
                HullReduction::NearestImageCorner => nearest_image_corners(&hull, width, height)?.to_vec(),
                HullReduction::FarthestFromCentroid => farthest_from_centroid(&hull)?,
            })
        }
        n if params.pad_with_image_corners => {
            debug!(from = n, "Padding hull with image corners");
            Some(
                hull.into_iter()
                    .chain(bounds_corners(width, height))
                    .take(4)
                    .collect(),
            )
        }
        // Too few hull points and no padding: reject rather than repeat a corner.
        _ => None,
    }
}

/// Assign four points to `[tl, tr, br, bl]` using the given strategy.
///
/// `Angular` needs exactly four points. The other strategies pick one point
/// per slot from any non-empty set, so a point may fill more than one slot.
pub fn order_corners(
    points: &[Point],
    ordering: CornerOrdering,
    width: u32,
    height: u32,
) -> Option<Corners> {
    match ordering {
        CornerOrdering::Angular => order_by_angle(points),
        CornerOrdering::DiagonalSum => order_by_diagonals(points),
        CornerOrdering::NearestImageCorner => {
            nearest_image_corners(points, width, height).map(Corners)
        }
    }
}

/// Sort by polar angle around the centroid and read the result as tl/tr/br/bl.
///
/// The first slot is whichever point has the smallest `atan2` angle, which
/// is only the top-left for quadrilaterals rotated less than 45 degrees.
fn order_by_angle(points: &[Point]) -> Option<Corners> {
    let mut sorted: [Point; 4] = points.try_into().ok()?;
    let center = centroid(&sorted)?;
    sort_by_polar_angle(&mut sorted, center);
    Some(Corners(sorted))
}

/// tl = min(x+y), br = max(x+y), tr = min(y-x), bl = min(x-y), all relative
/// to the centroid.
fn order_by_diagonals(points: &[Point]) -> Option<Corners> {
    let c = centroid(points)?;
    let sum = |p: &Point| (p.x - c.x) + (p.y - c.y);
    let y_minus_x = |p: &Point| (p.y - c.y) - (p.x - c.x);
    let x_minus_y = |p: &Point| (p.x - c.x) - (p.y - c.y);

    let top_left = min_by_key_f64(points, sum)?;
    let bottom_right = min_by_key_f64(points, |p| -sum(p))?;
    let top_right = min_by_key_f64(points, y_minus_x)?;
    let bottom_left = min_by_key_f64(points, x_minus_y)?;
    Some(Corners::new(top_left, top_right, bottom_right, bottom_left))
}

/// For each image corner in tl/tr/br/bl order, the nearest point.
fn nearest_image_corners(points: &[Point], width: u32, height: u32) -> Option<[Point; 4]> {
    let [tl, tr, br, bl] = bounds_corners(width, height);
    Some([
        nearest_to(points, tl)?,
        nearest_to(points, tr)?,
        nearest_to(points, br)?,
        nearest_to(points, bl)?,
    ])
}

/// The four points farthest from the centroid (squared distance), farthest
/// first. Ties keep their input order.
fn farthest_from_centroid(points: &[Point]) -> Option<Vec<Point>> {
    let c = centroid(points)?;
    let mut ranked = points.to_vec();
    ranked.sort_by(|a, b| b.distance_squared(&c).total_cmp(&a.distance_squared(&c)));
    ranked.truncate(4);
    Some(ranked)
}

fn min_by_key_f64(points: &[Point], key: impl Fn(&Point) -> f64) -> Option<Point> {
    points
        .iter()
        .copied()
        .min_by(|a, b| key(a).total_cmp(&key(b)))
}
