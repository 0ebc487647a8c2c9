//! Center finding: pick an interior anchor point for a field polygon.
//!
//! The vertex centroid is used whenever it falls inside the polygon,
//! which covers every convex shape and most concave ones. Otherwise a
//! fixed-resolution grid over the bounding box is searched for the
//! interior sample farthest from any edge.

use crate::polygon::{bounding_box, contains, distance_to_polygon, vertex_centroid};
use crate::types::{Boundary, Point};

/// Find an anchor point for `boundary`.
///
/// Returns `None` for degenerate boundaries (fewer than three vertices);
/// callers skip those fields rather than anchoring them.
///
/// # Algorithm
///
/// 1. Compute the vertex centroid. If [`contains`] accepts it, return it.
/// 2. Sample a `(grid_steps + 1) x (grid_steps + 1)` grid spanning the
///    bounding box (x index outer, y index inner). Score each interior
///    sample by its distance to the nearest edge and keep the first
///    strictly best one.
/// 3. If no sample is interior (very thin shapes), fall back to the
///    centroid even though it lies outside the polygon.
///
/// `grid_steps` of zero is treated as one.
#[must_use]
pub fn find_center(boundary: &Boundary, grid_steps: u32) -> Option<Point> {
    if boundary.is_degenerate() {
        return None;
    }
    let points = boundary.points();
    let centroid = vertex_centroid(points)?;

    if contains(centroid, points) {
        return Some(centroid);
    }

    Some(grid_search(points, grid_steps.max(1)).unwrap_or(centroid))
}

/// Best interior grid sample by edge distance, or `None` if no sample
/// is interior.
fn grid_search(points: &[Point], steps: u32) -> Option<Point> {
    let (min, max) = bounding_box(points)?;
    let divisor = f64::from(steps);
    let step_x = (max.x - min.x) / divisor;
    let step_y = (max.y - min.y) / divisor;

    let mut best: Option<Point> = None;
    let mut best_score = f64::NEG_INFINITY;

    for i in 0..=steps {
        for j in 0..=steps {
            let sample = Point::new(
                grid_coordinate(min.x, i, step_x),
                grid_coordinate(min.y, j, step_y),
            );
            if !contains(sample, points) {
                continue;
            }
            let score = distance_to_polygon(sample, points);
            if score > best_score {
                best_score = score;
                best = Some(sample);
            }
        }
    }

    best
}

/// Position of grid line `index`, rounded after the multiply and again
/// after the add. Samples on an edge must land on the same side of
/// [`contains`] as with unfused arithmetic.
#[allow(clippy::suboptimal_flops)]
fn grid_coordinate(min: f64, index: u32, step: f64) -> f64 {
    min + f64::from(index) * step
}
