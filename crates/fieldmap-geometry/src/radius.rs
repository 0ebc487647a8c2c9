//! Radius estimation: how far a minimap must reach from the anchor to
//! show the whole field.
//!
//! Rays are cast from the anchor at evenly spaced angles. Each ray stops
//! at the nearest boundary edge it meets; the longest of those stopping
//! distances (the *reach*) plus a 10% margin becomes the radius.
//!
//! This samples the outline rather than computing an exact bounding
//! circle, so a narrow spike falling between two rays can be
//! under-covered.

use std::f64::consts::TAU;

use crate::polygon::edges;
use crate::types::{Boundary, GeometryError, MapExtent, Point};

/// The default radius is the map's longer side divided by this.
pub const DEFAULT_RADIUS_DIVISOR: f64 = 20.0;

/// A reach shorter than the map's longer side divided by this is treated
/// as degenerate.
pub const MIN_REACH_DIVISOR: f64 = 100.0;

/// Margin applied to the reach so vertices are not flush with the crop.
pub const RADIUS_MARGIN: f64 = 1.1;

/// Ray/edge pairs with a denominator below this are parallel.
const PARALLEL_EPSILON: f64 = 1e-10;

/// Radius used when the field gives no usable measurement.
#[must_use]
pub fn default_radius(extent: MapExtent) -> f64 {
    extent.max_side() / DEFAULT_RADIUS_DIVISOR
}

/// Outcome of casting rays from an anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayCast {
    /// Longest nearest-hit distance over all rays that hit an edge.
    /// Zero when no ray hit.
    pub reach: f64,
    /// Number of rays that hit at least one edge.
    pub hits: u32,
}

/// Cast `ray_count` rays from `anchor` against the closed polygon.
///
/// Ray `i` points at angle `2 * pi * i / ray_count`. For each ray only
/// the nearest forward intersection (`t > 0`, edge parameter in `[0, 1]`)
/// counts. Edges parallel to a ray are skipped for that ray.
#[must_use]
pub fn cast_rays(anchor: Point, points: &[Point], ray_count: u32) -> RayCast {
    let mut reach: f64 = 0.0;
    let mut hits = 0;

    for i in 0..ray_count {
        let angle = f64::from(i) / f64::from(ray_count) * TAU;
        let (dy, dx) = angle.sin_cos();

        if let Some(nearest) = nearest_hit(anchor, dx, dy, points) {
            reach = reach.max(nearest);
            hits += 1;
        }
    }

    RayCast { reach, hits }
}

/// Distance along the ray `anchor + t * (dx, dy)` to the closest edge it
/// crosses, or `None` if it crosses none.
fn nearest_hit(anchor: Point, dx: f64, dy: f64, points: &[Point]) -> Option<f64> {
    let direction_len = dx.hypot(dy);
    let mut nearest: Option<f64> = None;

    for (p1, p2) in edges(points) {
        let edge_dx = p2.x - p1.x;
        let edge_dy = p2.y - p1.y;

        // Solve anchor + t * d = p1 + s * e for (t, s).
        let denominator = dx * edge_dy - dy * edge_dx;
        if denominator.abs() < PARALLEL_EPSILON {
            continue;
        }

        let ox = p1.x - anchor.x;
        let oy = p1.y - anchor.y;
        let t = (ox * edge_dy - oy * edge_dx) / denominator;
        let s = (ox * dy - oy * dx) / denominator;

        if t > 0.0 && (0.0..=1.0).contains(&s) {
            let distance = t * direction_len;
            nearest = Some(nearest.map_or(distance, |n| n.min(distance)));
        }
    }

    nearest
}

/// Estimate the minimap radius for a field.
///
/// Returns [`default_radius`] when the boundary is degenerate, the anchor
/// is absent, no ray hits an edge, or the reach is shorter than
/// `max(width, height) / 100`. Otherwise returns `reach * 1.1`.
///
/// `ray_count` of zero is treated as one.
///
/// # Errors
///
/// Returns [`GeometryError::NonFiniteCoordinate`] if `anchor` is present
/// but not finite.
pub fn estimate_radius(
    anchor: Option<Point>,
    boundary: &Boundary,
    extent: MapExtent,
    ray_count: u32,
) -> Result<f64, GeometryError> {
    let anchor = anchor.map(Point::ensure_finite).transpose()?;

    let Some(anchor) = anchor else {
        return Ok(default_radius(extent));
    };
    if boundary.is_degenerate() {
        return Ok(default_radius(extent));
    }

    let cast = cast_rays(anchor, boundary.points(), ray_count.max(1));
    let min_reach = extent.max_side() / MIN_REACH_DIVISOR;

    if cast.hits == 0 || cast.reach < min_reach {
        return Ok(default_radius(extent));
    }

    Ok(cast.reach * RADIUS_MARGIN)
}
