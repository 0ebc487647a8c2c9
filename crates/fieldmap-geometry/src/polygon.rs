//! Polygon primitives: point membership and point-to-edge distance.
//!
//! Both functions accept a plain vertex slice with an implicit closing
//! edge from the last vertex back to the first. Passing an explicitly
//! closed ring (first vertex repeated at the end) gives the same answers,
//! since the extra zero-length edge never counts as a crossing and its
//! distance equals the distance to the shared vertex.

use crate::types::Point;

/// Iterate the polygon's edges as `(p1, p2)` pairs, including the
/// closing edge from the last vertex back to the first.
pub(crate) fn edges(boundary: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    boundary
        .iter()
        .copied()
        .zip(boundary.iter().copied().cycle().skip(1))
}

/// Ray-casting point-in-polygon test.
///
/// Casts a horizontal ray to the right of `point` and toggles membership
/// on each edge crossing. An edge `(p1, p2)` is a candidate when
/// `point.y` lies in `(min(p1.y, p2.y), max(p1.y, p2.y)]` and `point.x`
/// is at most `max(p1.x, p2.x)`; it toggles when the edge is vertical or
/// `point.x` is at or left of the edge's x-intercept at `point.y`.
///
/// The half-open y interval makes vertices count once. Points lying
/// exactly on an edge may resolve either way depending on the edge's
/// direction; this matches the widely used approximate formulation and is
/// kept as is.
#[must_use]
#[allow(clippy::float_cmp)] // exact vertical-edge test is part of the rule
pub fn contains(point: Point, boundary: &[Point]) -> bool {
    let mut inside = false;

    for (p1, p2) in edges(boundary) {
        if point.y > p1.y.min(p2.y) && point.y <= p1.y.max(p2.y) && point.x <= p1.x.max(p2.x) {
            // The y-interval test above is empty for horizontal edges, so
            // p1.y != p2.y here and the intercept is well defined.
            if p1.x == p2.x || point.x <= x_intercept(p1, p2, point.y) {
                inside = !inside;
            }
        }
    }

    inside
}

/// X coordinate where the (non-horizontal) line through `p1` and `p2`
/// crosses height `y`.
fn x_intercept(p1: Point, p2: Point, y: f64) -> f64 {
    (y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x
}

/// Minimum distance from `point` to any edge of the polygon.
///
/// Returns [`f64::INFINITY`] for an empty boundary. A single-vertex
/// boundary degenerates to the distance to that vertex.
#[must_use]
pub fn distance_to_polygon(point: Point, boundary: &[Point]) -> f64 {
    edges(boundary)
        .map(|(a, b)| distance_to_segment(point, a, b))
        .fold(f64::INFINITY, f64::min)
}

/// Distance from `p` to the closed segment `a`-`b`.
///
/// Projects `p` onto the segment's supporting line, clamps to the
/// segment, and measures to the clamped point. When `a` and `b`
/// coincide, returns the distance from `p` to `a`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx.mul_add(dx, dy * dy);

    if length_sq == 0.0 {
        return p.distance(a);
    }

    let t = (p.x - a.x).mul_add(dx, (p.y - a.y) * dy) / length_sq;
    let closest = if t < 0.0 {
        a
    } else if t > 1.0 {
        b
    } else {
        Point::new(t.mul_add(dx, a.x), t.mul_add(dy, a.y))
    };

    p.distance(closest)
}

/// Arithmetic mean of the vertices, or `None` for an empty boundary.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn vertex_centroid(boundary: &[Point]) -> Option<Point> {
    if boundary.is_empty() {
        return None;
    }
    let n = boundary.len() as f64;
    let (sum_x, sum_y) = boundary
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sum_x / n, sum_y / n))
}

/// Axis-aligned bounding box as `(min, max)` corners, or `None` for an
/// empty boundary.
#[must_use]
pub fn bounding_box(boundary: &[Point]) -> Option<(Point, Point)> {
    let first = *boundary.first()?;
    Some(boundary.iter().skip(1).fold((first, first), |(lo, hi), p| {
        (
            Point::new(lo.x.min(p.x), lo.y.min(p.y)),
            Point::new(hi.x.max(p.x), hi.y.max(p.y)),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    /// A "U" opening upward: outer 0..30 x 0..30, notch 10..20 x 10..30.
    fn u_shape() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(30.0, 30.0),
            Point::new(20.0, 30.0),
            Point::new(20.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 30.0),
            Point::new(0.0, 30.0),
        ]
    }

    fn closed(mut ring: Vec<Point>) -> Vec<Point> {
        if let Some(&first) = ring.first() {
            ring.push(first);
        }
        ring
    }

    // --- edges ---

    #[test]
    fn edges_wrap_around() {
        let pts = square();
        let all: Vec<_> = edges(&pts).collect();
        assert_eq!(all.len(), 4);
        assert_eq!(all[3], (Point::new(0.0, 10.0), Point::new(0.0, 0.0)));
    }

    #[test]
    fn edges_of_empty_boundary() {
        assert_eq!(edges(&[]).count(), 0);
    }

    // --- contains ---

    #[test]
    fn square_contains_interior_point() {
        assert!(contains(Point::new(5.0, 5.0), &square()));
        assert!(contains(Point::new(0.5, 9.5), &square()));
    }

    #[test]
    fn square_excludes_exterior_points() {
        for p in [
            Point::new(-1.0, 5.0),
            Point::new(11.0, 5.0),
            Point::new(5.0, -1.0),
            Point::new(5.0, 11.0),
        ] {
            assert!(!contains(p, &square()), "{p:?} should be outside");
        }
    }

    #[test]
    fn empty_and_tiny_boundaries_contain_nothing() {
        assert!(!contains(Point::new(0.0, 0.0), &[]));
        assert!(!contains(Point::new(0.0, 0.0), &[Point::new(0.0, 0.0)]));
        let segment = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        assert!(!contains(Point::new(5.0, 5.0), &segment));
    }

    #[test]
    fn u_shape_notch_is_outside() {
        let u = u_shape();
        assert!(!contains(Point::new(15.0, 20.0), &u));
        assert!(contains(Point::new(5.0, 20.0), &u));
        assert!(contains(Point::new(25.0, 20.0), &u));
        assert!(contains(Point::new(15.0, 5.0), &u));
    }

    #[test]
    fn closing_vertex_does_not_change_membership() {
        for ring in [square(), u_shape()] {
            let explicit = closed(ring.clone());
            for i in -5..=35 {
                for j in -5..=35 {
                    let p = Point::new(f64::from(i) + 0.25, f64::from(j) + 0.5);
                    assert_eq!(contains(p, &ring), contains(p, &explicit), "{p:?}");
                }
            }
        }
    }

    #[test]
    fn vertex_at_ray_height_counts_once() {
        // Diamond with vertices level with the test point on both sides.
        let diamond = [
            Point::new(5.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(5.0, 10.0),
            Point::new(0.0, 5.0),
        ];
        assert!(contains(Point::new(5.0, 5.0), &diamond));
        assert!(!contains(Point::new(-2.0, 5.0), &diamond));
    }

    #[test]
    fn edge_points_resolve_by_crossing_rule() {
        // Points on the x = 0 and y = 0 edges fall outside; points on the
        // x = 10 and y = 10 edges fall inside.
        assert!(!contains(Point::new(0.0, 5.0), &square()));
        assert!(contains(Point::new(10.0, 5.0), &square()));
        assert!(!contains(Point::new(5.0, 0.0), &square()));
        assert!(contains(Point::new(5.0, 10.0), &square()));
    }

    #[test]
    fn contains_agrees_with_geo_away_from_edges() {
        use geo::{Contains, LineString, Polygon};

        let u = u_shape();
        let ring: LineString<f64> = u.iter().map(|p| (p.x, p.y)).collect();
        let poly = Polygon::new(ring, vec![]);

        for i in 0..62 {
            for j in 0..62 {
                // Offset by a quarter pixel so no sample lies on an edge.
                let p = Point::new(f64::from(i).mul_add(0.5, -0.25), f64::from(j).mul_add(0.5, -0.25));
                let expected = poly.contains(&geo::Point::new(p.x, p.y));
                assert_eq!(contains(p, &u), expected, "{p:?}");
            }
        }
    }

    // --- distance ---

    #[test]
    fn distance_from_center_of_square() {
        let d = distance_to_polygon(Point::new(5.0, 5.0), &square());
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn distance_clamps_to_nearest_vertex() {
        // Beyond the corner: nearest feature is the vertex (10, 10).
        let d = distance_to_polygon(Point::new(13.0, 14.0), &square());
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn distance_uses_closing_edge() {
        // Only the implicit closing edge (0,10)->(0,0) is near this point.
        let d = distance_to_polygon(Point::new(-2.0, 5.0), &square());
        assert!((d - 2.0).abs() < 1e-12);
    }

    #[test]
    fn distance_degenerate_edge_falls_back_to_point() {
        let p = Point::new(3.0, 4.0);
        let a = Point::new(0.0, 0.0);
        assert!((distance_to_segment(p, a, a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn distance_to_empty_boundary_is_infinite() {
        assert!(distance_to_polygon(Point::new(0.0, 0.0), &[]).is_infinite());
    }

    #[test]
    fn distance_agrees_with_geo() {
        use geo::line_measures::Distance;
        use geo::{Euclidean, Line};

        let u = u_shape();
        let probes = [
            Point::new(15.0, 20.0),
            Point::new(5.0, 5.0),
            Point::new(-3.0, 12.0),
            Point::new(40.0, 40.0),
            Point::new(17.5, 9.0),
        ];
        for p in probes {
            let expected = edges(&u)
                .map(|(a, b)| {
                    let line = Line::new((a.x, a.y), (b.x, b.y));
                    Euclidean.distance(&geo::Point::new(p.x, p.y), &line)
                })
                .fold(f64::INFINITY, f64::min);
            let actual = distance_to_polygon(p, &u);
            assert!((actual - expected).abs() < 1e-9, "{p:?}: {actual} vs {expected}");
        }
    }

    // --- centroid / bounding box ---

    #[test]
    fn vertex_centroid_of_square() {
        assert_eq!(vertex_centroid(&square()), Some(Point::new(5.0, 5.0)));
        assert_eq!(vertex_centroid(&[]), None);
    }

    #[test]
    fn bounding_box_of_u_shape() {
        assert_eq!(
            bounding_box(&u_shape()),
            Some((Point::new(0.0, 0.0), Point::new(30.0, 30.0)))
        );
        assert_eq!(bounding_box(&[]), None);
    }
}
