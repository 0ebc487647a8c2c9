//! Shared types for fieldmap geometry.

use serde::{Deserialize, Serialize};

/// A 2D point in map pixel coordinates.
///
/// Serialized as a two-element array `[x, y]`, the shape used by
/// `Mapdata.json` for both pins and boundary vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns the point unchanged if both coordinates are finite.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFiniteCoordinate`] for NaN or infinite
    /// coordinates.
    pub fn ensure_finite(self) -> Result<Self, GeometryError> {
        if self.is_finite() {
            Ok(self)
        } else {
            Err(GeometryError::NonFiniteCoordinate {
                x: self.x,
                y: self.y,
            })
        }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Ordered vertex sequence of a field polygon.
///
/// The closing edge from the last vertex back to the first is implicit.
/// Every vertex is guaranteed finite; boundaries with fewer than three
/// vertices are accepted and treated as degenerate by the geometry
/// functions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Boundary(Vec<Point>);

impl Boundary {
    /// Minimum vertex count for a non-degenerate polygon.
    pub const MIN_VERTICES: usize = 3;

    /// Create a boundary from an ordered list of vertices.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFiniteCoordinate`] for the first vertex
    /// with a NaN or infinite coordinate.
    pub fn new(points: Vec<Point>) -> Result<Self, GeometryError> {
        for p in &points {
            p.ensure_finite()?;
        }
        Ok(Self(points))
    }

    /// Returns the number of vertices.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the boundary has no vertices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if the boundary has fewer than
    /// [`MIN_VERTICES`](Self::MIN_VERTICES) vertices.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.0.len() < Self::MIN_VERTICES
    }

    /// Returns a slice of all vertices.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }
}

impl TryFrom<Vec<Point>> for Boundary {
    type Error = GeometryError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Boundary> for Vec<Point> {
    fn from(boundary: Boundary) -> Self {
        boundary.0
    }
}

/// Map image dimensions in pixels. Both sides are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MapExtentProxy")]
pub struct MapExtent {
    width: u32,
    height: u32,
}

/// Unvalidated wire form of [`MapExtent`].
#[derive(Deserialize)]
struct MapExtentProxy {
    width: u32,
    height: u32,
}

impl TryFrom<MapExtentProxy> for MapExtent {
    type Error = GeometryError;

    fn try_from(proxy: MapExtentProxy) -> Result<Self, Self::Error> {
        Self::new(proxy.width, proxy.height)
    }
}

impl MapExtent {
    /// Create a map extent.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidExtent`] if either side is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::InvalidExtent { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(self) -> u32 {
        self.height
    }

    /// The longer side, as a float.
    #[must_use]
    pub fn max_side(self) -> f64 {
        f64::from(self.width.max(self.height))
    }
}

/// Square, image-bounded crop window in integer pixel coordinates.
///
/// `right` and `bottom` are exclusive, so the box covers
/// `right - left` columns and `bottom - top` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropBox {
    /// Left edge (inclusive).
    pub left: u32,
    /// Top edge (inclusive).
    pub top: u32,
    /// Right edge (exclusive).
    pub right: u32,
    /// Bottom edge (exclusive).
    pub bottom: u32,
}

impl CropBox {
    /// Width of the box in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// Height of the box in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Returns `true` if the box has non-zero area, equal sides, and lies
    /// within `extent`.
    #[must_use]
    pub const fn is_valid_for(&self, extent: MapExtent) -> bool {
        self.right > self.left
            && self.bottom > self.top
            && self.width() == self.height()
            && self.right <= extent.width
            && self.bottom <= extent.height
    }
}

/// Name given to fields that arrive without one.
pub const UNNAMED_FIELD: &str = "Unnamed Field";

fn default_field_name() -> String {
    UNNAMED_FIELD.to_string()
}

/// A named polygonal region on the map.
///
/// `anchor` and `radius` are cached values derived from the boundary by
/// [`FieldRegistry`](crate::FieldRegistry); `color` is opaque to the
/// geometry and only carried through for overlay rendering.
///
/// Serde field names follow the `Mapdata.json` record layout
/// (`fieldname`, `pinpoint`, `points`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Display name.
    #[serde(rename = "fieldname", default = "default_field_name")]
    pub name: String,

    /// Overlay color as a `#RRGGBB` string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Pin location; `None` until placed or computed.
    #[serde(rename = "pinpoint", default)]
    pub anchor: Option<Point>,

    /// Polygon vertices in insertion order.
    #[serde(rename = "points", default)]
    pub boundary: Boundary,

    /// Minimap radius in pixels; `None` until computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl Field {
    /// Create a field with no color, anchor or radius.
    #[must_use]
    pub fn new(name: impl Into<String>, boundary: Boundary) -> Self {
        Self {
            name: name.into(),
            color: None,
            anchor: None,
            boundary,
            radius: None,
        }
    }

    /// Set the overlay color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the pin location.
    #[must_use]
    pub const fn with_anchor(mut self, anchor: Point) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

/// The persisted map document: optional map size plus all fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    /// Dimensions of the map image the fields were drawn on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_size: Option<MapExtent>,

    /// All annotated fields, in display order.
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// Tunable sampling resolution for the center and radius searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Steps per axis of the center-finding grid search. The grid has
    /// `(grid_steps + 1)^2` samples.
    pub grid_steps: u32,

    /// Number of evenly spaced rays cast when estimating the radius.
    pub ray_count: u32,
}

impl GeometryConfig {
    /// Default grid resolution (21 x 21 samples).
    pub const DEFAULT_GRID_STEPS: u32 = 20;

    /// Default number of rays.
    pub const DEFAULT_RAY_COUNT: u32 = 20;

    /// Check that both sampling counts are non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.grid_steps == 0 {
            return Err(GeometryError::InvalidConfig(
                "grid_steps must be at least 1".to_string(),
            ));
        }
        if self.ray_count == 0 {
            return Err(GeometryError::InvalidConfig(
                "ray_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            grid_steps: Self::DEFAULT_GRID_STEPS,
            ray_count: Self::DEFAULT_RAY_COUNT,
        }
    }
}

/// Precondition violations rejected by the geometry core.
///
/// Degenerate shapes are never errors; they resolve through fallbacks.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// A coordinate was NaN or infinite.
    #[error("non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate {
        /// Offending x value.
        x: f64,
        /// Offending y value.
        y: f64,
    },

    /// A crop radius was not a finite positive number.
    #[error("invalid radius {0}: must be finite and positive")]
    InvalidRadius(f64),

    /// A map dimension was zero.
    #[error("invalid map extent {width}x{height}: dimensions must be positive")]
    InvalidExtent {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Sampling configuration is invalid.
    #[error("invalid geometry configuration: {0}")]
    InvalidConfig(String),

    /// A registry lookup used an index past the end.
    #[error("field index {index} out of range ({len} fields)")]
    FieldIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of fields in the registry.
        len: usize,
    },

    /// Neither the map data nor the caller supplied a map size.
    #[error("map size unknown: data has no map_size and no fallback was given")]
    MissingExtent,
}
