//! fieldmap-geometry: Polygon geometry for annotated map fields (sans-IO).
//!
//! Given a field's boundary polygon on a map image, derives:
//! anchor (an interior pin point) -> radius (how far a minimap must
//! reach) -> crop window (a square, image-bounded box).
//!
//! This crate has **no I/O dependencies**. It works on in-memory
//! coordinates and serde-ready records; reading `Mapdata.json`, decoding
//! map images and writing minimaps live in the `fieldmap` and
//! `fieldmap-minimap` crates.

pub mod center;
pub mod crop;
pub mod polygon;
pub mod radius;
pub mod registry;
pub mod types;

pub use center::find_center;
pub use crop::crop_bounds;
pub use polygon::{contains, distance_to_polygon};
pub use radius::{default_radius, estimate_radius};
pub use registry::{FIELD_PALETTE, FieldRegistry, MinimapJob};
pub use types::{
    Boundary, CropBox, Field, GeometryConfig, GeometryError, MapData, MapExtent, Point,
    UNNAMED_FIELD,
};

/// Anchor, radius and crop window for one boundary, computed in one go.
///
/// Returns `None` for degenerate boundaries, which have no anchor.
///
/// # Errors
///
/// Propagates [`GeometryError`] from the radius and crop steps. With a
/// validated [`Boundary`] these cannot fire in practice.
pub fn locate(
    boundary: &Boundary,
    extent: MapExtent,
    config: &GeometryConfig,
) -> Result<Option<(Point, f64, CropBox)>, GeometryError> {
    let Some(anchor) = find_center(boundary, config.grid_steps) else {
        return Ok(None);
    };
    let radius = estimate_radius(Some(anchor), boundary, extent, config.ray_count)?;
    let crop = crop_bounds(anchor, radius, extent)?;
    Ok(Some((anchor, radius, crop)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn locate_square_end_to_end() {
        let boundary = Boundary::new(vec![
            Point::new(40.0, 40.0),
            Point::new(60.0, 40.0),
            Point::new(60.0, 60.0),
            Point::new(40.0, 60.0),
        ])
        .unwrap();
        let extent = MapExtent::new(100, 100).unwrap();
        let (anchor, radius, crop) = locate(&boundary, extent, &GeometryConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(anchor, Point::new(50.0, 50.0));
        assert!(radius > 11.0 && radius < 200.0_f64.sqrt() * 1.1);
        assert!(crop.is_valid_for(extent));
        // The whole field fits in the crop.
        assert!(crop.left <= 40 && crop.top <= 40);
        assert!(crop.right >= 60 && crop.bottom >= 60);
    }

    #[test]
    fn locate_degenerate_is_none() {
        let boundary = Boundary::new(vec![Point::new(1.0, 1.0)]).unwrap();
        let extent = MapExtent::new(10, 10).unwrap();
        assert_eq!(
            locate(&boundary, extent, &GeometryConfig::default()),
            Ok(None)
        );
    }
}
