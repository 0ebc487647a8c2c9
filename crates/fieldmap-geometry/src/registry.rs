//! Field registry: owns the annotated fields and keeps each field's
//! cached anchor and radius in step with its boundary.
//!
//! The registry is the only stateful piece of the crate. Every
//! recomputation is a read-modify-write of one field, so the `&mut self`
//! receivers are all the synchronization a caller needs.

use tracing::{debug, info};

use crate::center::find_center;
use crate::crop::crop_bounds;
use crate::radius::{default_radius, estimate_radius};
use crate::types::{
    Boundary, CropBox, Field, GeometryConfig, GeometryError, MapData, MapExtent, Point,
};

/// Overlay colors handed out, in order, to fields that arrive without one.
pub const FIELD_PALETTE: &[&str] = &[
    "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF", "#FFA500", "#800080",
    "#FFC0CB", "#A52A2A", "#808080", "#000080",
];

/// A field ready for minimap extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapJob<'a> {
    /// Position of the field in the registry.
    pub index: usize,
    /// The field itself (name, color, boundary, anchor, radius).
    pub field: &'a Field,
    /// Crop window around the field's anchor.
    pub crop: CropBox,
}

/// Ordered collection of fields drawn on one map.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRegistry {
    extent: MapExtent,
    config: GeometryConfig,
    fields: Vec<Field>,
    next_color: usize,
}

impl FieldRegistry {
    /// Create an empty registry with the default sampling configuration.
    #[must_use]
    pub fn new(extent: MapExtent) -> Self {
        Self {
            extent,
            config: GeometryConfig::default(),
            fields: Vec::new(),
            next_color: 0,
        }
    }

    /// Create an empty registry with a custom sampling configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidConfig`] if `config` fails
    /// validation.
    pub fn with_config(extent: MapExtent, config: GeometryConfig) -> Result<Self, GeometryError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(extent)
        })
    }

    /// Build a registry from a loaded map document.
    ///
    /// The extent comes from `data.map_size` when present, otherwise from
    /// `fallback` (typically the map image's dimensions). Fields keep
    /// their stored anchors and radii; fields without a color receive
    /// palette colors.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MissingExtent`] if neither source gives a
    /// map size.
    pub fn from_map_data(data: MapData, fallback: Option<MapExtent>) -> Result<Self, GeometryError> {
        let extent = data
            .map_size
            .or(fallback)
            .ok_or(GeometryError::MissingExtent)?;
        let mut registry = Self::new(extent);
        for field in data.fields {
            registry.insert(field);
        }
        Ok(registry)
    }

    /// Replace the sampling configuration.
    ///
    /// Cached anchors and radii are not recomputed.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidConfig`] if `config` fails
    /// validation.
    pub fn set_config(&mut self, config: GeometryConfig) -> Result<(), GeometryError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Map dimensions every field is measured against.
    #[must_use]
    pub const fn extent(&self) -> MapExtent {
        self.extent
    }

    /// Sampling configuration in use.
    #[must_use]
    pub const fn config(&self) -> GeometryConfig {
        self.config
    }

    /// All fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Iterate over fields in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Number of fields.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the registry holds no fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Append a field and return its index.
    ///
    /// A field without a color gets the next palette color. Stored
    /// anchor and radius are kept as given.
    pub fn insert(&mut self, mut field: Field) -> usize {
        if field.color.is_none() {
            let color = FIELD_PALETTE[self.next_color % FIELD_PALETTE.len()];
            field.color = Some(color.to_string());
        }
        self.next_color += 1;
        self.fields.push(field);
        self.fields.len() - 1
    }

    /// Remove and return the field at `index`, shifting later fields down.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::FieldIndexOutOfRange`] for a bad index.
    pub fn remove(&mut self, index: usize) -> Result<Field, GeometryError> {
        self.check_index(index)?;
        Ok(self.fields.remove(index))
    }

    /// Replace a field's boundary and recompute its anchor and radius.
    ///
    /// Nothing is stored unless the recomputation succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::FieldIndexOutOfRange`] for a bad index, or
    /// [`GeometryError::NonFiniteCoordinate`] if the new boundary is
    /// degenerate and the field's stored anchor is not finite.
    pub fn set_boundary(&mut self, index: usize, boundary: Boundary) -> Result<(), GeometryError> {
        self.check_index(index)?;
        let (anchor, radius) = self.derive(self.fields[index].anchor, &boundary)?;
        let field = &mut self.fields[index];
        field.boundary = boundary;
        field.anchor = anchor;
        field.radius = Some(radius);
        Ok(())
    }

    /// Recompute the anchor (center finder) and then the radius of one
    /// field.
    ///
    /// Degenerate fields (fewer than three vertices) keep their anchor
    /// and get the default radius; the return value is `false` for them
    /// and `true` when a new anchor was computed.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::FieldIndexOutOfRange`] for a bad index, or
    /// [`GeometryError::NonFiniteCoordinate`] if a degenerate field
    /// carries a non-finite stored anchor. The field is unchanged on error.
    pub fn recompute(&mut self, index: usize) -> Result<bool, GeometryError> {
        self.check_index(index)?;
        let field = &self.fields[index];
        let (anchor, radius) = self.derive(field.anchor, &field.boundary)?;

        let field = &mut self.fields[index];
        field.anchor = anchor;
        field.radius = Some(radius);
        if field.boundary.is_degenerate() {
            debug!(
                field = %field.name,
                vertices = field.boundary.len(),
                "degenerate boundary, keeping anchor and using default radius"
            );
            return Ok(false);
        }
        debug!(
            field = %field.name,
            x = anchor.map(|p| p.x),
            y = anchor.map(|p| p.y),
            radius,
            "recomputed anchor"
        );
        Ok(true)
    }

    /// Anchor and radius `boundary` would give a field currently pinned at
    /// `anchor`. Degenerate boundaries keep `anchor`.
    fn derive(
        &self,
        anchor: Option<Point>,
        boundary: &Boundary,
    ) -> Result<(Option<Point>, f64), GeometryError> {
        let anchor = find_center(boundary, self.config.grid_steps).or(anchor);
        let radius = estimate_radius(anchor, boundary, self.extent, self.config.ray_count)?;
        Ok((anchor, radius))
    }

    /// Recompute anchor and radius for every non-degenerate field.
    ///
    /// Degenerate fields are left untouched. Returns the number of fields
    /// updated.
    pub fn regenerate_all(&mut self) -> usize {
        let extent = self.extent;
        let config = self.config;
        let mut updated = 0;

        for field in &mut self.fields {
            let Some(center) = find_center(&field.boundary, config.grid_steps) else {
                debug!(field = %field.name, "skipping degenerate field");
                continue;
            };
            // The center is built from finite boundary vertices, so the
            // estimator cannot reject it.
            let radius = estimate_radius(Some(center), &field.boundary, extent, config.ray_count)
                .unwrap_or_else(|_| default_radius(extent));
            field.anchor = Some(center);
            field.radius = Some(radius);
            updated += 1;
        }

        info!(updated, total = self.fields.len(), "regenerated field centers");
        updated
    }

    /// Place a field's pin explicitly and recompute its radius from it.
    ///
    /// The center finder is not run; the pin stays where it was put.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::FieldIndexOutOfRange`] for a bad index and
    /// [`GeometryError::NonFiniteCoordinate`] for a non-finite pin.
    pub fn move_anchor(&mut self, index: usize, anchor: Point) -> Result<(), GeometryError> {
        self.check_index(index)?;
        let anchor = anchor.ensure_finite()?;
        let extent = self.extent;
        let ray_count = self.config.ray_count;
        let field = &mut self.fields[index];

        field.anchor = Some(anchor);
        field.radius = Some(estimate_radius(
            Some(anchor),
            &field.boundary,
            extent,
            ray_count,
        )?);
        Ok(())
    }

    /// Recompute every field's radius from its current pin without moving
    /// any pins. Fields without a pin get the default radius.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFiniteCoordinate`] if any stored pin is
    /// not finite. No radius is changed in that case.
    pub fn refresh_radii(&mut self) -> Result<(), GeometryError> {
        let extent = self.extent;
        let ray_count = self.config.ray_count;

        let radii = self
            .fields
            .iter()
            .map(|field| estimate_radius(field.anchor, &field.boundary, extent, ray_count))
            .collect::<Result<Vec<_>, _>>()?;

        for (field, radius) in self.fields.iter_mut().zip(radii) {
            field.radius = Some(radius);
        }

        info!(total = self.fields.len(), "refreshed field radii");
        Ok(())
    }

    /// Crop window for one field, or `None` if it lacks an anchor or a
    /// radius.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::FieldIndexOutOfRange`] for a bad index, or
    /// the crop calculator's error for a non-finite anchor or a
    /// non-positive radius.
    pub fn crop_box(&self, index: usize) -> Result<Option<CropBox>, GeometryError> {
        self.check_index(index)?;
        let field = &self.fields[index];
        match (field.anchor, field.radius) {
            (Some(anchor), Some(radius)) => crop_bounds(anchor, radius, self.extent).map(Some),
            _ => Ok(None),
        }
    }

    /// Crop windows for every field that has both an anchor and a radius.
    ///
    /// Fields without them, or with values the crop calculator rejects,
    /// are skipped.
    #[must_use]
    pub fn minimap_plan(&self) -> Vec<MinimapJob<'_>> {
        self.fields
            .iter()
            .enumerate()
            .filter_map(|(index, field)| match self.crop_box(index) {
                Ok(Some(crop)) => Some(MinimapJob { index, field, crop }),
                Ok(None) => {
                    debug!(field = %field.name, "no anchor or radius, skipping minimap");
                    None
                }
                Err(err) => {
                    debug!(field = %field.name, %err, "unusable anchor or radius, skipping minimap");
                    None
                }
            })
            .collect()
    }

    /// Snapshot the registry as a map document.
    #[must_use]
    pub fn to_map_data(&self) -> MapData {
        MapData {
            map_size: Some(self.extent),
            fields: self.fields.clone(),
        }
    }

    /// Consume the registry into a map document.
    #[must_use]
    pub fn into_map_data(self) -> MapData {
        MapData {
            map_size: Some(self.extent),
            fields: self.fields,
        }
    }

    fn check_index(&self, index: usize) -> Result<(), GeometryError> {
        if index < self.fields.len() {
            Ok(())
        } else {
            Err(GeometryError::FieldIndexOutOfRange {
                index,
                len: self.fields.len(),
            })
        }
    }
}

impl<'a> IntoIterator for &'a FieldRegistry {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
