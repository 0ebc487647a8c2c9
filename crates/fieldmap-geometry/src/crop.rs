//! Crop window derivation: turn an anchor and radius into a square,
//! integer, image-bounded box for minimap extraction.

use crate::types::{CropBox, GeometryError, MapExtent, Point};

/// Compute the minimap crop window around `anchor`.
///
/// # Steps
///
/// 1. Take the square `anchor +/- radius`, truncating each edge toward
///    zero.
/// 2. Clip every edge to `[0, width]` / `[0, height]`.
/// 3. Shrink to the shorter clipped side and recenter that square on the
///    clipped box's center.
/// 4. If the result has no area (anchor far outside the image), grow it
///    to one pixel, extending right/bottom when there is room and
///    left/top otherwise.
///
/// The result always has positive area, equal sides, and lies within the
/// image.
///
/// # Errors
///
/// Returns [`GeometryError::NonFiniteCoordinate`] for a non-finite
/// anchor and [`GeometryError::InvalidRadius`] unless `radius` is finite
/// and positive.
pub fn crop_bounds(
    anchor: Point,
    radius: f64,
    extent: MapExtent,
) -> Result<CropBox, GeometryError> {
    let anchor = anchor.ensure_finite()?;
    if !radius.is_finite() || radius <= 0.0 {
        return Err(GeometryError::InvalidRadius(radius));
    }

    let width = i64::from(extent.width());
    let height = i64::from(extent.height());

    // 1 + 2. Truncated, clipped initial square.
    let left = truncate(anchor.x - radius).clamp(0, width);
    let top = truncate(anchor.y - radius).clamp(0, height);
    let right = truncate(anchor.x + radius).clamp(0, width);
    let bottom = truncate(anchor.y + radius).clamp(0, height);

    // 3. Recenter a square of the shorter side.
    let square = (right - left).min(bottom - top);
    let center_x = (left + right).div_euclid(2);
    let center_y = (top + bottom).div_euclid(2);
    let half = square.div_euclid(2);

    let mut left = (center_x - half).max(0);
    let mut top = (center_y - half).max(0);
    let mut right = (left + square).min(width);
    let mut bottom = (top + square).min(height);

    // 4. Nudge a collapsed box open.
    if right <= left {
        if left < width {
            right = left + 1;
        } else {
            left = right - 1;
        }
    }
    if bottom <= top {
        if top < height {
            bottom = top + 1;
        } else {
            top = bottom - 1;
        }
    }

    let side = (right - left).min(bottom - top);
    right = left + side;
    bottom = top + side;

    Ok(CropBox {
        left: to_u32(left),
        top: to_u32(top),
        right: to_u32(right),
        bottom: to_u32(bottom),
    })
}

/// Truncate toward zero, saturating at the `i64` range.
#[allow(clippy::cast_possible_truncation)]
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

/// Convert a coordinate already clipped to a `u32` extent.
fn to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
