//! fieldmap-minimap: Per-field minimap rendering (sans-IO).
//!
//! Takes a decoded map image and a field with a computed crop window and
//! produces the minimap image: the cropped map with the field polygon
//! tinted and outlined and its pin marked. Decoding and saving images is
//! left to the caller.

pub mod color;
pub mod overlay;

use fieldmap_geometry::CropBox;

pub use color::{FALLBACK_COLOR, parse_hex_color};
pub use overlay::render_minimap;

/// Suffix appended to every minimap file name.
pub const FILE_SUFFIX: &str = "_minimap.png";

/// Errors from minimap rendering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MinimapError {
    /// A field color was not a `#RRGGBB` hex string.
    #[error("invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),

    /// The crop window is empty or extends past the map image.
    #[error("crop box {crop:?} does not fit in {width}x{height} map image")]
    CropOutOfBounds {
        /// Requested crop window.
        crop: CropBox,
        /// Map image width.
        width: u32,
        /// Map image height.
        height: u32,
    },
}

/// File name for the minimap of field `index` named `name`.
///
/// Keeps alphanumerics, spaces, `-` and `_`, trims trailing whitespace
/// and appends [`FILE_SUFFIX`]. Names with nothing left after cleaning
/// become `field_{index}`.
#[must_use]
pub fn minimap_file_name(name: &str, index: usize) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_end();

    if cleaned.is_empty() {
        format!("field_{index}{FILE_SUFFIX}")
    } else {
        format!("{cleaned}{FILE_SUFFIX}")
    }
}
