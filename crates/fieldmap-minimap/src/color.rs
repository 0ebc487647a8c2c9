//! `#RRGGBB` color strings.

use crate::MinimapError;

/// Overlay color for fields that carry none.
pub const FALLBACK_COLOR: &str = "#FF0000";

/// Parse a `#RRGGBB` hex color into its channels.
///
/// The leading `#` is optional. Digits are case-insensitive.
///
/// # Errors
///
/// Returns [`MinimapError::InvalidColor`] unless the input is exactly six
/// hex digits after the optional `#`.
pub fn parse_hex_color(color: &str) -> Result<[u8; 3], MinimapError> {
    let invalid = || MinimapError::InvalidColor(color.to_string());

    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_palette_colors() {
        assert_eq!(parse_hex_color("#FF0000").unwrap(), [255, 0, 0]);
        assert_eq!(parse_hex_color("#FFA500").unwrap(), [255, 165, 0]);
        assert_eq!(parse_hex_color("#000080").unwrap(), [0, 0, 128]);
    }

    #[test]
    fn hash_is_optional_and_case_ignored() {
        assert_eq!(parse_hex_color("a52a2a").unwrap(), [165, 42, 42]);
        assert_eq!(parse_hex_color("#A52A2A").unwrap(), [165, 42, 42]);
    }

    #[test]
    fn fallback_parses() {
        assert_eq!(parse_hex_color(FALLBACK_COLOR).unwrap(), [255, 0, 0]);
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "#", "#FFF", "#FF00000", "#GG0000", "red", "#ÿÿÿ"] {
            assert_eq!(
                parse_hex_color(bad),
                Err(MinimapError::InvalidColor(bad.to_string())),
                "{bad:?}"
            );
        }
    }
}
