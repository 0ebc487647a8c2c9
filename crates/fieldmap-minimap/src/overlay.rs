//! Minimap rendering: crop the map around a field and draw the field's
//! outline and pin on top.

use fieldmap_geometry::{CropBox, Field, Point};
use image::{Rgba, RgbaImage, imageops};
use tiny_skia::{Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::MinimapError;
use crate::color::{FALLBACK_COLOR, parse_hex_color};

/// Alpha of the polygon fill (about 25% opacity).
pub const FILL_ALPHA: u8 = 64;

/// Width of the polygon outline in pixels.
pub const OUTLINE_WIDTH: f32 = 2.0;

/// Radius of the pin disc in pixels.
pub const PIN_RADIUS: f32 = 6.0;

/// Width of the pin's black outline in pixels.
pub const PIN_OUTLINE_WIDTH: f32 = 2.0;

/// Cut `crop` out of `map` and overlay `field` on it.
///
/// Fields with at least three vertices get their polygon filled in the
/// field color at [`FILL_ALPHA`] and outlined at full opacity. Their pin
/// is drawn as a disc with a black outline when it lies inside the crop.
/// Degenerate fields yield the plain crop.
///
/// # Errors
///
/// Returns [`MinimapError::CropOutOfBounds`] if `crop` is empty or
/// reaches past the map image, and [`MinimapError::InvalidColor`] if the
/// field's color is not `#RRGGBB`.
pub fn render_minimap(
    map: &RgbaImage,
    field: &Field,
    crop: CropBox,
) -> Result<RgbaImage, MinimapError> {
    let (width, height) = map.dimensions();
    if crop.right <= crop.left
        || crop.bottom <= crop.top
        || crop.right > width
        || crop.bottom > height
    {
        return Err(MinimapError::CropOutOfBounds {
            crop,
            width,
            height,
        });
    }

    let mut minimap = imageops::crop_imm(map, crop.left, crop.top, crop.width(), crop.height())
        .to_image();

    if field.boundary.is_degenerate() {
        return Ok(minimap);
    }

    let [r, g, b] = parse_hex_color(field.color.as_deref().unwrap_or(FALLBACK_COLOR))?;
    let origin = Point::new(f64::from(crop.left), f64::from(crop.top));

    let Some(mut layer) = Pixmap::new(crop.width(), crop.height()) else {
        return Ok(minimap);
    };

    draw_boundary(&mut layer, field.boundary.points(), origin, [r, g, b]);

    if let Some(anchor) = field.anchor {
        let x = anchor.x - origin.x;
        let y = anchor.y - origin.y;
        let side = f64::from(crop.width());
        if (0.0..=side).contains(&x) && (0.0..=side).contains(&y) {
            draw_pin(&mut layer, Point::new(x, y), [r, g, b]);
        }
    }

    imageops::overlay(&mut minimap, &unpremultiply(&layer), 0, 0);
    Ok(minimap)
}

/// Fill and outline the polygon, shifted so `origin` maps to `(0, 0)`.
#[allow(clippy::cast_possible_truncation)]
fn draw_boundary(layer: &mut Pixmap, points: &[Point], origin: Point, [r, g, b]: [u8; 3]) {
    let mut pb = PathBuilder::new();
    let mut shifted = points
        .iter()
        .map(|p| ((p.x - origin.x) as f32, (p.y - origin.y) as f32));
    if let Some((x, y)) = shifted.next() {
        pb.move_to(x, y);
        for (x, y) in shifted {
            pb.line_to(x, y);
        }
        pb.close();
    }
    let Some(path) = pb.finish() else {
        return;
    };

    let mut fill = Paint::default();
    fill.set_color_rgba8(r, g, b, FILL_ALPHA);
    fill.anti_alias = true;
    layer.fill_path(
        &path,
        &fill,
        tiny_skia::FillRule::Winding,
        Transform::identity(),
        None,
    );

    let mut outline = Paint::default();
    outline.set_color_rgba8(r, g, b, 255);
    outline.anti_alias = true;
    let stroke = Stroke {
        width: OUTLINE_WIDTH,
        ..Stroke::default()
    };
    layer.stroke_path(&path, &outline, &stroke, Transform::identity(), None);
}

/// Opaque disc in the field color with a black ring.
#[allow(clippy::cast_possible_truncation)]
fn draw_pin(layer: &mut Pixmap, center: Point, [r, g, b]: [u8; 3]) {
    let Some(disc) = PathBuilder::from_circle(center.x as f32, center.y as f32, PIN_RADIUS) else {
        return;
    };

    let mut fill = Paint::default();
    fill.set_color_rgba8(r, g, b, 255);
    fill.anti_alias = true;
    layer.fill_path(
        &disc,
        &fill,
        tiny_skia::FillRule::Winding,
        Transform::identity(),
        None,
    );

    let mut ring = Paint::default();
    ring.set_color_rgba8(0, 0, 0, 255);
    ring.anti_alias = true;
    let stroke = Stroke {
        width: PIN_OUTLINE_WIDTH,
        ..Stroke::default()
    };
    layer.stroke_path(&disc, &ring, &stroke, Transform::identity(), None);
}

/// Convert a premultiplied pixmap to a straight-alpha image.
fn unpremultiply(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (pixel, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *pixel = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fieldmap_geometry::Boundary;

    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn white_map() -> RgbaImage {
        RgbaImage::from_pixel(100, 100, WHITE)
    }

    fn square_field() -> Field {
        let boundary = Boundary::new(vec![
            Point::new(40.0, 40.0),
            Point::new(60.0, 40.0),
            Point::new(60.0, 60.0),
            Point::new(40.0, 60.0),
        ])
        .unwrap();
        Field::new("Square", boundary)
            .with_color("#FF0000")
            .with_anchor(Point::new(50.0, 50.0))
    }

    fn crop() -> CropBox {
        CropBox {
            left: 30,
            top: 30,
            right: 70,
            bottom: 70,
        }
    }

    // --- geometry of the output ---

    #[test]
    fn output_matches_crop_size() {
        let out = render_minimap(&white_map(), &square_field(), crop()).unwrap();
        assert_eq!(out.dimensions(), (40, 40));
    }

    #[test]
    fn outside_polygon_is_untouched() {
        let out = render_minimap(&white_map(), &square_field(), crop()).unwrap();
        assert_eq!(*out.get_pixel(2, 2), WHITE);
        assert_eq!(*out.get_pixel(37, 37), WHITE);
    }

    // --- overlay ---

    #[test]
    fn interior_is_tinted() {
        let out = render_minimap(&white_map(), &square_field(), crop()).unwrap();
        // Map (42, 57): inside the square, away from the pin and outline.
        let px = out.get_pixel(12, 27);
        assert_eq!(px[0], 255);
        assert!((180..=200).contains(&px[1]), "{px:?}");
        assert!((180..=200).contains(&px[2]), "{px:?}");
        assert_eq!(px[3], 255);
    }

    #[test]
    fn outline_is_opaque_field_color() {
        let out = render_minimap(&white_map(), &square_field(), crop()).unwrap();
        // Left edge at map x = 40 -> crop x = 10; the stroke covers 9..11.
        let px = out.get_pixel(9, 25);
        assert!(px[0] > 240 && px[1] < 20 && px[2] < 20, "{px:?}");
    }

    #[test]
    fn pin_is_drawn_with_black_ring() {
        let out = render_minimap(&white_map(), &square_field(), crop()).unwrap();
        let center = out.get_pixel(20, 20);
        assert!(center[0] > 240 && center[1] < 20 && center[2] < 20, "{center:?}");
        // Pixel spanning radii 5..6.1 from the pin lies inside the ring.
        let ring = out.get_pixel(25, 20);
        assert!(ring[0] < 40 && ring[1] < 40 && ring[2] < 40, "{ring:?}");
    }

    #[test]
    fn pin_outside_crop_is_skipped() {
        let field = square_field().with_anchor(Point::new(5.0, 5.0));
        let with_far_pin = render_minimap(&white_map(), &field, crop()).unwrap();
        let without_pin = {
            let mut f = square_field();
            f.anchor = None;
            render_minimap(&white_map(), &f, crop()).unwrap()
        };
        assert_eq!(with_far_pin, without_pin);
    }

    #[test]
    fn missing_color_falls_back_to_red() {
        let mut field = square_field();
        field.color = None;
        let fallback = render_minimap(&white_map(), &field, crop()).unwrap();
        let red = render_minimap(&white_map(), &square_field(), crop()).unwrap();
        assert_eq!(fallback, red);
    }

    #[test]
    fn degenerate_field_gives_plain_crop() {
        let mut map = white_map();
        map.put_pixel(31, 32, Rgba([1, 2, 3, 255]));
        let line = Boundary::new(vec![Point::new(40.0, 40.0), Point::new(60.0, 60.0)]).unwrap();
        let field = Field::new("Line", line).with_anchor(Point::new(50.0, 50.0));
        let out = render_minimap(&map, &field, crop()).unwrap();
        let expected = imageops::crop_imm(&map, 30, 30, 40, 40).to_image();
        assert_eq!(out, expected);
        assert_eq!(*out.get_pixel(1, 2), Rgba([1, 2, 3, 255]));
    }

    // --- errors ---

    #[test]
    fn crop_past_image_is_rejected() {
        let bad = CropBox {
            left: 80,
            top: 80,
            right: 120,
            bottom: 120,
        };
        assert_eq!(
            render_minimap(&white_map(), &square_field(), bad),
            Err(MinimapError::CropOutOfBounds {
                crop: bad,
                width: 100,
                height: 100
            })
        );
    }

    #[test]
    fn empty_crop_is_rejected() {
        let empty = CropBox {
            left: 10,
            top: 10,
            right: 10,
            bottom: 10,
        };
        assert!(render_minimap(&white_map(), &square_field(), empty).is_err());
    }

    #[test]
    fn bad_color_is_rejected() {
        let field = square_field().with_color("chartreuse");
        assert_eq!(
            render_minimap(&white_map(), &field, crop()),
            Err(MinimapError::InvalidColor("chartreuse".to_string()))
        );
    }
}
