//! Luminance gradient tinter.
//!
//! Recolours grayscale art: each opaque pixel takes the ramp colour at its
//! gradient position, scaled by the pixel's own luminance. Alpha passes
//! through untouched and fully transparent pixels come out as `(0, 0, 0, 0)`.

use crate::types::{ColorRamp, Colour, Tint};

use super::Region;

/// Apply a tint, or pass the region through for [`Tint::Direct`].
pub fn apply_tint(region: &Region, tint: &Tint) -> Region {
    match tint {
        Tint::Direct => region.clone(),
        Tint::Ramp(ramp) => tint_region(region, ramp),
    }
}

/// Recolour a grayscale-with-alpha region through `ramp`.
///
/// Luminance is read from the red channel; the source is expected to have
/// R = G = B.
pub fn tint_region(region: &Region, ramp: &ColorRamp) -> Region {
    let (width, height) = region.size();
    let direction = ramp.direction();

    Region::from_fn(width, height, |x, y| {
        let src = region.get(x, y).unwrap_or(Colour::TRANSPARENT);
        if src.a == 0 {
            return Colour::TRANSPARENT;
        }

        let t = direction.position(x, y, width, height);
        let [r, g, b] = ramp.colour_at(t);
        let lum = src.r as f32 / 255.0;

        Colour::new(channel(r * lum), channel(g * lum), channel(b * lum), src.a)
    })
}

fn channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RampDirection;

    fn white(width: u32, height: u32) -> Region {
        Region::filled(width, height, Colour::WHITE)
    }

    #[test]
    fn test_transparent_pixels_become_zero() {
        let rows = vec![vec![Colour::new(200, 200, 200, 0), Colour::WHITE]];
        let ramp = ColorRamp::two_stop(Colour::rgb(255, 0, 0), Colour::rgb(0, 255, 0), RampDirection::Horizontal);
        let out = tint_region(&Region::from_rows(&rows), &ramp);
        assert_eq!(out.get(0, 0), Some(Colour::TRANSPARENT));
        assert_eq!(out.get(1, 0), Some(Colour::rgb(0, 255, 0)));
    }

    #[test]
    fn test_flat_ramp_reproduces_colour_and_alpha() {
        let c = Colour::rgb(40, 120, 210);
        let ramp = ColorRamp::two_stop(c, c, RampDirection::DiagonalTr);
        let source = Region::from_fn(6, 5, |x, _| Colour::new(255, 255, 255, 40 * x as u8 + 1));
        let out = tint_region(&source, &ramp);
        for y in 0..5 {
            for x in 0..6 {
                let px = out.get(x, y).unwrap();
                assert_eq!(px, Colour::new(c.r, c.g, c.b, 40 * x as u8 + 1));
            }
        }
    }

    #[test]
    fn test_vertical_black_to_white_is_monotonic() {
        let ramp = ColorRamp::two_stop(Colour::BLACK, Colour::WHITE, RampDirection::Vertical);
        let out = tint_region(&white(3, 17), &ramp);
        let mut previous = 0u8;
        for y in 0..17 {
            let px = out.get(1, y).unwrap();
            assert!(px.r >= previous, "row {y} darker than row above");
            previous = px.r;
        }
        assert_eq!(out.get(0, 0).unwrap().r, 0);
        assert_eq!(out.get(0, 16).unwrap().r, 255);
    }

    #[test]
    fn test_luminance_scales_ramp() {
        let ramp = ColorRamp::two_stop(Colour::rgb(200, 100, 50), Colour::rgb(200, 100, 50), RampDirection::Vertical);
        let gray = Region::filled(2, 2, Colour::rgb(128, 128, 128));
        let out = tint_region(&gray, &ramp);
        // 200 * 128/255 = 100.39, 100 * 128/255 = 50.2, 50 * 128/255 = 25.1
        assert_eq!(out.get(0, 0), Some(Colour::rgb(100, 50, 25)));
    }

    #[test]
    fn test_horizontal_three_stop() {
        let ramp = ColorRamp::three_stop(
            Colour::rgb(255, 0, 0),
            Colour::rgb(0, 255, 0),
            Colour::rgb(0, 0, 255),
            RampDirection::Horizontal,
        );
        let out = tint_region(&white(5, 1), &ramp);
        assert_eq!(out.get(0, 0), Some(Colour::rgb(255, 0, 0)));
        assert_eq!(out.get(2, 0), Some(Colour::rgb(0, 255, 0)));
        assert_eq!(out.get(4, 0), Some(Colour::rgb(0, 0, 255)));
    }

    #[test]
    fn test_direct_passes_through() {
        let source = Region::from_rows(&[vec![Colour::rgb(1, 2, 3), Colour::new(9, 9, 9, 0)]]);
        assert_eq!(apply_tint(&source, &Tint::Direct), source);
    }
}
