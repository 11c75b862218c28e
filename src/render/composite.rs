//! Fitting foreground art into a cell and alpha-compositing it over a background.

use image::imageops;

use crate::error::{AtlasError, Result};
use crate::types::{Colour, FitMode, Interpolation, StripSpec};

use super::{resample, scale_strip, Region};

/// A foreground fitted into a cell-sized transparent canvas.
#[derive(Debug, Clone)]
pub struct Fitted {
    pub region: Region,
    /// `Visible` mode found no opaque pixels; the canvas is fully transparent.
    pub is_empty: bool,
}

/// Scale `item` to `fit_size` and centre it on a `cell_size` canvas, shifted by the offsets.
///
/// `fit_size` is clamped to `[1, cell_size]`. Content pushed past the cell
/// edge by the offsets is clipped. With a `strip`, resizing goes through the
/// border-preserving scaler and fails when the fitted size leaves no interior.
pub fn fit_region(
    item: &Region,
    cell_size: u32,
    fit_size: u32,
    offset_x: i32,
    offset_y: i32,
    mode: FitMode,
    strip: Option<&StripSpec>,
) -> Result<Fitted> {
    let fit_size = fit_size.clamp(1, cell_size.max(1));
    let mut canvas = image::RgbaImage::new(cell_size, cell_size);

    let (content, empty) = match mode {
        FitMode::Tile => (Some(resize_to(item, fit_size, fit_size, strip)?), false),
        FitMode::Visible => match item.visible_bounds().and_then(|b| item.crop(b).ok()) {
            Some(visible) => {
                let (w, h) = visible.size();
                let scale = (fit_size as f32 / w as f32).min(fit_size as f32 / h as f32);
                let dst_w = ((w as f32 * scale).round() as u32).max(1);
                let dst_h = ((h as f32 * scale).round() as u32).max(1);
                (Some(resize_to(&visible, dst_w, dst_h, strip)?), false)
            }
            None => (None, true),
        },
    };

    if let Some(content) = content {
        let x = (cell_size as i64 - content.width() as i64) / 2 + offset_x as i64;
        let y = (cell_size as i64 - content.height() as i64) / 2 + offset_y as i64;
        imageops::replace(&mut canvas, content.image(), x, y);
    }

    Ok(Fitted {
        region: Region::from_image(canvas),
        is_empty: empty,
    })
}

fn resize_to(item: &Region, width: u32, height: u32, strip: Option<&StripSpec>) -> Result<Region> {
    match strip {
        Some(strip) => scale_strip(item, Some(width), Some(height), strip),
        None => Ok(resample(item, width, height, Interpolation::Smooth)),
    }
}

/// Composite `fg` over `bg` with the foreground alpha scaled by `opacity`.
///
/// Both regions must have the same dimensions; neither is modified.
pub fn composite_over(fg: &Region, bg: &Region, opacity: f32) -> Result<Region> {
    if fg.size() != bg.size() {
        return Err(AtlasError::Composite {
            message: format!(
                "foreground is {}x{} but background is {}x{}",
                fg.width(),
                fg.height(),
                bg.width(),
                bg.height()
            ),
        });
    }
    let opacity = opacity.clamp(0.0, 1.0);
    let (width, height) = fg.size();

    Ok(Region::from_fn(width, height, |x, y| {
        let f = fg.get(x, y).unwrap_or(Colour::TRANSPARENT);
        let b = bg.get(x, y).unwrap_or(Colour::TRANSPARENT);
        blend_over(f, b, opacity)
    }))
}

/// Porter-Duff "over" for one pixel.
fn blend_over(fg: Colour, bg: Colour, opacity: f32) -> Colour {
    let fa = fg.a as f32 / 255.0 * opacity;
    if fa <= 0.0 {
        return bg;
    }
    if fa >= 1.0 {
        return fg;
    }

    let ba = bg.a as f32 / 255.0;
    let out_a = fa + ba * (1.0 - fa);
    let mix = |f: u8, b: u8| -> u8 {
        let v = (f as f32 * fa + b as f32 * ba * (1.0 - fa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };

    Colour::new(
        mix(fg.r, bg.r),
        mix(fg.g, bg.g),
        mix(fg.b, bg.b),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    fn speckled(width: u32, height: u32) -> Region {
        Region::from_fn(width, height, |x, y| {
            Colour::new((x * 31) as u8, (y * 17) as u8, 99, ((x + y) * 20) as u8)
        })
    }

    #[test]
    fn test_transparent_foreground_keeps_background() {
        let bg = speckled(6, 6);
        let fg = Region::transparent(6, 6);
        assert_eq!(composite_over(&fg, &bg, 1.0).unwrap(), bg);
    }

    #[test]
    fn test_zero_opacity_keeps_background() {
        let bg = speckled(4, 4);
        let fg = Region::filled(4, 4, Colour::WHITE);
        assert_eq!(composite_over(&fg, &bg, 0.0).unwrap(), bg);
    }

    #[test]
    fn test_opaque_foreground_replaces_background() {
        let bg = speckled(5, 5);
        let fg = Region::from_fn(5, 5, |x, y| Colour::rgb(x as u8, y as u8, 200));
        assert_eq!(composite_over(&fg, &bg, 1.0).unwrap(), fg);
    }

    #[test]
    fn test_half_opacity_blends() {
        let bg = Region::filled(1, 1, Colour::BLACK);
        let fg = Region::filled(1, 1, Colour::WHITE);
        let out = composite_over(&fg, &bg, 0.5).unwrap();
        assert_eq!(out.get(0, 0), Some(Colour::new(128, 128, 128, 255)));
    }

    #[test]
    fn test_over_transparent_background_keeps_colour() {
        let bg = Region::transparent(1, 1);
        let fg = Region::filled(1, 1, Colour::new(200, 100, 50, 128));
        let out = composite_over(&fg, &bg, 1.0).unwrap();
        assert_eq!(out.get(0, 0), Some(Colour::new(200, 100, 50, 128)));
    }

    #[test]
    fn test_size_mismatch_fails() {
        let err = composite_over(&Region::transparent(2, 2), &Region::transparent(3, 3), 1.0);
        assert!(matches!(err, Err(AtlasError::Composite { .. })));
    }

    #[test]
    fn test_fit_tile_centres_with_offsets() {
        let item = Region::filled(10, 10, Colour::WHITE);
        let fitted = fit_region(&item, 10, 6, 0, 0, FitMode::Tile, None).unwrap();
        assert!(!fitted.is_empty);
        assert_eq!(fitted.region.visible_bounds(), Some(Rect::new(2, 2, 6, 6)));

        let fitted = fit_region(&item, 10, 6, 1, -1, FitMode::Tile, None).unwrap();
        assert_eq!(fitted.region.visible_bounds(), Some(Rect::new(3, 1, 6, 6)));
    }

    #[test]
    fn test_fit_clips_offsets_past_edge() {
        let item = Region::filled(4, 4, Colour::WHITE);
        let fitted = fit_region(&item, 4, 4, -2, 0, FitMode::Tile, None).unwrap();
        assert_eq!(fitted.region.visible_bounds(), Some(Rect::new(0, 0, 2, 4)));
    }

    #[test]
    fn test_fit_visible_uses_content_bounds() {
        // 2x4 opaque block inside a 10x10 transparent tile.
        let item = Region::from_fn(10, 10, |x, y| {
            if (4..6).contains(&x) && (3..7).contains(&y) {
                Colour::WHITE
            } else {
                Colour::TRANSPARENT
            }
        });
        let fitted = fit_region(&item, 10, 8, 0, 0, FitMode::Visible, None).unwrap();
        // scale = min(8/2, 8/4) = 2 -> 4x8, centred at (3, 1)
        assert_eq!(fitted.region.visible_bounds(), Some(Rect::new(3, 1, 4, 8)));
    }

    #[test]
    fn test_fit_visible_empty_is_transparent() {
        let item = Region::transparent(8, 8);
        let fitted = fit_region(&item, 8, 6, 0, 0, FitMode::Visible, None).unwrap();
        assert!(fitted.is_empty);
        assert!(fitted.region.is_fully_transparent());
        assert_eq!(fitted.region.size(), (8, 8));
    }

    #[test]
    fn test_fit_size_clamped_to_cell() {
        let item = Region::filled(3, 3, Colour::WHITE);
        let fitted = fit_region(&item, 5, 50, 0, 0, FitMode::Tile, None).unwrap();
        assert_eq!(fitted.region.visible_bounds(), Some(Rect::new(0, 0, 5, 5)));
    }

    #[test]
    fn test_fit_with_strip_keeps_frame() {
        let frame = Colour::rgb(10, 20, 30);
        let fill = Colour::rgb(200, 180, 90);
        let item = Region::from_fn(8, 8, |x, y| {
            if x == 0 || y == 0 || x == 7 || y == 7 {
                frame
            } else {
                fill
            }
        });
        let strip = StripSpec::new(1, Interpolation::Smooth);
        let fitted = fit_region(&item, 16, 16, 0, 0, FitMode::Tile, Some(&strip)).unwrap();

        for i in 0..16 {
            assert_eq!(fitted.region.get(i, 0), Some(frame));
            assert_eq!(fitted.region.get(i, 15), Some(frame));
            assert_eq!(fitted.region.get(0, i), Some(frame));
            assert_eq!(fitted.region.get(15, i), Some(frame));
        }
        assert_eq!(fitted.region.get(1, 8), Some(fill));
        assert_eq!(fitted.region.get(8, 1), Some(fill));
    }

    #[test]
    fn test_fit_with_strip_needs_interior() {
        let item = Region::filled(8, 8, Colour::WHITE);
        let strip = StripSpec::new(1, Interpolation::Nearest);
        let err = fit_region(&item, 8, 2, 0, 0, FitMode::Tile, Some(&strip)).unwrap_err();
        assert!(matches!(err, AtlasError::NoInterior { border: 1, .. }));
    }
}
