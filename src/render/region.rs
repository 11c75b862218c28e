//! Pixel buffers: whole sheets and owned regions cropped from them.

use image::{imageops, Rgba, RgbaImage};

use crate::error::{AtlasError, Result};
use crate::types::{Colour, Rect};

/// An owned rectangular RGBA buffer.
///
/// Regions never alias the sheet they were cropped from; every transform
/// produces a new region.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pixels: RgbaImage,
}

impl Region {
    /// A fully transparent region.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    /// A region filled with one colour.
    pub fn filled(width: u32, height: u32, colour: Colour) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba(colour.to_rgba())),
        }
    }

    /// Build a region from rows of colours (row-major: `rows[y][x]`).
    pub fn from_rows(rows: &[Vec<Colour>]) -> Self {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.len()) as u32;
        let pixels = RgbaImage::from_fn(width, height, |x, y| {
            let colour = rows[y as usize]
                .get(x as usize)
                .copied()
                .unwrap_or(Colour::TRANSPARENT);
            Rgba(colour.to_rgba())
        });
        Self { pixels }
    }

    /// Build a region by evaluating `f` at every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Colour) -> Self {
        Self {
            pixels: RgbaImage::from_fn(width, height, |x, y| Rgba(f(x, y).to_rgba())),
        }
    }

    pub fn from_image(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Get the dimensions as (width, height).
    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Get a pixel at the given position.
    pub fn get(&self, x: u32, y: u32) -> Option<Colour> {
        self.pixels.get_pixel_checked(x, y).map(|p| Colour::from_rgba(p.0))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Copy out the pixels under `rect`.
    pub fn crop(&self, rect: Rect) -> Result<Region> {
        crop_checked(&self.pixels, rect, "region")
    }

    /// Tight bounding box of pixels with non-zero alpha.
    pub fn visible_bounds(&self) -> Option<Rect> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, pixel) in self.pixels.enumerate_pixels() {
            if pixel.0[3] == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        bounds.map(|(x0, y0, x1, y1)| Rect::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1))
    }

    pub fn is_fully_transparent(&self) -> bool {
        self.pixels.pixels().all(|p| p.0[3] == 0)
    }
}

/// A full named sheet, as loaded from or written to a texture file.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pixels: RgbaImage,
}

impl Sheet {
    /// A transparent sheet, the starting point of an output atlas.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn from_image(name: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            name: name.into(),
            pixels,
        }
    }

    /// Wrap a region as a sheet.
    pub fn from_region(name: impl Into<String>, region: Region) -> Self {
        Self::from_image(name, region.into_image())
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Colour> {
        self.pixels.get_pixel_checked(x, y).map(|p| Colour::from_rgba(p.0))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Copy out a rectangle; fails if any part lies outside the sheet.
    pub fn crop(&self, rect: Rect) -> Result<Region> {
        crop_checked(&self.pixels, rect, &self.name)
    }

    /// The whole sheet as a region.
    pub fn to_region(&self) -> Region {
        Region::from_image(self.pixels.clone())
    }

    /// Overwrite the pixels under `rect.x`, `rect.y` with `region`.
    pub fn paste(&mut self, region: &Region, x: u32, y: u32) -> Result<()> {
        let rect = Rect::new(x, y, region.width(), region.height());
        if !rect.fits_within(self.width(), self.height()) {
            return Err(out_of_bounds(&self.name, rect, &self.pixels));
        }
        imageops::replace(&mut self.pixels, region.image(), x as i64, y as i64);
        Ok(())
    }
}

fn crop_checked(pixels: &RgbaImage, rect: Rect, name: &str) -> Result<Region> {
    if rect.w == 0 || rect.h == 0 || !rect.fits_within(pixels.width(), pixels.height()) {
        return Err(out_of_bounds(name, rect, pixels));
    }
    let view = imageops::crop_imm(pixels, rect.x, rect.y, rect.w, rect.h);
    Ok(Region::from_image(view.to_image()))
}

fn out_of_bounds(name: &str, rect: Rect, pixels: &RgbaImage) -> AtlasError {
    AtlasError::OutOfBounds {
        sheet: name.to_string(),
        x: rect.x,
        y: rect.y,
        w: rect.w,
        h: rect.h,
        sheet_w: pixels.width(),
        sheet_h: pixels.height(),
    }
}
