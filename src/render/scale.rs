//! Border-preserving strip scaler.
//!
//! Hand-drawn gauge and button art carries a one-pixel frame that has to stay
//! a single crisp line at every output size. A strip is split along the
//! scaled axis into leading border, interior and trailing border; only the
//! interior is resampled with the requested kernel, the borders are copied
//! with nearest-neighbour at their original width.

use image::imageops;

use crate::error::Result;
use crate::types::{Axis, Interpolation, Rect, StripSpec};

use super::Region;

/// Resize a whole region with one kernel.
pub fn resample(region: &Region, width: u32, height: u32, interpolation: Interpolation) -> Region {
    if region.size() == (width, height) {
        return region.clone();
    }
    Region::from_image(imageops::resize(
        region.image(),
        width,
        height,
        interpolation.filter(),
    ))
}

/// Scale `region` along one axis to `target` pixels, keeping the border band crisp.
///
/// Fails when either the source or the target length leaves no interior
/// pixels between the two borders.
pub fn scale_axis(region: &Region, axis: Axis, target: u32, strip: &StripSpec) -> Result<Region> {
    let source_len = axis_len(region, axis);
    strip.check_length(source_len, "source")?;
    strip.check_length(target, "target")?;

    if target == source_len {
        return Ok(region.clone());
    }

    let border = strip.border_width;
    let interior_src = source_len - 2 * border;
    let interior_dst = target - 2 * border;

    let interior = slice(region, axis, border, interior_src)?;
    let interior = resize_along(&interior, axis, interior_dst, strip.interpolation);

    let (width, height) = match axis {
        Axis::Horizontal => (target, region.height()),
        Axis::Vertical => (region.width(), target),
    };
    let mut out = image::RgbaImage::new(width, height);

    if border > 0 {
        let leading = slice(region, axis, 0, border)?;
        let trailing = slice(region, axis, source_len - border, border)?;
        let leading = resize_along(&leading, axis, border, Interpolation::Nearest);
        let trailing = resize_along(&trailing, axis, border, Interpolation::Nearest);
        place(&mut out, &leading, axis, 0);
        place(&mut out, &trailing, axis, target - border);
    }
    place(&mut out, &interior, axis, border);

    Ok(Region::from_image(out))
}

/// Scale a strip to the requested width and/or height.
///
/// The vertical pass runs first, then the horizontal pass on its result.
/// `None` leaves that axis untouched.
pub fn scale_strip(
    region: &Region,
    width: Option<u32>,
    height: Option<u32>,
    strip: &StripSpec,
) -> Result<Region> {
    let mut current = region.clone();
    if let Some(h) = height {
        current = scale_axis(&current, Axis::Vertical, h, strip)?;
    }
    if let Some(w) = width {
        current = scale_axis(&current, Axis::Horizontal, w, strip)?;
    }
    Ok(current)
}

fn axis_len(region: &Region, axis: Axis) -> u32 {
    match axis {
        Axis::Horizontal => region.width(),
        Axis::Vertical => region.height(),
    }
}

fn slice(region: &Region, axis: Axis, start: u32, len: u32) -> Result<Region> {
    let rect = match axis {
        Axis::Horizontal => Rect::new(start, 0, len, region.height()),
        Axis::Vertical => Rect::new(0, start, region.width(), len),
    };
    region.crop(rect)
}

fn resize_along(region: &Region, axis: Axis, len: u32, interpolation: Interpolation) -> Region {
    match axis {
        Axis::Horizontal => resample(region, len, region.height(), interpolation),
        Axis::Vertical => resample(region, region.width(), len, interpolation),
    }
}

fn place(out: &mut image::RgbaImage, part: &Region, axis: Axis, offset: u32) {
    let (x, y) = match axis {
        Axis::Horizontal => (offset, 0),
        Axis::Vertical => (0, offset),
    };
    imageops::replace(out, part.image(), x as i64, y as i64);
}
