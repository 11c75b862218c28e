//! Layered gauge scaling.
//!
//! A gauge texture stacks several equal-height layers (background, fill,
//! line overlay, ...). Each layer is its own strip with a 1px frame, so the
//! layers are cut apart, scaled independently with their own kernel, and
//! stacked again.
//!
//! # Example
//!
//! ```yaml
//! border_width: 1
//! layers:
//!   - { name: background, interpolation: bilinear }
//!   - { name: fill, interpolation: bilinear }
//!   - { name: lines, interpolation: nearest }
//!   - { name: lines_fill, interpolation: nearest }
//! ```

use std::path::Path;

use image::imageops;
use serde::{Deserialize, Serialize};

use crate::atlas::read_document;
use crate::error::{AtlasError, Result};
use crate::types::{Interpolation, Rect, StripSpec};

use super::{scale_strip, Region};

/// One stacked layer of a gauge sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeLayer {
    pub name: String,
    #[serde(default)]
    pub interpolation: Interpolation,
}

impl GaugeLayer {
    pub fn new(name: impl Into<String>, interpolation: Interpolation) -> Self {
        Self {
            name: name.into(),
            interpolation,
        }
    }
}

/// Layer table for a gauge sheet, top layer first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeLayout {
    pub layers: Vec<GaugeLayer>,
    #[serde(default = "default_border")]
    pub border_width: u32,
}

fn default_border() -> u32 {
    1
}

impl GaugeLayout {
    /// Background and fill scale smoothly; line overlays stay hard-edged.
    pub fn standard() -> Self {
        Self {
            layers: vec![
                GaugeLayer::new("background", Interpolation::Bilinear),
                GaugeLayer::new("fill", Interpolation::Bilinear),
                GaugeLayer::new("lines", Interpolation::Nearest),
                GaugeLayer::new("lines_fill", Interpolation::Nearest),
            ],
            border_width: 1,
        }
    }

    /// Load a layout from a YAML or JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let layout: Self = read_document(path)?;
        if layout.layers.is_empty() {
            return Err(AtlasError::Config {
                message: format!("gauge layout {} has no layers", path.display()),
                help: None,
            });
        }
        Ok(layout)
    }

    /// Height of one layer in a sheet of `sheet_height` pixels.
    pub fn layer_height(&self, sheet_height: u32) -> Result<u32> {
        let count = self.layers.len() as u32;
        if count == 0 || sheet_height % count != 0 {
            return Err(AtlasError::Config {
                message: format!(
                    "height {} does not split into {} equal layers",
                    sheet_height, count
                ),
                help: Some("Gauge sheets stack layers of identical height".to_string()),
            });
        }
        Ok(sheet_height / count)
    }
}

impl Default for GaugeLayout {
    fn default() -> Self {
        Self::standard()
    }
}

/// Scale a stacked gauge sheet to `width` x `height`.
///
/// Layer `n` of the result starts at `y = n * height / layers`.
pub fn scale_gauge(source: &Region, layout: &GaugeLayout, width: u32, height: u32) -> Result<Region> {
    let src_layer = layout.layer_height(source.height())?;
    let dst_layer = layout.layer_height(height)?;

    let mut out = image::RgbaImage::new(width, height);
    for (i, layer) in layout.layers.iter().enumerate() {
        let i = i as u32;
        let section = source.crop(Rect::new(0, i * src_layer, source.width(), src_layer))?;
        let strip = StripSpec::new(layout.border_width, layer.interpolation);
        let target_w = (width != section.width()).then_some(width);
        let target_h = (dst_layer != src_layer).then_some(dst_layer);
        let scaled = scale_strip(&section, target_w, target_h, &strip)?;
        imageops::replace(&mut out, scaled.image(), 0, (i * dst_layer) as i64);
    }

    Ok(Region::from_image(out))
}

/// Output file name for a resized gauge.
///
/// The size tag goes before the last `_` of the stem, with a `t` suffix for
/// tall variants: `gauge_inlay_thorne01` at 120 tall becomes
/// `gauge_inlay120t_thorne01`.
pub fn sized_file_name(stem: &str, width: u32, tall: bool, extension: &str) -> String {
    let tag = if tall {
        format!("{}t", width)
    } else {
        width.to_string()
    };
    match stem.rfind('_') {
        Some(idx) => format!("{}{}{}.{}", &stem[..idx], tag, &stem[idx..], extension),
        None => format!("{}{}.{}", stem, tag, extension),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Colour;

    fn layer_colour(layer: u32, role: u32) -> Colour {
        Colour::rgb((layer * 60) as u8, (role * 100) as u8, 50)
    }

    /// Four 8px layers; row 0 and 7 of each layer are its frame.
    fn gauge_source(width: u32) -> Region {
        Region::from_fn(width, 32, |_, y| {
            let layer = y / 8;
            let role = match y % 8 {
                0 => 0,
                7 => 2,
                _ => 1,
            };
            layer_colour(layer, role)
        })
    }

    #[test]
    fn test_standard_layout() {
        let layout = GaugeLayout::standard();
        assert_eq!(layout.layers.len(), 4);
        assert_eq!(layout.layers[2].interpolation, Interpolation::Nearest);
        assert_eq!(layout.layer_height(32).unwrap(), 8);
        assert!(layout.layer_height(30).is_err());
    }

    #[test]
    fn test_scale_gauge_tall() {
        let layout = GaugeLayout::standard();
        let out = scale_gauge(&gauge_source(60), &layout, 120, 64).unwrap();
        assert_eq!(out.size(), (120, 64));

        for layer in 0..4 {
            let top = layer * 16;
            for x in [0, 59, 119] {
                assert_eq!(out.get(x, top), Some(layer_colour(layer, 0)));
                assert_eq!(out.get(x, top + 1), Some(layer_colour(layer, 1)));
                assert_eq!(out.get(x, top + 14), Some(layer_colour(layer, 1)));
                assert_eq!(out.get(x, top + 15), Some(layer_colour(layer, 2)));
            }
        }
    }

    #[test]
    fn test_scale_gauge_wide_only() {
        let layout = GaugeLayout::standard();
        let out = scale_gauge(&gauge_source(60), &layout, 150, 32).unwrap();
        assert_eq!(out.size(), (150, 32));
        assert_eq!(out.get(149, 8), Some(layer_colour(1, 0)));
        assert_eq!(out.get(75, 15), Some(layer_colour(1, 2)));
    }

    #[test]
    fn test_scale_gauge_rejects_uneven_target() {
        let layout = GaugeLayout::standard();
        assert!(scale_gauge(&gauge_source(60), &layout, 120, 63).is_err());
    }

    #[test]
    fn test_sized_file_name() {
        assert_eq!(
            sized_file_name("gauge_inlay_thorne01", 120, true, "tga"),
            "gauge_inlay120t_thorne01.tga"
        );
        assert_eq!(
            sized_file_name("gauge_inlay_thorne01", 150, false, "tga"),
            "gauge_inlay150_thorne01.tga"
        );
        assert_eq!(sized_file_name("gauge", 120, true, "png"), "gauge120t.png");
    }

    #[test]
    fn test_load_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.yaml");
        std::fs::write(
            &path,
            "layers:\n  - {name: back, interpolation: smooth}\n  - {name: lines, interpolation: nearest}\n",
        )
        .unwrap();
        let layout = GaugeLayout::load(&path).unwrap();
        assert_eq!(layout.layers.len(), 2);
        assert_eq!(layout.border_width, 1);
        assert_eq!(layout.layers[0].interpolation, Interpolation::Smooth);
    }
}
