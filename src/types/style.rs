//! Per-cell styling and where each styled value came from.
//!
//! A cell's style is layered: built-in values, then the config's `defaults`
//! block, then a named preset, then the cell's own overrides. Every resolved
//! field carries the [`StyleSource`] that supplied it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CellAddress, Colour, ColorRamp, RampDirection, StripSpec, Tint};

/// How foreground art is fitted into its destination cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale the whole source cell, transparent padding included.
    #[default]
    Tile,
    /// Scale only the bounding box of non-transparent pixels.
    Visible,
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitMode::Tile => write!(f, "tile"),
            FitMode::Visible => write!(f, "visible"),
        }
    }
}

/// Grayscale conversion applied to source art before tinting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneMode {
    #[default]
    Grayscale,
    /// Invert the colours, then convert to grayscale.
    #[serde(alias = "invert")]
    InvertGrayscale,
}

/// Tone preparation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    #[serde(default)]
    pub mode: ToneMode,
    /// Contrast factor around the mean opaque luminance (1.0 = unchanged).
    #[serde(default = "unit")]
    pub contrast: f32,
    /// Brightness multiplier (1.0 = unchanged).
    #[serde(default = "unit")]
    pub brightness: f32,
}

fn unit() -> f32 {
    1.0
}

impl Default for Tone {
    fn default() -> Self {
        Self {
            mode: ToneMode::Grayscale,
            contrast: 1.0,
            brightness: 1.0,
        }
    }
}

/// The layer that supplied a resolved style value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleSource {
    /// Hard-coded fallback.
    Builtin,
    /// The config's `defaults` block.
    Default,
    /// A named preset from the `presets` table.
    Preset,
    /// The cell's own declaration.
    Override,
}

impl StyleSource {
    /// One-letter tag for compact status lines.
    pub fn letter(self) -> char {
        match self {
            StyleSource::Builtin => 'b',
            StyleSource::Default => 'd',
            StyleSource::Preset => 'p',
            StyleSource::Override => 'o',
        }
    }
}

impl fmt::Display for StyleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleSource::Builtin => write!(f, "builtin"),
            StyleSource::Default => write!(f, "default"),
            StyleSource::Preset => write!(f, "preset"),
            StyleSource::Override => write!(f, "override"),
        }
    }
}

/// A value tagged with the layer it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sourced<T> {
    pub value: T,
    pub source: StyleSource,
}

impl<T> Sourced<T> {
    pub fn new(value: T, source: StyleSource) -> Self {
        Self { value, source }
    }

    pub fn builtin(value: T) -> Self {
        Self::new(value, StyleSource::Builtin)
    }

    /// Replace the value if `candidate` is set, recording `source`.
    pub fn layer(&mut self, candidate: Option<T>, source: StyleSource) {
        if let Some(value) = candidate {
            self.value = value;
            self.source = source;
        }
    }
}

/// Optional style fields as written in a config layer.
///
/// Used both for the `defaults` block and inline on each cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleOverrides {
    /// Name of a preset in the `presets` table.
    #[serde(default, alias = "gradient", skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    /// Inline tint; wins over `preset` within the same layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tint: Option<Tint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_mode: Option<FitMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_y: Option<i32>,
    #[serde(default, alias = "item_opacity", skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    /// Background cell (1-based) in the background sheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<CellAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    /// Keep a crisp frame when the fit resizes the art.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip: Option<StripSpec>,
}

impl StyleOverrides {
    /// Names of the fields this layer sets.
    pub fn set_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.preset.is_some() {
            fields.push("preset");
        }
        if self.tint.is_some() {
            fields.push("tint");
        }
        if self.fit_size.is_some() {
            fields.push("fit_size");
        }
        if self.fit_mode.is_some() {
            fields.push("fit_mode");
        }
        if self.offset_x.is_some() {
            fields.push("offset_x");
        }
        if self.offset_y.is_some() {
            fields.push("offset_y");
        }
        if self.opacity.is_some() {
            fields.push("opacity");
        }
        if self.background.is_some() {
            fields.push("background");
        }
        if self.tone.is_some() {
            fields.push("tone");
        }
        if self.strip.is_some() {
            fields.push("strip");
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.set_fields().is_empty()
    }
}

/// Fully resolved style for one output cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellStyle {
    /// Preset name the tint was taken from, if any.
    pub preset: Option<String>,
    pub tint: Sourced<Tint>,
    pub fit_size: Sourced<u32>,
    pub fit_mode: Sourced<FitMode>,
    pub offset_x: Sourced<i32>,
    pub offset_y: Sourced<i32>,
    pub opacity: Sourced<f32>,
    pub background: Sourced<CellAddress>,
    pub tone: Sourced<Option<Tone>>,
    pub strip: Sourced<Option<StripSpec>>,
}

impl CellStyle {
    /// The hard-coded bottom layer.
    pub fn builtin() -> Self {
        Self {
            preset: None,
            tint: Sourced::builtin(Tint::Ramp(ColorRamp::two_stop(
                Colour::rgb(220, 200, 100),
                Colour::rgb(180, 160, 80),
                RampDirection::Vertical,
            ))),
            fit_size: Sourced::builtin(36),
            fit_mode: Sourced::builtin(FitMode::Tile),
            offset_x: Sourced::builtin(0),
            offset_y: Sourced::builtin(-1),
            opacity: Sourced::builtin(0.92),
            background: Sourced::builtin(CellAddress::new(1, 1)),
            tone: Sourced::builtin(None),
            strip: Sourced::builtin(None),
        }
    }

    /// Apply every non-tint field set in `layer`.
    ///
    /// Tint and preset resolution need the preset table and live in the
    /// resolver.
    pub fn layer_fields(&mut self, layer: &StyleOverrides, source: StyleSource) {
        self.fit_size.layer(layer.fit_size, source);
        self.fit_mode.layer(layer.fit_mode, source);
        self.offset_x.layer(layer.offset_x, source);
        self.offset_y.layer(layer.offset_y, source);
        self.opacity.layer(layer.opacity, source);
        self.background.layer(layer.background, source);
        self.tone.layer(layer.tone.map(Some), source);
        self.strip.layer(layer.strip.map(Some), source);
    }

    /// (field, source) pairs in a stable order, for reports.
    pub fn field_sources(&self) -> Vec<(&'static str, StyleSource)> {
        vec![
            ("tint", self.tint.source),
            ("fit_size", self.fit_size.source),
            ("fit_mode", self.fit_mode.source),
            ("offset_x", self.offset_x.source),
            ("offset_y", self.offset_y.source),
            ("opacity", self.opacity.source),
            ("background", self.background.source),
            ("tone", self.tone.source),
            ("strip", self.strip.source),
        ]
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_sources() {
        let style = CellStyle::builtin();
        assert!(style
            .field_sources()
            .iter()
            .all(|(_, s)| *s == StyleSource::Builtin));
        assert_eq!(style.fit_size.value, 36);
        assert_eq!(style.offset_y.value, -1);
    }

    #[test]
    fn test_layer_fields_records_source() {
        let mut style = CellStyle::builtin();
        let layer = StyleOverrides {
            fit_size: Some(30),
            opacity: Some(0.5),
            ..Default::default()
        };
        style.layer_fields(&layer, StyleSource::Override);

        assert_eq!(style.fit_size, Sourced::new(30, StyleSource::Override));
        assert_eq!(style.opacity, Sourced::new(0.5, StyleSource::Override));
        assert_eq!(style.fit_mode.source, StyleSource::Builtin);
    }

    #[test]
    fn test_overrides_deserialize_with_aliases() {
        let layer: StyleOverrides = serde_yaml::from_str(
            "gradient: gold\nitem_opacity: 0.8\nfit_mode: visible\nbackground: {row: 2, col: 3}",
        )
        .unwrap();
        assert_eq!(layer.preset.as_deref(), Some("gold"));
        assert_eq!(layer.opacity, Some(0.8));
        assert_eq!(layer.fit_mode, Some(FitMode::Visible));
        assert_eq!(layer.background, Some(CellAddress::new(2, 3)));
        assert_eq!(
            layer.set_fields(),
            vec!["preset", "fit_mode", "opacity", "background"]
        );
    }

    #[test]
    fn test_strip_layers_like_other_fields() {
        let mut style = CellStyle::builtin();
        assert_eq!(style.strip, Sourced::builtin(None));

        let layer: StyleOverrides =
            serde_yaml::from_str("strip: { border_width: 2, interpolation: nearest }").unwrap();
        assert_eq!(layer.set_fields(), vec!["strip"]);
        style.layer_fields(&layer, StyleSource::Default);

        assert_eq!(
            style.strip,
            Sourced::new(
                Some(StripSpec::new(2, crate::types::Interpolation::Nearest)),
                StyleSource::Default
            )
        );
        assert!(style.field_sources().contains(&("strip", StyleSource::Default)));
    }

    #[test]
    fn test_tone_defaults() {
        let tone: Tone = serde_yaml::from_str("mode: invert").unwrap();
        assert_eq!(tone.mode, ToneMode::InvertGrayscale);
        assert_eq!(tone.contrast, 1.0);
        assert_eq!(tone.brightness, 1.0);
    }

    #[test]
    fn test_source_precedence_order() {
        assert!(StyleSource::Builtin < StyleSource::Default);
        assert!(StyleSource::Default < StyleSource::Preset);
        assert!(StyleSource::Preset < StyleSource::Override);
    }
}
