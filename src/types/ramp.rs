//! Directional colour ramps for tinting grayscale art.
//!
//! A ramp has two or three stops and a direction. Three-stop ramps are two
//! linear segments joined at the middle stop, not a spline.
//!
//! # Example
//!
//! ```yaml
//! presets:
//!   gold:
//!     top: "#DEBE5C"
//!     bottom: [72, 55, 18]
//!   flag:
//!     top: "#C00"
//!     middle: "#FFF"
//!     bottom: "#00C"
//!     direction: diagonal_tl
//!   plain: direct
//! ```

use std::fmt;

use palette::{Mix, Srgb};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AtlasError, Result};

use super::Colour;

/// Which way a ramp runs across a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RampDirection {
    /// Top to bottom.
    #[default]
    Vertical,
    /// Left to right.
    Horizontal,
    /// Top-left to bottom-right.
    DiagonalTl,
    /// Top-right to bottom-left.
    DiagonalTr,
}

impl RampDirection {
    /// Parse a direction name as written in configs.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "vertical" => Some(Self::Vertical),
            "horizontal" => Some(Self::Horizontal),
            "diagonal_tl" | "diagonal_tlbr" => Some(Self::DiagonalTl),
            "diagonal_tr" | "diagonal_trbl" => Some(Self::DiagonalTr),
            _ => None,
        }
    }

    /// Gradient position in `[0, 1]` of pixel (`x`, `y`) in a `width` x `height` region.
    pub fn position(self, x: u32, y: u32, width: u32, height: u32) -> f32 {
        let span_x = width.saturating_sub(1).max(1) as f32;
        let span_y = height.saturating_sub(1).max(1) as f32;
        let fx = x as f32 / span_x;
        let fy = y as f32 / span_y;
        let t = match self {
            Self::Vertical => fy,
            Self::Horizontal => fx,
            Self::DiagonalTl => (fx + fy) / 2.0,
            Self::DiagonalTr => {
                let mirrored = width.saturating_sub(1).saturating_sub(x) as f32 / span_x;
                (mirrored + fy) / 2.0
            }
        };
        t.clamp(0.0, 1.0)
    }
}

impl fmt::Display for RampDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::DiagonalTl => "diagonal_tl",
            Self::DiagonalTr => "diagonal_tr",
        };
        f.write_str(name)
    }
}

/// One colour stop of a ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampStop {
    pub position: f32,
    #[serde(alias = "color")]
    pub colour: Colour,
}

impl RampStop {
    pub const fn new(position: f32, colour: Colour) -> Self {
        Self { position, colour }
    }
}

/// A validated 2- or 3-stop directional ramp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorRamp {
    stops: Vec<RampStop>,
    direction: RampDirection,
}

impl ColorRamp {
    /// Build a ramp from explicit stops, checking count and ordering.
    pub fn new(stops: Vec<RampStop>, direction: RampDirection) -> Result<Self> {
        if !(2..=3).contains(&stops.len()) {
            return Err(ramp_error(format!(
                "a ramp needs 2 or 3 stops, got {}",
                stops.len()
            )));
        }
        for stop in &stops {
            if !stop.position.is_finite() || !(0.0..=1.0).contains(&stop.position) {
                return Err(ramp_error(format!(
                    "stop position {} is outside [0, 1]",
                    stop.position
                )));
            }
        }
        if stops.windows(2).any(|w| w[0].position >= w[1].position) {
            return Err(ramp_error(
                "stops must be sorted by strictly increasing position".to_string(),
            ));
        }
        Ok(Self { stops, direction })
    }

    /// Two-stop ramp from `top` (t = 0) to `bottom` (t = 1).
    pub fn two_stop(top: Colour, bottom: Colour, direction: RampDirection) -> Self {
        Self {
            stops: vec![RampStop::new(0.0, top), RampStop::new(1.0, bottom)],
            direction,
        }
    }

    /// Three-stop ramp with the middle colour at t = 0.5.
    pub fn three_stop(top: Colour, middle: Colour, bottom: Colour, direction: RampDirection) -> Self {
        Self {
            stops: vec![
                RampStop::new(0.0, top),
                RampStop::new(0.5, middle),
                RampStop::new(1.0, bottom),
            ],
            direction,
        }
    }

    pub fn stops(&self) -> &[RampStop] {
        &self.stops
    }

    pub fn direction(&self) -> RampDirection {
        self.direction
    }

    pub fn with_direction(mut self, direction: RampDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Ramp colour at position `t`, channels in `[0, 255]`.
    pub fn colour_at(&self, t: f32) -> [f32; 3] {
        let t = t.clamp(0.0, 1.0);
        let last = self.stops.len() - 2;
        let segment = self
            .stops
            .windows(2)
            .position(|w| t < w[1].position)
            .unwrap_or(last);
        let (a, b) = (self.stops[segment], self.stops[segment + 1]);
        let span = b.position - a.position;
        let s = ((t - a.position) / span).clamp(0.0, 1.0);

        let mixed = to_srgb(a.colour).mix(to_srgb(b.colour), s);
        [mixed.red * 255.0, mixed.green * 255.0, mixed.blue * 255.0]
    }
}

fn to_srgb(colour: Colour) -> Srgb<f32> {
    Srgb::new(
        colour.r as f32 / 255.0,
        colour.g as f32 / 255.0,
        colour.b as f32 / 255.0,
    )
}

fn ramp_error(message: String) -> AtlasError {
    AtlasError::Config {
        message,
        help: Some("Give `top` and `bottom` (and optionally `middle`), or a sorted `stops` list".to_string()),
    }
}

/// How foreground art is coloured before compositing.
#[derive(Debug, Clone, PartialEq)]
pub enum Tint {
    /// Pass the source through unchanged (art is already coloured).
    Direct,
    /// Recolour by luminance through a ramp.
    Ramp(ColorRamp),
}

impl Tint {
    /// Short label for status lines.
    pub fn label(&self) -> String {
        match self {
            Tint::Direct => "direct".to_string(),
            Tint::Ramp(ramp) => format!("{}-stop {}", ramp.stops().len(), ramp.direction()),
        }
    }
}

impl Serialize for Tint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Tint::Direct => serializer.serialize_str("direct"),
            Tint::Ramp(ramp) => ramp.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TintRepr {
    Keyword(String),
    Ramp(RampDef),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RampDef {
    #[serde(default)]
    stops: Option<Vec<RampStop>>,
    #[serde(default, alias = "top_color")]
    top: Option<Colour>,
    #[serde(default, alias = "middle_color")]
    middle: Option<Colour>,
    #[serde(default, alias = "bottom_color")]
    bottom: Option<Colour>,
    #[serde(default, alias = "type")]
    direction: Option<String>,
}

fn is_direct_keyword(name: &str) -> bool {
    matches!(name.trim().to_ascii_lowercase().as_str(), "direct" | "none")
}

impl TryFrom<TintRepr> for Tint {
    type Error = AtlasError;

    fn try_from(repr: TintRepr) -> Result<Self> {
        let def = match repr {
            TintRepr::Keyword(word) if is_direct_keyword(&word) => return Ok(Tint::Direct),
            TintRepr::Keyword(word) => {
                return Err(ramp_error(format!("unknown tint keyword '{}'", word)))
            }
            TintRepr::Ramp(def) => def,
        };

        let direction = match def.direction.as_deref() {
            None => RampDirection::default(),
            Some(name) if is_direct_keyword(name) => return Ok(Tint::Direct),
            Some(name) => RampDirection::from_name(name)
                .ok_or_else(|| ramp_error(format!("unknown ramp direction '{}'", name)))?,
        };

        let ramp = match (def.stops, def.top, def.middle, def.bottom) {
            (Some(stops), None, None, None) => ColorRamp::new(stops, direction)?,
            (None, Some(top), None, Some(bottom)) => ColorRamp::two_stop(top, bottom, direction),
            (None, Some(top), Some(middle), Some(bottom)) => {
                ColorRamp::three_stop(top, middle, bottom, direction)
            }
            _ => {
                return Err(ramp_error(
                    "a ramp is either a `stops` list or `top`/`bottom` colours".to_string(),
                ))
            }
        };
        Ok(Tint::Ramp(ramp))
    }
}

impl<'de> Deserialize<'de> for Tint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let repr = TintRepr::deserialize(deserializer)?;
        Tint::try_from(repr).map_err(serde::de::Error::custom)
    }
}
