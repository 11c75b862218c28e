//! Tone preparation: turn coloured art into grayscale suitable for tinting.

use crate::types::{Colour, Tone, ToneMode};

use super::Region;

/// Rec.601 luma of an RGB triple, in `[0, 255]`.
fn luma(c: Colour) -> f32 {
    c.r as f32 * 0.299 + c.g as f32 * 0.587 + c.b as f32 * 0.114
}

/// Convert to grayscale (optionally inverted) and apply contrast and brightness.
///
/// Contrast pivots around the mean luminance of the opaque pixels. Alpha is
/// preserved; fully transparent pixels come out as `(0, 0, 0, 0)`.
pub fn apply_tone(region: &Region, tone: &Tone) -> Region {
    let (width, height) = region.size();

    let gray = |c: Colour| -> f32 {
        let l = luma(c);
        match tone.mode {
            ToneMode::Grayscale => l,
            ToneMode::InvertGrayscale => 255.0 - l,
        }
    };

    let mut sum = 0.0f64;
    let mut count = 0u64;
    for y in 0..height {
        for x in 0..width {
            if let Some(c) = region.get(x, y).filter(|c| c.a > 0) {
                sum += gray(c) as f64;
                count += 1;
            }
        }
    }
    let mean = if count == 0 { 0.0 } else { (sum / count as f64) as f32 };

    Region::from_fn(width, height, |x, y| {
        let c = region.get(x, y).unwrap_or(Colour::TRANSPARENT);
        if c.a == 0 {
            return Colour::TRANSPARENT;
        }
        let contrasted = mean + (gray(c) - mean) * tone.contrast;
        let v = (contrasted * tone.brightness).round().clamp(0.0, 255.0) as u8;
        Colour::new(v, v, v, c.a)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_preserves_alpha() {
        let source = Region::from_rows(&[vec![
            Colour::new(255, 0, 0, 128),
            Colour::new(0, 255, 0, 0),
        ]]);
        let out = apply_tone(&source, &Tone::default());
        // 255 * 0.299 = 76.2
        assert_eq!(out.get(0, 0), Some(Colour::new(76, 76, 76, 128)));
        assert_eq!(out.get(1, 0), Some(Colour::TRANSPARENT));
    }

    #[test]
    fn test_invert() {
        let source = Region::filled(2, 2, Colour::WHITE);
        let tone = Tone {
            mode: ToneMode::InvertGrayscale,
            ..Tone::default()
        };
        let out = apply_tone(&source, &tone);
        assert_eq!(out.get(1, 1), Some(Colour::BLACK));
    }

    #[test]
    fn test_contrast_pivots_on_mean() {
        let source = Region::from_rows(&[vec![
            Colour::rgb(100, 100, 100),
            Colour::rgb(200, 200, 200),
        ]]);
        let tone = Tone {
            contrast: 2.0,
            ..Tone::default()
        };
        let out = apply_tone(&source, &tone);
        // mean 150: 150 - 100 = 50, 150 + 100 = 250
        assert_eq!(out.get(0, 0).unwrap().r, 50);
        assert_eq!(out.get(1, 0).unwrap().r, 250);
    }

    #[test]
    fn test_brightness_clamps() {
        let source = Region::filled(1, 1, Colour::rgb(200, 200, 200));
        let tone = Tone {
            brightness: 2.0,
            ..Tone::default()
        };
        assert_eq!(apply_tone(&source, &tone).get(0, 0).unwrap().r, 255);
    }
}
