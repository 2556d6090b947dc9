//! HSL colors and their RGB conversion.

use rand::Rng;
use std::ops::Range;

/// Hue, saturation and lightness, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Hsl {
    pub fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Draw each channel uniformly from its range.
    pub fn random_in<R: Rng + ?Sized>(
        rng: &mut R,
        hue: Range<f32>,
        saturation: Range<f32>,
        lightness: Range<f32>,
    ) -> Self {
        Self {
            hue: lerp(&hue, rng.random()),
            saturation: lerp(&saturation, rng.random()),
            lightness: lerp(&lightness, rng.random()),
        }
    }

    /// Convert to RGB in `[0, 1]`. Hue wraps; saturation and lightness clamp.
    pub fn to_rgb(self) -> [f32; 3] {
        let h = self.hue.rem_euclid(1.0);
        let s = self.saturation.clamp(0.0, 1.0);
        let l = self.lightness.clamp(0.0, 1.0);

        if s == 0.0 {
            return [l, l, l];
        }

        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        [
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        ]
    }
}

/// `range.start + t * (range.end - range.start)`.
pub(crate) fn lerp(range: &Range<f32>, t: f32) -> f32 {
    range.start + t * (range.end - range.start)
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}
