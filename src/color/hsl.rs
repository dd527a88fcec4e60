use rand::Rng;

use crate::random::sampling::from_center;

/// Hue wraps over `[0, HUE_SPAN)`.
pub const HUE_SPAN: i64 = 360;
/// Saturation, lightness and transparency wrap over `[0, PERCENT_SPAN)`.
pub const PERCENT_SPAN: i64 = 100;

/// Hue in degrees, saturation and lightness in percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

impl Hsl {
    pub fn new(h: u16, s: u8, l: u8) -> Self {
        Self { h, s, l }
    }

    /// Convert to straight (non-premultiplied) RGBA8 with the given opacity in `[0,1]`.
    pub fn to_rgba8(self, opacity: f32) -> [u8; 4] {
        let h = f64::from(self.h % 360) / 360.0;
        let s = f64::from(self.s.min(100)) / 100.0;
        let l = f64::from(self.l.min(100)) / 100.0;

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_channel(p, q, h + 1.0 / 3.0),
                hue_to_channel(p, q, h),
                hue_to_channel(p, q, h - 1.0 / 3.0),
            )
        };

        let to_u8 = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        let a = (f64::from(opacity.clamp(0.0, 1.0)) * 255.0).round() as u8;
        [to_u8(r), to_u8(g), to_u8(b), a]
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

impl std::fmt::Display for Hsl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

/// One color slot of a shape: an HSL color plus transparency in `[0,1)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorSample {
    pub color: Hsl,
    pub transparency: f32,
}

impl ColorSample {
    pub fn opaque(color: Hsl) -> Self {
        Self {
            color,
            transparency: 0.0,
        }
    }

    /// Canvas-style global alpha: `1 - transparency`.
    pub fn alpha(&self) -> f32 {
        (1.0 - self.transparency).clamp(0.0, 1.0)
    }

    /// Straight RGBA8 with the slot's own alpha.
    pub fn to_rgba8(&self) -> [u8; 4] {
        self.color.to_rgba8(self.alpha())
    }
}

/// Center of the palette: hue, saturation, lightness and transparency (all integer percent except
/// hue in degrees).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BaseColor {
    pub h: i64,
    pub s: i64,
    pub l: i64,
    pub t: i64,
}

/// Width of the sampling band around each [`BaseColor`] channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Variation {
    pub hv: i64,
    pub sv: i64,
    pub lv: i64,
    pub tv: i64,
}

/// Sample one color slot around `base` with band widths from `variation`.
///
/// Each channel is drawn with `from_center(base, variation / 2, ..)` and wrapped into its own
/// domain, so a wide band on a bright base can wrap round to a dark value.
pub fn sample_color<R: Rng + ?Sized>(
    rng: &mut R,
    base: BaseColor,
    variation: Variation,
) -> ColorSample {
    let h = from_center(rng, base.h, variation.hv / 2, 0, HUE_SPAN);
    let s = from_center(rng, base.s, variation.sv / 2, 0, PERCENT_SPAN);
    let l = from_center(rng, base.l, variation.lv / 2, 0, PERCENT_SPAN);
    let t = from_center(rng, base.t, variation.tv / 2, 0, PERCENT_SPAN);

    ColorSample {
        color: Hsl::new(h as u16, s as u8, l as u8),
        transparency: t as f32 / PERCENT_SPAN as f32,
    }
}

/// Sample `count` independent slots.
pub fn sample_colors<R: Rng + ?Sized>(
    rng: &mut R,
    base: BaseColor,
    variation: Variation,
    count: usize,
) -> Vec<ColorSample> {
    (0..count).map(|_| sample_color(rng, base, variation)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/color/hsl.rs"]
mod tests;
