//! Per-pixel color filters expressed as an affine transform on straight RGB plus an alpha scale.
//!
//! Coefficients follow the CSS Filter Effects shorthand definitions.

use rayon::prelude::*;

use crate::foundation::core::{premul_rgba8, unpremul_rgba8};
use crate::render::frame::FrameRGBA;

const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorMatrix {
    pub rgb: [[f32; 3]; 3],
    pub offset: [f32; 3],
    pub alpha: f32,
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self {
            rgb: IDENTITY,
            offset: [0.0; 3],
            alpha: 1.0,
        }
    }
}

impl ColorMatrix {
    fn diagonal(scale: f32, offset: f32) -> Self {
        Self {
            rgb: [[scale, 0.0, 0.0], [0.0, scale, 0.0], [0.0, 0.0, scale]],
            offset: [offset; 3],
            alpha: 1.0,
        }
    }

    pub fn brightness(amount: f32) -> Self {
        Self::diagonal(amount.max(0.0), 0.0)
    }

    pub fn contrast(amount: f32) -> Self {
        let a = amount.max(0.0);
        Self::diagonal(a, 0.5 - 0.5 * a)
    }

    pub fn invert(amount: f32) -> Self {
        let a = amount.clamp(0.0, 1.0);
        Self::diagonal(1.0 - 2.0 * a, a)
    }

    pub fn opacity(amount: f32) -> Self {
        Self {
            alpha: amount.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    pub fn grayscale(amount: f32) -> Self {
        let k = 1.0 - amount.clamp(0.0, 1.0);
        Self {
            rgb: [
                [0.2126 + 0.7874 * k, 0.7152 - 0.7152 * k, 0.0722 - 0.0722 * k],
                [0.2126 - 0.2126 * k, 0.7152 + 0.2848 * k, 0.0722 - 0.0722 * k],
                [0.2126 - 0.2126 * k, 0.7152 - 0.7152 * k, 0.0722 + 0.9278 * k],
            ],
            ..Self::default()
        }
    }

    pub fn sepia(amount: f32) -> Self {
        let k = 1.0 - amount.clamp(0.0, 1.0);
        Self {
            rgb: [
                [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
                [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
                [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
            ],
            ..Self::default()
        }
    }

    pub fn saturate(amount: f32) -> Self {
        let s = amount.max(0.0);
        Self {
            rgb: [
                [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
            ],
            ..Self::default()
        }
    }

    pub fn hue_rotate(deg: f32) -> Self {
        let (sin, cos) = deg.to_radians().sin_cos();
        Self {
            rgb: [
                [
                    0.213 + cos * 0.787 - sin * 0.213,
                    0.715 - cos * 0.715 - sin * 0.715,
                    0.072 - cos * 0.072 + sin * 0.928,
                ],
                [
                    0.213 - cos * 0.213 + sin * 0.143,
                    0.715 + cos * 0.285 + sin * 0.140,
                    0.072 - cos * 0.072 - sin * 0.283,
                ],
                [
                    0.213 - cos * 0.213 - sin * 0.787,
                    0.715 - cos * 0.715 + sin * 0.715,
                    0.072 + cos * 0.928 + sin * 0.072,
                ],
            ],
            ..Self::default()
        }
    }

    /// Apply to one straight-alpha pixel.
    pub fn apply_straight(&self, px: [u8; 4]) -> [u8; 4] {
        let c = [
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
        ];
        let mut out = [0u8; 4];
        for (i, row) in self.rgb.iter().enumerate() {
            let v = row[0] * c[0] + row[1] * c[1] + row[2] * c[2] + self.offset[i];
            out[i] = to_u8(v);
        }
        out[3] = to_u8(f32::from(px[3]) / 255.0 * self.alpha);
        out
    }

    /// Apply to every pixel of a frame, returning a new frame in the same alpha mode.
    pub fn apply(&self, frame: &FrameRGBA) -> FrameRGBA {
        let premultiplied = frame.premultiplied;
        let mut data = frame.data.clone();
        data.par_chunks_mut(4).for_each(|px| {
            let src = [px[0], px[1], px[2], px[3]];
            let straight = if premultiplied {
                unpremul_rgba8(src)
            } else {
                src
            };
            let filtered = self.apply_straight(straight);
            let stored = if premultiplied {
                premul_rgba8(filtered)
            } else {
                filtered
            };
            px.copy_from_slice(&stored);
        });
        FrameRGBA {
            width: frame.width,
            height: frame.height,
            data,
            premultiplied,
        }
    }
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color_matrix.rs"]
mod tests;
