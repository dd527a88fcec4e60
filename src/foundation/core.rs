use crate::foundation::error::{AbstraktError, AbstraktResult};

pub use kurbo::{BezPath, Point, Rect, Vec2};

/// Drawing surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Largest edge the CPU surface supports (`vello_cpu` pixmaps are `u16`-sized).
    pub const MAX_EDGE: u32 = u16::MAX as u32;

    pub fn new(width: u32, height: u32) -> AbstraktResult<Self> {
        if width == 0 || height == 0 {
            return Err(AbstraktError::validation("canvas width and height must be > 0"));
        }
        if width > Self::MAX_EDGE || height > Self::MAX_EDGE {
            return Err(AbstraktError::validation(format!(
                "canvas edges must be <= {}",
                Self::MAX_EDGE
            )));
        }
        Ok(Self { width, height })
    }

    pub fn min_dimension(self) -> f64 {
        f64::from(self.width.min(self.height))
    }

    pub fn bounds(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Scale both edges by `factor`, never collapsing below one pixel.
    pub fn scaled(self, factor: f64) -> Self {
        let scale = |v: u32| ((f64::from(v) * factor).round() as u32).max(1);
        Self {
            width: scale(self.width),
            height: scale(self.height),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> AbstraktResult<Self> {
        if den == 0 {
            return Err(AbstraktError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(AbstraktError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

pub(crate) fn premul_rgba8(px: [u8; 4]) -> [u8; 4] {
    let a = u16::from(px[3]);
    let premul = |c: u8| -> u8 { (((u16::from(c) * a) + 127) / 255) as u8 };
    [premul(px[0]), premul(px[1]), premul(px[2]), px[3]]
}

pub(crate) fn unpremul_rgba8(px: [u8; 4]) -> [u8; 4] {
    let a = u16::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let unpremul = |c: u8| -> u8 { ((u16::from(c) * 255 + a / 2) / a).min(255) as u8 };
    [unpremul(px[0]), unpremul(px[1]), unpremul(px[2]), px[3]]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
