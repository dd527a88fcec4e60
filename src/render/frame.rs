use crate::foundation::core::{premul_rgba8, unpremul_rgba8};
use crate::foundation::error::{AbstraktError, AbstraktResult};

/// An owned RGBA8 raster. Renderer output is premultiplied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Fully transparent premultiplied frame.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
            premultiplied: true,
        }
    }

    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> AbstraktResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(AbstraktError::render(format!(
                "frame buffer is {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            premultiplied: true,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Straight-alpha RGBA8 bytes, ready for PNG encoding.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            px.copy_from_slice(&unpremul_rgba8([px[0], px[1], px[2], px[3]]));
        }
        out
    }

    /// Re-encode straight RGBA8 bytes into premultiplied storage.
    pub fn from_straight_rgba8(width: u32, height: u32, mut data: Vec<u8>) -> AbstraktResult<Self> {
        for px in data.chunks_exact_mut(4) {
            px.copy_from_slice(&premul_rgba8([px[0], px[1], px[2], px[3]]));
        }
        Self::from_premul(width, height, data)
    }

    /// Resize by `factor` with a triangle filter. Premultiplied data is resampled as-is.
    pub fn downscale(&self, factor: f64) -> AbstraktResult<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(AbstraktError::snapshot(format!(
                "snapshot scale must be finite and > 0, got {factor}"
            )));
        }
        let w = ((f64::from(self.width) * factor).round() as u32).max(1);
        let h = ((f64::from(self.height) * factor).round() as u32).max(1);

        let img = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| AbstraktError::snapshot("frame buffer does not match its dimensions"))?;
        let small = image::imageops::resize(&img, w, h, image::imageops::FilterType::Triangle);

        Ok(Self {
            width: w,
            height: h,
            data: small.into_raw(),
            premultiplied: self.premultiplied,
        })
    }

    /// Encode as PNG (straight alpha).
    pub fn write_png(&self, path: &std::path::Path) -> AbstraktResult<()> {
        image::save_buffer_with_format(
            path,
            &self.to_straight_rgba8(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| AbstraktError::render(format!("write png '{}': {e}", path.display())))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
