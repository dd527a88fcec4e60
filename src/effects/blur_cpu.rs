use rayon::prelude::*;

use crate::foundation::error::{AbstraktError, AbstraktResult};
use crate::render::frame::FrameRGBA;

/// Fixed-point scale of kernel weights.
const Q16_ONE: u32 = 1 << 16;

/// Kernel half-width covering three standard deviations.
pub fn radius_for_sigma(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (3.0 * sigma).ceil() as u32
}

/// Separable gaussian blur of a premultiplied frame. `sigma` is in pixels; `0` is a no-op.
pub fn blur_frame(frame: &FrameRGBA, sigma: f32) -> AbstraktResult<FrameRGBA> {
    let radius = radius_for_sigma(sigma);
    let data = blur_rgba8_premul(&frame.data, frame.width, frame.height, radius, sigma)?;
    Ok(FrameRGBA {
        width: frame.width,
        height: frame.height,
        data,
        premultiplied: frame.premultiplied,
    })
}

pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> AbstraktResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| AbstraktError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(AbstraktError::render(format!(
            "blur expects {expected_len} bytes for {width}x{height}, got {}",
            src.len()
        )));
    }
    if radius == 0 || width == 0 || height == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    convolve(src, &mut tmp, width, height, &kernel, Axis::Horizontal);
    convolve(&tmp, &mut out, width, height, &kernel, Axis::Vertical);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> AbstraktResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(AbstraktError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(AbstraktError::render("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * f64::from(Q16_ONE)).round().clamp(0.0, f64::from(Q16_ONE)) as u32)
        .collect();

    // Push rounding drift into the center tap so the weights sum to exactly one.
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = i64::from(Q16_ONE) - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, i64::from(Q16_ONE)) as u32;
    }

    Ok(weights)
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// One 1-D pass over all rows in parallel. Edge pixels are clamped.
fn convolve(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32], axis: Axis) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    let row_bytes = width as usize * 4;

    dst.par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as i32;
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let d = ki as i32 - radius;
                    let (sx, sy) = match axis {
                        Axis::Horizontal => ((x + d).clamp(0, w - 1), y),
                        Axis::Vertical => (x, (y + d).clamp(0, h - 1)),
                    };
                    let idx = ((sy * w + sx) as usize) * 4;
                    for (c, slot) in acc.iter_mut().enumerate() {
                        *slot += u64::from(kw) * u64::from(src[idx + c]);
                    }
                }
                let out = x as usize * 4;
                for (c, v) in acc.iter().enumerate() {
                    row[out + c] = q16_to_u8(*v);
                }
            }
        });
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur_cpu.rs"]
mod tests;
