use rand::Rng;

use crate::effects::blur_cpu::blur_frame;
use crate::effects::color_matrix::ColorMatrix;
use crate::foundation::error::{AbstraktError, AbstraktResult};
use crate::random::sampling::{random_float, uniform};
use crate::render::frame::FrameRGBA;

/// Post-process filter applied to the presented frame. Serializes as its CSS text.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Filter {
    #[default]
    None,
    Blur {
        px: f32,
    },
    Brightness(f32),
    Contrast(f32),
    Grayscale(f32),
    HueRotate {
        deg: f32,
    },
    Invert(f32),
    Opacity(f32),
    Saturate(f32),
    Sepia(f32),
}

/// Largest blur radius accepted from text and applied to a frame.
pub const MAX_BLUR_PX: f32 = 100.0;

/// Names of the filters a random pick chooses between.
pub const FILTER_CATALOG: [&str; 9] = [
    "blur",
    "brightness",
    "contrast",
    "grayscale",
    "hue-rotate",
    "invert",
    "opacity",
    "saturate",
    "sepia",
];

impl Filter {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Blur { .. } => "blur",
            Self::Brightness(_) => "brightness",
            Self::Contrast(_) => "contrast",
            Self::Grayscale(_) => "grayscale",
            Self::HueRotate { .. } => "hue-rotate",
            Self::Invert(_) => "invert",
            Self::Opacity(_) => "opacity",
            Self::Saturate(_) => "saturate",
            Self::Sepia(_) => "sepia",
        }
    }

    /// Uniform pick from [`FILTER_CATALOG`] with a random magnitude: blur `0..=10` px,
    /// hue-rotate `0..=360` deg, everything else `[0, 1)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let idx = rng.gen_range(0..FILTER_CATALOG.len());
        match FILTER_CATALOG[idx] {
            "blur" => Self::Blur {
                px: uniform(rng, 0, 10) as f32,
            },
            "hue-rotate" => Self::HueRotate {
                deg: uniform(rng, 0, 360) as f32,
            },
            name => {
                // Narrowing can round up to 1.0.
                let v = (random_float(rng, 0.0, 1.0) as f32).min(1.0 - f32::EPSILON);
                match name {
                    "brightness" => Self::Brightness(v),
                    "contrast" => Self::Contrast(v),
                    "grayscale" => Self::Grayscale(v),
                    "invert" => Self::Invert(v),
                    "opacity" => Self::Opacity(v),
                    "saturate" => Self::Saturate(v),
                    _ => Self::Sepia(v),
                }
            }
        }
    }

    /// Apply to a frame, returning a new frame. `None` returns an unchanged copy.
    #[tracing::instrument(level = "debug", skip(frame), fields(filter = %self))]
    pub fn apply(&self, frame: &FrameRGBA) -> AbstraktResult<FrameRGBA> {
        let matrix = match *self {
            Self::None => return Ok(frame.clone()),
            Self::Blur { px } => return blur_frame(frame, px.min(MAX_BLUR_PX)),
            Self::Brightness(a) => ColorMatrix::brightness(a),
            Self::Contrast(a) => ColorMatrix::contrast(a),
            Self::Grayscale(a) => ColorMatrix::grayscale(a),
            Self::HueRotate { deg } => ColorMatrix::hue_rotate(deg),
            Self::Invert(a) => ColorMatrix::invert(a),
            Self::Opacity(a) => ColorMatrix::opacity(a),
            Self::Saturate(a) => ColorMatrix::saturate(a),
            Self::Sepia(a) => ColorMatrix::sepia(a),
        };
        Ok(matrix.apply(frame))
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::None => f.write_str("none"),
            Self::Blur { px } => write!(f, "blur({px}px)"),
            Self::HueRotate { deg } => write!(f, "hue-rotate({deg}deg)"),
            Self::Brightness(v)
            | Self::Contrast(v)
            | Self::Grayscale(v)
            | Self::Invert(v)
            | Self::Opacity(v)
            | Self::Saturate(v)
            | Self::Sepia(v) => write!(f, "{}({v})", self.name()),
        }
    }
}

impl std::str::FromStr for Filter {
    type Err = AbstraktError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_filter(s)
    }
}

impl From<Filter> for String {
    fn from(f: Filter) -> Self {
        f.to_string()
    }
}

impl TryFrom<String> for Filter {
    type Error = AbstraktError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_filter(&s)
    }
}

/// Parse CSS filter text such as `blur(4px)`, `hue-rotate(90deg)`, `sepia(0.5)`, `sepia(50%)`
/// or `none`.
pub fn parse_filter(input: &str) -> AbstraktResult<Filter> {
    let s = input.trim().to_ascii_lowercase();
    if s.is_empty() || s == "none" {
        return Ok(Filter::None);
    }

    let (name, rest) = s
        .split_once('(')
        .ok_or_else(|| AbstraktError::validation(format!("malformed filter '{input}'")))?;
    let arg = rest
        .strip_suffix(')')
        .ok_or_else(|| AbstraktError::validation(format!("malformed filter '{input}'")))?
        .trim();
    let name = name.trim();

    match name {
        "blur" => {
            let px = parse_with_unit(arg, "px", input)?;
            if px > MAX_BLUR_PX {
                return Err(AbstraktError::validation(format!(
                    "blur radius in '{input}' exceeds {MAX_BLUR_PX}px"
                )));
            }
            Ok(Filter::Blur { px })
        }
        "hue-rotate" => Ok(Filter::HueRotate {
            deg: parse_with_unit(arg, "deg", input)?,
        }),
        "brightness" => Ok(Filter::Brightness(parse_amount(arg, input)?)),
        "contrast" => Ok(Filter::Contrast(parse_amount(arg, input)?)),
        "grayscale" => Ok(Filter::Grayscale(parse_amount(arg, input)?)),
        "invert" => Ok(Filter::Invert(parse_amount(arg, input)?)),
        "opacity" => Ok(Filter::Opacity(parse_amount(arg, input)?)),
        "saturate" => Ok(Filter::Saturate(parse_amount(arg, input)?)),
        "sepia" => Ok(Filter::Sepia(parse_amount(arg, input)?)),
        _ => Err(AbstraktError::validation(format!(
            "unknown filter kind '{name}'"
        ))),
    }
}

fn parse_number(text: &str, input: &str) -> AbstraktResult<f32> {
    let v: f32 = text
        .trim()
        .parse()
        .map_err(|_| AbstraktError::validation(format!("bad filter magnitude in '{input}'")))?;
    if !v.is_finite() || v < 0.0 {
        return Err(AbstraktError::validation(format!(
            "filter magnitude must be finite and >= 0 in '{input}'"
        )));
    }
    Ok(v)
}

/// A number with a required unit; a bare `0` is accepted as CSS allows.
fn parse_with_unit(arg: &str, unit: &str, input: &str) -> AbstraktResult<f32> {
    match arg.strip_suffix(unit) {
        Some(num) => parse_number(num, input),
        None if arg == "0" => Ok(0.0),
        None => Err(AbstraktError::validation(format!(
            "filter '{input}' needs a '{unit}' unit"
        ))),
    }
}

fn parse_amount(arg: &str, input: &str) -> AbstraktResult<f32> {
    match arg.strip_suffix('%') {
        Some(pct) => Ok(parse_number(pct, input)? / 100.0),
        None => parse_number(arg, input),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filter.rs"]
mod tests;
