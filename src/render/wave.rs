use kurbo::{Arc, BezPath, Point, Vec2};

use crate::scene::model::Waveform;

/// Flattening tolerance for arc segments, in pixels.
const ARC_TOLERANCE: f64 = 0.1;

/// Path builder that tracks the current point, as a canvas 2D context does.
struct Pen {
    path: BezPath,
    current: Point,
}

impl Pen {
    fn new() -> Self {
        Self {
            path: BezPath::new(),
            current: Point::ZERO,
        }
    }

    fn move_to(&mut self, p: Point) {
        self.path.move_to(p);
        self.current = p;
    }

    fn line_to(&mut self, p: Point) {
        self.path.line_to(p);
        self.current = p;
    }

    /// Canvas `arcTo`: a straight segment to the first tangent point, then the arc of radius `r`
    /// tangent to the lines `current -> p1` and `p1 -> p2`. Degenerate input becomes a line to `p1`.
    fn arc_to(&mut self, p1: Point, p2: Point, r: f64) {
        let d0 = self.current - p1;
        let d2 = p2 - p1;
        let (len0, len2) = (d0.hypot(), d2.hypot());
        if r <= 0.0 || len0 == 0.0 || len2 == 0.0 {
            self.line_to(p1);
            return;
        }
        let u0 = d0 / len0;
        let u2 = d2 / len2;
        let cos = u0.dot(u2).clamp(-1.0, 1.0);
        let half = cos.acos() / 2.0;
        if half.sin().abs() < 1e-9 || half.tan().abs() < 1e-9 {
            self.line_to(p1);
            return;
        }

        let reach = r / half.tan();
        let t0 = p1 + u0 * reach;
        let t2 = p1 + u2 * reach;
        let bisector = (u0 + u2).normalize();
        let center = p1 + bisector * (r / half.sin());

        let start = (t0 - center).atan2();
        let end = (t2 - center).atan2();
        let mut sweep = end - start;
        // The tangent arc is always the minor one.
        if sweep > std::f64::consts::PI {
            sweep -= std::f64::consts::TAU;
        } else if sweep < -std::f64::consts::PI {
            sweep += std::f64::consts::TAU;
        }

        self.line_to(t0);
        let arc = Arc {
            center,
            radii: Vec2::new(r, r),
            start_angle: start,
            sweep_angle: sweep,
            x_rotation: 0.0,
        };
        self.path.extend(arc.append_iter(ARC_TOLERANCE));
        self.current = t2;
    }
}

/// Smallest tile size in pixels that [`wave_path`] will tile.
pub const MIN_WAVE_SIZE: f64 = 0.5;

/// Stroke path of a wave row tiled across the surface.
///
/// The row starts left of the surface at `-x - 2*size`, shifted right by `offset * 2*size` so
/// that advancing `offset` over `[0, 1)` scrolls one full period, and runs until it passes
/// `surface_width + size`. Whole periods lying entirely left of the surface are skipped. Sizes
/// below [`MIN_WAVE_SIZE`] produce an empty path.
pub fn wave_path(
    waveform: Waveform,
    x: f64,
    y: f64,
    size: f64,
    surface_width: f64,
    offset: f64,
) -> BezPath {
    let mut pen = Pen::new();
    let finite = x.is_finite() && surface_width.is_finite();
    if !(finite && size.is_finite() && size >= MIN_WAVE_SIZE) {
        return pen.path;
    }

    let period = size * 2.0;
    let end = surface_width + size;
    let mut cx = -x - period + offset * period;
    if cx < -2.0 * period {
        cx += ((-period - cx) / period).floor() * period;
    }
    let mut cy = y;

    match waveform {
        Waveform::Sine => {
            pen.move_to(Point::new(cx, cy));
            while cx < end {
                pen.arc_to(
                    Point::new(cx, cy - size),
                    Point::new(cx + size, cy + size),
                    size / 2.0,
                );
                pen.arc_to(
                    Point::new(cx + size, cy + size),
                    Point::new(cx + size * 2.0, cy - size),
                    size / 2.0,
                );
                cx += size * 2.0;
            }
        }
        Waveform::Triangle => {
            while cx < end {
                pen.move_to(Point::new(cx, cy));
                cx += size;
                cy += size;
                pen.line_to(Point::new(cx, cy));
                cx += size;
                cy -= size;
                pen.line_to(Point::new(cx, cy));
            }
        }
        Waveform::Square => {
            while cx < end {
                for (dx, dy) in [(size, 0.0), (0.0, size), (size, 0.0), (0.0, -size)] {
                    pen.move_to(Point::new(cx, cy));
                    cx += dx;
                    cy += dy;
                    pen.line_to(Point::new(cx, cy));
                }
            }
        }
    }

    pen.path
}

/// Advance an animation phase by one frame at `fps`, wrapping to `0` once it reaches `1`.
pub fn advance_offset(offset: f64, fps: f64) -> f64 {
    if !(fps.is_finite() && fps > 0.0) {
        return offset;
    }
    let next = offset + 1.0 / fps;
    if next >= 1.0 { 0.0 } else { next }
}

#[cfg(test)]
#[path = "../../tests/unit/render/wave.rs"]
mod tests;
