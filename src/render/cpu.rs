use std::path::{Path, PathBuf};

use kurbo::Shape;
use vello_cpu::peniko::{self, BlendMode, ColorStop, Compose, Gradient, Mix};

use crate::color::hsl::{BaseColor, ColorSample, Variation};
use crate::effects::filter::Filter;
use crate::foundation::core::{BezPath, Canvas, Point, Rect};
use crate::foundation::error::{AbstraktError, AbstraktResult};
use crate::render::frame::FrameRGBA;
use crate::render::text::TextLayoutEngine;
use crate::render::wave::{advance_offset, wave_path};
use crate::scene::model::{
    Background, BlobNode, RenderKind, Scene, ShapeDescriptor, Waveform,
};

/// Per-node opacity of additive blob fields.
pub const BLOB_ALPHA: f32 = 0.35;
/// Flattening tolerance used when converting shapes to paths.
const PATH_TOLERANCE: f64 = 0.1;

/// What the last full draw consumed, replayed by animation frames.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderCache {
    pub items: Vec<ShapeDescriptor>,
    pub filter: Filter,
    pub background: Background,
    pub color_params: (BaseColor, Variation),
    pub font: Option<PathBuf>,
}

impl RenderCache {
    fn from_scene(scene: &Scene, font: Option<PathBuf>) -> Self {
        Self {
            items: scene.items.clone(),
            filter: scene.filter,
            background: scene.background.clone(),
            color_params: (scene.base_color, scene.variation),
            font,
        }
    }
}

/// Software renderer that owns the drawing surface.
///
/// The surface keeps the unfiltered image; the scene's filter is applied on demand by
/// [`CpuRenderer::presented`].
pub struct CpuRenderer {
    canvas: Canvas,
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    cache: Option<RenderCache>,
    text: TextLayoutEngine,
    font: Option<PathBuf>,
    filter: Filter,
    wave_offset: f64,
}

impl CpuRenderer {
    pub fn new(canvas: Canvas) -> AbstraktResult<Self> {
        let width = u16::try_from(canvas.width)
            .map_err(|_| AbstraktError::render("surface width exceeds u16"))?;
        let height = u16::try_from(canvas.height)
            .map_err(|_| AbstraktError::render("surface height exceeds u16"))?;
        Ok(Self {
            canvas,
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
            cache: None,
            text: TextLayoutEngine::new(),
            font: None,
            filter: Filter::None,
            wave_offset: 0.0,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Font used for text items in subsequent fresh draws. The file is loaded eagerly so a bad
    /// path surfaces here rather than mid-draw.
    pub fn set_font(&mut self, path: Option<&Path>) -> AbstraktResult<()> {
        if let Some(p) = path {
            self.text.load_font(p)?;
        }
        self.font = path.map(Path::to_path_buf);
        Ok(())
    }

    pub fn font(&self) -> Option<&Path> {
        self.font.as_deref()
    }

    pub fn cache(&self) -> Option<&RenderCache> {
        self.cache.as_ref()
    }

    pub fn invalidate_cache(&mut self) {
        self.cache = None;
    }

    pub fn wave_offset(&self) -> f64 {
        self.wave_offset
    }

    pub fn set_wave_offset(&mut self, offset: f64) {
        self.wave_offset = offset.rem_euclid(1.0);
    }

    /// Move waves forward by one frame at `fps`; wraps to `0` at `1`.
    pub fn advance_wave_offset(&mut self, fps: f64) -> f64 {
        self.wave_offset = advance_offset(self.wave_offset, fps);
        self.wave_offset
    }

    /// Filter stored by the last draw.
    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Draw a scene onto the surface.
    ///
    /// With `use_cache` and a cached draw whose filter equals `scene.filter`, the cached items,
    /// background and font are replayed instead of `scene`'s. Otherwise `scene` is drawn.
    ///
    /// Only draws with `use_cache == false` replace the cache; a cached draw that falls back to
    /// `scene` leaves the previous cache (or its absence) in place.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(items = scene.items.len(), use_cache, filter = %scene.filter)
    )]
    pub fn draw(&mut self, scene: &Scene, use_cache: bool) -> AbstraktResult<()> {
        match self.cache.take() {
            Some(cached) if use_cache && cached.filter == scene.filter => {
                tracing::trace!("replaying cached draw");
                let result = self.paint(&cached);
                self.cache = Some(cached);
                result
            }
            previous => {
                let fresh = RenderCache::from_scene(scene, self.font.clone());
                let result = self.paint(&fresh);
                self.cache = if use_cache { previous } else { Some(fresh) };
                result
            }
        }
    }

    /// Unfiltered copy of the surface.
    pub fn raster(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    /// Surface with the stored filter applied. The surface itself is left untouched.
    pub fn presented(&self) -> AbstraktResult<FrameRGBA> {
        self.filter.apply(&self.raster())
    }

    fn paint(&mut self, source: &RenderCache) -> AbstraktResult<()> {
        if let Some(font) = source.font.as_deref() {
            self.text.load_font(font)?;
        }

        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        paint_background(&mut ctx, self.canvas, &source.background);

        let mut skipped_text = 0usize;
        for item in &source.items {
            match item {
                ShapeDescriptor::Text { .. } if source.font.is_none() || !self.text.has_font() => {
                    skipped_text += 1;
                }
                _ => self.paint_item(&mut ctx, item)?,
            }
        }
        if skipped_text > 0 {
            tracing::warn!(skipped_text, "no font configured; text items were not drawn");
        }

        ctx.flush();
        clear_pixmap(&mut self.pixmap);
        ctx.render_to_pixmap(&mut self.pixmap);
        self.filter = source.filter;
        Ok(())
    }

    fn paint_item(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        item: &ShapeDescriptor,
    ) -> AbstraktResult<()> {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let Some(first) = item.colors().first().copied() else {
            return Ok(());
        };
        if let ShapeDescriptor::Blob { colors, nodes, .. } = item {
            paint_blob(ctx, item.render_kind(), colors, nodes);
            return Ok(());
        }

        let alpha = first.alpha();
        if alpha < 1.0 {
            ctx.push_opacity_layer(alpha);
        }
        let result = match item {
            ShapeDescriptor::Rectangle {
                render_kind,
                colors,
                x,
                y,
                width,
                height,
                weight,
            } => {
                let rect = Rect::new(*x, *y, x + width, y + height);
                let outline = rect.to_path(PATH_TOLERANCE);
                let gradient =
                    || linear_gradient(rect.origin(), Point::new(rect.x1, rect.y1), colors);
                paint_shape(ctx, &outline, *render_kind, first, *weight, gradient);
                Ok(())
            }
            ShapeDescriptor::Circle {
                render_kind,
                colors,
                x,
                y,
                radius,
                weight,
            } => {
                let circle = kurbo::Circle::new((*x, *y), radius.max(0.0));
                let outline = circle.to_path(PATH_TOLERANCE);
                let gradient = || radial_gradient(Point::new(*x, *y), *radius, colors);
                paint_shape(ctx, &outline, *render_kind, first, *weight, gradient);
                Ok(())
            }
            ShapeDescriptor::Text {
                render_kind,
                colors,
                x,
                y,
                size,
                text,
                weight,
            } => self.paint_text(
                ctx,
                TextParams {
                    kind: *render_kind,
                    origin: Point::new(*x, *y),
                    size: *size,
                    text,
                    weight: *weight,
                },
                colors,
            ),
            ShapeDescriptor::Wave {
                render_kind,
                colors,
                x,
                y,
                size,
                waveform,
                weight,
            } => {
                paint_wave(
                    ctx,
                    WaveParams {
                        kind: *render_kind,
                        waveform: *waveform,
                        origin: Point::new(*x, *y),
                        size: *size,
                        weight: *weight,
                        surface_width: f64::from(self.canvas.width),
                        offset: self.wave_offset,
                    },
                    colors,
                );
                Ok(())
            }
            ShapeDescriptor::Blob { .. } => Ok(()),
        };
        if alpha < 1.0 {
            ctx.pop_layer();
        }
        result
    }

    fn paint_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        p: TextParams<'_>,
        colors: &[ColorSample],
    ) -> AbstraktResult<()> {
        let TextParams {
            kind,
            origin,
            size,
            text,
            weight,
        } = p;
        if text.is_empty() || size <= 0.0 {
            return Ok(());
        }
        let line = self.text.shape_line(text, size as f32)?;
        let Some(font) = self.text.font_data() else {
            return Ok(());
        };

        match kind {
            RenderKind::Gradient => {
                let width = if line.advance > 0.0 {
                    f64::from(line.advance)
                } else {
                    size * text.chars().count() as f64
                };
                ctx.set_paint(linear_gradient(
                    Point::new(origin.x, origin.y - size),
                    Point::new(origin.x + width, origin.y + size),
                    colors,
                ));
            }
            _ => ctx.set_paint(solid(colors[0])),
        }

        let glyphs = line.glyphs.into_iter().map(|g| vello_cpu::Glyph {
            id: g.id,
            x: g.x + origin.x as f32,
            y: g.y + origin.y as f32,
        });
        if kind == RenderKind::Stroke {
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(weight.unwrap_or(1.0)));
            ctx.glyph_run(font)
                .font_size(line.font_size)
                .stroke_glyphs(glyphs);
        } else {
            ctx.glyph_run(font)
                .font_size(line.font_size)
                .fill_glyphs(glyphs);
        }
        Ok(())
    }
}

struct TextParams<'a> {
    kind: RenderKind,
    origin: Point,
    size: f64,
    text: &'a str,
    weight: Option<f64>,
}

struct WaveParams {
    kind: RenderKind,
    waveform: Waveform,
    origin: Point,
    size: f64,
    weight: f64,
    surface_width: f64,
    offset: f64,
}

fn paint_background(ctx: &mut vello_cpu::RenderContext, canvas: Canvas, bg: &Background) {
    let Some(first) = bg.colors.first().copied() else {
        return;
    };
    let bounds = canvas.bounds();
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    match bg.render_kind {
        RenderKind::Gradient => ctx.set_paint(linear_gradient(
            bounds.origin(),
            Point::new(bounds.x1, bounds.y1),
            &bg.colors,
        )),
        _ => ctx.set_paint(solid(first)),
    }
    ctx.fill_rect(&rect_to_cpu(bounds));
}

/// Fill, stroke or gradient-fill a closed outline.
fn paint_shape(
    ctx: &mut vello_cpu::RenderContext,
    outline: &BezPath,
    kind: RenderKind,
    first: ColorSample,
    weight: Option<f64>,
    gradient: impl FnOnce() -> Gradient,
) {
    let path = bezpath_to_cpu(outline);
    match kind {
        RenderKind::Fill => {
            ctx.set_paint(solid(first));
            ctx.fill_path(&path);
        }
        RenderKind::Stroke => {
            ctx.set_paint(solid(first));
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(weight.unwrap_or(1.0)));
            ctx.stroke_path(&path);
        }
        RenderKind::Gradient => {
            ctx.set_paint(gradient());
            ctx.fill_path(&path);
        }
    }
}

fn paint_wave(ctx: &mut vello_cpu::RenderContext, p: WaveParams, colors: &[ColorSample]) {
    let (x, y, size) = (p.origin.x, p.origin.y, p.size);
    match p.kind {
        RenderKind::Stroke => {
            let path = wave_path(p.waveform, x, y, size, p.surface_width, p.offset);
            ctx.set_paint(solid(colors[0]));
            ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(p.weight).with_caps(vello_cpu::kurbo::Cap::Round),
            );
            ctx.stroke_path(&bezpath_to_cpu(&path));
        }
        RenderKind::Fill | RenderKind::Gradient => {
            // Non-stroked waves draw a single motif glyph at their origin.
            let motif = match p.waveform {
                Waveform::Sine => kurbo::Circle::new((x, y), size).to_path(PATH_TOLERANCE),
                Waveform::Triangle => {
                    let mut path = BezPath::new();
                    path.move_to((x, y));
                    path.line_to((x + size, y + size / 2.0));
                    path.line_to((x, y + size));
                    path.close_path();
                    path
                }
                Waveform::Square => Rect::new(x, y, x + size, y + size).to_path(PATH_TOLERANCE),
            };
            if p.kind == RenderKind::Gradient {
                ctx.set_paint(evenly_spaced_gradient(
                    Point::new(x, y),
                    Point::new(x + size, y + size),
                    colors,
                ));
            } else {
                ctx.set_paint(solid(colors[0]));
            }
            ctx.fill_path(&bezpath_to_cpu(&motif));
        }
    }
}

/// Additive soft discs: each node is a radial fade composited with `Plus` at [`BLOB_ALPHA`].
fn paint_blob(
    ctx: &mut vello_cpu::RenderContext,
    kind: RenderKind,
    colors: &[ColorSample],
    nodes: &[BlobNode],
) {
    let Some(first) = colors.first().copied() else {
        return;
    };
    let outer = colors.get(1).copied().unwrap_or(first);
    let mid = colors.get(2).copied();

    for node in nodes {
        if node.radius <= 0.0 {
            continue;
        }
        let center = Point::new(node.x, node.y);
        let mut stops = vec![ColorStop::from((0.0, with_alpha(first, 1.0)))];
        match kind {
            RenderKind::Gradient => {
                if let Some(m) = mid {
                    stops.push(ColorStop::from((0.5, with_alpha(m, 0.2 * m.alpha()))));
                }
                stops.push(ColorStop::from((1.0, with_alpha(outer, 0.0))));
            }
            _ => stops.push(ColorStop::from((1.0, with_alpha(first, 0.0)))),
        }
        let paint = Gradient::new_radial(point_to_cpu(center), node.radius as f32)
            .with_stops(stops.as_slice());

        ctx.push_blend_layer(BlendMode::new(Mix::Normal, Compose::Plus));
        ctx.push_opacity_layer(BLOB_ALPHA * first.alpha());
        ctx.set_paint(paint);
        let disc = kurbo::Circle::new(center, node.radius).to_path(PATH_TOLERANCE);
        ctx.fill_path(&bezpath_to_cpu(&disc));
        ctx.pop_layer();
        ctx.pop_layer();
    }
}

fn solid(sample: ColorSample) -> peniko::Color {
    with_alpha(sample, 1.0)
}

fn with_alpha(sample: ColorSample, alpha: f32) -> peniko::Color {
    let [r, g, b, a] = sample.color.to_rgba8(alpha);
    peniko::Color::from_rgba8(r, g, b, a)
}

/// Two-stop gradient from slot 0 to slot 1 (slot 0 again when absent). Stops are opaque; slot
/// 0's transparency is applied by the enclosing opacity layer.
fn linear_gradient(start: Point, end: Point, colors: &[ColorSample]) -> Gradient {
    Gradient::new_linear(point_to_cpu(start), point_to_cpu(end))
        .with_stops(two_stops(colors).as_slice())
}

fn radial_gradient(center: Point, radius: f64, colors: &[ColorSample]) -> Gradient {
    Gradient::new_radial(point_to_cpu(center), radius.max(0.0) as f32)
        .with_stops(two_stops(colors).as_slice())
}

fn evenly_spaced_gradient(start: Point, end: Point, colors: &[ColorSample]) -> Gradient {
    let stops: Vec<ColorStop> = if colors.len() < 2 {
        two_stops(colors)
    } else {
        let last = (colors.len() - 1) as f32;
        colors
            .iter()
            .enumerate()
            .map(|(i, c)| ColorStop::from((i as f32 / last, solid(*c))))
            .collect()
    };
    Gradient::new_linear(point_to_cpu(start), point_to_cpu(end)).with_stops(stops.as_slice())
}

fn two_stops(colors: &[ColorSample]) -> Vec<ColorStop> {
    let Some(first) = colors.first().copied() else {
        return Vec::new();
    };
    let second = colors.get(1).copied().unwrap_or(first);
    vec![
        ColorStop::from((0.0, solid(first))),
        ColorStop::from((1.0, solid(second))),
    ]
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
