use rand::Rng;
use rand::seq::SliceRandom;

use crate::color::hsl::{BaseColor, ColorSample, Variation, sample_color, sample_colors};
use crate::effects::filter::Filter;
use crate::foundation::core::Canvas;
use crate::random::sampling::{choice, coin, random_float, random_token, uniform};
use crate::scene::grid::{place_on_grid, sample_grids};
use crate::scene::model::{
    Background, BlobNode, GridCell, RenderKind, Scene, ShapeDescriptor, Waveform,
};
use crate::settings::snapshot::{GeneratorSettings, IntRange};

/// Turns a settings snapshot into a [`Scene`] for one canvas size.
#[derive(Clone, Copy, Debug)]
pub struct Generator {
    canvas: Canvas,
}

impl Generator {
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Produce a new scene.
    ///
    /// `previous` is only consulted by the keep-colors, keep-items and keep-filter modes; with no
    /// previous scene those modes fall back to fresh sampling.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(width = self.canvas.width, height = self.canvas.height, has_previous = previous.is_some())
    )]
    pub fn generate<R: Rng + ?Sized>(
        &self,
        settings: &GeneratorSettings,
        previous: Option<&Scene>,
        rng: &mut R,
    ) -> Scene {
        let (base_color, variation) = match previous {
            Some(prev) if settings.keep_current_colors => {
                tracing::debug!("keeping current colors");
                (prev.base_color, prev.variation)
            }
            _ => sample_palette(rng, settings),
        };
        let palette = Palette {
            base: base_color,
            variation,
        };

        let (items, grids) = match previous {
            Some(prev) if settings.keep_current_items => {
                tracing::debug!(items = prev.items.len(), "keeping current items");
                recolor(rng, &palette, prev)
            }
            _ => self.populate(rng, settings, &palette),
        };

        let filter = match previous {
            _ if !settings.apply_random_filter => Filter::None,
            Some(prev) if settings.keep_current_filter => prev.filter,
            _ => Filter::random(rng),
        };

        let background = sample_background(rng, &palette);

        tracing::debug!(items = items.len(), grids = grids.len(), %filter, "scene generated");
        Scene {
            base_color,
            variation,
            items,
            grids,
            background,
            filter,
        }
    }

    fn populate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        settings: &GeneratorSettings,
        palette: &Palette,
    ) -> (Vec<ShapeDescriptor>, Vec<GridCell>) {
        let rectangle_count = count(rng, settings.rectangle_count);
        let circle_count = count(rng, settings.circle_count);
        let text_count = count(rng, settings.text_count);
        let wave_count = count(rng, settings.wave_count);
        let blob_count = count(rng, settings.blob_count);
        let grid_count = count(rng, settings.grid_count);

        let mut grids = sample_grids(rng, self.canvas, grid_count, settings.grid_size);
        let mut items = Vec::with_capacity(
            rectangle_count + circle_count + text_count + wave_count + blob_count,
        );

        for _ in 0..rectangle_count {
            let mut item = self.rectangle(rng, settings, palette);
            if coin(rng) {
                place_on_grid(&mut grids, &mut item);
            }
            items.push(item);
        }
        for _ in 0..circle_count {
            let mut item = self.circle(rng, settings, palette);
            if coin(rng) {
                place_on_grid(&mut grids, &mut item);
            }
            items.push(item);
        }
        items.extend((0..text_count).map(|_| self.text(rng, settings, palette)));
        items.extend((0..wave_count).map(|_| self.wave(rng, settings, palette)));
        items.extend((0..blob_count).map(|_| self.blob(rng, settings, palette)));

        items.shuffle(rng);
        (items, grids)
    }

    fn position<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        (
            uniform(rng, 0, i64::from(self.canvas.width)) as f64,
            uniform(rng, 0, i64::from(self.canvas.height)) as f64,
        )
    }

    /// `pct` percent of the shorter canvas edge.
    fn extent<R: Rng + ?Sized>(&self, rng: &mut R, pct: IntRange) -> f64 {
        pick(rng, pct) as f64 / 100.0 * self.canvas.min_dimension()
    }

    fn rectangle<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        settings: &GeneratorSettings,
        palette: &Palette,
    ) -> ShapeDescriptor {
        let render_kind = item_kind(rng);
        let (x, y) = self.position(rng);
        let width = self.extent(rng, settings.rectangle_width);
        let height = self.extent(rng, settings.rectangle_height);
        ShapeDescriptor::Rectangle {
            render_kind,
            colors: palette.for_kind(rng, render_kind),
            x,
            y,
            width,
            height,
            weight: stroke_weight(rng, render_kind, settings.stroke_weight),
        }
    }

    fn circle<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        settings: &GeneratorSettings,
        palette: &Palette,
    ) -> ShapeDescriptor {
        let render_kind = item_kind(rng);
        let (x, y) = self.position(rng);
        // The configured percentage is the diameter.
        let radius = self.extent(rng, settings.circle_radius) / 2.0;
        ShapeDescriptor::Circle {
            render_kind,
            colors: palette.for_kind(rng, render_kind),
            x,
            y,
            radius,
            weight: stroke_weight(rng, render_kind, settings.stroke_weight),
        }
    }

    fn text<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        settings: &GeneratorSettings,
        palette: &Palette,
    ) -> ShapeDescriptor {
        let render_kind = item_kind(rng);
        let (x, y) = self.position(rng);
        let size = self.extent(rng, settings.text_size);
        let colors = palette.for_kind(rng, render_kind);
        let len = uniform(rng, 1, 10) as usize;
        ShapeDescriptor::Text {
            render_kind,
            colors,
            x,
            y,
            size,
            text: random_token(rng, len),
            weight: stroke_weight(rng, render_kind, settings.stroke_weight),
        }
    }

    fn wave<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        settings: &GeneratorSettings,
        palette: &Palette,
    ) -> ShapeDescriptor {
        let (x, y) = self.position(rng);
        let size = self.extent(rng, settings.wave_size);
        let colors = palette.for_kind(rng, RenderKind::Stroke);
        let waveform = *choice(rng, &Waveform::ALL).unwrap_or(&Waveform::Sine);
        let weight = pick(rng, settings.wave_weight) as f64;
        ShapeDescriptor::Wave {
            render_kind: RenderKind::Stroke,
            colors,
            x,
            y,
            size,
            waveform,
            weight,
        }
    }

    fn blob<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        settings: &GeneratorSettings,
        palette: &Palette,
    ) -> ShapeDescriptor {
        let render_kind = *choice(rng, &RenderKind::AREA_KINDS).unwrap_or(&RenderKind::Fill);
        let color_count = match render_kind {
            RenderKind::Gradient => uniform(rng, 2, 3) as usize,
            _ => 1,
        };
        let colors = sample_colors(rng, palette.base, palette.variation, color_count);

        let (cx, cy) = self.position(rng);
        let node_count = count(rng, settings.blob_nodes).max(1);
        let nodes = (0..node_count)
            .map(|_| {
                let reach = self.extent(rng, settings.blob_spread);
                BlobNode {
                    x: cx + random_float(rng, -reach, reach),
                    y: cy + random_float(rng, -reach, reach),
                    radius: self.extent(rng, settings.blob_radius).max(1.0),
                }
            })
            .collect();

        ShapeDescriptor::Blob {
            render_kind,
            colors,
            nodes,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Palette {
    base: BaseColor,
    variation: Variation,
}

impl Palette {
    /// One slot for fill/stroke, `2..=5` independent slots for gradients.
    fn for_kind<R: Rng + ?Sized>(&self, rng: &mut R, kind: RenderKind) -> Vec<ColorSample> {
        let n = match kind {
            RenderKind::Gradient => uniform(rng, 2, 5) as usize,
            RenderKind::Fill | RenderKind::Stroke => 1,
        };
        sample_colors(rng, self.base, self.variation, n)
    }
}

fn sample_palette<R: Rng + ?Sized>(
    rng: &mut R,
    s: &GeneratorSettings,
) -> (BaseColor, Variation) {
    let base = BaseColor {
        h: pick(rng, s.hue),
        s: pick(rng, s.saturation),
        l: pick(rng, s.lightness),
        t: pick(rng, s.transparency),
    };
    let variation = Variation {
        hv: pick(rng, s.hue_variation),
        sv: pick(rng, s.saturation_variation),
        lv: pick(rng, s.lightness_variation),
        tv: pick(rng, s.transparency_variation),
    };
    (base, variation)
}

/// Copy the previous population and draw every color slot again; geometry is untouched.
fn recolor<R: Rng + ?Sized>(
    rng: &mut R,
    palette: &Palette,
    prev: &Scene,
) -> (Vec<ShapeDescriptor>, Vec<GridCell>) {
    let mut items = prev.items.clone();
    let mut grids = prev.grids.clone();
    let grid_items = grids.iter_mut().flat_map(|g| g.items.iter_mut());
    for item in items.iter_mut().chain(grid_items) {
        for slot in item.colors_mut().iter_mut() {
            *slot = sample_color(rng, palette.base, palette.variation);
        }
    }
    (items, grids)
}

fn sample_background<R: Rng + ?Sized>(rng: &mut R, palette: &Palette) -> Background {
    let render_kind = *choice(rng, &RenderKind::AREA_KINDS).unwrap_or(&RenderKind::Fill);
    let n = match render_kind {
        RenderKind::Gradient => 2,
        _ => 1,
    };
    let colors = sample_colors(rng, palette.base, palette.variation, n)
        .into_iter()
        .map(|c| ColorSample::opaque(c.color))
        .collect();
    Background {
        render_kind,
        colors,
    }
}

fn item_kind<R: Rng + ?Sized>(rng: &mut R) -> RenderKind {
    *choice(rng, &RenderKind::ITEM_KINDS).unwrap_or(&RenderKind::Fill)
}

fn stroke_weight<R: Rng + ?Sized>(rng: &mut R, kind: RenderKind, range: IntRange) -> Option<f64> {
    (kind == RenderKind::Stroke).then(|| pick(rng, range) as f64)
}

fn pick<R: Rng + ?Sized>(rng: &mut R, range: IntRange) -> i64 {
    uniform(rng, range.min, range.max)
}

fn count<R: Rng + ?Sized>(rng: &mut R, range: IntRange) -> usize {
    pick(rng, range).max(0) as usize
}

#[cfg(test)]
#[path = "../../tests/unit/scene/generator.rs"]
mod tests;
