use crate::color::hsl::{BaseColor, ColorSample, Variation};
use crate::effects::filter::Filter;
use crate::foundation::core::Vec2;

/// How a shape's color slots are applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKind {
    Fill,
    Stroke,
    Gradient,
}

impl RenderKind {
    /// Kinds a rectangle, circle or text item may be drawn with.
    pub const ITEM_KINDS: [RenderKind; 3] = [Self::Fill, Self::Stroke, Self::Gradient];
    /// Kinds a background or blob may be drawn with.
    pub const AREA_KINDS: [RenderKind; 2] = [Self::Fill, Self::Gradient];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
}

impl Waveform {
    pub const ALL: [Waveform; 3] = [Self::Sine, Self::Triangle, Self::Square];
}

/// One soft disc of a blob field.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlobNode {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// A drawable item. Coordinates are canvas pixels; `(x, y)` is the top-left corner for
/// rectangles, the center for circles, the baseline origin for text and the row anchor for waves.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ShapeDescriptor {
    Rectangle {
        render_kind: RenderKind,
        colors: Vec<ColorSample>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weight: Option<f64>,
    },
    Circle {
        render_kind: RenderKind,
        colors: Vec<ColorSample>,
        x: f64,
        y: f64,
        radius: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weight: Option<f64>,
    },
    Text {
        render_kind: RenderKind,
        colors: Vec<ColorSample>,
        x: f64,
        y: f64,
        size: f64,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weight: Option<f64>,
    },
    Wave {
        render_kind: RenderKind,
        colors: Vec<ColorSample>,
        x: f64,
        y: f64,
        size: f64,
        waveform: Waveform,
        weight: f64,
    },
    Blob {
        render_kind: RenderKind,
        colors: Vec<ColorSample>,
        nodes: Vec<BlobNode>,
    },
}

impl ShapeDescriptor {
    pub fn render_kind(&self) -> RenderKind {
        match self {
            Self::Rectangle { render_kind, .. }
            | Self::Circle { render_kind, .. }
            | Self::Text { render_kind, .. }
            | Self::Wave { render_kind, .. }
            | Self::Blob { render_kind, .. } => *render_kind,
        }
    }

    pub fn colors(&self) -> &[ColorSample] {
        match self {
            Self::Rectangle { colors, .. }
            | Self::Circle { colors, .. }
            | Self::Text { colors, .. }
            | Self::Wave { colors, .. }
            | Self::Blob { colors, .. } => colors,
        }
    }

    pub fn colors_mut(&mut self) -> &mut Vec<ColorSample> {
        match self {
            Self::Rectangle { colors, .. }
            | Self::Circle { colors, .. }
            | Self::Text { colors, .. }
            | Self::Wave { colors, .. }
            | Self::Blob { colors, .. } => colors,
        }
    }

    /// Lowercase shape tag, matching the serialized `shape` field.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Rectangle { .. } => "rectangle",
            Self::Circle { .. } => "circle",
            Self::Text { .. } => "text",
            Self::Wave { .. } => "wave",
            Self::Blob { .. } => "blob",
        }
    }

    /// Footprint used to lay out grid cells: rectangle size or circle diameter.
    pub fn cell_size(&self) -> Option<Vec2> {
        match self {
            Self::Rectangle { width, height, .. } => Some(Vec2::new(*width, *height)),
            Self::Circle { radius, .. } => Some(Vec2::new(radius * 2.0, radius * 2.0)),
            _ => None,
        }
    }
}

/// Alignment grid. Capacity is `columns * rows`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GridCell {
    pub x: f64,
    pub y: f64,
    pub columns: u32,
    pub rows: u32,
    pub items: Vec<ShapeDescriptor>,
}

impl GridCell {
    pub fn new(x: f64, y: f64, columns: u32, rows: u32) -> Self {
        Self {
            x,
            y,
            columns,
            rows,
            items: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn has_room(&self) -> bool {
        self.items.len() < self.capacity()
    }
}

/// Surface fill drawn before any item. Colors are always opaque.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Background {
    pub render_kind: RenderKind,
    pub colors: Vec<ColorSample>,
}

/// Everything needed to redraw one generated image.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub base_color: BaseColor,
    pub variation: Variation,
    /// Draw order.
    pub items: Vec<ShapeDescriptor>,
    pub grids: Vec<GridCell>,
    pub background: Background,
    #[serde(default)]
    pub filter: Filter,
}

impl Scene {
    pub fn to_json_pretty(&self) -> crate::AbstraktResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| crate::AbstraktError::serde(e.to_string()))
    }

    pub fn from_json(s: &str) -> crate::AbstraktResult<Self> {
        serde_json::from_str(s).map_err(|e| crate::AbstraktError::serde(e.to_string()))
    }

    /// Number of flat items with the given shape tag.
    pub fn count_of(&self, shape: &str) -> usize {
        self.items.iter().filter(|i| i.shape_name() == shape).count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
