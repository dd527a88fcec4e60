use std::path::{Path, PathBuf};

use crate::foundation::error::{AbstraktError, AbstraktResult};

/// A font file registered with the layout engine and ready for glyph drawing.
#[derive(Clone)]
struct LoadedFont {
    path: PathBuf,
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// One shaped line of text positioned relative to its baseline origin.
pub(crate) struct ShapedLine {
    pub(crate) glyphs: Vec<vello_cpu::Glyph>,
    pub(crate) font_size: f32,
    pub(crate) advance: f32,
}

/// Parley layout plus the font it shapes with.
///
/// Items carry no font of their own; the whole scene shares one file set via the `font`
/// setting.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    font: Option<LoadedFont>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            font: None,
        }
    }

    pub(crate) fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub(crate) fn font_path(&self) -> Option<&Path> {
        self.font.as_ref().map(|f| f.path.as_path())
    }

    pub(crate) fn font_data(&self) -> Option<&vello_cpu::peniko::FontData> {
        self.font.as_ref().map(|f| &f.data)
    }

    /// Read and register a font file. Loading the same path twice is a no-op.
    pub(crate) fn load_font(&mut self, path: &Path) -> AbstraktResult<()> {
        if self.font_path() == Some(path) {
            return Ok(());
        }
        let bytes = std::fs::read(path).map_err(|e| {
            AbstraktError::render(format!("read font '{}': {e}", path.display()))
        })?;
        self.load_font_bytes(path, bytes)
    }

    pub(crate) fn load_font_bytes(&mut self, path: &Path, bytes: Vec<u8>) -> AbstraktResult<()> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            AbstraktError::render(format!("no font families in '{}'", path.display()))
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| AbstraktError::render("registered font family has no name"))?
            .to_string();

        tracing::debug!(font = %path.display(), %family, "font registered");
        self.font = Some(LoadedFont {
            path: path.to_path_buf(),
            family,
            data: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
        });
        Ok(())
    }

    /// Shape `text` on a single line at `size_px`. Glyph positions are relative to the first
    /// line's baseline at the origin.
    pub(crate) fn shape_line(&mut self, text: &str, size_px: f32) -> AbstraktResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(AbstraktError::validation(
                "text size must be finite and > 0",
            ));
        }
        let family = self
            .font
            .as_ref()
            .map(|f| f.family.clone())
            .ok_or_else(|| AbstraktError::render("no font loaded"))?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        let mut baseline = None;
        for line in layout.lines() {
            let line_baseline = *baseline.get_or_insert(line.metrics().baseline);
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y - line_baseline,
                }));
            }
        }

        Ok(ShapedLine {
            glyphs,
            font_size: size_px,
            advance: layout.width(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
