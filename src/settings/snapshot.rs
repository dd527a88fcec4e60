use crate::foundation::error::{AbstraktError, AbstraktResult};
use crate::settings::store::SettingsStore;

/// Inclusive integer range read from a `NumberRange` setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub fn new(min: i64, max: i64) -> AbstraktResult<Self> {
        if min > max {
            return Err(AbstraktError::invalid_range("range", min as f64, max as f64));
        }
        Ok(Self { min, max })
    }

    /// Degenerate range holding a single value.
    pub fn fixed(value: i64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }
}

/// Immutable, typed copy of the settings the generator reads for one run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeneratorSettings {
    pub hue: IntRange,
    pub saturation: IntRange,
    pub lightness: IntRange,
    pub transparency: IntRange,
    pub hue_variation: IntRange,
    pub saturation_variation: IntRange,
    pub lightness_variation: IntRange,
    pub transparency_variation: IntRange,

    pub rectangle_count: IntRange,
    pub rectangle_width: IntRange,
    pub rectangle_height: IntRange,
    pub circle_count: IntRange,
    pub circle_radius: IntRange,
    pub text_count: IntRange,
    pub text_size: IntRange,
    pub wave_count: IntRange,
    pub wave_size: IntRange,
    pub wave_weight: IntRange,
    pub stroke_weight: IntRange,
    pub blob_count: IntRange,
    pub blob_nodes: IntRange,
    pub blob_radius: IntRange,
    pub blob_spread: IntRange,

    pub grid_count: IntRange,
    pub grid_size: IntRange,

    pub keep_current_items: bool,
    pub keep_current_colors: bool,
    pub apply_random_filter: bool,
    pub keep_current_filter: bool,

    /// Font file used for text items; `None` when unset.
    pub font: Option<String>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self::from_store(&SettingsStore::default())
            .unwrap_or_else(|_| unreachable!("default settings schema is complete"))
    }
}

impl GeneratorSettings {
    /// Snapshot the store. Ranges are rounded to integers.
    pub fn from_store(store: &SettingsStore) -> AbstraktResult<Self> {
        let range = |name: &str| -> AbstraktResult<IntRange> {
            let (min, max) = store
                .range(name)
                .ok_or_else(|| AbstraktError::validation(format!("missing range '{name}'")))?;
            let (min, max) = (min.round() as i64, max.round() as i64);
            if min > max {
                return Err(AbstraktError::invalid_range(name, min as f64, max as f64));
            }
            Ok(IntRange { min, max })
        };
        let flag = |name: &str| -> AbstraktResult<bool> {
            store
                .flag(name)
                .ok_or_else(|| AbstraktError::validation(format!("missing flag '{name}'")))
        };

        Ok(Self {
            hue: range("hue")?,
            saturation: range("saturation")?,
            lightness: range("lightness")?,
            transparency: range("transparency")?,
            hue_variation: range("hueVariation")?,
            saturation_variation: range("saturationVariation")?,
            lightness_variation: range("lightnessVariation")?,
            transparency_variation: range("transparencyVariation")?,
            rectangle_count: range("rectangleCount")?,
            rectangle_width: range("rectangleWidth")?,
            rectangle_height: range("rectangleHeight")?,
            circle_count: range("circleCount")?,
            circle_radius: range("circleRadius")?,
            text_count: range("textCount")?,
            text_size: range("textSize")?,
            wave_count: range("waveCount")?,
            wave_size: range("waveSize")?,
            wave_weight: range("waveWeight")?,
            stroke_weight: range("strokeWeight")?,
            blob_count: range("blobCount")?,
            blob_nodes: range("blobNodes")?,
            blob_radius: range("blobRadius")?,
            blob_spread: range("blobSpread")?,
            grid_count: range("gridCount")?,
            grid_size: range("gridSize")?,
            keep_current_items: flag("keepCurrentItems")?,
            keep_current_colors: flag("keepCurrentColors")?,
            apply_random_filter: flag("applyRandomFilter")?,
            keep_current_filter: flag("keepCurrentFilter")?,
            font: store
                .text("font")
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
        })
    }

    /// Settings that produce no shapes at all; tests start from this and enable what they need.
    pub fn empty() -> Self {
        let zero = IntRange::fixed(0);
        Self {
            rectangle_count: zero,
            circle_count: zero,
            text_count: zero,
            wave_count: zero,
            blob_count: zero,
            grid_count: zero,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/snapshot.rs"]
mod tests;
