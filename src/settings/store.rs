use std::collections::BTreeMap;

use crate::foundation::error::{AbstraktError, AbstraktResult};

/// A single value read from or written to the store through a dotted path.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Number(f64),
    Boolean(bool),
    Text(String),
}

impl SettingValue {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Text(_) => "text",
        }
    }
}

/// Typed setting variant, fixed when the schema is built.
#[derive(Clone, Debug, PartialEq)]
pub enum SettingKind {
    /// A paired `[min, max]` number range, addressed as `name.min` / `name.max`.
    NumberRange {
        min: f64,
        max: f64,
        /// Hard bounds for both ends of the pair.
        limits: (f64, f64),
    },
    Boolean(bool),
    Text(String),
}

/// UI grouping hint carried for the view layer; the core never reads it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingGroup {
    Color,
    Variation,
    Shapes,
    Grid,
    Other,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Setting {
    pub group: SettingGroup,
    pub kind: SettingKind,
}

impl Setting {
    fn range(group: SettingGroup, min: f64, max: f64, limits: (f64, f64)) -> Self {
        Self {
            group,
            kind: SettingKind::NumberRange { min, max, limits },
        }
    }

    fn flag(value: bool) -> Self {
        Self {
            group: SettingGroup::Other,
            kind: SettingKind::Boolean(value),
        }
    }

    fn text(value: &str) -> Self {
        Self {
            group: SettingGroup::Other,
            kind: SettingKind::Text(value.to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RangeEnd {
    Min,
    Max,
}

/// Flat settings map keyed by dotted path.
///
/// Range settings are stored once under their base name and answer `name.min` / `name.max`.
/// Writes are validated here so the samplers never see an inverted or out-of-bounds pair.
#[derive(Clone, Debug, PartialEq)]
pub struct SettingsStore {
    entries: BTreeMap<String, Setting>,
}

impl Default for SettingsStore {
    fn default() -> Self {
        use SettingGroup::{Color, Grid, Shapes, Variation};

        let percent = (0.0, 100.0);
        let entries = [
            ("hue", Setting::range(Color, 0.0, 360.0, (0.0, 360.0))),
            ("saturation", Setting::range(Color, 0.0, 100.0, percent)),
            ("lightness", Setting::range(Color, 0.0, 100.0, percent)),
            ("transparency", Setting::range(Color, 0.0, 30.0, percent)),
            ("hueVariation", Setting::range(Variation, 0.0, 100.0, (0.0, 360.0))),
            ("saturationVariation", Setting::range(Variation, 0.0, 100.0, percent)),
            ("lightnessVariation", Setting::range(Variation, 0.0, 100.0, percent)),
            ("transparencyVariation", Setting::range(Variation, 0.0, 20.0, percent)),
            ("rectangleCount", Setting::range(Shapes, 1.0, 50.0, (0.0, 500.0))),
            ("rectangleWidth", Setting::range(Shapes, 1.0, 25.0, percent)),
            ("rectangleHeight", Setting::range(Shapes, 1.0, 25.0, percent)),
            ("circleCount", Setting::range(Shapes, 0.0, 10.0, (0.0, 500.0))),
            ("circleRadius", Setting::range(Shapes, 1.0, 25.0, percent)),
            ("textCount", Setting::range(Shapes, 0.0, 10.0, (0.0, 500.0))),
            ("textSize", Setting::range(Shapes, 1.0, 10.0, percent)),
            ("waveCount", Setting::range(Shapes, 0.0, 10.0, (0.0, 500.0))),
            ("waveSize", Setting::range(Shapes, 1.0, 10.0, percent)),
            ("waveWeight", Setting::range(Shapes, 1.0, 10.0, (1.0, 100.0))),
            ("strokeWeight", Setting::range(Shapes, 1.0, 5.0, (1.0, 100.0))),
            ("blobCount", Setting::range(Shapes, 0.0, 0.0, (0.0, 100.0))),
            ("blobNodes", Setting::range(Shapes, 2.0, 6.0, (1.0, 64.0))),
            ("blobRadius", Setting::range(Shapes, 5.0, 30.0, (1.0, 100.0))),
            ("blobSpread", Setting::range(Shapes, 5.0, 20.0, percent)),
            ("gridCount", Setting::range(Grid, 1.0, 10.0, (0.0, 100.0))),
            ("gridSize", Setting::range(Grid, 2.0, 10.0, (1.0, 100.0))),
            ("keepCurrentItems", Setting::flag(false)),
            ("keepCurrentColors", Setting::flag(false)),
            ("applyRandomFilter", Setting::flag(false)),
            ("keepCurrentFilter", Setting::flag(false)),
            ("font", Setting::text("")),
        ];

        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}

impl SettingsStore {
    /// Read a value by dotted path (`rectangleCount.min`, `keepCurrentItems`, `font`).
    pub fn get(&self, path: &str) -> Option<SettingValue> {
        let (base, end) = split_path(path);
        let setting = self.entries.get(base)?;
        match (&setting.kind, end) {
            (SettingKind::NumberRange { min, .. }, Some(RangeEnd::Min)) => {
                Some(SettingValue::Number(*min))
            }
            (SettingKind::NumberRange { max, .. }, Some(RangeEnd::Max)) => {
                Some(SettingValue::Number(*max))
            }
            (SettingKind::Boolean(v), None) => Some(SettingValue::Boolean(*v)),
            (SettingKind::Text(v), None) => Some(SettingValue::Text(v.clone())),
            _ => None,
        }
    }

    /// Write a value by dotted path.
    ///
    /// Rejects unknown paths, type mismatches, values outside the setting's limits and any write
    /// that would leave a range with `min > max`.
    pub fn set(&mut self, path: &str, value: SettingValue) -> AbstraktResult<()> {
        let (base, end) = split_path(path);
        let setting = self
            .entries
            .get_mut(base)
            .ok_or_else(|| AbstraktError::validation(format!("unknown setting '{path}'")))?;

        match (&mut setting.kind, end, value) {
            (
                SettingKind::NumberRange { min, max, limits },
                Some(which),
                SettingValue::Number(v),
            ) => {
                if !v.is_finite() || v < limits.0 || v > limits.1 {
                    return Err(AbstraktError::validation(format!(
                        "setting '{path}' must be within [{}, {}], got {v}",
                        limits.0, limits.1
                    )));
                }
                let (new_min, new_max) = match which {
                    RangeEnd::Min => (v, *max),
                    RangeEnd::Max => (*min, v),
                };
                if new_min > new_max {
                    return Err(AbstraktError::invalid_range(base, new_min, new_max));
                }
                *min = new_min;
                *max = new_max;
                Ok(())
            }
            (SettingKind::Boolean(slot), None, SettingValue::Boolean(v)) => {
                *slot = v;
                Ok(())
            }
            (SettingKind::Text(slot), None, SettingValue::Text(v)) => {
                *slot = v;
                Ok(())
            }
            (_, _, value) => Err(AbstraktError::validation(format!(
                "setting '{path}' does not accept a {} value",
                value.kind_name()
            ))),
        }
    }

    /// Write both ends of a range at once, validating the pair as a whole.
    pub fn set_range(&mut self, name: &str, min: f64, max: f64) -> AbstraktResult<()> {
        if min > max {
            return Err(AbstraktError::invalid_range(name, min, max));
        }
        let mut next = self.clone();
        // Order the writes so the intermediate pair is never inverted.
        let current_max = next.range(name).map(|(_, hi)| hi).unwrap_or(max);
        if min > current_max {
            next.set(&format!("{name}.max"), SettingValue::Number(max))?;
            next.set(&format!("{name}.min"), SettingValue::Number(min))?;
        } else {
            next.set(&format!("{name}.min"), SettingValue::Number(min))?;
            next.set(&format!("{name}.max"), SettingValue::Number(max))?;
        }
        *self = next;
        Ok(())
    }

    /// `(min, max)` of a range setting.
    pub fn range(&self, name: &str) -> Option<(f64, f64)> {
        match &self.entries.get(name)?.kind {
            SettingKind::NumberRange { min, max, .. } => Some((*min, *max)),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match &self.entries.get(name)?.kind {
            SettingKind::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match &self.entries.get(name)?.kind {
            SettingKind::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Schema entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Setting)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All addressable dotted paths in key order.
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.entries.len() * 2);
        for (name, setting) in &self.entries {
            match setting.kind {
                SettingKind::NumberRange { .. } => {
                    out.push(format!("{name}.min"));
                    out.push(format!("{name}.max"));
                }
                SettingKind::Boolean(_) | SettingKind::Text(_) => out.push(name.clone()),
            }
        }
        out
    }

    /// Apply a flat JSON object of `{"dotted.path": value}` overrides.
    ///
    /// The overrides are applied to a copy; the store is only updated when every entry is valid.
    /// Range pairs given together (`x.min` and `x.max`) are validated as a pair.
    pub fn apply_json(&mut self, overrides: &serde_json::Value) -> AbstraktResult<()> {
        let obj = overrides
            .as_object()
            .ok_or_else(|| AbstraktError::serde("settings overrides must be a JSON object"))?;

        let mut next = self.clone();
        let mut pending_ranges: BTreeMap<&str, (Option<f64>, Option<f64>)> = BTreeMap::new();

        for (path, raw) in obj {
            let value: SettingValue = serde_json::from_value(raw.clone())
                .map_err(|e| AbstraktError::serde(format!("setting '{path}': {e}")))?;
            let (base, end) = split_path(path);
            match (end, &value) {
                (Some(which), SettingValue::Number(v)) if next.range(base).is_some() => {
                    let slot = pending_ranges.entry(base).or_default();
                    match which {
                        RangeEnd::Min => slot.0 = Some(*v),
                        RangeEnd::Max => slot.1 = Some(*v),
                    }
                }
                _ => next.set(path, value)?,
            }
        }

        for (name, (min, max)) in pending_ranges {
            let (cur_min, cur_max) = next
                .range(name)
                .ok_or_else(|| AbstraktError::validation(format!("unknown setting '{name}'")))?;
            next.set_range(name, min.unwrap_or(cur_min), max.unwrap_or(cur_max))?;
        }

        *self = next;
        Ok(())
    }

    /// Parse a JSON overrides document and apply it.
    pub fn apply_json_str(&mut self, json: &str) -> AbstraktResult<()> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| AbstraktError::serde(e.to_string()))?;
        self.apply_json(&value)
    }

    /// Flat JSON object with every dotted path and its current value.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for path in self.paths() {
            if let Some(value) = self.get(&path) {
                let json = match value {
                    SettingValue::Number(n) => serde_json::json!(n),
                    SettingValue::Boolean(b) => serde_json::Value::Bool(b),
                    SettingValue::Text(s) => serde_json::Value::String(s),
                };
                map.insert(path, json);
            }
        }
        serde_json::Value::Object(map)
    }
}

fn split_path(path: &str) -> (&str, Option<RangeEnd>) {
    if let Some(base) = path.strip_suffix(".min") {
        (base, Some(RangeEnd::Min))
    } else if let Some(base) = path.strip_suffix(".max") {
        (base, Some(RangeEnd::Max))
    } else {
        (path, None)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/store.rs"]
mod tests;
