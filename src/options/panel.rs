//! Schema-driven parameter panel adapter.
//!
//! Walks the JSON Schema produced by `schemars` for [`Options`] and turns
//! each exposed field into a [`ParamSpec`]. Edits coming back from a host
//! UI are clamped against those specs and written into an `Options` value
//! through a `serde_json` round trip, so the schema annotations are the
//! only place ranges are declared.

use serde_json::Value;

use super::Options;
use crate::error::VitrineError;

/// Control type for one exposed field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Slider with an inclusive range.
    Number {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
        /// Slider increment.
        step: f64,
    },
    /// RGB color, components in [0, 1].
    Color,
}

/// One tunable field.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Options section (`bloom`, `material`).
    pub section: String,
    /// Field name inside the section.
    pub field: String,
    /// Human-readable label.
    pub title: String,
    /// Control type and bounds.
    pub kind: ParamKind,
}

/// Set of tunable fields plus the logic to apply edits to [`Options`].
#[derive(Debug, Clone, Default)]
pub struct ParameterPanel {
    specs: Vec<ParamSpec>,
}

/// Convert a `snake_case` string to `Title Case`.
fn display_name(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    format!("{upper}{}", chars.as_str())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a `$ref` pointer against the root schema.
fn resolve_ref<'a>(schema: &'a Value, root: &'a Value) -> &'a Value {
    if let Some(ref_str) = schema.get("$ref").and_then(Value::as_str) {
        let pointer = ref_str.strip_prefix('#').unwrap_or(ref_str);
        root.pointer(pointer).unwrap_or(schema)
    } else {
        schema
    }
}

fn field_kind(schema: &Value) -> Option<ParamKind> {
    if schema.get("widget").and_then(Value::as_str) == Some("color") {
        return Some(ParamKind::Color);
    }
    match schema.get("type").and_then(Value::as_str) {
        Some("number" | "integer") => {
            let min = schema
                .get("minimum")
                .and_then(Value::as_f64)
                .unwrap_or(f64::MIN);
            let max = schema
                .get("maximum")
                .and_then(Value::as_f64)
                .unwrap_or(f64::MAX);
            let step =
                schema.get("step").and_then(Value::as_f64).unwrap_or(0.01);
            Some(ParamKind::Number { min, max, step })
        }
        _ => None,
    }
}

/// Parse `#rrggbb` into linear [0, 1] components.
fn parse_hex_color(s: &str) -> Option<[f64; 3]> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let mut out = [0.0; 3];
    for (i, slot) in out.iter_mut().enumerate() {
        let byte = u8::from_str_radix(hex.get(i * 2..i * 2 + 2)?, 16).ok()?;
        *slot = f64::from(byte) / 255.0;
    }
    Some(out)
}

fn color_components(value: &Value) -> Option<[f64; 3]> {
    match value {
        Value::String(s) => parse_hex_color(s),
        Value::Array(items) if items.len() == 3 => {
            let mut out = [0.0; 3];
            for (slot, item) in out.iter_mut().zip(items) {
                *slot = item.as_f64().filter(|v| v.is_finite())?;
            }
            Some(out)
        }
        _ => None,
    }
}

impl ParameterPanel {
    /// Derive the panel from a `schemars` JSON schema.
    ///
    /// Fields whose type has no matching control are left out.
    #[must_use]
    pub fn from_schema(schema: &Value) -> Self {
        let mut specs = Vec::new();
        let Some(sections) =
            schema.pointer("/properties").and_then(Value::as_object)
        else {
            return Self { specs };
        };

        for (section_key, raw_section) in sections {
            let section = resolve_ref(raw_section, schema);
            let Some(fields) = section
                .pointer("/properties")
                .or_else(|| section.pointer("/allOf/0/properties"))
                .and_then(Value::as_object)
            else {
                continue;
            };
            for (field_key, raw_field) in fields {
                let field = resolve_ref(raw_field, schema);
                let Some(kind) = field_kind(field) else {
                    log::debug!(
                        "no control for {section_key}.{field_key}, skipping"
                    );
                    continue;
                };
                let title = field
                    .get("title")
                    .or_else(|| raw_field.get("title"))
                    .and_then(Value::as_str)
                    .map_or_else(|| display_name(field_key), String::from);
                specs.push(ParamSpec {
                    section: section_key.clone(),
                    field: field_key.clone(),
                    title,
                    kind,
                });
            }
        }

        Self { specs }
    }

    /// Panel for the exposed sections of [`Options`].
    #[must_use]
    pub fn for_options() -> Self {
        let schema =
            serde_json::to_value(Options::json_schema()).unwrap_or_default();
        Self::from_schema(&schema)
    }

    /// All exposed fields.
    #[must_use]
    pub fn specs(&self) -> &[ParamSpec] {
        &self.specs
    }

    /// Look up one field.
    #[must_use]
    pub fn spec(&self, section: &str, field: &str) -> Option<&ParamSpec> {
        self.specs
            .iter()
            .find(|s| s.section == section && s.field == field)
    }

    /// Clamp `value` to the field's declared range, write it into
    /// `options`, and return the value actually applied.
    ///
    /// Colors accept `[r, g, b]` arrays or `#rrggbb` strings.
    ///
    /// # Errors
    ///
    /// [`VitrineError::UnknownParameter`] when the field is not exposed,
    /// [`VitrineError::InvalidParameter`] when the value has the wrong
    /// shape.
    pub fn apply(
        &self,
        options: &mut Options,
        section: &str,
        field: &str,
        value: &Value,
    ) -> Result<Value, VitrineError> {
        let spec = self.spec(section, field).ok_or_else(|| {
            VitrineError::UnknownParameter(format!("{section}.{field}"))
        })?;

        let applied = match spec.kind {
            ParamKind::Number { min, max, .. } => {
                let v = value.as_f64().filter(|v| v.is_finite()).ok_or_else(
                    || {
                        VitrineError::InvalidParameter(format!(
                            "{section}.{field} expects a number, got {value}"
                        ))
                    },
                )?;
                Value::from(v.clamp(min, max))
            }
            ParamKind::Color => {
                let rgb = color_components(value).ok_or_else(|| {
                    VitrineError::InvalidParameter(format!(
                        "{section}.{field} expects [r, g, b] or #rrggbb, got \
                         {value}"
                    ))
                })?;
                Value::from(rgb.map(|c| c.clamp(0.0, 1.0)).to_vec())
            }
        };

        let mut root = serde_json::to_value(&*options)
            .map_err(|e| VitrineError::OptionsParse(e.to_string()))?;
        match root.get_mut(section) {
            Some(section_value) => section_value[field] = applied.clone(),
            None => {
                return Err(VitrineError::UnknownParameter(format!(
                    "{section}.{field}"
                )))
            }
        }
        *options = serde_json::from_value(root).map_err(|e| {
            VitrineError::InvalidParameter(format!("{section}.{field}: {e}"))
        })?;

        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn exposes_bloom_and_material_fields() {
        let panel = ParameterPanel::for_options();
        let names: Vec<_> = panel
            .specs()
            .iter()
            .map(|s| format!("{}.{}", s.section, s.field))
            .collect();
        for expected in [
            "bloom.strength",
            "bloom.radius",
            "bloom.threshold",
            "material.color",
            "material.metalness",
            "material.roughness",
        ] {
            assert!(names.iter().any(|n| n == expected), "{expected}");
        }
        assert_eq!(names.len(), 6);

        let strength = panel.spec("bloom", "strength").unwrap();
        assert_eq!(strength.title, "Strength");
        assert_eq!(
            strength.kind,
            ParamKind::Number {
                min: 0.0,
                max: 3.0,
                step: 0.01
            }
        );
        assert_eq!(
            panel.spec("material", "color").unwrap().kind,
            ParamKind::Color
        );
    }

    #[test]
    fn numbers_are_clamped_to_declared_range() {
        let panel = ParameterPanel::for_options();
        let mut opts = Options::default();

        let applied =
            panel.apply(&mut opts, "bloom", "strength", &json!(5.0)).unwrap();
        assert_eq!(applied.as_f64(), Some(3.0));
        assert_eq!(opts.bloom.strength, 3.0);

        let _ = panel
            .apply(&mut opts, "bloom", "threshold", &json!(0.7))
            .unwrap();
        assert!((opts.bloom.threshold - 0.7).abs() < 1e-6);

        let _ = panel
            .apply(&mut opts, "material", "roughness", &json!(-1.0))
            .unwrap();
        assert_eq!(opts.material.roughness, 0.0);
    }

    #[test]
    fn colors_accept_arrays_and_hex() {
        let panel = ParameterPanel::for_options();
        let mut opts = Options::default();

        let _ = panel
            .apply(&mut opts, "material", "color", &json!([2.0, 0.5, -1.0]))
            .unwrap();
        assert_eq!(opts.material.color, [1.0, 0.5, 0.0]);

        let _ = panel
            .apply(&mut opts, "material", "color", &json!("#ff0000"))
            .unwrap();
        assert_eq!(opts.material.color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn rejects_unknown_and_malformed_edits() {
        let panel = ParameterPanel::for_options();
        let mut opts = Options::default();

        assert!(matches!(
            panel.apply(&mut opts, "bloom", "glow", &json!(1.0)),
            Err(VitrineError::UnknownParameter(_))
        ));
        assert!(matches!(
            panel.apply(&mut opts, "scene", "particle_count", &json!(10)),
            Err(VitrineError::UnknownParameter(_))
        ));
        assert!(matches!(
            panel.apply(&mut opts, "bloom", "radius", &json!("wide")),
            Err(VitrineError::InvalidParameter(_))
        ));
        assert!(matches!(
            panel.apply(&mut opts, "material", "color", &json!("#12")),
            Err(VitrineError::InvalidParameter(_))
        ));
        assert_eq!(opts, Options::default());
    }

    #[test]
    fn title_falls_back_to_display_name() {
        let schema = json!({
            "properties": {
                "bloom": {
                    "properties": {
                        "soft_knee": { "type": "number" }
                    }
                }
            }
        });
        let panel = ParameterPanel::from_schema(&schema);
        assert_eq!(panel.specs()[0].title, "Soft Knee");
    }
}
