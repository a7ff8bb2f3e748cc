//! Tweakable scene options with TOML preset support.
//!
//! The `bloom` and `material` sections are exposed through the JSON schema
//! and drive the [`ParameterPanel`]. `scene` and `display` are preset-only.

mod bloom;
mod display;
mod material;
pub mod panel;
mod scene;

use std::path::Path;

pub use bloom::BloomOptions;
pub use display::DisplayOptions;
pub use material::MaterialOptions;
pub use panel::{ParamKind, ParamSpec, ParameterPanel};
pub use scene::SceneOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::VitrineError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[bloom]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Bloom post-processing parameters.
    pub bloom: BloomOptions,
    /// Knot surface parameters.
    pub material: MaterialOptions,
    /// Knot and particle-field composition.
    #[schemars(skip)]
    pub scene: SceneOptions,
    /// Surface, camera, and timing settings.
    #[schemars(skip)]
    pub display: DisplayOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, VitrineError> {
        let content =
            std::fs::read_to_string(path).map_err(VitrineError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, VitrineError> {
        toml::from_str(content)
            .map_err(|e| VitrineError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), VitrineError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VitrineError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(VitrineError::Io)?;
        }
        std::fs::write(path, content).map_err(VitrineError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[bloom]
strength = 2.0
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.bloom.strength, 2.0);
        assert_eq!(opts.bloom.threshold, 0.2);
        assert_eq!(opts.material.roughness, 0.15);
        assert_eq!(opts.scene.particle_count, 1500);
        assert_eq!(opts.display.resize_debounce_ms, 250);
    }

    #[test]
    fn shipped_presets_parse() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/presets");
        let names = Options::list_presets(&dir);
        assert_eq!(names, vec!["matte", "neon", "studio"]);

        let studio = Options::load(&dir.join("studio.toml")).unwrap();
        assert_eq!(studio.bloom, BloomOptions::default());
        let matte = Options::load(&dir.join("matte.toml")).unwrap();
        assert_eq!(matte.bloom.strength, 0.0);
        assert_eq!(matte.bloom.threshold, 0.2);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[bloom\nstrength = 1").unwrap_err();
        assert!(matches!(err, VitrineError::OptionsParse(_)));
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("vitrine-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.bloom.radius = 0.9;
        opts.save(&dir.join("glow.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        assert_eq!(Options::list_presets(&dir), vec!["glow".to_owned()]);
        let loaded = Options::load(&dir.join("glow.toml")).unwrap();
        assert_eq!(loaded, opts);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("bloom"));
        assert!(props.contains_key("material"));
        assert!(!props.contains_key("scene"));
        assert!(!props.contains_key("display"));

        let bloom = &props["bloom"]["properties"];
        assert_eq!(bloom["strength"]["maximum"].as_f64(), Some(3.0));
        assert_eq!(bloom["threshold"]["minimum"].as_f64(), Some(0.0));

        let material = &props["material"]["properties"];
        assert_eq!(material["color"]["widget"].as_str(), Some("color"));
        assert!(material.get("metalness").is_some());
        assert!(material.get("env_intensity").is_none());
    }
}
