use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Surface parameters of the centerpiece knot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Material", inline)]
#[serde(default)]
pub struct MaterialOptions {
    /// Base color, linear RGB in [0, 1].
    #[schemars(title = "Color", extend("widget" = "color"))]
    pub color: [f32; 3],
    /// 0 = dielectric, 1 = metal.
    #[schemars(title = "Metalness", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub metalness: f32,
    /// Microfacet roughness.
    #[schemars(title = "Roughness", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub roughness: f32,
    /// Scale applied to environment reflections.
    #[schemars(skip)]
    pub env_intensity: f32,
}

impl Default for MaterialOptions {
    fn default() -> Self {
        Self {
            color: [0.85, 0.65, 1.0],
            metalness: 1.0,
            roughness: 0.15,
            env_intensity: 1.0,
        }
    }
}
