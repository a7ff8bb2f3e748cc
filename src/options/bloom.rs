use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Unreal-style bloom parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Bloom", inline)]
#[serde(default)]
pub struct BloomOptions {
    /// Overall bloom contribution.
    #[schemars(title = "Strength", range(min = 0.0, max = 3.0), extend("step" = 0.01))]
    pub strength: f32,
    /// Spread of the glow across the mip chain.
    #[schemars(title = "Radius", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub radius: f32,
    /// Luminance above which pixels glow.
    #[schemars(title = "Threshold", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub threshold: f32,
}

impl Default for BloomOptions {
    fn default() -> Self {
        Self {
            strength: 1.2,
            radius: 0.5,
            threshold: 0.2,
        }
    }
}
