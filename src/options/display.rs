use serde::{Deserialize, Serialize};

/// Surface, camera, and timing settings. Not exposed in the parameter
/// panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayOptions {
    /// Upper bound on the device pixel ratio used for the drawing surface.
    pub max_pixel_ratio: f32,
    /// Quiet period before a centerpiece resize is applied.
    pub resize_debounce_ms: u64,
    /// Centerpiece vertical field of view in degrees.
    pub fovy: f32,
    /// Centerpiece camera distance from the origin.
    pub camera_distance: f32,
    /// Gallery camera distance from the `z = 0` plane.
    pub gallery_distance: f32,
    /// Seconds for hover and pointer-UV tweens.
    pub hover_duration: f32,
    /// Hover distortion strength in UV units.
    pub hover_strength: f32,
    /// Background clear color (linear RGB).
    pub clear_color: [f32; 3],
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            max_pixel_ratio: 2.0,
            resize_debounce_ms: 250,
            fovy: 45.0,
            camera_distance: 6.0,
            gallery_distance: 20.0,
            hover_duration: 0.3,
            hover_strength: 0.05,
            clear_color: [0.02, 0.02, 0.03],
        }
    }
}
