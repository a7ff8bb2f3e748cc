use serde::{Deserialize, Serialize};

/// Centerpiece composition. Not exposed in the parameter panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneOptions {
    /// Knot rotation about X, radians per second.
    pub knot_spin_x: f32,
    /// Knot rotation about Y, radians per second.
    pub knot_spin_y: f32,
    /// Number of particles in the field.
    pub particle_count: usize,
    /// Edge length of the cube particles are scattered in.
    pub particle_spread: f32,
    /// Billboard size of each particle in world units.
    pub particle_size: f32,
    /// Linear RGB tint of the particles.
    pub particle_color: [f32; 3],
    /// Vertical drift added per frame, scaled by a sine of time.
    pub drift_amplitude: f32,
    /// Rotation of the whole field about Y, radians per second.
    pub field_spin: f32,
    /// Seed for particle placement.
    pub seed: u64,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            knot_spin_x: 0.2,
            knot_spin_y: 0.3,
            particle_count: 1500,
            particle_spread: 10.0,
            particle_size: 0.04,
            particle_color: [0.8, 0.8, 1.0],
            drift_amplitude: 0.002,
            field_spin: 0.05,
            seed: 7,
        }
    }
}
