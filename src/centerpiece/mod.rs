//! Centerpiece demo: a rotating torus knot inside a drifting particle
//! field, lit by an environment map and finished with bloom.
//!
//! GPU-free. [`CenterpieceEngine`](crate::engine::CenterpieceEngine)
//! renders a [`CenterpieceScene`].

/// Particle point cloud.
pub mod particles;
/// Scene session and live parameters.
pub mod scene;
/// Torus-knot mesh generation.
pub mod torus_knot;

pub use particles::ParticleField;
pub use scene::{BloomParams, CenterpieceFrame, CenterpieceScene, MaterialParams};
pub use torus_knot::{KnotMesh, KnotVertex, TorusKnot};
