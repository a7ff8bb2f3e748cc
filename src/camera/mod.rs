//! Camera, viewport, and ray-casting math.
//!
//! Everything here is GPU-free; engines copy [`core::CameraUniform`] into a
//! uniform buffer each frame.

/// Core camera struct and GPU uniform types.
pub mod core;
/// Pointer rays and rectangle intersection.
pub mod ray;
/// Host viewport dimensions and surface sizing.
pub mod viewport;

pub use self::core::{Camera, CameraUniform};
pub use self::ray::{Ray, RectHit};
pub use self::viewport::Viewport;
