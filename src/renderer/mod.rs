//! GPU renderers for both demos.
//!
//! Gallery planes draw straight into the swapchain. The centerpiece knot
//! and particles draw into an HDR target that [`postprocess`] blooms and
//! tone-maps.

/// Camera uniform shared by every scene pipeline.
pub mod camera_binding;
/// Equirectangular environment binding.
pub mod environment;
/// Torus-knot mesh pass.
pub mod knot;
/// Instanced particle sprites.
pub mod particles;
/// Gallery image planes.
pub mod plane;
/// Bloom and tone-mapping composite.
pub mod postprocess;
