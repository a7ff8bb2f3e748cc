//! GPU resource management: device and surface setup, typed buffers,
//! textures, pipeline boilerplate, and shader composition.

/// Growable vertex buffers and fixed uniform buffers.
pub mod dynamic_buffer;
/// Bind group layout and pipeline helpers.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Render targets, image decoding, and sampled textures.
pub mod texture;
