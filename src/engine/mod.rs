//! GPU engines: one per demo, each owning a [`RenderContext`], the
//! renderers, and the GPU-free scene they draw.
//!
//! Engines never block. Resources that arrive asynchronously (gallery
//! textures, the environment map) are queued by the host and applied at
//! the start of the next [`render`](GalleryEngine::render) call.

mod centerpiece;
mod gallery;

pub use centerpiece::CenterpieceEngine;
pub use gallery::GalleryEngine;

use crate::gpu::render_context::RenderContext;

/// Acquire the next swapchain texture, recovering from a lost or outdated
/// surface by reconfiguring and skipping the frame.
fn acquire_frame(context: &RenderContext) -> Option<wgpu::SurfaceTexture> {
    match context.get_next_frame() {
        Ok(frame) => Some(frame),
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            log::debug!("surface lost or outdated, reconfiguring");
            context.reconfigure();
            None
        }
        Err(wgpu::SurfaceError::Timeout) => {
            log::debug!("surface acquire timed out, skipping frame");
            None
        }
        Err(e) => {
            log::error!("surface error: {e}");
            None
        }
    }
}

/// Linear clear color from an options triple.
fn clear_color(rgb: [f32; 3], alpha: f64) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(rgb[0]),
        g: f64::from(rgb[1]),
        b: f64::from(rgb[2]),
        a: alpha,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_color_widens_components() {
        let c = clear_color([0.5, 0.25, 0.0], 1.0);
        assert_eq!((c.r, c.g, c.b, c.a), (0.5, 0.25, 0.0, 1.0));
    }
}
