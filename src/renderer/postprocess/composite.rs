//! Final composite: scene + bloom, ACES tone mapping, gamma.
//!
//! Owns the HDR scene color target that the 3D passes draw into.

use crate::error::VitrineError;
use crate::gpu::dynamic_buffer::UniformBuffer;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, filtering_sampler, linear_sampler,
    texture_2d, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::gpu::texture::RenderTarget;

/// Composite uniform, matches the WGSL `CompositeParams`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CompositeParams {
    /// Multiplier on the bloom texture.
    pub bloom_strength: f32,
    /// Linear exposure before tone mapping.
    pub exposure: f32,
    /// Output exponent; 1.0 for sRGB swapchains.
    pub gamma: f32,
    _pad: f32,
}

impl CompositeParams {
    /// Params for a swapchain of `format`.
    #[must_use]
    pub fn for_format(format: wgpu::TextureFormat, bloom_strength: f32) -> Self {
        Self {
            bloom_strength,
            exposure: 1.0,
            // sRGB views encode in hardware.
            gamma: if format.is_srgb() { 1.0 } else { 1.0 / 2.2 },
            _pad: 0.0,
        }
    }
}

/// Tone-maps the scene target plus bloom into the swapchain.
pub struct CompositePass {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    uniform: UniformBuffer<CompositeParams>,
    /// Current parameters; call [`Self::flush_params`] after editing.
    pub params: CompositeParams,
    color: RenderTarget,
}

impl CompositePass {
    /// Build the pass and its scene color target at the context size.
    ///
    /// # Errors
    ///
    /// [`VitrineError::Shader`] if the composite shader fails to compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        bloom_strength: f32,
    ) -> Result<Self, VitrineError> {
        let device = &context.device;
        let (width, height) = context.size();
        let color = RenderTarget::new(
            device,
            "Scene Color",
            width,
            height,
            context.hdr_format,
        );
        let sampler = linear_sampler(device, "Composite Sampler");
        let params = CompositeParams::for_format(context.format(), bloom_strength);
        let uniform = UniformBuffer::new(device, "Composite Params", &params);

        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Composite Layout"),
                entries: &[
                    texture_2d(0),
                    texture_2d(1),
                    filtering_sampler(2),
                    uniform_buffer(3, wgpu::ShaderStages::FRAGMENT),
                ],
            });
        let shader = composer.compose(device, Shader::Composite)?;
        let pipeline = create_screen_space_pipeline(
            device,
            "Composite",
            &shader,
            context.format(),
            None,
            &[&layout],
        );

        // Placeholder until the bloom pass exists and calls `rebind`.
        let bind_group = Self::create_bind_group(
            device,
            &layout,
            &color.view,
            &color.view,
            &sampler,
            &uniform,
        );

        Ok(Self {
            pipeline,
            layout,
            bind_group,
            sampler,
            uniform,
            params,
            color,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        scene: &wgpu::TextureView,
        bloom: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        uniform: &UniformBuffer<CompositeParams>,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Composite Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(scene),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(bloom),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: uniform.binding(),
                },
            ],
        })
    }

    /// Point the pass at the current bloom output.
    pub fn rebind(&mut self, device: &wgpu::Device, bloom: &wgpu::TextureView) {
        self.bind_group = Self::create_bind_group(
            device,
            &self.layout,
            &self.color.view,
            bloom,
            &self.sampler,
            &self.uniform,
        );
    }

    /// The HDR scene target 3D passes render into.
    #[must_use]
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color.view
    }

    /// Recreate the scene target. Call [`Self::rebind`] afterwards.
    pub fn resize(&mut self, context: &RenderContext) {
        let (width, height) = context.size();
        self.color = RenderTarget::new(
            &context.device,
            "Scene Color",
            width,
            height,
            context.hdr_format,
        );
    }

    /// Upload [`Self::params`].
    pub fn flush_params(&self, queue: &wgpu::Queue) {
        self.uniform.write(queue, &self.params);
    }

    /// Draw the composite into `target`.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Composite"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_swapchain_skips_gamma() {
        let p = CompositeParams::for_format(
            wgpu::TextureFormat::Bgra8UnormSrgb,
            1.2,
        );
        assert_eq!(p.gamma, 1.0);
        assert_eq!(p.bloom_strength, 1.2);
    }

    #[test]
    fn linear_swapchain_applies_gamma() {
        let p =
            CompositeParams::for_format(wgpu::TextureFormat::Bgra8Unorm, 0.0);
        assert!((p.gamma - 1.0 / 2.2).abs() < 1e-6);
    }

    #[test]
    fn params_match_wgsl_layout() {
        assert_eq!(size_of::<CompositeParams>(), 16);
    }
}
