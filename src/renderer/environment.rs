//! Equirectangular environment map binding.
//!
//! Starts with a 1x1 placeholder so the knot pipeline always has a valid
//! texture; the knot shader falls back to a procedural sky until
//! [`EnvironmentMap::is_ready`].

use crate::gpu::pipeline_helpers::{equirect_sampler, filtering_sampler, texture_2d};
use crate::gpu::texture::{HdrImage, SampledTexture};

/// Environment texture plus its bind group (group 2 of the knot pipeline).
pub struct EnvironmentMap {
    /// Layout shared with the knot pipeline.
    pub layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    texture: SampledTexture,
    ready: bool,
}

impl EnvironmentMap {
    /// Placeholder environment.
    #[must_use]
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Environment Layout"),
                entries: &[texture_2d(0), filtering_sampler(1)],
            });
        let sampler = equirect_sampler(device, "Environment Sampler");
        let texture =
            SampledTexture::solid(device, queue, "Environment Placeholder", [0; 4]);
        let bind_group = Self::bind(device, &layout, &texture.view, &sampler);
        Self {
            layout,
            bind_group,
            sampler,
            texture,
            ready: false,
        }
    }

    fn bind(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Environment Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    /// Replace the placeholder with a decoded HDR map.
    pub fn set_hdr(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &HdrImage,
    ) {
        self.texture =
            SampledTexture::from_hdr(device, queue, "Environment Map", image);
        self.bind_group =
            Self::bind(device, &self.layout, &self.texture.view, &self.sampler);
        self.ready = true;
        log::info!("environment map {}x{} bound", image.width, image.height);
    }

    /// Whether a real map has replaced the placeholder.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Current bind group.
    #[must_use]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
