use crate::camera::CameraUniform;
use crate::gpu::dynamic_buffer::UniformBuffer;
use crate::gpu::pipeline_helpers::{single_uniform_bind_group, single_uniform_layout};

/// Camera uniform buffer bound at group 0 of every scene pipeline.
pub struct CameraBinding {
    /// Layout for pipelines that read the camera.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group over [`Self::buffer`].
    pub bind_group: wgpu::BindGroup,
    buffer: UniformBuffer<CameraUniform>,
}

impl CameraBinding {
    /// Allocate the buffer with `initial` contents.
    #[must_use]
    pub fn new(device: &wgpu::Device, initial: &CameraUniform) -> Self {
        let layout = single_uniform_layout(
            device,
            "Camera Layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let buffer = UniformBuffer::new(device, "Camera Uniform", initial);
        let bind_group = single_uniform_bind_group(
            device,
            "Camera Bind Group",
            &layout,
            buffer.buffer(),
        );
        Self {
            layout,
            bind_group,
            buffer,
        }
    }

    /// Upload this frame's camera.
    pub fn write(&self, queue: &wgpu::Queue, uniform: &CameraUniform) {
        self.buffer.write(queue, uniform);
    }
}
