//! Particle field renderer: one camera-facing sprite per point, instanced
//! from the flat position buffer, additively blended without depth writes.

use glam::{Mat4, Vec3};

use crate::error::VitrineError;
use crate::gpu::dynamic_buffer::{TypedBuffer, UniformBuffer};
use crate::gpu::pipeline_helpers::{
    create_mesh_pipeline, single_uniform_bind_group, single_uniform_layout,
    MeshPipelineDesc,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};

/// Sprite brightness multiplier; pushes particles over the bloom threshold.
const PARTICLE_INTENSITY: f32 = 1.5;

/// Particle uniform, matches the WGSL `ParticleUniform`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleUniform {
    /// Field model matrix.
    pub model: [[f32; 4]; 4],
    /// Camera right vector in world space.
    pub right: [f32; 3],
    /// Sprite edge length.
    pub size: f32,
    /// Camera up vector in world space.
    pub up: [f32; 3],
    /// Brightness multiplier.
    pub intensity: f32,
    /// Linear tint.
    pub color: [f32; 3],
    _pad: f32,
}

impl ParticleUniform {
    /// Uniform for a field drawn with `model`, seen through `view`.
    #[must_use]
    pub fn new(model: Mat4, view: Mat4, size: f32, color: [f32; 3]) -> Self {
        let (right, up) = billboard_axes(view);
        Self {
            model: model.to_cols_array_2d(),
            right: right.to_array(),
            size,
            up: up.to_array(),
            intensity: PARTICLE_INTENSITY,
            color,
            _pad: 0.0,
        }
    }
}

/// World-space right and up vectors of a view matrix.
#[must_use]
pub fn billboard_axes(view: Mat4) -> (Vec3, Vec3) {
    let right = Vec3::new(view.x_axis.x, view.y_axis.x, view.z_axis.x);
    let up = Vec3::new(view.x_axis.y, view.y_axis.y, view.z_axis.y);
    (right.normalize_or(Vec3::X), up.normalize_or(Vec3::Y))
}

/// Draws the particle field into the HDR scene target.
pub struct ParticleRenderer {
    pipeline: wgpu::RenderPipeline,
    positions: TypedBuffer<f32>,
    uniform: UniformBuffer<ParticleUniform>,
    bind_group: wgpu::BindGroup,
}

impl ParticleRenderer {
    /// Upload `positions` (flat xyz triples) and build the pipeline.
    ///
    /// # Errors
    ///
    /// [`VitrineError::Shader`] if the particle shader fails to compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        camera_layout: &wgpu::BindGroupLayout,
        positions: &[f32],
        initial: &ParticleUniform,
    ) -> Result<Self, VitrineError> {
        let device = &context.device;
        let layout = single_uniform_layout(
            device,
            "Particle Layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let uniform = UniformBuffer::new(device, "Particle Uniform", initial);
        let bind_group = single_uniform_bind_group(
            device,
            "Particle Bind Group",
            &layout,
            uniform.buffer(),
        );

        let shader = composer.compose(device, Shader::Particles)?;
        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: 3 * size_of::<f32>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3],
        };
        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        };
        let pipeline = create_mesh_pipeline(
            device,
            &MeshPipelineDesc {
                label: "Particles",
                shader: &shader,
                buffers: &[instance_layout],
                bind_group_layouts: &[camera_layout, &layout],
                format: context.hdr_format,
                blend: Some(additive),
                cull_mode: None,
                depth_write: Some(false),
            },
        );

        Ok(Self {
            pipeline,
            positions: TypedBuffer::new_with_data(
                device,
                "Particle Positions",
                positions,
                wgpu::BufferUsages::VERTEX,
            ),
            uniform,
            bind_group,
        })
    }

    /// Upload this frame's positions and uniform.
    pub fn update(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        positions: &[f32],
        uniform: &ParticleUniform,
    ) {
        let _ = self.positions.write(device, queue, positions);
        self.uniform.write(queue, uniform);
    }

    /// Number of sprites drawn.
    #[must_use]
    pub fn count(&self) -> u32 {
        (self.positions.count() / 3) as u32
    }

    /// Record the instanced sprite draw.
    pub fn draw<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        camera: &'a wgpu::BindGroup,
    ) {
        let count = self.count();
        if count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera, &[]);
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.positions.buffer().slice(..));
        pass.draw(0..6, 0..count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_matches_wgsl_layout() {
        assert_eq!(size_of::<ParticleUniform>(), 112);
    }

    #[test]
    fn axes_of_default_view() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, Vec3::Y);
        let (right, up) = billboard_axes(view);
        assert!((right - Vec3::X).length() < 1e-6);
        assert!((up - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn axes_follow_camera_orbit() {
        // Camera on +X looking at the origin: its right is -Z.
        let view = Mat4::look_at_rh(Vec3::new(6.0, 0.0, 0.0), Vec3::ZERO, Vec3::Y);
        let (right, up) = billboard_axes(view);
        assert!((right - Vec3::NEG_Z).length() < 1e-6);
        assert!((up - Vec3::Y).length() < 1e-6);
    }
}
