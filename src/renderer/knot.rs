//! Torus-knot mesh renderer.

use glam::Mat4;

use crate::centerpiece::{KnotMesh, KnotVertex, MaterialParams};
use crate::error::VitrineError;
use crate::gpu::dynamic_buffer::{TypedBuffer, UniformBuffer};
use crate::gpu::pipeline_helpers::{
    create_mesh_pipeline, single_uniform_bind_group, single_uniform_layout,
    MeshPipelineDesc,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};

/// Knot uniform, matches the WGSL `KnotUniform`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct KnotUniform {
    /// Model matrix.
    pub model: [[f32; 4]; 4],
    /// Linear base color.
    pub color: [f32; 3],
    /// Metalness in [0, 1].
    pub metalness: f32,
    /// Roughness in [0, 1].
    pub roughness: f32,
    /// Environment reflection scale.
    pub env_intensity: f32,
    /// 1.0 once the environment map is bound.
    pub env_ready: f32,
    _pad: f32,
}

impl KnotUniform {
    /// Uniform for this frame.
    #[must_use]
    pub fn new(model: Mat4, material: &MaterialParams, env_ready: bool) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: material.color.to_array(),
            metalness: material.metalness,
            roughness: material.roughness,
            env_intensity: material.env_intensity,
            env_ready: if env_ready { 1.0 } else { 0.0 },
            _pad: 0.0,
        }
    }
}

/// Draws the knot into the HDR scene target.
pub struct KnotRenderer {
    pipeline: wgpu::RenderPipeline,
    vertices: TypedBuffer<KnotVertex>,
    indices: TypedBuffer<u32>,
    uniform: UniformBuffer<KnotUniform>,
    bind_group: wgpu::BindGroup,
}

impl KnotRenderer {
    /// Upload `mesh` and build the pipeline.
    ///
    /// # Errors
    ///
    /// [`VitrineError::Shader`] if the knot shader fails to compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        camera_layout: &wgpu::BindGroupLayout,
        env_layout: &wgpu::BindGroupLayout,
        mesh: &KnotMesh,
        initial: &KnotUniform,
    ) -> Result<Self, VitrineError> {
        let device = &context.device;
        let layout = single_uniform_layout(
            device,
            "Knot Layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let uniform = UniformBuffer::new(device, "Knot Uniform", initial);
        let bind_group =
            single_uniform_bind_group(device, "Knot Bind Group", &layout, uniform.buffer());

        let shader = composer.compose(device, Shader::Knot)?;
        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: size_of::<KnotVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
        };
        let pipeline = create_mesh_pipeline(
            device,
            &MeshPipelineDesc {
                label: "Knot",
                shader: &shader,
                buffers: &[vertex_layout],
                bind_group_layouts: &[camera_layout, &layout, env_layout],
                format: context.hdr_format,
                blend: None,
                cull_mode: Some(wgpu::Face::Back),
                depth_write: Some(true),
            },
        );

        log::debug!(
            "knot mesh: {} vertices, {} indices",
            mesh.vertices.len(),
            mesh.indices.len()
        );

        Ok(Self {
            pipeline,
            vertices: TypedBuffer::new_with_data(
                device,
                "Knot Vertices",
                &mesh.vertices,
                wgpu::BufferUsages::VERTEX,
            ),
            indices: TypedBuffer::new_with_data(
                device,
                "Knot Indices",
                &mesh.indices,
                wgpu::BufferUsages::INDEX,
            ),
            uniform,
            bind_group,
        })
    }

    /// Upload this frame's transform and material.
    pub fn update(&self, queue: &wgpu::Queue, uniform: &KnotUniform) {
        self.uniform.write(queue, uniform);
    }

    /// Record the knot draw.
    pub fn draw<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        camera: &'a wgpu::BindGroup,
        environment: &'a wgpu::BindGroup,
    ) {
        if self.indices.is_empty() {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera, &[]);
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_bind_group(2, environment, &[]);
        pass.set_vertex_buffer(0, self.vertices.buffer().slice(..));
        pass.set_index_buffer(
            self.indices.buffer().slice(..),
            wgpu::IndexFormat::Uint32,
        );
        pass.draw_indexed(0..self.indices.count() as u32, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn uniform_matches_wgsl_layout() {
        assert_eq!(size_of::<KnotUniform>(), 96);
    }

    #[test]
    fn env_flag_and_material_copied() {
        let material = MaterialParams {
            color: Vec3::new(0.85, 0.65, 1.0),
            metalness: 1.0,
            roughness: 0.15,
            env_intensity: 1.0,
        };
        let u = KnotUniform::new(Mat4::IDENTITY, &material, false);
        assert_eq!(u.env_ready, 0.0);
        assert_eq!(u.color, [0.85, 0.65, 1.0]);
        assert_eq!(u.roughness, 0.15);
        assert_eq!(KnotUniform::new(Mat4::IDENTITY, &material, true).env_ready, 1.0);
    }
}
