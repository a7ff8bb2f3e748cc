//! Gallery plane renderer.
//!
//! All planes share one unit quad; each tracked mesh gets its own uniform
//! (center, size, pointer, hover) and texture binding. Planes draw straight
//! into the transparent swapchain with premultiplied alpha so the page
//! shows through everywhere else.

use crate::error::VitrineError;
use crate::gallery::{TextureState, TrackedMesh};
use crate::gpu::dynamic_buffer::{TypedBuffer, UniformBuffer};
use crate::gpu::pipeline_helpers::{
    create_mesh_pipeline, filtering_sampler, linear_sampler, texture_2d,
    uniform_buffer, MeshPipelineDesc,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::gpu::texture::{Rgba8Image, SampledTexture};

/// Unit-quad vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlaneVertex {
    /// Position in [-0.5, 0.5]², scaled by the plane size.
    pub position: [f32; 2],
    /// Surface UV, origin bottom-left.
    pub uv: [f32; 2],
}

/// Shared quad, counter-clockwise from bottom-left.
pub const UNIT_QUAD: [PlaneVertex; 4] = [
    PlaneVertex {
        position: [-0.5, -0.5],
        uv: [0.0, 0.0],
    },
    PlaneVertex {
        position: [0.5, -0.5],
        uv: [1.0, 0.0],
    },
    PlaneVertex {
        position: [0.5, 0.5],
        uv: [1.0, 1.0],
    },
    PlaneVertex {
        position: [-0.5, 0.5],
        uv: [0.0, 1.0],
    },
];

/// Index list for [`UNIT_QUAD`].
pub const UNIT_QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Per-plane uniform, matches the WGSL `PlaneUniform`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlaneUniform {
    /// World-space center.
    pub center: [f32; 3],
    /// Eased hover intensity.
    pub hover: f32,
    /// World-space extents.
    pub size: [f32; 2],
    /// Eased pointer position in plane UV.
    pub pointer_uv: [f32; 2],
    /// Maximum UV displacement at full hover.
    pub strength: f32,
    _pad: [f32; 3],
}

impl PlaneUniform {
    /// Snapshot of `mesh` for this frame.
    #[must_use]
    pub fn from_mesh(mesh: &TrackedMesh, strength: f32) -> Self {
        Self {
            center: mesh.position.to_array(),
            hover: mesh.hover.value(),
            size: mesh.geometry.size().to_array(),
            pointer_uv: mesh.pointer_uv.value().to_array(),
            strength,
            _pad: [0.0; 3],
        }
    }
}

struct PlaneInstance {
    uniform: UniformBuffer<PlaneUniform>,
    texture: Option<SampledTexture>,
    bind_group: wgpu::BindGroup,
    visible: bool,
}

/// Draws every tracked mesh as a textured, distortable quad.
pub struct PlaneRenderer {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    placeholder: SampledTexture,
    vertices: TypedBuffer<PlaneVertex>,
    indices: TypedBuffer<u16>,
    instances: Vec<PlaneInstance>,
    strength: f32,
}

impl PlaneRenderer {
    /// Build the pipeline for the context's surface format.
    ///
    /// # Errors
    ///
    /// [`VitrineError::Shader`] if the plane shader fails to compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        camera_layout: &wgpu::BindGroupLayout,
        strength: f32,
    ) -> Result<Self, VitrineError> {
        let device = &context.device;
        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Plane Layout"),
                entries: &[
                    uniform_buffer(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                    texture_2d(1),
                    filtering_sampler(2),
                ],
            });

        let shader = composer.compose(device, Shader::Plane)?;
        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: size_of::<PlaneVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2],
        };
        let pipeline = create_mesh_pipeline(
            device,
            &MeshPipelineDesc {
                label: "Plane",
                shader: &shader,
                buffers: &[vertex_layout],
                bind_group_layouts: &[camera_layout, &layout],
                format: context.format(),
                blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                cull_mode: None,
                depth_write: None,
            },
        );

        Ok(Self {
            pipeline,
            layout,
            sampler: linear_sampler(device, "Plane Sampler"),
            placeholder: SampledTexture::solid(
                device,
                &context.queue,
                "Plane Placeholder",
                [0, 0, 0, 0],
            ),
            vertices: TypedBuffer::new_with_data(
                device,
                "Unit Quad Vertices",
                &UNIT_QUAD,
                wgpu::BufferUsages::VERTEX,
            ),
            indices: TypedBuffer::new_with_data(
                device,
                "Unit Quad Indices",
                &UNIT_QUAD_INDICES,
                wgpu::BufferUsages::INDEX,
            ),
            instances: Vec::new(),
            strength,
        })
    }

    fn bind(
        &self,
        device: &wgpu::Device,
        uniform: &UniformBuffer<PlaneUniform>,
        view: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Plane Bind Group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    /// Upload this frame's plane state. Allocates instances on first use.
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        meshes: &[TrackedMesh],
    ) {
        while self.instances.len() < meshes.len() {
            let uniform = UniformBuffer::new(
                device,
                "Plane Uniform",
                &PlaneUniform::from_mesh(
                    &meshes[self.instances.len()],
                    self.strength,
                ),
            );
            let bind_group = self.bind(device, &uniform, &self.placeholder.view);
            self.instances.push(PlaneInstance {
                uniform,
                texture: None,
                bind_group,
                visible: false,
            });
        }
        self.instances.truncate(meshes.len());

        for (instance, mesh) in self.instances.iter_mut().zip(meshes) {
            instance.visible = !mesh.geometry.is_collapsed();
            instance
                .uniform
                .write(queue, &PlaneUniform::from_mesh(mesh, self.strength));
        }
    }

    /// Attach a decoded image to plane `index`.
    ///
    /// Returns the resulting texture state; indices past the synced set
    /// are ignored and report [`TextureState::Failed`].
    pub fn set_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        index: usize,
        image: &Rgba8Image,
    ) -> TextureState {
        if index >= self.instances.len() {
            log::warn!("texture for unknown plane {index}");
            return TextureState::Failed;
        }
        let texture = SampledTexture::from_rgba8(
            device,
            queue,
            &format!("Plane Texture {index}"),
            image,
        );
        let bind_group =
            self.bind(device, &self.instances[index].uniform, &texture.view);
        let instance = &mut self.instances[index];
        instance.bind_group = bind_group;
        instance.texture = Some(texture);
        TextureState::Ready
    }

    /// Number of planes with an attached image.
    #[must_use]
    pub fn textured_count(&self) -> usize {
        self.instances.iter().filter(|i| i.texture.is_some()).count()
    }

    /// Record draws for every visible plane.
    pub fn draw<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        camera: &'a wgpu::BindGroup,
    ) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera, &[]);
        pass.set_vertex_buffer(0, self.vertices.buffer().slice(..));
        pass.set_index_buffer(
            self.indices.buffer().slice(..),
            wgpu::IndexFormat::Uint16,
        );
        for instance in self.instances.iter().filter(|i| i.visible) {
            pass.set_bind_group(1, &instance.bind_group, &[]);
            pass.draw_indexed(0..UNIT_QUAD_INDICES.len() as u32, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::gallery::{DomRect, ElementKey, MeshRegistry};
    use crate::camera::Viewport;

    #[test]
    fn uniform_matches_wgsl_layout() {
        assert_eq!(size_of::<PlaneUniform>(), 48);
    }

    #[test]
    fn quad_spans_unit_square() {
        for v in UNIT_QUAD {
            assert_eq!(v.position[0] + 0.5, v.uv[0]);
            assert_eq!(v.position[1] + 0.5, v.uv[1]);
        }
    }

    #[test]
    fn uniform_snapshots_mesh_state() {
        let vp = Viewport::new(1000.0, 800.0, 1.0);
        let boxes = vec![Some(DomRect::new(100.0, 50.0, 200.0, 80.0))];
        let registry = MeshRegistry::build([ElementKey(0)], &boxes, &vp);
        let mesh = &registry.meshes()[0];

        let u = PlaneUniform::from_mesh(mesh, 0.05);
        assert_eq!(Vec3::from(u.center), Vec3::new(-300.0, 310.0, 0.0));
        assert_eq!(Vec2::from(u.size), Vec2::new(200.0, 80.0));
        assert_eq!(u.pointer_uv, [0.5, 0.5]);
        assert_eq!(u.hover, 0.0);
        assert_eq!(u.strength, 0.05);
    }
}
