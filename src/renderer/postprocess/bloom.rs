//! Bloom post-processing pass.
//!
//! Pipeline: luminosity threshold into the half-resolution mip 0, then a
//! separable Gaussian blur at each of [`MIP_LEVELS`] levels (levels past
//! the first downsample from the previous one as part of their horizontal
//! pass), then a weighted additive upsample of every level into the output
//! texture. The composite pass scales the output by the bloom strength.

use crate::centerpiece::BloomParams;
use crate::error::VitrineError;
use crate::gpu::dynamic_buffer::UniformBuffer;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, filtering_sampler, linear_sampler,
    texture_2d, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::gpu::texture::RenderTarget;

/// Number of levels in the bloom chain.
pub const MIP_LEVELS: usize = 5;

/// Per-level contribution before the radius is applied, sharpest first.
const BLOOM_FACTORS: [f32; MIP_LEVELS] = [1.0, 0.8, 0.6, 0.4, 0.2];

/// Soft-knee width above the threshold.
const THRESHOLD_KNEE: f32 = 0.01;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ThresholdParams {
    threshold: f32,
    smooth_width: f32,
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct BlurParams {
    texel_size: [f32; 2],
    direction: [f32; 2],
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct UpsampleParams {
    weight: f32,
    _pad: [f32; 3],
}

/// Weight of each mip level for a given radius in [0, 1].
///
/// Radius 0 keeps the tight levels dominant; radius 1 mirrors the factors
/// so the widest levels dominate.
#[must_use]
pub fn level_weights(radius: f32) -> [f32; MIP_LEVELS] {
    let r = radius.clamp(0.0, 1.0);
    BLOOM_FACTORS.map(|f| f + (1.2 - f - f) * r)
}

/// Size of each level for a `width`x`height` scene, halving from half-res.
#[must_use]
pub fn mip_sizes(width: u32, height: u32) -> [(u32, u32); MIP_LEVELS] {
    let mut size = (width.max(1), height.max(1));
    [(); MIP_LEVELS].map(|()| {
        size = ((size.0 / 2).max(1), (size.1 / 2).max(1));
        size
    })
}

/// Size-dependent GPU resources, rebuilt on resize.
struct Chain {
    mips: Vec<RenderTarget>,
    pings: Vec<RenderTarget>,
    output: RenderTarget,
    threshold_bind_group: wgpu::BindGroup,
    // [level][0 = horizontal, 1 = vertical]
    blur_bind_groups: Vec<[wgpu::BindGroup; 2]>,
    _blur_params: Vec<[UniformBuffer<BlurParams>; 2]>,
    upsample_bind_groups: Vec<wgpu::BindGroup>,
}

/// Threshold, blur, and upsample passes producing a half-resolution glow.
pub struct BloomPass {
    threshold_pipeline: wgpu::RenderPipeline,
    threshold_layout: wgpu::BindGroupLayout,
    threshold_params: UniformBuffer<ThresholdParams>,

    blur_pipeline: wgpu::RenderPipeline,
    blur_layout: wgpu::BindGroupLayout,

    upsample_pipeline: wgpu::RenderPipeline,
    upsample_layout: wgpu::BindGroupLayout,
    upsample_params: Vec<UniformBuffer<UpsampleParams>>,

    sampler: wgpu::Sampler,
    format: wgpu::TextureFormat,
    chain: Chain,
    strength: f32,
    size: (u32, u32),
}

fn sampled_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[
            texture_2d(0),
            filtering_sampler(1),
            uniform_buffer(2, wgpu::ShaderStages::FRAGMENT),
        ],
    })
}

fn sampled_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    params: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
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
            wgpu::BindGroupEntry {
                binding: 2,
                resource: params.as_entire_binding(),
            },
        ],
    })
}

fn clear_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    label: &str,
    view: &wgpu::TextureView,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
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
    })
}

impl BloomPass {
    /// Build the pass reading from `scene_view`, a target of the scene size.
    ///
    /// # Errors
    ///
    /// [`VitrineError::Shader`] if a bloom shader fails to compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        scene_view: &wgpu::TextureView,
        params: BloomParams,
    ) -> Result<Self, VitrineError> {
        let device = &context.device;
        let format = context.hdr_format;
        let size = context.size();
        let sampler = linear_sampler(device, "Bloom Sampler");

        let threshold_layout = sampled_layout(device, "Bloom Threshold Layout");
        let threshold_params = UniformBuffer::new(
            device,
            "Bloom Threshold Params",
            &ThresholdParams {
                threshold: params.threshold,
                smooth_width: THRESHOLD_KNEE,
                _pad: [0.0; 2],
            },
        );
        let threshold_shader = composer.compose(device, Shader::BloomThreshold)?;
        let threshold_pipeline = create_screen_space_pipeline(
            device,
            "Bloom Threshold",
            &threshold_shader,
            format,
            None,
            &[&threshold_layout],
        );

        let blur_layout = sampled_layout(device, "Bloom Blur Layout");
        let blur_shader = composer.compose(device, Shader::BloomBlur)?;
        let blur_pipeline = create_screen_space_pipeline(
            device,
            "Bloom Blur",
            &blur_shader,
            format,
            None,
            &[&blur_layout],
        );

        let upsample_layout = sampled_layout(device, "Bloom Upsample Layout");
        let upsample_shader = composer.compose(device, Shader::BloomUpsample)?;
        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        };
        let upsample_pipeline = create_screen_space_pipeline(
            device,
            "Bloom Upsample",
            &upsample_shader,
            format,
            Some(additive),
            &[&upsample_layout],
        );
        let upsample_params = level_weights(params.radius)
            .iter()
            .enumerate()
            .map(|(i, &weight)| {
                UniformBuffer::new(
                    device,
                    &format!("Bloom Upsample Params {i}"),
                    &UpsampleParams {
                        weight,
                        _pad: [0.0; 3],
                    },
                )
            })
            .collect::<Vec<_>>();

        let chain = Self::build_chain(
            device,
            ChainLayouts {
                threshold: &threshold_layout,
                blur: &blur_layout,
                upsample: &upsample_layout,
            },
            scene_view,
            &sampler,
            &threshold_params,
            &upsample_params,
            format,
            size,
        );

        Ok(Self {
            threshold_pipeline,
            threshold_layout,
            threshold_params,
            blur_pipeline,
            blur_layout,
            upsample_pipeline,
            upsample_layout,
            upsample_params,
            sampler,
            format,
            chain,
            strength: params.strength,
            size,
        })
    }

    fn build_chain(
        device: &wgpu::Device,
        layouts: ChainLayouts<'_>,
        scene_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        threshold_params: &UniformBuffer<ThresholdParams>,
        upsample_params: &[UniformBuffer<UpsampleParams>],
        format: wgpu::TextureFormat,
        size: (u32, u32),
    ) -> Chain {
        let sizes = mip_sizes(size.0, size.1);
        let mips: Vec<_> = sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| {
                RenderTarget::new(device, &format!("Bloom Mip {i}"), w, h, format)
            })
            .collect();
        let pings: Vec<_> = sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| {
                RenderTarget::new(device, &format!("Bloom Ping {i}"), w, h, format)
            })
            .collect();
        let output = RenderTarget::new(
            device,
            "Bloom Output",
            sizes[0].0,
            sizes[0].1,
            format,
        );

        let threshold_bind_group = sampled_bind_group(
            device,
            "Bloom Threshold Bind Group",
            layouts.threshold,
            scene_view,
            sampler,
            threshold_params.buffer(),
        );

        let mut blur_bind_groups = Vec::with_capacity(MIP_LEVELS);
        let mut blur_params = Vec::with_capacity(MIP_LEVELS);
        for (i, &(w, h)) in sizes.iter().enumerate() {
            // Level 0 blurs in place; later levels read the previous mip,
            // letting the bilinear sampler do the 2x reduction.
            let source = if i == 0 { &mips[0] } else { &mips[i - 1] };
            let (sw, sh) = source.size;
            let h_params = UniformBuffer::new(
                device,
                &format!("Bloom Blur H Params {i}"),
                &BlurParams {
                    texel_size: [1.0 / sw as f32, 1.0 / sh as f32],
                    direction: [1.0, 0.0],
                },
            );
            let v_params = UniformBuffer::new(
                device,
                &format!("Bloom Blur V Params {i}"),
                &BlurParams {
                    texel_size: [1.0 / w as f32, 1.0 / h as f32],
                    direction: [0.0, 1.0],
                },
            );
            let h_bg = sampled_bind_group(
                device,
                &format!("Bloom Blur H {i}"),
                layouts.blur,
                &source.view,
                sampler,
                h_params.buffer(),
            );
            let v_bg = sampled_bind_group(
                device,
                &format!("Bloom Blur V {i}"),
                layouts.blur,
                &pings[i].view,
                sampler,
                v_params.buffer(),
            );
            blur_bind_groups.push([h_bg, v_bg]);
            blur_params.push([h_params, v_params]);
        }

        let upsample_bind_groups = mips
            .iter()
            .zip(upsample_params)
            .enumerate()
            .map(|(i, (mip, params))| {
                sampled_bind_group(
                    device,
                    &format!("Bloom Upsample {i}"),
                    layouts.upsample,
                    &mip.view,
                    sampler,
                    params.buffer(),
                )
            })
            .collect();

        Chain {
            mips,
            pings,
            output,
            threshold_bind_group,
            blur_bind_groups,
            _blur_params: blur_params,
            upsample_bind_groups,
        }
    }

    /// Push new parameters to the GPU. Takes effect on the next frame.
    pub fn apply(&mut self, queue: &wgpu::Queue, params: BloomParams) {
        self.strength = params.strength;
        self.threshold_params.write(
            queue,
            &ThresholdParams {
                threshold: params.threshold,
                smooth_width: THRESHOLD_KNEE,
                _pad: [0.0; 2],
            },
        );
        for (buffer, weight) in
            self.upsample_params.iter().zip(level_weights(params.radius))
        {
            buffer.write(
                queue,
                &UpsampleParams {
                    weight,
                    _pad: [0.0; 3],
                },
            );
        }
    }

    /// Current strength, read by the composite pass.
    #[must_use]
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// The accumulated glow, half the scene resolution.
    #[must_use]
    pub fn output_view(&self) -> &wgpu::TextureView {
        &self.chain.output.view
    }

    /// Record every bloom pass. Clears the output and returns early when
    /// the strength is zero.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder) {
        if self.strength <= 0.0 {
            let _ = clear_pass(encoder, "Bloom Clear", &self.chain.output.view);
            return;
        }

        {
            let mut pass =
                clear_pass(encoder, "Bloom Threshold", &self.chain.mips[0].view);
            pass.set_pipeline(&self.threshold_pipeline);
            pass.set_bind_group(0, &self.chain.threshold_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        for level in 0..MIP_LEVELS {
            self.blur_level(encoder, level);
        }

        let mut pass =
            clear_pass(encoder, "Bloom Upsample", &self.chain.output.view);
        pass.set_pipeline(&self.upsample_pipeline);
        for bind_group in &self.chain.upsample_bind_groups {
            pass.set_bind_group(0, bind_group, &[]);
            pass.draw(0..3, 0..1);
        }
    }

    fn blur_level(&self, encoder: &mut wgpu::CommandEncoder, level: usize) {
        let [h_bg, v_bg] = &self.chain.blur_bind_groups[level];
        {
            let mut pass =
                clear_pass(encoder, "Bloom Blur H", &self.chain.pings[level].view);
            pass.set_pipeline(&self.blur_pipeline);
            pass.set_bind_group(0, h_bg, &[]);
            pass.draw(0..3, 0..1);
        }
        let mut pass =
            clear_pass(encoder, "Bloom Blur V", &self.chain.mips[level].view);
        pass.set_pipeline(&self.blur_pipeline);
        pass.set_bind_group(0, v_bg, &[]);
        pass.draw(0..3, 0..1);
    }

    /// Rebuild the chain for a new scene size and scene target.
    pub fn resize(
        &mut self,
        context: &RenderContext,
        scene_view: &wgpu::TextureView,
    ) {
        self.size = context.size();
        self.chain = Self::build_chain(
            &context.device,
            ChainLayouts {
                threshold: &self.threshold_layout,
                blur: &self.blur_layout,
                upsample: &self.upsample_layout,
            },
            scene_view,
            &self.sampler,
            &self.threshold_params,
            &self.upsample_params,
            self.format,
            self.size,
        );
    }
}

#[derive(Clone, Copy)]
struct ChainLayouts<'a> {
    threshold: &'a wgpu::BindGroupLayout,
    blur: &'a wgpu::BindGroupLayout,
    upsample: &'a wgpu::BindGroupLayout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_radius_keeps_base_factors() {
        assert_eq!(level_weights(0.0), BLOOM_FACTORS);
    }

    #[test]
    fn full_radius_mirrors_factors() {
        let w = level_weights(1.0);
        for (got, f) in w.iter().zip(BLOOM_FACTORS) {
            assert!((got - (1.2 - f)).abs() < 1e-6);
        }
        assert!(w[MIP_LEVELS - 1] > w[0]);
    }

    #[test]
    fn radius_is_clamped() {
        assert_eq!(level_weights(-3.0), level_weights(0.0));
        assert_eq!(level_weights(9.0), level_weights(1.0));
    }

    #[test]
    fn mips_halve_from_half_resolution() {
        let sizes = mip_sizes(1920, 1080);
        assert_eq!(sizes[0], (960, 540));
        assert_eq!(sizes[1], (480, 270));
        assert_eq!(sizes[4], (60, 33));
    }

    #[test]
    fn tiny_targets_never_reach_zero() {
        for (w, h) in mip_sizes(3, 1) {
            assert!(w >= 1 && h >= 1);
        }
    }
}
