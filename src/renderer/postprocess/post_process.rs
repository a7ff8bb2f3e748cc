use crate::centerpiece::BloomParams;
use crate::error::VitrineError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::RenderTarget;
use crate::renderer::postprocess::bloom::BloomPass;
use crate::renderer::postprocess::composite::CompositePass;

/// Owns the centerpiece post-processing chain: the depth target, the HDR
/// scene target (inside the composite pass), bloom, and composite.
pub struct PostProcessStack {
    depth: RenderTarget,
    bloom: BloomPass,
    composite: CompositePass,
}

impl PostProcessStack {
    /// Build every pass at the context size.
    ///
    /// # Errors
    ///
    /// [`VitrineError::Shader`] if a post-process shader fails to compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        params: BloomParams,
    ) -> Result<Self, VitrineError> {
        let (width, height) = context.size();
        let depth = RenderTarget::depth(&context.device, width, height);
        let mut composite =
            CompositePass::new(context, composer, params.strength)?;
        let bloom =
            BloomPass::new(context, composer, composite.color_view(), params)?;
        composite.rebind(&context.device, bloom.output_view());
        Ok(Self {
            depth,
            bloom,
            composite,
        })
    }

    /// Color target the scene passes draw into.
    #[must_use]
    pub fn scene_view(&self) -> &wgpu::TextureView {
        self.composite.color_view()
    }

    /// Depth target shared by the scene passes.
    #[must_use]
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth.view
    }

    /// Push bloom parameters to both passes.
    pub fn apply(&mut self, queue: &wgpu::Queue, params: BloomParams) {
        self.bloom.apply(queue, params);
        self.composite.params.bloom_strength = params.strength;
        self.composite.flush_params(queue);
        log::debug!(
            "bloom strength {:.2} radius {:.2} threshold {:.2}",
            params.strength,
            params.radius,
            params.threshold
        );
    }

    /// Recreate all resolution-dependent resources.
    pub fn resize(&mut self, context: &RenderContext) {
        let (width, height) = context.size();
        self.depth = RenderTarget::depth(&context.device, width, height);
        self.composite.resize(context);
        self.bloom.resize(context, self.composite.color_view());
        self.composite
            .rebind(&context.device, self.bloom.output_view());
    }

    /// Run bloom then composite into `final_view`.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        final_view: &wgpu::TextureView,
    ) {
        self.bloom.render(encoder);
        self.composite.render(encoder, final_view);
    }

    /// Current bloom strength.
    #[must_use]
    pub fn bloom_strength(&self) -> f32 {
        self.bloom.strength()
    }
}
