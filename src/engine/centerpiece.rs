use serde_json::Value;
use web_time::Instant;

use super::{acquire_frame, clear_color};
use crate::centerpiece::{CenterpieceScene, TorusKnot};
use crate::error::VitrineError;
use crate::gpu::render_context::{RenderContext, SurfaceAlpha};
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::HdrImage;
use crate::input::InputEvent;
use crate::options::Options;
use crate::renderer::camera_binding::CameraBinding;
use crate::renderer::environment::EnvironmentMap;
use crate::renderer::knot::{KnotRenderer, KnotUniform};
use crate::renderer::particles::{ParticleRenderer, ParticleUniform};
use crate::renderer::postprocess::post_process::PostProcessStack;
use crate::util::frame_timing::FrameTime;

/// Renders a [`CenterpieceScene`]: knot and particles into an HDR target,
/// then bloom and tone mapping into the surface.
pub struct CenterpieceEngine {
    context: RenderContext,
    camera: CameraBinding,
    knot: KnotRenderer,
    particles: ParticleRenderer,
    environment: EnvironmentMap,
    post: PostProcessStack,
    scene: CenterpieceScene,
    pending_environment: Option<Result<HdrImage, VitrineError>>,
}

impl CenterpieceEngine {
    /// Create the GPU context on `target` and build every pass.
    ///
    /// # Errors
    ///
    /// [`VitrineError::Gpu`] when no adapter or device is available,
    /// [`VitrineError::Shader`] if a shader fails to compose.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        scene: CenterpieceScene,
    ) -> Result<Self, VitrineError> {
        let context =
            RenderContext::new(target, scene.surface_size(), SurfaceAlpha::Opaque)
                .await?;
        let mut composer = ShaderComposer::new()?;
        let camera = CameraBinding::new(&context.device, scene.camera_uniform());
        let environment = EnvironmentMap::new(&context.device, &context.queue);

        let knot = KnotRenderer::new(
            &context,
            &mut composer,
            &camera.layout,
            &environment.layout,
            &TorusKnot::default().build(),
            &KnotUniform::new(scene.knot_model(), &scene.material(), false),
        )?;
        let particles = ParticleRenderer::new(
            &context,
            &mut composer,
            &camera.layout,
            scene.particles().positions(),
            &Self::particle_uniform(&scene),
        )?;
        let post = PostProcessStack::new(&context, &mut composer, scene.bloom())?;

        Ok(Self {
            context,
            camera,
            knot,
            particles,
            environment,
            post,
            scene,
            pending_environment: None,
        })
    }

    fn particle_uniform(scene: &CenterpieceScene) -> ParticleUniform {
        let opts = &scene.options().scene;
        ParticleUniform::new(
            scene.field_model(),
            scene.camera().build_view(),
            opts.particle_size,
            opts.particle_color,
        )
    }

    /// Forward one host event to the scene. Resizes land once debounced.
    pub fn handle_event(&mut self, event: InputEvent, now: Instant) {
        self.scene.handle_event(event, now);
    }

    /// Apply one panel edit. Takes effect on the next frame without
    /// restarting the loop.
    ///
    /// # Errors
    ///
    /// [`VitrineError::UnknownParameter`] or
    /// [`VitrineError::InvalidParameter`] for rejected edits.
    pub fn set_param(
        &mut self,
        section: &str,
        field: &str,
        value: &Value,
    ) -> Result<Value, VitrineError> {
        self.scene.set_param(section, field, value)
    }

    /// Replace all options, e.g. after loading a preset.
    pub fn set_options(&mut self, options: Options) {
        self.scene.set_options(options);
    }

    /// JSON Schema for the panel-exposed parameters.
    #[must_use]
    pub fn param_schema() -> Value {
        serde_json::to_value(Options::json_schema()).unwrap_or_default()
    }

    /// Current values of the panel-exposed sections.
    #[must_use]
    pub fn params(&self) -> Value {
        let opts = self.scene.options();
        serde_json::json!({
            "bloom": opts.bloom,
            "material": opts.material,
        })
    }

    /// Queue the outcome of the environment map load. Applied at the start
    /// of the next frame.
    pub fn queue_environment(&mut self, result: Result<HdrImage, VitrineError>) {
        self.pending_environment = Some(result);
    }

    /// Restart elapsed time and particle drift.
    pub fn reset(&mut self, now: Instant) {
        self.scene.reset(now);
    }

    fn apply_pending(&mut self) {
        match self.pending_environment.take() {
            Some(Ok(image)) => self.environment.set_hdr(
                &self.context.device,
                &self.context.queue,
                &image,
            ),
            Some(Err(e)) => {
                log::warn!("environment map failed, keeping sky fallback: {e}");
            }
            None => {}
        }
        if self.scene.take_params_dirty() {
            self.post.apply(&self.context.queue, self.scene.bloom());
        }
    }

    /// Run one frame: apply queued resources and parameter edits, advance
    /// the scene, draw, and present.
    pub fn render(&mut self, now: Instant) -> FrameTime {
        let frame_state = self.scene.frame(now);
        if let Some((w, h)) = frame_state.resized {
            if self.context.resize(w, h) {
                self.post.resize(&self.context);
                log::debug!("centerpiece surface resized to {w}x{h}");
            }
        }
        self.apply_pending();

        let queue = &self.context.queue;
        self.camera.write(queue, self.scene.camera_uniform());
        self.knot.update(
            queue,
            &KnotUniform::new(
                self.scene.knot_model(),
                &self.scene.material(),
                self.environment.is_ready(),
            ),
        );
        self.particles.update(
            &self.context.device,
            &self.context.queue,
            self.scene.particles().positions(),
            &Self::particle_uniform(&self.scene),
        );

        let Some(frame) = acquire_frame(&self.context) else {
            return frame_state.time;
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Centerpiece Scene"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: self.post.scene_view(),
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(clear_color(
                                    self.scene.options().display.clear_color,
                                    1.0,
                                )),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: self.post.depth_view(),
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
            self.knot.draw(
                &mut pass,
                &self.camera.bind_group,
                self.environment.bind_group(),
            );
            self.particles.draw(&mut pass, &self.camera.bind_group);
        }
        self.post.render(&mut encoder, &view);
        self.context.submit(encoder);
        frame.present();
        frame_state.time
    }

    /// The scene being drawn.
    #[must_use]
    pub fn scene(&self) -> &CenterpieceScene {
        &self.scene
    }

    /// Largest texture edge the device accepts.
    #[must_use]
    pub fn max_texture_dimension(&self) -> u32 {
        self.context.max_texture_dimension()
    }
}
