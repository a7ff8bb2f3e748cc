use web_time::Instant;

use super::acquire_frame;
use crate::error::VitrineError;
use crate::gallery::{GalleryScene, LayoutSource, TextureState};
use crate::gpu::render_context::{RenderContext, SurfaceAlpha};
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::Rgba8Image;
use crate::input::InputEvent;
use crate::options::DisplayOptions;
use crate::renderer::camera_binding::CameraBinding;
use crate::renderer::plane::PlaneRenderer;
use crate::util::frame_timing::FrameTime;

/// Renders a [`GalleryScene`] into a transparent surface layered over the
/// page.
pub struct GalleryEngine {
    context: RenderContext,
    camera: CameraBinding,
    planes: PlaneRenderer,
    scene: GalleryScene,
    pending_textures: Vec<(usize, Result<Rgba8Image, VitrineError>)>,
}

impl GalleryEngine {
    /// Create the GPU context on `target` and build the plane pipeline.
    ///
    /// # Errors
    ///
    /// [`VitrineError::Gpu`] when no adapter or device is available,
    /// [`VitrineError::Shader`] if the plane shader fails to compose.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        scene: GalleryScene,
        display: &DisplayOptions,
    ) -> Result<Self, VitrineError> {
        let context = RenderContext::new(
            target,
            scene.surface_size(),
            SurfaceAlpha::Transparent,
        )
        .await?;
        let mut composer = ShaderComposer::new()?;
        let camera = CameraBinding::new(&context.device, scene.camera_uniform());
        let planes = PlaneRenderer::new(
            &context,
            &mut composer,
            &camera.layout,
            display.hover_strength,
        )?;
        Ok(Self {
            context,
            camera,
            planes,
            scene,
            pending_textures: Vec::new(),
        })
    }

    /// Forward one host event to the scene and keep the surface sized.
    pub fn handle_event<S: LayoutSource + ?Sized>(
        &mut self,
        event: InputEvent,
        source: &S,
        now: Instant,
    ) {
        self.scene.handle_event(event, source, now);
        if matches!(event, InputEvent::Resized { .. }) {
            let (w, h) = self.scene.surface_size();
            if self.context.resize(w, h) {
                log::debug!("gallery surface resized to {w}x{h}");
            }
        }
    }

    /// Queue the outcome of a texture load for plane `index`. Applied at
    /// the start of the next frame.
    pub fn queue_texture(
        &mut self,
        index: usize,
        result: Result<Rgba8Image, VitrineError>,
    ) {
        self.pending_textures.push((index, result));
    }

    fn drain_textures(&mut self) {
        if self.pending_textures.is_empty() {
            return;
        }
        for (index, result) in std::mem::take(&mut self.pending_textures) {
            let state = match result {
                Ok(image) => self.planes.set_texture(
                    &self.context.device,
                    &self.context.queue,
                    index,
                    &image,
                ),
                Err(e) => {
                    log::warn!("texture for plane {index} failed: {e}");
                    TextureState::Failed
                }
            };
            self.scene.set_texture_state(index, state);
        }
        log::debug!(
            "{} of {} planes textured",
            self.planes.textured_count(),
            self.scene.registry().len()
        );
    }

    /// Run one frame: apply queued textures, advance the scene, upload
    /// uniforms, draw, and present.
    pub fn render<S: LayoutSource + ?Sized>(
        &mut self,
        source: &S,
        now: Instant,
    ) -> FrameTime {
        // Meshes must exist before textures can attach to them.
        self.planes.sync(
            &self.context.device,
            &self.context.queue,
            self.scene.registry().meshes(),
        );
        self.drain_textures();

        let time = self.scene.frame(source, now);
        self.planes.sync(
            &self.context.device,
            &self.context.queue,
            self.scene.registry().meshes(),
        );
        self.camera
            .write(&self.context.queue, self.scene.camera_uniform());

        let Some(frame) = acquire_frame(&self.context) else {
            return time;
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Gallery"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(
                                    wgpu::Color::TRANSPARENT,
                                ),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
            self.planes.draw(&mut pass, &self.camera.bind_group);
        }
        self.context.submit(encoder);
        frame.present();
        time
    }

    /// Largest texture edge the device accepts; decode images to fit.
    #[must_use]
    pub fn max_texture_dimension(&self) -> u32 {
        self.context.max_texture_dimension()
    }

    /// The scene being drawn.
    #[must_use]
    pub fn scene(&self) -> &GalleryScene {
        &self.scene
    }
}
