//! Standalone centerpiece window backed by winit.
//!
//! The gallery needs a DOM to mirror and only runs in the browser; the
//! centerpiece runs natively too.
//!
//! ```no_run
//! # use vitrine::Viewer;
//! Viewer::builder()
//!     .with_env_url("assets/env/studio.hdr")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::centerpiece::CenterpieceScene;
use crate::camera::Viewport;
use crate::engine::CenterpieceEngine;
use crate::error::VitrineError;
use crate::gpu::texture::{decode_hdr, HdrImage};
use crate::input::InputEvent;
use crate::options::Options;

/// Upper bound on HDR downloads.
const MAX_ENV_BYTES: u64 = 64 * 1024 * 1024;

/// Read an environment map from a local path or an HTTP(S) URL and decode
/// it to fit `max_dimension`.
///
/// # Errors
///
/// [`VitrineError::ResourceLoad`] when the fetch or decode fails.
pub fn load_environment(
    source: &str,
    max_dimension: u32,
) -> Result<HdrImage, VitrineError> {
    let bytes = if Path::new(source).exists() {
        std::fs::read(source)?
    } else {
        log::info!("downloading environment map {source}");
        ureq::get(source)
            .call()
            .map_err(|e| {
                VitrineError::ResourceLoad(format!("{source}: {e}"))
            })?
            .into_body()
            .with_config()
            .limit(MAX_ENV_BYTES)
            .read_to_vec()
            .map_err(|e| {
                VitrineError::ResourceLoad(format!("{source}: {e}"))
            })?
    };
    decode_hdr(&bytes, max_dimension)
}

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Option<Options>,
    env_url: Option<String>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: None,
            env_url: None,
            title: "Vitrine".into(),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Environment map path or URL (Radiance `.hdr`).
    #[must_use]
    pub fn with_env_url(mut self, url: impl Into<String>) -> Self {
        self.env_url = Some(url.into());
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            options: self.options.unwrap_or_default(),
            env_url: self.env_url,
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window running the centerpiece scene.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run).
pub struct Viewer {
    options: Options,
    env_url: Option<String>,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// [`VitrineError::Host`] if the event loop cannot start, or the first
    /// error raised while creating the window or engine.
    pub fn run(self) -> Result<(), VitrineError> {
        let event_loop =
            EventLoop::new().map_err(|e| VitrineError::Host(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            env_rx: None,
            options: Some(self.options),
            env_url: self.env_url,
            title: self.title,
            error: None,
        };
        event_loop
            .run_app(&mut app)
            .map_err(|e| VitrineError::Host(e.to_string()))?;
        app.error.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<CenterpieceEngine>,
    env_rx: Option<Receiver<Result<HdrImage, VitrineError>>>,
    options: Option<Options>,
    env_url: Option<String>,
    title: String,
    error: Option<VitrineError>,
}

fn resize_event(window: &Window) -> InputEvent {
    let scale = window.scale_factor() as f32;
    let size = window.inner_size();
    InputEvent::Resized {
        width: size.width as f32 / scale,
        height: size.height as f32 / scale,
        pixel_ratio: scale,
    }
}

impl ViewerApp {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), VitrineError> {
        let attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| VitrineError::Host(e.to_string()))?,
        );

        let scale = window.scale_factor() as f32;
        let size = window.inner_size();
        let viewport = Viewport::new(
            size.width as f32 / scale,
            size.height as f32 / scale,
            scale,
        );
        let options = self.options.take().unwrap_or_default();
        let scene = CenterpieceScene::new(viewport, options, Instant::now());
        let engine =
            pollster::block_on(CenterpieceEngine::new(window.clone(), scene))?;

        if let Some(url) = self.env_url.clone() {
            let max_dim = engine.max_texture_dimension();
            let (tx, rx) = mpsc::channel();
            let _ = std::thread::spawn(move || {
                let _ = tx.send(load_environment(&url, max_dim));
            });
            self.env_rx = Some(rx);
        }

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
        Ok(())
    }

    fn redraw(&mut self) {
        let (Some(window), Some(engine)) = (&self.window, &mut self.engine)
        else {
            return;
        };
        if let Some(rx) = &self.env_rx {
            if let Ok(result) = rx.try_recv() {
                engine.queue_environment(result);
                self.env_rx = None;
            }
        }
        let _ = engine.render(Instant::now());
        window.request_redraw();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("failed to start viewer: {e}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let (Some(window), Some(engine)) =
                    (&self.window, &mut self.engine)
                {
                    engine.handle_event(resize_event(window), Instant::now());
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed =>
            {
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
                    PhysicalKey::Code(KeyCode::KeyR) => {
                        if let Some(engine) = &mut self.engine {
                            engine.reset(Instant::now());
                            log::info!("scene reset");
                        }
                    }
                    _ => {}
                }
            }

            _ => (),
        }
    }
}
