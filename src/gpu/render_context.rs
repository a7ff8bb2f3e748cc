use std::fmt;

/// Errors that can occur during GPU context initialization.
#[derive(Debug)]
pub enum RenderContextError {
    /// Failed to create a wgpu surface from the window or canvas.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    AdapterRequest(wgpu::RequestAdapterError),
    /// GPU device request failed (limits or features not met).
    DeviceRequest(wgpu::RequestDeviceError),
    /// Surface configuration not supported by the selected adapter.
    UnsupportedSurface,
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceCreation(e) => {
                write!(f, "surface creation failed: {e}")
            }
            Self::AdapterRequest(e) => {
                write!(f, "no compatible GPU adapter found: {e}")
            }
            Self::DeviceRequest(e) => write!(f, "device request failed: {e}"),
            Self::UnsupportedSurface => {
                write!(f, "surface configuration not supported by adapter")
            }
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SurfaceCreation(e) => Some(e),
            Self::AdapterRequest(e) => Some(e),
            Self::DeviceRequest(e) => Some(e),
            Self::UnsupportedSurface => None,
        }
    }
}

/// How the presented surface blends with whatever is behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceAlpha {
    /// Opaque output.
    #[default]
    Opaque,
    /// Premultiplied alpha, so page content shows through cleared pixels.
    Transparent,
}

impl SurfaceAlpha {
    /// Composite mode to configure from the adapter's `supported` list, or
    /// `None` to keep the default.
    ///
    /// Transparent surfaces need `PreMultiplied`: every shader drawing into
    /// them writes premultiplied color.
    #[must_use]
    pub fn composite_mode(
        self,
        supported: &[wgpu::CompositeAlphaMode],
    ) -> Option<wgpu::CompositeAlphaMode> {
        match self {
            Self::Opaque => None,
            Self::Transparent => supported
                .iter()
                .copied()
                .find(|m| *m == wgpu::CompositeAlphaMode::PreMultiplied),
        }
    }
}

/// Owns the core wgpu resources: device, queue, surface, and configuration.
pub struct RenderContext {
    /// The wgpu logical device.
    pub device: wgpu::Device,
    /// The wgpu command queue.
    pub queue: wgpu::Queue,
    /// The presentation surface.
    pub surface: wgpu::Surface<'static>,
    /// Current surface configuration (format, size, present mode).
    pub config: wgpu::SurfaceConfiguration,
    /// Format for HDR scene targets: `Rgba16Float` where renderable,
    /// otherwise `Rgba8Unorm`.
    pub hdr_format: wgpu::TextureFormat,
}

impl RenderContext {
    /// Create a new render context from a window or canvas surface target
    /// and initial size in physical pixels.
    ///
    /// # Errors
    ///
    /// Returns `RenderContextError` if surface creation, adapter request,
    /// device request, or surface configuration fails.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
        alpha: SurfaceAlpha,
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(target)
            .map_err(RenderContextError::SurfaceCreation)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::AdapterRequest)?;
        log::info!("GPU adapter: {:?}", adapter.get_info());

        // WebGL2 cannot meet the default limits.
        let required_limits = if cfg!(target_arch = "wasm32") {
            wgpu::Limits::downlevel_webgl2_defaults()
                .using_resolution(adapter.limits())
        } else {
            wgpu::Limits::default()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Primary Device"),
                required_features: wgpu::Features::empty(),
                required_limits,
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::DeviceRequest)?;

        let width = initial_size.0.max(1);
        let height = initial_size.1.max(1);
        let mut config = surface
            .get_default_config(&adapter, width, height)
            .ok_or(RenderContextError::UnsupportedSurface)?;

        let caps = surface.get_capabilities(&adapter);
        if let Some(srgb) = caps.formats.iter().copied().find(|f| f.is_srgb())
        {
            config.format = srgb;
        }
        match alpha.composite_mode(&caps.alpha_modes) {
            Some(mode) => config.alpha_mode = mode,
            None if alpha == SurfaceAlpha::Transparent => {
                log::warn!("premultiplied surface unsupported, presenting opaque");
            }
            None => {}
        }
        config.present_mode = wgpu::PresentMode::Fifo;
        surface.configure(&device, &config);

        let hdr_format = if adapter
            .get_texture_format_features(wgpu::TextureFormat::Rgba16Float)
            .allowed_usages
            .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
        {
            wgpu::TextureFormat::Rgba16Float
        } else {
            log::warn!("Rgba16Float not renderable, bloom runs in LDR");
            wgpu::TextureFormat::Rgba8Unorm
        };

        Ok(Self {
            device,
            queue,
            surface,
            config,
            hdr_format,
        })
    }

    /// The surface texture format.
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current surface size in physical pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Largest texture edge the device accepts.
    #[must_use]
    pub fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    /// Reconfigure the surface for a new size. Ignores zero-sized
    /// dimensions. Returns `true` when the size changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        if (width, height) == self.size() {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        true
    }

    /// Re-apply the current configuration after the surface was lost or
    /// became outdated.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquire the next swapchain texture for rendering.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the surface is lost, outdated,
    /// or timed out.
    pub fn get_next_frame(
        &self,
    ) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Create a new command encoder for recording GPU commands.
    #[must_use]
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            })
    }

    /// Finish the encoder and submit its command buffer to the GPU queue.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use wgpu::CompositeAlphaMode;

    use super::*;

    #[test]
    fn transparent_surface_prefers_premultiplied() {
        let modes = [
            CompositeAlphaMode::Opaque,
            CompositeAlphaMode::PostMultiplied,
            CompositeAlphaMode::PreMultiplied,
        ];
        assert_eq!(
            SurfaceAlpha::Transparent.composite_mode(&modes),
            Some(CompositeAlphaMode::PreMultiplied)
        );
    }

    #[test]
    fn post_multiplied_alone_is_not_used() {
        let modes = [CompositeAlphaMode::PostMultiplied, CompositeAlphaMode::Opaque];
        assert_eq!(SurfaceAlpha::Transparent.composite_mode(&modes), None);
    }

    #[test]
    fn opaque_surface_keeps_default() {
        let modes = [CompositeAlphaMode::PreMultiplied];
        assert_eq!(SurfaceAlpha::Opaque.composite_mode(&modes), None);
    }
}
