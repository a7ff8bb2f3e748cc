use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use crate::error::VitrineError;

/// Every WGSL entry shader the crate builds a pipeline from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shader {
    /// Gallery image plane with hover distortion.
    Plane,
    /// Centerpiece torus knot.
    Knot,
    /// Centerpiece particle sprites.
    Particles,
    /// Bloom luminosity high-pass.
    BloomThreshold,
    /// Bloom separable blur.
    BloomBlur,
    /// Bloom weighted upsample.
    BloomUpsample,
    /// Tone-mapping composite.
    Composite,
}

impl Shader {
    /// All entry shaders.
    pub const ALL: [Self; 7] = [
        Self::Plane,
        Self::Knot,
        Self::Particles,
        Self::BloomThreshold,
        Self::BloomBlur,
        Self::BloomUpsample,
        Self::Composite,
    ];

    /// WGSL source text.
    #[must_use]
    pub fn source(self) -> &'static str {
        match self {
            Self::Plane => {
                include_str!("../../assets/shaders/raster/plane.wgsl")
            }
            Self::Knot => include_str!("../../assets/shaders/raster/knot.wgsl"),
            Self::Particles => {
                include_str!("../../assets/shaders/raster/particles.wgsl")
            }
            Self::BloomThreshold => {
                include_str!("../../assets/shaders/screen/bloom_threshold.wgsl")
            }
            Self::BloomBlur => {
                include_str!("../../assets/shaders/screen/bloom_blur.wgsl")
            }
            Self::BloomUpsample => {
                include_str!("../../assets/shaders/screen/bloom_upsample.wgsl")
            }
            Self::Composite => {
                include_str!("../../assets/shaders/screen/composite.wgsl")
            }
        }
    }

    /// Path used in composer diagnostics.
    #[must_use]
    pub fn file_path(self) -> &'static str {
        match self {
            Self::Plane => "raster/plane.wgsl",
            Self::Knot => "raster/knot.wgsl",
            Self::Particles => "raster/particles.wgsl",
            Self::BloomThreshold => "screen/bloom_threshold.wgsl",
            Self::BloomBlur => "screen/bloom_blur.wgsl",
            Self::BloomUpsample => "screen/bloom_upsample.wgsl",
            Self::Composite => "screen/composite.wgsl",
        }
    }
}

/// Shared modules, in dependency order: (source, file path).
const MODULES: [(&str, &str); 3] = [
    (
        include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
        "modules/fullscreen.wgsl",
    ),
    (
        include_str!("../../assets/shaders/modules/camera.wgsl"),
        "modules/camera.wgsl",
    ),
    (
        include_str!("../../assets/shaders/modules/color.wgsl"),
        "modules/color.wgsl",
    ),
];

/// Wraps `naga_oil::compose::Composer` so entry shaders can
/// `#import vitrine::module` the shared WGSL modules.
///
/// The composer hands `naga::Module` IR straight to wgpu, skipping a
/// second WGSL parse.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Composer with every shared module registered.
    ///
    /// # Errors
    ///
    /// [`VitrineError::Shader`] if a shared module fails to parse.
    pub fn new() -> Result<Self, VitrineError> {
        let mut composer = Composer::default();
        for (source, file_path) in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source,
                    file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    VitrineError::Shader(format!(
                        "failed to register {file_path}: {e}"
                    ))
                })?;
        }
        Ok(Self { composer })
    }

    /// Compose `shader` into a `wgpu::ShaderModule`.
    ///
    /// # Errors
    ///
    /// [`VitrineError::Shader`] when composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        shader: Shader,
    ) -> Result<wgpu::ShaderModule, VitrineError> {
        let module = self.compose_naga(shader)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(shader.file_path()),
            source: wgpu::ShaderSource::Naga(Cow::Owned(module)),
        }))
    }

    /// Compose `shader` to naga IR without touching a device.
    ///
    /// # Errors
    ///
    /// [`VitrineError::Shader`] when composition fails.
    pub fn compose_naga(
        &mut self,
        shader: Shader,
    ) -> Result<naga::Module, VitrineError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source: shader.source(),
                file_path: shader.file_path(),
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                VitrineError::Shader(format!("{}: {e}", shader.file_path()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in Shader::ALL {
            let module = composer
                .compose_naga(shader)
                .unwrap_or_else(|e| panic!("{e}"));
            let entries: Vec<_> =
                module.entry_points.iter().map(|e| e.name.as_str()).collect();
            assert!(entries.contains(&"vs_main"), "{shader:?}");
            assert!(entries.contains(&"fs_main"), "{shader:?}");
        }
    }

    #[test]
    fn composed_shaders_validate() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in Shader::ALL {
            let module = composer.compose_naga(shader).unwrap();
            let mut validator = naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::default(),
            );
            let _ = validator
                .validate(&module)
                .unwrap_or_else(|e| panic!("{shader:?}: {e:?}"));
        }
    }
}
