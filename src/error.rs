//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the vitrine crate.
#[derive(Debug)]
pub enum VitrineError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// WGSL composition or validation failure.
    Shader(String),
    /// Failed to fetch or decode an image or environment map.
    ResourceLoad(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// A parameter edit named a field the panel does not expose.
    UnknownParameter(String),
    /// A parameter edit carried a value of the wrong shape.
    InvalidParameter(String),
    /// Host environment failure (missing DOM node, event-loop error).
    Host(String),
}

impl fmt::Display for VitrineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::ResourceLoad(msg) => {
                write!(f, "resource load error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::UnknownParameter(name) => {
                write!(f, "unknown parameter: {name}")
            }
            Self::InvalidParameter(msg) => {
                write!(f, "invalid parameter value: {msg}")
            }
            Self::Host(msg) => write!(f, "host error: {msg}"),
        }
    }
}

impl std::error::Error for VitrineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for VitrineError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for VitrineError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<image::ImageError> for VitrineError {
    fn from(e: image::ImageError) -> Self {
        Self::ResourceLoad(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_parameter() {
        let e = VitrineError::UnknownParameter("bloom.glow".into());
        assert_eq!(e.to_string(), "unknown parameter: bloom.glow");
    }
}
