//! Render targets, sampled textures, and CPU-side image decoding.

use half::f16;

use crate::error::VitrineError;

/// A render-target texture and its default view.
pub struct RenderTarget {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
    /// Size in pixels.
    pub size: (u32, u32),
}

impl RenderTarget {
    /// Create a color target that can also be sampled by later passes.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        Self::with_usage(
            device,
            label,
            (width, height),
            format,
            wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING,
        )
    }

    /// Create a depth target.
    #[must_use]
    pub fn depth(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self::with_usage(
            device,
            "Depth Target",
            (width, height),
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        )
    }

    fn with_usage(
        device: &wgpu::Device,
        label: &str,
        size: (u32, u32),
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> Self {
        let size = (size.0.max(1), size.1.max(1));
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            size,
        }
    }
}

/// Depth format used by every 3D pass.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Decoded 8-bit RGBA pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Rgba8Image {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA bytes.
    pub pixels: Vec<u8>,
}

/// Decoded half-float RGBA pixels (linear radiance).
#[derive(Debug, Clone, PartialEq)]
pub struct HdrImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA halfs.
    pub pixels: Vec<f16>,
}

fn fit_within(
    img: image::DynamicImage,
    max_dimension: u32,
) -> image::DynamicImage {
    if img.width() <= max_dimension && img.height() <= max_dimension {
        return img;
    }
    log::debug!(
        "downscaling {}x{} image to fit {max_dimension}",
        img.width(),
        img.height()
    );
    img.resize(
        max_dimension,
        max_dimension,
        image::imageops::FilterType::Triangle,
    )
}

/// Decode a PNG/JPEG/WebP byte stream, downscaling to `max_dimension`.
///
/// # Errors
///
/// [`VitrineError::ResourceLoad`] when the bytes are not a supported image.
pub fn decode_rgba8(
    bytes: &[u8],
    max_dimension: u32,
) -> Result<Rgba8Image, VitrineError> {
    let img = fit_within(image::load_from_memory(bytes)?, max_dimension);
    let rgba = img.to_rgba8();
    Ok(Rgba8Image {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// Decode a Radiance HDR (or any supported) image to half-float RGBA.
///
/// # Errors
///
/// [`VitrineError::ResourceLoad`] when the bytes are not a supported image.
pub fn decode_hdr(
    bytes: &[u8],
    max_dimension: u32,
) -> Result<HdrImage, VitrineError> {
    let img = fit_within(image::load_from_memory(bytes)?, max_dimension);
    let rgba = img.to_rgba32f();
    Ok(HdrImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.as_raw().iter().map(|&v| f16::from_f32(v)).collect(),
    })
}

/// A sampled 2D texture and its view.
pub struct SampledTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl SampledTexture {
    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        size: (u32, u32),
        format: wgpu::TextureFormat,
        bytes: &[u8],
    ) -> Self {
        let extent = wgpu::Extent3d {
            width: size.0,
            height: size.1,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let bytes_per_pixel = format.block_copy_size(None).unwrap_or(4);
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytes,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_pixel * size.0),
                rows_per_image: Some(size.1),
            },
            extent,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// Single-pixel texture of `rgba`.
    #[must_use]
    pub fn solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        rgba: [u8; 4],
    ) -> Self {
        Self::upload(
            device,
            queue,
            label,
            (1, 1),
            wgpu::TextureFormat::Rgba8UnormSrgb,
            &rgba,
        )
    }

    /// sRGB color texture from decoded pixels.
    #[must_use]
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &Rgba8Image,
    ) -> Self {
        Self::upload(
            device,
            queue,
            label,
            (image.width, image.height),
            wgpu::TextureFormat::Rgba8UnormSrgb,
            &image.pixels,
        )
    }

    /// Linear half-float texture from decoded HDR pixels.
    #[must_use]
    pub fn from_hdr(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &HdrImage,
    ) -> Self {
        Self::upload(
            device,
            queue,
            label,
            (image.width, image.height),
            wgpu::TextureFormat::Rgba16Float,
            bytemuck::cast_slice(&image.pixels),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([255, 128, 0, 255]),
        );
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_to_rgba() {
        let decoded = decode_rgba8(&png_bytes(4, 2), 4096).unwrap();
        assert_eq!((decoded.width, decoded.height), (4, 2));
        assert_eq!(decoded.pixels.len(), 4 * 2 * 4);
        assert_eq!(&decoded.pixels[..4], &[255, 128, 0, 255]);
    }

    #[test]
    fn oversized_images_are_downscaled() {
        let decoded = decode_rgba8(&png_bytes(64, 32), 16).unwrap();
        assert_eq!((decoded.width, decoded.height), (16, 8));
    }

    #[test]
    fn garbage_is_a_resource_error() {
        let err = decode_rgba8(b"not an image", 16).unwrap_err();
        assert!(matches!(err, VitrineError::ResourceLoad(_)));
        assert!(decode_hdr(&[], 16).is_err());
    }

    #[test]
    fn hdr_decode_produces_half_floats() {
        let decoded = decode_hdr(&png_bytes(2, 2), 16).unwrap();
        assert_eq!(decoded.pixels.len(), 2 * 2 * 4);
        assert!((decoded.pixels[0].to_f32() - 1.0).abs() < 1e-3);
    }
}
