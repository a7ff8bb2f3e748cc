use glam::{Mat4, Vec3};

use super::viewport::Viewport;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and camera metadata.
///
/// Layout matches `vitrine::camera::CameraUniform` in WGSL (96 bytes).
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Seconds since the scene started (for shader animation).
    pub time: f32,
    /// Drawing-surface size in physical pixels.
    pub viewport: [f32; 2],
    /// Padding for GPU alignment.
    pub(crate) _pad: [f32; 2],
}

impl Camera {
    /// Near plane used by the gallery camera.
    pub const GALLERY_ZNEAR: f32 = 0.1;
    /// Far plane used by the gallery camera.
    pub const GALLERY_ZFAR: f32 = 100.0;

    /// Vertical FOV (degrees) at which one world unit covers one CSS pixel
    /// on the `z = 0` plane, for a camera `distance` units away.
    #[must_use]
    pub fn pixel_perfect_fovy(viewport_height: f32, distance: f32) -> f32 {
        (2.0 * ((viewport_height / 2.0) / distance).atan()).to_degrees()
    }

    /// Camera on the +Z axis whose projection maps world units to CSS
    /// pixels, so DOM coordinates can be used directly as positions.
    #[must_use]
    pub fn pixel_perfect(viewport: Viewport, distance: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: viewport.aspect(),
            fovy: Self::pixel_perfect_fovy(viewport.height, distance),
            znear: Self::GALLERY_ZNEAR,
            zfar: Self::GALLERY_ZFAR,
        }
    }

    /// Camera with a fixed field of view looking at the origin.
    #[must_use]
    pub fn fixed(viewport: Viewport, fovy: f32, eye: Vec3) -> Self {
        Self {
            eye,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: viewport.aspect(),
            fovy,
            znear: 0.1,
            zfar: 100.0,
        }
    }

    /// Build the view matrix.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Build the projection matrix.
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.build_view()
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            time: 0.0,
            viewport: [1.0, 1.0],
            _pad: [0.0; 2],
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.position = camera.eye.to_array();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    fn project(camera: &Camera, p: Vec3) -> Vec3 {
        let clip = camera.build_matrix() * Vec4::from((p, 1.0));
        clip.truncate() / clip.w
    }

    #[test]
    fn pixel_perfect_maps_viewport_edges_to_ndc() {
        let vp = Viewport::new(1000.0, 800.0, 1.0);
        let camera = Camera::pixel_perfect(vp, 20.0);

        // Top-right corner of the viewport in world units.
        let ndc = project(&camera, Vec3::new(500.0, 400.0, 0.0));
        assert!((ndc.x - 1.0).abs() < 1e-3, "x = {}", ndc.x);
        assert!((ndc.y - 1.0).abs() < 1e-3, "y = {}", ndc.y);

        let ndc = project(&camera, Vec3::new(-250.0, 0.0, 0.0));
        assert!((ndc.x + 0.5).abs() < 1e-3);
    }

    #[test]
    fn pixel_perfect_fovy_value() {
        // 2 * atan(400 / 20) in degrees
        let fovy = Camera::pixel_perfect_fovy(800.0, 20.0);
        assert!((fovy - 174.275_5).abs() < 1e-2, "fovy = {fovy}");
    }

    #[test]
    fn uniform_is_96_bytes() {
        assert_eq!(size_of::<CameraUniform>(), 96);
    }
}
