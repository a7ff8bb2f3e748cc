//! CPU ray casting for pointer hit tests.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point (on the camera's near plane).
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

/// Where a ray crossed an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectHit {
    /// Distance along the ray from its origin.
    pub distance: f32,
    /// Surface UV: `(0, 0)` bottom-left, `(1, 1)` top-right.
    pub uv: Vec2,
}

impl Ray {
    /// Ray through a point given in normalized device coordinates
    /// (x right, y up, both in [-1, 1]).
    #[must_use]
    pub fn from_ndc(ndc: Vec2, view_proj: Mat4) -> Self {
        let inv_view_proj = view_proj.inverse();

        // wgpu depth range is [0, 1]
        let near = inv_view_proj * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inv_view_proj * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let origin = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        Self {
            origin,
            direction: (far - origin).normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersect a double-sided rectangle lying in the plane
    /// `z = center.z`, centered at `center` with extents `size`.
    ///
    /// Zero-area rectangles are never hit.
    #[must_use]
    pub fn intersect_rect(&self, center: Vec3, size: Vec2) -> Option<RectHit> {
        if size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }
        if self.direction.z.abs() < f32::EPSILON {
            return None;
        }

        let t = (center.z - self.origin.z) / self.direction.z;
        if t < 0.0 {
            return None;
        }

        let local = self.at(t) - center;
        let half = size * 0.5;
        if local.x.abs() > half.x || local.y.abs() > half.y {
            return None;
        }

        Some(RectHit {
            distance: t,
            uv: Vec2::new(local.x / size.x + 0.5, local.y / size.y + 0.5),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::core::Camera;
    use crate::camera::viewport::Viewport;

    fn gallery_camera() -> Camera {
        Camera::pixel_perfect(Viewport::new(1000.0, 800.0, 1.0), 20.0)
    }

    #[test]
    fn center_ray_points_down_negative_z() {
        let ray = Ray::from_ndc(Vec2::ZERO, gallery_camera().build_matrix());
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn hits_rect_with_expected_uv() {
        let ray = Ray::from_ndc(Vec2::ZERO, gallery_camera().build_matrix());
        let hit = ray
            .intersect_rect(Vec3::new(50.0, -20.0, 0.0), Vec2::new(200.0, 80.0))
            .unwrap();
        // The origin sits 50 px left of and 20 px above the rect center.
        assert!((hit.uv.x - 0.25).abs() < 1e-3, "u = {}", hit.uv.x);
        assert!((hit.uv.y - 0.75).abs() < 1e-3, "v = {}", hit.uv.y);
    }

    #[test]
    fn ndc_corner_lands_on_viewport_corner() {
        let ray = Ray::from_ndc(Vec2::new(1.0, 1.0), gallery_camera().build_matrix());
        let hit = ray
            .intersect_rect(Vec3::new(490.0, 390.0, 0.0), Vec2::new(40.0, 40.0))
            .unwrap();
        assert!((hit.uv.x - 0.75).abs() < 1e-2, "u = {}", hit.uv.x);
        assert!((hit.uv.y - 0.75).abs() < 1e-2, "v = {}", hit.uv.y);
    }

    #[test]
    fn misses_outside_and_degenerate_rects() {
        let ray = Ray::from_ndc(Vec2::ZERO, gallery_camera().build_matrix());
        assert!(ray
            .intersect_rect(Vec3::new(300.0, 0.0, 0.0), Vec2::new(100.0, 100.0))
            .is_none());
        assert!(ray.intersect_rect(Vec3::ZERO, Vec2::ZERO).is_none());
    }
}
