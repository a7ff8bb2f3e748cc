//! Pure DOM-box to world-space layout.

use glam::{Vec2, Vec3};

use crate::camera::Viewport;

/// Bounding box of a DOM element in client coordinates (CSS px, origin
/// top-left, Y down), as returned by `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomRect {
    /// Distance from the viewport's left edge.
    pub left: f32,
    /// Distance from the viewport's top edge.
    pub top: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
}

impl DomRect {
    /// Create a box.
    #[must_use]
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// Plane extents in world units. Replaced wholesale on every layout sync.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaneGeometry {
    /// Extent along X.
    pub width: f32,
    /// Extent along Y.
    pub height: f32,
}

impl PlaneGeometry {
    /// Zero-area geometry used for missing sources.
    pub const COLLAPSED: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Extents as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Whether the plane has no area and cannot be hit or seen.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// World placement of one plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneLayout {
    /// Plane center on the `z = 0` plane.
    pub center: Vec3,
    /// Plane extents.
    pub geometry: PlaneGeometry,
}

impl PlaneLayout {
    /// Layout for a missing source.
    pub const COLLAPSED: Self = Self {
        center: Vec3::ZERO,
        geometry: PlaneGeometry::COLLAPSED,
    };
}

/// Place a plane so it overlays its DOM box under a pixel-perfect camera.
///
/// World origin is the viewport center with Y up. A missing box, or one
/// with non-finite values, collapses the plane to zero size.
#[must_use]
pub fn plane_layout(rect: Option<DomRect>, viewport: &Viewport) -> PlaneLayout {
    let Some(rect) = rect.filter(DomRect::is_finite) else {
        return PlaneLayout::COLLAPSED;
    };

    let width = rect.width.max(0.0);
    let height = rect.height.max(0.0);

    PlaneLayout {
        center: Vec3::new(
            rect.left - viewport.width / 2.0 + width / 2.0,
            -rect.top + viewport.height / 2.0 - height / 2.0,
            0.0,
        ),
        geometry: PlaneGeometry { width, height },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlays_dom_box() {
        let vp = Viewport::new(1000.0, 800.0, 1.0);
        let layout =
            plane_layout(Some(DomRect::new(100.0, 50.0, 200.0, 80.0)), &vp);
        assert_eq!(layout.center, Vec3::new(-300.0, 310.0, 0.0));
        assert_eq!(layout.geometry.size(), Vec2::new(200.0, 80.0));
    }

    #[test]
    fn box_filling_viewport_is_centered() {
        let vp = Viewport::new(1000.0, 800.0, 2.0);
        let layout =
            plane_layout(Some(DomRect::new(0.0, 0.0, 1000.0, 800.0)), &vp);
        assert_eq!(layout.center, Vec3::ZERO);
    }

    #[test]
    fn missing_or_broken_box_collapses() {
        let vp = Viewport::new(1000.0, 800.0, 1.0);
        assert_eq!(plane_layout(None, &vp), PlaneLayout::COLLAPSED);
        let broken = DomRect::new(f32::NAN, 0.0, 10.0, 10.0);
        let layout = plane_layout(Some(broken), &vp);
        assert!(layout.geometry.is_collapsed());
    }
}
