/// Host viewport in CSS pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in CSS (logical) pixels.
    pub width: f32,
    /// Height in CSS (logical) pixels.
    pub height: f32,
    /// Device pixel ratio reported by the host.
    pub pixel_ratio: f32,
}

impl Viewport {
    /// Create a viewport. Non-finite or non-positive dimensions are clamped
    /// to one pixel so aspect ratios stay finite.
    #[must_use]
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() && v >= 1.0 { v } else { 1.0 };
        Self {
            width: sanitize(width),
            height: sanitize(height),
            pixel_ratio: if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
                pixel_ratio
            } else {
                1.0
            },
        }
    }

    /// Width / height.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Pixel ratio capped at `max_ratio`.
    #[must_use]
    pub fn effective_pixel_ratio(&self, max_ratio: f32) -> f32 {
        self.pixel_ratio.min(max_ratio.max(1.0))
    }

    /// Drawing-surface size in physical pixels, with the pixel ratio capped
    /// at `max_ratio`. Never smaller than 1x1.
    #[must_use]
    pub fn surface_size(&self, max_ratio: f32) -> (u32, u32) {
        let ratio = self.effective_pixel_ratio(max_ratio);
        (
            ((self.width * ratio).round() as u32).max(1),
            ((self.height * ratio).round() as u32).max(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_size_caps_pixel_ratio() {
        let vp = Viewport::new(800.0, 600.0, 3.0);
        assert_eq!(vp.surface_size(2.0), (1600, 1200));
        let vp = Viewport::new(800.0, 600.0, 1.5);
        assert_eq!(vp.surface_size(2.0), (1200, 900));
    }

    #[test]
    fn degenerate_dimensions_are_clamped() {
        let vp = Viewport::new(0.0, f32::NAN, -1.0);
        assert_eq!(vp.width, 1.0);
        assert_eq!(vp.height, 1.0);
        assert_eq!(vp.pixel_ratio, 1.0);
        assert_eq!(vp.surface_size(2.0), (1, 1));
    }
}
