use glam::Vec2;

use crate::camera::Viewport;

const TOUCH_AGENTS: [&str; 4] = ["iphone", "ipad", "ipod", "android"];

/// Whether a user-agent string belongs to a touch-first mobile device.
///
/// Matching is case-insensitive on `iPhone`, `iPad`, `iPod` and `Android`.
#[must_use]
pub fn is_touch_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    TOUCH_AGENTS.iter().any(|agent| ua.contains(agent))
}

/// Convert client coordinates (CSS px, origin top-left) to normalized
/// device coordinates in [-1, 1] with Y up.
#[must_use]
pub fn client_to_ndc(x: f32, y: f32, viewport: &Viewport) -> Vec2 {
    Vec2::new(
        x / viewport.width * 2.0 - 1.0,
        -(y / viewport.height) * 2.0 + 1.0,
    )
}

/// Last known pointer position in NDC.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    ndc: Option<Vec2>,
}

impl PointerState {
    /// Record a pointer move.
    pub fn update(&mut self, x: f32, y: f32, viewport: &Viewport) -> Vec2 {
        let ndc = client_to_ndc(x, y, viewport);
        self.ndc = Some(ndc);
        ndc
    }

    /// Most recent NDC position, if the pointer has moved at all.
    #[must_use]
    pub fn ndc(&self) -> Option<Vec2> {
        self.ndc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_agents_detected() {
        assert!(is_touch_user_agent(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)"
        ));
        assert!(is_touch_user_agent("Mozilla/5.0 (Linux; ANDROID 14)"));
        assert!(is_touch_user_agent("ipad"));
        assert!(!is_touch_user_agent(
            "Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0"
        ));
    }

    #[test]
    fn ndc_corners() {
        let vp = Viewport::new(1000.0, 800.0, 1.0);
        assert_eq!(client_to_ndc(0.0, 0.0, &vp), Vec2::new(-1.0, 1.0));
        assert_eq!(client_to_ndc(1000.0, 800.0, &vp), Vec2::new(1.0, -1.0));
        assert_eq!(client_to_ndc(500.0, 400.0, &vp), Vec2::ZERO);
    }

    #[test]
    fn pointer_state_overwrites() {
        let vp = Viewport::new(100.0, 100.0, 1.0);
        let mut state = PointerState::default();
        assert!(state.ndc().is_none());
        let _ = state.update(0.0, 0.0, &vp);
        let last = state.update(100.0, 50.0, &vp);
        assert_eq!(state.ndc(), Some(last));
        assert_eq!(last, Vec2::new(1.0, 0.0));
    }
}
