//! Input handling: platform-agnostic events, pointer normalization, the
//! mobile pointer policy, and the resize debouncer.

/// Resize debouncing.
pub mod debounce;
/// Platform-agnostic input events.
pub mod event;
/// Pointer coordinates and user-agent policy.
pub mod pointer;

pub use debounce::Debouncer;
pub use event::InputEvent;
pub use pointer::{client_to_ndc, is_touch_user_agent, PointerState};

/// Host event listener a demo asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    /// Viewport resize.
    Resize,
    /// Page scroll position.
    Scroll,
    /// Pointer movement (hover distortion).
    PointerMove,
}

/// Listeners the gallery registers for a user agent. Touch devices get no
/// pointer listener; everything else gets exactly one.
#[must_use]
pub fn gallery_listeners(user_agent: &str) -> Vec<Listener> {
    let mut listeners = vec![Listener::Resize, Listener::Scroll];
    if !is_touch_user_agent(user_agent) {
        listeners.push(Listener::PointerMove);
    }
    listeners
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointer_count(ua: &str) -> usize {
        gallery_listeners(ua)
            .iter()
            .filter(|l| **l == Listener::PointerMove)
            .count()
    }

    #[test]
    fn pointer_listener_registration() {
        assert_eq!(pointer_count("Mozilla/5.0 (iPod touch)"), 0);
        assert_eq!(pointer_count("Mozilla/5.0 (Windows NT 10.0)"), 1);
        assert!(gallery_listeners("Android").contains(&Listener::Scroll));
    }
}
