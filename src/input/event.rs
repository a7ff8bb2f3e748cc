/// Platform-agnostic input events consumed by the scene cores.
///
/// Hosts translate DOM or winit events into these and hand them to
/// [`GalleryScene::handle_event`](crate::gallery::GalleryScene::handle_event)
/// or [`CenterpieceScene::handle_event`](crate::centerpiece::CenterpieceScene::handle_event).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a client-space position.
    PointerMoved {
        /// Horizontal position in CSS pixels from the left edge.
        x: f32,
        /// Vertical position in CSS pixels from the top edge.
        y: f32,
    },
    /// The page scroll position changed.
    Scrolled {
        /// Vertical scroll offset in CSS pixels.
        offset: f32,
    },
    /// The host viewport changed size.
    Resized {
        /// New width in CSS pixels.
        width: f32,
        /// New height in CSS pixels.
        height: f32,
        /// Device pixel ratio.
        pixel_ratio: f32,
    },
}

impl InputEvent {
    /// Whether this event changes where DOM-tracked planes sit on screen.
    #[must_use]
    pub fn affects_layout(&self) -> bool {
        matches!(self, Self::Scrolled { .. } | Self::Resized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_events() {
        assert!(InputEvent::Scrolled { offset: 10.0 }.affects_layout());
        assert!(InputEvent::Resized {
            width: 1.0,
            height: 1.0,
            pixel_ratio: 1.0
        }
        .affects_layout());
        assert!(!InputEvent::PointerMoved { x: 0.0, y: 0.0 }.affects_layout());
    }
}
