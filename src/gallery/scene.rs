//! Gallery scene session: camera, planes, pointer, and hover state.

use std::time::Duration;

use web_time::Instant;

use super::hover::{apply_hover, intersect_meshes};
use super::registry::{ElementKey, LayoutSource, MeshRegistry, TextureState};
use crate::camera::{Camera, CameraUniform, Ray, Viewport};
use crate::input::{is_touch_user_agent, InputEvent, PointerState};
use crate::options::DisplayOptions;
use crate::util::frame_timing::{FrameClock, FrameTime};

/// All state the gallery frame driver and input adapters share.
pub struct GalleryScene {
    viewport: Viewport,
    camera: Camera,
    uniform: CameraUniform,
    distance: f32,
    max_pixel_ratio: f32,
    hover_duration: Duration,
    hover_enabled: bool,
    registry: MeshRegistry,
    pointer: PointerState,
    hovered: Option<usize>,
    clock: FrameClock,
}

impl GalleryScene {
    /// Build the scene for `keys`, reading each element's box once.
    ///
    /// Hover tracking is disabled for touch user agents and never
    /// re-evaluated.
    #[must_use]
    pub fn new<S: LayoutSource + ?Sized>(
        viewport: Viewport,
        keys: impl IntoIterator<Item = ElementKey>,
        source: &S,
        display: &DisplayOptions,
        user_agent: &str,
        now: Instant,
    ) -> Self {
        let hover_enabled = !is_touch_user_agent(user_agent);
        let camera = Camera::pixel_perfect(viewport, display.gallery_distance);
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);
        let registry = MeshRegistry::build(keys, source, &viewport);
        log::info!(
            "gallery scene: {} planes, {}x{} viewport, hover {}",
            registry.len(),
            viewport.width,
            viewport.height,
            if hover_enabled { "on" } else { "off" }
        );

        let mut scene = Self {
            viewport,
            camera,
            uniform,
            distance: display.gallery_distance,
            max_pixel_ratio: display.max_pixel_ratio,
            hover_duration: Duration::try_from_secs_f32(display.hover_duration)
                .unwrap_or(Duration::ZERO),
            hover_enabled,
            registry,
            pointer: PointerState::default(),
            hovered: None,
            clock: FrameClock::starting_at(now),
        };
        scene.refresh_uniform(0.0);
        scene
    }

    /// Apply a new viewport. Returns `true` when anything changed.
    ///
    /// Recomputes aspect and the pixel-perfect FOV; calling it twice with
    /// the same viewport is the same as calling it once.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.camera = Camera::pixel_perfect(viewport, self.distance);
        self.refresh_uniform(self.uniform.time);
        true
    }

    /// Route one input event. Layout-affecting events re-sync the planes.
    pub fn handle_event<S: LayoutSource + ?Sized>(
        &mut self,
        event: InputEvent,
        source: &S,
        now: Instant,
    ) {
        match event {
            InputEvent::PointerMoved { x, y } => self.pointer_moved(x, y, now),
            InputEvent::Resized {
                width,
                height,
                pixel_ratio,
            } => {
                let _ = self.resize(Viewport::new(width, height, pixel_ratio));
            }
            InputEvent::Scrolled { .. } => {}
        }
        if event.affects_layout() {
            self.registry.sync_layout(source, &self.viewport);
        }
    }

    fn pointer_moved(&mut self, x: f32, y: f32, now: Instant) {
        if !self.hover_enabled {
            return;
        }
        let ndc = self.pointer.update(x, y, &self.viewport);
        let ray = Ray::from_ndc(ndc, self.camera.build_matrix());
        let hits = intersect_meshes(&ray, self.registry.meshes());
        let hovered = apply_hover(
            self.registry.meshes_mut(),
            &hits,
            now,
            self.hover_duration,
        );
        if hovered != self.hovered {
            log::trace!("hovered plane: {hovered:?}");
            self.hovered = hovered;
        }
    }

    /// Advance tweens to `now` and re-sync every plane with its element.
    pub fn frame<S: LayoutSource + ?Sized>(
        &mut self,
        source: &S,
        now: Instant,
    ) -> FrameTime {
        let time = self.clock.tick(now);
        self.registry.sample(now);
        self.registry.sync_layout(source, &self.viewport);
        self.refresh_uniform(time.elapsed);
        if self.clock.report_due(now) {
            log::debug!(
                "gallery: {:.1} fps, {} planes",
                self.clock.fps(),
                self.registry.len()
            );
        }
        time
    }

    /// Record a finished texture load.
    pub fn set_texture_state(&mut self, index: usize, state: TextureState) {
        self.registry.set_texture_state(index, state);
    }

    fn refresh_uniform(&mut self, time: f32) {
        self.uniform.update_view_proj(&self.camera);
        self.uniform.time = time;
        let (w, h) = self.surface_size();
        self.uniform.viewport = [w as f32, h as f32];
    }

    /// Current camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Camera uniform as of the last frame.
    #[must_use]
    pub fn camera_uniform(&self) -> &CameraUniform {
        &self.uniform
    }

    /// Current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Drawing-surface size with the pixel-ratio cap applied.
    #[must_use]
    pub fn surface_size(&self) -> (u32, u32) {
        self.viewport.surface_size(self.max_pixel_ratio)
    }

    /// Tracked planes.
    #[must_use]
    pub fn registry(&self) -> &MeshRegistry {
        &self.registry
    }

    /// Whether pointer hover is active for this session.
    #[must_use]
    pub fn hover_enabled(&self) -> bool {
        self.hover_enabled
    }

    /// Plane chosen by the last pointer move.
    #[must_use]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::gallery::layout::DomRect;

    const DESKTOP: &str = "Mozilla/5.0 (X11; Linux x86_64)";

    fn boxes() -> Vec<Option<DomRect>> {
        vec![
            Some(DomRect::new(100.0, 50.0, 200.0, 80.0)),
            Some(DomRect::new(450.0, 350.0, 100.0, 100.0)),
        ]
    }

    fn scene(ua: &str, now: Instant) -> GalleryScene {
        GalleryScene::new(
            Viewport::new(1000.0, 800.0, 3.0),
            (0..2).map(ElementKey),
            &boxes(),
            &DisplayOptions::default(),
            ua,
            now,
        )
    }

    #[test]
    fn resize_is_idempotent() {
        let t0 = Instant::now();
        let mut once = scene(DESKTOP, t0);
        let mut twice = scene(DESKTOP, t0);
        let vp = Viewport::new(1200.0, 600.0, 1.0);

        assert!(once.resize(vp));
        assert!(twice.resize(vp));
        assert!(!twice.resize(vp));

        assert_eq!(once.camera(), twice.camera());
        assert_eq!(once.surface_size(), twice.surface_size());
        assert_eq!(
            once.camera_uniform().view_proj,
            twice.camera_uniform().view_proj
        );
        assert_eq!(twice.surface_size(), (1200, 600));
    }

    #[test]
    fn resize_recomputes_pixel_perfect_fov() {
        let t0 = Instant::now();
        let mut s = scene(DESKTOP, t0);
        let _ = s.resize(Viewport::new(1000.0, 400.0, 1.0));
        let expected = Camera::pixel_perfect_fovy(400.0, 20.0);
        assert!((s.camera().fovy - expected).abs() < 1e-4);
    }

    #[test]
    fn surface_caps_pixel_ratio() {
        let s = scene(DESKTOP, Instant::now());
        assert_eq!(s.surface_size(), (2000, 1600));
    }

    #[test]
    fn pointer_hovers_plane_under_cursor() {
        let t0 = Instant::now();
        let mut s = scene(DESKTOP, t0);
        // Center of the second box.
        s.handle_event(InputEvent::PointerMoved { x: 500.0, y: 400.0 }, &boxes(), t0);
        assert_eq!(s.hovered(), Some(1));
        let mesh = &s.registry().meshes()[1];
        assert_eq!(mesh.hover.target(), 1.0);
        let uv = mesh.pointer_uv.target();
        assert!((uv.x - 0.5).abs() < 1e-2 && (uv.y - 0.5).abs() < 1e-2);

        // Off every plane.
        s.handle_event(InputEvent::PointerMoved { x: 990.0, y: 10.0 }, &boxes(), t0);
        assert_eq!(s.hovered(), None);
        assert!(s.registry().meshes().iter().all(|m| m.hover.target() == 0.0));
    }

    #[test]
    fn touch_devices_ignore_pointer() {
        let t0 = Instant::now();
        let mut s = scene("Mozilla/5.0 (iPad; CPU OS 17_0)", t0);
        assert!(!s.hover_enabled());
        s.handle_event(InputEvent::PointerMoved { x: 500.0, y: 400.0 }, &boxes(), t0);
        assert_eq!(s.hovered(), None);
        assert!(!s.registry().is_animating());
    }

    #[test]
    fn scroll_and_frame_resync_layout() {
        let t0 = Instant::now();
        let mut s = scene(DESKTOP, t0);
        let mut moved = boxes();
        moved[0] = Some(DomRect::new(100.0, 0.0, 200.0, 80.0));

        s.handle_event(InputEvent::Scrolled { offset: 50.0 }, &moved, t0);
        assert_eq!(s.registry().meshes()[0].position, Vec3::new(-300.0, 360.0, 0.0));

        moved[0] = None;
        let _ = s.frame(&moved, t0 + Duration::from_millis(16));
        assert!(s.registry().meshes()[0].geometry.is_collapsed());
    }

    #[test]
    fn pointer_move_leaves_layout_alone() {
        let t0 = Instant::now();
        let mut s = scene(DESKTOP, t0);
        let before = s.registry().meshes()[0].position;
        let mut moved = boxes();
        moved[0] = Some(DomRect::new(100.0, 0.0, 200.0, 80.0));

        s.handle_event(InputEvent::PointerMoved { x: 10.0, y: 10.0 }, &moved, t0);
        assert_eq!(s.registry().meshes()[0].position, before);
    }
}
