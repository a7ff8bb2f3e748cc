//! Centerpiece scene session: knot, particle field, live parameters.

use std::time::Duration;

use glam::{Mat4, Vec3};
use serde_json::Value;
use web_time::Instant;

use super::particles::ParticleField;
use crate::camera::{Camera, CameraUniform, Viewport};
use crate::error::VitrineError;
use crate::input::{Debouncer, InputEvent};
use crate::options::{Options, ParameterPanel};
use crate::util::frame_timing::{FrameClock, FrameTime};

/// Bloom parameters read by the post-process chain each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomParams {
    /// Overall contribution.
    pub strength: f32,
    /// Mip-chain spread in [0, 1].
    pub radius: f32,
    /// Luminance threshold.
    pub threshold: f32,
}

/// Knot material read by the knot pipeline each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    /// Linear base color.
    pub color: Vec3,
    /// Metalness in [0, 1].
    pub metalness: f32,
    /// Roughness in [0, 1].
    pub roughness: f32,
    /// Environment reflection scale.
    pub env_intensity: f32,
}

impl From<&Options> for BloomParams {
    fn from(options: &Options) -> Self {
        Self {
            strength: options.bloom.strength,
            radius: options.bloom.radius,
            threshold: options.bloom.threshold,
        }
    }
}

impl From<&Options> for MaterialParams {
    fn from(options: &Options) -> Self {
        Self {
            color: Vec3::from(options.material.color),
            metalness: options.material.metalness,
            roughness: options.material.roughness,
            env_intensity: options.material.env_intensity,
        }
    }
}

/// What changed during a frame, for the engine to push to the GPU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterpieceFrame {
    /// Time step.
    pub time: FrameTime,
    /// New surface size if a debounced resize or a pixel-ratio cap change
    /// landed this frame.
    pub resized: Option<(u32, u32)>,
}

fn camera_for(viewport: Viewport, options: &Options) -> Camera {
    Camera::fixed(
        viewport,
        options.display.fovy,
        Vec3::new(0.0, 0.0, options.display.camera_distance),
    )
}

fn particles_for(options: &Options) -> ParticleField {
    let scene = &options.scene;
    ParticleField::new(
        scene.particle_count,
        scene.particle_spread,
        scene.drift_amplitude,
        scene.seed,
    )
}

/// All state the centerpiece frame driver and panel adapter share.
pub struct CenterpieceScene {
    options: Options,
    panel: ParameterPanel,
    bloom: BloomParams,
    material: MaterialParams,
    viewport: Viewport,
    camera: Camera,
    uniform: CameraUniform,
    particles: ParticleField,
    knot_model: Mat4,
    field_model: Mat4,
    pending_resize: Debouncer<Viewport>,
    surface_dirty: bool,
    params_dirty: bool,
    clock: FrameClock,
}

impl CenterpieceScene {
    /// Build the scene for `viewport` from `options`.
    #[must_use]
    pub fn new(viewport: Viewport, options: Options, now: Instant) -> Self {
        let camera = camera_for(viewport, &options);
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);
        let particles = particles_for(&options);
        log::info!(
            "centerpiece scene: {} particles, {}x{} viewport",
            particles.len(),
            viewport.width,
            viewport.height
        );

        let mut scene = Self {
            panel: ParameterPanel::for_options(),
            bloom: BloomParams::from(&options),
            material: MaterialParams::from(&options),
            viewport,
            camera,
            uniform,
            particles,
            knot_model: Mat4::IDENTITY,
            field_model: Mat4::IDENTITY,
            pending_resize: Debouncer::new(Duration::from_millis(
                options.display.resize_debounce_ms,
            )),
            surface_dirty: false,
            params_dirty: true,
            clock: FrameClock::starting_at(now),
            options,
        };
        scene.refresh_uniform(0.0);
        scene
    }

    /// Route one input event. Resizes are debounced.
    pub fn handle_event(&mut self, event: InputEvent, now: Instant) {
        if let InputEvent::Resized {
            width,
            height,
            pixel_ratio,
        } = event
        {
            self.pending_resize
                .schedule(now, Viewport::new(width, height, pixel_ratio));
        }
    }

    /// Apply a viewport immediately. Returns `true` when anything changed.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.camera.aspect = viewport.aspect();
        self.refresh_uniform(self.uniform.time);
        true
    }

    /// Advance rotation and drift to `now` and land any settled resize.
    pub fn frame(&mut self, now: Instant) -> CenterpieceFrame {
        let time = self.clock.tick(now);

        let landed = self
            .pending_resize
            .poll(now)
            .is_some_and(|vp| self.resize(vp));
        let cap_changed = std::mem::take(&mut self.surface_dirty);
        let resized = (landed || cap_changed).then(|| self.surface_size());

        let scene = &self.options.scene;
        self.knot_model = Mat4::from_rotation_y(time.elapsed * scene.knot_spin_y)
            * Mat4::from_rotation_x(time.elapsed * scene.knot_spin_x);
        self.field_model = Mat4::from_rotation_y(time.elapsed * scene.field_spin);
        self.particles.drift(time.elapsed);
        self.refresh_uniform(time.elapsed);

        if self.clock.report_due(now) {
            log::debug!(
                "centerpiece: {:.1} fps, {} particles",
                self.clock.fps(),
                self.particles.len()
            );
        }

        CenterpieceFrame { time, resized }
    }

    /// Restart elapsed time and particle drift from the seed state.
    pub fn reset(&mut self, now: Instant) {
        self.clock.reset(now);
        self.particles.reset();
        self.knot_model = Mat4::IDENTITY;
        self.field_model = Mat4::IDENTITY;
    }

    /// Apply one panel edit to the live parameters. Returns the value
    /// actually written after clamping.
    ///
    /// # Errors
    ///
    /// Propagates [`ParameterPanel::apply`] errors; the scene is left
    /// unchanged on error.
    pub fn set_param(
        &mut self,
        section: &str,
        field: &str,
        value: &Value,
    ) -> Result<Value, VitrineError> {
        let applied =
            self.panel.apply(&mut self.options, section, field, value)?;
        log::debug!("set {section}.{field} = {applied}");
        self.sync_live_params();
        Ok(applied)
    }

    /// Replace all options (preset load). Rebuilds the particle field when
    /// its composition changed; a new pixel-ratio cap is reported as a
    /// resize on the next frame.
    pub fn set_options(&mut self, options: Options) {
        let rebuild = options.scene != self.options.scene;
        let camera_changed = options.display.fovy != self.options.display.fovy
            || options.display.camera_distance
                != self.options.display.camera_distance;
        let old_size = self.surface_size();
        let delay = Duration::from_millis(options.display.resize_debounce_ms);
        if delay != self.pending_resize.delay() {
            self.pending_resize = Debouncer::new(delay);
        }
        self.options = options;
        if rebuild {
            self.particles = particles_for(&self.options);
        }
        if camera_changed {
            self.camera = camera_for(self.viewport, &self.options);
        }
        if self.surface_size() != old_size {
            self.surface_dirty = true;
        }
        self.refresh_uniform(self.uniform.time);
        self.sync_live_params();
    }

    fn sync_live_params(&mut self) {
        self.bloom = BloomParams::from(&self.options);
        self.material = MaterialParams::from(&self.options);
        self.params_dirty = true;
    }

    /// Returns `true` once after parameters changed.
    pub fn take_params_dirty(&mut self) -> bool {
        std::mem::take(&mut self.params_dirty)
    }

    fn refresh_uniform(&mut self, time: f32) {
        self.uniform.update_view_proj(&self.camera);
        self.uniform.time = time;
        let (w, h) = self.surface_size();
        self.uniform.viewport = [w as f32, h as f32];
    }

    /// Live bloom parameters.
    #[must_use]
    pub fn bloom(&self) -> BloomParams {
        self.bloom
    }

    /// Live material parameters.
    #[must_use]
    pub fn material(&self) -> MaterialParams {
        self.material
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The parameter panel.
    #[must_use]
    pub fn panel(&self) -> &ParameterPanel {
        &self.panel
    }

    /// Particle field.
    #[must_use]
    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    /// Knot model matrix as of the last frame.
    #[must_use]
    pub fn knot_model(&self) -> Mat4 {
        self.knot_model
    }

    /// Particle-field model matrix as of the last frame.
    #[must_use]
    pub fn field_model(&self) -> Mat4 {
        self.field_model
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
        self.viewport
            .surface_size(self.options.display.max_pixel_ratio)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn scene(now: Instant) -> CenterpieceScene {
        CenterpieceScene::new(
            Viewport::new(800.0, 600.0, 1.0),
            Options::default(),
            now,
        )
    }

    #[test]
    fn threshold_edit_reaches_live_bloom() {
        let mut s = scene(Instant::now());
        assert!(s.take_params_dirty());
        let _ = s.set_param("bloom", "threshold", &json!(0.7)).unwrap();
        assert!((s.bloom().threshold - 0.7).abs() < 1e-6);
        assert!(s.take_params_dirty());
        assert!(!s.take_params_dirty());
    }

    #[test]
    fn strength_edit_is_clamped() {
        let mut s = scene(Instant::now());
        let applied = s.set_param("bloom", "strength", &json!(5)).unwrap();
        assert_eq!(applied.as_f64(), Some(3.0));
        assert_eq!(s.bloom().strength, 3.0);
    }

    #[test]
    fn failed_edit_leaves_params() {
        let mut s = scene(Instant::now());
        let before = s.material();
        let _ = s.take_params_dirty();
        assert!(s.set_param("material", "shine", &json!(1.0)).is_err());
        assert_eq!(s.material(), before);
        assert!(!s.take_params_dirty());
    }

    #[test]
    fn resize_waits_for_quiet_period() {
        let t0 = Instant::now();
        let mut s = scene(t0);
        let resize = |w| InputEvent::Resized {
            width: w,
            height: 600.0,
            pixel_ratio: 1.0,
        };
        s.handle_event(resize(900.0), t0);
        s.handle_event(resize(1000.0), t0 + Duration::from_millis(100));

        let f = s.frame(t0 + Duration::from_millis(200));
        assert_eq!(f.resized, None);
        assert_eq!(s.surface_size(), (800, 600));

        let f = s.frame(t0 + Duration::from_millis(400));
        assert_eq!(f.resized, Some((1000, 600)));
        assert!((s.camera().aspect - 1000.0 / 600.0).abs() < 1e-6);

        // Same size again produces no second resize.
        s.handle_event(resize(1000.0), t0 + Duration::from_millis(500));
        let f = s.frame(t0 + Duration::from_secs(1));
        assert_eq!(f.resized, None);
    }

    #[test]
    fn pixel_ratio_cap_change_resizes_surface() {
        let t0 = Instant::now();
        let mut s = CenterpieceScene::new(
            Viewport::new(800.0, 600.0, 3.0),
            Options::default(),
            t0,
        );
        let _ = s.frame(t0);
        let mut options = s.options().clone();
        options.display.max_pixel_ratio = 1.0;
        s.set_options(options);

        let f = s.frame(t0 + Duration::from_millis(16));
        assert_eq!(f.resized, Some((800, 600)));
        assert_eq!(s.camera_uniform().viewport, [800.0, 600.0]);
        let f = s.frame(t0 + Duration::from_millis(32));
        assert_eq!(f.resized, None);
    }

    #[test]
    fn preset_keeps_pending_resize() {
        let t0 = Instant::now();
        let mut s = scene(t0);
        s.handle_event(
            InputEvent::Resized {
                width: 1000.0,
                height: 600.0,
                pixel_ratio: 1.0,
            },
            t0,
        );
        let mut options = s.options().clone();
        options.bloom.strength = 2.0;
        s.set_options(options);

        let f = s.frame(t0 + Duration::from_millis(300));
        assert_eq!(f.resized, Some((1000, 600)));
    }

    #[test]
    fn rotation_follows_elapsed_time() {
        let t0 = Instant::now();
        let mut s = scene(t0);
        let _ = s.frame(t0 + Duration::from_secs(2));
        let expected = Mat4::from_rotation_y(2.0 * 0.3) * Mat4::from_rotation_x(2.0 * 0.2);
        assert!(s.knot_model().abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn reset_replays_identically() {
        let t0 = Instant::now();
        let mut s = scene(t0);
        let steps = [16_u64, 33, 50];
        for ms in steps {
            let _ = s.frame(t0 + Duration::from_millis(ms));
        }
        let first = s.particles().positions().to_vec();

        let t1 = t0 + Duration::from_secs(5);
        s.reset(t1);
        for ms in steps {
            let _ = s.frame(t1 + Duration::from_millis(ms));
        }
        assert_eq!(s.particles().positions(), first.as_slice());
    }

    #[test]
    fn preset_with_new_particle_count_rebuilds_field() {
        let mut s = scene(Instant::now());
        let mut opts = Options::default();
        opts.scene.particle_count = 10;
        opts.bloom.radius = 0.1;
        s.set_options(opts);
        assert_eq!(s.particles().len(), 10);
        assert_eq!(s.bloom().radius, 0.1);
    }
}
