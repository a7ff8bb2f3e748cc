//! Registry of DOM-tracked image planes.

use glam::{Vec2, Vec3};
use web_time::Instant;

use super::layout::{plane_layout, DomRect, PlaneGeometry};
use crate::camera::Viewport;
use crate::util::tween::Tweened;

/// Non-owning handle to a source element in the host's element table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey(pub usize);

/// Reads the current bounding box of host elements.
pub trait LayoutSource {
    /// Current box of `key`, or `None` if the element is gone.
    fn bounding_box(&self, key: ElementKey) -> Option<DomRect>;
}

impl LayoutSource for [Option<DomRect>] {
    fn bounding_box(&self, key: ElementKey) -> Option<DomRect> {
        self.get(key.0).copied().flatten()
    }
}

impl LayoutSource for Vec<Option<DomRect>> {
    fn bounding_box(&self, key: ElementKey) -> Option<DomRect> {
        self.as_slice().bounding_box(key)
    }
}

/// Texture state of a tracked plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureState {
    /// Still loading; the placeholder is bound.
    #[default]
    Pending,
    /// Decoded texture attached.
    Ready,
    /// Load failed; the placeholder stays bound.
    Failed,
}

/// URL to load for an image element.
///
/// `current_src` is the candidate the browser picked and stays empty until
/// it requests one (lazy images below the fold); `src` is the declared
/// attribute, resolved to an absolute URL.
#[must_use]
pub fn image_source<'a>(current_src: &'a str, src: &'a str) -> Option<&'a str> {
    [current_src, src]
        .into_iter()
        .map(str::trim)
        .find(|url| !url.is_empty())
}

/// One DOM image mirrored as a textured plane.
#[derive(Debug, Clone)]
pub struct TrackedMesh {
    /// Source element.
    pub source: ElementKey,
    /// Current extents, replaced on every sync.
    pub geometry: PlaneGeometry,
    /// Plane center in world units.
    pub position: Vec3,
    /// Texture binding state.
    pub texture: TextureState,
    /// Pointer position in surface UV, eased.
    pub pointer_uv: Tweened<Vec2>,
    /// Hover intensity in [0, 1], eased.
    pub hover: Tweened<f32>,
}

impl TrackedMesh {
    fn new(source: ElementKey, rect: Option<DomRect>, viewport: &Viewport) -> Self {
        let layout = plane_layout(rect, viewport);
        Self {
            source,
            geometry: layout.geometry,
            position: layout.center,
            texture: TextureState::Pending,
            pointer_uv: Tweened::new(Vec2::splat(0.5)),
            hover: Tweened::new(0.0),
        }
    }
}

/// The fixed set of tracked planes, in element order.
#[derive(Debug, Clone, Default)]
pub struct MeshRegistry {
    meshes: Vec<TrackedMesh>,
}

impl MeshRegistry {
    /// One mesh per key, laid out from the keys' current boxes.
    #[must_use]
    pub fn build<S: LayoutSource + ?Sized>(
        keys: impl IntoIterator<Item = ElementKey>,
        source: &S,
        viewport: &Viewport,
    ) -> Self {
        let meshes: Vec<_> = keys
            .into_iter()
            .map(|key| TrackedMesh::new(key, source.bounding_box(key), viewport))
            .collect();
        log::debug!("mesh registry built with {} planes", meshes.len());
        Self { meshes }
    }

    /// Re-read every source box and replace geometry and position.
    pub fn sync_layout<S: LayoutSource + ?Sized>(
        &mut self,
        source: &S,
        viewport: &Viewport,
    ) {
        for mesh in &mut self.meshes {
            let layout = plane_layout(source.bounding_box(mesh.source), viewport);
            mesh.geometry = layout.geometry;
            mesh.position = layout.center;
        }
    }

    /// Advance every hover tween to `now`.
    pub fn sample(&mut self, now: Instant) {
        for mesh in &mut self.meshes {
            let _ = mesh.pointer_uv.sample(now);
            let _ = mesh.hover.sample(now);
        }
    }

    /// Whether any hover tween is still running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.meshes
            .iter()
            .any(|m| m.hover.is_animating() || m.pointer_uv.is_animating())
    }

    /// Record the outcome of a texture load.
    pub fn set_texture_state(&mut self, index: usize, state: TextureState) {
        if let Some(mesh) = self.meshes.get_mut(index) {
            mesh.texture = state;
        }
    }

    /// All meshes.
    #[must_use]
    pub fn meshes(&self) -> &[TrackedMesh] {
        &self.meshes
    }

    /// All meshes, mutably.
    pub fn meshes_mut(&mut self) -> &mut [TrackedMesh] {
        &mut self.meshes
    }

    /// Number of meshes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(n: usize) -> impl Iterator<Item = ElementKey> {
        (0..n).map(ElementKey)
    }

    #[test]
    fn build_places_each_source() {
        let vp = Viewport::new(1000.0, 800.0, 1.0);
        let boxes = vec![
            Some(DomRect::new(100.0, 50.0, 200.0, 80.0)),
            None,
        ];
        let registry = MeshRegistry::build(keys(2), &boxes, &vp);
        assert_eq!(registry.len(), 2);
        let first = &registry.meshes()[0];
        assert_eq!(first.position, Vec3::new(-300.0, 310.0, 0.0));
        assert_eq!(first.texture, TextureState::Pending);
        assert_eq!(first.pointer_uv.value(), Vec2::splat(0.5));
        assert!(registry.meshes()[1].geometry.is_collapsed());
    }

    #[test]
    fn sync_follows_scrolling_boxes() {
        let vp = Viewport::new(1000.0, 800.0, 1.0);
        let mut boxes = vec![Some(DomRect::new(100.0, 50.0, 200.0, 80.0))];
        let mut registry = MeshRegistry::build(keys(1), &boxes, &vp);

        boxes[0] = Some(DomRect::new(100.0, -150.0, 200.0, 80.0));
        registry.sync_layout(&boxes, &vp);
        assert_eq!(registry.meshes()[0].position.y, 510.0);

        boxes[0] = None;
        registry.sync_layout(&boxes, &vp);
        assert!(registry.meshes()[0].geometry.is_collapsed());
    }

    #[test]
    fn lazy_image_falls_back_to_declared_src() {
        assert_eq!(
            image_source("", "https://a.test/b.jpg"),
            Some("https://a.test/b.jpg")
        );
        assert_eq!(
            image_source("https://a.test/b@2x.jpg", "https://a.test/b.jpg"),
            Some("https://a.test/b@2x.jpg")
        );
        assert_eq!(
            image_source("  ", " https://a.test/c.png "),
            Some("https://a.test/c.png")
        );
        assert_eq!(image_source("", ""), None);
    }

    #[test]
    fn texture_state_ignores_bad_index() {
        let vp = Viewport::new(10.0, 10.0, 1.0);
        let boxes: Vec<Option<DomRect>> = vec![None];
        let mut registry = MeshRegistry::build(keys(1), &boxes, &vp);
        registry.set_texture_state(0, TextureState::Ready);
        registry.set_texture_state(5, TextureState::Failed);
        assert_eq!(registry.meshes()[0].texture, TextureState::Ready);
    }
}
