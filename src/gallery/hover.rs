//! Pointer hit testing and the single-winner hover policy.

use std::time::Duration;

use glam::Vec2;
use web_time::Instant;

use super::registry::TrackedMesh;
use crate::camera::Ray;

/// A ray hit on a tracked plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Index of the hit mesh in the registry.
    pub mesh: usize,
    /// Distance from the ray origin.
    pub distance: f32,
    /// Hit point in surface UV.
    pub uv: Vec2,
}

/// Intersect `ray` with every mesh, nearest first. Equal distances keep
/// registry order.
#[must_use]
pub fn intersect_meshes(ray: &Ray, meshes: &[TrackedMesh]) -> Vec<Intersection> {
    let mut hits: Vec<_> = meshes
        .iter()
        .enumerate()
        .filter_map(|(mesh, m)| {
            ray.intersect_rect(m.position, m.geometry.size())
                .map(|hit| Intersection {
                    mesh,
                    distance: hit.distance,
                    uv: hit.uv,
                })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Ease every mesh's hover toward 0, then point the nearest hit (if any)
/// at its hit UV and ease its hover toward 1.
///
/// Returns the index of the hovered mesh.
pub fn apply_hover(
    meshes: &mut [TrackedMesh],
    hits: &[Intersection],
    now: Instant,
    duration: Duration,
) -> Option<usize> {
    for mesh in meshes.iter_mut() {
        mesh.hover.ease_to(0.0, now, duration);
    }

    let winner = hits.first()?;
    let mesh = meshes.get_mut(winner.mesh)?;
    mesh.pointer_uv.ease_to(winner.uv, now, duration);
    mesh.hover.ease_to(1.0, now, duration);
    Some(winner.mesh)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::gallery::layout::DomRect;
    use crate::gallery::registry::{ElementKey, MeshRegistry};
    use crate::camera::Viewport;

    const DUR: Duration = Duration::from_millis(300);

    fn registry(n: usize) -> MeshRegistry {
        let vp = Viewport::new(1000.0, 800.0, 1.0);
        let boxes: Vec<_> = (0..n)
            .map(|i| Some(DomRect::new(i as f32 * 100.0, 0.0, 50.0, 50.0)))
            .collect();
        MeshRegistry::build((0..n).map(ElementKey), &boxes, &vp)
    }

    fn hit(mesh: usize, distance: f32) -> Intersection {
        Intersection {
            mesh,
            distance,
            uv: Vec2::new(0.2, 0.8),
        }
    }

    #[test]
    fn only_first_hit_is_hovered() {
        let t0 = Instant::now();
        let mut reg = registry(3);
        for m in reg.meshes_mut() {
            m.hover.set(1.0);
        }

        let hovered =
            apply_hover(reg.meshes_mut(), &[hit(2, 5.0), hit(0, 7.0)], t0, DUR);
        assert_eq!(hovered, Some(2));

        let meshes = reg.meshes();
        assert_eq!(meshes[2].hover.target(), 1.0);
        assert_eq!(meshes[2].pointer_uv.target(), Vec2::new(0.2, 0.8));
        assert_eq!(meshes[0].hover.target(), 0.0);
        assert_eq!(meshes[1].hover.target(), 0.0);
        assert_eq!(meshes[0].pointer_uv.target(), Vec2::splat(0.5));

        // Eased, not set.
        assert!(meshes[2].hover.is_animating());
    }

    #[test]
    fn no_hits_resets_all_and_keeps_uvs() {
        let t0 = Instant::now();
        let mut reg = registry(2);
        reg.meshes_mut()[1].hover.set(1.0);

        assert_eq!(apply_hover(reg.meshes_mut(), &[], t0, DUR), None);
        for m in reg.meshes() {
            assert_eq!(m.hover.target(), 0.0);
            assert_eq!(m.pointer_uv.target(), Vec2::splat(0.5));
            assert!(!m.pointer_uv.is_animating());
        }
        reg.sample(t0 + DUR);
        assert_eq!(reg.meshes()[1].hover.value(), 0.0);
    }

    #[test]
    fn hits_sorted_nearest_first_with_stable_ties() {
        let mut reg = registry(2);
        // Stack both planes at the same spot, one closer to the camera.
        for m in reg.meshes_mut() {
            m.position = Vec3::ZERO;
        }
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 20.0),
            direction: Vec3::NEG_Z,
        };
        let hits = intersect_meshes(&ray, reg.meshes());
        assert_eq!(hits.iter().map(|h| h.mesh).collect::<Vec<_>>(), [0, 1]);

        reg.meshes_mut()[1].position.z = 1.0;
        let hits = intersect_meshes(&ray, reg.meshes());
        assert_eq!(hits[0].mesh, 1);
        assert!((hits[0].distance - 19.0).abs() < 1e-4);
    }
}
