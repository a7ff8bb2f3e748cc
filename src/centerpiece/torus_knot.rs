//! Parametric (p, q) torus-knot tube mesh.

use std::f32::consts::TAU;

use glam::Vec3;

/// Vertex layout shared by the knot pipeline.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct KnotVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Unit surface normal.
    pub normal: [f32; 3],
}

/// Shape parameters of the knot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusKnot {
    /// Radius of the underlying torus.
    pub radius: f32,
    /// Radius of the tube swept along the curve.
    pub tube: f32,
    /// Segments along the curve.
    pub tubular_segments: u32,
    /// Segments around the tube.
    pub radial_segments: u32,
    /// Winds around the torus axis.
    pub p: u32,
    /// Winds through the torus hole.
    pub q: u32,
}

impl Default for TorusKnot {
    fn default() -> Self {
        Self {
            radius: 1.0,
            tube: 0.3,
            tubular_segments: 200,
            radial_segments: 32,
            p: 2,
            q: 3,
        }
    }
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct KnotMesh {
    /// Vertices, `(tubular + 1) * (radial + 1)` of them.
    pub vertices: Vec<KnotVertex>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
}

impl TorusKnot {
    fn curve_point(&self, u: f32) -> Vec3 {
        let qu_over_p = self.q as f32 / self.p.max(1) as f32 * u;
        let cs = qu_over_p.cos();
        Vec3::new(
            self.radius * (2.0 + cs) * 0.5 * u.cos(),
            self.radius * (2.0 + cs) * 0.5 * u.sin(),
            self.radius * qu_over_p.sin() * 0.5,
        )
    }

    /// Sweep a circle along the knot curve.
    #[must_use]
    pub fn build(&self) -> KnotMesh {
        let tubular = self.tubular_segments.max(3);
        let radial = self.radial_segments.max(3);

        let mut vertices =
            Vec::with_capacity(((tubular + 1) * (radial + 1)) as usize);
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * self.p as f32 * TAU;
            let p1 = self.curve_point(u);
            let p2 = self.curve_point(u + 0.01);

            // Frame from the chord and the sum of the two samples.
            let tangent = p2 - p1;
            let binormal = tangent.cross(p2 + p1).normalize_or_zero();
            let normal = binormal.cross(tangent).normalize_or_zero();

            for j in 0..=radial {
                let v = j as f32 / radial as f32 * TAU;
                let cx = -self.tube * v.cos();
                let cy = self.tube * v.sin();
                let position = p1 + normal * cx + binormal * cy;
                vertices.push(KnotVertex {
                    position: position.to_array(),
                    normal: (position - p1).normalize_or_zero().to_array(),
                });
            }
        }

        let mut indices = Vec::with_capacity((tubular * radial * 6) as usize);
        let stride = radial + 1;
        for j in 1..=tubular {
            for i in 1..=radial {
                let a = stride * (j - 1) + (i - 1);
                let b = stride * j + (i - 1);
                let c = stride * j + i;
                let d = stride * (j - 1) + i;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        KnotMesh { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_and_index_counts() {
        let knot = TorusKnot {
            tubular_segments: 64,
            radial_segments: 8,
            ..TorusKnot::default()
        };
        let mesh = knot.build();
        assert_eq!(mesh.vertices.len(), 65 * 9);
        assert_eq!(mesh.indices.len(), 64 * 8 * 6);
        let max = *mesh.indices.iter().max().unwrap() as usize;
        assert!(max < mesh.vertices.len());
    }

    #[test]
    fn normals_are_unit_and_surface_is_bounded() {
        let mesh = TorusKnot::default().build();
        for v in &mesh.vertices {
            let n = Vec3::from(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-3);
            // (2 + 1) * 0.5 * radius + tube
            assert!(Vec3::from(v.position).length() < 1.5 + 0.3 + 1e-3);
        }
    }

    #[test]
    fn closed_curve_seam_matches() {
        let mesh = TorusKnot::default().build();
        let radial = 33;
        let first = mesh.vertices[0].position;
        let last_ring = mesh.vertices[mesh.vertices.len() - radial].position;
        assert!((Vec3::from(first) - Vec3::from(last_ring)).length() < 1e-3);
    }
}
