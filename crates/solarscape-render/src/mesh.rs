//! Procedural geometry for the two body primitives.
//!
//! Both meshes are unit-sized and centred on the origin so the scene's model
//! transform (translate, spin, scale) places them directly.

use std::collections::HashMap;

use glam::{Quat, Vec3};

use crate::buffer::VertexPositionNormal;

/// CPU-side indexed triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<VertexPositionNormal>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append `other`, offsetting its indices.
    fn append(&mut self, other: MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }
}

/// Unit-radius icosphere. Each subdivision level quadruples the triangle count.
pub fn icosphere(subdivisions: u32) -> MeshData {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let mut positions: Vec<Vec3> = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .into_iter()
    .map(Vec3::normalize)
    .collect();

    let mut indices: Vec<u32> = vec![
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7,
        1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9,
        8, 1,
    ];

    for _ in 0..subdivisions {
        subdivide(&mut positions, &mut indices);
    }

    // On a unit sphere the normal is the position.
    let vertices = positions
        .into_iter()
        .map(|p| VertexPositionNormal {
            position: p.to_array(),
            normal: p.to_array(),
        })
        .collect();

    MeshData { vertices, indices }
}

/// Split each triangle into four at its edge midpoints, pushed back onto the
/// unit sphere. Shared edges reuse one midpoint vertex.
fn subdivide(positions: &mut Vec<Vec3>, indices: &mut Vec<u32>) {
    let mut cache: HashMap<(u32, u32), u32> = HashMap::new();
    let mut midpoint = |a: u32, b: u32, positions: &mut Vec<Vec3>| -> u32 {
        let key = (a.min(b), a.max(b));
        *cache.entry(key).or_insert_with(|| {
            let mid = (positions[a as usize] + positions[b as usize]).normalize();
            positions.push(mid);
            positions.len() as u32 - 1
        })
    };

    let mut next = Vec::with_capacity(indices.len() * 4);
    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let ab = midpoint(a, b, positions);
        let bc = midpoint(b, c, positions);
        let ca = midpoint(c, a, positions);
        next.extend_from_slice(&[a, ab, ca, b, bc, ab, c, ca, bc, ab, bc, ca]);
    }
    *indices = next;
}

/// A parametric surface sampled on a `(rows + 1) x (cols + 1)` grid.
///
/// `sample(u, v)` returns the surface point and the axis point it should face
/// away from; the latter only decides the overall normal orientation.
fn grid_surface(rows: u32, cols: u32, sample: impl Fn(f32, f32) -> (Vec3, Vec3)) -> MeshData {
    let mut positions = Vec::with_capacity(((rows + 1) * (cols + 1)) as usize);
    let mut axes = Vec::with_capacity(positions.capacity());
    for i in 0..=rows {
        for j in 0..=cols {
            let (p, axis) = sample(i as f32 / rows as f32, j as f32 / cols as f32);
            positions.push(p);
            axes.push(axis);
        }
    }

    let stride = cols + 1;
    let mut indices = Vec::with_capacity((rows * cols * 6) as usize);
    for i in 0..rows {
        for j in 0..cols {
            let a = i * stride + j;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    let mut normals = smooth_normals(&positions, &indices);
    let outwardness: f32 = normals
        .iter()
        .zip(positions.iter().zip(&axes))
        .map(|(n, (p, axis))| n.dot(*p - *axis))
        .sum();
    if outwardness < 0.0 {
        for n in &mut normals {
            *n = -*n;
        }
        for tri in indices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
    }

    let vertices = positions
        .iter()
        .zip(&normals)
        .map(|(p, n)| VertexPositionNormal {
            position: p.to_array(),
            normal: n.to_array(),
        })
        .collect();
    MeshData { vertices, indices }
}

/// Area-weighted vertex normals. Degenerate vertices fall back to +y.
fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals.into_iter().map(|n| n.normalize_or(Vec3::Y)).collect()
}

/// Piecewise-linear interpolation through `(radius, height)` profile points.
fn profile_at(profile: &[(f32, f32)], u: f32) -> (f32, f32) {
    let span = (profile.len() - 1) as f32;
    let x = (u * span).clamp(0.0, span);
    let i = (x.floor() as usize).min(profile.len() - 2);
    let f = x - i as f32;
    let (r0, y0) = profile[i];
    let (r1, y1) = profile[i + 1];
    (r0 + (r1 - r0) * f, y0 + (y1 - y0) * f)
}

/// Surface of revolution about the y axis.
fn lathe(profile: &[(f32, f32)], rows: u32, segments: u32) -> MeshData {
    grid_surface(rows, segments, |u, v| {
        let (r, y) = profile_at(profile, u);
        let theta = v * std::f32::consts::TAU;
        (
            Vec3::new(r * theta.cos(), y, r * theta.sin()),
            Vec3::new(0.0, y, 0.0),
        )
    })
}

/// Circular tube of varying radius swept along a curve in the xy plane.
fn tube(
    rows: u32,
    segments: u32,
    centre: impl Fn(f32) -> Vec3,
    radius: impl Fn(f32) -> f32,
) -> MeshData {
    const EPS: f32 = 1e-3;
    grid_surface(rows, segments, |u, v| {
        let c = centre(u);
        let tangent = (centre((u + EPS).min(1.0)) - centre((u - EPS).max(0.0))).normalize_or(Vec3::X);
        let binormal = tangent.cross(Vec3::Z).normalize_or(Vec3::Y);
        let theta = v * std::f32::consts::TAU;
        let offset = Quat::from_axis_angle(tangent, theta) * binormal;
        (c + offset * radius(u), c)
    })
}

/// Teapot: lathed body and lid with a knob, a tapered spout on +x and a
/// looped handle on -x. Roughly 3.2 units wide and 1.65 tall.
pub fn teapot(segments: u32) -> MeshData {
    let segments = segments.max(3);
    let profile = [
        (0.0, -0.75),
        (0.8, -0.75),
        (0.95, -0.62),
        (1.05, -0.3),
        (1.02, 0.1),
        (0.88, 0.4),
        (0.76, 0.5),
        (0.7, 0.53),
        (0.5, 0.61),
        (0.22, 0.68),
        (0.08, 0.72),
        (0.12, 0.78),
        (0.12, 0.85),
        (0.05, 0.9),
        (0.0, 0.9),
    ];
    let mut mesh = lathe(&profile, (profile.len() as u32 - 1) * 2, segments);

    let p0 = Vec3::new(0.8, -0.25, 0.0);
    let p1 = Vec3::new(1.45, -0.2, 0.0);
    let p2 = Vec3::new(1.65, 0.55, 0.0);
    let spout = tube(
        segments / 2,
        segments,
        |t| p0 * (1.0 - t) * (1.0 - t) + p1 * 2.0 * t * (1.0 - t) + p2 * t * t,
        |t| 0.22 + (0.08 - 0.22) * t,
    );
    mesh.append(spout);

    let hub = Vec3::new(-1.0, 0.075, 0.0);
    let handle = tube(
        segments,
        segments / 2,
        |t| {
            let phi = (70.0 + 220.0 * t).to_radians();
            hub + Vec3::new(phi.cos(), phi.sin(), 0.0) * 0.4
        },
        |_| 0.08,
    );
    mesh.append(handle);

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(mesh: &MeshData) {
        assert_eq!(mesh.indices.len() % 3, 0);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n), "index out of range");
        for v in &mesh.vertices {
            let len = Vec3::from_array(v.normal).length();
            assert!((len - 1.0).abs() < 1e-4, "normal length {len}");
        }
    }

    #[test]
    fn test_icosphere_base_is_icosahedron() {
        let mesh = icosphere(0);
        assert_eq!(mesh.vertices.len(), 12);
        assert_eq!(mesh.triangle_count(), 20);
        assert_valid(&mesh);
    }

    #[test]
    fn test_icosphere_subdivision_counts() {
        let mesh = icosphere(3);
        assert_eq!(mesh.triangle_count(), 20 * 4usize.pow(3));
        // V = 10 * 4^n + 2
        assert_eq!(mesh.vertices.len(), 10 * 64 + 2);
        assert_valid(&mesh);
    }

    #[test]
    fn test_icosphere_vertices_on_unit_sphere() {
        for v in icosphere(2).vertices {
            let len = Vec3::from_array(v.position).length();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_teapot_is_valid() {
        let mesh = teapot(24);
        assert!(mesh.triangle_count() > 500);
        assert_valid(&mesh);
    }

    #[test]
    fn test_teapot_bounds() {
        let mesh = teapot(16);
        let (min, max) = mesh.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), v| {
                let p = Vec3::from_array(v.position);
                (lo.min(p), hi.max(p))
            },
        );
        assert!(max.x > 1.6 && max.x < 1.8, "spout tip at {}", max.x);
        assert!(min.x < -1.4 && min.x > -1.6, "handle at {}", min.x);
        assert!((min.y + 0.75).abs() < 1e-4);
        assert!(max.y <= 0.9 + 1e-4);
    }

    #[test]
    fn test_teapot_body_normals_point_outward() {
        let mesh = teapot(24);
        let outward = mesh
            .vertices
            .iter()
            .filter(|v| {
                let p = Vec3::from_array(v.position);
                // Mid body, away from spout and handle.
                p.y.abs() < 0.2 && p.z.abs() > 0.9
            })
            .all(|v| {
                let p = Vec3::from_array(v.position);
                let n = Vec3::from_array(v.normal);
                n.dot(Vec3::new(p.x, 0.0, p.z)) > 0.0
            });
        assert!(outward);
    }

    #[test]
    fn test_teapot_segment_floor() {
        assert_valid(&teapot(0));
    }

    #[test]
    fn test_profile_interpolation() {
        let profile = [(0.0, 0.0), (1.0, 2.0), (3.0, 2.0)];
        assert_eq!(profile_at(&profile, 0.0), (0.0, 0.0));
        assert_eq!(profile_at(&profile, 0.25), (0.5, 1.0));
        assert_eq!(profile_at(&profile, 1.0), (3.0, 2.0));
    }
}
