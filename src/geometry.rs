//! Procedural geometry for the backdrop object.
//!
//! Every shape is an indexed triangle list with smooth (or per-face for the
//! box) normals. Wireframe rendering uses the unique triangle edges.

use std::collections::HashSet;
use std::f32::consts::TAU;

use glam::Vec3;

use crate::types::MeshVertex;

pub const BOX_SIZE: f32 = 1.0;

pub const TORUS_RADIUS: f32 = 0.5;
pub const TORUS_TUBE: f32 = 0.2;
pub const TORUS_RADIAL_SEGMENTS: u32 = 16;
pub const TORUS_TUBULAR_SEGMENTS: u32 = 100;

pub const KNOT_TUBULAR_SEGMENTS: u32 = 100;
pub const KNOT_RADIAL_SEGMENTS: u32 = 16;
pub const KNOT_P: u32 = 2;
pub const KNOT_Q: u32 = 3;

pub const SPHERE_RADIUS: f32 = 0.7;
pub const SPHERE_SEGMENTS: u32 = 32;

/// Shape of the backdrop mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeometryKind {
    #[default]
    Box,
    Torus,
    TorusKnot,
    Sphere,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 4] = [
        GeometryKind::Box,
        GeometryKind::Torus,
        GeometryKind::TorusKnot,
        GeometryKind::Sphere,
    ];

    /// Resolve a host-supplied name; anything unrecognized is a box
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "boxgeometry" | "box" => GeometryKind::Box,
            "torusgeometry" | "torus" => GeometryKind::Torus,
            "torusknotgeometry" | "torus-knot" | "torus_knot" | "torusknot" => {
                GeometryKind::TorusKnot
            }
            "spheregeometry" | "sphere" => GeometryKind::Sphere,
            _ => GeometryKind::Box,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Box => "BoxGeometry",
            GeometryKind::Torus => "TorusGeometry",
            GeometryKind::TorusKnot => "TorusKnotGeometry",
            GeometryKind::Sphere => "SphereGeometry",
        }
    }

    /// Build the mesh with the fixed dimensions used by the backdrop
    pub fn build(&self) -> MeshData {
        match self {
            GeometryKind::Box => create_box(BOX_SIZE),
            GeometryKind::Torus => create_torus(
                TORUS_RADIUS,
                TORUS_TUBE,
                TORUS_RADIAL_SEGMENTS,
                TORUS_TUBULAR_SEGMENTS,
            ),
            GeometryKind::TorusKnot => create_torus_knot(
                TORUS_RADIUS,
                TORUS_TUBE,
                KNOT_TUBULAR_SEGMENTS,
                KNOT_RADIAL_SEGMENTS,
                KNOT_P,
                KNOT_Q,
            ),
            GeometryKind::Sphere => create_sphere(SPHERE_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
        }
    }
}

/// Built mesh data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn triangle_count(&self) -> u32 {
        (self.indices.len() / 3) as u32
    }

    /// Line-list indices covering each triangle edge once
    pub fn edge_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut lines = Vec::new();

        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = if a < b { (a, b) } else { (b, a) };
                if seen.insert(key) {
                    lines.extend_from_slice(&[a, b]);
                }
            }
        }

        lines
    }

    /// Half extents of the axis-aligned bounds
    pub fn half_extents(&self) -> Vec3 {
        self.vertices
            .iter()
            .map(|v| Vec3::from_array(v.position).abs())
            .fold(Vec3::ZERO, Vec3::max)
    }
}

pub fn create_box(size: f32) -> MeshData {
    let h = size * 0.5;
    // (normal, u axis, v axis) per face
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = MeshData::default();
    for (normal, u, v) in faces {
        let base = mesh.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = (normal + u * su + v * sv) * h;
            mesh.vertices
                .push(MeshVertex::new(position.to_array(), normal.to_array()));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    mesh
}

pub fn create_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let row = width_segments + 1;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let (sin_theta, cos_theta) = (v * std::f32::consts::PI).sin_cos();
            let (sin_phi, cos_phi) = (u * TAU).sin_cos();

            let normal = Vec3::new(-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
            mesh.vertices.push(MeshVertex::new(
                (normal * radius).to_array(),
                normal.to_array(),
            ));
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            // Pole rows collapse to a single triangle per segment
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    mesh
}

pub fn create_torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();

    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let normal = (position - center).normalize_or_zero();
            mesh.vertices
                .push(MeshVertex::new(position.to_array(), normal.to_array()));
        }
    }

    push_tube_indices(&mut mesh, radial_segments, tubular_segments);
    mesh
}

pub fn create_torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> MeshData {
    let mut mesh = MeshData::default();
    let (p, q) = (p as f32, q as f32);

    let curve = |u: f32| {
        let qu_over_p = q / p * u;
        let cs = qu_over_p.cos();
        Vec3::new(
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * 0.5 * u.sin(),
            radius * qu_over_p.sin() * 0.5,
        )
    };

    for i in 0..=tubular_segments {
        let u = i as f32 / tubular_segments as f32 * p * TAU;
        let p1 = curve(u);
        let p2 = curve(u + 0.01);

        // Frenet-like frame along the curve
        let tangent = p2 - p1;
        let binormal = tangent.cross(p2 + p1);
        let normal = binormal.cross(tangent).normalize_or_zero();
        let binormal = binormal.normalize_or_zero();

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let position = p1 + normal * cx + binormal * cy;
            let vertex_normal = (position - p1).normalize_or_zero();
            mesh.vertices
                .push(MeshVertex::new(position.to_array(), vertex_normal.to_array()));
        }
    }

    push_tube_indices(&mut mesh, tubular_segments, radial_segments);
    mesh
}

/// Quads between consecutive rings of `ring_segments + 1` vertices
fn push_tube_indices(mesh: &mut MeshData, rings: u32, ring_segments: u32) {
    let row = ring_segments + 1;
    for j in 1..=rings {
        for i in 1..=ring_segments {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_range(mesh: &MeshData) {
        let count = mesh.vertex_count();
        assert!(mesh.indices.iter().all(|&i| i < count));
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn test_known_names_resolve() {
        assert_eq!(GeometryKind::from_name("BoxGeometry"), GeometryKind::Box);
        assert_eq!(GeometryKind::from_name("TorusGeometry"), GeometryKind::Torus);
        assert_eq!(GeometryKind::from_name("TorusKnotGeometry"), GeometryKind::TorusKnot);
        assert_eq!(GeometryKind::from_name("SphereGeometry"), GeometryKind::Sphere);
        assert_eq!(GeometryKind::from_name("torus-knot"), GeometryKind::TorusKnot);
    }

    #[test]
    fn test_unknown_names_fall_back_to_box() {
        for name in ["", "ConeGeometry", "spheres", "🦀"] {
            assert_eq!(GeometryKind::from_name(name), GeometryKind::Box);
        }
    }

    #[test]
    fn test_name_round_trip() {
        for kind in GeometryKind::ALL {
            assert_eq!(GeometryKind::from_name(kind.name()), kind);
        }
    }

    #[test]
    fn test_box_mesh() {
        let mesh = create_box(1.0);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_indices_in_range(&mesh);
        assert!((mesh.half_extents() - Vec3::splat(0.5)).length() < 1e-6);
        // Faces share no vertices: four border edges and one diagonal each
        assert_eq!(mesh.edge_indices().len(), 2 * (4 * 6 + 6));
    }

    #[test]
    fn test_box_faces_wind_outward() {
        let mesh = create_box(1.0);
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
            let face_normal = (b - a).cross(c - a).normalize();
            let stored = Vec3::from_array(mesh.vertices[tri[0] as usize].normal);
            assert!(face_normal.dot(stored) > 0.99);
        }
    }

    #[test]
    fn test_sphere_mesh() {
        let mesh = create_sphere(0.7, 32, 32);
        assert_eq!(mesh.vertex_count(), 33 * 33);
        // Two triangles per quad minus one at each pole row
        assert_eq!(mesh.triangle_count(), 32 * 32 * 2 - 2 * 32);
        assert_indices_in_range(&mesh);
        for v in &mesh.vertices {
            assert!((Vec3::from_array(v.position).length() - 0.7).abs() < 1e-5);
        }
    }

    #[test]
    fn test_torus_mesh() {
        let mesh = create_torus(0.5, 0.2, 16, 100);
        assert_eq!(mesh.vertex_count(), 17 * 101);
        assert_eq!(mesh.triangle_count(), 16 * 100 * 2);
        assert_indices_in_range(&mesh);
        let extents = mesh.half_extents();
        assert!((extents.x - 0.7).abs() < 1e-4);
        assert!((extents.z - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_torus_knot_mesh() {
        let mesh = create_torus_knot(0.5, 0.2, 100, 16, 2, 3);
        assert_eq!(mesh.vertex_count(), 101 * 17);
        assert_eq!(mesh.triangle_count(), 100 * 16 * 2);
        assert_indices_in_range(&mesh);
        assert!(mesh
            .vertices
            .iter()
            .all(|v| (Vec3::from_array(v.normal).length() - 1.0).abs() < 1e-4));
    }

    #[test]
    fn test_every_kind_builds() {
        for kind in GeometryKind::ALL {
            let mesh = kind.build();
            assert!(mesh.vertex_count() > 0, "{kind:?} produced no vertices");
            assert_indices_in_range(&mesh);
        }
    }
}
