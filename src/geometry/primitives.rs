// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshframe Inc.

//! Procedural mesh generators

use super::mesh::{Mesh, Vertex};
use super::topology::{Edge, Triangle};
use crate::utils::math::wrap_unit;
use nalgebra::{Point3, Vector2, Vector3};
use std::f32::consts::{PI, TAU};

/// Geometric primitives
///
/// Constructors silently clamp out-of-range inputs (a sphere with two
/// radial subdivisions is not a sphere); `to_mesh` builds the buffers
/// through the standard mutator pipeline so adjacency, bounds, and the
/// overlay are consistent on return.
pub enum Primitive {
    Quad {
        corner_uvs: [Vector2<f32>; 4],
    },
    Cube {
        side: f32,
        hard_normals: bool,
        interior: bool,
    },
    UvSphere {
        radial: u32,
        height: u32,
        radius: f32,
    },
}

impl Primitive {
    /// Unit quad in the XY plane facing `-Z`, with per-corner UVs
    /// (wrapped into `[0, 1]`).
    pub fn quad(corner_uvs: [Vector2<f32>; 4]) -> Self {
        Self::Quad { corner_uvs }
    }

    /// Axis-aligned cube with unshared per-face vertices.
    pub fn cube(side: f32, hard_normals: bool, interior: bool) -> Self {
        Self::Cube {
            side,
            hard_normals,
            interior,
        }
    }

    /// Parametric UV-sphere about the Z axis. Radial subdivisions clamp
    /// to at least 3, height subdivisions to at least 2.
    pub fn uv_sphere(radial: u32, height: u32, radius: f32) -> Self {
        Self::UvSphere {
            radial: radial.max(3),
            height: height.max(2),
            radius,
        }
    }

    pub fn to_mesh(&self) -> Mesh {
        match self {
            Self::Quad { corner_uvs } => generate_quad_mesh(*corner_uvs),
            Self::Cube {
                side,
                hard_normals,
                interior,
            } => generate_cube_mesh(*side, *hard_normals, *interior),
            Self::UvSphere {
                radial,
                height,
                radius,
            } => generate_uv_sphere_mesh(*radial, *height, *radius),
        }
    }
}

/// Closed-form UV-sphere buffer sizes for `radial`/`height` subdivisions.
///
/// Vertices: `height - 1` seam-duplicated rings of `radial + 1` plus
/// `radial` sawtooth vertices per pole. Returns (vertices, edges,
/// triangles).
pub fn uv_sphere_counts(radial: u32, height: u32) -> (usize, usize, usize) {
    let r = radial.max(3) as usize;
    let h = height.max(2) as usize;
    let vertices = r * h + r + h - 1;
    let edges = r * (h - 1) + (r + 1) * (h - 2) + 2 * r;
    let triangles = 2 * r * (h - 1);
    (vertices, edges, triangles)
}

fn finish(vertices: Vec<Vertex>, edges: Vec<Edge>, triangles: Vec<Triangle>) -> Mesh {
    let (mesh, diags) = Mesh::from_buffers(vertices, edges, triangles);
    debug_assert!(diags.is_empty(), "generator produced invalid topology");
    mesh
}

fn generate_quad_mesh(corner_uvs: [Vector2<f32>; 4]) -> Mesh {
    let positions = [
        Point3::new(-0.5, -0.5, 0.0),
        Point3::new(0.5, -0.5, 0.0),
        Point3::new(0.5, 0.5, 0.0),
        Point3::new(-0.5, 0.5, 0.0),
    ];

    let vertices = positions
        .iter()
        .zip(corner_uvs.iter())
        .map(|(p, uv)| Vertex {
            position: *p,
            uv: Vector3::new(wrap_unit(uv.x), wrap_unit(uv.y), 0.0),
            normal: -Vector3::z(),
            ..Vertex::default()
        })
        .collect();

    let edges = vec![
        Edge::new(0, 1),
        Edge::new(1, 2),
        Edge::new(2, 3),
        Edge::new(3, 0),
    ];
    // Reversed winding: the fixed normal faces -Z.
    let triangles = vec![Triangle::new([0, 2, 1]), Triangle::new([0, 3, 2])];

    finish(vertices, edges, triangles)
}

/// Face order shared with the cubic UV projection: +X, -X, +Y, -Y, +Z, -Z.
/// `u_axis x v_axis = normal`, so exterior winding `(0,1,2)/(0,2,3)` over
/// corners `(-u-v, +u-v, +u+v, -u+v)` faces outward.
const CUBE_FACES: [(Vector3<f32>, Vector3<f32>, Vector3<f32>); 6] = [
    (
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
    ),
    (
        Vector3::new(-1.0, 0.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(0.0, 1.0, 0.0),
    ),
    (
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(1.0, 0.0, 0.0),
    ),
    (
        Vector3::new(0.0, -1.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
    ),
    (
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
    ),
    (
        Vector3::new(0.0, 0.0, -1.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
    ),
];

fn generate_cube_mesh(side: f32, hard_normals: bool, interior: bool) -> Mesh {
    let mut vertices = Vec::with_capacity(24);
    let mut edges = Vec::with_capacity(24);
    let mut triangles = Vec::with_capacity(12);

    let flip = if interior { -1.0 } else { 1.0 };

    for (face, (normal, u_axis, v_axis)) in CUBE_FACES.iter().enumerate() {
        let base = (face * 4) as u32;
        let corners = [
            (normal - u_axis - v_axis) * (side / 2.0),
            (normal + u_axis - v_axis) * (side / 2.0),
            (normal + u_axis + v_axis) * (side / 2.0),
            (normal - u_axis + v_axis) * (side / 2.0),
        ];
        let corner_uvs = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

        for (corner, (u, v)) in corners.iter().zip(corner_uvs) {
            let vertex_normal = if hard_normals {
                normal * flip
            } else {
                // Corner diagonal: components are all +-(1/sqrt 3).
                corner.normalize() * flip
            };
            vertices.push(Vertex {
                position: Point3::from(*corner),
                uv: Vector3::new(u, v, face as f32),
                normal: vertex_normal,
                ..Vertex::default()
            });
        }

        edges.push(Edge::new(base, base + 1));
        edges.push(Edge::new(base + 1, base + 2));
        edges.push(Edge::new(base + 2, base + 3));
        edges.push(Edge::new(base + 3, base));

        if interior {
            triangles.push(Triangle::new([base, base + 2, base + 1]));
            triangles.push(Triangle::new([base, base + 3, base + 2]));
        } else {
            triangles.push(Triangle::new([base, base + 1, base + 2]));
            triangles.push(Triangle::new([base, base + 2, base + 3]));
        }
    }

    finish(vertices, edges, triangles)
}

fn generate_uv_sphere_mesh(radial: u32, height: u32, radius: f32) -> Mesh {
    let r = radial.max(3) as usize;
    let h = height.max(2) as usize;
    let (vertex_count, edge_count, triangle_count) = uv_sphere_counts(radial, height);

    let mut vertices = Vec::with_capacity(vertex_count);
    let mut edges = Vec::with_capacity(edge_count);
    let mut triangles = Vec::with_capacity(triangle_count);

    // Radial angle lookup tables; the final entry repeats the first so
    // the seam column is positionally exact.
    let mut sin_table = Vec::with_capacity(r + 1);
    let mut cos_table = Vec::with_capacity(r + 1);
    for i in 0..r {
        let theta = TAU * i as f32 / r as f32;
        sin_table.push(theta.sin());
        cos_table.push(theta.cos());
    }
    sin_table.push(sin_table[0]);
    cos_table.push(cos_table[0]);

    // Latitude rings, north to south, each with a duplicated seam vertex.
    let ring = |jr: usize, i: usize| (jr * (r + 1) + i) as u32;
    for j in 1..h {
        let phi = PI * j as f32 / h as f32;
        let (sin_phi, cos_phi) = (phi.sin(), phi.cos());
        for i in 0..=r {
            let direction = Vector3::new(
                sin_phi * cos_table[i],
                sin_phi * sin_table[i],
                cos_phi,
            );
            vertices.push(Vertex {
                position: Point3::from(direction * radius),
                uv: Vector3::new(i as f32 / r as f32, 1.0 - j as f32 / h as f32, 0.0),
                normal: direction,
                ..Vertex::default()
            });
        }
    }

    // Sawtooth pole vertices: one per radial column so each pole fan
    // segment gets its own column-centered UV.
    let north_base = ((h - 1) * (r + 1)) as u32;
    let south_base = north_base + r as u32;
    for k in 0..r {
        vertices.push(Vertex {
            position: Point3::new(0.0, 0.0, radius),
            uv: Vector3::new((k as f32 + 0.5) / r as f32, 1.0, 0.0),
            normal: Vector3::z(),
            ..Vertex::default()
        });
    }
    for k in 0..r {
        vertices.push(Vertex {
            position: Point3::new(0.0, 0.0, -radius),
            uv: Vector3::new((k as f32 + 0.5) / r as f32, 0.0, 0.0),
            normal: -Vector3::z(),
            ..Vertex::default()
        });
    }

    // Ring edges.
    for jr in 0..h - 1 {
        for i in 0..r {
            edges.push(Edge::new(ring(jr, i), ring(jr, i + 1)));
        }
    }
    // Vertical edges between adjacent rings, seam column included.
    for jr in 0..h.saturating_sub(2) {
        for i in 0..=r {
            edges.push(Edge::new(ring(jr, i), ring(jr + 1, i)));
        }
    }
    // Pole spokes.
    for k in 0..r {
        edges.push(Edge::new(north_base + k as u32, ring(0, k)));
    }
    for k in 0..r {
        edges.push(Edge::new(south_base + k as u32, ring(h - 2, k)));
    }

    // North fan.
    for i in 0..r {
        triangles.push(Triangle::new([
            north_base + i as u32,
            ring(0, i),
            ring(0, i + 1),
        ]));
    }
    // Latitude bands.
    for jr in 0..h.saturating_sub(2) {
        for i in 0..r {
            let a = ring(jr, i);
            let b = ring(jr, i + 1);
            let c = ring(jr + 1, i);
            let d = ring(jr + 1, i + 1);
            triangles.push(Triangle::new([a, c, b]));
            triangles.push(Triangle::new([b, c, d]));
        }
    }
    // South fan.
    for i in 0..r {
        triangles.push(Triangle::new([
            south_base + i as u32,
            ring(h - 2, i + 1),
            ring(h - 2, i),
        ]));
    }

    debug_assert_eq!(vertices.len(), vertex_count);
    debug_assert_eq!(edges.len(), edge_count);
    debug_assert_eq!(triangles.len(), triangle_count);

    finish(vertices, edges, triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_faces_negative_z() {
        let mesh = Primitive::quad([
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ])
        .to_mesh();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.edge_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        for v in mesh.vertices() {
            assert_eq!(v.normal, -Vector3::z());
            assert_eq!(v.color, Vector3::new(1.0, 1.0, 1.0));
        }
    }

    #[test]
    fn test_quad_wraps_corner_uvs() {
        let mesh = Primitive::quad([
            Vector2::new(1.25, -0.25),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.5, 0.5),
            Vector2::new(0.0, 1.0),
        ])
        .to_mesh();

        let uv = mesh.vertices()[0].uv;
        assert!((uv.x - 0.25).abs() < 1e-6);
        assert!((uv.y - 0.75).abs() < 1e-6);
        // Exactly 1.0 is kept, not wrapped to zero.
        assert_eq!(mesh.vertices()[1].uv.x, 1.0);
    }

    #[test]
    fn test_cube_hard_exterior_normals_face_outward() {
        let mesh = Primitive::cube(1.0, true, false).to_mesh();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.edge_count(), 24);

        for face in 0..6 {
            let face_vertices = &mesh.vertices()[face * 4..face * 4 + 4];
            let normal = face_vertices[0].normal;
            for v in face_vertices {
                assert_eq!(v.normal, normal, "face {face} normals must match");
                // Outward: positive component along the position.
                assert!(normal.dot(&v.position.coords) > 0.0);
                assert_eq!(v.uv.z, face as f32);
            }
            // The normal is the face axis: unit, axis-aligned.
            assert!((normal.norm() - 1.0).abs() < 1e-6);
            assert!((normal.x.abs() + normal.y.abs() + normal.z.abs() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_cube_soft_normals_are_corner_diagonals() {
        let mesh = Primitive::cube(2.0, false, false).to_mesh();
        let inv_sqrt3 = 1.0 / 3.0_f32.sqrt();
        for v in mesh.vertices() {
            for c in [v.normal.x, v.normal.y, v.normal.z] {
                assert!((c.abs() - inv_sqrt3).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_cube_interior_flips_normals_and_winding() {
        let exterior = Primitive::cube(1.0, true, false).to_mesh();
        let interior = Primitive::cube(1.0, true, true).to_mesh();
        for (e, i) in exterior.vertices().iter().zip(interior.vertices()) {
            assert_eq!(i.normal, -e.normal);
        }
        // Inverted winding: recomputing face normals agrees with the
        // stored inward normals.
        let tri = interior.triangles()[0];
        let p = |i: u32| interior.vertices()[i as usize].position;
        let n = crate::utils::math::face_normal(
            &p(tri.indices[0]),
            &p(tri.indices[1]),
            &p(tri.indices[2]),
        );
        assert!(n.dot(&interior.vertices()[tri.indices[0] as usize].normal) > 0.99);
    }

    #[test]
    fn test_sphere_counts_match_closed_form() {
        let mesh = Primitive::uv_sphere(8, 4, 1.0).to_mesh();
        let (v, e, t) = uv_sphere_counts(8, 4);
        assert_eq!(v, 8 * 4 + 8 + 4 - 1);
        assert_eq!(mesh.vertex_count(), v);
        assert_eq!(mesh.edge_count(), e);
        assert_eq!(mesh.triangle_count(), t);
    }

    #[test]
    fn test_sphere_clamps_subdivisions() {
        let mesh = Primitive::uv_sphere(1, 0, 1.0).to_mesh();
        let (v, e, t) = uv_sphere_counts(3, 2);
        assert_eq!(mesh.vertex_count(), v);
        assert_eq!(mesh.edge_count(), e);
        assert_eq!(mesh.triangle_count(), t);
    }

    #[test]
    fn test_sphere_normals_point_outward() {
        let mesh = Primitive::uv_sphere(8, 4, 2.0).to_mesh();
        for v in mesh.vertices() {
            assert!((v.normal.norm() - 1.0).abs() < 1e-5);
            let p = v.position.coords;
            if p.norm() > 1e-6 {
                assert!(v.normal.dot(&p.normalize()) > 0.999);
            }
        }
    }

    #[test]
    fn test_sphere_winding_matches_stored_normals() {
        let mesh = Primitive::uv_sphere(8, 4, 1.0).to_mesh();
        for tri in mesh.triangles() {
            let p = |i: u32| mesh.vertices()[i as usize].position;
            let n = crate::utils::math::face_normal(
                &p(tri.indices[0]),
                &p(tri.indices[1]),
                &p(tri.indices[2]),
            );
            // Face normal agrees with the average of corner normals.
            let avg = (mesh.vertices()[tri.indices[0] as usize].normal
                + mesh.vertices()[tri.indices[1] as usize].normal
                + mesh.vertices()[tri.indices[2] as usize].normal)
                .normalize();
            assert!(n.dot(&avg) > 0.5, "inward-facing triangle {tri:?}");
        }
    }
}
