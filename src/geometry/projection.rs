// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshframe Inc.

//! UV-projection operations
//!
//! All four projections run against a normalized copy of the mesh's
//! positions: recentered on the AABB centroid, uniformly scaled so the
//! largest bounding dimension spans 1, and rotated so a caller-supplied
//! up axis aligns with +Z. The results are written into the live mesh's
//! UV channel, for every vertex or for a caller-specified subset.

use super::bbox::BoundingBox;
use super::mesh::Mesh;
use nalgebra::{Point3, Rotation3, Vector3};
use std::f32::consts::{PI, TAU};

/// Rotation taking `up` onto +Z. The antiparallel case has no unique
/// axis; it is fixed as a 180 degree rotation about X.
fn rotation_to_z(up: &Vector3<f32>) -> Rotation3<f32> {
    if up.norm_squared() <= f32::EPSILON {
        return Rotation3::identity();
    }
    Rotation3::rotation_between(up, &Vector3::z())
        .unwrap_or_else(|| Rotation3::from_axis_angle(&Vector3::x_axis(), PI))
}

/// Positions recentered, scaled to a unit max span, and rotated so `up`
/// aligns with +Z.
fn normalized_positions(mesh: &Mesh, up: Option<Vector3<f32>>) -> Vec<Point3<f32>> {
    let bbox = BoundingBox::from_positions(mesh.vertices().iter().map(|v| &v.position));
    let center = bbox.center();
    let max_dim = bbox.max_dimension();
    let scale = if max_dim > f32::EPSILON {
        1.0 / max_dim
    } else {
        1.0
    };
    let rotation = up.map_or_else(Rotation3::identity, |axis| rotation_to_z(&axis));

    mesh.vertices()
        .iter()
        .map(|v| Point3::from(rotation * ((v.position - center) * scale)))
        .collect()
}

/// Angle as a `[0, 1)` revolution fraction.
fn revolution(angle: f32) -> f32 {
    let mut turns = angle / TAU;
    if turns < 0.0 {
        turns += 1.0;
    }
    turns
}

fn selected_indices(mesh: &Mesh, selection: Option<&[u32]>) -> Vec<usize> {
    match selection {
        Some(indices) => indices
            .iter()
            .map(|&i| i as usize)
            .filter(|&i| i < mesh.vertex_count())
            .collect(),
        None => (0..mesh.vertex_count()).collect(),
    }
}

impl Mesh {
    /// Planar projection onto the rotated XY plane: `[-0.5, 0.5]`
    /// shifted to `[0, 1]` with `v` inverted for the rotation convention.
    pub fn uv_planar(&mut self, up: Option<Vector3<f32>>, selection: Option<&[u32]>) {
        let positions = normalized_positions(self, up);
        for i in selected_indices(self, selection) {
            let p = positions[i];
            self.vertices_mut()[i].uv = Vector3::new(p.x + 0.5, 0.5 - p.y, 0.0);
        }
    }

    /// Cubic projection: classify each vertex by its dominant normalized
    /// axis (Z checked first, then Y, falling through to X) and project
    /// onto that face's 2D space, storing the face index (order
    /// `+X,-X,+Y,-Y,+Z,-Z`, matching the cube generator atlas) in the
    /// third UV component.
    pub fn uv_cubic(&mut self, up: Option<Vector3<f32>>, selection: Option<&[u32]>) {
        let positions = normalized_positions(self, up);
        for i in selected_indices(self, selection) {
            let p = positions[i];
            let (face, u, v) = if p.z.abs() >= p.x.abs() && p.z.abs() >= p.y.abs() {
                if p.z >= 0.0 {
                    (4, p.y, p.x)
                } else {
                    (5, p.y, -p.x)
                }
            } else if p.y.abs() >= p.x.abs() {
                if p.y >= 0.0 {
                    (2, p.x, p.z)
                } else {
                    (3, p.x, -p.z)
                }
            } else if p.x >= 0.0 {
                (0, p.z, p.y)
            } else {
                (1, p.z, -p.y)
            };
            self.vertices_mut()[i].uv = Vector3::new(u + 0.5, v + 0.5, face as f32);
        }
    }

    /// Cylindrical projection about the rotated Z axis: `u` is the
    /// revolution fraction of `atan2(y, x)`, `v` the relative height
    /// within the normalized Z extent.
    pub fn uv_cylindrical(&mut self, up: Option<Vector3<f32>>, selection: Option<&[u32]>) {
        let positions = normalized_positions(self, up);
        let (z_min, z_max) = positions.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(lo, hi), p| (lo.min(p.z), hi.max(p.z)),
        );
        let z_span = z_max - z_min;

        for i in selected_indices(self, selection) {
            let p = positions[i];
            let u = revolution(p.y.atan2(p.x));
            let v = if z_span > f32::EPSILON {
                (p.z - z_min) / z_span
            } else {
                0.0
            };
            self.vertices_mut()[i].uv = Vector3::new(u, v, 0.0);
        }
    }

    /// Spherical projection: `u` as cylindrical, `v` from the polar
    /// angle `acos(z / |p|)` remapped so `v = 1` at the +Z pole.
    pub fn uv_spherical(&mut self, up: Option<Vector3<f32>>, selection: Option<&[u32]>) {
        let positions = normalized_positions(self, up);
        for i in selected_indices(self, selection) {
            let p = positions[i];
            let len = p.coords.norm();
            if len <= f32::EPSILON {
                continue; // direction undefined at the center
            }
            let u = revolution(p.y.atan2(p.x));
            let polar = (p.z / len).clamp(-1.0, 1.0).acos();
            let v = 1.0 - polar / PI;
            self.vertices_mut()[i].uv = Vector3::new(u, v, 0.0);
        }
    }
}
