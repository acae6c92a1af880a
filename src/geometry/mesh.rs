// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshframe Inc.

//! Mesh representation and derived-data maintenance
//!
//! The [`Mesh`] owns its vertex/edge/triangle buffers plus everything
//! derived from them: the per-vertex adjacency table, axis-aligned
//! bounds, recomputed vertex normals, and the normal-visualization
//! overlay. Buffer setters keep all derived data consistent; a renderer
//! only ever reads the finished buffers through the accessor methods.

use super::bbox::BoundingBox;
use super::topology::{
    rebuild_surface_adjacency, rebuild_wireframe_adjacency, Edge, Triangle, VertexAdjacency,
};
use crate::diagnostics::Diagnostics;
use crate::gpu::{GpuBackend, GpuMeshHandle, GpuResidency};
use crate::utils::math::face_normal;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::mem;
use std::rc::Rc;

/// Tolerance on `|length² - 1|` used to decide whether incoming vertex
/// normals are already unit length.
pub const NORMAL_UNIT_EPS: f32 = 1e-4;

/// Default display length for the normal-visualization overlay.
pub const DEFAULT_NORMAL_LENGTH: f32 = 0.1;

fn overlay_debug_color() -> Vector3<f32> {
    Vector3::new(1.0, 1.0, 0.0)
}

/// One point's full attribute set.
///
/// `uv` carries `(u, v, face-or-w)`; the third component holds the cube
/// face index for cubic UV layouts and is zero otherwise.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub uv: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub color: Vector3<f32>,
    pub tangent: Vector3<f32>,
    pub bitangent: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            uv: Vector3::zeros(),
            normal: Vector3::z(),
            color: Vector3::new(1.0, 1.0, 1.0),
            tangent: Vector3::zeros(),
            bitangent: Vector3::zeros(),
        }
    }
}

/// Triangular mesh with wireframe edges, adjacency bookkeeping, and a
/// debug overlay mirroring each vertex normal as a line segment.
#[derive(Debug, Serialize, Deserialize)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    triangles: Vec<Triangle>,
    adjacency: Vec<VertexAdjacency>,
    overlay_vertices: Vec<Vertex>,
    overlay_edges: Vec<Edge>,
    bounds: Vector3<f32>,
    center: Point3<f32>,
    normal_length: f32,
    #[serde(skip)]
    residency: Option<GpuResidency>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            triangles: Vec::new(),
            adjacency: Vec::new(),
            overlay_vertices: Vec::new(),
            overlay_edges: Vec::new(),
            bounds: Vector3::zeros(),
            center: Point3::origin(),
            normal_length: DEFAULT_NORMAL_LENGTH,
            residency: None,
        }
    }

    pub fn empty() -> Self {
        Self::new()
    }

    /// Build a mesh from explicit buffers, running the standard setter
    /// pipeline (bounds/recenter, adjacency, normal check, overlay).
    pub fn from_buffers(
        vertices: Vec<Vertex>,
        edges: Vec<Edge>,
        triangles: Vec<Triangle>,
    ) -> (Self, Diagnostics) {
        let mut mesh = Self::new();
        let mut diags = Diagnostics::new();
        mesh.set_vertices(vertices);
        diags.merge(mesh.set_edges(edges));
        diags.merge(mesh.set_triangles(triangles));
        // The vertex setter's normal check ran before the topology was
        // installed; repeat it now that surface adjacency exists.
        if mesh.has_non_unit_normal() {
            mesh.recalculate_normals();
        }
        (mesh, diags)
    }

    // ------------------------------------------------------------------
    // Buffer mutators
    // ------------------------------------------------------------------

    /// Replace the full vertex array.
    ///
    /// Resizes the adjacency table to match, invalidates the overlay edge
    /// list on shrink, recalculates bounds (recentering positions to the
    /// origin), then either runs full normal recalculation (if any
    /// incoming normal is not unit length) or refreshes the overlay at
    /// the current visualization length.
    pub fn set_vertices(&mut self, points: Vec<Vertex>) {
        let shrank = points.len() < self.vertices.len();
        self.vertices = points;
        self.adjacency
            .resize_with(self.vertices.len(), VertexAdjacency::default);
        if shrank {
            self.overlay_edges.clear();
        }
        self.recalculate_bounds();
        if self.has_non_unit_normal() {
            self.recalculate_normals();
        } else {
            self.refresh_overlay();
        }
    }

    /// Replace the edge list and rebuild wireframe adjacency from scratch.
    ///
    /// Edges referencing out-of-range vertices stay in the list but are
    /// skipped for adjacency, with a warning per bad endpoint.
    pub fn set_edges(&mut self, edges: Vec<Edge>) -> Diagnostics {
        self.edges = edges;
        rebuild_wireframe_adjacency(&mut self.adjacency, &self.edges)
    }

    /// Replace the triangle list and rebuild surface adjacency from scratch.
    pub fn set_triangles(&mut self, triangles: Vec<Triangle>) -> Diagnostics {
        self.triangles = triangles;
        rebuild_surface_adjacency(&mut self.adjacency, &self.triangles)
    }

    /// Overwrite per-vertex UV channels.
    ///
    /// A list longer than the vertex array grows the array with default
    /// vertices and forces full normal recalculation; a shorter list
    /// updates only its prefix.
    pub fn set_uvs(&mut self, uvs: &[Vector3<f32>]) {
        let grew = uvs.len() > self.vertices.len();
        if grew {
            self.vertices.resize_with(uvs.len(), Vertex::default);
            self.adjacency
                .resize_with(uvs.len(), VertexAdjacency::default);
        }
        for (vertex, uv) in self.vertices.iter_mut().zip(uvs) {
            vertex.uv = *uv;
        }
        if grew {
            self.recalculate_normals();
        }
    }

    // ------------------------------------------------------------------
    // Derived-data recalculation
    // ------------------------------------------------------------------

    /// Set every vertex normal to the unit average of its incident
    /// triangles' face normals.
    ///
    /// Bit-identical face normals are deduplicated before summation so
    /// shared or degenerate topology does not bias the average.
    /// Degenerate triangles contribute nothing. A vertex with a null sum
    /// (including zero incident triangles) falls back to `+Z`.
    /// Rebuilds the overlay afterwards.
    pub fn recalculate_normals(&mut self) {
        let mut seen: Vec<[u32; 3]> = Vec::new();
        for v in 0..self.vertices.len() {
            let mut sum = Vector3::zeros();
            seen.clear();
            for &t in &self.adjacency[v].surface {
                let Some(tri) = self.triangles.get(t as usize) else {
                    continue;
                };
                let [i0, i1, i2] = tri.indices;
                let (Some(p0), Some(p1), Some(p2)) = (
                    self.vertices.get(i0 as usize),
                    self.vertices.get(i1 as usize),
                    self.vertices.get(i2 as usize),
                ) else {
                    continue;
                };
                let n = face_normal(&p0.position, &p1.position, &p2.position);
                if n == Vector3::zeros() {
                    continue;
                }
                let bits = [n.x.to_bits(), n.y.to_bits(), n.z.to_bits()];
                if seen.contains(&bits) {
                    continue;
                }
                seen.push(bits);
                sum += n;
            }
            self.vertices[v].normal = if sum.norm_squared() > 0.0 {
                sum.normalize()
            } else {
                Vector3::z()
            };
        }
        self.refresh_overlay();
    }

    /// Center of the AABB of the current vertex positions. Pure query.
    pub fn compute_centroid(&self) -> Point3<f32> {
        BoundingBox::from_positions(self.vertices.iter().map(|v| &v.position)).center()
    }

    /// Subtract the AABB centroid from every vertex position.
    pub fn recenter_to_origin(&mut self) {
        let shift = self.compute_centroid().coords;
        for vertex in &mut self.vertices {
            vertex.position -= shift;
        }
    }

    /// Recompute the AABB extent, recenter positions to the origin, and
    /// reset the stored center to zero.
    ///
    /// The stored center is a transient computation target: after this
    /// call it is always the zero vector, because the centroid has been
    /// folded back into the positions.
    pub fn recalculate_bounds(&mut self) {
        let bbox = BoundingBox::from_positions(self.vertices.iter().map(|v| &v.position));
        self.bounds = bbox.size();
        self.recenter_to_origin();
        self.center = Point3::origin();
        self.refresh_overlay();
    }

    // ------------------------------------------------------------------
    // Normal-visualization overlay
    // ------------------------------------------------------------------

    /// Set the overlay display length and rebuild the overlay.
    pub fn set_normal_length(&mut self, length: f32) {
        self.normal_length = length;
        self.refresh_overlay();
    }

    /// Rebuild the overlay buffers from the current vertices.
    ///
    /// For each vertex `i`, `overlay_vertices[2i]` is a copy of the
    /// vertex and `overlay_vertices[2i + 1]` the tip offset along the
    /// normal; `overlay_edges[i]` joins the pair. Tip attributes are
    /// always recomputed; the edge list is append-only while growing and
    /// truncated when the mesh shrank.
    pub fn refresh_overlay(&mut self) {
        let count = self.vertices.len();
        self.overlay_vertices.resize(2 * count, Vertex::default());
        for i in 0..count {
            let base = self.vertices[i];
            let mut tip = base;
            tip.position += self.normal_length * base.normal;
            tip.color = overlay_debug_color();
            tip.tangent = -base.normal;
            tip.bitangent = -base.normal;
            self.overlay_vertices[2 * i] = base;
            self.overlay_vertices[2 * i + 1] = tip;
        }
        if self.overlay_edges.len() > count {
            self.overlay_edges.truncate(count);
        }
        for i in self.overlay_edges.len()..count {
            self.overlay_edges
                .push(Edge::new((2 * i) as u32, (2 * i + 1) as u32));
        }
    }

    // ------------------------------------------------------------------
    // GPU residency
    // ------------------------------------------------------------------

    /// Record that a renderer uploaded this mesh. Called by the renderer
    /// after a successful upload; never by the mesh itself.
    pub fn bind_gpu(&mut self, backend: &Rc<dyn GpuBackend>, handle: GpuMeshHandle) {
        self.residency = Some(GpuResidency::new(backend, handle));
    }

    /// Clear the residency record. Called by the renderer after it has
    /// released the GPU-side storage.
    pub fn release_gpu(&mut self) {
        self.residency = None;
    }

    pub fn is_gpu_resident(&self) -> bool {
        self.residency.is_some()
    }

    // ------------------------------------------------------------------
    // Read-only accessors (renderer-facing)
    // ------------------------------------------------------------------

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertex_bytes(&self) -> usize {
        self.vertices.len() * mem::size_of::<Vertex>()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_bytes(&self) -> usize {
        self.edges.len() * mem::size_of::<Edge>()
    }

    /// Flattened index count: two endpoints per edge.
    pub fn edge_index_count(&self) -> usize {
        self.edges.len() * 2
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn triangle_bytes(&self) -> usize {
        self.triangles.len() * mem::size_of::<Triangle>()
    }

    /// Flattened index count: three corners per triangle.
    pub fn triangle_index_count(&self) -> usize {
        self.triangles.len() * 3
    }

    pub fn overlay_vertices(&self) -> &[Vertex] {
        &self.overlay_vertices
    }

    pub fn overlay_vertex_count(&self) -> usize {
        self.overlay_vertices.len()
    }

    pub fn overlay_vertex_bytes(&self) -> usize {
        self.overlay_vertices.len() * mem::size_of::<Vertex>()
    }

    pub fn overlay_edges(&self) -> &[Edge] {
        &self.overlay_edges
    }

    pub fn overlay_edge_count(&self) -> usize {
        self.overlay_edges.len()
    }

    pub fn overlay_edge_bytes(&self) -> usize {
        self.overlay_edges.len() * mem::size_of::<Edge>()
    }

    pub fn overlay_edge_index_count(&self) -> usize {
        self.overlay_edges.len() * 2
    }

    pub fn adjacency(&self) -> &[VertexAdjacency] {
        &self.adjacency
    }

    /// AABB extent from the last bounds recalculation.
    pub fn bounds(&self) -> Vector3<f32> {
        self.bounds
    }

    /// Stored center; always zero after a bounds recalculation.
    pub fn center(&self) -> Point3<f32> {
        self.center
    }

    pub fn normal_length(&self) -> f32 {
        self.normal_length
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub(crate) fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    fn has_non_unit_normal(&self) -> bool {
        self.vertices
            .iter()
            .any(|v| (v.normal.norm_squared() - 1.0).abs() > NORMAL_UNIT_EPS)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

// A copied mesh starts without GPU residency; it needs its own upload.
impl Clone for Mesh {
    fn clone(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            edges: self.edges.clone(),
            triangles: self.triangles.clone(),
            adjacency: self.adjacency.clone(),
            overlay_vertices: self.overlay_vertices.clone(),
            overlay_edges: self.overlay_edges.clone(),
            bounds: self.bounds,
            center: self.center,
            normal_length: self.normal_length,
            residency: None,
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        if let Some(residency) = self.residency.take() {
            residency.unload();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> (Mesh, Diagnostics) {
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0)),
            Vertex::new(Point3::new(1.0, 0.0, 0.0)),
            Vertex::new(Point3::new(0.0, 1.0, 0.0)),
        ];
        let edges = vec![Edge::new(0, 1), Edge::new(1, 2), Edge::new(2, 0)];
        let triangles = vec![Triangle::new([0, 1, 2])];
        Mesh::from_buffers(vertices, edges, triangles)
    }

    #[test]
    fn test_from_buffers_builds_adjacency() {
        let (mesh, diags) = triangle_mesh();
        assert!(diags.is_empty());
        for v in 0..3 {
            assert_eq!(mesh.adjacency()[v].wireframe.len(), 2);
            assert!(mesh.adjacency()[v].surface.contains(&0));
        }
    }

    #[test]
    fn test_bounds_roundtrip_and_recenter() {
        let (mesh, _) = triangle_mesh();
        assert_eq!(mesh.center(), Point3::origin());

        let bbox = BoundingBox::from_positions(mesh.vertices().iter().map(|v| &v.position));
        let size = bbox.size();
        assert!((size - mesh.bounds()).norm() < 1e-5);
        assert!(bbox.center().coords.norm() < 1e-5);
    }

    #[test]
    fn test_recalculated_normals_are_unit_or_up() {
        let (mut mesh, _) = triangle_mesh();
        mesh.recalculate_normals();
        for v in mesh.vertices() {
            assert!((v.normal.norm() - 1.0).abs() < 1e-4);
            // CCW in XY viewed from +Z: outward is +Z.
            assert!((v.normal.z - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_vertex_without_triangles_defaults_up() {
        let mut mesh = Mesh::new();
        let mut lone = Vertex::new(Point3::new(1.0, 2.0, 3.0));
        lone.normal = Vector3::new(3.0, 0.0, 0.0); // non-unit forces recalculation
        mesh.set_vertices(vec![lone]);
        assert_eq!(mesh.vertices()[0].normal, Vector3::z());
    }

    #[test]
    fn test_overlay_tracks_vertices() {
        let (mut mesh, _) = triangle_mesh();
        assert_eq!(mesh.overlay_vertex_count(), 2 * mesh.vertex_count());
        assert_eq!(mesh.overlay_edge_count(), mesh.vertex_count());

        mesh.set_normal_length(0.5);
        let base = mesh.overlay_vertices()[0];
        let tip = mesh.overlay_vertices()[1];
        let offset = tip.position - base.position;
        assert!((offset.norm() - 0.5).abs() < 1e-5);
        assert_eq!(tip.tangent, -base.normal);
        assert_eq!(tip.bitangent, -base.normal);
    }

    #[test]
    fn test_shrinking_vertices_invalidates_and_rebuilds_overlay() {
        let (mut mesh, _) = triangle_mesh();
        mesh.set_vertices(vec![Vertex::new(Point3::origin())]);
        assert_eq!(mesh.overlay_edge_count(), 1);
        assert_eq!(mesh.overlay_vertex_count(), 2);
        assert_eq!(mesh.adjacency().len(), 1);
    }

    #[test]
    fn test_set_uvs_growth_forces_defaults() {
        let (mut mesh, _) = triangle_mesh();
        let uvs = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.5, 0.5, 0.0),
        ];
        mesh.set_uvs(&uvs);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.adjacency().len(), 4);
        assert_eq!(mesh.vertices()[3].uv, Vector3::new(0.5, 0.5, 0.0));
        // The grown vertex has no incident triangles.
        assert_eq!(mesh.vertices()[3].normal, Vector3::z());
    }

    #[test]
    fn test_set_uvs_shorter_list_updates_prefix() {
        let (mut mesh, _) = triangle_mesh();
        mesh.set_uvs(&[Vector3::new(0.25, 0.75, 0.0)]);
        assert_eq!(mesh.vertices()[0].uv, Vector3::new(0.25, 0.75, 0.0));
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn test_buffer_byte_accessors() {
        let (mesh, _) = triangle_mesh();
        assert_eq!(mesh.vertex_bytes(), 3 * mem::size_of::<Vertex>());
        assert_eq!(mesh.edge_index_count(), 6);
        assert_eq!(mesh.triangle_index_count(), 3);
        assert_eq!(mesh.overlay_edge_index_count(), 6);
    }

    #[test]
    fn test_clone_is_not_gpu_resident() {
        use crate::gpu::GpuBackend;
        use std::cell::Cell;

        struct Backend {
            unloads: Cell<u32>,
        }
        impl GpuBackend for Backend {
            fn unload_mesh(&self, _handle: GpuMeshHandle) {
                self.unloads.set(self.unloads.get() + 1);
            }
        }

        let backend = Rc::new(Backend {
            unloads: Cell::new(0),
        });
        let dyn_backend: Rc<dyn GpuBackend> = backend.clone();

        let (mut mesh, _) = triangle_mesh();
        mesh.bind_gpu(&dyn_backend, GpuMeshHandle(42));
        assert!(mesh.is_gpu_resident());

        let copy = mesh.clone();
        assert!(!copy.is_gpu_resident());

        drop(copy); // no unload
        assert_eq!(backend.unloads.get(), 0);
        drop(mesh); // unload fires exactly once
        assert_eq!(backend.unloads.get(), 1);
    }
}
