// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshframe Inc.

//! Topology elements and per-vertex adjacency
//!
//! Edges and triangles are index tuples into the mesh's vertex array.
//! The adjacency table records, for every vertex, which edges and
//! triangles reference it; it is rebuilt from scratch for the full
//! element array on every `set_edges`/`set_triangles` call so the
//! invariant never depends on incremental patching.

use crate::diagnostics::Diagnostics;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An ordered pair of vertex indices forming a wireframe segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub start: u32,
    pub end: u32,
}

impl Edge {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Both endpoints, start first.
    pub fn endpoints(&self) -> [u32; 2] {
        [self.start, self.end]
    }

    /// Checked endpoint access: 0 = start, 1 = end.
    pub fn endpoint(&self, i: usize) -> Option<u32> {
        match i {
            0 => Some(self.start),
            1 => Some(self.end),
            _ => None,
        }
    }

    /// True if either endpoint is `vertex`.
    pub fn references(&self, vertex: u32) -> bool {
        self.start == vertex || self.end == vertex
    }
}

/// Three vertex indices in counter-clockwise winding for outward faces.
///
/// With CCW indices viewed from outside, `(p1 - p0) x (p2 - p0)` is the
/// outward face normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [u32; 3],
}

impl Triangle {
    pub fn new(indices: [u32; 3]) -> Self {
        Self { indices }
    }

    /// Checked index access for 0..3.
    pub fn index(&self, i: usize) -> Option<u32> {
        self.indices.get(i).copied()
    }

    /// True if any corner is `vertex`.
    pub fn references(&self, vertex: u32) -> bool {
        self.indices.contains(&vertex)
    }
}

/// Per-vertex sets of incident element indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexAdjacency {
    /// Indices into the mesh's edge array.
    pub wireframe: HashSet<u32>,
    /// Indices into the mesh's triangle array.
    pub surface: HashSet<u32>,
}

/// Rebuild every vertex's `wireframe` set from `edges`.
///
/// Endpoints outside `0..adjacency.len()` are skipped with a warning;
/// a malformed element must not abort the whole rebuild.
pub fn rebuild_wireframe_adjacency(
    adjacency: &mut [VertexAdjacency],
    edges: &[Edge],
) -> Diagnostics {
    let mut diags = Diagnostics::new();
    for entry in adjacency.iter_mut() {
        entry.wireframe.clear();
    }
    for (edge_index, edge) in edges.iter().enumerate() {
        for vertex in edge.endpoints() {
            match adjacency.get_mut(vertex as usize) {
                Some(entry) => {
                    entry.wireframe.insert(edge_index as u32);
                }
                None => diags.warn(format!(
                    "edge {edge_index} references vertex {vertex} outside range {}",
                    adjacency.len()
                )),
            }
        }
    }
    diags
}

/// Rebuild every vertex's `surface` set from `triangles`.
pub fn rebuild_surface_adjacency(
    adjacency: &mut [VertexAdjacency],
    triangles: &[Triangle],
) -> Diagnostics {
    let mut diags = Diagnostics::new();
    for entry in adjacency.iter_mut() {
        entry.surface.clear();
    }
    for (tri_index, tri) in triangles.iter().enumerate() {
        for vertex in tri.indices {
            match adjacency.get_mut(vertex as usize) {
                Some(entry) => {
                    entry.surface.insert(tri_index as u32);
                }
                None => diags.warn(format!(
                    "triangle {tri_index} references vertex {vertex} outside range {}",
                    adjacency.len()
                )),
            }
        }
    }
    diags
}
