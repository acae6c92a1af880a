// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshframe Inc.

//! Geometry module - mesh representation and operations

mod bbox;
mod mesh;
mod primitives;
mod projection;
mod topology;

pub use bbox::BoundingBox;
pub use mesh::{Mesh, Vertex, DEFAULT_NORMAL_LENGTH, NORMAL_UNIT_EPS};
pub use primitives::{uv_sphere_counts, Primitive};
pub use topology::{Edge, Triangle, VertexAdjacency};
