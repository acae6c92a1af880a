// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshframe Inc.

//! Meshframe mesh subsystem
//!
//! The polygonal mesh data model of a real-time rendering framework:
//! vertex/edge/triangle buffers with adjacency bookkeeping, derived
//! normals/bounds recomputation, a normal-visualization overlay, UV
//! projections, procedural generators, and an OBJ importer. The
//! renderer is an external collaborator that reads the finished buffers
//! and registers its GPU residency through the [`gpu`] capability.

pub mod diagnostics;
pub mod geometry;
pub mod gpu;
pub mod io;
pub mod utils;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use geometry::{BoundingBox, Edge, Mesh, Primitive, Triangle, Vertex, VertexAdjacency};
pub use gpu::{GpuBackend, GpuMeshHandle};
pub use io::{import_obj_file, parse_obj, ImportConfig, ObjImport};
